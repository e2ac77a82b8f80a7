//! Integration test driving the runner end to end against a fake
//! terraform executable.

#![cfg(unix)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use terraform_runner_core::{run_sequence_with, StepOutput, TerraformRunner};

fn fake_terraform(dir: &Path, script: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("terraform");
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path.display().to_string()
}

/// A plan/apply round trip: the fake binary writes a state file on apply,
/// exits 2 on plan (changes pending), and the runner picks the new state
/// up afterwards.
#[test]
fn plan_apply_round_trip_reloads_state() {
    let dir = TempDir::new().unwrap();
    let bin = fake_terraform(
        dir.path(),
        concat!(
            "#!/bin/sh\n",
            "case \"$1\" in\n",
            "  plan) exit 2 ;;\n",
            "  apply) printf '{\"serial\": 42, \"resources\": []}' > terraform.tfstate ;;\n",
            "esac\n",
            "exit 0\n",
        ),
    );
    let mut runner = TerraformRunner::in_dir(dir.path()).with_binary(&bin);

    let mut vars = HashMap::new();
    vars.insert("environment".to_string(), "staging".to_string());

    let plan = runner.plan(&["-out=next.bin".to_string()], &vars, None);
    assert!(!plan.invocation.failed, "exit 2 from plan means changes pending");
    assert_eq!(plan.result.exit_code, 2);

    // No state written yet, the snapshot is still the empty object.
    assert!(runner.state().as_object().is_some_and(|map| map.is_empty()));

    let apply = runner.apply(&[], &vars, None);
    assert!(!apply.invocation.failed);
    // The captured plan file was passed as the trailing argument.
    let plan_arg = dir.path().join("next.bin").display().to_string();
    assert_eq!(apply.invocation.args.last(), Some(&plan_arg));

    assert_eq!(runner.state()["serial"], 42);
}

/// The sequencer runs every step until the first failure and reports what
/// it collected so far.
#[test]
fn sequence_collects_reports_until_first_failure() {
    let dir = TempDir::new().unwrap();
    let bin = fake_terraform(
        dir.path(),
        concat!(
            "#!/bin/sh\n",
            "echo \"$1\" >> invocations.log\n",
            "[ \"$1\" = apply ] && exit 1\n",
            "exit 0\n",
        ),
    );
    let mut runner = TerraformRunner::in_dir(dir.path()).with_binary(&bin);

    let steps: Vec<String> = ["init", "plan", "apply", "destroy"]
        .iter()
        .map(|step| step.to_string())
        .collect();
    let report = run_sequence_with(&mut runner, &steps, &HashMap::new(), &HashMap::new());

    assert!(report.failed());
    assert_eq!(report.error_count, 1);
    assert_eq!(report.steps.len(), 3);

    for step in &report.steps[..2] {
        assert!(!step.failed);
        match &step.results {
            Some(StepOutput::Command(formatted)) => {
                assert!(formatted.invocation.args.contains(&"-no-color".to_string()));
            }
            other => panic!("unexpected step output: {other:?}"),
        }
    }

    let log = fs::read_to_string(dir.path().join("invocations.log")).unwrap();
    assert_eq!(log.lines().collect::<Vec<_>>(), vec!["init", "plan", "apply"]);
}
