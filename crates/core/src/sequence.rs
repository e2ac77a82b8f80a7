//! Fail-fast execution of an ordered list of operations against one runner.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::runner::{TerraformRunner, Vars};
use crate::types::{FormattedResult, Operation};

/// What a step produced: a formatted command record, or the parsed
/// document for `output`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StepOutput {
    Command(FormattedResult),
    Document(Value),
}

/// Outcome of one step in a sequence.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: String,
    pub failed: bool,
    /// Resolution or execution error message; empty when the step ran
    /// cleanly.
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<StepOutput>,
}

impl StepReport {
    fn ok(step: &str, results: StepOutput) -> Self {
        Self {
            step: step.to_string(),
            failed: false,
            error: String::new(),
            results: Some(results),
        }
    }

    fn failure(step: &str, error: String, results: Option<StepOutput>) -> Self {
        Self {
            step: step.to_string(),
            failed: true,
            error,
            results,
        }
    }
}

/// Aggregate outcome of a sequence run.
#[derive(Debug, Serialize)]
pub struct SequenceReport {
    pub error_count: u32,
    pub steps: Vec<StepReport>,
}

impl SequenceReport {
    pub fn failed(&self) -> bool {
        self.error_count > 0
    }
}

/// Runs `steps` in order in `working_dir`, stopping at the first step that
/// cannot be resolved or that fails. No retries, no partial continuation;
/// the reports collected up to the halt are returned.
///
/// `args_map` maps a step name to the arguments for that step; `vars` is
/// shared by every variable-taking step.
pub fn run_sequence(
    steps: &[String],
    args_map: &HashMap<String, Vec<String>>,
    vars: &Vars,
    working_dir: impl Into<PathBuf>,
) -> SequenceReport {
    let mut runner = TerraformRunner::in_dir(working_dir);
    run_sequence_with(&mut runner, steps, args_map, vars)
}

/// Like [`run_sequence`], but against a caller-configured runner.
pub fn run_sequence_with(
    runner: &mut TerraformRunner,
    steps: &[String],
    args_map: &HashMap<String, Vec<String>>,
    vars: &Vars,
) -> SequenceReport {
    let mut reports = Vec::new();
    let mut error_count = 0;

    for step in steps {
        let report = match step.parse::<Operation>() {
            Ok(operation) => {
                let args = args_map.get(step.as_str()).cloned().unwrap_or_default();
                run_step(runner, operation, step, &args, vars)
            }
            Err(err) => {
                warn!("failed to resolve step <{step}>: {err}");
                StepReport::failure(step, err.to_string(), None)
            }
        };

        let halt = report.failed;
        if halt {
            error_count += 1;
        }
        reports.push(report);
        if halt {
            warn!("sequence halted at step <{step}>");
            break;
        }
    }

    SequenceReport {
        error_count,
        steps: reports,
    }
}

fn run_step(
    runner: &mut TerraformRunner,
    operation: Operation,
    step: &str,
    args: &[String],
    vars: &Vars,
) -> StepReport {
    let formatted = match operation {
        Operation::Init => runner.init(args, None),
        Operation::Plan => runner.plan(args, vars, None),
        Operation::Apply => runner.apply(args, vars, None),
        Operation::Destroy => runner.destroy(args, vars, None),
        Operation::Output => {
            return match runner.output(None) {
                Ok(document) => StepReport::ok(step, StepOutput::Document(document)),
                Err(err) => StepReport::failure(step, err.to_string(), None),
            };
        }
    };

    if formatted.invocation.failed {
        let error = format!("{step} exited with code {}", formatted.result.exit_code);
        StepReport::failure(step, error, Some(StepOutput::Command(formatted)))
    } else {
        StepReport::ok(step, StepOutput::Command(formatted))
    }
}
