use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use terraform_runner_core::run_sequence_with;

use crate::commands::build_runner;

/// Job file for the sequence subcommand.
#[derive(Debug, Deserialize)]
pub struct SequenceJob {
    /// Operation names, executed in order: init, plan, apply, destroy,
    /// output.
    pub steps: Vec<String>,
    /// Per-step terraform arguments, keyed by operation name.
    #[serde(default)]
    pub args: HashMap<String, Vec<String>>,
    /// Variables shared by every variable-taking step.
    #[serde(default)]
    pub vars: HashMap<String, String>,
}

pub fn sequence_command(job_path: &Path, chdir: Option<&str>, bin: Option<&str>) -> Result<()> {
    let raw = fs::read_to_string(job_path)
        .with_context(|| format!("failed to read job file {}", job_path.display()))?;
    let job: SequenceJob = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse job file {}", job_path.display()))?;

    let mut runner = build_runner(chdir, bin)?;
    let report = run_sequence_with(&mut runner, &job.steps, &job.args, &job.vars);

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.failed() {
        std::process::exit(1);
    }
    Ok(())
}
