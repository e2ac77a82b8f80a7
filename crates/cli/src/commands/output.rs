use std::path::Path;

use anyhow::{Context, Result};

use crate::commands::build_runner;

pub fn output_command(state: Option<&Path>, chdir: Option<&str>, bin: Option<&str>) -> Result<()> {
    let mut runner = build_runner(chdir, bin)?;
    let document = runner
        .output(state)
        .context("failed to read terraform outputs")?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
