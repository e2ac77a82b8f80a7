pub mod output;
pub mod run;
pub mod sequence;

pub use output::output_command;
pub use run::run_operation;
pub use sequence::sequence_command;

use anyhow::Result;
use terraform_runner_core::TerraformRunner;

/// Builds a runner from the global CLI options.
pub fn build_runner(chdir: Option<&str>, bin: Option<&str>) -> Result<TerraformRunner> {
    let mut runner = match chdir {
        Some(dir) => TerraformRunner::in_dir(dir),
        None => TerraformRunner::new()?,
    };
    if let Some(bin) = bin {
        runner = runner.with_binary(bin);
    }
    Ok(runner)
}
