use anyhow::Result;
use tracing::debug;

use terraform_runner_core::Operation;

use crate::commands::build_runner;
use crate::utils::parse_vars;

pub fn run_operation(
    operation: Operation,
    args: &[String],
    vars: &[String],
    chdir: Option<&str>,
    bin: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    debug!("running {operation} with args: {args:?}");

    let vars = parse_vars(vars)?;
    let mut runner = build_runner(chdir, bin)?;

    if dry_run {
        let command = runner.command_for(operation, args, &vars, None);
        println!("{}", command.to_shell_command());
        println!("Working directory: {}", command.working_dir.display());
        if !command.env.is_empty() {
            // Values stay out of the output; they may be sensitive.
            println!("Environment variables:");
            for (key, _) in &command.env {
                println!("  {key}");
            }
        }
        return Ok(());
    }

    let formatted = match operation {
        Operation::Init => runner.init(args, None),
        Operation::Plan => runner.plan(args, &vars, None),
        Operation::Apply => runner.apply(args, &vars, None),
        Operation::Destroy => runner.destroy(args, &vars, None),
        Operation::Output => anyhow::bail!("use the output subcommand"),
    };

    println!("{}", serde_json::to_string_pretty(&formatted)?);

    if formatted.invocation.failed {
        std::process::exit(1);
    }
    Ok(())
}
