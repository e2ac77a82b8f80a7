use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod utils;

use terraform_runner_core::Operation;

/// A thin orchestration wrapper around the terraform CLI
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    /// Working directory for terraform (defaults to current directory)
    #[arg(long = "chdir", global = true)]
    chdir: Option<String>,

    /// Path to the terraform binary
    #[arg(long = "bin", global = true)]
    bin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run terraform init
    Init {
        /// Arguments passed through to terraform, after `--`
        #[arg(last = true)]
        args: Vec<String>,

        /// Show the command without executing
        #[arg(short = 'd', long = "dry-run")]
        dry_run: bool,
    },
    /// Run terraform plan (always with -detailed-exitcode)
    Plan {
        /// Variable passed to terraform as a TF_VAR_ environment entry
        #[arg(short = 'v', long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Arguments passed through to terraform, after `--`
        #[arg(last = true)]
        args: Vec<String>,

        /// Show the command without executing
        #[arg(short = 'd', long = "dry-run")]
        dry_run: bool,
    },
    /// Run terraform apply (always with -auto-approve)
    Apply {
        /// Variable passed to terraform as a TF_VAR_ environment entry
        #[arg(short = 'v', long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Arguments passed through to terraform, after `--`
        #[arg(last = true)]
        args: Vec<String>,

        /// Show the command without executing
        #[arg(short = 'd', long = "dry-run")]
        dry_run: bool,
    },
    /// Run terraform destroy (always with -force)
    Destroy {
        /// Variable passed to terraform as a TF_VAR_ environment entry
        #[arg(short = 'v', long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Arguments passed through to terraform, after `--`
        #[arg(last = true)]
        args: Vec<String>,

        /// Show the command without executing
        #[arg(short = 'd', long = "dry-run")]
        dry_run: bool,
    },
    /// Read outputs from a state file as JSON
    Output {
        /// State file path (defaults to <workdir>/terraform.tfstate)
        #[arg(long = "state")]
        state: Option<PathBuf>,
    },
    /// Run an ordered list of operations from a JSON job file
    Sequence {
        /// Job file: {"steps": [...], "args": {step: [...]}, "vars": {...}}
        job: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let chdir = cli.chdir.as_deref();
    let bin = cli.bin.as_deref();

    match cli.command {
        Commands::Init { args, dry_run } => {
            commands::run_operation(Operation::Init, &args, &[], chdir, bin, dry_run)
        }
        Commands::Plan { vars, args, dry_run } => {
            commands::run_operation(Operation::Plan, &args, &vars, chdir, bin, dry_run)
        }
        Commands::Apply { vars, args, dry_run } => {
            commands::run_operation(Operation::Apply, &args, &vars, chdir, bin, dry_run)
        }
        Commands::Destroy { vars, args, dry_run } => {
            commands::run_operation(Operation::Destroy, &args, &vars, chdir, bin, dry_run)
        }
        Commands::Output { state } => commands::output_command(state.as_deref(), chdir, bin),
        Commands::Sequence { job } => commands::sequence_command(&job, chdir, bin),
    }
}
