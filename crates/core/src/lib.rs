//! terraform-runner - a thin orchestration wrapper around the terraform CLI
//!
//! This crate provides functionality to:
//! - Build default-augmented argument lists for init, plan, apply, destroy
//! - Invoke terraform as a blocking child process, with variables passed as
//!   `TF_VAR_` environment entries instead of command-line arguments
//! - Track the state file's modification time and reload it when it changes
//! - Normalize each run into a serializable result record, with pluggable
//!   per-operation formatters
pub mod command;
pub mod error;
pub mod format;
pub mod runner;
pub mod sequence;
pub mod state;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use command::{arg_value, with_defaults, TerraformCommand};
pub use format::{DefaultFormatter, ResultFormatter};
pub use runner::TerraformRunner;
pub use sequence::{run_sequence, run_sequence_with, SequenceReport, StepOutput, StepReport};
pub use state::{load_state_file, StateRefresh, StateSnapshot};
