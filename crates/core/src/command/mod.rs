//! Terraform command construction and execution

pub mod args;
pub mod terraform_command;

// Re-export commonly used items
pub use args::{arg_value, with_defaults, DEFAULT_ARGS};
pub use terraform_command::TerraformCommand;
