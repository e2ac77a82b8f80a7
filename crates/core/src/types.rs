//! Shared data types for terraform invocations and their results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The fixed set of terraform subcommands the runner drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Init,
    Plan,
    Apply,
    Destroy,
    Output,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Plan => "plan",
            Operation::Apply => "apply",
            Operation::Destroy => "destroy",
            Operation::Output => "output",
        }
    }

    /// Command-specific defaults injected ahead of the global ones.
    ///
    /// `plan` always asks for the detailed exit code so "changes pending"
    /// stays distinguishable from a plain success; `apply` and `destroy`
    /// run non-interactively.
    pub fn extra_defaults(self) -> &'static [&'static str] {
        match self {
            Operation::Plan => &["-detailed-exitcode"],
            Operation::Apply => &["-auto-approve"],
            Operation::Destroy => &["-force"],
            Operation::Init | Operation::Output => &[],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Operation::Init),
            "plan" => Ok(Operation::Plan),
            "apply" => Ok(Operation::Apply),
            "destroy" => Ok(Operation::Destroy),
            "output" => Ok(Operation::Output),
            other => Err(Error::UnknownOperation(other.to_string())),
        }
    }
}

/// Raw outcome of one child-process invocation.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The exact argument vector handed to the OS, binary included.
    pub args: Vec<String>,
}

/// Invocation half of a formatted result: what ran and whether it failed.
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    pub operation: String,
    pub failed: bool,
    pub args: Vec<String>,
}

/// Result half of a formatted result: what the child reported back.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub exit_code: i32,
    pub output: String,
    pub errors: String,
}

/// Record returned to callers for every executed operation.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedResult {
    pub invocation: Invocation,
    pub result: RunResult,
}
