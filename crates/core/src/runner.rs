//! The terraform runner: builds commands, executes them, and tracks the
//! side effects (plan file, state file) a run leaves behind.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::command::{arg_value, with_defaults, TerraformCommand};
use crate::error::{Error, Result};
use crate::format::{DefaultFormatter, ResultFormatter};
use crate::state::{StateRefresh, StateSnapshot};
use crate::types::{CommandResult, FormattedResult, Invocation, Operation, RunResult};

/// Variable map passed to plan, apply, and destroy. Values reach terraform
/// as `TF_VAR_` environment entries, never as argv.
pub type Vars = HashMap<String, String>;

/// Wrapper around the terraform CLI supporting init, plan, apply, destroy,
/// and output.
///
/// One invocation runs at a time; operations take `&mut self`, so a runner
/// instance cannot interleave an execution with a state reload.
pub struct TerraformRunner {
    binary: String,
    working_dir: PathBuf,
    state_path: PathBuf,
    plan_path: Option<PathBuf>,
    state: StateSnapshot,
    formatters: HashMap<Operation, Box<dyn ResultFormatter>>,
}

impl TerraformRunner {
    /// Creates a runner rooted in the current directory.
    pub fn new() -> Result<Self> {
        Ok(Self::in_dir(env::current_dir()?))
    }

    /// Creates a runner rooted in `working_dir`. The state path defaults to
    /// `terraform.tfstate` inside it.
    pub fn in_dir(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let state_path = working_dir.join("terraform.tfstate");
        Self {
            binary: "terraform".to_string(),
            working_dir,
            state_path,
            plan_path: None,
            state: StateSnapshot::default(),
            formatters: HashMap::new(),
        }
    }

    /// Overrides the terraform binary path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Overrides the default state file path.
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// Registers a formatter that fully replaces the default formatting for
    /// one operation.
    pub fn with_formatter(
        mut self,
        operation: Operation,
        formatter: Box<dyn ResultFormatter>,
    ) -> Self {
        self.formatters.insert(operation, formatter);
        self
    }

    /// The current state document. Empty object until a reload succeeds.
    pub fn state(&self) -> &Value {
        self.state.document()
    }

    /// Path of the plan saved by the last `plan` run that passed `-out=`.
    pub fn plan_path(&self) -> Option<&Path> {
        self.plan_path.as_deref()
    }

    /// Runs `terraform init` with the supplied arguments.
    pub fn init(&mut self, args: &[String], working_dir: Option<&Path>) -> FormattedResult {
        self.run(Operation::Init, args, &Vars::new(), working_dir)
    }

    /// Runs `terraform plan` with the supplied arguments.
    ///
    /// If the caller passed `-out=`, the plan path is captured for a later
    /// argument-less `apply`. The state file is reloaded afterwards when it
    /// changed on disk.
    pub fn plan(
        &mut self,
        args: &[String],
        vars: &Vars,
        working_dir: Option<&Path>,
    ) -> FormattedResult {
        self.run(Operation::Plan, args, vars, working_dir)
    }

    /// Runs `terraform apply` with the supplied arguments.
    ///
    /// With an empty argument list, the plan file captured by the last
    /// `plan -out=` run is applied, if there is one.
    pub fn apply(
        &mut self,
        args: &[String],
        vars: &Vars,
        working_dir: Option<&Path>,
    ) -> FormattedResult {
        let mut args = args.to_vec();
        if args.is_empty() {
            if let Some(plan) = &self.plan_path {
                args.push(plan.display().to_string());
            }
        }
        self.run(Operation::Apply, &args, vars, working_dir)
    }

    /// Runs `terraform destroy` with the supplied arguments.
    pub fn destroy(
        &mut self,
        args: &[String],
        vars: &Vars,
        working_dir: Option<&Path>,
    ) -> FormattedResult {
        self.run(Operation::Destroy, args, vars, working_dir)
    }

    /// Runs `terraform output -json` against the effective state file and
    /// returns the parsed document.
    ///
    /// Caller arguments and default injection do not apply here: the
    /// argument list is always exactly `-no-color -json -state=<path>`.
    pub fn output(&mut self, state_path: Option<&Path>) -> Result<Value> {
        let path = state_path.unwrap_or(&self.state_path).to_path_buf();
        let args = vec![
            "-no-color".to_string(),
            "-json".to_string(),
            format!("-state={}", path.display()),
        ];
        let raw = self
            .command_for(Operation::Output, &args, &Vars::new(), None)
            .execute()?;
        debug!("output returned: {}", raw.exit_code);
        if raw.exit_code != 0 {
            warn!("output failed with {}: {}", raw.exit_code, raw.stderr);
            return Err(Error::OutputFailed {
                code: raw.exit_code,
                stderr: raw.stderr,
            });
        }
        Ok(serde_json::from_str(&raw.stdout)?)
    }

    /// Assembles the command an operation would execute, defaults included.
    /// Useful for previewing without running.
    pub fn command_for(
        &self,
        operation: Operation,
        args: &[String],
        vars: &Vars,
        working_dir: Option<&Path>,
    ) -> TerraformCommand {
        let built = match operation {
            Operation::Output => args.to_vec(),
            _ => with_defaults(args, operation.extra_defaults()),
        };
        let dir = working_dir.unwrap_or(&self.working_dir);
        TerraformCommand::new(&self.binary, operation, built)
            .with_working_dir(dir)
            .with_vars(vars)
    }

    fn run(
        &mut self,
        operation: Operation,
        args: &[String],
        vars: &Vars,
        working_dir: Option<&Path>,
    ) -> FormattedResult {
        let command = self.command_for(operation, args, vars, working_dir);
        let raw = match command.execute() {
            Ok(raw) => raw,
            Err(err) => {
                // Launch failures are reported, never raised: callers get a
                // failed record with the intended argv for auditing.
                warn!("{operation} failed: {err}");
                return FormattedResult {
                    invocation: Invocation {
                        operation: operation.to_string(),
                        failed: true,
                        args: command.argv(),
                    },
                    result: RunResult {
                        exit_code: -1,
                        output: String::new(),
                        errors: err.to_string(),
                    },
                };
            }
        };

        let formatted = self.format(operation, &raw);

        match operation {
            Operation::Plan => {
                self.capture_plan_path(&raw, working_dir);
                self.refresh_state(&raw.args);
                debug!("plan state path: {}", self.state_path.display());
            }
            Operation::Apply | Operation::Destroy => {
                self.refresh_state(&raw.args);
            }
            Operation::Init | Operation::Output => {}
        }

        formatted
    }

    fn format(&self, operation: Operation, result: &CommandResult) -> FormattedResult {
        match self.formatters.get(&operation) {
            Some(formatter) => formatter.format(operation, result),
            None => DefaultFormatter.format(operation, result),
        }
    }

    /// Records the plan file named by `-out=`, unless the plan itself
    /// errored (exit code 1 with `-detailed-exitcode`). Relative paths are
    /// resolved against the effective working directory.
    fn capture_plan_path(&mut self, raw: &CommandResult, working_dir: Option<&Path>) {
        if raw.exit_code == 1 {
            return;
        }
        let out = arg_value("-out=", &raw.args);
        if out.is_empty() {
            return;
        }
        let path = PathBuf::from(&out);
        let path = if path.is_absolute() {
            path
        } else {
            working_dir.unwrap_or(&self.working_dir).join(path)
        };
        debug!("captured plan path: {}", path.display());
        self.plan_path = Some(path);
    }

    fn refresh_state(&mut self, args: &[String]) -> StateRefresh {
        let path = self.effective_state_path(args);
        self.state.refresh_from(&path)
    }

    /// The state path a finished run would have written.
    ///
    /// `-state=` wins whenever present; `-state-out=` is consulted only
    /// when `-state=` is absent; otherwise the configured default applies.
    fn effective_state_path(&self, args: &[String]) -> PathBuf {
        let mut path = arg_value("-state-out=", args);
        let state = arg_value("-state=", args);
        if !state.is_empty() {
            path = state;
        }
        if path.is_empty() {
            self.state_path.clone()
        } else {
            PathBuf::from(path)
        }
    }
}
