use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{CommandResult, Operation};

/// Environment prefix terraform reads variables from. Variables are passed
/// this way so sensitive values never show up in argv or shell history.
const VAR_PREFIX: &str = "TF_VAR_";

/// Poll interval for the child wait loop.
const WAIT_POLL: Duration = Duration::from_millis(100);

/// Elapsed time between "still running" log lines while waiting.
const WAIT_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// A fully assembled terraform invocation.
#[derive(Debug, Clone)]
pub struct TerraformCommand {
    pub binary: String,
    pub operation: Operation,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Extra environment entries overlaid on the inherited environment.
    pub env: Vec<(String, String)>,
}

impl TerraformCommand {
    pub fn new(binary: impl Into<String>, operation: Operation, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            operation,
            args,
            working_dir: PathBuf::from("."),
            env: Vec::new(),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_env(mut self, key: String, value: String) -> Self {
        self.env.push((key, value));
        self
    }

    /// Maps each variable to a `TF_VAR_<name>` environment entry.
    pub fn with_vars(mut self, vars: &HashMap<String, String>) -> Self {
        for (key, value) in vars {
            self.env.push((format!("{VAR_PREFIX}{key}"), value.clone()));
        }
        self
    }

    /// The exact argument vector handed to the OS, binary included.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.binary.clone());
        argv.push(self.operation.to_string());
        argv.extend(self.args.iter().cloned());
        argv
    }

    pub fn to_shell_command(&self) -> String {
        let mut cmd = String::new();
        for (i, arg) in self.argv().iter().enumerate() {
            if i > 0 {
                cmd.push(' ');
            }
            if arg.contains(' ') {
                cmd.push_str(&format!("'{arg}'"));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }

    /// Spawns the child and blocks until it exits.
    ///
    /// The wait loop is a liveness signal, not a timeout: every few seconds
    /// of waiting it logs that the child is still running, then keeps
    /// waiting. The child is never killed.
    pub fn execute(&self) -> Result<CommandResult> {
        debug!("command: {}", self.to_shell_command());

        let mut cmd = Command::new(&self.binary);
        cmd.arg(self.operation.as_str())
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|source| Error::Launch {
            binary: self.binary.clone(),
            source,
        })?;

        // Drain both pipes off-thread so a chatty child cannot fill a pipe
        // buffer and wedge against the wait loop below.
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let started = Instant::now();
        let mut next_report = WAIT_LOG_INTERVAL;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None => {
                    if started.elapsed() >= next_report {
                        warn!(
                            "{} still running after {}s",
                            self.operation,
                            started.elapsed().as_secs()
                        );
                        next_report += WAIT_LOG_INTERVAL;
                    }
                    thread::sleep(WAIT_POLL);
                }
            }
        };

        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);
        let exit_code = status.code().unwrap_or(-1);
        debug!("stdout: {stdout}");
        debug!("stderr: {stderr}");
        debug!("return code: {exit_code}");

        Ok(CommandResult {
            exit_code,
            stdout,
            stderr,
            args: self.argv(),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(err) = pipe.read_to_end(&mut buf) {
                warn!("failed to read child pipe: {err}");
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
