//! Result formatting.

use crate::types::{CommandResult, FormattedResult, Invocation, Operation, RunResult};

/// Formats a finished command into the record handed back to callers.
///
/// A formatter registered for an operation fully replaces the default one:
/// it receives the operation that ran and the raw result and owns the
/// entire output record.
pub trait ResultFormatter {
    fn format(&self, operation: Operation, result: &CommandResult) -> FormattedResult;
}

/// Built-in formatter.
///
/// Any non-zero exit code is a failure, except exit code 2 from `plan`:
/// with `-detailed-exitcode` that means "succeeded, changes pending".
/// The exact argument vector is always embedded in the invocation record.
#[derive(Debug, Default)]
pub struct DefaultFormatter;

impl ResultFormatter for DefaultFormatter {
    fn format(&self, operation: Operation, result: &CommandResult) -> FormattedResult {
        let failed = match (operation, result.exit_code) {
            (_, 0) => false,
            (Operation::Plan, 2) => false,
            _ => true,
        };
        FormattedResult {
            invocation: Invocation {
                operation: operation.to_string(),
                failed,
                args: result.args.clone(),
            },
            result: RunResult {
                exit_code: result.exit_code,
                output: result.stdout.clone(),
                errors: result.stderr.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_exit(exit_code: i32) -> CommandResult {
        CommandResult {
            exit_code,
            stdout: "some output".to_string(),
            stderr: String::new(),
            args: vec!["terraform".to_string(), "plan".to_string()],
        }
    }

    #[test]
    fn test_zero_exit_is_success() {
        let formatted = DefaultFormatter.format(Operation::Apply, &result_with_exit(0));
        assert!(!formatted.invocation.failed);
    }

    #[test]
    fn test_plan_exit_two_is_success() {
        let formatted = DefaultFormatter.format(Operation::Plan, &result_with_exit(2));
        assert!(!formatted.invocation.failed);
        assert_eq!(formatted.result.exit_code, 2);
    }

    #[test]
    fn test_apply_exit_two_is_failure() {
        let formatted = DefaultFormatter.format(Operation::Apply, &result_with_exit(2));
        assert!(formatted.invocation.failed);
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let formatted = DefaultFormatter.format(Operation::Plan, &result_with_exit(1));
        assert!(formatted.invocation.failed);
    }

    #[test]
    fn test_args_are_embedded_for_auditing() {
        let formatted = DefaultFormatter.format(Operation::Plan, &result_with_exit(0));
        assert_eq!(formatted.invocation.args, vec!["terraform", "plan"]);
        assert_eq!(formatted.invocation.operation, "plan");
        assert_eq!(formatted.result.output, "some output");
    }
}
