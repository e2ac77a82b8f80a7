//! Argument-list construction and post-run argument inspection.

use tracing::debug;

/// Defaults applied to every invocation unless the caller already supplied
/// the identical string.
pub const DEFAULT_ARGS: &[&str] = &["-no-color", "-input=false"];

/// Builds the final argument list for a subcommand.
///
/// Defaults are prepended, never appended: terraform is sensitive to flag
/// position when a trailing positional argument (a plan file or module
/// directory) is present. Command-specific extras come first, then the
/// global defaults, then the caller's arguments in their original order.
///
/// Duplicate suppression is a plain string-membership check against the
/// caller's raw list, with no flag-name-aware parsing: `-foo=bar` does not
/// suppress `-foo=baz`.
pub fn with_defaults(args: &[String], extras: &[&str]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(args.len() + extras.len() + 2);
    for default in extras.iter().chain(DEFAULT_ARGS) {
        if !args.iter().any(|arg| arg == default) {
            merged.push((*default).to_string());
        }
    }
    debug!("adding default args: {:?}", merged);
    merged.extend(args.iter().cloned());
    merged
}

/// Returns the value of the first argument starting with `prefix`, taken as
/// the substring after its final `=`.
///
/// Used to recover file paths (plan output, state file) from an argument
/// list after a run. Returns an empty string when no argument matches.
pub fn arg_value(prefix: &str, args: &[String]) -> String {
    match args.iter().find(|arg| arg.starts_with(prefix)) {
        Some(found) => {
            let value = found.rsplit('=').next().unwrap_or_default();
            debug!("extracted {prefix} -> {value}");
            value.to_string()
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_defaults_are_prepended_in_priority_order() {
        let args = strings(&["-out=plan.bin", "module-dir"]);
        let built = with_defaults(&args, &["-detailed-exitcode"]);
        assert_eq!(
            built,
            strings(&[
                "-detailed-exitcode",
                "-no-color",
                "-input=false",
                "-out=plan.bin",
                "module-dir",
            ])
        );
    }

    #[test]
    fn test_caller_supplied_default_is_not_duplicated() {
        let args = strings(&["-target=aws_instance.web", "-no-color"]);
        let built = with_defaults(&args, &[]);
        assert_eq!(
            built,
            strings(&["-input=false", "-target=aws_instance.web", "-no-color"])
        );
    }

    #[test]
    fn test_building_is_idempotent() {
        let args = strings(&["-out=plan.bin"]);
        let once = with_defaults(&args, &["-detailed-exitcode"]);
        let twice = with_defaults(&once, &["-detailed-exitcode"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_membership_check_is_not_flag_aware() {
        // A slightly different spelling of a default is a distinct string,
        // so both end up in the list.
        let args = strings(&["-input=true"]);
        let built = with_defaults(&args, &[]);
        assert_eq!(built, strings(&["-no-color", "-input=false", "-input=true"]));
    }

    #[test]
    fn test_empty_caller_args() {
        let built = with_defaults(&[], &["-auto-approve"]);
        assert_eq!(built, strings(&["-auto-approve", "-no-color", "-input=false"]));
    }

    #[test]
    fn test_arg_value_extracts_path_after_final_equals() {
        let args = strings(&["-out=/tmp/plan.bin", "-no-color"]);
        assert_eq!(arg_value("-out=", &args), "/tmp/plan.bin");
    }

    #[test]
    fn test_arg_value_missing_prefix_is_empty_not_an_error() {
        let args = strings(&["-no-color"]);
        assert_eq!(arg_value("-out=", &args), "");
        assert_eq!(arg_value("-out=", &[]), "");
    }

    #[test]
    fn test_arg_value_takes_first_match() {
        let args = strings(&["-state=a.tfstate", "-state=b.tfstate"]);
        assert_eq!(arg_value("-state=", &args), "a.tfstate");
    }
}
