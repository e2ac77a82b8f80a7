use std::collections::HashMap;

use anyhow::{bail, Result};

/// Parses the `KEY=VALUE` pairs given to `--var` into a variable map.
pub fn parse_vars(raw: &[String]) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    for pair in raw {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                vars.insert(key.to_string(), value.to_string());
            }
            _ => bail!("invalid variable '{pair}', expected KEY=VALUE"),
        }
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vars_splits_on_first_equals() {
        let vars = parse_vars(&["region=eu-west-1".to_string(), "expr=a=b".to_string()]).unwrap();
        assert_eq!(vars["region"], "eu-west-1");
        assert_eq!(vars["expr"], "a=b");
    }

    #[test]
    fn test_parse_vars_rejects_malformed_pairs() {
        assert!(parse_vars(&["no-equals".to_string()]).is_err());
        assert!(parse_vars(&["=value".to_string()]).is_err());
    }
}
