//! Command-line layer: `-key=value` tokens.

use crate::FlatValues;

/// Collect `-key=value` tokens into a flattened map.
///
/// One or two leading dashes are accepted. Tokens without a dash, without
/// `=`, or with an empty key are ignored. When a key repeats, the last token
/// wins.
///
/// # Examples
///
/// ```
/// use layerconf::sources::parse_args;
///
/// let values = parse_args(["app", "-serverConfig.port=9000", "--dbConfig.url=", "-v"]);
/// assert_eq!(values.get("serverConfig.port"), Some("9000"));
/// assert_eq!(values.get("dbConfig.url"), Some(""));
/// assert_eq!(values.len(), 2);
/// ```
pub fn parse_args<I, S>(args: I) -> FlatValues
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = FlatValues::new();
    for arg in args {
        let token = arg.as_ref();
        let Some(flag) = token.strip_prefix('-') else {
            continue;
        };
        let body = flag.strip_prefix('-').unwrap_or(flag);
        let Some((key, value)) = body.split_once('=') else {
            tracing::debug!(token, "ignoring argument without '='");
            continue;
        };
        let trimmed_key = key.trim();
        if trimmed_key.is_empty() {
            tracing::debug!(token, "ignoring argument with an empty key");
            continue;
        }
        values.insert(trimmed_key, value);
    }
    values
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;

    use super::parse_args;

    #[rstest]
    #[case(&["-a=1"], "a", Some("1"))]
    #[case(&["--a=1"], "a", Some("1"))]
    #[case(&["-a=x=y"], "a", Some("x=y"))]
    #[case(&["a=1"], "a", None)]
    #[case(&["-=1"], "", None)]
    #[case(&["-a=1", "-a=2"], "a", Some("2"))]
    fn token_forms(
        #[case] args: &[&str],
        #[case] key: &str,
        #[case] expected: Option<&str>,
    ) -> Result<()> {
        let values = parse_args(args);
        ensure!(values.get(key) == expected, "unexpected value for {key}: {values:?}");
        Ok(())
    }

    #[rstest]
    fn program_name_and_flags_are_ignored() -> Result<()> {
        let values = parse_args(["./app", "--verbose", "serve"]);
        ensure!(values.is_empty(), "expected no values, got {values:?}");
        Ok(())
    }
}
