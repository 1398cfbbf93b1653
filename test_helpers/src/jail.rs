//! Helpers for running file-layer tests inside a `figment::Jail`.
//!
//! The jail switches into a fresh temporary working directory, so relative
//! configuration paths written here resolve without touching the real
//! workspace.

use anyhow::{Result, anyhow};

/// Write `files` into a fresh jail, then run `f` there.
///
/// Each entry is `(relative path, contents)`. The jail is torn down once the
/// closure completes, even when it fails.
///
/// # Errors
///
/// Returns an error when the jail cannot be created, a file cannot be
/// written or the closure fails.
///
/// # Examples
///
/// ```
/// use layerconf_test_helpers::jail::with_files;
///
/// let text = with_files(&[("app.toml", "port = 1")], |_| {
///     std::fs::read_to_string("app.toml").map_err(anyhow::Error::from)
/// })?;
/// assert_eq!(text, "port = 1");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn with_files<F, T>(files: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        for (path, contents) in files {
            jail.create_file(path, contents)?;
        }
        output = Some(f(jail).map_err(|err| figment::Error::from(format!("{err:#}")))?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}
