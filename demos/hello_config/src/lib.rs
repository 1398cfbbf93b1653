//! A small service configured through a generated layered loader.
//!
//! Configuration types live in [`config`]; `build.rs` turns them into the
//! [`loader`] module.

pub mod config;

/// Loader generated from the types in [`config`].
pub mod loader {
    include!(concat!(env!("OUT_DIR"), "/config_loader.rs"));
}

use layerconf::{LoadResult, LoadedConfig, Loader};

/// Environment variable naming the configuration file.
pub const CONFIG_FILE_VAR: &str = "HELLO_CONFIG_FILE";

/// File read when [`CONFIG_FILE_VAR`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "hello_config.toml";

/// Load the configuration from `config_file` and `args`.
///
/// # Errors
///
/// Returns an error when a required layer fails; the demo requires none, so
/// in practice an unreadable file only shows up in the load report.
pub fn load_with<I, S>(config_file: &str, args: I) -> LoadResult<LoadedConfig<loader::RootConfig>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let built = Loader::builder().config_path(config_file).args(args).build()?;
    loader::load(&built)
}
