//! Primary error enum for runtime configuration loading.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result alias used throughout the runtime crate.
///
/// Errors are shared behind an [`Arc`] so a single failure can be both
/// returned and recorded in a [`crate::LoadReport`].
pub type LoadResult<T> = Result<T, Arc<LoadError>>;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The loader was configured inconsistently.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Configuration key that failed validation.
        key: String,
        /// Human-readable explanation of the validation failure.
        message: String,
    },

    /// Error originating from a configuration file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying error reported while reading the file.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Structured text could not be decoded into a value tree.
    #[error("Failed to decode configuration from '{origin}': {source}")]
    Decode {
        /// File path or address the bytes came from.
        origin: String,
        /// Underlying decoder error.
        #[source]
        source: Box<figment::Error>,
    },

    /// The remote fetch failed and no retries remain.
    #[error(
        "remote configuration from '{address}' unavailable after {attempts} attempt(s): {last_error}"
    )]
    RemoteExhausted {
        /// Address that was fetched.
        address: String,
        /// Number of requests issued before giving up.
        attempts: u32,
        /// Description of the final failure.
        last_error: String,
    },
}
