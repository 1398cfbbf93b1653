//! Extension for mapping decoder failures onto `LoadResult` concisely.
//!
//! ```
//! use layerconf::{LoadError, LoadResult, LoadResultExt};
//! use figment::{Figment, providers::{Format, Toml}};
//!
//! fn port(text: &str) -> LoadResult<u16> {
//!     Figment::from(Toml::string(text)).extract_inner("port").into_load("inline")
//! }
//!
//! assert_eq!(port("port = 80")?, 80);
//! assert!(matches!(&*port("port = 'x'").unwrap_err(), LoadError::Decode { .. }));
//! # Ok::<(), std::sync::Arc<LoadError>>(())
//! ```

use crate::{LoadError, LoadResult};

/// Maps `Result<T, figment::Error>` into a [`LoadError::Decode`].
pub trait LoadResultExt<T> {
    /// Attach `origin` and convert the error.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Decode`] wrapped in `Arc` when the input is `Err`.
    fn into_load(self, origin: &str) -> LoadResult<T>;
}

impl<T> LoadResultExt<T> for Result<T, figment::Error> {
    fn into_load(self, origin: &str) -> LoadResult<T> {
        self.map_err(|err| LoadError::decode(origin, err))
    }
}
