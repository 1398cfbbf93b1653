//! Constructors for `LoadError`.

use std::sync::Arc;

use camino::Utf8Path;

use super::LoadError;

impl LoadError {
    /// Construct a validation error for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerconf::LoadError;
    /// let err = LoadError::validation("remote.address", "must not be blank");
    /// assert!(err.to_string().contains("remote.address"));
    /// ```
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Validation {
            key: key.into(),
            message: message.into(),
        })
    }

    /// Construct a file error for `path`.
    #[must_use]
    pub fn file(
        path: &Utf8Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a decode error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use layerconf::LoadError;
    /// let err = LoadError::decode("app.toml", figment::Error::from("boom"));
    /// assert!(matches!(&*err, LoadError::Decode { .. }));
    /// ```
    #[must_use]
    pub fn decode(origin: impl Into<String>, source: figment::Error) -> Arc<Self> {
        Arc::new(Self::Decode {
            origin: origin.into(),
            source: Box::new(source),
        })
    }

    /// Construct the error reported once a remote fetch gives up.
    #[must_use]
    pub fn remote_exhausted(
        address: impl Into<String>,
        attempts: u32,
        last_error: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self::RemoteExhausted {
            address: address.into(),
            attempts,
            last_error: last_error.into(),
        })
    }
}
