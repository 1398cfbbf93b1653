//! Structured-text decoders turning layer bytes into value trees.
//!
//! The file and remote layers hand raw bytes to a [`StructuredDecoder`]. The
//! built-in [`ConfigFormat`] decoder delegates to Figment providers so that
//! TOML, JSON and (with the `yaml` feature) YAML documents all become a
//! [`serde_json::Value`] before being flattened.

use std::fmt;

use figment::{
    Figment,
    providers::{Format, Json, Toml},
};
use serde_json::Value;

use crate::{LoadError, LoadResult, LoadResultExt};

#[cfg(feature = "yaml")]
mod yaml;

#[cfg(feature = "yaml")]
pub use yaml::SaphyrYaml;

/// Decodes raw layer bytes into a value tree.
pub trait StructuredDecoder: fmt::Debug + Send + Sync {
    /// Decode `bytes` read from `origin`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError::Decode`] or [`LoadError::File`] when the bytes
    /// are not a valid document.
    fn decode(&self, origin: &str, bytes: &[u8]) -> LoadResult<Value>;
}

/// Built-in document formats.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum ConfigFormat {
    /// TOML documents.
    #[default]
    Toml,
    /// JSON documents.
    Json,
    /// YAML documents; decoding requires the `yaml` feature.
    Yaml,
}

impl ConfigFormat {
    /// Map a file extension to a format.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Infer the format from a path or address, falling back to TOML.
    ///
    /// Query strings and fragments are ignored so remote addresses such as
    /// `https://cfg.local/app.yaml?rev=3` resolve by their path.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerconf::ConfigFormat;
    ///
    /// assert_eq!(ConfigFormat::infer("conf/app.json"), ConfigFormat::Json);
    /// assert_eq!(ConfigFormat::infer("https://cfg.local/app.yml?rev=3"), ConfigFormat::Yaml);
    /// assert_eq!(ConfigFormat::infer("settings"), ConfigFormat::Toml);
    /// ```
    #[must_use]
    pub fn infer(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .unwrap_or_default()
    }
}

impl StructuredDecoder for ConfigFormat {
    fn decode(&self, origin: &str, bytes: &[u8]) -> LoadResult<Value> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| LoadError::decode(origin, figment::Error::from(err.to_string())))?;
        let figment = match self {
            Self::Toml => Figment::from(Toml::string(text)),
            Self::Json => Figment::from(Json::string(text)),
            Self::Yaml => yaml_figment(origin, text)?,
        };
        figment.extract::<Value>().into_load(origin)
    }
}

#[cfg(feature = "yaml")]
fn yaml_figment(origin: &str, text: &str) -> LoadResult<Figment> {
    Ok(Figment::from(SaphyrYaml::string(origin, text)))
}

#[cfg(not(feature = "yaml"))]
fn yaml_figment(origin: &str, _text: &str) -> LoadResult<Figment> {
    Err(LoadError::decode(
        origin,
        figment::Error::from(String::from(
            "yaml feature disabled: enable the 'yaml' feature to support this format",
        )),
    ))
}
