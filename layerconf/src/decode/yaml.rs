//! YAML provider support backed by `serde-saphyr`.

use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Value as FigmentValue},
};
use serde_saphyr::Options;

/// Figment provider that parses in-memory YAML using `serde-saphyr`.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    origin: String,
    contents: String,
}

impl SaphyrYaml {
    /// Construct a provider for YAML `contents` read from `origin`.
    #[must_use]
    pub fn string(origin: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            contents: contents.into(),
        }
    }

    /// Parse YAML contents into a Figment `Value` using strict boolean semantics.
    fn parse_value(contents: &str) -> Result<FigmentValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::named(format!("Saphyr YAML ({})", self.origin))
    }

    fn data(&self) -> Result<std::collections::BTreeMap<Profile, Dict>, figment::Error> {
        let value = Self::parse_value(&self.contents).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.origin
            )))
        })?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
