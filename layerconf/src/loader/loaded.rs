//! The immutable result of a load.

use serde_json::Value;

use crate::{FlatValues, LayeredMerge, LoadReport, lookup_path};

/// Fully merged configuration plus its lookup surfaces.
///
/// Built once by [`crate::Loader::load`] and handed to consumers by
/// reference; it is never mutated afterwards.
#[derive(Clone, Debug)]
pub struct LoadedConfig<T> {
    settings: T,
    tree: Value,
    strings: FlatValues,
    report: LoadReport,
}

impl<T: LayeredMerge> LoadedConfig<T> {
    /// Snapshot `settings` into the lookup tree and flattened string map.
    #[must_use]
    pub fn new(settings: T, report: LoadReport) -> Self {
        let tree = settings.to_value();
        let strings = FlatValues::from_value(&tree);
        Self {
            settings,
            tree,
            strings,
            report,
        }
    }
}

impl<T> LoadedConfig<T> {
    /// The merged, typed configuration.
    #[must_use]
    pub const fn settings(&self) -> &T {
        &self.settings
    }

    /// Consume the wrapper and return the typed configuration.
    #[must_use]
    pub fn into_settings(self) -> T {
        self.settings
    }

    /// Look up the merged value of a leaf as a string.
    ///
    /// Numbers and booleans are rendered; unset optional values are absent.
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.strings.get(key)
    }

    /// Look up any merged value, leaf or nested, by flattened key path.
    #[must_use]
    pub fn get_config(&self, key: &str) -> Option<&Value> {
        lookup_path(&self.tree, key)
    }

    /// Every merged leaf as a flattened map.
    #[must_use]
    pub const fn values(&self) -> &FlatValues {
        &self.strings
    }

    /// Which layers contributed and which failed.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }
}
