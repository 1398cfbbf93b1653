//! Flattened key-path maps shared by every non-default layer.
//!
//! Nested configuration is addressed by dot-joined tag keys such as
//! `serverConfig.port`. Decoded files, remote payloads and command-line
//! tokens are all reduced to this shape before merging.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde_json::Value;

/// Mapping from a flattened key path to its raw string value.
///
/// Keys are kept sorted so iteration, and anything rendered from it, is
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatValues(BTreeMap<String, String>);

impl FlatValues {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Flatten a decoded value tree.
    ///
    /// Strings are kept verbatim, numbers and booleans use their JSON
    /// rendering, and `null` or array entries are skipped because no leaf
    /// field can receive them.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerconf::FlatValues;
    /// use layerconf::serde_json::json;
    ///
    /// let flat = FlatValues::from_value(&json!({
    ///     "server": {"port": 8080, "host": "localhost"},
    ///     "debug": true
    /// }));
    /// assert_eq!(flat.get("server.port"), Some("8080"));
    /// assert_eq!(flat.get("server.host"), Some("localhost"));
    /// assert_eq!(flat.get("debug"), Some("true"));
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut flat = Self::new();
        flatten_into(value, "", &mut flat);
        flat
    }

    /// Insert a value, replacing any earlier value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FlatValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FlatValues {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn flatten_into(value: &Value, prefix: &str, out: &mut FlatValues) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(child, &path, out);
            }
        }
        Value::String(text) => out.insert(prefix, text.as_str()),
        Value::Number(number) => out.insert(prefix, number.to_string()),
        Value::Bool(flag) => out.insert(prefix, flag.to_string()),
        Value::Null | Value::Array(_) => {}
    }
}

/// Resolve a dot-separated key path inside a value tree.
///
/// An empty key returns the root.
///
/// # Examples
///
/// ```
/// use layerconf::lookup_path;
/// use layerconf::serde_json::json;
///
/// let tree = json!({"db": {"url": "postgres://localhost"}});
/// assert_eq!(lookup_path(&tree, "db.url"), Some(&json!("postgres://localhost")));
/// assert!(lookup_path(&tree, "db.user").is_none());
/// ```
#[must_use]
pub fn lookup_path<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return Some(value);
    }
    key.split('.')
        .try_fold(value, |node, segment| node.as_object()?.get(segment))
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serde_json::json;

    use super::{FlatValues, lookup_path};

    #[rstest]
    fn flattening_skips_nulls_and_arrays() -> Result<()> {
        let flat = FlatValues::from_value(&json!({
            "name": null,
            "tags": ["a", "b"],
            "nested": {"ratio": 0.5}
        }));
        ensure!(flat.len() == 1, "expected only the ratio key: {flat:?}");
        ensure!(flat.get("nested.ratio") == Some("0.5"), "ratio lost: {flat:?}");
        Ok(())
    }

    #[rstest]
    fn blank_strings_survive_flattening() -> Result<()> {
        let flat = FlatValues::from_value(&json!({"server": {"port": ""}}));
        ensure!(
            flat.get("server.port") == Some(""),
            "blank values are filtered by the validator, not the flattener"
        );
        Ok(())
    }

    #[rstest]
    #[case("", true)]
    #[case("a", true)]
    #[case("a.b", true)]
    #[case("a.b.c", false)]
    #[case("missing", false)]
    fn lookup_path_walks_objects(#[case] key: &str, #[case] found: bool) -> Result<()> {
        let tree = json!({"a": {"b": 1}});
        ensure!(
            lookup_path(&tree, key).is_some() == found,
            "lookup of '{key}' should be found={found}"
        );
        Ok(())
    }

    #[rstest]
    fn later_inserts_replace_earlier_ones() -> Result<()> {
        let flat: FlatValues = [("k", "first"), ("k", "second")].into_iter().collect();
        ensure!(flat.get("k") == Some("second"), "expected last write to win");
        ensure!(flat.len() == 1 && !flat.is_empty());
        ensure!(FlatValues::new().is_empty());
        Ok(())
    }
}
