//! The layered merge contract implemented by generated code.
//!
//! Each annotated type receives a [`LayeredMerge`] implementation that walks
//! its fields in declaration order. Nested fields recurse with an extended
//! prefix; leaf fields consult the flattened layer values through
//! [`merge_leaf`]. A value only replaces the current one when it is present,
//! accepted by the [`Validator`] and convertible to the field type, so a
//! later layer can add or replace values but never clear them.

use serde_json::Value;

use crate::{FlatValues, LeafValue};

/// Predicate deciding whether a raw layer value may override a field.
pub type Validator = fn(&str) -> bool;

/// Default validator: the value must contain a non-whitespace character.
///
/// # Examples
///
/// ```
/// use layerconf::is_not_blank;
/// assert!(is_not_blank("8080"));
/// assert!(!is_not_blank("   "));
/// assert!(!is_not_blank(""));
/// ```
#[must_use]
pub fn is_not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Types that can absorb one configuration layer.
pub trait LayeredMerge {
    /// Overlay `values` onto `self`, reading keys under `prefix`.
    ///
    /// `prefix` is either empty or ends with a `.`.
    fn merge_layer(&mut self, values: &FlatValues, prefix: &str, validator: Validator);

    /// Render the current state as a value tree keyed by tag keys.
    fn to_value(&self) -> Value;

    /// Consume `self`, merge one layer and return the result.
    #[must_use]
    fn merged(mut self, values: &FlatValues, prefix: &str, validator: Validator) -> Self
    where
        Self: Sized,
    {
        self.merge_layer(values, prefix, validator);
        self
    }
}

/// Build the flattened key for a leaf field.
///
/// # Examples
///
/// ```
/// assert_eq!(layerconf::leaf_key("serverConfig.", "port"), "serverConfig.port");
/// assert_eq!(layerconf::leaf_key("", "debug"), "debug");
/// ```
#[must_use]
pub fn leaf_key(prefix: &str, tag: &str) -> String {
    format!("{prefix}{tag}")
}

/// Build the prefix handed to a nested field's merge.
///
/// # Examples
///
/// ```
/// assert_eq!(layerconf::nested_prefix("app.", "db"), "app.db.");
/// ```
#[must_use]
pub fn nested_prefix(prefix: &str, tag: &str) -> String {
    format!("{prefix}{tag}.")
}

/// Overwrite `slot` with the value stored under `key` when it is acceptable.
///
/// Returns `true` when the slot changed hands to the layer value. Values that
/// pass the validator but do not convert to the field type are logged and
/// ignored.
pub fn merge_leaf<T: LeafValue>(
    slot: &mut T,
    values: &FlatValues,
    key: &str,
    validator: Validator,
) -> bool {
    let Some(raw) = values.get(key) else {
        return false;
    };
    if !validator(raw) {
        tracing::trace!(key, "layer value rejected by validator");
        return false;
    }
    match T::parse_raw(raw) {
        Some(parsed) => {
            *slot = parsed;
            true
        }
        None => {
            tracing::warn!(
                key,
                value = raw,
                "ignoring configuration value that does not convert to the field type"
            );
            false
        }
    }
}
