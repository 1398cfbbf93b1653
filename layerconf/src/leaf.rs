//! Conversions between raw layer strings and typed leaf fields.

use std::path::PathBuf;

use serde_json::Value;

/// A field type that can receive a raw layer value.
///
/// Generated merge code calls [`LeafValue::parse_raw`] for every validated
/// raw value and [`LeafValue::render`] when building the lookup tree.
/// Implementations exist for strings, numbers, booleans, characters, paths
/// and `Option` of any leaf.
pub trait LeafValue: Sized {
    /// Convert a raw value, returning `None` when it does not fit the type.
    fn parse_raw(raw: &str) -> Option<Self>;

    /// Render the current value for the lookup tree.
    fn render(&self) -> Value;
}

impl LeafValue for String {
    fn parse_raw(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }

    fn render(&self) -> Value {
        Value::String(self.clone())
    }
}

impl LeafValue for char {
    fn parse_raw(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    fn render(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl LeafValue for PathBuf {
    fn parse_raw(raw: &str) -> Option<Self> {
        Some(Self::from(raw))
    }

    fn render(&self) -> Value {
        Value::String(self.to_string_lossy().into_owned())
    }
}

impl<T: LeafValue> LeafValue for Option<T> {
    fn parse_raw(raw: &str) -> Option<Self> {
        T::parse_raw(raw).map(Some)
    }

    fn render(&self) -> Value {
        self.as_ref().map_or(Value::Null, LeafValue::render)
    }
}

macro_rules! scalar_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LeafValue for $ty {
                fn parse_raw(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }

                fn render(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

scalar_leaf!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64
);

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serde_json::json;

    use super::LeafValue;

    #[rstest]
    #[case(" 8080 ", Some(8080))]
    #[case("80a", None)]
    #[case("70000", None)]
    fn ports_parse_with_range_checks(
        #[case] raw: &str,
        #[case] expected: Option<u16>,
    ) -> Result<()> {
        ensure!(u16::parse_raw(raw) == expected, "unexpected parse for '{raw}'");
        Ok(())
    }

    #[rstest]
    fn strings_are_kept_verbatim() -> Result<()> {
        ensure!(
            String::parse_raw("  padded ").as_deref() == Some("  padded "),
            "strings must not be trimmed"
        );
        Ok(())
    }

    #[rstest]
    fn optional_leaves_render_null_when_unset() -> Result<()> {
        let unset: Option<u32> = None;
        ensure!(unset.render() == json!(null), "None should render as null");
        ensure!(
            Option::<u32>::parse_raw("7") == Some(Some(7)),
            "Some should wrap parsed values"
        );
        Ok(())
    }

    #[rstest]
    fn booleans_render_as_json_booleans() -> Result<()> {
        ensure!(true.render() == json!(true), "bool should render natively");
        ensure!(bool::parse_raw("yes").is_none(), "only true/false parse");
        Ok(())
    }
}
