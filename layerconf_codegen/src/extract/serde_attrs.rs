//! Serde attributes that change the key a field is read from.
//!
//! Annotated structs usually derive `Deserialize` as well, so their file
//! layer keys follow `#[serde(rename = "...")]` and
//! `#[serde(rename_all = "...")]`. The extractor honours the same attributes
//! so flattened keys agree with what serde would read.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

/// Container-level `rename_all` rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_lit(value: &LitStr) -> syn::Result<Self> {
        let rule = match value.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            other => {
                return Err(syn::Error::new(
                    value.span(),
                    format!("unsupported serde rename_all rule '{other}'"),
                ));
            }
        };
        Ok(rule)
    }

    pub(crate) fn apply(self, field: &str) -> String {
        match self {
            Self::Lower => field.to_ascii_lowercase(),
            Self::Upper => field.to_ascii_uppercase(),
            Self::Pascal => field.to_upper_camel_case(),
            Self::Camel => field.to_lower_camel_case(),
            Self::Snake => field.to_snake_case(),
            Self::ScreamingSnake => field.to_shouty_snake_case(),
            Self::Kebab => field.to_kebab_case(),
            Self::ScreamingKebab => field.to_shouty_kebab_case(),
        }
    }
}

/// Read `rename_all` (or `rename_all(deserialize = ...)`) from struct
/// attributes.
pub(crate) fn rename_rule(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename_all") {
                return skip_meta(&meta);
            }
            if let Some(value) = string_or_deserialize(&meta)? {
                out = Some(RenameRule::from_lit(&value)?);
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Read `rename` (or `rename(deserialize = ...)`) from field attributes.
pub(crate) fn field_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename") {
                return skip_meta(&meta);
            }
            if let Some(value) = string_or_deserialize(&meta)? {
                out = Some(value.value());
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Accept `name = "..."` and `name(deserialize = "...")`; the layers are
/// read, so the deserialize spelling is the one that matters.
fn string_or_deserialize(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse::<LitStr>()?));
    }
    let mut found = None;
    if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| {
            if nested.path.is_ident("deserialize") {
                found = Some(nested.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                skip_meta(&nested)
            }
        })?;
    }
    Ok(found)
}

fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }
    Ok(())
}
