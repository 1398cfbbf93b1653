//! Turns scanned declarations into type descriptors.
//!
//! Extraction runs in two passes over the whole batch: the first collects
//! every configuration type name, the second parses each body and marks a
//! field as nested when its declared type is one of those names.

mod serde_attrs;

use std::collections::{BTreeMap, BTreeSet};

use syn::Attribute;
use syn::parse::Parser;

use crate::model::{FieldDescriptor, TypeDescriptor, default_alias};
use crate::scan::{
    ScannedFile, ScannedType, SourceLine, is_attribute, is_ident, nesting_delta, split_comment,
    strip_visibility,
};
use crate::{GenerateError, GenerateResult, Origin};

use serde_attrs::{RenameRule, field_rename, rename_rule};

/// Build descriptors for every scanned type, in discovery order.
///
/// # Errors
///
/// Returns [`GenerateError::Structural`] when a body line is neither a
/// comment, an attribute nor a `name: Type` field, or when two fields of one
/// type resolve to the same key.
pub fn extract_types(files: &[ScannedFile]) -> GenerateResult<Vec<TypeDescriptor>> {
    let names: BTreeSet<&str> = files
        .iter()
        .flat_map(|file| file.types.iter().map(|ty| ty.name.as_str()))
        .collect();

    let mut descriptors = Vec::new();
    for file in files {
        for scanned in &file.types {
            descriptors.push(describe(scanned, file.module.clone(), &names)?);
        }
    }
    Ok(descriptors)
}

fn describe(
    scanned: &ScannedType,
    module: Option<String>,
    names: &BTreeSet<&str>,
) -> GenerateResult<TypeDescriptor> {
    let origin = &scanned.origin;
    let container_attrs = parse_attributes(&scanned.attributes.join(" "), origin)?;
    let rule = rename_rule(&container_attrs)
        .map_err(|err| GenerateError::structural(origin.clone(), err.to_string()))?;

    let mut fields: Vec<FieldDescriptor> = Vec::new();
    let mut keys: BTreeMap<String, String> = BTreeMap::new();
    let mut pending_attrs = String::new();
    let mut attr_depth = 0_i64;
    for line in &scanned.body {
        let line_origin = Origin::new(origin.file.as_str(), line.number);
        if attr_depth > 0 {
            pending_attrs.push(' ');
            pending_attrs.push_str(split_comment(&line.text).0.trim_end());
            attr_depth += nesting_delta(&line.text, '[', ']');
            continue;
        }
        if line.text.starts_with("//") {
            continue;
        }
        if is_attribute(&line.text) {
            pending_attrs.push(' ');
            pending_attrs.push_str(split_comment(&line.text).0.trim_end());
            attr_depth = nesting_delta(&line.text, '[', ']');
            continue;
        }
        let attrs = parse_attributes(&pending_attrs, &line_origin)?;
        pending_attrs.clear();
        let field = parse_field(line, &attrs, rule, names, &line_origin)?;
        if let Some(first) = keys.insert(field.tag_key.clone(), field.name.clone()) {
            return Err(GenerateError::structural(
                line_origin,
                format!(
                    "fields `{first}` and `{}` of `{}` share the key `{}`",
                    field.name, scanned.name, field.tag_key
                ),
            ));
        }
        fields.push(field);
    }
    if attr_depth > 0 || !pending_attrs.is_empty() {
        return Err(GenerateError::structural(
            origin.clone(),
            format!("trailing attribute without a field in `{}`", scanned.name),
        ));
    }

    Ok(TypeDescriptor {
        name: scanned.name.clone(),
        alias: scanned
            .alias
            .clone()
            .unwrap_or_else(|| default_alias(&scanned.name)),
        fields,
        module,
        origin: origin.clone(),
    })
}

fn parse_attributes(text: &str, origin: &Origin) -> GenerateResult<Vec<Attribute>> {
    Attribute::parse_outer.parse_str(text).map_err(|err| {
        GenerateError::structural(origin.clone(), format!("invalid attribute: {err}"))
    })
}

fn parse_field(
    line: &SourceLine,
    attrs: &[Attribute],
    rule: Option<RenameRule>,
    names: &BTreeSet<&str>,
    origin: &Origin,
) -> GenerateResult<FieldDescriptor> {
    let (code, comment) = split_comment(&line.text);
    let visible = strip_visibility(code).trim();
    let declaration = visible.strip_suffix(',').unwrap_or(visible).trim_end();
    let Some((raw_name, raw_ty)) = declaration.split_once(':') else {
        return Err(GenerateError::structural(
            origin.clone(),
            format!("expected a `name: Type` field, found `{}`", line.text),
        ));
    };
    let name = raw_name.trim();
    let ty = raw_ty.trim();
    if !is_ident(name) {
        return Err(GenerateError::structural(
            origin.clone(),
            format!("`{name}` is not a field name"),
        ));
    }
    if syn::parse_str::<syn::Type>(ty).is_err() {
        return Err(GenerateError::structural(
            origin.clone(),
            format!("field `{name}` has an unparseable type `{ty}`"),
        ));
    }

    let tag_key = match comment.map_or(Ok(None), tag_annotation) {
        Ok(Some(tag)) => tag,
        Ok(None) => field_rename(attrs)
            .map_err(|err| GenerateError::structural(origin.clone(), err.to_string()))?
            .unwrap_or_else(|| {
                let plain = name.strip_prefix("r#").unwrap_or(name);
                rule.map_or_else(|| plain.to_owned(), |active| active.apply(plain))
            }),
        Err(message) => return Err(GenerateError::structural(origin.clone(), message)),
    };

    Ok(FieldDescriptor {
        name: name.to_owned(),
        ty: ty.to_owned(),
        tag_key,
        is_nested: names.contains(ty),
    })
}

/// Read a trailing `key = "tag"` annotation. Other comments are ignored.
fn tag_annotation(comment: &str) -> Result<Option<String>, String> {
    let Some(value) = comment
        .trim()
        .strip_prefix("key")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('='))
    else {
        return Ok(None);
    };
    let literal = syn::parse_str::<syn::LitStr>(value.trim())
        .map_err(|_| format!("key annotation `{}` must be a quoted string", value.trim()))?;
    let tag = literal.value();
    if tag.trim().is_empty() {
        return Err(String::from("key annotation must not be empty"));
    }
    Ok(Some(tag))
}

#[cfg(test)]
mod tests;
