//! TOML sidecar describing configuration types without source markers.
//!
//! The schema feeds the same graph and synthesis stages as scanned sources:
//!
//! ```toml
//! [[types]]
//! name = "ServerConfig"
//! module = "server"
//! fields = [
//!     { name = "port", type = "u16" },
//!     { name = "tls", type = "TlsConfig", key = "transport" },
//! ]
//!
//! [[defaults]]
//! expr = "8080"
//! key = "serverConfig.port"
//!
//! [[hooks]]
//! function = "announce"
//! module = "hooks"
//! takes_config = true
//! ```

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8Path;
use serde::Deserialize;
use toml::Spanned;

use crate::model::{
    DefaultDecl, DefaultSource, FieldDescriptor, HookDecl, HookTarget, SourceModel,
    TypeDescriptor, default_alias,
};
use crate::scan::is_ident;
use crate::{GenerateError, GenerateResult, Origin};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    types: Vec<Spanned<SchemaType>>,
    #[serde(default)]
    defaults: Vec<Spanned<SchemaDefault>>,
    #[serde(default)]
    hooks: Vec<Spanned<SchemaHook>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaType {
    name: String,
    alias: Option<String>,
    module: Option<String>,
    #[serde(default)]
    fields: Vec<SchemaField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaField {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDefault {
    function: Option<String>,
    returns: Option<String>,
    module: Option<String>,
    expr: Option<String>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaHook {
    function: Option<String>,
    module: Option<String>,
    #[serde(default)]
    takes_config: bool,
    expr: Option<String>,
}

/// Parse a sidecar schema into a source model.
///
/// `path` only labels origins and errors; `text` is the schema content.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidSchema`] when the TOML does not match the
/// schema layout or names an invalid identifier, type or expression.
pub fn parse_schema(path: &Utf8Path, text: &str) -> GenerateResult<SourceModel> {
    let file: SchemaFile = toml::from_str(text).map_err(|err| GenerateError::InvalidSchema {
        path: path.to_path_buf(),
        message: err.span().map_or_else(
            || err.message().to_owned(),
            |span| format!("line {}: {}", line_at(text, span.start), err.message()),
        ),
    })?;
    let reader = SchemaReader { path, text };

    let names: BTreeSet<&str> = file
        .types
        .iter()
        .map(|entry| entry.get_ref().name.as_str())
        .collect();
    let types = file
        .types
        .iter()
        .map(|entry| reader.descriptor(entry, &names))
        .collect::<GenerateResult<Vec<_>>>()?;
    let defaults = file
        .defaults
        .iter()
        .map(|entry| reader.default_decl(entry))
        .collect::<GenerateResult<Vec<_>>>()?;
    let hooks = file
        .hooks
        .iter()
        .map(|entry| reader.hook_decl(entry))
        .collect::<GenerateResult<Vec<_>>>()?;
    Ok(SourceModel {
        types,
        defaults,
        hooks,
    })
}

/// One-based line holding byte `offset` of `text`.
fn line_at(text: &str, offset: usize) -> usize {
    text.bytes().take(offset).filter(|byte| *byte == b'\n').count() + 1
}

struct SchemaReader<'a> {
    path: &'a Utf8Path,
    text: &'a str,
}

impl SchemaReader<'_> {
    fn origin<T>(&self, entry: &Spanned<T>) -> Origin {
        Origin::new(self.path.as_str(), line_at(self.text, entry.span().start))
    }

    fn invalid(&self, origin: &Origin, message: impl std::fmt::Display) -> GenerateError {
        GenerateError::InvalidSchema {
            path: self.path.to_path_buf(),
            message: format!("line {}: {message}", origin.line),
        }
    }

    fn require_ident(&self, origin: &Origin, what: &str, name: &str) -> GenerateResult<()> {
        if is_ident(name) {
            Ok(())
        } else {
            Err(self.invalid(origin, format!("{what} `{name}` is not an identifier")))
        }
    }

    fn require_parse<T: syn::parse::Parse>(
        &self,
        origin: &Origin,
        what: &str,
        text: &str,
    ) -> GenerateResult<()> {
        syn::parse_str::<T>(text)
            .map(drop)
            .map_err(|err| self.invalid(origin, format!("{what} `{text}`: {err}")))
    }

    fn module(&self, origin: &Origin, module: Option<&str>) -> GenerateResult<Option<String>> {
        if let Some(name) = module {
            self.require_ident(origin, "module", name)?;
        }
        Ok(module.map(str::to_owned))
    }

    fn descriptor(
        &self,
        entry: &Spanned<SchemaType>,
        names: &BTreeSet<&str>,
    ) -> GenerateResult<TypeDescriptor> {
        let origin = self.origin(entry);
        let declared = entry.get_ref();
        self.require_ident(&origin, "type", &declared.name)?;
        let mut seen = BTreeSet::new();
        let mut keys = BTreeMap::new();
        let mut fields = Vec::with_capacity(declared.fields.len());
        for field in &declared.fields {
            self.require_ident(&origin, "field", &field.name)?;
            self.require_parse::<syn::Type>(&origin, "field type", &field.ty)?;
            if !seen.insert(field.name.as_str()) {
                return Err(self.invalid(
                    &origin,
                    format!("`{}` declares field `{}` twice", declared.name, field.name),
                ));
            }
            let tag_key = field.key.clone().unwrap_or_else(|| field.name.clone());
            if let Some(first) = keys.insert(tag_key.clone(), field.name.as_str()) {
                return Err(self.invalid(
                    &origin,
                    format!(
                        "fields `{first}` and `{}` of `{}` share the key `{tag_key}`",
                        field.name, declared.name
                    ),
                ));
            }
            fields.push(FieldDescriptor {
                name: field.name.clone(),
                ty: field.ty.clone(),
                tag_key,
                is_nested: names.contains(field.ty.trim()),
            });
        }
        Ok(TypeDescriptor {
            name: declared.name.clone(),
            alias: declared
                .alias
                .clone()
                .unwrap_or_else(|| default_alias(&declared.name)),
            fields,
            module: self.module(&origin, declared.module.as_deref())?,
            origin,
        })
    }

    fn default_decl(&self, entry: &Spanned<SchemaDefault>) -> GenerateResult<DefaultDecl> {
        let origin = self.origin(entry);
        let declared = entry.get_ref();
        let source = match declared {
            SchemaDefault {
                function: Some(name),
                returns: Some(returns),
                module,
                expr: None,
                key: None,
            } => {
                self.require_ident(&origin, "function", name)?;
                self.require_parse::<syn::Type>(&origin, "return type", returns)?;
                DefaultSource::Function {
                    module: self.module(&origin, module.as_deref())?,
                    name: name.clone(),
                    returns: returns.clone(),
                }
            }
            SchemaDefault {
                function: None,
                returns: None,
                module: None,
                expr: Some(expr),
                key: Some(key),
            } => {
                self.require_parse::<syn::Expr>(&origin, "expression", expr)?;
                if key.split('.').any(str::is_empty) {
                    return Err(self.invalid(&origin, format!("`{key}` is not a key path")));
                }
                DefaultSource::Expression {
                    expr: expr.clone(),
                    key: key.clone(),
                }
            }
            _ => {
                return Err(self.invalid(
                    &origin,
                    "a default needs either `function` and `returns`, or `expr` and `key`",
                ));
            }
        };
        Ok(DefaultDecl { source, origin })
    }

    fn hook_decl(&self, entry: &Spanned<SchemaHook>) -> GenerateResult<HookDecl> {
        let origin = self.origin(entry);
        let declared = entry.get_ref();
        let target = match declared {
            SchemaHook {
                function: Some(name),
                module,
                takes_config,
                expr: None,
            } => {
                self.require_ident(&origin, "function", name)?;
                HookTarget::Function {
                    module: self.module(&origin, module.as_deref())?,
                    name: name.clone(),
                    takes_config: *takes_config,
                }
            }
            SchemaHook {
                function: None,
                module: None,
                takes_config: false,
                expr: Some(expr),
            } => {
                self.require_parse::<syn::Expr>(&origin, "expression", expr)?;
                HookTarget::Expression(expr.clone())
            }
            _ => {
                return Err(self.invalid(&origin, "a hook needs either `function` or `expr`"));
            }
        };
        Ok(HookDecl { target, origin })
    }
}
