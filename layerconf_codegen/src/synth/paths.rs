//! Fully qualified paths to user items.
//!
//! Generated code never imports anything; every user type and function is
//! referenced as `<type_root>::<module>::<item>`.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::{GenerateError, GenerateResult, Origin};

/// Parse `name` as an identifier, reporting failures at `origin`.
pub(crate) fn ident(name: &str, origin: &Origin) -> GenerateResult<Ident> {
    syn::parse_str::<Ident>(name).map_err(|_| {
        GenerateError::structural(origin.clone(), format!("`{name}` is not a valid identifier"))
    })
}

/// Prefix under which user modules are reachable from the generated module.
#[derive(Clone)]
pub(crate) struct ItemPaths {
    root: Option<syn::Path>,
}

impl ItemPaths {
    /// Parse a prefix such as `super` or `crate::config`. A blank prefix
    /// means the user modules are in scope already.
    pub(crate) fn new(type_root: &str) -> GenerateResult<Self> {
        let trimmed = type_root.trim();
        if trimmed.is_empty() {
            return Ok(Self { root: None });
        }
        syn::parse_str::<syn::Path>(trimmed)
            .map(|path| Self { root: Some(path) })
            .map_err(|err| GenerateError::InvalidOption {
                option: "type_root",
                message: format!("`{trimmed}` is not a path: {err}"),
            })
    }

    /// Path to `name` inside `module`.
    pub(crate) fn item(
        &self,
        module: Option<&str>,
        name: &str,
        origin: &Origin,
    ) -> GenerateResult<TokenStream> {
        let mut segments = Vec::with_capacity(2);
        if let Some(module_name) = module {
            segments.push(ident(module_name, origin)?);
        }
        segments.push(ident(name, origin)?);
        Ok(match &self.root {
            Some(root) => quote! { #root #(:: #segments)* },
            None => quote! { #(#segments)::* },
        })
    }
}
