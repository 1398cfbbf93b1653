//! The aggregate type and its `ConfigRoot` routines.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::paths::{ItemPaths, ident};
use crate::aggregate::Aggregate;
use crate::directives::{AssignedValue, DefaultAssignment, Directives};
use crate::model::{HookDecl, HookTarget};
use crate::{GenerateError, GenerateResult, Origin};

/// Emit the aggregate struct and the `RootConfig` alias.
pub(crate) fn aggregate_items(
    aggregate: &Aggregate<'_>,
    paths: &ItemPaths,
) -> GenerateResult<TokenStream> {
    let name = aggregate_ident(&aggregate.name)?;
    let mut fields = Vec::with_capacity(aggregate.fields.len());
    for field in &aggregate.fields {
        let descriptor = field.descriptor;
        let field_ident = ident(&field.field, &descriptor.origin)?;
        let ty = paths.item(descriptor.module.as_deref(), &descriptor.name, &descriptor.origin)?;
        let doc = format!("Settings read under the `{}` key.", field.alias);
        fields.push(quote! {
            #[doc = #doc]
            pub #field_ident: #ty,
        });
    }
    Ok(quote! {
        /// Every root configuration type, composed into one value.
        #[derive(Debug, Clone, Default)]
        pub struct #name {
            #( #fields )*
        }

        /// The aggregate configuration type loaded by [`load`].
        pub type RootConfig = #name;
    })
}

/// Parse the configured aggregate name.
pub(crate) fn aggregate_ident(name: &str) -> GenerateResult<Ident> {
    syn::parse_str::<Ident>(name).map_err(|_| GenerateError::InvalidOption {
        option: "aggregate_name",
        message: format!("`{name}` is not a valid type name"),
    })
}

/// Emit `fn apply_defaults(&mut self)`.
pub(crate) fn defaults_fn(
    directives: &Directives,
    paths: &ItemPaths,
) -> GenerateResult<TokenStream> {
    let assignments = directives
        .defaults
        .iter()
        .map(|assignment| assignment_statement(assignment, paths))
        .collect::<GenerateResult<Vec<_>>>()?;
    Ok(quote! {
        fn apply_defaults(&mut self) {
            #( #assignments )*
        }
    })
}

fn assignment_statement(
    assignment: &DefaultAssignment,
    paths: &ItemPaths,
) -> GenerateResult<TokenStream> {
    let chain = assignment
        .chain
        .iter()
        .map(|segment| ident(segment, &assignment.origin))
        .collect::<GenerateResult<Vec<_>>>()?;
    let value = match &assignment.value {
        AssignedValue::Call { module, name } => {
            let function = paths.item(module.as_deref(), name, &assignment.origin)?;
            quote! { #function() }
        }
        AssignedValue::Expression(expr) => parse_expr(expr, &assignment.origin)?,
    };
    Ok(quote! { self #( . #chain )* = #value; })
}

/// Emit `fn auto_execute(config: &LoadedConfig<Self>)`.
pub(crate) fn auto_execute_fn(
    directives: &Directives,
    paths: &ItemPaths,
) -> GenerateResult<TokenStream> {
    let calls = directives
        .hooks
        .iter()
        .map(|hook| hook_statement(hook, paths))
        .collect::<GenerateResult<Vec<_>>>()?;
    let param = if directives.hooks_use_config() {
        quote! { config }
    } else {
        quote! { _config }
    };
    Ok(quote! {
        fn auto_execute(#param: &::layerconf::LoadedConfig<Self>) {
            #( #calls )*
        }
    })
}

fn hook_statement(hook: &HookDecl, paths: &ItemPaths) -> GenerateResult<TokenStream> {
    let origin = &hook.origin;
    Ok(match &hook.target {
        HookTarget::Function {
            module,
            name,
            takes_config,
        } => {
            let function = paths.item(module.as_deref(), name, origin)?;
            if *takes_config {
                quote! { #function(config); }
            } else {
                quote! { #function(); }
            }
        }
        HookTarget::Expression(expr) => {
            let callable = parse_expr(expr, origin)?;
            quote! { (#callable)(config); }
        }
    })
}

fn parse_expr(expr: &str, origin: &Origin) -> GenerateResult<TokenStream> {
    syn::parse_str::<syn::Expr>(expr)
        .map(|parsed| quote! { #parsed })
        .map_err(|err| GenerateError::directive(origin.clone(), format!("`{expr}`: {err}")))
}
