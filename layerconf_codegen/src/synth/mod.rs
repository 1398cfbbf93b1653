//! Builds the code fragments spliced into the loader skeleton.
//!
//! Fragments are token streams built with `quote!`; one top-level item per
//! line once rendered, so artifacts diff sensibly between runs.

mod merge_impl;
mod paths;
mod routines;

use proc_macro2::TokenStream;

use crate::aggregate::Aggregate;
use crate::directives::Directives;
use crate::graph::TypeGraph;
use crate::{GenerateResult, Slot};

pub(crate) use paths::ItemPaths;
pub(crate) use routines::aggregate_ident;

use merge_impl::{MergeField, merge_impl};
use paths::ident;

/// Rendered code for each skeleton slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragments {
    /// Aggregate type, `RootConfig` alias and `LayeredMerge` impls.
    pub merge: String,
    /// The `apply_defaults` method.
    pub defaults: String,
    /// The `auto_execute` method.
    pub auto_execute: String,
}

impl Fragments {
    /// Fragment for `slot`.
    #[must_use]
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Merge => &self.merge,
            Slot::Defaults => &self.defaults,
            Slot::AutoExecute => &self.auto_execute,
        }
    }
}

/// Synthesize every fragment.
///
/// # Errors
///
/// Returns an error when a name cannot be emitted as an identifier or a
/// directive expression does not parse.
pub(crate) fn synthesize(
    graph: &TypeGraph<'_>,
    aggregate: &Aggregate<'_>,
    directives: &Directives,
    paths: &ItemPaths,
) -> GenerateResult<Fragments> {
    let mut items = vec![routines::aggregate_items(aggregate, paths)?];
    items.push(aggregate_merge(aggregate)?);
    for descriptor in graph.types() {
        let target = paths.item(
            descriptor.module.as_deref(),
            &descriptor.name,
            &descriptor.origin,
        )?;
        let fields = descriptor
            .fields
            .iter()
            .map(|field| {
                Ok(MergeField {
                    ident: ident(&field.name, &descriptor.origin)?,
                    tag: field.tag_key.clone(),
                    nested: field.is_nested,
                })
            })
            .collect::<GenerateResult<Vec<_>>>()?;
        items.push(merge_impl(&target, &fields));
    }

    Ok(Fragments {
        merge: render_items(&items),
        defaults: routines::defaults_fn(directives, paths)?.to_string(),
        auto_execute: routines::auto_execute_fn(directives, paths)?.to_string(),
    })
}

fn aggregate_merge(aggregate: &Aggregate<'_>) -> GenerateResult<TokenStream> {
    let name = aggregate_ident(&aggregate.name)?;
    let fields = aggregate
        .fields
        .iter()
        .map(|field| {
            Ok(MergeField {
                ident: ident(&field.field, &field.descriptor.origin)?,
                tag: field.alias.clone(),
                nested: true,
            })
        })
        .collect::<GenerateResult<Vec<_>>>()?;
    Ok(merge_impl(&quote::quote! { #name }, &fields))
}

fn render_items(items: &[TokenStream]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}
