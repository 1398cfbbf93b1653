//! `LayeredMerge` implementations for configuration types.
//!
//! Each implementation visits the fields in declaration order: nested fields
//! recurse with an extended prefix, leaf fields go through
//! `layerconf::merge_leaf`.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

/// A field as seen by the merge routine.
pub(crate) struct MergeField {
    pub(crate) ident: Ident,
    pub(crate) tag: String,
    pub(crate) nested: bool,
}

/// Emit `impl ::layerconf::LayeredMerge for #target`.
pub(crate) fn merge_impl(target: &TokenStream, fields: &[MergeField]) -> TokenStream {
    if fields.is_empty() {
        return quote! {
            impl ::layerconf::LayeredMerge for #target {
                fn merge_layer(
                    &mut self,
                    _values: &::layerconf::FlatValues,
                    _prefix: &str,
                    _validator: ::layerconf::Validator,
                ) {
                }

                fn to_value(&self) -> ::layerconf::serde_json::Value {
                    ::layerconf::serde_json::Value::Object(::layerconf::serde_json::Map::new())
                }
            }
        };
    }

    let merges = fields.iter().map(merge_statement);
    let inserts = fields.iter().map(insert_statement);
    quote! {
        impl ::layerconf::LayeredMerge for #target {
            fn merge_layer(
                &mut self,
                values: &::layerconf::FlatValues,
                prefix: &str,
                validator: ::layerconf::Validator,
            ) {
                #( #merges )*
            }

            fn to_value(&self) -> ::layerconf::serde_json::Value {
                let mut map = ::layerconf::serde_json::Map::new();
                #( #inserts )*
                ::layerconf::serde_json::Value::Object(map)
            }
        }
    }
}

fn merge_statement(field: &MergeField) -> TokenStream {
    let MergeField { ident, tag, nested } = field;
    if *nested {
        quote! {
            ::layerconf::LayeredMerge::merge_layer(
                &mut self.#ident,
                values,
                &::layerconf::nested_prefix(prefix, #tag),
                validator,
            );
        }
    } else {
        quote! {
            ::layerconf::merge_leaf(
                &mut self.#ident,
                values,
                &::layerconf::leaf_key(prefix, #tag),
                validator,
            );
        }
    }
}

fn insert_statement(field: &MergeField) -> TokenStream {
    let MergeField { ident, tag, nested } = field;
    let rendered = if *nested {
        quote! { ::layerconf::LayeredMerge::to_value(&self.#ident) }
    } else {
        quote! { ::layerconf::LeafValue::render(&self.#ident) }
    };
    quote! {
        map.insert(::std::string::String::from(#tag), #rendered);
    }
}
