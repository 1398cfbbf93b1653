//! The synthesized aggregate type composed of every root.

use heck::ToSnakeCase;

use crate::graph::TypeGraph;
use crate::model::TypeDescriptor;
use crate::scan::is_ident;
use crate::{GenerateError, GenerateResult};

/// Aggregate name used when the generator is not told otherwise.
pub const DEFAULT_AGGREGATE_NAME: &str = "ApplicationConfig";

/// One root held by the aggregate.
#[derive(Clone, Debug)]
pub struct AggregateField<'a> {
    /// Key of the root in flattened values: its alias.
    pub alias: String,
    /// Rust field name: the alias in `snake_case`.
    pub field: String,
    /// The root's descriptor.
    pub descriptor: &'a TypeDescriptor,
}

/// The aggregate configuration type.
#[derive(Clone, Debug)]
pub struct Aggregate<'a> {
    /// Type name.
    pub name: String,
    /// One field per root, in discovery order.
    pub fields: Vec<AggregateField<'a>>,
}

impl<'a> Aggregate<'a> {
    /// Compose the aggregate from the graph's roots.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidDirective`] when an alias cannot be
    /// turned into a Rust field name.
    pub fn from_graph(name: &str, graph: &TypeGraph<'a>) -> GenerateResult<Self> {
        let fields = graph
            .roots()
            .into_iter()
            .map(|descriptor| {
                let field = descriptor.alias.to_snake_case();
                if is_ident(&field) {
                    Ok(AggregateField {
                        alias: descriptor.alias.clone(),
                        field,
                        descriptor,
                    })
                } else {
                    Err(GenerateError::directive(
                        descriptor.origin.clone(),
                        format!(
                            "alias `{}` of `{}` does not yield a usable field name",
                            descriptor.alias, descriptor.name
                        ),
                    ))
                }
            })
            .collect::<GenerateResult<Vec<_>>>()?;
        Ok(Self {
            name: name.to_owned(),
            fields,
        })
    }

    /// Every field chain, starting at the aggregate, whose value has type
    /// `type_name`. Chains are listed depth-first in declaration order.
    #[must_use]
    pub fn paths_of_type(&self, graph: &TypeGraph<'a>, type_name: &str) -> Vec<Vec<String>> {
        let mut found = Vec::new();
        for root in &self.fields {
            let mut chain = vec![root.field.clone()];
            collect_paths(graph, root.descriptor, type_name, &mut chain, &mut found);
        }
        found
    }

    /// Resolve a flattened key path such as `serverConfig.port` into the
    /// chain of Rust field names leading to it.
    #[must_use]
    pub fn resolve_key(&self, graph: &TypeGraph<'a>, key: &str) -> Option<Vec<String>> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let root = self.fields.iter().find(|field| field.alias == first)?;
        let mut chain = vec![root.field.clone()];
        let mut current = Some(root.descriptor);
        for segment in segments {
            let descriptor = current?;
            let field = descriptor
                .fields
                .iter()
                .find(|field| field.tag_key == segment)?;
            chain.push(field.name.clone());
            current = if field.is_nested {
                graph.get(&field.ty)
            } else {
                None
            };
        }
        Some(chain)
    }
}

fn collect_paths(
    graph: &TypeGraph<'_>,
    descriptor: &TypeDescriptor,
    type_name: &str,
    chain: &mut Vec<String>,
    found: &mut Vec<Vec<String>>,
) {
    if descriptor.name == type_name {
        found.push(chain.clone());
    }
    for field in descriptor.nested_fields() {
        if let Some(child) = graph.get(&field.ty) {
            chain.push(field.name.clone());
            collect_paths(graph, child, type_name, chain, found);
            chain.pop();
        }
    }
}
