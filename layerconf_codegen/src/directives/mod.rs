//! Resolves default-value and auto-execute directives against the aggregate.
//!
//! Function-form defaults replace whole configuration values, so they are
//! ordered shallowest path first and always precede expression-form defaults.
//! Expression-form defaults keep their declaration order.

use crate::aggregate::Aggregate;
use crate::graph::TypeGraph;
use crate::model::{DefaultDecl, DefaultSource, HookDecl, HookTarget};
use crate::{GenerateError, GenerateResult, Origin};

/// Right-hand side of a default assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignedValue {
    /// Call a zero-argument function.
    Call {
        /// Module holding the function.
        module: Option<String>,
        /// Function name.
        name: String,
    },
    /// Emit an expression verbatim.
    Expression(String),
}

/// One statement of the defaults routine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultAssignment {
    /// Rust field names from the aggregate to the assigned value.
    pub chain: Vec<String>,
    /// Value to assign.
    pub value: AssignedValue,
    /// Directive that produced the assignment.
    pub origin: Origin,
}

/// Directives ready for synthesis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    /// Default assignments, in emission order.
    pub defaults: Vec<DefaultAssignment>,
    /// Auto-execute callables, in declaration order.
    pub hooks: Vec<HookDecl>,
}

impl Directives {
    /// Whether any callable receives the loaded configuration.
    #[must_use]
    pub fn hooks_use_config(&self) -> bool {
        self.hooks.iter().any(|hook| match &hook.target {
            HookTarget::Function { takes_config, .. } => *takes_config,
            HookTarget::Expression(_) => true,
        })
    }
}

/// Resolve `defaults` and `hooks` against `aggregate`.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidDirective`] when a default targets an
/// unknown type or key path.
pub fn resolve(
    defaults: &[DefaultDecl],
    hooks: &[HookDecl],
    aggregate: &Aggregate<'_>,
    graph: &TypeGraph<'_>,
) -> GenerateResult<Directives> {
    let mut whole_values = Vec::new();
    let mut expressions = Vec::new();
    for decl in defaults {
        match &decl.source {
            DefaultSource::Function {
                module,
                name,
                returns,
            } => {
                let paths = aggregate.paths_of_type(graph, returns);
                if paths.is_empty() {
                    return Err(GenerateError::directive(
                        decl.origin.clone(),
                        format!(
                            "default function `{name}` returns `{returns}`, which is not a configuration type"
                        ),
                    ));
                }
                whole_values.extend(paths.into_iter().map(|chain| DefaultAssignment {
                    chain,
                    value: AssignedValue::Call {
                        module: module.clone(),
                        name: name.clone(),
                    },
                    origin: decl.origin.clone(),
                }));
            }
            DefaultSource::Expression { expr, key } => {
                let Some(chain) = aggregate.resolve_key(graph, key) else {
                    return Err(GenerateError::directive(
                        decl.origin.clone(),
                        format!("`{key}` does not name a configuration value"),
                    ));
                };
                expressions.push(DefaultAssignment {
                    chain,
                    value: AssignedValue::Expression(expr.clone()),
                    origin: decl.origin.clone(),
                });
            }
        }
    }
    whole_values.sort_by_key(|assignment| assignment.chain.len());
    whole_values.extend(expressions);

    Ok(Directives {
        defaults: whole_values,
        hooks: hooks.to_vec(),
    })
}

#[cfg(test)]
mod tests;
