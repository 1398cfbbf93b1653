//! Descriptors and raw directives shared by every generation stage.
//!
//! Both the annotation scanner and the sidecar schema reader produce a
//! [`SourceModel`]; the graph resolver and synthesizer only ever see this
//! model, never the text it came from.

use crate::Origin;

/// One field of a configuration type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: String,
    /// Declared type, as written.
    pub ty: String,
    /// Key used for this field in flattened layer values.
    pub tag_key: String,
    /// Whether `ty` names another configuration type.
    pub is_nested: bool,
}

/// A configuration type discovered in the sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Key under which a root type appears in the aggregate.
    pub alias: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Module path segment holding the declaration, if not the directory
    /// module itself.
    pub module: Option<String>,
    /// Where the declaration was found.
    pub origin: Origin,
}

impl TypeDescriptor {
    /// Nested fields, in declaration order.
    #[must_use]
    pub fn nested_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.is_nested)
    }
}

/// Alias used when a declaration does not name one: the type name with its
/// first letter lower-cased.
///
/// # Examples
///
/// ```
/// use layerconf_codegen::default_alias;
///
/// assert_eq!(default_alias("DbConfig"), "dbConfig");
/// assert_eq!(default_alias("HTTPConfig"), "hTTPConfig");
/// ```
#[must_use]
pub fn default_alias(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Where a default-value directive gets its value from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultSource {
    /// A function returning a whole configuration type.
    Function {
        /// Module holding the function, if not the directory module.
        module: Option<String>,
        /// Function name.
        name: String,
        /// Declared return type.
        returns: String,
    },
    /// An initializer expression assigned to one flattened key path.
    Expression {
        /// Rust expression, emitted verbatim.
        expr: String,
        /// Dot-separated key path.
        key: String,
    },
}

/// A default-value directive and where it was declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultDecl {
    /// Value source.
    pub source: DefaultSource,
    /// Declaration site.
    pub origin: Origin,
}

/// What an auto-execute directive calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookTarget {
    /// A function declared next to the marker.
    Function {
        /// Module holding the function, if not the directory module.
        module: Option<String>,
        /// Function name.
        name: String,
        /// Whether it accepts the loaded configuration.
        takes_config: bool,
    },
    /// A callable expression invoked with the loaded configuration.
    Expression(String),
}

/// An auto-execute directive and where it was declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookDecl {
    /// What to call.
    pub target: HookTarget,
    /// Declaration site.
    pub origin: Origin,
}

/// Everything the pipeline needs from the sources, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceModel {
    /// Configuration types.
    pub types: Vec<TypeDescriptor>,
    /// Default-value directives.
    pub defaults: Vec<DefaultDecl>,
    /// Auto-execute directives.
    pub hooks: Vec<HookDecl>,
}
