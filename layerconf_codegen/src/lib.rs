//! Build-time generation of layered configuration loaders.
//!
//! Configuration types are plain structs marked with a comment:
//!
//! ```text
//! // @Configuration
//! pub struct ServerConfig {
//!     pub port: u16,
//! }
//!
//! // @DefaultConfig
//! // 8080 serverConfig.port
//! ```
//!
//! The generator scans a directory of such files, resolves which types nest
//! inside others, composes the outermost ones into an aggregate and writes a
//! module implementing [`layerconf::LayeredMerge`] for every type, plus a
//! `load` function that applies defaults, the configuration file, the remote
//! document and command-line arguments in that order.
//!
//! Call [`Generator`] from a build script and `include!` the artifact:
//!
//! ```no_run
//! // build.rs
//! # fn main() -> layerconf_codegen::GenerateResult<()> {
//! let out_dir = std::env::var("OUT_DIR").unwrap_or_default();
//! layerconf_codegen::Generator::new("src/config")
//!     .type_root("crate::config")
//!     .output(format!("{out_dir}/config_loader.rs"))
//!     .generate()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`layerconf::LayeredMerge`]: https://docs.rs/layerconf/latest/layerconf/trait.LayeredMerge.html

mod aggregate;
mod directives;
mod error;
mod extract;
mod generator;
mod graph;
mod model;
pub mod scan;
mod schema;
mod synth;
mod template;

pub use aggregate::{Aggregate, AggregateField, DEFAULT_AGGREGATE_NAME};
pub use directives::{AssignedValue, DefaultAssignment, Directives, resolve};
pub use error::{GenerateError, GenerateResult, Origin, Slot, TemplateError};
pub use extract::extract_types;
pub use generator::{
    DEFAULT_OUTPUT_FILE, DEFAULT_TYPE_ROOT, GenerationReport, Generator,
};
pub use graph::TypeGraph;
pub use model::{
    DefaultDecl, DefaultSource, FieldDescriptor, HookDecl, HookTarget, SourceModel,
    TypeDescriptor, default_alias,
};
pub use schema::parse_schema;
pub use synth::Fragments;
pub use template::{DEFAULT_TEMPLATE, Template};
