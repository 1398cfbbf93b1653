//! Runtime support for configuration loaders generated by `layerconf_codegen`.
//!
//! A generated loader module owns an aggregate configuration type and a
//! [`LayeredMerge`] implementation for every annotated type it composes. This
//! crate supplies everything those implementations call into: flattened value
//! maps, leaf conversions, the file, remote and command-line sources, and the
//! [`Loader`] that applies the layers in their fixed order.
//!
//! ```rust
//! use layerconf::{FlatValues, LayeredMerge, Loader, Validator, merge_leaf};
//! use layerconf::serde_json::{Map, Value};
//!
//! #[derive(Debug, Default)]
//! struct Server {
//!     port: u16,
//! }
//!
//! impl LayeredMerge for Server {
//!     fn merge_layer(&mut self, values: &FlatValues, prefix: &str, validator: Validator) {
//!         merge_leaf(&mut self.port, values, &layerconf::leaf_key(prefix, "port"), validator);
//!     }
//!
//!     fn to_value(&self) -> Value {
//!         let mut map = Map::new();
//!         map.insert(String::from("port"), layerconf::LeafValue::render(&self.port));
//!         Value::Object(map)
//!     }
//! }
//!
//! let loader = Loader::builder().args(["-port=9090"]).build()?;
//! let loaded = loader.load(Server { port: 8080 })?;
//! assert_eq!(loaded.settings().port, 9090);
//! assert_eq!(loaded.get_string("port"), Some("9090"));
//! # Ok::<(), std::sync::Arc<layerconf::LoadError>>(())
//! ```

pub mod decode;
mod error;
mod flat;
mod layer;
mod leaf;
pub mod loader;
mod merge;
mod result_ext;
mod root;
pub mod sources;

pub use decode::{ConfigFormat, StructuredDecoder};
pub use error::{LoadError, LoadResult};
pub use flat::{FlatValues, lookup_path};
pub use layer::SourceLayer;
pub use leaf::LeafValue;
pub use loader::{LayerIssue, LoadReport, LoadedConfig, Loader, LoaderBuilder};
pub use merge::{LayeredMerge, Validator, is_not_blank, leaf_key, merge_leaf, nested_prefix};
pub use result_ext::LoadResultExt;
pub use root::ConfigRoot;

/// Re-export of `serde_json` so generated modules need no direct dependency.
pub use serde_json;
