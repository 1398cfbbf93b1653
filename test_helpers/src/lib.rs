//! Test helpers shared across crates.
//!
//! This crate provides a `figment::Jail` wrapper for file-layer tests, a
//! temporary source tree for generator tests and helpers that normalise
//! generated token text before comparison.

pub mod jail;
pub mod source_tree;
pub mod text;

pub use source_tree::SourceTree;
