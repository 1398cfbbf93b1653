//! Error types produced while loading configuration layers.

mod constructors;
mod types;

pub use types::{LoadError, LoadResult};

#[cfg(test)]
mod tests;
