//! Hooks a generated aggregate exposes around the layered merge.

use crate::{LayeredMerge, LoadedConfig};

/// The aggregate configuration type of a generated loader module.
///
/// The generated `load` function seeds the aggregate with
/// [`Default::default`], applies the declared defaults, merges the remaining
/// layers through [`crate::Loader::load`] and finally runs the declared
/// auto-execute callables once.
pub trait ConfigRoot: LayeredMerge + Default + Sized {
    /// Assign the declared defaults before any other layer is merged.
    fn apply_defaults(&mut self);

    /// Run the declared auto-execute callables, in declaration order.
    fn auto_execute(config: &LoadedConfig<Self>);
}
