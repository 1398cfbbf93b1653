//! Sources feeding the non-default configuration layers.
//!
//! Each source yields a [`crate::FlatValues`] map. Sources never merge on
//! their own; the [`crate::Loader`] decides how their failures are handled.

mod args;
mod file;
mod remote;

pub use args::parse_args;
pub use file::read_file_layer;
pub use remote::{RemoteSource, backoff_delay};
