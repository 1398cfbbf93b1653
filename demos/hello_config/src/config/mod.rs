//! Annotated configuration types.
//!
//! `build.rs` scans the files in this directory; the generated loader lives
//! in [`crate::loader`].

pub mod db;
pub mod hooks;
pub mod server;
