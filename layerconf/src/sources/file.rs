//! File layer: read a configured path and decode it.

use camino::Utf8Path;

use crate::{FlatValues, LoadError, LoadResult, StructuredDecoder};

/// Read `path` and flatten its decoded contents.
///
/// # Errors
///
/// Returns [`LoadError::File`] when the file cannot be read and propagates
/// decoder failures.
pub fn read_file_layer(path: &Utf8Path, decoder: &dyn StructuredDecoder) -> LoadResult<FlatValues> {
    let bytes = std::fs::read(path).map_err(|err| LoadError::file(path, err))?;
    let value = decoder.decode(path.as_str(), &bytes)?;
    let flat = FlatValues::from_value(&value);
    tracing::debug!(path = %path, keys = flat.len(), "read configuration file");
    Ok(flat)
}
