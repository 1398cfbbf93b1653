//! Filesystem access for generator inputs.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::{GenerateError, GenerateResult};

/// A source file read from the scanned directory.
pub(super) struct SourceFile {
    /// File name inside the directory.
    pub(super) name: String,
    pub(super) text: String,
}

/// Read every `*.rs` file directly inside `dir`, sorted by name, skipping
/// the generator's own `output`.
pub(super) fn read_sources(dir: &Utf8Path, output: &Utf8Path) -> GenerateResult<Vec<SourceFile>> {
    if dir.as_str().trim().is_empty() {
        return Err(GenerateError::MissingSourceDir {
            path: dir.to_path_buf(),
        });
    }
    let handle = match Dir::open_ambient_dir(dir, ambient_authority()) {
        Ok(handle) => handle,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(GenerateError::MissingSourceDir {
                path: dir.to_path_buf(),
            });
        }
        Err(err) => return Err(GenerateError::io(dir, err)),
    };

    let mut names = Vec::new();
    for listed in handle.entries().map_err(|err| GenerateError::io(dir, err))? {
        let entry = listed.map_err(|err| GenerateError::io(dir, err))?;
        let is_file = entry
            .file_type()
            .map_err(|err| GenerateError::io(dir, err))?
            .is_file();
        let name = entry.file_name().map_err(|err| GenerateError::io(dir, err))?;
        if is_file
            && Utf8Path::new(&name).extension() == Some("rs")
            && !is_output(dir, &name, output)
        {
            names.push(name);
        }
    }
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let text = handle
                .read_to_string(&name)
                .map_err(|err| GenerateError::io(dir.join(&name), err))?;
            tracing::debug!(file = %name, "scanning configuration source");
            Ok(SourceFile { name, text })
        })
        .collect()
}

fn is_output(dir: &Utf8Path, name: &str, output: &Utf8Path) -> bool {
    let candidate = dir.join(name);
    candidate == output
        || candidate
            .canonicalize_utf8()
            .ok()
            .zip(output.canonicalize_utf8().ok())
            .is_some_and(|(left, right)| left == right)
}

/// Read the whole file at `path`.
pub(super) fn read_file(path: &Utf8Path) -> GenerateResult<String> {
    let (dir, name) = split(path)?;
    dir.read_to_string(name).map_err(|err| GenerateError::io(path, err))
}

/// Current content of `path`, or `None` when it does not exist yet.
pub(super) fn read_existing(path: &Utf8Path) -> GenerateResult<Option<String>> {
    match read_file(path) {
        Ok(text) => Ok(Some(text)),
        Err(GenerateError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn split(path: &Utf8Path) -> GenerateResult<(Dir, &str)> {
    let name = path.file_name().ok_or_else(|| {
        GenerateError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let parent: Utf8PathBuf = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf);
    let dir = Dir::open_ambient_dir(&parent, ambient_authority())
        .map_err(|err| GenerateError::io(path, err))?;
    Ok((dir, name))
}
