//! Tests for `LoadError` formatting and constructors.

use anyhow::{Result, ensure};
use camino::Utf8Path;
use rstest::rstest;

use super::LoadError;

#[rstest]
fn file_error_mentions_path_and_source() -> Result<()> {
    let err = LoadError::file(
        Utf8Path::new("conf/app.toml"),
        std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    );
    let rendered = err.to_string();
    ensure!(rendered.contains("conf/app.toml"), "path missing: {rendered}");
    ensure!(rendered.contains("missing"), "source missing: {rendered}");
    Ok(())
}

#[rstest]
fn remote_exhausted_reports_attempts() -> Result<()> {
    let err = LoadError::remote_exhausted("http://config.local/app.toml", 3, "HTTP 503");
    ensure!(
        matches!(&*err, LoadError::RemoteExhausted { attempts: 3, .. }),
        "unexpected variant: {err:?}"
    );
    ensure!(
        err.to_string().contains("after 3 attempt(s): HTTP 503"),
        "unexpected message: {err}"
    );
    Ok(())
}

#[rstest]
fn decode_error_keeps_source_chain() -> Result<()> {
    let err = LoadError::decode("inline", figment::Error::from("bad table"));
    let source = std::error::Error::source(&*err);
    ensure!(source.is_some(), "decode errors should expose their source");
    Ok(())
}
