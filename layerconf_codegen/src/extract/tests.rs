//! Tests for field parsing, tag keys and nesting detection.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::extract_types;
use crate::GenerateError;
use crate::model::{FieldDescriptor, TypeDescriptor};
use crate::scan::{ScannedFile, scan_source};

fn scan_all(files: &[(&str, &str)]) -> Result<Vec<ScannedFile>> {
    files
        .iter()
        .map(|(name, text)| scan_source(name, text).map_err(anyhow::Error::from))
        .collect()
}

fn find<'a>(types: &'a [TypeDescriptor], name: &str) -> Result<&'a TypeDescriptor> {
    types
        .iter()
        .find(|ty| ty.name == name)
        .ok_or_else(|| anyhow!("type {name} not extracted"))
}

fn field(name: &str, ty: &str, tag: &str, nested: bool) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_owned(),
        ty: ty.to_owned(),
        tag_key: tag.to_owned(),
        is_nested: nested,
    }
}

#[rstest]
fn nesting_is_detected_across_files() -> Result<()> {
    let files = scan_all(&[
        (
            "app.rs",
            "// @Configuration\npub struct AppConfig {\n    pub name: String,\n    pub db: DbConfig,\n}\n",
        ),
        (
            "db.rs",
            "// @Configuration @Alias=database\npub struct DbConfig {\n    url: String,\n}\n",
        ),
    ])?;
    let types = extract_types(&files)?;
    let app = find(&types, "AppConfig")?;
    ensure!(
        app.fields
            == [
                field("name", "String", "name", false),
                field("db", "DbConfig", "db", true),
            ],
        "got {:?}",
        app.fields
    );
    ensure!(app.alias == "appConfig");
    ensure!(app.module.as_deref() == Some("app"));
    let db = find(&types, "DbConfig")?;
    ensure!(db.alias == "database");
    Ok(())
}

#[rstest]
fn tag_key_precedence() -> Result<()> {
    let text = "\
// @Configuration
#[serde(rename_all = \"kebab-case\")]
pub struct Limits {
    // comments and docs are skipped
    /// Maximum connections.
    pub max_connections: u32, // key = \"conn\"
    #[serde(rename = \"idle\")]
    pub idle_timeout: u64, // key = \"idle_secs\"
    #[serde(
        rename = \"burst\"
    )]
    pub burst_size: u32,
    pub retry_limit: u8,
    pub r#type: String, // not a key annotation
}
";
    let types = extract_types(&scan_all(&[("limits.rs", text)])?)?;
    let limits = find(&types, "Limits")?;
    let tags: Vec<_> = limits
        .fields
        .iter()
        .map(|field| field.tag_key.as_str())
        .collect();
    ensure!(
        tags == ["conn", "idle_secs", "burst", "retry-limit", "type"],
        "got {tags:?}"
    );
    Ok(())
}

#[rstest]
fn nesting_requires_exact_type_name() -> Result<()> {
    let files = scan_all(&[(
        "mod.rs",
        "// @Configuration\npub struct A {\n    b: Option<B>,\n    c: B,\n}\n// @Configuration\npub struct B;\n",
    )])?;
    let types = extract_types(&files)?;
    let nested: Vec<_> = find(&types, "A")?
        .fields
        .iter()
        .map(|field| field.is_nested)
        .collect();
    ensure!(nested == [false, true], "got {nested:?}");
    ensure!(find(&types, "A")?.module.is_none());
    Ok(())
}

#[rstest]
#[case::not_a_field("// @Configuration\npub struct A {\n    fn nope() {}\n}\n")]
#[case::bad_type("// @Configuration\npub struct A {\n    port: u16 u16,\n}\n")]
#[case::empty_key("// @Configuration\npub struct A {\n    port: u16, // key = \"\"\n}\n")]
#[case::unquoted_key("// @Configuration\npub struct A {\n    port: u16, // key = port\n}\n")]
#[case::dangling_attribute("// @Configuration\npub struct A {\n    port: u16,\n    #[serde(default)]\n}\n")]
fn malformed_bodies_are_structural(#[case] text: &str) -> Result<()> {
    let files = scan_all(&[("a.rs", text)])?;
    let Err(err) = extract_types(&files) else {
        return Err(anyhow!("expected a structural error"));
    };
    ensure!(
        matches!(err, GenerateError::Structural { .. }),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn fields_sharing_a_key_are_rejected_at_the_second_field() -> Result<()> {
    let text = "\
// @Configuration
pub struct DbConfig {
    pub url: String,
    #[serde(rename = \"url\")]
    pub fallback_url: String,
}
";
    let files = scan_all(&[("db.rs", text)])?;
    let Err(GenerateError::Structural { origin, message }) = extract_types(&files) else {
        return Err(anyhow!("expected a structural error"));
    };
    ensure!(origin.line == 5, "reported at line {}", origin.line);
    ensure!(
        message.contains("`url` and `fallback_url`") && message.contains("key `url`"),
        "unexpected message: {message}"
    );
    Ok(())
}
