//! End-to-end generation over temporary source trees.

use anyhow::{Result, ensure};
use layerconf_codegen::{GenerateError, Generator, TemplateError};
use rstest::{fixture, rstest};
use test_helpers::SourceTree;
use test_helpers::text::{compact_position, contains_compact};

const SERVER: &str = "\
use serde::Deserialize;

// @Configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tls: TlsConfig,
}

// @Configuration
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    pub enabled: bool,
}

// @DefaultConfig
// 8080 serverConfig.port
";

const DB: &str = "\
// @Configuration @Alias=db
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    pub url: String, // key = \"dsn\"
}

// @DefaultConfig
pub fn default_db() -> DbConfig {
    DbConfig { url: String::from(\"sqlite::memory:\") }
}
";

const HOOKS: &str = "\
// @AutoExecute
pub fn announce(config: &layerconf::LoadedConfig<super::RootConfig>) {
    let _ = config;
}
";

#[fixture]
fn tree() -> Result<SourceTree> {
    SourceTree::new()?
        .with_file("server.rs", SERVER)?
        .with_file("db.rs", DB)?
        .with_file("hooks.rs", HOOKS)?
        .with_file("notes.txt", "// @Configuration\npub struct Ignored {}\n")
}

#[rstest]
fn roots_form_the_aggregate(tree: Result<SourceTree>) -> Result<()> {
    let sources = tree?;
    let text = Generator::new(sources.root()).render()?;
    ensure!(
        contains_compact(
            &text,
            "pub struct ApplicationConfig {
                #[doc = \"Settings read under the `db` key.\"]
                pub db: super::db::DbConfig,
                #[doc = \"Settings read under the `serverConfig` key.\"]
                pub server_config: super::server::ServerConfig,
            }"
        ),
        "aggregate mismatch:\n{text}"
    );
    ensure!(!contains_compact(&text, "pub tls_config"), "nested type became a root");
    ensure!(!text.contains("Ignored"), "non-Rust files must not be scanned");
    Ok(())
}

#[rstest]
fn loader_applies_defaults_then_hooks(tree: Result<SourceTree>) -> Result<()> {
    let sources = tree?;
    let text = Generator::new(sources.root()).render()?;
    ensure!(contains_compact(&text, "impl ::layerconf::ConfigRoot for RootConfig"));
    let whole = compact_position(&text, "self.db = super::db::default_db();");
    let expression = compact_position(&text, "self.server_config.port = 8080;");
    ensure!(
        whole.is_some() && whole < expression,
        "defaults out of order:\n{text}"
    );
    ensure!(contains_compact(&text, "super::hooks::announce(config);"));
    ensure!(contains_compact(&text, "leaf_key(prefix, \"dsn\")"));
    ensure!(contains_compact(
        &text,
        "pub fn load(loader: &::layerconf::Loader,) -> ::layerconf::LoadResult<"
    ));
    Ok(())
}

#[rstest]
fn generation_is_deterministic(tree: Result<SourceTree>) -> Result<()> {
    let sources = tree?;
    let report = Generator::new(sources.root()).generate()?;
    let first = sources.read("config_loader.rs")?;
    sources.write("config_loader.rs", "stale")?;
    let again = Generator::new(sources.root()).generate()?;
    ensure!(again.written, "a stale artifact must be replaced");
    ensure!(sources.read("config_loader.rs")? == first);
    ensure!(report.roots == ["db", "serverConfig"]);
    ensure!(report.types == ["DbConfig", "ServerConfig", "TlsConfig"]);
    ensure!(report.defaults == 2 && report.hooks == 1);
    Ok(())
}

#[rstest]
fn types_may_be_referenced_through_a_crate_path(tree: Result<SourceTree>) -> Result<()> {
    let sources = tree?;
    let text = Generator::new(sources.root())
        .type_root("crate::config")
        .render()?;
    ensure!(contains_compact(
        &text,
        "impl ::layerconf::LayeredMerge for crate::config::server::TlsConfig"
    ));
    Ok(())
}

#[rstest]
#[case::cycle(
    "cycle.rs",
    "// @Configuration\npub struct A {\n    pub b: B,\n}\n// @Configuration\npub struct B {\n    pub a: A,\n}\n"
)]
#[case::unbalanced("broken.rs", "// @Configuration\npub struct Broken {\n    pub x: u8,\n")]
#[case::unresolved_default("bad_default.rs", "// @DefaultConfig\n// 1 nowhere.port\n")]
fn failures_write_nothing(
    tree: Result<SourceTree>,
    #[case] name: &str,
    #[case] contents: &str,
) -> Result<()> {
    let sources = tree?.with_file(name, contents)?;
    let result = Generator::new(sources.root()).generate();
    ensure!(result.is_err(), "generation should fail");
    ensure!(!sources.contains("config_loader.rs"), "artifact written on failure");
    let leftovers: Vec<String> = sources
        .file_names()?
        .into_iter()
        .filter(|file| !file.ends_with(".rs") && file != "notes.txt")
        .collect();
    ensure!(leftovers.is_empty(), "temporary files left behind: {leftovers:?}");
    Ok(())
}

#[rstest]
fn cycles_are_reported_as_such(tree: Result<SourceTree>) -> Result<()> {
    let sources = tree?.with_file(
        "cycle.rs",
        "// @Configuration\npub struct A {\n    pub b: B,\n}\n// @Configuration\npub struct B {\n    pub a: A,\n}\n",
    )?;
    let result = Generator::new(sources.root()).render();
    ensure!(
        matches!(&result, Err(GenerateError::GraphCycle { cycle }) if cycle == "A -> B -> A"),
        "got {result:?}"
    );
    Ok(())
}

#[rstest]
fn custom_templates_are_validated(tree: Result<SourceTree>) -> Result<()> {
    let sources = tree?;
    let result = Generator::new(sources.root())
        .template("// @generate:merge\n// @generate:defaults\n")
        .generate();
    ensure!(
        matches!(
            result,
            Err(GenerateError::Template(TemplateError::Missing { .. }))
        ),
        "got {result:?}"
    );
    ensure!(!sources.contains("config_loader.rs"));
    Ok(())
}

#[rstest]
fn templates_that_assemble_into_invalid_rust_fail(tree: Result<SourceTree>) -> Result<()> {
    let sources = tree?;
    let result = Generator::new(sources.root())
        .template("// @generate:merge\nfn broken( {\n// @generate:defaults\n// @generate:auto_execute\n")
        .render();
    ensure!(
        matches!(
            result,
            Err(GenerateError::Template(TemplateError::Unparsable { .. }))
        ),
        "got {result:?}"
    );
    Ok(())
}

#[rstest]
#[case::blank("")]
#[case::absent("definitely/not/here")]
fn missing_source_directories_are_rejected(#[case] dir: &str) -> Result<()> {
    let result = Generator::new(dir).render();
    ensure!(
        matches!(result, Err(GenerateError::MissingSourceDir { .. })),
        "got {result:?}"
    );
    Ok(())
}

#[rstest]
fn schema_input_matches_scanned_input() -> Result<()> {
    let schema = "\
[[types]]
name = \"ServerConfig\"
module = \"server\"
fields = [{ name = \"port\", type = \"u16\" }]

[[defaults]]
expr = \"8080\"
key = \"serverConfig.port\"
";
    let sources = SourceTree::new()?
        .with_file("layerconf.toml", schema)?
        .with_file(
            "server.rs",
            "// @Configuration\npub struct ServerConfig {\n    pub port: u16,\n}\n\n// @DefaultConfig\n// 8080 serverConfig.port\n",
        )?;
    let from_schema = Generator::from_schema(sources.path("layerconf.toml")).render()?;
    let scanned = Generator::new(sources.root()).render()?;
    ensure!(from_schema == scanned, "schema:\n{from_schema}\nscanned:\n{scanned}");
    Ok(())
}
