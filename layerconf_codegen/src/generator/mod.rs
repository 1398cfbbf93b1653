//! The generation entry point used from build scripts.
//!
//! ```no_run
//! use layerconf_codegen::Generator;
//!
//! # fn main() -> layerconf_codegen::GenerateResult<()> {
//! let report = Generator::new("src/config")
//!     .type_root("crate::config")
//!     .output("target/config_loader.rs")
//!     .generate()?;
//! assert!(report.roots.iter().any(|root| root == "serverConfig"));
//! # Ok(())
//! # }
//! ```

mod sources;

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};

use crate::aggregate::{Aggregate, DEFAULT_AGGREGATE_NAME};
use crate::directives::resolve;
use crate::extract::extract_types;
use crate::graph::TypeGraph;
use crate::model::SourceModel;
use crate::scan::scan_source;
use crate::schema::parse_schema;
use crate::synth::{ItemPaths, aggregate_ident, synthesize};
use crate::template::{DEFAULT_TEMPLATE, Template, check_parses};
use crate::{GenerateError, GenerateResult};

/// File name of the artifact when no output path is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "config_loader.rs";

/// Type-root prefix used when none is configured.
pub const DEFAULT_TYPE_ROOT: &str = "super";

#[derive(Clone, Debug)]
enum Input {
    Sources(Utf8PathBuf),
    Schema(Utf8PathBuf),
}

/// Builds a loader module from configuration sources.
#[derive(Clone, Debug)]
pub struct Generator {
    input: Input,
    output: Option<Utf8PathBuf>,
    type_root: String,
    aggregate_name: String,
    template: Option<String>,
}

/// What a generation run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Artifact path.
    pub output: Utf8PathBuf,
    /// Inputs read, in processing order.
    pub inputs: Vec<Utf8PathBuf>,
    /// Every configuration type, in discovery order.
    pub types: Vec<String>,
    /// Aliases of the aggregate's root fields.
    pub roots: Vec<String>,
    /// Number of default assignments emitted.
    pub defaults: usize,
    /// Number of auto-execute calls emitted.
    pub hooks: usize,
    /// Whether the artifact changed on disk.
    pub written: bool,
}

struct Rendered {
    text: String,
    report: GenerationReport,
}

impl Generator {
    /// Scan the `*.rs` files directly inside `source_dir`.
    #[must_use]
    pub fn new(source_dir: impl Into<Utf8PathBuf>) -> Self {
        Self::with_input(Input::Sources(source_dir.into()))
    }

    /// Read types and directives from a TOML sidecar instead of scanning
    /// source markers.
    #[must_use]
    pub fn from_schema(schema: impl Into<Utf8PathBuf>) -> Self {
        Self::with_input(Input::Schema(schema.into()))
    }

    fn with_input(input: Input) -> Self {
        Self {
            input,
            output: None,
            type_root: DEFAULT_TYPE_ROOT.to_owned(),
            aggregate_name: DEFAULT_AGGREGATE_NAME.to_owned(),
            template: None,
        }
    }

    /// Artifact path. Defaults to `config_loader.rs` next to the inputs.
    #[must_use]
    pub fn output(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Path prefix under which the generated module reaches user modules,
    /// such as `super` or `crate::config`. A blank prefix references user
    /// items by bare name.
    #[must_use]
    pub fn type_root(mut self, prefix: impl Into<String>) -> Self {
        self.type_root = prefix.into();
        self
    }

    /// Name of the aggregate struct.
    #[must_use]
    pub fn aggregate_name(mut self, name: impl Into<String>) -> Self {
        self.aggregate_name = name.into();
        self
    }

    /// Replace the built-in skeleton.
    #[must_use]
    pub fn template(mut self, text: impl Into<String>) -> Self {
        self.template = Some(text.into());
        self
    }

    /// Resolved artifact path.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        let base = match &self.input {
            Input::Sources(dir) => dir.as_path(),
            Input::Schema(schema) => schema.parent().unwrap_or_else(|| Utf8Path::new("")),
        };
        base.join(DEFAULT_OUTPUT_FILE)
    }

    /// Assemble the artifact without writing it.
    ///
    /// # Errors
    ///
    /// Returns the first [`GenerateError`] raised by any stage.
    pub fn render(&self) -> GenerateResult<String> {
        Ok(self.assemble()?.text)
    }

    /// Assemble the artifact and write it atomically.
    ///
    /// The file is left untouched when its content would not change, so
    /// build scripts do not trigger needless recompilation.
    ///
    /// # Errors
    ///
    /// Returns the first [`GenerateError`] raised by any stage; nothing is
    /// written in that case.
    pub fn generate(&self) -> GenerateResult<GenerationReport> {
        let Rendered { text, mut report } = self.assemble()?;
        let current = sources::read_existing(&report.output)?;
        if current.as_deref() == Some(text.as_str()) {
            tracing::debug!(output = %report.output, "artifact unchanged");
            return Ok(report);
        }
        write_atomically(&report.output, &text)?;
        report.written = true;
        tracing::info!(
            output = %report.output,
            types = report.types.len(),
            roots = report.roots.len(),
            "wrote configuration loader"
        );
        Ok(report)
    }

    fn assemble(&self) -> GenerateResult<Rendered> {
        let name = self.aggregate_name.trim();
        aggregate_ident(name)?;
        if name == "RootConfig" {
            return Err(GenerateError::InvalidOption {
                option: "aggregate_name",
                message: "`RootConfig` is reserved for the generated alias".to_owned(),
            });
        }
        let paths = ItemPaths::new(&self.type_root)?;
        let template = Template::parse(self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE))?;
        let output = self.output_path();

        let (model, inputs) = self.read_model(&output)?;
        let graph = TypeGraph::build(&model.types)?;
        let aggregate = Aggregate::from_graph(name, &graph)?;
        let directives = resolve(&model.defaults, &model.hooks, &aggregate, &graph)?;
        let fragments = synthesize(&graph, &aggregate, &directives, &paths)?;
        let text = template.render(&fragments);
        check_parses(&text)?;

        Ok(Rendered {
            text,
            report: GenerationReport {
                output,
                inputs,
                types: model.types.iter().map(|ty| ty.name.clone()).collect(),
                roots: aggregate.fields.iter().map(|field| field.alias.clone()).collect(),
                defaults: directives.defaults.len(),
                hooks: directives.hooks.len(),
                written: false,
            },
        })
    }

    fn read_model(&self, output: &Utf8Path) -> GenerateResult<(SourceModel, Vec<Utf8PathBuf>)> {
        match &self.input {
            Input::Schema(path) => {
                let text = sources::read_file(path)?;
                tracing::debug!(schema = %path, "read configuration schema");
                Ok((parse_schema(path, &text)?, vec![path.clone()]))
            }
            Input::Sources(dir) => {
                let listed = sources::read_sources(dir, output)?;
                let scanned = listed
                    .iter()
                    .map(|source| scan_source(&source.name, &source.text))
                    .collect::<GenerateResult<Vec<_>>>()?;
                let model = SourceModel {
                    types: extract_types(&scanned)?,
                    defaults: scanned.iter().flat_map(|file| file.defaults.clone()).collect(),
                    hooks: scanned.iter().flat_map(|file| file.hooks.clone()).collect(),
                };
                let inputs = listed.into_iter().map(|source| dir.join(source.name)).collect();
                Ok((model, inputs))
            }
        }
    }
}

fn write_atomically(path: &Utf8Path, text: &str) -> GenerateResult<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let mut staged =
        tempfile::NamedTempFile::new_in(parent).map_err(|err| GenerateError::io(parent, err))?;
    staged
        .write_all(text.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|err| GenerateError::io(staged.path().to_string_lossy().as_ref(), err))?;
    staged
        .persist(path)
        .map_err(|err| GenerateError::io(path, err.error))?;
    Ok(())
}
