//! Errors raised while generating a loader module.
//!
//! Every error is fatal: the generator never writes a partial artifact.

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result alias used throughout the generator.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Where a declaration or directive was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    /// File name, relative to the scanned directory, or the schema path.
    pub file: String,
    /// One-based line number.
    pub line: usize,
}

impl Origin {
    /// Create an origin for `line` of `file`.
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The three insertion points of a loader skeleton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Aggregate type and `LayeredMerge` implementations.
    Merge,
    /// Body of the defaults routine.
    Defaults,
    /// Body of the auto-execute routine.
    AutoExecute,
}

impl Slot {
    /// Every slot, in the order fragments are synthesised.
    pub const ALL: [Self; 3] = [Self::Merge, Self::Defaults, Self::AutoExecute];

    /// The slot name used after `@generate:`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Defaults => "defaults",
            Self::AutoExecute => "auto_execute",
        }
    }

    /// The comment line marking this slot in a skeleton.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Merge => "// @generate:merge",
            Self::Defaults => "// @generate:defaults",
            Self::AutoExecute => "// @generate:auto_execute",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Problems found while validating a skeleton.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A slot marker does not appear in the skeleton.
    #[error("template is missing the `{slot}` marker")]
    Missing {
        /// The absent slot.
        slot: Slot,
    },

    /// A slot marker appears more than once.
    #[error("template repeats the `{slot}` marker on lines {first} and {second}")]
    Duplicate {
        /// The repeated slot.
        slot: Slot,
        /// Line of the first occurrence.
        first: usize,
        /// Line of the repeated occurrence.
        second: usize,
    },

    /// A marker shares its line with another marker or with code.
    #[error("template line {line} must hold exactly one marker: `{text}`")]
    Conflict {
        /// One-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// A line uses the marker prefix with an unknown slot name.
    #[error("template line {line} names an unknown slot `{name}`")]
    Unknown {
        /// One-based line number.
        line: usize,
        /// The unrecognised slot name.
        name: String,
    },

    /// The assembled text is not a valid Rust source file.
    #[error("assembled loader is not valid Rust: {message}")]
    Unparsable {
        /// Parser diagnostic.
        message: String,
    },
}

/// Errors that abort generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A marked declaration could not be delimited or parsed.
    #[error("{origin}: {message}")]
    Structural {
        /// Location of the offending line.
        origin: Origin,
        /// What was expected.
        message: String,
    },

    /// Configuration types nest inside each other.
    #[error("configuration types form a containment cycle: {cycle}")]
    GraphCycle {
        /// The cycle, rendered as `A -> B -> A`.
        cycle: String,
    },

    /// The skeleton is invalid.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Two root types resolve to the same aggregate key or field.
    #[error("alias `{alias}` is used by both `{first}` and `{second}`")]
    DuplicateAlias {
        /// The clashing alias.
        alias: String,
        /// Type that claimed the alias first.
        first: String,
        /// Type that claimed it again.
        second: String,
    },

    /// Two declarations share a type name.
    #[error("configuration type `{name}` is declared at {first} and again at {second}")]
    DuplicateType {
        /// The repeated name.
        name: String,
        /// First declaration.
        first: Origin,
        /// Repeated declaration.
        second: Origin,
    },

    /// A default or auto-execute directive is malformed or unresolvable.
    #[error("{origin}: invalid directive: {message}")]
    InvalidDirective {
        /// Location of the directive.
        origin: Origin,
        /// What is wrong with it.
        message: String,
    },

    /// The sidecar schema is malformed.
    #[error("invalid schema '{path}': {message}")]
    InvalidSchema {
        /// Schema file.
        path: Utf8PathBuf,
        /// Parser or validation diagnostic.
        message: String,
    },

    /// A generator option is not usable.
    #[error("invalid generator option `{option}`: {message}")]
    InvalidOption {
        /// Option name.
        option: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The source directory is blank or does not exist.
    #[error("source directory '{path}' does not exist")]
    MissingSourceDir {
        /// The configured directory.
        path: Utf8PathBuf,
    },

    /// Reading sources or writing the artifact failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn structural(origin: Origin, message: impl Into<String>) -> Self {
        Self::Structural {
            origin,
            message: message.into(),
        }
    }

    pub(crate) fn directive(origin: Origin, message: impl Into<String>) -> Self {
        Self::InvalidDirective {
            origin,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
