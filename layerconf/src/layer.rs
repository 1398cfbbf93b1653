//! Configuration source layers and their precedence.

use std::fmt;

/// One prioritised source of configuration values.
///
/// Variants are ordered by precedence: later layers override earlier ones.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[non_exhaustive]
pub enum SourceLayer {
    /// Values assigned by the generated defaults routine.
    Defaults,
    /// Values decoded from the configured file.
    File,
    /// Values decoded from the remote configuration address.
    Remote,
    /// `-key=value` tokens from the process arguments.
    CommandLine,
}

impl SourceLayer {
    /// Layers merged after defaults, in application order.
    pub const MERGE_ORDER: [Self; 3] = [Self::File, Self::Remote, Self::CommandLine];

    /// Stable lower-case name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::File => "file",
            Self::Remote => "remote",
            Self::CommandLine => "command-line",
        }
    }
}

impl fmt::Display for SourceLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
