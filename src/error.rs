//! Crate-level error types.

use std::fmt;

use crate::sequence::provider::ProviderError;

/// Errors produced by the viso-sequence crate.
///
/// Selection validation failures are absent: rejected regions are reported
/// as a `false` return from the store. Renderer failures never surface here
/// either; the highlight bridge logs and drops them.
#[derive(Debug)]
pub enum SequenceViewError {
    /// The sequence data provider failed to deliver a structure's sequence.
    Provider(ProviderError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for SequenceViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(e) => write!(f, "sequence provider error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for SequenceViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<ProviderError> for SequenceViewError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}

impl From<std::io::Error> for SequenceViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
