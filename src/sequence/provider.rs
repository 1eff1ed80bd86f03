//! Sequence data providers.
//!
//! A provider turns a structure identifier into [`SequenceData`]. Fetching
//! and caching policy belong to the provider; callers get either the data or
//! a descriptive [`ProviderError`] and decide themselves whether to retry.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::SequenceData;

/// Failure to obtain sequence data for a structure.
#[derive(Debug)]
pub enum ProviderError {
    /// No sequence is known for this structure id.
    NotFound(String),
    /// Reading the backing source failed.
    Io {
        /// Structure that was requested.
        structure_id: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The backing source was read but is not valid sequence data.
    Parse {
        /// Structure that was requested.
        structure_id: String,
        /// Parser message.
        message: String,
    },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no sequence for structure '{id}'"),
            Self::Io {
                structure_id,
                source,
            } => write!(f, "reading sequence for '{structure_id}': {source}"),
            Self::Parse {
                structure_id,
                message,
            } => write!(f, "parsing sequence for '{structure_id}': {message}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Source of per-structure sequence data.
///
/// Fetching is asynchronous; the host decides which executor drives it.
pub trait SequenceProvider {
    /// Fetch the chains and residues of `structure_id`.
    fn fetch_sequence(
        &self,
        structure_id: &str,
    ) -> impl Future<Output = Result<SequenceData, ProviderError>>;
}

/// In-memory provider, keyed by structure id.
#[derive(Debug, Clone, Default)]
pub struct StaticSequenceProvider {
    entries: FxHashMap<String, SequenceData>,
}

impl StaticSequenceProvider {
    /// Empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the sequence for a structure id.
    pub fn insert(
        &mut self,
        structure_id: impl Into<String>,
        data: SequenceData,
    ) -> Option<SequenceData> {
        self.entries.insert(structure_id.into(), data)
    }
}

impl SequenceProvider for StaticSequenceProvider {
    async fn fetch_sequence(
        &self,
        structure_id: &str,
    ) -> Result<SequenceData, ProviderError> {
        self.entries
            .get(structure_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(structure_id.to_owned()))
    }
}

/// Provider reading `<dir>/<structure_id>.json` files in the
/// `{ "chains": [{ "id", "residues": [{ "position", "code" }] }] }` shape.
#[derive(Debug, Clone)]
pub struct JsonSequenceProvider {
    dir: PathBuf,
}

impl JsonSequenceProvider {
    /// Provider rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the provider reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, structure_id: &str) -> PathBuf {
        self.dir.join(format!("{structure_id}.json"))
    }
}

impl SequenceProvider for JsonSequenceProvider {
    async fn fetch_sequence(
        &self,
        structure_id: &str,
    ) -> Result<SequenceData, ProviderError> {
        let path = self.path_for(structure_id);
        // Local files are small; a blocking read keeps the provider
        // executor-agnostic.
        let content = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProviderError::NotFound(structure_id.to_owned())
            } else {
                ProviderError::Io {
                    structure_id: structure_id.to_owned(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|e| ProviderError::Parse {
            structure_id: structure_id.to_owned(),
            message: e.to_string(),
        })
    }
}
