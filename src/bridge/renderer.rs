//! The external structure renderer, seen from this crate.
//!
//! The renderer is handed to [`HighlightBridge`](super::HighlightBridge) as
//! an explicit handle; nothing here assumes a process-wide viewer, so two
//! views over two structures simply use two renderers.

use std::fmt;

use crate::selection::ResidueRange;

/// A renderer call that could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    /// No structure is loaded (or it is still loading).
    NoStructure,
    /// The engine rejected the call.
    Engine(String),
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStructure => f.write_str("no structure loaded"),
            Self::Engine(msg) => write!(f, "engine error: {msg}"),
        }
    }
}

impl std::error::Error for RendererError {}

/// Numbering of one modelled residue: its position in the sequence (label
/// numbering) and the author-assigned residue number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueNumbering {
    /// 1-based sequence position (label numbering).
    pub label_seq_id: i32,
    /// Author residue number.
    pub auth_seq_id: i32,
}

/// Numbering of one chain as loaded in the renderer.
///
/// Only residues present in the model are listed; sequence positions with
/// no modelled residue have no counterpart in the 3D view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNumbering {
    /// Label (internal) chain id.
    pub label_id: String,
    /// Author chain id.
    pub auth_id: String,
    residues: Vec<ResidueNumbering>,
}

impl ChainNumbering {
    /// Chain with explicit per-residue numbering (sorted on construction).
    pub fn new(
        label_id: impl Into<String>,
        auth_id: impl Into<String>,
        mut residues: Vec<ResidueNumbering>,
    ) -> Self {
        residues.sort_by_key(|r| r.label_seq_id);
        Self {
            label_id: label_id.into(),
            auth_id: auth_id.into(),
            residues,
        }
    }

    /// Chain whose author numbering is the label numbering shifted by
    /// `offset` (a common case for constructs with a tag or a deposited
    /// fragment).
    pub fn with_offset(
        label_id: impl Into<String>,
        auth_id: impl Into<String>,
        len: i32,
        offset: i32,
    ) -> Self {
        let residues = (1..=len)
            .map(|label_seq_id| ResidueNumbering {
                label_seq_id,
                auth_seq_id: label_seq_id + offset,
            })
            .collect();
        Self::new(label_id, auth_id, residues)
    }

    /// Chain where both numberings agree and both ids are `id`.
    pub fn sequential(id: impl Into<String>, len: i32) -> Self {
        let id = id.into();
        Self::with_offset(id.clone(), id, len, 0)
    }

    /// Modelled residues in sequence order.
    #[must_use]
    pub fn residues(&self) -> &[ResidueNumbering] {
        &self.residues
    }

    /// Modelled residues whose sequence position lies in `start..=end`.
    #[must_use]
    pub fn residues_in(&self, start: i32, end: i32) -> &[ResidueNumbering] {
        let lo = self.residues.partition_point(|r| r.label_seq_id < start);
        let hi = self.residues.partition_point(|r| r.label_seq_id <= end);
        &self.residues[lo..hi.max(lo)]
    }
}

/// Chain and residue numbering of the structure currently loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureNumbering {
    /// Chains in model order.
    pub chains: Vec<ChainNumbering>,
}

impl StructureNumbering {
    /// Wrap a list of chains.
    #[must_use]
    pub fn new(chains: Vec<ChainNumbering>) -> Self {
        Self { chains }
    }

    /// Find a chain by sequence-view chain id, matching the label id first
    /// and the author id second.
    #[must_use]
    pub fn chain(&self, chain_id: &str) -> Option<&ChainNumbering> {
        self.chains
            .iter()
            .find(|c| c.label_id == chain_id)
            .or_else(|| self.chains.iter().find(|c| c.auth_id == chain_id))
    }
}

/// Contract of the external 3D renderer.
///
/// `ResidueRange`s handed to [`build_locus`](Self::build_locus) are already
/// in the renderer's numbering (see
/// [`CoordinateMapper`](super::mapper::CoordinateMapper)). Calls are
/// fire-and-forget from this crate's point of view: an `Err` is logged and
/// otherwise ignored.
pub trait StructureRenderer {
    /// Opaque renderer-side handle for a set of residues.
    type Locus;

    /// The loaded structure's numbering, or `None` if nothing is loaded.
    fn try_get_structure(&self) -> Option<&StructureNumbering>;

    /// Build a locus from ranges, `None` if no matching structure data is
    /// loaded.
    fn build_locus(&self, ranges: &[ResidueRange]) -> Option<Self::Locus>;

    /// Replace the transient (hover) highlight with `locus`.
    fn highlight_only(&mut self, locus: Self::Locus)
        -> Result<(), RendererError>;

    /// Replace the persistent selection with `locus`. Any previous
    /// persistent selection is cleared first.
    fn select_only(&mut self, locus: Self::Locus) -> Result<(), RendererError>;

    /// Remove the transient highlight.
    fn clear_highlights(&mut self) -> Result<(), RendererError>;

    /// Remove the persistent selection.
    fn clear_selections(&mut self) -> Result<(), RendererError>;

    /// Point the camera at `locus`.
    fn focus(&mut self, locus: Self::Locus) -> Result<(), RendererError>;
}
