//! Read-only sequence data for the chains of one structure.
//!
//! Sequence data comes from the host's [`provider::SequenceProvider`]; this
//! crate never creates or edits residues, it only looks them up (to label
//! regions, fill region sequences, and report hovered residues back to the
//! host).

pub mod provider;

use serde::{Deserialize, Serialize};

/// A (chain, position) address of one residue in sequence space.
///
/// Positions are 1-based sequence positions as shown in the sequence grid.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ResidueRef {
    /// Chain identifier.
    pub chain_id: String,
    /// 1-based sequence position.
    pub position: i32,
}

impl ResidueRef {
    /// Address of residue `position` on `chain_id`.
    pub fn new(chain_id: impl Into<String>, position: i32) -> Self {
        Self {
            chain_id: chain_id.into(),
            position,
        }
    }
}

/// One residue as reported to the host: chain, position, and one-letter
/// code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residue {
    /// Chain identifier.
    pub chain_id: String,
    /// 1-based sequence position.
    pub position: i32,
    /// One-letter residue code.
    pub code: char,
}

/// One residue entry inside a [`Chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResidue {
    /// 1-based sequence position.
    pub position: i32,
    /// One-letter residue code.
    pub code: char,
}

/// Wire shape of a chain (`{ id, residues: [{ position, code }] }`).
#[derive(Clone, Serialize, Deserialize)]
struct ChainRecord {
    id: String,
    residues: Vec<ChainResidue>,
}

/// An ordered polymer chain.
///
/// Residues are kept sorted by position so lookups are binary searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChainRecord", into = "ChainRecord")]
pub struct Chain {
    id: String,
    residues: Vec<ChainResidue>,
}

impl From<ChainRecord> for Chain {
    fn from(record: ChainRecord) -> Self {
        Self::new(record.id, record.residues)
    }
}

impl From<Chain> for ChainRecord {
    fn from(chain: Chain) -> Self {
        Self {
            id: chain.id,
            residues: chain.residues,
        }
    }
}

impl Chain {
    /// Build a chain, sorting residues by position and dropping duplicate
    /// positions (first occurrence wins).
    pub fn new(id: impl Into<String>, mut residues: Vec<ChainResidue>) -> Self {
        residues.sort_by_key(|r| r.position);
        residues.dedup_by_key(|r| r.position);
        Self {
            id: id.into(),
            residues,
        }
    }

    /// Build a chain from a one-letter sequence string, numbered from 1.
    pub fn from_one_letter(id: impl Into<String>, sequence: &str) -> Self {
        let residues = sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .zip(1..)
            .map(|(code, position)| ChainResidue { position, code })
            .collect();
        Self::new(id, residues)
    }

    /// Chain identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Residues in position order.
    #[must_use]
    pub fn residues(&self) -> &[ChainResidue] {
        &self.residues
    }

    /// Number of residues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Whether the chain has no residues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// One-letter code at `position`, if the chain has that position.
    #[must_use]
    pub fn code_at(&self, position: i32) -> Option<char> {
        self.residues
            .binary_search_by_key(&position, |r| r.position)
            .ok()
            .map(|idx| self.residues[idx].code)
    }

    /// Codes for `start..=end`, or `None` if any position is missing.
    #[must_use]
    pub fn codes(&self, start: i32, end: i32) -> Option<String> {
        if end < start {
            return None;
        }
        (start..=end).map(|p| self.code_at(p)).collect()
    }
}

/// Sequence data for all chains of one structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceData {
    /// Chains in provider order.
    pub chains: Vec<Chain>,
}

impl SequenceData {
    /// Wrap a list of chains.
    #[must_use]
    pub fn new(chains: Vec<Chain>) -> Self {
        Self { chains }
    }

    /// Look up a chain by id.
    #[must_use]
    pub fn chain(&self, chain_id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == chain_id)
    }

    /// Whether a chain with this id exists.
    #[must_use]
    pub fn contains_chain(&self, chain_id: &str) -> bool {
        self.chain(chain_id).is_some()
    }

    /// Chain ids in provider order.
    pub fn chain_ids(&self) -> impl Iterator<Item = &str> {
        self.chains.iter().map(Chain::id)
    }

    /// Resolve a residue address to a full [`Residue`].
    #[must_use]
    pub fn residue(&self, residue: &ResidueRef) -> Option<Residue> {
        let code = self.chain(&residue.chain_id)?.code_at(residue.position)?;
        Some(Residue {
            chain_id: residue.chain_id.clone(),
            position: residue.position,
            code,
        })
    }

    /// One-letter codes for `start..=end` on a chain.
    #[must_use]
    pub fn codes(&self, chain_id: &str, start: i32, end: i32) -> Option<String> {
        self.chain(chain_id)?.codes(start, end)
    }
}
