use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sequence::ResidueRef;

/// A contiguous span of residues on one chain, in sequence-space numbering.
///
/// This is the unit range merging works on and the unit handed to the
/// renderer (after coordinate mapping).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ResidueRange {
    /// Chain identifier.
    pub chain_id: String,
    /// First position (inclusive).
    pub start: i32,
    /// Last position (inclusive).
    pub end: i32,
}

impl ResidueRange {
    /// Range `start..=end` on `chain_id`.
    pub fn new(chain_id: impl Into<String>, start: i32, end: i32) -> Self {
        Self {
            chain_id: chain_id.into(),
            start,
            end,
        }
    }

    /// Degenerate range covering one position.
    pub fn single(chain_id: impl Into<String>, position: i32) -> Self {
        Self::new(chain_id, position, position)
    }

    /// Number of residues covered (0 for a reversed range).
    #[must_use]
    pub fn len(&self) -> u32 {
        if self.end < self.start {
            0
        } else {
            self.end.abs_diff(self.start).saturating_add(1)
        }
    }

    /// Whether the range is reversed (covers nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `residue` lies inside this range.
    #[must_use]
    pub fn contains(&self, residue: &ResidueRef) -> bool {
        residue.chain_id == self.chain_id
            && (self.start..=self.end).contains(&residue.position)
    }
}

impl fmt::Display for ResidueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chain_id, self.start, self.end)
    }
}

/// One selected span, the unit of selection.
///
/// Regions are values: the store never edits one in place, it builds a new
/// region instead. `id` and `label` are derived from the span by
/// [`Region::new`], so two regions covering the same residues share an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Unique id within a selection (`"A:10-15"`).
    pub id: String,
    /// Chain identifier.
    pub chain_id: String,
    /// First position (inclusive, 1-based).
    pub start: i32,
    /// Last position (inclusive).
    pub end: i32,
    /// One-letter codes of the span, empty when unknown.
    #[serde(default)]
    pub sequence: String,
    /// Human-readable label (`"A 10-15"`).
    #[serde(default)]
    pub label: String,
}

impl Region {
    /// Region covering `start..=end` on `chain_id`, with derived id and label
    /// and no sequence.
    pub fn new(chain_id: impl Into<String>, start: i32, end: i32) -> Self {
        let chain_id = chain_id.into();
        let id = format!("{chain_id}:{start}-{end}");
        let label = if start == end {
            format!("{chain_id} {start}")
        } else {
            format!("{chain_id} {start}-{end}")
        };
        Self {
            id,
            chain_id,
            start,
            end,
            sequence: String::new(),
            label,
        }
    }

    /// Region covering a [`ResidueRange`].
    #[must_use]
    pub fn from_range(range: &ResidueRange) -> Self {
        Self::new(range.chain_id.clone(), range.start, range.end)
    }

    /// Same region carrying the given one-letter codes.
    #[must_use]
    pub fn with_sequence(self, sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            ..self
        }
    }

    /// Same region with a custom label.
    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self
        }
    }

    /// The span as a [`ResidueRange`].
    #[must_use]
    pub fn range(&self) -> ResidueRange {
        ResidueRange::new(self.chain_id.clone(), self.start, self.end)
    }

    /// Number of residues covered.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.range().len()
    }

    /// Whether the region covers nothing (reversed bounds).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `residue` lies inside this region.
    #[must_use]
    pub fn contains(&self, residue: &ResidueRef) -> bool {
        residue.chain_id == self.chain_id
            && (self.start..=self.end).contains(&residue.position)
    }

    /// Whether `sequence` has exactly one code per covered residue.
    pub(crate) fn has_complete_sequence(&self) -> bool {
        !self.is_empty()
            && self.sequence.chars().count() == self.len() as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
