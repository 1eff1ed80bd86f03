//! Sequence space <-> renderer numbering.
//!
//! The sequence grid addresses residues by chain id and 1-based sequence
//! position. The renderer wants either that same label numbering or the
//! author numbering from the deposited model, and it only knows about
//! residues that were actually modelled. [`CoordinateMapper`] does that
//! translation; positions with no modelled residue are dropped, and the
//! surviving positions are re-merged since author numbering may skip or
//! reorder numbers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::renderer::{ChainNumbering, ResidueNumbering, StructureNumbering};
use crate::selection::{merge_ranges, ResidueRange};
use crate::sequence::ResidueRef;

/// Which residue numbering the renderer expects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum NumberingScheme {
    /// Label chain ids and sequence positions.
    #[default]
    Label,
    /// Author chain ids and residue numbers.
    Author,
}

/// Translates sequence-space ranges into renderer ranges and back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinateMapper {
    scheme: NumberingScheme,
}

impl CoordinateMapper {
    /// Mapper producing `scheme` numbering.
    #[must_use]
    pub fn new(scheme: NumberingScheme) -> Self {
        Self { scheme }
    }

    /// Numbering produced by this mapper.
    #[must_use]
    pub fn scheme(&self) -> NumberingScheme {
        self.scheme
    }

    /// Map sequence-space ranges onto `structure`.
    ///
    /// Chains the structure does not have are skipped with a warning, so an
    /// empty result means "nothing of this selection is in the 3D view".
    #[must_use]
    pub fn to_renderer_ranges(
        &self,
        structure: &StructureNumbering,
        ranges: &[ResidueRange],
    ) -> Vec<ResidueRange> {
        let mut mapped = Vec::new();
        for range in ranges {
            let Some(chain) = structure.chain(&range.chain_id) else {
                log::warn!(
                    "chain '{}' not in loaded structure; skipping {range}",
                    range.chain_id
                );
                continue;
            };
            let chain_id = match self.scheme {
                NumberingScheme::Label => &chain.label_id,
                NumberingScheme::Author => &chain.auth_id,
            };
            mapped.extend(range_residues(chain, range).map(|r| {
                let number = match self.scheme {
                    NumberingScheme::Label => r.label_seq_id,
                    NumberingScheme::Author => r.auth_seq_id,
                };
                ResidueRange::single(chain_id.clone(), number)
            }));
        }
        merge_ranges(mapped)
    }

    /// Map one sequence position, `None` if it is not modelled.
    #[must_use]
    pub fn to_renderer_residue(
        &self,
        structure: &StructureNumbering,
        residue: &ResidueRef,
    ) -> Option<ResidueRef> {
        let chain = structure.chain(&residue.chain_id)?;
        let numbering = chain
            .residues_in(residue.position, residue.position)
            .first()?;
        Some(match self.scheme {
            NumberingScheme::Label => {
                ResidueRef::new(chain.label_id.clone(), numbering.label_seq_id)
            }
            NumberingScheme::Author => {
                ResidueRef::new(chain.auth_id.clone(), numbering.auth_seq_id)
            }
        })
    }

    /// Reverse lookup: a renderer residue back to its sequence position.
    ///
    /// Not wired to anything yet; a 3D-click -> sequence-highlight channel
    /// would start here.
    #[must_use]
    pub fn to_sequence_position(
        &self,
        structure: &StructureNumbering,
        renderer_chain: &str,
        renderer_number: i32,
    ) -> Option<ResidueRef> {
        let (chain, numbering) = match self.scheme {
            NumberingScheme::Label => {
                let chain = structure
                    .chains
                    .iter()
                    .find(|c| c.label_id == renderer_chain)?;
                let n = chain
                    .residues_in(renderer_number, renderer_number)
                    .first()?;
                (chain, *n)
            }
            NumberingScheme::Author => {
                let chain = structure
                    .chains
                    .iter()
                    .find(|c| c.auth_id == renderer_chain)?;
                let n = chain
                    .residues()
                    .iter()
                    .find(|r| r.auth_seq_id == renderer_number)?;
                (chain, *n)
            }
        };
        Some(ResidueRef::new(chain.label_id.clone(), numbering.label_seq_id))
    }
}

fn range_residues<'a>(
    chain: &'a ChainNumbering,
    range: &ResidueRange,
) -> impl Iterator<Item = &'a ResidueNumbering> {
    let (start, end) = (range.start.min(range.end), range.start.max(range.end));
    chain.residues_in(start, end).iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure() -> StructureNumbering {
        StructureNumbering::new(vec![
            // Label "A", author "H", author numbers start at 101.
            ChainNumbering::with_offset("A", "H", 50, 100),
            // Label "B" with residues 4..=6 unmodelled.
            ChainNumbering::new(
                "B",
                "L",
                [1, 2, 3, 7, 8]
                    .into_iter()
                    .map(|n| ResidueNumbering {
                        label_seq_id: n,
                        auth_seq_id: n,
                    })
                    .collect(),
            ),
        ])
    }

    #[test]
    fn label_scheme_keeps_positions() {
        let mapper = CoordinateMapper::new(NumberingScheme::Label);
        let ranges = mapper.to_renderer_ranges(
            &structure(),
            &[ResidueRange::new("A", 10, 15)],
        );
        assert_eq!(ranges, vec![ResidueRange::new("A", 10, 15)]);
    }

    #[test]
    fn author_scheme_translates_chain_and_numbers() {
        let mapper = CoordinateMapper::new(NumberingScheme::Author);
        let ranges = mapper.to_renderer_ranges(
            &structure(),
            &[ResidueRange::new("A", 10, 15)],
        );
        assert_eq!(ranges, vec![ResidueRange::new("H", 110, 115)]);
    }

    #[test]
    fn unmodelled_positions_split_ranges() {
        let mapper = CoordinateMapper::new(NumberingScheme::Author);
        let ranges = mapper
            .to_renderer_ranges(&structure(), &[ResidueRange::new("B", 2, 8)]);
        assert_eq!(
            ranges,
            vec![ResidueRange::new("L", 2, 3), ResidueRange::new("L", 7, 8)]
        );
    }

    #[test]
    fn missing_chain_yields_nothing() {
        let mapper = CoordinateMapper::default();
        let ranges = mapper
            .to_renderer_ranges(&structure(), &[ResidueRange::new("Z", 1, 5)]);
        assert!(ranges.is_empty());
    }

    #[test]
    fn out_of_model_positions_are_dropped() {
        let mapper = CoordinateMapper::default();
        let ranges = mapper.to_renderer_ranges(
            &structure(),
            &[ResidueRange::new("A", 45, 60)],
        );
        assert_eq!(ranges, vec![ResidueRange::new("A", 45, 50)]);
    }

    #[test]
    fn single_residue_round_trip() {
        let s = structure();
        let mapper = CoordinateMapper::new(NumberingScheme::Author);
        let renderer = mapper
            .to_renderer_residue(&s, &ResidueRef::new("A", 7))
            .unwrap();
        assert_eq!(renderer, ResidueRef::new("H", 107));
        assert_eq!(
            mapper.to_sequence_position(&s, "H", 107),
            Some(ResidueRef::new("A", 7))
        );
        assert_eq!(mapper.to_renderer_residue(&s, &ResidueRef::new("B", 5)), None);
    }
}
