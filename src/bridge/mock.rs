//! Recording renderer used by unit tests.

use super::renderer::{RendererError, StructureNumbering, StructureRenderer};
use crate::selection::ResidueRange;

/// One call received by [`MockRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RendererCall {
    HighlightOnly(Vec<ResidueRange>),
    SelectOnly(Vec<ResidueRange>),
    ClearHighlights,
    ClearSelections,
    Focus(Vec<ResidueRange>),
}

/// Renderer whose locus is just the ranges it was built from.
#[derive(Debug, Default)]
pub(crate) struct MockRenderer {
    pub structure: Option<StructureNumbering>,
    pub calls: Vec<RendererCall>,
    /// When set, every call fails with an engine error (after recording).
    pub failing: bool,
}

impl MockRenderer {
    pub fn with_structure(structure: StructureNumbering) -> Self {
        Self {
            structure: Some(structure),
            ..Self::default()
        }
    }

    pub fn take_calls(&mut self) -> Vec<RendererCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: RendererCall) -> Result<(), RendererError> {
        self.calls.push(call);
        if self.failing {
            Err(RendererError::Engine("mock failure".into()))
        } else {
            Ok(())
        }
    }
}

impl StructureRenderer for MockRenderer {
    type Locus = Vec<ResidueRange>;

    fn try_get_structure(&self) -> Option<&StructureNumbering> {
        self.structure.as_ref()
    }

    fn build_locus(&self, ranges: &[ResidueRange]) -> Option<Self::Locus> {
        (self.structure.is_some() && !ranges.is_empty())
            .then(|| ranges.to_vec())
    }

    fn highlight_only(
        &mut self,
        locus: Self::Locus,
    ) -> Result<(), RendererError> {
        self.record(RendererCall::HighlightOnly(locus))
    }

    fn select_only(&mut self, locus: Self::Locus) -> Result<(), RendererError> {
        self.record(RendererCall::SelectOnly(locus))
    }

    fn clear_highlights(&mut self) -> Result<(), RendererError> {
        self.record(RendererCall::ClearHighlights)
    }

    fn clear_selections(&mut self) -> Result<(), RendererError> {
        self.record(RendererCall::ClearSelections)
    }

    fn focus(&mut self, locus: Self::Locus) -> Result<(), RendererError> {
        self.record(RendererCall::Focus(locus))
    }
}
