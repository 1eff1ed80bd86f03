use crate::sequence::ResidueRef;

/// A residue cell of the sequence grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Chain the cell belongs to.
    pub chain_id: String,
    /// 1-based sequence position.
    pub position: i32,
}

impl CellRef {
    /// Cell at `position` of `chain_id`.
    pub fn new(chain_id: impl Into<String>, position: i32) -> Self {
        Self {
            chain_id: chain_id.into(),
            position,
        }
    }

    /// The residue this cell shows.
    #[must_use]
    pub fn residue(&self) -> ResidueRef {
        ResidueRef::new(self.chain_id.clone(), self.position)
    }
}

/// Platform-agnostic pointer events over the sequence grid.
///
/// The host hit-tests its own layout and feeds these into a
/// [`SequenceView`](crate::view::SequenceView) (or directly into a
/// [`DragSelectionController`](super::DragSelectionController)).
///
/// # Example
///
/// ```ignore
/// view.handle_pointer(PointerEvent::Down { cell: CellRef::new("A", 10) });
/// view.handle_pointer(PointerEvent::Enter { cell: CellRef::new("A", 15) });
/// view.handle_pointer(PointerEvent::Up { cell: None });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    /// Primary button pressed over a residue cell.
    Down {
        /// Cell under the pointer.
        cell: CellRef,
    },
    /// Pointer moved onto a residue cell (button held or not).
    Enter {
        /// Cell now under the pointer.
        cell: CellRef,
    },
    /// Primary button released.
    Up {
        /// Cell under the pointer, `None` over a gap or label.
        cell: Option<CellRef>,
    },
    /// Pointer left the cell it was over.
    Leave {
        /// `true` if it left the sequence surface altogether.
        outside_surface: bool,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the additive modifier (shift / ctrl / cmd) is held.
        additive: bool,
    },
}
