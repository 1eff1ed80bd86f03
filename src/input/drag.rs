//! Pointer-drag -> region state machine.
//!
//! `Idle -> Dragging -> (commit | cancel) -> Idle`. A press records the
//! anchor cell, entering cells on the anchor's chain stretches a
//! provisional range, and release (or leaving the surface) commits it to
//! the [`SelectionStore`]. In `single` mode the press commits right away.

use super::event::{CellRef, PointerEvent};
use crate::selection::{Region, ResidueRange, SelectionMode, SelectionStore};
use crate::sequence::SequenceData;

/// Where the controller is in a gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Button held after a press on `anchor`.
    Dragging {
        /// Cell the gesture started on.
        anchor: CellRef,
        /// Range spanned so far, always on the anchor's chain.
        provisional: ResidueRange,
    },
}

/// What one pointer event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragUpdate {
    /// Nothing changed.
    None,
    /// The provisional range changed (or a drag started).
    Preview(ResidueRange),
    /// A region was handed to the store.
    Committed {
        /// The region proposed.
        region: Region,
        /// Whether the store accepted it.
        accepted: bool,
    },
    /// The drag was abandoned.
    Cancelled,
}

/// Turns pointer events into committed regions.
#[derive(Debug, Default)]
pub struct DragSelectionController {
    state: DragState,
    /// Additive modifier currently held.
    additive: bool,
}

impl DragSelectionController {
    /// Idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The provisional range while dragging.
    #[must_use]
    pub fn provisional(&self) -> Option<&ResidueRange> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { provisional, .. } => Some(provisional),
        }
    }

    /// Whether the additive modifier is held.
    #[must_use]
    pub fn additive(&self) -> bool {
        self.additive
    }

    /// Feed one pointer event. `sequence` (if loaded) supplies the
    /// one-letter codes stored on committed regions.
    pub fn handle_event(
        &mut self,
        event: PointerEvent,
        store: &mut SelectionStore,
        sequence: Option<&SequenceData>,
    ) -> DragUpdate {
        match event {
            PointerEvent::Down { cell } => {
                self.pointer_down(cell, store, sequence)
            }
            PointerEvent::Enter { cell } => self.pointer_enter(&cell),
            PointerEvent::Up { cell } => {
                self.pointer_up(cell.as_ref(), store, sequence)
            }
            PointerEvent::Leave { outside_surface } => {
                if outside_surface {
                    self.commit(store, sequence)
                } else {
                    DragUpdate::None
                }
            }
            PointerEvent::ModifiersChanged { additive } => {
                self.additive = additive;
                DragUpdate::None
            }
        }
    }

    /// Abandon the current drag without touching the store.
    pub fn cancel(&mut self) -> DragUpdate {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragUpdate::None,
            DragState::Dragging { provisional, .. } => {
                log::debug!("drag over {provisional} cancelled");
                DragUpdate::Cancelled
            }
        }
    }

    fn pointer_down(
        &mut self,
        cell: CellRef,
        store: &mut SelectionStore,
        sequence: Option<&SequenceData>,
    ) -> DragUpdate {
        let provisional = ResidueRange::single(cell.chain_id.clone(), cell.position);
        if store.mode() == SelectionMode::Single {
            self.state = DragState::Idle;
            let region = filled_region(&provisional, sequence);
            let accepted = store.add_region(region.clone());
            return DragUpdate::Committed { region, accepted };
        }
        self.state = DragState::Dragging {
            anchor: cell,
            provisional: provisional.clone(),
        };
        DragUpdate::Preview(provisional)
    }

    fn pointer_enter(&mut self, cell: &CellRef) -> DragUpdate {
        let DragState::Dragging {
            anchor,
            provisional,
        } = &mut self.state
        else {
            return DragUpdate::None;
        };
        if cell.chain_id != anchor.chain_id {
            return DragUpdate::None;
        }
        let next = ResidueRange::new(
            anchor.chain_id.clone(),
            anchor.position.min(cell.position),
            anchor.position.max(cell.position),
        );
        if *provisional == next {
            return DragUpdate::None;
        }
        *provisional = next.clone();
        DragUpdate::Preview(next)
    }

    fn pointer_up(
        &mut self,
        cell: Option<&CellRef>,
        store: &mut SelectionStore,
        sequence: Option<&SequenceData>,
    ) -> DragUpdate {
        // Release over a cell counts as a last enter.
        if let Some(cell) = cell {
            let _ = self.pointer_enter(cell);
        }
        self.commit(store, sequence)
    }

    fn commit(
        &mut self,
        store: &mut SelectionStore,
        sequence: Option<&SequenceData>,
    ) -> DragUpdate {
        let DragState::Dragging { provisional, .. } =
            std::mem::take(&mut self.state)
        else {
            return DragUpdate::None;
        };
        let region = filled_region(&provisional, sequence);
        let accepted = if self.additive {
            store.add_region(region.clone())
        } else {
            store.replace_selection(vec![region.clone()])
        };
        log::debug!(
            "drag committed {provisional} (additive: {}, accepted: {accepted})",
            self.additive
        );
        DragUpdate::Committed { region, accepted }
    }
}

/// Region over `range`, carrying its one-letter codes when `sequence`
/// covers the whole span.
pub(crate) fn filled_region(
    range: &ResidueRange,
    sequence: Option<&SequenceData>,
) -> Region {
    let region = Region::from_range(range);
    match sequence.and_then(|s| s.codes(&range.chain_id, range.start, range.end)) {
        Some(codes) => region.with_sequence(codes),
        None => region,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Constraints;
    use crate::sequence::Chain;

    fn store(mode: SelectionMode) -> SelectionStore {
        SelectionStore::new(mode, Constraints::none())
    }

    fn down(chain: &str, position: i32) -> PointerEvent {
        PointerEvent::Down {
            cell: CellRef::new(chain, position),
        }
    }

    fn enter(chain: &str, position: i32) -> PointerEvent {
        PointerEvent::Enter {
            cell: CellRef::new(chain, position),
        }
    }

    fn up(chain: &str, position: i32) -> PointerEvent {
        PointerEvent::Up {
            cell: Some(CellRef::new(chain, position)),
        }
    }

    fn spans(store: &SelectionStore) -> Vec<(String, i32, i32)> {
        store
            .regions()
            .iter()
            .map(|r| (r.chain_id.clone(), r.start, r.end))
            .collect()
    }

    #[test]
    fn drag_commits_normalized_range() {
        let mut store = store(SelectionMode::Range);
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(down("A", 15), &mut store, None);
        assert!(drag.is_dragging());
        assert_eq!(
            drag.handle_event(enter("A", 12), &mut store, None),
            DragUpdate::Preview(ResidueRange::new("A", 12, 15))
        );
        let _ = drag.handle_event(enter("A", 10), &mut store, None);
        let update = drag.handle_event(up("A", 10), &mut store, None);

        assert!(matches!(update, DragUpdate::Committed { accepted: true, .. }));
        assert_eq!(spans(&store), vec![("A".into(), 10, 15)]);
        assert_eq!(drag.state(), &DragState::Idle);
        assert!(drag.provisional().is_none());
    }

    #[test]
    fn other_chain_enters_are_ignored() {
        let mut store = store(SelectionMode::Range);
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(down("A", 5), &mut store, None);
        let _ = drag.handle_event(enter("A", 7), &mut store, None);
        assert_eq!(
            drag.handle_event(enter("B", 20), &mut store, None),
            DragUpdate::None
        );
        let _ = drag.handle_event(up("B", 20), &mut store, None);
        assert_eq!(spans(&store), vec![("A".into(), 5, 7)]);
    }

    #[test]
    fn click_selects_one_residue() {
        let mut store = store(SelectionMode::Multiple);
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(down("A", 3), &mut store, None);
        let _ = drag.handle_event(up("A", 3), &mut store, None);
        assert_eq!(spans(&store), vec![("A".into(), 3, 3)]);
    }

    #[test]
    fn single_mode_commits_on_press() {
        let mut store = store(SelectionMode::Single);
        assert!(store.add_region(Region::new("B", 1, 4)));
        let mut drag = DragSelectionController::new();
        let update = drag.handle_event(down("A", 9), &mut store, None);
        assert!(matches!(update, DragUpdate::Committed { accepted: true, .. }));
        assert!(!drag.is_dragging());
        assert_eq!(spans(&store), vec![("A".into(), 9, 9)]);

        // The following release has nothing to commit.
        assert_eq!(
            drag.handle_event(up("A", 12), &mut store, None),
            DragUpdate::None
        );
    }

    #[test]
    fn additive_drag_adds_instead_of_replacing() {
        let mut store = store(SelectionMode::Multiple);
        assert!(store.add_region(Region::new("A", 1, 3)));
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(
            PointerEvent::ModifiersChanged { additive: true },
            &mut store,
            None,
        );
        let _ = drag.handle_event(down("A", 10), &mut store, None);
        let _ = drag.handle_event(up("A", 12), &mut store, None);
        assert_eq!(
            spans(&store),
            vec![("A".into(), 1, 3), ("A".into(), 10, 12)]
        );

        let _ = drag.handle_event(
            PointerEvent::ModifiersChanged { additive: false },
            &mut store,
            None,
        );
        let _ = drag.handle_event(down("A", 20), &mut store, None);
        let _ = drag.handle_event(up("A", 21), &mut store, None);
        assert_eq!(spans(&store), vec![("A".into(), 20, 21)]);
    }

    #[test]
    fn leaving_the_surface_commits_last_range() {
        let mut store = store(SelectionMode::Range);
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(down("A", 10), &mut store, None);
        let _ = drag.handle_event(enter("A", 14), &mut store, None);
        assert_eq!(
            drag.handle_event(
                PointerEvent::Leave {
                    outside_surface: false
                },
                &mut store,
                None
            ),
            DragUpdate::None
        );
        assert!(drag.is_dragging());
        let _ = drag.handle_event(
            PointerEvent::Leave {
                outside_surface: true,
            },
            &mut store,
            None,
        );
        assert!(!drag.is_dragging());
        assert_eq!(spans(&store), vec![("A".into(), 10, 14)]);
    }

    #[test]
    fn cancel_leaves_store_untouched() {
        let mut store = store(SelectionMode::Range);
        assert!(store.add_region(Region::new("A", 1, 2)));
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(down("A", 10), &mut store, None);
        let _ = drag.handle_event(enter("A", 20), &mut store, None);
        assert_eq!(drag.cancel(), DragUpdate::Cancelled);
        assert_eq!(drag.cancel(), DragUpdate::None);

        assert_eq!(
            drag.handle_event(PointerEvent::Up { cell: None }, &mut store, None),
            DragUpdate::None
        );
        assert_eq!(spans(&store), vec![("A".into(), 1, 2)]);
    }

    #[test]
    fn rejected_commit_is_reported() {
        let mut store = SelectionStore::new(
            SelectionMode::Range,
            Constraints {
                max_range_size: Some(3),
                ..Constraints::none()
            },
        );
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(down("A", 1), &mut store, None);
        let update = drag.handle_event(up("A", 10), &mut store, None);
        assert!(matches!(update, DragUpdate::Committed { accepted: false, .. }));
        assert!(store.selection().is_empty());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn committed_region_carries_codes() {
        let data = SequenceData::new(vec![Chain::from_one_letter("A", "MKTAYIAK")]);
        let mut store = store(SelectionMode::Range);
        let mut drag = DragSelectionController::new();
        let _ = drag.handle_event(down("A", 2), &mut store, Some(&data));
        let _ = drag.handle_event(up("A", 5), &mut store, Some(&data));
        assert_eq!(store.regions()[0].sequence, "KTAY");
    }
}
