//! The view's complete interactive vocabulary.
//!
//! Every user-facing operation on the sequence view, whether triggered by a
//! key press, a context menu, or a programmatic call, is a [`ViewCommand`]
//! passed to [`SequenceView::execute`](super::SequenceView::execute).
//! Pointer gestures go through
//! [`SequenceView::handle_pointer`](super::SequenceView::handle_pointer)
//! instead, since they carry drag state.

use crate::input::KeyAction;
use crate::selection::{Constraints, Region, SelectionMode};
use crate::sequence::ResidueRef;

/// Action a host can take on a region (or the whole selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionAction {
    /// Hide the residues in the 3D view.
    Hide,
    /// Show only these residues.
    Isolate,
    /// Draw attention to the residues (and focus the camera if enabled).
    Highlight,
    /// Copy the residues' sequence.
    Copy,
}

/// Emitted to region-action listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionActionEvent {
    /// What to do.
    pub action: RegionAction,
    /// Target region, `None` for the whole selection.
    pub region: Option<Region>,
}

/// A discrete or parameterized operation on the sequence view.
///
/// ```ignore
/// view.execute(ViewCommand::SetMode { mode: SelectionMode::Multiple });
/// view.execute(ViewCommand::SelectRange {
///     chain_id: "A".into(), start: 10, end: 15, extend: false,
/// });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    // ── Selection ───────────────────────────────────────────────────
    /// Abort a drag in progress; with no drag, clear the selection.
    Cancel,

    /// Clear the selection.
    ClearSelection,

    /// Select a span on one chain.
    SelectRange {
        /// Chain to select on.
        chain_id: String,
        /// First position.
        start: i32,
        /// Last position.
        end: i32,
        /// If true, add to the existing selection.
        extend: bool,
    },

    /// Select every residue of a chain (needs loaded sequence data).
    SelectChain {
        /// Chain to select.
        chain_id: String,
        /// If true, add to the existing selection.
        extend: bool,
    },

    /// Remove one region by id.
    RemoveRegion {
        /// Region id.
        id: String,
    },

    /// Remove the last region of the selection.
    RemoveLastRegion,

    /// Switch selection mode.
    SetMode {
        /// New mode.
        mode: SelectionMode,
    },

    /// Replace the selection constraints.
    SetConstraints {
        /// New constraints.
        constraints: Constraints,
    },

    // ── Hover ───────────────────────────────────────────────────────
    /// Hover over a set of residues.
    Hover {
        /// Residues under the pointer.
        residues: Vec<ResidueRef>,
    },

    /// Clear the hover.
    ClearHover,

    // ── Renderer ────────────────────────────────────────────────────
    /// Point the renderer's camera at the whole selection.
    FocusSelection,

    // ── Region actions ──────────────────────────────────────────────
    /// Emit a region action.
    RegionAction {
        /// Action to emit.
        action: RegionAction,
        /// Target region id, `None` for the whole selection.
        region_id: Option<String>,
    },
}

impl KeyAction {
    /// The command a bound key triggers.
    #[must_use]
    pub fn to_command(self) -> ViewCommand {
        match self {
            Self::ClearSelection => ViewCommand::Cancel,
            Self::CopySelection => ViewCommand::RegionAction {
                action: RegionAction::Copy,
                region_id: None,
            },
            Self::RemoveLastRegion => ViewCommand::RemoveLastRegion,
            Self::FocusSelection => ViewCommand::FocusSelection,
        }
    }
}
