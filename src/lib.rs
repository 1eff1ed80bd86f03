// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Residue-range selection over biomolecular sequences, kept in step with
//! an external 3D structure renderer.
//!
//! A sequence grid lets the user drag across residues of one or more
//! chains. This crate turns those gestures into a validated selection and
//! mirrors it, and the residues under the pointer, onto the 3D view.
//!
//! # Key entry points
//!
//! - [`view::SequenceView`] - the facade a host embeds (pointer input, key
//!   bindings, commands, listeners)
//! - [`selection::SelectionStore`] - the authoritative selection with its
//!   modes and constraints
//! - [`selection::merge_ranges`] - per-chain overlap/adjacency merging
//! - [`input::DragSelectionController`] - pointer drag -> region
//! - [`bridge::HighlightBridge`] - persistent and debounced transient
//!   renderer highlights
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Architecture
//!
//! Everything runs on the host's UI thread. Pointer events flow through the
//! drag controller into the store; the store publishes changes to its
//! listeners, one of which is the highlight bridge. Hover updates are
//! debounced by a cancellable single-slot scheduler that the host pumps via
//! [`view::SequenceView::tick`]. The renderer itself is an explicit handle
//! implementing [`bridge::StructureRenderer`].

pub mod bridge;
pub mod error;
pub mod input;
pub mod options;
pub mod selection;
pub mod sequence;
pub mod view;

pub use bridge::{HighlightBridge, StructureRenderer};
pub use error::SequenceViewError;
pub use input::{CellRef, DragSelectionController, KeyAction, PointerEvent};
pub use options::Options;
pub use selection::{
    Constraints, Region, ResidueRange, Selection, SelectionMode,
    SelectionStore,
};
pub use sequence::{Residue, ResidueRef, SequenceData};
pub use view::{RegionAction, SequenceView, ViewCommand};
