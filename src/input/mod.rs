//! Input handling: pointer event types, bindable key actions, and the drag
//! state machine that turns pointer events into committed regions.

/// Drag-to-select state machine.
pub mod drag;
/// Platform-agnostic pointer events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;

pub use drag::{DragSelectionController, DragState, DragUpdate};
pub use event::{CellRef, PointerEvent};
pub use keyboard::KeyAction;
