use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// View-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// clear_selection = "Escape"
/// copy_selection = "KeyC"
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Abort a drag in progress, or clear the selection when idle.
    ClearSelection,
    /// Emit a copy action for the whole selection.
    CopySelection,
    /// Remove the most recently listed region.
    RemoveLastRegion,
    /// Focus the renderer on the whole selection.
    FocusSelection,
}
