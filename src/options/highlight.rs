use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::bridge::NumberingScheme;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Highlight", inline)]
#[serde(default)]
/// How selection and hover are mirrored onto the 3D view.
pub struct HighlightOptions {
    /// Hover debounce in milliseconds.
    #[schemars(title = "Hover Delay (ms)", range(min = 0, max = 1000), extend("step" = 10))]
    pub hover_debounce_ms: u64,
    /// Residue numbering the renderer expects.
    #[schemars(title = "Numbering")]
    pub numbering: NumberingScheme,
    /// Move the camera to a region when its highlight action fires.
    #[schemars(title = "Focus On Highlight")]
    pub focus_on_highlight_action: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            hover_debounce_ms: 150,
            numbering: NumberingScheme::Label,
            focus_on_highlight_action: true,
        }
    }
}

impl HighlightOptions {
    /// Hover debounce as a duration.
    #[must_use]
    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_debounce_ms)
    }
}
