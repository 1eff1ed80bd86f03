use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::selection::{Constraints, SelectionMode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Selection", inline)]
#[serde(default)]
/// Selection mode and constraints applied to a new view.
pub struct SelectionOptions {
    /// Selection mode (`single`, `range`, `multiple`).
    #[schemars(title = "Mode")]
    pub mode: SelectionMode,
    /// Maximum number of regions, unlimited when absent.
    #[schemars(title = "Max Selections")]
    pub max_selections: Option<u32>,
    /// Maximum residues per region, unlimited when absent.
    #[schemars(title = "Max Range Size")]
    pub max_range_size: Option<u32>,
    /// Chains that may be selected, all when absent.
    #[schemars(skip)]
    pub allowed_chains: Option<Vec<String>>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Range,
            max_selections: None,
            max_range_size: None,
            allowed_chains: None,
        }
    }
}

impl SelectionOptions {
    /// The constraints described by these options.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        Constraints {
            max_selections: self.max_selections,
            max_range_size: self.max_range_size,
            allowed_chains: self.allowed_chains.clone(),
        }
    }
}
