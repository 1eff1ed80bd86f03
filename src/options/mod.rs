//! Centralized sequence-view options with TOML preset support.
//!
//! Selection mode and constraints, highlight behavior, and key bindings are
//! consolidated here. Options serialize to/from TOML so hosts can keep view
//! presets on disk.

mod highlight;
mod keybindings;
mod selection;

use std::path::Path;

pub use highlight::HighlightOptions;
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
pub use selection::SelectionOptions;
use serde::{Deserialize, Serialize};

use crate::error::SequenceViewError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[highlight]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Selection mode and constraints.
    pub selection: SelectionOptions,
    /// Renderer highlight behavior.
    pub highlight: HighlightOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, SequenceViewError> {
        toml::from_str(content)
            .map_err(|e| SequenceViewError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SequenceViewError> {
        let content =
            std::fs::read_to_string(path).map_err(SequenceViewError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SequenceViewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SequenceViewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SequenceViewError::Io)?;
        }
        std::fs::write(path, content).map_err(SequenceViewError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::NumberingScheme;
    use crate::input::KeyAction;
    use crate::selection::SelectionMode;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[selection]
mode = "multiple"
max_range_size = 30

[highlight]
numbering = "author"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.selection.mode, SelectionMode::Multiple);
        assert_eq!(opts.selection.max_range_size, Some(30));
        assert_eq!(opts.selection.max_selections, None);
        assert_eq!(opts.highlight.numbering, NumberingScheme::Author);
        // Everything else should be default
        assert_eq!(opts.highlight.hover_debounce_ms, 150);
        assert!(opts.highlight.focus_on_highlight_action);
        assert_eq!(
            opts.keybindings.lookup("Escape"),
            Some(KeyAction::ClearSelection)
        );
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyC"),
            Some(KeyAction::CopySelection)
        );
        assert_eq!(
            opts.keybindings.lookup("Delete"),
            Some(KeyAction::RemoveLastRegion)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_rebuild_lookup() {
        let toml_str = r#"
[keybindings.bindings]
clear_selection = "Backspace"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("Backspace"),
            Some(KeyAction::ClearSelection)
        );
        assert_eq!(opts.keybindings.lookup("Escape"), None);
    }

    #[test]
    fn rebinding_updates_lookup() {
        let mut opts = Options::default();
        opts.keybindings.bind(KeyAction::CopySelection, "KeyY");
        assert_eq!(
            opts.keybindings.lookup("KeyY"),
            Some(KeyAction::CopySelection)
        );
        assert_eq!(opts.keybindings.lookup("KeyC"), None);
    }

    #[test]
    fn constraints_follow_selection_options() {
        let mut opts = Options::default();
        opts.selection.max_selections = Some(2);
        opts.selection.allowed_chains = Some(vec!["A".into()]);
        let constraints = opts.selection.constraints();
        assert_eq!(constraints.max_selections, Some(2));
        assert_eq!(constraints.max_range_size, None);
        assert_eq!(constraints.allowed_chains, Some(vec!["A".to_owned()]));
    }

    #[test]
    fn invalid_toml_is_an_options_error() {
        let err = Options::from_toml_str("[selection]\nmode = 3").unwrap_err();
        assert!(matches!(err, SequenceViewError::OptionsParse(_)));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir().join(format!(
            "viso-sequence-presets-{}",
            std::process::id()
        ));
        let mut opts = Options::default();
        opts.highlight.hover_debounce_ms = 80;
        opts.save(&dir.join("fast.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["default", "fast"]);
        let loaded = Options::load(&dir.join("fast.toml")).unwrap();
        assert_eq!(loaded, opts);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("selection"));
        assert!(props.contains_key("highlight"));
        // Skipped sections should be absent
        assert!(!props.contains_key("keybindings"));

        let highlight = &props["highlight"]["properties"];
        assert!(highlight.get("hover_debounce_ms").is_some());
        let selection = &props["selection"]["properties"];
        assert!(selection.get("mode").is_some());
        assert!(selection.get("allowed_chains").is_none());
    }
}
