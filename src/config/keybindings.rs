//! Recorder control keybindings and parsing.
//!
//! While a recording is running every key press is captured, so the chords that
//! stop or cancel the recording are reserved and never end up in the script.

use crate::input::{KeyEvent, Modifiers};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Actions the recorder reacts to instead of recording the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    /// Stop recording and keep the captured events
    Stop,
    /// Abort recording; nothing is saved
    Cancel,
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Alt+S" or "Escape".
    /// Modifiers can appear in any order: "Alt+Ctrl+S", "Super+Shift+Ctrl+S", etc.
    /// Supports spaces around '+' (e.g., "Ctrl + Alt + S")
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        // Normalize by removing spaces around '+'
        let s_normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut modifiers = Modifiers::new();
        let mut key_parts = Vec::new();

        for part in s_normalized.split('+') {
            if !modifiers.set_by_name(part) {
                key_parts.push(part);
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into ["Ctrl", "", ""]; the key is '+'
        let key = key_parts.join("+");
        let key = if key.is_empty() {
            "+".to_string()
        } else {
            canonical_key_name(&key)
        };

        Ok(Self { key, modifiers })
    }

    /// Check if this keybinding matches a captured key press.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key.eq_ignore_ascii_case(&event.key) && self.modifiers == event.modifiers
    }
}

// Captured key names use DOM spelling (" ", "Escape", "ArrowUp"); accept the
// names people usually write in a config file.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("space", " "),
    ("spacebar", " "),
    ("esc", "Escape"),
    ("return", "Enter"),
    ("del", "Delete"),
    ("ins", "Insert"),
    ("up", "ArrowUp"),
    ("down", "ArrowDown"),
    ("left", "ArrowLeft"),
    ("right", "ArrowRight"),
    ("pgup", "PageUp"),
    ("pageup", "PageUp"),
    ("page_up", "PageUp"),
    ("pgdn", "PageDown"),
    ("pagedown", "PageDown"),
    ("page_down", "PageDown"),
    ("menu", "ContextMenu"),
    ("backspace", "Backspace"),
];

fn canonical_key_name(name: &str) -> String {
    KEY_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Configuration for the recorder control chords.
///
/// Users specify them in config.toml as:
/// ```toml
/// [recorder]
/// stop = ["Ctrl+Alt+S"]
/// cancel = ["Ctrl+Alt+X"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecorderKeybindings {
    /// Chords that stop the recording and save the script
    #[serde(default = "default_stop")]
    pub stop: Vec<String>,

    /// Chords that abort the recording without saving
    #[serde(default = "default_cancel")]
    pub cancel: Vec<String>,
}

impl Default for RecorderKeybindings {
    fn default() -> Self {
        Self {
            stop: default_stop(),
            cancel: default_cancel(),
        }
    }
}

impl RecorderKeybindings {
    /// Build a lookup map from keybindings to actions for efficient matching.
    /// Returns an error if any keybinding string is invalid or if duplicates are detected.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, ControlAction>, String> {
        let mut map = HashMap::new();

        let mut insert_binding = |binding_str: &str, action: ControlAction| -> Result<(), String> {
            let binding = KeyBinding::parse(binding_str)?;
            if let Some(existing_action) = map.insert(binding, action) {
                return Err(format!(
                    "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                    binding_str, existing_action, action
                ));
            }
            Ok(())
        };

        for binding_str in &self.stop {
            insert_binding(binding_str, ControlAction::Stop)?;
        }

        for binding_str in &self.cancel {
            insert_binding(binding_str, ControlAction::Cancel)?;
        }

        Ok(map)
    }
}

/// Finds the control action bound to a key press, if any.
pub fn control_action(
    map: &HashMap<KeyBinding, ControlAction>,
    event: &KeyEvent,
) -> Option<ControlAction> {
    map.iter()
        .find(|(binding, _)| binding.matches(event))
        .map(|(_, action)| *action)
}

fn default_stop() -> Vec<String> {
    vec!["Ctrl+Alt+S".to_string()]
}

fn default_cancel() -> Vec<String> {
    vec!["Ctrl+Alt+X".to_string()]
}
