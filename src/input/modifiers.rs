//! Keyboard modifier state captured alongside each key press.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyboard modifier state.
///
/// Records which modifier keys (Ctrl, Shift, Alt, Super) were held at the moment
/// a key was pressed. Rendering always follows the canonical order
/// `ctrl, shift, alt, super`, independent of the order the keys went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Ctrl key held
    pub ctrl: bool,
    /// Shift key held
    pub shift: bool,
    /// Alt key held
    pub alt: bool,
    /// Super (Meta / Windows / Command) key held
    pub super_key: bool,
}

impl Modifiers {
    /// Creates a new Modifiers instance with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds modifier state from the four boolean flags a platform key event carries.
    pub fn from_flags(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        Self {
            ctrl,
            shift,
            alt,
            super_key: meta,
        }
    }

    /// Returns true if no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.super_key)
    }

    /// Names of the held modifiers in canonical order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.ctrl, "ctrl"),
            (self.shift, "shift"),
            (self.alt, "alt"),
            (self.super_key, "super"),
        ]
        .into_iter()
        .filter_map(|(held, name)| held.then_some(name))
        .collect()
    }

    /// Sets a modifier by name. Accepts the usual aliases (`control`, `meta`, `cmd`, `win`).
    /// Returns false if the name is not a modifier.
    pub fn set_by_name(&mut self, name: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => self.ctrl = true,
            "shift" => self.shift = true,
            "alt" | "option" => self.alt = true,
            "super" | "meta" | "cmd" | "win" | "logo" => self.super_key = true,
            _ => return false,
        }
        true
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join("+"))
    }
}

// Serialized as a list of names (`["ctrl", "shift"]`) to match recorded event dumps.
impl Serialize for Modifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.names();
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut modifiers = Modifiers::new();
        for name in &names {
            if !modifiers.set_by_name(name) {
                return Err(de::Error::custom(format!("unknown modifier '{name}'")));
            }
        }
        Ok(modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_canonical_order() {
        let mut modifiers = Modifiers::new();
        modifiers.set_by_name("super");
        modifiers.set_by_name("shift");
        modifiers.set_by_name("ctrl");
        assert_eq!(modifiers.names(), vec!["ctrl", "shift", "super"]);
        assert_eq!(modifiers.to_string(), "ctrl+shift+super");
    }

    #[test]
    fn meta_flag_maps_to_super() {
        let modifiers = Modifiers::from_flags(false, false, false, true);
        assert!(modifiers.super_key);
        assert_eq!(modifiers.names(), vec!["super"]);
    }

    #[test]
    fn empty_modifiers_render_nothing() {
        let modifiers = Modifiers::new();
        assert!(modifiers.is_empty());
        assert_eq!(modifiers.to_string(), "");
    }

    #[test]
    fn deserialize_rejects_unknown_modifier() {
        let result: Result<Modifiers, _> = serde_json::from_str(r#"["ctrl", "hyper"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn serialize_uses_names() {
        let modifiers = Modifiers::from_flags(true, false, true, false);
        let json = serde_json::to_string(&modifiers).unwrap();
        assert_eq!(json, r#"["ctrl","alt"]"#);
    }
}
