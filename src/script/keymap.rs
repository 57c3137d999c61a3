//! Key name translation for the key simulation command.

use std::borrow::Cow;

/// UI key names that the simulation tool spells differently.
///
/// Function keys map to themselves; they are listed so the table documents every
/// name the recorder is known to produce.
pub const KEY_TABLE: &[(&str, &str)] = &[
    (" ", "space"),
    ("Enter", "Return"),
    ("Escape", "Escape"),
    ("Tab", "Tab"),
    ("Backspace", "BackSpace"),
    ("Delete", "Delete"),
    ("Insert", "Insert"),
    ("Home", "Home"),
    ("End", "End"),
    ("PageUp", "Page_Up"),
    ("PageDown", "Page_Down"),
    ("ArrowUp", "Up"),
    ("ArrowDown", "Down"),
    ("ArrowLeft", "Left"),
    ("ArrowRight", "Right"),
    ("PrintScreen", "Print"),
    ("ScrollLock", "Scroll_Lock"),
    ("Pause", "Pause"),
    ("CapsLock", "Caps_Lock"),
    ("NumLock", "Num_Lock"),
    ("ContextMenu", "Menu"),
    ("F1", "F1"),
    ("F2", "F2"),
    ("F3", "F3"),
    ("F4", "F4"),
    ("F5", "F5"),
    ("F6", "F6"),
    ("F7", "F7"),
    ("F8", "F8"),
    ("F9", "F9"),
    ("F10", "F10"),
    ("F11", "F11"),
    ("F12", "F12"),
];

/// Looks up a key in [`KEY_TABLE`].
pub fn lookup(key: &str) -> Option<&'static str> {
    KEY_TABLE
        .iter()
        .find(|(ui_name, _)| *ui_name == key)
        .map(|(_, tool_name)| *tool_name)
}

/// Translates a UI key name to the simulation tool's key name.
///
/// Unmapped single printable characters are lowercased; any other unmapped
/// name passes through unchanged.
pub fn translate_key(key: &str) -> Cow<'_, str> {
    if let Some(mapped) = lookup(key) {
        return Cow::Borrowed(mapped);
    }

    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_control() => Cow::Owned(ch.to_lowercase().collect()),
        _ => Cow::Borrowed(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_translates_to_its_target() {
        for (ui_name, tool_name) in KEY_TABLE {
            assert_eq!(translate_key(ui_name), *tool_name, "key {ui_name:?}");
        }
    }

    #[test]
    fn function_keys_pass_through() {
        for n in 1..=12 {
            let name = format!("F{n}");
            assert_eq!(translate_key(&name), name);
        }
    }

    #[test]
    fn single_characters_are_lowercased() {
        assert_eq!(translate_key("A"), "a");
        assert_eq!(translate_key("z"), "z");
        assert_eq!(translate_key("7"), "7");
        assert_eq!(translate_key("Ä"), "ä");
        assert_eq!(translate_key("/"), "/");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(translate_key("AudioVolumeUp"), "AudioVolumeUp");
        assert_eq!(translate_key("Control"), "Control");
        assert_eq!(translate_key("F13"), "F13");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(lookup("Enter"), Some("Return"));
        assert_eq!(lookup("enter"), None);
    }
}
