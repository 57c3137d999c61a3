//! Recordable input event types.
//!
//! Input sources map their native notifications to [`RawInput`]; the recorder
//! normalizes those into [`InputEvent`] values, which is all the script
//! compiler ever sees.

use super::modifiers::Modifiers;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete key press, in the order it was pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Logical key name (`"a"`, `"Enter"`, `"ArrowUp"`, `" "`)
    pub key: String,
    /// Physical key code (`"KeyA"`, `"Enter"`); informational only
    #[serde(default)]
    pub code: String,
    /// Modifiers held at the moment of the press
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, code: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            modifiers,
        }
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Maps a platform button ordinal (0 = left, 1 = middle, 2 = right).
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    /// Button number understood by the click simulation command.
    pub fn click_code(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }
}

/// One discrete mouse click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub button: MouseButton,
}

/// A recorded input event. Position in the sequence is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl InputEvent {
    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        InputEvent::Key(KeyEvent::new(key, "", modifiers))
    }

    pub fn mouse(button: MouseButton) -> Self {
        InputEvent::Mouse(MouseEvent { button })
    }

    /// Normalizes a raw platform notification.
    ///
    /// Returns `None` for mouse ordinals outside left/middle/right, which are not
    /// recordable. Key repeats are passed through untouched.
    pub fn from_raw(raw: RawInput) -> Option<Self> {
        match raw {
            RawInput::KeyDown {
                key,
                code,
                ctrl,
                shift,
                alt,
                meta,
            } => Some(InputEvent::Key(KeyEvent {
                key,
                code,
                modifiers: Modifiers::from_flags(ctrl, shift, alt, meta),
            })),
            RawInput::MouseDown { ordinal } => MouseButton::from_ordinal(ordinal).map(Self::mouse),
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEvent::Key(event) => {
                let key = if event.key == " " { "Space" } else { &event.key };
                if event.modifiers.is_empty() {
                    write!(f, "Key: {key}")
                } else {
                    write!(f, "Key: {}+{key}", event.modifiers)
                }
            }
            InputEvent::Mouse(event) => write!(f, "Mouse: {} click", event.button.name()),
        }
    }
}

/// Raw notification delivered by an input source before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    KeyDown {
        key: String,
        code: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    },
    MouseDown {
        ordinal: u8,
    },
}
