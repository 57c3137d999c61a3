//! Element identifiers and their file naming convention.
//!
//! Every configurable input on the device maps to a file stem inside one of the
//! action subdirectories:
//!
//! | Element                | Stem                     | Directory      |
//! |------------------------|--------------------------|----------------|
//! | button 1-8             | `button-3`               | `buttons/`     |
//! | dial 1-4 + gesture     | `dial-2-cw`              | `dials/`       |
//! | touch zone 1-4 tap     | `touch-1`                | `touchscreen/` |
//! | touch zone + gesture   | `touch-1-swipe-up`       | `touchscreen/` |
//! | long swipe across strip| `longswipe-left`         | `touchscreen/` |

use super::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BUTTON_COUNT: u8 = 8;
pub const DIAL_COUNT: u8 = 4;
pub const TOUCH_ZONE_COUNT: u8 = 4;

/// Dial gestures, each with its own script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialAction {
    Clockwise,
    CounterClockwise,
    Press,
    LongPress,
}

impl DialAction {
    pub const ALL: [DialAction; 4] = [
        DialAction::Clockwise,
        DialAction::CounterClockwise,
        DialAction::Press,
        DialAction::LongPress,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            DialAction::Clockwise => "cw",
            DialAction::CounterClockwise => "ccw",
            DialAction::Press => "press",
            DialAction::LongPress => "longpress",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.suffix() == suffix)
    }
}

/// Touch zone gestures. `Tap` uses the bare zone stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchAction {
    Tap,
    LongPress,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
}

impl TouchAction {
    pub const ALL: [TouchAction; 6] = [
        TouchAction::Tap,
        TouchAction::LongPress,
        TouchAction::SwipeUp,
        TouchAction::SwipeDown,
        TouchAction::SwipeLeft,
        TouchAction::SwipeRight,
    ];

    pub fn suffix(self) -> Option<&'static str> {
        match self {
            TouchAction::Tap => None,
            TouchAction::LongPress => Some("longpress"),
            TouchAction::SwipeUp => Some("swipe-up"),
            TouchAction::SwipeDown => Some("swipe-down"),
            TouchAction::SwipeLeft => Some("swipe-left"),
            TouchAction::SwipeRight => Some("swipe-right"),
        }
    }

    fn from_suffix(suffix: Option<&str>) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.suffix() == suffix)
    }
}

/// Direction of a swipe across the whole touch strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeSide {
    Left,
    Right,
}

/// Which action subdirectory an element lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Button,
    Dial,
    Touch,
}

impl ElementKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            ElementKind::Button => "buttons",
            ElementKind::Dial => "dials",
            ElementKind::Touch => "touchscreen",
        }
    }

    /// Elements of this kind that own a display: the buttons, or the touch zones.
    pub fn display_elements(self) -> Vec<ElementId> {
        match self {
            ElementKind::Button => (1..=BUTTON_COUNT).map(ElementId::Button).collect(),
            ElementKind::Touch => (1..=TOUCH_ZONE_COUNT)
                .map(|zone| ElementId::Touch(zone, TouchAction::Tap))
                .collect(),
            ElementKind::Dial => Vec::new(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Button => "buttons",
            ElementKind::Dial => "dials",
            ElementKind::Touch => "touch zones",
        })
    }
}

/// One scriptable input on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Button(u8),
    Dial(u8, DialAction),
    Touch(u8, TouchAction),
    LongSwipe(SwipeSide),
}

impl ElementId {
    /// Every element in display order: buttons, dials, touch zones, long swipes.
    pub fn all() -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = (1..=BUTTON_COUNT).map(ElementId::Button).collect();
        for dial in 1..=DIAL_COUNT {
            ids.extend(DialAction::ALL.map(|action| ElementId::Dial(dial, action)));
        }
        for zone in 1..=TOUCH_ZONE_COUNT {
            ids.extend(TouchAction::ALL.map(|action| ElementId::Touch(zone, action)));
        }
        ids.push(ElementId::LongSwipe(SwipeSide::Left));
        ids.push(ElementId::LongSwipe(SwipeSide::Right));
        ids
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementId::Button(_) => ElementKind::Button,
            ElementId::Dial(..) => ElementKind::Dial,
            ElementId::Touch(..) | ElementId::LongSwipe(_) => ElementKind::Touch,
        }
    }

    /// File stem of the element's script (`button-3`, `dial-2-cw`, `touch-1-longpress`).
    pub fn stem(&self) -> String {
        match self {
            ElementId::Button(n) => format!("button-{n}"),
            ElementId::Dial(n, action) => format!("dial-{n}-{}", action.suffix()),
            ElementId::Touch(n, action) => match action.suffix() {
                Some(suffix) => format!("touch-{n}-{suffix}"),
                None => format!("touch-{n}"),
            },
            ElementId::LongSwipe(SwipeSide::Left) => "longswipe-left".to_string(),
            ElementId::LongSwipe(SwipeSide::Right) => "longswipe-right".to_string(),
        }
    }

    /// Stem of the label/position/font-size/image files, for elements that show
    /// something on the device. All gestures of a touch zone share one display.
    pub fn display_stem(&self) -> Option<String> {
        match self {
            ElementId::Button(n) => Some(format!("button-{n}")),
            ElementId::Touch(n, _) => Some(format!("touch-{n}")),
            ElementId::Dial(..) | ElementId::LongSwipe(_) => None,
        }
    }

    /// True for the element that owns the display attributes (button, zone tap).
    pub fn owns_display(&self) -> bool {
        matches!(
            self,
            ElementId::Button(_) | ElementId::Touch(_, TouchAction::Tap)
        )
    }

    /// Label position used when none is stored: bottom on buttons, middle on touch zones.
    pub fn default_text_position(&self) -> Option<TextPosition> {
        match self {
            ElementId::Button(_) => Some(TextPosition::Bottom),
            ElementId::Touch(..) => Some(TextPosition::Middle),
            ElementId::Dial(..) | ElementId::LongSwipe(_) => None,
        }
    }

    /// Font size bounds and default for the element's label.
    pub fn font_size_limits(&self) -> Option<FontSizeLimits> {
        match self {
            ElementId::Button(_) => Some(FontSizeLimits {
                min: 10,
                max: 60,
                default: 24,
            }),
            ElementId::Touch(..) => Some(FontSizeLimits {
                min: 10,
                max: 60,
                default: 28,
            }),
            ElementId::Dial(..) | ElementId::LongSwipe(_) => None,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

impl FromStr for ElementId {
    type Err = LayoutError;

    /// Parses the stem form (`button-3`, `dial-2-ccw`, `touch-4-swipe-left`, `longswipe-right`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let invalid = |reason: &str| LayoutError::InvalidElement(s.to_string(), reason.to_string());

        match input.as_str() {
            "longswipe-left" => return Ok(ElementId::LongSwipe(SwipeSide::Left)),
            "longswipe-right" => return Ok(ElementId::LongSwipe(SwipeSide::Right)),
            _ => {}
        }

        let (kind, rest) = input
            .split_once('-')
            .ok_or_else(|| invalid("expected <kind>-<number>[-<gesture>]"))?;
        let (number, suffix) = match rest.split_once('-') {
            Some((number, suffix)) => (number, Some(suffix)),
            None => (rest, None),
        };
        let index: u8 = number
            .parse()
            .map_err(|_| invalid("element number is not a number"))?;

        let check_range = |max: u8| {
            if (1..=max).contains(&index) {
                Ok(index)
            } else {
                Err(invalid(&format!("number must be between 1 and {max}")))
            }
        };

        match kind {
            "button" => {
                let index = check_range(BUTTON_COUNT)?;
                match suffix {
                    None => Ok(ElementId::Button(index)),
                    Some(_) => Err(invalid("buttons have no gestures")),
                }
            }
            "dial" => {
                let index = check_range(DIAL_COUNT)?;
                let suffix =
                    suffix.ok_or_else(|| invalid("dials need a gesture: cw, ccw, press, longpress"))?;
                DialAction::from_suffix(suffix)
                    .map(|action| ElementId::Dial(index, action))
                    .ok_or_else(|| invalid("unknown dial gesture (cw, ccw, press, longpress)"))
            }
            "touch" => {
                let index = check_range(TOUCH_ZONE_COUNT)?;
                TouchAction::from_suffix(suffix)
                    .map(|action| ElementId::Touch(index, action))
                    .ok_or_else(|| {
                        invalid("unknown touch gesture (longpress, swipe-up, swipe-down, swipe-left, swipe-right)")
                    })
            }
            _ => Err(invalid("kind must be button, dial, touch or longswipe")),
        }
    }
}

/// Allowed label font sizes for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizeLimits {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl FontSizeLimits {
    pub fn contains(&self, size: u32) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

/// Vertical placement of a label on its key or zone.
///
/// The default depends on the element, see [`ElementId::default_text_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextPosition {
    Top,
    Middle,
    Bottom,
}

impl TextPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            TextPosition::Top => "top",
            TextPosition::Middle => "middle",
            TextPosition::Bottom => "bottom",
        }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(TextPosition::Top),
            "middle" => Ok(TextPosition::Middle),
            "bottom" => Ok(TextPosition::Bottom),
            other => Err(format!(
                "invalid text position '{other}' (expected top, middle or bottom)"
            )),
        }
    }
}
