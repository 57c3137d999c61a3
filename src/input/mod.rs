//! Input event model shared by the recorder and the script compiler.
//!
//! Sources deliver [`RawInput`] notifications; the recorder normalizes them into
//! [`InputEvent`] values (key presses with their [`Modifiers`], or mouse clicks).

pub mod events;
pub mod modifiers;

// Re-export commonly used types at module level
pub use events::{InputEvent, KeyEvent, MouseButton, MouseEvent, RawInput};
pub use modifiers::Modifiers;
