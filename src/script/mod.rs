//! Compiles recorded input into replayable shell scripts.
//!
//! A compiled script is a shebang header followed by exactly one simulation
//! command per recorded event, in recording order:
//!
//! ```text
//! #!/bin/bash
//! # Description: Recorded input sequence
//! # Generated by deckconf
//!
//! xdotool key "ctrl+shift+t"
//! xdotool click 1
//! ```
//!
//! Compilation is a pure function of the event sequence and the [`ScriptFormat`].

pub mod keymap;


pub use keymap::{KEY_TABLE, translate_key};

use crate::input::{InputEvent, KeyEvent};

pub const DEFAULT_SHEBANG: &str = "#!/bin/bash";
pub const DEFAULT_DESCRIPTION: &str = "Recorded input sequence";
pub const DEFAULT_KEY_COMMAND: &str = "xdotool key";
pub const DEFAULT_CLICK_COMMAND: &str = "xdotool click";

/// Shape of the generated script: header lines and the simulation commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFormat {
    pub shebang: String,
    pub description: String,
    pub key_command: String,
    pub click_command: String,
}

impl Default for ScriptFormat {
    fn default() -> Self {
        Self {
            shebang: DEFAULT_SHEBANG.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            key_command: DEFAULT_KEY_COMMAND.to_string(),
            click_command: DEFAULT_CLICK_COMMAND.to_string(),
        }
    }
}

impl ScriptFormat {
    /// Header block emitted before the first command.
    pub fn header(&self) -> String {
        let mut header = String::new();
        header.push_str(&self.shebang);
        header.push('\n');
        if !self.description.is_empty() {
            header.push_str("# Description: ");
            header.push_str(&self.description);
            header.push('\n');
        }
        header.push_str("# Generated by deckconf\n\n");
        header
    }

    /// Renders the command line for a single event (without trailing newline).
    pub fn command_line(&self, event: &InputEvent) -> String {
        match event {
            InputEvent::Key(key) => {
                format!("{} \"{}\"", self.key_command, quote_argument(&key_argument(key)))
            }
            InputEvent::Mouse(mouse) => {
                format!("{} {}", self.click_command, mouse.button.click_code())
            }
        }
    }

    /// Compiles an event sequence. Never fails; an empty sequence yields the header only.
    pub fn compile(&self, events: &[InputEvent]) -> String {
        let mut script = self.header();
        for event in events {
            script.push_str(&self.command_line(event));
            script.push('\n');
        }
        script
    }
}

/// Compiles an event sequence with the default `xdotool` format.
pub fn compile(events: &[InputEvent]) -> String {
    ScriptFormat::default().compile(events)
}

/// Key argument for the key simulation command, e.g. `ctrl+shift+t` or `Return`.
pub fn key_argument(event: &KeyEvent) -> String {
    let key = translate_key(&event.key);
    if event.modifiers.is_empty() {
        key.into_owned()
    } else {
        format!("{}+{}", event.modifiers, key)
    }
}

/// Escapes a value for interpolation between double quotes in a shell script.
///
/// Backslash, double quote, dollar and backtick are escaped; control characters
/// are dropped since no key simulation tool accepts them in a key name.
pub fn quote_argument(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '"' | '$' | '`' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            c if c.is_control() => {}
            c => quoted.push(c),
        }
    }
    quoted
}

/// Number of command lines in a compiled script (lines after the header).
pub fn command_count(script: &str) -> usize {
    script
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count()
}

const SUMMARY_WIDTH: usize = 50;

/// One-line summary of a script for listings.
///
/// Uses the `# Description:` header when present, otherwise the first command
/// line cut to 50 characters. `None` for a script without either.
pub fn summary(script: &str) -> Option<String> {
    let described = script
        .lines()
        .filter_map(|line| line.strip_prefix("# Description:"))
        .map(str::trim)
        .find(|text| !text.is_empty());
    if let Some(text) = described {
        return Some(text.to_string());
    }

    let first = script
        .lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))?;
    if first.chars().count() > SUMMARY_WIDTH {
        let cut: String = first.chars().take(SUMMARY_WIDTH).collect();
        Some(format!("{cut}..."))
    } else {
        Some(first.to_string())
    }
}
