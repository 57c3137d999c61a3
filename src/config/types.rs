//! Configuration type definitions.

use crate::script::{self, ScriptFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PathsConfig {
    /// Root of the action tree watched by the daemon (`buttons/`, `dials/`, `touchscreen/`).
    /// A leading `~/` is expanded to the home directory.
    #[serde(default = "default_actions_dir")]
    pub actions_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            actions_dir: default_actions_dir(),
        }
    }
}

/// Generated script settings.
///
/// Controls the header and the simulation commands written for recorded macros.
/// The defaults target `xdotool`; `ydotool` works as a drop-in on Wayland.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScriptConfig {
    /// Interpreter line written at the top of every generated script (must start with `#!`)
    #[serde(default = "default_shebang")]
    pub shebang: String,

    /// Text of the `# Description:` comment; empty omits the line
    #[serde(default = "default_description")]
    pub description: String,

    /// Command used to replay a key press; the key chord is appended in quotes
    #[serde(default = "default_key_command")]
    pub key_command: String,

    /// Command used to replay a mouse click; the button number (1-3) is appended
    #[serde(default = "default_click_command")]
    pub click_command: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            shebang: default_shebang(),
            description: default_description(),
            key_command: default_key_command(),
            click_command: default_click_command(),
        }
    }
}

impl ScriptConfig {
    pub fn format(&self) -> ScriptFormat {
        ScriptFormat {
            shebang: self.shebang.clone(),
            description: self.description.clone(),
            key_command: self.key_command.clone(),
            click_command: self.click_command.clone(),
        }
    }
}

/// External daemon integration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DaemonConfig {
    /// Command that makes the daemon pick up changes; empty disables reloading
    #[serde(default = "default_reload_command")]
    pub reload_command: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            reload_command: default_reload_command(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

pub(crate) fn default_actions_dir() -> String {
    "~/streamdeck-actions".to_string()
}

pub(crate) fn default_shebang() -> String {
    script::DEFAULT_SHEBANG.to_string()
}

fn default_description() -> String {
    script::DEFAULT_DESCRIPTION.to_string()
}

pub(crate) fn default_key_command() -> String {
    script::DEFAULT_KEY_COMMAND.to_string()
}

pub(crate) fn default_click_command() -> String {
    script::DEFAULT_CLICK_COMMAND.to_string()
}

fn default_reload_command() -> String {
    "systemctl --user restart streamdeck".to_string()
}
