use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Whether icons that enable placeholders get them replaced at all.
    pub enabled: bool,
    /// Registers `{player}` and `{player_uuid}` on startup.
    pub builtin: bool,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            builtin: true,
        }
    }
}
