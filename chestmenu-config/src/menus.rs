use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MenuConfig {
    /// Whether menus with a refresh period are refreshed in the background.
    pub auto_refresh: bool,
    /// Ticks per second used to turn refresh periods into wall time.
    pub tps: f32,
    /// Translate `&` color codes in icon names and lore.
    pub translate_colors: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            tps: 20.0,
            translate_colors: true,
        }
    }
}
