use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Print debug output, including placeholder and menu registrations.
    pub debug: bool,
    pub threads: bool,
    pub color: bool,
    pub timestamp: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debug: false,
            threads: true,
            color: true,
            timestamp: true,
        }
    }
}
