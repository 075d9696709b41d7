use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use std::{fs, io, path::Path};

pub mod logging;
pub mod menus;
pub mod placeholders;

pub use logging::LoggingConfig;
pub use menus::MenuConfig;
pub use placeholders::PlaceholderConfig;

const CONFIG_ROOT_FOLDER: &str = "config/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't access configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("Couldn't parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the menu backend can be tuned with.
///
/// The defaults are what most servers want; the file only needs the
/// sections that differ.
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ChestMenuConfig {
    pub logging: LoggingConfig,
    pub placeholders: PlaceholderConfig,
    pub menus: MenuConfig,
}

pub trait LoadConfiguration {
    /// Reads the configuration below `exec_dir/config/`, writing the
    /// defaults there first if the file doesn't exist yet.
    fn load(exec_dir: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config_dir = exec_dir.join(CONFIG_ROOT_FOLDER);
        if !config_dir.exists() {
            log::debug!("creating new config root folder");
            fs::create_dir_all(&config_dir)?;
        }
        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let file_content = fs::read_to_string(&path)?;
            toml::from_str(&file_content)?
        } else {
            let content = Self::default();

            match toml::to_string(&content) {
                Ok(serialized) => {
                    if let Err(err) = fs::write(&path, serialized) {
                        warn!("Couldn't write default config to {:?}. Reason: {}", &path, err);
                    }
                }
                Err(err) => warn!("Couldn't serialize default config. Reason: {}", err),
            }

            content
        };

        config.validate()?;
        Ok(config)
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadConfiguration for ChestMenuConfig {
    fn get_path() -> &'static Path {
        Path::new("chestmenu.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.menus.tps.is_finite() && self.menus.tps > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "menus.tps must be a positive number, got {}",
                self.menus.tps
            )));
        }
        if self.menus.tps > 1000.0 {
            return Err(ConfigError::Invalid(
                "menus.tps must not exceed 1000".to_string(),
            ));
        }
        Ok(())
    }
}
