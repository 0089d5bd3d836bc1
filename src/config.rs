use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::navigator::OverflowPolicy;
use crate::render::Theme;

const CONFIG_PATH_ENV_VAR: &str = "ALMANAC_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("almanac").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".almanac.toml"));
    }

    locations
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub overflow: OverflowPolicy,
    pub clear_screen: bool,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            overflow: OverflowPolicy::default(),
            clear_screen: true,
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Config::from_toml(&content).map_err(|e| {
            let message = format!("{} ({})", e, path.display());
            e.with_msg(&message)
        })
    }
}

/// Loads `path` if given, otherwise the first existing file of the usual
/// config locations. Without any config file the defaults are used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => {
            log::info!("Using config file '{}'", location.display());
            Config::load(&location)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
