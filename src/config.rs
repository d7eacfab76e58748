use anyhow::Result;
use autosmith_world::TriggerMode;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/autosmith.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AutosmithConfig {
    /// `rising_edge` crafts once per press stroke, `level` on every tick the head is down.
    pub trigger_mode: TriggerMode,
    /// Rotational speed given to presses placed without an explicit rpm.
    pub press_rpm: f32,
    /// Whether placed presses cycle continuously.
    pub press_repeat: bool,
    /// Smithing recipe JSON. Built-in netherite upgrades when unset.
    pub recipes_path: Option<PathBuf>,
    /// Hard stop for headless runs.
    pub max_ticks: u64,
    /// Station save file written by `save` commands and at exit.
    pub save_path: Option<PathBuf>,
    /// JSONL event log.
    pub events_path: Option<PathBuf>,
}

impl Default for AutosmithConfig {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::RisingEdge,
            press_rpm: 64.0,
            press_repeat: false,
            recipes_path: None,
            max_ticks: 2_400,
            save_path: None,
            events_path: None,
        }
    }
}

impl AutosmithConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AutosmithConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AutosmithConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else if path != Path::new(DEFAULT_CONFIG_PATH) {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                AutosmithConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
