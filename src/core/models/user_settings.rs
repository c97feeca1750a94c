use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Dark => write!(f, "Dark"),
            ThemeMode::Light => write!(f, "Light"),
        }
    }
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Dark
    }
}

fn default_capture_count() -> u32 {
    global_constants::DEFAULT_CAPTURE_COUNT
}

fn default_interval_seconds() -> f64 {
    global_constants::DEFAULT_CAPTURE_INTERVAL.as_secs_f64()
}

fn default_key_name() -> String {
    global_constants::DEFAULT_KEY_NAME.to_string()
}

fn default_preparation_delay_seconds() -> f64 {
    global_constants::PREPARATION_DELAY.as_secs_f64()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    #[serde(default)]
    pub theme_mode: ThemeMode,
    #[serde(default = "default_capture_count")]
    pub capture_count: u32,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: f64,
    #[serde(default = "default_key_name")]
    pub key_name: String,
    #[serde(default = "default_preparation_delay_seconds")]
    pub preparation_delay_seconds: f64,
    #[serde(default = "default_true")]
    pub use_key_helper: bool,
    #[serde(default)]
    pub screenshots_directory: Option<PathBuf>,
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            capture_count: default_capture_count(),
            interval_seconds: default_interval_seconds(),
            key_name: default_key_name(),
            preparation_delay_seconds: default_preparation_delay_seconds(),
            use_key_helper: true,
            screenshots_directory: None,
            output_directory: None,
        }
    }
}

impl UserSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::settings_file_path()?;
        Self::load_from(&settings_path)
    }

    pub fn load_from(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            let default_settings = Self::default();
            default_settings.save_to(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)?;
        let settings: UserSettings = serde_json::from_str(&contents)?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!(
            "[SETTINGS] count={}, interval={}s, key={}",
            settings.capture_count,
            settings.interval_seconds,
            settings.key_name
        );

        Ok(settings)
    }

    pub fn save_to(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_seconds)
            .unwrap_or(global_constants::DEFAULT_CAPTURE_INTERVAL)
    }

    pub fn preparation_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.preparation_delay_seconds)
            .unwrap_or(global_constants::PREPARATION_DELAY)
    }

    pub fn screenshots_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.screenshots_directory {
            Some(directory) => Ok(directory.clone()),
            None => Ok(Self::get_data_directory()?
                .join(global_constants::SCREENSHOTS_DIRECTORY_NAME)),
        }
    }

    pub fn output_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.output_directory {
            Some(directory) => Ok(directory.clone()),
            None => Ok(Self::get_data_directory()?.join(global_constants::OUTPUT_DIRECTORY_NAME)),
        }
    }

    fn get_data_directory() -> anyhow::Result<PathBuf> {
        Ok(dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?
            .join(global_constants::APPLICATION_DIRECTORY_NAME))
    }

    pub fn settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
