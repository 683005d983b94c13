//! Application configuration

use crate::catalog::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub layout: LayoutConfig,
    pub thumbnails: ThumbnailConfig,
    pub window: WindowConfig,
    pub theme: ThemeConfig,
}

/// Remote catalog access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: concat!("meal_explorer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Grid column counts per list kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub category_columns: usize,
    pub area_columns: usize,
    pub meal_list_columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            category_columns: 6,
            area_columns: 4,
            meal_list_columns: 1,
        }
    }
}

/// Square thumbnail edge lengths in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub detail_size: u32,
    pub category_size: u32,
    pub list_size: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            detail_size: 300,
            category_size: 100,
            list_size: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Image drawn behind the welcome screen
    pub welcome_background: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Food Fiesta".to_string(),
            width: 900,
            height: 700,
            resizable: false,
            welcome_background: None,
        }
    }
}

/// Color palette as hex strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub highlight: String,
    pub text: String,
    pub text_secondary: String,
    pub button: String,
    pub button_hover: String,
    pub panel: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#1A1A2E".to_string(),
            secondary: "#16213E".to_string(),
            accent: "#0F3460".to_string(),
            highlight: "#E94560".to_string(),
            text: "#FFFFFF".to_string(),
            text_secondary: "#B2B2B2".to_string(),
            button: "#E94560".to_string(),
            button_hover: "#D63655".to_string(),
            panel: "#1E3C72".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, writing defaults on first run
    pub fn load_or_init() -> Result<Self, ConfigError> {
        Self::load_or_init_at(&Self::config_path())
    }

    /// Load from `path`; a missing file is created with the defaults so users
    /// have something to edit. Failing to write it is not fatal.
    pub fn load_or_init_at(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not write default configuration to {:?}: {}", path, e);
        }
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "FoodieFiesta", "MealExplorer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}
