use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
    #[serde(default)]
    pub annotation: AnnotationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_keep_recent")]
    pub keep_recent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    pub schema_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    #[serde(default = "default_point_width")]
    pub point_width: u32,
}

// Default value functions
fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_keep_recent() -> usize {
    2
}

fn default_zoom() -> u8 {
    1
}

fn default_point_width() -> u32 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            keep_recent: default_keep_recent(),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self { schema_file: None }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            default_zoom: default_zoom(),
            point_width: default_point_width(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            labels: LabelsConfig::default(),
            annotation: AnnotationConfig::default(),
        }
    }
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pathoscore")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from file, or return default if file doesn't exist
pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };
    if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to parse config file: {e}; using defaults");
                    AppConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read config file: {e}; using defaults");
                AppConfig::default()
            }
        }
    } else {
        AppConfig::default()
    }
}

/// Save configuration to file
pub fn save_config(config: &AppConfig) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "cannot determine config directory".to_string())?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {e}"))?;
    }

    let toml = toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {e}"))?;

    std::fs::write(&path, toml).map_err(|e| format!("Failed to write config file: {e}"))?;

    Ok(path)
}
