use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name used for user- and project-level config
const CONFIG_DIR: &str = ".capmatrix";

/// Where assessment state lives
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Which catalog to load; the built-in one when unset
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Report delivery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Directory CSV files are written to (default: current directory)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// chrono format for the date in the report title
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Clipboard helper command line, e.g. "xclip -selection clipboard"
    #[serde(default)]
    pub clipboard_command: Option<String>,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: None,
            date_format: default_date_format(),
            clipboard_command: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "capmatrix=debug"
    #[serde(default)]
    pub level: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Same shape as [`Config`] with every field optional, so a layer only
/// overrides what it actually sets.
#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigLayer {
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    catalog: CatalogConfig,
    #[serde(default)]
    export: ExportLayer,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ExportLayer {
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    date_format: Option<String>,
    #[serde(default)]
    clipboard_command: Option<String>,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.capmatrix/config.local.toml) > project (.capmatrix/config.toml)
    /// > user (~/.capmatrix/config.toml) > built-in defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                config.merge_file(&user_config)?;
            }
        }

        let project_config = Path::new(CONFIG_DIR).join("config.toml");
        if project_config.exists() {
            config.merge_file(&project_config)?;
        }

        // Should be gitignored
        let local_config = Path::new(CONFIG_DIR).join("config.local.toml");
        if local_config.exists() {
            config.merge_file(&local_config)?;
        }

        Ok(config)
    }

    /// Layer a specific file over the current values
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let layer: ConfigLayer = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config layer loaded");
        self.merge(layer);
        Ok(())
    }

    /// Merge another layer into this one (other takes priority for every
    /// field it sets)
    fn merge(&mut self, other: ConfigLayer) {
        if other.storage.dir.is_some() {
            self.storage.dir = other.storage.dir;
        }
        if other.catalog.path.is_some() {
            self.catalog.path = other.catalog.path;
        }
        if other.export.dir.is_some() {
            self.export.dir = other.export.dir;
        }
        if let Some(format) = other.export.date_format {
            self.export.date_format = format;
        }
        if other.export.clipboard_command.is_some() {
            self.export.clipboard_command = other.export.clipboard_command;
        }
        if other.logging.level.is_some() {
            self.logging.level = other.logging.level;
        }
    }

    /// Directory CSV exports go to
    pub fn export_dir(&self) -> PathBuf {
        self.export.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
