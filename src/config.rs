use crate::alarm::{DEFAULT_NAG_MINUTES, DEFAULT_POLL_SECONDS};
use crate::parser::ParserConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub parser: ParserSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding tasks.json; the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub poll_seconds: u64,
    pub nag_minutes: i64,
    pub daily_reset: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            poll_seconds: DEFAULT_POLL_SECONDS,
            nag_minutes: DEFAULT_NAG_MINUTES,
            daily_reset: true,
        }
    }
}

/// Additions to the built-in normalizer tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    pub extra_stopwords: Vec<String>,
    pub extra_misrecognitions: BTreeMap<String, String>,
}

impl Config {
    /// Load from the default location, creating it with defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Directory for task data, honouring the `[storage]` override
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

impl From<&Config> for ParserConfig {
    fn from(config: &Config) -> Self {
        let mut parser = ParserConfig::default();
        parser.stopwords.extend(config.parser.extra_stopwords.iter().map(|s| s.to_lowercase()));
        parser.misrecognitions.extend(
            config
                .parser
                .extra_misrecognitions
                .iter()
                .map(|(wrong, right)| (wrong.to_lowercase(), right.to_lowercase())),
        );
        parser
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "voxtask", "voxtask").context("Failed to determine config directory")
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}
