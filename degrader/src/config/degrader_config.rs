use crate::config::{LoggingConfig, OutputConfig, VideoConfig};
use crate::error::{DegraderError, Result};
use logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File searched for when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "degrader.json";
/// Environment variable that may point at the configuration file
pub const CONFIG_ENV_VAR: &str = "DEGRADER_CONFIG";

/// Degrader configuration
///
/// Every section and field is optional in the JSON file; missing ones take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegraderConfig {
    pub video: VideoConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

impl DegraderConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = config_loader::load_config_file(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Finds [`CONFIG_FILE_NAME`] via `$DEGRADER_CONFIG`, `./config/` or `./`.
    pub fn locate() -> Option<PathBuf> {
        config_loader::find_config_file(CONFIG_FILE_NAME, CONFIG_ENV_VAR).ok()
    }

    /// Checks every value the round trip and the logger depend on.
    ///
    /// Video settings go through [`media::SessionConfig::validate`].
    pub fn validate(&self) -> Result<()> {
        self.video
            .session_config()
            .validate()
            .map_err(|e| DegraderError::Config(e.to_string()))?;

        self.logging.log_level.parse::<LogLevel>()?;
        Ok(())
    }
}
