use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; empty logs to stderr only
    pub log_file_path: String,
    pub log_level: String,
    /// Echo file records to stderr
    pub enable_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_file_path: "degrader.log".to_string(),
            log_level: "info".to_string(),
            enable_console: true,
        }
    }
}
