//! Error types for the degrader application.

use logging::LoggingError;
use media::MediaError;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, DegraderError>;

#[derive(Debug)]
pub enum DegraderError {
    /// Configuration could not be found, parsed or validated
    Config(String),
    /// Failure inside the round trip
    Media(MediaError),
    /// Raw frame I/O failure
    Io(io::Error),
    /// Logger could not be set up
    Logging(LoggingError),
}

impl fmt::Display for DegraderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegraderError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DegraderError::Media(err) => write!(f, "{}", err),
            DegraderError::Io(err) => write!(f, "I/O error: {}", err),
            DegraderError::Logging(err) => write!(f, "Logging error: {}", err),
        }
    }
}

impl std::error::Error for DegraderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DegraderError::Media(err) => Some(err),
            DegraderError::Io(err) => Some(err),
            DegraderError::Logging(err) => Some(err),
            DegraderError::Config(_) => None,
        }
    }
}

impl From<MediaError> for DegraderError {
    fn from(err: MediaError) -> Self {
        DegraderError::Media(err)
    }
}

impl From<io::Error> for DegraderError {
    fn from(err: io::Error) -> Self {
        DegraderError::Io(err)
    }
}

impl From<LoggingError> for DegraderError {
    fn from(err: LoggingError) -> Self {
        DegraderError::Logging(err)
    }
}

impl From<config_loader::ConfigError> for DegraderError {
    fn from(err: config_loader::ConfigError) -> Self {
        DegraderError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DegraderError {
    fn from(err: serde_json::Error) -> Self {
        DegraderError::Config(format!("invalid JSON: {}", err))
    }
}
