//! Degrader configuration

pub mod degrader_config;
pub mod logging_config;
pub mod output_config;
pub mod video_config;

pub use degrader_config::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, DegraderConfig};
pub use logging_config::LoggingConfig;
pub use output_config::OutputConfig;
pub use video_config::VideoConfig;
