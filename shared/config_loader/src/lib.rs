//! # Config Loader
//!
//! Locates and reads configuration files. Parsing is left to the caller.
//!
//! ```no_run
//! use config_loader::{find_and_load, load_config_file};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Search DEGRADER_CONFIG, ./config/ and ./
//!     let content = find_and_load("degrader.json", "DEGRADER_CONFIG")?;
//!
//!     // Or read an explicit path
//!     let content = load_config_file("./config/degrader.json")?;
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the whole file at `path` as UTF-8 text.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
}

/// Returns the locations searched for `filename`, in priority order:
///
/// 1. The path held by the `env_var` environment variable, if set
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn candidate_paths(filename: &str, env_var: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    if let Ok(path) = env::var(env_var) {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("./config").join(filename));
    candidates.push(PathBuf::from("./").join(filename));
    candidates
}

/// Finds the first existing file among [`candidate_paths`].
pub fn find_config_file(filename: &str, env_var: &str) -> Result<PathBuf> {
    candidate_paths(filename, env_var)
        .into_iter()
        .find(|path| path.is_file())
        .ok_or_else(|| {
            ConfigError::FileNotFound(format!(
                "'{}' not found. Searched: ${} env var, ./config/{}, ./{}",
                filename, env_var, filename, filename
            ))
        })
}

/// Combines [`find_config_file`] and [`load_config_file`].
pub fn find_and_load(filename: &str, env_var: &str) -> Result<String> {
    let path = find_config_file(filename, env_var)?;
    load_config_file(path)
}
