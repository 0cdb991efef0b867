use serde::{Deserialize, Serialize};

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the blank picture for cycles that decoded nothing. When off,
    /// such cycles write nothing and the output has fewer frames than the
    /// input.
    pub emit_filler: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { emit_filler: true }
    }
}
