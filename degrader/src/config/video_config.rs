use media::SessionConfig;
use serde::{Deserialize, Serialize};

/// Video session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub width: usize,
    pub height: usize,
    pub fps: u32,
    /// Target bitrate in bits per second
    pub bitrate: u32,
    pub gop: u32,
    pub qmin: i32,
    pub qmax: i32,
    pub preset: String,
    pub tune: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        VideoConfig {
            width: session.width,
            height: session.height,
            fps: session.fps,
            bitrate: session.bitrate,
            gop: session.gop,
            qmin: session.qmin,
            qmax: session.qmax,
            preset: session.preset,
            tune: session.tune,
        }
    }
}

impl VideoConfig {
    /// Session parameters for the round trip.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            width: self.width,
            height: self.height,
            bitrate: self.bitrate,
            fps: self.fps,
            gop: self.gop,
            qmin: self.qmin,
            qmax: self.qmax,
            preset: self.preset.clone(),
            tune: self.tune.clone(),
        }
    }
}
