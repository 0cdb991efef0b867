//! Command-line interface.

use crate::config::DegraderConfig;
use clap::Parser;
use std::path::PathBuf;

/// Pushes raw BGRA frames through a low-latency, bitrate-capped H.264
/// encoder and decoder and writes back what survives.
#[derive(Parser, Debug)]
#[command(name = "degrader")]
#[command(version)]
#[command(about = "Emulates a lossy low-bitrate H.264 channel on raw BGRA frames")]
pub struct Args {
    /// Raw BGRA input: width*height*4 bytes per frame, no header
    pub input: PathBuf,

    /// Raw BGRA output in the same layout
    pub output: PathBuf,

    /// JSON configuration file (default: $DEGRADER_CONFIG, ./config/degrader.json, ./degrader.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frame width in pixels (must be even)
    #[arg(long)]
    pub width: Option<usize>,

    /// Frame height in pixels
    #[arg(long)]
    pub height: Option<usize>,

    /// Target bitrate in bits per second
    #[arg(short, long)]
    pub bitrate: Option<u32>,

    /// Frame rate the encoder is timed for
    #[arg(long)]
    pub fps: Option<u32>,

    /// Write nothing for frames that could not be decoded yet
    #[arg(long)]
    pub skip_filler: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Overrides file settings with whatever was given on the command line.
    pub fn apply_to(&self, config: &mut DegraderConfig) {
        if let Some(width) = self.width {
            config.video.width = width;
        }
        if let Some(height) = self.height {
            config.video.height = height;
        }
        if let Some(bitrate) = self.bitrate {
            config.video.bitrate = bitrate;
        }
        if let Some(fps) = self.fps {
            config.video.fps = fps;
        }
        if self.skip_filler {
            config.output.emit_filler = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let args = Args::try_parse_from(["degrader", "in.bgra", "out.bgra"]).unwrap();

        assert_eq!(args.input, PathBuf::from("in.bgra"));
        assert_eq!(args.output, PathBuf::from("out.bgra"));
        assert!(args.config.is_none());
        assert!(!args.skip_filler);
    }

    #[test]
    fn test_missing_output_is_rejected() {
        assert!(Args::try_parse_from(["degrader", "in.bgra"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let args = Args::try_parse_from([
            "degrader",
            "in.bgra",
            "out.bgra",
            "--width",
            "320",
            "--height",
            "240",
            "-b",
            "100000",
            "--fps",
            "30",
            "--skip-filler",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let mut config = DegraderConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.video.width, 320);
        assert_eq!(config.video.height, 240);
        assert_eq!(config.video.bitrate, 100_000);
        assert_eq!(config.video.fps, 30);
        assert!(!config.output.emit_filler);
        assert_eq!(config.logging.log_level, "debug");
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let args = Args::try_parse_from(["degrader", "a", "b"]).unwrap();
        let mut config = DegraderConfig::default();
        config.video.width = 640;
        args.apply_to(&mut config);

        assert_eq!(config.video.width, 640);
        assert!(config.output.emit_filler);
    }
}
