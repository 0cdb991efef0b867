//! Media Processing Module
//!
//! Emulates a lossy, bitrate-constrained H.264 channel: planar frames go
//! through a low-latency encoder and straight back through the matching
//! decoder, and the reconstructed (degraded) picture is handed back.

pub mod common;
pub mod error;
pub mod video;

// Re-export commonly used types
pub use error::{MediaError, Result};

pub use video::{
    BgraImage, BitstreamParser, CodecSession, H264Decoder, H264Encoder, H264Parser, H264RoundTrip,
    RoundTrip, RoundTripStats, SessionConfig, VideoDecoder, VideoEncoder, Yuv422Frame,
    open_h264_round_trip,
};

pub use video::converters::{to_native, to_native_into, to_planar, to_planar_into};
