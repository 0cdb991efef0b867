//! Video codecs module
//!
//! FFmpeg-backed implementations of the round-trip collaborators.

pub mod h264;

pub use h264::{H264Decoder, H264Encoder, H264Parser};
