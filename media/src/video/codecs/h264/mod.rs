//! H.264 (AVC) codec implementation
//!
//! Encoder (libx264), decoder and Annex-B access-unit parser, all through
//! FFmpeg and all configured for planar 4:2:2.

pub mod decoder;
pub mod encoder;
pub mod parser;

pub use decoder::H264Decoder;
pub use encoder::H264Encoder;
pub use parser::H264Parser;
