//! Video processing module
//!
//! Frame types, pixel-format conversion, the H.264 codec backend and the
//! encode/decode round trip built on top of it.

pub mod codecs;
pub mod constants;
pub mod converters;
pub mod degrader;
pub mod frame;
pub mod traits;
pub mod transfer;
pub mod utils;

// Re-exports
pub use codecs::{H264Decoder, H264Encoder, H264Parser};
pub use degrader::{
    CodecSession, H264RoundTrip, RoundTrip, RoundTripStats, SessionConfig, open_h264_round_trip,
};
pub use frame::{BgraImage, Yuv422Frame};
pub use traits::{BitstreamParser, VideoDecoder, VideoEncoder};
