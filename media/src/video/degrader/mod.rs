//! Encode/decode round trip.
//!
//! [`CodecSession`] bundles a matched encoder, decoder and bitstream parser;
//! [`RoundTrip`] drives one picture at a time through them.

pub mod controller;
pub mod session;
pub mod stats;

#[cfg(test)]
pub(crate) mod mock;

pub use controller::{H264RoundTrip, RoundTrip, open_h264_round_trip};
pub use session::{CodecSession, H264Session, SessionConfig, open_h264_session};
pub use stats::RoundTripStats;
