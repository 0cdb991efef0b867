//! Round-trip counters.

use std::fmt;

/// Running totals kept by a [`RoundTrip`](super::RoundTrip).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTripStats {
    /// Pictures handed to the encoder
    pub frames_submitted: u64,
    /// Coded units drained from the encoder
    pub units_coded: u64,
    /// Total size of all coded units
    pub bytes_coded: u64,
    /// Pictures returned by the decoder, including superseded ones
    pub frames_decoded: u64,
    /// Cycles that completed with a decoded picture
    pub produced_frames: u64,
    /// Cycles that completed with the blank picture
    pub filler_frames: u64,
}

impl RoundTripStats {
    /// Average coded bitrate in bits per second at `fps`.
    pub fn achieved_bitrate(&self, fps: u32) -> f64 {
        if self.frames_submitted == 0 {
            return 0.0;
        }
        (self.bytes_coded * 8) as f64 * f64::from(fps) / self.frames_submitted as f64
    }
}

impl fmt::Display for RoundTripStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submitted={}, coded={} ({} bytes), decoded={}, produced={}, filler={}",
            self.frames_submitted,
            self.units_coded,
            self.bytes_coded,
            self.frames_decoded,
            self.produced_frames,
            self.filler_frames
        )
    }
}
