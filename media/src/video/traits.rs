//! Video codec traits for the encode/decode round trip
//!
//! The encoder, decoder and bitstream parser are modelled as stateful
//! push/poll transducers. Each hides its own buffering: pushing one input may
//! make zero, one or several outputs available, and "nothing yet" is reported
//! as [`MediaError::NotReady`](crate::MediaError::NotReady) rather than as a
//! failure. Implementations exist for FFmpeg's H.264 stack; tests use
//! scripted ones.

use super::transfer::PaddedInput;
use crate::error::Result;

/// Compressed output for one submitted picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedUnit {
    /// Annex-B bytes
    pub data: Vec<u8>,
    /// Timestamp of the picture this unit encodes
    pub pts: i64,
    /// True for keyframes
    pub is_key: bool,
}

/// One complete, decodable unit extracted by a [`BitstreamParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessUnit {
    pub data: Vec<u8>,
    pub pts: i64,
}

/// Outcome of one [`BitstreamParser::scan`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// A complete access unit, if one was finished by this call
    pub unit: Option<AccessUnit>,
    /// Input bytes consumed; anything past this must be offered again
    pub consumed: usize,
}

/// Reconstructed picture as laid out by the decoder.
///
/// Rows may be padded: row `r` of plane `p` starts at `r * strides[p]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPicture {
    pub width: usize,
    pub height: usize,
    pub planes: [Vec<u8>; 3],
    pub strides: [usize; 3],
    pub pts: Option<i64>,
}

/// Trait for video encoders
///
/// # Responsibilities
/// - Expose a writable staging picture in the encoder's own memory layout
/// - Compress submitted pictures, possibly with internal delay
/// - Hand out coded units one poll at a time
pub trait VideoEncoder {
    /// Returns plane `plane` (0 = Y, 1 = Cb, 2 = Cr) of the staging picture
    /// together with its row stride in bytes.
    ///
    /// The staging picture is allocated on first access after each
    /// submission, so writes never alias a picture the encoder still holds.
    fn staging_plane(&mut self, plane: usize) -> Result<(&mut [u8], usize)>;

    /// Submits the staging picture tagged with `pts`.
    fn submit_staged(&mut self, pts: i64) -> Result<()>;

    /// Returns the next coded unit, `NotReady` while the encoder is still
    /// buffering, or `EndOfStream` once flushed.
    fn poll_coded_unit(&mut self) -> Result<CodedUnit>;

    /// Returns the codec name (e.g., "H264")
    fn get_codec(&self) -> &str;

    /// Returns the configured bitrate in bits per second
    fn get_bitrate(&self) -> u32 {
        0
    }
}

/// Trait for video decoders
pub trait VideoDecoder {
    /// Submits one complete access unit tagged with `pts`.
    fn submit_coded_unit(&mut self, data: &[u8], pts: i64) -> Result<()>;

    /// Returns the next decoded picture, `NotReady` if none is available yet,
    /// or `EndOfStream` once flushed.
    fn poll_decoded_frame(&mut self) -> Result<DecodedPicture>;

    /// Returns the codec name (e.g., "H264")
    fn get_codec(&self) -> &str;
}

/// Incremental scanner assembling complete access units from byte spans of
/// arbitrary size.
pub trait BitstreamParser {
    /// Scans `input`, tagging any unit it starts with `pts`.
    ///
    /// May return a unit without consuming all of `input`; the caller keeps
    /// calling with the unconsumed tail. A call that neither consumes bytes
    /// nor yields a unit means more data is needed.
    fn scan(&mut self, input: PaddedInput<'_>, pts: i64) -> Result<ScanResult>;
}
