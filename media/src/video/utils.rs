//! Video codec utilities
//!
//! Shared helper functions for the codec backend and the round trip.

use super::constants::h264::*;
use crate::error::{MediaError, Result};
use ffmpeg_next as ffmpeg;

/// Extracts the type of the first NAL unit in Annex-B data
///
/// # NAL Types
/// - 1: Non-IDR coded slice
/// - 5: IDR coded slice (keyframe)
/// - 7: SPS (Sequence Parameter Set)
/// - 8: PPS (Picture Parameter Set)
///
/// # Returns
/// * NAL unit type (0 if no start code found)
pub fn extract_nal_type(data: &[u8]) -> u8 {
    nal_unit_types(data).first().copied().unwrap_or(0)
}

/// Lists the type of every NAL unit in Annex-B data, in stream order.
///
/// 4-byte start codes are covered by the 3-byte search since they end in
/// the same three bytes.
pub fn nal_unit_types(data: &[u8]) -> Vec<u8> {
    let mut types = Vec::new();
    let mut i = 0;
    while i + START_CODE_3_LEN < data.len() {
        if data[i..i + START_CODE_3_LEN] == NAL_START_CODE_3 {
            types.push(data[i + START_CODE_3_LEN] & NAL_TYPE_MASK);
            i += START_CODE_3_LEN;
        } else {
            i += 1;
        }
    }
    types
}

/// Checks if NAL unit is a parameter set (SPS or PPS)
pub fn is_parameter_set(nal_type: u8) -> bool {
    nal_type == NAL_TYPE_SPS || nal_type == NAL_TYPE_PPS
}

/// Checks if NAL unit carries picture data
pub fn is_slice(nal_type: u8) -> bool {
    (NAL_TYPE_NON_IDR..=NAL_TYPE_IDR).contains(&nal_type)
}

/// Human-readable label used in debug logs.
pub fn nal_type_name(nal_type: u8) -> &'static str {
    match nal_type {
        NAL_TYPE_NON_IDR => "slice",
        NAL_TYPE_IDR => "IDR",
        NAL_TYPE_SEI => "SEI",
        NAL_TYPE_SPS => "SPS",
        NAL_TYPE_PPS => "PPS",
        t if is_slice(t) => "partition",
        _ => "other",
    }
}

/// True when FFmpeg reports `EAGAIN`, i.e. "not ready, feed more input".
pub fn is_again(err: &ffmpeg::Error) -> bool {
    matches!(err, ffmpeg::Error::Other { errno } if *errno == ffmpeg::util::error::EAGAIN)
}

/// Maps an FFmpeg receive-side error onto the media error taxonomy.
pub fn map_receive_error(err: ffmpeg::Error, what: &str) -> MediaError {
    match err {
        ffmpeg::Error::Eof => MediaError::EndOfStream,
        ref e if is_again(e) => MediaError::NotReady,
        e => MediaError::Codec(format!("Error receiving {}: {}", what, e)),
    }
}

/// Copies `rows` rows of `row_width` bytes between buffers with independent
/// row strides.
///
/// # Errors
///
/// Returns `Protocol` if either buffer is too short for the requested
/// geometry or a stride is narrower than the row.
pub fn copy_plane(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    row_width: usize,
    rows: usize,
) -> Result<()> {
    if rows == 0 || row_width == 0 {
        return Ok(());
    }
    if src_stride < row_width || dst_stride < row_width {
        return Err(MediaError::Protocol(format!(
            "stride smaller than row: src {} dst {} row {}",
            src_stride, dst_stride, row_width
        )));
    }
    let src_needed = (rows - 1) * src_stride + row_width;
    let dst_needed = (rows - 1) * dst_stride + row_width;
    if src.len() < src_needed || dst.len() < dst_needed {
        return Err(MediaError::Protocol(format!(
            "plane too short: src {}/{} dst {}/{} bytes",
            src.len(),
            src_needed,
            dst.len(),
            dst_needed
        )));
    }

    for row in 0..rows {
        let src_row = &src[row * src_stride..row * src_stride + row_width];
        let dst_row = &mut dst[row * dst_stride..row * dst_stride + row_width];
        dst_row.copy_from_slice(src_row);
    }
    Ok(())
}
