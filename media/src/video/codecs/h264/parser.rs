//! H.264 Annex-B access-unit parser.
//!
//! Wraps FFmpeg's `h264` bitstream parser. FFmpeg-next exposes no safe
//! binding for `av_parser_*`, so this is the one module talking to
//! `ffmpeg-sys-next` directly; all unsafety stays behind [`H264Parser`].

use crate::error::{MediaError, Result};
use crate::video::constants::transfer::TRANSFER_PADDING;
use crate::video::traits::{AccessUnit, BitstreamParser, ScanResult};
use crate::video::transfer::PaddedInput;
use crate::video::utils::{nal_type_name, nal_unit_types};
use ffmpeg_next as ffmpeg;
use ffmpeg_sys_next::{
    AV_NOPTS_VALUE, AVCodecContext, AVCodecID, AVCodecParserContext, av_parser_close,
    av_parser_init, av_parser_parse2, avcodec_alloc_context3, avcodec_free_context,
};
use logging::{LogLevel, Logger};
use std::os::raw::c_int;
use std::ptr;

/// Incremental H.264 access-unit scanner.
///
/// Owns an `AVCodecParserContext` plus the scratch codec context the parser
/// writes stream properties into. Both are released on drop.
pub struct H264Parser {
    parser: *mut AVCodecParserContext,
    context: *mut AVCodecContext,
    logger: Logger,
    unit_count: u64,
}

impl H264Parser {
    /// Allocates a parser for H.264.
    ///
    /// # Errors
    ///
    /// Returns `Config` if FFmpeg has no H.264 parser or the scratch context
    /// cannot be allocated.
    pub fn new(logger: Logger) -> Result<Self> {
        ffmpeg::init().map_err(|e| MediaError::Codec(format!("Error init ffmpeg: {}", e)))?;

        // SAFETY: plain allocation calls; null results are checked below.
        let parser = unsafe { av_parser_init(AVCodecID::AV_CODEC_ID_H264 as c_int) };
        if parser.is_null() {
            return Err(MediaError::Config("H264 parser not found".to_string()));
        }

        let context = unsafe { avcodec_alloc_context3(ptr::null()) };
        if context.is_null() {
            // SAFETY: `parser` is non-null and owned here.
            unsafe { av_parser_close(parser) };
            return Err(MediaError::Config(
                "Failed to allocate parser context".to_string(),
            ));
        }

        logger.info("Initialized H264 parser");
        Ok(H264Parser {
            parser,
            context,
            logger,
            unit_count: 0,
        })
    }

    /// Number of access units emitted so far.
    pub fn unit_count(&self) -> u64 {
        self.unit_count
    }
}

impl BitstreamParser for H264Parser {
    fn scan(&mut self, input: PaddedInput<'_>, pts: i64) -> Result<ScanResult> {
        // A zero-length call would flush FFmpeg's internal buffer
        if input.is_empty() {
            return Ok(ScanResult {
                unit: None,
                consumed: 0,
            });
        }
        if input.padded().len() < input.len() + TRANSFER_PADDING {
            return Err(MediaError::Protocol(
                "parser input lacks padding tail".to_string(),
            ));
        }
        let len = c_int::try_from(input.len()).map_err(|_| {
            MediaError::Protocol(format!("parser input of {} bytes too large", input.len()))
        })?;

        let mut out_data: *mut u8 = ptr::null_mut();
        let mut out_size: c_int = 0;

        // SAFETY: `parser` and `context` are valid for the lifetime of self.
        // The input points at `len` payload bytes followed by the zeroed
        // padding FFmpeg may over-read; it is not retained past this call.
        let consumed = unsafe {
            av_parser_parse2(
                self.parser,
                self.context,
                &mut out_data,
                &mut out_size,
                input.padded().as_ptr(),
                len,
                pts,
                pts,
                0,
            )
        };
        if consumed < 0 {
            return Err(MediaError::Codec(format!(
                "av_parser_parse2 failed with code {}",
                consumed
            )));
        }

        let unit = if out_size > 0 && !out_data.is_null() {
            // SAFETY: FFmpeg guarantees `out_data` holds `out_size` bytes until
            // the next parse call; they are copied out immediately.
            let data = unsafe { std::slice::from_raw_parts(out_data, out_size as usize) }.to_vec();

            // SAFETY: `parser` is valid; `pts` is a plain field read.
            let parsed_pts = unsafe { (*self.parser).pts };
            let pts = if parsed_pts == AV_NOPTS_VALUE {
                pts
            } else {
                parsed_pts
            };

            self.unit_count += 1;
            if self.logger.enabled(LogLevel::Debug) {
                let nals: Vec<&str> = nal_unit_types(&data).into_iter().map(nal_type_name).collect();
                self.logger.debug(&format!(
                    "Parsed access unit #{}: pts={}, size={}, NALs={:?}",
                    self.unit_count,
                    pts,
                    data.len(),
                    nals
                ));
            }
            Some(AccessUnit { data, pts })
        } else {
            None
        };

        Ok(ScanResult {
            unit,
            consumed: consumed as usize,
        })
    }
}

impl Drop for H264Parser {
    fn drop(&mut self) {
        // SAFETY: both pointers were allocated in `new`, are non-null and are
        // released exactly once here. `avcodec_free_context` nulls the field.
        unsafe {
            av_parser_close(self.parser);
            avcodec_free_context(&mut self.context);
        }
        self.logger.debug("Released H264 parser");
    }
}
