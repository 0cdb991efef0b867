//! H.264 (AVC) video decoder implementation.
//!
//! Provides H.264 decoding through FFmpeg, opened in low-delay mode with the
//! same geometry, pixel format and timing as the paired encoder.

use crate::common::constants::logging::DECODER_LOG_INTERVAL;
use crate::error::{MediaError, Result};
use crate::video::constants::yuv::PLANE_COUNT;
use crate::video::degrader::SessionConfig;
use crate::video::traits::{DecodedPicture, VideoDecoder};
use crate::video::utils::{extract_nal_type, is_parameter_set, map_receive_error};
use ffmpeg::decoder::video::Video as FfmpegVideoDecoder;
use ffmpeg::format::Pixel;
use ffmpeg_next as ffmpeg;
use ffmpeg_sys_next::{AV_CODEC_FLAG_LOW_DELAY, AVPixelFormat, AVRational};
use logging::Logger;

/// Represents an H.264 video decoder using FFmpeg.
///
/// Accepts complete access units and hands out planar 4:2:2 pictures.
pub struct H264Decoder {
    decoder: FfmpegVideoDecoder,
    logger: Logger,
    frame_count: u64,
    received_sps_pps: bool,
}

impl H264Decoder {
    /// Creates and opens a new H.264 decoder
    ///
    /// # Arguments
    ///
    /// * `config` - Session geometry and timing, shared with the encoder
    /// * `logger` - Logger instance
    ///
    /// # Returns
    ///
    /// * `Ok(H264Decoder)` - Successfully initialized decoder
    /// * `Err` - If FFmpeg initialization or codec setup fails
    pub fn new(config: &SessionConfig, logger: Logger) -> Result<Self> {
        logger.info(&format!(
            "Initializing H264 decoder: {}x{}, fps={}",
            config.width, config.height, config.fps
        ));

        ffmpeg::init().map_err(|e| MediaError::Codec(format!("Error init ffmpeg: {}", e)))?;

        let codec = ffmpeg::decoder::find_by_name("h264")
            .or_else(|| ffmpeg::decoder::find(ffmpeg::codec::Id::H264))
            .ok_or_else(|| MediaError::Config("H264 decoder not found".to_string()))?;

        let (width, height) = config.dimensions()?;
        let fps = config.fps_rational()?;

        let mut ctx = ffmpeg::codec::context::Context::new_with_codec(codec);

        // SAFETY: `ctx` owns a freshly allocated AVCodecContext that has not
        // been opened; the decoder reads these fields during open.
        unsafe {
            let raw = ctx.as_mut_ptr();
            (*raw).width = width as i32;
            (*raw).height = height as i32;
            (*raw).pix_fmt = AVPixelFormat::AV_PIX_FMT_YUV422P;
            (*raw).time_base = AVRational { num: 1, den: fps };
            (*raw).framerate = AVRational { num: fps, den: 1 };
            (*raw).bit_rate = i64::from(config.bitrate);
            (*raw).bit_rate_tolerance = 0;
            (*raw).thread_count = 1;
            (*raw).flags |= AV_CODEC_FLAG_LOW_DELAY as i32;
        }

        let decoder = ctx
            .decoder()
            .video()
            .map_err(|e| MediaError::Codec(format!("Error creating/opening decoder: {}", e)))?;

        Ok(H264Decoder {
            decoder,
            logger,
            frame_count: 0,
            received_sps_pps: false,
        })
    }

    /// Number of pictures handed out so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl VideoDecoder for H264Decoder {
    fn submit_coded_unit(&mut self, data: &[u8], pts: i64) -> Result<()> {
        let nal_type = extract_nal_type(data);
        if is_parameter_set(nal_type) && !self.received_sps_pps {
            self.received_sps_pps = true;
            self.logger
                .debug(&format!("Received parameter set: NAL type {}", nal_type));
        }

        let mut packet = ffmpeg::Packet::copy(data);
        packet.set_pts(Some(pts));
        packet.set_dts(Some(pts));

        self.decoder.send_packet(&packet).map_err(|e| {
            MediaError::Codec(format!(
                "Error sending packet (NAL type {}, pts {}): {}",
                nal_type, pts, e
            ))
        })
    }

    fn poll_decoded_frame(&mut self) -> Result<DecodedPicture> {
        let mut decoded = ffmpeg::frame::Video::empty();
        self.decoder
            .receive_frame(&mut decoded)
            .map_err(|e| map_receive_error(e, "frame"))?;

        if decoded.format() != Pixel::YUV422P {
            return Err(MediaError::Protocol(format!(
                "decoder produced {:?}, expected YUV422P",
                decoded.format()
            )));
        }

        self.frame_count += 1;
        if self.frame_count.is_multiple_of(DECODER_LOG_INTERVAL) {
            self.logger.debug(&format!(
                "Decoded {} frames (latest: {}x{})",
                self.frame_count,
                decoded.width(),
                decoded.height()
            ));
        }

        let planes: [Vec<u8>; PLANE_COUNT] = std::array::from_fn(|i| decoded.data(i).to_vec());
        let strides: [usize; PLANE_COUNT] = std::array::from_fn(|i| decoded.stride(i));

        Ok(DecodedPicture {
            width: decoded.width() as usize,
            height: decoded.height() as usize,
            planes,
            strides,
            pts: decoded.pts(),
        })
    }

    fn get_codec(&self) -> &str {
        "H264"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::LogLevel;
    use tempfile::tempdir;

    fn create_test_logger() -> Logger {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test_decoder.log");
        Logger::new(&log_path, LogLevel::Debug).unwrap()
    }

    #[test]
    fn test_decoder_creation() {
        let config = SessionConfig::new(64, 48, 200_000);
        let decoder = H264Decoder::new(&config, create_test_logger());
        assert!(decoder.is_ok());
    }

    #[test]
    fn test_decoder_trait() {
        let config = SessionConfig::new(64, 48, 200_000);
        let decoder = H264Decoder::new(&config, create_test_logger()).unwrap();

        assert_eq!(decoder.get_codec(), "H264");
        assert_eq!(decoder.frame_count(), 0);
        assert!(!decoder.received_sps_pps);
    }

    #[test]
    fn test_poll_before_input_is_not_ready() {
        let config = SessionConfig::new(64, 48, 200_000);
        let mut decoder = H264Decoder::new(&config, create_test_logger()).unwrap();

        let err = decoder.poll_decoded_frame().unwrap_err();
        assert!(err.is_transient());
    }
}
