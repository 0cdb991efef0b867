//! H.264 (AVC) video encoder implementation.
//!
//! Provides H.264 encoding through FFmpeg's libx264, tuned for zero latency
//! and a constant bitrate so that its output degrades the way a constrained
//! live channel would.

use crate::common::constants::logging::ENCODER_LOG_INTERVAL;
use crate::error::{MediaError, Result};
use crate::video::constants::yuv::PLANE_COUNT;
use crate::video::degrader::SessionConfig;
use crate::video::traits::{CodedUnit, VideoEncoder};
use crate::video::utils::{map_receive_error, nal_type_name, nal_unit_types};
use ffmpeg::format::Pixel;
use ffmpeg_next as ffmpeg;
use logging::{LogLevel, Logger};

/// Represents an H.264 video encoder using FFmpeg.
///
/// Accepts YUV 4:2:2 planar pictures written into a per-submission staging
/// frame and produces Annex-B coded units.
pub struct H264Encoder {
    encoder: ffmpeg::encoder::Video,
    staged: Option<ffmpeg::frame::Video>,
    logger: Logger,
    width: u32,
    height: u32,
    bitrate: u32,
    frame_count: u64,
}

impl H264Encoder {
    /// Creates and opens a new H.264 encoder
    ///
    /// # Returns
    ///
    /// * `Ok(H264Encoder)` - Successfully initialized encoder
    /// * `Err(Config)` - No H.264 encoder is available
    /// * `Err(Codec)` - FFmpeg refused to allocate or open the session
    pub fn new(config: &SessionConfig, logger: Logger) -> Result<Self> {
        logger.info(&format!(
            "Initializing H264 encoder: {}x{}, bitrate={}, fps={}, gop={}, qp=[{}, {}], preset={}, tune={}",
            config.width,
            config.height,
            config.bitrate,
            config.fps,
            config.gop,
            config.qmin,
            config.qmax,
            config.preset,
            config.tune
        ));

        ffmpeg::init().map_err(|e| MediaError::Codec(format!("Error init ffmpeg: {}", e)))?;

        let codec = ffmpeg::encoder::find_by_name("libx264")
            .or_else(|| ffmpeg::encoder::find(ffmpeg::codec::Id::H264))
            .ok_or_else(|| MediaError::Config("H264 encoder not found".to_string()))?
            .video()
            .map_err(|e| MediaError::Config(format!("Not a video codec: {}", e)))?;

        let mut encoder = ffmpeg::codec::context::Context::new_with_codec(*codec)
            .encoder()
            .video()
            .map_err(|e| MediaError::Codec(format!("Error creating context: {}", e)))?;

        let (width, height) = config.dimensions()?;
        let fps = config.fps_rational()?;

        encoder.set_width(width);
        encoder.set_height(height);
        encoder.set_format(Pixel::YUV422P);
        encoder.set_bit_rate(config.bitrate as usize);
        encoder.set_time_base((1, fps));
        encoder.set_frame_rate(Some((fps, 1)));
        encoder.set_gop(config.gop);
        encoder.set_max_b_frames(0); // Disable B-frames for low latency

        // SAFETY: `encoder` owns a valid AVCodecContext that has not been
        // opened yet; these plain integer fields have no safe setter.
        unsafe {
            let raw = encoder.as_mut_ptr();
            (*raw).bit_rate_tolerance = 0;
            (*raw).rc_max_rate = i64::from(config.bitrate);
            (*raw).rc_buffer_size = config.vbv_buffer_size()?;
            (*raw).qmin = config.qmin;
            (*raw).qmax = config.qmax;
        }

        let mut opts = ffmpeg::Dictionary::new();
        opts.set("preset", &config.preset);
        opts.set("tune", &config.tune);

        // Single-threaded, no look-ahead: one picture in, one unit out
        opts.set("threads", "1");
        opts.set("rc-lookahead", "0");
        opts.set("sliced-threads", "0");

        opts.set("x264-params", "nal-hrd=cbr:force-cfr=1");

        let encoder = encoder
            .open_with(opts)
            .map_err(|e| MediaError::Codec(format!("Error opening encoder: {}", e)))?;

        Ok(H264Encoder {
            encoder,
            staged: None,
            logger,
            width,
            height,
            bitrate: config.bitrate,
            frame_count: 0,
        })
    }

    /// Number of pictures submitted so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn log_unit(&self, data: &[u8], pts: i64, is_key: bool) {
        if !self.logger.enabled(LogLevel::Debug) {
            return;
        }
        let nals: Vec<&str> = nal_unit_types(data).into_iter().map(nal_type_name).collect();
        self.logger.debug(&format!(
            "Encoded unit: pts={}, size={}, is_key={}, NALs={:?}",
            pts,
            data.len(),
            is_key,
            nals
        ));
    }
}

impl VideoEncoder for H264Encoder {
    fn staging_plane(&mut self, plane: usize) -> Result<(&mut [u8], usize)> {
        if plane >= PLANE_COUNT {
            return Err(MediaError::Protocol(format!(
                "plane index {} out of range",
                plane
            )));
        }
        let (width, height) = (self.width, self.height);
        let frame = self
            .staged
            .get_or_insert_with(|| ffmpeg::frame::Video::new(Pixel::YUV422P, width, height));
        let stride = frame.stride(plane);
        Ok((frame.data_mut(plane), stride))
    }

    fn submit_staged(&mut self, pts: i64) -> Result<()> {
        let mut frame = self
            .staged
            .take()
            .ok_or_else(|| MediaError::Protocol("no staged picture to submit".to_string()))?;
        frame.set_pts(Some(pts));

        self.encoder
            .send_frame(&frame)
            .map_err(|e| MediaError::Codec(format!("Error sending frame: {}", e)))?;

        self.frame_count += 1;
        if self.frame_count.is_multiple_of(ENCODER_LOG_INTERVAL) {
            self.logger
                .debug(&format!("Encoded {} frames", self.frame_count));
        }
        Ok(())
    }

    fn poll_coded_unit(&mut self) -> Result<CodedUnit> {
        let mut packet = ffmpeg::Packet::empty();
        self.encoder
            .receive_packet(&mut packet)
            .map_err(|e| map_receive_error(e, "packet"))?;

        let data = packet.data().unwrap_or(&[]).to_vec();
        let pts = packet.pts().unwrap_or_default();
        let is_key = packet.is_key();
        self.log_unit(&data, pts, is_key);

        Ok(CodedUnit { data, pts, is_key })
    }

    fn get_codec(&self) -> &str {
        "H264"
    }

    fn get_bitrate(&self) -> u32 {
        self.bitrate
    }
}
