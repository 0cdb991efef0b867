//! Session configuration and lifecycle.

use crate::error::{MediaError, Result};
use crate::video::codecs::{H264Decoder, H264Encoder, H264Parser};
use crate::video::constants::session::{
    DEFAULT_FPS, DEFAULT_GOP, DEFAULT_HEIGHT, DEFAULT_PRESET, DEFAULT_QMAX, DEFAULT_QMIN,
    DEFAULT_TUNE, DEFAULT_WIDTH, MAX_QP, VBV_BUFFER_SECONDS,
};
use crate::video::constants::yuv::CHROMA_H_DIVISOR;
use crate::video::traits::{BitstreamParser, VideoDecoder, VideoEncoder};
use logging::Logger;

/// Parameters shared by both halves of a session.
///
/// Resolution, pixel format and timing are identical on the encoder and the
/// decoder and never change for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// Target bitrate in bits per second
    pub bitrate: u32,
    pub fps: u32,
    /// Keyframe interval in frames
    pub gop: u32,
    pub qmin: i32,
    pub qmax: i32,
    /// libx264 preset
    pub preset: String,
    /// libx264 tune
    pub tune: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            bitrate: 400_000,
            fps: DEFAULT_FPS,
            gop: DEFAULT_GOP,
            qmin: DEFAULT_QMIN,
            qmax: DEFAULT_QMAX,
            preset: DEFAULT_PRESET.to_string(),
            tune: DEFAULT_TUNE.to_string(),
        }
    }
}

impl SessionConfig {
    /// Default timing and quantizer bounds at the given geometry and bitrate.
    pub fn new(width: usize, height: usize, bitrate: u32) -> Self {
        SessionConfig {
            width,
            height,
            bitrate,
            ..Default::default()
        }
    }

    /// Checks that both codecs can be opened with these parameters.
    ///
    /// # Errors
    ///
    /// Returns `Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MediaError::Config(format!(
                "resolution {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.width % CHROMA_H_DIVISOR != 0 {
            return Err(MediaError::Config(format!(
                "width {} must be even for 4:2:2",
                self.width
            )));
        }
        if self.bitrate == 0 {
            return Err(MediaError::Config("bitrate must be positive".to_string()));
        }
        if self.fps == 0 {
            return Err(MediaError::Config("fps must be positive".to_string()));
        }
        if self.gop == 0 {
            return Err(MediaError::Config("gop must be positive".to_string()));
        }
        if self.qmin < 0 || self.qmax > MAX_QP || self.qmin > self.qmax {
            return Err(MediaError::Config(format!(
                "quantizer range [{}, {}] is invalid",
                self.qmin, self.qmax
            )));
        }
        self.dimensions()?;
        self.fps_rational()?;
        self.vbv_buffer_size()?;
        Ok(())
    }

    /// Geometry in the integer type FFmpeg takes.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let width = i32::try_from(self.width)
            .map_err(|_| MediaError::Config(format!("width {} too large", self.width)))?;
        let height = i32::try_from(self.height)
            .map_err(|_| MediaError::Config(format!("height {} too large", self.height)))?;
        Ok((width as u32, height as u32))
    }

    /// Frame rate as the numerator FFmpeg's rationals take.
    pub fn fps_rational(&self) -> Result<i32> {
        i32::try_from(self.fps)
            .map_err(|_| MediaError::Config(format!("fps {} too large", self.fps)))
    }

    /// Rate-control buffer size in bits.
    pub fn vbv_buffer_size(&self) -> Result<i32> {
        i32::try_from(u64::from(self.bitrate) * VBV_BUFFER_SECONDS)
            .map_err(|_| MediaError::Config(format!("bitrate {} too large", self.bitrate)))
    }
}

/// A matched encoder, decoder and bitstream parser.
///
/// Built in the order encoder, decoder, parser. Fields drop in declaration
/// order, so release runs parser, decoder, encoder.
pub struct CodecSession<E, D, P> {
    parser: P,
    decoder: D,
    encoder: E,
    config: SessionConfig,
    logger: Logger,
}

/// Session backed by FFmpeg's H.264 stack.
pub type H264Session = CodecSession<H264Encoder, H264Decoder, H264Parser>;

impl<E, D, P> CodecSession<E, D, P>
where
    E: VideoEncoder,
    D: VideoDecoder,
    P: BitstreamParser,
{
    /// Assembles a session from already opened collaborators.
    pub fn new(config: SessionConfig, encoder: E, decoder: D, parser: P, logger: Logger) -> Self {
        logger.info(&format!(
            "Session ready: {}x{} {} -> {}, bitrate={}",
            config.width,
            config.height,
            encoder.get_codec(),
            decoder.get_codec(),
            encoder.get_bitrate()
        ));
        CodecSession {
            parser,
            decoder,
            encoder,
            config,
            logger,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Splits the session into its collaborators for one cycle.
    pub fn parts(&mut self) -> (&mut E, &mut D, &mut P) {
        (&mut self.encoder, &mut self.decoder, &mut self.parser)
    }
}

impl<E, D, P> Drop for CodecSession<E, D, P> {
    fn drop(&mut self) {
        self.logger.info(&format!(
            "Closing session {}x{}",
            self.config.width, self.config.height
        ));
    }
}

/// Opens libx264, the H.264 decoder and the H.264 parser with matching
/// parameters.
///
/// # Errors
///
/// `Config` for unusable parameters or a missing codec, `Codec` when FFmpeg
/// fails to open a session. Anything acquired before the failure is released
/// on return.
pub fn open_h264_session(config: SessionConfig, logger: &Logger) -> Result<H264Session> {
    config.validate()?;

    let encoder = H264Encoder::new(&config, logger.for_component("h264-encoder"))?;
    let decoder = H264Decoder::new(&config, logger.for_component("h264-decoder"))?;
    let parser = H264Parser::new(logger.for_component("h264-parser"))?;

    Ok(CodecSession::new(
        config,
        encoder,
        decoder,
        parser,
        logger.for_component("session"),
    ))
}
