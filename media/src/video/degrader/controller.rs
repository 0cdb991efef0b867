//! Round-trip controller.
//!
//! Each call to [`RoundTrip::degrade`] runs one cycle:
//!
//! 1. copy the input planes into the encoder's staging picture and submit it;
//! 2. drain the encoder, accepting at most one coded unit;
//! 3. scan the unit (plus any bytes left over from the previous cycle) into
//!    access units and push each through the decoder, copying every decoded
//!    picture into the output frame;
//! 4. write the blank filler picture if nothing was decoded;
//! 5. advance the timestamp.
//!
//! Encoders and decoders buffer internally, so output trails input: the
//! first calls after opening normally return `false`.

use super::session::{CodecSession, SessionConfig, open_h264_session};
use super::stats::RoundTripStats;
use crate::common::constants::logging::ROUND_TRIP_LOG_INTERVAL;
use crate::error::{MediaError, Result};
use crate::video::codecs::{H264Decoder, H264Encoder, H264Parser};
use crate::video::constants::yuv::PLANE_COUNT;
use crate::video::frame::Yuv422Frame;
use crate::video::traits::{
    AccessUnit, BitstreamParser, CodedUnit, DecodedPicture, VideoDecoder, VideoEncoder,
};
use crate::video::transfer::TransferBuffer;
use crate::video::utils::copy_plane;
use logging::Logger;

/// Drives pictures through an encoder/decoder pair.
///
/// Any fatal error leaves the controller defunct; later calls return
/// [`MediaError::Defunct`] without touching the codecs.
pub struct RoundTrip<E, D, P> {
    session: CodecSession<E, D, P>,
    pts: i64,
    carry: Vec<u8>,
    defunct: bool,
    stats: RoundTripStats,
    logger: Logger,
}

/// Round trip over FFmpeg's H.264 stack.
pub type H264RoundTrip = RoundTrip<H264Encoder, H264Decoder, H264Parser>;

impl H264RoundTrip {
    /// Opens a libx264/H.264 session and wraps it in a controller.
    ///
    /// # Errors
    ///
    /// Fails with `Config` or `Codec` if either codec or the parser cannot
    /// be set up.
    pub fn open_h264(config: SessionConfig, logger: Logger) -> Result<Self> {
        let session = open_h264_session(config, &logger)?;
        Ok(RoundTrip::new(session, logger))
    }
}

/// Shorthand for [`RoundTrip::open_h264`].
pub fn open_h264_round_trip(config: SessionConfig, logger: Logger) -> Result<H264RoundTrip> {
    H264RoundTrip::open_h264(config, logger)
}

impl<E, D, P> RoundTrip<E, D, P>
where
    E: VideoEncoder,
    D: VideoDecoder,
    P: BitstreamParser,
{
    pub fn new(session: CodecSession<E, D, P>, logger: Logger) -> Self {
        let config = session.config();
        logger.info(&format!(
            "Round trip ready: {}x{} @ {} bps, {} fps",
            config.width, config.height, config.bitrate, config.fps
        ));
        RoundTrip {
            session,
            pts: 0,
            carry: Vec::new(),
            defunct: false,
            stats: RoundTripStats::default(),
            logger,
        }
    }

    /// Runs `input` through the codec pair and writes the result to `output`.
    ///
    /// Returns `true` when `output` holds a freshly decoded picture and
    /// `false` when it holds the blank filler picture. Either way every
    /// sample of `output` is overwritten.
    ///
    /// # Errors
    ///
    /// * `InvalidFrame` - a frame does not match the session geometry; no
    ///   codec state is touched and the controller stays usable
    /// * `Defunct` - an earlier call failed fatally
    /// * `Protocol` / `Codec` - fatal; the controller becomes defunct
    pub fn degrade(&mut self, input: &Yuv422Frame, output: &mut Yuv422Frame) -> Result<bool> {
        if self.defunct {
            return Err(MediaError::Defunct);
        }
        self.check_geometry("input", input)?;
        self.check_geometry("output", output)?;

        match self.cycle(input, output) {
            Ok(produced) => Ok(produced),
            Err(err) => {
                self.defunct = true;
                self.logger.error(&format!(
                    "Round trip failed at pts {}: {}",
                    self.pts, err
                ));
                Err(err)
            }
        }
    }

    /// Timestamp the next submitted picture will carry.
    pub fn pts(&self) -> i64 {
        self.pts
    }

    pub fn stats(&self) -> RoundTripStats {
        self.stats
    }

    pub fn is_defunct(&self) -> bool {
        self.defunct
    }

    pub fn config(&self) -> &SessionConfig {
        self.session.config()
    }

    pub fn session(&self) -> &CodecSession<E, D, P> {
        &self.session
    }

    fn check_geometry(&self, role: &str, frame: &Yuv422Frame) -> Result<()> {
        let config = self.session.config();
        if frame.has_geometry(config.width, config.height) {
            return Ok(());
        }
        Err(MediaError::InvalidFrame(format!(
            "{} frame is {}x{}, session is {}x{}",
            role,
            frame.width(),
            frame.height(),
            config.width,
            config.height
        )))
    }

    fn cycle(&mut self, input: &Yuv422Frame, output: &mut Yuv422Frame) -> Result<bool> {
        let pts = self.pts;

        self.submit(input, pts)?;
        let unit = self.drain(pts)?;
        let produced = self.decode(unit, pts, output)?;

        if produced {
            self.stats.produced_frames += 1;
        } else {
            output.fill_blank();
            self.stats.filler_frames += 1;
        }

        self.pts += 1;
        if self.stats.frames_submitted.is_multiple_of(ROUND_TRIP_LOG_INTERVAL) {
            self.logger
                .info(&format!("Round trip progress: {}", self.stats));
        }
        Ok(produced)
    }

    fn submit(&mut self, input: &Yuv422Frame, pts: i64) -> Result<()> {
        let (encoder, _, _) = self.session.parts();
        for plane in 0..PLANE_COUNT {
            let row_width = input.plane_width(plane);
            let (staging, stride) = encoder.staging_plane(plane)?;
            copy_plane(
                input.plane(plane),
                row_width,
                staging,
                stride,
                row_width,
                input.height(),
            )?;
        }
        encoder.submit_staged(pts)?;
        self.stats.frames_submitted += 1;
        Ok(())
    }

    /// Polls the encoder dry. More than one unit for a single picture breaks
    /// the zero-latency contract.
    fn drain(&mut self, pts: i64) -> Result<Option<CodedUnit>> {
        let (encoder, _, _) = self.session.parts();
        let mut drained: Option<CodedUnit> = None;
        loop {
            match encoder.poll_coded_unit() {
                Ok(unit) => {
                    if drained.is_some() {
                        return Err(MediaError::Protocol(format!(
                            "encoder produced a second coded unit for pts {}",
                            pts
                        )));
                    }
                    drained = Some(unit);
                }
                Err(err) if err.is_transient() => break,
                Err(err) => return Err(err),
            }
        }

        if let Some(unit) = &drained {
            self.stats.units_coded += 1;
            self.stats.bytes_coded += unit.data.len() as u64;
        }
        Ok(drained)
    }

    fn decode(
        &mut self,
        unit: Option<CodedUnit>,
        pts: i64,
        output: &mut Yuv422Frame,
    ) -> Result<bool> {
        let unit_bytes = unit.as_ref().map_or(&[][..], |unit| unit.data.as_slice());
        if unit_bytes.is_empty() {
            // Leftover bytes cannot complete without new input
            return Ok(false);
        }
        let buffer = TransferBuffer::new(&self.carry, unit_bytes);
        self.carry.clear();

        let mut produced = false;
        let mut offset = 0;
        while offset < buffer.len() {
            let (_, _, parser) = self.session.parts();
            let scanned = parser.scan(buffer.padded_from(offset), pts)?;
            if scanned.consumed > buffer.len() - offset {
                return Err(MediaError::Protocol(format!(
                    "parser consumed {} of {} bytes",
                    scanned.consumed,
                    buffer.len() - offset
                )));
            }
            offset += scanned.consumed;

            match scanned.unit {
                Some(access_unit) => {
                    if self.decode_access_unit(&access_unit, output)? {
                        produced = true;
                    }
                }
                None if scanned.consumed == 0 => break,
                None => {}
            }
        }

        self.carry.extend_from_slice(buffer.remainder(offset));
        if !self.carry.is_empty() {
            self.logger.debug(&format!(
                "Carrying {} unparsed bytes into pts {}",
                self.carry.len(),
                pts + 1
            ));
        }
        Ok(produced)
    }

    fn decode_access_unit(&mut self, unit: &AccessUnit, output: &mut Yuv422Frame) -> Result<bool> {
        let (_, decoder, _) = self.session.parts();
        decoder.submit_coded_unit(&unit.data, unit.pts)?;

        let mut produced = false;
        loop {
            let (_, decoder, _) = self.session.parts();
            match decoder.poll_decoded_frame() {
                Ok(picture) => {
                    self.stats.frames_decoded += 1;
                    self.logger.debug(&format!(
                        "Decoded picture pts {:?} from unit pts {}",
                        picture.pts, unit.pts
                    ));
                    copy_picture(&picture, output)?;
                    produced = true;
                }
                Err(err) if err.is_transient() => break,
                Err(err) => return Err(err),
            }
        }
        Ok(produced)
    }
}

/// Copies a decoded picture into `output`, dropping the decoder's row
/// padding.
fn copy_picture(picture: &DecodedPicture, output: &mut Yuv422Frame) -> Result<()> {
    if !output.has_geometry(picture.width, picture.height) {
        return Err(MediaError::Protocol(format!(
            "decoded picture is {}x{}, expected {}x{}",
            picture.width,
            picture.height,
            output.width(),
            output.height()
        )));
    }
    let rows = output.height();
    for plane in 0..PLANE_COUNT {
        let row_width = output.plane_width(plane);
        copy_plane(
            &picture.planes[plane],
            picture.strides[plane],
            output.plane_mut(plane),
            row_width,
            row_width,
            rows,
        )?;
    }
    Ok(())
}
