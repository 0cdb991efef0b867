//! Frame loop: raw BGRA in, degraded BGRA out.

use crate::config::{DegraderConfig, OutputConfig};
use crate::error::Result;
use crate::raw_io::{FrameRead, RawFrameReader, RawFrameWriter};
use logging::Logger;
use media::{
    BgraImage, BitstreamParser, H264RoundTrip, RoundTrip, RoundTripStats, VideoDecoder,
    VideoEncoder, Yuv422Frame, to_native_into, to_planar_into,
};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames_read: u64,
    pub frames_written: u64,
    /// Bytes of a trailing incomplete frame, ignored
    pub partial_bytes: usize,
    pub fps: u32,
    /// Round-trip counters at the end of the run
    pub round_trip: RoundTripStats,
}

impl RunSummary {
    /// Average coded bitrate in bits per second.
    pub fn achieved_bitrate(&self) -> f64 {
        self.round_trip.achieved_bitrate(self.fps)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames read: {}, produced: {}, filler: {}, written: {}, coded: {} bytes, bitrate: {:.0} bps",
            self.frames_read,
            self.round_trip.produced_frames,
            self.round_trip.filler_frames,
            self.frames_written,
            self.round_trip.bytes_coded,
            self.achieved_bitrate()
        )
    }
}

/// Degrades every frame from `reader` into `writer`.
///
/// Stops at the end of input; a trailing partial frame is logged and
/// skipped. Any round-trip error ends the run.
pub fn run<R, W, E, D, P>(
    round_trip: &mut RoundTrip<E, D, P>,
    reader: &mut RawFrameReader<R>,
    writer: &mut RawFrameWriter<W>,
    output: &OutputConfig,
    logger: &Logger,
) -> Result<RunSummary>
where
    R: Read,
    W: Write,
    E: VideoEncoder,
    D: VideoDecoder,
    P: BitstreamParser,
{
    let (width, height) = (round_trip.config().width, round_trip.config().height);
    let mut planar = Yuv422Frame::new(width, height)?;
    let mut degraded = Yuv422Frame::new(width, height)?;
    let mut native = BgraImage::new(width, height);
    let mut partial_bytes = 0;

    loop {
        match reader.read_frame()? {
            FrameRead::Frame(image) => {
                to_planar_into(&image, &mut planar)?;
                let produced = round_trip.degrade(&planar, &mut degraded)?;
                if produced || output.emit_filler {
                    to_native_into(&degraded, &mut native)?;
                    writer.write_frame(&native)?;
                }
            }
            FrameRead::Partial(bytes) => {
                logger.warn(&format!(
                    "Ignoring trailing partial frame: {} of {} bytes",
                    bytes,
                    reader.frame_len()
                ));
                partial_bytes = bytes;
                break;
            }
            FrameRead::End => break,
        }
    }

    Ok(RunSummary {
        frames_read: reader.frames_read(),
        frames_written: writer.frames_written(),
        partial_bytes,
        fps: round_trip.config().fps,
        round_trip: round_trip.stats(),
    })
}

/// Opens the H.264 round trip and degrades `input` into `output`.
pub fn run_files(
    config: &DegraderConfig,
    input: &Path,
    output: &Path,
    logger: &Logger,
) -> Result<RunSummary> {
    let session = config.video.session_config();
    let (width, height) = (session.width, session.height);

    let mut round_trip = H264RoundTrip::open_h264(session, logger.for_component("RoundTrip"))?;

    let mut reader = RawFrameReader::new(BufReader::new(File::open(input)?), width, height);
    let mut writer = RawFrameWriter::new(BufWriter::new(File::create(output)?), width, height);

    logger.info(&format!(
        "Degrading {} -> {} ({}x{}, {} bps)",
        input.display(),
        output.display(),
        width,
        height,
        config.video.bitrate
    ));

    let summary = run(
        &mut round_trip,
        &mut reader,
        &mut writer,
        &config.output,
        logger,
    )?;
    writer.finish()?;
    Ok(summary)
}
