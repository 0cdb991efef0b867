use degrader::config::OutputConfig;
use degrader::{RawFrameReader, RawFrameWriter, run};
use logging::{LogLevel, Logger};
use media::video::traits::{AccessUnit, CodedUnit, DecodedPicture, ScanResult};
use media::video::transfer::PaddedInput;
use media::{
    BgraImage, BitstreamParser, CodecSession, MediaError, Result, RoundTrip, SessionConfig,
    VideoDecoder, VideoEncoder,
};
use std::collections::VecDeque;
use std::io::Cursor;

const WIDTH: usize = 4;
const HEIGHT: usize = 2;

fn plane_width(plane: usize) -> usize {
    if plane == 0 { WIDTH } else { WIDTH / 2 }
}

/// Lossless encoder with one frame of delay
#[derive(Default)]
struct DelayedCopyEncoder {
    staged: Option<[Vec<u8>; 3]>,
    held: Option<CodedUnit>,
    ready: Option<CodedUnit>,
}

impl VideoEncoder for DelayedCopyEncoder {
    fn staging_plane(&mut self, plane: usize) -> Result<(&mut [u8], usize)> {
        let staged = self
            .staged
            .get_or_insert_with(|| std::array::from_fn(|p| vec![0; plane_width(p) * HEIGHT]));
        Ok((staged[plane].as_mut_slice(), plane_width(plane)))
    }

    fn submit_staged(&mut self, pts: i64) -> Result<()> {
        let planes = self.staged.take().ok_or(MediaError::NotReady)?;
        self.ready = self.held.take();
        self.held = Some(CodedUnit {
            data: planes.concat(),
            pts,
            is_key: true,
        });
        Ok(())
    }

    fn poll_coded_unit(&mut self) -> Result<CodedUnit> {
        self.ready.take().ok_or(MediaError::NotReady)
    }

    fn get_codec(&self) -> &str {
        "copy"
    }
}

/// Treats every span as one access unit
struct WholeSpanParser;

impl BitstreamParser for WholeSpanParser {
    fn scan(&mut self, input: PaddedInput<'_>, pts: i64) -> Result<ScanResult> {
        Ok(ScanResult {
            unit: Some(AccessUnit {
                data: input.data().to_vec(),
                pts,
            }),
            consumed: input.len(),
        })
    }
}

#[derive(Default)]
struct CopyDecoder {
    queue: VecDeque<DecodedPicture>,
}

impl VideoDecoder for CopyDecoder {
    fn submit_coded_unit(&mut self, data: &[u8], pts: i64) -> Result<()> {
        let luma = WIDTH * HEIGHT;
        let chroma = luma / 2;
        self.queue.push_back(DecodedPicture {
            width: WIDTH,
            height: HEIGHT,
            planes: [
                data[..luma].to_vec(),
                data[luma..luma + chroma].to_vec(),
                data[luma + chroma..].to_vec(),
            ],
            strides: [WIDTH, WIDTH / 2, WIDTH / 2],
            pts: Some(pts),
        });
        Ok(())
    }

    fn poll_decoded_frame(&mut self) -> Result<DecodedPicture> {
        self.queue.pop_front().ok_or(MediaError::NotReady)
    }

    fn get_codec(&self) -> &str {
        "copy"
    }
}

type CopyRoundTrip = RoundTrip<DelayedCopyEncoder, CopyDecoder, WholeSpanParser>;

fn copy_round_trip() -> CopyRoundTrip {
    let logger = Logger::stderr(LogLevel::Error, "pipeline-test");
    let session = CodecSession::new(
        SessionConfig::new(WIDTH, HEIGHT, 1000),
        DelayedCopyEncoder::default(),
        CopyDecoder::default(),
        WholeSpanParser,
        logger.clone(),
    );
    RoundTrip::new(session, logger)
}

fn input_stream(extra: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend(BgraImage::solid(WIDTH, HEIGHT, 0, 0, 0).into_bytes());
    bytes.extend(BgraImage::solid(WIDTH, HEIGHT, 200, 100, 50).into_bytes());
    bytes.extend(BgraImage::solid(WIDTH, HEIGHT, 255, 255, 255).into_bytes());
    bytes.extend(vec![0u8; extra]);
    bytes
}

fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(
            (i32::from(*a) - i32::from(*e)).abs() <= 4,
            "{:?} not close to {:?}",
            actual,
            expected
        );
    }
}

#[test]
fn test_pipeline_writes_filler_then_delayed_frames() {
    let mut round_trip = copy_round_trip();
    let mut reader = RawFrameReader::new(Cursor::new(input_stream(0)), WIDTH, HEIGHT);
    let mut writer = RawFrameWriter::new(Vec::new(), WIDTH, HEIGHT);
    let logger = Logger::stderr(LogLevel::Error, "pipeline-test");

    let summary = run(
        &mut round_trip,
        &mut reader,
        &mut writer,
        &OutputConfig { emit_filler: true },
        &logger,
    )
    .unwrap();

    assert_eq!(summary.frames_read, 3);
    assert_eq!(summary.round_trip.produced_frames, 2);
    assert_eq!(summary.round_trip.filler_frames, 1);
    assert_eq!(summary.frames_written, 3);
    assert_eq!(summary.round_trip.bytes_coded, 2 * (WIDTH * HEIGHT * 2) as u64);
    assert_eq!(summary.partial_bytes, 0);

    let bytes = writer.finish().unwrap();
    let frame_len = BgraImage::byte_len(WIDTH, HEIGHT);
    assert_eq!(bytes.len(), 3 * frame_len);

    let frames: Vec<BgraImage> = bytes
        .chunks(frame_len)
        .map(|chunk| BgraImage::from_bytes(WIDTH, HEIGHT, chunk.to_vec()).unwrap())
        .collect();

    // Filler: saturated luma, neutral chroma
    assert_close(frames[0].pixel(0, 0), [255, 255, 255, 255]);
    // Then the input, one frame late
    assert_close(frames[1].pixel(3, 1), [0, 0, 0, 255]);
    assert_close(frames[2].pixel(1, 0), [200, 100, 50, 255]);
}

#[test]
fn test_pipeline_can_skip_filler() {
    let mut round_trip = copy_round_trip();
    let mut reader = RawFrameReader::new(Cursor::new(input_stream(0)), WIDTH, HEIGHT);
    let mut writer = RawFrameWriter::new(Vec::new(), WIDTH, HEIGHT);
    let logger = Logger::stderr(LogLevel::Error, "pipeline-test");

    let summary = run(
        &mut round_trip,
        &mut reader,
        &mut writer,
        &OutputConfig { emit_filler: false },
        &logger,
    )
    .unwrap();

    assert_eq!(summary.frames_read, 3);
    assert_eq!(summary.frames_written, 2);
    assert_eq!(writer.finish().unwrap().len(), 2 * BgraImage::byte_len(WIDTH, HEIGHT));
}

#[test]
fn test_pipeline_ignores_trailing_partial_frame() {
    let mut round_trip = copy_round_trip();
    let mut reader = RawFrameReader::new(Cursor::new(input_stream(7)), WIDTH, HEIGHT);
    let mut writer = RawFrameWriter::new(Vec::new(), WIDTH, HEIGHT);
    let logger = Logger::stderr(LogLevel::Error, "pipeline-test");

    let summary = run(
        &mut round_trip,
        &mut reader,
        &mut writer,
        &OutputConfig::default(),
        &logger,
    )
    .unwrap();

    assert_eq!(summary.frames_read, 3);
    assert_eq!(summary.partial_bytes, 7);
    assert_eq!(round_trip.pts(), 3);
}
