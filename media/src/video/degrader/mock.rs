//! Scripted collaborators for driving the round trip without FFmpeg.
//!
//! The encoder "compresses" a picture into a record `[len: u32][pts: i64]
//! [Y][Cb][Cr]`, the parser cuts records back out of the byte stream and the
//! decoder lays the planes out again with its own padded strides. Content
//! therefore survives a round trip exactly, which lets tests check plane
//! copies and stride handling byte for byte.

use crate::error::{MediaError, Result};
use crate::video::constants::transfer::TRANSFER_PADDING;
use crate::video::constants::yuv::{CHROMA_H_DIVISOR, PLANE_COUNT};
use crate::video::traits::{
    AccessUnit, BitstreamParser, CodedUnit, DecodedPicture, ScanResult, VideoDecoder,
    VideoEncoder,
};
use crate::video::transfer::PaddedInput;
use std::collections::VecDeque;

/// Extra bytes per staging row
const ENCODER_STRIDE_PAD: usize = 8;
/// Extra bytes per decoded row
const DECODER_STRIDE_PAD: usize = 16;
/// Filler written into row padding; must never reach a caller's frame
const PAD_BYTE: u8 = 0xAA;
/// `len: u32` followed by `pts: i64`
pub const RECORD_HEADER: usize = 12;

fn plane_width(width: usize, plane: usize) -> usize {
    if plane == 0 {
        width
    } else {
        width / CHROMA_H_DIVISOR
    }
}

fn encode_record(pts: i64, payload: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(RECORD_HEADER + payload.len());
    record.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    record.extend_from_slice(&pts.to_le_bytes());
    record.extend_from_slice(payload);
    record
}

/// Encoder that emits one record per picture after `latency` pictures.
pub struct ScriptedEncoder {
    width: usize,
    height: usize,
    staged: Option<[Vec<u8>; PLANE_COUNT]>,
    held: VecDeque<(i64, Vec<u8>)>,
    ready: VecDeque<CodedUnit>,
    latency: usize,
    units_per_frame: usize,
    fail_at: Option<i64>,
    split_records: bool,
    pending_tail: Vec<u8>,
    submitted_pts: Vec<i64>,
    bitrate: u32,
}

impl ScriptedEncoder {
    pub fn new(width: usize, height: usize) -> Self {
        ScriptedEncoder {
            width,
            height,
            staged: None,
            held: VecDeque::new(),
            ready: VecDeque::new(),
            latency: 0,
            units_per_frame: 1,
            fail_at: None,
            split_records: false,
            pending_tail: Vec::new(),
            submitted_pts: Vec::new(),
            bitrate: 0,
        }
    }

    /// Holds back `frames` pictures before emitting anything.
    pub fn with_latency(mut self, frames: usize) -> Self {
        self.latency = frames;
        self
    }

    /// Emits `count` identical units per picture.
    pub fn with_units_per_frame(mut self, count: usize) -> Self {
        self.units_per_frame = count;
        self
    }

    /// Rejects the submission tagged `pts`.
    pub fn failing_at(mut self, pts: i64) -> Self {
        self.fail_at = Some(pts);
        self
    }

    /// Cuts every record in half and ships the second half with the next
    /// picture's unit, so no unit is ever parseable on its own.
    pub fn splitting_records(mut self) -> Self {
        self.split_records = true;
        self
    }

    /// Bitrate reported through `get_bitrate`.
    pub fn with_bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = bitrate;
        self
    }

    pub fn submitted(&self) -> usize {
        self.submitted_pts.len()
    }

    pub fn submitted_pts(&self) -> &[i64] {
        &self.submitted_pts
    }

    /// Exact byte size of one coded record at this geometry.
    pub fn record_len(&self) -> usize {
        RECORD_HEADER + self.width * self.height * 2
    }

    fn release(&mut self, pts: i64, record: Vec<u8>) {
        let data = if self.split_records {
            let mid = record.len() / 2;
            let mut data = std::mem::take(&mut self.pending_tail);
            data.extend_from_slice(&record[..mid]);
            self.pending_tail = record[mid..].to_vec();
            data
        } else {
            record
        };
        for _ in 0..self.units_per_frame {
            self.ready.push_back(CodedUnit {
                data: data.clone(),
                pts,
                is_key: false,
            });
        }
    }
}

impl VideoEncoder for ScriptedEncoder {
    fn staging_plane(&mut self, plane: usize) -> Result<(&mut [u8], usize)> {
        if plane >= PLANE_COUNT {
            return Err(MediaError::Protocol(format!("no plane {}", plane)));
        }
        let (width, height) = (self.width, self.height);
        let staged = self.staged.get_or_insert_with(|| {
            std::array::from_fn(|p| vec![PAD_BYTE; (plane_width(width, p) + ENCODER_STRIDE_PAD) * height])
        });
        let stride = plane_width(width, plane) + ENCODER_STRIDE_PAD;
        Ok((staged[plane].as_mut_slice(), stride))
    }

    fn submit_staged(&mut self, pts: i64) -> Result<()> {
        let planes = self
            .staged
            .take()
            .ok_or_else(|| MediaError::Protocol("nothing staged".to_string()))?;
        if self.fail_at == Some(pts) {
            return Err(MediaError::Codec(format!("scripted failure at pts {}", pts)));
        }

        let mut payload = Vec::new();
        for (p, plane) in planes.iter().enumerate() {
            let width = plane_width(self.width, p);
            let stride = width + ENCODER_STRIDE_PAD;
            for row in 0..self.height {
                payload.extend_from_slice(&plane[row * stride..row * stride + width]);
            }
        }
        self.submitted_pts.push(pts);
        self.held.push_back((pts, encode_record(pts, &payload)));

        while self.held.len() > self.latency {
            if let Some((pts, record)) = self.held.pop_front() {
                self.release(pts, record);
            }
        }
        Ok(())
    }

    fn poll_coded_unit(&mut self) -> Result<CodedUnit> {
        self.ready.pop_front().ok_or(MediaError::NotReady)
    }

    fn get_codec(&self) -> &str {
        "scripted"
    }

    fn get_bitrate(&self) -> u32 {
        self.bitrate
    }
}

/// Parser that cuts length-prefixed records out of the stream.
#[derive(Default)]
pub struct LengthPrefixParser {
    units_emitted: usize,
}

impl LengthPrefixParser {
    pub fn units_emitted(&self) -> usize {
        self.units_emitted
    }
}

impl BitstreamParser for LengthPrefixParser {
    fn scan(&mut self, input: PaddedInput<'_>, _pts: i64) -> Result<ScanResult> {
        if input.padded().len() < input.len() + TRANSFER_PADDING {
            return Err(MediaError::Protocol("missing padding".to_string()));
        }
        let data = input.data();
        let need_more = ScanResult {
            unit: None,
            consumed: 0,
        };
        if data.len() < RECORD_HEADER {
            return Ok(need_more);
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&data[..4]);
        let mut pts_bytes = [0u8; 8];
        pts_bytes.copy_from_slice(&data[4..RECORD_HEADER]);

        let end = RECORD_HEADER + u32::from_le_bytes(len_bytes) as usize;
        if data.len() < end {
            return Ok(need_more);
        }

        self.units_emitted += 1;
        Ok(ScanResult {
            unit: Some(AccessUnit {
                data: data[RECORD_HEADER..end].to_vec(),
                pts: i64::from_le_bytes(pts_bytes),
            }),
            consumed: end,
        })
    }
}

/// Decoder that rebuilds padded planes from a record payload.
pub struct ScriptedDecoder {
    width: usize,
    height: usize,
    queue: VecDeque<DecodedPicture>,
    received: Vec<i64>,
    decoy: bool,
}

impl ScriptedDecoder {
    /// Produces pictures of `width`x`height`, whatever the session geometry.
    pub fn new(width: usize, height: usize) -> Self {
        ScriptedDecoder {
            width,
            height,
            queue: VecDeque::new(),
            received: Vec::new(),
            decoy: false,
        }
    }

    /// Queues an all-zero picture ahead of every real one.
    pub fn with_decoy(mut self) -> Self {
        self.decoy = true;
        self
    }

    /// Timestamps of every submitted unit.
    pub fn received(&self) -> &[i64] {
        &self.received
    }
}

impl VideoDecoder for ScriptedDecoder {
    fn submit_coded_unit(&mut self, data: &[u8], pts: i64) -> Result<()> {
        self.received.push(pts);

        let mut planes: [Vec<u8>; PLANE_COUNT] = Default::default();
        let mut strides = [0usize; PLANE_COUNT];
        let mut offset = 0;
        for p in 0..PLANE_COUNT {
            let width = plane_width(self.width, p);
            let stride = width + DECODER_STRIDE_PAD;
            let mut plane = vec![PAD_BYTE; stride * self.height];
            for row in 0..self.height {
                let src = data
                    .get(offset..offset + width)
                    .ok_or_else(|| MediaError::Codec("truncated unit".to_string()))?;
                plane[row * stride..row * stride + width].copy_from_slice(src);
                offset += width;
            }
            planes[p] = plane;
            strides[p] = stride;
        }

        if self.decoy {
            self.queue.push_back(DecodedPicture {
                width: self.width,
                height: self.height,
                planes: planes.clone().map(|plane| vec![0; plane.len()]),
                strides,
                pts: Some(pts),
            });
        }
        self.queue.push_back(DecodedPicture {
            width: self.width,
            height: self.height,
            planes,
            strides,
            pts: Some(pts),
        });
        Ok(())
    }

    fn poll_decoded_frame(&mut self) -> Result<DecodedPicture> {
        self.queue.pop_front().ok_or(MediaError::NotReady)
    }

    fn get_codec(&self) -> &str {
        "scripted"
    }
}
