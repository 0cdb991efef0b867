//! Raw BGRA frame files.
//!
//! Frames are `width * height * 4` bytes each, concatenated with no header.

use crate::error::{DegraderError, Result};
use media::BgraImage;
use std::io::{ErrorKind, Read, Write};

/// Outcome of one [`RawFrameReader::read_frame`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameRead {
    Frame(BgraImage),
    /// The stream ended part-way through a frame; holds the stray byte count
    Partial(usize),
    End,
}

/// Reads fixed-size BGRA frames from a byte stream.
pub struct RawFrameReader<R> {
    reader: R,
    width: usize,
    height: usize,
    frames_read: u64,
}

impl<R: Read> RawFrameReader<R> {
    pub fn new(reader: R, width: usize, height: usize) -> Self {
        RawFrameReader {
            reader,
            width,
            height,
            frames_read: 0,
        }
    }

    pub fn frame_len(&self) -> usize {
        BgraImage::byte_len(self.width, self.height)
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Reads the next frame.
    ///
    /// Short reads are retried until the frame is complete or the stream
    /// ends; after `Partial` or `End` the reader should not be used again.
    pub fn read_frame(&mut self) -> Result<FrameRead> {
        let mut buffer = vec![0u8; self.frame_len()];
        let mut filled = 0;
        while filled < buffer.len() {
            match self.reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DegraderError::Io(e)),
            }
        }

        if filled == 0 {
            return Ok(FrameRead::End);
        }
        if filled < buffer.len() {
            return Ok(FrameRead::Partial(filled));
        }

        self.frames_read += 1;
        let image = BgraImage::from_bytes(self.width, self.height, buffer)?;
        Ok(FrameRead::Frame(image))
    }
}

/// Writes BGRA frames back to back.
pub struct RawFrameWriter<W: Write> {
    writer: W,
    width: usize,
    height: usize,
    frames_written: u64,
}

impl<W: Write> RawFrameWriter<W> {
    pub fn new(writer: W, width: usize, height: usize) -> Self {
        RawFrameWriter {
            writer,
            width,
            height,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn write_frame(&mut self, image: &BgraImage) -> Result<()> {
        if !image.has_geometry(self.width, self.height) {
            return Err(DegraderError::Config(format!(
                "frame is {}x{}, output expects {}x{}",
                image.width(),
                image.height(),
                self.width,
                self.height
            )));
        }
        self.writer.write_all(image.data())?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader handing out at most `chunk` bytes per call
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_reads_whole_frames() {
        let data: Vec<u8> = (0..32).collect();
        let mut reader = RawFrameReader::new(Cursor::new(data), 2, 2);

        let FrameRead::Frame(first) = reader.read_frame().unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!(first.data(), &(0..16).collect::<Vec<u8>>()[..]);
        assert!(matches!(reader.read_frame().unwrap(), FrameRead::Frame(_)));
        assert_eq!(reader.read_frame().unwrap(), FrameRead::End);
        assert_eq!(reader.frames_read(), 2);
    }

    #[test]
    fn test_trailing_partial_frame() {
        let mut reader = RawFrameReader::new(Cursor::new(vec![1u8; 16 + 5]), 2, 2);

        assert!(matches!(reader.read_frame().unwrap(), FrameRead::Frame(_)));
        assert_eq!(reader.read_frame().unwrap(), FrameRead::Partial(5));
        assert_eq!(reader.frames_read(), 1);
    }

    #[test]
    fn test_short_reads_are_reassembled() {
        let trickle = Trickle {
            data: vec![9u8; 32],
            pos: 0,
            chunk: 3,
        };
        let mut reader = RawFrameReader::new(trickle, 2, 2);

        assert!(matches!(reader.read_frame().unwrap(), FrameRead::Frame(_)));
        assert!(matches!(reader.read_frame().unwrap(), FrameRead::Frame(_)));
        assert_eq!(reader.read_frame().unwrap(), FrameRead::End);
    }

    #[test]
    fn test_writer_checks_geometry() {
        let mut writer = RawFrameWriter::new(Vec::new(), 2, 2);

        writer.write_frame(&BgraImage::solid(2, 2, 1, 2, 3)).unwrap();
        assert!(writer.write_frame(&BgraImage::solid(4, 2, 1, 2, 3)).is_err());
        assert_eq!(writer.frames_written(), 1);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, [1, 2, 3, 255].repeat(4));
    }
}
