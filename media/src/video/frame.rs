//! Frame representations.
//!
//! [`Yuv422Frame`] is the planar 4:2:2 picture the round trip consumes and
//! produces; [`BgraImage`] is the interleaved 4-channel image callers read
//! from and write to disk. Both are tightly packed (row stride == row width).

use super::constants::bgra::{A_OFFSET, B_OFFSET, BYTES_PER_PIXEL, G_OFFSET, R_OFFSET};
use super::constants::yuv::{
    CHROMA_H_DIVISOR, FILLER_CHROMA, FILLER_LUMA, PLANE_COUNT, U_PLANE_INDEX, V_PLANE_INDEX,
    Y_PLANE_INDEX,
};
use crate::error::{MediaError, Result};

/// Planar YUV 4:2:2 frame
///
/// One full-resolution luma plane and two chroma planes at half horizontal
/// resolution, each tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yuv422Frame {
    width: usize,
    height: usize,
    planes: [Vec<u8>; PLANE_COUNT],
}

impl Yuv422Frame {
    /// Allocates a zeroed frame.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if either dimension is zero or the width is odd
    /// (4:2:2 pairs every two luma columns with one chroma sample).
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        let luma_size = width * height;
        let chroma_size = luma_size / CHROMA_H_DIVISOR;
        Ok(Yuv422Frame {
            width,
            height,
            planes: [
                vec![0; luma_size],
                vec![0; chroma_size],
                vec![0; chroma_size],
            ],
        })
    }

    /// Allocates a frame holding the blank filler picture.
    pub fn blank(width: usize, height: usize) -> Result<Self> {
        let mut frame = Self::new(width, height)?;
        frame.fill_blank();
        Ok(frame)
    }

    /// Builds a frame from existing plane buffers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if the dimensions are unusable or any plane has
    /// the wrong length.
    pub fn from_planes(
        width: usize,
        height: usize,
        luma: Vec<u8>,
        cb: Vec<u8>,
        cr: Vec<u8>,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let frame = Yuv422Frame {
            width,
            height,
            planes: [luma, cb, cr],
        };
        for index in 0..PLANE_COUNT {
            let expected = frame.plane_width(index) * height;
            if frame.planes[index].len() != expected {
                return Err(MediaError::InvalidFrame(format!(
                    "plane {} holds {} bytes, expected {}",
                    index,
                    frame.planes[index].len(),
                    expected
                )));
            }
        }
        Ok(frame)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of each chroma plane in samples.
    pub fn chroma_width(&self) -> usize {
        self.width / CHROMA_H_DIVISOR
    }

    /// Row width of plane `index` (0 = Y, 1 = Cb, 2 = Cr).
    pub fn plane_width(&self, index: usize) -> usize {
        if index == Y_PLANE_INDEX {
            self.width
        } else {
            self.chroma_width()
        }
    }

    /// Returns plane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`.
    pub fn plane(&self, index: usize) -> &[u8] {
        &self.planes[index]
    }

    /// Mutable access to plane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`.
    pub fn plane_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.planes[index]
    }

    pub fn luma(&self) -> &[u8] {
        &self.planes[Y_PLANE_INDEX]
    }

    pub fn cb(&self) -> &[u8] {
        &self.planes[U_PLANE_INDEX]
    }

    pub fn cr(&self) -> &[u8] {
        &self.planes[V_PLANE_INDEX]
    }

    /// Borrows all three planes mutably at once.
    pub fn planes_mut(&mut self) -> (&mut [u8], &mut [u8], &mut [u8]) {
        let [luma, cb, cr] = &mut self.planes;
        (luma.as_mut_slice(), cb.as_mut_slice(), cr.as_mut_slice())
    }

    /// Overwrites every sample with the filler picture: saturated luma and
    /// neutral chroma.
    pub fn fill_blank(&mut self) {
        self.planes[Y_PLANE_INDEX].fill(FILLER_LUMA);
        self.planes[U_PLANE_INDEX].fill(FILLER_CHROMA);
        self.planes[V_PLANE_INDEX].fill(FILLER_CHROMA);
    }

    /// True when every sample equals the filler picture.
    pub fn is_blank(&self) -> bool {
        self.luma().iter().all(|&v| v == FILLER_LUMA)
            && self.cb().iter().all(|&v| v == FILLER_CHROMA)
            && self.cr().iter().all(|&v| v == FILLER_CHROMA)
    }

    pub fn has_geometry(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MediaError::InvalidFrame(format!(
            "empty frame {}x{}",
            width, height
        )));
    }
    if width % CHROMA_H_DIVISOR != 0 {
        return Err(MediaError::InvalidFrame(format!(
            "width {} is odd; 4:2:2 needs an even width",
            width
        )));
    }
    Ok(())
}

/// Interleaved B, G, R, A image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgraImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BgraImage {
    /// Allocates a zeroed (transparent black) image.
    pub fn new(width: usize, height: usize) -> Self {
        BgraImage {
            width,
            height,
            data: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    /// Allocates an image where every pixel is `(b, g, r, 255)`.
    pub fn solid(width: usize, height: usize, b: u8, g: u8, r: u8) -> Self {
        let data = [b, g, r, u8::MAX].repeat(width * height);
        BgraImage {
            width,
            height,
            data,
        }
    }

    /// Wraps raw interleaved bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if `data` is not exactly `width*height*4` bytes.
    pub fn from_bytes(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width * height * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(MediaError::InvalidFrame(format!(
                "BGRA buffer holds {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(BgraImage {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Size in bytes of one image at `width`x`height`.
    pub fn byte_len(width: usize, height: usize) -> usize {
        width * height * BYTES_PER_PIXEL
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns `[b, g, r, a]` at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * self.width + x) * BYTES_PER_PIXEL;
        [
            self.data[offset + B_OFFSET],
            self.data[offset + G_OFFSET],
            self.data[offset + R_OFFSET],
            self.data[offset + A_OFFSET],
        ]
    }

    pub fn has_geometry(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_plane_sizes() {
        let frame = Yuv422Frame::new(16, 8).unwrap();

        assert_eq!(frame.luma().len(), 128);
        assert_eq!(frame.cb().len(), 64);
        assert_eq!(frame.cr().len(), 64);
        assert_eq!(frame.plane_width(0), 16);
        assert_eq!(frame.plane_width(2), 8);
    }

    #[test]
    fn test_frame_rejects_odd_width() {
        assert!(matches!(
            Yuv422Frame::new(15, 8),
            Err(MediaError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_frame_rejects_empty() {
        assert!(Yuv422Frame::new(0, 8).is_err());
        assert!(Yuv422Frame::new(16, 0).is_err());
    }

    #[test]
    fn test_blank_frame() {
        let frame = Yuv422Frame::blank(4, 2).unwrap();

        assert!(frame.is_blank());
        assert!(frame.luma().iter().all(|&v| v == 255));
        assert!(frame.cb().iter().all(|&v| v == 128));
    }

    #[test]
    fn test_from_planes_validates_lengths() {
        let ok = Yuv422Frame::from_planes(4, 2, vec![1; 8], vec![2; 4], vec![3; 4]);
        assert!(ok.is_ok());

        let short_chroma = Yuv422Frame::from_planes(4, 2, vec![1; 8], vec![2; 3], vec![3; 4]);
        assert!(matches!(short_chroma, Err(MediaError::InvalidFrame(_))));
    }

    #[test]
    fn test_planes_mut_are_disjoint() {
        let mut frame = Yuv422Frame::new(4, 1).unwrap();
        {
            let (luma, cb, cr) = frame.planes_mut();
            luma.fill(10);
            cb.fill(20);
            cr.fill(30);
        }
        assert_eq!(frame.luma(), &[10, 10, 10, 10]);
        assert_eq!(frame.cb(), &[20, 20]);
        assert_eq!(frame.cr(), &[30, 30]);
    }

    #[test]
    fn test_bgra_solid_and_pixel() {
        let image = BgraImage::solid(3, 2, 10, 20, 30);

        assert_eq!(image.data().len(), 24);
        assert_eq!(image.pixel(2, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_bgra_from_bytes_validates_length() {
        assert!(BgraImage::from_bytes(2, 2, vec![0; 16]).is_ok());
        assert!(BgraImage::from_bytes(2, 2, vec![0; 15]).is_err());
    }
}
