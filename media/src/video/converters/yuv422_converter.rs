//! BGRA <-> YUV 4:2:2 planar conversion
//!
//! BT.601 studio-swing coefficients. Every intermediate is truncated toward
//! zero before integer arithmetic and saturated to `[0, 255]` on store, so a
//! BGRA -> YUV -> BGRA trip is lossy.

use crate::error::{MediaError, Result};
use crate::video::constants::bgra::{
    A_OFFSET, B_OFFSET, BYTES_PER_PIXEL, G_OFFSET, OPAQUE, R_OFFSET,
};
use crate::video::frame::{BgraImage, Yuv422Frame};

/// Two horizontally adjacent BGRA pixels share one chroma sample.
const PAIR_BYTES: usize = 2 * BYTES_PER_PIXEL;

/// Converts a BGRA image into a newly allocated YUV 4:2:2 frame.
///
/// # Errors
///
/// Returns `InvalidFrame` if the image width is odd or either dimension is zero.
pub fn to_planar(native: &BgraImage) -> Result<Yuv422Frame> {
    let mut frame = Yuv422Frame::new(native.width(), native.height())?;
    to_planar_into(native, &mut frame)?;
    Ok(frame)
}

/// Converts a BGRA image into an existing YUV 4:2:2 frame.
///
/// Luma is computed per pixel; each chroma sample averages the two pixels of
/// a horizontal pair.
///
/// # Errors
///
/// Returns `InvalidFrame` if the image and frame geometries differ.
pub fn to_planar_into(native: &BgraImage, frame: &mut Yuv422Frame) -> Result<()> {
    check_geometry(native, frame)?;

    let width = frame.width();
    let chroma_width = frame.chroma_width();
    let (luma, cb, cr) = frame.planes_mut();

    let rows = native.data().chunks_exact(width * BYTES_PER_PIXEL);
    let luma_rows = luma.chunks_exact_mut(width);
    let chroma_rows = cb
        .chunks_exact_mut(chroma_width)
        .zip(cr.chunks_exact_mut(chroma_width));

    for ((bgra_row, luma_row), (cb_row, cr_row)) in rows.zip(luma_rows).zip(chroma_rows) {
        for (dst, pixel) in luma_row.iter_mut().zip(bgra_row.chunks_exact(BYTES_PER_PIXEL)) {
            *dst = luma_sample(pixel);
        }

        for ((cb_dst, cr_dst), pair) in cb_row
            .iter_mut()
            .zip(cr_row.iter_mut())
            .zip(bgra_row.chunks_exact(PAIR_BYTES))
        {
            let (first, second) = pair.split_at(BYTES_PER_PIXEL);
            *cb_dst = clamp_pixel((cb_sample(first) + cb_sample(second)) / 2);
            *cr_dst = clamp_pixel((cr_sample(first) + cr_sample(second)) / 2);
        }
    }

    Ok(())
}

/// Converts a YUV 4:2:2 frame into a newly allocated BGRA image.
pub fn to_native(frame: &Yuv422Frame) -> BgraImage {
    let mut native = BgraImage::new(frame.width(), frame.height());
    write_native(frame, &mut native);
    native
}

/// Converts a YUV 4:2:2 frame into an existing BGRA image.
///
/// Chroma for pixel `(x, y)` comes from `(x / 2, y)`. Alpha is always 255.
///
/// # Errors
///
/// Returns `InvalidFrame` if the image and frame geometries differ.
pub fn to_native_into(frame: &Yuv422Frame, native: &mut BgraImage) -> Result<()> {
    check_geometry(native, frame)?;
    write_native(frame, native);
    Ok(())
}

fn write_native(frame: &Yuv422Frame, native: &mut BgraImage) {
    let width = frame.width();
    let chroma_width = frame.chroma_width();

    let rows = native.data_mut().chunks_exact_mut(width * BYTES_PER_PIXEL);
    let luma_rows = frame.luma().chunks_exact(width);
    let chroma_rows = frame
        .cb()
        .chunks_exact(chroma_width)
        .zip(frame.cr().chunks_exact(chroma_width));

    for ((bgra_row, luma_row), (cb_row, cr_row)) in rows.zip(luma_rows).zip(chroma_rows) {
        for (x, (pixel, &y)) in bgra_row
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(luma_row)
            .enumerate()
        {
            let [b, g, r] = bgr_from_yuv(y, cb_row[x / 2], cr_row[x / 2]);
            pixel[B_OFFSET] = b;
            pixel[G_OFFSET] = g;
            pixel[R_OFFSET] = r;
            pixel[A_OFFSET] = OPAQUE;
        }
    }
}

fn check_geometry(native: &BgraImage, frame: &Yuv422Frame) -> Result<()> {
    if native.has_geometry(frame.width(), frame.height()) {
        Ok(())
    } else {
        Err(MediaError::InvalidFrame(format!(
            "BGRA image is {}x{} but planar frame is {}x{}",
            native.width(),
            native.height(),
            frame.width(),
            frame.height()
        )))
    }
}

/// Saturates to the 8-bit sample range.
fn clamp_pixel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

fn channels(pixel: &[u8]) -> (f64, f64, f64) {
    (
        f64::from(pixel[B_OFFSET]),
        f64::from(pixel[G_OFFSET]),
        f64::from(pixel[R_OFFSET]),
    )
}

fn luma_sample(pixel: &[u8]) -> u8 {
    let (b, g, r) = channels(pixel);
    clamp_pixel((0.098 * b + 0.504 * g + 0.257 * r + 16.0) as i32)
}

fn cb_sample(pixel: &[u8]) -> i32 {
    let (b, g, r) = channels(pixel);
    (0.439 * b - 0.291 * g - 0.148 * r + 128.0) as i32
}

fn cr_sample(pixel: &[u8]) -> i32 {
    let (b, g, r) = channels(pixel);
    (-0.071 * b - 0.368 * g + 0.439 * r + 128.0) as i32
}

fn bgr_from_yuv(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = 1.164 * (f64::from(y) - 16.0);
    let cb = f64::from(cb) - 128.0;
    let cr = f64::from(cr) - 128.0;

    [
        clamp_pixel((y + 2.018 * cb) as i32),
        clamp_pixel((y - 0.391 * cb - 0.813 * cr) as i32),
        clamp_pixel((y + 1.596 * cr) as i32),
    ]
}
