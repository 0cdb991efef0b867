//! Frame format converters
//!
//! Utilities for converting between interleaved BGRA and planar YUV 4:2:2

pub mod yuv422_converter;

pub use yuv422_converter::{to_native, to_native_into, to_planar, to_planar_into};
