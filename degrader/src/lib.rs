//! Channel degrader
//!
//! Command-line front end for the media round trip: reads raw BGRA frames,
//! degrades each one through a constrained H.264 channel and writes the
//! result.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod raw_io;

pub use config::DegraderConfig;
pub use error::{DegraderError, Result};
pub use pipeline::{RunSummary, run, run_files};
pub use raw_io::{FrameRead, RawFrameReader, RawFrameWriter};
