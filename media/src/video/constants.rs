//! Video-specific constants
//!
//! Constants for H.264 NAL parsing, YUV 4:2:2 plane layout and the
//! round-trip buffers.

/// H.264 NAL unit start codes
pub mod h264 {
    /// 4-byte NAL start code (0x00 0x00 0x00 0x01)
    pub const NAL_START_CODE_4: [u8; 4] = [0x00, 0x00, 0x00, 0x01];
    /// 3-byte NAL start code (0x00 0x00 0x01)
    pub const NAL_START_CODE_3: [u8; 3] = [0x00, 0x00, 0x01];
    /// NAL unit type mask (lower 5 bits)
    pub const NAL_TYPE_MASK: u8 = 0x1F;
    /// NAL unit type: Non-IDR coded slice
    pub const NAL_TYPE_NON_IDR: u8 = 1;
    /// NAL unit type: IDR coded slice (keyframe)
    pub const NAL_TYPE_IDR: u8 = 5;
    /// NAL unit type: SEI
    pub const NAL_TYPE_SEI: u8 = 6;
    /// NAL unit type: SPS (Sequence Parameter Set)
    pub const NAL_TYPE_SPS: u8 = 7;
    /// NAL unit type: PPS (Picture Parameter Set)
    pub const NAL_TYPE_PPS: u8 = 8;
    /// Length of 3-byte start code
    pub const START_CODE_3_LEN: usize = 3;
}

/// YUV 4:2:2 planar layout constants
pub mod yuv {
    /// Y, Cb, Cr
    pub const PLANE_COUNT: usize = 3;
    /// Y plane index in FFmpeg frame
    pub const Y_PLANE_INDEX: usize = 0;
    /// Cb (U) plane index in FFmpeg frame
    pub const U_PLANE_INDEX: usize = 1;
    /// Cr (V) plane index in FFmpeg frame
    pub const V_PLANE_INDEX: usize = 2;
    /// Horizontal chroma subsampling factor; chroma keeps full vertical resolution
    pub const CHROMA_H_DIVISOR: usize = 2;
    /// Luma value of the blank filler frame
    pub const FILLER_LUMA: u8 = 255;
    /// Chroma value of the blank filler frame (neutral)
    pub const FILLER_CHROMA: u8 = 128;
}

/// Interleaved native image constants
pub mod bgra {
    /// B, G, R, A
    pub const BYTES_PER_PIXEL: usize = 4;
    pub const B_OFFSET: usize = 0;
    pub const G_OFFSET: usize = 1;
    pub const R_OFFSET: usize = 2;
    pub const A_OFFSET: usize = 3;
    /// Alpha written for every converted pixel
    pub const OPAQUE: u8 = 255;
}

/// Round-trip transfer buffer constants
pub mod transfer {
    /// Zeroed bytes kept past the payload of every transfer buffer.
    ///
    /// Matches FFmpeg's `AV_INPUT_BUFFER_PADDING_SIZE`: the bitstream parser
    /// may read this far past the end of its input.
    pub const TRANSFER_PADDING: usize = 64;
}

/// Session defaults
pub mod session {
    pub const DEFAULT_WIDTH: usize = 1280;
    pub const DEFAULT_HEIGHT: usize = 720;
    pub const DEFAULT_FPS: u32 = 25;
    /// One keyframe per second at the default frame rate
    pub const DEFAULT_GOP: u32 = 25;
    pub const DEFAULT_QMIN: i32 = 10;
    pub const DEFAULT_QMAX: i32 = 51;
    /// Highest quantizer H.264 allows for 8-bit content
    pub const MAX_QP: i32 = 51;
    pub const DEFAULT_PRESET: &str = "ultrafast";
    pub const DEFAULT_TUNE: &str = "zerolatency";
    /// Rate-control buffer length
    pub const VBV_BUFFER_SECONDS: u64 = 1;
}
