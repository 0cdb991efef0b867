//! Single-owner byte buffer carrying coded data from the encoder drain to
//! the bitstream parser within one round-trip cycle.

use super::constants::transfer::TRANSFER_PADDING;

/// Payload followed by [`TRANSFER_PADDING`] zeroed bytes.
///
/// A fresh buffer is allocated for every cycle; nothing outlives the call
/// that built it.
#[derive(Debug)]
pub struct TransferBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl TransferBuffer {
    /// Builds `carry ++ unit` followed by the zeroed padding tail.
    pub fn new(carry: &[u8], unit: &[u8]) -> Self {
        let len = carry.len() + unit.len();
        let mut bytes = Vec::with_capacity(len + TRANSFER_PADDING);
        bytes.extend_from_slice(carry);
        bytes.extend_from_slice(unit);
        bytes.resize(len + TRANSFER_PADDING, 0);
        TransferBuffer { bytes, len }
    }

    /// Payload length, excluding padding.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View of the payload starting at `offset`, padding included.
    ///
    /// # Panics
    ///
    /// Panics if `offset > self.len()`.
    pub fn padded_from(&self, offset: usize) -> PaddedInput<'_> {
        assert!(offset <= self.len, "offset past end of payload");
        PaddedInput {
            bytes: &self.bytes[offset..],
            len: self.len - offset,
        }
    }

    /// Unconsumed payload bytes from `offset` onwards.
    pub fn remainder(&self, offset: usize) -> &[u8] {
        &self.bytes[offset.min(self.len)..self.len]
    }
}

/// Borrowed parser input guaranteed to be followed by at least
/// [`TRANSFER_PADDING`] readable zero bytes.
#[derive(Debug, Clone, Copy)]
pub struct PaddedInput<'a> {
    bytes: &'a [u8],
    len: usize,
}

impl<'a> PaddedInput<'a> {
    /// Bytes the parser may consume.
    pub fn data(&self) -> &'a [u8] {
        &self.bytes[..self.len]
    }

    /// Payload plus padding, for readers that over-read.
    pub fn padded(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
