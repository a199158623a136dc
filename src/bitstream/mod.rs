/*
    uft
    https://github.com/uft-rs/uft

    Copyright 2026 The uft contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the "Software"),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/
//! Bitcell-level codecs: MFM, FM, and the Commodore/Apple GCR variants.
//!
//! Each codec turns a stream of decoded bitcells (produced by the flux PLL, see
//! [`crate::flux`]) into address marks and sector payloads, and back. The shared
//! [`BitCursor`] type walks a [`bit_vec::BitVec`] with a simple index plus helpers for
//! peeking ahead without consuming.

pub mod fm;
pub mod gcr_apple;
pub mod gcr_commodore;
pub mod mfm;

use bit_vec::BitVec;

/// A forward-only cursor over a decoded bitstream.
#[derive(Clone)]
pub struct BitCursor<'a> {
    bits: &'a BitVec,
    pos: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(bits: &'a BitVec) -> Self {
        Self { bits, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bits.len().saturating_sub(self.pos)
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.bits.len());
    }

    /// Peek at the next `n` bits without consuming them, most-significant bit first.
    pub fn peek(&self, n: usize) -> Option<u32> {
        if self.remaining() < n || n > 32 {
            return None;
        }
        let mut value = 0u32;
        for i in 0..n {
            value = (value << 1) | self.bits.get(self.pos + i)? as u32;
        }
        Some(value)
    }

    /// Read the next `n` bits, advancing the cursor.
    pub fn take(&mut self, n: usize) -> Option<u32> {
        let value = self.peek(n)?;
        self.pos += n;
        Some(value)
    }

    /// Advance by one bit and return it.
    pub fn next_bit(&mut self) -> Option<bool> {
        let b = self.bits.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }
}

/// Pack a byte slice into a `BitVec`, most-significant bit first (the convention every
/// codec in this module uses for raw payload bytes).
pub fn bytes_to_bits(bytes: &[u8]) -> BitVec {
    let mut bits = BitVec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1 != 0);
        }
    }
    bits
}

/// Inverse of [`bytes_to_bits`]: pack a bitstream back into bytes, MSB first, silently
/// dropping any trailing partial byte.
pub fn bits_to_bytes(bits: &BitVec) -> Vec<u8> {
    let mut out = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.iter().collect::<Vec<_>>().chunks(8) {
        if chunk.len() < 8 {
            break;
        }
        let mut byte = 0u8;
        for &b in chunk {
            byte = (byte << 1) | b as u8;
        }
        out.push(byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_bit_round_trip() {
        let data = [0x00u8, 0xFF, 0xA5, 0x5A];
        let bits = bytes_to_bits(&data);
        assert_eq!(bits.len(), 32);
        assert_eq!(bits_to_bytes(&bits), data);
    }

    #[test]
    fn test_cursor_peek_does_not_advance() {
        let bits = bytes_to_bits(&[0b1010_0101]);
        let mut cur = BitCursor::new(&bits);
        assert_eq!(cur.peek(4), Some(0b1010));
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.take(4), Some(0b1010));
        assert_eq!(cur.position(), 4);
    }
}
