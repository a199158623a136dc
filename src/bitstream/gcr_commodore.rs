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
//! Commodore 1541-family GCR (Group Code Recording) bitcell codec.
//!
//! Every nibble is expanded to a 5-bit GCR code chosen so no code contains more than two
//! consecutive zero bits; four source bytes therefore always encode to exactly five GCR
//! bytes (40 bits either way). Sectors are framed by raw sync runs (ten or more consecutive
//! one bits) rather than a fixed mark byte, since GCR's own coding guarantees that many
//! consecutive ones cannot occur in legal data.

use crate::bitstream::BitCursor;
use bit_vec::BitVec;

const ENCODE_TABLE: [u8; 16] = [
    0b01010, 0b01011, 0b10010, 0b10011, 0b01110, 0b01111, 0b10110, 0b10111, 0b01001, 0b11001, 0b11010, 0b11011,
    0b01101, 0b11101, 0b11110, 0b10101,
];

/// Header block marker, following a sync run.
pub const HEADER_BLOCK: u8 = 0x08;
/// Data block marker, following a sync run.
pub const DATA_BLOCK: u8 = 0x07;

fn decode_table() -> [Option<u8>; 32] {
    let mut table = [None; 32];
    for (nibble, &code) in ENCODE_TABLE.iter().enumerate() {
        table[code as usize] = Some(nibble as u8);
    }
    table
}

/// Encode a 4-bit nibble into its 5-bit GCR code.
pub fn encode_nibble(nibble: u8) -> u8 {
    ENCODE_TABLE[(nibble & 0x0F) as usize]
}

/// Decode a 5-bit GCR code back to a nibble, or `None` if the code is not one of the 16
/// legal codes (an invalid code is how GCR surfaces a corrupt/unformatted sector).
pub fn decode_nibble(code: u8) -> Option<u8> {
    decode_table()[(code & 0x1F) as usize]
}

/// XOR checksum over `data`, the scheme every 1541 header and sector block uses.
pub fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Encode `data` as a run of GCR nibble pairs, appended to `out`.
pub fn gcr_encode_bytes(data: &[u8], out: &mut BitVec) {
    for &byte in data {
        let hi = encode_nibble(byte >> 4);
        let lo = encode_nibble(byte & 0x0F);
        for i in (0..5).rev() {
            out.push((hi >> i) & 1 != 0);
        }
        for i in (0..5).rev() {
            out.push((lo >> i) & 1 != 0);
        }
    }
}

/// Decode `n` bytes' worth of GCR nibble pairs from the cursor. Returns `None` if the
/// stream runs out or an illegal 5-bit code is encountered.
pub fn gcr_decode_bytes(cursor: &mut BitCursor, n: usize) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let hi_code = cursor.take(5)? as u8;
        let lo_code = cursor.take(5)? as u8;
        let hi = decode_nibble(hi_code)?;
        let lo = decode_nibble(lo_code)?;
        out.push((hi << 4) | lo);
    }
    Some(out)
}

/// Scan forward for a sync run of at least 10 consecutive one bits, consuming through the
/// entire run (including any additional trailing one bits) so the cursor sits exactly on
/// the first data bit after sync.
pub fn find_sync(cursor: &mut BitCursor) -> bool {
    let mut ones = 0usize;
    loop {
        match cursor.next_bit() {
            Some(true) => {
                ones += 1;
                if ones >= 10 {
                    while cursor.peek(1) == Some(1) {
                        cursor.take(1);
                    }
                    return true;
                }
            }
            Some(false) => ones = 0,
            None => return false,
        }
    }
}

/// Emit a sync run of `bits` one-bits (conventionally 40, i.e. 5 bytes of `0xFF`-worth of
/// raw flux, though shorter runs are legal on real disks).
pub fn encode_sync(bits: usize, out: &mut BitVec) {
    for _ in 0..bits {
        out.push(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_round_trip_all_values() {
        for n in 0u8..16 {
            let code = encode_nibble(n);
            assert_eq!(decode_nibble(code), Some(n));
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        // 0b00000 never appears in the encode table (too many consecutive zero bits).
        assert_eq!(decode_nibble(0b00000), None);
    }

    #[test]
    fn test_sync_then_header_round_trip() {
        let mut bits = BitVec::new();
        encode_sync(40, &mut bits);
        let header = [HEADER_BLOCK, 0x00, 0x05, 0x01, 0x22, 0x11];
        gcr_encode_bytes(&header, &mut bits);

        let mut cursor = BitCursor::new(&bits);
        assert!(find_sync(&mut cursor));
        let decoded = gcr_decode_bytes(&mut cursor, 6).unwrap();
        assert_eq!(decoded[0], HEADER_BLOCK);
        assert_eq!(decoded[2], 0x05);
    }

    #[test]
    fn test_xor_checksum() {
        assert_eq!(xor_checksum(&[0x01, 0x02, 0x03]), 0x00);
        assert_eq!(xor_checksum(&[0xFF, 0x0F]), 0xF0);
    }
}
