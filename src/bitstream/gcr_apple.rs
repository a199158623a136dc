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
//! Apple II "6-and-2" GCR bitcell codec.
//!
//! Unlike MFM/FM, Apple's disk bytes are already self-clocking (each legal disk byte has
//! its high bit set and never two consecutive zero bits), so this codec works directly on
//! byte-aligned "disk byte" streams rather than a raw [`bit_vec::BitVec`] — matching how
//! the 6-and-2 translate table itself is always described, byte in, byte out.

pub const ADDRESS_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0x96];
pub const DATA_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0xAD];
pub const EPILOGUE: [u8; 3] = [0xDE, 0xAA, 0xEB];

/// The 64-entry 6-and-2 translate table: a 6-bit value's on-disk byte representation.
/// Every entry has its high bit set and no two consecutive zero bits, which is what makes
/// the stream self-clocking.
const TRANSLATE_62: [u8; 64] = [
    0x96, 0x97, 0x9A, 0x9B, 0x9D, 0x9E, 0x9F, 0xA6, 0xA7, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xB2, 0xB3, 0xB4, 0xB5,
    0xB6, 0xB7, 0xB9, 0xBA, 0xBB, 0xBC, 0xBD, 0xBE, 0xBF, 0xCB, 0xCD, 0xCE, 0xCF, 0xD3, 0xD6, 0xD7, 0xD9, 0xDA,
    0xDB, 0xDC, 0xDD, 0xDE, 0xDF, 0xE5, 0xE6, 0xE7, 0xE9, 0xEA, 0xEB, 0xEC, 0xED, 0xEE, 0xEF, 0xF2, 0xF3, 0xF4,
    0xF5, 0xF6, 0xF7, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF,
];

fn reverse_table() -> [Option<u8>; 256] {
    let mut table = [None; 256];
    for (value, &byte) in TRANSLATE_62.iter().enumerate() {
        table[byte as usize] = Some(value as u8);
    }
    table
}

/// Encode a 6-bit value (0..=63) to its on-disk byte.
pub fn encode_62(value: u8) -> u8 {
    TRANSLATE_62[(value & 0x3F) as usize]
}

/// Decode an on-disk byte back to its 6-bit value, or `None` if it is not a legal 6-and-2
/// byte (a corrupt or unformatted track produces these).
pub fn decode_62(byte: u8) -> Option<u8> {
    reverse_table()[byte as usize]
}

/// Encode a disk-address byte (volume, track, sector, or checksum) as two "4-and-4" bytes
/// whose odd/even bit positions each carry half of the original value, with the
/// complementary bits forced high so every resulting byte is self-clocking.
pub fn encode_44(value: u8) -> (u8, u8) {
    ((value >> 1) | 0xAA, value | 0xAA)
}

/// Inverse of [`encode_44`].
pub fn decode_44(odd: u8, even: u8) -> u8 {
    ((odd << 1) | 0x01) & even
}

/// Nibblize 256 data bytes into the 342-byte on-disk sequence (86 "secondary" bytes
/// carrying the low 2 bits of three byte groups, followed by 256 "primary" bytes carrying
/// the top 6 bits), XOR-chained so each byte's value depends on the one before it, plus a
/// trailing checksum value. Returns the 343 not-yet-table-encoded 6-bit values (342 data +
/// 1 checksum); the caller runs [`encode_62`] over each to get on-disk bytes.
pub fn nibblize(data: &[u8; 256]) -> [u8; 343] {
    let mut secondary = [0u8; 86];
    for i in 0..86 {
        let s0 = data[i] & 0x03;
        let s1 = data[i + 86] & 0x03;
        let s2 = if i < 84 { data[i + 172] & 0x03 } else { 0 };
        secondary[i] = (s2 << 4) | (s1 << 2) | s0;
    }

    let mut out = [0u8; 343];
    let mut last = 0u8;
    for i in 0..86 {
        out[i] = secondary[i] ^ last;
        last = secondary[i];
    }
    for i in 0..256 {
        let primary = data[i] >> 2;
        out[86 + i] = primary ^ last;
        last = primary;
    }
    out[342] = last;
    out
}

/// Inverse of [`nibblize`]. Returns `None` if the supplied checksum value does not match
/// (the on-disk sector is corrupt).
pub fn denibblize(values: &[u8; 343]) -> Option<[u8; 256]> {
    let mut last = 0u8;
    let mut secondary = [0u8; 86];
    for i in 0..86 {
        secondary[i] = values[i] ^ last;
        last = secondary[i];
    }
    let mut primary = [0u8; 256];
    for i in 0..256 {
        primary[i] = values[86 + i] ^ last;
        last = primary[i];
    }
    if last != values[342] {
        return None;
    }

    let mut data = [0u8; 256];
    for i in 0..86 {
        let s0 = secondary[i] & 0x03;
        let s1 = (secondary[i] >> 2) & 0x03;
        let s2 = (secondary[i] >> 4) & 0x03;
        data[i] = (primary[i] << 2) | s0;
        data[i + 86] = (primary[i + 86] << 2) | s1;
        if i < 84 {
            data[i + 172] = (primary[i + 172] << 2) | s2;
        }
    }
    Some(data)
}

/// Scan `bytes` for `needle` (a 3-byte prologue/epilogue), returning the offset just past
/// the match.
pub fn find_marker(bytes: &[u8], needle: &[u8; 3]) -> Option<usize> {
    bytes.windows(3).position(|w| w == needle).map(|pos| pos + 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_62_table_round_trip_all_values() {
        for v in 0u8..64 {
            assert_eq!(decode_62(encode_62(v)), Some(v));
        }
    }

    #[test]
    fn test_44_round_trip() {
        for v in 0u8..=255 {
            let (odd, even) = encode_44(v);
            assert_eq!(decode_44(odd, even), v);
        }
    }

    #[test]
    fn test_nibblize_round_trip() {
        let mut data = [0u8; 256];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i * 37 + 11) as u8;
        }
        let nibbles = nibblize(&data);
        let recovered = denibblize(&nibbles).unwrap();
        assert_eq!(recovered, data);
    }

    #[test]
    fn test_denibblize_rejects_bad_checksum() {
        let data = [0x42u8; 256];
        let mut nibbles = nibblize(&data);
        nibbles[342] ^= 0xFF;
        assert!(denibblize(&nibbles).is_none());
    }

    #[test]
    fn test_find_marker() {
        let stream = [0x00, 0xD5, 0xAA, 0x96, 0x01, 0x02];
        assert_eq!(find_marker(&stream, &ADDRESS_PROLOGUE), Some(4));
        assert_eq!(find_marker(&stream, &EPILOGUE), None);
    }
}
