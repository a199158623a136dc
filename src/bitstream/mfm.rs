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
//! MFM (Modified Frequency Modulation) bitcell codec.
//!
//! Follows IBM System 34 floppy format conventions: three `0xA1` sync bytes (encoded with
//! a deliberate clock violation so they cannot occur in ordinary data) precede every
//! address mark, and a
//! CCITT CRC-16 seeded with `0xFFFF` covers the sync bytes, the mark byte, and the field
//! that follows.

use crate::bitstream::BitCursor;
use crate::types::sector::SectorId;
use crate::util::crc_ibm_3740;
use bit_vec::BitVec;

/// The 16-bit cell pattern produced by encoding `0xA1` with the System 34 clock violation
/// at bit position 4. Real hardware relies on this pattern being otherwise unreachable
/// from legal MFM data; we reproduce it exactly rather than deriving it from
/// [`encode_byte`], since the violation is precisely what ordinary encoding cannot
/// produce.
pub const MFM_SYNC_CELLS: u16 = 0x4489;

pub const IDAM_MARK: u8 = 0xFE;
pub const DAM_MARK: u8 = 0xFB;
pub const DELETED_DAM_MARK: u8 = 0xF8;

/// The kind of address mark found while scanning a bitstream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddressMark {
    Idam,
    Dam,
    DeletedDam,
}

/// Encode one byte into 16 MFM cell bits (clock bit, data bit interleaved, clock first),
/// given the last data bit emitted by the previous byte. Updates `prev_bit` to the new
/// trailing bit so consecutive bytes chain correctly.
pub fn encode_byte(byte: u8, prev_bit: &mut bool) -> u16 {
    let mut cells: u16 = 0;
    let mut last = *prev_bit;
    for i in (0..8).rev() {
        let data_bit = (byte >> i) & 1 != 0;
        let clock_bit = !(last || data_bit);
        cells = (cells << 2) | ((clock_bit as u16) << 1) | (data_bit as u16);
        last = data_bit;
    }
    *prev_bit = last;
    cells
}

/// Decode 16 MFM cell bits back into their data byte, discarding clock bits.
pub fn decode_cells(cells: u16) -> u8 {
    let mut byte = 0u8;
    for i in 0..8 {
        let shift = 14 - i * 2;
        let data_bit = (cells >> shift) & 1;
        byte = (byte << 1) | data_bit as u8;
    }
    byte
}

/// CRC-16/CCITT over the three sync bytes, `mark`, and `payload`, matching what a real
/// MFM decoder verifies against the trailing two CRC bytes of an ID or data field.
pub fn address_mark_crc(mark: u8, payload: &[u8]) -> u16 {
    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&[0xA1, 0xA1, 0xA1, mark]);
    buf.extend_from_slice(payload);
    crc_ibm_3740(&buf, 0xFFFF)
}

fn decode_bytes(cursor: &mut BitCursor, n: usize) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let cells = cursor.take(16)? as u16;
        out.push(decode_cells(cells));
    }
    Some(out)
}

fn encode_bytes(bytes: &[u8], prev_bit: &mut bool, out: &mut BitVec) {
    for &b in bytes {
        let cells = encode_byte(b, prev_bit);
        for i in (0..16).rev() {
            out.push((cells >> i) & 1 != 0);
        }
    }
}

/// Scan forward from the cursor's current position for the next address mark, consuming
/// through the mark byte. Returns `None` once the stream is exhausted with no further
/// marks. A track with no marks at all yields zero sectors, not an error.
pub fn find_next_mark(cursor: &mut BitCursor) -> Option<AddressMark> {
    let mut sync_count = 0usize;
    loop {
        if cursor.remaining() < 16 {
            return None;
        }
        if cursor.peek(16) == Some(MFM_SYNC_CELLS as u32) {
            cursor.take(16);
            sync_count += 1;
            if sync_count < 3 {
                continue;
            }
            if cursor.remaining() < 16 {
                return None;
            }
            let mark_cells = cursor.take(16).unwrap() as u16;
            match decode_cells(mark_cells) {
                IDAM_MARK => return Some(AddressMark::Idam),
                DAM_MARK => return Some(AddressMark::Dam),
                DELETED_DAM_MARK => return Some(AddressMark::DeletedDam),
                _ => {
                    sync_count = 0;
                    continue;
                }
            }
        }
        else {
            cursor.take(1);
            sync_count = 0;
        }
    }
}

/// Read the six bytes following an IDAM (cylinder, head, sector, size code, CRC hi/lo) and
/// report whether the stored CRC matches.
pub fn read_id_field(cursor: &mut BitCursor) -> Option<(SectorId, bool)> {
    let bytes = decode_bytes(cursor, 6)?;
    let id = SectorId::new(bytes[0] as u16, bytes[1], bytes[2], bytes[3]);
    let stored_crc = u16::from_be_bytes([bytes[4], bytes[5]]);
    let computed = address_mark_crc(IDAM_MARK, &bytes[0..4]);
    Some((id, stored_crc == computed))
}

/// Read `size` payload bytes plus a trailing two-byte CRC following a DAM/deleted-DAM,
/// reporting whether the CRC matches.
pub fn read_data_field(cursor: &mut BitCursor, size: usize, mark: u8) -> Option<(Vec<u8>, bool)> {
    let mut bytes = decode_bytes(cursor, size + 2)?;
    let crc_bytes = bytes.split_off(size);
    let stored_crc = u16::from_be_bytes([crc_bytes[0], crc_bytes[1]]);
    let computed = address_mark_crc(mark, &bytes);
    Some((bytes, stored_crc == computed))
}

/// Encode a complete IDAM field (three sync cells, mark, CHRN, CRC) and append it to
/// `out`, threading the running clock state through `prev_bit`.
pub fn encode_id_field(id: SectorId, prev_bit: &mut bool, out: &mut BitVec) {
    for _ in 0..3 {
        for i in (0..16).rev() {
            out.push((MFM_SYNC_CELLS >> i) & 1 != 0);
        }
        *prev_bit = MFM_SYNC_CELLS & 1 != 0;
    }
    encode_bytes(&[IDAM_MARK], prev_bit, out);
    let chrn = [id.cylinder as u8, id.head, id.sector, id.size_code];
    encode_bytes(&chrn, prev_bit, out);
    let crc = address_mark_crc(IDAM_MARK, &chrn);
    encode_bytes(&crc.to_be_bytes(), prev_bit, out);
}

/// Encode a complete data field (three sync cells, mark, payload, CRC) and append it to
/// `out`.
pub fn encode_data_field(mark: u8, data: &[u8], prev_bit: &mut bool, out: &mut BitVec) {
    for _ in 0..3 {
        for i in (0..16).rev() {
            out.push((MFM_SYNC_CELLS >> i) & 1 != 0);
        }
        *prev_bit = MFM_SYNC_CELLS & 1 != 0;
    }
    encode_bytes(&[mark], prev_bit, out);
    encode_bytes(data, prev_bit, out);
    let crc = address_mark_crc(mark, data);
    encode_bytes(&crc.to_be_bytes(), prev_bit, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_byte_round_trip() {
        let mut prev = false;
        for byte in [0x00u8, 0xFF, 0xA5, 0x5A, 0xFE] {
            let cells = encode_byte(byte, &mut prev);
            assert_eq!(decode_cells(cells), byte);
        }
    }

    #[test]
    fn test_idam_round_trip_via_bitstream() {
        let mut bits = BitVec::new();
        let mut prev_bit = false;
        let id = SectorId::new(0, 1, 3, 2);
        encode_id_field(id, &mut prev_bit, &mut bits);

        let mut cursor = BitCursor::new(&bits);
        let mark = find_next_mark(&mut cursor).unwrap();
        assert_eq!(mark, AddressMark::Idam);
        let (decoded_id, crc_ok) = read_id_field(&mut cursor).unwrap();
        assert!(crc_ok);
        assert_eq!(decoded_id.cylinder, 0);
        assert_eq!(decoded_id.head, 1);
        assert_eq!(decoded_id.sector, 3);
        assert_eq!(decoded_id.size_code, 2);
    }

    #[test]
    fn test_data_field_round_trip_and_crc_corruption() {
        let mut bits = BitVec::new();
        let mut prev_bit = false;
        let payload = vec![0x42u8; 256];
        encode_data_field(DAM_MARK, &payload, &mut prev_bit, &mut bits);

        let mut cursor = BitCursor::new(&bits);
        assert_eq!(find_next_mark(&mut cursor), Some(AddressMark::Dam));
        let (data, crc_ok) = read_data_field(&mut cursor, 256, DAM_MARK).unwrap();
        assert!(crc_ok);
        assert_eq!(data, payload);

        // Flip a payload bit and confirm the CRC no longer matches.
        let mut corrupt = bits.clone();
        let flip_pos = corrupt.len() - 20;
        let v = corrupt.get(flip_pos).unwrap();
        corrupt.set(flip_pos, !v);
        let mut cursor2 = BitCursor::new(&corrupt);
        find_next_mark(&mut cursor2);
        let (_, crc_ok2) = read_data_field(&mut cursor2, 256, DAM_MARK).unwrap();
        assert!(!crc_ok2);
    }

    #[test]
    fn test_no_marks_returns_none() {
        let bits = crate::bitstream::bytes_to_bits(&[0x00; 64]);
        let mut cursor = BitCursor::new(&bits);
        assert_eq!(find_next_mark(&mut cursor), None);
    }
}
