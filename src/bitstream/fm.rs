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
//! FM (single-density Frequency Modulation) bitcell codec.
//!
//! Ordinary FM bytes are clocked with every clock bit set (`0xFF`); address marks use one
//! of four fixed clock-violation patterns instead of a separate sync byte run, so a single
//! matching 16-bit cell pattern is enough to synchronize (unlike MFM's three `0xA1` syncs).

use crate::bitstream::BitCursor;
use crate::types::sector::SectorId;
use crate::util::crc_ibm_3740;
use bit_vec::BitVec;

pub const IDAM_MARK: u8 = 0xFE;
pub const DAM_MARK: u8 = 0xFB;
pub const DELETED_DAM_MARK: u8 = 0xF8;
pub const INDEX_MARK: u8 = 0xFC;

const IDAM_CELLS: u16 = 0xF57E;
const DAM_CELLS: u16 = 0xF56F;
const DELETED_DAM_CELLS: u16 = 0xF56A;
const INDEX_CELLS: u16 = 0xF77A;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddressMark {
    Idam,
    Dam,
    DeletedDam,
    Index,
}

fn interleave(clock: u8, data: u8) -> u16 {
    let mut cells = 0u16;
    for i in (0..8).rev() {
        let c = (clock >> i) & 1;
        let d = (data >> i) & 1;
        cells = (cells << 2) | ((c as u16) << 1) | d as u16;
    }
    cells
}

/// Encode an ordinary data byte with the standard all-ones FM clock.
pub fn encode_byte(byte: u8) -> u16 {
    interleave(0xFF, byte)
}

/// Decode 16 FM cell bits back into their data byte, discarding clock bits.
pub fn decode_cells(cells: u16) -> u8 {
    let mut byte = 0u8;
    for i in 0..8 {
        let shift = 14 - i * 2;
        let data_bit = (cells >> shift) & 1;
        byte = (byte << 1) | data_bit as u8;
    }
    byte
}

fn mark_cells(mark: u8) -> Option<u16> {
    match mark {
        IDAM_MARK => Some(IDAM_CELLS),
        DAM_MARK => Some(DAM_CELLS),
        DELETED_DAM_MARK => Some(DELETED_DAM_CELLS),
        INDEX_MARK => Some(INDEX_CELLS),
        _ => None,
    }
}

/// CRC-16/CCITT over the mark byte and `payload`, seeded `0xFFFF`. FM carries no separate
/// sync-byte prefix in the CRC the way MFM's `0xA1 0xA1 0xA1` does.
pub fn address_mark_crc(mark: u8, payload: &[u8]) -> u16 {
    let mut buf = Vec::with_capacity(1 + payload.len());
    buf.push(mark);
    buf.extend_from_slice(payload);
    crc_ibm_3740(&buf, 0xFFFF)
}

fn push_cells(cells: u16, out: &mut BitVec) {
    for i in (0..16).rev() {
        out.push((cells >> i) & 1 != 0);
    }
}

fn encode_bytes(bytes: &[u8], out: &mut BitVec) {
    for &b in bytes {
        push_cells(encode_byte(b), out);
    }
}

fn decode_bytes(cursor: &mut BitCursor, n: usize) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let cells = cursor.take(16)? as u16;
        out.push(decode_cells(cells));
    }
    Some(out)
}

/// Scan forward for the next address mark of any kind, consuming through it.
pub fn find_next_mark(cursor: &mut BitCursor) -> Option<AddressMark> {
    loop {
        if cursor.remaining() < 16 {
            return None;
        }
        let cells = cursor.peek(16)? as u16;
        let found = match cells {
            IDAM_CELLS => Some(AddressMark::Idam),
            DAM_CELLS => Some(AddressMark::Dam),
            DELETED_DAM_CELLS => Some(AddressMark::DeletedDam),
            INDEX_CELLS => Some(AddressMark::Index),
            _ => None,
        };
        if let Some(mark) = found {
            cursor.take(16);
            return Some(mark);
        }
        cursor.take(1);
    }
}

/// Read the four CHRN bytes plus two CRC bytes following an IDAM.
pub fn read_id_field(cursor: &mut BitCursor) -> Option<(SectorId, bool)> {
    let bytes = decode_bytes(cursor, 6)?;
    let id = SectorId::new(bytes[0] as u16, bytes[1], bytes[2], bytes[3]);
    let stored_crc = u16::from_be_bytes([bytes[4], bytes[5]]);
    let computed = address_mark_crc(IDAM_MARK, &bytes[0..4]);
    Some((id, stored_crc == computed))
}

/// Read `size` payload bytes plus a trailing CRC following a DAM/deleted-DAM.
pub fn read_data_field(cursor: &mut BitCursor, size: usize, mark: u8) -> Option<(Vec<u8>, bool)> {
    let mut bytes = decode_bytes(cursor, size + 2)?;
    let crc_bytes = bytes.split_off(size);
    let stored_crc = u16::from_be_bytes([crc_bytes[0], crc_bytes[1]]);
    let computed = address_mark_crc(mark, &bytes);
    Some((bytes, stored_crc == computed))
}

/// Encode a complete IDAM field (mark cells, CHRN, CRC).
pub fn encode_id_field(id: SectorId, out: &mut BitVec) {
    push_cells(mark_cells(IDAM_MARK).unwrap(), out);
    let chrn = [id.cylinder as u8, id.head, id.sector, id.size_code];
    encode_bytes(&chrn, out);
    let crc = address_mark_crc(IDAM_MARK, &chrn);
    encode_bytes(&crc.to_be_bytes(), out);
}

/// Encode a complete data field (mark cells, payload, CRC).
pub fn encode_data_field(mark: u8, data: &[u8], out: &mut BitVec) {
    push_cells(mark_cells(mark).unwrap(), out);
    encode_bytes(data, out);
    let crc = address_mark_crc(mark, data);
    encode_bytes(&crc.to_be_bytes(), out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_byte_round_trip() {
        for byte in [0x00u8, 0xFF, 0x55, 0xAA] {
            assert_eq!(decode_cells(encode_byte(byte)), byte);
        }
    }

    #[test]
    fn test_idam_and_data_round_trip() {
        let mut bits = BitVec::new();
        let id = SectorId::new(2, 0, 5, 1);
        encode_id_field(id, &mut bits);
        let payload = vec![0x77u8; 128];
        encode_data_field(DAM_MARK, &payload, &mut bits);

        let mut cursor = BitCursor::new(&bits);
        assert_eq!(find_next_mark(&mut cursor), Some(AddressMark::Idam));
        let (decoded, crc_ok) = read_id_field(&mut cursor).unwrap();
        assert!(crc_ok);
        assert_eq!(decoded.sector, 5);

        assert_eq!(find_next_mark(&mut cursor), Some(AddressMark::Dam));
        let (data, crc_ok) = read_data_field(&mut cursor, 128, DAM_MARK).unwrap();
        assert!(crc_ok);
        assert_eq!(data, payload);
    }

    #[test]
    fn test_address_mark_cells_distinct_from_any_data_byte() {
        // No ordinary all-clock-1 byte encoding can collide with a mark pattern, since
        // marks deliberately clear clock bits that would otherwise always be set.
        for byte in 0u8..=255 {
            assert_ne!(encode_byte(byte), IDAM_CELLS);
            assert_ne!(encode_byte(byte), DAM_CELLS);
        }
    }
}
