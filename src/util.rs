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
//! Small free-standing helpers shared across modules: CRC, dump formatting, and natural
//! sort.

/// CCITT-16/X.25 CRC (polynomial `0x1021`, initial value `0xFFFF`), used by MFM/FM address
/// marks and ID fields as well as several sector-image container checksums.
///
/// Named after the reference table most documentation calls `crc_ibm_3740`, after the IBM
/// 3740 8" floppy format that popularized this CRC for sector address/data fields.
pub fn crc_ibm_3740(data: &[u8], initial: u16) -> u16 {
    let mut crc = initial;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            }
            else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Render `data` as a classic hex+ASCII dump, 16 bytes per line.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08X}  ", row * 16));
        for i in 0..16 {
            if i < chunk.len() {
                out.push_str(&format!("{:02X} ", chunk[i]));
            }
            else {
                out.push_str("   ");
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        for &b in chunk {
            out.push(if (0x20..0x7F).contains(&b) { b as char } else { '.' });
        }
        out.push_str("|\n");
    }
    out
}

/// Compare two filenames the way a human browsing a disk catalog would: numeric runs
/// compare by value rather than lexicographically (`"track2" < "track10"`).
pub fn natural_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek(), bi.peek()) {
            (None, None) => return std::cmp::Ordering::Equal,
            (None, Some(_)) => return std::cmp::Ordering::Less,
            (Some(_), None) => return std::cmp::Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let na = take_number(&mut ai);
                    let nb = take_number(&mut bi);
                    if na != nb {
                        return na.cmp(&nb);
                    }
                }
                else {
                    if ca != cb {
                        return ca.cmp(cb);
                    }
                    ai.next();
                    bi.next();
                }
            }
        }
    }
}

fn take_number(iter: &mut std::iter::Peekable<std::str::Chars>) -> u64 {
    let mut n = 0u64;
    while let Some(c) = iter.peek() {
        if let Some(d) = c.to_digit(10) {
            n = n * 10 + d as u64;
            iter.next();
        }
        else {
            break;
        }
    }
    n
}

/// Read a little-endian `u16` out of `data` at `offset`, returning `None` if out of range.
pub fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

/// Read a little-endian `u32` out of `data` at `offset`, returning `None` if out of range.
pub fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read a big-endian `u16` out of `data` at `offset`, returning `None` if out of range.
pub fn read_u16_be(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc_known_vector() {
        // CRC-CCITT of an empty buffer with the conventional 0xFFFF seed is the seed itself.
        assert_eq!(crc_ibm_3740(&[], 0xFFFF), 0xFFFF);
        // "123456789" is the standard CRC-16/XMODEM-variant check string for this poly/init.
        assert_eq!(crc_ibm_3740(b"123456789", 0xFFFF), 0x29B1);
    }

    #[test]
    fn test_natural_cmp_orders_numeric_runs_by_value() {
        assert_eq!(natural_cmp("track2", "track10"), std::cmp::Ordering::Less);
        assert_eq!(natural_cmp("track10", "track10"), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_read_u16_le_out_of_range() {
        assert_eq!(read_u16_le(&[1], 0), None);
        assert_eq!(read_u16_le(&[0x34, 0x12], 0), Some(0x1234));
    }
}
