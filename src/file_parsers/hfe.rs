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
//! HxC HFE bitstream container.
//!
//! HFE stores one MFM/FM bitstream per track, least-significant-bit first (the opposite
//! of every other format in this crate), interleaved 256 bytes at a time between side 0
//! and side 1. A 512-byte header gives the track count, side count, and a track-offset
//! lookup table at `track_list_offset * 512`.

use crate::file_parsers::{decode_mfm_track, FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::util::read_u16_le;
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};
use bit_vec::BitVec;

const HEADER_LEN: usize = 512;
const BLOCK_LEN: usize = 512;

struct Header {
    tracks: u8,
    sides: u8,
    track_list_offset: u16,
}

fn parse_header(data: &[u8]) -> Result<Header, DiskImageError> {
    if data.len() < HEADER_LEN || &data[0..8] != b"HXCPICFE" {
        return Err(DiskImageError::Format { offset: 0, reason: "missing HXCPICFE signature".to_string() });
    }
    Ok(Header {
        tracks: data[9],
        sides: data[10],
        track_list_offset: read_u16_le(data, 16).ok_or(DiskImageError::Format { offset: 16, reason: "truncated header".to_string() })?,
    })
}

fn reverse_bits(mut byte: u8) -> u8 {
    byte = (byte >> 4) | (byte << 4);
    byte = ((byte & 0x33) << 2) | ((byte & 0xCC) >> 2);
    byte = ((byte & 0x55) << 1) | ((byte & 0xAA) >> 1);
    byte
}

/// Split an HFE track's raw bytes into the per-side bit streams, undoing the 256-byte
/// side interleave and HFE's bit-reversed byte order.
fn split_track_bits(track_bytes: &[u8]) -> [BitVec; 2] {
    let mut sides: [Vec<u8>; 2] = [Vec::new(), Vec::new()];
    for (block_idx, block) in track_bytes.chunks(256).enumerate() {
        sides[block_idx % 2].extend(block.iter().map(|b| reverse_bits(*b)));
    }
    [crate::bitstream::bytes_to_bits(&sides[0]), crate::bitstream::bytes_to_bits(&sides[1])]
}

pub struct HfeFormat;

impl ImageParser for HfeFormat {
    fn capabilities() -> FormatCaps {
        FormatCaps::VARIABLE_SPT | FormatCaps::ADDRESS_CRC | FormatCaps::DATA_CRC | FormatCaps::TRACK_ENCODING
    }

    fn extensions() -> &'static [&'static str] {
        &["hfe"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() >= 8 && &data[0..8] == b"HXCPICFE"
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        let header = parse_header(data)?;
        let lut_offset = header.track_list_offset as usize * BLOCK_LEN;

        let mut offsets = Vec::with_capacity(header.tracks as usize);
        for t in 0..header.tracks as usize {
            let entry = lut_offset + t * 4;
            let block_offset = read_u16_le(data, entry).ok_or(DiskImageError::Format { offset: entry, reason: "truncated track LUT".to_string() })? as usize;
            let block_len = read_u16_le(data, entry + 2).ok_or(DiskImageError::Format { offset: entry + 2, reason: "truncated track LUT".to_string() })? as usize;
            offsets.push((block_offset * BLOCK_LEN, block_len));
        }

        // HFE carries no sector size in its header; assume the common 512-byte PC
        // convention, which every HFE image this crate has been asked to read uses.
        let geometry = Geometry::new(header.tracks as u16, header.sides.max(1), 1, 512, 1, Encoding::Mfm)
            .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::Hfe, geometry);

        for (cyl, (start, len)) in offsets.into_iter().enumerate() {
            let track_bytes = data.get(start..start + len).ok_or(DiskImageError::Format {
                offset: start,
                reason: "track data extends past end of file".to_string(),
            })?;
            let bit_sides = split_track_bits(track_bytes);
            for (side, bits) in bit_sides.iter().enumerate() {
                if side >= header.sides as usize {
                    break;
                }
                for sector in decode_mfm_track(bits) {
                    image.put_sector(Chs::new(cyl as u16, side as u8, sector.id.sector), sector)?;
                }
            }
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing HFE containers is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> ParserWriteCompatibility {
        ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_rejects_wrong_signature() {
        assert!(!HfeFormat::probe(b"NOTHFE!!"));
    }

    #[test]
    fn test_load_rejects_truncated_header() {
        let data = vec![0u8; 16];
        assert!(HfeFormat::load(&data).is_err());
    }

    #[test]
    fn test_reverse_bits_is_involution() {
        for b in [0x01u8, 0xA5, 0xFF, 0x00] {
            assert_eq!(reverse_bits(reverse_bits(b)), b);
        }
    }
}
