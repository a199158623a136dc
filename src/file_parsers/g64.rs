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
//! Commodore 1541 GCR track image (G64).
//!
//! An 8-byte header (`"GCR-1541"`, version, track count, max track-data length) followed
//! by two fixed tables of 32-bit little-endian offsets: one locating each track's raw GCR
//! bitstream, one locating its optional speed-zone map. Each track record is a 2-byte
//! little-endian bit count followed by that many bits of raw GCR, read header-sync-data
//! block by header-sync-data block with [`crate::bitstream::gcr_commodore`].

use crate::bitstream::gcr_commodore::{self, DATA_BLOCK, HEADER_BLOCK};
use crate::bitstream::BitCursor;
use crate::file_parsers::{FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorId, SectorStatus};
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};
use bit_vec::BitVec;

const HEADER_LEN: usize = 12;

fn track_offset_table(data: &[u8], tracks: usize) -> Result<Vec<u32>, DiskImageError> {
    (0..tracks)
        .map(|i| {
            let off = HEADER_LEN + i * 4;
            let bytes = data.get(off..off + 4).ok_or(DiskImageError::Format { offset: off, reason: "truncated G64 track offset table".to_string() })?;
            Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
        })
        .collect()
}

/// Decode one track's raw GCR bitstream into sectors, walking header/data block pairs the
/// way the 1541 drive firmware itself does (sync, then a block marker, then the payload).
fn decode_gcr_track(bits: &BitVec, cylinder: u16) -> Vec<Sector> {
    let mut cursor = BitCursor::new(bits);
    let mut sectors = Vec::new();
    let mut pending_sector: Option<u8> = None;

    while gcr_commodore::find_sync(&mut cursor) {
        let Some(block) = gcr_commodore::gcr_decode_bytes(&mut cursor, 1) else { break };
        match block[0] {
            HEADER_BLOCK => {
                let Some(header) = gcr_commodore::gcr_decode_bytes(&mut cursor, 4) else { break };
                let [checksum, sector, track, _id2] = [header[0], header[1], header[2], header[3]];
                let expected = gcr_commodore::xor_checksum(&header[1..4]);
                if checksum == expected {
                    pending_sector = Some(sector);
                }
                let _ = track;
            }
            DATA_BLOCK => {
                let Some(sector) = pending_sector.take() else { continue };
                let Some(payload) = gcr_commodore::gcr_decode_bytes(&mut cursor, 257) else { break };
                let checksum = gcr_commodore::xor_checksum(&payload[0..256]);
                let status = if checksum == payload[256] { SectorStatus::Ok } else { SectorStatus::CrcErr };
                let id = SectorId::new(cylinder, 0, sector, 1);
                sectors.push(Sector { id, status, data: Some(payload[0..256].to_vec()), weak_mask: None });
            }
            _ => {}
        }
    }
    sectors
}

pub struct G64Format;

impl ImageParser for G64Format {
    fn capabilities() -> FormatCaps {
        FormatCaps::VARIABLE_SPT | FormatCaps::DATA_CRC | FormatCaps::TRACK_ENCODING
    }

    fn extensions() -> &'static [&'static str] {
        &["g64"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() >= 8 && &data[0..8] == b"GCR-1541"
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        if !Self::probe(data) {
            return Err(DiskImageError::Format { offset: 0, reason: "missing GCR-1541 signature".to_string() });
        }
        let tracks = *data.get(9).ok_or(DiskImageError::Format { offset: 9, reason: "truncated G64 header".to_string() })? as usize;
        let offsets = track_offset_table(data, tracks)?;

        let mut collected: Vec<(Chs, Sector)> = Vec::new();
        let mut max_sectors = 0usize;
        for (half_track, &offset) in offsets.iter().enumerate() {
            if offset == 0 {
                continue;
            }
            // G64 stores every half-track slot; whole disk-drive tracks occupy the even
            // indices (1.0, 2.0, 3.0, ...).
            if half_track % 2 != 0 {
                continue;
            }
            let cylinder = (half_track / 2) as u16;
            let offset = offset as usize;
            let bit_len = u16::from_le_bytes(data.get(offset..offset + 2).ok_or(DiskImageError::Format { offset, reason: "truncated G64 track length".to_string() })?.try_into().unwrap()) as usize;
            let byte_len = bit_len.div_ceil(8);
            let track_bytes = data.get(offset + 2..offset + 2 + byte_len).ok_or(DiskImageError::Format {
                offset: offset + 2,
                reason: "G64 track data extends past end of file".to_string(),
            })?;
            let bits = crate::bitstream::bytes_to_bits(track_bytes);
            let sectors = decode_gcr_track(&bits, cylinder);
            max_sectors = max_sectors.max(sectors.len());
            for sector in sectors {
                collected.push((Chs::new(cylinder, 0, sector.id.sector), sector));
            }
        }

        let geometry = Geometry::new(tracks.div_ceil(2).max(1) as u16, 1, max_sectors.clamp(1, 255) as u8, 256, 0, Encoding::Gcr)
            .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::G64, geometry);
        for (chs, sector) in collected {
            image.put_sector(chs, sector)?;
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing G64 images is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> ParserWriteCompatibility {
        ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_requires_signature() {
        assert!(G64Format::probe(b"GCR-1541\x00\x00\x00\x00"));
        assert!(!G64Format::probe(b"NOPE"));
    }

    #[test]
    fn test_load_rejects_truncated_header() {
        let data = b"GCR-1541".to_vec();
        assert!(G64Format::load(&data).is_err());
    }
}
