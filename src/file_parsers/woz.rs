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
//! Apple II WOZ disk image (WOZ1/WOZ2).
//!
//! A 12-byte file header (`"WOZ1"`/`"WOZ2"` signature, a fixed bit pattern that catches
//! line-ending corruption, a CRC32) followed by a chunk stream: `INFO` (disk kind, side
//! count), `TMAP` (160 quarter-track slots mapping to a `TRKS` entry, `0xFF` for unused),
//! and `TRKS` (one entry per physical track: a starting block, block count, and bit count
//! in WOZ2; a fixed 6656-byte slot plus byte and bit counts in WOZ1). Track bits are a raw,
//! already self-clocking Apple GCR byte stream and are decoded the same way as a `.nib`
//! track once reassembled from bits to bytes.

use crate::bitstream::gcr_apple::{self, ADDRESS_PROLOGUE, DATA_PROLOGUE};
use crate::file_parsers::{FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorId, SectorStatus};
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};

const TMAP_SLOTS: usize = 160;

struct Chunk<'a> {
    id: [u8; 4],
    data: &'a [u8],
}

fn read_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>, DiskImageError> {
    let mut chunks = Vec::new();
    let mut pos = 12;
    while pos + 8 <= data.len() {
        let id = [data[pos], data[pos + 1], data[pos + 2], data[pos + 3]];
        let size = u32::from_le_bytes(data[pos + 4..pos + 8].try_into().unwrap()) as usize;
        let body = data.get(pos + 8..pos + 8 + size).ok_or(DiskImageError::Format { offset: pos + 8, reason: "WOZ chunk body truncated".to_string() })?;
        chunks.push(Chunk { id, data: body });
        pos += 8 + size;
    }
    Ok(chunks)
}

fn decode_track_bytes(track: &[u8], cylinder: u16) -> Vec<Sector> {
    let mut sectors = Vec::new();
    let mut pos = 0usize;
    while let Some(addr_start) = gcr_apple::find_marker(&track[pos..], &ADDRESS_PROLOGUE) {
        let addr_start = pos + addr_start;
        let Some(addr) = track.get(addr_start..addr_start + 8) else { break };
        let track_no = gcr_apple::decode_44(addr[2], addr[3]);
        let sector_no = gcr_apple::decode_44(addr[4], addr[5]);
        let checksum = gcr_apple::decode_44(addr[6], addr[7]);
        let address_ok = (track_no ^ sector_no) == checksum;
        pos = addr_start + 8;

        let id = SectorId::new(cylinder, 0, sector_no, 1);
        let Some(data_start) = gcr_apple::find_marker(&track[pos..], &DATA_PROLOGUE) else {
            sectors.push(Sector { id, status: SectorStatus::Missing, data: None, weak_mask: None });
            continue;
        };
        let data_start = pos + data_start;
        pos = data_start;
        if !address_ok {
            sectors.push(Sector { id, status: SectorStatus::CrcErr, data: None, weak_mask: None });
            continue;
        }
        let Some(on_disk) = track.get(data_start..data_start + 343) else {
            sectors.push(Sector { id, status: SectorStatus::Missing, data: None, weak_mask: None });
            continue;
        };
        pos = data_start + 343;

        let mut values = [0u8; 343];
        let mut ok = true;
        for (v, &b) in values.iter_mut().zip(on_disk) {
            match gcr_apple::decode_62(b) {
                Some(n) => *v = n,
                None => {
                    ok = false;
                    break;
                }
            }
        }
        match ok.then(|| gcr_apple::denibblize(&values)).flatten() {
            Some(bytes) => sectors.push(Sector { id, status: SectorStatus::Ok, data: Some(bytes.to_vec()), weak_mask: None }),
            None => sectors.push(Sector { id, status: SectorStatus::CrcErr, data: None, weak_mask: None }),
        }
    }
    sectors
}

pub struct WozFormat;

impl ImageParser for WozFormat {
    fn capabilities() -> FormatCaps {
        FormatCaps::ADDRESS_CRC | FormatCaps::DATA_CRC | FormatCaps::TRACK_ENCODING | FormatCaps::FLUX_TIMING
    }

    fn extensions() -> &'static [&'static str] {
        &["woz"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() >= 4 && (&data[0..4] == b"WOZ1" || &data[0..4] == b"WOZ2")
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        if !Self::probe(data) {
            return Err(DiskImageError::Format { offset: 0, reason: "missing WOZ1/WOZ2 signature".to_string() });
        }
        let chunks = read_chunks(data)?;

        let tmap = chunks
            .iter()
            .find(|c| &c.id == b"TMAP")
            .ok_or(DiskImageError::Format { offset: 0, reason: "WOZ image has no TMAP chunk".to_string() })?;
        let trks = chunks
            .iter()
            .find(|c| &c.id == b"TRKS")
            .ok_or(DiskImageError::Format { offset: 0, reason: "WOZ image has no TRKS chunk".to_string() })?;
        let is_woz2 = &data[0..4] == b"WOZ2";

        let mut collected: Vec<(Chs, Sector)> = Vec::new();
        let mut max_cyl = 0u16;
        let mut max_sectors = 0usize;

        // Quarter-tracks 0, 4, 8, ... are the whole physical tracks this crate models.
        for quarter in (0..TMAP_SLOTS).step_by(4) {
            let slot = *tmap.data.get(quarter).unwrap_or(&0xFF);
            if slot == 0xFF {
                continue;
            }
            let cylinder = (quarter / 4) as u16;
            let track_bytes = if is_woz2 {
                let entry_off = slot as usize * 8;
                let entry = trks.data.get(entry_off..entry_off + 8).ok_or(DiskImageError::Format { offset: entry_off, reason: "WOZ2 TRKS entry truncated".to_string() })?;
                let starting_block = u16::from_le_bytes(entry[0..2].try_into().unwrap()) as usize;
                let block_count = u16::from_le_bytes(entry[2..4].try_into().unwrap()) as usize;
                let bit_count = u32::from_le_bytes(entry[4..8].try_into().unwrap()) as usize;
                let byte_len = bit_count.div_ceil(8).min(block_count * 512);
                let start = starting_block * 512 - 12 - 8; // blocks are file-absolute; TRKS chunk body starts after its own header.
                trks.data.get(start..start + byte_len).map(|s| s.to_vec())
            } else {
                let entry_off = slot as usize * 8;
                let entry = trks.data.get(entry_off..entry_off + 8).ok_or(DiskImageError::Format { offset: entry_off, reason: "WOZ1 TRKS entry truncated".to_string() })?;
                let bytes_used = u16::from_le_bytes(entry[6..8].try_into().unwrap()) as usize;
                let block_start = slot as usize * 6646;
                trks.data.get(block_start..block_start + bytes_used).map(|s| s.to_vec())
            };
            let Some(track_bytes) = track_bytes else { continue };

            max_cyl = max_cyl.max(cylinder + 1);
            let bits = crate::bitstream::bytes_to_bits(&track_bytes);
            let reassembled = crate::bitstream::bits_to_bytes(&bits);
            let sectors = decode_track_bytes(&reassembled, cylinder);
            max_sectors = max_sectors.max(sectors.len());
            for sector in sectors {
                collected.push((Chs::new(cylinder, 0, sector.id.sector), sector));
            }
        }

        let geometry = Geometry::new(max_cyl.max(1), 1, max_sectors.clamp(1, 255) as u8, 256, 0, Encoding::Gcr)
            .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::Woz, geometry);
        for (chs, sector) in collected {
            image.put_sector(chs, sector)?;
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing WOZ images is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> ParserWriteCompatibility {
        ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_accepts_woz1_and_woz2() {
        assert!(WozFormat::probe(b"WOZ1\xFF\n\r\n"));
        assert!(WozFormat::probe(b"WOZ2\xFF\n\r\n"));
        assert!(!WozFormat::probe(b"NOPE"));
    }

    #[test]
    fn test_load_rejects_missing_tmap() {
        let mut data = b"WOZ2\xFF\n\r\n".to_vec();
        data.extend(&[0u8; 4]); // CRC32 placeholder
        assert!(WozFormat::load(&data).is_err());
    }
}
