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
//! Apple II raw nibble image (NIB).
//!
//! No header at all: a fixed 35 tracks of raw, already-self-clocking 6-and-2 GCR disk
//! bytes, one fixed-size block per track (6656 bytes is the common capture length). Each
//! track is a stream of address-field/data-field pairs delimited by the prologue/epilogue
//! markers in [`crate::bitstream::gcr_apple`]; sectors are found by scanning for those
//! markers rather than any offset table.

use crate::bitstream::gcr_apple::{self, ADDRESS_PROLOGUE, DATA_PROLOGUE};
use crate::file_parsers::{FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorId, SectorStatus};
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};

pub const TRACK_COUNT: usize = 35;
pub const NIBBLES_PER_TRACK: usize = 6656;
const SECTORS_PER_TRACK: u8 = 16;

/// Decode every address/data field pair found in one track's raw nibble stream.
fn decode_track(track: &[u8], cylinder: u16) -> Vec<Sector> {
    let mut sectors = Vec::new();
    let mut pos = 0usize;

    while let Some(addr_start) = gcr_apple::find_marker(&track[pos..], &ADDRESS_PROLOGUE) {
        let addr_start = pos + addr_start;
        let Some(addr_field) = track.get(addr_start..addr_start + 8) else { break };
        let volume = gcr_apple::decode_44(addr_field[0], addr_field[1]);
        let track_no = gcr_apple::decode_44(addr_field[2], addr_field[3]);
        let sector_no = gcr_apple::decode_44(addr_field[4], addr_field[5]);
        let checksum = gcr_apple::decode_44(addr_field[6], addr_field[7]);
        let _ = volume;
        let address_ok = (track_no ^ sector_no) == checksum;

        pos = addr_start + 8;
        let Some(data_start) = gcr_apple::find_marker(&track[pos..], &DATA_PROLOGUE) else {
            sectors.push(missing(cylinder, sector_no));
            continue;
        };
        let data_start = pos + data_start;
        pos = data_start;

        let id = SectorId::new(cylinder, 0, sector_no, 1);
        if !address_ok {
            sectors.push(Sector { id, status: SectorStatus::CrcErr, data: None, weak_mask: None });
            continue;
        }

        let Some(on_disk) = track.get(data_start..data_start + 343) else {
            sectors.push(missing(cylinder, sector_no));
            continue;
        };
        pos = data_start + 343;

        let mut values = [0u8; 343];
        let mut decode_ok = true;
        for (v, &byte) in values.iter_mut().zip(on_disk) {
            match gcr_apple::decode_62(byte) {
                Some(nibble) => *v = nibble,
                None => {
                    decode_ok = false;
                    break;
                }
            }
        }
        if !decode_ok {
            sectors.push(Sector { id, status: SectorStatus::CrcErr, data: None, weak_mask: None });
            continue;
        }
        match gcr_apple::denibblize(&values) {
            Some(data) => sectors.push(Sector { id, status: SectorStatus::Ok, data: Some(data.to_vec()), weak_mask: None }),
            None => sectors.push(Sector { id, status: SectorStatus::CrcErr, data: None, weak_mask: None }),
        }
    }
    sectors
}

fn missing(cylinder: u16, sector: u8) -> Sector {
    Sector { id: SectorId::new(cylinder, 0, sector, 1), status: SectorStatus::Missing, data: None, weak_mask: None }
}

pub struct NibFormat;

impl ImageParser for NibFormat {
    fn capabilities() -> FormatCaps {
        FormatCaps::ADDRESS_CRC | FormatCaps::DATA_CRC | FormatCaps::TRACK_ENCODING
    }

    fn extensions() -> &'static [&'static str] {
        &["nib"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() == TRACK_COUNT * NIBBLES_PER_TRACK
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        if !Self::probe(data) {
            return Err(DiskImageError::Format {
                offset: 0,
                reason: format!("{} bytes is not a {}-track raw nibble image", data.len(), TRACK_COUNT),
            });
        }
        let geometry = Geometry::new(TRACK_COUNT as u16, 1, SECTORS_PER_TRACK, 256, 0, Encoding::Gcr)
            .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::Nib, geometry);
        for (cylinder, track) in data.chunks_exact(NIBBLES_PER_TRACK).enumerate() {
            for sector in decode_track(track, cylinder as u16) {
                image.put_sector(Chs::new(cylinder as u16, 0, sector.id.sector), sector)?;
            }
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing raw nibble images is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> ParserWriteCompatibility {
        ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_requires_exact_length() {
        assert!(NibFormat::probe(&vec![0u8; TRACK_COUNT * NIBBLES_PER_TRACK]));
        assert!(!NibFormat::probe(&vec![0u8; 100]));
    }

    #[test]
    fn test_load_rejects_wrong_length() {
        assert!(NibFormat::load(&[0u8; 10]).is_err());
    }
}
