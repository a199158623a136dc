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
//! Applesauce A2R flux capture container.
//!
//! An 8-byte file header (`"A2R2"`/`"A2R3"` signature plus a fixed byte sequence that
//! detects line-ending corruption in transit) followed by a chunk stream. This module reads
//! the `STRM` chunk: one entry per captured track, each a location byte, a capture-type
//! byte, a little-endian data length, a little-endian estimated loop point, and that many
//! bytes of flux where every byte is the tick count (at 125ns/tick) since the previous
//! transition, with `0xFF` meaning "add 255 and keep reading" for intervals that overflow
//! one byte. A `0xFF` location byte ends the stream.

use crate::bitstream::gcr_apple::{self, ADDRESS_PROLOGUE, DATA_PROLOGUE};
use crate::file_parsers::{FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::flux::pll::{decode_track, PllConfig};
use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorId, SectorStatus};
use crate::types::track::FluxTrack;
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};

const AS_TICK_NS: u32 = 125;
const STREAM_END: u8 = 0xFF;

struct Chunk<'a> {
    id: [u8; 4],
    data: &'a [u8],
}

fn read_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>, DiskImageError> {
    let mut chunks = Vec::new();
    let mut pos = 8;
    while pos + 8 <= data.len() {
        let id = [data[pos], data[pos + 1], data[pos + 2], data[pos + 3]];
        let size = u32::from_le_bytes(data[pos + 4..pos + 8].try_into().unwrap()) as usize;
        let body = data.get(pos + 8..pos + 8 + size).ok_or(DiskImageError::Format { offset: pos + 8, reason: "A2R chunk body truncated".to_string() })?;
        chunks.push(Chunk { id, data: body });
        pos += 8 + size;
    }
    Ok(chunks)
}

/// Decode one `STRM` track entry's AS-encoded flux bytes into tick-count intervals, the
/// way [the format's documentation](https://applesaucefdc.com/a2r/) describes the rollover
/// byte `0xFF`.
fn decode_as_flux(buf: &[u8], sample_frequency_hz: u32) -> FluxTrack {
    let mut flux = FluxTrack::new(sample_frequency_hz);
    let mut ticks: u32 = 0;
    for &byte in buf {
        if byte == 255 {
            ticks += 255;
        }
        else if byte > 0 {
            ticks += byte as u32;
            flux.samples.push(ticks);
            ticks = 0;
        }
    }
    flux
}

fn decode_sectors_from_bits(track: &[u8], cylinder: u16) -> Vec<Sector> {
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

pub struct A2rFormat;

impl ImageParser for A2rFormat {
    fn capabilities() -> FormatCaps {
        FormatCaps::ADDRESS_CRC | FormatCaps::DATA_CRC | FormatCaps::FLUX_TIMING | FormatCaps::MULTI_REVOLUTION
    }

    fn extensions() -> &'static [&'static str] {
        &["a2r"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() >= 4 && (&data[0..4] == b"A2R2" || &data[0..4] == b"A2R3")
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        if !Self::probe(data) {
            return Err(DiskImageError::Format { offset: 0, reason: "missing A2R2/A2R3 signature".to_string() });
        }
        let chunks = read_chunks(data)?;
        let stream = chunks
            .iter()
            .find(|c| &c.id == b"STRM")
            .ok_or(DiskImageError::Format { offset: 0, reason: "A2R image has no STRM chunk".to_string() })?;

        let sample_frequency_hz = 1_000_000_000 / AS_TICK_NS;
        let config = PllConfig::gcr_commodore(); // closest available nominal period for self-clocking GCR.
        let mut collected: Vec<(Chs, Sector)> = Vec::new();
        let mut max_cyl = 0u16;
        let mut max_sectors = 0usize;
        let mut pos = 0usize;

        while pos < stream.data.len() {
            let location = stream.data[pos];
            if location == STREAM_END {
                break;
            }
            let header = stream.data.get(pos..pos + 10).ok_or(DiskImageError::Format { offset: pos, reason: "STRM track entry truncated".to_string() })?;
            let data_len = u32::from_le_bytes(header[2..6].try_into().unwrap()) as usize;
            let flux_start = pos + 10;
            let flux_bytes = stream.data.get(flux_start..flux_start + data_len).ok_or(DiskImageError::Format {
                offset: flux_start,
                reason: "STRM track flux data extends past chunk end".to_string(),
            })?;

            // Applesauce addresses tracks in quarter-track units; this crate keeps only
            // the whole-track captures.
            if location % 4 == 0 {
                let cylinder = (location / 4) as u16;
                max_cyl = max_cyl.max(cylinder + 1);
                let flux = decode_as_flux(flux_bytes, sample_frequency_hz);
                let (bits, _stats) = decode_track(&flux, &config);
                let reassembled = crate::bitstream::bits_to_bytes(&bits);
                let sectors = decode_sectors_from_bits(&reassembled, cylinder);
                max_sectors = max_sectors.max(sectors.len());
                for sector in sectors {
                    collected.push((Chs::new(cylinder, 0, sector.id.sector), sector));
                }
            }
            pos = flux_start + data_len;
        }

        let geometry = Geometry::new(max_cyl.max(1), 1, max_sectors.clamp(1, 255) as u8, 256, 0, Encoding::Gcr)
            .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::A2r, geometry);
        for (chs, sector) in collected {
            image.put_sector(chs, sector)?;
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing A2R captures is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> ParserWriteCompatibility {
        ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_accepts_a2r2_and_a2r3() {
        assert!(A2rFormat::probe(b"A2R2\xFF\n\r\n"));
        assert!(A2rFormat::probe(b"A2R3\xFF\n\r\n"));
        assert!(!A2rFormat::probe(b"NOPE"));
    }

    #[test]
    fn test_load_rejects_missing_strm() {
        let mut data = b"A2R2\xFF\n\r\n".to_vec();
        data.extend(b"INFO");
        data.extend(&0u32.to_le_bytes());
        assert!(A2rFormat::load(&data).is_err());
    }

    #[test]
    fn test_decode_as_flux_handles_rollover_byte() {
        let flux = decode_as_flux(&[255, 255, 10], 8_000_000);
        assert_eq!(flux.samples, vec![520]);
    }
}
