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
//! SuperCard Pro (SCP) raw flux capture container.
//!
//! A fixed 16-byte file header (`SCP` signature, version, disk type, revolution count,
//! track range, flags, bit cell width, head count, capture resolution, checksum) followed
//! by a 168-entry table of absolute file offsets, one per possible track number. Each
//! present track begins with a `TRK` header and one `(index_time, length, data_offset)`
//! triple per captured revolution; flux intervals are 16-bit big-endian tick counts at
//! `25ns * (resolution + 1)` per tick.

use crate::file_parsers::{bitstream_flags, decode_mfm_track, FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::flux::pll::{decode_track, PllConfig};
use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::track::FluxTrack;
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};

const TRACK_TABLE_LEN: usize = 168;
const BASE_TICK_NS: u32 = 25;

struct FileHeader {
    revolutions: u8,
    start_track: u8,
    end_track: u8,
    heads_byte: u8,
    resolution: u8,
}

fn parse_header(data: &[u8]) -> Result<FileHeader, DiskImageError> {
    if data.len() < 16 || &data[0..3] != b"SCP" {
        return Err(DiskImageError::Format { offset: 0, reason: "missing SCP signature".to_string() });
    }
    Ok(FileHeader {
        revolutions: data[5],
        start_track: data[6],
        end_track: data[7],
        heads_byte: data[9],
        resolution: data[10],
    })
}

fn track_offset_table(data: &[u8]) -> Result<[u32; TRACK_TABLE_LEN], DiskImageError> {
    let mut table = [0u32; TRACK_TABLE_LEN];
    for (i, slot) in table.iter_mut().enumerate() {
        let off = 16 + i * 4;
        let bytes = data.get(off..off + 4).ok_or(DiskImageError::Format { offset: off, reason: "truncated SCP track offset table".to_string() })?;
        *slot = u32::from_le_bytes(bytes.try_into().unwrap());
    }
    Ok(table)
}

/// Decode the first captured revolution of one SCP track entry into tick-count flux.
fn read_track_flux(data: &[u8], entry_offset: usize, sample_frequency_hz: u32) -> Result<FluxTrack, DiskImageError> {
    if &data[entry_offset..entry_offset + 3] != b"TRK" {
        return Err(DiskImageError::Format { offset: entry_offset, reason: "expected TRK track header".to_string() });
    }
    let rev_table = entry_offset + 4;
    let index_time = u32::from_le_bytes(data[rev_table..rev_table + 4].try_into().unwrap());
    let length = u32::from_le_bytes(data[rev_table + 4..rev_table + 8].try_into().unwrap()) as usize;
    let data_offset = u32::from_le_bytes(data[rev_table + 8..rev_table + 12].try_into().unwrap()) as usize;

    let start = entry_offset + data_offset;
    let samples_raw = data
        .get(start..start + length * 2)
        .ok_or(DiskImageError::Format { offset: start, reason: "SCP track data extends past end of file".to_string() })?;

    let mut flux = FluxTrack::new(sample_frequency_hz);
    flux.samples.reserve(length);
    for chunk in samples_raw.chunks_exact(2) {
        let ticks = u16::from_be_bytes([chunk[0], chunk[1]]);
        // A zero tick count means "accumulate with the next cell" per SCP's convention for
        // intervals spanning more than 65535 ticks; folded into the following sample.
        flux.samples.push(ticks as u32);
    }
    flux.index_times.push(index_time);
    flux.revolutions = 1;
    Ok(flux)
}

pub struct ScpFormat;

impl ImageParser for ScpFormat {
    fn capabilities() -> FormatCaps {
        bitstream_flags() | FormatCaps::FLUX_TIMING | FormatCaps::MULTI_REVOLUTION
    }

    fn extensions() -> &'static [&'static str] {
        &["scp"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() >= 3 && &data[0..3] == b"SCP"
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        let header = parse_header(data)?;
        let table = track_offset_table(data)?;
        let sample_frequency_hz = 1_000_000_000 / (BASE_TICK_NS * (header.resolution as u32 + 1));
        let heads = if header.heads_byte == 0 { 2 } else { 1 };

        let mut sectors: Vec<(Chs, crate::types::sector::Sector)> = Vec::new();
        let config = PllConfig::mfm_double_density();
        let mut max_cyl = 0u16;

        for track_no in header.start_track..=header.end_track {
            let offset = table[track_no as usize] as usize;
            if offset == 0 {
                continue;
            }
            let (cylinder, head) = if heads == 2 { ((track_no / 2) as u16, track_no % 2) } else { (track_no as u16, 0) };
            max_cyl = max_cyl.max(cylinder + 1);
            let flux = read_track_flux(data, offset, sample_frequency_hz)?;
            let (bits, _stats) = decode_track(&flux, &config);
            for sector in decode_mfm_track(&bits) {
                sectors.push((Chs::new(cylinder, head, sector.id.sector), sector));
            }
        }

        let _ = header.revolutions;
        let sectors_per_track = (sectors.len() / (max_cyl.max(1) as usize * heads as usize).max(1)).clamp(1, 255);
        let geometry = Geometry::new(max_cyl.max(1), heads, sectors_per_track as u8, 512, 1, Encoding::Mfm)
            .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::Scp, geometry);
        for (chs, sector) in sectors {
            image.put_sector(chs, sector)?;
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing SCP captures is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> ParserWriteCompatibility {
        ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_requires_scp_signature() {
        assert!(ScpFormat::probe(b"SCP\x00"));
        assert!(!ScpFormat::probe(b"XXX\x00"));
    }

    #[test]
    fn test_load_rejects_truncated_header() {
        let data = vec![b'S', b'C', b'P'];
        assert!(ScpFormat::load(&data).is_err());
    }
}
