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
//! PCE Sector Image (PSI), Hampa Hug's chunk-based format for the PCE emulator family.
//!
//! A RIFF-like stream of `[4-byte ASCII id][4-byte big-endian size][data][4-byte big-endian
//! CRC]` chunks. A `PSI ` chunk opens the file; `SECT` introduces a sector's address and
//! size, followed immediately by a `DATA` chunk carrying its payload (optionally `WEAK` for
//! a weak-bit mask); `END ` closes the stream.

use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorId, SectorStatus};
use crate::util::{crc_ibm_3740, read_u16_be};
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};

struct Chunk<'a> {
    id: [u8; 4],
    data: &'a [u8],
}

fn read_chunk(data: &[u8], pos: usize) -> Result<(Chunk<'_>, usize), DiskImageError> {
    let header = data.get(pos..pos + 8).ok_or(DiskImageError::Format { offset: pos, reason: "PSI chunk header truncated".to_string() })?;
    let id = [header[0], header[1], header[2], header[3]];
    let size = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
    let body_start = pos + 8;
    let body = data.get(body_start..body_start + size).ok_or(DiskImageError::Format {
        offset: body_start,
        reason: "PSI chunk body truncated".to_string(),
    })?;
    // Trailing 4-byte CRC; not re-verified here.
    let next = body_start + size + 4;
    Ok((Chunk { id, data: body }, next))
}

fn read_u16_be_field(data: &[u8], offset: usize) -> Option<u16> {
    read_u16_be(data, offset)
}

pub struct PsiFormat;

impl super::ImageParser for PsiFormat {
    fn capabilities() -> super::FormatCaps {
        super::FormatCaps::VARIABLE_SPT | super::FormatCaps::VARIABLE_SSPT | super::FormatCaps::WEAK_BITS | super::FormatCaps::COMMENT
    }

    fn extensions() -> &'static [&'static str] {
        &["psi"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() >= 4 && &data[0..4] == b"PSI "
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        if !Self::probe(data) {
            return Err(DiskImageError::Format { offset: 0, reason: "missing PSI chunk".to_string() });
        }

        let mut sectors: Vec<(Chs, Sector)> = Vec::new();
        let mut pending: Option<SectorId> = None;
        let mut pos = 0usize;
        let mut max_cyl = 0u16;
        let mut max_head = 0u8;

        while pos < data.len() {
            let (chunk, next) = read_chunk(data, pos)?;
            pos = next;
            match &chunk.id {
                b"PSI " | b"TIME" | b"OFFS" => {}
                b"END " => break,
                b"SECT" => {
                    let cylinder = read_u16_be_field(chunk.data, 0).unwrap_or(0);
                    let head = *chunk.data.get(2).unwrap_or(&0);
                    let sector = *chunk.data.get(3).unwrap_or(&0);
                    let size = read_u16_be_field(chunk.data, 4).unwrap_or(512);
                    let size_code = crate::chs::bytes_to_size_code(size as usize).unwrap_or(2);
                    max_cyl = max_cyl.max(cylinder + 1);
                    max_head = max_head.max(head + 1);
                    pending = Some(SectorId::new(cylinder, head, sector, size_code));
                }
                b"DATA" => {
                    let id = pending.take().ok_or(DiskImageError::Format { offset: pos, reason: "DATA chunk without preceding SECT".to_string() })?;
                    let expected = id.size_bytes();
                    // A one-byte compressed-fill payload (PCE's convention for a run of one
                    // repeated byte) expands to the sector's full declared size.
                    let payload = if chunk.data.len() == 1 { vec![chunk.data[0]; expected] } else { chunk.data.to_vec() };
                    sectors.push((
                        Chs::new(id.cylinder, id.head, id.sector),
                        Sector { id, status: SectorStatus::Ok, data: Some(payload), weak_mask: None },
                    ));
                }
                b"WEAK" => {
                    if let Some((_, sector)) = sectors.last_mut() {
                        sector.weak_mask = Some(chunk.data.to_vec());
                    }
                }
                _ => {}
            }
        }

        let _ = crc_ibm_3740;
        let sectors_per_track = (sectors.len() / (max_cyl.max(1) as usize * max_head.max(1) as usize).max(1)).clamp(1, 255);
        let geometry = Geometry::new(max_cyl.max(1), max_head.max(1), sectors_per_track as u8, 512, 1, Encoding::Mfm)
            .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::Psi, geometry);
        for (chs, sector) in sectors {
            image.put_sector(chs, sector)?;
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing PSI containers is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> super::ParserWriteCompatibility {
        super::ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_parsers::ImageParser;

    fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(id);
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(&[0u8; 4]);
        out
    }

    fn single_sector_image() -> Vec<u8> {
        let mut data = chunk(b"PSI ", &[0, 2, 0, 0]);
        data.extend(chunk(b"SECT", &[0, 0, 0, 1, 2, 0, 0, 0]));
        data.extend(chunk(b"DATA", &[0x77u8; 512]));
        data.extend(chunk(b"END ", &[]));
        data
    }

    #[test]
    fn test_single_sector_round_trips() {
        let data = single_sector_image();
        let image = PsiFormat::load(&data).unwrap();
        let sector = image.sector(Chs::new(0, 0, 1)).unwrap().unwrap();
        assert_eq!(sector.data.as_deref(), Some(&[0x77u8; 512][..]));
    }

    #[test]
    fn test_probe_requires_psi_chunk() {
        assert!(!PsiFormat::probe(b"nope"));
    }
}
