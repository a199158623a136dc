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
//! Dave Dunfield's ImageDisk (IMD) container.
//!
//! An ASCII comment header terminated by `0x1A`, followed by one variable-length record
//! per physical track: a 5-byte header (mode, cylinder, head, sector count, size code),
//! an array of logical sector numbers, optional cylinder/head/size maps (flagged by the
//! high bits of the head byte), then one data marker byte plus payload per sector.

use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorId, SectorStatus};
use crate::{Chs, DiskImage, DiskImageError, DiskImageFormat};

const CYLINDER_MAP_FLAG: u8 = 0x80;
const HEAD_MAP_FLAG: u8 = 0x40;

fn imd_sector_size(code: u8) -> Option<usize> {
    match code {
        0..=6 => Some(128usize << code),
        _ => None,
    }
}

fn imd_encoding(mode: u8) -> Encoding {
    if mode <= 2 {
        Encoding::Fm
    }
    else {
        Encoding::Mfm
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn byte(&mut self) -> Result<u8, DiskImageError> {
        let b = *self.data.get(self.pos).ok_or(DiskImageError::Format { offset: self.pos, reason: "IMD file truncated".to_string() })?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DiskImageError> {
        let out = self.data.get(self.pos..self.pos + n).ok_or(DiskImageError::Format { offset: self.pos, reason: "IMD file truncated".to_string() })?;
        self.pos += n;
        Ok(out)
    }
}

pub struct ImdFormat;

impl ImdFormat {
    fn skip_comment_header(data: &[u8]) -> Result<usize, DiskImageError> {
        data.iter().position(|&b| b == 0x1A).map(|p| p + 1).ok_or(DiskImageError::Format {
            offset: 0,
            reason: "IMD comment header has no 0x1A terminator".to_string(),
        })
    }
}

impl super::ImageParser for ImdFormat {
    fn capabilities() -> super::FormatCaps {
        super::FormatCaps::VARIABLE_SPT | super::FormatCaps::VARIABLE_SSPT | super::FormatCaps::TRACK_ENCODING | super::FormatCaps::COMMENT
    }

    fn extensions() -> &'static [&'static str] {
        &["imd"]
    }

    fn probe(data: &[u8]) -> bool {
        data.starts_with(b"IMD ")
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        if !Self::probe(data) {
            return Err(DiskImageError::Format { offset: 0, reason: "missing IMD signature".to_string() });
        }
        let mut cursor = Cursor { data, pos: Self::skip_comment_header(data)? };

        let mut sectors: Vec<(Chs, Sector)> = Vec::new();
        let mut max_cyl = 0u16;
        let mut max_head = 0u8;
        let mut uniform_size: Option<u16> = None;

        while cursor.pos < data.len() {
            let mode = cursor.byte()?;
            let cylinder = cursor.byte()? as u16;
            let head_raw = cursor.byte()?;
            let head = head_raw & 0x3F;
            let sector_count = cursor.byte()? as usize;
            let size_code = cursor.byte()?;
            let default_size = imd_sector_size(size_code).ok_or(DiskImageError::Format {
                offset: cursor.pos,
                reason: format!("unrecognized IMD sector size code {size_code}"),
            })?;

            let sector_numbers = cursor.take(sector_count)?.to_vec();
            let cylinder_map = if head_raw & CYLINDER_MAP_FLAG != 0 { Some(cursor.take(sector_count)?.to_vec()) } else { None };
            let head_map = if head_raw & HEAD_MAP_FLAG != 0 { Some(cursor.take(sector_count)?.to_vec()) } else { None };

            max_cyl = max_cyl.max(cylinder + 1);
            max_head = max_head.max(head + 1);
            uniform_size = match uniform_size {
                None => Some(default_size as u16),
                Some(s) if s == default_size as u16 => Some(s),
                other => other,
            };

            for s in 0..sector_count {
                let marker = cursor.byte()?;
                let (status, payload) = match marker {
                    0 => (SectorStatus::Missing, None),
                    1 | 3 | 5 => {
                        let payload = cursor.take(default_size)?.to_vec();
                        let status = if marker == 5 { SectorStatus::CrcErr } else if marker == 3 { SectorStatus::Deleted } else { SectorStatus::Ok };
                        (status, Some(payload))
                    }
                    2 | 4 | 6 => {
                        let fill = cursor.byte()?;
                        let status = if marker == 6 { SectorStatus::CrcErr } else if marker == 4 { SectorStatus::Deleted } else { SectorStatus::Ok };
                        (status, Some(vec![fill; default_size]))
                    }
                    other => {
                        return Err(DiskImageError::Format { offset: cursor.pos, reason: format!("unrecognized IMD sector data marker {other}") });
                    }
                };

                let real_cyl = cylinder_map.as_ref().map(|m| m[s] as u16).unwrap_or(cylinder);
                let real_head = head_map.as_ref().map(|m| m[s]).unwrap_or(head);
                let size_code = crate::chs::bytes_to_size_code(default_size).unwrap_or(2);
                let id = SectorId::new(real_cyl, real_head, sector_numbers[s], size_code);
                sectors.push((Chs::new(real_cyl, real_head, sector_numbers[s]), Sector { id, status, data: payload, weak_mask: None }));
            }

            let _ = imd_encoding(mode);
        }

        let sectors_per_track = sectors.len() / (max_cyl.max(1) as usize * max_head.max(1) as usize).max(1);
        let geometry = Geometry::new(
            max_cyl.max(1),
            max_head.max(1),
            sectors_per_track.clamp(1, 255) as u8,
            uniform_size.unwrap_or(512),
            1,
            Encoding::Mfm,
        )
        .map_err(|e| DiskImageError::Format { offset: 0, reason: e })?;
        let mut image = DiskImage::new(DiskImageFormat::Imd, geometry);
        for (chs, sector) in sectors {
            image.put_sector(chs, sector)?;
        }
        image.refresh_consistency();
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing IMD containers is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> super::ParserWriteCompatibility {
        super::ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_parsers::ImageParser;

    fn one_track_image() -> Vec<u8> {
        let mut data = b"IMD 1.18: test image\x1A".to_vec();
        data.push(0); // mode 0 (FM 500kbps)
        data.push(0); // cylinder 0
        data.push(0); // head 0, no maps
        data.push(1); // 1 sector
        data.push(2); // size code 2 -> 512 bytes
        data.push(1); // sector number 1
        data.push(1); // marker: normal data
        data.extend(vec![0xEEu8; 512]);
        data
    }

    #[test]
    fn test_single_sector_track_round_trips_payload() {
        let data = one_track_image();
        let image = ImdFormat::load(&data).unwrap();
        let sector = image.sector(Chs::new(0, 0, 1)).unwrap().unwrap();
        assert_eq!(sector.data.as_deref(), Some(&[0xEEu8; 512][..]));
    }

    #[test]
    fn test_probe_requires_signature() {
        assert!(!ImdFormat::probe(b"not an imd file"));
    }
}
