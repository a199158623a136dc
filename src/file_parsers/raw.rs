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
//! Generic fixed-geometry raw sector image loader/saver.
//!
//! About twenty of the formats this crate supports are nothing more than every sector's
//! data bytes concatenated in canonical (cylinder, head, sector) order, with the geometry
//! implied entirely by the file's length. Rather than write one parser per extension, this
//! module drives all of them off [`standard_geometry`], one size/layout table shared by
//! every fixed-geometry format.

use crate::chs::ChsGeometry;
use crate::file_parsers::{FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::types::encoding::Encoding;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorId};
use crate::{DiskImage, DiskImageError, DiskImageFormat};

/// One entry in the standard raw-geometry table: total image size in bytes mapped to the
/// geometry it implies.
struct StandardGeometry {
    format: DiskImageFormat,
    bytes: usize,
    cylinders: u16,
    heads: u8,
    sectors_per_track: u8,
    sector_size: u16,
    first_sector_id: u8,
    encoding: Encoding,
}

const TABLE: &[StandardGeometry] = &[
    // Commodore
    StandardGeometry { format: DiskImageFormat::D64, bytes: 174_848, cylinders: 35, heads: 1, sectors_per_track: 17, sector_size: 256, first_sector_id: 0, encoding: Encoding::Gcr },
    StandardGeometry { format: DiskImageFormat::D71, bytes: 349_696, cylinders: 35, heads: 1, sectors_per_track: 17, sector_size: 256, first_sector_id: 0, encoding: Encoding::Gcr },
    StandardGeometry { format: DiskImageFormat::D81, bytes: 819_200, cylinders: 80, heads: 2, sectors_per_track: 10, sector_size: 512, first_sector_id: 1, encoding: Encoding::Mfm },
    // Amiga
    StandardGeometry { format: DiskImageFormat::Adf, bytes: 901_120, cylinders: 80, heads: 2, sectors_per_track: 11, sector_size: 512, first_sector_id: 0, encoding: Encoding::Mfm },
    // Apple II DOS/ProDOS order
    StandardGeometry { format: DiskImageFormat::Do, bytes: 143_360, cylinders: 35, heads: 1, sectors_per_track: 16, sector_size: 256, first_sector_id: 0, encoding: Encoding::Gcr },
    StandardGeometry { format: DiskImageFormat::Po, bytes: 143_360, cylinders: 35, heads: 1, sectors_per_track: 16, sector_size: 256, first_sector_id: 0, encoding: Encoding::Gcr },
    // Atari 8-bit single density
    StandardGeometry { format: DiskImageFormat::Atr, bytes: 92_160, cylinders: 40, heads: 1, sectors_per_track: 18, sector_size: 128, first_sector_id: 1, encoding: Encoding::Fm },
    StandardGeometry { format: DiskImageFormat::Xfd, bytes: 92_160, cylinders: 40, heads: 1, sectors_per_track: 18, sector_size: 128, first_sector_id: 1, encoding: Encoding::Fm },
    // Atari ST
    StandardGeometry { format: DiskImageFormat::St, bytes: 368_640, cylinders: 80, heads: 1, sectors_per_track: 9, sector_size: 512, first_sector_id: 1, encoding: Encoding::Mfm },
    StandardGeometry { format: DiskImageFormat::St, bytes: 737_280, cylinders: 80, heads: 2, sectors_per_track: 9, sector_size: 512, first_sector_id: 1, encoding: Encoding::Mfm },
    // PC/DOS
    StandardGeometry { format: DiskImageFormat::Img, bytes: 368_640, cylinders: 40, heads: 2, sectors_per_track: 9, sector_size: 512, first_sector_id: 1, encoding: Encoding::Mfm },
    StandardGeometry { format: DiskImageFormat::Img, bytes: 1_474_560, cylinders: 80, heads: 2, sectors_per_track: 18, sector_size: 512, first_sector_id: 1, encoding: Encoding::Mfm },
    StandardGeometry { format: DiskImageFormat::Img, bytes: 1_228_800, cylinders: 80, heads: 2, sectors_per_track: 15, sector_size: 512, first_sector_id: 1, encoding: Encoding::Mfm },
    // BBC Micro DFS
    StandardGeometry { format: DiskImageFormat::Ssd, bytes: 102_400, cylinders: 40, heads: 1, sectors_per_track: 10, sector_size: 256, first_sector_id: 0, encoding: Encoding::Fm },
    StandardGeometry { format: DiskImageFormat::Ssd, bytes: 204_800, cylinders: 80, heads: 1, sectors_per_track: 10, sector_size: 256, first_sector_id: 0, encoding: Encoding::Fm },
    StandardGeometry { format: DiskImageFormat::Dsd, bytes: 409_600, cylinders: 80, heads: 1, sectors_per_track: 10, sector_size: 256, first_sector_id: 0, encoding: Encoding::Fm },
    StandardGeometry { format: DiskImageFormat::Dsd, bytes: 819_200, cylinders: 80, heads: 2, sectors_per_track: 10, sector_size: 256, first_sector_id: 0, encoding: Encoding::Fm },
    // ZX Spectrum TR-DOS
    StandardGeometry { format: DiskImageFormat::Trd, bytes: 655_360, cylinders: 80, heads: 2, sectors_per_track: 16, sector_size: 256, first_sector_id: 1, encoding: Encoding::Mfm },
    // NEC/Sharp D88 (2HD)
    StandardGeometry { format: DiskImageFormat::D88, bytes: 1_261_568, cylinders: 77, heads: 2, sectors_per_track: 8, sector_size: 1024, first_sector_id: 1, encoding: Encoding::Mfm },
];

/// Find the table entry for an exact `(format, size)` pair, or fall back to the first
/// entry matching `size` alone when `format` is [`DiskImageFormat::Auto`] or absent from
/// the table (several of these formats share a byte length, e.g. D81 and BBC DSD).
fn lookup(format: DiskImageFormat, bytes: usize) -> Option<&'static StandardGeometry> {
    TABLE
        .iter()
        .find(|e| e.bytes == bytes && e.format == format)
        .or_else(|| TABLE.iter().find(|e| e.bytes == bytes))
}

/// Turn a table entry into a [`Geometry`], failing only if the table itself carries a
/// malformed entry (which would be a bug in this module, not user input).
fn geometry_of(entry: &StandardGeometry) -> Geometry {
    Geometry::new(
        entry.cylinders,
        entry.heads,
        entry.sectors_per_track,
        entry.sector_size,
        entry.first_sector_id,
        entry.encoding,
    )
    .expect("raw geometry table entries are all within the legal track-size range")
}

pub struct RawFormat;

impl RawFormat {
    /// Load `data` knowing its container `format` up front (as [`crate::file_parsers::load_by_format`]
    /// does); disambiguates the handful of sizes this table shares between formats.
    pub fn load_as(format: DiskImageFormat, data: &[u8]) -> Result<DiskImage, DiskImageError> {
        let entry = lookup(format, data.len()).ok_or(DiskImageError::Format {
            offset: 0,
            reason: format!("{} bytes does not match any known raw geometry for {format}", data.len()),
        })?;
        let geometry = geometry_of(entry);
        let chs_geom = ChsGeometry::new(geometry.cylinders, geometry.heads, geometry.sectors_per_track, geometry.first_sector_id);
        let size_code = crate::chs::bytes_to_size_code(geometry.bytes_per_sector as usize).ok_or_else(|| DiskImageError::Format {
            offset: 0,
            reason: format!("sector size {} has no size_code", geometry.bytes_per_sector),
        })?;

        let mut image = DiskImage::new(entry.format, geometry);
        let sector_bytes = geometry.bytes_per_sector as usize;
        for (i, chs) in chs_geom.iter_chs().enumerate() {
            let start = i * sector_bytes;
            let end = start + sector_bytes;
            let chunk = data.get(start..end).ok_or(DiskImageError::Format {
                offset: start,
                reason: "raw image truncated before last sector".to_string(),
            })?;
            let id = SectorId::new(chs.c, chs.h, chs.s, size_code);
            image.put_sector(chs, Sector::new(id, chunk.to_vec()))?;
        }
        image.refresh_consistency();
        Ok(image)
    }
}

impl ImageParser for RawFormat {
    fn capabilities() -> FormatCaps {
        FormatCaps::empty()
    }

    fn extensions() -> &'static [&'static str] {
        &["img", "ima", "dsk", "bin", "d64", "d71", "d81", "adf", "do", "po", "atr", "xfd", "st", "ssd", "dsd", "trd", "fdi", "d88", "jv1", "jv3", "dmk"]
    }

    fn probe(data: &[u8]) -> bool {
        lookup(DiskImageFormat::Auto, data.len()).is_some()
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        Self::load_as(DiskImageFormat::Auto, data)
    }

    fn save(image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        let chs_geom = ChsGeometry::new(
            image.geometry.cylinders,
            image.geometry.heads,
            image.geometry.sectors_per_track,
            image.geometry.first_sector_id,
        );
        let mut out = Vec::with_capacity(image.geometry.total_bytes());
        for chs in chs_geom.iter_chs() {
            out.extend(image.read_sector_data(chs, image.geometry.bytes_per_sector as usize)?);
        }
        Ok(out)
    }

    fn can_write(image: &DiskImage) -> ParserWriteCompatibility {
        if lookup(image.format, image.geometry.total_bytes()).is_some() {
            ParserWriteCompatibility::Ok
        }
        else {
            ParserWriteCompatibility::UnsupportedFormat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_then_save_round_trips_d64_sized_image() {
        let data = vec![0x5Au8; 174_848];
        let image = RawFormat::load(&data).unwrap();
        assert_eq!(image.geometry.cylinders, 35);
        let saved = RawFormat::save(&image).unwrap();
        assert_eq!(saved, data);
    }

    #[test]
    fn test_unknown_size_is_rejected() {
        let data = vec![0u8; 17];
        assert!(RawFormat::load(&data).is_err());
        assert!(!RawFormat::probe(&data));
    }
}
