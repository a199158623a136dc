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
//! The neutral disk-image data model.
//!
//! A [`DiskImage`] is the tree every format plugin parses into and serializes out of: no
//! cycles, no shared mutation. Cross-track references (filesystem block chains) are always
//! expressed as `(cylinder, head, sector)` triples, never pointers.

use crate::chs::Chs;
use crate::types::format::DiskImageFormat;
use crate::types::geometry::Geometry;
use crate::types::sector::{Sector, SectorStatus};
use crate::types::track::Track;
use crate::DiskImageError;
use std::collections::HashMap;

/// Per-disk bookkeeping about how "clean" the decoded image is.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiskConsistency {
    pub weak_bits_present: bool,
    pub deleted_sectors_present: bool,
    pub consistent_sector_size: Option<u16>,
    pub consistent_track_length: Option<u8>,
}

/// Summary returned by a convert/bulk-read operation.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReadSummary {
    pub sectors_ok: usize,
    pub sectors_bad: usize,
    pub crc_errors: usize,
    pub missing: usize,
}

/// The in-memory representation of a disk image, independent of any on-disk file format.
#[derive(Clone, Debug)]
pub struct DiskImage {
    pub format: DiskImageFormat,
    pub format_name: String,
    pub geometry: Geometry,
    /// Indexed by `cyl * heads + head`; `None` for a track that was never written/sampled.
    pub tracks: Vec<Option<Track>>,
    pub metadata: HashMap<String, String>,
    pub consistency: DiskConsistency,
}

impl DiskImage {
    /// Create an empty disk image of the given geometry, with every track unpopulated.
    pub fn new(format: DiskImageFormat, geometry: Geometry) -> Self {
        let track_count = geometry.track_count();
        Self {
            format,
            format_name: format.name().to_string(),
            geometry,
            tracks: vec![None; track_count],
            metadata: HashMap::new(),
            consistency: DiskConsistency::default(),
        }
    }

    fn track_slot(&self, cylinder: u16, head: u8) -> Result<usize, DiskImageError> {
        if cylinder >= self.geometry.cylinders || head >= self.geometry.heads {
            return Err(DiskImageError::InvalidParam(format!(
                "track ({cylinder}, {head}) is out of range for geometry {}",
                self.geometry
            )));
        }
        Ok(self.geometry.track_index(cylinder, head))
    }

    /// Borrow a track, if present.
    pub fn track(&self, cylinder: u16, head: u8) -> Result<Option<&Track>, DiskImageError> {
        let idx = self.track_slot(cylinder, head)?;
        Ok(self.tracks[idx].as_ref())
    }

    /// Mutably borrow a track, creating an empty one if it did not already exist.
    pub fn track_mut(&mut self, cylinder: u16, head: u8) -> Result<&mut Track, DiskImageError> {
        let idx = self.track_slot(cylinder, head)?;
        let encoding = self.geometry.encoding;
        Ok(self.tracks[idx].get_or_insert_with(|| Track::new(cylinder, head, encoding)))
    }

    /// Look up a single sector by CHS address: always by address triple, never by pointer.
    pub fn sector(&self, chs: Chs) -> Result<Option<&Sector>, DiskImageError> {
        Ok(self
            .track(chs.c, chs.h)?
            .and_then(|t| t.find_sector(chs.s)))
    }

    /// Write (or replace) a sector's payload at the given address, creating the track if
    /// needed.
    pub fn put_sector(&mut self, chs: Chs, sector: Sector) -> Result<(), DiskImageError> {
        let track = self.track_mut(chs.c, chs.h)?;
        if let Some(existing) = track.find_sector_mut(chs.s) {
            *existing = sector;
        }
        else {
            track.sectors.push(sector);
        }
        Ok(())
    }

    /// Read a sector's payload, padding or truncating to `len` bytes. Missing sectors (no
    /// address mark found) are a hard error; CRC-failed sectors with retained data are
    /// still returned with their data, since a partial read beats none.
    pub fn read_sector_data(&self, chs: Chs, len: usize) -> Result<Vec<u8>, DiskImageError> {
        let sector = self
            .sector(chs)?
            .ok_or(DiskImageError::NotFound)?;
        match &sector.data {
            Some(data) => {
                let mut buf = data.clone();
                buf.resize(len, Sector::bad_fill_byte(self.geometry.encoding));
                Ok(buf)
            }
            None => Err(DiskImageError::Corrupt(format!(
                "sector {} has no recoverable data",
                sector.id
            ))),
        }
    }

    /// Summarize the decode quality of every sector on the disk.
    pub fn summarize(&self) -> ReadSummary {
        let mut summary = ReadSummary::default();
        for track in self.tracks.iter().flatten() {
            for sector in &track.sectors {
                match sector.status {
                    SectorStatus::Ok => summary.sectors_ok += 1,
                    SectorStatus::CrcErr => {
                        summary.sectors_bad += 1;
                        summary.crc_errors += 1;
                    }
                    SectorStatus::Missing => {
                        summary.sectors_bad += 1;
                        summary.missing += 1;
                    }
                    SectorStatus::Weak | SectorStatus::Deleted => summary.sectors_ok += 1,
                }
            }
        }
        summary
    }

    /// Recompute `self.consistency` from the current track/sector state.
    pub fn refresh_consistency(&mut self) {
        let mut consistency = DiskConsistency::default();
        let mut sector_size: Option<u16> = None;
        let mut track_len: Option<u8> = None;
        let mut consistent = true;
        let mut track_consistent = true;

        for track in self.tracks.iter().flatten() {
            if track.sectors.len() != self.geometry.sectors_per_track as usize {
                track_consistent = false;
            }
            for sector in &track.sectors {
                if sector.status == SectorStatus::Weak {
                    consistency.weak_bits_present = true;
                }
                if sector.status == SectorStatus::Deleted {
                    consistency.deleted_sectors_present = true;
                }
                let this_size = sector.id.size_bytes() as u16;
                match sector_size {
                    None => sector_size = Some(this_size),
                    Some(existing) if existing != this_size => consistent = false,
                    _ => {}
                }
            }
            match track_len {
                None => track_len = Some(track.sectors.len() as u8),
                Some(existing) if existing != track.sectors.len() as u8 => track_consistent = false,
                _ => {}
            }
        }

        consistency.consistent_sector_size = if consistent { sector_size } else { None };
        consistency.consistent_track_length = if track_consistent { track_len } else { None };
        self.consistency = consistency;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::Encoding;
    use crate::types::sector::SectorId;

    fn small_geometry() -> Geometry {
        Geometry::new(2, 1, 4, 256, 1, Encoding::Mfm).unwrap()
    }

    #[test]
    fn test_put_and_read_sector() {
        let mut img = DiskImage::new(DiskImageFormat::Img, small_geometry());
        let chs = Chs::new(0, 0, 1);
        img.put_sector(chs, Sector::new(SectorId::new(0, 0, 1, 1), vec![0xAAu8; 256]))
            .unwrap();
        let data = img.read_sector_data(chs, 256).unwrap();
        assert_eq!(data, vec![0xAAu8; 256]);
    }

    #[test]
    fn test_missing_sector_is_corrupt_on_read() {
        let mut img = DiskImage::new(DiskImageFormat::Img, small_geometry());
        let chs = Chs::new(0, 0, 2);
        img.put_sector(chs, Sector::missing(SectorId::new(0, 0, 2, 1))).unwrap();
        assert!(img.read_sector_data(chs, 256).is_err());
    }

    #[test]
    fn test_summarize_counts() {
        let mut img = DiskImage::new(DiskImageFormat::Img, small_geometry());
        img.put_sector(Chs::new(0, 0, 1), Sector::new(SectorId::new(0, 0, 1, 1), vec![0; 256]))
            .unwrap();
        let mut bad = Sector::missing(SectorId::new(0, 0, 2, 1));
        bad.status = SectorStatus::CrcErr;
        bad.data = Some(vec![0; 256]);
        img.put_sector(Chs::new(0, 0, 2), bad).unwrap();
        let summary = img.summarize();
        assert_eq!(summary.sectors_ok, 1);
        assert_eq!(summary.crc_errors, 1);
    }

    #[test]
    fn test_out_of_range_track_is_invalid_param() {
        let img = DiskImage::new(DiskImageFormat::Img, small_geometry());
        assert!(matches!(
            img.track(99, 0),
            Err(DiskImageError::InvalidParam(_))
        ));
    }
}
