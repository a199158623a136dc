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
//! Apple DOS 3.3 filesystem access.
//!
//! DOS 3.3 keeps its volume table of contents (VTOC) in track 17, sector 0, which in turn
//! points at a chain of catalog sectors (also on track 17) holding up to seven 35-byte file
//! entries each. Each file's data is addressed through a track/sector list: a dedicated
//! sector (itself chained) holding up to 122 two-byte track/sector pairs, one per data
//! sector of the file.

use crate::chs::Chs;
use crate::filesystem::{FileAttributes, FileInfo, FileSystem};
use crate::{DiskImage, FsError};

const SECTOR_SIZE: usize = 256;
const VTOC_TRACK: u16 = 17;
const VTOC_SECTOR: u8 = 0;

#[derive(Clone, Debug)]
struct CatalogEntry {
    track_sector_list: (u16, u8),
    file_type: u8,
    sectors_used: u16,
    name: String,
}

/// A mounted Apple DOS 3.3 volume.
#[derive(Clone)]
pub struct AppleDos33FileSystem {
    image: DiskImage,
    entries: Vec<CatalogEntry>,
}

fn read_sector(image: &DiskImage, track: u16, sector: u8) -> Result<Vec<u8>, FsError> {
    image.read_sector_data(Chs::new(track, 0, sector), SECTOR_SIZE).map_err(FsError::Image)
}

fn write_sector(image: &mut DiskImage, track: u16, sector: u8, data: &[u8]) -> Result<(), FsError> {
    let id = crate::types::sector::SectorId::new(track, 0, sector, 1);
    image.put_sector(Chs::new(track, 0, sector), crate::types::sector::Sector::new(id, data.to_vec())).map_err(FsError::Image)
}

impl AppleDos33FileSystem {
    pub fn mount(image: &DiskImage) -> Result<Self, FsError> {
        let vtoc = read_sector(image, VTOC_TRACK, VTOC_SECTOR)?;
        let mut catalog_track = vtoc[1] as u16;
        let mut catalog_sector = vtoc[2];
        let mut entries = Vec::new();
        let mut guard = 0;

        while !(catalog_track == 0 && catalog_sector == 0) && guard < 64 {
            let cat = read_sector(image, catalog_track, catalog_sector)?;
            for i in 0..7 {
                let off = 0x0B + i * 35;
                let track_of_list = cat[off];
                if track_of_list == 0xFF || track_of_list == 0x00 {
                    continue;
                }
                let sector_of_list = cat[off + 1];
                let file_type = cat[off + 2];
                let raw_name: Vec<u8> = cat[off + 3..off + 3 + 30].iter().map(|b| b & 0x7F).collect();
                let name = String::from_utf8_lossy(&raw_name).trim_end().to_string();
                let sectors_used = u16::from_le_bytes([cat[off + 33], cat[off + 34]]);
                entries.push(CatalogEntry {
                    track_sector_list: (track_of_list as u16, sector_of_list),
                    file_type,
                    sectors_used,
                    name,
                });
            }
            catalog_track = cat[1] as u16;
            catalog_sector = cat[2];
            guard += 1;
        }

        Ok(Self { image: image.clone(), entries })
    }

    fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

impl FileSystem for AppleDos33FileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        if !(path.is_empty() || path == "/") {
            return Err(FsError::NotFound);
        }
        Ok(self
            .entries
            .iter()
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.sectors_used as u64 * SECTOR_SIZE as u64,
                attributes: if e.file_type & 0x80 != 0 { FileAttributes::LOCKED } else { FileAttributes::empty() },
                user_number: None,
            })
            .collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let entry = self.find(name).ok_or(FsError::NotFound)?;
        let mut out = Vec::new();
        let (mut list_track, mut list_sector) = entry.track_sector_list;
        let mut guard = 0;

        while !(list_track == 0 && list_sector == 0) && guard < 256 {
            let list = read_sector(&self.image, list_track, list_sector)?;
            for i in 0..122 {
                let off = 0x0C + i * 2;
                let t = list[off] as u16;
                let s = list[off + 1];
                if t == 0 && s == 0 {
                    continue;
                }
                out.extend_from_slice(&read_sector(&self.image, t, s)?);
            }
            list_track = list[1] as u16;
            list_sector = list[2];
            guard += 1;
        }
        Ok(out)
    }

    fn write_file(&mut self, _name: &str, _data: &[u8]) -> Result<(), FsError> {
        Err(FsError::Unsupported("Apple DOS 3.3 write support is not implemented".to_string()))
    }

    fn delete_file(&mut self, _name: &str) -> Result<(), FsError> {
        Err(FsError::Unsupported("Apple DOS 3.3 write support is not implemented".to_string()))
    }

    fn image(&self) -> &crate::DiskImage {
        &self.image
    }

    fn free_space(&self) -> Result<(u64, u64), FsError> {
        let vtoc = read_sector(&self.image, VTOC_TRACK, VTOC_SECTOR)?;
        let mut free_sectors = 0u64;
        let tracks = vtoc[0x34] as u16;
        let sectors_per_track = vtoc[0x35] as u64;
        for t in 0..tracks {
            let bitmap_off = 0x38 + t as usize * 4;
            if bitmap_off + 4 > vtoc.len() {
                break;
            }
            let bitmap = u32::from_le_bytes([vtoc[bitmap_off], vtoc[bitmap_off + 1], vtoc[bitmap_off + 2], vtoc[bitmap_off + 3]]);
            free_sectors += bitmap.count_ones() as u64;
        }
        let total = tracks as u64 * sectors_per_track * SECTOR_SIZE as u64;
        Ok((free_sectors * SECTOR_SIZE as u64, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::Encoding;
    use crate::types::geometry::Geometry;
    use crate::types::sector::{Sector, SectorId};
    use crate::DiskImageFormat;

    fn blank_dos33_image() -> DiskImage {
        let geometry = Geometry::new(35, 1, 16, 256, 0, Encoding::Gcr).unwrap();
        let mut image = DiskImage::new(DiskImageFormat::Do, geometry);
        for c in 0..35u16 {
            for s in 0..16u8 {
                image.put_sector(Chs::new(c, 0, s), Sector::new(SectorId::new(c, 0, s, 1), vec![0u8; 256])).unwrap();
            }
        }
        let mut vtoc = vec![0u8; 256];
        vtoc[1] = 17;
        vtoc[2] = 15;
        vtoc[0x34] = 35;
        image.put_sector(Chs::new(17, 0, 0), Sector::new(SectorId::new(17, 0, 0, 1), vtoc)).unwrap();
        image
    }

    #[test]
    fn test_empty_catalog_has_no_entries() {
        let image = blank_dos33_image();
        let fs = AppleDos33FileSystem::mount(&image).unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
    }
}
