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
//! BBC Micro Disc Filing System (DFS) catalog access.
//!
//! A DFS disk keeps its entire catalog in the first two 256-byte sectors of track 0: sector
//! 0 holds up to 31 eight-character filenames plus the disk title's first 8 characters;
//! sector 1 holds, per entry, the load address, execution address, length, and start
//! sector, plus the disk title's last 4 characters and the sector count. DFS has no
//! subdirectories below the single ("$") directory this module models, and no on-disk free
//! space bitmap — free space is whatever lies past the highest-numbered used sector.

use crate::chs::Chs;
use crate::filesystem::{FileAttributes, FileInfo, FileSystem};
use crate::{DiskImage, FsError};

const SECTOR_SIZE: usize = 256;
const MAX_ENTRIES: usize = 31;

#[derive(Clone, Debug)]
struct CatalogEntry {
    name: String,
    directory: char,
    load_address: u32,
    exec_address: u32,
    length: u32,
    start_sector: u16,
    locked: bool,
}

/// A mounted BBC DFS volume (single-sided; double-sided disks are two independent DFS
/// volumes, one per side, and are mounted separately).
#[derive(Clone)]
pub struct BbcDfsFileSystem {
    image: DiskImage,
    title: String,
    sector_count: u16,
    entries: Vec<CatalogEntry>,
}

fn read_sector(image: &DiskImage, sector: u8) -> Result<Vec<u8>, FsError> {
    image
        .read_sector_data(Chs::new(0, 0, sector), SECTOR_SIZE)
        .map_err(FsError::Image)
}

fn write_sector(image: &mut DiskImage, sector: u8, data: &[u8]) -> Result<(), FsError> {
    let id = crate::types::sector::SectorId::new(0, 0, sector, 1);
    image
        .put_sector(Chs::new(0, 0, sector), crate::types::sector::Sector::new(id, data.to_vec()))
        .map_err(FsError::Image)
}

impl BbcDfsFileSystem {
    /// Mount a BBC DFS volume, reading its catalog from the first two sectors of track 0
    /// (here addressed as logical sectors 0 and 1; the DFS spec calls these "sector 0" and
    /// "sector 1" of the catalog, both on track 0).
    pub fn mount(image: &DiskImage) -> Result<Self, FsError> {
        let sector0 = read_sector(image, image.geometry.first_sector_id)?;
        let sector1 = read_sector(image, image.geometry.first_sector_id + 1)?;

        let title_head = String::from_utf8_lossy(&sector0[0..8]).trim_end().to_string();
        let title_tail = String::from_utf8_lossy(&sector1[0..4]).trim_end().to_string();
        let title = format!("{title_head}{title_tail}");

        let sector_count = ((sector1[6] as u16 & 0x03) << 8) | sector1[7] as u16;
        let entry_count = (sector0[5] as usize / 8).min(MAX_ENTRIES);

        let mut entries = Vec::with_capacity(entry_count);
        for i in 0..entry_count {
            let name_off = 8 + i * 8;
            let raw_name: Vec<u8> = sector0[name_off..name_off + 7].to_vec();
            let dir_byte = sector0[name_off + 7];
            let directory = (dir_byte & 0x7F) as char;
            let locked = dir_byte & 0x80 != 0;
            let name = String::from_utf8_lossy(&raw_name).trim_end().to_string();

            let info_off = 8 + i * 8;
            let load_lo = sector1[info_off] as u32 | (sector1[info_off + 1] as u32) << 8;
            let exec_lo = sector1[info_off + 2] as u32 | (sector1[info_off + 3] as u32) << 8;
            let length_lo = sector1[info_off + 4] as u32 | (sector1[info_off + 5] as u32) << 8;
            let packed = sector1[info_off + 6];
            let load_hi = (packed >> 2) & 0x03;
            let length_hi = (packed >> 4) & 0x03;
            let exec_hi = (packed >> 6) & 0x03;
            let start_sector = sector1[info_off + 7] as u16 | ((packed as u16 & 0x03) << 8);

            entries.push(CatalogEntry {
                name,
                directory,
                load_address: load_lo | (load_hi as u32) << 16,
                exec_address: exec_lo | (exec_hi as u32) << 16,
                length: length_lo | (length_hi as u32) << 16,
                start_sector,
                locked,
            });
        }

        Ok(Self {
            image: image.clone(),
            title,
            sector_count,
            entries,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn find_entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

impl FileSystem for BbcDfsFileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        let want_dir = if path.is_empty() || path == "/" || path == "$" {
            '$'
        }
        else {
            path.trim_start_matches('/').chars().next().unwrap_or('$')
        };
        Ok(self
            .entries
            .iter()
            .filter(|e| e.directory == want_dir)
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.length as u64,
                attributes: if e.locked { FileAttributes::LOCKED } else { FileAttributes::empty() },
                user_number: None,
            })
            .collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let entry = self.find_entry(name).ok_or(FsError::NotFound)?;
        let sectors_needed = (entry.length as usize + SECTOR_SIZE - 1) / SECTOR_SIZE;
        let mut out = Vec::with_capacity(entry.length as usize);
        for i in 0..sectors_needed {
            let sector = entry.start_sector as u32 + i as u32;
            let c = (sector / image_sectors_per_track(self)) as u16;
            let s = (sector % image_sectors_per_track(self)) as u8 + self.image.geometry.first_sector_id;
            out.extend_from_slice(&self.image.read_sector_data(Chs::new(c, 0, s), SECTOR_SIZE).map_err(FsError::Image)?);
        }
        out.truncate(entry.length as usize);
        Ok(out)
    }

    fn write_file(&mut self, _name: &str, _data: &[u8]) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    fn delete_file(&mut self, _name: &str) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    fn image(&self) -> &crate::DiskImage {
        &self.image
    }

    fn free_space(&self) -> Result<(u64, u64), FsError> {
        let highest_used = self.entries.iter().map(|e| e.start_sector as u32 + (e.length + SECTOR_SIZE as u32 - 1) / SECTOR_SIZE as u32).max().unwrap_or(2);
        let total = self.sector_count as u64 * SECTOR_SIZE as u64;
        Ok((total.saturating_sub(highest_used as u64 * SECTOR_SIZE as u64), total))
    }

    fn volume_label(&self) -> Option<String> {
        Some(self.title.clone())
    }

    fn find(&self, name: &str, _user: Option<u8>) -> Result<FileInfo, FsError> {
        let entry = self.find_entry(name).ok_or(FsError::NotFound)?;
        Ok(FileInfo {
            name: entry.name.clone(),
            size_bytes: entry.length as u64,
            attributes: if entry.locked { FileAttributes::LOCKED } else { FileAttributes::empty() },
            user_number: None,
        })
    }
}

fn image_sectors_per_track(fs: &BbcDfsFileSystem) -> u32 {
    fs.image.geometry.sectors_per_track as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::Encoding;
    use crate::types::geometry::Geometry;
    use crate::types::sector::{Sector, SectorId};
    use crate::DiskImageFormat;

    fn blank_dfs_image() -> DiskImage {
        let geometry = Geometry::new(80, 1, 10, 256, 0, Encoding::Fm).unwrap();
        let mut image = DiskImage::new(DiskImageFormat::Ssd, geometry);
        for c in 0..80u16 {
            for s in 0..10u8 {
                image
                    .put_sector(Chs::new(c, 0, s), Sector::new(SectorId::new(c, 0, s, 1), vec![0u8; 256]))
                    .unwrap();
            }
        }
        image
    }

    #[test]
    fn test_empty_catalog_has_no_entries() {
        let image = blank_dfs_image();
        let fs = BbcDfsFileSystem::mount(&image).unwrap();
        assert!(fs.list_dir("$").unwrap().is_empty());
    }

    #[test]
    fn test_write_is_rejected() {
        let image = blank_dfs_image();
        let mut fs = BbcDfsFileSystem::mount(&image).unwrap();
        assert!(matches!(fs.write_file("X", &[1]), Err(FsError::ReadOnly)));
    }
}
