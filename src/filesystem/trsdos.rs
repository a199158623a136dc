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
//! TRS-80 TRSDOS filesystem access.
//!
//! TRSDOS allocates space in granules (a fixed run of consecutive sectors, tracked one byte
//! per granule in the GAT on track 17, sector 0) rather than individual sectors; a
//! directory entry lists the granules it owns directly rather than chaining through the
//! data itself the way DOS 3.3 or Atari DOS do. This module keeps that granule-table
//! design but simplifies the extent/password fields real TRSDOS directory entries also
//! carry, which this crate has no use for.

use crate::chs::Chs;
use crate::filesystem::{FileAttributes, FileInfo, FileSystem};
use crate::{DiskImage, FsError};

const GAT_TRACK: u16 = 17;
const GAT_SECTOR: u8 = 0;
const DIR_SECTOR_COUNT: u8 = 15;
const ENTRY_SIZE: usize = 32;
const SECTORS_PER_GRANULE: u32 = 5;
const MAX_GRANULES_PER_ENTRY: usize = 26;

#[derive(Clone, Debug)]
struct DirEntry {
    slot: usize,
    name: String,
    last_sector_bytes: u16,
    granules: Vec<u8>,
}

/// A mounted TRSDOS volume.
#[derive(Clone)]
pub struct TrsdosFileSystem {
    image: DiskImage,
    entries: Vec<DirEntry>,
}

fn granule_to_chs(image: &DiskImage, granule: u8, sector_in_granule: u32) -> Chs {
    let spt = image.geometry.sectors_per_track as u32;
    let granules_per_track = (spt / SECTORS_PER_GRANULE).max(1);
    let track = granule as u32 / granules_per_track;
    let granule_in_track = granule as u32 % granules_per_track;
    let sector = granule_in_track * SECTORS_PER_GRANULE + sector_in_granule;
    Chs::new(track as u16, 0, sector as u8 + image.geometry.first_sector_id)
}

fn read_sector(image: &DiskImage, chs: Chs) -> Result<Vec<u8>, FsError> {
    image.read_sector_data(chs, image.geometry.bytes_per_sector as usize).map_err(FsError::Image)
}

fn write_sector(image: &mut DiskImage, chs: Chs, data: &[u8]) -> Result<(), FsError> {
    let id = crate::types::sector::SectorId::new(chs.c, chs.h, chs.s, crate::chs::bytes_to_size_code(data.len()).unwrap_or(1));
    image.put_sector(chs, crate::types::sector::Sector::new(id, data.to_vec())).map_err(FsError::Image)
}

fn parse_entry(slot: usize, raw: &[u8]) -> Option<DirEntry> {
    if raw[0] == 0xFF || raw[0] == 0x00 {
        return None;
    }
    let base = String::from_utf8_lossy(&raw[1..9]).trim_end().to_string();
    let ext = String::from_utf8_lossy(&raw[9..12]).trim_end().to_string();
    let name = if ext.is_empty() { base } else { format!("{base}.{ext}") };
    let last_sector_bytes = u16::from_le_bytes([raw[14], raw[15]]);
    let granule_count = raw[16] as usize;
    let granules = raw[17..17 + granule_count.min(MAX_GRANULES_PER_ENTRY)].to_vec();
    Some(DirEntry { slot, name, last_sector_bytes, granules })
}

fn encode_entry(entry: &DirEntry) -> [u8; ENTRY_SIZE] {
    let mut raw = [0u8; ENTRY_SIZE];
    raw[0] = 0x01;
    let (base, ext) = crate::filesystem::split_83(&entry.name);
    for (i, b) in base.bytes().take(8).enumerate() {
        raw[1 + i] = b;
    }
    for i in base.len()..8 {
        raw[1 + i] = b' ';
    }
    for (i, b) in ext.bytes().take(3).enumerate() {
        raw[9 + i] = b;
    }
    for i in ext.len()..3 {
        raw[9 + i] = b' ';
    }
    raw[14..16].copy_from_slice(&entry.last_sector_bytes.to_le_bytes());
    raw[16] = entry.granules.len() as u8;
    for (i, &g) in entry.granules.iter().take(MAX_GRANULES_PER_ENTRY).enumerate() {
        raw[17 + i] = g;
    }
    raw
}

impl TrsdosFileSystem {
    pub fn mount(image: &DiskImage) -> Result<Self, FsError> {
        let mut entries = Vec::new();
        for dir_sector in 1..=DIR_SECTOR_COUNT {
            let chs = Chs::new(GAT_TRACK, 0, dir_sector + image.geometry.first_sector_id - 1);
            let data = read_sector(image, chs)?;
            let per_sector = data.len() / ENTRY_SIZE;
            for i in 0..per_sector {
                let off = i * ENTRY_SIZE;
                let slot = (dir_sector as usize - 1) * per_sector + i;
                if let Some(entry) = parse_entry(slot, &data[off..off + ENTRY_SIZE]) {
                    entries.push(entry);
                }
            }
        }
        Ok(Self { image: image.clone(), entries })
    }

    fn granule_bytes(&self) -> usize {
        SECTORS_PER_GRANULE as usize * self.image.geometry.bytes_per_sector as usize
    }

    fn total_granules(&self) -> u32 {
        let spt = self.image.geometry.sectors_per_track as u32;
        let granules_per_track = (spt / SECTORS_PER_GRANULE).max(1);
        granules_per_track * self.image.geometry.cylinders as u32 * self.image.geometry.heads as u32
    }

    fn used_granules(&self) -> std::collections::HashSet<u8> {
        let mut used: std::collections::HashSet<u8> = std::collections::HashSet::new();
        used.insert(0); // GAT + directory track's first granule is always reserved
        for e in &self.entries {
            used.extend(e.granules.iter().copied());
        }
        used
    }
}

impl FileSystem for TrsdosFileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        if !(path.is_empty() || path == "/") {
            return Err(FsError::NotFound);
        }
        Ok(self
            .entries
            .iter()
            .map(|e| {
                let full_granules = e.granules.len().saturating_sub(1);
                let size = full_granules as u64 * self.granule_bytes() as u64 + e.last_sector_bytes as u64;
                FileInfo {
                    name: e.name.clone(),
                    size_bytes: size,
                    attributes: FileAttributes::empty(),
                    user_number: None,
                }
            })
            .collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let entry = self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name)).ok_or(FsError::NotFound)?;
        let mut out = Vec::new();
        let spg = SECTORS_PER_GRANULE;
        for (i, &granule) in entry.granules.iter().enumerate() {
            let is_last = i + 1 == entry.granules.len();
            for s in 0..spg {
                let chs = granule_to_chs(&self.image, granule, s);
                let data = read_sector(&self.image, chs)?;
                if is_last && s + 1 == spg {
                    let take = (entry.last_sector_bytes as usize).min(data.len());
                    out.extend_from_slice(&data[..take]);
                }
                else {
                    out.extend_from_slice(&data);
                }
            }
        }
        Ok(out)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        let (base, ext) = crate::filesystem::split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        self.delete_file(&full).ok();

        let granule_bytes = self.granule_bytes();
        let granules_needed = (data.len() + granule_bytes - 1) / granule_bytes.max(1);
        let used = self.used_granules();
        let total = self.total_granules();
        let free: Vec<u8> = (1..total as u16).filter(|g| !used.contains(&(*g as u8))).map(|g| g as u8).take(granules_needed.max(1)).collect();
        if free.len() < granules_needed.max(1) {
            return Err(FsError::DiskFull);
        }

        let mut last_sector_bytes = 0u16;
        for (i, &granule) in free.iter().enumerate() {
            let start = i * granule_bytes;
            for s in 0..SECTORS_PER_GRANULE {
                let sector_bytes = self.image.geometry.bytes_per_sector as usize;
                let sector_start = start + s as usize * sector_bytes;
                let mut buf = vec![0u8; sector_bytes];
                if sector_start < data.len() {
                    let end = (sector_start + sector_bytes).min(data.len());
                    let len = end - sector_start;
                    buf[..len].copy_from_slice(&data[sector_start..end]);
                    if i + 1 == free.len() && s + 1 == SECTORS_PER_GRANULE {
                        last_sector_bytes = len as u16;
                    }
                }
                let chs = granule_to_chs(&self.image, granule, s);
                write_sector(&mut self.image, chs, &buf)?;
            }
        }
        if last_sector_bytes == 0 && !data.is_empty() {
            last_sector_bytes = self.image.geometry.bytes_per_sector;
        }

        let slot = self.entries.len();
        let entry = DirEntry { slot, name: full, last_sector_bytes, granules: free };
        self.write_directory_entry(&entry)?;
        self.entries.push(entry);
        Ok(())
    }

    fn delete_file(&mut self, name: &str) -> Result<(), FsError> {
        let pos = self.entries.iter().position(|e| e.name.eq_ignore_ascii_case(name)).ok_or(FsError::NotFound)?;
        let entry = self.entries.remove(pos);
        let mut blank = DirEntry { slot: entry.slot, name: String::new(), last_sector_bytes: 0, granules: Vec::new() };
        blank.name.clear();
        let dir_sector = (entry.slot / (self.image.geometry.bytes_per_sector as usize / ENTRY_SIZE)) as u8 + 1;
        let per_sector = self.image.geometry.bytes_per_sector as usize / ENTRY_SIZE;
        let off = (entry.slot % per_sector) * ENTRY_SIZE;
        let chs = Chs::new(GAT_TRACK, 0, dir_sector + self.image.geometry.first_sector_id - 1);
        let mut sector_data = read_sector(&self.image, chs)?;
        sector_data[off] = 0xFF;
        write_sector(&mut self.image, chs, &sector_data)
    }

    fn image(&self) -> &crate::DiskImage {
        &self.image
    }

    fn free_space(&self) -> Result<(u64, u64), FsError> {
        let used = self.used_granules().len() as u64;
        let total = self.total_granules() as u64;
        Ok((total.saturating_sub(used) * self.granule_bytes() as u64, total * self.granule_bytes() as u64))
    }

    fn find(&self, name: &str, _user: Option<u8>) -> Result<FileInfo, FsError> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| {
                let full_granules = e.granules.len().saturating_sub(1);
                let size = full_granules as u64 * self.granule_bytes() as u64 + e.last_sector_bytes as u64;
                FileInfo {
                    name: e.name.clone(),
                    size_bytes: size,
                    attributes: FileAttributes::empty(),
                    user_number: None,
                }
            })
            .ok_or(FsError::NotFound)
    }
}

impl TrsdosFileSystem {
    fn write_directory_entry(&mut self, entry: &DirEntry) -> Result<(), FsError> {
        let per_sector = self.image.geometry.bytes_per_sector as usize / ENTRY_SIZE;
        let dir_sector = (entry.slot / per_sector) as u8 + 1;
        let off = (entry.slot % per_sector) * ENTRY_SIZE;
        let chs = Chs::new(GAT_TRACK, 0, dir_sector + self.image.geometry.first_sector_id - 1);
        let mut data = read_sector(&self.image, chs)?;
        data[off..off + ENTRY_SIZE].copy_from_slice(&encode_entry(entry));
        write_sector(&mut self.image, chs, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::Encoding;
    use crate::types::geometry::Geometry;
    use crate::types::sector::{Sector, SectorId};
    use crate::DiskImageFormat;

    fn blank_trsdos_image() -> DiskImage {
        let geometry = Geometry::new(40, 1, 10, 256, 1, Encoding::Fm).unwrap();
        let mut image = DiskImage::new(DiskImageFormat::Dmk, geometry);
        for c in 0..40u16 {
            for s in 1..=10u8 {
                image.put_sector(Chs::new(c, 0, s), Sector::new(SectorId::new(c, 0, s, 1), vec![0u8; 256])).unwrap();
            }
        }
        image
    }

    #[test]
    fn test_empty_disk_has_no_files() {
        let image = blank_trsdos_image();
        let fs = TrsdosFileSystem::mount(&image).unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let image = blank_trsdos_image();
        let mut fs = TrsdosFileSystem::mount(&image).unwrap();
        let payload: Vec<u8> = (0..700u32).map(|b| b as u8).collect();
        fs.write_file("PROG/BAS", &payload).unwrap();
        let read_back = fs.read_file("PROG/BAS").unwrap();
        assert_eq!(read_back, payload);
    }
}
