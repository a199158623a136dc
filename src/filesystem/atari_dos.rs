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
//! Atari 8-bit DOS 2.0 filesystem access.
//!
//! DOS 2.0 keeps a VTOC (volume table of contents) in sector 360, a 64-entry directory in
//! sectors 361-368, and chains each file's data sectors via three trailer bytes in every
//! 128-byte sector: the last byte holds how many of that sector's first 125 bytes are in
//! use, and the two bytes before it hold the file's directory slot number (high six bits)
//! and the next sector number (ten bits total, split across both bytes).

use crate::chs::Chs;
use crate::filesystem::{FileAttributes, FileInfo, FileSystem};
use crate::{DiskImage, FsError};

const SECTOR_SIZE: usize = 128;
const USABLE_BYTES: usize = 125;
const VTOC_SECTOR: u32 = 360;
const DIR_FIRST_SECTOR: u32 = 361;
const DIR_SECTOR_COUNT: u32 = 8;
const ENTRIES_PER_SECTOR: usize = 8;
const ENTRY_SIZE: usize = 16;

const FLAG_DELETED: u8 = 0x80;
const FLAG_IN_USE: u8 = 0x40;
const FLAG_LOCKED: u8 = 0x20;
const FLAG_DOS2: u8 = 0x10;

#[derive(Clone, Debug)]
struct DirEntry {
    slot: usize,
    flags: u8,
    sector_count: u16,
    start_sector: u16,
    name: String,
}

/// A mounted Atari DOS 2.0 volume.
#[derive(Clone)]
pub struct AtariDosFileSystem {
    image: DiskImage,
    entries: Vec<DirEntry>,
}

fn sector_to_chs(image: &DiskImage, sector: u32) -> Chs {
    let spt = image.geometry.sectors_per_track.max(1) as u32;
    let zero_based = sector.saturating_sub(1);
    let c = (zero_based / spt) as u16;
    let s = (zero_based % spt) as u8 + image.geometry.first_sector_id;
    Chs::new(c, 0, s)
}

fn read_sector(image: &DiskImage, sector: u32) -> Result<Vec<u8>, FsError> {
    image.read_sector_data(sector_to_chs(image, sector), SECTOR_SIZE).map_err(FsError::Image)
}

fn write_sector(image: &mut DiskImage, sector: u32, data: &[u8]) -> Result<(), FsError> {
    let chs = sector_to_chs(image, sector);
    let id = crate::types::sector::SectorId::new(chs.c, chs.h, chs.s, 0);
    image.put_sector(chs, crate::types::sector::Sector::new(id, data.to_vec())).map_err(FsError::Image)
}

fn parse_entry(slot: usize, raw: &[u8]) -> Option<DirEntry> {
    let flags = raw[0];
    if flags == 0x00 || flags & FLAG_DELETED != 0 {
        return None;
    }
    let sector_count = u16::from_le_bytes([raw[1], raw[2]]);
    let start_sector = u16::from_le_bytes([raw[3], raw[4]]);
    let base = String::from_utf8_lossy(&raw[5..13]).trim_end().to_string();
    let ext = String::from_utf8_lossy(&raw[13..16]).trim_end().to_string();
    let name = if ext.is_empty() { base } else { format!("{base}.{ext}") };
    Some(DirEntry { slot, flags, sector_count, start_sector, name })
}

fn encode_entry(entry: &DirEntry) -> [u8; ENTRY_SIZE] {
    let mut raw = [0u8; ENTRY_SIZE];
    raw[0] = entry.flags;
    raw[1..3].copy_from_slice(&entry.sector_count.to_le_bytes());
    raw[3..5].copy_from_slice(&entry.start_sector.to_le_bytes());
    let (base, ext) = crate::filesystem::split_83(&entry.name);
    for (i, b) in base.bytes().take(8).enumerate() {
        raw[5 + i] = b;
    }
    for i in base.len()..8 {
        raw[5 + i] = b' ';
    }
    for (i, b) in ext.bytes().take(3).enumerate() {
        raw[13 + i] = b;
    }
    for i in ext.len()..3 {
        raw[13 + i] = b' ';
    }
    raw
}

impl AtariDosFileSystem {
    pub fn mount(image: &DiskImage) -> Result<Self, FsError> {
        let mut entries = Vec::new();
        for dir_sector in 0..DIR_SECTOR_COUNT {
            let data = read_sector(image, DIR_FIRST_SECTOR + dir_sector)?;
            for slot_in_sector in 0..ENTRIES_PER_SECTOR {
                let off = slot_in_sector * ENTRY_SIZE;
                let slot = dir_sector as usize * ENTRIES_PER_SECTOR + slot_in_sector;
                if let Some(entry) = parse_entry(slot, &data[off..off + ENTRY_SIZE]) {
                    entries.push(entry);
                }
            }
        }
        Ok(Self { image: image.clone(), entries })
    }

    fn find_entry(&self, name: &str) -> Option<&DirEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn total_sectors(&self) -> u32 {
        self.image.geometry.total_sectors() as u32
    }

    fn used_sectors(&self) -> Result<std::collections::HashSet<u16>, FsError> {
        let mut used: std::collections::HashSet<u16> = (1..=3).collect();
        used.insert(VTOC_SECTOR as u16);
        for i in 0..DIR_SECTOR_COUNT {
            used.insert((DIR_FIRST_SECTOR + i) as u16);
        }
        for entry in &self.entries {
            let mut sector = entry.start_sector;
            let mut guard = 0;
            while sector != 0 && guard < 2000 {
                used.insert(sector);
                let data = read_sector(&self.image, sector as u32)?;
                let next = ((data[125] as u16 & 0x03) << 8) | data[126] as u16;
                if next == sector || next == 0 {
                    break;
                }
                sector = next;
                guard += 1;
            }
        }
        Ok(used)
    }

    fn write_vtoc(&mut self) -> Result<(), FsError> {
        let used = self.used_sectors()?;
        let total = self.total_sectors();
        let free = total.saturating_sub(used.len() as u32);
        let mut vtoc = vec![0u8; SECTOR_SIZE];
        vtoc[0] = 2;
        vtoc[1..3].copy_from_slice(&(total as u16).to_le_bytes());
        vtoc[3..5].copy_from_slice(&(free as u16).to_le_bytes());
        for sector in 0..total.min(720) {
            let byte = 10 + sector as usize / 8;
            if byte >= vtoc.len() {
                break;
            }
            if !used.contains(&(sector as u16)) {
                vtoc[byte] |= 0x80 >> (sector % 8);
            }
        }
        write_sector(&mut self.image, VTOC_SECTOR, &vtoc)
    }
}

impl FileSystem for AtariDosFileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        if !(path.is_empty() || path == "/") {
            return Err(FsError::NotFound);
        }
        Ok(self
            .entries
            .iter()
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.sector_count as u64 * USABLE_BYTES as u64,
                attributes: if e.flags & FLAG_LOCKED != 0 { FileAttributes::LOCKED } else { FileAttributes::empty() },
                user_number: None,
            })
            .collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let entry = self.find_entry(name).ok_or(FsError::NotFound)?;
        let mut out = Vec::new();
        let mut sector = entry.start_sector;
        let mut guard = 0;
        while sector != 0 && guard < 2000 {
            let data = read_sector(&self.image, sector as u32)?;
            let used = data[127] as usize;
            out.extend_from_slice(&data[..used.min(USABLE_BYTES)]);
            let next = ((data[125] as u16 & 0x03) << 8) | data[126] as u16;
            if next == 0 || next == sector {
                break;
            }
            sector = next;
            guard += 1;
        }
        Ok(out)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        let (base, ext) = crate::filesystem::split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        self.delete_file(&full).ok();

        let slot = self
            .entries
            .iter()
            .map(|e| e.slot)
            .max()
            .map(|m| m + 1)
            .unwrap_or(0)
            .max(self.entries.len());
        if slot >= DIR_SECTOR_COUNT as usize * ENTRIES_PER_SECTOR {
            return Err(FsError::DirFull);
        }

        let used = self.used_sectors()?;
        let total = self.total_sectors();
        let free_list: Vec<u16> = (4..total as u16).filter(|s| *s != VTOC_SECTOR as u16 && !(DIR_FIRST_SECTOR as u16..DIR_FIRST_SECTOR as u16 + DIR_SECTOR_COUNT as u16).contains(s) && !used.contains(s)).collect();

        let chunks: Vec<&[u8]> = if data.is_empty() { vec![&data[0..0]] } else { data.chunks(USABLE_BYTES).collect() };
        if chunks.len() > free_list.len() {
            return Err(FsError::DiskFull);
        }

        for (i, chunk) in chunks.iter().enumerate() {
            let sector = free_list[i];
            let mut buf = vec![0u8; SECTOR_SIZE];
            buf[..chunk.len()].copy_from_slice(chunk);
            let next_sector = if i + 1 < chunks.len() { free_list[i + 1] } else { 0 };
            buf[125] = ((slot as u8) << 2) | ((next_sector >> 8) as u8 & 0x03);
            buf[126] = (next_sector & 0xFF) as u8;
            buf[127] = chunk.len() as u8;
            write_sector(&mut self.image, sector as u32, &buf)?;
        }

        let entry = DirEntry {
            slot,
            flags: FLAG_IN_USE | FLAG_DOS2,
            sector_count: chunks.len() as u16,
            start_sector: free_list.first().copied().unwrap_or(0),
            name: full,
        };
        self.write_directory_entry(&entry)?;
        self.entries.push(entry);
        self.write_vtoc()
    }

    fn delete_file(&mut self, name: &str) -> Result<(), FsError> {
        let pos = self.entries.iter().position(|e| e.name.eq_ignore_ascii_case(name)).ok_or(FsError::NotFound)?;
        let mut entry = self.entries.remove(pos);
        entry.flags = FLAG_DELETED;
        self.write_directory_entry(&entry)?;
        self.write_vtoc()
    }

    fn image(&self) -> &crate::DiskImage {
        &self.image
    }

    fn free_space(&self) -> Result<(u64, u64), FsError> {
        let used = self.used_sectors()?;
        let total = self.total_sectors() as u64;
        Ok((total.saturating_sub(used.len() as u64) * USABLE_BYTES as u64, total * USABLE_BYTES as u64))
    }

    fn find(&self, name: &str, _user: Option<u8>) -> Result<FileInfo, FsError> {
        self.find_entry(name)
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.sector_count as u64 * USABLE_BYTES as u64,
                attributes: if e.flags & FLAG_LOCKED != 0 { FileAttributes::LOCKED } else { FileAttributes::empty() },
                user_number: None,
            })
            .ok_or(FsError::NotFound)
    }

    fn set_attributes(&mut self, name: &str, attributes: FileAttributes) -> Result<(), FsError> {
        let mut entry = self.find_entry(name).ok_or(FsError::NotFound)?.clone();
        if attributes.contains(FileAttributes::LOCKED) {
            entry.flags |= FLAG_LOCKED;
        }
        else {
            entry.flags &= !FLAG_LOCKED;
        }
        self.write_directory_entry(&entry)?;
        if let Some(pos) = self.entries.iter().position(|e| e.slot == entry.slot) {
            self.entries[pos] = entry;
        }
        Ok(())
    }
}

impl AtariDosFileSystem {
    fn write_directory_entry(&mut self, entry: &DirEntry) -> Result<(), FsError> {
        let dir_sector = DIR_FIRST_SECTOR + (entry.slot / ENTRIES_PER_SECTOR) as u32;
        let off = (entry.slot % ENTRIES_PER_SECTOR) * ENTRY_SIZE;
        let mut data = read_sector(&self.image, dir_sector)?;
        data[off..off + ENTRY_SIZE].copy_from_slice(&encode_entry(entry));
        write_sector(&mut self.image, dir_sector, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::Encoding;
    use crate::types::geometry::Geometry;
    use crate::types::sector::{Sector, SectorId};
    use crate::DiskImageFormat;

    fn blank_atari_image() -> DiskImage {
        let geometry = Geometry::new(40, 1, 18, 128, 1, Encoding::Fm).unwrap();
        let mut image = DiskImage::new(DiskImageFormat::Atr, geometry);
        for c in 0..40u16 {
            for s in 1..=18u8 {
                image.put_sector(Chs::new(c, 0, s), Sector::new(SectorId::new(c, 0, s, 0), vec![0u8; 128])).unwrap();
            }
        }
        image
    }

    #[test]
    fn test_empty_disk_has_no_files() {
        let image = blank_atari_image();
        let fs = AtariDosFileSystem::mount(&image).unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_file_round_trip() {
        let image = blank_atari_image();
        let mut fs = AtariDosFileSystem::mount(&image).unwrap();
        let payload: Vec<u8> = (0..400u32).map(|b| b as u8).collect();
        fs.write_file("GAME.BAS", &payload).unwrap();
        let listing = fs.list_dir("/").unwrap();
        assert_eq!(listing.len(), 1);
        let read_back = fs.read_file("GAME.BAS").unwrap();
        assert_eq!(read_back, payload);
    }

    #[test]
    fn test_delete_removes_listing() {
        let image = blank_atari_image();
        let mut fs = AtariDosFileSystem::mount(&image).unwrap();
        fs.write_file("A.TXT", &[1, 2, 3]).unwrap();
        fs.delete_file("A.TXT").unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
    }
}
