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
//! CP/M 2.2-style filesystem access, driven by a [`Dpb`] describing the host machine's
//! disk geometry.
//!
//! CP/M addresses storage in 128-byte logical records regardless of the disk's actual
//! physical sector size, and groups records into allocation blocks whose size is
//! `128 << bsh` bytes. A file's directory entries ("extents") each list up to 16 block
//! numbers and how many of that extent's logical records are actually used (`RC`); a file
//! larger than one extent's worth of blocks gets multiple directory entries sharing the
//! same name, distinguished by their extent number.

use crate::chs::Chs;
use crate::cpm::Dpb;
use crate::filesystem::{split_83, FileAttributes, FileInfo, FileSystem};
use crate::{DiskImage, FsError};

const ENTRY_SIZE: usize = 32;
const DELETED_STATUS: u8 = 0xE5;

#[derive(Clone, Debug)]
struct RawEntry {
    user: u8,
    name: String,
    extent: u16,
    rc: u8,
    blocks: Vec<u16>,
    attributes: FileAttributes,
}

/// A mounted CP/M filesystem.
#[derive(Clone)]
pub struct CpmFileSystem {
    image: DiskImage,
    dpb: Dpb,
    entries: Vec<RawEntry>,
}

fn records_per_sector(image: &DiskImage) -> u32 {
    (image.geometry.bytes_per_sector as u32 / 128).max(1)
}

fn logical_to_chs(image: &DiskImage, dpb: &Dpb, record_index: u32) -> Result<(u16, u8, u8, usize), FsError> {
    let recs_per_sector = records_per_sector(image);
    let recs_per_track = image.geometry.sectors_per_track as u32 * recs_per_sector;
    if recs_per_track == 0 {
        return Err(FsError::Corrupt("geometry has zero sectors per track".to_string()));
    }
    let combined_track = dpb.off as u32 + record_index / recs_per_track;
    let within_track = record_index % recs_per_track;
    let sector_in_track = within_track / recs_per_sector;
    let offset = (within_track % recs_per_sector) as usize * 128;
    let heads = image.geometry.heads as u32;
    if heads == 0 {
        return Err(FsError::Corrupt("geometry has zero heads".to_string()));
    }
    let cylinder = (combined_track / heads) as u16;
    let head = (combined_track % heads) as u8;
    let sector = image.geometry.first_sector_id + sector_in_track as u8;
    Ok((cylinder, head, sector, offset))
}

fn read_logical_record(image: &DiskImage, dpb: &Dpb, record_index: u32) -> Result<[u8; 128], FsError> {
    let (c, h, s, offset) = logical_to_chs(image, dpb, record_index)?;
    let data = image
        .read_sector_data(Chs::new(c, h, s), image.geometry.bytes_per_sector as usize)
        .map_err(FsError::Image)?;
    let mut rec = [0u8; 128];
    rec.copy_from_slice(&data[offset..offset + 128]);
    Ok(rec)
}

fn write_logical_record(image: &mut DiskImage, dpb: &Dpb, record_index: u32, rec: &[u8; 128]) -> Result<(), FsError> {
    let (c, h, s, offset) = logical_to_chs(image, dpb, record_index)?;
    let chs = Chs::new(c, h, s);
    let sector_size = image.geometry.bytes_per_sector as usize;
    let mut data = image
        .read_sector_data(chs, sector_size)
        .unwrap_or_else(|_| vec![0u8; sector_size]);
    data[offset..offset + 128].copy_from_slice(rec);
    let size_code = crate::chs::bytes_to_size_code(sector_size).unwrap_or(2);
    let sector_id = crate::types::sector::SectorId::new(c, h, s, size_code);
    image
        .put_sector(chs, crate::types::sector::Sector::new(sector_id, data))
        .map_err(FsError::Image)
}

fn directory_block_numbers(dpb: &Dpb) -> Vec<u16> {
    let combined: u16 = ((dpb.al0 as u16) << 8) | dpb.al1 as u16;
    (0..16u16).filter(|bit| combined & (0x8000 >> bit) != 0).collect()
}

fn records_per_block(dpb: &Dpb) -> u32 {
    dpb.block_size() / 128
}

fn read_block(image: &DiskImage, dpb: &Dpb, block: u16) -> Result<Vec<u8>, FsError> {
    let recs = records_per_block(dpb);
    let mut out = Vec::with_capacity((recs * 128) as usize);
    for i in 0..recs {
        let record_index = block as u32 * recs + i;
        out.extend_from_slice(&read_logical_record(image, dpb, record_index)?);
    }
    Ok(out)
}

fn write_block(image: &mut DiskImage, dpb: &Dpb, block: u16, data: &[u8]) -> Result<(), FsError> {
    let recs = records_per_block(dpb);
    for i in 0..recs {
        let mut rec = [0u8; 128];
        let start = i as usize * 128;
        if start < data.len() {
            let end = (start + 128).min(data.len());
            rec[..end - start].copy_from_slice(&data[start..end]);
        }
        write_logical_record(image, dpb, block as u32 * recs + i, &rec)?;
    }
    Ok(())
}

/// Decodes the RO/System/Archive bits CP/M packs into the high bit of each of the three
/// extension bytes (bytes 9-11 of the entry), per the standard CP/M 2.2 directory convention.
fn parse_attributes(raw: &[u8]) -> FileAttributes {
    let mut attributes = FileAttributes::empty();
    if raw[9] & 0x80 != 0 {
        attributes |= FileAttributes::READ_ONLY;
    }
    if raw[10] & 0x80 != 0 {
        attributes |= FileAttributes::SYSTEM;
    }
    if raw[11] & 0x80 != 0 {
        attributes |= FileAttributes::ARCHIVE;
    }
    attributes
}

fn parse_entry(raw: &[u8], needs_16bit: bool) -> Option<RawEntry> {
    if raw[0] == DELETED_STATUS || raw[0] > 31 {
        return None;
    }
    let name_bytes: Vec<u8> = raw[1..9].iter().map(|b| b & 0x7F).collect();
    let ext_bytes: Vec<u8> = raw[9..12].iter().map(|b| b & 0x7F).collect();
    let attributes = parse_attributes(raw);
    let name = String::from_utf8_lossy(&name_bytes).trim_end().to_string();
    let ext = String::from_utf8_lossy(&ext_bytes).trim_end().to_string();
    let full_name = if ext.is_empty() { name } else { format!("{name}.{ext}") };
    let ex = raw[12] as u16;
    let s2 = raw[14] as u16;
    let extent = s2 * 32 + ex;
    let rc = raw[15];
    let mut blocks = Vec::new();
    if needs_16bit {
        for chunk in raw[16..32].chunks(2) {
            let b = u16::from_le_bytes([chunk[0], chunk[1]]);
            if b != 0 {
                blocks.push(b);
            }
        }
    }
    else {
        for &b in &raw[16..32] {
            if b != 0 {
                blocks.push(b as u16);
            }
        }
    }
    Some(RawEntry {
        user: raw[0],
        name: full_name,
        extent,
        rc,
        blocks,
        attributes,
    })
}

impl CpmFileSystem {
    /// Mount a CP/M filesystem from a disk image using the given disk parameter block.
    pub fn mount(image: &DiskImage, dpb: Dpb) -> Result<Self, FsError> {
        let needs_16bit = dpb.needs_16bit_blocks();
        let mut entries = Vec::new();
        for block in directory_block_numbers(&dpb) {
            let data = read_block(image, &dpb, block)?;
            for raw in data.chunks(ENTRY_SIZE) {
                if raw.len() == ENTRY_SIZE {
                    if let Some(entry) = parse_entry(raw, needs_16bit) {
                        entries.push(entry);
                    }
                }
            }
        }
        Ok(Self {
            image: image.clone(),
            dpb,
            entries,
        })
    }

    fn entries_for(&self, user: u8, name: &str) -> Vec<&RawEntry> {
        let mut matches: Vec<&RawEntry> = self
            .entries
            .iter()
            .filter(|e| e.user == user && e.name.eq_ignore_ascii_case(name))
            .collect();
        matches.sort_by_key(|e| e.extent);
        matches
    }

    /// Finds which user area a name lives under, when the caller didn't specify one. Picks
    /// the first matching entry's user number, the way a CP/M BDOS search with an unset
    /// current-user byte would land on whichever directory slot comes first.
    fn resolve_user(&self, name: &str) -> Option<u8> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name)).map(|e| e.user)
    }

    fn used_blocks(&self) -> std::collections::HashSet<u16> {
        let mut used: std::collections::HashSet<u16> = directory_block_numbers(&self.dpb).into_iter().collect();
        for entry in &self.entries {
            used.extend(entry.blocks.iter().copied());
        }
        used
    }
}

impl FileSystem for CpmFileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        if !(path.is_empty() || path == "/") {
            return Err(FsError::NotFound);
        }
        let mut by_name: std::collections::BTreeMap<(u8, String), (u64, FileAttributes)> = std::collections::BTreeMap::new();
        for entry in &self.entries {
            let slot = by_name.entry((entry.user, entry.name.clone())).or_insert((0, FileAttributes::empty()));
            slot.0 += entry.rc as u64 * 128;
            slot.1 |= entry.attributes;
        }
        Ok(by_name
            .into_iter()
            .map(|((user, name), (size_bytes, attributes))| FileInfo {
                name,
                size_bytes,
                attributes,
                user_number: Some(user),
            })
            .collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let (base, ext) = split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let user = self.resolve_user(&full).ok_or(FsError::NotFound)?;
        let entries = self.entries_for(user, &full);
        if entries.is_empty() {
            return Err(FsError::NotFound);
        }
        let recs_per_block = records_per_block(&self.dpb) as usize;
        let mut out = Vec::new();
        for entry in entries {
            let mut remaining = entry.rc as usize;
            for &block in &entry.blocks {
                if remaining == 0 {
                    break;
                }
                let data = read_block(&self.image, &self.dpb, block)?;
                let take_records = remaining.min(recs_per_block);
                out.extend_from_slice(&data[..take_records * 128]);
                remaining -= take_records;
            }
        }
        Ok(out)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        let (base, ext) = split_83(name);
        let full = if ext.is_empty() { base.clone() } else { format!("{base}.{ext}") };
        self.delete_file(&full).ok();

        let block_bytes = self.dpb.block_size() as usize;
        let recs_per_block = records_per_block(&self.dpb) as usize;
        let mut used = self.used_blocks();
        let total_blocks = self.dpb.dsm as u16 + 1;

        let free_blocks: Vec<u16> = (0..total_blocks).filter(|b| !used.contains(b)).collect();
        let mut next_free = 0usize;
        let mut new_entries = Vec::new();
        let mut offset = 0usize;
        let mut extent_no = 0u16;
        const MAX_BLOCKS_PER_EXTENT: usize = 16;

        while offset < data.len() || (offset == 0 && data.is_empty()) {
            let mut blocks = Vec::new();
            let mut extent_records = 0usize;
            for _ in 0..MAX_BLOCKS_PER_EXTENT {
                if offset >= data.len() {
                    break;
                }
                let block = *free_blocks.get(next_free).ok_or(FsError::DiskFull)?;
                next_free += 1;
                used.insert(block);
                let end = (offset + block_bytes).min(data.len());
                let chunk = &data[offset..end];
                write_block(&mut self.image, &self.dpb, block, chunk)?;
                let recs_here = (chunk.len() + 127) / 128;
                extent_records += recs_here;
                blocks.push(block);
                offset = end;
            }
            new_entries.push(RawEntry {
                user: 0,
                name: full.clone(),
                extent: extent_no,
                rc: extent_records.min(128) as u8,
                blocks,
                attributes: FileAttributes::empty(),
            });
            extent_no += 1;
            if data.is_empty() {
                break;
            }
        }

        for entry in &new_entries {
            self.write_directory_entry(entry)?;
        }
        self.entries.extend(new_entries);
        let _ = recs_per_block;
        Ok(())
    }

    fn delete_file(&mut self, name: &str) -> Result<(), FsError> {
        let (base, ext) = split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let user = self.resolve_user(&full).ok_or(FsError::NotFound)?;
        let doomed: Vec<RawEntry> = self
            .entries
            .iter()
            .filter(|e| e.user == user && e.name.eq_ignore_ascii_case(&full))
            .cloned()
            .collect();
        if doomed.is_empty() {
            return Err(FsError::NotFound);
        }
        for entry in &doomed {
            self.mark_entry_deleted(entry)?;
        }
        self.entries.retain(|e| !(e.user == user && e.name.eq_ignore_ascii_case(&full)));
        Ok(())
    }

    fn image(&self) -> &crate::DiskImage {
        &self.image
    }

    fn free_space(&self) -> Result<(u64, u64), FsError> {
        let total = self.dpb.dsm as u64 + 1;
        let used = self.used_blocks().len() as u64;
        let total_bytes = total * self.dpb.block_size() as u64;
        Ok((total_bytes.saturating_sub(used.min(total) * self.dpb.block_size() as u64), total_bytes))
    }

    fn find(&self, name: &str, user: Option<u8>) -> Result<FileInfo, FsError> {
        self.list_dir("/")?
            .into_iter()
            .find(|info| info.name.eq_ignore_ascii_case(name) && (user.is_none() || info.user_number == user))
            .ok_or(FsError::NotFound)
    }

    fn set_attributes(&mut self, name: &str, attributes: FileAttributes) -> Result<(), FsError> {
        let (base, ext) = split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let user = self.resolve_user(&full).ok_or(FsError::NotFound)?;
        let targets: Vec<RawEntry> = self.entries.iter().filter(|e| e.user == user && e.name.eq_ignore_ascii_case(&full)).cloned().collect();
        if targets.is_empty() {
            return Err(FsError::NotFound);
        }
        for mut entry in targets {
            entry.attributes = attributes;
            self.rewrite_entry_in_place(&entry)?;
        }
        for entry in self.entries.iter_mut().filter(|e| e.user == user && e.name.eq_ignore_ascii_case(&full)) {
            entry.attributes = attributes;
        }
        Ok(())
    }

    fn format(&mut self) -> Result<(), FsError> {
        for block in directory_block_numbers(&self.dpb) {
            let empty = vec![DELETED_STATUS; self.dpb.block_size() as usize];
            write_block(&mut self.image, &self.dpb, block, &empty)?;
        }
        self.entries.clear();
        Ok(())
    }
}

impl CpmFileSystem {
    fn directory_slot_for(&self, extent: &RawEntry) -> Option<(u16, usize)> {
        let dir_blocks = directory_block_numbers(&self.dpb);
        let entries_per_block = (self.dpb.block_size() as usize) / ENTRY_SIZE;
        let mut index = 0usize;
        for (slot_in_dir, raw_entry) in self.entries.iter().enumerate() {
            if raw_entry.name == extent.name && raw_entry.extent == extent.extent && raw_entry.user == extent.user {
                let block = dir_blocks[slot_in_dir / entries_per_block];
                let offset = slot_in_dir % entries_per_block;
                return Some((block, offset));
            }
            index += 1;
        }
        let _ = index;
        None
    }

    fn write_directory_entry(&mut self, entry: &RawEntry) -> Result<(), FsError> {
        let dir_blocks = directory_block_numbers(&self.dpb);
        let entries_per_block = (self.dpb.block_size() as usize) / ENTRY_SIZE;
        let total_slots = dir_blocks.len() * entries_per_block;
        let occupied = self.entries.len();
        if occupied >= total_slots {
            return Err(FsError::DirFull);
        }
        let block = dir_blocks[occupied / entries_per_block];
        let offset_in_block = (occupied % entries_per_block) * ENTRY_SIZE;
        let mut block_data = read_block(&self.image, &self.dpb, block)?;
        let raw = encode_entry(entry, self.dpb.needs_16bit_blocks());
        block_data[offset_in_block..offset_in_block + ENTRY_SIZE].copy_from_slice(&raw);
        write_block(&mut self.image, &self.dpb, block, &block_data)
    }

    fn mark_entry_deleted(&mut self, entry: &RawEntry) -> Result<(), FsError> {
        if let Some((block, slot)) = self.directory_slot_for(entry) {
            let mut block_data = read_block(&self.image, &self.dpb, block)?;
            block_data[slot * ENTRY_SIZE] = DELETED_STATUS;
            write_block(&mut self.image, &self.dpb, block, &block_data)?;
        }
        Ok(())
    }

    /// Rewrites an existing directory slot in place. `entry`'s `(user, name, extent)` must
    /// still match what's on disk; only fields like `attributes` that don't affect directory
    /// slot lookup should differ from what's currently stored.
    fn rewrite_entry_in_place(&mut self, entry: &RawEntry) -> Result<(), FsError> {
        let (block, slot) = self.directory_slot_for(entry).ok_or(FsError::NotFound)?;
        let mut block_data = read_block(&self.image, &self.dpb, block)?;
        let raw = encode_entry(entry, self.dpb.needs_16bit_blocks());
        let off = slot * ENTRY_SIZE;
        block_data[off..off + ENTRY_SIZE].copy_from_slice(&raw);
        write_block(&mut self.image, &self.dpb, block, &block_data)
    }
}

fn encode_entry(entry: &RawEntry, needs_16bit: bool) -> [u8; ENTRY_SIZE] {
    let mut raw = [0u8; ENTRY_SIZE];
    raw[0] = entry.user;
    let (base, ext) = split_83(&entry.name);
    for (i, b) in base.bytes().take(8).enumerate() {
        raw[1 + i] = b;
    }
    for (i, b) in ext.bytes().take(3).enumerate() {
        raw[9 + i] = b;
    }
    if entry.attributes.contains(FileAttributes::READ_ONLY) {
        raw[9] |= 0x80;
    }
    if entry.attributes.contains(FileAttributes::SYSTEM) {
        raw[10] |= 0x80;
    }
    if entry.attributes.contains(FileAttributes::ARCHIVE) {
        raw[11] |= 0x80;
    }
    raw[12] = (entry.extent % 32) as u8;
    raw[14] = (entry.extent / 32) as u8;
    raw[15] = entry.rc;
    if needs_16bit {
        for (i, &block) in entry.blocks.iter().take(8).enumerate() {
            let bytes = block.to_le_bytes();
            raw[16 + i * 2] = bytes[0];
            raw[16 + i * 2 + 1] = bytes[1];
        }
    }
    else {
        for (i, &block) in entry.blocks.iter().take(16).enumerate() {
            raw[16 + i] = block as u8;
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpm::disk_definition;
    use crate::types::encoding::Encoding;
    use crate::types::geometry::Geometry;
    use crate::types::sector::SectorId;
    use crate::DiskImageFormat;

    fn blank_kaypro_image() -> (DiskImage, Dpb) {
        let def = disk_definition("kaypro-ii").unwrap();
        let geometry = Geometry::new(def.cylinders, def.heads, 10, 512, 1, Encoding::Mfm).unwrap();
        let mut image = DiskImage::new(DiskImageFormat::Img, geometry);
        for c in 0..def.cylinders {
            for s in 1..=10u8 {
                image
                    .put_sector(Chs::new(c, 0, s), crate::types::sector::Sector::new(SectorId::new(c, 0, s, 2), vec![0u8; 512]))
                    .unwrap();
            }
        }
        (image, def.dpb)
    }

    #[test]
    fn test_empty_disk_has_no_files() {
        let (image, dpb) = blank_kaypro_image();
        let fs = CpmFileSystem::mount(&image, dpb).unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_file_round_trip() {
        let (image, dpb) = blank_kaypro_image();
        let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
        let payload = vec![0xABu8; 3000];
        fs.write_file("HELLO.TXT", &payload).unwrap();
        let listing = fs.list_dir("/").unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "HELLO.TXT");
        let read_back = fs.read_file("HELLO.TXT").unwrap();
        assert_eq!(&read_back[..payload.len()], payload.as_slice());
    }

    #[test]
    fn test_delete_file_removes_listing() {
        let (image, dpb) = blank_kaypro_image();
        let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
        fs.write_file("A.TXT", &[1, 2, 3]).unwrap();
        fs.delete_file("A.TXT").unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
        assert!(fs.read_file("A.TXT").is_err());
    }

    #[test]
    fn test_nonzero_user_file_is_listed_read_and_deleted() {
        let (image, dpb) = blank_kaypro_image();
        let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
        let used = fs.used_blocks();
        let block = (0u16..).find(|b| !used.contains(b)).unwrap();
        write_block(&mut fs.image, &fs.dpb, block, &[7, 8, 9]).unwrap();
        let entry = RawEntry {
            user: 1,
            name: "B.TXT".to_string(),
            extent: 0,
            rc: 1,
            blocks: vec![block],
            attributes: FileAttributes::empty(),
        };
        fs.write_directory_entry(&entry).unwrap();
        fs.entries.push(entry);

        let listing = fs.list_dir("/").unwrap();
        assert!(listing.iter().any(|f| f.name == "B.TXT" && f.user_number == Some(1)));
        assert_eq!(fs.find("B.TXT", Some(1)).unwrap().user_number, Some(1));
        assert!(fs.find("B.TXT", Some(0)).is_err());

        let data = fs.read_file("B.TXT").unwrap();
        assert_eq!(&data[..3], &[7, 8, 9]);

        fs.delete_file("B.TXT").unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
    }

    #[test]
    fn test_set_attributes_marks_read_only_and_persists() {
        let (image, dpb) = blank_kaypro_image();
        let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
        fs.write_file("A.TXT", &[1, 2, 3]).unwrap();
        fs.set_attributes("A.TXT", FileAttributes::READ_ONLY).unwrap();
        assert_eq!(fs.list_dir("/").unwrap()[0].attributes, FileAttributes::READ_ONLY);

        let remounted = CpmFileSystem::mount(&fs.image, fs.dpb).unwrap();
        assert_eq!(remounted.list_dir("/").unwrap()[0].attributes, FileAttributes::READ_ONLY);
    }

    #[test]
    fn test_format_clears_directory() {
        let (image, dpb) = blank_kaypro_image();
        let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
        fs.write_file("A.TXT", &[1, 2, 3]).unwrap();
        fs.format().unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
        let remounted = CpmFileSystem::mount(&fs.image, fs.dpb).unwrap();
        assert!(remounted.list_dir("/").unwrap().is_empty());
    }
}
