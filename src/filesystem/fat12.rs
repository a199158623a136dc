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
//! A shared FAT12 engine used by both [`crate::filesystem::atari_st_fat`] (Atari ST TOS)
//! and [`crate::filesystem::human68k`] (Sharp X68000 Human68k). Both platforms use an
//! unmodified MS-DOS-compatible FAT12 boot sector and directory layout, so there is no
//! platform-specific logic below the BPB parse.

use crate::chs::Chs;
use crate::filesystem::{FileAttributes, FileInfo, FileSystem};
use crate::types::sector::{Sector, SectorId};
use crate::{DiskImage, FsError};

/// The subset of the BIOS Parameter Block this engine needs, per the standard FAT12 boot
/// sector layout (bytes 11-29).
#[derive(Copy, Clone, Debug)]
pub struct BiosParameterBlock {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub root_entries: u16,
    pub total_sectors: u16,
    pub sectors_per_fat: u16,
    pub sectors_per_track: u16,
    pub heads: u16,
}

impl BiosParameterBlock {
    pub fn parse(boot_sector: &[u8]) -> Result<Self, FsError> {
        if boot_sector.len() < 30 {
            return Err(FsError::Corrupt("boot sector shorter than BPB".to_string()));
        }
        let u16_at = |off: usize| u16::from_le_bytes([boot_sector[off], boot_sector[off + 1]]);
        let bpb = Self {
            bytes_per_sector: u16_at(11),
            sectors_per_cluster: boot_sector[13],
            reserved_sectors: u16_at(14),
            num_fats: boot_sector[16],
            root_entries: u16_at(17),
            total_sectors: u16_at(19),
            sectors_per_fat: u16_at(22),
            sectors_per_track: u16_at(24),
            heads: u16_at(26),
        };
        if bpb.bytes_per_sector == 0 || bpb.sectors_per_cluster == 0 {
            return Err(FsError::Corrupt("BPB has zero bytes-per-sector or sectors-per-cluster".to_string()));
        }
        Ok(bpb)
    }

    fn root_dir_lba(&self) -> u32 {
        self.reserved_sectors as u32 + self.num_fats as u32 * self.sectors_per_fat as u32
    }

    fn root_dir_sectors(&self) -> u32 {
        ((self.root_entries as u32 * 32) + self.bytes_per_sector as u32 - 1) / self.bytes_per_sector as u32
    }

    fn data_area_lba(&self) -> u32 {
        self.root_dir_lba() + self.root_dir_sectors()
    }

    fn cluster_to_lba(&self, cluster: u16) -> u32 {
        self.data_area_lba() + (cluster as u32 - 2) * self.sectors_per_cluster as u32
    }

    fn cluster_bytes(&self) -> usize {
        self.sectors_per_cluster as usize * self.bytes_per_sector as usize
    }
}

fn lba_to_chs(bpb: &BiosParameterBlock, first_sector_id: u8, lba: u32) -> Chs {
    let spt = bpb.sectors_per_track.max(1) as u32;
    let heads = bpb.heads.max(1) as u32;
    let sector = (lba % spt) as u8 + first_sector_id;
    let head = ((lba / spt) % heads) as u8;
    let cylinder = (lba / (spt * heads)) as u16;
    Chs::new(cylinder, head, sector)
}

fn read_sector_linear(image: &DiskImage, bpb: &BiosParameterBlock, lba: u32) -> Result<Vec<u8>, FsError> {
    let chs = lba_to_chs(bpb, image.geometry.first_sector_id, lba);
    image
        .read_sector_data(chs, bpb.bytes_per_sector as usize)
        .map_err(FsError::Image)
}

fn write_sector_linear(image: &mut DiskImage, bpb: &BiosParameterBlock, lba: u32, data: &[u8]) -> Result<(), FsError> {
    let chs = lba_to_chs(bpb, image.geometry.first_sector_id, lba);
    let size_code = crate::chs::bytes_to_size_code(bpb.bytes_per_sector as usize).unwrap_or(2);
    let id = SectorId::new(chs.c, chs.h, chs.s, size_code);
    image.put_sector(chs, Sector::new(id, data.to_vec())).map_err(FsError::Image)
}

fn read_fat(image: &DiskImage, bpb: &BiosParameterBlock) -> Result<Vec<u8>, FsError> {
    let mut fat = Vec::with_capacity(bpb.sectors_per_fat as usize * bpb.bytes_per_sector as usize);
    for i in 0..bpb.sectors_per_fat as u32 {
        fat.extend_from_slice(&read_sector_linear(image, bpb, bpb.reserved_sectors as u32 + i)?);
    }
    Ok(fat)
}

fn write_fat(image: &mut DiskImage, bpb: &BiosParameterBlock, fat: &[u8]) -> Result<(), FsError> {
    for copy in 0..bpb.num_fats as u32 {
        let base = bpb.reserved_sectors as u32 + copy * bpb.sectors_per_fat as u32;
        for i in 0..bpb.sectors_per_fat as u32 {
            let start = i as usize * bpb.bytes_per_sector as usize;
            let end = (start + bpb.bytes_per_sector as usize).min(fat.len());
            write_sector_linear(image, bpb, base + i, &fat[start..end])?;
        }
    }
    Ok(())
}

fn get_fat_entry(fat: &[u8], cluster: u32) -> u16 {
    let offset = (cluster * 3 / 2) as usize;
    if cluster % 2 == 0 {
        (fat[offset] as u16) | (((fat[offset + 1] & 0x0F) as u16) << 8)
    }
    else {
        ((fat[offset] >> 4) as u16) | ((fat[offset + 1] as u16) << 4)
    }
}

fn set_fat_entry(fat: &mut [u8], cluster: u32, value: u16) {
    let offset = (cluster * 3 / 2) as usize;
    if cluster % 2 == 0 {
        fat[offset] = (value & 0xFF) as u8;
        fat[offset + 1] = (fat[offset + 1] & 0xF0) | ((value >> 8) as u8 & 0x0F);
    }
    else {
        fat[offset] = (fat[offset] & 0x0F) | (((value & 0x0F) as u8) << 4);
        fat[offset + 1] = (value >> 4) as u8;
    }
}

const END_OF_CHAIN: u16 = 0xFFF;
const FREE_CLUSTER: u16 = 0x000;

#[derive(Clone, Debug)]
struct DirEntry {
    name: String,
    attr: u8,
    first_cluster: u16,
    size: u32,
    slot: usize,
}

fn parse_dir_entries(raw: &[u8]) -> Vec<DirEntry> {
    let mut out = Vec::new();
    for (slot, chunk) in raw.chunks(32).enumerate() {
        if chunk.len() < 32 || chunk[0] == 0x00 {
            break;
        }
        if chunk[0] == 0xE5 {
            continue;
        }
        let attr = chunk[11];
        if attr & 0x08 != 0 {
            continue; // volume label
        }
        let base = String::from_utf8_lossy(&chunk[0..8]).trim_end().to_string();
        let ext = String::from_utf8_lossy(&chunk[8..11]).trim_end().to_string();
        let name = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let first_cluster = u16::from_le_bytes([chunk[26], chunk[27]]);
        let size = u32::from_le_bytes([chunk[28], chunk[29], chunk[30], chunk[31]]);
        out.push(DirEntry { name, attr, first_cluster, size, slot });
    }
    out
}

fn encode_dir_entry(entry: &DirEntry) -> [u8; 32] {
    let mut raw = [0u8; 32];
    let (base, ext) = crate::filesystem::split_83(&entry.name);
    for (i, b) in base.bytes().take(8).enumerate() {
        raw[i] = b;
    }
    for i in base.len()..8 {
        raw[i] = b' ';
    }
    for (i, b) in ext.bytes().take(3).enumerate() {
        raw[8 + i] = b;
    }
    for i in ext.len()..3 {
        raw[8 + i] = b' ';
    }
    raw[11] = entry.attr;
    raw[26..28].copy_from_slice(&entry.first_cluster.to_le_bytes());
    raw[28..32].copy_from_slice(&entry.size.to_le_bytes());
    raw
}

/// A mounted FAT12 volume.
#[derive(Clone)]
pub struct Fat12FileSystem {
    image: DiskImage,
    bpb: BiosParameterBlock,
    fat: Vec<u8>,
    root: Vec<DirEntry>,
}

impl Fat12FileSystem {
    /// Mount a FAT12 volume, reading the boot sector from logical sector 0.
    pub fn mount(image: &DiskImage) -> Result<Self, FsError> {
        let boot = read_sector_linear(image, &dummy_bpb(image), 0)?;
        let bpb = BiosParameterBlock::parse(&boot)?;
        let fat = read_fat(image, &bpb)?;
        let root_raw = read_root_dir(image, &bpb)?;
        let root = parse_dir_entries(&root_raw);
        Ok(Self {
            image: image.clone(),
            bpb,
            fat,
            root,
        })
    }

    fn cluster_chain(&self, start: u16) -> Vec<u16> {
        let mut chain = Vec::new();
        let mut cluster = start;
        while cluster >= 2 && cluster < END_OF_CHAIN && chain.len() < 4096 {
            chain.push(cluster);
            cluster = get_fat_entry(&self.fat, cluster as u32);
        }
        chain
    }

    fn free_clusters(&self, count: usize) -> Result<Vec<u16>, FsError> {
        let total_clusters = (self.bpb.total_sectors as u32 - self.bpb.data_area_lba()) / self.bpb.sectors_per_cluster.max(1) as u32;
        let mut free = Vec::new();
        let mut cluster = 2u32;
        while (free.len() as u32) < count as u32 && cluster < total_clusters + 2 {
            if get_fat_entry(&self.fat, cluster) == FREE_CLUSTER {
                free.push(cluster as u16);
            }
            cluster += 1;
        }
        if free.len() < count {
            return Err(FsError::DiskFull);
        }
        Ok(free)
    }

    fn write_root_dir(&mut self) -> Result<(), FsError> {
        let bytes_per_entry_sector = self.bpb.bytes_per_sector as usize;
        let mut buf = vec![0u8; self.bpb.root_dir_sectors() as usize * bytes_per_entry_sector];
        for entry in &self.root {
            let raw = encode_dir_entry(entry);
            let off = entry.slot * 32;
            if off + 32 <= buf.len() {
                buf[off..off + 32].copy_from_slice(&raw);
            }
        }
        for i in 0..self.bpb.root_dir_sectors() {
            let start = i as usize * bytes_per_entry_sector;
            let end = start + bytes_per_entry_sector;
            write_sector_linear(&mut self.image, &self.bpb, self.bpb.root_dir_lba() + i, &buf[start..end])?;
        }
        Ok(())
    }
}

fn dummy_bpb(image: &DiskImage) -> BiosParameterBlock {
    BiosParameterBlock {
        bytes_per_sector: image.geometry.bytes_per_sector,
        sectors_per_cluster: 1,
        reserved_sectors: 0,
        num_fats: 0,
        root_entries: 0,
        total_sectors: image.geometry.total_sectors() as u16,
        sectors_per_fat: 0,
        sectors_per_track: image.geometry.sectors_per_track as u16,
        heads: image.geometry.heads as u16,
    }
}

fn read_root_dir(image: &DiskImage, bpb: &BiosParameterBlock) -> Result<Vec<u8>, FsError> {
    let mut out = Vec::new();
    for i in 0..bpb.root_dir_sectors() {
        out.extend_from_slice(&read_sector_linear(image, bpb, bpb.root_dir_lba() + i)?);
    }
    Ok(out)
}

impl FileSystem for Fat12FileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        if !(path.is_empty() || path == "/") {
            return Err(FsError::NotFound);
        }
        Ok(self
            .root
            .iter()
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.size as u64,
                attributes: FileAttributes::from_bits_truncate((e.attr as u16) & 0x0F),
                user_number: None,
            })
            .collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let (base, ext) = crate::filesystem::split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let entry = self
            .root
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(&full))
            .ok_or(FsError::NotFound)?;
        let mut out = Vec::with_capacity(entry.size as usize);
        for cluster in self.cluster_chain(entry.first_cluster) {
            let lba = self.bpb.cluster_to_lba(cluster);
            for s in 0..self.bpb.sectors_per_cluster as u32 {
                out.extend_from_slice(&read_sector_linear(&self.image, &self.bpb, lba + s)?);
            }
        }
        out.truncate(entry.size as usize);
        Ok(out)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        let (base, ext) = crate::filesystem::split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        self.delete_file(&full).ok();

        let cluster_bytes = self.bpb.cluster_bytes();
        let clusters_needed = (data.len() + cluster_bytes - 1) / cluster_bytes.max(1);
        let clusters = self.free_clusters(clusters_needed.max(1))?;

        for (i, &cluster) in clusters.iter().enumerate() {
            let start = i * cluster_bytes;
            let end = (start + cluster_bytes).min(data.len());
            let mut chunk = vec![0u8; cluster_bytes];
            if start < data.len() {
                chunk[..end - start].copy_from_slice(&data[start..end]);
            }
            let lba = self.bpb.cluster_to_lba(cluster);
            for s in 0..self.bpb.sectors_per_cluster as u32 {
                let sector_start = s as usize * self.bpb.bytes_per_sector as usize;
                let sector_end = sector_start + self.bpb.bytes_per_sector as usize;
                write_sector_linear(&mut self.image, &self.bpb, lba + s, &chunk[sector_start..sector_end])?;
            }
            let next = if i + 1 < clusters.len() { clusters[i + 1] } else { END_OF_CHAIN };
            set_fat_entry(&mut self.fat, cluster as u32, next);
        }
        write_fat(&mut self.image, &self.bpb, &self.fat)?;

        let slot = self.root.len();
        self.root.push(DirEntry {
            name: full,
            attr: 0x20,
            first_cluster: if data.is_empty() { 0 } else { clusters[0] },
            size: data.len() as u32,
            slot,
        });
        self.write_root_dir()
    }

    fn delete_file(&mut self, name: &str) -> Result<(), FsError> {
        let (base, ext) = crate::filesystem::split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let pos = self
            .root
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(&full))
            .ok_or(FsError::NotFound)?;
        let entry = self.root.remove(pos);
        for cluster in self.cluster_chain(entry.first_cluster) {
            set_fat_entry(&mut self.fat, cluster as u32, FREE_CLUSTER);
        }
        write_fat(&mut self.image, &self.bpb, &self.fat)?;
        self.write_root_dir()
    }

    fn image(&self) -> &crate::DiskImage {
        &self.image
    }

    fn free_space(&self) -> Result<(u64, u64), FsError> {
        let total_clusters = (self.bpb.total_sectors as u32 - self.bpb.data_area_lba()) / self.bpb.sectors_per_cluster.max(1) as u32;
        let mut free = 0u64;
        for cluster in 2..total_clusters + 2 {
            if get_fat_entry(&self.fat, cluster) == FREE_CLUSTER {
                free += 1;
            }
        }
        Ok((free * self.bpb.cluster_bytes() as u64, total_clusters as u64 * self.bpb.cluster_bytes() as u64))
    }

    fn find(&self, name: &str, _user: Option<u8>) -> Result<FileInfo, FsError> {
        let (base, ext) = crate::filesystem::split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        self.root
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(&full))
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.size as u64,
                attributes: FileAttributes::from_bits_truncate((e.attr as u16) & 0x0F),
                user_number: None,
            })
            .ok_or(FsError::NotFound)
    }

    fn rename(&mut self, old: &str, new: &str, _user: Option<u8>) -> Result<(), FsError> {
        let (base, ext) = crate::filesystem::split_83(old);
        let old_full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let (base, ext) = crate::filesystem::split_83(new);
        let new_full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let entry = self.root.iter_mut().find(|e| e.name.eq_ignore_ascii_case(&old_full)).ok_or(FsError::NotFound)?;
        entry.name = new_full;
        self.write_root_dir()
    }

    fn set_attributes(&mut self, name: &str, attributes: FileAttributes) -> Result<(), FsError> {
        let (base, ext) = crate::filesystem::split_83(name);
        let full = if ext.is_empty() { base } else { format!("{base}.{ext}") };
        let entry = self.root.iter_mut().find(|e| e.name.eq_ignore_ascii_case(&full)).ok_or(FsError::NotFound)?;
        entry.attr = (entry.attr & !0x0F) | (attributes.bits() as u8 & 0x0F);
        self.write_root_dir()
    }

    fn format(&mut self) -> Result<(), FsError> {
        self.root.clear();
        self.fat.iter_mut().for_each(|b| *b = 0);
        set_fat_entry(&mut self.fat, 0, 0xFF0);
        set_fat_entry(&mut self.fat, 1, END_OF_CHAIN);
        write_fat(&mut self.image, &self.bpb, &self.fat)?;
        self.write_root_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fat_entry_packing_even_and_odd() {
        let mut fat = vec![0u8; 6];
        set_fat_entry(&mut fat, 0, 0xABC);
        set_fat_entry(&mut fat, 1, 0x123);
        assert_eq!(get_fat_entry(&fat, 0), 0xABC);
        assert_eq!(get_fat_entry(&fat, 1), 0x123);
    }

    #[test]
    fn test_bpb_parse_rejects_zero_sector_size() {
        let mut boot = vec![0u8; 40];
        boot[13] = 1;
        assert!(BiosParameterBlock::parse(&boot).is_err());
    }
}
