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
//! Apple ProDOS filesystem access.
//!
//! ProDOS addresses storage in 512-byte blocks (two DOS-style 256-byte sectors). Block 2
//! holds the volume directory header followed by up to twelve entries per block, chained
//! via `prev`/`next` block-number pointers. Each file entry names a `storage_type`: `0x1`
//! (seedling, data fits in one block), `0x2` (sapling, one index block of up to 256 data
//! block pointers), or `0x3` (tree, an index-of-indexes); this module implements seedling
//! and sapling files, which cover everything up to 128 KiB.

use crate::chs::Chs;
use crate::filesystem::{FileAttributes, FileInfo, FileSystem};
use crate::{DiskImage, FsError};

const BLOCK_SIZE: usize = 512;
const VOLUME_DIR_BLOCK: u32 = 2;

#[derive(Clone, Debug)]
struct CatalogEntry {
    storage_type: u8,
    name: String,
    key_block: u16,
    blocks_used: u16,
    eof: u32,
}

/// A mounted ProDOS volume (read-only: ProDOS's block bitmap and sparse tree-file layout
/// make safe write support substantially more involved than the sector-linked formats this
/// crate otherwise supports; see spec Non-goals).
#[derive(Clone)]
pub struct ProdosFileSystem {
    image: DiskImage,
    volume_name: String,
    entries: Vec<CatalogEntry>,
}

fn block_to_chs(image: &DiskImage, block: u32) -> (Chs, usize) {
    let sectors_per_block = BLOCK_SIZE / image.geometry.bytes_per_sector as usize;
    let first_sector = block as usize * sectors_per_block;
    let spt = image.geometry.sectors_per_track as usize;
    let c = (first_sector / spt) as u16;
    let s = (first_sector % spt) as u8 + image.geometry.first_sector_id;
    (Chs::new(c, 0, s), sectors_per_block)
}

fn read_block(image: &DiskImage, block: u32) -> Result<Vec<u8>, FsError> {
    let (chs, sectors_per_block) = block_to_chs(image, block);
    let mut out = Vec::with_capacity(BLOCK_SIZE);
    let spt = image.geometry.sectors_per_track as u8;
    for i in 0..sectors_per_block as u8 {
        let mut sector = chs;
        sector.s += i;
        if sector.s - image.geometry.first_sector_id >= spt {
            sector.s -= spt;
            sector.c += 1;
        }
        out.extend_from_slice(&image.read_sector_data(sector, image.geometry.bytes_per_sector as usize).map_err(FsError::Image)?);
    }
    Ok(out)
}

fn parse_name(raw: u8, name_bytes: &[u8]) -> String {
    let len = (raw & 0x0F) as usize;
    String::from_utf8_lossy(&name_bytes[..len.min(name_bytes.len())]).to_string()
}

impl ProdosFileSystem {
    pub fn mount(image: &DiskImage) -> Result<Self, FsError> {
        let header_block = read_block(image, VOLUME_DIR_BLOCK)?;
        let name_flags = header_block[0x04];
        let volume_name = parse_name(name_flags, &header_block[0x05..0x05 + 15]);

        let mut entries = Vec::new();
        let mut block = VOLUME_DIR_BLOCK;
        let mut guard = 0;
        let mut first_block = true;

        while block != 0 && guard < 64 {
            let data = read_block(image, block)?;
            let entry_start = if first_block { 0x2C } else { 0x04 };
            let mut off = entry_start;
            while off + 0x27 <= BLOCK_SIZE {
                let storage_and_len = data[off];
                let storage_type = storage_and_len >> 4;
                if storage_type != 0 {
                    let name = parse_name(storage_and_len, &data[off + 1..off + 1 + 15]);
                    let key_block = u16::from_le_bytes([data[off + 0x11], data[off + 0x12]]);
                    let blocks_used = u16::from_le_bytes([data[off + 0x13], data[off + 0x14]]);
                    let eof = u32::from_le_bytes([data[off + 0x15], data[off + 0x16], data[off + 0x17], 0]);
                    entries.push(CatalogEntry { storage_type, name, key_block, blocks_used, eof });
                }
                off += 0x27;
            }
            block = u16::from_le_bytes([data[2], data[3]]) as u32;
            first_block = false;
            guard += 1;
        }

        Ok(Self { image: image.clone(), volume_name, entries })
    }
}

impl FileSystem for ProdosFileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        if !(path.is_empty() || path == "/") {
            return Err(FsError::NotFound);
        }
        Ok(self
            .entries
            .iter()
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.eof as u64,
                attributes: FileAttributes::empty(),
                user_number: None,
            })
            .collect())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let entry = self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name)).ok_or(FsError::NotFound)?;
        let mut out = Vec::new();
        match entry.storage_type {
            1 => out.extend_from_slice(&read_block(&self.image, entry.key_block as u32)?),
            2 => {
                let index = read_block(&self.image, entry.key_block as u32)?;
                for i in 0..256 {
                    let lo = index[i];
                    let hi = index[256 + i];
                    let data_block = lo as u32 | (hi as u32) << 8;
                    if data_block == 0 {
                        break;
                    }
                    out.extend_from_slice(&read_block(&self.image, data_block)?);
                }
            }
            other => return Err(FsError::Unsupported(format!("storage type {other} is not supported"))),
        }
        out.truncate(entry.eof as usize);
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
        let used: u64 = self.entries.iter().map(|e| e.blocks_used as u64).sum();
        let total = self.image.geometry.total_sectors() as u64 * self.image.geometry.bytes_per_sector as u64 / BLOCK_SIZE as u64;
        Ok((total.saturating_sub(used) * BLOCK_SIZE as u64, total * BLOCK_SIZE as u64))
    }

    fn volume_label(&self) -> Option<String> {
        Some(self.volume_name.clone())
    }

    fn find(&self, name: &str, _user: Option<u8>) -> Result<FileInfo, FsError> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| FileInfo {
                name: e.name.clone(),
                size_bytes: e.eof as u64,
                attributes: FileAttributes::empty(),
                user_number: None,
            })
            .ok_or(FsError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::Encoding;
    use crate::types::geometry::Geometry;
    use crate::types::sector::{Sector, SectorId};
    use crate::DiskImageFormat;

    fn blank_prodos_image() -> DiskImage {
        let geometry = Geometry::new(80, 2, 8, 512, 0, Encoding::Mfm).unwrap();
        let mut image = DiskImage::new(DiskImageFormat::Po, geometry);
        for c in 0..80u16 {
            for h in 0..2u8 {
                for s in 0..8u8 {
                    image.put_sector(Chs::new(c, h, s), Sector::new(SectorId::new(c, h, s, 2), vec![0u8; 512])).unwrap();
                }
            }
        }
        let mut header = vec![0u8; 512];
        header[0x04] = 0x10 | 4;
        header[0x05..0x09].copy_from_slice(b"TEST");
        image.put_sector(Chs::new(0, 0, 2), Sector::new(SectorId::new(0, 0, 2, 2), header)).unwrap();
        image
    }

    #[test]
    fn test_empty_volume_has_no_entries() {
        let image = blank_prodos_image();
        let fs = ProdosFileSystem::mount(&image).unwrap();
        assert!(fs.list_dir("/").unwrap().is_empty());
        assert_eq!(fs.volume_label().as_deref(), Some("TEST"));
    }
}
