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
//! CP/M disk parameter blocks (DPB) and a database of known machine geometries.

mod definitions;

pub use definitions::{disk_definition, DiskDefinition, ALL_DEFINITIONS};

/// A CP/M Disk Parameter Block: the handful of constants that describe how a given CP/M
/// implementation laid out its directory and data blocks, per the "CP/M 2.2 Interface
/// Guide" DPB fields.
#[derive(Copy, Clone, Debug)]
pub struct Dpb {
    /// Sectors per track (`SPT`).
    pub spt: u16,
    /// Block shift factor: block size is `128 << bsh` bytes (`BSH`).
    pub bsh: u8,
    /// Block mask: `(1 << bsh) - 1` (`BLM`), kept explicit since several implementations
    /// store it directly rather than deriving it.
    pub blm: u8,
    /// Extent mask (`EXM`).
    pub exm: u8,
    /// Total data blocks on the disk, minus one (`DSM`).
    pub dsm: u16,
    /// Number of directory entries, minus one (`DRM`).
    pub drm: u16,
    /// Directory allocation bitmap, high byte (`AL0`).
    pub al0: u8,
    /// Directory allocation bitmap, low byte (`AL1`).
    pub al1: u8,
    /// Checksum vector size, in directory entries (`CKS`); `0` for a fixed (non-removable)
    /// disk that skips change detection.
    pub cks: u16,
    /// Number of reserved (boot) tracks (`OFF`).
    pub off: u16,
    /// Physical sector size in bytes (not always 128; some hosts use 512/1024-byte sectors
    /// with software sector-skewing down to CP/M's notional 128-byte records).
    pub physical_sector_size: u16,
}

impl Dpb {
    /// Block size in bytes (`128 << bsh`).
    pub fn block_size(&self) -> u32 {
        128u32 << self.bsh
    }

    /// Total disk capacity in bytes available to CP/M (blocks only, excludes reserved
    /// tracks and the directory's own blocks are counted within `dsm`).
    pub fn capacity_bytes(&self) -> u64 {
        (self.dsm as u64 + 1) * self.block_size() as u64
    }

    /// Number of directory entries.
    pub fn directory_entries(&self) -> u32 {
        self.drm as u32 + 1
    }

    /// Whether block numbers need 16 bits (`dsm > 255`) rather than 8.
    pub fn needs_16bit_blocks(&self) -> bool {
        self.dsm > 255
    }

    /// Number of directory blocks, derived from the `al0`/`al1` allocation bitmap.
    pub fn directory_blocks(&self) -> u32 {
        (self.al0.count_ones() + self.al1.count_ones()) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kaypro_ii_block_size_and_capacity() {
        let def = disk_definition("kaypro-ii").unwrap();
        assert_eq!(def.dpb.block_size(), 1024);
        assert!(def.dpb.capacity_bytes() > 0);
    }

    #[test]
    fn test_all_definitions_have_consistent_directory_entries() {
        for def in ALL_DEFINITIONS {
            assert!(def.dpb.directory_entries() > 0);
            assert!(def.dpb.directory_blocks() > 0);
        }
    }
}
