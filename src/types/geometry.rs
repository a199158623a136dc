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
//! Disk geometry.

use crate::types::encoding::Encoding;
use std::fmt::{self, Display, Formatter};

/// The minimum and maximum permitted bytes in a single track (`sectors_per_track *
/// bytes_per_sector`).
pub const MIN_TRACK_BYTES: usize = 128;
pub const MAX_TRACK_BYTES: usize = 16384;

/// Full geometry of a disk image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub cylinders: u16,
    pub heads: u8,
    pub sectors_per_track: u8,
    pub bytes_per_sector: u16,
    pub first_sector_id: u8,
    pub encoding: Encoding,
}

impl Geometry {
    pub fn new(
        cylinders: u16,
        heads: u8,
        sectors_per_track: u8,
        bytes_per_sector: u16,
        first_sector_id: u8,
        encoding: Encoding,
    ) -> Result<Self, String> {
        let track_bytes = sectors_per_track as usize * bytes_per_sector as usize;
        if !(MIN_TRACK_BYTES..=MAX_TRACK_BYTES).contains(&track_bytes) {
            return Err(format!(
                "track size {} bytes is outside the permitted {}..={} range",
                track_bytes, MIN_TRACK_BYTES, MAX_TRACK_BYTES
            ));
        }
        Ok(Self {
            cylinders,
            heads,
            sectors_per_track,
            bytes_per_sector,
            first_sector_id,
            encoding,
        })
    }

    /// Total sectors across the whole disk.
    pub fn total_sectors(&self) -> usize {
        self.cylinders as usize * self.heads as usize * self.sectors_per_track as usize
    }

    /// Total data bytes across the whole disk (sector payload only, no gaps/marks).
    pub fn total_bytes(&self) -> usize {
        self.total_sectors() * self.bytes_per_sector as usize
    }

    /// Number of `(cylinder, head)` tracks.
    pub fn track_count(&self) -> usize {
        self.cylinders as usize * self.heads as usize
    }

    /// Flatten `(cylinder, head)` into the index used by `DiskImage::tracks`.
    pub fn track_index(&self, cylinder: u16, head: u8) -> usize {
        cylinder as usize * self.heads as usize + head as usize
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}C/{}H/{}S ({} bytes/sector, {})",
            self.cylinders, self.heads, self.sectors_per_track, self.bytes_per_sector, self.encoding
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_rejects_oversized_track() {
        assert!(Geometry::new(80, 2, 64, 1024, 1, Encoding::Mfm).is_err());
    }

    #[test]
    fn test_geometry_total_bytes() {
        let g = Geometry::new(40, 2, 16, 256, 0, Encoding::Mfm).unwrap();
        assert_eq!(g.total_bytes(), 40 * 2 * 16 * 256);
    }
}
