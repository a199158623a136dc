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
//! Cylinder/Head/Sector addressing.
//!
//! A small `Copy` value type plus a geometry wrapper used to walk every sector of a disk
//! in canonical order.

use std::fmt::{self, Display, Formatter};

/// A single cylinder/head/sector address, without a size code.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Chs {
    pub c: u16,
    pub h: u8,
    pub s: u8,
}

impl Chs {
    pub fn new(c: u16, h: u8, s: u8) -> Self {
        Self { c, h, s }
    }
}

impl From<(u16, u8, u8)> for Chs {
    fn from((c, h, s): (u16, u8, u8)) -> Self {
        Self { c, h, s }
    }
}

impl Display for Chs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[c:{} h:{} s:{}]", self.c, self.h, self.s)
    }
}

/// A full disk geometry: cylinder/head/sector counts, first sector id, and sector size.
///
/// Invariant: `sectors_per_track * bytes_per_sector` lies in `128..=16384`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChsGeometry {
    pub cylinders: u16,
    pub heads: u8,
    pub sectors_per_track: u8,
    pub first_sector_id: u8,
}

impl ChsGeometry {
    pub fn new(cylinders: u16, heads: u8, sectors_per_track: u8, first_sector_id: u8) -> Self {
        Self {
            cylinders,
            heads,
            sectors_per_track,
            first_sector_id,
        }
    }

    /// Total number of sectors across the whole disk.
    pub fn total_sectors(&self) -> usize {
        self.cylinders as usize * self.heads as usize * self.sectors_per_track as usize
    }

    /// Index of `(c, h)` into a flat, cylinder-major track vector.
    pub fn track_index(&self, c: u16, h: u8) -> usize {
        c as usize * self.heads as usize + h as usize
    }

    /// Iterate every `Chs` address in canonical (cylinder, head, sector) order.
    pub fn iter_chs(&self) -> impl Iterator<Item = Chs> + '_ {
        let first = self.first_sector_id;
        (0..self.cylinders).flat_map(move |c| {
            (0..self.heads).flat_map(move |h| (0..self.sectors_per_track).map(move |i| Chs::new(c, h, first + i)))
        })
    }

    /// Advance `chs` to the next sector in canonical order, wrapping head and cylinder.
    pub fn seek_forward(&self, chs: Chs, by: u8) -> Chs {
        let last_sector = self.first_sector_id + self.sectors_per_track - 1;
        let mut s = chs.s;
        let mut h = chs.h;
        let mut c = chs.c;
        for _ in 0..by {
            if s >= last_sector {
                s = self.first_sector_id;
                if h + 1 >= self.heads {
                    h = 0;
                    c += 1;
                }
                else {
                    h += 1;
                }
            }
            else {
                s += 1;
            }
        }
        Chs::new(c, h, s)
    }
}

impl Display for ChsGeometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cyls, {} heads, {} sectors/track, first sector {}",
            self.cylinders, self.heads, self.sectors_per_track, self.first_sector_id
        )
    }
}

/// Convert between a `size_code` (0..=3, as stored on-disk in an IDAM) and its byte length.
pub fn size_code_to_bytes(n: u8) -> usize {
    128usize << n
}

/// Inverse of [`size_code_to_bytes`]; returns `None` if `bytes` is not a power-of-two
/// multiple of 128 in `0..=3`.
pub fn bytes_to_size_code(bytes: usize) -> Option<u8> {
    match bytes {
        128 => Some(0),
        256 => Some(1),
        512 => Some(2),
        1024 => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_forward_wraps_head_and_cylinder() {
        let geom = ChsGeometry::new(40, 2, 9, 1);
        let last = Chs::new(0, 0, 9);
        assert_eq!(geom.seek_forward(last, 1), Chs::new(0, 1, 1));
        let last_head = Chs::new(0, 1, 9);
        assert_eq!(geom.seek_forward(last_head, 1), Chs::new(1, 0, 1));
    }

    #[test]
    fn test_size_code_round_trip() {
        for (code, bytes) in [(0u8, 128usize), (1, 256), (2, 512), (3, 1024)] {
            assert_eq!(size_code_to_bytes(code), bytes);
            assert_eq!(bytes_to_size_code(bytes), Some(code));
        }
    }

    #[test]
    fn test_iter_chs_order() {
        let geom = ChsGeometry::new(2, 2, 2, 1);
        let all: Vec<_> = geom.iter_chs().collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], Chs::new(0, 0, 1));
        assert_eq!(all[7], Chs::new(1, 1, 2));
    }
}
