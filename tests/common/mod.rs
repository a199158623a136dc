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
//! Shared fixture builders for the integration tests in this directory.

use uft::chs::Chs;
use uft::cpm::{disk_definition, Dpb};
use uft::types::encoding::Encoding;
use uft::types::geometry::Geometry;
use uft::types::sector::{Sector, SectorId};
use uft::{DiskImage, DiskImageFormat};

/// A blank, freshly-formatted Kaypro II disk: every sector present and zeroed, directory
/// area untouched (all 0xE5, CP/M's "never allocated" byte, via a format() call by the caller).
pub fn blank_kaypro_image() -> (DiskImage, Dpb) {
    let def = disk_definition("kaypro-ii").expect("kaypro-ii is a built-in CP/M disk definition");
    let geometry = Geometry::new(def.cylinders, def.heads, 10, 512, 1, Encoding::Mfm).unwrap();
    let mut image = DiskImage::new(DiskImageFormat::Img, geometry);
    for c in 0..def.cylinders {
        for s in 1..=10u8 {
            image
                .put_sector(Chs::new(c, 0, s), Sector::new(SectorId::new(c, 0, s, 2), vec![0u8; 512]))
                .unwrap();
        }
    }
    (image, def.dpb)
}
