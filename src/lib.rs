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
//! # uft
//!
//! `uft` is a Rust library for reading, writing, converting, and preserving vintage
//! floppy disk images across dozens of historical computer platforms: Commodore, Amiga,
//! Apple II, Atari ST/8-bit, PC/DOS, Spectrum, Amstrad, BBC, NEC PC-98, Sharp X68000,
//! TRS-80, CP/M machines, and more.
//!
//! It handles both logical sector images (D64, ADF, ATR, IMG, ST, ...) and raw flux
//! captures (SCP, HFE, A2R, WOZ, IPF, KryoFlux, MFM) produced by hardware samplers.
//!
//! The library is organized bottom-up:
//!
//! ```text
//! HAL ─────────────┐
//!                  ▼
//! flux codec ─► disk image model ◄─ sector-image format plugins
//!                  ▲                           ▲
//!                  │                           │
//!                  └─── detection engine ──────┘
//!                               │
//!                               ▼
//!                         filesystem modules
//! ```
//!
//! The main entry point for working with a disk image is [`DiskImage`]. An unknown
//! byte blob is classified by [`detect::detect_format`], and typed filesystem access
//! is obtained via the [`filesystem::FileSystem`] trait.

pub mod bitstream;
pub mod chs;
pub mod cpm;
pub mod detect;
pub mod diskimage;
pub mod file_parsers;
pub mod filesystem;
pub mod flux;
#[cfg(feature = "hal")]
pub mod hal;
pub mod types;
pub mod util;

mod error;

pub use crate::chs::{Chs, ChsGeometry};
pub use crate::detect::{detect_format, Candidate, DetectionResult};
pub use crate::diskimage::DiskImage;
pub use crate::error::{DiskImageError, FsError, HalError};
pub use crate::types::format::DiskImageFormat;
pub use crate::types::geometry::Geometry;
pub use crate::types::sector::{Sector, SectorId, SectorStatus};
pub use crate::types::track::{FluxTrack, Track};

/// The largest sector payload `uft` will allocate for a single sector (8x the largest
/// `size_code` value of 1024 bytes, matching copy-protected disks with oversized sectors).
pub const MAXIMUM_SECTOR_SIZE: usize = 8192;
/// The default sector size assumed when a format does not otherwise specify one.
pub const DEFAULT_SECTOR_SIZE: usize = 512;
/// The fill byte CP/M (and several other DOSes) use to pad a file out to its next
/// allocation quantum.
pub const ASCII_EOF: u8 = 0x1A;
