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
//! Sector addressing and payload.

use std::fmt::{self, Display, Formatter};

/// The address fields recorded in a sector's ID (address) field.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct SectorId {
    pub cylinder: u16,
    pub head: u8,
    pub sector: u8,
    /// `size_code` in `0..=3`, mapping to `{128, 256, 512, 1024}` bytes.
    pub size_code: u8,
}

impl SectorId {
    pub fn new(cylinder: u16, head: u8, sector: u8, size_code: u8) -> Self {
        Self {
            cylinder,
            head,
            sector,
            size_code,
        }
    }

    /// Byte length implied by `size_code`.
    pub fn size_bytes(&self) -> usize {
        crate::chs::size_code_to_bytes(self.size_code)
    }
}

impl Display for SectorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[c:{} h:{} s:{} n:{}]",
            self.cylinder, self.head, self.sector, self.size_code
        )
    }
}

/// Status of a decoded sector.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SectorStatus {
    #[default]
    Ok,
    CrcErr,
    Missing,
    Weak,
    Deleted,
}

impl Display for SectorStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SectorStatus::Ok => write!(f, "Ok"),
            SectorStatus::CrcErr => write!(f, "CrcErr"),
            SectorStatus::Missing => write!(f, "Missing"),
            SectorStatus::Weak => write!(f, "Weak"),
            SectorStatus::Deleted => write!(f, "Deleted"),
        }
    }
}

/// A single decoded sector: its address, status, and (if recoverable) payload.
///
/// A sector without `data` means the address mark was found but the payload was
/// unrecoverable.
#[derive(Clone, Debug, Default)]
pub struct Sector {
    pub id: SectorId,
    pub status: SectorStatus,
    pub data: Option<Vec<u8>>,
    /// Per-bit mask of positions that read differently across revolutions ("weak bits"),
    /// same length as `data` when present.
    pub weak_mask: Option<Vec<u8>>,
}

impl Sector {
    pub fn new(id: SectorId, data: Vec<u8>) -> Self {
        Self {
            id,
            status: SectorStatus::Ok,
            data: Some(data),
            weak_mask: None,
        }
    }

    pub fn missing(id: SectorId) -> Self {
        Self {
            id,
            status: SectorStatus::Missing,
            data: None,
            weak_mask: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, SectorStatus::Ok)
    }

    /// The canonical "bad sector" fill byte for a given encoding: `0xF6` for MFM/FM,
    /// `0x00` for GCR (unless the target format supports a weak-sector record).
    pub fn bad_fill_byte(encoding: crate::types::encoding::Encoding) -> u8 {
        use crate::types::encoding::Encoding::*;
        match encoding {
            Fm | Mfm => 0xF6,
            Gcr | Raw => 0x00,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_missing_has_no_data() {
        let s = Sector::missing(SectorId::new(0, 0, 1, 2));
        assert!(s.data.is_none());
        assert_eq!(s.status, SectorStatus::Missing);
    }

    #[test]
    fn test_bad_fill_bytes() {
        use crate::types::encoding::Encoding;
        assert_eq!(Sector::bad_fill_byte(Encoding::Mfm), 0xF6);
        assert_eq!(Sector::bad_fill_byte(Encoding::Gcr), 0x00);
    }
}
