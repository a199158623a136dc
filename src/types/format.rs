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
//! The closed enumeration of on-disk formats `uft` can identify, read or write.
//!
//! Covers the full cross-platform format list this crate supports: Commodore, Apple,
//! Atari, BBC, PC, Amstrad, NEC, Sharp, TRS-80, CP/M hosts, and the flux-capture
//! containers.

use std::fmt::{self, Display, Formatter};

/// A concrete on-disk floppy image format, or the `Auto` sentinel for "unidentified".
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiskImageFormat {
    // --- Commodore ---
    D64,
    D71,
    D81,
    G64,
    // --- Amiga ---
    Adf,
    Adz,
    // --- Apple II / Macintosh ---
    Do,
    Po,
    Nib,
    Woz,
    TwoMg,
    // --- Atari 8-bit ---
    Atr,
    Xfd,
    // --- Atari ST ---
    St,
    Msa,
    Stx,
    // --- PC / DOS and generic sector containers ---
    Img,
    Ima,
    Dsk,
    DskCpc,
    Edsk,
    Imd,
    TeleDisk,
    Fdi,
    // --- BBC Micro ---
    Ssd,
    Dsd,
    // --- TRS-80 / CP/M-ish ---
    Dmk,
    Jv1,
    Jv3,
    Trd,
    Scl,
    // --- Sharp / NEC ---
    D88,
    // --- Flux-capture containers ---
    Hfe,
    Scp,
    Ipf,
    A2r,
    Mfm,
    KfStream,
    // --- PCE family ---
    Psi,
    Pri,
    Pfi,
    // --- Sentinel ---
    Auto,
}

impl DiskImageFormat {
    /// Case-insensitive filename extensions commonly used for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        use DiskImageFormat::*;
        match self {
            D64 => &["d64"],
            D71 => &["d71"],
            D81 => &["d81"],
            G64 => &["g64"],
            Adf => &["adf"],
            Adz => &["adz"],
            Do => &["do", "dsk"],
            Po => &["po", "dsk"],
            Nib => &["nib"],
            Woz => &["woz"],
            TwoMg => &["2mg", "2img"],
            Atr => &["atr"],
            Xfd => &["xfd"],
            St => &["st"],
            Msa => &["msa"],
            Stx => &["stx"],
            Img => &["img", "ima"],
            Ima => &["ima"],
            Dsk => &["dsk"],
            DskCpc => &["dsk"],
            Edsk => &["dsk"],
            Imd => &["imd"],
            TeleDisk => &["td0"],
            Fdi => &["fdi"],
            Ssd => &["ssd"],
            Dsd => &["dsd"],
            Dmk => &["dmk"],
            Jv1 => &["jv1", "dsk"],
            Jv3 => &["jv3", "dsk"],
            Trd => &["trd"],
            Scl => &["scl"],
            D88 => &["d88"],
            Hfe => &["hfe"],
            Scp => &["scp"],
            Ipf => &["ipf"],
            A2r => &["a2r"],
            Mfm => &["mfm"],
            KfStream => &["raw"],
            Psi => &["psi"],
            Pri => &["pri"],
            Pfi => &["pfi"],
            Auto => &[],
        }
    }

    /// Whether this format stores raw flux transitions rather than (or in addition to)
    /// decoded bits/sectors.
    pub fn is_flux_capture(&self) -> bool {
        matches!(
            self,
            DiskImageFormat::Scp
                | DiskImageFormat::Ipf
                | DiskImageFormat::A2r
                | DiskImageFormat::KfStream
                | DiskImageFormat::Pfi
                | DiskImageFormat::Woz
        )
    }

    /// Human-readable display name.
    pub fn name(&self) -> &'static str {
        use DiskImageFormat::*;
        match self {
            D64 => "Commodore D64",
            D71 => "Commodore D71",
            D81 => "Commodore D81",
            G64 => "Commodore GCR G64",
            Adf => "Amiga ADF",
            Adz => "Amiga ADF (gzipped)",
            Do => "Apple DOS 3.3 Order",
            Po => "Apple ProDOS Order",
            Nib => "Apple II NIB",
            Woz => "Apple WOZ",
            TwoMg => "Apple 2IMG",
            Atr => "Atari 8-bit ATR",
            Xfd => "Atari 8-bit XFD",
            St => "Atari ST",
            Msa => "Atari ST Magic Shadow Archiver",
            Stx => "Atari ST Pasti (STX)",
            Img => "Raw PC Sector Image",
            Ima => "Raw PC Sector Image (IMA)",
            Dsk => "Raw Sector Image (DSK)",
            DskCpc => "Amstrad CPC DSK",
            Edsk => "Extended Amstrad DSK",
            Imd => "ImageDisk",
            TeleDisk => "TeleDisk",
            Fdi => "FDI",
            Ssd => "BBC Micro Single-sided DFS",
            Dsd => "BBC Micro Double-sided DFS",
            Dmk => "TRS-80 DMK",
            Jv1 => "TRS-80 JV1",
            Jv3 => "TRS-80 JV3",
            Trd => "ZX Spectrum TR-DOS",
            Scl => "ZX Spectrum SCL",
            D88 => "NEC/Sharp D88",
            Hfe => "HxC HFE",
            Scp => "SuperCard Pro",
            Ipf => "SPS IPF",
            A2r => "Applesauce A2R",
            Mfm => "HxC MFM bitstream",
            KfStream => "KryoFlux raw stream set",
            Psi => "PCE sector image (PSI)",
            Pri => "PCE raw bitstream image (PRI)",
            Pfi => "PCE flux image (PFI)",
            Auto => "Unidentified",
        }
    }
}

impl Display for DiskImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Look up formats by case-insensitive extension. Extensions are ambiguous (`.dsk` alone
/// maps to four formats here), so this returns every candidate and leaves disambiguation
/// (by content probe, or by asking the user) to the caller.
pub fn formats_from_ext(ext: &str) -> Vec<DiskImageFormat> {
    use strum::IntoEnumIterator;
    let ext_lower = ext.to_ascii_lowercase();
    DiskImageFormat::iter()
        .filter(|fmt| fmt.extensions().iter().any(|e| *e == ext_lower))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_lookup_case_insensitive() {
        assert!(formats_from_ext("D64").contains(&DiskImageFormat::D64));
        assert!(formats_from_ext("adf").contains(&DiskImageFormat::Adf));
    }

    #[test]
    fn test_flux_capture_classification() {
        assert!(DiskImageFormat::Scp.is_flux_capture());
        assert!(!DiskImageFormat::D64.is_flux_capture());
    }
}
