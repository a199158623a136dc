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
//! A representative database of named CP/M disk geometries and their DPBs.
//!
//! CP/M never defined a universal disk format — every OEM chose its own sector size,
//! skew, and block/directory layout — so software that reads "a CP/M disk" in practice
//! keeps a table like this one and matches by image size or asks the user. This table
//! covers the most commonly preserved formats; adding another is a matter of computing
//! its [`Dpb`] from the machine's own CP/M BIOS source or technical reference manual.

use crate::cpm::Dpb;

/// One named, complete CP/M disk geometry.
#[derive(Clone, Debug)]
pub struct DiskDefinition {
    pub name: &'static str,
    pub machine: &'static str,
    pub cylinders: u16,
    pub heads: u8,
    pub dpb: Dpb,
}

const fn dpb(
    spt: u16,
    bsh: u8,
    exm: u8,
    dsm: u16,
    drm: u16,
    al0: u8,
    al1: u8,
    cks: u16,
    off: u16,
    physical_sector_size: u16,
) -> Dpb {
    Dpb {
        spt,
        bsh,
        blm: ((1u16 << bsh) - 1) as u8,
        exm,
        dsm,
        drm,
        al0,
        al1,
        cks,
        off,
        physical_sector_size,
    }
}

/// IBM 3740 8", single-sided single-density: the canonical CP/M 2.2 reference disk, whose
/// DPB values are reproduced directly from the CP/M 2.2 Interface Guide.
pub const IBM_3740_SSSD: DiskDefinition = DiskDefinition {
    name: "ibm-3740-sssd",
    machine: "IBM 3740 8\" SSSD (CP/M 2.2 reference disk)",
    cylinders: 77,
    heads: 1,
    dpb: dpb(26, 3, 0, 242, 63, 0xC0, 0x00, 16, 2, 128),
};

pub const KAYPRO_II: DiskDefinition = DiskDefinition {
    name: "kaypro-ii",
    machine: "Kaypro II (5.25\" SSDD, 10x512)",
    cylinders: 40,
    heads: 1,
    dpb: dpb(40, 4, 1, 194, 63, 0x80, 0x00, 16, 1, 512),
};

pub const KAYPRO_4: DiskDefinition = DiskDefinition {
    name: "kaypro-4",
    machine: "Kaypro 4 (5.25\" DSDD, 10x512 per side)",
    cylinders: 40,
    heads: 2,
    dpb: dpb(40, 4, 1, 389, 127, 0xF0, 0x00, 32, 1, 512),
};

pub const OSBORNE_1: DiskDefinition = DiskDefinition {
    name: "osborne-1",
    machine: "Osborne 1 (5.25\" SSSD, 10x256)",
    cylinders: 40,
    heads: 1,
    dpb: dpb(20, 3, 0, 45, 63, 0xF0, 0x00, 16, 3, 256),
};

pub const XEROX_820: DiskDefinition = DiskDefinition {
    name: "xerox-820",
    machine: "Xerox 820 (5.25\" SSSD, 18x128)",
    cylinders: 40,
    heads: 1,
    dpb: dpb(18, 3, 0, 85, 63, 0xC0, 0x00, 16, 2, 128),
};

pub const EPSON_QX10: DiskDefinition = DiskDefinition {
    name: "epson-qx10",
    machine: "Epson QX-10 (5.25\" DSDD, 16x256 per side)",
    cylinders: 40,
    heads: 2,
    dpb: dpb(32, 3, 0, 155, 63, 0xC0, 0x00, 16, 2, 256),
};

pub const TRS80_MODEL4: DiskDefinition = DiskDefinition {
    name: "trs80-model4",
    machine: "TRS-80 Model 4 (5.25\" DSDD, 18x256 per side)",
    cylinders: 40,
    heads: 2,
    dpb: dpb(36, 4, 1, 188, 63, 0x80, 0x00, 16, 1, 256),
};

pub const C128_CPM: DiskDefinition = DiskDefinition {
    name: "c128-cpm",
    machine: "Commodore 128 CP/M (1571, 5.25\" DSDD)",
    cylinders: 35,
    heads: 2,
    dpb: dpb(40, 4, 1, 340, 127, 0xF0, 0x00, 0, 1, 512),
};

pub const MSX_CPM: DiskDefinition = DiskDefinition {
    name: "msx-cpm",
    machine: "MSX CP/M (3.5\" SSDD, 9x512)",
    cylinders: 80,
    heads: 1,
    dpb: dpb(36, 3, 0, 348, 127, 0xC0, 0x00, 0, 1, 512),
};

pub const DEC_RAINBOW: DiskDefinition = DiskDefinition {
    name: "dec-rainbow",
    machine: "DEC Rainbow 100 (5.25\" DSDD, 10x512 per side)",
    cylinders: 80,
    heads: 2,
    dpb: dpb(40, 4, 1, 788, 127, 0xF0, 0x00, 0, 2, 512),
};

pub const AMSTRAD_PCW: DiskDefinition = DiskDefinition {
    name: "amstrad-pcw",
    machine: "Amstrad PCW (3\" SSDD, 9x512)",
    cylinders: 40,
    heads: 1,
    dpb: dpb(36, 3, 0, 173, 63, 0xC0, 0x00, 0, 1, 512),
};

pub const ALL_DEFINITIONS: &[DiskDefinition] = &[
    IBM_3740_SSSD,
    KAYPRO_II,
    KAYPRO_4,
    OSBORNE_1,
    XEROX_820,
    EPSON_QX10,
    TRS80_MODEL4,
    C128_CPM,
    MSX_CPM,
    DEC_RAINBOW,
    AMSTRAD_PCW,
];

/// Look up a named disk definition (case-insensitive).
pub fn disk_definition(name: &str) -> Option<&'static DiskDefinition> {
    let lower = name.to_ascii_lowercase();
    ALL_DEFINITIONS.iter().find(|d| d.name == lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ibm_3740_matches_published_dpb() {
        let def = disk_definition("ibm-3740-sssd").unwrap();
        assert_eq!(def.dpb.spt, 26);
        assert_eq!(def.dpb.block_size(), 1024);
        assert_eq!(def.dpb.directory_entries(), 64);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(disk_definition("KAYPRO-II").is_some());
        assert!(disk_definition("does-not-exist").is_none());
    }
}
