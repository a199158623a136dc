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
//! Format-detection engine.
//!
//! Given `(bytes, filename_hint?, platform_hint?)`, returns a ranked list of format
//! candidates with confidences in `[0, 1]`. The engine performs no I/O; it consumes a
//! byte slice and leaves opening the file to the caller.

use crate::types::format::DiskImageFormat;
use std::path::Path;

/// A single candidate format produced by the detection engine.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub format: DiskImageFormat,
    pub variant: u16,
    pub confidence: f32,
    pub reason: String,
}

impl Candidate {
    fn new(format: DiskImageFormat, confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            format,
            variant: 0,
            confidence: confidence.min(1.0),
            reason: reason.into(),
        }
    }

    /// Saturating-add to this candidate's confidence; all confidence arithmetic saturates
    /// at 1.0.
    fn boost(&mut self, amount: f32, reason: &str) {
        self.confidence = (self.confidence + amount).min(1.0);
        self.reason.push_str("; ");
        self.reason.push_str(reason);
    }
}

/// The full ranked result of running the detection pipeline.
#[derive(Clone, Debug, Default)]
pub struct DetectionResult {
    pub candidates: Vec<Candidate>,
    /// Index into `candidates` of the best match, if any were produced.
    pub best: Option<usize>,
    pub warnings: Vec<String>,
}

impl DetectionResult {
    pub fn best_candidate(&self) -> Option<&Candidate> {
        self.best.map(|i| &self.candidates[i])
    }
}

/// One entry in the magic-byte table (phase 1).
struct MagicEntry {
    offset: usize,
    bytes: &'static [u8],
    format: DiskImageFormat,
    confidence: f32,
}

const MAGIC_TABLE: &[MagicEntry] = &[
    MagicEntry { offset: 0, bytes: b"SCP", format: DiskImageFormat::Scp, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"WOZ1", format: DiskImageFormat::Woz, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"WOZ2", format: DiskImageFormat::Woz, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"CAPS", format: DiskImageFormat::Ipf, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"IMD ", format: DiskImageFormat::Imd, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"EXTENDED", format: DiskImageFormat::Edsk, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"MV - CPC", format: DiskImageFormat::DskCpc, confidence: 0.90 },
    MagicEntry { offset: 0, bytes: b"HXCPICFE", format: DiskImageFormat::Hfe, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"GCR-1541", format: DiskImageFormat::G64, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"2IMG", format: DiskImageFormat::TwoMg, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: &[0x96, 0x02], format: DiskImageFormat::Atr, confidence: 0.85 },
    MagicEntry { offset: 0, bytes: b"AT8X", format: DiskImageFormat::Stx, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"A2R2", format: DiskImageFormat::A2r, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"A2R3", format: DiskImageFormat::A2r, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: &[0x0E, 0x0F], format: DiskImageFormat::Msa, confidence: 0.85 },
    MagicEntry { offset: 0, bytes: b"TD", format: DiskImageFormat::TeleDisk, confidence: 0.85 },
    MagicEntry { offset: 0, bytes: b"td", format: DiskImageFormat::TeleDisk, confidence: 0.85 },
    MagicEntry { offset: 0, bytes: b"Formatted", format: DiskImageFormat::Fdi, confidence: 0.90 },
    MagicEntry { offset: 0, bytes: b"MNIB-1541-RAW", format: DiskImageFormat::Nib, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"PSI\x1A", format: DiskImageFormat::Psi, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"PRI\x1A", format: DiskImageFormat::Pri, confidence: 0.95 },
    MagicEntry { offset: 0, bytes: b"PFI\x1A", format: DiskImageFormat::Pfi, confidence: 0.95 },
];

/// Exact-match byte-length fingerprints (phase 3).
struct SizeEntry {
    bytes: usize,
    format: DiskImageFormat,
    /// Whether this size uniquely identifies `format` (true) or is shared with other
    /// formats (false). The two cases get different confidence boosts below.
    unique: bool,
}

const SIZE_TABLE: &[SizeEntry] = &[
    SizeEntry { bytes: 174_848, format: DiskImageFormat::D64, unique: true },
    SizeEntry { bytes: 175_531, format: DiskImageFormat::D64, unique: true },
    SizeEntry { bytes: 196_608, format: DiskImageFormat::D71, unique: true },
    SizeEntry { bytes: 349_696, format: DiskImageFormat::D71, unique: true },
    SizeEntry { bytes: 819_200, format: DiskImageFormat::D81, unique: true },
    SizeEntry { bytes: 901_120, format: DiskImageFormat::Adf, unique: true },
    SizeEntry { bytes: 1_474_560, format: DiskImageFormat::Img, unique: false },
    SizeEntry { bytes: 737_280, format: DiskImageFormat::Img, unique: false },
    SizeEntry { bytes: 737_280, format: DiskImageFormat::St, unique: false },
    SizeEntry { bytes: 368_640, format: DiskImageFormat::Img, unique: false },
    SizeEntry { bytes: 368_640, format: DiskImageFormat::St, unique: false },
    SizeEntry { bytes: 163_840, format: DiskImageFormat::Do, unique: false },
    SizeEntry { bytes: 163_840, format: DiskImageFormat::Po, unique: false },
    SizeEntry { bytes: 92_160, format: DiskImageFormat::Atr, unique: false },
    SizeEntry { bytes: 92_160, format: DiskImageFormat::Xfd, unique: false },
    SizeEntry { bytes: 409_600, format: DiskImageFormat::Ssd, unique: true },
    SizeEntry { bytes: 819_200, format: DiskImageFormat::Dsd, unique: false },
    SizeEntry { bytes: 655_360, format: DiskImageFormat::Trd, unique: true },
    SizeEntry { bytes: 1_261_568, format: DiskImageFormat::D88, unique: true },
];

/// Phase 5: filename extension lookup.
fn extension_hint(filename: &str) -> Vec<DiskImageFormat> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    super::types::format::formats_from_ext(ext)
}

fn find_or_insert<'a>(candidates: &'a mut Vec<Candidate>, format: DiskImageFormat) -> &'a mut Candidate {
    if let Some(pos) = candidates.iter().position(|c| c.format == format) {
        &mut candidates[pos]
    }
    else {
        candidates.push(Candidate::new(format, 0.0, "no match yet"));
        candidates.last_mut().unwrap()
    }
}

/// Run the full seven-phase detection pipeline over `bytes`.
pub fn detect_format(bytes: &[u8], filename_hint: Option<&str>) -> DetectionResult {
    let mut candidates: Vec<Candidate> = Vec::new();

    // Phase 1: magic-byte scan.
    for entry in MAGIC_TABLE {
        if bytes.len() >= entry.offset + entry.bytes.len()
            && &bytes[entry.offset..entry.offset + entry.bytes.len()] == entry.bytes
        {
            let c = find_or_insert(&mut candidates, entry.format);
            if c.confidence == 0.0 {
                *c = Candidate::new(entry.format, entry.confidence, "magic byte match");
            }
            else {
                c.boost(entry.confidence, "magic byte match");
            }
        }
    }

    // Phase 2: header structure validation (lightweight, format-specific sanity checks).
    validate_header_structure(bytes, &mut candidates);

    // Phase 3: size fingerprinting.
    for entry in SIZE_TABLE {
        if bytes.len() == entry.bytes {
            let already_present = candidates.iter().any(|c| c.format == entry.format && c.confidence > 0.0);
            let boost = if entry.unique { 0.70 } else { 0.40 };
            let c = find_or_insert(&mut candidates, entry.format);
            if c.confidence == 0.0 {
                *c = Candidate::new(entry.format, boost, "size fingerprint match");
            }
            else {
                c.boost(boost, "size fingerprint match");
            }
            if already_present {
                c.boost(0.15, "magic + size agreement");
            }
        }
    }

    // Phase 4: content heuristics, for raw images only identified by size so far.
    content_heuristics(bytes, &mut candidates);

    // Phase 5: extension hint.
    if let Some(name) = filename_hint {
        for format in extension_hint(name) {
            let c = find_or_insert(&mut candidates, format);
            if c.confidence == 0.0 {
                *c = Candidate::new(format, 0.30, "filename extension hint");
            }
            else {
                c.boost(0.05, "filename extension hint");
            }
        }
    }

    // Phase 6: disambiguation.
    candidates.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap());
    let mut warnings = Vec::new();
    let best = if candidates.is_empty() {
        warnings.push("no candidate formats matched; returning Auto".to_string());
        None
    }
    else {
        if candidates.len() > 1 {
            let gap = candidates[0].confidence - candidates[1].confidence;
            if gap < 0.20 {
                warnings.push(format!(
                    "ambiguous detection: top two candidates {} and {} are within {:.2} confidence",
                    candidates[0].format, candidates[1].format, gap
                ));
            }
        }
        if candidates[0].confidence < 0.50 {
            warnings.push(format!(
                "low confidence detection: best candidate {} at {:.2}",
                candidates[0].format, candidates[0].confidence
            ));
        }
        Some(0)
    };

    // Phase 7: variant detection for the winning format.
    if let Some(idx) = best {
        detect_variant(bytes, &mut candidates[idx]);
    }

    if candidates.is_empty() {
        candidates.push(Candidate::new(DiskImageFormat::Auto, 0.0, "no candidates matched"));
    }

    DetectionResult {
        candidates,
        best,
        warnings,
    }
}

fn validate_header_structure(bytes: &[u8], candidates: &mut [Candidate]) {
    for c in candidates.iter_mut() {
        if c.format == DiskImageFormat::Edsk && bytes.len() > 256 {
            // EDSK carries a track-size table starting at offset 0x34; a plausible (nonzero)
            // entry nudges confidence slightly without fully parsing every track.
            if bytes.len() > 0x100 && bytes[0x34] != 0 {
                c.boost(0.02, "EDSK track-size table looks populated");
            }
        }
    }
}

fn content_heuristics(bytes: &[u8], candidates: &mut Vec<Candidate>) {
    // A C64 BAM lives at track 18 (offset 17*21*256 for a 35-track D64 with no error map).
    const D64_BAM_OFFSET: usize = 17 * 21 * 256;
    if bytes.len() >= D64_BAM_OFFSET + 2 && bytes[D64_BAM_OFFSET] == 18 && bytes[D64_BAM_OFFSET + 1] == 1 {
        let c = find_or_insert(candidates, DiskImageFormat::D64);
        if c.confidence > 0.0 {
            c.boost(0.20, "C64 BAM signature at track 18 sector 0");
        }
    }

    // An Amiga bootblock starts with "DOS" followed by a flags byte in 0..=5.
    if bytes.len() >= 4 && &bytes[0..3] == b"DOS" && bytes[3] <= 5 {
        let c = find_or_insert(candidates, DiskImageFormat::Adf);
        if c.confidence > 0.0 {
            c.boost(0.20, "Amiga DOS bootblock signature");
        }
    }

    // An x86 BPB-style boot sector ends with 0x55 0xAA at offset 510.
    if bytes.len() >= 512 && bytes[510] == 0x55 && bytes[511] == 0xAA {
        for format in [DiskImageFormat::Img, DiskImageFormat::St] {
            let c = find_or_insert(candidates, format);
            if c.confidence > 0.0 {
                c.boost(0.15, "boot sector signature 0x55 0xAA at offset 510");
            }
        }
    }

    // Apple DOS 3.3 VTOC lives at track 17 sector 0 (offset 17*16*256 for a 16-sector track).
    const DOS33_VTOC_OFFSET: usize = 17 * 16 * 256;
    if bytes.len() >= DOS33_VTOC_OFFSET + 3 && bytes[DOS33_VTOC_OFFSET + 1] == 17 && bytes[DOS33_VTOC_OFFSET + 2] == 1
    {
        let c = find_or_insert(candidates, DiskImageFormat::Do);
        if c.confidence > 0.0 {
            c.boost(0.25, "Apple DOS 3.3 VTOC signature at track 17 sector 0");
        }
    }
}

fn detect_variant(bytes: &[u8], candidate: &mut Candidate) {
    match candidate.format {
        DiskImageFormat::D64 => {
            candidate.variant = match bytes.len() {
                174_848 => 35,
                175_531 => 35, // with error map
                196_608 => 40,
                197_376 => 40, // with error map
                206_114 => 42,
                _ => 0,
            };
        }
        DiskImageFormat::Adf => {
            // Byte 3 of the bootblock distinguishes OFS (0) from FFS (1).
            if bytes.len() > 3 {
                candidate.variant = bytes[3] as u16;
            }
        }
        DiskImageFormat::Woz => {
            if bytes.len() >= 4 {
                candidate.variant = if &bytes[0..4] == b"WOZ2" { 2 } else { 1 };
            }
        }
        _ => {}
    }
}

/// Extensions advertised by every format parser, for use in file dialogs. Detection
/// itself never relies on extensions alone.
pub fn supported_extensions() -> Vec<&'static str> {
    use strum::IntoEnumIterator;
    DiskImageFormat::iter().flat_map(|f| f.extensions().iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d64_detection_by_size_only() {
        let bytes = vec![0u8; 174_848];
        let result = detect_format(&bytes, None);
        let best = result.best_candidate().unwrap();
        assert_eq!(best.format, DiskImageFormat::D64);
        assert_eq!(best.variant, 35);
        assert!(best.confidence >= 0.70);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_no_match_returns_auto() {
        let bytes = vec![0u8; 17];
        let result = detect_format(&bytes, None);
        assert_eq!(result.best, None);
        assert_eq!(result.candidates[0].format, DiskImageFormat::Auto);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_magic_byte_detection() {
        let mut bytes = b"HXCPICFE".to_vec();
        bytes.resize(600, 0);
        let result = detect_format(&bytes, None);
        assert_eq!(result.best_candidate().unwrap().format, DiskImageFormat::Hfe);
    }

    #[test]
    fn test_extension_hint_adds_weak_candidate() {
        let bytes = vec![0xFFu8; 37];
        let result = detect_format(&bytes, Some("disk.adf"));
        assert_eq!(result.best_candidate().unwrap().format, DiskImageFormat::Adf);
        assert!(result.best_candidate().unwrap().confidence < 0.50);
    }

    #[test]
    fn test_woz2_magic_and_variant() {
        let mut bytes = b"WOZ2".to_vec();
        bytes.resize(700, 0);
        let result = detect_format(&bytes, None);
        let best = result.best_candidate().unwrap();
        assert_eq!(best.format, DiskImageFormat::Woz);
        assert_eq!(best.variant, 2);
    }
}
