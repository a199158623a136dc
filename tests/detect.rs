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
//! Exercises format detection and extension-based disambiguation the way a `detect` or
//! `convert` CLI invocation would, without a concrete on-disk fixture file.

use uft::types::format::formats_from_ext;
use uft::{detect_format, DiskImageFormat};

#[test]
fn bare_dsk_extension_is_ambiguous() {
    let formats = formats_from_ext("dsk");
    assert!(formats.contains(&DiskImageFormat::Do));
    assert!(formats.contains(&DiskImageFormat::Po));
    assert!(formats.contains(&DiskImageFormat::DskCpc));
    assert!(formats.contains(&DiskImageFormat::Edsk));
    assert!(formats.len() > 1, "a bare .dsk extension should not resolve to a single format");
}

#[test]
fn d64_extension_is_unambiguous() {
    let formats = formats_from_ext("D64");
    assert_eq!(formats, vec![DiskImageFormat::D64]);
}

#[test]
fn size_and_filename_hint_agree_on_d64() {
    let bytes = vec![0u8; 174_848];
    let result = detect_format(&bytes, Some("transylvania.d64"));
    let best = result.best_candidate().unwrap();
    assert_eq!(best.format, DiskImageFormat::D64);
    assert!(best.confidence > 0.70, "matching size and extension should push confidence up");
}

#[test]
fn hfe_container_is_recognized_by_magic_bytes_alone() {
    let mut bytes = b"HXCPICFE".to_vec();
    bytes.resize(512, 0);
    let result = detect_format(&bytes, None);
    assert_eq!(result.best_candidate().unwrap().format, DiskImageFormat::Hfe);
    assert!(result.warnings.is_empty());
}

#[test]
fn unrecognizable_blob_falls_back_to_auto_with_a_warning() {
    let bytes = vec![0x42u8; 10];
    let result = detect_format(&bytes, None);
    assert!(result.best.is_none());
    assert_eq!(result.candidates[0].format, DiskImageFormat::Auto);
    assert!(!result.warnings.is_empty());
}
