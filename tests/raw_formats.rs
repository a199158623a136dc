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
//! Round trips a handful of sector-image formats through the public `load_by_format` /
//! `save_by_format` dispatch, the way a CLI `convert` invocation exercises them.

use uft::file_parsers::{load_by_format, save_by_format};
use uft::DiskImageFormat;

#[test]
fn d64_image_round_trips_byte_for_byte() {
    let data = vec![0x5Au8; 174_848];
    let image = load_by_format(DiskImageFormat::D64, &data).unwrap();
    assert_eq!(image.geometry.cylinders, 35);
    assert_eq!(image.geometry.sectors_per_track, 17);

    let saved = save_by_format(DiskImageFormat::D64, &image).unwrap();
    assert_eq!(saved, data);
}

#[test]
fn img_1_44mb_round_trips_byte_for_byte() {
    let mut data = vec![0u8; 1_474_560];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = (i % 256) as u8;
    }
    let image = load_by_format(DiskImageFormat::Img, &data).unwrap();
    assert_eq!(image.geometry.cylinders, 80);
    assert_eq!(image.geometry.heads, 2);
    assert_eq!(image.geometry.sectors_per_track, 18);

    let saved = save_by_format(DiskImageFormat::Img, &image).unwrap();
    assert_eq!(saved, data);
}

#[test]
fn atr_image_round_trips_and_reports_consistency() {
    let data = vec![0u8; 92_160];
    let mut image = load_by_format(DiskImageFormat::Atr, &data).unwrap();
    image.refresh_consistency();
    assert_eq!(image.consistency.consistent_sector_size, Some(128));
    assert!(!image.consistency.weak_bits_present);

    let summary = image.summarize();
    assert_eq!(summary.sectors_bad, 0);
    assert_eq!(summary.missing, 0);
}

#[test]
fn truncated_raw_image_is_rejected() {
    let data = vec![0u8; 174_800];
    assert!(load_by_format(DiskImageFormat::D64, &data).is_err());
}
