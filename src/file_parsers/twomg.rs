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
//! Apple II 2IMG (2MG) container.
//!
//! A fixed 64-byte little-endian header (`"2IMG"` magic, creator id, header/version
//! lengths, an `img_fmt` tag of 0=DOS-order, 1=ProDOS-order, 2=raw nibble, flags, block
//! count, data offset/length, and optional comment/creator blocks) wrapping a plain DO, PO,
//! or NIB image. This module strips the header and hands the wrapped bytes to the already
//! existing parser for whichever inner format `img_fmt` names.

use crate::file_parsers::raw::RawFormat;
use crate::file_parsers::{nib::NibFormat, FormatCaps, ImageParser, ParserWriteCompatibility};
use crate::{DiskImage, DiskImageError, DiskImageFormat};

const HEADER_LEN: usize = 64;

struct Header {
    img_fmt: u32,
    data_offset: u32,
    data_len: u32,
}

fn parse_header(data: &[u8]) -> Result<Header, DiskImageError> {
    if data.len() < HEADER_LEN || &data[0..4] != b"2IMG" {
        return Err(DiskImageError::Format { offset: 0, reason: "missing 2IMG signature".to_string() });
    }
    let read_u32 = |off: usize| u32::from_le_bytes(data[off..off + 4].try_into().unwrap());
    Ok(Header { img_fmt: read_u32(12), data_offset: read_u32(20), data_len: read_u32(24) })
}

pub struct TwoMgFormat;

impl ImageParser for TwoMgFormat {
    fn capabilities() -> FormatCaps {
        FormatCaps::empty()
    }

    fn extensions() -> &'static [&'static str] {
        &["2mg", "2img"]
    }

    fn probe(data: &[u8]) -> bool {
        data.len() >= 4 && &data[0..4] == b"2IMG"
    }

    fn load(data: &[u8]) -> Result<DiskImage, DiskImageError> {
        let header = parse_header(data)?;
        let start = header.data_offset as usize;
        let end = start + header.data_len as usize;
        let inner = data.get(start..end).ok_or(DiskImageError::Format { offset: start, reason: "2IMG data region extends past end of file".to_string() })?;

        let mut image = match header.img_fmt {
            0 => RawFormat::load_as(DiskImageFormat::Do, inner)?,
            1 => RawFormat::load_as(DiskImageFormat::Po, inner)?,
            2 => NibFormat::load(inner)?,
            other => return Err(DiskImageError::Format { offset: 12, reason: format!("unrecognized 2IMG img_fmt {other}") }),
        };
        image.format = DiskImageFormat::TwoMg;
        Ok(image)
    }

    fn save(_image: &DiskImage) -> Result<Vec<u8>, DiskImageError> {
        Err(DiskImageError::Unsupported("writing 2IMG containers is not yet implemented".to_string()))
    }

    fn can_write(_image: &DiskImage) -> ParserWriteCompatibility {
        ParserWriteCompatibility::UnsupportedFormat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped_do_image() -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data[0..4].copy_from_slice(b"2IMG");
        let inner = vec![0x33u8; 143_360];
        data[12..16].copy_from_slice(&0u32.to_le_bytes()); // img_fmt = DO
        data[20..24].copy_from_slice(&(HEADER_LEN as u32).to_le_bytes());
        data[24..28].copy_from_slice(&(inner.len() as u32).to_le_bytes());
        data.extend(inner);
        data
    }

    #[test]
    fn test_load_unwraps_do_image() {
        let data = wrapped_do_image();
        let image = TwoMgFormat::load(&data).unwrap();
        assert_eq!(image.format, DiskImageFormat::TwoMg);
        assert_eq!(image.geometry.cylinders, 35);
    }

    #[test]
    fn test_probe_requires_signature() {
        assert!(!TwoMgFormat::probe(b"nope"));
    }
}
