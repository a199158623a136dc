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
//! Greaseweazle-style variable-length flux wire encoding.
//!
//! Every transition interval is a tick count in `1..2^24`. Values up to 249 are a single
//! literal byte; larger values are prefixed with a `0xFF` escape followed by three
//! little-endian bytes carrying the full 24-bit count. A `0x00` byte is reserved (used by
//! the HAL framing layer for stream padding) and is skipped by the decoder rather than
//! treated as a zero-length interval, since a zero-tick flux transition cannot occur.

use crate::types::track::FluxTrack;
use crate::HalError;

const SHORT_MAX: u32 = 249;
const EXT_MARKER: u8 = 0xFF;
const RESERVED: u8 = 0x00;

/// Largest tick count this encoding can represent (exclusive upper bound).
pub const MAX_TICKS: u32 = 1 << 24;

/// Append the wire encoding of one transition interval to `out`.
///
/// # Panics
/// Panics if `ticks` is `0` or `>= MAX_TICKS`; callers are expected to validate flux
/// samples before serializing them (a zero-length or absurdly long interval indicates a
/// bug upstream, not a malformed disk).
pub fn encode_interval(ticks: u32, out: &mut Vec<u8>) {
    assert!(ticks >= 1 && ticks < MAX_TICKS, "flux interval {ticks} out of range");
    if ticks <= SHORT_MAX {
        out.push(ticks as u8);
    }
    else {
        out.push(EXT_MARKER);
        out.push((ticks & 0xFF) as u8);
        out.push(((ticks >> 8) & 0xFF) as u8);
        out.push(((ticks >> 16) & 0xFF) as u8);
    }
}

/// Encode a full track's flux samples as a wire byte stream.
pub fn encode_track(flux: &FluxTrack) -> Vec<u8> {
    let mut out = Vec::with_capacity(flux.samples.len());
    for &ticks in &flux.samples {
        encode_interval(ticks, &mut out);
    }
    out
}

/// Decode one wire byte stream back into tick-count intervals.
pub fn decode_stream(bytes: &[u8]) -> Result<Vec<u32>, HalError> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            RESERVED => {
                i += 1;
            }
            EXT_MARKER => {
                if i + 3 >= bytes.len() {
                    return Err(HalError::Protocol("truncated extended flux interval".to_string()));
                }
                let ticks = bytes[i + 1] as u32 | (bytes[i + 2] as u32) << 8 | (bytes[i + 3] as u32) << 16;
                out.push(ticks);
                i += 4;
            }
            b => {
                out.push(b as u32);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Decode a wire byte stream directly into a [`FluxTrack`] at the given sample frequency.
pub fn decode_track(bytes: &[u8], sample_frequency_hz: u32) -> Result<FluxTrack, HalError> {
    let mut flux = FluxTrack::new(sample_frequency_hz);
    flux.samples = decode_stream(bytes)?;
    Ok(flux)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_one(ticks: u32) {
        let mut buf = Vec::new();
        encode_interval(ticks, &mut buf);
        let decoded = decode_stream(&buf).unwrap();
        assert_eq!(decoded, vec![ticks], "round trip failed for {ticks}");
    }

    #[test]
    fn test_round_trip_boundary_values() {
        for ticks in [1, 2, 100, 249, 250, 251, 1000, 65535, 65536, 1 << 20, MAX_TICKS - 1] {
            round_trip_one(ticks);
        }
    }

    #[test]
    fn test_round_trip_dense_sweep() {
        // A dense sweep across the full 24-bit range, stepping to keep the test fast.
        let mut ticks = 1u32;
        while ticks < MAX_TICKS {
            round_trip_one(ticks);
            ticks = ticks.saturating_add(4001);
        }
    }

    #[test]
    fn test_track_round_trip_preserves_sample_order() {
        let mut flux = FluxTrack::new(24_000_000);
        flux.samples = vec![1, 249, 250, 1_000_000, 16_777_215];
        let wire = encode_track(&flux);
        let decoded = decode_track(&wire, 24_000_000).unwrap();
        assert_eq!(decoded.samples, flux.samples);
    }

    #[test]
    fn test_reserved_byte_is_skipped_not_misread() {
        let bytes = [RESERVED, 5u8, RESERVED, 10u8];
        let decoded = decode_stream(&bytes).unwrap();
        assert_eq!(decoded, vec![5, 10]);
    }

    #[test]
    fn test_truncated_extended_interval_errors() {
        let bytes = [EXT_MARKER, 0x01, 0x02];
        assert!(decode_stream(&bytes).is_err());
    }

    #[test]
    #[should_panic]
    fn test_zero_ticks_panics() {
        let mut buf = Vec::new();
        encode_interval(0, &mut buf);
    }
}
