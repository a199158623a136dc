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
//! Bitcell encodings and related physical-disk enumerations.
//!
//! Covers MFM/FM/GCR and a catch-all `Raw` encoding for flux-only tracks that have not
//! yet been resolved to bits.

use std::fmt::{self, Display, Formatter};

/// The bitcell encoding used by a track.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// Frequency Modulation: 8" diskettes, some duplication-mark tracks.
    Fm,
    /// Modified Frequency Modulation: almost all 5.25"/3.5" diskettes, Amiga, Atari ST.
    #[default]
    Mfm,
    /// Group Code Recording: Commodore, Apple II, early Macintosh.
    Gcr,
    /// Flux has not yet been resolved into a bitcell encoding.
    Raw,
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Fm => write!(f, "FM"),
            Encoding::Mfm => write!(f, "MFM"),
            Encoding::Gcr => write!(f, "GCR"),
            Encoding::Raw => write!(f, "Raw"),
        }
    }
}

/// Nominal data rate of a track, in bits per second for the clock+data stream (i.e. twice the
/// nominal bit-cell rate for FM/MFM).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataRate {
    Kbps125,
    Kbps250,
    Kbps300,
    Kbps500,
    Kbps1000,
    Nonstandard(u32),
}

impl DataRate {
    /// Nominal time, in nanoseconds, per bit cell (not per clock+data pair).
    pub fn nominal_bit_period_ns(&self) -> u32 {
        match self {
            DataRate::Kbps125 => 4000,
            DataRate::Kbps250 => 2000,
            DataRate::Kbps300 => 1666,
            DataRate::Kbps500 => 1000,
            DataRate::Kbps1000 => 500,
            DataRate::Nonstandard(bps) => (1_000_000_000u64 / (*bps as u64).max(1)) as u32,
        }
    }
}

impl From<u32> for DataRate {
    /// Classify a data rate in bits/sec, allowing an 8-15% deviation before falling back to
    /// `Nonstandard`.
    fn from(rate: u32) -> Self {
        match rate {
            93_750..=143_750 => DataRate::Kbps125,
            212_000..=271_000 => DataRate::Kbps250,
            271_001..=345_000 => DataRate::Kbps300,
            425_000..=575_000 => DataRate::Kbps500,
            850_000..=1_150_000 => DataRate::Kbps1000,
            other => DataRate::Nonstandard(other),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DataRate::Kbps125 => write!(f, "125Kbps"),
            DataRate::Kbps250 => write!(f, "250Kbps"),
            DataRate::Kbps300 => write!(f, "300Kbps"),
            DataRate::Kbps500 => write!(f, "500Kbps"),
            DataRate::Kbps1000 => write!(f, "1000Kbps"),
            DataRate::Nonstandard(r) => write!(f, "*{}Kbps", r / 1000),
        }
    }
}

/// Nominal rotational speed of the disk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Rpm {
    #[default]
    Rpm300,
    Rpm360,
}

impl Display for Rpm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Rpm::Rpm300 => write!(f, "300RPM"),
            Rpm::Rpm360 => write!(f, "360RPM"),
        }
    }
}

impl Rpm {
    /// Classify a measured time between index pulses, in seconds, as 300 or 360 RPM,
    /// splitting the ambiguous overlap at 327 RPM.
    pub fn try_from_index_time(seconds: f64) -> Option<Rpm> {
        if seconds <= 0.0 {
            return None;
        }
        let rpm = 60.0 / seconds;
        match rpm {
            r if (270.0..327.0).contains(&r) => Some(Rpm::Rpm300),
            r if (327.0..414.0).contains(&r) => Some(Rpm::Rpm360),
            _ => None,
        }
    }
}
