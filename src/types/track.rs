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
//! Track-level containers: decoded sectors and/or raw flux.

use crate::types::encoding::Encoding;
use crate::types::sector::Sector;

/// One revolution's worth (or more) of raw flux transitions for a single track.
///
/// Created by the HAL's `read_flux` or a flux-format plugin's decoder; immutable once
/// produced except by explicit re-sampling.
#[derive(Clone, Debug, Default)]
pub struct FluxTrack {
    pub sample_frequency_hz: u32,
    /// Tick counts between successive flux transitions.
    pub samples: Vec<u32>,
    /// Tick offsets into `samples` at which an index pulse was observed.
    pub index_times: Vec<u32>,
    pub revolutions: u8,
}

impl FluxTrack {
    pub fn new(sample_frequency_hz: u32) -> Self {
        Self {
            sample_frequency_hz,
            samples: Vec::new(),
            index_times: Vec::new(),
            revolutions: 0,
        }
    }

    /// Convert a tick count to seconds using this track's sample frequency.
    pub fn ticks_to_seconds(&self, ticks: u32) -> f64 {
        ticks as f64 / self.sample_frequency_hz as f64
    }

    /// Split `samples` into per-revolution slices using `index_times`.
    pub fn revolution_slices(&self) -> Vec<&[u32]> {
        if self.index_times.is_empty() {
            return vec![&self.samples[..]];
        }
        let mut slices = Vec::new();
        let mut cursor = 0usize;
        let mut acc_ticks = 0u64;
        let mut idx_iter = self.index_times.iter().peekable();
        let mut start = 0usize;
        for (i, &s) in self.samples.iter().enumerate() {
            acc_ticks += s as u64;
            if let Some(&&next_index) = idx_iter.peek() {
                if acc_ticks >= next_index as u64 {
                    slices.push(&self.samples[start..=i]);
                    start = i + 1;
                    idx_iter.next();
                }
            }
            cursor = i;
        }
        let _ = cursor;
        if start < self.samples.len() {
            slices.push(&self.samples[start..]);
        }
        slices
    }
}

/// One physical track: cylinder, head, encoding, and either decoded sectors, raw flux, or
/// both: a format that stores both gets to keep both until something invalidates one.
#[derive(Clone, Debug, Default)]
pub struct Track {
    pub cylinder: u16,
    pub head: u8,
    pub encoding: Encoding,
    pub sectors: Vec<Sector>,
    pub flux: Option<FluxTrack>,
}

impl Track {
    pub fn new(cylinder: u16, head: u8, encoding: Encoding) -> Self {
        Self {
            cylinder,
            head,
            encoding,
            sectors: Vec::new(),
            flux: None,
        }
    }

    /// Find a sector by its logical sector number (ignoring cylinder/head, which are
    /// assumed to already match this track).
    pub fn find_sector(&self, sector: u8) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.id.sector == sector)
    }

    pub fn find_sector_mut(&mut self, sector: u8) -> Option<&mut Sector> {
        self.sectors.iter_mut().find(|s| s.id.sector == sector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revolution_slices_without_index_times() {
        let mut flux = FluxTrack::new(24_000_000);
        flux.samples = vec![100, 200, 300];
        assert_eq!(flux.revolution_slices().len(), 1);
    }

    #[test]
    fn test_find_sector() {
        let mut track = Track::new(0, 0, Encoding::Mfm);
        track.sectors.push(Sector::new(
            crate::types::sector::SectorId::new(0, 0, 3, 2),
            vec![0u8; 512],
        ));
        assert!(track.find_sector(3).is_some());
        assert!(track.find_sector(9).is_none());
    }
}
