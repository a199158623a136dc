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
//! Software phase-locked-loop bitcell decoder.
//!
//! Converts a [`FluxTrack`]'s tick-count transition intervals into a decoded bitcell
//! stream: each interval is rounded to the nearest whole number of bit cells (a run of
//! `n-1` zero bits followed by a one bit, since a flux transition marks a `1` cell), and
//! the estimated cell period is nudged toward the observed interval by `pll_gain` so the
//! loop tracks gradual spindle speed drift.

use crate::flux::FluxStats;
use crate::types::track::FluxTrack;
use bit_vec::BitVec;

/// Tunable parameters for the PLL, one set per disk format family (nominal period, gain,
/// and acquisition window per encoding).
#[derive(Copy, Clone, Debug)]
pub struct PllConfig {
    pub nominal_bit_period_ns: u32,
    /// Fraction (0.0-1.0) of the phase error fed back into the period estimate each cell.
    pub pll_gain: f32,
    /// Maximum allowed deviation from nominal, as a fraction (e.g. `0.25` = ±25%), before
    /// the period is hard-clamped rather than tracked.
    pub pll_window_pct: f32,
    /// Whether the loop adjusts its period estimate at all, or stays pinned to nominal
    /// (useful for synthetic/test flux with no drift).
    pub adaptive: bool,
    /// Whether to reset the period estimate to nominal at each index pulse.
    pub index_sync: bool,
}

impl PllConfig {
    pub const fn mfm_double_density() -> Self {
        Self {
            nominal_bit_period_ns: 2000,
            pll_gain: 0.15,
            pll_window_pct: 0.30,
            adaptive: true,
            index_sync: true,
        }
    }

    pub const fn fm_single_density() -> Self {
        Self {
            nominal_bit_period_ns: 4000,
            pll_gain: 0.15,
            pll_window_pct: 0.30,
            adaptive: true,
            index_sync: true,
        }
    }

    pub const fn gcr_commodore() -> Self {
        Self {
            nominal_bit_period_ns: 3250,
            pll_gain: 0.10,
            pll_window_pct: 0.35,
            adaptive: true,
            index_sync: false,
        }
    }
}

/// Decode an entire flux track's transitions into a bitcell stream, returning the bits
/// alongside quality statistics.
pub fn decode_track(flux: &FluxTrack, config: &PllConfig) -> (BitVec, FluxStats) {
    let mut bits = BitVec::new();
    let mut stats = FluxStats {
        min_period_ns: u32::MAX,
        ..Default::default()
    };
    let mut period = config.nominal_bit_period_ns as f64;
    let min_period = period * (1.0 - config.pll_window_pct as f64).max(0.05);
    let max_period = period * (1.0 + config.pll_window_pct as f64);
    let mut period_sum = 0.0f64;

    let mut next_index = flux.index_times.iter().copied().peekable();
    let mut acc_ticks: u64 = 0;

    for &ticks in &flux.samples {
        acc_ticks += ticks as u64;
        if config.index_sync {
            if let Some(&idx) = next_index.peek() {
                if acc_ticks >= idx as u64 {
                    period = config.nominal_bit_period_ns as f64;
                    next_index.next();
                }
            }
        }

        let delta_ns = flux.ticks_to_seconds(ticks) * 1e9;
        let mut cells = (delta_ns / period).round() as i64;
        if cells < 1 {
            cells = 1;
        }
        for _ in 0..(cells - 1) {
            bits.push(false);
        }
        bits.push(true);

        stats.total_transitions += 1;
        period_sum += period;
        stats.min_period_ns = stats.min_period_ns.min(period as u32);
        stats.max_period_ns = stats.max_period_ns.max(period as u32);

        let expected = cells as f64 * period;
        let error = delta_ns - expected;
        if error.abs() > period * config.pll_window_pct as f64 {
            stats.out_of_window += 1;
        }

        if config.adaptive {
            period += error * config.pll_gain as f64;
            period = period.clamp(min_period, max_period);
        }
    }

    if stats.total_transitions > 0 {
        stats.mean_period_ns = period_sum / stats.total_transitions as f64;
    }
    else {
        stats.min_period_ns = 0;
    }

    (bits, stats)
}

/// Re-encode a bitcell stream back to tick-count flux intervals at a fixed nominal period
/// (used when synthesizing flux for a format that has none, e.g. writing a sector image
/// out through a flux-only HAL transport).
pub fn encode_track(bits: &BitVec, sample_frequency_hz: u32, config: &PllConfig) -> FluxTrack {
    let mut flux = FluxTrack::new(sample_frequency_hz);
    let ticks_per_cell = (config.nominal_bit_period_ns as f64 / 1e9 * sample_frequency_hz as f64).round() as u32;
    let mut run = 0u32;
    for bit in bits.iter() {
        run += ticks_per_cell.max(1);
        if bit {
            flux.samples.push(run);
            run = 0;
        }
    }
    flux
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_flux(periods_ns: &[u32], sample_frequency_hz: u32) -> FluxTrack {
        let mut flux = FluxTrack::new(sample_frequency_hz);
        for &ns in periods_ns {
            let ticks = (ns as f64 / 1e9 * sample_frequency_hz as f64).round() as u32;
            flux.samples.push(ticks);
        }
        flux
    }

    #[test]
    fn test_clean_mfm_decode_produces_expected_bit_pattern() {
        // 2000ns periods = exactly one bit cell each => every cell is a "1" bit.
        let flux = make_flux(&[2000; 8], 24_000_000);
        let config = PllConfig::mfm_double_density();
        let (bits, stats) = decode_track(&flux, &config);
        assert_eq!(bits.len(), 8);
        assert!(bits.iter().all(|b| b));
        assert_eq!(stats.total_transitions, 8);
        assert!(stats.confidence() > 0.99);
    }

    #[test]
    fn test_double_period_produces_a_zero_then_one() {
        let flux = make_flux(&[4000], 24_000_000);
        let config = PllConfig::mfm_double_density();
        let (bits, _) = decode_track(&flux, &config);
        assert_eq!(bits.len(), 2);
        assert!(!bits.get(0).unwrap());
        assert!(bits.get(1).unwrap());
    }

    #[test]
    fn test_round_trip_through_encode_track() {
        let bits = crate::bitstream::bytes_to_bits(&[0b10101010]);
        let config = PllConfig::mfm_double_density();
        let flux = encode_track(&bits, 24_000_000, &config);
        let (decoded, _) = decode_track(&flux, &config);
        assert_eq!(decoded.len(), bits.len());
    }
}
