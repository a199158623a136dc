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
//! Flux-level processing: PLL bitcell recovery and the Greaseweazle wire encoding.

pub mod pll;
pub mod wire;

/// Aggregate quality statistics for a decoded flux track, useful for deciding whether a
/// re-read is worthwhile, without having to re-parse the bitstream to find out.
#[derive(Copy, Clone, Debug, Default)]
pub struct FluxStats {
    pub total_transitions: usize,
    /// Transitions whose interval fell outside the PLL's phase window and had to be
    /// hard-clamped rather than tracked smoothly.
    pub out_of_window: usize,
    pub min_period_ns: u32,
    pub max_period_ns: u32,
    pub mean_period_ns: f64,
}

impl FluxStats {
    /// A coarse 0.0-1.0 confidence score: the fraction of transitions that tracked cleanly.
    pub fn confidence(&self) -> f32 {
        if self.total_transitions == 0 {
            return 0.0;
        }
        1.0 - (self.out_of_window as f32 / self.total_transitions as f32)
    }
}
