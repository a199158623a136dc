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
//! Hardware abstraction layer: talking to a Greaseweazle (or Greaseweazle-protocol-
//! compatible) flux sampler.
//!
//! The wire protocol itself ([`greaseweazle`]) only ever calls through the [`Transport`]
//! trait, never directly opening a serial port, so the whole state machine is testable
//! against [`transport::MockTransport`] without real hardware.

pub mod greaseweazle;
pub mod transport;

pub use greaseweazle::{GreaseweazleConfig, GreaseweazleDevice};
pub use transport::{SerialTransport, Transport};

/// Seam for a device driven by shelling out to a vendor-supplied dumper tool rather than
/// talking a wire protocol directly. A real adapter would spawn that tool and parse its
/// stdout/stderr; this trait is what such an adapter would implement.
pub trait CliToolAdapter {
    fn read_track(&mut self, cylinder: u16, head: u8) -> Result<Vec<u8>, crate::HalError>;
    fn write_track(&mut self, cylinder: u16, head: u8, data: &[u8]) -> Result<(), crate::HalError>;
}
