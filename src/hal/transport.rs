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
//! The byte-pipe abstraction the Greaseweazle protocol driver talks through.
//!
//! Command framing never touches a serial port directly; it only ever calls through this
//! trait, so tests can swap in [`MockTransport`] without real hardware.

use crate::HalError;
use std::time::Duration;

/// A duplex byte pipe to a flux sampler: a serial port in production, a canned
/// request/response queue in tests.
pub trait Transport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), HalError>;
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), HalError>;

    /// Read `len` bytes, returning them as an owned buffer.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, HalError> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// A real Greaseweazle connected over its USB CDC-ACM virtual serial port.
#[cfg(feature = "hal")]
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

#[cfg(feature = "hal")]
impl SerialTransport {
    /// Open `path` (e.g. `/dev/ttyACM0` or `COM3`) at the Greaseweazle's fixed baud rate.
    /// The baud rate is ignored by the CDC-ACM stack on real hardware but some virtual
    /// serial drivers still require a value to be specified.
    pub fn open(path: &str, timeout: Duration) -> Result<Self, HalError> {
        let port = serialport::new(path, 9_600)
            .timeout(timeout)
            .open()
            .map_err(|e| HalError::OpenFailed(e.to_string()))?;
        Ok(Self { port })
    }
}

#[cfg(feature = "hal")]
impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), HalError> {
        use std::io::Write;
        self.port.write_all(data).map_err(|e| HalError::Io(e.to_string()))
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), HalError> {
        use std::io::Read;
        self.port.read_exact(buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::TimedOut => HalError::Timeout,
            _ => HalError::Io(e.to_string()),
        })
    }
}

/// A scripted transport for exercising the protocol state machine without hardware: queue
/// up expected writes and canned reads, then drive a [`crate::hal::GreaseweazleDevice`]
/// against it.
#[derive(Default)]
pub struct MockTransport {
    pub written: Vec<u8>,
    pending_reads: std::collections::VecDeque<u8>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes to be handed back by future `read_exact` calls, in order.
    pub fn push_read(&mut self, bytes: &[u8]) {
        self.pending_reads.extend(bytes.iter().copied());
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), HalError> {
        self.written.extend_from_slice(data);
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), HalError> {
        if self.pending_reads.len() < buf.len() {
            return Err(HalError::Timeout);
        }
        for slot in buf.iter_mut() {
            *slot = self.pending_reads.pop_front().expect("length checked above");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_transport_round_trip() {
        let mut mock = MockTransport::new();
        mock.push_read(&[0xAA, 0xBB, 0xCC]);
        mock.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(mock.written, vec![1, 2, 3]);
        let mut buf = [0u8; 2];
        mock.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0xBB]);
    }

    #[test]
    fn test_read_past_queue_times_out() {
        let mut mock = MockTransport::new();
        mock.push_read(&[1]);
        let mut buf = [0u8; 2];
        assert!(matches!(mock.read_exact(&mut buf), Err(HalError::Timeout)));
    }
}
