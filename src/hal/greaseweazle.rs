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
//! The Greaseweazle wire protocol: opcodes, ack codes, and the track read/write command
//! sequences.
//!
//! Every command frame is `[opcode, length, ...params]`; every response starts with a
//! one-byte [`Ack`]. `ReadFlux`/`WriteFlux` additionally stream a flux sample payload
//! using the same variable-length tick encoding as [`crate::flux::wire`]. The wire
//! format and the command framing are kept as independent concerns.

use crate::flux::wire;
use crate::hal::transport::Transport;
use crate::types::track::FluxTrack;
use crate::HalError;

/// Command opcodes, matching the Greaseweazle firmware's `cmd.h` enumeration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Opcode {
    GetInfo = 0,
    Update = 1,
    Seek = 2,
    Head = 3,
    SetParams = 4,
    GetParams = 5,
    Motor = 6,
    ReadFlux = 7,
    WriteFlux = 8,
    GetFluxStatus = 9,
    GetIndexTimes = 10,
    SwitchFwMode = 11,
    Select = 12,
    Deselect = 13,
    SetBusType = 14,
    SetPin = 15,
    Reset = 16,
    EraseFlux = 17,
    SourceBytes = 18,
    SinkBytes = 19,
    GetPin = 20,
}

/// Response status codes, matching the firmware's `ack.h` enumeration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Ack {
    Okay = 0,
    BadCommand = 1,
    NoIndex = 2,
    NoTrk0 = 3,
    FluxOverflow = 4,
    FluxUnderflow = 5,
    Wrprot = 6,
    NoUnit = 7,
    NoBus = 8,
    BadUnit = 9,
    BadPin = 10,
    BadCylinder = 11,
}

impl Ack {
    fn from_byte(byte: u8) -> Result<Self, HalError> {
        Ok(match byte {
            0 => Ack::Okay,
            1 => Ack::BadCommand,
            2 => Ack::NoIndex,
            3 => Ack::NoTrk0,
            4 => Ack::FluxOverflow,
            5 => Ack::FluxUnderflow,
            6 => Ack::Wrprot,
            7 => Ack::NoUnit,
            8 => Ack::NoBus,
            9 => Ack::BadUnit,
            10 => Ack::BadPin,
            11 => Ack::BadCylinder,
            other => return Err(HalError::Protocol(format!("unrecognized ack byte 0x{other:02x}"))),
        })
    }

    fn into_error(self) -> Option<HalError> {
        match self {
            Ack::Okay => None,
            Ack::NoIndex => Some(HalError::NoIndex),
            Ack::NoTrk0 => Some(HalError::NoTrack0),
            Ack::FluxOverflow => Some(HalError::Overflow),
            Ack::FluxUnderflow => Some(HalError::Underflow),
            Ack::Wrprot => Some(HalError::WriteProtected),
            other => Some(HalError::Protocol(format!("{other:?}"))),
        }
    }
}

impl std::fmt::Debug for Ack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ack::Okay => "Okay",
            Ack::BadCommand => "BadCommand",
            Ack::NoIndex => "NoIndex",
            Ack::NoTrk0 => "NoTrk0",
            Ack::FluxOverflow => "FluxOverflow",
            Ack::FluxUnderflow => "FluxUnderflow",
            Ack::Wrprot => "Wrprot",
            Ack::NoUnit => "NoUnit",
            Ack::NoBus => "NoBus",
            Ack::BadUnit => "BadUnit",
            Ack::BadPin => "BadPin",
            Ack::BadCylinder => "BadCylinder",
        };
        f.write_str(name)
    }
}

/// Tunable behavior for a Greaseweazle session; passed explicitly by the caller rather
/// than read from the environment, so the same process can drive more than one device
/// with different settings.
#[derive(Copy, Clone, Debug)]
pub struct GreaseweazleConfig {
    /// How many times a failed command is retried before giving up.
    pub retries: u32,
    /// How many index-to-index revolutions to capture per `read_track` call.
    pub revolutions: u8,
    pub sample_frequency_hz: u32,
}

impl Default for GreaseweazleConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            revolutions: 2,
            sample_frequency_hz: 24_027_428,
        }
    }
}

const SYNC_BYTE: u8 = 0x00;

fn command_frame(opcode: Opcode, params: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(2 + params.len());
    frame.push(opcode as u8);
    frame.push((2 + params.len()) as u8);
    frame.extend_from_slice(params);
    frame
}

/// A live session against a Greaseweazle (or protocol-compatible) device.
pub struct GreaseweazleDevice<T: Transport> {
    transport: T,
    config: GreaseweazleConfig,
}

impl<T: Transport> GreaseweazleDevice<T> {
    pub fn new(transport: T, config: GreaseweazleConfig) -> Self {
        Self { transport, config }
    }

    fn send_command(&mut self, opcode: Opcode, params: &[u8]) -> Result<(), HalError> {
        self.transport.write_all(&command_frame(opcode, params))
    }

    fn read_ack(&mut self) -> Result<Ack, HalError> {
        let byte = self.transport.read_vec(1)?[0];
        let ack = Ack::from_byte(byte)?;
        match ack.into_error() {
            Some(err) => Err(err),
            None => Ok(ack),
        }
    }

    /// Run `op` up to `config.retries + 1` times, matching §5's outer retry loop around
    /// every straight-line HAL operation.
    fn with_retries<R>(&mut self, mut op: impl FnMut(&mut Self) -> Result<R, HalError>) -> Result<R, HalError> {
        let mut last_err = None;
        for _ in 0..=self.config.retries {
            match op(self) {
                Ok(value) => return Ok(value),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or(HalError::Protocol("retry loop ran zero times".to_string())))
    }

    /// Perform the cold-start handshake: send a sync byte and a `GetInfo` command, and
    /// require an `Okay` ack before any other command is trusted.
    pub fn handshake(&mut self) -> Result<(), HalError> {
        self.transport.write_all(&[SYNC_BYTE])?;
        self.send_command(Opcode::GetInfo, &[0])?;
        self.read_ack()?;
        Ok(())
    }

    pub fn seek(&mut self, cylinder: u16) -> Result<(), HalError> {
        self.with_retries(|dev| {
            dev.send_command(Opcode::Seek, &(cylinder as u8).to_le_bytes())?;
            dev.read_ack()?;
            Ok(())
        })
    }

    pub fn select_head(&mut self, head: u8) -> Result<(), HalError> {
        self.with_retries(|dev| {
            dev.send_command(Opcode::Head, &[head])?;
            dev.read_ack()?;
            Ok(())
        })
    }

    pub fn motor(&mut self, on: bool) -> Result<(), HalError> {
        self.with_retries(|dev| {
            dev.send_command(Opcode::Motor, &[on as u8])?;
            dev.read_ack()?;
            Ok(())
        })
    }

    /// Read one track's flux as a decoded, already-bit-resolved [`FluxTrack`].
    pub fn read_track(&mut self, cylinder: u16, head: u8) -> Result<FluxTrack, HalError> {
        self.seek(cylinder)?;
        self.select_head(head)?;
        let revolutions = self.config.revolutions;
        let sample_frequency_hz = self.config.sample_frequency_hz;
        self.with_retries(move |dev| {
            dev.send_command(Opcode::ReadFlux, &[revolutions])?;
            dev.read_ack()?;
            let len_bytes = dev.transport.read_vec(4)?;
            let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
            let payload = dev.transport.read_vec(len)?;
            dev.read_ack()?;
            wire::decode_track(&payload, sample_frequency_hz)
        })
    }

    /// Write a track's worth of flux, encoded with [`wire::encode_track`].
    pub fn write_track(&mut self, cylinder: u16, head: u8, track: &FluxTrack) -> Result<(), HalError> {
        self.seek(cylinder)?;
        self.select_head(head)?;
        let payload = wire::encode_track(track);
        self.with_retries(|dev| {
            dev.send_command(Opcode::WriteFlux, &(payload.len() as u32).to_le_bytes())?;
            dev.transport.write_all(&payload)?;
            dev.read_ack()?;
            Ok(())
        })
    }

    pub fn reset(&mut self) -> Result<(), HalError> {
        self.send_command(Opcode::Reset, &[])?;
        self.read_ack()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::transport::MockTransport;

    fn ok_ack() -> Vec<u8> {
        vec![Ack::Okay as u8]
    }

    #[test]
    fn test_handshake_requires_okay_ack() {
        let mut mock = MockTransport::new();
        mock.push_read(&ok_ack());
        let mut dev = GreaseweazleDevice::new(mock, GreaseweazleConfig::default());
        dev.handshake().unwrap();
    }

    #[test]
    fn test_seek_propagates_no_track0_error() {
        let mut mock = MockTransport::new();
        for _ in 0..=GreaseweazleConfig::default().retries {
            mock.push_read(&[Ack::NoTrk0 as u8]);
        }
        let mut dev = GreaseweazleDevice::new(mock, GreaseweazleConfig::default());
        assert!(matches!(dev.seek(5), Err(HalError::NoTrack0)));
    }

    #[test]
    fn test_read_track_round_trip() {
        let mut mock = MockTransport::new();
        mock.push_read(&ok_ack()); // seek ack
        mock.push_read(&ok_ack()); // head ack
        mock.push_read(&ok_ack()); // read_flux ack
        let mut payload = Vec::new();
        wire::encode_interval(1000, &mut payload);
        wire::encode_interval(2000, &mut payload);
        mock.push_read(&(payload.len() as u32).to_le_bytes());
        mock.push_read(&payload);
        mock.push_read(&ok_ack()); // trailing ack after payload
        let mut dev = GreaseweazleDevice::new(mock, GreaseweazleConfig::default());
        let track = dev.read_track(0, 0).unwrap();
        assert_eq!(track.samples.len(), 2);
    }
}
