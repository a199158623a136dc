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
//! Error taxonomy for the library.
//!
//! Every public operation returns a `Result` using one of the enums below; there is no
//! cross-module exception propagation. CRC errors encountered during a bulk disk read are
//! recorded in a [`crate::types::sector::Sector`]'s `status` field rather than aborting the
//! read — see [`DiskImageError::CrcMismatch`] for the targeted-read case.

use thiserror::Error;

/// Errors arising from disk-image parsing, flux decoding, and format conversion.
#[derive(Debug, Error)]
pub enum DiskImageError {
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("memory allocation failed: {0}")]
    Memory(String),
    #[error("format error at byte offset {offset}: {reason}")]
    Format { offset: usize, reason: String },
    #[error("requested item not found")]
    NotFound,
    #[error("item already exists")]
    Exists,
    #[error("disk is full")]
    DiskFull,
    #[error("directory is full")]
    DirFull,
    #[error("disk image is corrupt: {0}")]
    Corrupt(String),
    #[error("disk image or medium is read-only")]
    ReadOnly,
    #[error("medium is write-protected")]
    WriteProtected,
    #[error("operation timed out")]
    Timeout,
    #[error("CRC mismatch reading sector")]
    CrcMismatch,
    #[error("operation or format is unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for DiskImageError {
    fn from(err: std::io::Error) -> Self {
        DiskImageError::Io(err.to_string())
    }
}

impl From<binrw::Error> for DiskImageError {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(e) => DiskImageError::Io(e.to_string()),
            other => DiskImageError::Format {
                offset: 0,
                reason: other.to_string(),
            },
        }
    }
}

/// Errors arising from filesystem operations layered over a [`crate::DiskImage`].
#[derive(Debug, Error)]
pub enum FsError {
    #[error(transparent)]
    Image(#[from] DiskImageError),
    #[error("file not found")]
    NotFound,
    #[error("file already exists")]
    Exists,
    #[error("no free space remains on the volume")]
    DiskFull,
    #[error("the directory is full")]
    DirFull,
    #[error("filesystem structure is corrupt: {0}")]
    Corrupt(String),
    #[error("volume or file is read-only")]
    ReadOnly,
    #[error("unsupported filesystem operation: {0}")]
    Unsupported(String),
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

/// Errors arising from the Greaseweazle hardware-abstraction layer.
#[derive(Debug, Error)]
pub enum HalError {
    #[error("device not found")]
    NotFound,
    #[error("failed to open device: {0}")]
    OpenFailed(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("operation timed out")]
    Timeout,
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("drive reported no index pulse")]
    NoIndex,
    #[error("drive reported no track 0")]
    NoTrack0,
    #[error("sampler buffer overflowed")]
    Overflow,
    #[error("flux writer underflowed")]
    Underflow,
    #[error("medium is write-protected")]
    WriteProtected,
    #[error("invalid parameter: {0}")]
    Invalid(String),
    #[error("device reported out of memory")]
    NoMemory,
    #[error("device is not connected")]
    NotConnected,
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for HalError {
    fn from(err: std::io::Error) -> Self {
        HalError::Io(err.to_string())
    }
}
