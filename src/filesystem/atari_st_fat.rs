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
//! Atari ST TOS filesystem access. TOS's GEMDOS floppy format is a stock
//! FAT12 volume (TOS borrowed the PC format wholesale), so this module is a thin wrapper
//! around [`crate::filesystem::fat12`] with nothing platform-specific to add beyond the
//! type name callers mount.

use crate::filesystem::fat12::Fat12FileSystem;
use crate::filesystem::{FileAttributes, FileInfo, FileSystem};
use crate::{DiskImage, FsError};

/// A mounted Atari ST GEMDOS (FAT12) volume.
#[derive(Clone)]
pub struct AtariStFileSystem {
    inner: Fat12FileSystem,
}

impl AtariStFileSystem {
    pub fn mount(image: &DiskImage) -> Result<Self, FsError> {
        Ok(Self {
            inner: Fat12FileSystem::mount(image)?,
        })
    }
}

impl FileSystem for AtariStFileSystem {
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        self.inner.list_dir(path)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError> {
        self.inner.read_file(name)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        self.inner.write_file(name, data)
    }

    fn delete_file(&mut self, name: &str) -> Result<(), FsError> {
        self.inner.delete_file(name)
    }

    fn free_space(&self) -> Result<(u64, u64), FsError> {
        self.inner.free_space()
    }

    fn image(&self) -> &crate::DiskImage {
        self.inner.image()
    }

    fn find(&self, name: &str, user: Option<u8>) -> Result<FileInfo, FsError> {
        self.inner.find(name, user)
    }

    fn rename(&mut self, old: &str, new: &str, user: Option<u8>) -> Result<(), FsError> {
        self.inner.rename(old, new, user)
    }

    fn set_attributes(&mut self, name: &str, attributes: FileAttributes) -> Result<(), FsError> {
        self.inner.set_attributes(name, attributes)
    }

    fn format(&mut self) -> Result<(), FsError> {
        self.inner.format()
    }
}
