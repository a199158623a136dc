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
//! Typed filesystem access layered over a [`crate::DiskImage`].
//! Each historical platform gets its own module implementing the shared
//! [`FileSystem`] trait; callers that don't care which platform they're looking at can
//! still list directories, read, and (where supported) write files uniformly.

pub mod apple_dos33;
pub mod atari_dos;
pub mod atari_st_fat;
pub mod bbc_dfs;
pub mod cpm;
pub mod fat12;
pub mod human68k;
pub mod prodos;
pub mod trsdos;

use crate::FsError;
use dyn_clone::DynClone;
use std::fmt::{self, Display, Formatter};

bitflags::bitflags! {
    /// Per-file attribute bits. Not every platform uses every bit; unused bits are always
    /// clear rather than reused for something else.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct FileAttributes: u16 {
        const READ_ONLY = 0x0001;
        const HIDDEN    = 0x0002;
        const SYSTEM    = 0x0004;
        const ARCHIVE   = 0x0008;
        const DIRECTORY = 0x0010;
        /// CP/M's "user number" occupies bits 4-7 of the directory status byte on some
        /// hosts; tracked separately from this bitflag set via [`FileInfo::user_number`].
        const LOCKED    = 0x0020;
    }
}

/// One directory entry, normalized across every supported platform.
#[derive(Clone, Debug)]
pub struct FileInfo {
    pub name: String,
    pub size_bytes: u64,
    pub attributes: FileAttributes,
    /// CP/M user number (0-15), `None` on platforms without the concept.
    pub user_number: Option<u8>,
}

impl Display for FileInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:>8}", self.name, self.size_bytes)
    }
}

/// Common operations every mounted filesystem supports.
///
/// `mount` is deliberately not part of this trait (each implementation's constructor
/// takes whatever platform-specific options it needs, e.g. CP/M's [`crate::cpm::Dpb`]) —
/// only the resulting mounted instance needs a uniform interface for traversal.
pub trait FileSystem: DynClone {
    /// List the entries of `path` ("/" for the root; most of these platforms have no
    /// subdirectories at all, in which case any non-root path is `FsError::NotFound`).
    fn list_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError>;

    /// Read a whole file's contents by name.
    fn read_file(&self, name: &str) -> Result<Vec<u8>, FsError>;

    /// Write (creating or replacing) a whole file's contents by name.
    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), FsError>;

    /// Delete a file by name.
    fn delete_file(&mut self, name: &str) -> Result<(), FsError>;

    /// `(free_bytes, total_bytes)` for the volume.
    fn free_space(&self) -> Result<(u64, u64), FsError>;

    /// Borrow the underlying disk image, reflecting every write made through this
    /// filesystem so far. Callers that need to persist changes re-encode this through
    /// whichever container format the image started life in.
    fn image(&self) -> &crate::DiskImage;

    /// Volume label, if this platform's filesystem carries one.
    fn volume_label(&self) -> Option<String> {
        None
    }

    /// Looks up a single file by name, optionally scoped to a platform-specific user area
    /// (CP/M is the only implementor that cares; `user` is ignored elsewhere). The default
    /// falls back to a linear scan of [`FileSystem::list_dir`].
    fn find(&self, name: &str, user: Option<u8>) -> Result<FileInfo, FsError> {
        let _ = user;
        self.list_dir("/")?
            .into_iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .ok_or(FsError::NotFound)
    }

    /// Renames a file in place. The default falls back to read + write + delete, which loses
    /// any in-place metadata (extent ordering, block layout) a platform-specific override
    /// could otherwise preserve.
    fn rename(&mut self, old: &str, new: &str, user: Option<u8>) -> Result<(), FsError> {
        let _ = user;
        let data = self.read_file(old)?;
        self.write_file(new, &data)?;
        self.delete_file(old)
    }

    /// Updates a file's attribute bits. Filesystems with nowhere to store them return
    /// `FsError::Unsupported`.
    fn set_attributes(&mut self, name: &str, attributes: FileAttributes) -> Result<(), FsError> {
        let _ = (name, attributes);
        Err(FsError::Unsupported("this filesystem has no attribute bits to set".to_string()))
    }

    /// Lays down a fresh, empty filesystem on the underlying image, discarding any files
    /// present. Filesystems with no formatter return `FsError::Unsupported`.
    fn format(&mut self) -> Result<(), FsError> {
        Err(FsError::Unsupported("formatting is not implemented for this filesystem".to_string()))
    }
}

dyn_clone::clone_trait_object!(FileSystem);

/// Split an 8.3-style name into `(base, ext)`, upper-casing both (the convention CP/M,
/// FAT, and most CP/M-era directory formats all share).
pub fn split_83(name: &str) -> (String, String) {
    let upper = name.to_ascii_uppercase();
    match upper.rsplit_once('.') {
        Some((base, ext)) => (base.to_string(), ext.to_string()),
        None => (upper, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_83() {
        assert_eq!(split_83("hello.txt"), ("HELLO".to_string(), "TXT".to_string()));
        assert_eq!(split_83("noext"), ("NOEXT".to_string(), String::new()));
    }
}
