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
//! Mounts a synthetic Kaypro II (CP/M) disk through the public `FileSystem` surface and
//! drives it the way `uft_cli`'s insert/ls/extract/attrib/mkfs subcommands do: write,
//! list, read back, rename, set attributes, delete, and reformat, persisting through a
//! real `DiskImage` each time rather than poking at the filesystem module's internals.

mod common;

use uft::filesystem::cpm::CpmFileSystem;
use uft::filesystem::{FileAttributes, FileSystem};

#[test]
fn freshly_mounted_disk_has_no_files() {
    let (image, dpb) = common::blank_kaypro_image();
    let fs = CpmFileSystem::mount(&image, dpb).unwrap();
    assert!(fs.list_dir("/").unwrap().is_empty());
    let (free, total) = fs.free_space().unwrap();
    assert_eq!(free, total);
}

#[test]
fn write_list_read_and_delete_round_trip() {
    let (image, dpb) = common::blank_kaypro_image();
    let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();

    let payload = vec![0xAAu8; 5000];
    fs.write_file("REPORT.TXT", &payload).unwrap();

    let listing = fs.list_dir("/").unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "REPORT.TXT");
    assert!(listing[0].size_bytes >= payload.len() as u64);

    let found = fs.find("report.txt", None).unwrap();
    assert_eq!(found.name, "REPORT.TXT");

    let read_back = fs.read_file("REPORT.TXT").unwrap();
    assert_eq!(&read_back[..payload.len()], payload.as_slice());

    let (free_before, total) = fs.free_space().unwrap();
    assert!(free_before < total);

    fs.delete_file("REPORT.TXT").unwrap();
    assert!(fs.list_dir("/").unwrap().is_empty());
    assert!(fs.read_file("REPORT.TXT").is_err());

    let (free_after, _) = fs.free_space().unwrap();
    assert_eq!(free_after, total);
}

#[test]
fn set_attributes_persists_across_a_remount() {
    let (image, dpb) = common::blank_kaypro_image();
    let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
    fs.write_file("LOCKED.DAT", &[1, 2, 3, 4]).unwrap();

    fs.set_attributes("LOCKED.DAT", FileAttributes::READ_ONLY).unwrap();
    assert_eq!(fs.list_dir("/").unwrap()[0].attributes, FileAttributes::READ_ONLY);

    let remounted = CpmFileSystem::mount(fs.image(), dpb).unwrap();
    assert_eq!(remounted.list_dir("/").unwrap()[0].attributes, FileAttributes::READ_ONLY);
}

#[test]
fn rename_updates_the_listing_but_keeps_the_data() {
    let (image, dpb) = common::blank_kaypro_image();
    let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
    fs.write_file("OLD.TXT", b"hello").unwrap();

    fs.rename("OLD.TXT", "NEW.TXT", None).unwrap();

    assert!(fs.find("OLD.TXT", None).is_err());
    assert_eq!(fs.read_file("NEW.TXT").unwrap(), b"hello");
}

#[test]
fn format_clears_every_file_and_survives_a_remount() {
    let (image, dpb) = common::blank_kaypro_image();
    let mut fs = CpmFileSystem::mount(&image, dpb).unwrap();
    fs.write_file("A.TXT", &[1, 2, 3]).unwrap();
    fs.write_file("B.TXT", &[4, 5, 6]).unwrap();
    assert_eq!(fs.list_dir("/").unwrap().len(), 2);

    fs.format().unwrap();
    assert!(fs.list_dir("/").unwrap().is_empty());

    let remounted = CpmFileSystem::mount(fs.image(), dpb).unwrap();
    assert!(remounted.list_dir("/").unwrap().is_empty());
}
