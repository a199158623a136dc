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
use std::{
    fmt::{Display, Formatter},
    io::Write,
    path::PathBuf,
};

use crate::{
    attrib::{attrib_parser, AttribParams},
    convert::{convert_parser, ConvertParams},
    detect::{detect_parser, DetectParams},
    extract::{extract_parser, ExtractParams},
    info::{info_parser, InfoParams},
    insert::{insert_parser, InsertParams},
    ls::{ls_parser, LsParams},
    mkfs::{mkfs_parser, MkfsParams},
    rename::{rename_parser, RenameParams},
    rm::{rm_parser, RmParams},
};
use bpaf::*;

#[derive(Clone, Debug)]
pub(crate) enum Command {
    Detect(DetectParams),
    Info(InfoParams),
    Convert(ConvertParams),
    Ls(LsParams),
    Extract(ExtractParams),
    Insert(InsertParams),
    Rm(RmParams),
    Rename(RenameParams),
    Attrib(AttribParams),
    Mkfs(MkfsParams),
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Detect(_) => write!(f, "detect"),
            Command::Info(_) => write!(f, "info"),
            Command::Convert(_) => write!(f, "convert"),
            Command::Ls(_) => write!(f, "ls"),
            Command::Extract(_) => write!(f, "extract"),
            Command::Insert(_) => write!(f, "insert"),
            Command::Rm(_) => write!(f, "rm"),
            Command::Rename(_) => write!(f, "rename"),
            Command::Attrib(_) => write!(f, "attrib"),
            Command::Mkfs(_) => write!(f, "mkfs"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct AppParams {
    pub global: GlobalOptions,
    pub command: Command,
}

#[derive(Debug)]
pub struct GlobalOptions {
    pub silent: bool,
}

impl GlobalOptions {
    pub fn loud<F: FnMut()>(&self, mut f: F) {
        if !self.silent {
            f();
            std::io::stdout().flush().unwrap();
        }
    }
}

pub fn global_options_parser() -> impl Parser<GlobalOptions> {
    let silent = long("silent").help("Suppress all output except required output").switch();

    construct!(GlobalOptions { silent })
}

pub(crate) fn in_file_parser() -> impl Parser<PathBuf> {
    long("in_file")
        .short('i')
        .argument::<PathBuf>("INPUT_FILE")
        .help("Path to input disk image")
}

pub(crate) fn out_file_parser() -> impl Parser<PathBuf> {
    long("out_file")
        .short('o')
        .argument::<PathBuf>("OUTPUT_FILE")
        .help("Path to output disk image")
}

/// Explicit container format override, used when a path's extension is ambiguous (several
/// formats share `.dsk`) or missing entirely.
pub(crate) fn format_parser() -> impl Parser<Option<String>> {
    long("format")
        .help("Override container format detection with an explicit extension, e.g. 'd64'")
        .argument::<String>("FORMAT")
        .optional()
}

/// Platform filesystem to mount, e.g. 'cpm', 'atari-dos', 'fat12'. See `platform::mount`
/// for the full list.
pub(crate) fn platform_parser() -> impl Parser<String> {
    long("platform")
        .short('p')
        .argument::<String>("PLATFORM")
        .help("Filesystem platform to mount: apple-dos33, atari-dos, atari-st, bbc-dfs, cpm, fat12, human68k, prodos, trsdos")
}

/// CP/M-only: which machine's directory layout to use, e.g. 'kaypro-4'.
pub(crate) fn cpm_profile_parser() -> impl Parser<Option<String>> {
    long("cpm_profile")
        .help("CP/M disk definition name (required when --platform cpm is used)")
        .argument::<String>("PROFILE")
        .optional()
}

/// CP/M-only: which user area (0-15) to operate in.
pub(crate) fn user_parser() -> impl Parser<Option<u8>> {
    long("user")
        .help("CP/M user area (0-15); ignored on platforms without the concept")
        .argument::<u8>("USER")
        .optional()
}

pub(crate) fn command_parser() -> impl Parser<AppParams> {
    let global = global_options_parser();

    let detect = construct!(Command::Detect(detect_parser()))
        .to_options()
        .command("detect")
        .help("Identify the container format of a disk image");

    let info = construct!(Command::Info(info_parser()))
        .to_options()
        .command("info")
        .help("Display geometry and decode-quality information about a disk image");

    let convert = construct!(Command::Convert(convert_parser()))
        .to_options()
        .command("convert")
        .help("Convert a disk image to a different container format");

    let ls = construct!(Command::Ls(ls_parser()))
        .to_options()
        .command("ls")
        .help("List files on a mounted filesystem");

    let extract = construct!(Command::Extract(extract_parser()))
        .to_options()
        .command("extract")
        .help("Extract a file from a mounted filesystem");

    let insert = construct!(Command::Insert(insert_parser()))
        .to_options()
        .command("insert")
        .help("Write a file into a mounted filesystem");

    let rm = construct!(Command::Rm(rm_parser()))
        .to_options()
        .command("rm")
        .help("Delete a file from a mounted filesystem");

    let rename = construct!(Command::Rename(rename_parser()))
        .to_options()
        .command("rename")
        .help("Rename a file on a mounted filesystem");

    let attrib = construct!(Command::Attrib(attrib_parser()))
        .to_options()
        .command("attrib")
        .help("Change a file's attribute bits on a mounted filesystem");

    let mkfs = construct!(Command::Mkfs(mkfs_parser()))
        .to_options()
        .command("mkfs")
        .help("Lay down a fresh, empty filesystem on a disk image");

    let command = construct!([detect, info, convert, ls, extract, insert, rm, rename, attrib, mkfs]);

    construct!(AppParams { global, command })
}
