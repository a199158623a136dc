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
//! Maps a `--platform` name to the right [`FileSystem`] constructor.
//!
//! Each filesystem module owns its own `mount` associated function; this is the one place
//! that knows the full list of platform names and wires them together, so every other
//! subcommand just asks for a `Box<dyn FileSystem>` without caring which one it got.

use anyhow::{anyhow, bail, Error};
use uft::filesystem::{
    apple_dos33::AppleDos33FileSystem, atari_dos::AtariDosFileSystem, atari_st_fat::AtariStFileSystem,
    bbc_dfs::BbcDfsFileSystem, cpm::CpmFileSystem, fat12::Fat12FileSystem, human68k::Human68kFileSystem,
    prodos::ProdosFileSystem, trsdos::TrsdosFileSystem, FileSystem,
};
use uft::DiskImage;

/// Mount `image` as the named platform's filesystem.
///
/// `cpm_profile` is required (and only meaningful) when `platform` is `"cpm"`; it selects
/// which machine's [`uft::cpm::Dpb`] describes the directory layout.
pub(crate) fn mount(platform: &str, image: &DiskImage, cpm_profile: Option<&str>) -> Result<Box<dyn FileSystem>, Error> {
    let fs: Box<dyn FileSystem> = match platform {
        "apple-dos33" | "apple_dos33" => Box::new(AppleDos33FileSystem::mount(image)?),
        "atari-dos" | "atari_dos" => Box::new(AtariDosFileSystem::mount(image)?),
        "atari-st" | "atari_st" => Box::new(AtariStFileSystem::mount(image)?),
        "bbc-dfs" | "bbc_dfs" => Box::new(BbcDfsFileSystem::mount(image)?),
        "cpm" => {
            let profile_name = cpm_profile.ok_or_else(|| anyhow!("--platform cpm requires --cpm_profile"))?;
            let def = uft::cpm::disk_definition(profile_name)
                .ok_or_else(|| anyhow!("unknown CP/M disk definition: {}", profile_name))?;
            Box::new(CpmFileSystem::mount(image, def.dpb)?)
        }
        "fat12" => Box::new(Fat12FileSystem::mount(image)?),
        "human68k" => Box::new(Human68kFileSystem::mount(image)?),
        "prodos" => Box::new(ProdosFileSystem::mount(image)?),
        "trsdos" => Box::new(TrsdosFileSystem::mount(image)?),
        other => bail!(
            "unknown platform '{}'; expected one of: apple-dos33, atari-dos, atari-st, bbc-dfs, cpm, fat12, human68k, prodos, trsdos",
            other
        ),
    };
    Ok(fs)
}
