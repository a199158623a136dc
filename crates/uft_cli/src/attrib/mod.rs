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
use std::path::PathBuf;

use crate::args::{cpm_profile_parser, format_parser, in_file_parser, platform_parser, GlobalOptions};
use crate::io_util::{load_image, save_image};
use crate::platform;
use anyhow::Error;
use bpaf::{construct, long, Parser};
use uft::filesystem::FileAttributes;

#[derive(Clone, Debug)]
pub(crate) struct AttribParams {
    in_file: PathBuf,
    format: Option<String>,
    platform: String,
    cpm_profile: Option<String>,
    name: String,
    read_only: bool,
    hidden: bool,
    system: bool,
    archive: bool,
}

pub(crate) fn attrib_parser() -> impl Parser<AttribParams> {
    let in_file = in_file_parser();
    let format = format_parser();
    let platform = platform_parser();
    let cpm_profile = cpm_profile_parser();
    let name = long("name").help("Name of the file to change attributes on").argument::<String>("NAME");
    let read_only = long("read_only").help("Set the read-only bit").switch();
    let hidden = long("hidden").help("Set the hidden bit").switch();
    let system = long("system").help("Set the system bit").switch();
    let archive = long("archive").help("Set the archive bit").switch();
    construct!(AttribParams {
        in_file,
        format,
        platform,
        cpm_profile,
        name,
        read_only,
        hidden,
        system,
        archive,
    })
}

pub(crate) fn run(global: &GlobalOptions, params: &AttribParams) -> Result<(), Error> {
    let image = load_image(&params.in_file, params.format.as_deref())?;
    let format = image.format;
    let mut fs = platform::mount(&params.platform, &image, params.cpm_profile.as_deref())?;

    let mut attributes = FileAttributes::empty();
    attributes.set(FileAttributes::READ_ONLY, params.read_only);
    attributes.set(FileAttributes::HIDDEN, params.hidden);
    attributes.set(FileAttributes::SYSTEM, params.system);
    attributes.set(FileAttributes::ARCHIVE, params.archive);

    fs.set_attributes(&params.name, attributes)?;
    global.loud(|| println!("Updated attributes on {}: {:?}", params.name, attributes));

    save_image(fs.image(), &params.in_file, format)?;

    Ok(())
}
