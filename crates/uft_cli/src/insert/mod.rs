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
use crate::io_util::load_image;
use crate::platform;
use anyhow::Error;
use bpaf::{construct, long, Parser};

#[derive(Clone, Debug)]
pub(crate) struct InsertParams {
    in_file: PathBuf,
    format: Option<String>,
    platform: String,
    cpm_profile: Option<String>,
    name: String,
    source: PathBuf,
}

pub(crate) fn insert_parser() -> impl Parser<InsertParams> {
    let in_file = in_file_parser();
    let format = format_parser();
    let platform = platform_parser();
    let cpm_profile = cpm_profile_parser();
    let name = long("name").help("Name the file will be stored under").argument::<String>("NAME");
    let source = long("source").help("Local file to read the contents from").argument::<PathBuf>("SOURCE");
    construct!(InsertParams {
        in_file,
        format,
        platform,
        cpm_profile,
        name,
        source,
    })
}

pub(crate) fn run(global: &GlobalOptions, params: &InsertParams) -> Result<(), Error> {
    let image = load_image(&params.in_file, params.format.as_deref())?;
    let format = image.format;
    let mut fs = platform::mount(&params.platform, &image, params.cpm_profile.as_deref())?;

    let data = std::fs::read(&params.source)?;
    fs.write_file(&params.name, &data)?;
    global.loud(|| println!("Wrote {} ({} bytes) into {}", params.name, data.len(), params.in_file.display()));

    crate::io_util::save_image(fs.image(), &params.in_file, format)?;

    Ok(())
}
