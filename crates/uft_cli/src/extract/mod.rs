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

use crate::args::{cpm_profile_parser, format_parser, in_file_parser, out_file_parser, platform_parser, user_parser, GlobalOptions};
use crate::io_util::load_image;
use crate::platform;
use anyhow::Error;
use bpaf::{construct, long, Parser};

#[derive(Clone, Debug)]
pub(crate) struct ExtractParams {
    in_file: PathBuf,
    out_file: PathBuf,
    format: Option<String>,
    platform: String,
    cpm_profile: Option<String>,
    user: Option<u8>,
    name: String,
}

pub(crate) fn extract_parser() -> impl Parser<ExtractParams> {
    let in_file = in_file_parser();
    let out_file = out_file_parser();
    let format = format_parser();
    let platform = platform_parser();
    let cpm_profile = cpm_profile_parser();
    let user = user_parser();
    let name = long("name").help("Name of the file to extract").argument::<String>("NAME");
    construct!(ExtractParams {
        in_file,
        out_file,
        format,
        platform,
        cpm_profile,
        user,
        name,
    })
}

pub(crate) fn run(global: &GlobalOptions, params: &ExtractParams) -> Result<(), Error> {
    let image = load_image(&params.in_file, params.format.as_deref())?;
    let fs = platform::mount(&params.platform, &image, params.cpm_profile.as_deref())?;

    // Confirm the file exists (scoped to the right user area on CP/M) before reading it,
    // so a typo'd name fails with FsError::NotFound instead of a partial read.
    let info = fs.find(&params.name, params.user)?;
    let data = fs.read_file(&params.name)?;
    std::fs::write(&params.out_file, &data)?;

    global.loud(|| println!("Extracted {} ({} bytes) to {}", info.name, data.len(), params.out_file.display()));

    Ok(())
}
