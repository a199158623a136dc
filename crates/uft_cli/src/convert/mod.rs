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

use crate::args::{in_file_parser, out_file_parser, GlobalOptions};
use crate::io_util::{load_image, resolve_out_format, save_image};
use anyhow::Error;
use bpaf::{construct, long, Parser};

#[derive(Clone, Debug)]
pub(crate) struct ConvertParams {
    in_file: PathBuf,
    out_file: PathBuf,
    in_format: Option<String>,
    out_format: Option<String>,
}

pub(crate) fn convert_parser() -> impl Parser<ConvertParams> {
    let in_file = in_file_parser();
    let out_file = out_file_parser();
    let in_format = long("in_format")
        .help("Override the input container format, instead of inferring it")
        .argument::<String>("FORMAT")
        .optional();
    let out_format = long("out_format")
        .help("Override the output container format, instead of inferring it from out_file's extension")
        .argument::<String>("FORMAT")
        .optional();
    construct!(ConvertParams {
        in_file,
        out_file,
        in_format,
        out_format,
    })
}

pub(crate) fn run(global: &GlobalOptions, params: &ConvertParams) -> Result<(), Error> {
    let image = load_image(&params.in_file, params.in_format.as_deref())?;
    global.loud(|| println!("Loaded {} as {}", params.in_file.display(), image.format_name));

    let target_format = resolve_out_format(&params.out_file, params.out_format.as_deref())?;

    save_image(&image, &params.out_file, target_format)
        .map_err(|e| anyhow::anyhow!("target format {} cannot represent this disk image: {}", target_format, e))?;
    global.loud(|| println!("Wrote {} as {}", params.out_file.display(), target_format));

    Ok(())
}
