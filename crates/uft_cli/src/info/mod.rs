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

use crate::args::{format_parser, in_file_parser, GlobalOptions};
use crate::io_util::load_image;
use anyhow::Error;
use bpaf::{construct, Parser};

#[derive(Clone, Debug)]
pub(crate) struct InfoParams {
    in_file: PathBuf,
    format: Option<String>,
}

pub(crate) fn info_parser() -> impl Parser<InfoParams> {
    let in_file = in_file_parser();
    let format = format_parser();
    construct!(InfoParams { in_file, format })
}

pub(crate) fn run(global: &GlobalOptions, params: &InfoParams) -> Result<(), Error> {
    let image = load_image(&params.in_file, params.format.as_deref())?;

    global.loud(|| println!("Format:   {}", image.format_name));
    global.loud(|| println!("Geometry: {}", image.geometry));

    let summary = image.summarize();
    println!("Sectors OK:      {}", summary.sectors_ok);
    println!("Sectors bad:     {}", summary.sectors_bad);
    println!("  CRC errors:    {}", summary.crc_errors);
    println!("  Missing:       {}", summary.missing);

    if image.consistency.weak_bits_present {
        println!("Weak bits present on this disk.");
    }
    if image.consistency.deleted_sectors_present {
        println!("Deleted-data sectors present on this disk.");
    }
    match image.consistency.consistent_sector_size {
        Some(size) => println!("Consistent sector size: {} bytes", size),
        None => println!("Sector size varies across tracks."),
    }

    if !image.metadata.is_empty() {
        println!("Metadata:");
        for (key, value) in &image.metadata {
            println!("  {}: {}", key, value);
        }
    }

    Ok(())
}
