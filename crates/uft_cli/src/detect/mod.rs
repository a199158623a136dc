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

use crate::args::in_file_parser;
use crate::args::GlobalOptions;
use anyhow::{anyhow, Error};
use bpaf::{construct, long, Parser};
use uft::detect_format;

#[derive(Clone, Debug)]
pub(crate) struct DetectParams {
    in_file: PathBuf,
    all: bool,
}

pub(crate) fn detect_parser() -> impl Parser<DetectParams> {
    let in_file = in_file_parser();
    let all = long("all").help("List every candidate format, not just the best match").switch();
    construct!(DetectParams { in_file, all })
}

pub(crate) fn run(global: &GlobalOptions, params: &DetectParams) -> Result<(), Error> {
    let data = std::fs::read(&params.in_file).map_err(|e| anyhow!("reading {}: {}", params.in_file.display(), e))?;
    let filename = params.in_file.to_string_lossy();
    let result = detect_format(&data, Some(filename.as_ref()));

    if result.candidates.is_empty() {
        global.loud(|| println!("No format candidates matched {}", params.in_file.display()));
        return Ok(());
    }

    if params.all {
        for candidate in &result.candidates {
            println!(
                "{:<20} confidence={:.2} variant={} ({})",
                candidate.format.to_string(),
                candidate.confidence,
                candidate.variant,
                candidate.reason
            );
        }
    }
    else if let Some(best) = result.best_candidate() {
        println!("{} (confidence={:.2})", best.format, best.confidence);
    }

    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }

    Ok(())
}
