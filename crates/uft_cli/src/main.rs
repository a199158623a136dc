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
mod args;
mod attrib;
mod convert;
mod detect;
mod extract;
mod info;
mod insert;
mod io_util;
mod ls;
mod mkfs;
mod platform;
mod rename;
mod rm;

use args::Command;
use bpaf::Parser;

fn main() {
    env_logger::init();

    let params = args::command_parser().to_options().run();
    log::debug!("Running command: {}", params.command);

    let result = match &params.command {
        Command::Detect(p) => detect::run(&params.global, p),
        Command::Info(p) => info::run(&params.global, p),
        Command::Convert(p) => convert::run(&params.global, p),
        Command::Ls(p) => ls::run(&params.global, p),
        Command::Extract(p) => extract::run(&params.global, p),
        Command::Insert(p) => insert::run(&params.global, p),
        Command::Rm(p) => rm::run(&params.global, p),
        Command::Rename(p) => rename::run(&params.global, p),
        Command::Attrib(p) => attrib::run(&params.global, p),
        Command::Mkfs(p) => mkfs::run(&params.global, p),
    };

    if let Err(e) = result {
        eprintln!("Error running {} command: {:#}", params.command, e);
        std::process::exit(1);
    }
}
