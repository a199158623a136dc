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
//! Shared path-to-format resolution and load/save helpers used by most subcommands.

use anyhow::{anyhow, bail, Error};
use std::path::Path;
use uft::file_parsers::{load_by_format, save_by_format};
use uft::{detect_format, DiskImage, DiskImageFormat};

/// Resolve the container format for `path`, preferring an explicit `--format` override,
/// then the file extension, then content-based detection.
pub(crate) fn resolve_format(path: &Path, explicit: Option<&str>, data: &[u8]) -> Result<DiskImageFormat, Error> {
    if let Some(ext) = explicit {
        let candidates = uft::types::format::formats_from_ext(ext);
        return candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("unrecognized format override: {}", ext));
    }

    let filename = path.to_string_lossy();
    let result = detect_format(data, Some(filename.as_ref()));
    match result.best_candidate() {
        Some(candidate) => Ok(candidate.format),
        None => bail!(
            "could not determine the container format of {}; pass --format to override",
            path.display()
        ),
    }
}

/// Read `path` and decode it as a [`DiskImage`], resolving its format as described in
/// [`resolve_format`].
pub(crate) fn load_image(path: &Path, format_override: Option<&str>) -> Result<DiskImage, Error> {
    let data = std::fs::read(path).map_err(|e| anyhow!("reading {}: {}", path.display(), e))?;
    let format = resolve_format(path, format_override, &data)?;
    let image = load_by_format(format, &data).map_err(|e| anyhow!("decoding {} as {}: {}", path.display(), format, e))?;
    Ok(image)
}

/// Encode `image` as `format` and write it to `path`.
pub(crate) fn save_image(image: &DiskImage, path: &Path, format: DiskImageFormat) -> Result<(), Error> {
    let bytes = save_by_format(format, image).map_err(|e| anyhow!("encoding {} as {}: {}", path.display(), format, e))?;
    std::fs::write(path, bytes).map_err(|e| anyhow!("writing {}: {}", path.display(), e))?;
    Ok(())
}

/// Resolve the output format for a save, preferring an explicit override then the output
/// path's extension.
pub(crate) fn resolve_out_format(path: &Path, explicit: Option<&str>) -> Result<DiskImageFormat, Error> {
    if let Some(ext) = explicit {
        return uft::types::format::formats_from_ext(ext)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("unrecognized format override: {}", ext));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("{} has no file extension; pass --format to specify one", path.display()))?;
    uft::types::format::formats_from_ext(ext)
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("unrecognized output extension: {}", ext))
}
