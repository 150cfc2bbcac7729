//! Format resolution: deciding which format to decode from and encode to.
//!
//! The input format comes from two independent signals, a filename
//! extension guess and a content sniff. When they disagree the sniffed
//! format wins and the discrepancy is reported as a [`FormatMismatch`] —
//! the only non-fatal diagnostic in the crate. A sniff that matches
//! nothing simply yields no value and resolution falls back to the guess.
//!
//! The output format comes from an explicit override, then the output
//! filename's extension, then `None`, which means "render the dataset
//! for console display" rather than a codec export.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::codec;
use crate::error::{Result, TabcastError};
use crate::format::Format;

/// How many bytes of content the sniffer samples.
pub const SNIFF_SAMPLE_LEN: usize = 8192;

/// A non-fatal discrepancy between the filename guess and the sniffed
/// content format. Conversion proceeds with the sniffed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatMismatch {
    /// Format guessed from the filename extension
    pub guessed: Format,
    /// Format detected from the content (this one is used)
    pub sniffed: Format,
}

impl std::fmt::Display for FormatMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "filename suggests {} but content looks like {}; using {}",
            self.guessed, self.sniffed, self.sniffed
        )
    }
}

/// The outcome of input-format resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedInput {
    /// The format the input will be decoded as
    pub format: Format,
    /// Set when the filename guess and the content sniff disagreed
    pub mismatch: Option<FormatMismatch>,
}

/// Guesses a format from a filename's extension.
///
/// The extension must exactly equal a registry name (case-sensitive); an
/// absent or unmatched extension yields no guess.
pub fn guess_format(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .and_then(Format::from_extension)
}

/// Resolves the input format for `path` from its extension and a content
/// sample.
///
/// The sample is read once here; the caller re-reads the file in the
/// text-or-binary mode of the *resolved* format before decoding, since
/// the extension guess may have been wrong.
///
/// # Errors
///
/// Returns [`TabcastError::FormatUndetectable`] when neither signal
/// produces a format, or an IO error if the sample cannot be read.
pub fn resolve_input_format(path: &Path) -> Result<ResolvedInput> {
    let guessed = guess_format(path);
    let sample = read_sample(path)?;
    let sniffed = codec::sniff(&sample);

    match (guessed, sniffed) {
        (Some(guessed), Some(sniffed)) if guessed != sniffed => Ok(ResolvedInput {
            format: sniffed,
            mismatch: Some(FormatMismatch { guessed, sniffed }),
        }),
        (_, Some(format)) | (Some(format), None) => Ok(ResolvedInput {
            format,
            mismatch: None,
        }),
        (None, None) => Err(TabcastError::FormatUndetectable {
            path: path.to_path_buf(),
        }),
    }
}

/// Resolves the output format.
///
/// An explicit override always wins; otherwise the output filename's
/// extension decides. `Ok(None)` means console rendering and is only
/// possible when no output filename is given.
///
/// # Errors
///
/// Returns [`TabcastError::TargetFormatUndetectable`] when an output
/// filename is present but its extension does not name a format and no
/// override was given.
pub fn resolve_output_format(
    explicit: Option<Format>,
    out_path: Option<&Path>,
) -> Result<Option<Format>> {
    if let Some(format) = explicit {
        return Ok(Some(format));
    }
    match out_path {
        Some(path) => guess_format(path).map(Some).ok_or_else(|| {
            TabcastError::TargetFormatUndetectable {
                path: path.to_path_buf(),
            }
        }),
        None => Ok(None),
    }
}

fn read_sample(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(SNIFF_SAMPLE_LEN);
    file.take(SNIFF_SAMPLE_LEN as u64).read_to_end(&mut sample)?;
    Ok(sample)
}
