//! The conversion pipeline: load, save, and console export.
//!
//! One conversion runs start to finish on the calling thread and owns its
//! dataset and file handles exclusively. Encodes are fully buffered in
//! memory before the destination file is touched, so a failed encode
//! never leaves a truncated output file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::dataset::Dataset;
use crate::error::{Result, TabcastError};
use crate::format::Format;
use crate::options::{ConvertOptions, Side, filter_options};
use crate::resolve::{self, FormatMismatch};

/// A dataset loaded from a file, with the resolution details.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    /// The decoded rows
    pub dataset: Dataset,
    /// The format the input was decoded as
    pub format: Format,
    /// Set when the filename guess and the content sniff disagreed;
    /// informational only
    pub mismatch: Option<FormatMismatch>,
}

/// The result of saving a dataset to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// The destination path
    pub path: PathBuf,
    /// Number of data records written (headers excluded)
    pub records: usize,
    /// The format that was written
    pub format: Format,
}

/// Loads a file into a [`Dataset`], resolving its format first.
///
/// The content is re-read in the text-or-binary mode of the *resolved*
/// format: text formats require valid UTF-8, binary formats take the raw
/// bytes.
///
/// # Errors
///
/// `FormatUndetectable` when resolution fails, `Decode` when the codec
/// rejects the content, and `EmptyDataset` when decoding yields no rows
/// and no columns.
pub fn load_dataset(path: &Path, options: &ConvertOptions) -> Result<LoadedDataset> {
    let resolved = resolve::resolve_input_format(path)?;
    let format = resolved.format;

    let bytes = read_in_mode(path, format)?;
    let load_options = filter_options(options, format, Side::Load);
    let dataset = codec::decode(format, &bytes, &load_options).map_err(|e| e.with_path(path))?;
    if dataset.is_empty() {
        return Err(TabcastError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }
    Ok(LoadedDataset {
        dataset,
        format,
        mismatch: resolved.mismatch,
    })
}

/// Saves a dataset to `path`, deriving the format from `force_format` or
/// the path's extension.
///
/// # Errors
///
/// `TargetFormatUndetectable` when no format can be derived, `Encode`
/// when the codec fails, or an IO error writing the file.
pub fn save_dataset(
    data: &Dataset,
    path: &Path,
    force_format: Option<Format>,
    options: &ConvertOptions,
) -> Result<SaveReport> {
    let format = resolve::resolve_output_format(force_format, Some(path))?.ok_or_else(|| {
        TabcastError::TargetFormatUndetectable {
            path: path.to_path_buf(),
        }
    })?;
    let save_options = filter_options(options, format, Side::Save);
    let payload = codec::encode(format, data, &save_options)?;
    // Payload is complete before the file is created.
    fs::write(path, payload.as_bytes())?;
    Ok(SaveReport {
        path: path.to_path_buf(),
        records: data.len(),
        format,
    })
}

/// Exports a dataset to a console or other stream in `format`.
///
/// `interactive` says whether the stream is an interactive terminal;
/// binary formats refuse interactive destinations and pass through
/// unchanged otherwise.
///
/// # Errors
///
/// `BinaryToConsole` for a binary format on an interactive stream,
/// `Encode` when the codec fails, or an IO error writing the stream.
pub fn export_dataset<W: Write>(
    data: &Dataset,
    format: Format,
    options: &ConvertOptions,
    out: &mut W,
    interactive: bool,
) -> Result<()> {
    if format.is_binary() && interactive {
        return Err(TabcastError::BinaryToConsole { format });
    }
    let save_options = filter_options(options, format, Side::Save);
    let payload = codec::encode(format, data, &save_options)?;
    out.write_all(payload.as_bytes())?;
    Ok(())
}

fn read_in_mode(path: &Path, format: Format) -> Result<Vec<u8>> {
    if format.is_binary() {
        Ok(fs::read(path)?)
    } else {
        match fs::read_to_string(path) {
            Ok(text) => Ok(text.into_bytes()),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Err(TabcastError::malformed(
                format,
                "input is not valid UTF-8",
            )
            .with_path(path)),
            Err(e) => Err(e.into()),
        }
    }
}
