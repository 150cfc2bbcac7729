//! The format codec layer: per-format decode/encode plus content sniffing.
//!
//! The rest of the crate only calls [`decode`], [`encode`], and [`sniff`];
//! dispatch on [`Format`] happens here so adding a format is a localized
//! change.

pub mod dbf;
pub mod delimited;
pub mod json;

use crate::dataset::Dataset;
use crate::error::{Result, TabcastError};
use crate::format::Format;
use crate::options::OptionBag;

/// An encoded output payload, text or binary depending on the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Text output (delimited, JSON)
    Text(String),
    /// Binary output (DBF)
    Binary(Vec<u8>),
}

impl Payload {
    /// Returns the payload's bytes regardless of kind.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(s) => s.as_bytes(),
            Payload::Binary(b) => b,
        }
    }

    /// Returns `true` if this is a binary payload.
    pub fn is_binary(&self) -> bool {
        matches!(self, Payload::Binary(_))
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Detects a format from a content sample, independent of filename.
///
/// Returns `None` when the sample matches nothing; sniffing never fails
/// hard, so resolution can fall back to the filename guess.
pub fn sniff(sample: &[u8]) -> Option<Format> {
    if sample.is_empty() {
        return None;
    }
    if dbf::looks_like_dbf(sample) {
        return Some(Format::Dbf);
    }
    let text = String::from_utf8_lossy(sample);
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Some(Format::Json);
    }
    // Delimited: score the first line by separator occurrences.
    let line = text.lines().next()?;
    let tabs = line.matches('\t').count();
    let commas = line.matches(',').count();
    if tabs > 0 && tabs >= commas {
        Some(Format::Tsv)
    } else if commas > 0 {
        Some(Format::Csv)
    } else {
        None
    }
}

/// Decodes raw input bytes into a [`Dataset`] using `format`'s codec.
///
/// `options` must already be filtered to the format's load-side
/// capability set.
pub fn decode(format: Format, bytes: &[u8], options: &OptionBag) -> Result<Dataset> {
    match format {
        Format::Csv | Format::Tsv => {
            let text = text_input(format, bytes)?;
            delimited::decode(format, &text, options)
        }
        Format::Json => {
            let text = text_input(format, bytes)?;
            json::decode(&text)
        }
        Format::Dbf => dbf::decode(bytes, options),
    }
}

/// Encodes a [`Dataset`] into an output payload using `format`'s codec.
///
/// `options` must already be filtered to the format's save-side
/// capability set.
pub fn encode(format: Format, data: &Dataset, options: &OptionBag) -> Result<Payload> {
    match format {
        Format::Csv | Format::Tsv => delimited::encode(format, data, options).map(Payload::Text),
        Format::Json => json::encode(data).map(Payload::Text),
        Format::Dbf => dbf::encode(data).map(Payload::Binary),
    }
}

fn text_input(format: Format, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| TabcastError::malformed(format, format!("input is not valid UTF-8: {e}")))
}
