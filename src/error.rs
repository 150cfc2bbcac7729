//! Unified error types for tabcast.
//!
//! This module provides a single [`TabcastError`] enum that covers all error
//! cases in the library. Every failure is terminal for the current
//! conversion; the one non-fatal condition (a guessed/sniffed format
//! mismatch) is not an error at all and is reported as data by the
//! resolver instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::Format;

/// A specialized [`Result`] type for tabcast operations.
pub type Result<T> = std::result::Result<T, TabcastError>;

/// The error type for all tabcast operations.
///
/// Each variant carries context about what went wrong and, where applicable,
/// the underlying source error from the codec layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TabcastError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Neither the input filename's extension nor the file content
    /// identified a supported format.
    #[error("Unable to detect input format for {}", path.display())]
    FormatUndetectable {
        /// The input file whose format could not be determined
        path: PathBuf,
    },

    /// An output filename was given but its extension does not name a
    /// supported format and no explicit format override was provided.
    #[error("Unable to detect target file format for: {}", path.display())]
    TargetFormatUndetectable {
        /// The output file whose format could not be determined
        path: PathBuf,
    },

    /// The codec rejected the input content.
    #[error("Failed to decode {format} input{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Decode {
        /// The format that was being decoded
        format: Format,
        /// The underlying codec diagnostic
        #[source]
        source: DecodeErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// Decode succeeded but produced no rows and no declared columns.
    #[error("No data was loaded from {}", path.display())]
    EmptyDataset {
        /// The input file that yielded nothing usable
        path: PathBuf,
    },

    /// A binary payload would have been written to an interactive console.
    #[error("Format {format} is binary, not printing to console")]
    BinaryToConsole {
        /// The resolved output format
        format: Format,
    },

    /// The codec failed to produce output.
    #[error("Failed to encode {format} output: {source}")]
    Encode {
        /// The format that was being encoded
        format: Format,
        /// The underlying codec diagnostic
        #[source]
        source: EncodeErrorKind,
    },
}

/// Kinds of decode errors the codec layer can report.
#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    /// Delimited-text parsing error
    #[error("{0}")]
    Csv(#[from] csv::Error),
    /// JSON parsing error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Structurally invalid content for the format
    #[error("{0}")]
    Malformed(String),
}

/// Kinds of encode errors the codec layer can report.
#[derive(Debug, Error)]
pub enum EncodeErrorKind {
    /// Delimited-text writing error
    #[error("{0}")]
    Csv(#[from] csv::Error),
    /// JSON serialization error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The dataset cannot be represented in the target format
    #[error("{0}")]
    Unrepresentable(String),
}

impl TabcastError {
    /// Creates a decode error without a file path.
    pub fn decode(format: Format, source: impl Into<DecodeErrorKind>) -> Self {
        TabcastError::Decode {
            format,
            source: source.into(),
            path: None,
        }
    }

    /// Creates a decode error for structurally invalid content.
    pub fn malformed(format: Format, message: impl Into<String>) -> Self {
        TabcastError::Decode {
            format,
            source: DecodeErrorKind::Malformed(message.into()),
            path: None,
        }
    }

    /// Creates an encode error.
    pub fn encode(format: Format, source: impl Into<EncodeErrorKind>) -> Self {
        TabcastError::Encode {
            format,
            source: source.into(),
        }
    }

    /// Creates an encode error for an unrepresentable dataset.
    pub fn unrepresentable(format: Format, message: impl Into<String>) -> Self {
        TabcastError::Encode {
            format,
            source: EncodeErrorKind::Unrepresentable(message.into()),
        }
    }

    /// Attaches a file path to a decode error that lacks one.
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            TabcastError::Decode {
                format,
                source,
                path: None,
            } => TabcastError::Decode {
                format,
                source,
                path: Some(path.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, TabcastError::Io(_))
    }

    /// Returns `true` if this is a decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self, TabcastError::Decode { .. })
    }

    /// Returns `true` if this is an encode error.
    pub fn is_encode(&self) -> bool {
        matches!(self, TabcastError::Encode { .. })
    }

    /// Returns `true` if the input format could not be determined.
    pub fn is_format_undetectable(&self) -> bool {
        matches!(self, TabcastError::FormatUndetectable { .. })
    }

    /// Returns `true` if decoding yielded an empty dataset.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, TabcastError::EmptyDataset { .. })
    }
}
