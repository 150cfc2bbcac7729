//! The format registry.
//!
//! [`Format`] enumerates every tabular format tabcast can read and write,
//! and records which of them are binary-encoded. The registry is a closed,
//! immutable set: unknown format tokens are rejected when they are parsed
//! and never reach a codec.
//!
//! # Example
//!
//! ```rust
//! use tabcast::format::Format;
//!
//! assert_eq!(Format::from_extension("csv"), Some(Format::Csv));
//! assert!(Format::Dbf.is_binary());
//! assert!(!Format::Tsv.is_binary());
//! ```

use serde::{Deserialize, Serialize};

/// A supported tabular file format.
///
/// The registry name of a format doubles as its file extension, so
/// `Format::Csv` matches `data.csv` and renders as `csv` in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Comma-separated values
    Csv,

    /// Tab-separated values
    Tsv,

    /// JSON array of row objects
    Json,

    /// dBase III table (binary)
    Dbf,
}

impl Format {
    /// Returns all registered formats.
    pub fn all() -> &'static [Format] {
        &[Format::Csv, Format::Tsv, Format::Json, Format::Dbf]
    }

    /// Returns the registry names of all formats, in registry order.
    pub fn names() -> Vec<&'static str> {
        Format::all().iter().map(|f| f.name()).collect()
    }

    /// Returns the registry name of this format (also its file extension).
    pub fn name(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Json => "json",
            Format::Dbf => "dbf",
        }
    }

    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        self.name()
    }

    /// Returns `true` if this format is binary-encoded rather than text.
    pub fn is_binary(&self) -> bool {
        matches!(self, Format::Dbf)
    }

    /// Looks up a format by file extension.
    ///
    /// The extension must exactly equal a registry name; matching is
    /// case-sensitive, so `"CSV"` yields `None`.
    pub fn from_extension(ext: &str) -> Option<Format> {
        Format::all().iter().copied().find(|f| f.name() == ext)
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_extension(s).ok_or_else(|| {
            format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                Format::names().join(", ")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_registry_is_complete() {
        let all = Format::all();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&Format::Csv));
        assert!(all.contains(&Format::Tsv));
        assert!(all.contains(&Format::Json));
        assert!(all.contains(&Format::Dbf));
    }

    #[test]
    fn test_names_match_extensions() {
        for format in Format::all() {
            assert_eq!(format.name(), format.extension());
            assert_eq!(Format::from_extension(format.name()), Some(*format));
        }
    }

    #[test]
    fn test_binary_flags() {
        assert!(Format::Dbf.is_binary());
        assert!(!Format::Csv.is_binary());
        assert!(!Format::Tsv.is_binary());
        assert!(!Format::Json.is_binary());
    }

    #[test]
    fn test_from_extension_is_case_sensitive() {
        assert_eq!(Format::from_extension("csv"), Some(Format::Csv));
        assert_eq!(Format::from_extension("CSV"), None);
        assert_eq!(Format::from_extension("Csv"), None);
        assert_eq!(Format::from_extension("xlsx"), None);
        assert_eq!(Format::from_extension(""), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Format::from_str("tsv").unwrap(), Format::Tsv);
        assert_eq!(Format::from_str("dbf").unwrap(), Format::Dbf);

        let err = Format::from_str("parquet").unwrap_err();
        assert!(err.contains("parquet"));
        assert!(err.contains("csv, tsv, json, dbf"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Format::Csv.to_string(), "csv");
        assert_eq!(Format::Dbf.to_string(), "dbf");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Format::Tsv).unwrap();
        assert_eq!(json, "\"tsv\"");

        let parsed: Format = serde_json::from_str("\"dbf\"").unwrap();
        assert_eq!(parsed, Format::Dbf);
    }
}
