//! # tabcast
//!
//! Convert tabular data files between formats by resolving formats from
//! filenames and content, loading records into an in-memory [`Dataset`],
//! and re-emitting them in a target format — or rendering them as a
//! human-readable table when no target is given.
//!
//! ## Overview
//!
//! Supported formats: CSV, TSV, JSON, and dBase III (DBF, binary).
//! The interesting part is not the codecs but the dispatch around them:
//!
//! - the input format is resolved from the filename extension *and* a
//!   content sniff; when they disagree, the content wins and the
//!   discrepancy is reported without aborting;
//! - the output format comes from an explicit override, the output
//!   filename, or falls back to console rendering;
//! - each format's codec only ever sees the options it recognizes,
//!   filtered per side (load/save) through a static capability table;
//! - binary formats are read and written in binary mode, refuse
//!   interactive consoles, and pass through redirected ones unchanged.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabcast::options::ConvertOptions;
//! use tabcast::pipeline::{load_dataset, save_dataset};
//!
//! fn main() -> tabcast::Result<()> {
//!     let options = ConvertOptions::new();
//!     let loaded = load_dataset("people.csv".as_ref(), &options)?;
//!     if let Some(mismatch) = loaded.mismatch {
//!         eprintln!("Warning: {mismatch}");
//!     }
//!     let report = save_dataset(&loaded.dataset, "people.json".as_ref(), None, &options)?;
//!     println!("wrote {} records", report.records);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`format`] — the format registry ([`Format`])
//! - [`resolve`] — input/output format resolution
//! - [`options`] — the option bag and the per-format option filter
//! - [`dataset`] — the in-memory table and console rendering
//! - [`codec`] — per-format decode/encode and content sniffing
//! - [`pipeline`] — load / save / console-export orchestration
//! - [`error`] — unified error types ([`TabcastError`], [`Result`])
//! - [`cli`] — CLI argument types (requires the `cli` feature)

pub mod codec;
pub mod dataset;
pub mod error;
pub mod format;
pub mod options;
pub mod pipeline;
pub mod resolve;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main types at the crate root for convenience
pub use dataset::Dataset;
pub use error::{Result, TabcastError};
pub use format::Format;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use tabcast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dataset::{Dataset, TableStyle};
    pub use crate::error::{Result, TabcastError};
    pub use crate::format::Format;
    pub use crate::options::{ConvertOptions, Side, filter_options};
    pub use crate::pipeline::{
        LoadedDataset, SaveReport, export_dataset, load_dataset, save_dataset,
    };
    pub use crate::resolve::{FormatMismatch, resolve_input_format, resolve_output_format};
}
