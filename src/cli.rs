//! Command-line interface definition using clap.
//!
//! The argument surface is thin glue: it collects the option bag, two
//! filenames, and an optional explicit format, and validates the
//! combinations that clap cannot express on its own. All decision logic
//! lives in [`crate::resolve`] and [`crate::pipeline`].

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::dataset::TableStyle;
use crate::format::Format;
use crate::options::ConvertOptions;

/// Convert tabular data files between formats.
///
/// If no outfile is specified the result is printed instead, either in
/// the requested format, or pretty-printed as a table.
#[derive(Parser, Debug, Clone)]
#[command(name = "tabcast")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    tabcast data.csv data.json
    tabcast data.tsv -f csv
    tabcast --no-headers raw.csv table.dbf
    tabcast data.csv --style grid
    tabcast --list")]
pub struct Args {
    /// Input (source) file
    pub infile: Option<PathBuf>,

    /// Output (destination) file
    pub outfile: Option<PathBuf>,

    /// List the available file formats and exit
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Output format (default: file extension from outfile, if provided)
    #[arg(short = 'f', long, value_enum, value_name = "FORMAT")]
    pub format: Option<Format>,

    /// Use this option when your CSV/TSV input data has no header row
    #[arg(long)]
    pub no_headers: bool,

    /// Field delimiter for delimited input/output
    #[arg(short = 'd', long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Quote character for delimited input/output
    #[arg(short = 'q', long, value_name = "CHAR")]
    pub quote: Option<char>,

    /// Skip this many lines before parsing delimited input
    #[arg(long, value_name = "N")]
    pub skip_lines: Option<usize>,

    /// Delimited dialect preset (excel, excel-tab, unix)
    #[arg(long, value_name = "NAME")]
    pub dialect: Option<String>,

    /// Trust binary file headers instead of validating every record
    #[arg(long)]
    pub fast: bool,

    /// Console table style
    #[arg(short = 's', long, value_enum, value_name = "STYLE")]
    pub style: Option<TableStyle>,
}

/// What the process should do, derived from validated arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    /// Print the format registry and exit
    List,
    /// Run a conversion reading from `infile`
    Convert {
        /// The validated input file
        infile: &'a Path,
    },
}

impl Args {
    /// Cross-validates the argument combination and returns the mode to
    /// run in.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when `--list` is combined with
    /// filenames, when no input file is given, or when the input file
    /// does not exist.
    pub fn mode(&self) -> Result<Mode<'_>, String> {
        if self.list {
            if self.infile.is_some() || self.outfile.is_some() {
                return Err("Can not combine --list with filename(s)".to_string());
            }
            return Ok(Mode::List);
        }
        let Some(infile) = self.infile.as_deref() else {
            return Err("No input data provided.".to_string());
        };
        if !infile.is_file() {
            return Err(format!("Input file {} does not exist.", infile.display()));
        }
        Ok(Mode::Convert { infile })
    }

    /// Collects the option bag from the flags; untouched flags stay
    /// unset so the option filter can tell them apart from explicit
    /// falsy values.
    pub fn to_options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new();
        if self.no_headers {
            options.headers = Some(false);
        }
        if self.fast {
            options.fast = Some(true);
        }
        options.delimiter = self.delimiter;
        options.quotechar = self.quote;
        options.skip_lines = self.skip_lines;
        options.dialect = self.dialect.clone();
        options.style = self.style;
        options
    }
}
