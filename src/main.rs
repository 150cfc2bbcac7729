//! # tabcast CLI
//!
//! Command-line interface for the tabcast library.

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process;

use clap::Parser;

use tabcast::cli::{Args, Mode};
use tabcast::format::Format;
use tabcast::pipeline::{export_dataset, load_dataset, save_dataset};
use tabcast::{Result, TabcastError};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("error: {message}");
            process::exit(2);
        }
    };

    match mode {
        Mode::List => {
            println!("Available formats: {}", Format::names().join(" "));
            Ok(())
        }
        Mode::Convert { infile } => convert(&args, infile),
    }
}

fn convert(args: &Args, infile: &Path) -> Result<()> {
    let options = args.to_options();

    let loaded = load_dataset(infile, &options)?;
    if let Some(mismatch) = loaded.mismatch {
        eprintln!("Warning: {mismatch}");
    }

    if let Some(outfile) = &args.outfile {
        let report = save_dataset(&loaded.dataset, outfile, args.format, &options)?;
        println!(
            "Saved '{}', {} records ({})",
            report.path.display(),
            report.records,
            report.format
        );
    } else if let Some(format) = args.format {
        let stdout = io::stdout();
        let interactive = stdout.is_terminal();
        let mut handle = stdout.lock();
        export_dataset(&loaded.dataset, format, &options, &mut handle, interactive)?;
        handle.flush().map_err(TabcastError::Io)?;
    } else {
        print!(
            "{}",
            loaded.dataset.render(options.style.unwrap_or_default())
        );
    }
    Ok(())
}
