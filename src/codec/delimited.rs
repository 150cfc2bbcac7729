//! Delimited-text codec (CSV and TSV), built on the `csv` crate.
//!
//! Recognized load options: `headers`, `delimiter`, `quotechar`,
//! `skip_lines`, `dialect` (CSV); `headers`, `skip_lines` (TSV).
//! Recognized save options: `delimiter`, `quotechar`, `dialect` (CSV).
//! An explicit delimiter or quote character overrides the dialect preset.

use crate::dataset::Dataset;
use crate::error::{Result, TabcastError};
use crate::format::Format;
use crate::options::{self, OptionBag};

/// A delimited dialect preset, mirroring the classic spreadsheet-world
/// dialect names.
struct Dialect {
    delimiter: u8,
    terminator: csv::Terminator,
    quote_all: bool,
}

fn dialect_preset(name: &str) -> Option<Dialect> {
    match name {
        "excel" => Some(Dialect {
            delimiter: b',',
            terminator: csv::Terminator::CRLF,
            quote_all: false,
        }),
        "excel-tab" => Some(Dialect {
            delimiter: b'\t',
            terminator: csv::Terminator::CRLF,
            quote_all: false,
        }),
        "unix" => Some(Dialect {
            delimiter: b',',
            terminator: csv::Terminator::Any(b'\n'),
            quote_all: true,
        }),
        _ => None,
    }
}

fn default_delimiter(format: Format) -> u8 {
    match format {
        Format::Tsv => b'\t',
        _ => b',',
    }
}

fn byte_option(format: Format, key: &str, options: &OptionBag) -> Result<Option<u8>> {
    match options.character(key) {
        None => Ok(None),
        Some(c) => u8::try_from(c).map(Some).map_err(|_| {
            TabcastError::malformed(format, format!("{key} must be a single ASCII character"))
        }),
    }
}

fn resolve_dialect(format: Format, options: &OptionBag) -> Result<Option<Dialect>> {
    match options.name(options::DIALECT) {
        None => Ok(None),
        Some(name) => dialect_preset(name)
            .map(Some)
            .ok_or_else(|| TabcastError::malformed(format, format!("unknown dialect '{name}'"))),
    }
}

/// Decodes delimited text into a dataset.
pub fn decode(format: Format, text: &str, options: &OptionBag) -> Result<Dataset> {
    let dialect = resolve_dialect(format, options)?;
    let delimiter = byte_option(format, options::DELIMITER, options)?
        .or(dialect.as_ref().map(|d| d.delimiter))
        .unwrap_or_else(|| default_delimiter(format));
    let quote = byte_option(format, options::QUOTECHAR, options)?.unwrap_or(b'"');
    let has_headers = options.flag(options::HEADERS).unwrap_or(true);
    let text = skip_lines(text, options.count(options::SKIP_LINES).unwrap_or(0));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut data = Dataset::new();
    if has_headers {
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| TabcastError::decode(format, e))?
            .iter()
            .map(str::to_string)
            .collect();
        if !headers.is_empty() {
            data.set_headers(headers);
        }
    }
    for record in reader.records() {
        let record = record.map_err(|e| TabcastError::decode(format, e))?;
        data.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(data)
}

/// Encodes a dataset as delimited text.
pub fn encode(format: Format, data: &Dataset, options: &OptionBag) -> Result<String> {
    let dialect = resolve_dialect(format, options)?;
    let delimiter = byte_option(format, options::DELIMITER, options)?
        .or(dialect.as_ref().map(|d| d.delimiter))
        .unwrap_or_else(|| default_delimiter(format));
    let quote = byte_option(format, options::QUOTECHAR, options)?.unwrap_or(b'"');

    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).quote(quote).flexible(true);
    if let Some(d) = &dialect {
        builder.terminator(d.terminator);
        if d.quote_all {
            builder.quote_style(csv::QuoteStyle::Always);
        }
    }

    let mut buf = Vec::new();
    {
        let mut writer = builder.from_writer(&mut buf);
        if let Some(headers) = data.headers() {
            writer
                .write_record(headers)
                .map_err(|e| TabcastError::encode(format, e))?;
        }
        for row in data.rows() {
            writer
                .write_record(row)
                .map_err(|e| TabcastError::encode(format, e))?;
        }
        writer.flush()?;
    }
    String::from_utf8(buf)
        .map_err(|e| TabcastError::unrepresentable(format, format!("output is not valid UTF-8: {e}")))
}

fn skip_lines(text: &str, n: usize) -> &str {
    let mut rest = text;
    for _ in 0..n {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}
