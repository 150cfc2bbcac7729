//! User-supplied conversion options and the per-format option filter.
//!
//! [`ConvertOptions`] is the full bag of options the CLI surface collects.
//! Every field is an `Option` so that "unset" stays distinct from a falsy
//! value: `--no-headers` produces `Some(false)`, which must reach the
//! codec, while an untouched flag produces `None`, which must not.
//!
//! [`filter_options`] narrows the bag down to what one format's codec
//! accepts on one side (load or save), using a static capability table.
//! Options outside a format's capability set are silently dropped, never
//! an error, so adding a new option to one codec cannot break another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::TableStyle;
use crate::format::Format;

/// Option key: header-row presence flag (`bool`).
pub const HEADERS: &str = "headers";
/// Option key: field delimiter (`char`).
pub const DELIMITER: &str = "delimiter";
/// Option key: quote character (`char`).
pub const QUOTECHAR: &str = "quotechar";
/// Option key: number of leading lines to skip (`usize`).
pub const SKIP_LINES: &str = "skip_lines";
/// Option key: delimited dialect preset name (`String`).
pub const DIALECT: &str = "dialect";
/// Option key: read-optimization flag (`bool`).
pub const FAST: &str = "fast";
/// Option key: console table style name (`String`).
///
/// Present in the bag but in no capability set; the console renderer
/// consumes it directly and codecs never see it.
pub const STYLE: &str = "style";

/// Which side of a conversion an option applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Decoding input into a dataset
    Load,
    /// Encoding a dataset into output
    Save,
}

/// A single option value, typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionValue {
    /// Boolean flag
    Flag(bool),
    /// Single character
    Char(char),
    /// Non-negative count
    Count(usize),
    /// Free-form name
    Name(String),
}

/// The full set of user-supplied options, all optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions {
    /// Whether the first data row is a header row
    pub headers: Option<bool>,
    /// Field delimiter for delimited formats
    pub delimiter: Option<char>,
    /// Quote character for delimited formats
    pub quotechar: Option<char>,
    /// Leading lines to skip before parsing delimited input
    pub skip_lines: Option<usize>,
    /// Delimited dialect preset (`excel`, `excel-tab`, `unix`)
    pub dialect: Option<String>,
    /// Trust binary headers instead of validating every record
    pub fast: Option<bool>,
    /// Console table style
    pub style: Option<TableStyle>,
}

impl ConvertOptions {
    /// Creates an empty option set (everything unset).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header-presence flag.
    #[must_use]
    pub fn headers(mut self, headers: bool) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sets the quote character.
    #[must_use]
    pub fn quotechar(mut self, quotechar: char) -> Self {
        self.quotechar = Some(quotechar);
        self
    }

    /// Sets the number of leading lines to skip.
    #[must_use]
    pub fn skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = Some(skip_lines);
        self
    }

    /// Sets the delimited dialect preset.
    #[must_use]
    pub fn dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }

    /// Sets the read-optimization flag.
    #[must_use]
    pub fn fast(mut self, fast: bool) -> Self {
        self.fast = Some(fast);
        self
    }

    /// Sets the console table style.
    #[must_use]
    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Returns the set entries as `(key, value)` pairs; unset fields are
    /// not emitted.
    pub fn entries(&self) -> Vec<(&'static str, OptionValue)> {
        let mut entries = Vec::new();
        if let Some(v) = self.headers {
            entries.push((HEADERS, OptionValue::Flag(v)));
        }
        if let Some(v) = self.delimiter {
            entries.push((DELIMITER, OptionValue::Char(v)));
        }
        if let Some(v) = self.quotechar {
            entries.push((QUOTECHAR, OptionValue::Char(v)));
        }
        if let Some(v) = self.skip_lines {
            entries.push((SKIP_LINES, OptionValue::Count(v)));
        }
        if let Some(ref v) = self.dialect {
            entries.push((DIALECT, OptionValue::Name(v.clone())));
        }
        if let Some(v) = self.fast {
            entries.push((FAST, OptionValue::Flag(v)));
        }
        if let Some(v) = self.style {
            entries.push((STYLE, OptionValue::Name(v.name().to_string())));
        }
        entries
    }
}

/// A filtered, keyed bag of options, as handed to a codec.
///
/// Keys are option names; order is irrelevant. Codecs look values up by
/// key and fall back to their own defaults for anything absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionBag(BTreeMap<&'static str, OptionValue>);

impl OptionBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an option, replacing any previous value for the key.
    pub fn insert(&mut self, key: &'static str, value: OptionValue) {
        self.0.insert(key, value);
    }

    /// Returns the raw value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the value for a key if it is a flag.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(OptionValue::Flag(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value for a key if it is a character.
    pub fn character(&self, key: &str) -> Option<char> {
        match self.0.get(key) {
            Some(OptionValue::Char(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value for a key if it is a count.
    pub fn count(&self, key: &str) -> Option<usize> {
        match self.0.get(key) {
            Some(OptionValue::Count(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value for a key if it is a name.
    pub fn name(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(OptionValue::Name(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Iterates over the keys in the bag.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Returns the number of options in the bag.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the bag holds no options.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which option keys a format's codec recognizes, split by side.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Keys the decode path accepts
    pub load: &'static [&'static str],
    /// Keys the encode path accepts
    pub save: &'static [&'static str],
}

impl Capabilities {
    /// Returns the key set for the given side.
    pub fn side(&self, side: Side) -> &'static [&'static str] {
        match side {
            Side::Load => self.load,
            Side::Save => self.save,
        }
    }
}

/// Returns the static capability table entry for a format.
pub fn capabilities(format: Format) -> Capabilities {
    match format {
        Format::Csv => Capabilities {
            load: &[HEADERS, DELIMITER, QUOTECHAR, SKIP_LINES, DIALECT],
            save: &[DELIMITER, QUOTECHAR, DIALECT],
        },
        // TSV has a fixed delimiter; only row-shape options apply.
        Format::Tsv => Capabilities {
            load: &[HEADERS, SKIP_LINES],
            save: &[],
        },
        Format::Json => Capabilities {
            load: &[],
            save: &[],
        },
        Format::Dbf => Capabilities {
            load: &[FAST],
            save: &[],
        },
    }
}

/// Filters the full option set down to what `format`'s codec accepts on
/// `side`.
///
/// Unset options are dropped; set options whose key is outside the
/// capability set are dropped silently; falsy-but-set values
/// (`Some(false)`, `Some(0)`) are forwarded.
pub fn filter_options(options: &ConvertOptions, format: Format, side: Side) -> OptionBag {
    let accepted = capabilities(format).side(side);
    let mut bag = OptionBag::new();
    for (key, value) in options.entries() {
        if accepted.contains(&key) {
            bag.insert(key, value);
        }
    }
    bag
}
