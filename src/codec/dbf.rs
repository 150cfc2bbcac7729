//! dBase III (DBF) codec, the registry's binary format.
//!
//! Every field is written as a fixed-width character field; cell values
//! are space-padded on write and trimmed on read. The load side honors
//! the `fast` option: when set, the decoder trusts the header's record
//! count and record length instead of validating the field layout and
//! every record flag.

use chrono::{Datelike, Local};

use crate::dataset::Dataset;
use crate::error::{Result, TabcastError};
use crate::format::Format;
use crate::options::{self, OptionBag};

const HEADER_LEN: usize = 32;
const FIELD_DESC_LEN: usize = 32;
const FIELD_NAME_LEN: usize = 11;
const HEADER_TERMINATOR: u8 = 0x0D;
const FILE_TERMINATOR: u8 = 0x1A;
const RECORD_ACTIVE: u8 = 0x20;
const RECORD_DELETED: u8 = 0x2A;
const VERSION_DBASE3: u8 = 0x03;
const MAX_FIELD_LEN: usize = 254;

// Version bytes seen in the wild for table files without memo support.
const KNOWN_VERSIONS: [u8; 6] = [0x02, 0x03, 0x30, 0x83, 0x8B, 0xF5];

/// Returns `true` if the sample plausibly starts a DBF file. Used by
/// content sniffing; cheap and byte-based only.
pub(crate) fn looks_like_dbf(sample: &[u8]) -> bool {
    if sample.len() < HEADER_LEN {
        return false;
    }
    let month = sample[2];
    let day = sample[3];
    KNOWN_VERSIONS.contains(&sample[0])
        && (1..=12).contains(&month)
        && (1..=31).contains(&day)
        && u16::from_le_bytes([sample[8], sample[9]]) as usize >= HEADER_LEN + 1
}

/// Decodes DBF bytes into a dataset.
pub fn decode(bytes: &[u8], opts: &OptionBag) -> Result<Dataset> {
    let fast = opts.flag(options::FAST).unwrap_or(false);

    if bytes.len() < HEADER_LEN + 1 {
        return Err(TabcastError::malformed(Format::Dbf, "truncated header"));
    }
    if !KNOWN_VERSIONS.contains(&bytes[0]) {
        return Err(TabcastError::malformed(
            Format::Dbf,
            format!("unrecognized version byte 0x{:02X}", bytes[0]),
        ));
    }
    let record_count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let record_len = u16::from_le_bytes([bytes[10], bytes[11]]) as usize;
    if header_len < HEADER_LEN + 1 || header_len > bytes.len() {
        return Err(TabcastError::malformed(Format::Dbf, "invalid header length"));
    }
    if record_len == 0 {
        return Err(TabcastError::malformed(Format::Dbf, "invalid record length"));
    }

    // Field descriptors run from byte 32 to the 0x0D terminator.
    let mut names = Vec::new();
    let mut lengths = Vec::new();
    let mut offset = HEADER_LEN;
    loop {
        if offset >= header_len {
            return Err(TabcastError::malformed(
                Format::Dbf,
                "unterminated field descriptors",
            ));
        }
        if bytes[offset] == HEADER_TERMINATOR {
            break;
        }
        let Some(desc) = bytes.get(offset..offset + FIELD_DESC_LEN) else {
            return Err(TabcastError::malformed(
                Format::Dbf,
                "truncated field descriptor",
            ));
        };
        let name_end = desc[..FIELD_NAME_LEN]
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(FIELD_NAME_LEN);
        names.push(String::from_utf8_lossy(&desc[..name_end]).into_owned());
        lengths.push(desc[16] as usize);
        offset += FIELD_DESC_LEN;
    }
    if names.is_empty() {
        return Err(TabcastError::malformed(Format::Dbf, "no field descriptors"));
    }
    if !fast {
        let expected: usize = 1 + lengths.iter().sum::<usize>();
        if expected != record_len {
            return Err(TabcastError::malformed(
                Format::Dbf,
                "field layout does not match declared record length",
            ));
        }
    }

    let mut data = Dataset::new().with_headers(names);
    for i in 0..record_count {
        let start = header_len + i * record_len;
        let Some(record) = bytes.get(start..start + record_len) else {
            if fast {
                // Header overstated the count; take what is there.
                break;
            }
            return Err(TabcastError::malformed(Format::Dbf, "truncated records"));
        };
        if record[0] == RECORD_DELETED {
            continue;
        }
        if !fast && record[0] != RECORD_ACTIVE {
            return Err(TabcastError::malformed(
                Format::Dbf,
                format!("invalid record flag 0x{:02X}", record[0]),
            ));
        }
        let mut row = Vec::with_capacity(lengths.len());
        let mut pos = 1;
        for len in &lengths {
            let cell = record
                .get(pos..pos + len)
                .map(|b| String::from_utf8_lossy(b).trim().to_string())
                .unwrap_or_default();
            row.push(cell);
            pos += len;
        }
        data.push_row(row);
    }
    Ok(data)
}

/// Encodes a dataset as DBF bytes.
pub fn encode(data: &Dataset) -> Result<Vec<u8>> {
    let width = data.width();
    if width == 0 {
        return Err(TabcastError::unrepresentable(
            Format::Dbf,
            "dataset has no columns",
        ));
    }
    if width > 255 {
        return Err(TabcastError::unrepresentable(
            Format::Dbf,
            format!("{width} fields exceed the format limit of 255"),
        ));
    }
    let record_count = u32::try_from(data.len()).map_err(|_| {
        TabcastError::unrepresentable(Format::Dbf, "too many records for a 32-bit count")
    })?;

    let names = field_names(data, width);
    let mut lengths = vec![1usize; width];
    for row in data.rows() {
        for (i, cell) in row.iter().enumerate().take(width) {
            let len = cell.len();
            if len > MAX_FIELD_LEN {
                return Err(TabcastError::unrepresentable(
                    Format::Dbf,
                    format!("cell value of {len} bytes exceeds the field limit of {MAX_FIELD_LEN}"),
                ));
            }
            lengths[i] = lengths[i].max(len);
        }
    }

    let record_len = 1 + lengths.iter().sum::<usize>();
    let record_len = u16::try_from(record_len).map_err(|_| {
        TabcastError::unrepresentable(Format::Dbf, "combined field widths exceed the record limit")
    })?;
    let header_len = HEADER_LEN + FIELD_DESC_LEN * width + 1;
    let header_len = u16::try_from(header_len).map_err(|_| {
        TabcastError::unrepresentable(Format::Dbf, "header exceeds the format limit")
    })?;

    let mut out = Vec::with_capacity(header_len as usize + record_len as usize * data.len() + 1);
    let today = Local::now().date_naive();
    out.push(VERSION_DBASE3);
    out.push(clamp_byte(today.year() - 1900));
    out.push(clamp_byte(i32::try_from(today.month()).unwrap_or(1)));
    out.push(clamp_byte(i32::try_from(today.day()).unwrap_or(1)));
    out.extend_from_slice(&record_count.to_le_bytes());
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(&record_len.to_le_bytes());
    out.resize(HEADER_LEN, 0);

    for (name, len) in names.iter().zip(&lengths) {
        let mut desc = [0u8; FIELD_DESC_LEN];
        let name_bytes = name.as_bytes();
        desc[..name_bytes.len()].copy_from_slice(name_bytes);
        desc[11] = b'C';
        desc[16] = *len as u8;
        out.extend_from_slice(&desc);
    }
    out.push(HEADER_TERMINATOR);

    for row in data.rows() {
        out.push(RECORD_ACTIVE);
        for (i, len) in lengths.iter().enumerate() {
            let cell = row.get(i).map_or("", String::as_str);
            out.extend_from_slice(cell.as_bytes());
            out.resize(out.len() + (len - cell.len()), b' ');
        }
    }
    out.push(FILE_TERMINATOR);
    Ok(out)
}

/// Field names from the header row, or `COL1..COLn` when the dataset has
/// none. Names are uppercased ASCII, non-alphanumerics replaced, and
/// truncated to the 10-byte DBF limit.
fn field_names(data: &Dataset, width: usize) -> Vec<String> {
    (0..width)
        .map(|i| match data.headers().and_then(|h| h.get(i)) {
            Some(name) if !name.is_empty() => {
                let mut sanitized: String = name
                    .chars()
                    .map(|c| {
                        if c.is_ascii_alphanumeric() {
                            c.to_ascii_uppercase()
                        } else {
                            '_'
                        }
                    })
                    .take(FIELD_NAME_LEN - 1)
                    .collect();
                if sanitized.is_empty() {
                    sanitized = format!("COL{}", i + 1);
                }
                sanitized
            }
            _ => format!("COL{}", i + 1),
        })
        .collect()
}

fn clamp_byte(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 255)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ConvertOptions, Side, filter_options};

    fn sample() -> Dataset {
        let mut data = Dataset::new().with_headers(vec!["name".into(), "age".into()]);
        data.push_row(vec!["Alice".into(), "34".into()]);
        data.push_row(vec!["Bob".into(), "9".into()]);
        data
    }

    #[test]
    fn test_roundtrip() {
        let data = sample();
        let bytes = encode(&data).unwrap();
        let back = decode(&bytes, &OptionBag::new()).unwrap();
        assert_eq!(back.headers(), Some(&["NAME".to_string(), "AGE".to_string()][..]));
        assert_eq!(back.len(), 2);
        assert_eq!(back.cell(0, 0), "Alice");
        assert_eq!(back.cell(1, 1), "9");
    }

    #[test]
    fn test_roundtrip_with_fast_load() {
        let bytes = encode(&sample()).unwrap();
        let options = ConvertOptions::new().fast(true);
        let back = decode(&bytes, &filter_options(&options, Format::Dbf, Side::Load)).unwrap();
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn test_encode_without_headers_synthesizes_names() {
        let mut data = Dataset::new();
        data.push_row(vec!["1".into(), "2".into()]);
        let back = decode(&encode(&data).unwrap(), &OptionBag::new()).unwrap();
        assert_eq!(back.headers(), Some(&["COL1".to_string(), "COL2".to_string()][..]));
    }

    #[test]
    fn test_field_name_sanitization() {
        let mut data = Dataset::new().with_headers(vec!["first name!".into()]);
        data.push_row(vec!["x".into()]);
        let back = decode(&encode(&data).unwrap(), &OptionBag::new()).unwrap();
        assert_eq!(back.headers(), Some(&["FIRST_NAME".to_string()][..]));
    }

    #[test]
    fn test_encode_rejects_oversize_cell() {
        let mut data = Dataset::new().with_headers(vec!["blob".into()]);
        data.push_row(vec!["x".repeat(300)]);
        let err = encode(&data).unwrap_err();
        assert!(err.is_encode());
        assert!(err.to_string().contains("254"));
    }

    #[test]
    fn test_encode_rejects_zero_width_dataset() {
        let mut data = Dataset::new();
        data.push_row(vec![]);
        assert!(encode(&data).unwrap_err().is_encode());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"definitely not a dbf file, far too short?", &OptionBag::new())
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_decode_rejects_truncated_records() {
        let mut bytes = encode(&sample()).unwrap();
        bytes.truncate(bytes.len() - 10);
        let err = decode(&bytes, &OptionBag::new()).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_fast_load_tolerates_overstated_count() {
        let mut bytes = encode(&sample()).unwrap();
        // Claim ten records; only two are present.
        bytes[4..8].copy_from_slice(&10u32.to_le_bytes());

        let options = ConvertOptions::new().fast(true);
        let back = decode(&bytes, &filter_options(&options, Format::Dbf, Side::Load)).unwrap();
        assert_eq!(back.len(), 2);

        assert!(decode(&bytes, &OptionBag::new()).is_err());
    }

    #[test]
    fn test_deleted_records_are_skipped() {
        let data = sample();
        let mut bytes = encode(&data).unwrap();
        let header_len =
            u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        bytes[header_len] = RECORD_DELETED;
        let back = decode(&bytes, &OptionBag::new()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.cell(0, 0), "Bob");
    }

    #[test]
    fn test_looks_like_dbf() {
        let bytes = encode(&sample()).unwrap();
        assert!(looks_like_dbf(&bytes));
        assert!(!looks_like_dbf(b"name,age\nAlice,34\n"));
        assert!(!looks_like_dbf(&[0x03]));
    }
}
