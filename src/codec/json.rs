//! JSON codec: a top-level array of row objects (or row arrays).
//!
//! Objects are keyed by column name; the first object fixes the header
//! order. Scalar values are stringified on decode, and every cell is
//! written back as a JSON string on encode. This codec takes no options
//! on either side.

use serde_json::Value;

use crate::dataset::Dataset;
use crate::error::{Result, TabcastError};
use crate::format::Format;

/// Decodes a JSON document into a dataset.
pub fn decode(text: &str) -> Result<Dataset> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| TabcastError::decode(Format::Json, e))?;
    let Value::Array(items) = value else {
        return Err(TabcastError::malformed(
            Format::Json,
            "expected a top-level JSON array",
        ));
    };
    let mut data = Dataset::new();
    let Some(first) = items.first() else {
        return Ok(data);
    };

    match first {
        Value::Object(map) => {
            let headers: Vec<String> = map.keys().cloned().collect();
            for item in &items {
                let Value::Object(map) = item else {
                    return Err(TabcastError::malformed(
                        Format::Json,
                        "mixed array: every element must be an object",
                    ));
                };
                let row = headers
                    .iter()
                    .map(|h| map.get(h).map_or_else(String::new, stringify))
                    .collect();
                data.push_row(row);
            }
            data.set_headers(headers);
            Ok(data)
        }
        Value::Array(_) => {
            for item in &items {
                let Value::Array(cells) = item else {
                    return Err(TabcastError::malformed(
                        Format::Json,
                        "mixed array: every element must be an array",
                    ));
                };
                data.push_row(cells.iter().map(stringify).collect());
            }
            Ok(data)
        }
        _ => Err(TabcastError::malformed(
            Format::Json,
            "expected an array of objects or an array of arrays",
        )),
    }
}

/// Encodes a dataset as a JSON document.
pub fn encode(data: &Dataset) -> Result<String> {
    let value = if let Some(headers) = data.headers() {
        let rows: Vec<serde_json::Map<String, Value>> = data
            .rows()
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| {
                        (
                            h.clone(),
                            Value::String(row.get(i).cloned().unwrap_or_default()),
                        )
                    })
                    .collect()
            })
            .collect();
        serde_json::to_string(&rows)
    } else {
        serde_json::to_string(data.rows())
    };
    value.map_err(|e| TabcastError::encode(Format::Json, e))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
