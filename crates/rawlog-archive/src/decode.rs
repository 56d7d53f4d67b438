//! Segment body decoding: gzip, then newline-delimited JSON.

use std::io::Read;

use flate2::read::MultiGzDecoder;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Field holding the original, unparsed log line.
pub const DEFAULT_RAW_FIELD: &str = "@rawstring";

/// Decompresses a whole gzip body.
///
/// Concatenated gzip members are decoded as one stream.
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = MultiGzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(DecodeError::Decompress)?;

    tracing::trace!(
        compressed = data.len(),
        decompressed = decompressed.len(),
        "gunzipped segment"
    );
    Ok(decompressed)
}

/// Extracts the string `field` from every newline-delimited JSON record.
///
/// Blank lines are ignored. Line numbers in errors are 1-based.
///
/// # Errors
///
/// Fails on the first line that is not a JSON object, lacks `field`, or
/// holds a non-string value in it.
pub fn extract_field(body: &[u8], field: &str) -> Result<Vec<String>, DecodeError> {
    let mut values = Vec::new();

    for (index, line) in body.split(|b| *b == b'\n').enumerate() {
        let line_no = index + 1;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let mut record: Map<String, Value> =
            serde_json::from_slice(line).map_err(|source| DecodeError::MalformedRecord {
                line: line_no,
                source,
            })?;

        match record.remove(field) {
            Some(Value::String(value)) => values.push(value),
            Some(_) => {
                return Err(DecodeError::NonStringField {
                    line: line_no,
                    field: field.to_string(),
                });
            }
            None => {
                return Err(DecodeError::MissingField {
                    line: line_no,
                    field: field.to_string(),
                });
            }
        }
    }

    Ok(values)
}
