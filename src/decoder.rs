//! Record Decoder (C4): turns a record-aligned byte slice into a lazy
//! sequence of [`PostRecord`]s.
//!
//! A sub-piece produced by the partitioner or sub-chunker holds a whole
//! number of pretty-printed records but is not itself a JSON value: it is
//! missing the enclosing `[` / `]` and its records are comma-separated, not
//! whitespace-separated, so `serde_json`'s value-at-a-time stream
//! deserializer cannot walk it directly. Instead the decoder reuses the
//! partitioner's own line-shape contract (`"  {"` opens a record, `"  }"` or
//! `"  },"` closes one) to locate each record's byte span within the piece
//! and parses that span on its own, one `serde_json::from_slice` call per
//! record, so only a single record is ever materialized at a time.

use serde::Deserialize;

use crate::types::PostRecord;

#[derive(Debug, Deserialize)]
struct RawPlace {
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIncludes {
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
struct RawAuthorData {
    author_id: Option<String>,
}

/// Mirrors the decoded shape of one element of the posts array. Every field
/// the engine does not need is left unnamed here; `serde_json` silently
/// skips unknown object keys during deserialization.
#[derive(Debug, Deserialize)]
struct RawRecord {
    data: Option<RawAuthorData>,
    includes: Option<RawIncludes>,
}

impl From<RawRecord> for Option<PostRecord> {
    fn from(raw: RawRecord) -> Self {
        let author_id = raw.data?.author_id?;
        let full_name = raw
            .includes
            .and_then(|inc| inc.places.into_iter().next())
            .and_then(|place| place.full_name);
        Some(PostRecord { author_id, full_name })
    }
}

/// One record decoded from a sub-piece.
pub enum DecodedItem {
    Record(PostRecord),
    /// The record parsed as JSON but had no usable `author_id`: a silent
    /// reject, not a warning.
    Unusable,
}

fn trimmed(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && (line[end - 1] == b'\n' || line[end - 1] == b'\r') {
        end -= 1;
    }
    &line[..end]
}

/// Iterates `(line_start_offset, line_bytes_including_newline)` over a byte
/// slice, the same line shapes the partitioner scans for in a file.
struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.buf[start..];
        let len = match rest.iter().position(|&b| b == b'\n') {
            Some(i) => i + 1,
            None => rest.len(),
        };
        self.pos += len;
        Some((start, &rest[..len]))
    }
}

/// Decodes every record in `piece` (a byte slice spanning a whole number of
/// records, per the partitioner/sub-chunker contract) and calls `on_item`
/// for each. Stops at the first record that fails to parse as JSON and
/// returns `Some(bytes_abandoned)` describing how much of the piece was
/// never decoded, for the caller's parse-error warning. Returns `None` when
/// every record in the piece decoded cleanly.
pub fn decode_piece(piece: &[u8], mut on_item: impl FnMut(DecodedItem)) -> Option<usize> {
    let mut record_start: Option<usize> = None;

    for (line_start, line) in (Lines { buf: piece, pos: 0 }) {
        let t = trimmed(line);
        if t == b"  {" {
            record_start = Some(line_start);
        } else if t == b"  }" || t == b"  }," {
            if let Some(start) = record_start.take() {
                // the closing brace sits at index 2 of the "  }" line.
                let end = line_start + 3;
                let slice = &piece[start..end];
                match serde_json::from_slice::<RawRecord>(slice) {
                    Ok(raw) => {
                        let item: Option<PostRecord> = raw.into();
                        on_item(match item {
                            Some(record) => DecodedItem::Record(record),
                            None => DecodedItem::Unusable,
                        });
                    }
                    Err(_) => return Some(piece.len() - start),
                }
            }
        }
    }

    None
}
