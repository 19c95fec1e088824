//! Sub-Chunker (C3): splits an oversized worker range into memory-bounded,
//! record-aligned pieces so peak memory stays `O(budget)` regardless of
//! file size.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::{AlignError, AppError};
use crate::partition::ByteRange;

fn trimmed(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn is_record_open(line: &str) -> bool {
    trimmed(line) == "  {"
}

fn is_id_header(line: &str) -> bool {
    line.starts_with("    \"_id\"")
}

fn scan_for_record_start<R: BufRead + Seek>(reader: &mut R, seek_from: u64) -> Option<u64> {
    reader.seek(SeekFrom::Start(seek_from)).ok()?;
    let mut offset = seek_from;
    let mut prev: Option<(u64, String)> = None;
    loop {
        let line_start = offset;
        let mut buf = String::new();
        let n = reader.read_line(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        if let Some((prev_off, prev_line)) = &prev {
            if is_record_open(prev_line) && is_id_header(&buf) {
                return Some(*prev_off);
            }
        }
        prev = Some((line_start, buf));
        offset += n as u64;
    }
}

/// Splits `range` into sub-ranges no larger than `budget` bytes, each
/// realigned to a record boundary using the same start-alignment rule as
/// the partitioner. The first sub-range keeps `range.start`; the last keeps
/// `range.end`; both are already aligned by the caller.
pub fn sub_chunk_ranges(
    path: &Path,
    worker: usize,
    range: ByteRange,
    budget: u64,
) -> Result<Vec<ByteRange>, AppError> {
    let budget = budget.max(1);
    if range.len() <= budget {
        return Ok(vec![range]);
    }

    let mut reader = BufReader::new(File::open(path)?);
    let total = range.len();
    let k = total / budget + 1;

    let mut boundaries = vec![range.start];
    for i in 1..k {
        let nominal = range.start + i * budget;
        if nominal >= range.end {
            break;
        }
        let aligned = scan_for_record_start(&mut reader, nominal).ok_or_else(|| {
            AlignError::BoundaryNotFound {
                worker,
                offset: nominal,
                path: path.to_path_buf(),
            }
        })?;
        if aligned < range.end && aligned > *boundaries.last().unwrap() {
            boundaries.push(aligned);
        }
    }
    boundaries.push(range.end);
    boundaries.dedup();

    Ok(boundaries
        .windows(2)
        .map(|w| ByteRange {
            start: w[0],
            end: w[1],
        })
        .collect())
}
