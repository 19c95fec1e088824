//! Byte-Range Partitioner (C2): splits a file into N worker ranges aligned
//! to whole-record boundaries without parsing the file.
//!
//! The source is a pretty-printed top-level JSON array: the first line is
//! `[`, the last is `]`, each record opens with a line that is exactly
//! `"  {"` and closes with a line that is exactly `"  }"` (optionally
//! followed by a trailing comma), and a record's second line always begins
//! with `"    \"_id\""`. Alignment never parses JSON; it only recognizes
//! these line shapes.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::{AlignError, AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

fn trimmed(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn is_record_open(line: &str) -> bool {
    trimmed(line) == "  {"
}

fn is_record_close(line: &str) -> bool {
    let t = trimmed(line);
    t == "  }" || t == "  },"
}

fn is_id_header(line: &str) -> bool {
    line.starts_with("    \"_id\"")
}

fn is_array_close(line: &str) -> bool {
    trimmed(line) == "]"
}

/// Scans forward from `seek_from`, looking for a record-open line
/// immediately followed by an `_id` header line. Returns the byte offset of
/// the open-brace line. This single rule also correctly finds the file's
/// first record when `seek_from == 0`, since the leading `[` line never
/// matches `is_record_open`.
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

/// Scans forward from `seek_from` for a record-close line immediately
/// followed by a line satisfying `terminator`, and returns the offset just
/// past the closing `}` (exclusive of any trailing comma/newline, found by
/// content rather than a fixed byte count).
fn scan_for_record_end<R: BufRead + Seek>(
    reader: &mut R,
    seek_from: u64,
    terminator: impl Fn(&str) -> bool,
) -> Option<u64> {
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
            if is_record_close(prev_line) && terminator(&buf) {
                // "  }": the brace sits at index 2, so the exclusive end is + 3.
                return Some(*prev_off + 3);
            }
        }
        prev = Some((line_start, buf));
        offset += n as u64;
    }
}

/// Computes the aligned `[start, end)` byte range for each of `n` workers
/// over the file at `path`. Ranges are disjoint, cover every record exactly
/// once, and do not depend on worker count for the resulting `GlobalStats`.
pub fn worker_ranges(path: &Path, n: usize) -> Result<Vec<ByteRange>, AppError> {
    let n = n.max(1) as u64;
    let file_size = std::fs::metadata(path)?.len();
    let mut reader = BufReader::new(File::open(path)?);

    let mut ranges = Vec::with_capacity(n as usize);
    for r in 0..n {
        let nominal_start = r * (file_size / n);
        let start = scan_for_record_start(&mut reader, nominal_start).ok_or_else(|| {
            AlignError::BoundaryNotFound {
                worker: r as usize,
                offset: nominal_start,
                path: path.to_path_buf(),
            }
        })?;

        let end = if r + 1 < n {
            // Same boundary worker r+1's start scan will land on, so the two
            // scans can never disagree about which record owns the split.
            let nominal_end = (r + 1) * (file_size / n);
            scan_for_record_start(&mut reader, nominal_end).ok_or_else(|| {
                AlignError::BoundaryNotFound {
                    worker: r as usize,
                    offset: nominal_end,
                    path: path.to_path_buf(),
                }
            })?
        } else {
            scan_for_record_end(&mut reader, start, is_array_close).ok_or_else(|| {
                AlignError::TailNotFound {
                    path: path.to_path_buf(),
                }
            })?
        };

        ranges.push(ByteRange { start, end });
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample(records: usize) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[").unwrap();
        for i in 0..records {
            writeln!(f, "  {{").unwrap();
            writeln!(f, "    \"_id\": \"{}\",", i).unwrap();
            writeln!(f, "    \"data\": {{\"author_id\": \"a{}\"}}", i).unwrap();
            if i + 1 < records {
                writeln!(f, "  }},").unwrap();
            } else {
                writeln!(f, "  }}").unwrap();
            }
        }
        writeln!(f, "]").unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn single_worker_spans_whole_records_region() {
        let f = sample(5);
        let ranges = worker_ranges(f.path(), 1).unwrap();
        assert_eq!(ranges.len(), 1);
        let content = std::fs::read(f.path()).unwrap();
        let slice = &content[ranges[0].start as usize..ranges[0].end as usize];
        assert!(slice.starts_with(b"  {\n"));
        assert!(slice.ends_with(b"  }"));
    }

    #[test]
    fn multiple_workers_cover_every_record_exactly_once() {
        let f = sample(10);
        for n in [1usize, 2, 3, 4, 7] {
            let ranges = worker_ranges(f.path(), n).unwrap();
            let content = std::fs::read(f.path()).unwrap();
            let mut record_opens = 0usize;
            for r in &ranges {
                assert!(r.start <= r.end);
                let slice = &content[r.start as usize..r.end as usize];
                record_opens += slice
                    .windows(4)
                    .filter(|w| *w == b"  {\n")
                    .count();
            }
            assert_eq!(record_opens, 10, "n={} should see all 10 records", n);
            // Ranges are non-decreasing and non-overlapping.
            for w in ranges.windows(2) {
                assert!(w[0].end <= w[1].start);
            }
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = worker_ranges(Path::new("/no/such/file.json"), 2).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
