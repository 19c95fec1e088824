//! Distributed Coordinator (C7): runs the peer workers in parallel, gathers
//! their partial stats at a root, and merges them into one [`GlobalStats`].
//!
//! The "barrier" is `rayon::scope`'s join-on-drop semantics: the scope does
//! not return until every spawned worker has finished. The "gather" is a
//! `crossbeam_channel::bounded` channel drained at the root once the scope
//! exits. Cancellation is not supported: any worker error aborts the whole
//! run rather than producing a partial `GlobalStats`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crossbeam_channel::bounded;

use crate::aggregator::LocalStats;
use crate::config::EngineConfig;
use crate::decoder::{decode_piece, DecodedItem};
use crate::error::AppError;
use crate::merge::{merge_all, GlobalStats};
use crate::partition::{worker_ranges, ByteRange};
use crate::reference::ReferenceIndex;
use crate::resolver::classify;
use crate::subchunk::sub_chunk_ranges;

/// Reads `range` from `path` into a freshly allocated buffer. Each worker
/// opens its own `File` handle rather than sharing one.
fn read_range(path: &std::path::Path, range: ByteRange) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(range.start))?;
    let mut buf = vec![0u8; range.len() as usize];
    file.read_exact(&mut buf)?;
    Ok(buf)
}

/// Partitions, sub-chunks, decodes, classifies, and aggregates one worker's
/// byte range, returning its accumulated [`LocalStats`]. `worker_id` is only
/// used for diagnostics.
fn run_worker(
    config: &EngineConfig,
    reference: &ReferenceIndex,
    worker_id: usize,
    range: ByteRange,
) -> Result<LocalStats, AppError> {
    let mut stats = LocalStats::new();
    if range.is_empty() {
        return Ok(stats);
    }

    let sub_chunks = sub_chunk_ranges(&config.posts_path, worker_id, range, config.sub_chunk_budget)?;

    for piece_range in sub_chunks {
        if piece_range.is_empty() {
            continue;
        }
        let buf = read_range(&config.posts_path, piece_range)?;

        let abandoned = decode_piece(&buf, |item| {
            if let DecodedItem::Record(record) = item {
                let classification = classify(record.full_name.as_deref(), reference);
                stats.record(&record.author_id, &classification, config.count_all_for_t1);
            }
            // DecodedItem::Unusable is a silent reject: no log, no counter
            // increment.
        });

        if let Some(bytes_abandoned) = abandoned {
            let dump_len = bytes_abandoned.min(200);
            let tail = &buf[buf.len().saturating_sub(dump_len)..];
            eprintln!(
                "worker {}: dropping remainder of sub-chunk after a record parse error \
                 ({} bytes abandoned, tail: {:?})",
                worker_id,
                bytes_abandoned,
                String::from_utf8_lossy(tail)
            );
        }
    }

    Ok(stats)
}

/// Runs `config.workers` peer workers over `posts_path`, each independently
/// streaming a disjoint, record-aligned byte range, then merges every
/// worker's [`LocalStats`] into one [`GlobalStats`].
///
/// Fails with the first [`AppError`] any worker or the partitioner hits;
/// there is no partial-result fallback on a worker failure.
pub fn run(config: &EngineConfig, reference: &ReferenceIndex) -> Result<GlobalStats, AppError> {
    let ranges = worker_ranges(&config.posts_path, config.workers)?;

    let (result_tx, result_rx) = bounded::<Result<LocalStats, AppError>>(ranges.len());

    rayon::scope(|scope| {
        for (worker_id, range) in ranges.into_iter().enumerate() {
            let result_tx = result_tx.clone();
            let config = &*config;
            let reference = &*reference;
            scope.spawn(move |_| {
                let outcome = run_worker(config, reference, worker_id, range);
                // A closed receiver only happens if the root already bailed
                // out on an earlier worker's error; ignore the send failure.
                let _ = result_tx.send(outcome);
            });
        }
        drop(result_tx);
    });

    let mut partials = Vec::new();
    for outcome in result_rx {
        partials.push(outcome?);
    }

    Ok(merge_all(partials))
}
