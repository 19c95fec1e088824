//! Configuration and defaults for the aggregation engine.

use std::path::PathBuf;

/// Tunables for one end-to-end run of the engine, threaded explicitly
/// through `coordinator::run` rather than hidden behind globals.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Posts file to aggregate.
    pub posts_path: PathBuf,
    /// Suburb reference file (state → gcc index).
    pub reference_path: PathBuf,
    /// Number of peer workers to fan the file out across.
    pub workers: usize,
    /// Per-worker sub-chunk byte budget.
    pub sub_chunk_budget: u64,
    /// T1 counting policy: `true` counts every decoded record toward an
    /// author's total regardless of geographic qualification; `false`
    /// counts only qualified records.
    pub count_all_for_t1: bool,
}

pub const DEFAULT_SUB_CHUNK_BUDGET: u64 = 1024 * 1024;

impl EngineConfig {
    pub fn new(posts_path: PathBuf, reference_path: PathBuf, workers: usize) -> Self {
        EngineConfig {
            posts_path,
            reference_path,
            workers: workers.max(1),
            sub_chunk_budget: DEFAULT_SUB_CHUNK_BUDGET,
            count_all_for_t1: true,
        }
    }

    pub fn with_sub_chunk_budget(mut self, budget: u64) -> Self {
        self.sub_chunk_budget = budget.max(1);
        self
    }

    pub fn with_count_all_for_t1(mut self, count_all: bool) -> Self {
        self.count_all_for_t1 = count_all;
        self
    }
}
