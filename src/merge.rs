//! Merger & Ranker (C8): deterministically folds worker partials into a
//! single [`GlobalStats`] and computes the three final rankings.
//!
//! Merging is commutative and associative: each field is summed elementwise
//! or unioned, independent of the order partials arrive in. Rankings break
//! ties on ascending `author_id` so the final report is independent of merge
//! order too.

use crate::aggregator::LocalStats;
use crate::types::CANONICAL_GCC;

/// Same shape as [`LocalStats`]; the merged total across every worker.
pub type GlobalStats = LocalStats;

/// Folds `other` into `acc` in place. Merging the zero stats (a fresh
/// `LocalStats::default()`) into anything is the identity.
pub fn merge_into(acc: &mut GlobalStats, other: &LocalStats) {
    for i in 0..8 {
        acc.gcc_counts[i] += other.gcc_counts[i];
    }
    for (author, count) in &other.author_counts {
        *acc.author_counts.entry(author.clone()).or_insert(0) += count;
    }
    for (author, regions) in &other.author_region_counts {
        let entry = acc.author_region_counts.entry(author.clone()).or_default();
        for (gcc, count) in regions {
            *entry.entry(gcc).or_insert(0) += count;
        }
    }
}

/// Merges a whole collection of partials into one [`GlobalStats`]. The fold
/// order does not affect the result: the operation is associative,
/// commutative, and has the zero value as its identity.
pub fn merge_all(partials: impl IntoIterator<Item = LocalStats>) -> GlobalStats {
    let mut acc = GlobalStats::default();
    for partial in partials {
        merge_into(&mut acc, &partial);
    }
    acc
}

/// T1: the ten most prolific authors by (possibly-unqualified) post count,
/// ties broken by ascending `author_id`.
pub fn top_authors(global: &GlobalStats, limit: usize) -> Vec<(String, u64)> {
    let mut authors: Vec<(String, u64)> = global
        .author_counts
        .iter()
        .map(|(id, count)| (id.clone(), *count))
        .collect();
    authors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    authors.truncate(limit);
    authors
}

/// T2: per-region post counts, already stored in canonical order.
pub fn region_counts(global: &GlobalStats) -> [u64; 8] {
    global.gcc_counts
}

/// One row of T3: an author's accepted-post footprint across regions,
/// listed in canonical GCC order.
pub struct DiverseAuthor {
    pub author_id: String,
    pub regions: Vec<(&'static str, u64)>,
    pub total: u64,
}

/// T3: the ten authors with the most distinct Greater Capital Cities among
/// their accepted posts, ties broken first by total qualifying posts then
/// by ascending `author_id`. Only authors with at least one accepted record
/// appear (they are the only keys in `author_region_counts`).
pub fn most_diverse_authors(global: &GlobalStats, limit: usize) -> Vec<DiverseAuthor> {
    let mut authors: Vec<DiverseAuthor> = global
        .author_region_counts
        .iter()
        .map(|(author_id, regions)| {
            let mut regions: Vec<(&'static str, u64)> = regions.iter().map(|(g, c)| (*g, *c)).collect();
            regions.sort_by_key(|(gcc, _)| CANONICAL_GCC.iter().position(|c| c == gcc).unwrap_or(usize::MAX));
            let total = regions.iter().map(|(_, c)| c).sum();
            DiverseAuthor {
                author_id: author_id.clone(),
                regions,
                total,
            }
        })
        .collect();

    authors.sort_by(|a, b| {
        b.regions
            .len()
            .cmp(&a.regions.len())
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.author_id.cmp(&b.author_id))
    });
    authors.truncate(limit);
    authors
}
