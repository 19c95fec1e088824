//! Local Aggregator (C6): per-worker counters, mutated only by the worker
//! that owns them and handed off whole at gather time.

use ahash::AHashMap;

use crate::resolver::Classification;
use crate::types::CANONICAL_GCC;

/// Per-worker (and, after merge, global) statistics. Shape is identical at
/// both scopes, so [`merge::merge_into`](crate::merge::merge_into) folds one
/// into another in place.
#[derive(Debug, Clone)]
pub struct LocalStats {
    pub gcc_counts: [u64; 8],
    pub author_counts: AHashMap<String, u64>,
    pub author_region_counts: AHashMap<String, AHashMap<&'static str, u64>>,
}

impl Default for LocalStats {
    fn default() -> Self {
        LocalStats {
            gcc_counts: [0; 8],
            author_counts: AHashMap::new(),
            author_region_counts: AHashMap::new(),
        }
    }
}

impl LocalStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one decoded record against `author_id`. `count_all_for_t1`
    /// selects between the two T1 counting policies: when `true` (the
    /// default) the author counter increments for every record that decodes,
    /// regardless of geographic qualification; when `false`, it increments
    /// only on qualification, matching the stricter variant seen in some
    /// source implementations. Region counters always increment only when
    /// `classification` qualifies.
    pub fn record(&mut self, author_id: &str, classification: &Classification, count_all_for_t1: bool) {
        let qualifies = matches!(classification, Classification::Qualified { .. });
        if count_all_for_t1 || qualifies {
            *self.author_counts.entry(author_id.to_string()).or_insert(0) += 1;
        }

        if let Classification::Qualified { gcc_index, gcc } = classification {
            self.gcc_counts[*gcc_index] += 1;
            *self
                .author_region_counts
                .entry(author_id.to_string())
                .or_default()
                .entry(gcc)
                .or_insert(0) += 1;
        }
    }
}

/// Sanity check used by tests: `sum(gcc_counts) == sum over all authors of
/// accepted posts`.
pub fn region_total_matches_author_region_total(stats: &LocalStats) -> bool {
    let region_total: u64 = stats.gcc_counts.iter().sum();
    let author_total: u64 = stats
        .author_region_counts
        .values()
        .flat_map(|m| m.values())
        .sum();
    region_total == author_total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unqualified_record_increments_only_author_counter() {
        let mut stats = LocalStats::new();
        stats.record("A", &Classification::Rejected, true);
        assert_eq!(stats.author_counts.get("A"), Some(&1));
        assert_eq!(stats.gcc_counts, [0; 8]);
        assert!(!stats.author_region_counts.contains_key("A"));
    }

    #[test]
    fn qualified_only_policy_skips_unqualified_author_counts() {
        let mut stats = LocalStats::new();
        stats.record("A", &Classification::Rejected, false);
        assert!(stats.author_counts.is_empty());

        stats.record(
            "A",
            &Classification::Qualified {
                gcc_index: 0,
                gcc: CANONICAL_GCC[0],
            },
            false,
        );
        assert_eq!(stats.author_counts.get("A"), Some(&1));
    }

    #[test]
    fn qualified_record_increments_region_and_author() {
        let mut stats = LocalStats::new();
        stats.record(
            "A",
            &Classification::Qualified {
                gcc_index: 1,
                gcc: CANONICAL_GCC[1],
            },
            true,
        );
        assert_eq!(stats.author_counts.get("A"), Some(&1));
        assert_eq!(stats.gcc_counts[1], 1);
        assert_eq!(
            stats.author_region_counts.get("A").unwrap().get("2gmel"),
            Some(&1)
        );
        assert!(region_total_matches_author_region_total(&stats));
    }

    #[test]
    fn same_author_multiple_regions_accumulates() {
        let mut stats = LocalStats::new();
        stats.record(
            "A",
            &Classification::Qualified {
                gcc_index: 0,
                gcc: CANONICAL_GCC[0],
            },
            true,
        );
        stats.record(
            "A",
            &Classification::Qualified {
                gcc_index: 1,
                gcc: CANONICAL_GCC[1],
            },
            true,
        );
        assert_eq!(stats.author_counts.get("A"), Some(&2));
        assert_eq!(stats.author_region_counts.get("A").unwrap().len(), 2);
        assert!(region_total_matches_author_region_total(&stats));
    }
}
