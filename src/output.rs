//! Output formatting: renders the three reports as fixed-column tables via
//! `tabled`, matching the required column contracts byte-for-byte.

use tabled::{Table, Tabled};

use crate::merge::{most_diverse_authors, region_counts, top_authors, GlobalStats};
use crate::types::GCC_CITY_LABEL;

/// Rank labels rendered as `#1`..`#10` for the `Rank` column.
fn rank_label(zero_based_index: usize) -> String {
    format!("#{}", zero_based_index + 1)
}

#[derive(Tabled)]
struct TopAuthorRow {
    #[tabled(rename = "Rank")]
    rank: String,
    #[tabled(rename = "Author Id")]
    author_id: String,
    #[tabled(rename = "Number of Tweets Made")]
    tweets: u64,
}

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Greater Capital City")]
    gcc_label: String,
    #[tabled(rename = "Number of Tweets Made")]
    tweets: u64,
}

#[derive(Tabled)]
struct DiverseAuthorRow {
    #[tabled(rename = "Rank")]
    rank: String,
    #[tabled(rename = "Author Id")]
    author_id: String,
    #[tabled(rename = "Number of Unique City Locations and #Tweets")]
    breakdown: String,
}

/// T1: `Rank, Author Id, Number of Tweets Made`; 10 rows.
pub fn render_top_authors(global: &GlobalStats) -> String {
    let rows: Vec<TopAuthorRow> = top_authors(global, 10)
        .into_iter()
        .enumerate()
        .map(|(i, (author_id, tweets))| TopAuthorRow {
            rank: rank_label(i),
            author_id,
            tweets,
        })
        .collect();
    Table::new(rows).to_string()
}

/// T2: `Greater Capital City, Number of Tweets Made`; 8 rows in canonical
/// order, each label the form `"<gcc> (Greater <City>)"`.
pub fn render_region_counts(global: &GlobalStats) -> String {
    let counts = region_counts(global);
    let rows: Vec<RegionRow> = GCC_CITY_LABEL
        .iter()
        .zip(counts.iter())
        .map(|((gcc, city), tweets)| RegionRow {
            gcc_label: format!("{} (Greater {})", gcc, city),
            tweets: *tweets,
        })
        .collect();
    Table::new(rows).to_string()
}

/// Builds the literal shape `"{k}(#{total} tweets - #{c1}{gccTail1}, ...)"`
/// for one T3 row, where `gccTail` drops the leading state digit.
fn format_breakdown(distinct: usize, total: u64, regions: &[(&str, u64)]) -> String {
    let parts: Vec<String> = regions
        .iter()
        .map(|(gcc, count)| {
            let tail = &gcc[1..];
            format!("#{}{}", count, tail)
        })
        .collect();
    format!("{}(#{} tweets - {})", distinct, total, parts.join(", "))
}

/// T3: `Rank, Author Id, Number of Unique City Locations and #Tweets`.
pub fn render_most_diverse_authors(global: &GlobalStats) -> String {
    let rows: Vec<DiverseAuthorRow> = most_diverse_authors(global, 10)
        .into_iter()
        .enumerate()
        .map(|(i, author)| DiverseAuthorRow {
            rank: rank_label(i),
            breakdown: format_breakdown(author.regions.len(), author.total, &author.regions),
            author_id: author.author_id,
        })
        .collect();
    Table::new(rows).to_string()
}
