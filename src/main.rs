//! CLI entry point for geopost-stats.
//!
//! Thin edge around the library: argument parsing, preset input selection,
//! and timing only ever consume the final merged `GlobalStats`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use geopost_stats::config::EngineConfig;
use geopost_stats::coordinator;
use geopost_stats::output::{render_most_diverse_authors, render_region_counts, render_top_authors};
use geopost_stats::reference::load_reference_index;

/// Parallel, bounded-memory aggregation of geotagged social posts.
#[derive(Parser, Debug)]
#[command(name = "geopost-stats")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input preset: tiny, small, or big. Anything else falls back to the
    /// default (`data/smallTwitter.json`).
    preset: Option<String>,

    /// Number of peer workers to fan the file out across.
    #[arg(short = 'j', long = "workers", default_value_t = num_cpus::get())]
    workers: usize,

    /// Per-worker sub-chunk byte budget, in KiB.
    #[arg(long = "sub-chunk-kib", default_value_t = 1024)]
    sub_chunk_kib: u64,

    /// Suburb reference file.
    #[arg(long = "reference", default_value = "data/sal.json")]
    reference: PathBuf,

    /// Count every decoded record toward T1 regardless of geographic
    /// qualification (the default). Pass `--qualified-only` to restrict T1
    /// to qualified records instead.
    #[arg(long = "qualified-only", default_value_t = false)]
    qualified_only: bool,
}

fn posts_path_for_preset(preset: Option<&str>) -> PathBuf {
    match preset {
        Some("tiny") => PathBuf::from("data/tinyTwitter.json"),
        Some("small") => PathBuf::from("data/smallTwitter.json"),
        Some("big") => PathBuf::from("data/bigTwitter.json"),
        _ => PathBuf::from("data/smallTwitter.json"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let posts_path = posts_path_for_preset(args.preset.as_deref());
    if !posts_path.exists() {
        bail!("posts file not found: {}", posts_path.display());
    }
    if !args.reference.exists() {
        bail!("reference file not found: {}", args.reference.display());
    }
    if args.workers == 0 {
        bail!("--workers must be at least 1");
    }
    if args.sub_chunk_kib == 0 {
        bail!("--sub-chunk-kib must be at least 1");
    }

    let start = Instant::now();

    eprintln!("Indexing reference suburbs from {}", args.reference.display());
    let reference =
        load_reference_index(&args.reference).context("failed to load suburb reference index")?;

    let config = EngineConfig::new(posts_path.clone(), args.reference.clone(), args.workers)
        .with_sub_chunk_budget(args.sub_chunk_kib * 1024)
        .with_count_all_for_t1(!args.qualified_only);

    eprintln!(
        "Aggregating {} with {} workers",
        posts_path.display(),
        args.workers
    );
    let global = coordinator::run(&config, &reference).context("aggregation failed")?;

    println!(
        "\nTask 1: Identify the Twitter accounts (users) that have made the most tweets"
    );
    println!("{}", render_top_authors(&global));

    println!(
        "\nTask 2: Count the number of different tweets made in the Greater Capital cities of Australia"
    );
    println!("{}", render_region_counts(&global));

    println!(
        "\nTask 3: Identify the users that have tweeted from the most different Greater Capital cities"
    );
    println!("{}", render_most_diverse_authors(&global));

    println!("\nExecution Time: {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_preset_falls_back_to_small() {
        assert_eq!(
            posts_path_for_preset(Some("huge")),
            PathBuf::from("data/smallTwitter.json")
        );
        assert_eq!(posts_path_for_preset(None), PathBuf::from("data/smallTwitter.json"));
    }

    #[test]
    fn known_presets_map_to_their_files() {
        assert_eq!(posts_path_for_preset(Some("tiny")), PathBuf::from("data/tinyTwitter.json"));
        assert_eq!(posts_path_for_preset(Some("big")), PathBuf::from("data/bigTwitter.json"));
    }
}
