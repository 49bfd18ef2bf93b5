use std::collections::BTreeMap;

use anyhow::{Context, Result};

use atp_dashboard::config::Config;
use atp_dashboard::store::MatchLog;
use atp_dashboard::{dataset, fetch, logging};

fn main() -> Result<()> {
    let mut cfg = Config::from_env();
    logging::init(&cfg.log_filter);
    if let Some(dataset) = parse_dataset_arg() {
        cfg.dataset = dataset;
    }

    let path = fetch::resolve_dataset(&cfg.dataset, cfg.cache_dir.as_deref(), cfg.download_attempts)
        .context("unable to resolve match log")?;
    let (records, report) = dataset::read_parquet(&path)?;
    let log = MatchLog::new(records, cfg.min_matches);

    println!("Dataset check complete");
    println!("File: {}", path.display());
    println!(
        "Rows: read={} skipped={} defaulted_values={}",
        report.rows_read, report.rows_skipped, report.values_defaulted
    );
    println!(
        "Predictions column: {}",
        if report.has_predictions { "present" } else { "missing" }
    );
    if !report.skip_samples.is_empty() {
        println!("  skipped rows:");
        for sample in report.skip_samples.iter().take(6) {
            println!("   - {sample}");
        }
    }

    println!(
        "Qualifying players (>= {} rows): {}",
        log.min_matches(),
        log.players().len()
    );
    println!("Rows kept: {}", log.len());
    if let Some((lo, hi)) = log.year_bounds() {
        println!("Years: {lo}-{hi}");
    }

    let mut per_surface = BTreeMap::new();
    for record in log.records() {
        *per_surface.entry(record.surface).or_insert(0usize) += 1;
    }
    for (surface, rows) in per_surface {
        println!("surface {surface}: rows={rows}");
    }

    let pairs = log.pair_report();
    println!(
        "Pair check: violations={} orphans={}",
        pairs.violations.len(),
        pairs.orphans
    );
    for violation in pairs.violations.iter().take(6) {
        println!("   - {violation}");
    }

    Ok(())
}

fn parse_dataset_arg() -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("--dataset=") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == "--dataset" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
