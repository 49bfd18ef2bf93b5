use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::info;

use atp_dashboard::config::Config;
use atp_dashboard::match_table::COLUMNS;
use atp_dashboard::synthetic::{self, SyntheticConfig};
use atp_dashboard::{Dashboard, Granularity, Statistic, Surface, export, fetch, logging};

const USAGE: &str = "usage: atp_dashboard <command> [options]

commands:
  players                                   list qualifying players
  opponents   --player P                    opponents in chronological order
  matches     --player P [--surface S] [--from Y] [--to Y]
  timeline    --player P --stat NAME [--surface S] [--quarterly]
  h2h         --player P [--opponent O]
  predictions --player P [--surfaces Hard,Clay]
  surfaces    --player P
  roster
  export      --player P [--opponent O] --out FILE.xlsx

options:
  --dataset PATH|URL   overrides ATP_DATASET
  --min-matches N      overrides ATP_MIN_MATCHES
  --synthetic          use a generated match log instead of the dataset
  --json               print JSON instead of text";

fn main() -> Result<()> {
    let mut cfg = Config::from_env();
    logging::init(&cfg.log_filter);

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = args.first().cloned() else {
        println!("{USAGE}");
        return Ok(());
    };
    if command == "help" || command == "--help" {
        println!("{USAGE}");
        return Ok(());
    }

    if let Some(dataset) = flag_value(&args, "--dataset") {
        cfg.dataset = dataset;
    }
    if let Some(n) = flag_value(&args, "--min-matches") {
        cfg.min_matches = n
            .parse()
            .with_context(|| format!("invalid --min-matches `{n}`"))?;
    }
    let json = has_flag(&args, "--json");
    let dashboard = load_dashboard(&cfg, has_flag(&args, "--synthetic"))?;

    match command.as_str() {
        "players" => emit(json, &dashboard.players(), || dashboard.players().join("\n")),
        "opponents" => {
            let player = required(&args, "--player")?;
            let opponents = dashboard.opponents(&player)?;
            emit(json, &opponents, || opponents.join("\n"))
        }
        "matches" => {
            let player = required(&args, "--player")?;
            let surface = optional_surface(&args, "--surface")?;
            let (lo, hi) = dashboard.year_bounds().unwrap_or((0, 0));
            let from = optional_i32(&args, "--from")?.unwrap_or(lo);
            let to = optional_i32(&args, "--to")?.unwrap_or(hi);
            let rows = dashboard.filtered_match_table(&player, surface, (from, to))?;
            emit(json, &rows, || {
                let mut table: Vec<Vec<String>> =
                    vec![COLUMNS.iter().map(|c| c.to_string()).collect()];
                table.extend(rows.iter().map(|r| r.cells()));
                render_table(&table)
            })
        }
        "timeline" => {
            let player = required(&args, "--player")?;
            let stat = required(&args, "--stat")?.parse::<Statistic>()?;
            let surface = optional_surface(&args, "--surface")?;
            let granularity = if has_flag(&args, "--quarterly") {
                Granularity::Quarter
            } else {
                Granularity::Month
            };
            let series = dashboard.statistic_timeline(&player, surface, stat, granularity)?;
            emit(json, &series, || {
                let mut table = vec![vec![
                    granularity.axis_label().to_string(),
                    "Matches".to_string(),
                    series.title.to_string(),
                ]];
                for p in &series.points {
                    table.push(vec![p.label.clone(), p.matches.to_string(), fmt_opt(p.value)]);
                }
                render_table(&table)
            })
        }
        "h2h" => {
            let player = required(&args, "--player")?;
            let opponent = match flag_value(&args, "--opponent") {
                Some(o) => o,
                None => dashboard.default_opponent(&player)?.to_string(),
            };
            let h2h = dashboard.head_to_head(&player, &opponent)?;
            emit(json, &h2h, || {
                let mut out = format!(
                    "{} vs {}\n\
                     Wins - Losses: {}\n\
                     Avg # Aces Per Match: {}\n\
                     Avg # Double Faults Per Match: {}\n\
                     Avg # Break Points Saved Per Match: {}\n",
                    h2h.player_a,
                    h2h.player_b,
                    h2h.record_label(),
                    fmt_opt(h2h.avg_aces),
                    fmt_opt(h2h.avg_double_faults),
                    fmt_opt(h2h.avg_break_points_saved),
                );
                let mut table = vec![vec![
                    "#".to_string(),
                    "Date".to_string(),
                    "Tournament".to_string(),
                    h2h.player_a.clone(),
                    h2h.player_b.clone(),
                ]];
                for m in &h2h.matches {
                    table.push(vec![
                        m.match_index.to_string(),
                        m.tourney_date.to_string(),
                        m.tourney_name.clone(),
                        m.a_cumulative_wins.to_string(),
                        m.b_cumulative_wins.to_string(),
                    ]);
                }
                out.push_str(&render_table(&table));
                out
            })
        }
        "predictions" => {
            let player = required(&args, "--player")?;
            let surfaces = surface_list(&args, "--surfaces")?;
            let summary = dashboard.prediction_summary(&player, &surfaces)?;
            emit(json, &summary, || {
                let c = summary.confusion;
                let m = summary.metrics;
                let mut out = format!(
                    "actual W / predicted W: {}\n\
                     actual W / predicted L: {}\n\
                     actual L / predicted W: {}\n\
                     actual L / predicted L: {}\n\
                     accuracy {}  precision {}  recall {}  f1 {}\n",
                    c.true_win,
                    c.false_loss,
                    c.false_win,
                    c.true_loss,
                    fmt_opt(m.accuracy),
                    fmt_opt(m.precision),
                    fmt_opt(m.recall),
                    fmt_opt(m.f1),
                );
                let mut table = vec![vec![
                    "Year".to_string(),
                    "Matches".to_string(),
                    "Actual Wins".to_string(),
                    "Predicted Wins".to_string(),
                ]];
                for y in &summary.by_year {
                    table.push(vec![
                        y.year.to_string(),
                        y.matches.to_string(),
                        y.actual_wins.to_string(),
                        y.predicted_wins.to_string(),
                    ]);
                }
                out.push_str(&render_table(&table));
                out
            })
        }
        "surfaces" => {
            let player = required(&args, "--player")?;
            let rows = dashboard.surface_breakdown(&player)?;
            emit(json, &rows, || {
                let mut table = vec![vec![
                    "Surface".to_string(),
                    "W-L".to_string(),
                    "Win %".to_string(),
                    "Aces".to_string(),
                    "DFs".to_string(),
                    "BP Saved".to_string(),
                ]];
                for s in &rows {
                    table.push(vec![
                        s.surface.to_string(),
                        format!("{}-{}", s.wins, s.losses),
                        fmt_opt(s.win_rate.map(|r| r * 100.0)),
                        fmt_opt(s.avg_aces),
                        fmt_opt(s.avg_double_faults),
                        fmt_opt(s.avg_break_points_saved),
                    ]);
                }
                render_table(&table)
            })
        }
        "roster" => {
            let rows = dashboard.roster();
            emit(json, &rows, || {
                let mut table = vec![vec![
                    "Player".to_string(),
                    "Matches".to_string(),
                    "Wins".to_string(),
                    "Win %".to_string(),
                    "First".to_string(),
                    "Last".to_string(),
                ]];
                for r in &rows {
                    table.push(vec![
                        r.player.clone(),
                        r.matches.to_string(),
                        r.wins.to_string(),
                        fmt_opt(r.win_rate.map(|w| w * 100.0)),
                        r.first_match.map(|d| d.to_string()).unwrap_or_default(),
                        r.last_match.map(|d| d.to_string()).unwrap_or_default(),
                    ]);
                }
                render_table(&table)
            })
        }
        "export" => {
            let player = required(&args, "--player")?;
            let out = PathBuf::from(required(&args, "--out")?);
            let opponent = flag_value(&args, "--opponent");
            let report = export::write_workbook(&out, &dashboard, &player, opponent.as_deref())?;
            println!("workbook written: {}", out.display());
            println!(
                "matches={} timeline={} surfaces={} h2h={} prediction_years={}",
                report.matches,
                report.timeline_points,
                report.surfaces,
                report.head_to_head,
                report.prediction_years
            );
            Ok(())
        }
        other => Err(anyhow!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn load_dashboard(cfg: &Config, synthetic: bool) -> Result<Dashboard> {
    if synthetic {
        let records = synthetic::generate(&SyntheticConfig::default());
        info!(rows = records.len(), "using synthetic match log");
        return Ok(Dashboard::new(records, cfg.min_matches.min(1)));
    }
    let path = fetch::resolve_dataset(
        &cfg.dataset,
        cfg.cache_dir.as_deref(),
        cfg.download_attempts,
    )?;
    let (dashboard, _report) = Dashboard::from_parquet(&path, cfg.min_matches)?;
    Ok(dashboard)
}

fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("serialize output")?
        );
    } else {
        print!("{}", text());
        println!();
    }
    Ok(())
}

fn render_table(rows: &[Vec<String>]) -> String {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; cols];
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| format!("{cell:<width$}", width = widths[idx]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&format!("{name}="))
            && !v.trim().is_empty()
        {
            return Some(v.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn required(args: &[String], name: &str) -> Result<String> {
    flag_value(args, name).ok_or_else(|| anyhow!("missing required {name}"))
}

fn optional_i32(args: &[String], name: &str) -> Result<Option<i32>> {
    flag_value(args, name)
        .map(|raw| {
            raw.parse::<i32>()
                .with_context(|| format!("invalid {name} `{raw}`"))
        })
        .transpose()
}

fn optional_surface(args: &[String], name: &str) -> Result<Option<Surface>> {
    Ok(flag_value(args, name)
        .map(|raw| raw.parse::<Surface>())
        .transpose()?)
}

fn surface_list(args: &[String], name: &str) -> Result<Vec<Surface>> {
    let Some(raw) = flag_value(args, name) else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for part in raw.split([',', ';']).map(str::trim).filter(|p| !p.is_empty()) {
        out.push(part.parse::<Surface>()?);
    }
    Ok(out)
}
