use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use crate::match_table::COLUMNS;
use crate::query::Dashboard;
use crate::statistic::Statistic;
use crate::timeline::Granularity;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub matches: usize,
    pub timeline_points: usize,
    pub surfaces: usize,
    pub head_to_head: usize,
    pub prediction_years: usize,
}

pub struct Sheet {
    pub name: &'static str,
    pub rows: Vec<Vec<String>>,
}

/// Tabulates everything the dashboard shows for `player` (and optionally one
/// opponent). The first row of every sheet is its header; the report counts
/// data rows only.
pub fn build_sheets(
    dashboard: &Dashboard,
    player: &str,
    opponent: Option<&str>,
) -> Result<(Vec<Sheet>, ExportReport)> {
    let years = dashboard.year_bounds().unwrap_or((i32::MIN, i32::MAX));
    let mut report = ExportReport::default();

    let mut match_rows = vec![COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>()];
    for row in dashboard.filtered_match_table(player, None, years)? {
        match_rows.push(row.cells());
    }
    report.matches = match_rows.len() - 1;

    let mut timeline_rows = vec![vec![
        "Statistic".to_string(),
        "Month".to_string(),
        "Matches".to_string(),
        "Value".to_string(),
    ]];
    for stat in Statistic::ALL {
        let series = dashboard.statistic_timeline(player, None, stat, Granularity::Month)?;
        for point in series.non_empty() {
            report.timeline_points += 1;
            timeline_rows.push(vec![
                stat.name().to_string(),
                point.label.clone(),
                point.matches.to_string(),
                opt_num(point.value),
            ]);
        }
    }

    let mut surface_rows = vec![vec![
        "Surface".to_string(),
        "Matches".to_string(),
        "Wins".to_string(),
        "Losses".to_string(),
        "Win %".to_string(),
        "Avg Aces".to_string(),
        "Avg Double Faults".to_string(),
        "Avg Break Points Saved".to_string(),
        "Avg % Games Won".to_string(),
    ]];
    let breakdown = dashboard.surface_breakdown(player)?;
    report.surfaces = breakdown.len();
    for s in breakdown {
        surface_rows.push(vec![
            s.surface.to_string(),
            s.matches.to_string(),
            s.wins.to_string(),
            s.losses.to_string(),
            opt_num(s.win_rate.map(|r| r * 100.0)),
            opt_num(s.avg_aces),
            opt_num(s.avg_double_faults),
            opt_num(s.avg_break_points_saved),
            opt_num(s.avg_games_won_pct),
        ]);
    }

    let mut sheets = vec![
        Sheet {
            name: "Matches",
            rows: match_rows,
        },
        Sheet {
            name: "Timeline",
            rows: timeline_rows,
        },
        Sheet {
            name: "Surfaces",
            rows: surface_rows,
        },
    ];

    if let Some(opponent) = opponent {
        let h2h = dashboard.head_to_head(player, opponent)?;
        report.head_to_head = h2h.matches.len();
        let mut rows = vec![vec![
            "#".to_string(),
            "Date".to_string(),
            "Tournament".to_string(),
            "Surface".to_string(),
            "Round".to_string(),
            "Winner".to_string(),
            format!("{player} Wins"),
            format!("{opponent} Wins"),
        ]];
        for m in &h2h.matches {
            rows.push(vec![
                m.match_index.to_string(),
                m.tourney_date.format("%Y-%m-%d").to_string(),
                m.tourney_name.clone(),
                m.surface.to_string(),
                m.round.map(|r| r.to_string()).unwrap_or_default(),
                if m.a_won { player } else { opponent }.to_string(),
                m.a_cumulative_wins.to_string(),
                m.b_cumulative_wins.to_string(),
            ]);
        }
        sheets.push(Sheet {
            name: "Head To Head",
            rows,
        });
    }

    let preds = dashboard.prediction_summary(player, &[])?;
    report.prediction_years = preds.by_year.len();
    let mut pred_rows = vec![vec![
        "Year".to_string(),
        "Matches".to_string(),
        "Actual Wins".to_string(),
        "Predicted Wins".to_string(),
    ]];
    for y in &preds.by_year {
        pred_rows.push(vec![
            y.year.to_string(),
            y.matches.to_string(),
            y.actual_wins.to_string(),
            y.predicted_wins.to_string(),
        ]);
    }
    let m = preds.metrics;
    for (label, value) in [
        ("Accuracy", m.accuracy),
        ("Precision", m.precision),
        ("Recall", m.recall),
        ("F1", m.f1),
    ] {
        pred_rows.push(vec![label.to_string(), opt_num(value)]);
    }
    sheets.push(Sheet {
        name: "Predictions",
        rows: pred_rows,
    });

    Ok((sheets, report))
}

pub fn write_workbook(
    path: &Path,
    dashboard: &Dashboard,
    player: &str,
    opponent: Option<&str>,
) -> Result<ExportReport> {
    let (sheets, report) = build_sheets(dashboard, player, opponent)?;

    let mut workbook = Workbook::new();
    for sheet in &sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;
        write_rows(worksheet, &sheet.rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    info!(path = %path.display(), player, matches = report.matches, "workbook exported");
    Ok(report)
}

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
