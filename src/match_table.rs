use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{MatchRecord, Round, Surface};

pub const COLUMNS: [&str; 17] = [
    "Tourney Name",
    "Surface",
    "Tourney Date",
    "Player Age",
    "Rank",
    "Round",
    "# Aces",
    "# Double Faults",
    "1st Serve In %",
    "1st Serve Win %",
    "2nd Serve Win %",
    "# Breakpoints Saved",
    "# Breakpoints Faced",
    "Outcome",
    "# Games Won",
    "# Games Lost",
    "% Games Won",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTableRow {
    pub tourney_name: String,
    pub surface: Surface,
    pub tourney_date: NaiveDate,
    pub player_age: Option<f64>,
    pub rank: Option<u32>,
    pub round: Option<Round>,
    pub aces: u32,
    pub double_faults: u32,
    pub serve1_in_pct: f64,
    pub serve1_win_pct: f64,
    pub serve2_win_pct: f64,
    pub break_points_saved: u32,
    pub break_points_faced: u32,
    pub won: bool,
    pub games_won: u32,
    pub games_lost: u32,
    pub games_won_pct: f64,
}

impl MatchTableRow {
    fn from_record(r: &MatchRecord) -> Self {
        Self {
            tourney_name: r.tourney_name.clone(),
            surface: r.surface,
            tourney_date: r.tourney_date,
            player_age: r.player_age.map(round1),
            rank: r.rank,
            round: r.round,
            aces: r.num_aces,
            double_faults: r.num_dfs,
            serve1_in_pct: round2(r.serve1_in_perc),
            serve1_win_pct: round2(r.serve1_win_perc),
            serve2_win_pct: round2(r.serve2_win_perc),
            break_points_saved: r.num_brkpts_saved,
            break_points_faced: r.num_brkpts_faced,
            won: r.outcome,
            games_won: r.total_games_won,
            games_lost: r.total_games_lost,
            games_won_pct: round1(r.game_win_perc * 100.0),
        }
    }

    /// Cells in `COLUMNS` order, formatted for display.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.tourney_name.clone(),
            self.surface.to_string(),
            self.tourney_date.format("%Y-%m-%d").to_string(),
            opt_to_string(self.player_age),
            opt_to_string(self.rank),
            opt_to_string(self.round),
            self.aces.to_string(),
            self.double_faults.to_string(),
            format!("{:.2}", self.serve1_in_pct),
            format!("{:.2}", self.serve1_win_pct),
            format!("{:.2}", self.serve2_win_pct),
            self.break_points_saved.to_string(),
            self.break_points_faced.to_string(),
            if self.won { "W" } else { "L" }.to_string(),
            self.games_won.to_string(),
            self.games_lost.to_string(),
            format!("{:.1}%", self.games_won_pct),
        ]
    }
}

/// Player's matches on `surface` (all surfaces when `None`) within an
/// inclusive year range, by date and then earliest round first.
pub fn filtered_match_table<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    player: &str,
    surface: Option<Surface>,
    years: (i32, i32),
) -> Vec<MatchTableRow> {
    let (from, to) = years;
    let mut rows: Vec<&MatchRecord> = matches
        .into_iter()
        .filter(|r| r.player_name == player)
        .filter(|r| surface.is_none_or(|s| s == r.surface))
        .filter(|r| r.year >= from && r.year <= to)
        .collect();
    rows.sort_by(|a, b| {
        a.tourney_date
            .cmp(&b.tourney_date)
            .then_with(|| round_order(a.round, b.round))
            .then(a.match_key().cmp(&b.match_key()))
    });
    rows.into_iter().map(MatchTableRow::from_record).collect()
}

fn round_order(a: Option<Round>, b: Option<Round>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// Serve rates stay fractions, as in the timeline.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
