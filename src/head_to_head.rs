use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{MatchKey, MatchRecord, Round, Surface};

/// One match between the two players, seen from player A.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadMatch {
    pub match_index: usize,
    pub tourney_name: String,
    pub tourney_date: NaiveDate,
    pub surface: Surface,
    pub round: Option<Round>,
    pub a_won: bool,
    pub a_cumulative_wins: u32,
    pub b_cumulative_wins: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadSummary {
    pub player_a: String,
    pub player_b: String,
    pub wins: u32,
    pub losses: u32,
    /// Player A's per-match averages, rounded; `None` when they never met.
    pub avg_aces: Option<f64>,
    pub avg_double_faults: Option<f64>,
    pub avg_break_points_saved: Option<f64>,
    pub matches: Vec<HeadToHeadMatch>,
}

impl HeadToHeadSummary {
    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn record_label(&self) -> String {
        format!("{} - {}", self.wins, self.losses)
    }
}

/// Inner join of A's and B's rows on `(tourney_id, match_num)`.
pub fn head_to_head<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    player_a: &str,
    player_b: &str,
) -> HeadToHeadSummary {
    let mut a_rows: Vec<&MatchRecord> = Vec::new();
    let mut b_keys: HashMap<MatchKey<'a>, &MatchRecord> = HashMap::new();
    for r in matches {
        if r.player_name == player_a {
            a_rows.push(r);
        } else if r.player_name == player_b {
            b_keys.insert(r.match_key(), r);
        }
    }

    let mut joined: Vec<&MatchRecord> = a_rows
        .into_iter()
        .filter(|a| b_keys.contains_key(&a.match_key()))
        .collect();
    joined.sort_by(|x, y| {
        x.tourney_date
            .cmp(&y.tourney_date)
            .then(x.match_key().cmp(&y.match_key()))
    });

    let wins = joined.iter().filter(|r| r.outcome).count() as u32;
    let losses = joined.len() as u32 - wins;

    let mut a_cum = 0u32;
    let mut b_cum = 0u32;
    let timeline = joined
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            if r.outcome {
                a_cum += 1;
            } else {
                b_cum += 1;
            }
            HeadToHeadMatch {
                match_index: idx + 1,
                tourney_name: r.tourney_name.clone(),
                tourney_date: r.tourney_date,
                surface: r.surface,
                round: r.round,
                a_won: r.outcome,
                a_cumulative_wins: a_cum,
                b_cumulative_wins: b_cum,
            }
        })
        .collect();

    HeadToHeadSummary {
        player_a: player_a.to_string(),
        player_b: player_b.to_string(),
        wins,
        losses,
        avg_aces: rounded_mean(joined.iter().map(|r| r.num_aces as f64)),
        avg_double_faults: rounded_mean(joined.iter().map(|r| r.num_dfs as f64)),
        avg_break_points_saved: rounded_mean(joined.iter().map(|r| r.num_brkpts_saved as f64)),
        matches: timeline,
    }
}

fn rounded_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (n, sum) = values.fold((0usize, 0.0_f64), |(n, s), v| (n + 1, s + v));
    if n == 0 {
        return None;
    }
    // Halves go to the even neighbour: 2.5 -> 2, 3.5 -> 4.
    Some((sum / n as f64).round_ties_even())
}
