use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{MatchRecord, Surface};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceStats {
    pub surface: Surface,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: Option<f64>,
    pub avg_aces: Option<f64>,
    pub avg_double_faults: Option<f64>,
    pub avg_break_points_saved: Option<f64>,
    pub avg_games_won_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Acc {
    matches: u32,
    wins: u32,
    aces: f64,
    dfs: f64,
    bps: f64,
    games_pct: f64,
}

/// Per-surface record and per-match averages for one player, ordered by surface.
pub fn surface_breakdown<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    player: &str,
) -> Vec<SurfaceStats> {
    let mut by_surface: BTreeMap<Surface, Acc> = BTreeMap::new();
    for r in matches.into_iter().filter(|r| r.player_name == player) {
        let acc = by_surface.entry(r.surface).or_default();
        acc.matches += 1;
        acc.wins += u32::from(r.outcome);
        acc.aces += r.num_aces as f64;
        acc.dfs += r.num_dfs as f64;
        acc.bps += r.num_brkpts_saved as f64;
        acc.games_pct += r.game_win_perc * 100.0;
    }

    by_surface
        .into_iter()
        .map(|(surface, acc)| {
            let per = |sum: f64| (acc.matches > 0).then(|| sum / acc.matches as f64);
            SurfaceStats {
                surface,
                matches: acc.matches,
                wins: acc.wins,
                losses: acc.matches - acc.wins,
                win_rate: per(acc.wins as f64),
                avg_aces: per(acc.aces),
                avg_double_faults: per(acc.dfs),
                avg_break_points_saved: per(acc.bps),
                avg_games_won_pct: per(acc.games_pct),
            }
        })
        .collect()
}
