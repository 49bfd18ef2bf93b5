use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::model::Surface;
use crate::store::MatchLog;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOverview {
    pub player: String,
    pub matches: u32,
    pub wins: u32,
    pub win_rate: Option<f64>,
    pub first_match: Option<NaiveDate>,
    pub last_match: Option<NaiveDate>,
    pub surfaces: Vec<Surface>,
}

/// One overview row per qualifying player, in player-name order.
pub fn roster(log: &MatchLog) -> Vec<PlayerOverview> {
    log.players()
        .par_iter()
        .map(|player| overview(log, player))
        .collect()
}

pub fn overview(log: &MatchLog, player: &str) -> PlayerOverview {
    let rows = log.player_rows(player);
    let matches = rows.len() as u32;
    let wins = rows.iter().filter(|r| r.outcome).count() as u32;
    let mut surfaces: Vec<Surface> = rows.iter().map(|r| r.surface).collect();
    surfaces.sort();
    surfaces.dedup();
    PlayerOverview {
        player: player.to_string(),
        matches,
        wins,
        win_rate: (matches > 0).then(|| wins as f64 / matches as f64),
        first_match: rows.iter().map(|r| r.tourney_date).min(),
        last_match: rows.iter().map(|r| r.tourney_date).max(),
        surfaces,
    }
}
