#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};

use atp_dashboard::{MatchRecord, Round, Surface};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn row(
    tourney_id: &str,
    match_num: i64,
    day: NaiveDate,
    player: &str,
    won: bool,
) -> MatchRecord {
    MatchRecord {
        tourney_id: tourney_id.to_string(),
        tourney_name: format!("{tourney_id} Open"),
        match_num,
        player_name: player.to_string(),
        surface: Surface::Hard,
        tourney_date: day,
        round: Some(Round::R32),
        year: day.year(),
        player_age: Some(24.0),
        rank: Some(12),
        num_aces: 4,
        num_dfs: 2,
        num_brkpts_saved: 3,
        num_brkpts_faced: 6,
        serve1_in_perc: 0.62,
        serve1_win_perc: 0.71,
        serve2_win_perc: 0.52,
        game_win_perc: if won { 0.6 } else { 0.4 },
        total_games_won: if won { 12 } else { 8 },
        total_games_lost: if won { 8 } else { 12 },
        outcome: won,
        pred_wins: Some(won),
    }
}

/// Both rows of one match.
pub fn played(
    tourney_id: &str,
    match_num: i64,
    day: NaiveDate,
    winner: &str,
    loser: &str,
) -> [MatchRecord; 2] {
    [
        row(tourney_id, match_num, day, winner, true),
        row(tourney_id, match_num, day, loser, false),
    ]
}

pub fn log_of(matches: impl IntoIterator<Item = [MatchRecord; 2]>) -> Vec<MatchRecord> {
    matches.into_iter().flatten().collect()
}
