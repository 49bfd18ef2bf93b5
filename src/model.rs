use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Surface {
    Carpet,
    Clay,
    Grass,
    Hard,
}

impl Surface {
    pub const ALL: [Surface; 4] = [Surface::Carpet, Surface::Clay, Surface::Grass, Surface::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Surface::Carpet => "Carpet",
            Surface::Clay => "Clay",
            Surface::Grass => "Grass",
            Surface::Hard => "Hard",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hard" => Some(Surface::Hard),
            "clay" => Some(Surface::Clay),
            "grass" => Some(Surface::Grass),
            "carpet" => Some(Surface::Carpet),
            _ => None,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Surface {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Surface::parse(s).ok_or_else(|| QueryError::UnknownSurface(s.to_string()))
    }
}

/// Tournament round. Declaration order is the rank order: `Er` is the
/// lowest, `F` (final) the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Round {
    Er,
    Br,
    Rr,
    R128,
    R64,
    R32,
    R16,
    Qf,
    Sf,
    F,
}

impl Round {
    pub fn code(self) -> &'static str {
        match self {
            Round::F => "F",
            Round::Sf => "SF",
            Round::Qf => "QF",
            Round::R16 => "R16",
            Round::R32 => "R32",
            Round::R64 => "R64",
            Round::R128 => "R128",
            Round::Rr => "RR",
            Round::Br => "BR",
            Round::Er => "ER",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "F" => Some(Round::F),
            "SF" => Some(Round::Sf),
            "QF" => Some(Round::Qf),
            "R16" => Some(Round::R16),
            "R32" => Some(Round::R32),
            "R64" => Some(Round::R64),
            "R128" => Some(Round::R128),
            "RR" => Some(Round::Rr),
            "BR" => Some(Round::Br),
            "ER" => Some(Round::Er),
            _ => None,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One participant's view of one match. Every match contributes two of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub tourney_id: String,
    pub tourney_name: String,
    pub match_num: i64,
    pub player_name: String,
    pub surface: Surface,
    pub tourney_date: NaiveDate,
    pub round: Option<Round>,
    pub year: i32,
    pub player_age: Option<f64>,
    pub rank: Option<u32>,
    pub num_aces: u32,
    pub num_dfs: u32,
    pub num_brkpts_saved: u32,
    pub num_brkpts_faced: u32,
    pub serve1_in_perc: f64,
    pub serve1_win_perc: f64,
    pub serve2_win_perc: f64,
    pub game_win_perc: f64,
    pub total_games_won: u32,
    pub total_games_lost: u32,
    pub outcome: bool,
    pub pred_wins: Option<bool>,
}

impl MatchRecord {
    pub fn match_key(&self) -> MatchKey<'_> {
        MatchKey {
            tourney_id: &self.tourney_id,
            match_num: self.match_num,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchKey<'a> {
    pub tourney_id: &'a str,
    pub match_num: i64,
}

impl fmt::Display for MatchKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tourney_id, self.match_num)
    }
}
