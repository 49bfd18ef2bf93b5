use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{MatchRecord, Round, Surface};

const NAMES: &[&str] = &[
    "Andre Agassi",
    "Pete Sampras",
    "Roger Federer",
    "Rafael Nadal",
    "Novak Djokovic",
    "Andy Murray",
    "Lleyton Hewitt",
    "Marat Safin",
    "Juan Martin del Potro",
    "Stan Wawrinka",
    "David Ferrer",
    "Tomas Berdych",
];

const ROUNDS: &[Round] = &[
    Round::R32,
    Round::R16,
    Round::Qf,
    Round::Sf,
    Round::F,
];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub players: usize,
    pub matches: usize,
    pub matches_per_tourney: usize,
    pub start: NaiveDate,
    /// Chance that a row's prediction agrees with its outcome.
    pub pred_accuracy: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            players: 8,
            matches: 400,
            matches_per_tourney: 5,
            start: NaiveDate::from_ymd_opt(2015, 1, 5).unwrap_or_default(),
            pred_accuracy: 0.75,
        }
    }
}

pub fn player_name(idx: usize) -> String {
    NAMES
        .get(idx)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Player {:03}", idx + 1))
}

/// Deterministic match log: two rows per match, exactly one winner.
pub fn generate(cfg: &SyntheticConfig) -> Vec<MatchRecord> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let players = cfg.players.max(2);
    let per_tourney = cfg.matches_per_tourney.max(1);
    let skill: Vec<f64> = (0..players).map(|_| rng.gen_range(0.35..0.65)).collect();
    let mut out = Vec::with_capacity(cfg.matches * 2);

    for m in 0..cfg.matches {
        let tourney = m / per_tourney;
        let slot = m % per_tourney;
        let date = cfg.start + Duration::days(7 * tourney as i64);
        let surface = Surface::ALL[tourney % Surface::ALL.len()];
        let tourney_id = format!("{}-{:04}", date.year(), tourney);
        let round = ROUNDS[slot % ROUNDS.len()];

        let a = rng.gen_range(0..players);
        let mut b = rng.gen_range(0..players - 1);
        if b >= a {
            b += 1;
        }
        let p_a = skill[a] / (skill[a] + skill[b]);
        let a_wins = rng.gen_bool(p_a.clamp(0.05, 0.95));

        let games_a: u32 = rng.gen_range(6..20);
        let games_b: u32 = rng.gen_range(6..20);
        let (won_a, won_b) = if a_wins {
            (games_a.max(games_b + 1), games_b.min(games_a))
        } else {
            (games_a.min(games_b), games_b.max(games_a + 1))
        };

        for (idx, won, games_won, games_lost) in
            [(a, a_wins, won_a, won_b), (b, !a_wins, won_b, won_a)]
        {
            let pred = if rng.gen_bool(cfg.pred_accuracy.clamp(0.0, 1.0)) {
                won
            } else {
                !won
            };
            let faced: u32 = rng.gen_range(0..15);
            out.push(MatchRecord {
                tourney_id: tourney_id.clone(),
                tourney_name: format!("Synthetic Open {tourney}"),
                match_num: slot as i64 + 1,
                player_name: player_name(idx),
                surface,
                tourney_date: date,
                round: Some(round),
                year: date.year(),
                player_age: Some(20.0 + rng.gen_range(0.0..15.0)),
                rank: Some(rng.gen_range(1..200)),
                num_aces: rng.gen_range(0..25),
                num_dfs: rng.gen_range(0..10),
                num_brkpts_saved: rng.gen_range(0..=faced),
                num_brkpts_faced: faced,
                serve1_in_perc: rng.gen_range(0.45..0.75),
                serve1_win_perc: rng.gen_range(0.55..0.85),
                serve2_win_perc: rng.gen_range(0.35..0.65),
                game_win_perc: games_won as f64 / (games_won + games_lost).max(1) as f64,
                total_games_won: games_won,
                total_games_lost: games_lost,
                outcome: won,
                pred_wins: Some(pred),
            });
        }
    }
    out
}
