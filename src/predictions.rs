use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{MatchRecord, Surface};

/// Predicted vs actual tally. "Positive" is a win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub true_win: u32,
    pub false_win: u32,
    pub false_loss: u32,
    pub true_loss: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub accuracy: Option<f64>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
}

impl Confusion {
    pub fn push(&mut self, predicted: bool, actual: bool) {
        match (actual, predicted) {
            (true, true) => self.true_win += 1,
            (false, true) => self.false_win += 1,
            (true, false) => self.false_loss += 1,
            (false, false) => self.true_loss += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.true_win + self.false_win + self.false_loss + self.true_loss
    }

    pub fn predicted_wins(&self) -> u32 {
        self.true_win + self.false_win
    }

    pub fn actual_wins(&self) -> u32 {
        self.true_win + self.false_loss
    }

    pub fn metrics(&self) -> ClassificationMetrics {
        let accuracy = ratio(self.true_win + self.true_loss, self.total());
        let precision = ratio(self.true_win, self.predicted_wins());
        let recall = ratio(self.true_win, self.actual_wins());
        let f1 = match (precision, recall) {
            (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
            _ => None,
        };
        ClassificationMetrics {
            accuracy,
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(num: u32, den: u32) -> Option<f64> {
    (den > 0).then(|| num as f64 / den as f64)
}

pub fn confusion_from_pairs(pairs: impl IntoIterator<Item = (bool, bool)>) -> Confusion {
    let mut c = Confusion::default();
    for (predicted, actual) in pairs {
        c.push(predicted, actual);
    }
    c
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearWins {
    pub year: i32,
    pub matches: u32,
    pub actual_wins: u32,
    pub predicted_wins: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub player: String,
    pub surfaces: Vec<Surface>,
    pub confusion: Confusion,
    pub metrics: ClassificationMetrics,
    /// Rows in the selection that had no prediction attached.
    pub unpredicted: u32,
    pub by_year: Vec<YearWins>,
}

/// Scores the externally produced `pred_wins` column against outcomes for one
/// player. An empty surface list selects every surface.
pub fn prediction_summary<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    player: &str,
    surfaces: &[Surface],
) -> PredictionSummary {
    let mut confusion = Confusion::default();
    let mut unpredicted = 0u32;
    let mut years: BTreeMap<i32, YearWins> = BTreeMap::new();

    for r in matches {
        if r.player_name != player || !(surfaces.is_empty() || surfaces.contains(&r.surface)) {
            continue;
        }
        let Some(predicted) = r.pred_wins else {
            unpredicted += 1;
            continue;
        };
        confusion.push(predicted, r.outcome);
        let y = years.entry(r.year).or_insert(YearWins {
            year: r.year,
            matches: 0,
            actual_wins: 0,
            predicted_wins: 0,
        });
        y.matches += 1;
        y.actual_wins += u32::from(r.outcome);
        y.predicted_wins += u32::from(predicted);
    }

    let mut surfaces = surfaces.to_vec();
    surfaces.sort();
    surfaces.dedup();

    PredictionSummary {
        player: player.to_string(),
        surfaces,
        confusion,
        metrics: confusion.metrics(),
        unpredicted,
        by_year: years.into_values().collect(),
    }
}
