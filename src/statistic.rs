use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::model::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Statistic {
    Aces,
    DoubleFaults,
    BreakPointsSaved,
    BreakPointsFaced,
    GamesWonPct,
    FirstServeInPct,
    FirstServeWinPct,
    SecondServeWinPct,
}

struct StatSpec {
    stat: Statistic,
    name: &'static str,
    axis_label: &'static str,
    reduction: Reduction,
    value: fn(&MatchRecord) -> f64,
}

static STATS: [StatSpec; 8] = [
    StatSpec {
        stat: Statistic::Aces,
        name: "Aces",
        axis_label: "# Aces",
        reduction: Reduction::Sum,
        value: |r| r.num_aces as f64,
    },
    StatSpec {
        stat: Statistic::DoubleFaults,
        name: "Double Faults",
        axis_label: "# Double Faults",
        reduction: Reduction::Sum,
        value: |r| r.num_dfs as f64,
    },
    StatSpec {
        stat: Statistic::BreakPointsSaved,
        name: "Break Points Saved",
        axis_label: "# Break Points Saved",
        reduction: Reduction::Sum,
        value: |r| r.num_brkpts_saved as f64,
    },
    StatSpec {
        stat: Statistic::BreakPointsFaced,
        name: "Break Points Faced",
        axis_label: "# Break Points Faced",
        reduction: Reduction::Sum,
        value: |r| r.num_brkpts_faced as f64,
    },
    StatSpec {
        stat: Statistic::GamesWonPct,
        name: "% Games Won",
        axis_label: "% Games Won",
        reduction: Reduction::Mean,
        // Shown as a percentage.
        value: |r| r.game_win_perc * 100.0,
    },
    StatSpec {
        stat: Statistic::FirstServeInPct,
        name: "1st Serve In %",
        axis_label: "1st Serve In %",
        reduction: Reduction::Mean,
        value: |r| r.serve1_in_perc,
    },
    StatSpec {
        stat: Statistic::FirstServeWinPct,
        name: "1st Serve Win %",
        axis_label: "1st Serve Win %",
        reduction: Reduction::Mean,
        value: |r| r.serve1_win_perc,
    },
    StatSpec {
        stat: Statistic::SecondServeWinPct,
        name: "2nd Serve Win %",
        axis_label: "2nd Serve Win %",
        reduction: Reduction::Mean,
        value: |r| r.serve2_win_perc,
    },
];

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Aces,
        Statistic::DoubleFaults,
        Statistic::BreakPointsSaved,
        Statistic::BreakPointsFaced,
        Statistic::GamesWonPct,
        Statistic::FirstServeInPct,
        Statistic::FirstServeWinPct,
        Statistic::SecondServeWinPct,
    ];

    fn spec(self) -> &'static StatSpec {
        // STATS is declared in the same order as ALL.
        &STATS[self as usize]
    }

    /// Display name, also the accepted input spelling.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn axis_label(self) -> &'static str {
        self.spec().axis_label
    }

    pub fn reduction(self) -> Reduction {
        self.spec().reduction
    }

    pub fn value(self, record: &MatchRecord) -> f64 {
        (self.spec().value)(record)
    }

    /// Dropdown choices, sorted by display name.
    pub fn choices() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = STATS.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        STATS
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(wanted))
            .map(|spec| spec.stat)
            .ok_or_else(|| QueryError::UnknownStatistic(s.to_string()))
    }
}
