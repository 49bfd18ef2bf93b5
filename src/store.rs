use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use crate::model::{MatchKey, MatchRecord, Surface};

/// Keys of matches that break the two-rows-one-winner rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairReport {
    pub violations: Vec<String>,
    /// Matches left with a single row because the opponent fell below the
    /// appearance threshold.
    pub orphans: usize,
}

/// Immutable, in-memory match log after the minimum-appearance filter.
///
/// Rows are kept sorted by `(tourney_id, match_num, player_name)`, which is
/// the order every derived index relies on.
#[derive(Debug, Clone)]
pub struct MatchLog {
    records: Vec<MatchRecord>,
    min_matches: usize,
    players: Vec<String>,
    surfaces: Vec<Surface>,
    year_bounds: Option<(i32, i32)>,
    by_player: HashMap<String, Vec<usize>>,
}

impl MatchLog {
    pub fn new(records: Vec<MatchRecord>, min_matches: usize) -> Self {
        let total_rows = records.len();
        let mut totals: HashMap<&str, usize> = HashMap::new();
        for r in &records {
            *totals.entry(r.player_name.as_str()).or_insert(0) += 1;
        }
        let keep: BTreeSet<String> = totals
            .into_iter()
            .filter(|(_, n)| *n >= min_matches)
            .map(|(name, _)| name.to_string())
            .collect();

        let mut records: Vec<MatchRecord> = records
            .into_iter()
            .filter(|r| keep.contains(&r.player_name))
            .collect();
        records.sort_by(|a, b| {
            a.tourney_id
                .cmp(&b.tourney_id)
                .then(a.match_num.cmp(&b.match_num))
                .then(a.player_name.cmp(&b.player_name))
        });

        let mut by_player: HashMap<String, Vec<usize>> = HashMap::new();
        let mut surfaces = BTreeSet::new();
        let mut year_bounds: Option<(i32, i32)> = None;
        for (idx, r) in records.iter().enumerate() {
            by_player.entry(r.player_name.clone()).or_default().push(idx);
            surfaces.insert(r.surface);
            year_bounds = Some(match year_bounds {
                Some((lo, hi)) => (lo.min(r.year), hi.max(r.year)),
                None => (r.year, r.year),
            });
        }

        info!(
            rows = records.len(),
            dropped = total_rows - records.len(),
            players = keep.len(),
            min_matches,
            "match log filtered"
        );

        Self {
            records,
            min_matches,
            players: keep.into_iter().collect(),
            surfaces: surfaces.into_iter().collect(),
            year_bounds,
            by_player,
        }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_matches(&self) -> usize {
        self.min_matches
    }

    /// Qualifying players, sorted by name.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }

    pub fn contains_player(&self, player: &str) -> bool {
        self.by_player.contains_key(player)
    }

    pub fn match_count(&self, player: &str) -> usize {
        self.by_player.get(player).map_or(0, Vec::len)
    }

    /// All rows for `player` in log order. Empty for unknown players.
    pub fn player_rows(&self, player: &str) -> Vec<&MatchRecord> {
        self.by_player
            .get(player)
            .map(|idxs| idxs.iter().map(|idx| &self.records[*idx]).collect())
            .unwrap_or_default()
    }

    pub fn pair_report(&self) -> PairReport {
        let mut groups: HashMap<MatchKey<'_>, Vec<&MatchRecord>> = HashMap::new();
        for r in &self.records {
            groups.entry(r.match_key()).or_default().push(r);
        }

        let mut report = PairReport::default();
        for (key, rows) in groups {
            match rows.as_slice() {
                [_] => report.orphans += 1,
                [a, b] if a.player_name != b.player_name && a.outcome != b.outcome => {}
                _ => report.violations.push(key.to_string()),
            }
        }
        report.violations.sort();
        if !report.violations.is_empty() {
            warn!(
                violations = report.violations.len(),
                "matches without exactly one winner among two distinct players"
            );
        }
        report
    }
}
