use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::model::{MatchKey, MatchRecord, Surface};
use crate::store::MatchLog;

/// Player -> opponents and player -> surfaces, built once from the match log.
#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    opponents: HashMap<String, Vec<String>>,
    surfaces: HashMap<String, BTreeSet<Surface>>,
}

impl RelationshipIndex {
    pub fn build(log: &MatchLog) -> Self {
        let index = Self {
            opponents: build_opponent_index(log.records()),
            surfaces: build_surface_index(log.records()),
        };
        debug!(players = index.opponents.len(), "relationship index built");
        index
    }

    pub fn opponents(&self, player: &str) -> QueryResult<&[String]> {
        self.opponents
            .get(player)
            .map(Vec::as_slice)
            .ok_or_else(|| QueryError::PlayerNotFound(player.to_string()))
    }

    pub fn surfaces(&self, player: &str) -> QueryResult<&BTreeSet<Surface>> {
        self.surfaces
            .get(player)
            .ok_or_else(|| QueryError::PlayerNotFound(player.to_string()))
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.opponents.keys().map(String::as_str)
    }
}

/// Self-join on `(tourney_id, match_num)`, dropping self pairs. Opponent lists
/// follow `(tourney_id, match_num)` order and repeat for rematches.
pub fn build_opponent_index(matches: &[MatchRecord]) -> HashMap<String, Vec<String>> {
    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by(|a, b| a.match_key().cmp(&b.match_key()));

    let mut by_match: HashMap<MatchKey<'_>, Vec<&str>> = HashMap::new();
    for r in &sorted {
        by_match
            .entry(r.match_key())
            .or_default()
            .push(r.player_name.as_str());
    }

    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for left in &sorted {
        let Some(names) = by_match.get(&left.match_key()) else {
            continue;
        };
        for right in names.iter().filter(|n| **n != left.player_name) {
            out.entry(left.player_name.clone())
                .or_default()
                .push(right.to_string());
        }
    }
    out
}

pub fn build_surface_index(matches: &[MatchRecord]) -> HashMap<String, BTreeSet<Surface>> {
    let mut out: HashMap<String, BTreeSet<Surface>> = HashMap::new();
    for r in matches {
        out.entry(r.player_name.clone())
            .or_default()
            .insert(r.surface);
    }
    out
}
