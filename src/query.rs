use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::dataset::{self, LoadReport};
use crate::error::{QueryError, QueryResult};
use crate::head_to_head::{self, HeadToHeadSummary};
use crate::match_table::{self, MatchTableRow};
use crate::model::{MatchRecord, Surface};
use crate::predictions::{self, PredictionSummary};
use crate::relationships::RelationshipIndex;
use crate::roster::{self, PlayerOverview};
use crate::statistic::Statistic;
use crate::store::MatchLog;
use crate::surfaces::{self, SurfaceStats};
use crate::timeline::{self, Granularity, Timeline};

/// Read-only query surface over one loaded match log.
///
/// Built once at startup; every method is a pure function of the log and its
/// arguments, so a shared `&Dashboard` can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Dashboard {
    log: MatchLog,
    index: RelationshipIndex,
}

impl Dashboard {
    pub fn new(records: Vec<MatchRecord>, min_matches: usize) -> Self {
        let log = MatchLog::new(records, min_matches);
        let index = RelationshipIndex::build(&log);
        Self { log, index }
    }

    pub fn from_parquet(path: &Path, min_matches: usize) -> Result<(Self, LoadReport)> {
        let (records, report) = dataset::read_parquet(path)?;
        let dashboard = Self::new(records, min_matches);
        info!(
            players = dashboard.players().len(),
            rows = dashboard.log.len(),
            "dashboard ready"
        );
        Ok((dashboard, report))
    }

    pub fn log(&self) -> &MatchLog {
        &self.log
    }

    pub fn players(&self) -> &[String] {
        self.log.players()
    }

    pub fn surfaces(&self) -> &[Surface] {
        self.log.surfaces()
    }

    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.log.year_bounds()
    }

    /// Opponents in match order, repeated for rematches.
    ///
    /// Fails with `PlayerNotFound` both for unknown players and for players in
    /// [`Dashboard::players`] whose every match lost its other row to the
    /// appearance threshold; such a player has no opponent to list.
    pub fn opponents(&self, player: &str) -> QueryResult<&[String]> {
        self.index.opponents(player)
    }

    /// First entry of [`Dashboard::opponents`], with the same failure cases.
    pub fn default_opponent(&self, player: &str) -> QueryResult<&str> {
        self.opponents(player)?
            .first()
            .map(String::as_str)
            .ok_or_else(|| QueryError::PlayerNotFound(player.to_string()))
    }

    pub fn player_surfaces(&self, player: &str) -> QueryResult<&BTreeSet<Surface>> {
        self.index.surfaces(player)
    }

    pub fn filtered_match_table(
        &self,
        player: &str,
        surface: Option<Surface>,
        years: (i32, i32),
    ) -> QueryResult<Vec<MatchTableRow>> {
        self.require_player(player)?;
        if years.0 > years.1 {
            return Err(QueryError::InvalidYearRange {
                start: years.0,
                end: years.1,
            });
        }
        let rows =
            match_table::filtered_match_table(self.log.player_rows(player), player, surface, years);
        debug!(player, rows = rows.len(), "match table");
        Ok(rows)
    }

    pub fn statistic_timeline(
        &self,
        player: &str,
        surface: Option<Surface>,
        statistic: Statistic,
        granularity: Granularity,
    ) -> QueryResult<Timeline> {
        self.require_player(player)?;
        let series = timeline::aggregate_timeline(
            self.log.player_rows(player),
            player,
            surface,
            statistic,
            granularity,
        );
        debug!(player, %statistic, buckets = series.points.len(), "statistic timeline");
        Ok(series)
    }

    /// Same as [`Dashboard::statistic_timeline`] with the statistic given by name.
    pub fn statistic_timeline_by_name(
        &self,
        player: &str,
        surface: Option<Surface>,
        statistic: &str,
        granularity: Granularity,
    ) -> QueryResult<Timeline> {
        let statistic = statistic.parse::<Statistic>()?;
        self.statistic_timeline(player, surface, statistic, granularity)
    }

    pub fn head_to_head(&self, player_a: &str, player_b: &str) -> QueryResult<HeadToHeadSummary> {
        self.require_player(player_a)?;
        self.require_player(player_b)?;
        let rows = self
            .log
            .player_rows(player_a)
            .into_iter()
            .chain(self.log.player_rows(player_b));
        let summary = head_to_head::head_to_head(rows, player_a, player_b);
        debug!(player_a, player_b, total = summary.total(), "head to head");
        Ok(summary)
    }

    pub fn prediction_summary(
        &self,
        player: &str,
        surfaces: &[Surface],
    ) -> QueryResult<PredictionSummary> {
        self.require_player(player)?;
        Ok(predictions::prediction_summary(
            self.log.player_rows(player),
            player,
            surfaces,
        ))
    }

    pub fn surface_breakdown(&self, player: &str) -> QueryResult<Vec<SurfaceStats>> {
        self.require_player(player)?;
        Ok(surfaces::surface_breakdown(self.log.player_rows(player), player))
    }

    pub fn roster(&self) -> Vec<PlayerOverview> {
        roster::roster(&self.log)
    }

    fn require_player(&self, player: &str) -> QueryResult<()> {
        if self.log.contains_player(player) {
            Ok(())
        } else {
            Err(QueryError::PlayerNotFound(player.to_string()))
        }
    }
}
