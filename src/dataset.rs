use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, NaiveDate};
use parquet::basic::{LogicalType, TimeUnit};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::SchemaDescriptor;
use tracing::{debug, info, warn};

use crate::model::{MatchRecord, Round, Surface};

const MAX_SKIP_SAMPLES: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// Null cells in present optional numeric columns that fell back to zero.
    pub values_defaulted: usize,
    pub has_predictions: bool,
    pub skip_samples: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    tourney_id: usize,
    match_num: usize,
    player_name: usize,
    surface: usize,
    tourney_date: usize,
    outcome: usize,
    /// `tourney_date` is an INT64 nanosecond timestamp, which decodes as a
    /// plain `Field::Long`.
    date_nanos: bool,
    tourney_name: Option<usize>,
    round: Option<usize>,
    year: Option<usize>,
    player_age: Option<usize>,
    rank: Option<usize>,
    num_aces: Option<usize>,
    num_dfs: Option<usize>,
    num_brkpts_saved: Option<usize>,
    num_brkpts_faced: Option<usize>,
    serve1_in_perc: Option<usize>,
    serve1_win_perc: Option<usize>,
    serve2_win_perc: Option<usize>,
    game_win_perc: Option<usize>,
    total_games_won: Option<usize>,
    total_games_lost: Option<usize>,
    pred_wins: Option<usize>,
}

impl Columns {
    fn resolve(names: &[String]) -> Result<Self> {
        let find = |name: &str| names.iter().position(|n| n == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| anyhow!("match log is missing required column `{name}`"))
        };
        Ok(Self {
            tourney_id: require("tourney_id")?,
            match_num: require("match_num")?,
            player_name: require("player_name")?,
            surface: require("surface")?,
            tourney_date: require("tourney_date")?,
            outcome: require("outcome")?,
            date_nanos: false,
            tourney_name: find("tourney_name"),
            round: find("round"),
            year: find("year"),
            player_age: find("player_age"),
            rank: find("rank"),
            num_aces: find("num_aces"),
            num_dfs: find("num_dfs"),
            num_brkpts_saved: find("num_brkpts_saved"),
            num_brkpts_faced: find("num_brkpts_faced"),
            serve1_in_perc: find("serve1_in_perc"),
            serve1_win_perc: find("serve1_win_perc"),
            serve2_win_perc: find("serve2_win_perc"),
            game_win_perc: find("game_win_perc"),
            total_games_won: find("total_games_won"),
            total_games_lost: find("total_games_lost"),
            pred_wins: find("pred_wins"),
        })
    }
}

pub fn read_parquet(path: &Path) -> Result<(Vec<MatchRecord>, LoadReport)> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = SerializedFileReader::new(file).context("open parquet reader match log")?;

    let names: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    let mut cols = Columns::resolve(&names)?;
    cols.date_nanos = is_nanos_timestamp(
        reader.metadata().file_metadata().schema_descr(),
        "tourney_date",
    );
    debug!(
        columns = names.len(),
        date_nanos = cols.date_nanos,
        "resolved match log schema"
    );

    let iter = reader.get_row_iter(None).context("iterate match log rows")?;
    let mut report = LoadReport {
        has_predictions: cols.pred_wins.is_some(),
        ..LoadReport::default()
    };
    let mut out = Vec::new();

    for (idx, row) in iter.enumerate() {
        report.rows_read += 1;
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                note_skip(&mut report, format!("row {idx}: {err}"));
                continue;
            }
        };
        let fields: Vec<&Field> = row.get_column_iter().map(|(_, field)| field).collect();
        match decode_record(&fields, &cols, &mut report.values_defaulted) {
            Ok(record) => out.push(record),
            Err(err) => note_skip(&mut report, format!("row {idx}: {err}")),
        }
    }

    if report.rows_skipped > 0 {
        warn!(
            skipped = report.rows_skipped,
            read = report.rows_read,
            "match log rows skipped during decode"
        );
    }
    info!(
        path = %path.display(),
        rows = out.len(),
        predictions = report.has_predictions,
        "match log loaded"
    );
    Ok((out, report))
}

fn is_nanos_timestamp(schema: &SchemaDescriptor, name: &str) -> bool {
    schema
        .columns()
        .iter()
        .find(|c| c.name() == name)
        .and_then(|c| c.logical_type())
        .is_some_and(|t| {
            matches!(
                t,
                LogicalType::Timestamp {
                    unit: TimeUnit::NANOS(_),
                    ..
                }
            )
        })
}

fn note_skip(report: &mut LoadReport, reason: String) {
    report.rows_skipped += 1;
    if report.skip_samples.len() < MAX_SKIP_SAMPLES {
        report.skip_samples.push(reason);
    }
}

fn decode_record(
    fields: &[&Field],
    cols: &Columns,
    defaulted: &mut usize,
) -> Result<MatchRecord> {
    let get = |idx: usize| fields.get(idx).copied();
    let opt = |idx: Option<usize>| idx.and_then(|i| fields.get(i).copied());

    let tourney_id = get(cols.tourney_id)
        .and_then(field_to_string)
        .ok_or_else(|| anyhow!("missing tourney_id"))?;
    let match_num = get(cols.match_num)
        .and_then(field_to_i64)
        .ok_or_else(|| anyhow!("missing match_num"))?;
    let player_name = get(cols.player_name)
        .and_then(field_to_string)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| anyhow!("missing player_name"))?;
    let surface_raw = get(cols.surface)
        .and_then(field_to_string)
        .ok_or_else(|| anyhow!("missing surface"))?;
    let surface =
        Surface::parse(&surface_raw).ok_or_else(|| anyhow!("unknown surface `{surface_raw}`"))?;
    let date_field = get(cols.tourney_date);
    let tourney_date = if cols.date_nanos {
        date_field.and_then(field_to_i64).map(date_from_nanos)
    } else {
        date_field.and_then(field_to_date)
    }
    .ok_or_else(|| anyhow!("unreadable tourney_date"))?;
    let outcome = get(cols.outcome)
        .and_then(field_to_bool)
        .ok_or_else(|| anyhow!("missing outcome"))?;

    // Absent columns default silently; null cells in present ones are counted.
    let mut count = |idx: Option<usize>| -> u32 {
        let Some(field) = opt(idx) else {
            return 0;
        };
        match field_to_f64(field) {
            Some(v) => v.max(0.0).round() as u32,
            None => {
                *defaulted += 1;
                0
            }
        }
    };
    let num_aces = count(cols.num_aces);
    let num_dfs = count(cols.num_dfs);
    let num_brkpts_saved = count(cols.num_brkpts_saved);
    let num_brkpts_faced = count(cols.num_brkpts_faced);
    let total_games_won = count(cols.total_games_won);
    let total_games_lost = count(cols.total_games_lost);

    let mut rate = |idx: Option<usize>| -> f64 {
        let Some(field) = opt(idx) else {
            return 0.0;
        };
        match field_to_f64(field) {
            Some(v) => v,
            None => {
                *defaulted += 1;
                0.0
            }
        }
    };
    let serve1_in_perc = rate(cols.serve1_in_perc);
    let serve1_win_perc = rate(cols.serve1_win_perc);
    let serve2_win_perc = rate(cols.serve2_win_perc);
    let game_win_perc = rate(cols.game_win_perc);

    Ok(MatchRecord {
        tourney_id,
        tourney_name: opt(cols.tourney_name)
            .and_then(field_to_string)
            .unwrap_or_default(),
        match_num,
        player_name,
        surface,
        tourney_date,
        round: opt(cols.round)
            .and_then(field_to_string)
            .and_then(|r| Round::parse(&r)),
        year: opt(cols.year)
            .and_then(field_to_i64)
            .and_then(|y| i32::try_from(y).ok())
            .unwrap_or_else(|| tourney_date.year()),
        player_age: opt(cols.player_age).and_then(field_to_f64),
        rank: opt(cols.rank)
            .and_then(field_to_f64)
            .filter(|r| *r >= 1.0)
            .map(|r| r.round() as u32),
        num_aces,
        num_dfs,
        num_brkpts_saved,
        num_brkpts_faced,
        serve1_in_perc,
        serve1_win_perc,
        serve2_win_perc,
        game_win_perc,
        total_games_won,
        total_games_lost,
        outcome,
        pred_wins: opt(cols.pred_wins).and_then(field_to_bool),
    })
}

pub(crate) fn field_to_string(field: &Field) -> Option<String> {
    match field {
        Field::Str(s) => Some(s.clone()),
        Field::Int(v) => Some(v.to_string()),
        Field::Long(v) => Some(v.to_string()),
        _ => None,
    }
}

pub(crate) fn field_to_f64(field: &Field) -> Option<f64> {
    let v = match field {
        Field::Double(v) => *v,
        Field::Float(v) => *v as f64,
        Field::Long(v) => *v as f64,
        Field::Int(v) => *v as f64,
        Field::Short(v) => *v as f64,
        Field::Byte(v) => *v as f64,
        Field::ULong(v) => *v as f64,
        Field::UInt(v) => *v as f64,
        Field::Bool(v) => f64::from(u8::from(*v)),
        Field::Str(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

pub(crate) fn field_to_i64(field: &Field) -> Option<i64> {
    match field {
        Field::Long(v) => Some(*v),
        Field::Int(v) => Some(*v as i64),
        Field::Str(s) => s.trim().parse::<i64>().ok(),
        other => field_to_f64(other).map(|v| v.round() as i64),
    }
}

pub(crate) fn field_to_bool(field: &Field) -> Option<bool> {
    match field {
        Field::Bool(v) => Some(*v),
        Field::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "w" | "win" => Some(true),
            "0" | "false" | "l" | "loss" => Some(false),
            _ => None,
        },
        other => field_to_f64(other).map(|v| v != 0.0),
    }
}

pub(crate) fn field_to_date(field: &Field) -> Option<NaiveDate> {
    match field {
        Field::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)?
            .checked_add_signed(chrono::Duration::days(*days as i64)),
        Field::TimestampMillis(ms) => {
            DateTime::from_timestamp_millis(*ms).map(|t| t.date_naive())
        }
        Field::TimestampMicros(us) => {
            DateTime::from_timestamp_micros(*us).map(|t| t.date_naive())
        }
        Field::Str(s) => parse_date_text(s),
        other => field_to_i64(other).and_then(date_from_yyyymmdd),
    }
}

pub(crate) fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw.get(..8).unwrap_or(raw), "%Y%m%d").ok())
}

pub(crate) fn date_from_nanos(nanos: i64) -> NaiveDate {
    DateTime::from_timestamp_nanos(nanos).date_naive()
}

fn date_from_yyyymmdd(v: i64) -> Option<NaiveDate> {
    if !(10_000_101..=99_991_231).contains(&v) {
        return None;
    }
    let year = i32::try_from(v / 10_000).ok()?;
    let month = ((v / 100) % 100) as u32;
    let day = (v % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}
