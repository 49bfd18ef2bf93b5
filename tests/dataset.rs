use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use parquet::data_type::{BoolType, ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use atp_dashboard::dataset::read_parquet;
use atp_dashboard::{Round, Surface};

enum Column {
    Long(Vec<Option<i64>>),
    Text(Vec<Option<&'static str>>),
    Flag(Vec<Option<bool>>),
    Real(Vec<Option<f64>>),
}

fn def_levels<T>(values: &[Option<T>]) -> Vec<i16> {
    values.iter().map(|v| i16::from(v.is_some())).collect()
}

/// Writes one row group. Every column in `schema` must be `optional` and
/// `columns` must follow the schema order.
fn write_match_log(name: &str, schema: &str, columns: Vec<Column>) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "atp_dashboard_{name}_{}.parquet",
        std::process::id()
    ));
    let schema = Arc::new(parse_message_type(schema).unwrap());
    let file = File::create(&path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, Default::default()).unwrap();
    let mut row_group = writer.next_row_group().unwrap();
    for column in &columns {
        let mut col = row_group.next_column().unwrap().unwrap();
        match column {
            Column::Long(v) => {
                let values: Vec<i64> = v.iter().flatten().copied().collect();
                col.typed::<Int64Type>()
                    .write_batch(&values, Some(&def_levels(v)), None)
                    .unwrap();
            }
            Column::Text(v) => {
                let values: Vec<ByteArray> =
                    v.iter().flatten().map(|s| ByteArray::from(*s)).collect();
                col.typed::<ByteArrayType>()
                    .write_batch(&values, Some(&def_levels(v)), None)
                    .unwrap();
            }
            Column::Flag(v) => {
                let values: Vec<bool> = v.iter().flatten().copied().collect();
                col.typed::<BoolType>()
                    .write_batch(&values, Some(&def_levels(v)), None)
                    .unwrap();
            }
            Column::Real(v) => {
                let values: Vec<f64> = v.iter().flatten().copied().collect();
                col.typed::<DoubleType>()
                    .write_batch(&values, Some(&def_levels(v)), None)
                    .unwrap();
            }
        }
        col.close().unwrap();
    }
    row_group.close().unwrap();
    writer.close().unwrap();
    path
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// 2019-01-14T15:00:00Z
const JAN_14_NANOS: i64 = 1_547_478_000_000_000_000;

#[test]
fn columns_resolve_by_name_and_bad_rows_are_reported() {
    let path = write_match_log(
        "mixed",
        "message match_log {
            optional binary player_name (UTF8);
            optional int64 tourney_date (TIMESTAMP(NANOS,false));
            optional binary surface (UTF8);
            optional boolean outcome;
            optional binary tourney_id (UTF8);
            optional int64 match_num;
            optional binary round (UTF8);
            optional int64 num_aces;
            optional double serve1_in_perc;
            optional boolean pred_wins;
        }",
        vec![
            Column::Text(vec![Some("Nadal"), Some("Federer"), Some("Djokovic")]),
            Column::Long(vec![Some(JAN_14_NANOS); 3]),
            Column::Text(vec![Some("Clay"), Some("clay"), Some("Ice")]),
            Column::Flag(vec![Some(true), Some(false), Some(true)]),
            Column::Text(vec![Some("2019-0001"); 3]),
            Column::Long(vec![Some(1), Some(1), Some(2)]),
            Column::Text(vec![Some("F"), Some("F"), Some("SF")]),
            Column::Long(vec![Some(7), None, Some(3)]),
            Column::Real(vec![Some(0.65), None, Some(0.6)]),
            Column::Flag(vec![Some(true), None, Some(false)]),
        ],
    );

    let (records, report) = read_parquet(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(report.skip_samples.len(), 1);
    assert!(report.skip_samples[0].contains("Ice"));
    assert!(report.has_predictions);
    // Federer's null aces and null serve rate; absent columns are not counted.
    assert_eq!(report.values_defaulted, 2);

    assert_eq!(records.len(), 2);
    let nadal = &records[0];
    assert_eq!(nadal.player_name, "Nadal");
    assert_eq!(nadal.tourney_id, "2019-0001");
    assert_eq!(nadal.match_num, 1);
    assert_eq!(nadal.surface, Surface::Clay);
    assert_eq!(nadal.tourney_date, day(2019, 1, 14));
    assert_eq!(nadal.year, 2019);
    assert_eq!(nadal.round, Some(Round::F));
    assert_eq!(nadal.num_aces, 7);
    assert_eq!(nadal.serve1_in_perc, 0.65);
    assert_eq!(nadal.pred_wins, Some(true));
    assert!(nadal.outcome);
    assert_eq!(nadal.tourney_name, "");
    assert_eq!(nadal.rank, None);
    assert_eq!(nadal.player_age, None);
    assert_eq!(nadal.num_dfs, 0);

    let federer = &records[1];
    assert_eq!(federer.surface, Surface::Clay);
    assert!(!federer.outcome);
    assert_eq!(federer.num_aces, 0);
    assert_eq!(federer.serve1_in_perc, 0.0);
    assert_eq!(federer.pred_wins, None);
}

#[test]
fn integer_and_microsecond_dates_decode() {
    let schema = |date_type: &str| {
        format!(
            "message match_log {{
                optional binary tourney_id (UTF8);
                optional int64 match_num;
                optional binary player_name (UTF8);
                optional binary surface (UTF8);
                optional int64 tourney_date {date_type};
                optional boolean outcome;
            }}"
        )
    };
    let columns = |date: i64| {
        vec![
            Column::Text(vec![Some("2021-0420")]),
            Column::Long(vec![Some(3)]),
            Column::Text(vec![Some("Ruud")]),
            Column::Text(vec![Some("Hard")]),
            Column::Long(vec![Some(date)]),
            Column::Flag(vec![Some(true)]),
        ]
    };

    for (name, date_type, value) in [
        ("yyyymmdd", String::new(), 20210614_i64),
        (
            "micros",
            "(TIMESTAMP(MICROS,true))".to_string(),
            1_623_672_000_000_000,
        ),
    ] {
        let path = write_match_log(name, &schema(&date_type), columns(value));
        let (records, report) = read_parquet(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(report.rows_skipped, 0, "{name}");
        assert!(!report.has_predictions);
        assert_eq!(records.len(), 1, "{name}");
        assert_eq!(records[0].tourney_date, day(2021, 6, 14), "{name}");
        assert_eq!(records[0].pred_wins, None);
    }
}

#[test]
fn missing_required_column_fails_the_load() {
    let path = write_match_log(
        "no_outcome",
        "message match_log {
            optional binary tourney_id (UTF8);
            optional int64 match_num;
            optional binary player_name (UTF8);
            optional binary surface (UTF8);
            optional int64 tourney_date;
        }",
        vec![
            Column::Text(vec![Some("2021-0420")]),
            Column::Long(vec![Some(3)]),
            Column::Text(vec![Some("Ruud")]),
            Column::Text(vec![Some("Hard")]),
            Column::Long(vec![Some(20210614)]),
        ],
    );
    let err = read_parquet(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(err.to_string().contains("outcome"));
}
