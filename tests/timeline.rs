mod common;

use atp_dashboard::timeline::aggregate_timeline;
use atp_dashboard::{Dashboard, Granularity, QueryError, Statistic, Surface};

use common::{date, log_of, played, row};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn single_match_yields_one_bucket_with_its_value() {
    let records = vec![row("2019-0001", 1, date(2019, 3, 4), "Thiem", true)];
    let series = aggregate_timeline(&records, "Thiem", None, Statistic::Aces, Granularity::Month);
    assert_eq!(series.points.len(), 1);
    assert_eq!(series.points[0].label, "2019-03");
    assert_eq!(series.points[0].matches, 1);
    assert_eq!(series.points[0].value, Some(4.0));
    assert_eq!(series.title, "# Aces");
}

#[test]
fn gap_months_are_present_but_empty() {
    let records = vec![
        row("2019-0001", 1, date(2019, 1, 14), "Thiem", true),
        row("2019-0009", 1, date(2019, 3, 11), "Thiem", false),
    ];
    let series = aggregate_timeline(
        &records,
        "Thiem",
        None,
        Statistic::DoubleFaults,
        Granularity::Month,
    );
    let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["2019-01", "2019-02", "2019-03"]);
    assert_eq!(series.points[1].matches, 0);
    assert_eq!(series.points[1].value, None);
    assert_eq!(series.non_empty().count(), 2);
}

#[test]
fn counts_sum_and_rates_average_within_a_bucket() {
    let records = vec![
        row("2019-0001", 1, date(2019, 5, 6), "Thiem", true),
        row("2019-0001", 5, date(2019, 5, 6), "Thiem", false),
        row("2019-0004", 2, date(2019, 5, 27), "Thiem", true),
    ];
    let aces = aggregate_timeline(&records, "Thiem", None, Statistic::Aces, Granularity::Month);
    assert_eq!(aces.points.len(), 1);
    assert_eq!(aces.points[0].matches, 3);
    assert_eq!(aces.points[0].value, Some(12.0));

    // Day means first: (60 + 40) / 2 on the 6th, 60 on the 27th.
    let games = aggregate_timeline(
        &records,
        "Thiem",
        None,
        Statistic::GamesWonPct,
        Granularity::Month,
    );
    assert!(close(games.points[0].value.unwrap(), 55.0));
}

#[test]
fn quarterly_buckets_are_labelled_by_first_day() {
    let records = vec![
        row("2019-0001", 1, date(2019, 2, 4), "Thiem", true),
        row("2019-0020", 1, date(2019, 8, 19), "Thiem", true),
    ];
    let series = aggregate_timeline(
        &records,
        "Thiem",
        None,
        Statistic::BreakPointsSaved,
        Granularity::Quarter,
    );
    let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["2019-01-01", "2019-04-01", "2019-07-01"]);
    assert_eq!(series.points[1].value, None);
    assert_eq!(series.points[2].value, Some(3.0));
}

#[test]
fn surface_filter_applies_before_bucketing() {
    let mut clay = row("2019-0010", 1, date(2019, 4, 22), "Thiem", true);
    clay.surface = Surface::Clay;
    let records = vec![row("2019-0001", 1, date(2019, 1, 14), "Thiem", true), clay];

    let series = aggregate_timeline(
        &records,
        "Thiem",
        Some(Surface::Clay),
        Statistic::Aces,
        Granularity::Month,
    );
    assert_eq!(series.points.len(), 1);
    assert_eq!(series.points[0].label, "2019-04");
}

#[test]
fn dashboard_rejects_unknown_statistic_and_player() {
    let dashboard = Dashboard::new(
        log_of([played("2019-0001", 1, date(2019, 1, 7), "Thiem", "Zverev")]),
        1,
    );
    assert_eq!(
        dashboard
            .statistic_timeline_by_name("Thiem", None, "Winners", Granularity::Month)
            .unwrap_err(),
        QueryError::UnknownStatistic("Winners".to_string())
    );
    assert_eq!(
        dashboard
            .statistic_timeline("Nobody", None, Statistic::Aces, Granularity::Month)
            .unwrap_err(),
        QueryError::PlayerNotFound("Nobody".to_string())
    );
    let series = dashboard
        .statistic_timeline_by_name("Thiem", None, "% games won", Granularity::Month)
        .unwrap();
    assert_eq!(series.statistic, Statistic::GamesWonPct);
}
