mod common;

use atp_dashboard::export::{build_sheets, write_workbook};
use atp_dashboard::{Dashboard, QueryError, Round, Surface};

use common::{date, log_of, played};

fn season() -> Dashboard {
    let mut final_match = played("2019-0100", 300, date(2019, 6, 3), "Nadal", "Thiem");
    let mut semi = played("2019-0100", 200, date(2019, 6, 3), "Nadal", "Federer");
    for r in final_match.iter_mut().chain(semi.iter_mut()) {
        r.surface = Surface::Clay;
    }
    final_match.iter_mut().for_each(|r| r.round = Some(Round::F));
    semi.iter_mut().for_each(|r| r.round = Some(Round::Sf));

    let mut records = log_of([
        final_match,
        semi,
        played("2018-0050", 10, date(2018, 8, 27), "Thiem", "Nadal"),
        played("2020-0001", 4, date(2020, 1, 20), "Nadal", "Thiem"),
    ]);
    records.sort_by(|a, b| b.tourney_id.cmp(&a.tourney_id));
    Dashboard::new(records, 1)
}

#[test]
fn match_table_sorts_by_date_then_round() {
    let rows = season()
        .filtered_match_table("Nadal", None, (2018, 2020))
        .unwrap();
    let order: Vec<(String, Option<Round>)> = rows
        .iter()
        .map(|r| (r.tourney_date.to_string(), r.round))
        .collect();
    assert_eq!(
        order,
        [
            ("2018-08-27".to_string(), Some(Round::R32)),
            ("2019-06-03".to_string(), Some(Round::Sf)),
            ("2019-06-03".to_string(), Some(Round::F)),
            ("2020-01-20".to_string(), Some(Round::R32)),
        ]
    );
    assert!(!rows[0].won);
    assert_eq!(rows[0].games_won_pct, 40.0);
    assert_eq!(rows[1].serve1_in_pct, 0.62);
    assert_eq!(rows[1].cells()[8], "0.62");
}

#[test]
fn match_table_filters_surface_and_years() {
    let dashboard = season();
    let clay = dashboard
        .filtered_match_table("Nadal", Some(Surface::Clay), (2018, 2020))
        .unwrap();
    assert_eq!(clay.len(), 2);
    assert!(clay.iter().all(|r| r.surface == Surface::Clay));

    let only_2020 = dashboard
        .filtered_match_table("Nadal", None, (2020, 2020))
        .unwrap();
    assert_eq!(only_2020.len(), 1);

    let none = dashboard
        .filtered_match_table("Nadal", Some(Surface::Grass), (2018, 2020))
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn inverted_year_range_and_unknown_names_are_rejected() {
    let dashboard = season();
    assert_eq!(
        dashboard
            .filtered_match_table("Nadal", None, (2020, 2018))
            .unwrap_err(),
        QueryError::InvalidYearRange {
            start: 2020,
            end: 2018
        }
    );
    assert_eq!(
        dashboard
            .filtered_match_table("Nobody", None, (2018, 2020))
            .unwrap_err(),
        QueryError::PlayerNotFound("Nobody".to_string())
    );
    assert_eq!(
        "Ice".parse::<Surface>().unwrap_err(),
        QueryError::UnknownSurface("Ice".to_string())
    );
}

#[test]
fn catalogue_lists_players_surfaces_and_years() {
    let dashboard = season();
    assert_eq!(dashboard.players(), ["Federer", "Nadal", "Thiem"]);
    assert_eq!(dashboard.surfaces(), [Surface::Clay, Surface::Hard]);
    assert_eq!(dashboard.year_bounds(), Some((2018, 2020)));
    let surfaces = dashboard.player_surfaces("Federer").unwrap();
    assert_eq!(surfaces.iter().copied().collect::<Vec<_>>(), [Surface::Clay]);
}

#[test]
fn surface_breakdown_splits_record_by_surface() {
    let stats = season().surface_breakdown("Nadal").unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].surface, Surface::Clay);
    assert_eq!((stats[0].wins, stats[0].losses), (2, 0));
    assert_eq!(stats[1].surface, Surface::Hard);
    assert_eq!((stats[1].wins, stats[1].losses), (1, 1));
    assert_eq!(stats[1].win_rate, Some(0.5));
    assert_eq!(stats[1].avg_aces, Some(4.0));
}

#[test]
fn roster_has_one_row_per_player() {
    let roster = season().roster();
    let names: Vec<&str> = roster.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(names, ["Federer", "Nadal", "Thiem"]);
    let nadal = &roster[1];
    assert_eq!((nadal.matches, nadal.wins), (4, 3));
    assert_eq!(nadal.first_match, Some(date(2018, 8, 27)));
    assert_eq!(nadal.last_match, Some(date(2020, 1, 20)));
}

#[test]
fn export_sheets_have_headers_and_rows() {
    let dashboard = season();
    let (sheets, report) = build_sheets(&dashboard, "Nadal", Some("Thiem")).unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        ["Matches", "Timeline", "Surfaces", "Head To Head", "Predictions"]
    );
    assert_eq!(sheets[0].rows.len(), 1 + 4);
    assert_eq!(sheets[0].rows[0][0], "Tourney Name");
    assert_eq!(sheets[3].rows.len(), 1 + 3);
    assert_eq!(report.matches, 4);
    assert_eq!(report.head_to_head, 3);
    // Years 2018..=2020, followed by four metric rows.
    assert_eq!(report.prediction_years, 3);
    assert_eq!(sheets[4].rows.len(), 1 + 3 + 4);
    assert_eq!(report.timeline_points, sheets[1].rows.len() - 1);

    let (without, report) = build_sheets(&dashboard, "Nadal", None).unwrap();
    assert!(without.iter().all(|s| s.name != "Head To Head"));
    assert_eq!(report.head_to_head, 0);
}

#[test]
fn workbook_is_written_to_disk() {
    let dashboard = season();
    let path = std::env::temp_dir().join(format!(
        "atp_dashboard_export_{}.xlsx",
        std::process::id()
    ));
    let report = write_workbook(&path, &dashboard, "Thiem", Some("Nadal")).unwrap();
    assert!(path.exists());
    assert_eq!(report.matches, 3);
    assert_eq!(report.head_to_head, 3);
    assert_eq!(report.surfaces, 2);
    assert_eq!(report.prediction_years, 3);
    let _ = std::fs::remove_file(&path);
}
