use std::collections::HashMap;

use cbb_scoresheet::reconcile::{TeamReport, backfill, normalize, per_game_rates, reconcile};
use cbb_scoresheet::season::{SeasonLabel, SeasonWindow};
use cbb_scoresheet::stats::{
    PlayerSeasonRecord, RawPlayerSeasons, RawSeasonRow, RosterEntry, TeamRoster,
};

fn entry(id: &str, name: &str) -> RosterEntry {
    RosterEntry {
        player_id: id.to_string(),
        name: name.to_string(),
    }
}

fn season_row(season: &str) -> RawSeasonRow {
    RawSeasonRow {
        season: season.to_string(),
        ..RawSeasonRow::default()
    }
}

fn sample_roster() -> TeamRoster {
    TeamRoster::new("sample", vec![entry("p1", "A"), entry("p2", "B")])
}

fn sample_raw() -> HashMap<String, RawPlayerSeasons> {
    let current = RawSeasonRow {
        games_played: Some(10.0),
        minutes_played: Some(250.0),
        points: Some(100.0),
        offensive_rebounds: Some(5.0),
        defensive_rebounds: Some(20.0),
        assists: Some(30.0),
        field_goal_percentage: Some(0.5),
        free_throw_percentage: None,
        ..season_row("2024-25")
    };
    let career = RawSeasonRow {
        games_played: Some(40.0),
        minutes_played: Some(900.0),
        points: Some(410.0),
        offensive_rebounds: Some(22.0),
        defensive_rebounds: Some(70.0),
        assists: Some(95.0),
        field_goal_percentage: Some(0.471),
        free_throw_percentage: Some(0.8),
        ..season_row("Career")
    };
    let mut raw = HashMap::new();
    raw.insert(
        "p1".to_string(),
        RawPlayerSeasons {
            position: Some("Guard".to_string()),
            height: Some("6-3".to_string()),
            weight: Some(190.0),
            seasons: vec![season_row("2022-23"), current, career],
        },
    );
    raw
}

fn labels(rows: &[&PlayerSeasonRecord]) -> Vec<String> {
    rows.iter().map(|row| row.season.to_string()).collect()
}

#[test]
fn matches_worked_example() {
    let window = SeasonWindow::new(2024);
    let table = reconcile(&sample_roster(), &sample_raw(), window);

    let a: Vec<_> = table.player_rows("A").collect();
    assert_eq!(labels(&a), vec!["2023-24", "2024-25", "Career"]);

    let previous = a[0];
    assert_eq!(previous.games_played, None);
    assert_eq!(previous.points, None);
    assert_eq!(previous.position, None);
    assert_eq!(previous.field_goal_percentage, None);

    let current = a[1];
    assert_eq!(current.games_played, Some(10));
    assert_eq!(current.rebounds, Some(25));
    assert_eq!(current.points, Some(100));
    assert_eq!(current.assists, Some(30));
    assert_eq!(current.position.as_deref(), Some("Guard"));
    assert_eq!(current.weight, Some(190));
    assert_eq!(current.field_goal_percentage, Some(50.0));
    assert_eq!(current.free_throw_percentage, Some(0.0));

    let career = a[2];
    assert_eq!(career.points, Some(410));
    assert_eq!(career.rebounds, Some(92));

    let b: Vec<_> = table.player_rows("B").collect();
    assert_eq!(labels(&b), vec!["2023-24", "2024-25"]);
    assert!(b.iter().all(|row| row.games_played.is_none()));
    assert_eq!(table.len(), 5);
}

#[test]
fn every_roster_player_gets_both_required_seasons() {
    let window = SeasonWindow::new(2024);
    let roster = TeamRoster::new(
        "big",
        (0..12)
            .map(|i| entry(&format!("p{i}"), &format!("Player {i:02}")))
            .collect(),
    );
    let mut raw = HashMap::new();
    for i in (0..12).step_by(3) {
        raw.insert(
            format!("p{i}"),
            RawPlayerSeasons {
                seasons: vec![season_row("2023-24"), season_row("2023-24"), season_row("Career")],
                ..RawPlayerSeasons::default()
            },
        );
    }

    let table = reconcile(&roster, &raw, window);
    for player in &roster.players {
        for label in window.required() {
            let count = table
                .rows()
                .iter()
                .filter(|row| row.player_id == player.player_id && row.season == label)
                .count();
            assert_eq!(count, 1, "{} {}", player.name, label);
        }
    }
}

#[test]
fn backfill_is_idempotent() {
    let window = SeasonWindow::new(2024);
    let roster = sample_roster();
    let once = reconcile(&roster, &sample_raw(), window);
    let twice = backfill(&roster, once.clone().into_rows(), window);
    assert_eq!(once, twice);
    assert_eq!(once, reconcile(&roster, &sample_raw(), window));
}

#[test]
fn rebounds_are_null_when_a_component_is_missing() {
    let window = SeasonWindow::new(2024);
    let raw = RawPlayerSeasons {
        seasons: vec![RawSeasonRow {
            offensive_rebounds: Some(4.0),
            defensive_rebounds: None,
            ..season_row("2024-25")
        }],
        ..RawPlayerSeasons::default()
    };
    let rows = normalize(&entry("p1", "A"), &raw, window);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rebounds, None);
}

#[test]
fn normalize_drops_unrelated_seasons_and_truncates_counts() {
    let window = SeasonWindow::new(2024);
    let raw = RawPlayerSeasons {
        seasons: vec![
            season_row("2021-22"),
            RawSeasonRow {
                minutes_played: Some(311.9),
                points: Some(-3.0),
                ..season_row("2023-24")
            },
            season_row("Season"),
        ],
        ..RawPlayerSeasons::default()
    };
    let rows = normalize(&entry("p1", "A"), &raw, window);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].season, SeasonLabel::Season(2023));
    assert_eq!(rows[0].minutes_played, Some(311));
    assert_eq!(rows[0].points, None);
}

#[test]
fn per_season_attributes_override_player_attributes() {
    let window = SeasonWindow::new(2024);
    let raw = RawPlayerSeasons {
        position: Some("Forward".to_string()),
        seasons: vec![
            RawSeasonRow {
                position: Some("Center".to_string()),
                ..season_row("2023-24")
            },
            season_row("2024-25"),
        ],
        ..RawPlayerSeasons::default()
    };
    let rows = normalize(&entry("p1", "A"), &raw, window);
    assert_eq!(rows[0].position.as_deref(), Some("Center"));
    assert_eq!(rows[1].position.as_deref(), Some("Forward"));
}

#[test]
fn rows_sort_by_name_then_season_order() {
    let window = SeasonWindow::new(2024);
    let roster = TeamRoster::new("t", vec![entry("z", "Zed"), entry("a", "Abe")]);
    let mut raw = HashMap::new();
    raw.insert(
        "z".to_string(),
        RawPlayerSeasons {
            seasons: vec![season_row("Career"), season_row("2024-25")],
            ..RawPlayerSeasons::default()
        },
    );
    let table = reconcile(&roster, &raw, window);
    let keys: Vec<(String, String)> = table
        .rows()
        .iter()
        .map(|row| (row.player_name.clone(), row.season.to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Abe".to_string(), "2023-24".to_string()),
            ("Abe".to_string(), "2024-25".to_string()),
            ("Zed".to_string(), "2023-24".to_string()),
            ("Zed".to_string(), "2024-25".to_string()),
            ("Zed".to_string(), "Career".to_string()),
        ]
    );
}

#[test]
fn per_game_rates_round_and_handle_zero_games() {
    let window = SeasonWindow::new(2024);
    let mut raw = sample_raw();
    raw.insert(
        "p2".to_string(),
        RawPlayerSeasons {
            seasons: vec![RawSeasonRow {
                games_played: Some(0.0),
                points: Some(0.0),
                ..season_row("2024-25")
            }],
            ..RawPlayerSeasons::default()
        },
    );
    let table = reconcile(&sample_roster(), &raw, window);
    let rates = per_game_rates(&table);
    assert_eq!(rates.len(), table.len());

    let idx = |name: &str, label: SeasonLabel| {
        table
            .rows()
            .iter()
            .position(|row| row.player_name == name && row.season == label)
            .expect("row present")
    };

    let current = rates[idx("A", SeasonLabel::Season(2024))];
    assert_eq!(current.points, Some(10.0));
    assert_eq!(current.minutes_played, Some(25.0));
    assert_eq!(current.rebounds, Some(2.5));
    assert_eq!(current.assists, Some(3.0));

    let career = rates[idx("A", SeasonLabel::Career)];
    assert_eq!(career.points, Some(10.3));
    assert_eq!(career.minutes_played, Some(22.5));

    let zero_games = rates[idx("B", SeasonLabel::Season(2024))];
    assert_eq!(zero_games.points, None);

    let missing = rates[idx("A", SeasonLabel::Season(2023))];
    assert_eq!(missing.points, None);
}

#[test]
fn report_rejects_misaligned_per_game_rows() {
    let window = SeasonWindow::new(2024);
    let table = reconcile(&sample_roster(), &sample_raw(), window);
    let mut rates = per_game_rates(&table);
    rates.pop();
    assert!(TeamReport::new("Sample", table.clone(), Some(rates)).is_err());

    let report = TeamReport::with_per_game("Sample", table);
    assert!(report.joined_rows().all(|(_, rates)| rates.is_some()));
}
