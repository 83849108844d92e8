use std::fs;
use std::path::PathBuf;

use cbb_scoresheet::reconcile::normalize;
use cbb_scoresheet::season::{SeasonLabel, SeasonWindow};
use cbb_scoresheet::sports_reference::{
    parse_conference_ids, parse_conference_teams, parse_player_page, parse_roster,
};
use cbb_scoresheet::stats::RosterEntry;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_conference_links_for_the_site_year() {
    let raw = read_fixture("sr_season_index.html");
    assert_eq!(parse_conference_ids(&raw, 2025), vec!["acc", "big-12"]);
    assert_eq!(parse_conference_ids(&raw, 2024), vec!["acc"]);
}

#[test]
fn parses_conference_teams() {
    let raw = read_fixture("sr_conference.html");
    let teams = parse_conference_teams(&raw, 2025);
    assert_eq!(teams.len(), 2);
    assert_eq!(teams.get("duke").map(String::as_str), Some("Duke"));
    assert_eq!(
        teams.get("north-carolina").map(String::as_str),
        Some("North Carolina")
    );
}

#[test]
fn parses_roster_fixture() {
    let raw = read_fixture("sr_roster.html");
    let roster = parse_roster(&raw, "duke").expect("fixture should parse");
    assert_eq!(roster.team_id, "duke");
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.players[0].player_id, "jalen-example-1");
    assert_eq!(roster.players[0].name, "Jalen Example");
    assert_eq!(roster.players[1].player_id, "sam-oneil-2");
    assert_eq!(roster.players[1].name, "Sam O'Neil");
}

#[test]
fn roster_page_without_table_is_malformed() {
    let err = parse_roster("<html><body>Page Not Found</body></html>", "nowhere")
        .expect_err("missing table should fail");
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn parses_player_page_fixture() {
    let raw = read_fixture("sr_player.html");
    let player = parse_player_page(&raw);
    assert_eq!(player.position.as_deref(), Some("Guard"));
    assert_eq!(player.height.as_deref(), Some("6-3"));
    assert_eq!(player.weight, Some(190.0));

    let labels: Vec<&str> = player.seasons.iter().map(|s| s.season.as_str()).collect();
    assert_eq!(labels, vec!["2022-23", "2023-24", "Career"]);

    let latest = &player.seasons[1];
    assert_eq!(latest.games_played, Some(34.0));
    assert_eq!(latest.minutes_played, Some(901.0));
    assert_eq!(latest.field_goal_percentage, Some(0.471));
    assert_eq!(latest.free_throw_percentage, None);
    assert_eq!(latest.offensive_rebounds, Some(20.0));
    assert_eq!(latest.defensive_rebounds, Some(88.0));

    let career = &player.seasons[2];
    assert_eq!(career.points, Some(535.0));
    assert_eq!(career.free_throw_percentage, Some(0.721));
}

#[test]
fn parsed_player_page_feeds_normalization() {
    let raw = read_fixture("sr_player.html");
    let player = parse_player_page(&raw);
    let entry = RosterEntry {
        player_id: "jalen-example-1".to_string(),
        name: "Jalen Example".to_string(),
    };
    let rows = normalize(&entry, &player, SeasonWindow::new(2024));

    let labels: Vec<SeasonLabel> = rows.iter().map(|row| row.season).collect();
    assert_eq!(labels, vec![SeasonLabel::Season(2023), SeasonLabel::Career]);
    assert_eq!(rows[0].rebounds, Some(108));
    assert_eq!(rows[0].free_throw_percentage, Some(0.0));
    assert_eq!(rows[1].rebounds, Some(160));
    assert_eq!(rows[1].height.as_deref(), Some("6-3"));
}

#[test]
fn player_page_without_totals_has_no_seasons() {
    let player = parse_player_page("<div id=\"meta\"><p><span>6-8</span></p></div>");
    assert!(player.seasons.is_empty());
    assert_eq!(player.height.as_deref(), Some("6-8"));
    assert_eq!(player.position, None);
}
