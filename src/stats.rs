use serde::{Deserialize, Serialize};

use crate::season::SeasonLabel;

pub type TeamId = String;
pub type PlayerId = String;
pub type ConferenceId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_id: TeamId,
    pub players: Vec<RosterEntry>,
}

impl TeamRoster {
    pub fn new(team_id: impl Into<TeamId>, players: Vec<RosterEntry>) -> Self {
        let mut roster = Self {
            team_id: team_id.into(),
            players: Vec::with_capacity(players.len()),
        };
        for player in players {
            roster.insert(player);
        }
        roster
    }

    /// Rosters are sets keyed by player id; a repeated id is ignored.
    pub fn insert(&mut self, entry: RosterEntry) {
        if !self.players.iter().any(|p| p.player_id == entry.player_id) {
            self.players.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// One season row as delivered by a fetcher. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSeasonRow {
    pub season: String,
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<f64>,
    pub games_played: Option<f64>,
    pub minutes_played: Option<f64>,
    pub points: Option<f64>,
    pub offensive_rebounds: Option<f64>,
    pub defensive_rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub field_goal_percentage: Option<f64>,
    pub free_throw_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPlayerSeasons {
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<f64>,
    pub seasons: Vec<RawSeasonRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeasonRecord {
    pub player_id: PlayerId,
    pub player_name: String,
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<u32>,
    pub season: SeasonLabel,
    pub games_played: Option<u32>,
    pub minutes_played: Option<u32>,
    pub points: Option<u32>,
    pub rebounds: Option<u32>,
    pub assists: Option<u32>,
    pub field_goal_percentage: Option<f64>,
    pub free_throw_percentage: Option<f64>,
}

impl PlayerSeasonRecord {
    /// Placeholder for a (player, season) pair the source had no row for.
    pub fn placeholder(player: &RosterEntry, season: SeasonLabel) -> Self {
        Self {
            player_id: player.player_id.clone(),
            player_name: player.name.clone(),
            position: None,
            height: None,
            weight: None,
            season,
            games_played: None,
            minutes_played: None,
            points: None,
            rebounds: None,
            assists: None,
            field_goal_percentage: None,
            free_throw_percentage: None,
        }
    }

    pub fn sort_key(&self) -> (&str, SeasonLabel, &str) {
        (&self.player_name, self.season, &self.player_id)
    }
}

/// Per-game rates for one table row. `None` wherever the division is undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerGameRates {
    pub minutes_played: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
}

/// A team's reconciled rows, sorted by (player_name, season, player_id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSeasonTable {
    rows: Vec<PlayerSeasonRecord>,
}

impl TeamSeasonTable {
    pub fn from_rows(mut rows: Vec<PlayerSeasonRecord>) -> Self {
        rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self { rows }
    }

    pub fn rows(&self) -> &[PlayerSeasonRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<PlayerSeasonRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, player_name: &str, season: SeasonLabel) -> Option<&PlayerSeasonRecord> {
        self.rows
            .iter()
            .find(|row| row.player_name == player_name && row.season == season)
    }

    pub fn player_rows<'a>(
        &'a self,
        player_name: &'a str,
    ) -> impl Iterator<Item = &'a PlayerSeasonRecord> + 'a {
        self.rows.iter().filter(move |row| row.player_name == player_name)
    }
}
