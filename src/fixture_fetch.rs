use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fetch::{Conferences, FetchError, StatsFetcher};
use crate::stats::{PlayerId, RawPlayerSeasons, RosterEntry, TeamId, TeamRoster};

/// Offline snapshot of everything a run needs:
///
/// ```json
/// {
///   "conferences": { "acc": { "duke": "Duke" } },
///   "rosters": { "duke": [{ "player_id": "cooper-flagg-1", "name": "Cooper Flagg" }] },
///   "players": { "cooper-flagg-1": { "position": "Forward", "seasons": [] } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureData {
    pub conferences: Conferences,
    pub rosters: BTreeMap<TeamId, Vec<RosterEntry>>,
    pub players: BTreeMap<PlayerId, RawPlayerSeasons>,
}

pub struct FixtureFetcher {
    data: FixtureData,
}

impl FixtureFetcher {
    pub fn new(data: FixtureData) -> Self {
        Self { data }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let data = serde_json::from_str::<FixtureData>(raw).context("invalid fixture json")?;
        Ok(Self::new(data))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading fixture {}", path.display()))?;
        Self::from_json(&raw)
    }
}

impl StatsFetcher for FixtureFetcher {
    fn conferences(&self) -> Result<Conferences, FetchError> {
        Ok(self.data.conferences.clone())
    }

    fn roster(&self, team_id: &str) -> Result<TeamRoster, FetchError> {
        let players = self.data.rosters.get(team_id).ok_or_else(|| FetchError::NotFound {
            what: "roster",
            id: team_id.to_string(),
        })?;
        Ok(TeamRoster::new(team_id, players.clone()))
    }

    fn player_seasons(&self, player_id: &PlayerId) -> Result<RawPlayerSeasons, FetchError> {
        Ok(self.data.players.get(player_id).cloned().unwrap_or_default())
    }
}
