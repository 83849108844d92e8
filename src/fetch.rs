use std::collections::BTreeMap;

use thiserror::Error;

use crate::stats::{ConferenceId, PlayerId, RawPlayerSeasons, TeamId, TeamRoster};

pub type Conferences = BTreeMap<ConferenceId, BTreeMap<TeamId, String>>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} answered http {status}")]
    Status { url: String, status: u16 },

    #[error("malformed {what}: {detail}")]
    Malformed { what: String, detail: String },

    #[error("no {what} found for `{id}`")]
    NotFound { what: &'static str, id: String },
}

impl FetchError {
    pub fn malformed(what: impl Into<String>, detail: impl Into<String>) -> Self {
        FetchError::Malformed {
            what: what.into(),
            detail: detail.into(),
        }
    }
}

/// Source of rosters and per-player season rows.
pub trait StatsFetcher {
    fn conferences(&self) -> Result<Conferences, FetchError>;

    fn roster(&self, team_id: &str) -> Result<TeamRoster, FetchError>;

    fn player_seasons(&self, player_id: &PlayerId) -> Result<RawPlayerSeasons, FetchError>;
}

/// Every team display name across all conferences, sorted and de-duplicated.
pub fn team_names(conferences: &Conferences) -> Vec<String> {
    let mut names: Vec<String> = conferences
        .values()
        .flat_map(|teams| teams.values().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}
