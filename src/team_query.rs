use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::info;

use crate::fetch::StatsFetcher;
use crate::reconcile::{TeamReport, reconcile};
use crate::season::SeasonWindow;

/// Fetcher key for a display name: "North Carolina" -> "north-carolina".
pub fn team_id(team_name: &str) -> String {
    team_name.split(' ').collect::<Vec<_>>().join("-").to_lowercase()
}

pub fn query_team(
    fetcher: &dyn StatsFetcher,
    team_name: &str,
    window: SeasonWindow,
    per_game: bool,
) -> Result<TeamReport> {
    let team_id = team_id(team_name);
    info!(team = team_name, %team_id, "extracting roster");
    let roster = fetcher
        .roster(&team_id)
        .with_context(|| format!("failed to load roster for {team_name}"))?;
    info!(team = team_name, players = roster.len(), "extracting player data");

    let mut raw = HashMap::with_capacity(roster.len());
    for player in &roster.players {
        let seasons = fetcher
            .player_seasons(&player.player_id)
            .with_context(|| format!("failed to load seasons for {} ({team_name})", player.name))?;
        raw.insert(player.player_id.clone(), seasons);
    }

    let table = reconcile(&roster, &raw, window);
    info!(team = team_name, rows = table.len(), "team table ready");
    if per_game {
        Ok(TeamReport::with_per_game(team_name, table))
    } else {
        TeamReport::new(team_name, table, None)
    }
}

pub struct MatchupReports {
    pub home: TeamReport,
    pub away: TeamReport,
}

/// Home first, then away. Either failure aborts the whole matchup.
pub fn query_matchup(
    fetcher: &dyn StatsFetcher,
    home: &str,
    away: &str,
    window: SeasonWindow,
    per_game: bool,
) -> Result<MatchupReports> {
    let home = query_team(fetcher, home, window, per_game)?;
    let away = query_team(fetcher, away, window, per_game)?;
    Ok(MatchupReports { home, away })
}
