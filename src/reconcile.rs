use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};
use tracing::debug;

use crate::season::{SeasonLabel, SeasonWindow};
use crate::stats::{
    PerGameRates, PlayerId, PlayerSeasonRecord, RawPlayerSeasons, RawSeasonRow, RosterEntry,
    TeamRoster, TeamSeasonTable,
};

/// Reduce one player's raw rows to the window's labels, with derived and
/// cast columns. Order follows the source; the first row for a label wins.
pub fn normalize(
    player: &RosterEntry,
    raw: &RawPlayerSeasons,
    window: SeasonWindow,
) -> Vec<PlayerSeasonRecord> {
    let mut seen = HashSet::new();
    raw.seasons
        .iter()
        .filter_map(|row| {
            let label = SeasonLabel::parse(&row.season)?;
            (window.contains(label) && seen.insert(label))
                .then(|| normalize_row(player, raw, row, label))
        })
        .collect()
}

fn normalize_row(
    player: &RosterEntry,
    raw: &RawPlayerSeasons,
    row: &RawSeasonRow,
    season: SeasonLabel,
) -> PlayerSeasonRecord {
    let offensive = as_count(row.offensive_rebounds);
    let defensive = as_count(row.defensive_rebounds);
    PlayerSeasonRecord {
        player_id: player.player_id.clone(),
        player_name: player.name.clone(),
        position: row.position.clone().or_else(|| raw.position.clone()),
        height: row.height.clone().or_else(|| raw.height.clone()),
        weight: as_count(row.weight.or(raw.weight)),
        season,
        games_played: as_count(row.games_played),
        minutes_played: as_count(row.minutes_played),
        points: as_count(row.points),
        rebounds: offensive.zip(defensive).map(|(o, d)| o.saturating_add(d)),
        assists: as_count(row.assists),
        field_goal_percentage: Some(as_percentage(row.field_goal_percentage)),
        free_throw_percentage: Some(as_percentage(row.free_throw_percentage)),
    }
}

fn as_count(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.trunc().min(u32::MAX as f64) as u32)
}

fn as_percentage(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0) * 100.0
}

/// Synthesize the previous/current rows each roster player is missing and
/// sort. Running it again on its own output changes nothing.
pub fn backfill(
    roster: &TeamRoster,
    rows: Vec<PlayerSeasonRecord>,
    window: SeasonWindow,
) -> TeamSeasonTable {
    let present: HashSet<(PlayerId, SeasonLabel)> = rows
        .iter()
        .map(|row| (row.player_id.clone(), row.season))
        .collect();

    let present = &present;
    let synthesized: Vec<PlayerSeasonRecord> = roster
        .players
        .iter()
        .flat_map(|player| {
            window
                .required()
                .into_iter()
                .filter(move |label| !present.contains(&(player.player_id.clone(), *label)))
                .map(move |label| PlayerSeasonRecord::placeholder(player, label))
        })
        .collect();

    debug!(
        team = %roster.team_id,
        synthesized = synthesized.len(),
        "backfilled missing season rows"
    );

    TeamSeasonTable::from_rows(rows.into_iter().chain(synthesized).collect())
}

/// Normalize every roster player's seasons, then backfill. Players without an
/// entry in `raw` end up with placeholder rows only.
pub fn reconcile(
    roster: &TeamRoster,
    raw: &HashMap<PlayerId, RawPlayerSeasons>,
    window: SeasonWindow,
) -> TeamSeasonTable {
    let rows = roster
        .players
        .iter()
        .filter_map(|player| raw.get(&player.player_id).map(|seasons| (player, seasons)))
        .flat_map(|(player, seasons)| normalize(player, seasons, window))
        .collect();
    backfill(roster, rows, window)
}

pub fn per_game_rates(table: &TeamSeasonTable) -> Vec<PerGameRates> {
    table.rows().iter().map(row_rates).collect()
}

fn row_rates(row: &PlayerSeasonRecord) -> PerGameRates {
    let games = row.games_played.filter(|g| *g > 0);
    let rate = |total: Option<u32>| {
        let (total, games) = total.zip(games)?;
        Some(round_tenth(total as f64 / games as f64))
    };
    PerGameRates {
        minutes_played: rate(row.minutes_played),
        points: rate(row.points),
        rebounds: rate(row.rebounds),
        assists: rate(row.assists),
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A finished team table, optionally carrying per-game columns joined by row
/// position.
#[derive(Debug, Clone)]
pub struct TeamReport {
    pub team_name: String,
    table: TeamSeasonTable,
    per_game: Option<Vec<PerGameRates>>,
}

impl TeamReport {
    pub fn new(
        team_name: impl Into<String>,
        table: TeamSeasonTable,
        per_game: Option<Vec<PerGameRates>>,
    ) -> Result<Self> {
        if let Some(rates) = per_game.as_ref() {
            if rates.len() != table.len() {
                bail!(
                    "per-game table has {} rows, season table has {}",
                    rates.len(),
                    table.len()
                );
            }
        }
        Ok(Self {
            team_name: team_name.into(),
            table,
            per_game,
        })
    }

    pub fn with_per_game(team_name: impl Into<String>, table: TeamSeasonTable) -> Self {
        let rates = per_game_rates(&table);
        Self {
            team_name: team_name.into(),
            table,
            per_game: Some(rates),
        }
    }

    pub fn table(&self) -> &TeamSeasonTable {
        &self.table
    }

    pub fn per_game(&self) -> Option<&[PerGameRates]> {
        self.per_game.as_deref()
    }

    pub fn has_per_game(&self) -> bool {
        self.per_game.is_some()
    }

    pub fn joined_rows(&self) -> impl Iterator<Item = (&PlayerSeasonRecord, Option<&PerGameRates>)> {
        self.table
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| (row, self.per_game.as_ref().and_then(|rates| rates.get(idx))))
    }
}
