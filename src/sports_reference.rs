use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::fetch::{Conferences, FetchError, StatsFetcher};
use crate::html::{
    self, StatCell, links_with_prefix, rows, stat_cells, strip_tags, table_by_id, to_lower,
};
use crate::http_client::http_client;
use crate::season::SeasonWindow;
use crate::stats::{PlayerId, RawPlayerSeasons, RawSeasonRow, RosterEntry, TeamId, TeamRoster};

pub const DEFAULT_BASE_URL: &str = "https://www.sports-reference.com";

const CONFERENCES_PATH: &str = "/cbb/conferences/";
const SCHOOLS_PATH: &str = "/cbb/schools/";
const PLAYERS_PATH: &str = "/cbb/players/";

const ROSTER_TABLE: &str = "roster";
const TOTALS_TABLE: &str = "players_totals";

/// Men's college basketball pages on sports-reference.com.
pub struct SportsReferenceFetcher {
    client: &'static Client,
    base_url: String,
    window: SeasonWindow,
    request_delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl SportsReferenceFetcher {
    pub fn new(
        base_url: &str,
        window: SeasonWindow,
        timeout: Duration,
        request_delay: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            window,
            request_delay,
            last_request: Cell::new(None),
        })
    }

    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.request_delay {
                thread::sleep(self.request_delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    fn get_page(&self, path: &str) -> Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        self.throttle();
        debug!(%url, "fetching page");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }
        resp.text()
            .map_err(|source| FetchError::Transport { url, source })
    }
}

impl StatsFetcher for SportsReferenceFetcher {
    fn conferences(&self) -> Result<Conferences, FetchError> {
        let year = self.window.site_year();
        let index = self.get_page(&format!("/cbb/seasons/men/{year}.html"))?;
        let conference_ids = parse_conference_ids(&index, year);
        if conference_ids.is_empty() {
            return Err(FetchError::malformed(
                "season index",
                format!("no conference links for {year}"),
            ));
        }

        let mut out = BTreeMap::new();
        for conference in conference_ids {
            let page = self.get_page(&format!("{CONFERENCES_PATH}{conference}/men/{year}.html"))?;
            let teams = parse_conference_teams(&page, year);
            info!(%conference, teams = teams.len(), "loaded conference");
            out.insert(conference, teams);
        }
        Ok(out)
    }

    fn roster(&self, team_id: &str) -> Result<TeamRoster, FetchError> {
        let year = self.window.site_year();
        let page = match self.get_page(&format!("{SCHOOLS_PATH}{team_id}/men/{year}.html")) {
            Err(FetchError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(FetchError::NotFound {
                    what: "roster",
                    id: team_id.to_string(),
                });
            }
            other => other?,
        };
        parse_roster(&page, team_id)
    }

    fn player_seasons(&self, player_id: &PlayerId) -> Result<RawPlayerSeasons, FetchError> {
        let page = self.get_page(&format!("{PLAYERS_PATH}{player_id}.html"))?;
        let seasons = parse_player_page(&page);
        if seasons.seasons.is_empty() {
            warn!(%player_id, "player page has no season totals");
        }
        Ok(seasons)
    }
}

/// Path segment between `prefix` and `/men/{year}.html`.
fn slug_for_year<'a>(href: &'a str, prefix: &str, year: i32) -> Option<&'a str> {
    let rest = href.strip_prefix(prefix)?;
    let slug = rest.strip_suffix(&format!("/men/{year}.html"))?;
    (!slug.is_empty() && !slug.contains('/')).then_some(slug)
}

pub fn parse_conference_ids(doc: &str, year: i32) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (href, _) in links_with_prefix(doc, CONFERENCES_PATH) {
        if let Some(slug) = slug_for_year(&href, CONFERENCES_PATH, year) {
            if !out.iter().any(|id| id == slug) {
                out.push(slug.to_string());
            }
        }
    }
    out
}

pub fn parse_conference_teams(doc: &str, year: i32) -> BTreeMap<TeamId, String> {
    let mut out = BTreeMap::new();
    for (href, text) in links_with_prefix(doc, SCHOOLS_PATH) {
        if text.is_empty() {
            continue;
        }
        if let Some(slug) = slug_for_year(&href, SCHOOLS_PATH, year) {
            out.entry(slug.to_string()).or_insert(text);
        }
    }
    out
}

pub fn parse_roster(doc: &str, team_id: &str) -> Result<TeamRoster, FetchError> {
    let table = table_by_id(doc, ROSTER_TABLE).ok_or_else(|| {
        FetchError::malformed("roster page", format!("no roster table for {team_id}"))
    })?;

    let mut roster = TeamRoster::new(team_id, Vec::new());
    for row in rows(table) {
        let Some(cell) = stat_cells(row).into_iter().find(|c| c.stat == "player") else {
            continue;
        };
        let Some(player_id) = cell.href.as_deref().and_then(player_id_from_href) else {
            if !cell.text.is_empty() && !cell.text.eq_ignore_ascii_case("player") {
                warn!(team = team_id, player = %cell.text, "roster row without player link");
            }
            continue;
        };
        if cell.text.is_empty() {
            continue;
        }
        roster.insert(RosterEntry {
            player_id,
            name: cell.text,
        });
    }
    Ok(roster)
}

fn player_id_from_href(href: &str) -> Option<PlayerId> {
    let id = href.strip_prefix(PLAYERS_PATH)?.strip_suffix(".html")?;
    (!id.is_empty()).then(|| id.to_string())
}

/// Season totals plus header attributes. A page without a totals table
/// yields no season rows.
pub fn parse_player_page(doc: &str) -> RawPlayerSeasons {
    let (position, height, weight) = parse_meta(doc);
    let seasons = table_by_id(doc, TOTALS_TABLE)
        .map(|table| rows(table).into_iter().filter_map(parse_totals_row).collect())
        .unwrap_or_default();
    RawPlayerSeasons {
        position,
        height,
        weight,
        seasons,
    }
}

fn parse_totals_row(row: &str) -> Option<RawSeasonRow> {
    let cells: HashMap<String, String> = stat_cells(row)
        .into_iter()
        .map(|StatCell { stat, text, .. }| (stat, text))
        .collect();
    let number = |keys: &[&str]| cell_text(&cells, keys).and_then(parse_number);

    let season = cell_text(&cells, &["season", "year_id"])?
        .trim_end_matches('*')
        .trim();
    // Header rows repeat inside long tables.
    if season.is_empty() || season.eq_ignore_ascii_case("season") {
        return None;
    }
    Some(RawSeasonRow {
        season: season.to_string(),
        position: cell_text(&cells, &["pos"])
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        height: None,
        weight: None,
        games_played: number(&["games", "g"]),
        minutes_played: number(&["mp"]),
        points: number(&["pts"]),
        offensive_rebounds: number(&["orb"]),
        defensive_rebounds: number(&["drb"]),
        assists: number(&["ast"]),
        field_goal_percentage: number(&["fg_pct"]),
        free_throw_percentage: number(&["ft_pct"]),
    })
}

fn cell_text<'a>(cells: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| cells.get(*k)).map(String::as_str)
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_meta(doc: &str) -> (Option<String>, Option<String>, Option<f64>) {
    let lc = to_lower(doc);
    let start = lc.find("id=\"meta\"").unwrap_or(0);
    let end = lc[start..]
        .find("<table")
        .map(|rel| start + rel)
        .unwrap_or(doc.len());
    let meta = &doc[start..end];

    let position = html::slice_between_ci(meta, "<strong>Position:", "</p>")
        .map(strip_tags)
        .and_then(|text| {
            let text = text.trim_start_matches("Position:");
            let text = text.split(['\u{25aa}', '&']).next().unwrap_or_default().trim();
            (!text.is_empty()).then(|| text.to_string())
        });

    let mut height = None;
    let mut weight = None;
    for span in span_texts(meta) {
        if height.is_none() && looks_like_height(&span) {
            height = Some(span);
        } else if weight.is_none() {
            weight = span.strip_suffix("lb").and_then(parse_number);
        }
    }
    (position, height, weight)
}

fn span_texts(fragment: &str) -> Vec<String> {
    let lc = to_lower(fragment);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(rel) = lc[pos..].find("<span") {
        let start = pos + rel;
        let Some(open_rel) = fragment[start..].find('>') else {
            break;
        };
        let open_end = start + open_rel + 1;
        let Some(close_rel) = lc[open_end..].find("</span>") else {
            break;
        };
        out.push(strip_tags(&fragment[open_end..open_end + close_rel]));
        pos = open_end + close_rel;
    }
    out
}

fn looks_like_height(text: &str) -> bool {
    let Some((feet, inches)) = text.split_once('-') else {
        return false;
    };
    !feet.is_empty()
        && !inches.is_empty()
        && feet.chars().all(|c| c.is_ascii_digit())
        && inches.chars().all(|c| c.is_ascii_digit())
}
