use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::fetch::StatsFetcher;
use crate::fixture_fetch::FixtureFetcher;
use crate::season::SeasonWindow;
use crate::sports_reference::{DEFAULT_BASE_URL, SportsReferenceFetcher};
use crate::team_list::DEFAULT_TEAM_LIST_FILE;

const DEFAULT_REQUEST_DELAY_MS: u64 = 3100;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    /// Start year of the current season; `None` means "this calendar year".
    pub season_year: Option<i32>,
    pub per_game: bool,
    pub output_dir: PathBuf,
    pub team_list_path: PathBuf,
    pub base_url: String,
    pub request_delay: Duration,
    pub http_timeout: Duration,
    pub fixture_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            season_year: None,
            per_game: true,
            output_dir: PathBuf::from("."),
            team_list_path: PathBuf::from(DEFAULT_TEAM_LIST_FILE),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            fixture_path: None,
        }
    }
}

impl Config {
    /// Reads `CBB_*` variables. Call after `.env` files are loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };
        let defaults = Self::default();
        Self {
            season_year: opt("CBB_SEASON_YEAR").and_then(|v| parse_season_year(&v)),
            per_game: opt("CBB_PER_GAME")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.per_game),
            output_dir: opt("CBB_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            team_list_path: opt("CBB_TEAM_LIST_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.team_list_path),
            base_url: opt("CBB_BASE_URL").unwrap_or(defaults.base_url),
            request_delay: opt("CBB_REQUEST_DELAY_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
            http_timeout: opt("CBB_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or(defaults.http_timeout),
            fixture_path: opt("CBB_FIXTURE_PATH").map(PathBuf::from),
        }
    }

    /// The offline fixture when `CBB_FIXTURE_PATH` is set, the live site
    /// otherwise.
    pub fn fetcher(&self, window: SeasonWindow) -> Result<Box<dyn StatsFetcher>> {
        if let Some(path) = self.fixture_path.as_ref() {
            info!(path = %path.display(), "using fixture data");
            return Ok(Box::new(FixtureFetcher::load(path)?));
        }
        Ok(Box::new(SportsReferenceFetcher::new(
            &self.base_url,
            window,
            self.http_timeout,
            self.request_delay,
        )?))
    }
}

fn parse_season_year(raw: &str) -> Option<i32> {
    match raw.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            warn!(value = raw, "CBB_SEASON_YEAR is not a start year; using the calendar year");
            None
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
