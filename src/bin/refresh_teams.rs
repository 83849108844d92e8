use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Local};

use cbb_scoresheet::config::Config;
use cbb_scoresheet::logging::init_tracing;
use cbb_scoresheet::season::SeasonWindow;
use cbb_scoresheet::team_list;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing()?;

    let config = Config::from_env();
    let path = parse_path_arg().unwrap_or_else(|| config.team_list_path.clone());
    let year = config.season_year.unwrap_or(Local::now().year());
    let fetcher = config.fetcher(SeasonWindow::new(year))?;

    let list = team_list::refresh(&path, fetcher.as_ref())?;

    println!("Division I team list refreshed");
    println!("File: {}", path.display());
    println!("Teams: {}", list.len());
    Ok(())
}

fn parse_path_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--out=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--out" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
