use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use tracing::info;

use cbb_scoresheet::config::Config;
use cbb_scoresheet::export;
use cbb_scoresheet::logging::init_tracing;
use cbb_scoresheet::season::SeasonWindow;
use cbb_scoresheet::team_list::{self, prompt_known_team};
use cbb_scoresheet::team_query::query_matchup;

const RULE_WIDTH: usize = 65;

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing()?;
    let config = Config::from_env();
    let today = Local::now().date_naive();
    let window = SeasonWindow::new(config.season_year.unwrap_or(today.year()));
    info!(
        current = %window.current(),
        previous = %window.previous(),
        per_game = config.per_game,
        "season window"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "\n    Welcome to the College Basketball Analysis Scoresheet System\n        > Follow the prompts to query Sports Reference.\n        > The workbook is saved to {}\n",
        config.output_dir.display()
    )?;

    let fetcher = config.fetcher(window)?;
    let teams = team_list::load_or_refresh(&config.team_list_path, fetcher.as_ref())?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let home = prompt_known_team(&mut input, &mut out, "home", &teams)?;
    let away = prompt_known_team(&mut input, &mut out, "away", &teams)?;

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "GAME SELECTED: {home} (home) vs. {away} (away)")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    out.flush()?;

    let reports = query_matchup(fetcher.as_ref(), &home, &away, window, config.per_game)?;

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed creating {}", config.output_dir.display()))?;
    let report = export::write_matchup(&config.output_dir, &reports.home, &reports.away, today)?;

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Scoresheet saved")?;
    writeln!(out, "    > File name: {}", report.path.display())?;
    writeln!(
        out,
        "    > Sheets: {} ({} rows), {} ({} rows)",
        report.home_sheet, report.home_rows, report.away_sheet, report.away_rows
    )?;
    writeln!(out, "    > Datestamp: {}", today.format("%Y-%m-%d"))?;
    writeln!(out, "    > Timestamp: {}", Local::now().format("%H:%M:%S"))?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    Ok(())
}
