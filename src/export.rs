use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::reconcile::TeamReport;
use crate::stats::{PerGameRates, PlayerSeasonRecord};

pub const SEASON_COLUMNS: &[&str] = &[
    "player_name",
    "position",
    "height",
    "weight",
    "season",
    "games_played",
    "minutes_played",
    "points",
    "rebounds",
    "assists",
    "field_goal_percentage",
    "free_throw_percentage",
];

pub const PER_GAME_SUFFIX: &str = ".PG";
pub const PER_GAME_COLUMNS: &[&str] = &["minutes_played", "points", "rebounds", "assists"];

const MAX_SHEET_NAME: usize = 31;
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

pub struct ExportReport {
    pub path: PathBuf,
    pub home_sheet: String,
    pub away_sheet: String,
    pub home_rows: usize,
    pub away_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

pub fn output_file_name(home: &str, away: &str, date: NaiveDate) -> String {
    format!("{home}-{away}-{}.xlsx", date.format("%Y-%m-%d"))
}

pub fn header_row(per_game: bool) -> Vec<String> {
    let mut header: Vec<String> = SEASON_COLUMNS.iter().map(|c| c.to_string()).collect();
    if per_game {
        header.extend(PER_GAME_COLUMNS.iter().map(|c| format!("{c}{PER_GAME_SUFFIX}")));
    }
    header
}

pub fn record_cells(row: &PlayerSeasonRecord, rates: Option<&PerGameRates>) -> Vec<Cell> {
    let mut cells = vec![
        Cell::Text(row.player_name.clone()),
        text(row.position.as_deref()),
        text(row.height.as_deref()),
        count(row.weight),
        Cell::Text(row.season.to_string()),
        count(row.games_played),
        count(row.minutes_played),
        count(row.points),
        count(row.rebounds),
        count(row.assists),
        number(row.field_goal_percentage),
        number(row.free_throw_percentage),
    ];
    if let Some(rates) = rates {
        cells.extend([
            number(rates.minutes_played),
            number(rates.points),
            number(rates.rebounds),
            number(rates.assists),
        ]);
    }
    cells
}

fn text(value: Option<&str>) -> Cell {
    value.map_or(Cell::Empty, |v| Cell::Text(v.to_string()))
}

fn count(value: Option<u32>) -> Cell {
    value.map_or(Cell::Empty, |v| Cell::Number(v as f64))
}

fn number(value: Option<f64>) -> Cell {
    value.map_or(Cell::Empty, Cell::Number)
}

/// `"{team}-Data"`, cleaned of characters Excel rejects and cut to 31 chars.
pub fn sheet_name(team_name: &str) -> String {
    let cleaned: String = team_name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let suffix = "-Data";
    let room = MAX_SHEET_NAME - suffix.len();
    let base: String = cleaned.chars().take(room).collect();
    format!("{}{suffix}", base.trim_end())
}

fn sheet_names(home: &str, away: &str) -> (String, String) {
    let home_name = sheet_name(home);
    let away_name = sheet_name(away);
    if home_name.eq_ignore_ascii_case(&away_name) {
        ("Home-Data".to_string(), "Away-Data".to_string())
    } else {
        (home_name, away_name)
    }
}

/// One workbook, home sheet then away sheet, named after the matchup and
/// `date`.
pub fn write_matchup(
    dir: &Path,
    home: &TeamReport,
    away: &TeamReport,
    date: NaiveDate,
) -> Result<ExportReport> {
    if home.has_per_game() != away.has_per_game() {
        bail!("home and away reports disagree on per-game columns");
    }
    let path = dir.join(output_file_name(&home.team_name, &away.team_name, date));
    let (home_sheet, away_sheet) = sheet_names(&home.team_name, &away.team_name);

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&home_sheet)?;
        write_report(sheet, home, &header_format)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&away_sheet)?;
        write_report(sheet, away, &header_format)?;
    }

    workbook
        .save(&path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    info!(path = %path.display(), "workbook saved");

    Ok(ExportReport {
        path,
        home_sheet,
        away_sheet,
        home_rows: home.table().len(),
        away_rows: away.table().len(),
    })
}

fn write_report(
    worksheet: &mut Worksheet,
    report: &TeamReport,
    header_format: &Format,
) -> Result<()> {
    for (col_idx, title) in header_row(report.has_per_game()).iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_idx as u16, title, header_format)
            .with_context(|| format!("write header ({col_idx})"))?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (idx, (row, rates)) in report.joined_rows().enumerate() {
        let row_idx = (idx + 1) as u32;
        for (col_idx, cell) in record_cells(row, rates).into_iter().enumerate() {
            let col_idx = col_idx as u16;
            let written = match cell {
                Cell::Text(value) => worksheet.write_string(row_idx, col_idx, &value),
                Cell::Number(value) => worksheet.write_number(row_idx, col_idx, value),
                Cell::Empty => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
