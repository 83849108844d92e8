use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::fetch::{StatsFetcher, team_names};

pub const DEFAULT_TEAM_LIST_FILE: &str = "Division01_Teams.txt";

/// Division I team display names, one per line on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamList {
    names: Vec<String>,
}

impl TeamList {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn parse(raw: &str) -> Self {
        Self::new(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The list's spelling of `name`, ignoring case and extra whitespace.
    pub fn find(&self, name: &str) -> Option<&str> {
        let wanted = title_case(name);
        self.names
            .iter()
            .find(|n| *n == &wanted || title_case(n) == wanted)
            .map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn to_file_contents(&self) -> String {
        let mut out = String::new();
        for name in &self.names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

/// Read the cached list, regenerating it from the fetcher when the file is
/// absent.
pub fn load_or_refresh(path: &Path, fetcher: &dyn StatsFetcher) -> Result<TeamList> {
    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading team list {}", path.display()))?;
        let list = TeamList::parse(&raw);
        info!(path = %path.display(), teams = list.len(), "loaded team list");
        return Ok(list);
    }
    refresh(path, fetcher)
}

pub fn refresh(path: &Path, fetcher: &dyn StatsFetcher) -> Result<TeamList> {
    info!("gathering Division I teams");
    let conferences = fetcher
        .conferences()
        .context("failed to load Division I conferences")?;
    let list = TeamList::new(team_names(&conferences));

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("failed creating {}", dir.display()))?;
    }
    fs::write(path, list.to_file_contents())
        .with_context(|| format!("failed writing team list {}", path.display()))?;
    info!(path = %path.display(), teams = list.len(), "wrote team list");
    Ok(list)
}

/// Title-case prompt input: a letter is upper-cased when it follows a
/// non-letter and lower-cased otherwise, so "texas a&m" reads "Texas A&M".
pub fn title_case(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut word_start = true;
    for ch in collapsed.chars() {
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}

/// Ask for a team until the answer names a known Division I team.
pub fn prompt_known_team(
    input: &mut impl BufRead,
    output: &mut impl Write,
    side: &str,
    list: &TeamList,
) -> Result<String> {
    loop {
        write!(output, "<<Enter {side} team name>> ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before a {side} team was entered");
        }
        if let Some(known) = list.find(&line) {
            return Ok(known.to_string());
        }
        let name = title_case(&line);
        writeln!(output, "!! {name} not found in Division 1 - please reenter !!")?;
    }
}
