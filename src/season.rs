use std::fmt;

pub const CAREER_LABEL: &str = "Career";

/// A season row label. Dated seasons are keyed by the calendar year the
/// season starts in ("2024-25" is `Season(2024)`).
///
/// The derived ordering is the table's total order: dated seasons by start
/// year, `Career` after every dated season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeasonLabel {
    Season(i32),
    Career,
}

impl SeasonLabel {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(CAREER_LABEL) {
            return Some(SeasonLabel::Career);
        }
        let (start, end) = raw.split_once('-')?;
        if start.len() != 4 || end.len() != 2 {
            return None;
        }
        let start: i32 = start.parse().ok()?;
        let end: i32 = end.parse().ok()?;
        if (start + 1).rem_euclid(100) != end {
            return None;
        }
        Some(SeasonLabel::Season(start))
    }

    pub fn is_career(self) -> bool {
        matches!(self, SeasonLabel::Career)
    }
}

impl fmt::Display for SeasonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonLabel::Season(year) => write!(f, "{}-{:02}", year, (year + 1).rem_euclid(100)),
            SeasonLabel::Career => f.write_str(CAREER_LABEL),
        }
    }
}

/// The three labels a team query cares about, derived from a reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    reference_year: i32,
}

impl SeasonWindow {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn current(&self) -> SeasonLabel {
        SeasonLabel::Season(self.reference_year)
    }

    pub fn previous(&self) -> SeasonLabel {
        SeasonLabel::Season(self.reference_year - 1)
    }

    /// Labels every player must have after backfill.
    pub fn required(&self) -> [SeasonLabel; 2] {
        [self.previous(), self.current()]
    }

    pub fn contains(&self, label: SeasonLabel) -> bool {
        label == self.current() || label == self.previous() || label.is_career()
    }

    /// Sports Reference files a season under the year it ends in.
    pub fn site_year(&self) -> i32 {
        self.reference_year + 1
    }
}
