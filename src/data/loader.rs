//! Delimited-file loader for match results
//!
//! Reads the `Home`, `Away`, `Season`, `HG` and `AG` columns. Numeric cells
//! that are empty or unparseable become `None` and are tallied in a
//! [`LoadReport`] instead of failing the load. Team names are kept exactly
//! as written.

use crate::{MatchRecord, Result, TiersError};
use std::io;
use std::path::Path;

const HOME: &str = "Home";
const AWAY: &str = "Away";
const SEASON: &str = "Season";
const HOME_GOALS: &str = "HG";
const AWAY_GOALS: &str = "AG";

/// Counts of cells that could not be coerced to numbers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read (excluding the header)
    pub rows: usize,
    pub missing_season: usize,
    pub missing_home_goals: usize,
    pub missing_away_goals: usize,
}

impl LoadReport {
    /// Total number of numeric cells that became missing
    pub fn missing_cells(&self) -> usize {
        self.missing_season + self.missing_home_goals + self.missing_away_goals
    }

    pub fn has_warnings(&self) -> bool {
        self.missing_cells() > 0
    }

    fn log_warnings(&self, source: &str) {
        if !self.has_warnings() {
            return;
        }
        log::warn!(
            "{}: {} numeric cells missing or invalid (Season: {}, HG: {}, AG: {})",
            source,
            self.missing_cells(),
            self.missing_season,
            self.missing_home_goals,
            self.missing_away_goals
        );
    }
}

/// Match records plus the coercion report for the file they came from
#[derive(Debug, Clone)]
pub struct LoadedMatches {
    pub matches: Vec<MatchRecord>,
    pub report: LoadReport,
}

/// Column positions resolved from the header row
struct ColumnIndex {
    home: usize,
    away: usize,
    season: usize,
    home_goals: usize,
    away_goals: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| TiersError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndex {
            home: find(HOME)?,
            away: find(AWAY)?,
            season: find(SEASON)?,
            home_goals: find(HOME_GOALS)?,
            away_goals: find(AWAY_GOALS)?,
        })
    }
}

/// Load match records from a delimited file on disk
pub fn load_matches<P: AsRef<Path>>(path: P, delimiter: char) -> Result<LoadedMatches> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let loaded = read_matches(file, delimiter)?;

    log::info!(
        "Loaded {} matches from {}",
        loaded.matches.len(),
        path.display()
    );
    loaded.report.log_warnings(&path.display().to_string());

    Ok(loaded)
}

/// Read match records from any delimited source
pub fn read_matches<R: io::Read>(reader: R, delimiter: char) -> Result<LoadedMatches> {
    if !delimiter.is_ascii() {
        return Err(TiersError::Config(format!(
            "Delimiter must be a single ASCII character, got {:?}",
            delimiter
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut matches = Vec::new();
    let mut report = LoadReport::default();

    for row in reader.records() {
        let row = row?;
        let raw = |idx: usize| row.get(idx).unwrap_or("");
        let cell = |idx: usize| raw(idx).trim();

        let season = parse_season(cell(columns.season));
        let home_goals = parse_goals(cell(columns.home_goals));
        let away_goals = parse_goals(cell(columns.away_goals));

        report.rows += 1;
        if season.is_none() {
            report.missing_season += 1;
        }
        if home_goals.is_none() {
            report.missing_home_goals += 1;
        }
        if away_goals.is_none() {
            report.missing_away_goals += 1;
        }

        matches.push(MatchRecord {
            home_team: raw(columns.home).to_string(),
            away_team: raw(columns.away).to_string(),
            season,
            home_goals,
            away_goals,
        });
    }

    log::debug!("Read {} rows", report.rows);

    Ok(LoadedMatches { matches, report })
}

/// Parse a cell as a whole number, accepting forms like `2` or `2.0`
fn parse_whole(raw: &str) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value)
}

fn parse_season(raw: &str) -> Option<i32> {
    let value = parse_whole(raw)?;
    (value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX)).then(|| value as i32)
}

fn parse_goals(raw: &str) -> Option<u32> {
    let value = parse_whole(raw)?;
    (value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}
