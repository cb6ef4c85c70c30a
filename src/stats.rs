// Season stat ingestion.
//
// Reads ESPN-format season stat exports: one CSV per team, with a category
// header row, a column-name row, and then data rows with fixed column
// positions. Rows that cannot be parsed are skipped, never fatal.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Lineup positions recognized by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DEF")]
    Defense,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles the abbreviations that appear in ESPN exports; "DST" and
    /// "D/ST" both map to Defense. Returns `None` for anything else
    /// (individual defensive positions like LB/CB, punters, totals rows).
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" | "FB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Raw per-season stat aggregates for one player.
///
/// Counting stats are season totals; the scoring model divides by
/// `games_played` to get a per-game projection. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct PlayerStats {
    pub name: String,
    pub team: String,
    pub position: Position,
    pub games_played: u32,
    pub passing_yards: f64,
    pub passing_tds: u32,
    pub passing_ints: u32,
    pub rushing_yards: f64,
    pub rushing_tds: u32,
    pub receptions: u32,
    pub receiving_yards: f64,
    pub receiving_tds: u32,
    pub sacks: f64,
    pub defensive_ints: u32,
    pub fumbles_forced: u32,
    pub fumbles_recovered: u32,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Column layout (ESPN season stats export)
// ---------------------------------------------------------------------------

// The export has two header rows: a category banner (PASSING / RUSHING /
// RECEIVING / DEFENSE spans) and the real column names. Data columns are
// positional:
//   0 RK, 1 NAME, 2 TEAM, 3 POS, 4 GP,
//   5-7 passing YDS/TD/INT, 8-9 rushing YDS/TD,
//   10-12 REC / receiving YDS / TD, 13-16 SCK/INT/FF/FR,
//   17 FPTS/G, 18 FPTS
const HEADER_ROWS: usize = 2;
const MIN_COLUMNS: usize = 19;

const COL_NAME: usize = 1;
const COL_POS: usize = 3;
const COL_GP: usize = 4;
const COL_PASS_YDS: usize = 5;
const COL_PASS_TD: usize = 6;
const COL_PASS_INT: usize = 7;
const COL_RUSH_YDS: usize = 8;
const COL_RUSH_TD: usize = 9;
const COL_REC: usize = 10;
const COL_REC_YDS: usize = 11;
const COL_REC_TD: usize = 12;
const COL_SACKS: usize = 13;
const COL_DEF_INT: usize = 14;
const COL_FF: usize = 15;
const COL_FR: usize = 16;

// ---------------------------------------------------------------------------
// Field parsing helpers
// ---------------------------------------------------------------------------

/// Parse a numeric field, treating an empty cell as zero. `None` means the
/// cell held something non-numeric and the row should be skipped.
fn field_f64(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    let cell = record.get(idx).unwrap_or("").trim();
    if cell.is_empty() {
        return Some(0.0);
    }
    // ESPN uses thousands separators in yardage columns.
    cell.replace(',', "").parse::<f64>().ok()
}

fn field_u32(record: &csv::StringRecord, idx: usize) -> Option<u32> {
    field_f64(record, idx).map(|v| v.round() as u32)
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_from_reader<R: Read>(rdr: R, team: &str) -> Result<Vec<PlayerStats>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);

    let mut players = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        if row_idx < HEADER_ROWS {
            continue;
        }
        // Short rows are section separators or totals lines in the export.
        if record.len() < MIN_COLUMNS {
            continue;
        }

        let name = record.get(COL_NAME).unwrap_or("").trim().to_string();
        let pos_str = record.get(COL_POS).unwrap_or("").trim();
        if name.is_empty() || pos_str.is_empty() {
            continue;
        }

        let position = match Position::from_str_pos(pos_str) {
            Some(p) => p,
            None => {
                warn!("skipping {} '{}': position '{}' is not rosterable", team, name, pos_str);
                continue;
            }
        };

        let parsed = (|| {
            Some(PlayerStats {
                name: name.clone(),
                team: team.to_string(),
                position,
                games_played: field_u32(&record, COL_GP)?,
                passing_yards: field_f64(&record, COL_PASS_YDS)?,
                passing_tds: field_u32(&record, COL_PASS_TD)?,
                passing_ints: field_u32(&record, COL_PASS_INT)?,
                rushing_yards: field_f64(&record, COL_RUSH_YDS)?,
                rushing_tds: field_u32(&record, COL_RUSH_TD)?,
                receptions: field_u32(&record, COL_REC)?,
                receiving_yards: field_f64(&record, COL_REC_YDS)?,
                receiving_tds: field_u32(&record, COL_REC_TD)?,
                sacks: field_f64(&record, COL_SACKS)?,
                defensive_ints: field_u32(&record, COL_DEF_INT)?,
                fumbles_forced: field_u32(&record, COL_FF)?,
                fumbles_recovered: field_u32(&record, COL_FR)?,
            })
        })();

        match parsed {
            Some(stats) => players.push(stats),
            None => {
                warn!("skipping {} '{}': non-numeric stat value", team, name);
            }
        }
    }

    Ok(players)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load one team's season stats from an ESPN-format export CSV.
///
/// The team code is taken from the caller (the bracket config), not from
/// the export's TEAM column, which is unreliable for traded players.
pub fn load_team_stats(path: &Path, team: &str) -> Result<Vec<PlayerStats>, StatsError> {
    let file = std::fs::File::open(path).map_err(|e| StatsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_from_reader(file, team).map_err(|e| StatsError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
