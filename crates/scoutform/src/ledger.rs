//! Match/team ledger: seeding from the match schedule and record upserts.
//!
//! The ledger is a CSV file with one row per (match, team), pre-seeded from
//! the schedule before any form is read. Decoded records are merged into
//! their existing row; a record whose row is missing is rejected, never
//! appended.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::record::ScoutingRecord;

/// Ledger column headers, in file order.
pub const LEDGER_HEADER: [&str; 17] = [
    "Match",
    "Team",
    "Auto Start Location",
    "Auto Cross",
    "Auto Low Goals",
    "Auto High Outer Goals",
    "Auto High Inner Goals",
    "Teleop Low Goals",
    "Teleop High Goals",
    "Shoot Location",
    "Control Panel 2",
    "Control Panel 3",
    "Climb",
    "Foul",
    "Card",
    "Disabled",
    "Played Defense",
];

/// One ledger row. Decoded fields stay blank until a form is recorded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "Match")]
    pub match_number: u32,
    #[serde(rename = "Team")]
    pub team: u32,
    #[serde(rename = "Auto Start Location")]
    pub auto_start: Option<u32>,
    #[serde(rename = "Auto Cross")]
    pub auto_cross: Option<u32>,
    #[serde(rename = "Auto Low Goals")]
    pub auto_low: Option<u32>,
    #[serde(rename = "Auto High Outer Goals")]
    pub auto_high_outer: Option<u32>,
    #[serde(rename = "Auto High Inner Goals")]
    pub auto_high_inner: Option<u32>,
    #[serde(rename = "Teleop Low Goals")]
    pub teleop_low: Option<u32>,
    #[serde(rename = "Teleop High Goals")]
    pub teleop_high: Option<u32>,
    #[serde(rename = "Shoot Location")]
    pub shoot_location: Option<u32>,
    #[serde(rename = "Control Panel 2")]
    pub control_panel_2: Option<u32>,
    #[serde(rename = "Control Panel 3")]
    pub control_panel_3: Option<u32>,
    #[serde(rename = "Climb")]
    pub climb: Option<u32>,
    #[serde(rename = "Foul")]
    pub foul: Option<u32>,
    #[serde(rename = "Card")]
    pub card: Option<u32>,
    #[serde(rename = "Disabled")]
    pub disabled: Option<u32>,
    #[serde(rename = "Played Defense")]
    pub played_defense: Option<u32>,
}

impl LedgerRow {
    pub fn blank(match_number: u32, team: u32) -> Self {
        Self {
            match_number,
            team,
            auto_start: None,
            auto_cross: None,
            auto_low: None,
            auto_high_outer: None,
            auto_high_inner: None,
            teleop_low: None,
            teleop_high: None,
            shoot_location: None,
            control_panel_2: None,
            control_panel_3: None,
            climb: None,
            foul: None,
            card: None,
            disabled: None,
            played_defense: None,
        }
    }

    pub fn key(&self) -> (u32, u32) {
        (self.match_number, self.team)
    }

    /// `true` while no form has been recorded for this row.
    pub fn is_blank(&self) -> bool {
        *self == Self::blank(self.match_number, self.team)
    }

    /// Overwrite every non-key column with the record's values.
    pub fn apply(&mut self, r: &ScoutingRecord) {
        self.auto_start = Some(r.auto_start);
        self.auto_cross = Some(r.auto_cross);
        self.auto_low = Some(r.auto_low);
        self.auto_high_outer = Some(r.auto_high_outer);
        self.auto_high_inner = Some(r.auto_high_inner);
        self.teleop_low = Some(r.teleop_low);
        self.teleop_high = Some(r.teleop_high);
        self.shoot_location = Some(r.shoot_location);
        self.control_panel_2 = Some(r.control_panel_2);
        self.control_panel_3 = Some(r.control_panel_3);
        self.climb = Some(r.climb);
        self.foul = Some(r.foul);
        self.card = Some(r.card);
        self.disabled = Some(r.disabled);
        self.played_defense = Some(r.played_defense);
    }
}

/// Persists decoded records into a pre-seeded ledger.
pub trait LedgerWriter {
    /// Merge `record` into its (match, team) row.
    ///
    /// Fails with [`Error::MatchNotFound`] when the row does not exist.
    fn write_record(&mut self, record: &ScoutingRecord) -> Result<()>;
}

/// CSV-file ledger rewritten in full on every upsert.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_rows(&self) -> Result<Vec<LedgerRow>> {
        read_rows(&self.path)
    }
}

impl LedgerWriter for CsvLedger {
    fn write_record(&mut self, record: &ScoutingRecord) -> Result<()> {
        let mut rows = read_rows(&self.path)?;
        let key = (record.match_number, record.team);
        let row = rows
            .iter_mut()
            .find(|row| row.key() == key)
            .ok_or(Error::MatchNotFound {
                match_number: record.match_number,
                team: record.team,
            })?;
        row.apply(record);
        write_rows(&self.path, &rows)?;
        tracing::debug!(
            "Ledger {} updated for match {} team {}",
            self.path.display(),
            record.match_number,
            record.team
        );
        Ok(())
    }
}

/// Read every ledger row.
pub fn read_rows(path: &Path) -> Result<Vec<LedgerRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<LedgerRow>, _>>()?;
    Ok(rows)
}

/// Write the header and `rows`, replacing the file.
///
/// Rows go to a temporary sibling file that is renamed over `path` once
/// complete, so an interrupted write leaves the previous ledger intact.
pub fn write_rows(path: &Path, rows: &[LedgerRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        writer.write_record(LEDGER_HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// One scheduled match: number plus red1..red3, blue1..blue3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledMatch {
    pub match_number: u32,
    pub teams: [u32; 6],
}

/// Result of [`seed_ledger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// A new ledger was written with this many rows.
    Created { rows: usize },
    /// A ledger already existed and was left untouched.
    AlreadyExists,
}

/// Trailing integer of a match label such as `"Qualification 12"`.
pub fn parse_match_label(label: &str) -> Option<u32> {
    let label = label.trim();
    let digits_start = label
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    label[digits_start..].parse().ok()
}

/// Parse a match-schedule CSV (header row, then one row per match).
///
/// Column 0 is the match label. With exactly seven columns the six team
/// numbers follow it directly; with more, column 1 is a description or time
/// and the teams are columns 2..8. Teams are in red1, red2, red3, blue1,
/// blue2, blue3 order. Trailing empty fields are ignored.
pub fn read_schedule(path: &Path) -> Result<Vec<ScheduledMatch>> {
    if !path.is_file() {
        return Err(Error::schedule(path, "file not found"));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::schedule(path, e.to_string()))?;

    let mut matches = Vec::new();
    for (i, rec) in reader.records().enumerate() {
        let line = i + 2;
        let rec = rec.map_err(|e| Error::schedule(path, e.to_string()))?;
        let fields: Vec<&str> = rec.iter().map(str::trim).collect();
        let n = fields
            .iter()
            .rposition(|f| !f.is_empty())
            .map_or(0, |last| last + 1);
        let first_team = match n {
            7 => 1,
            n if n > 7 => 2,
            _ => {
                return Err(Error::schedule(
                    path,
                    format!("line {line}: expected a label and 6 teams, got {n} columns"),
                ))
            }
        };
        let label = fields[0];
        let match_number = parse_match_label(label).ok_or_else(|| {
            Error::schedule(path, format!("line {line}: bad match label '{label}'"))
        })?;

        let mut teams = [0u32; 6];
        for (slot, field) in teams.iter_mut().zip(&fields[first_team..first_team + 6]) {
            *slot = field.parse().map_err(|_| {
                Error::schedule(path, format!("line {line}: bad team number '{field}'"))
            })?;
        }
        matches.push(ScheduledMatch {
            match_number,
            teams,
        });
    }
    Ok(matches)
}

/// Create the ledger from the schedule, six blank rows per match.
///
/// An existing ledger is never overwritten.
pub fn seed_ledger(schedule: &Path, ledger: &Path) -> Result<SeedOutcome> {
    let matches = read_schedule(schedule)?;
    if matches.is_empty() {
        return Err(Error::schedule(schedule, "no matches"));
    }
    if ledger.exists() {
        tracing::info!("Ledger {} already exists; not reseeding", ledger.display());
        return Ok(SeedOutcome::AlreadyExists);
    }

    let rows: Vec<LedgerRow> = matches
        .iter()
        .flat_map(|m| m.teams.iter().map(|&t| LedgerRow::blank(m.match_number, t)))
        .collect();
    write_rows(ledger, &rows)?;
    tracing::info!(
        "Seeded {} with {} rows from {} matches",
        ledger.display(),
        rows.len(),
        matches.len()
    );
    Ok(SeedOutcome::Created { rows: rows.len() })
}
