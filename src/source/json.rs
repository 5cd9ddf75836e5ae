use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::ScoreSource;
use crate::ledger::{Gender, Observation};
use crate::scoring::normalize::ScoreText;

/// Score cell as scraped: either the cell's markup or an already numeric value.
///
/// Anything else (null, floats, objects) lands in `Other` and scores 0, so one
/// odd cell does not drop the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreCell {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl ScoreCell {
    pub fn parse(&self) -> ScoreText {
        match self {
            ScoreCell::Number(n) => ScoreText {
                score: *n,
                penalty: 0,
            },
            ScoreCell::Text(s) => ScoreText::parse(s),
            ScoreCell::Other(value) => {
                tracing::debug!(%value, "unreadable score cell, treating as 0");
                ScoreText::default()
            }
        }
    }
}

/// One table row of a results page.
///
/// Example JSON:
/// ```json
/// [
///   { "participant": "Ana Lima", "gender": "F", "club": "Club A",
///     "event": "boulder-1", "score": "<b>0</b> (-3)" }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub participant: String,
    #[serde(default = "unknown_gender")]
    pub gender: Gender,
    #[serde(default)]
    pub club: String,
    pub event: String,
    pub score: ScoreCell,
}

fn unknown_gender() -> Gender {
    Gender::Unknown
}

impl RawRow {
    pub fn into_observation(self) -> Observation {
        let parsed = self.score.parse();
        Observation::new(
            self.participant.trim(),
            self.gender,
            self.club.trim(),
            self.event,
            parsed.score,
            parsed.penalty,
        )
    }
}

/// A JSON file holding the rows of one results page.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    pub fn named(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn observations(&self) -> Result<Vec<Observation>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read source file at {}", self.path.display()))?;
        let rows: Vec<RawRow> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse source: invalid JSON in {}", self.path.display()))?;

        Ok(rows.into_iter().map(RawRow::into_observation).collect())
    }
}
