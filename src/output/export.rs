use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scoring::{EventConfig, RankedRow, RankingPolicy};

/// Handoff document for an external renderer.
///
/// Carries the full ranked table; gender views are a filter on `rows[].gender`.
/// Rows are plain numbers and all presentation is left to the consumer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandingsExport {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub policy: RankingPolicy,
    /// Slot labels in column order
    pub events: Vec<String>,
    pub rows: Vec<RankedRow>,
}

impl StandingsExport {
    pub fn new(config: &EventConfig, rows: Vec<RankedRow>) -> Self {
        Self {
            version: 1,
            generated_at: Utc::now(),
            policy: config.policy,
            events: config.slot_labels(),
            rows,
        }
    }
}

pub fn to_json(export: &StandingsExport) -> Result<String> {
    serde_json::to_string_pretty(export).context("Failed to serialize standings")
}

/// Write the export as JSON atomically
///
/// Uses atomic-write-file so a renderer polling the file never sees a partial write.
pub fn write_export(path: &Path, export: &StandingsExport) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, export).context("Failed to serialize standings")?;

    file.commit()
        .with_context(|| format!("Failed to save standings to {}", path.display()))?;

    Ok(())
}
