pub mod collect;
pub mod json;

pub use collect::{collect, CollectReport, SourceWarning};
pub use json::{JsonFileSource, RawRow, ScoreCell};

use anyhow::Result;

use crate::ledger::Observation;

/// Anything that yields the observations of one results page.
///
/// A source that cannot be read returns an error; `collect` turns that into a
/// warning and carries on with the remaining sources.
pub trait ScoreSource {
    fn name(&self) -> &str;
    fn observations(&self) -> Result<Vec<Observation>>;
}

/// Observations already in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    observations: Vec<Observation>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            name: name.into(),
            observations,
        }
    }
}

impl ScoreSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn observations(&self) -> Result<Vec<Observation>> {
        Ok(self.observations.clone())
    }
}
