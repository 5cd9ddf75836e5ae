use serde::{Deserialize, Serialize};

use super::normalize::normalized_value;
use crate::ledger::Observation;

/// Reduction of one event's observations to a best value and the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAggregate {
    pub event_id: String,
    pub best_value: i64,
    /// All other normalized values in observation order. Only the first
    /// occurrence of `best_value` is removed.
    pub other_values: Vec<i64>,
    pub contributed: bool,
}

impl EventAggregate {
    /// Reduce already-normalized values.
    pub fn from_values(event_id: impl Into<String>, values: Vec<i64>) -> Self {
        let best_value = values.iter().copied().max().unwrap_or(0);
        let mut other_values = values;
        if let Some(pos) = other_values.iter().position(|&v| v == best_value) {
            other_values.remove(pos);
        }
        Self {
            event_id: event_id.into(),
            best_value,
            other_values,
            contributed: best_value > 0,
        }
    }

    /// Sum of every normalized value, best included. Saturates at `i64::MAX`.
    pub fn sum(&self) -> i64 {
        self.other_values
            .iter()
            .fold(self.best_value, |acc, &v| acc.saturating_add(v))
    }
}

pub fn aggregate(event_id: &str, observations: &[Observation], offset: i64) -> EventAggregate {
    EventAggregate::from_values(event_id, normalized(observations, offset).collect())
}

/// Aggregate two alternate events as one slot: `first`'s observations, then `second`'s.
pub fn aggregate_combined(
    label: &str,
    first: &[Observation],
    second: &[Observation],
    offset: i64,
) -> EventAggregate {
    let values = normalized(first, offset)
        .chain(normalized(second, offset))
        .collect();
    EventAggregate::from_values(label, values)
}

fn normalized(observations: &[Observation], offset: i64) -> impl Iterator<Item = i64> + '_ {
    observations
        .iter()
        .map(move |o| normalized_value(o.raw_score, o.penalty, offset))
}
