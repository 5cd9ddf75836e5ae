pub mod aggregate;
pub mod config;
pub mod engine;
pub mod normalize;
pub mod validation;

pub use aggregate::{aggregate, aggregate_combined, EventAggregate};
pub use config::*;
pub use engine::{rank, score_record, RankedRow, SlotKind, SlotScore, Standings};
pub use normalize::{normalize, normalize_with_offset, ScoreText, PENALTY_OFFSET};
pub use validation::validate_events;
