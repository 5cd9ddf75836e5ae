pub mod config;
pub mod error;
pub mod ledger;
pub mod output;
pub mod scoring;
pub mod source;

pub use error::LedgerError;
pub use ledger::{Gender, IdentityPolicy, Observation, ParticipantLedger, ParticipantRecord};
pub use scoring::{rank, EventAggregate, EventConfig, RankedRow, Standings};
pub use source::{collect, CollectReport, ScoreSource, SourceWarning};
