pub mod store;
pub mod types;

pub use store::ParticipantLedger;
pub use types::{Gender, IdentityPolicy, Observation, ParticipantRecord};
