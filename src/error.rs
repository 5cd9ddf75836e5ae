use thiserror::Error;

use crate::ledger::Gender;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(
        "conflicting identity for '{participant_id}': known as {known_gender}/{known_club}, \
         observed as {observed_gender}/{observed_club} in event {event_id}"
    )]
    IdentityConflict {
        participant_id: String,
        event_id: String,
        known_gender: Gender,
        known_club: String,
        observed_gender: Gender,
        observed_club: String,
    },
}
