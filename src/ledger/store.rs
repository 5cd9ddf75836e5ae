use std::collections::HashMap;

use super::types::{IdentityPolicy, Observation, ParticipantRecord};
use crate::error::LedgerError;

/// Accumulates observations per participant across all sources.
///
/// Records are kept in first-seen order so that ranking ties fall back to the
/// order participants were first encountered. No deduplication is performed:
/// ingesting the same observation twice counts it twice.
#[derive(Debug, Clone, Default)]
pub struct ParticipantLedger {
    policy: IdentityPolicy,
    records: Vec<ParticipantRecord>,
    index: HashMap<String, usize>,
}

impl ParticipantLedger {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self {
            policy,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn policy(&self) -> IdentityPolicy {
        self.policy
    }

    /// Record one observation.
    ///
    /// Under `RejectOnConflict` an observation whose gender or club disagrees
    /// with the stored identity is dropped and reported as an error. The other
    /// policies always append.
    pub fn ingest(&mut self, obs: Observation) -> Result<(), LedgerError> {
        let slot = match self.index.get(&obs.participant_id) {
            Some(&i) => i,
            None => {
                let i = self.records.len();
                self.records.push(ParticipantRecord::from_observation(&obs));
                self.index.insert(obs.participant_id.clone(), i);
                i
            }
        };

        let record = &mut self.records[slot];
        if obs.conflicts_with(record.gender, &record.club) {
            match self.policy {
                IdentityPolicy::FirstWins => {}
                IdentityPolicy::LastWins => {
                    record.gender = obs.gender;
                    record.club = obs.club.clone();
                }
                IdentityPolicy::RejectOnConflict => {
                    return Err(LedgerError::IdentityConflict {
                        participant_id: obs.participant_id,
                        event_id: obs.event_id,
                        known_gender: record.gender,
                        known_club: record.club.clone(),
                        observed_gender: obs.gender,
                        observed_club: obs.club,
                    });
                }
            }
        }

        record.push(obs);
        Ok(())
    }

    /// Ingest one source's observations as a contiguous batch.
    /// Returns the rejections; accepted observations are already recorded.
    pub fn ingest_batch<I>(&mut self, observations: I) -> Vec<LedgerError>
    where
        I: IntoIterator<Item = Observation>,
    {
        observations
            .into_iter()
            .filter_map(|obs| self.ingest(obs).err())
            .collect()
    }

    pub fn all_records(&self) -> &[ParticipantRecord] {
        &self.records
    }

    pub fn get(&self, participant_id: &str) -> Option<&ParticipantRecord> {
        self.index.get(participant_id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn observation_count(&self) -> usize {
        self.records.iter().map(ParticipantRecord::observation_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Gender;

    fn obs(name: &str, gender: Gender, club: &str, event: &str, score: i64) -> Observation {
        Observation::new(name, gender, club, event, score, 0)
    }

    #[test]
    fn test_first_sighting_creates_record() {
        let mut ledger = ParticipantLedger::default();
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e1", 5)).unwrap();

        assert_eq!(ledger.len(), 1);
        let record = ledger.get("Ana").unwrap();
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.club, "Club A");
        assert_eq!(record.observations("e1").len(), 1);
    }

    #[test]
    fn test_appends_per_event_in_order() {
        let mut ledger = ParticipantLedger::default();
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e1", 5)).unwrap();
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e1", 8)).unwrap();
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e2", 3)).unwrap();

        let record = ledger.get("Ana").unwrap();
        let scores: Vec<i64> = record.observations("e1").iter().map(|o| o.raw_score).collect();
        assert_eq!(scores, vec![5, 8]);
        assert_eq!(record.observations("e2").len(), 1);
        assert_eq!(ledger.observation_count(), 3);
    }

    #[test]
    fn test_first_wins_keeps_original_identity() {
        let mut ledger = ParticipantLedger::new(IdentityPolicy::FirstWins);
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e1", 5)).unwrap();
        ledger.ingest(obs("Ana", Gender::Unknown, "Club B", "e2", 7)).unwrap();

        let record = ledger.get("Ana").unwrap();
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.club, "Club A");
        assert_eq!(record.observations("e2").len(), 1);
    }

    #[test]
    fn test_last_wins_overwrites_identity() {
        let mut ledger = ParticipantLedger::new(IdentityPolicy::LastWins);
        assert_eq!(ledger.policy(), IdentityPolicy::LastWins);
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e1", 5)).unwrap();
        ledger.ingest(obs("Ana", Gender::Female, "Club B", "e2", 7)).unwrap();

        let record = ledger.get("Ana").unwrap();
        assert_eq!(record.club, "Club B");
        assert_eq!(record.observation_count(), 2);
    }

    #[test]
    fn test_reject_on_conflict_drops_observation() {
        let mut ledger = ParticipantLedger::new(IdentityPolicy::RejectOnConflict);
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e1", 5)).unwrap();
        let err = ledger
            .ingest(obs("Ana", Gender::Female, "Club B", "e2", 7))
            .unwrap_err();

        match err {
            LedgerError::IdentityConflict { known_club, observed_club, .. } => {
                assert_eq!(known_club, "Club A");
                assert_eq!(observed_club, "Club B");
            }
        }
        let record = ledger.get("Ana").unwrap();
        assert!(record.observations("e2").is_empty());
    }

    #[test]
    fn test_reject_on_conflict_accepts_matching_identity() {
        let mut ledger = ParticipantLedger::new(IdentityPolicy::RejectOnConflict);
        ledger.ingest(obs("Ana", Gender::Female, "Club A", "e1", 5)).unwrap();
        assert!(ledger.ingest(obs("Ana", Gender::Female, "Club A", "e2", 7)).is_ok());
    }

    #[test]
    fn test_records_in_first_seen_order() {
        let mut ledger = ParticipantLedger::default();
        ledger.ingest(obs("Zoe", Gender::Female, "A", "e1", 1)).unwrap();
        ledger.ingest(obs("Bob", Gender::Male, "A", "e1", 1)).unwrap();
        ledger.ingest(obs("Zoe", Gender::Female, "A", "e2", 1)).unwrap();

        let names: Vec<&str> = ledger
            .all_records()
            .iter()
            .map(|r| r.participant_id.as_str())
            .collect();
        assert_eq!(names, vec!["Zoe", "Bob"]);
    }

    #[test]
    fn test_no_dedup_on_replay() {
        let batch = vec![
            obs("Ana", Gender::Female, "Club A", "e1", 5),
            obs("Ana", Gender::Female, "Club A", "e1", 8),
        ];
        let mut ledger = ParticipantLedger::default();
        assert!(ledger.ingest_batch(batch.clone()).is_empty());
        assert!(ledger.ingest_batch(batch).is_empty());
        assert_eq!(ledger.get("Ana").unwrap().observations("e1").len(), 4);
    }

    #[test]
    fn test_ingest_batch_reports_rejections() {
        let mut ledger = ParticipantLedger::new(IdentityPolicy::RejectOnConflict);
        let errors = ledger.ingest_batch(vec![
            obs("Ana", Gender::Female, "Club A", "e1", 5),
            obs("Ana", Gender::Male, "Club A", "e1", 6),
            obs("Bob", Gender::Male, "Club A", "e1", 2),
        ]);
        assert_eq!(errors.len(), 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.observation_count(), 2);
    }
}
