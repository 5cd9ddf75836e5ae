use serde::{Deserialize, Serialize};

use super::aggregate::{aggregate, aggregate_combined, EventAggregate};
use super::config::{EventConfig, RankingPolicy};
use crate::ledger::{Gender, ParticipantRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Solo,
    Combined,
}

/// One ranking slot of a participant's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotScore {
    pub kind: SlotKind,
    pub aggregate: EventAggregate,
    /// What this slot adds to the total under the active policy
    pub points: i64,
}

impl SlotScore {
    pub fn label(&self) -> &str {
        &self.aggregate.event_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRow {
    pub participant_id: String,
    pub gender: Gender,
    pub club: String,
    pub per_event: Vec<SlotScore>,
    pub total_score: i64,
    pub final_score: i64,
    pub events_completed: u32,
}

impl RankedRow {
    fn from_slots(record: &ParticipantRecord, per_event: Vec<SlotScore>) -> Self {
        // Scores come from untrusted pages; clamp instead of overflowing.
        let total_score = per_event
            .iter()
            .fold(0i64, |acc, s| acc.saturating_add(s.points));
        let events_completed = per_event.iter().filter(|s| s.aggregate.contributed).count() as u32;
        Self {
            participant_id: record.participant_id.clone(),
            gender: record.gender,
            club: record.club.clone(),
            per_event,
            total_score,
            final_score: total_score.saturating_mul(events_completed as i64),
            events_completed,
        }
    }

    /// Slot by label (solo event id or combined label).
    pub fn event(&self, label: &str) -> Option<&EventAggregate> {
        self.per_event
            .iter()
            .find(|s| s.label() == label)
            .map(|s| &s.aggregate)
    }
}

pub type PolicyFn = fn(&ParticipantRecord, &EventConfig) -> RankedRow;

impl RankingPolicy {
    pub fn scorer(self) -> PolicyFn {
        match self {
            RankingPolicy::BestPerEvent => best_per_event,
            RankingPolicy::SumOfAll => sum_of_all,
            RankingPolicy::SeparateAlternates => separate_alternates,
        }
    }
}

/// Score one participant with the policy selected in `config`.
pub fn score_record(record: &ParticipantRecord, config: &EventConfig) -> RankedRow {
    (config.policy.scorer())(record, config)
}

/// Best value per solo event, plus the best value across the combined pair.
pub fn best_per_event(record: &ParticipantRecord, config: &EventConfig) -> RankedRow {
    let slots = substituted_slots(record, config)
        .into_iter()
        .map(|(kind, aggregate)| SlotScore {
            kind,
            points: aggregate.best_value,
            aggregate,
        })
        .collect();
    RankedRow::from_slots(record, slots)
}

/// Every value counts, not only the best. The combined pair still shares a slot.
pub fn sum_of_all(record: &ParticipantRecord, config: &EventConfig) -> RankedRow {
    let slots = substituted_slots(record, config)
        .into_iter()
        .map(|(kind, aggregate)| SlotScore {
            kind,
            points: aggregate.sum(),
            aggregate,
        })
        .collect();
    RankedRow::from_slots(record, slots)
}

/// Best value per event with no substitution: each alternate is its own slot.
pub fn separate_alternates(record: &ParticipantRecord, config: &EventConfig) -> RankedRow {
    let offset = config.penalty_offset;
    let slots = config
        .event_ids()
        .map(|id| {
            let aggregate = aggregate(id, record.observations(id), offset);
            SlotScore {
                kind: SlotKind::Solo,
                points: aggregate.best_value,
                aggregate,
            }
        })
        .collect();
    RankedRow::from_slots(record, slots)
}

fn substituted_slots(record: &ParticipantRecord, config: &EventConfig) -> Vec<(SlotKind, EventAggregate)> {
    let offset = config.penalty_offset;
    let mut slots: Vec<_> = config
        .solo
        .iter()
        .map(|id| (SlotKind::Solo, aggregate(id, record.observations(id), offset)))
        .collect();

    if let Some(ref combined) = config.combined {
        let [first, second] = &combined.alternates;
        slots.push((
            SlotKind::Combined,
            aggregate_combined(
                &combined.label(),
                record.observations(first),
                record.observations(second),
                offset,
            ),
        ));
    }
    slots
}

/// Ranked rows, highest final score first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    rows: Vec<RankedRow>,
}

impl Standings {
    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<RankedRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn by_gender(&self, gender: Gender) -> Vec<&RankedRow> {
        self.rows.iter().filter(|r| r.gender == gender).collect()
    }

    pub fn by_club(&self, club: &str) -> Vec<&RankedRow> {
        self.rows
            .iter()
            .filter(|r| r.club.eq_ignore_ascii_case(club))
            .collect()
    }

    /// 1-based position in the full table.
    pub fn position_of(&self, participant_id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.participant_id == participant_id)
            .map(|i| i + 1)
    }
}

/// Score every record and order by final score descending.
///
/// Equal final scores keep the order of `records`; there is no secondary key.
pub fn rank(records: &[ParticipantRecord], config: &EventConfig) -> Standings {
    let mut rows: Vec<RankedRow> = records.iter().map(|r| score_record(r, config)).collect();

    // sort_by is stable
    rows.sort_by(|a, b| b.final_score.cmp(&a.final_score));

    tracing::debug!(
        participants = rows.len(),
        policy = ?config.policy,
        "ranked participants"
    );
    Standings { rows }
}
