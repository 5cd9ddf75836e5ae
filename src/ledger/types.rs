use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::scoring::normalize::ScoreText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Lenient parse of the gender column as it appears on results pages.
    /// Accepts English and French spellings and single-letter codes.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" | "h" | "male" | "man" | "men" | "homme" | "hommes" => Gender::Male,
            "f" | "w" | "female" | "woman" | "women" | "femme" | "femmes" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Gender::from_label(&s)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One score reading for one participant in one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub participant_id: String,
    pub gender: Gender,
    pub club: String,
    pub event_id: String,
    pub raw_score: i64,
    /// Penalty annotation, never positive. 0 when the cell had none.
    pub penalty: i64,
}

impl Observation {
    pub fn new(
        participant_id: impl Into<String>,
        gender: Gender,
        club: impl Into<String>,
        event_id: impl Into<String>,
        raw_score: i64,
        penalty: i64,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            gender,
            club: club.into(),
            event_id: event_id.into(),
            raw_score,
            penalty: penalty.min(0),
        }
    }

    /// Build an observation from the raw score cell, e.g. `"<b>0</b> (-3)"`.
    pub fn from_score_text(
        participant_id: impl Into<String>,
        gender: Gender,
        club: impl Into<String>,
        event_id: impl Into<String>,
        score_text: &str,
    ) -> Self {
        let parsed = ScoreText::parse(score_text);
        Self::new(
            participant_id,
            gender,
            club,
            event_id,
            parsed.score,
            parsed.penalty,
        )
    }

    /// True when gender or club differ from the given identity.
    pub fn conflicts_with(&self, gender: Gender, club: &str) -> bool {
        self.gender != gender || self.club != club
    }
}

/// Everything seen so far for one participant, keyed by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub participant_id: String,
    pub gender: Gender,
    pub club: String,
    #[serde(default)]
    pub observations_by_event: BTreeMap<String, Vec<Observation>>,
}

impl ParticipantRecord {
    /// Create an empty record whose identity is taken from `obs`.
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            participant_id: obs.participant_id.clone(),
            gender: obs.gender,
            club: obs.club.clone(),
            observations_by_event: BTreeMap::new(),
        }
    }

    /// Observations for `event_id`; empty when the participant never appeared in it.
    pub fn observations(&self, event_id: &str) -> &[Observation] {
        self.observations_by_event
            .get(event_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, obs: Observation) {
        self.observations_by_event
            .entry(obs.event_id.clone())
            .or_default()
            .push(obs);
    }

    pub fn observation_count(&self) -> usize {
        self.observations_by_event.values().map(Vec::len).sum()
    }
}

/// How conflicting gender/club values for the same participant are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityPolicy {
    #[default]
    FirstWins,
    LastWins,
    RejectOnConflict,
}
