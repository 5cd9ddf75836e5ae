use serde::{Deserialize, Serialize};

use super::normalize::PENALTY_OFFSET;

/// Which events are scored and how they combine into a ranking.
///
/// Example YAML:
/// ```yaml
/// events:
///   solo: ["boulder-1", "boulder-2", "lead"]
///   combined:
///     label: "speed"
///     alternates: ["speed-a", "speed-b"]
///   policy: best-per-event
///   penalty_offset: 100
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EventConfig {
    /// Events scored individually, in display order
    #[serde(default)]
    pub solo: Vec<String>,

    /// Two alternate events that share one ranking slot
    #[serde(default)]
    pub combined: Option<CombinedEvent>,

    #[serde(default)]
    pub policy: RankingPolicy,

    /// Added to the penalty of a zero score (default: 100)
    #[serde(default = "default_penalty_offset")]
    pub penalty_offset: i64,
}

fn default_penalty_offset() -> i64 {
    PENALTY_OFFSET
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            solo: Vec::new(),
            combined: None,
            policy: RankingPolicy::default(),
            penalty_offset: PENALTY_OFFSET,
        }
    }
}

impl EventConfig {
    pub fn new(solo: Vec<String>, combined: Option<CombinedEvent>) -> Self {
        Self {
            solo,
            combined,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Every event identifier referenced, solo events first.
    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.solo
            .iter()
            .map(String::as_str)
            .chain(self.combined.iter().flat_map(|c| c.alternates.iter().map(String::as_str)))
    }

    /// Slot labels in display order, as the active policy lays them out.
    pub fn slot_labels(&self) -> Vec<String> {
        let mut labels = self.solo.clone();
        if let Some(ref combined) = self.combined {
            match self.policy {
                RankingPolicy::SeparateAlternates => labels.extend(combined.alternates.iter().cloned()),
                RankingPolicy::BestPerEvent | RankingPolicy::SumOfAll => labels.push(combined.label()),
            }
        }
        labels
    }
}

/// Two mutually exclusive events counted as a single slot.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CombinedEvent {
    /// Display label for the slot (default: "first/second")
    #[serde(default)]
    pub label: Option<String>,

    /// Observation order within the slot follows this order
    pub alternates: [String; 2],
}

impl CombinedEvent {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            label: None,
            alternates: [first.into(), second.into()],
        }
    }

    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.alternates[0], self.alternates[1]))
    }
}

/// Scoring formula applied to each participant.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RankingPolicy {
    /// Best value per solo event plus best value across the combined pair
    #[default]
    BestPerEvent,
    /// Sum of every value per slot, combined pair still shares one slot
    SumOfAll,
    /// Best value per event, alternates scored as two independent slots
    SeparateAlternates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_event_config() {
        let config = EventConfig::default();
        assert!(config.solo.is_empty());
        assert!(config.combined.is_none());
        assert_eq!(config.policy, RankingPolicy::BestPerEvent);
        assert_eq!(config.penalty_offset, 100);
    }

    #[test]
    fn test_full_event_config_parse() {
        let yaml = r#"
solo: ["e1", "e2", "e3"]
combined:
  label: "speed"
  alternates: ["e4a", "e4b"]
policy: sum-of-all
penalty_offset: 50
"#;
        let config: EventConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.solo, vec!["e1", "e2", "e3"]);
        let combined = config.combined.as_ref().unwrap();
        assert_eq!(combined.label(), "speed");
        assert_eq!(combined.alternates, ["e4a".to_string(), "e4b".to_string()]);
        assert_eq!(config.policy, RankingPolicy::SumOfAll);
        assert_eq!(config.penalty_offset, 50);
    }

    #[test]
    fn test_partial_event_config_parse() {
        let yaml = r#"
solo: ["e1"]
"#;
        let config: EventConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.solo, vec!["e1"]);
        assert!(config.combined.is_none());
        assert_eq!(config.policy, RankingPolicy::BestPerEvent);
        assert_eq!(config.penalty_offset, PENALTY_OFFSET);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
solo: ["e1"]
bonus: 3
"#;
        assert!(serde_saphyr::from_str::<EventConfig>(yaml).is_err());
    }

    #[test]
    fn test_event_config_serde_roundtrip() {
        let config = EventConfig::new(
            vec!["e1".to_string()],
            Some(CombinedEvent::new("a", "b")),
        )
        .with_policy(RankingPolicy::SeparateAlternates);
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: EventConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_combined_default_label() {
        assert_eq!(CombinedEvent::new("e4a", "e4b").label(), "e4a/e4b");
    }

    #[test]
    fn test_event_ids_lists_solo_then_alternates() {
        let config = EventConfig::new(
            vec!["e1".to_string(), "e2".to_string()],
            Some(CombinedEvent::new("a", "b")),
        );
        let ids: Vec<&str> = config.event_ids().collect();
        assert_eq!(ids, vec!["e1", "e2", "a", "b"]);
    }

    #[test]
    fn test_slot_labels_follow_policy() {
        let config = EventConfig::new(vec!["e1".to_string()], Some(CombinedEvent::new("a", "b")));
        assert_eq!(config.slot_labels(), vec!["e1", "a/b"]);

        let separate = config.with_policy(RankingPolicy::SeparateAlternates);
        assert_eq!(separate.slot_labels(), vec!["e1", "a", "b"]);
    }
}
