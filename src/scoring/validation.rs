use std::collections::HashSet;

use super::config::EventConfig;
use super::normalize::validate_penalty_offset;

/// Validate event configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_events(config: &EventConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_penalty_offset(config.penalty_offset) {
        errors.push(format!("events.penalty_offset: {}", e));
    }

    if config.solo.is_empty() && config.combined.is_none() {
        errors.push("events: no solo or combined events configured".to_string());
    }

    let mut seen = HashSet::new();
    for (i, id) in config.solo.iter().enumerate() {
        if id.trim().is_empty() {
            errors.push(format!("events.solo[{}]: empty event id", i));
        } else if !seen.insert(id.as_str()) {
            errors.push(format!("events.solo[{}]: duplicate event id '{}'", i, id));
        }
    }

    if let Some(ref combined) = config.combined {
        if let Some(ref label) = combined.label {
            if label.trim().is_empty() {
                errors.push("events.combined.label: must not be empty".to_string());
            }
        }

        // Slot labels share one namespace with event ids in lookups and exports
        let label = combined.label();
        if config.event_ids().any(|id| id == label) {
            errors.push(format!(
                "events.combined.label: '{}' collides with an event id",
                label
            ));
        }

        let [first, second] = &combined.alternates;
        if first == second {
            errors.push(format!(
                "events.combined.alternates: both alternates are '{}'",
                first
            ));
        }
        for (i, id) in combined.alternates.iter().enumerate() {
            if id.trim().is_empty() {
                errors.push(format!("events.combined.alternates[{}]: empty event id", i));
            } else if config.solo.contains(id) {
                errors.push(format!(
                    "events.combined.alternates[{}]: '{}' is also a solo event",
                    i, id
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{CombinedEvent, RankingPolicy};

    fn solo(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_config() {
        let config = EventConfig::new(solo(&["e1", "e2"]), Some(CombinedEvent::new("a", "b")));
        assert!(validate_events(&config).is_ok());
    }

    #[test]
    fn test_combined_only_is_valid() {
        let config = EventConfig::new(vec![], Some(CombinedEvent::new("a", "b")));
        assert!(validate_events(&config).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let errors = validate_events(&EventConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no solo or combined"));
    }

    #[test]
    fn test_offset_out_of_range() {
        let mut config = EventConfig::new(solo(&["e1"]), None);
        config.penalty_offset = 150;
        let errors = validate_events(&config).unwrap_err();
        assert!(errors[0].contains("events.penalty_offset"));

        config.penalty_offset = 0;
        assert!(validate_events(&config).is_err());
    }

    #[test]
    fn test_duplicate_solo() {
        let config = EventConfig::new(solo(&["e1", "e1"]), None);
        let errors = validate_events(&config).unwrap_err();
        assert!(errors[0].contains("events.solo[1]"));
    }

    #[test]
    fn test_empty_solo_id() {
        let config = EventConfig::new(solo(&["e1", " "]), None);
        let errors = validate_events(&config).unwrap_err();
        assert!(errors[0].contains("empty event id"));
    }

    #[test]
    fn test_identical_alternates() {
        let config = EventConfig::new(solo(&["e1"]), Some(CombinedEvent::new("a", "a")));
        let errors = validate_events(&config).unwrap_err();
        assert!(errors[0].contains("events.combined.alternates"));
    }

    #[test]
    fn test_alternate_shared_with_solo() {
        let config = EventConfig::new(solo(&["e1", "a"]), Some(CombinedEvent::new("a", "b")));
        let errors = validate_events(&config).unwrap_err();
        assert!(errors[0].contains("also a solo event"));
    }

    #[test]
    fn test_label_colliding_with_solo() {
        let mut combined = CombinedEvent::new("a", "b");
        combined.label = Some("e1".to_string());
        let config = EventConfig::new(solo(&["e1", "e2"]), Some(combined));
        let errors = validate_events(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("events.combined.label: 'e1' collides"));
    }

    #[test]
    fn test_label_colliding_with_alternate() {
        let mut combined = CombinedEvent::new("a", "b");
        combined.label = Some("b".to_string());
        let config = EventConfig::new(solo(&["e1"]), Some(combined))
            .with_policy(RankingPolicy::SeparateAlternates);
        let errors = validate_events(&config).unwrap_err();
        assert!(errors[0].contains("collides with an event id"));
    }

    #[test]
    fn test_default_label_cannot_collide_with_distinct_ids() {
        let config = EventConfig::new(solo(&["a/c"]), Some(CombinedEvent::new("a", "b")));
        assert!(validate_events(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = EventConfig::new(solo(&["e1", "e1"]), Some(CombinedEvent::new("x", "x")));
        config.penalty_offset = -1;
        let errors = validate_events(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
