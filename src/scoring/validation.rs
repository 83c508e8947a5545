use super::config::{Algorithm, ScoringConfig, TiebreakMethod};

/// Validate scoring configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref params) = config.traditional {
        if params.step < 0 {
            errors.push(format!(
                "scoring.traditional.step: must be non-negative, got {}",
                params.step
            ));
        }
        if params.first_place_points <= 0 {
            errors.push(format!(
                "scoring.traditional.first_place_points: must be greater than zero, got {}",
                params.first_place_points
            ));
        }
    }

    if config.algorithm == Algorithm::Custom && config.custom_table.is_none() {
        errors.push("scoring.custom_table: required when algorithm is custom".to_string());
    }

    if let Some(ref table) = config.custom_table {
        for (position, points) in &table.overrides {
            if *position == 0 {
                errors.push("scoring.custom_table.overrides[0]: positions start at 1".to_string());
            }
            if *points < 0 {
                errors.push(format!(
                    "scoring.custom_table.overrides[{}]: points must be non-negative, got {}",
                    position, points
                ));
            }
        }
    }

    let tiebreaker = &config.tiebreaker;
    if tiebreaker.secondary == Some(tiebreaker.primary) && tiebreaker.primary != TiebreakMethod::Disabled {
        errors.push("scoring.tiebreaker.secondary: must differ from primary".to_string());
    }
    let uses_head_to_head = tiebreaker.primary == TiebreakMethod::HeadToHead
        || tiebreaker.secondary == Some(TiebreakMethod::HeadToHead);
    let has_event = tiebreaker
        .head_to_head_event_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    if uses_head_to_head && !has_event {
        errors.push(
            "scoring.tiebreaker.head_to_head_event_id: required for head_to_head tiebreaker"
                .to_string(),
        );
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
    use crate::scoring::{CustomTableConfig, TraditionalParams};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_step() {
        let config = ScoringConfig {
            traditional: Some(TraditionalParams {
                first_place_points: 100,
                step: -1,
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.traditional.step"));
    }

    #[test]
    fn test_zero_first_place_points() {
        let config = ScoringConfig {
            traditional: Some(TraditionalParams {
                first_place_points: 0,
                step: 5,
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("first_place_points"));
    }

    #[test]
    fn test_custom_requires_table() {
        let config = ScoringConfig {
            algorithm: Algorithm::Custom,
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.custom_table"));
    }

    #[test]
    fn test_bad_overrides() {
        let mut table = CustomTableConfig::default();
        table.overrides.insert(0, 10);
        table.overrides.insert(2, -4);
        let config = ScoringConfig {
            algorithm: Algorithm::Custom,
            custom_table: Some(table),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("overrides[0]"));
        assert!(errors[1].contains("overrides[2]"));
    }

    #[test]
    fn test_head_to_head_requires_event() {
        let mut config = ScoringConfig::default();
        config.tiebreaker.secondary = Some(TiebreakMethod::HeadToHead);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("head_to_head_event_id"));

        config.tiebreaker.head_to_head_event_id = Some("final".to_string());
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_secondary_must_differ() {
        let mut config = ScoringConfig::default();
        config.tiebreaker.secondary = Some(TiebreakMethod::Countback);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.tiebreaker.secondary"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig {
            algorithm: Algorithm::Custom,
            traditional: Some(TraditionalParams {
                first_place_points: -1,
                step: -1,
            }),
            ..ScoringConfig::default()
        };
        config.tiebreaker.primary = TiebreakMethod::HeadToHead;
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
