use std::collections::BTreeMap;

use super::config::{Algorithm, BaseTemplate, PScoreParams, TraditionalParams};
use super::points::{generate_points_table, traditional_points, winner_takes_more_points};
use crate::error::{Result, ScoringError};

/// Table a custom policy is a diff of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTable {
    Traditional(TraditionalParams),
    WinnerTakesMore,
}

impl BaseTable {
    /// Points for a 1-based position.
    pub fn points_at(&self, position: u32) -> i64 {
        match self {
            BaseTable::Traditional(params) => traditional_points(position, params),
            BaseTable::WinnerTakesMore => winner_takes_more_points(position),
        }
    }

    pub fn template(&self) -> BaseTemplate {
        match self {
            BaseTable::Traditional(_) => BaseTemplate::Traditional,
            BaseTable::WinnerTakesMore => BaseTemplate::WinnerTakesMore,
        }
    }

    pub fn into_policy(self) -> PointsPolicy {
        match self {
            BaseTable::Traditional(params) => PointsPolicy::Traditional(params),
            BaseTable::WinnerTakesMore => PointsPolicy::WinnerTakesMore,
        }
    }
}

/// Resolved point-allocation policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointsPolicy {
    Traditional(TraditionalParams),
    WinnerTakesMore,
    PScore(PScoreParams),
    Online,
    Custom {
        base: BaseTable,
        overrides: BTreeMap<u32, i64>,
    },
}

impl PointsPolicy {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            PointsPolicy::Traditional(_) => Algorithm::Traditional,
            PointsPolicy::WinnerTakesMore => Algorithm::WinnerTakesMore,
            PointsPolicy::PScore(_) => Algorithm::PScore,
            PointsPolicy::Online => Algorithm::Online,
            PointsPolicy::Custom { .. } => Algorithm::Custom,
        }
    }

    /// The table this policy displays, if it is table driven.
    pub fn base_table(&self) -> Option<BaseTable> {
        match self {
            PointsPolicy::Traditional(params) => Some(BaseTable::Traditional(*params)),
            PointsPolicy::WinnerTakesMore => Some(BaseTable::WinnerTakesMore),
            PointsPolicy::Custom { base, .. } => Some(*base),
            PointsPolicy::PScore(_) | PointsPolicy::Online => None,
        }
    }

    /// Table points for a 1-based position; `None` for algorithms that are not table driven.
    pub fn points_for_position(&self, position: u32) -> Option<i64> {
        if position == 0 {
            return None;
        }
        match self {
            PointsPolicy::Custom { base, overrides } => Some(
                overrides
                    .get(&position)
                    .copied()
                    .unwrap_or_else(|| base.points_at(position)),
            ),
            _ => self.base_table().map(|base| base.points_at(position)),
        }
    }

    /// The first `len` positions of the points table.
    pub fn table(&self, len: usize) -> Option<Vec<i64>> {
        match self {
            PointsPolicy::Traditional(params) => {
                Some(generate_points_table(BaseTemplate::Traditional, len, Some(params)))
            }
            PointsPolicy::WinnerTakesMore => {
                Some(generate_points_table(BaseTemplate::WinnerTakesMore, len, None))
            }
            PointsPolicy::Custom { .. } => (1..=len as u32)
                .map(|position| self.points_for_position(position))
                .collect(),
            PointsPolicy::PScore(_) | PointsPolicy::Online => None,
        }
    }
}

/// Set the points for one table position.
///
/// A value differing from the base table is recorded as an override and the
/// policy becomes `Custom`. A value equal to the base removes the override;
/// when none remain the policy reverts to its base algorithm.
pub fn apply_override(policy: &PointsPolicy, position: u32, value: i64) -> Result<PointsPolicy> {
    if position == 0 {
        return Err(ScoringError::InvalidPosition(position));
    }
    if value < 0 {
        return Err(ScoringError::InvalidConfig(format!(
            "points for position {} must be non-negative, got {}",
            position, value
        )));
    }

    let base = policy
        .base_table()
        .ok_or_else(|| ScoringError::NotTableDriven(policy.algorithm()))?;

    let mut overrides = match policy {
        PointsPolicy::Custom { overrides, .. } => overrides.clone(),
        _ => BTreeMap::new(),
    };

    if value == base.points_at(position) {
        overrides.remove(&position);
    } else {
        overrides.insert(position, value);
    }

    if overrides.is_empty() {
        Ok(base.into_policy())
    } else {
        Ok(PointsPolicy::Custom { base, overrides })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traditional() -> PointsPolicy {
        PointsPolicy::Traditional(TraditionalParams::default())
    }

    #[test]
    fn test_override_enters_custom() {
        let policy = apply_override(&traditional(), 3, 92).unwrap();
        let PointsPolicy::Custom { base, overrides } = &policy else {
            panic!("expected custom policy, got {:?}", policy);
        };
        assert_eq!(*base, BaseTable::Traditional(TraditionalParams::default()));
        assert_eq!(overrides.len(), 1);
        assert_eq!(policy.points_for_position(3), Some(92));
        assert_eq!(policy.points_for_position(2), Some(95));
    }

    #[test]
    fn test_override_equal_to_base_is_noop() {
        let policy = apply_override(&traditional(), 3, 90).unwrap();
        assert_eq!(policy, traditional());
    }

    #[test]
    fn test_override_round_trip_reverts() {
        let custom = apply_override(&PointsPolicy::WinnerTakesMore, 2, 90).unwrap();
        assert_eq!(custom.algorithm(), Algorithm::Custom);
        let reverted = apply_override(&custom, 2, 85).unwrap();
        assert_eq!(reverted, PointsPolicy::WinnerTakesMore);
    }

    #[test]
    fn test_removing_one_of_many_overrides_stays_custom() {
        let policy = apply_override(&traditional(), 1, 120).unwrap();
        let policy = apply_override(&policy, 2, 110).unwrap();
        let policy = apply_override(&policy, 1, 100).unwrap();
        assert_eq!(policy.algorithm(), Algorithm::Custom);
        assert_eq!(policy.points_for_position(1), Some(100));
        assert_eq!(policy.points_for_position(2), Some(110));
    }

    #[test]
    fn test_override_replaces_previous_override() {
        let policy = apply_override(&traditional(), 1, 120).unwrap();
        let policy = apply_override(&policy, 1, 130).unwrap();
        assert_eq!(policy.points_for_position(1), Some(130));
    }

    #[test]
    fn test_override_position_zero() {
        assert_eq!(
            apply_override(&traditional(), 0, 10),
            Err(ScoringError::InvalidPosition(0))
        );
    }

    #[test]
    fn test_override_negative_points() {
        assert!(matches!(
            apply_override(&traditional(), 1, -5),
            Err(ScoringError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_override_not_table_driven() {
        assert_eq!(
            apply_override(&PointsPolicy::Online, 1, 10),
            Err(ScoringError::NotTableDriven(Algorithm::Online))
        );
        assert_eq!(
            apply_override(&PointsPolicy::PScore(PScoreParams::default()), 1, 10),
            Err(ScoringError::NotTableDriven(Algorithm::PScore))
        );
    }

    #[test]
    fn test_override_beyond_base_table() {
        let policy = apply_override(&PointsPolicy::WinnerTakesMore, 35, 1).unwrap();
        assert_eq!(policy.points_for_position(35), Some(1));
        assert_eq!(policy.points_for_position(34), Some(0));
    }

    #[test]
    fn test_custom_table() {
        let policy = apply_override(&traditional(), 2, 97).unwrap();
        assert_eq!(policy.table(4), Some(vec![100, 97, 90, 85]));
        assert_eq!(PointsPolicy::Online.table(4), None);
    }

    #[test]
    fn test_points_for_position_zero() {
        assert_eq!(traditional().points_for_position(0), None);
    }
}
