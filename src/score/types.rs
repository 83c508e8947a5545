use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ScoringError};

/// Rounds-reps encodings pack rounds and reps into one integer: `rounds * 100000 + reps`.
pub const ROUNDS_MULTIPLIER: i64 = 100_000;

/// Unit/format family of a workout's performance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    Time,
    TimeWithCap,
    RoundsReps,
    Reps,
    Load,
    Calories,
    Meters,
    Feet,
    Points,
    Emom,
    PassFail,
}

impl Scheme {
    pub const ALL: [Scheme; 11] = [
        Scheme::Time,
        Scheme::TimeWithCap,
        Scheme::RoundsReps,
        Scheme::Reps,
        Scheme::Load,
        Scheme::Calories,
        Scheme::Meters,
        Scheme::Feet,
        Scheme::Points,
        Scheme::Emom,
        Scheme::PassFail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Time => "time",
            Scheme::TimeWithCap => "time-with-cap",
            Scheme::RoundsReps => "rounds-reps",
            Scheme::Reps => "reps",
            Scheme::Load => "load",
            Scheme::Calories => "calories",
            Scheme::Meters => "meters",
            Scheme::Feet => "feet",
            Scheme::Points => "points",
            Scheme::Emom => "emom",
            Scheme::PassFail => "pass-fail",
        }
    }

    /// Time schemes rank lower-is-better, everything else higher-is-better.
    pub fn default_score_type(&self) -> ScoreType {
        if self.is_time() {
            ScoreType::Min
        } else {
            ScoreType::Max
        }
    }

    pub fn is_time(&self) -> bool {
        matches!(self, Scheme::Time | Scheme::TimeWithCap)
    }

    /// Display suffix appended when a decoded value is rendered with its unit.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Scheme::Time | Scheme::TimeWithCap | Scheme::RoundsReps => None,
            Scheme::Reps => Some("reps"),
            Scheme::Load => Some("lbs"),
            Scheme::Calories => Some("cal"),
            Scheme::Meters => Some("m"),
            Scheme::Feet => Some("ft"),
            Scheme::Points => Some("pts"),
            Scheme::Emom => Some("rounds"),
            Scheme::PassFail => Some("passes"),
        }
    }

    /// Check that an already-encoded value is a legal encoding for this scheme.
    pub fn validate_encoded(&self, value: i64) -> Result<(), String> {
        if value < 0 {
            return Err(format!("{} value must be non-negative, got {}", self, value));
        }
        Ok(())
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Scheme::ALL
            .iter()
            .copied()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Scheme::ALL.iter().map(|s| s.as_str()).collect();
                ParseError::new(format!(
                    "unknown scheme '{}'. Expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Ranking direction of a scheme's encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    /// Lower encoded value wins
    Min,
    /// Higher encoded value wins
    Max,
}

/// Outcome tag of a single performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Scored,
    Cap,
    Dq,
    Withdrawn,
    Dns,
}

impl ScoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Scored => "scored",
            ScoreStatus::Cap => "cap",
            ScoreStatus::Dq => "dq",
            ScoreStatus::Withdrawn => "withdrawn",
            ScoreStatus::Dns => "dns",
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time cap details carried by a capped `time-with-cap` score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeCap {
    /// The cap itself, in milliseconds
    pub ms: i64,
    /// Work completed before the cap (usually reps); higher is better
    pub secondary_value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TiebreakScheme {
    Time,
    Reps,
}

impl TiebreakScheme {
    /// The primary scheme whose grammar and encoding this tiebreak shares.
    pub fn as_scheme(&self) -> Scheme {
        match self {
            TiebreakScheme::Time => Scheme::Time,
            TiebreakScheme::Reps => Scheme::Reps,
        }
    }
}

impl FromStr for TiebreakScheme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(TiebreakScheme::Time),
            "reps" => Ok(TiebreakScheme::Reps),
            other => Err(ParseError::new(format!(
                "unknown tiebreak scheme '{}'. Expected 'time' or 'reps'",
                other
            ))),
        }
    }
}

/// Secondary measurement of the same performance, used only to split exact ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Tiebreak {
    pub scheme: TiebreakScheme,
    pub value: i64,
}

/// One athlete's recorded performance in one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Score {
    pub scheme: Scheme,
    pub score_type: ScoreType,
    #[serde(default)]
    pub value: Option<i64>,
    pub status: ScoreStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cap: Option<TimeCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak: Option<Tiebreak>,
}

impl Score {
    /// A finished performance ranked by the scheme's default direction.
    pub fn scored(scheme: Scheme, value: i64) -> Self {
        Self {
            scheme,
            score_type: scheme.default_score_type(),
            value: Some(value),
            status: ScoreStatus::Scored,
            time_cap: None,
            tiebreak: None,
        }
    }

    /// A `time-with-cap` performance that hit the cap after `secondary_value` reps.
    pub fn capped(cap_ms: i64, secondary_value: i64) -> Self {
        Self {
            scheme: Scheme::TimeWithCap,
            score_type: ScoreType::Min,
            value: None,
            status: ScoreStatus::Cap,
            time_cap: Some(TimeCap {
                ms: cap_ms,
                secondary_value,
            }),
            tiebreak: None,
        }
    }

    /// A row without a numeric result (`dq`, `withdrawn` or `dns`).
    pub fn unscored(scheme: Scheme, status: ScoreStatus) -> Self {
        Self {
            scheme,
            score_type: scheme.default_score_type(),
            value: None,
            status,
            time_cap: None,
            tiebreak: None,
        }
    }

    pub fn with_tiebreak(mut self, scheme: TiebreakScheme, value: i64) -> Self {
        self.tiebreak = Some(Tiebreak { scheme, value });
        self
    }

    pub fn with_score_type(mut self, score_type: ScoreType) -> Self {
        self.score_type = score_type;
        self
    }

    /// Whether this score takes part in value-based ranking.
    pub fn is_ranked(&self) -> bool {
        matches!(self.status, ScoreStatus::Scored | ScoreStatus::Cap)
    }

    /// Check the structural invariants every ranked or displayed score must satisfy.
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.check().map_err(ScoringError::InvalidScore)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        match self.status {
            ScoreStatus::Scored => {
                if self.value.is_none() {
                    return Err("scored status requires a value".to_string());
                }
            }
            ScoreStatus::Cap => {
                if self.scheme != Scheme::TimeWithCap {
                    return Err(format!(
                        "cap status is only valid for time-with-cap, not {}",
                        self.scheme
                    ));
                }
                if self.value.is_some() {
                    return Err("cap status must not carry a value".to_string());
                }
                if self.time_cap.is_none() {
                    return Err("cap status requires time_cap".to_string());
                }
            }
            ScoreStatus::Dq | ScoreStatus::Withdrawn => {
                if self.value.is_some() {
                    return Err(format!("{} status must not carry a value", self.status));
                }
            }
            // dns may carry a value substituted by status handling
            ScoreStatus::Dns => {}
        }

        if self.status != ScoreStatus::Cap && self.time_cap.is_some() {
            return Err(format!("time_cap is only valid with cap status, not {}", self.status));
        }

        if let Some(value) = self.value {
            self.scheme.validate_encoded(value)?;
        }

        if let Some(cap) = self.time_cap {
            if cap.ms < 0 {
                return Err(format!("time_cap.ms must be non-negative, got {}", cap.ms));
            }
            if cap.secondary_value < 0 {
                return Err(format!(
                    "time_cap.secondary_value must be non-negative, got {}",
                    cap.secondary_value
                ));
            }
        }

        if let Some(tiebreak) = self.tiebreak {
            tiebreak
                .scheme
                .as_scheme()
                .validate_encoded(tiebreak.value)
                .map_err(|e| format!("tiebreak: {}", e))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_score_type() {
        assert_eq!(Scheme::Time.default_score_type(), ScoreType::Min);
        assert_eq!(Scheme::TimeWithCap.default_score_type(), ScoreType::Min);
        for scheme in Scheme::ALL.iter().filter(|s| !s.is_time()) {
            assert_eq!(scheme.default_score_type(), ScoreType::Max, "{}", scheme);
        }
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("time-with-cap".parse::<Scheme>().unwrap(), Scheme::TimeWithCap);
        assert_eq!(" Rounds-Reps ".parse::<Scheme>().unwrap(), Scheme::RoundsReps);
        let err = "sprint".parse::<Scheme>().unwrap_err();
        assert!(err.message.contains("unknown scheme 'sprint'"));
    }

    #[test]
    fn test_scheme_serde_names() {
        let yaml = serde_saphyr::to_string(&Scheme::PassFail).unwrap();
        assert!(yaml.contains("pass-fail"));
        let parsed: Scheme = serde_saphyr::from_str("rounds-reps").unwrap();
        assert_eq!(parsed, Scheme::RoundsReps);
    }

    #[test]
    fn test_valid_scores() {
        assert!(Score::scored(Scheme::Time, 754_000).validate().is_ok());
        assert!(Score::capped(1_200_000, 142).validate().is_ok());
        assert!(Score::unscored(Scheme::Reps, ScoreStatus::Dq).validate().is_ok());
        assert!(Score::unscored(Scheme::Reps, ScoreStatus::Dns).validate().is_ok());
        assert!(Score::scored(Scheme::RoundsReps, 500_012)
            .with_tiebreak(TiebreakScheme::Time, 510_000)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_cap_without_time_cap_rejected() {
        let mut score = Score::capped(1_200_000, 10);
        score.time_cap = None;
        assert!(score.validate().is_err());
    }

    #[test]
    fn test_cap_on_untimed_scheme_rejected() {
        let mut score = Score::capped(1_200_000, 10);
        score.scheme = Scheme::Reps;
        assert!(score.validate().is_err());
    }

    #[test]
    fn test_time_cap_on_scored_rejected() {
        let mut score = Score::scored(Scheme::TimeWithCap, 600_000);
        score.time_cap = Some(TimeCap {
            ms: 1_200_000,
            secondary_value: 0,
        });
        assert!(score.validate().is_err());
    }

    #[test]
    fn test_value_on_dq_rejected() {
        let mut score = Score::unscored(Scheme::Time, ScoreStatus::Dq);
        score.value = Some(1000);
        assert!(score.validate().is_err());
    }

    #[test]
    fn test_scored_without_value_rejected() {
        let mut score = Score::scored(Scheme::Reps, 10);
        score.value = None;
        assert!(score.validate().is_err());
    }

    #[test]
    fn test_negative_time_rejected() {
        let err = Score::scored(Scheme::Time, -1).validate().unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_negative_secondary_rejected() {
        assert!(Score::capped(1_200_000, -3).validate().is_err());
    }

    #[test]
    fn test_invalid_tiebreak_rejected() {
        let score = Score::scored(Scheme::Reps, 10).with_tiebreak(TiebreakScheme::Reps, -2);
        let err = score.validate().unwrap_err();
        assert!(err.to_string().contains("tiebreak"));
    }

    #[test]
    fn test_dns_with_substituted_value_is_valid() {
        let mut score = Score::unscored(Scheme::Reps, ScoreStatus::Dns);
        score.value = Some(0);
        assert!(score.validate().is_ok());
    }

    #[test]
    fn test_score_yaml_roundtrip() {
        let score = Score::capped(1_200_000, 150).with_tiebreak(TiebreakScheme::Time, 510_000);
        let yaml = serde_saphyr::to_string(&score).unwrap();
        let parsed: Score = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(score, parsed);
    }
}
