use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::policy::{apply_override, BaseTable, PointsPolicy};
use crate::error::{Result, ScoringError};

/// Point-allocation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Traditional,
    WinnerTakesMore,
    PScore,
    Custom,
    /// Points equal finishing rank; lowest total wins
    Online,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Traditional => "traditional",
            Algorithm::WinnerTakesMore => "winner_takes_more",
            Algorithm::PScore => "p_score",
            Algorithm::Custom => "custom",
            Algorithm::Online => "online",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Traditional => "Traditional",
            Algorithm::WinnerTakesMore => "Winner Takes More",
            Algorithm::PScore => "P-Score",
            Algorithm::Custom => "Custom",
            Algorithm::Online => "Online",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TraditionalParams {
    pub first_place_points: i64,
    /// Points lost per subsequent place
    pub step: i64,
}

impl Default for TraditionalParams {
    fn default() -> Self {
        Self {
            first_place_points: 100,
            step: 5,
        }
    }
}

/// Which finishers the P-score median is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianField {
    /// Boundary performance of the better half of the field
    #[default]
    TopHalf,
    /// Statistical median of every finisher
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct PScoreParams {
    pub allow_negatives: bool,
    pub median_field: MedianField,
}

impl Default for PScoreParams {
    fn default() -> Self {
        Self {
            allow_negatives: true,
            median_field: MedianField::TopHalf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseTemplate {
    #[default]
    Traditional,
    WinnerTakesMore,
}

/// A base table plus per-position overrides (1-based positions).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CustomTableConfig {
    #[serde(default)]
    pub base_template: BaseTemplate,
    #[serde(default)]
    pub overrides: BTreeMap<u32, i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakMethod {
    /// More 1st places, then more 2nd places, ...
    #[default]
    Countback,
    /// Better placement in one designated event
    HeadToHead,
    /// Leave ties standing
    #[serde(rename = "none")]
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TiebreakerConfig {
    #[serde(default)]
    pub primary: TiebreakMethod,
    #[serde(default)]
    pub secondary: Option<TiebreakMethod>,
    #[serde(default)]
    pub head_to_head_event_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DnfPolicy {
    #[default]
    LastPlace,
    Zero,
    WorstPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DnsPolicy {
    #[default]
    Zero,
    Exclude,
    WorstPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawnPolicy {
    #[default]
    Exclude,
    Zero,
}

/// Treatment of athletes who did not produce a normal result.
///
/// `dnf` also governs disqualified rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct StatusHandling {
    pub dnf: DnfPolicy,
    pub dns: DnsPolicy,
    pub withdrawn: WithdrawnPolicy,
    /// Count excluded athletes in the reported field size
    pub count_excluded_in_field: bool,
}

/// Competition scoring configuration.
///
/// Algorithm sub-objects are optional; the selected algorithm's defaults
/// apply when its sub-object is missing. `custom` has no defaults and
/// needs a `custom_table`.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   algorithm: custom
///   traditional:
///     first_place_points: 100
///     step: 5
///   custom_table:
///     base_template: traditional
///     overrides:
///       1: 150
///   tiebreaker:
///     primary: countback
///     secondary: head_to_head
///     head_to_head_event_id: final
///   status_handling:
///     dnf: last_place
///     dns: zero
///     withdrawn: exclude
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub algorithm: Algorithm,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traditional: Option<TraditionalParams>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_score: Option<PScoreParams>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_table: Option<CustomTableConfig>,

    #[serde(default)]
    pub tiebreaker: TiebreakerConfig,

    #[serde(default)]
    pub status_handling: StatusHandling,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Traditional,
            traditional: Some(TraditionalParams::default()),
            p_score: None,
            custom_table: None,
            tiebreaker: TiebreakerConfig::default(),
            status_handling: StatusHandling::default(),
        }
    }
}

impl ScoringConfig {
    /// The points policy this configuration selects.
    pub fn policy(&self) -> Result<PointsPolicy> {
        let policy = match self.algorithm {
            Algorithm::Traditional => PointsPolicy::Traditional(self.traditional.unwrap_or_default()),
            Algorithm::WinnerTakesMore => PointsPolicy::WinnerTakesMore,
            Algorithm::PScore => PointsPolicy::PScore(self.p_score.unwrap_or_default()),
            Algorithm::Online => PointsPolicy::Online,
            Algorithm::Custom => {
                let table = self.custom_table.as_ref().ok_or(ScoringError::MissingSubConfig {
                    algorithm: Algorithm::Custom,
                    field: "custom_table",
                })?;
                let base = match table.base_template {
                    BaseTemplate::Traditional => {
                        BaseTable::Traditional(self.traditional.unwrap_or_default())
                    }
                    BaseTemplate::WinnerTakesMore => BaseTable::WinnerTakesMore,
                };
                PointsPolicy::Custom {
                    base,
                    overrides: table.overrides.clone(),
                }
            }
        };
        Ok(policy)
    }

    /// Store `policy` back into the configuration fields.
    pub fn set_policy(&mut self, policy: PointsPolicy) {
        self.algorithm = policy.algorithm();
        match policy {
            PointsPolicy::Traditional(params) => {
                self.traditional = Some(params);
                self.custom_table = None;
            }
            PointsPolicy::WinnerTakesMore | PointsPolicy::Online => {
                self.custom_table = None;
            }
            PointsPolicy::PScore(params) => {
                self.p_score = Some(params);
                self.custom_table = None;
            }
            PointsPolicy::Custom { base, overrides } => {
                let base_template = match base {
                    BaseTable::Traditional(params) => {
                        self.traditional = Some(params);
                        BaseTemplate::Traditional
                    }
                    BaseTable::WinnerTakesMore => BaseTemplate::WinnerTakesMore,
                };
                self.custom_table = Some(CustomTableConfig {
                    base_template,
                    overrides,
                });
            }
        }
    }

    /// Select an algorithm, filling its defaults. Leaving `custom` drops the custom table.
    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
        match algorithm {
            Algorithm::Traditional => {
                self.traditional.get_or_insert_with(TraditionalParams::default);
            }
            Algorithm::PScore => {
                self.p_score.get_or_insert_with(PScoreParams::default);
            }
            Algorithm::Custom => {
                self.custom_table.get_or_insert_with(CustomTableConfig::default);
            }
            Algorithm::WinnerTakesMore | Algorithm::Online => {}
        }
        if algorithm != Algorithm::Custom {
            self.custom_table = None;
        }
    }

    /// Edit one position of the displayed points table.
    ///
    /// Editing a table algorithm switches to `custom` with the change recorded
    /// as an override; setting every position back to its base value returns
    /// to the base algorithm.
    pub fn set_point(&mut self, position: u32, points: i64) -> Result<()> {
        let next = apply_override(&self.policy()?, position, points)?;
        self.set_policy(next);
        Ok(())
    }

    /// Drop the override at `position`, if any.
    pub fn reset_point(&mut self, position: u32) -> Result<()> {
        let policy = self.policy()?;
        if let PointsPolicy::Custom { base, .. } = &policy {
            let base_value = base.points_at(position);
            let next = apply_override(&policy, position, base_value)?;
            self.set_policy(next);
        }
        Ok(())
    }

    /// Drop every override and return to the base algorithm.
    pub fn reset_points(&mut self) -> Result<()> {
        if let PointsPolicy::Custom { base, .. } = self.policy()? {
            self.set_policy(base.into_policy());
        }
        Ok(())
    }

    pub fn can_have_negative_scores(&self) -> bool {
        self.algorithm == Algorithm::PScore && self.p_score.unwrap_or_default().allow_negatives
    }
}
