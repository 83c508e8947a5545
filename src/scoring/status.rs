use serde::Serialize;
use tracing::debug;

use super::config::{DnfPolicy, DnsPolicy, StatusHandling, WithdrawnPolicy};
use crate::error::Result;
use crate::score::{sort_indices, Score, ScoreStatus, ScoreType};

/// How a row takes part in an event once status handling has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Treatment {
    /// Ranked on its own result
    Ranked,
    /// Ranked on a synthesized result just below the worst finisher
    WorstPerformance,
    /// Placed one position below the ranked field
    LastPlace,
    /// Placed below the ranked field with no points
    Zero,
    /// Removed from the event
    Excluded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub treatment: Treatment,
    /// Score the row is ranked on; `None` for rows that are not ranked
    pub effective: Option<Score>,
}

impl Resolved {
    fn ranked(score: Score) -> Self {
        Self {
            treatment: Treatment::Ranked,
            effective: Some(score),
        }
    }

    fn fixed(treatment: Treatment) -> Self {
        Self {
            treatment,
            effective: None,
        }
    }
}

/// Rewrite every non-standard result into the form the ranking pass understands.
///
/// `rank_caps` decides whether capped rows are ranked on their reps or handed
/// to the `dnf` policy. Disqualified rows follow the `dnf` policy. Scores must
/// already be valid.
pub fn resolve_statuses(
    scores: &[Score],
    handling: &StatusHandling,
    rank_caps: bool,
) -> Result<Vec<Resolved>> {
    let mut resolved = Vec::with_capacity(scores.len());
    let mut wants_worst = Vec::new();

    for (index, score) in scores.iter().enumerate() {
        let row = match score.status {
            ScoreStatus::Scored => Resolved::ranked(score.clone()),
            ScoreStatus::Cap if rank_caps => Resolved::ranked(score.clone()),
            ScoreStatus::Dns if score.value.is_some() => Resolved::ranked(Score {
                status: ScoreStatus::Scored,
                ..score.clone()
            }),
            ScoreStatus::Cap | ScoreStatus::Dq => match handling.dnf {
                DnfPolicy::LastPlace => Resolved::fixed(Treatment::LastPlace),
                DnfPolicy::Zero => Resolved::fixed(Treatment::Zero),
                DnfPolicy::WorstPerformance => {
                    wants_worst.push(index);
                    Resolved::fixed(Treatment::WorstPerformance)
                }
            },
            ScoreStatus::Dns => match handling.dns {
                DnsPolicy::Zero => Resolved::fixed(Treatment::Zero),
                DnsPolicy::Exclude => Resolved::fixed(Treatment::Excluded),
                DnsPolicy::WorstPerformance => {
                    wants_worst.push(index);
                    Resolved::fixed(Treatment::WorstPerformance)
                }
            },
            ScoreStatus::Withdrawn => match handling.withdrawn {
                WithdrawnPolicy::Exclude => Resolved::fixed(Treatment::Excluded),
                WithdrawnPolicy::Zero => Resolved::fixed(Treatment::Zero),
            },
        };
        resolved.push(row);
    }

    if wants_worst.is_empty() {
        return Ok(resolved);
    }

    let finishers: Vec<Score> = resolved
        .iter()
        .filter_map(|row| row.effective.clone())
        .collect();
    let worst = sort_indices(&finishers)?
        .last()
        .and_then(|&i| synthesize_worse(&finishers[i]));

    for index in wants_worst {
        match &worst {
            Some(score) => {
                debug!(index, status = %scores[index].status, "Substituting worst performance");
                resolved[index].effective = Some(score.clone());
            }
            None => {
                debug!(index, "No strictly worse result exists; falling back to last place");
                resolved[index].treatment = Treatment::LastPlace;
            }
        }
    }

    Ok(resolved)
}

/// A result strictly worse than `score`: one second slower, one unit fewer,
/// or one rep fewer under the cap. `None` when no valid worse value exists.
pub fn synthesize_worse(score: &Score) -> Option<Score> {
    match score.status {
        ScoreStatus::Scored => {
            let value = score.value?;
            let step = if score.scheme.is_time() { 1000 } else { 1 };
            let worse = match score.score_type {
                ScoreType::Min => value.checked_add(step)?,
                ScoreType::Max => value.checked_sub(step).filter(|v| *v >= 0)?,
            };
            Some(Score {
                scheme: score.scheme,
                score_type: score.score_type,
                value: Some(worse),
                status: ScoreStatus::Scored,
                time_cap: None,
                tiebreak: None,
            })
        }
        ScoreStatus::Cap => {
            let cap = score.time_cap?;
            let reps = cap.secondary_value.checked_sub(1).filter(|v| *v >= 0)?;
            Some(Score::capped(cap.ms, reps))
        }
        ScoreStatus::Dq | ScoreStatus::Withdrawn | ScoreStatus::Dns => None,
    }
}
