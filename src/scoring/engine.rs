use serde::Serialize;
use tracing::debug;

use super::config::{PScoreParams, ScoringConfig};
use super::policy::PointsPolicy;
use super::pscore::PScoreCurve;
use super::status::{resolve_statuses, Resolved, Treatment};
use super::validation::validate_scoring;
use crate::error::{Result, ScoringError};
use crate::score::{assign_ranks, sort_indices, Score, ScoreStatus};

/// One athlete's result in one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEntry {
    pub athlete_id: String,
    pub score: Score,
}

impl EventEntry {
    pub fn new(athlete_id: impl Into<String>, score: Score) -> Self {
        Self {
            athlete_id: athlete_id.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPlacement {
    pub athlete_id: String,
    pub rank: u32,
    pub points: f64,
    pub treatment: Treatment,
    /// The score as recorded, before status handling
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventResult {
    /// Best first; rows below the ranked field follow in entry order
    pub placements: Vec<EventPlacement>,
    pub excluded: Vec<String>,
    pub field_size: usize,
}

/// Rank one event and award points under `config`.
///
/// Fails when the configuration is invalid, when any score breaks its
/// invariants, or when entries mix schemes.
pub fn calculate_event_points(entries: &[EventEntry], config: &ScoringConfig) -> Result<EventResult> {
    if let Err(errors) = validate_scoring(config) {
        return Err(ScoringError::InvalidConfig(errors.join("; ")));
    }
    let policy = config.policy()?;
    validate_entries(entries)?;

    debug!(
        algorithm = %policy.algorithm(),
        athletes = entries.len(),
        "Calculating event points"
    );

    let scores: Vec<Score> = entries.iter().map(|e| e.score.clone()).collect();
    let rank_caps = !matches!(policy, PointsPolicy::PScore(_));
    let resolved = resolve_statuses(&scores, &config.status_handling, rank_caps)?;

    // Ranked pass over real and synthesized results
    let ranked: Vec<(usize, Score)> = resolved
        .iter()
        .enumerate()
        .filter_map(|(i, row)| row.effective.clone().map(|score| (i, score)))
        .collect();
    let ranked_scores: Vec<Score> = ranked.iter().map(|(_, s)| s.clone()).collect();
    let order = sort_indices(&ranked_scores)?;
    let sorted: Vec<Score> = order.iter().map(|&i| ranked_scores[i].clone()).collect();
    let ranks = assign_ranks(&sorted);

    // A row without a tiebreak can sit after a row it ties but that ranks lower
    let mut by_rank: Vec<usize> = (0..sorted.len()).collect();
    by_rank.sort_by_key(|&pos| ranks[pos]);

    let excluded: Vec<String> = resolved
        .iter()
        .zip(entries)
        .filter(|(row, _)| row.treatment == Treatment::Excluded)
        .map(|(_, entry)| entry.athlete_id.clone())
        .collect();
    let field_size = if config.status_handling.count_excluded_in_field {
        entries.len()
    } else {
        entries.len() - excluded.len()
    };
    let trailing_rank = sorted.len() as u32 + 1;

    let allocator = Allocator::new(&policy, &resolved, field_size);

    let mut placements = Vec::with_capacity(entries.len());
    for pos in by_rank {
        let entry_index = ranked[order[pos]].0;
        let rank = ranks[pos];
        placements.push(EventPlacement {
            athlete_id: entries[entry_index].athlete_id.clone(),
            rank,
            points: allocator.ranked(rank, &sorted[pos]),
            treatment: resolved[entry_index].treatment,
            score: entries[entry_index].score.clone(),
        });
    }

    for (row, entry) in resolved.iter().zip(entries) {
        let points = match row.treatment {
            Treatment::LastPlace => allocator.last_place(trailing_rank),
            Treatment::Zero => allocator.zero(),
            _ => continue,
        };
        placements.push(EventPlacement {
            athlete_id: entry.athlete_id.clone(),
            rank: trailing_rank,
            points,
            treatment: row.treatment,
            score: entry.score.clone(),
        });
    }

    if !excluded.is_empty() {
        debug!(count = excluded.len(), "Excluded athletes from event");
    }

    Ok(EventResult {
        placements,
        excluded,
        field_size,
    })
}

fn validate_entries(entries: &[EventEntry]) -> Result<()> {
    let Some(first) = entries.first() else {
        return Ok(());
    };
    for (index, entry) in entries.iter().enumerate() {
        entry
            .score
            .check()
            .map_err(|reason| ScoringError::InvalidScoreAt { index, reason })?;
        if entry.score.scheme != first.score.scheme {
            return Err(ScoringError::SchemeMismatch {
                expected: first.score.scheme,
                found: entry.score.scheme,
                index,
            });
        }
    }
    Ok(())
}

/// Points source for one event.
enum Allocator<'a> {
    Table(&'a PointsPolicy),
    Online { field_size: usize },
    PScore {
        curve: Option<PScoreCurve>,
        params: PScoreParams,
        lowest: f64,
    },
}

impl<'a> Allocator<'a> {
    fn new(policy: &'a PointsPolicy, resolved: &[Resolved], field_size: usize) -> Self {
        match policy {
            PointsPolicy::Online => Allocator::Online { field_size },
            PointsPolicy::PScore(params) => {
                // Synthesized rows are scored by the curve but never shape it
                let finishers: Vec<&Score> = resolved
                    .iter()
                    .filter(|row| row.treatment == Treatment::Ranked)
                    .filter_map(|row| row.effective.as_ref())
                    .filter(|score| score.status == ScoreStatus::Scored)
                    .collect();
                let values: Vec<i64> = finishers.iter().filter_map(|s| s.value).collect();
                let curve = finishers
                    .first()
                    .and_then(|s| PScoreCurve::fit(&values, s.score_type, params.median_field));
                let lowest = match &curve {
                    Some(curve) => values
                        .iter()
                        .map(|v| curve.points(*v, params))
                        .fold(f64::INFINITY, f64::min),
                    None => 0.0,
                };
                Allocator::PScore {
                    curve,
                    params: *params,
                    lowest,
                }
            }
            _ => Allocator::Table(policy),
        }
    }

    fn ranked(&self, rank: u32, score: &Score) -> f64 {
        match self {
            Allocator::Table(policy) => policy.points_for_position(rank).unwrap_or(0) as f64,
            Allocator::Online { .. } => rank as f64,
            Allocator::PScore { curve, params, .. } => match (curve, score.value) {
                (Some(curve), Some(value)) => curve.points(value, params),
                _ => 0.0,
            },
        }
    }

    fn last_place(&self, rank: u32) -> f64 {
        match self {
            Allocator::Table(policy) => policy.points_for_position(rank).unwrap_or(0) as f64,
            Allocator::Online { .. } => rank as f64,
            Allocator::PScore { lowest, .. } => *lowest,
        }
    }

    fn zero(&self) -> f64 {
        match self {
            // One past the field, since lower totals win online
            Allocator::Online { field_size } => (*field_size + 1) as f64,
            _ => 0.0,
        }
    }
}
