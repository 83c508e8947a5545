use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use super::config::{Algorithm, ScoringConfig, TiebreakMethod, TiebreakerConfig};
use super::engine::EventResult;
use crate::error::{Result, ScoringError};

/// An athlete's competition total with their placement in each event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteTotals {
    pub athlete_id: String,
    pub total_points: f64,
    /// Event id to finishing rank
    pub event_placements: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub rank: u32,
    pub athlete_id: String,
    pub total_points: f64,
    pub event_placements: BTreeMap<String, u32>,
}

/// Sum per-event points into totals and rank the competition.
///
/// Athletes appear in first-seen order before ranking; excluded rows add
/// neither points nor a placement.
pub fn compute_standings(events: &[(String, EventResult)], config: &ScoringConfig) -> Result<Vec<Standing>> {
    let mut totals: Vec<AthleteTotals> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for (event_id, result) in events {
        for placement in &result.placements {
            let slot = *index.entry(placement.athlete_id.clone()).or_insert_with(|| {
                totals.push(AthleteTotals {
                    athlete_id: placement.athlete_id.clone(),
                    total_points: 0.0,
                    event_placements: BTreeMap::new(),
                });
                totals.len() - 1
            });
            let athlete = &mut totals[slot];
            athlete.total_points += placement.points;
            athlete
                .event_placements
                .insert(event_id.clone(), placement.rank);
        }
    }

    debug!(
        events = events.len(),
        athletes = totals.len(),
        "Computing standings"
    );

    let lower_total_wins = config.algorithm == Algorithm::Online;
    apply_tiebreakers(totals, &config.tiebreaker, lower_total_wins)
}

/// Rank athletes by total points with competition ranking (1, 1, 3),
/// breaking equal totals with the primary then secondary method.
///
/// Athletes still tied share a rank and keep their input order.
pub fn apply_tiebreakers(
    athletes: Vec<AthleteTotals>,
    config: &TiebreakerConfig,
    lower_total_wins: bool,
) -> Result<Vec<Standing>> {
    let uses_head_to_head = config.primary == TiebreakMethod::HeadToHead
        || config.secondary == Some(TiebreakMethod::HeadToHead);
    if uses_head_to_head && config.head_to_head_event_id.is_none() {
        return Err(ScoringError::MissingHeadToHeadEvent);
    }

    let mut athletes = athletes;
    athletes.sort_by(|a, b| compare_athletes(a, b, config, lower_total_wins));

    let mut standings: Vec<Standing> = Vec::with_capacity(athletes.len());
    for (i, athlete) in athletes.iter().enumerate() {
        let tied = i > 0
            && compare_athletes(&athletes[i - 1], athlete, config, lower_total_wins)
                == Ordering::Equal;
        let rank = match standings.last() {
            Some(prev) if tied => prev.rank,
            _ => i as u32 + 1,
        };
        standings.push(Standing {
            rank,
            athlete_id: athlete.athlete_id.clone(),
            total_points: athlete.total_points,
            event_placements: athlete.event_placements.clone(),
        });
    }
    Ok(standings)
}

fn compare_athletes(
    a: &AthleteTotals,
    b: &AthleteTotals,
    config: &TiebreakerConfig,
    lower_total_wins: bool,
) -> Ordering {
    let by_total = if lower_total_wins {
        cents(a.total_points).cmp(&cents(b.total_points))
    } else {
        cents(b.total_points).cmp(&cents(a.total_points))
    };

    by_total
        .then_with(|| break_tie(a, b, config.primary, config))
        .then_with(|| match config.secondary {
            Some(method) => break_tie(a, b, method, config),
            None => Ordering::Equal,
        })
}

fn break_tie(a: &AthleteTotals, b: &AthleteTotals, method: TiebreakMethod, config: &TiebreakerConfig) -> Ordering {
    match method {
        TiebreakMethod::Countback => countback(a, b),
        TiebreakMethod::HeadToHead => match config.head_to_head_event_id.as_deref() {
            Some(event_id) => head_to_head(a, b, event_id),
            None => Ordering::Equal,
        },
        TiebreakMethod::Disabled => Ordering::Equal,
    }
}

/// More 1st places wins, then more 2nd places, and so on.
fn countback(a: &AthleteTotals, b: &AthleteTotals) -> Ordering {
    let deepest = a
        .event_placements
        .values()
        .chain(b.event_placements.values())
        .copied()
        .max()
        .unwrap_or(0);

    for rank in 1..=deepest {
        let count_a = a.event_placements.values().filter(|r| **r == rank).count();
        let count_b = b.event_placements.values().filter(|r| **r == rank).count();
        if count_a != count_b {
            return count_b.cmp(&count_a);
        }
    }
    Ordering::Equal
}

/// Better placement in the designated event wins; no placement loses to any placement.
fn head_to_head(a: &AthleteTotals, b: &AthleteTotals, event_id: &str) -> Ordering {
    match (a.event_placements.get(event_id), b.event_placements.get(event_id)) {
        (Some(ra), Some(rb)) => ra.cmp(rb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Totals are compared at 2 decimal places so float noise never splits a tie.
fn cents(points: f64) -> i64 {
    (points * 100.0).round() as i64
}
