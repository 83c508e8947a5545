use std::cmp::Ordering;

use super::compare::{compare_scores, compare_tiebreaks, compute_sort_key};
use super::types::{Score, TiebreakScheme};
use crate::error::{Result, ScoringError};

/// Sort a field best first. Scores that compare equal keep their input order.
pub fn sort_scores(scores: &[Score]) -> Result<Vec<Score>> {
    let order = sort_indices(scores)?;
    Ok(order.into_iter().map(|i| scores[i].clone()).collect())
}

/// Indices of `scores` in ranked order.
///
/// Sorting happens in two passes because "missing tiebreak means equal" is
/// not transitive: a stable sort on the key (status band and primary value),
/// then, inside each run of equal keys, the rows carrying a tiebreak of one
/// sub-scheme are reordered among the slots they already occupy. Rows without
/// a comparable tiebreak never move.
pub fn sort_indices(scores: &[Score]) -> Result<Vec<usize>> {
    validate_field(scores)?;

    let keys: Vec<i128> = scores.iter().map(compute_sort_key).collect();
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by_key(|&i| keys[i]);

    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && keys[order[end]] == keys[order[start]] {
            end += 1;
        }
        if end - start > 1 {
            order_tiebreaks(scores, &mut order[start..end]);
        }
        start = end;
    }

    Ok(order)
}

fn order_tiebreaks(scores: &[Score], run: &mut [usize]) {
    for scheme in [TiebreakScheme::Time, TiebreakScheme::Reps] {
        let slots: Vec<usize> = (0..run.len())
            .filter(|&slot| {
                let score = &scores[run[slot]];
                score.is_ranked() && score.tiebreak.is_some_and(|tb| tb.scheme == scheme)
            })
            .collect();
        if slots.len() < 2 {
            continue;
        }

        let mut members: Vec<usize> = slots.iter().map(|&slot| run[slot]).collect();
        members.sort_by(|&a, &b| compare_tiebreaks(&scores[a], &scores[b]));
        for (slot, member) in slots.into_iter().zip(members) {
            run[slot] = member;
        }
    }
}

/// Competition ranks (1, 1, 3) for a field that is already sorted.
///
/// Each rank is one plus the number of scores strictly better, the same
/// rule as `find_rank`. Neighbours alone are not enough: a row without a
/// tiebreak ties both of two rows whose tiebreaks separate them.
pub fn assign_ranks(sorted: &[Score]) -> Vec<u32> {
    sorted
        .iter()
        .map(|score| {
            let better = sorted
                .iter()
                .filter(|other| compare_scores(other, score) == Ordering::Less)
                .count();
            better as u32 + 1
        })
        .collect()
}

/// 1-based rank `target` would take in `field`: one plus the number of
/// scores strictly better than it, so tied scores share a rank.
pub fn find_rank(target: &Score, field: &[Score]) -> Result<u32> {
    target.validate()?;
    validate_field(field)?;

    let better = field
        .iter()
        .filter(|score| compare_scores(score, target) == Ordering::Less)
        .count();
    Ok(better as u32 + 1)
}

fn validate_field(scores: &[Score]) -> Result<()> {
    for (index, score) in scores.iter().enumerate() {
        score
            .check()
            .map_err(|reason| ScoringError::InvalidScoreAt { index, reason })?;
    }
    Ok(())
}
