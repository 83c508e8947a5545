use std::cmp::Ordering;

use super::types::{Score, ScoreStatus, ScoreType, TiebreakScheme};

// Status bands, best first. Scored and capped rows share the ranked class
// but a finisher always sits above anyone who hit the cap.
const BAND_SCORED: i128 = 0;
const BAND_CAP: i128 = 1;
const BAND_DQ: i128 = 2;
const BAND_UNRANKED: i128 = 3;

/// Order two scores; `Less` means `a` ranks better than `b`.
///
/// Precedence: status band, then the primary value in the scheme's
/// direction (reps before the cap for capped rows, more is better), then
/// the tiebreak when both sides recorded one under the same sub-scheme.
pub fn compare_scores(a: &Score, b: &Score) -> Ordering {
    debug_assert!(a.check().is_ok(), "compare_scores on invalid score: {:?}", a);
    debug_assert!(b.check().is_ok(), "compare_scores on invalid score: {:?}", b);

    compute_sort_key(a)
        .cmp(&compute_sort_key(b))
        .then_with(|| compare_tiebreaks(a, b))
}

/// Single orderable key: status band in the high bits, primary value below.
///
/// Lower keys rank better. Keys agree with `compare_scores` everywhere
/// except that tiebreaks are not folded in.
pub fn compute_sort_key(score: &Score) -> i128 {
    let (band, primary) = match score.status {
        ScoreStatus::Scored => {
            let primary = match (score.value, score.score_type) {
                (Some(v), ScoreType::Min) => ordered(v),
                (Some(v), ScoreType::Max) => !ordered(v),
                (None, _) => u64::MAX,
            };
            (BAND_SCORED, primary)
        }
        ScoreStatus::Cap => {
            let primary = match score.time_cap {
                Some(cap) => !ordered(cap.secondary_value),
                None => u64::MAX,
            };
            (BAND_CAP, primary)
        }
        ScoreStatus::Dq => (BAND_DQ, 0),
        ScoreStatus::Withdrawn | ScoreStatus::Dns => (BAND_UNRANKED, 0),
    };
    (band << 64) | primary as i128
}

/// Compare tiebreaks only; missing or mismatched tiebreaks never break a tie.
pub fn compare_tiebreaks(a: &Score, b: &Score) -> Ordering {
    if !a.is_ranked() || !b.is_ranked() {
        return Ordering::Equal;
    }
    match (a.tiebreak, b.tiebreak) {
        (Some(ta), Some(tb)) if ta.scheme == tb.scheme => match ta.scheme {
            TiebreakScheme::Time => ta.value.cmp(&tb.value),
            TiebreakScheme::Reps => tb.value.cmp(&ta.value),
        },
        _ => Ordering::Equal,
    }
}

// Map i64 onto u64 preserving order.
fn ordered(value: i64) -> u64 {
    (value as u64) ^ (1 << 63)
}
