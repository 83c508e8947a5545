use super::codec::{decode_rounds_reps, decode_score, DecodeOptions};
use super::tiebreak::decode_tiebreak;
use super::types::{Scheme, Score, ScoreStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix capped results with "CAP"
    pub show_status: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { show_status: true }
    }
}

/// Render a score for display, honoring its status.
pub fn format_score(score: &Score, opts: FormatOptions) -> String {
    match score.status {
        ScoreStatus::Cap => {
            let reps = score
                .time_cap
                .map(|cap| format!("{} reps", cap.secondary_value));
            match (opts.show_status, reps) {
                (true, Some(reps)) => format!("CAP ({})", reps),
                (true, None) => "CAP".to_string(),
                (false, Some(reps)) => reps,
                (false, None) => String::new(),
            }
        }
        ScoreStatus::Dq => "DQ".to_string(),
        ScoreStatus::Withdrawn => "WITHDRAWN".to_string(),
        ScoreStatus::Dns => "DNS".to_string(),
        ScoreStatus::Scored => match score.value {
            Some(value) => decode_score(value, score.scheme, DecodeOptions::default()),
            None => "-".to_string(),
        },
    }
}

/// Like `format_score`, with " (TB: ...)" appended when a tiebreak was recorded.
///
/// Rounds are zero-padded to two digits here so tied rows line up ("05+12").
pub fn format_score_with_tiebreak(score: &Score, opts: FormatOptions) -> String {
    let Some(tiebreak) = score.tiebreak else {
        return format_score(score, opts);
    };

    let primary = match (score.status, score.scheme, score.value) {
        (ScoreStatus::Scored, Scheme::RoundsReps, Some(value)) => decode_rounds_reps(value, true),
        _ => format_score(score, opts),
    };

    format!(
        "{} (TB: {})",
        primary,
        decode_tiebreak(tiebreak.value, tiebreak.scheme)
    )
}
