use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::codec::{decode_score, encode_score, DecodeOptions};
use super::types::Scheme;
use crate::error::ParseError;

/// How per-round values collapse into the event result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Max,
    Min,
    Sum,
    /// Mean, rounded to the nearest integer
    Average,
    First,
    Last,
}

impl FromStr for Aggregation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(Aggregation::Max),
            "min" => Ok(Aggregation::Min),
            "sum" => Ok(Aggregation::Sum),
            "average" | "avg" => Ok(Aggregation::Average),
            "first" => Ok(Aggregation::First),
            "last" => Ok(Aggregation::Last),
            other => Err(ParseError::new(format!(
                "unknown aggregation '{}'. Expected max, min, sum, average, first or last",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoundInput {
    pub raw: String,
    /// Scheme for this round only (e.g. a load round inside a reps event)
    #[serde(default)]
    pub scheme_override: Option<Scheme>,
}

impl RoundInput {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            scheme_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedRound {
    pub index: usize,
    pub scheme: Scheme,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundError {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundsResult {
    pub rounds: Vec<EncodedRound>,
    pub errors: Vec<RoundError>,
    pub aggregated: Option<i64>,
}

/// Encode every round and aggregate the valid ones. Invalid rounds are
/// skipped and reported, they never poison the other rounds.
pub fn encode_rounds(inputs: &[RoundInput], scheme: Scheme, aggregation: Aggregation) -> RoundsResult {
    let mut rounds = Vec::new();
    let mut errors = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        let round_scheme = input.scheme_override.unwrap_or(scheme);
        match encode_score(&input.raw, round_scheme) {
            Ok(value) => rounds.push(EncodedRound {
                index,
                scheme: round_scheme,
                value,
            }),
            Err(e) => errors.push(RoundError {
                index,
                error: e.message,
            }),
        }
    }

    let values: Vec<i64> = rounds.iter().map(|r| r.value).collect();
    let aggregated = aggregate_values(&values, aggregation);

    RoundsResult {
        rounds,
        errors,
        aggregated,
    }
}

pub fn aggregate_values(values: &[i64], aggregation: Aggregation) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    match aggregation {
        Aggregation::Max => values.iter().copied().max(),
        Aggregation::Min => values.iter().copied().min(),
        Aggregation::Sum => Some(values.iter().fold(0i64, |acc, v| acc.saturating_add(*v))),
        Aggregation::Average => {
            let sum: i128 = values.iter().map(|v| *v as i128).sum();
            Some((sum as f64 / values.len() as f64).round() as i64)
        }
        Aggregation::First => values.first().copied(),
        Aggregation::Last => values.last().copied(),
    }
}

/// Display strings for each encoded round, in round order.
pub fn format_rounds(rounds: &[EncodedRound]) -> Vec<String> {
    rounds
        .iter()
        .map(|r| decode_score(r.value, r.scheme, DecodeOptions::default()))
        .collect()
}
