use super::codec::{decode_score, encode_score, DecodeOptions, ParseResult};
use super::types::TiebreakScheme;
use crate::error::ParseError;

/// Check a raw tiebreak entry ("8:30" for time, "150" for reps).
pub fn parse_tiebreak(raw: &str, scheme: TiebreakScheme) -> ParseResult {
    ParseResult::from_result(encode_tiebreak(raw, scheme))
}

/// Tiebreaks share the primary time and reps grammars.
pub fn encode_tiebreak(raw: &str, scheme: TiebreakScheme) -> Result<i64, ParseError> {
    encode_score(raw, scheme.as_scheme()).map_err(|e| ParseError::new(format!("tiebreak: {}", e)))
}

/// Time tiebreaks keep millisecond precision ("8:30.567") whenever it is non-zero.
pub fn decode_tiebreak(value: i64, scheme: TiebreakScheme) -> String {
    decode_score(value, scheme.as_scheme(), DecodeOptions::default())
}
