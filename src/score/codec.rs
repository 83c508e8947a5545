use serde::Serialize;

use super::types::{Scheme, ROUNDS_MULTIPLIER};
use crate::error::ParseError;

/// Grams per pound, used to store `load` in grams and display it in pounds.
pub const GRAMS_PER_POUND: f64 = 453.592;

/// Outcome of checking a raw performance string.
///
/// Malformed input is reported here instead of as an error so entry
/// screens can show the message next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub is_valid: bool,
    pub encoded: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseResult {
    pub(crate) fn from_result(result: Result<i64, ParseError>) -> Self {
        match result {
            Ok(encoded) => Self {
                is_valid: true,
                encoded: Some(encoded),
                error: None,
            },
            Err(e) => Self {
                is_valid: false,
                encoded: None,
                error: Some(e.message),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Append the scheme's unit suffix ("150 reps", "225 lbs")
    pub include_unit: bool,
}

pub fn parse_score(raw: &str, scheme: Scheme) -> ParseResult {
    ParseResult::from_result(encode_score(raw, scheme))
}

/// Encode a human-entered performance string into its integer form.
pub fn encode_score(raw: &str, scheme: Scheme) -> Result<i64, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::new("score is empty"));
    }
    if raw.starts_with('-') {
        return Err(ParseError::new(format!(
            "negative values are not allowed: '{}'",
            raw
        )));
    }

    match scheme {
        Scheme::Time | Scheme::TimeWithCap => encode_time(raw),
        Scheme::RoundsReps => encode_rounds_reps(raw),
        Scheme::Load => encode_load(raw),
        Scheme::Reps
        | Scheme::Calories
        | Scheme::Meters
        | Scheme::Feet
        | Scheme::Points
        | Scheme::Emom
        | Scheme::PassFail => parse_digits(raw, "value"),
    }
}

/// Render an encoded value back into its display string.
///
/// `value` must be a valid encoding; see [`Scheme::validate_encoded`].
pub fn decode_score(value: i64, scheme: Scheme, opts: DecodeOptions) -> String {
    debug_assert!(
        scheme.validate_encoded(value).is_ok(),
        "decode_score on invalid {} encoding: {}",
        scheme,
        value
    );

    let decoded = match scheme {
        Scheme::Time | Scheme::TimeWithCap => decode_time(value),
        Scheme::RoundsReps => decode_rounds_reps(value, false),
        Scheme::Load => format!("{}", (value as f64 / GRAMS_PER_POUND).round() as i64),
        _ => value.to_string(),
    };

    match (opts.include_unit, scheme.unit()) {
        (true, Some(unit)) => format!("{} {}", decoded, unit),
        _ => decoded,
    }
}

/// "MM:SS", "H:MM:SS", each optionally with a ".f", ".ff" or ".fff" fraction of a second.
pub(crate) fn encode_time(raw: &str) -> Result<i64, ParseError> {
    let parts: Vec<&str> = raw.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => {
            let minutes = parse_digits(m, "minutes")?;
            if minutes >= 60 {
                return Err(ParseError::new(format!(
                    "minutes must be less than 60 in '{}'. Use H:MM:SS",
                    raw
                )));
            }
            (0, minutes, *s)
        }
        [h, m, s] => {
            let minutes = parse_digits(m, "minutes")?;
            if minutes >= 60 {
                return Err(ParseError::new(format!(
                    "minutes must be less than 60 in '{}'",
                    raw
                )));
            }
            (parse_digits(h, "hours")?, minutes, *s)
        }
        _ => {
            return Err(ParseError::new(format!(
                "invalid time '{}'. Expected MM:SS or H:MM:SS",
                raw
            )))
        }
    };

    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (seconds, None),
    };
    let seconds = parse_digits(whole, "seconds")?;
    if seconds >= 60 {
        return Err(ParseError::new(format!(
            "seconds must be less than 60 in '{}'",
            raw
        )));
    }
    let millis = match fraction {
        Some(f) => parse_fraction_ms(f)?,
        None => 0,
    };

    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(|| ParseError::new(format!("time '{}' is too large", raw)))
}

fn parse_fraction_ms(fraction: &str) -> Result<i64, ParseError> {
    if fraction.is_empty() || fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(format!(
            "invalid fraction of a second '.{}'. Use up to 3 digits",
            fraction
        )));
    }
    let padded = format!("{:0<3}", fraction);
    parse_digits(&padded, "milliseconds")
}

/// "M:SS" below an hour, "H:MM:SS" above, with ".mmm" only when milliseconds are present.
pub(crate) fn decode_time(ms: i64) -> String {
    let total_seconds = ms / 1000;
    let millis = ms % 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let base = if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    };

    if millis != 0 {
        format!("{}.{:03}", base, millis)
    } else {
        base
    }
}

fn encode_rounds_reps(raw: &str) -> Result<i64, ParseError> {
    let parts: Vec<&str> = raw.split('+').collect();
    let [rounds, reps] = parts.as_slice() else {
        return Err(ParseError::new(format!(
            "invalid rounds+reps '{}'. Expected R+X (e.g. 5+12)",
            raw
        )));
    };
    let rounds = parse_digits(rounds, "rounds")?;
    let reps = parse_digits(reps, "reps")?;
    if reps >= ROUNDS_MULTIPLIER {
        return Err(ParseError::new(format!(
            "reps must be less than {} in '{}'",
            ROUNDS_MULTIPLIER, raw
        )));
    }
    rounds
        .checked_mul(ROUNDS_MULTIPLIER)
        .and_then(|v| v.checked_add(reps))
        .ok_or_else(|| ParseError::new(format!("rounds+reps '{}' is too large", raw)))
}

pub(crate) fn decode_rounds_reps(value: i64, pad_rounds: bool) -> String {
    let rounds = value / ROUNDS_MULTIPLIER;
    let reps = value % ROUNDS_MULTIPLIER;
    if pad_rounds {
        format!("{:02}+{}", rounds, reps)
    } else {
        format!("{}+{}", rounds, reps)
    }
}

/// Pounds in, grams stored.
fn encode_load(raw: &str) -> Result<i64, ParseError> {
    let valid = raw.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && raw.bytes().filter(|b| *b == b'.').count() <= 1
        && raw.bytes().any(|b| b.is_ascii_digit());
    if !valid {
        return Err(ParseError::new(format!("invalid load '{}'. Expected a number of pounds", raw)));
    }
    let pounds: f64 = raw
        .parse()
        .map_err(|_| ParseError::new(format!("invalid load '{}'", raw)))?;
    let grams = (pounds * GRAMS_PER_POUND).round();
    if !grams.is_finite() || grams > i64::MAX as f64 {
        return Err(ParseError::new(format!("load '{}' is too large", raw)));
    }
    Ok(grams as i64)
}

fn parse_digits(part: &str, label: &str) -> Result<i64, ParseError> {
    let part = part.trim();
    if part.is_empty() {
        return Err(ParseError::new(format!("{} is missing", label)));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(format!(
            "{} must be a whole number, got '{}'",
            label, part
        )));
    }
    part.parse::<i64>()
        .map_err(|_| ParseError::new(format!("{} '{}' is too large", label, part)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> DecodeOptions {
        DecodeOptions::default()
    }

    fn with_unit() -> DecodeOptions {
        DecodeOptions { include_unit: true }
    }

    // time tests

    #[test]
    fn test_encode_time_with_cap() {
        assert_eq!(encode_score("12:34", Scheme::TimeWithCap).unwrap(), 754_000);
        assert_eq!(decode_score(754_000, Scheme::TimeWithCap, plain()), "12:34");
    }

    #[test]
    fn test_encode_time_with_hours() {
        assert_eq!(encode_score("1:02:03", Scheme::Time).unwrap(), 3_723_000);
        assert_eq!(decode_score(3_723_000, Scheme::Time, plain()), "1:02:03");
    }

    #[test]
    fn test_decode_time_pads_seconds() {
        assert_eq!(decode_score(65_000, Scheme::Time, plain()), "1:05");
        assert_eq!(decode_score(0, Scheme::Time, plain()), "0:00");
    }

    #[test]
    fn test_time_fraction() {
        assert_eq!(encode_score("8:30.567", Scheme::Time).unwrap(), 510_567);
        assert_eq!(encode_score("8:30.5", Scheme::Time).unwrap(), 510_500);
        assert_eq!(decode_score(510_567, Scheme::Time, plain()), "8:30.567");
        assert_eq!(decode_score(510_050, Scheme::Time, plain()), "8:30.050");
    }

    #[test]
    fn test_time_rejects_bad_input() {
        assert!(encode_score("12", Scheme::Time).is_err());
        assert!(encode_score("1:2:3:4", Scheme::Time).is_err());
        assert!(encode_score("12:60", Scheme::Time).is_err());
        assert!(encode_score("1:60:00", Scheme::Time).is_err());
        assert!(encode_score("ab:cd", Scheme::Time).is_err());
        assert!(encode_score("-1:00", Scheme::Time).is_err());
        assert!(encode_score("1:00.1234", Scheme::Time).is_err());
        assert!(encode_score("1:", Scheme::Time).is_err());
    }

    #[test]
    fn test_two_part_time_rejects_an_hour_of_minutes() {
        let err = encode_score("75:00", Scheme::Time).unwrap_err();
        assert!(err.message.contains("H:MM:SS"));
        assert_eq!(encode_score("59:59", Scheme::Time).unwrap(), 3_599_000);
        assert_eq!(encode_score("1:15:00", Scheme::Time).unwrap(), 4_500_000);
        assert_eq!(decode_score(4_500_000, Scheme::Time, plain()), "1:15:00");
    }

    #[test]
    fn test_negative_encodings_are_invalid() {
        assert!(Scheme::Time.validate_encoded(-65_000).is_err());
        assert!(Scheme::RoundsReps.validate_encoded(-5).is_err());
        assert!(Scheme::Reps.validate_encoded(0).is_ok());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "decode_score on invalid")]
    fn test_decode_negative_time_panics() {
        decode_score(-65_000, Scheme::Time, plain());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "decode_score on invalid")]
    fn test_decode_negative_rounds_reps_panics() {
        decode_score(-5, Scheme::RoundsReps, plain());
    }

    #[test]
    fn test_time_ignores_surrounding_whitespace() {
        assert_eq!(encode_score("  8:30 ", Scheme::Time).unwrap(), 510_000);
    }

    // rounds-reps tests

    #[test]
    fn test_encode_rounds_reps() {
        assert_eq!(encode_score("5+12", Scheme::RoundsReps).unwrap(), 500_012);
        assert_eq!(encode_score("0+7", Scheme::RoundsReps).unwrap(), 7);
        assert_eq!(decode_score(500_012, Scheme::RoundsReps, plain()), "5+12");
    }

    #[test]
    fn test_rounds_reps_padded_decode() {
        assert_eq!(decode_rounds_reps(500_012, true), "05+12");
        assert_eq!(decode_rounds_reps(1_200_003, true), "12+3");
    }

    #[test]
    fn test_rounds_reps_rejects_bad_input() {
        assert!(encode_score("5", Scheme::RoundsReps).is_err());
        assert!(encode_score("5+", Scheme::RoundsReps).is_err());
        assert!(encode_score("5+1+2", Scheme::RoundsReps).is_err());
        assert!(encode_score("5+100000", Scheme::RoundsReps).is_err());
        assert!(encode_score("a+b", Scheme::RoundsReps).is_err());
    }

    // load tests

    #[test]
    fn test_encode_load_in_grams() {
        assert_eq!(encode_score("225", Scheme::Load).unwrap(), 102_058);
        assert_eq!(decode_score(102_058, Scheme::Load, plain()), "225");
        assert_eq!(decode_score(102_058, Scheme::Load, with_unit()), "225 lbs");
    }

    #[test]
    fn test_encode_load_decimal() {
        assert_eq!(encode_score("135.5", Scheme::Load).unwrap(), 61_462);
        assert!(encode_score("1.2.3", Scheme::Load).is_err());
        assert!(encode_score(".", Scheme::Load).is_err());
    }

    // passthrough tests

    #[test]
    fn test_passthrough_schemes() {
        for scheme in [
            Scheme::Reps,
            Scheme::Calories,
            Scheme::Meters,
            Scheme::Feet,
            Scheme::Points,
            Scheme::Emom,
            Scheme::PassFail,
        ] {
            assert_eq!(encode_score("150", scheme).unwrap(), 150, "{}", scheme);
            assert_eq!(decode_score(150, scheme, plain()), "150", "{}", scheme);
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(decode_score(150, Scheme::Reps, with_unit()), "150 reps");
        assert_eq!(decode_score(20, Scheme::Calories, with_unit()), "20 cal");
        assert_eq!(decode_score(400, Scheme::Meters, with_unit()), "400 m");
        assert_eq!(decode_score(754_000, Scheme::Time, with_unit()), "12:34");
        assert_eq!(decode_score(500_012, Scheme::RoundsReps, with_unit()), "5+12");
    }

    #[test]
    fn test_passthrough_rejects_bad_input() {
        assert!(encode_score("-5", Scheme::Reps).is_err());
        assert!(encode_score("12.5", Scheme::Reps).is_err());
        assert!(encode_score("lots", Scheme::Calories).is_err());
        assert!(encode_score("", Scheme::Reps).is_err());
        assert!(encode_score("99999999999999999999", Scheme::Reps).is_err());
    }

    // parse_score tests

    #[test]
    fn test_parse_score_valid() {
        let result = parse_score("12:34", Scheme::Time);
        assert!(result.is_valid);
        assert_eq!(result.encoded, Some(754_000));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parse_score_invalid_has_message() {
        let result = parse_score("12-34", Scheme::Time);
        assert!(!result.is_valid);
        assert!(result.encoded.is_none());
        assert!(result.error.unwrap().contains("12-34"));
    }

    #[test]
    fn test_parse_score_negative_message() {
        let result = parse_score("-3", Scheme::Reps);
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("negative"));
    }

    #[test]
    fn test_canonical_round_trips() {
        let cases = [
            (Scheme::Time, "12:34"),
            (Scheme::Time, "1:00:00"),
            (Scheme::Time, "0:59.250"),
            (Scheme::TimeWithCap, "8:30"),
            (Scheme::RoundsReps, "5+12"),
            (Scheme::RoundsReps, "0+0"),
            (Scheme::Load, "315"),
            (Scheme::Reps, "150"),
            (Scheme::Feet, "0"),
        ];
        for (scheme, raw) in cases {
            let encoded = encode_score(raw, scheme).unwrap();
            assert_eq!(decode_score(encoded, scheme, plain()), raw, "{} {}", scheme, raw);
        }
    }
}
