use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::score::codec::encode_time;
use crate::score::{encode_score, encode_tiebreak, Scheme, Score, ScoreStatus, ScoreType, TiebreakScheme};
use crate::scoring::EventEntry;

/// Results file for one event.
///
/// Example YAML:
/// ```yaml
/// id: event-2
/// name: "Fran"
/// scheme: time-with-cap
/// time_cap: "10:00"
/// tiebreak_scheme: time
/// entries:
///   - { athlete: Ann, result: "3:12" }
///   - { athlete: Bo, status: cap, cap_reps: 71 }
///   - { athlete: Cy, status: dns }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EventFile {
    /// Defaults to the file stem
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub scheme: Scheme,
    /// Overrides the scheme's ranking direction
    #[serde(default)]
    pub score_type: Option<ScoreType>,
    /// "MM:SS" cap, required when any entry is capped
    #[serde(default)]
    pub time_cap: Option<String>,
    #[serde(default)]
    pub tiebreak_scheme: Option<TiebreakScheme>,
    #[serde(default)]
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawEntry {
    pub athlete: String,
    #[serde(default)]
    pub result: Option<String>,
    /// Defaults to `scored` when a result is given
    #[serde(default)]
    pub status: Option<ScoreStatus>,
    #[serde(default)]
    pub cap_reps: Option<i64>,
    #[serde(default)]
    pub tiebreak: Option<String>,
}

/// A row that could not be turned into a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub athlete: String,
    pub error: String,
}

impl EventFile {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("event")
    }

    /// Convert raw rows into scored entries. A malformed row is reported and
    /// skipped; the rest of the event is unaffected.
    pub fn to_entries(&self) -> (Vec<EventEntry>, Vec<RowError>) {
        let mut entries = Vec::new();
        let mut errors = Vec::new();

        for (row, raw) in self.entries.iter().enumerate() {
            match self.build_score(raw) {
                Ok(score) => entries.push(EventEntry::new(raw.athlete.clone(), score)),
                Err(error) => {
                    warn!(row, athlete = %raw.athlete, %error, "Skipping invalid result row");
                    errors.push(RowError {
                        row,
                        athlete: raw.athlete.clone(),
                        error,
                    });
                }
            }
        }

        (entries, errors)
    }

    fn build_score(&self, raw: &RawEntry) -> Result<Score, String> {
        let status = match (raw.status, &raw.result) {
            (Some(status), _) => status,
            (None, Some(_)) => ScoreStatus::Scored,
            (None, None) => return Err("missing result or status".to_string()),
        };

        let mut score = match status {
            ScoreStatus::Scored => {
                let result = raw.result.as_deref().ok_or("scored row needs a result")?;
                let value = encode_score(result, self.scheme).map_err(|e| e.message)?;
                Score::scored(self.scheme, value)
            }
            ScoreStatus::Cap => {
                let cap = self
                    .time_cap
                    .as_deref()
                    .ok_or("capped row needs the event's time_cap")?;
                let cap_ms = encode_time(cap.trim()).map_err(|e| format!("time_cap: {}", e))?;
                let reps = raw.cap_reps.ok_or("capped row needs cap_reps")?;
                let mut score = Score::capped(cap_ms, reps);
                score.scheme = self.scheme;
                score
            }
            ScoreStatus::Dq | ScoreStatus::Withdrawn | ScoreStatus::Dns => {
                Score::unscored(self.scheme, status)
            }
        };

        if let Some(score_type) = self.score_type {
            score = score.with_score_type(score_type);
        }

        if let Some(raw_tiebreak) = raw.tiebreak.as_deref() {
            let scheme = self.tiebreak_scheme.unwrap_or(TiebreakScheme::Time);
            let value = encode_tiebreak(raw_tiebreak, scheme).map_err(|e| e.message)?;
            score = score.with_tiebreak(scheme, value);
        }

        score.check()?;
        Ok(score)
    }
}

/// Read an event results file. The event id defaults to the file stem.
pub fn load_event_file(path: &Path) -> Result<EventFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file at {}", path.display()))?;

    let mut event: EventFile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse event file: invalid YAML in {}", path.display()))?;

    if event.id.is_none() {
        event.id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }

    Ok(event)
}
