//! Analysis records returned by the backend.
//!
//! The backend reply is validated here before anything downstream sees it:
//! a missing field, an unreadable timestamp or a confidence outside 0-100
//! fails with a [`RecordParseError`] naming the offending location.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of the per-state confidence timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Geographic label (e.g. "New York")
    pub state: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: DateTime<Utc>,
    /// Confidence percentage, 0-100
    pub confidence: f64,
    /// Diagnostic counts; the backend may send them as floats (`12.0`)
    pub count_rows: f64,
    pub count_recovered: f64,
    pub count_interpolated: f64,
}

/// Errors raised while validating a backend reply.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordParseError {
    #[error("Malformed analysis response at '{path}': {message}")]
    Malformed { path: String, message: String },

    #[error("Record {index} ({state}) has confidence {confidence} outside 0-100")]
    ConfidenceOutOfRange {
        index: usize,
        state: String,
        confidence: f64,
    },
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(default)]
    data: Option<Vec<AnalysisRecord>>,
}

/// Parse a `{ "data": [...] }` reply.
///
/// A missing or `null` `data` key yields an empty list.
pub fn parse_analysis_response(value: &Value) -> Result<Vec<AnalysisRecord>, RecordParseError> {
    let response: AnalysisResponse =
        serde_path_to_error::deserialize(value).map_err(|err| RecordParseError::Malformed {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        })?;

    let records = response.data.unwrap_or_default();
    for (index, record) in records.iter().enumerate() {
        if !(0.0..=100.0).contains(&record.confidence) {
            return Err(RecordParseError::ConfidenceOutOfRange {
                index,
                state: record.state.clone(),
                confidence: record.confidence,
            });
        }
    }
    Ok(records)
}

/// Parse an ISO-8601 timestamp.
///
/// Offsets are honoured; timestamps without one are taken as UTC. A bare date
/// means midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp '{}'", raw)))
}
