//! Outbound analysis request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::weights::WeightSet;

/// Inclusive date range forwarded to the backend.
///
/// Ordering of the two dates is not checked here; the backend owns that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    pub start_date: String,
    pub end_date: String,
}

impl DateFilter {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// Body of `POST /api/process-csv` and of the backend's `POST /process-csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Raw CSV text
    pub file: String,
    pub weights: WeightSet,
    /// Time gap in minutes
    pub time_gap: u32,
    /// Omitted from the payload entirely when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<DateFilter>,
}

impl AnalysisRequest {
    pub fn new(
        file: String,
        weights: WeightSet,
        time_gap: u32,
        date_filter: Option<DateFilter>,
    ) -> Self {
        Self {
            file,
            weights,
            time_gap,
            date_filter,
        }
    }
}

/// Body accepted by the relay.
///
/// Only the four known keys are picked out; their values are kept as raw
/// JSON so a body the backend would reject still reaches it and the
/// backend's own status comes back. Keys missing from the body stay missing;
/// an explicit `null` is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub file: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub weights: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time_gap: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RelayRequest {
    /// Pick the relayed keys out of a JSON body. Anything but an object is refused.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value)
    }

    fn csv_text(&self) -> Option<&str> {
        self.file.as_ref().and_then(Value::as_str)
    }

    /// Length of the CSV text, 0 when `file` is absent or not a string.
    pub fn csv_len(&self) -> usize {
        self.csv_text().map_or(0, str::len)
    }

    /// SHA-256 of the CSV text, hex encoded. Used in logs instead of the content.
    pub fn csv_checksum(&self) -> Option<String> {
        self.csv_text().map(|text| {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hex::encode(hasher.finalize())
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
