//! Upload form state.
//!
//! [`FormState`] is an immutable value; every user action is a method that
//! returns the next state. Nothing here performs I/O, so the whole form can be
//! driven in unit tests without a rendering harness.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

use super::weights::{Channel, WeightEditor};

/// Hours offered by the time-gap selector.
pub const TIME_GAP_HOURS: RangeInclusive<u32> = 1..=9;

pub const MINUTES_PER_HOUR: u32 = 60;

/// Errors raised by form updates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Time gap must be between 1 and 9 hours, got {0}")]
    TimeGapOutOfRange(u32),
}

/// CSV file chosen in the upload field.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedFile {
    /// A file on the local filesystem, read at submit time.
    Path(PathBuf),
    /// Contents already in memory (browser upload, tests).
    Upload { name: String, contents: Arc<str> },
}

impl SelectedFile {
    pub fn upload(name: impl Into<String>, contents: impl Into<Arc<str>>) -> Self {
        SelectedFile::Upload {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            SelectedFile::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            SelectedFile::Upload { name, .. } => name.clone(),
        }
    }
}

/// Label of a time-gap option ("1 hour", "3 hours").
pub fn time_gap_label(hours: u32) -> String {
    if hours > 1 {
        format!("{} hours", hours)
    } else {
        format!("{} hour", hours)
    }
}

/// Complete state of the upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub file: Option<SelectedFile>,
    pub weights_enabled: bool,
    pub weights: WeightEditor,
    pub time_gap_hours: u32,
    pub date_filter_enabled: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            file: None,
            weights_enabled: false,
            weights: WeightEditor::new(),
            time_gap_hours: *TIME_GAP_HOURS.start(),
            date_filter_enabled: false,
            start_date: None,
            end_date: None,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn select_file(&self, file: SelectedFile) -> Self {
        Self {
            file: Some(file),
            ..self.clone()
        }
    }

    /// Turn custom weighting on or off. Either way the lock is released.
    #[must_use]
    pub fn toggle_weights(&self, enabled: bool) -> Self {
        Self {
            weights_enabled: enabled,
            weights: self.weights.unlock(),
            ..self.clone()
        }
    }

    /// Edit one channel; the other two share the remainder.
    #[must_use]
    pub fn apply_weight_edit(&self, channel: Channel, value: f64) -> Self {
        Self {
            weights: self.weights.set_weight(channel, value),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn unlock_weights(&self) -> Self {
        Self {
            weights: self.weights.unlock(),
            ..self.clone()
        }
    }

    /// Whether the input for `channel` accepts edits right now.
    pub fn is_weight_editable(&self, channel: Channel) -> bool {
        self.weights_enabled && self.weights.is_editable(channel)
    }

    pub fn select_time_gap(&self, hours: u32) -> Result<Self, FormError> {
        if !TIME_GAP_HOURS.contains(&hours) {
            return Err(FormError::TimeGapOutOfRange(hours));
        }
        Ok(Self {
            time_gap_hours: hours,
            ..self.clone()
        })
    }

    pub fn time_gap_minutes(&self) -> u32 {
        self.time_gap_hours * MINUTES_PER_HOUR
    }

    /// Dates entered so far are kept when the filter is switched off.
    #[must_use]
    pub fn toggle_date_filter(&self, enabled: bool) -> Self {
        Self {
            date_filter_enabled: enabled,
            ..self.clone()
        }
    }

    /// Set the start date; an empty string clears it.
    #[must_use]
    pub fn set_start_date(&self, date: &str) -> Self {
        Self {
            start_date: non_empty(date),
            ..self.clone()
        }
    }

    /// Set the end date; an empty string clears it.
    #[must_use]
    pub fn set_end_date(&self, date: &str) -> Self {
        Self {
            end_date: non_empty(date),
            ..self.clone()
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weights::WeightSet;

    #[test]
    fn test_defaults() {
        let form = FormState::new();
        assert!(form.file.is_none());
        assert!(!form.weights_enabled);
        assert!(!form.date_filter_enabled);
        assert_eq!(form.time_gap_hours, 1);
        assert_eq!(form.time_gap_minutes(), 60);
        assert_eq!(form.weights.weights(), WeightSet::default());
    }

    #[test]
    fn test_updates_do_not_mutate_previous_state() {
        let before = FormState::new().toggle_weights(true);
        let after = before.apply_weight_edit(Channel::Voice, 50.0);
        assert_eq!(before.weights.weights(), WeightSet::default());
        assert_eq!(after.weights.weights(), WeightSet::new(50.0, 25.0, 25.0));
    }

    #[test]
    fn test_toggle_weights_resets_lock() {
        let form = FormState::new()
            .toggle_weights(true)
            .apply_weight_edit(Channel::Sms, 20.0);
        assert!(!form.is_weight_editable(Channel::Voice));

        let off = form.toggle_weights(false);
        assert_eq!(off.weights.locked(), None);
        // values survive the toggle
        assert_eq!(off.weights.weights(), WeightSet::new(40.0, 20.0, 40.0));

        let on = off.toggle_weights(true);
        assert!(Channel::ALL.iter().all(|c| on.is_weight_editable(*c)));
    }

    #[test]
    fn test_weights_not_editable_when_disabled() {
        let form = FormState::new();
        assert!(!form.is_weight_editable(Channel::Voice));
    }

    #[test]
    fn test_time_gap_bounds() {
        let form = FormState::new().select_time_gap(3).unwrap();
        assert_eq!(form.time_gap_minutes(), 180);
        assert_eq!(
            FormState::new().select_time_gap(0),
            Err(FormError::TimeGapOutOfRange(0))
        );
        assert_eq!(
            FormState::new().select_time_gap(10),
            Err(FormError::TimeGapOutOfRange(10))
        );
        assert_eq!(FormState::new().select_time_gap(9).unwrap().time_gap_minutes(), 540);
    }

    #[test]
    fn test_time_gap_labels() {
        let labels: Vec<String> = TIME_GAP_HOURS.map(time_gap_label).collect();
        assert_eq!(labels.first().map(String::as_str), Some("1 hour"));
        assert_eq!(labels.last().map(String::as_str), Some("9 hours"));
        assert_eq!(labels.len(), 9);
    }

    #[test]
    fn test_dates_cleared_by_empty_input() {
        let form = FormState::new()
            .toggle_date_filter(true)
            .set_start_date("2024-01-01")
            .set_end_date("2024-01-31");
        assert_eq!(form.start_date.as_deref(), Some("2024-01-01"));
        let cleared = form.set_start_date("");
        assert_eq!(cleared.start_date, None);
        assert_eq!(cleared.end_date.as_deref(), Some("2024-01-31"));
    }

    #[test]
    fn test_selected_file_name() {
        let upload = SelectedFile::upload("calls.csv", "a,b\n");
        assert_eq!(upload.name(), "calls.csv");
        let path = SelectedFile::Path(PathBuf::from("/tmp/records/towers.csv"));
        assert_eq!(path.name(), "towers.csv");
    }
}
