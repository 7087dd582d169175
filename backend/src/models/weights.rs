//! Weight redistribution for the three signal channels.
//!
//! The form keeps the voice, SMS and data weights summing to [`TOTAL_WEIGHT`].
//! Editing one channel assigns it the new value and splits whatever is left
//! evenly across the other two, discarding their previous ratio. The edited
//! channel becomes *locked*: the other two are reported as non-editable until
//! [`WeightEditor::unlock`] is called. The lock is advisory; the editor itself
//! accepts edits on any channel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sum every redistributed [`WeightSet`] adds up to.
pub const TOTAL_WEIGHT: f64 = 100.0;

/// Per-channel weight of a freshly created form.
pub const INITIAL_WEIGHT: f64 = 33.33;

/// Errors raised while interpreting weight input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeightError {
    #[error("Unknown channel '{0}'. Use voice, sms, or data.")]
    UnknownChannel(String),
}

/// One of the three signal channels that can be weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Voice,
    Sms,
    Data,
}

impl Channel {
    /// All channels in display order.
    pub const ALL: [Channel; 3] = [Channel::Voice, Channel::Sms, Channel::Data];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Voice => "voice",
            Channel::Sms => "sms",
            Channel::Data => "data",
        }
    }

    /// Capitalised name used in form labels ("Weight for Voice:").
    pub fn label(self) -> &'static str {
        match self {
            Channel::Voice => "Voice",
            Channel::Sms => "Sms",
            Channel::Data => "Data",
        }
    }

    /// The two channels that absorb the remainder when `self` is edited.
    pub fn others(self) -> [Channel; 2] {
        match self {
            Channel::Voice => [Channel::Sms, Channel::Data],
            Channel::Sms => [Channel::Voice, Channel::Data],
            Channel::Data => [Channel::Voice, Channel::Sms],
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "voice" => Ok(Channel::Voice),
            "sms" => Ok(Channel::Sms),
            "data" => Ok(Channel::Data),
            other => Err(WeightError::UnknownChannel(other.to_string())),
        }
    }
}

/// Voice/SMS/data weights as sent to the analysis backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub voice: f64,
    pub sms: f64,
    pub data: f64,
}

impl WeightSet {
    pub const fn new(voice: f64, sms: f64, data: f64) -> Self {
        Self { voice, sms, data }
    }

    /// Equal, unnormalised weights used when custom weighting is off.
    ///
    /// The backend treats these as ratios, not percentages.
    pub const fn neutral() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Voice => self.voice,
            Channel::Sms => self.sms,
            Channel::Data => self.data,
        }
    }

    fn with(mut self, channel: Channel, value: f64) -> Self {
        match channel {
            Channel::Voice => self.voice = value,
            Channel::Sms => self.sms = value,
            Channel::Data => self.data = value,
        }
        self
    }

    pub fn total(&self) -> f64 {
        self.voice + self.sms + self.data
    }

    /// Assign `value` to `channel` and split the remainder evenly across the
    /// other two channels.
    ///
    /// `value` is clamped to `[0, TOTAL_WEIGHT]` first (see [`clamp_weight`]),
    /// so the result always sums to [`TOTAL_WEIGHT`] and never holds a
    /// negative share.
    pub fn redistribute(self, channel: Channel, value: f64) -> Self {
        let value = clamp_weight(value);
        let share = (TOTAL_WEIGHT - value) / 2.0;
        let [a, b] = channel.others();
        self.with(channel, value).with(a, share).with(b, share)
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        Self::new(INITIAL_WEIGHT, INITIAL_WEIGHT, INITIAL_WEIGHT)
    }
}

/// Bring a raw edit into `[0, TOTAL_WEIGHT]`.
///
/// NaN (what an emptied numeric input parses to) becomes 0.
pub fn clamp_weight(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, TOTAL_WEIGHT)
    }
}

/// Which channel, if any, is currently being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockState {
    locked: Option<Channel>,
}

impl LockState {
    pub fn unlocked() -> Self {
        Self::default()
    }

    pub fn locked_to(channel: Channel) -> Self {
        Self {
            locked: Some(channel),
        }
    }

    pub fn locked(&self) -> Option<Channel> {
        self.locked
    }

    /// A channel is editable when nothing is locked or it holds the lock.
    pub fn is_editable(&self, channel: Channel) -> bool {
        self.locked.map_or(true, |locked| locked == channel)
    }
}

/// Weights together with the lock of the channel under edit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightEditor {
    weights: WeightSet,
    lock: LockState,
}

impl WeightEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> WeightSet {
        self.weights
    }

    pub fn lock(&self) -> LockState {
        self.lock
    }

    pub fn locked(&self) -> Option<Channel> {
        self.lock.locked()
    }

    pub fn is_editable(&self, channel: Channel) -> bool {
        self.lock.is_editable(channel)
    }

    /// Edit one channel: redistribute and lock it.
    pub fn set_weight(&self, channel: Channel, value: f64) -> Self {
        Self {
            weights: self.weights.redistribute(channel, value),
            lock: LockState::locked_to(channel),
        }
    }

    /// Release the lock so every channel can be edited again.
    pub fn unlock(&self) -> Self {
        Self {
            weights: self.weights,
            lock: LockState::unlocked(),
        }
    }
}
