//! Shared progress model for every gesture engine.
//!
//! A [`ProgressState`] is owned by exactly one engine. Engines mutate it
//! through the crate-private helpers below, which enforce the invariants:
//!
//! - `value` stays inside `[0, 1]` and is never NaN
//! - `Complete` is terminal; `value` is pinned at 1 afterwards
//! - `peak_value` is the high-water mark of `value`

use serde::{Deserialize, Serialize};

/// A single observed pointer/touch event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
}

impl GestureSample {
    pub fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Idle,
    Active,
    /// Input stopped; the value is falling back (hold) or the body is
    /// returning to rest (single-body proximity).
    Decaying,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    value: f64,
    status: ProgressStatus,
    peak_value: f64,
    started_at_ms: Option<u64>,
    completed_at_ms: Option<u64>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressState {
    pub fn new() -> Self {
        Self {
            value: 0.0,
            status: ProgressStatus::Idle,
            peak_value: 0.0,
            started_at_ms: None,
            completed_at_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn status(&self) -> ProgressStatus {
        self.status
    }

    pub fn peak_value(&self) -> f64 {
        self.peak_value
    }

    /// First time the engine became active.
    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn completed_at_ms(&self) -> Option<u64> {
        self.completed_at_ms
    }

    pub fn is_complete(&self) -> bool {
        self.status == ProgressStatus::Complete
    }

    // ── Mutation (engine-private) ────────────────────────────────────

    /// Store a new value, clamped. Ignored once complete.
    pub(crate) fn set_value(&mut self, value: f64) -> f64 {
        if self.is_complete() {
            return self.value;
        }
        self.value = clamp_unit(value);
        if self.value > self.peak_value {
            self.peak_value = self.value;
        }
        self.value
    }

    /// Raise the value but never lower it.
    pub(crate) fn raise_value(&mut self, value: f64) -> f64 {
        let next = clamp_unit(value).max(self.value);
        self.set_value(next)
    }

    pub(crate) fn set_status(&mut self, status: ProgressStatus) {
        if self.is_complete() {
            return;
        }
        self.status = status;
    }

    pub(crate) fn activate(&mut self, now_ms: u64) {
        if self.is_complete() {
            return;
        }
        self.status = ProgressStatus::Active;
        self.started_at_ms.get_or_insert(now_ms);
    }

    /// Pin the value at 1 and enter the terminal state.
    ///
    /// Returns `false` if the state was already complete.
    pub(crate) fn complete(&mut self, now_ms: u64) -> bool {
        if self.is_complete() {
            return false;
        }
        self.value = 1.0;
        self.peak_value = 1.0;
        self.status = ProgressStatus::Complete;
        self.started_at_ms.get_or_insert(now_ms);
        self.completed_at_ms = Some(now_ms);
        true
    }
}

/// Clamp into `[0, 1]`, mapping NaN and infinities to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// `numerator / denominator` clamped into `[0, 1]`.
///
/// A zero, negative or non-finite denominator yields 0 instead of NaN. An
/// overflowing numerator saturates.
pub fn unit_ratio(numerator: f64, denominator: f64) -> f64 {
    if !denominator.is_finite() || denominator <= 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}
