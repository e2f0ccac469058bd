//! Tap-to-accumulate engine.
//!
//! The first tap starts a fixed-rate climb to 1 that needs no further input.
//! Later taps are ignored. With `options > 0` the engine expects the tap to
//! pick one of several choices, and remembers which.
//!
//! A non-zero `settle_ms` makes the climb follow the clock instead of the
//! tick count, so it takes the same time at any tick interval.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GestureKind, ProgressEngine};
use crate::error::ValidationError;
use crate::events::Event;
use crate::progress::{unit_ratio, ProgressState, ProgressStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapConfig {
    #[serde(default = "default_rate")]
    pub rate_per_tick: f64,
    /// Number of selectable options; 0 means a plain tap anywhere.
    #[serde(default)]
    pub options: usize,
    /// Time from the tap to completion. 0 falls back to `rate_per_tick`.
    #[serde(default)]
    pub settle_ms: u64,
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: u64,
}

fn default_rate() -> f64 {
    0.004
}
fn default_reveal_delay() -> u64 {
    2200
}

impl Default for TapConfig {
    fn default() -> Self {
        Self::valentine()
    }
}

impl TapConfig {
    /// Valentine's day: the points of the week converge after one tap.
    pub fn valentine() -> Self {
        Self {
            rate_per_tick: default_rate(),
            options: 0,
            settle_ms: 0,
            reveal_delay_ms: default_reveal_delay(),
        }
    }

    /// Rose day: pick one of three roses, settle over 2.8 s.
    pub fn rose() -> Self {
        Self {
            rate_per_tick: default_rate(),
            options: 3,
            settle_ms: 2800,
            reveal_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TapEngine {
    config: TapConfig,
    state: ProgressState,
    choice: Option<usize>,
}

impl TapEngine {
    pub fn new(config: TapConfig) -> Self {
        Self {
            config,
            state: ProgressState::new(),
            choice: None,
        }
    }

    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    pub fn choice(&self) -> Option<usize> {
        self.choice
    }

    /// Tap/click anywhere. Only the first one does anything.
    pub fn tap(&mut self, now_ms: u64) -> Option<Event> {
        if self.state.status() != ProgressStatus::Idle {
            return None;
        }
        self.state.activate(now_ms);
        debug!(at_ms = now_ms, "tap started convergence");
        Some(Event::GestureStarted {
            gesture: GestureKind::Tap,
            value: self.state.value(),
            at_ms: now_ms,
        })
    }

    /// Tap one of the configured options.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `option` is not one of the configured choices.
    pub fn select(&mut self, option: usize, now_ms: u64) -> Result<Option<Event>, ValidationError> {
        if option >= self.config.options {
            return Err(ValidationError::OutOfBounds {
                collection: "options".into(),
                index: option,
                len: self.config.options,
            });
        }
        if self.state.status() != ProgressStatus::Idle {
            return Ok(None);
        }
        self.choice = Some(option);
        self.tap(now_ms);
        Ok(Some(Event::OptionSelected {
            option,
            at_ms: now_ms,
        }))
    }
}

impl ProgressEngine for TapEngine {
    fn kind(&self) -> GestureKind {
        GestureKind::Tap
    }

    fn progress(&self) -> &ProgressState {
        &self.state
    }

    fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if self.state.status() != ProgressStatus::Active {
            return None;
        }
        let next = match (self.config.settle_ms, self.state.started_at_ms()) {
            (0, _) | (_, None) => (self.state.value() + self.config.rate_per_tick).min(1.0),
            (settle_ms, Some(started)) => unit_ratio(
                now_ms.saturating_sub(started) as f64,
                settle_ms as f64,
            )
            .max(self.state.value()),
        };
        self.state.set_value(next);
        if self.state.value() >= 1.0 {
            self.state.complete(now_ms);
            info!(at_ms = now_ms, "convergence complete");
            return Some(Event::GestureCompleted {
                gesture: GestureKind::Tap,
                at_ms: now_ms,
            });
        }
        None
    }
}
