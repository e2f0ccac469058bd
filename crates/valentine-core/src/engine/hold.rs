//! Hold-to-fill engine.
//!
//! Pressing fills the value at `fill_per_tick`; releasing lets it fall at
//! `decay_per_tick`. The two rates are independent. Re-pressing while the
//! value decays resumes filling from wherever it is. Completion only happens
//! while filling.
//!
//! ```text
//! Idle -start-> Active -end-> Decaying -(value = 0)-> Idle
//!                  |  ^----start----'
//!                  '-(value = 1)-> Complete
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GestureKind, ProgressEngine};
use crate::events::Event;
use crate::progress::{ProgressState, ProgressStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldConfig {
    /// Value added per tick while pressed.
    #[serde(default = "default_fill")]
    pub fill_per_tick: f64,
    /// Value removed per tick after release.
    #[serde(default = "default_decay")]
    pub decay_per_tick: f64,
    /// Delay between completion and the message reveal.
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: u64,
}

fn default_fill() -> f64 {
    0.007
}
fn default_decay() -> f64 {
    0.004
}
fn default_reveal_delay() -> u64 {
    1000
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self::propose()
    }
}

impl HoldConfig {
    /// Propose day: 0.7% per tick up, 0.4% per tick down.
    pub fn propose() -> Self {
        Self {
            fill_per_tick: default_fill(),
            decay_per_tick: default_decay(),
            reveal_delay_ms: default_reveal_delay(),
        }
    }

    /// Hug day: a slow build with an even slower fade.
    pub fn hug() -> Self {
        Self {
            fill_per_tick: 0.006,
            decay_per_tick: 0.003,
            reveal_delay_ms: 1400,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HoldEngine {
    config: HoldConfig,
    state: ProgressState,
}

impl HoldEngine {
    pub fn new(config: HoldConfig) -> Self {
        Self {
            config,
            state: ProgressState::new(),
        }
    }

    pub fn config(&self) -> &HoldConfig {
        &self.config
    }

    pub fn is_holding(&self) -> bool {
        self.state.status() == ProgressStatus::Active
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pointer/touch pressed.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        match self.state.status() {
            ProgressStatus::Complete | ProgressStatus::Active => None,
            ProgressStatus::Idle | ProgressStatus::Decaying => {
                let resumed = self.state.status() == ProgressStatus::Decaying;
                self.state.activate(now_ms);
                debug!(value = self.state.value(), resumed, "hold started");
                Some(Event::GestureStarted {
                    gesture: GestureKind::Hold,
                    value: self.state.value(),
                    at_ms: now_ms,
                })
            }
        }
    }

    /// Pointer/touch released (or left the target).
    pub fn end(&mut self, now_ms: u64) -> Option<Event> {
        if self.state.status() != ProgressStatus::Active {
            return None;
        }
        if self.state.value() > 0.0 {
            self.state.set_status(ProgressStatus::Decaying);
        } else {
            self.state.set_status(ProgressStatus::Idle);
        }
        debug!(value = self.state.value(), "hold released");
        Some(Event::GestureReleased {
            gesture: GestureKind::Hold,
            value: self.state.value(),
            at_ms: now_ms,
        })
    }
}

impl ProgressEngine for HoldEngine {
    fn kind(&self) -> GestureKind {
        GestureKind::Hold
    }

    fn progress(&self) -> &ProgressState {
        &self.state
    }

    fn tick(&mut self, now_ms: u64) -> Option<Event> {
        match self.state.status() {
            ProgressStatus::Active => {
                let next = (self.state.value() + self.config.fill_per_tick).min(1.0);
                self.state.set_value(next);
                if self.state.value() >= 1.0 {
                    self.state.complete(now_ms);
                    info!(at_ms = now_ms, "hold complete");
                    return Some(Event::GestureCompleted {
                        gesture: GestureKind::Hold,
                        at_ms: now_ms,
                    });
                }
                None
            }
            ProgressStatus::Decaying => {
                let next = (self.state.value() - self.config.decay_per_tick).max(0.0);
                self.state.set_value(next);
                if self.state.value() <= 0.0 {
                    self.state.set_status(ProgressStatus::Idle);
                    return Some(Event::GestureSettled {
                        gesture: GestureKind::Hold,
                        at_ms: now_ms,
                    });
                }
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(engine: &mut HoldEngine, n: u32) -> Vec<Event> {
        (0..n).filter_map(|i| engine.tick(u64::from(i) * 25)).collect()
    }

    #[test]
    fn start_end_cycle() {
        let mut engine = HoldEngine::new(HoldConfig::propose());
        assert_eq!(engine.progress().status(), ProgressStatus::Idle);

        assert!(engine.start(0).is_some());
        assert!(engine.is_holding());
        assert!(engine.start(10).is_none());

        ticks(&mut engine, 10);
        assert!(engine.end(250).is_some());
        assert_eq!(engine.progress().status(), ProgressStatus::Decaying);
        assert!(engine.end(260).is_none());
    }

    #[test]
    fn fills_at_configured_rate() {
        let mut engine = HoldEngine::new(HoldConfig::propose());
        engine.start(0);
        ticks(&mut engine, 25);
        assert!((engine.progress().value() - 0.175).abs() < 1e-9);
    }

    #[test]
    fn decay_reaches_idle_without_completing() {
        let mut engine = HoldEngine::new(HoldConfig::propose());
        engine.start(0);
        ticks(&mut engine, 10);
        engine.end(250);

        let events = ticks(&mut engine, 100);
        assert_eq!(engine.progress().status(), ProgressStatus::Idle);
        assert_eq!(engine.progress().value(), 0.0);
        assert!(matches!(events.as_slice(), [Event::GestureSettled { .. }]));
    }

    #[test]
    fn release_at_zero_goes_straight_to_idle() {
        let mut engine = HoldEngine::new(HoldConfig::hug());
        engine.start(0);
        engine.end(5);
        assert_eq!(engine.progress().status(), ProgressStatus::Idle);
    }

    #[test]
    fn repress_resumes_from_decayed_value() {
        let mut engine = HoldEngine::new(HoldConfig::propose());
        engine.start(0);
        ticks(&mut engine, 50); // 0.35
        engine.end(1250);
        ticks(&mut engine, 25); // -0.1
        let decayed = engine.progress().value();
        assert!((decayed - 0.25).abs() < 1e-9);

        engine.start(2000);
        engine.tick(2025);
        assert!((engine.progress().value() - (decayed + 0.007)).abs() < 1e-9);
    }

    #[test]
    fn asymmetric_rates_are_independent() {
        let mut engine = HoldEngine::new(HoldConfig {
            fill_per_tick: 0.1,
            decay_per_tick: 0.5,
            reveal_delay_ms: 0,
        });
        engine.start(0);
        ticks(&mut engine, 6);
        engine.end(150);
        engine.tick(175);
        assert!((engine.progress().value() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn completion_is_terminal() {
        let mut engine = HoldEngine::new(HoldConfig::propose());
        engine.start(0);
        let events = ticks(&mut engine, 200);
        assert_eq!(events.len(), 1);
        assert!(engine.progress().is_complete());

        assert!(engine.end(6000).is_none());
        assert!(engine.start(6100).is_none());
        assert!(engine.tick(6125).is_none());
        assert_eq!(engine.progress().value(), 1.0);
        assert_eq!(engine.progress().status(), ProgressStatus::Complete);
    }
}
