//! Idle/patience timer.
//!
//! Watches for a stretch of inactivity and surfaces a gentle hint. The hint
//! fires at most once per idle period; the next input clears it and starts a
//! new period. Once the owning engine completes the timer is disabled for
//! good.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatienceConfig {
    /// Inactivity before the hint appears.
    #[serde(default = "default_window")]
    pub window_ms: u64,
}

fn default_window() -> u64 {
    5000
}

impl Default for PatienceConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window(),
        }
    }
}

impl PatienceConfig {
    /// Shorter window used by the shared hook when no day overrides it.
    pub fn brief() -> Self {
        Self { window_ms: 4500 }
    }
}

#[derive(Debug, Clone)]
pub struct PatienceTimer {
    window_ms: u64,
    last_interaction_ms: u64,
    visible: bool,
    fired: bool,
    disabled: bool,
}

impl PatienceTimer {
    /// Start watching from `now_ms` (screen mount).
    pub fn new(config: &PatienceConfig, now_ms: u64) -> Self {
        Self {
            window_ms: config.window_ms,
            last_interaction_ms: now_ms,
            visible: false,
            fired: false,
            disabled: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn last_interaction_ms(&self) -> u64 {
        self.last_interaction_ms
    }

    /// Record qualifying input. Hides the hint if it was showing.
    pub fn interact(&mut self, now_ms: u64) -> Option<Event> {
        self.last_interaction_ms = self.last_interaction_ms.max(now_ms);
        self.fired = false;
        self.hide(now_ms)
    }

    /// Check the clock. Returns the hint event when the window has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<Event> {
        if self.disabled || self.fired {
            return None;
        }
        let idle_ms = now_ms.saturating_sub(self.last_interaction_ms);
        if idle_ms < self.window_ms {
            return None;
        }
        self.fired = true;
        self.visible = true;
        debug!(idle_ms, "patience hint shown");
        Some(Event::PatienceHintShown {
            idle_ms,
            at_ms: now_ms,
        })
    }

    /// Stop for good, hiding the hint if needed.
    pub fn disable(&mut self, now_ms: u64) -> Option<Event> {
        self.disabled = true;
        self.hide(now_ms)
    }

    fn hide(&mut self, now_ms: u64) -> Option<Event> {
        if !self.visible {
            return None;
        }
        self.visible = false;
        Some(Event::PatienceHintCleared { at_ms: now_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer() -> PatienceTimer {
        PatienceTimer::new(&PatienceConfig::brief(), 0)
    }

    #[test]
    fn fires_after_window() {
        let mut t = timer();
        assert!(t.poll(4499).is_none());
        assert!(matches!(
            t.poll(4500),
            Some(Event::PatienceHintShown { idle_ms: 4500, .. })
        ));
        assert!(t.is_visible());
    }

    #[test]
    fn fires_once_per_idle_period() {
        let mut t = timer();
        assert!(t.poll(5000).is_some());
        assert!(t.poll(6000).is_none());
        assert!(t.poll(60_000).is_none());
    }

    #[test]
    fn input_clears_and_restarts_window() {
        let mut t = timer();
        t.poll(5000);
        assert!(matches!(
            t.interact(5100),
            Some(Event::PatienceHintCleared { .. })
        ));
        assert!(!t.is_visible());
        assert!(t.poll(9000).is_none());
        assert!(t.poll(9600).is_some());
    }

    #[test]
    fn input_before_firing_resets_window() {
        let mut t = timer();
        assert!(t.interact(4000).is_none());
        assert!(t.poll(5000).is_none());
        assert!(t.poll(8500).is_some());
    }

    #[test]
    fn disabled_timer_never_fires() {
        let mut t = timer();
        t.poll(4600);
        assert!(t.disable(4700).is_some());
        t.interact(4800);
        assert!(t.poll(20_000).is_none());
        assert!(!t.is_visible());
    }
}
