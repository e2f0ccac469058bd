//! Which days have been completed this session.
//!
//! Lives in memory only. Share it behind `Rc<RefCell<_>>` and mark days from
//! a screen's completion listener; it folds each completed day's mood into
//! the journey's emotional state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::days;
use crate::emotion::{day_emotion, EmotionalState};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    completed: BTreeSet<u8>,
}

impl Journey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed day. Returns `false` if it was already recorded.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDay` for ids outside the registry.
    pub fn mark_complete(&mut self, day: u8) -> Result<bool> {
        days::day(day)?;
        let inserted = self.completed.insert(day);
        if inserted {
            debug!(day, total = self.completed.len(), "journey day completed");
        }
        Ok(inserted)
    }

    pub fn is_complete(&self, day: u8) -> bool {
        self.completed.contains(&day)
    }

    /// Completed day ids in ascending order.
    pub fn completed_days(&self) -> impl Iterator<Item = u8> + '_ {
        self.completed.iter().copied()
    }

    /// Fraction of the week completed.
    pub fn completion(&self) -> f64 {
        self.completed.len() as f64 / days::days().len() as f64
    }

    /// Mood after easing through each completed day's signature in order.
    pub fn emotional_state(&self) -> EmotionalState {
        let mut state = self
            .completed
            .iter()
            .filter_map(|&day| day_emotion(day))
            .fold(EmotionalState::INITIAL, |state, target| {
                state.blend(&target, 1.0)
            });
        state.completion = self.completion();
        state
    }
}
