use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::GestureKind;
use crate::progress::ProgressState;

/// Every state change in an engine or day screen produces an Event.
/// The render layer reacts to them; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Engine left `Idle` (or resumed from `Decaying`).
    GestureStarted {
        gesture: GestureKind,
        value: f64,
        at_ms: u64,
    },
    /// Input released before completion.
    GestureReleased {
        gesture: GestureKind,
        value: f64,
        at_ms: u64,
    },
    /// Decay or return-to-rest finished; the engine is idle again.
    GestureSettled {
        gesture: GestureKind,
        at_ms: u64,
    },
    /// Pointer left the interaction area and the engine reset its pose.
    GestureLeft {
        gesture: GestureKind,
        at_ms: u64,
    },
    /// The engine reached `Complete`. Emitted exactly once.
    GestureCompleted {
        gesture: GestureKind,
        at_ms: u64,
    },
    /// A discrete option was chosen (rose selection).
    OptionSelected {
        option: usize,
        at_ms: u64,
    },
    PatienceHintShown {
        idle_ms: u64,
        at_ms: u64,
    },
    PatienceHintCleared {
        at_ms: u64,
    },
    /// The narrative message for the day is now visible.
    MessageRevealed {
        day: u8,
        at_ms: u64,
    },
    StateSnapshot {
        day: u8,
        gesture: GestureKind,
        progress: ProgressState,
        hint_visible: bool,
        message_visible: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::GestureStarted { .. } => "GestureStarted",
            Event::GestureReleased { .. } => "GestureReleased",
            Event::GestureSettled { .. } => "GestureSettled",
            Event::GestureLeft { .. } => "GestureLeft",
            Event::GestureCompleted { .. } => "GestureCompleted",
            Event::OptionSelected { .. } => "OptionSelected",
            Event::PatienceHintShown { .. } => "PatienceHintShown",
            Event::PatienceHintCleared { .. } => "PatienceHintCleared",
            Event::MessageRevealed { .. } => "MessageRevealed",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
