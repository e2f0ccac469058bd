//! Gesture progress engines.
//!
//! Each engine is a tick-driven state machine with no internal thread or
//! timer. The host feeds it input samples and calls `tick()` at the
//! configured interval; the engine answers with an optional [`Event`].
//!
//! ```text
//! Idle -> Active -> (Decaying -> Idle | Complete)
//! ```
//!
//! `Complete` is terminal for every engine.

mod drag;
mod hold;
mod proximity;
mod tap;

pub use drag::{DragConfig, DragEngine, ResistanceConfig, TraceConfig};
pub use hold::{HoldConfig, HoldEngine};
pub use proximity::{Point, ProximityEngine, SingleBodyConfig, TwoBodyConfig};
pub use tap::{TapConfig, TapEngine};

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::progress::{ProgressState, ProgressStatus};

/// Gesture family an engine belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Hold,
    Drag,
    Trace,
    Proximity,
    Tap,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Hold => "hold",
            GestureKind::Drag => "drag",
            GestureKind::Trace => "trace",
            GestureKind::Proximity => "proximity",
            GestureKind::Tap => "tap",
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by every engine, used by the day screen host.
pub trait ProgressEngine {
    fn kind(&self) -> GestureKind;

    fn progress(&self) -> &ProgressState;

    /// Advance one fixed tick. Engines that only react to input return `None`.
    fn tick(&mut self, now_ms: u64) -> Option<Event>;

    /// Whether ticking can still change anything.
    fn is_animating(&self) -> bool {
        matches!(
            self.progress().status(),
            ProgressStatus::Active | ProgressStatus::Decaying
        )
    }
}
