//! # Valentine Week Core Library
//!
//! Gesture-to-progress engines for an eight-day Valentine's countdown. Each
//! day unlocks one pointer/touch micro-interaction whose bounded progress
//! drives a narrative reveal. Rendering is left to the caller; this crate
//! exposes the state and the values a render layer needs.
//!
//! ## Architecture
//!
//! - **Engines**: tick-driven state machines (hold, drag/trace, proximity,
//!   tap) that turn input samples into a [`ProgressState`]
//! - **Day Screen**: hosts one engine with its patience timer, tick
//!   subscription and reveal schedule
//! - **Reveal**: pure functions from progress to opacity, colour and copy
//! - **Journey**: in-memory record of completed days and the week's mood
//!
//! ## Key Components
//!
//! - [`DayScreen`]: a mounted day
//! - [`TickSource`]: shared ticker with scoped subscriptions
//! - [`Config`]: tuning configuration management
//! - [`Event`]: everything the engines and host report

pub mod config;
pub mod days;
pub mod emotion;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod journey;
pub mod patience;
pub mod progress;
pub mod reveal;
pub mod ticker;

pub use config::Config;
pub use days::{day, days, Day, DayPreset};
pub use emotion::{EmotionalState, Palette};
pub use engine::{
    DragEngine, GestureKind, HoldEngine, Point, ProgressEngine, ProximityEngine, TapEngine,
};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use host::{CompletionListener, CompletionNotice, DayScreen, RenderState};
pub use journey::Journey;
pub use patience::{PatienceConfig, PatienceTimer};
pub use progress::{GestureSample, ProgressState, ProgressStatus};
pub use ticker::{TickSource, TickSubscription};
