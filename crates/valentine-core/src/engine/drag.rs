//! Drag- and trace-to-reveal engine.
//!
//! Horizontal travel is turned into progress that only ever moves forward:
//! pulling back, releasing or re-pressing never lowers the value. Reaching
//! `complete_threshold` snaps the value to 1.
//!
//! Two input styles share the engine:
//!
//! - **Drag**: a press anchors the gesture, moves while pressed advance it.
//!   With [`ResistanceConfig`] set, fast moves only count for a fraction of
//!   their distance.
//! - **Trace**: plain hover across a fixed zone; no press required.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{GestureKind, ProgressEngine};
use crate::events::Event;
use crate::progress::{unit_ratio, GestureSample, ProgressState, ProgressStatus};

/// Slows progress down when the pointer moves too fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceConfig {
    /// Speed in px per 100 ms above which resistance applies.
    #[serde(default = "default_speed_threshold")]
    pub speed_threshold: f64,
    /// Share of the travelled distance that still counts when resisting.
    #[serde(default = "default_fast_multiplier")]
    pub fast_multiplier: f64,
}

fn default_speed_threshold() -> f64 {
    15.0
}
fn default_fast_multiplier() -> f64 {
    // 0.001 per px against the normal 0.003
    1.0 / 3.0
}

impl Default for ResistanceConfig {
    fn default() -> Self {
        Self {
            speed_threshold: default_speed_threshold(),
            fast_multiplier: default_fast_multiplier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Pixels of travel that map to full progress.
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
    #[serde(default = "default_drag_threshold")]
    pub complete_threshold: f64,
    #[serde(default)]
    pub resistance: Option<ResistanceConfig>,
    #[serde(default = "default_drag_reveal_delay")]
    pub reveal_delay_ms: u64,
}

fn default_max_distance() -> f64 {
    200.0
}
fn default_drag_threshold() -> f64 {
    0.85
}
fn default_drag_reveal_delay() -> u64 {
    500
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            max_distance: default_max_distance(),
            complete_threshold: default_drag_threshold(),
            resistance: None,
            reveal_delay_ms: default_drag_reveal_delay(),
        }
    }
}

impl DragConfig {
    /// Chocolate day: unwrap 200 px, done at 85%, fast pulls resisted.
    pub fn chocolate() -> Self {
        Self {
            resistance: Some(ResistanceConfig::default()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Left edge of the trace zone in viewport px.
    #[serde(default)]
    pub zone_left: f64,
    #[serde(default = "default_zone_width")]
    pub zone_width: f64,
    #[serde(default = "default_trace_threshold")]
    pub complete_threshold: f64,
    /// Progress at which each word of the promise appears.
    #[serde(default = "default_word_thresholds")]
    pub word_thresholds: Vec<f64>,
    #[serde(default = "default_trace_reveal_delay")]
    pub reveal_delay_ms: u64,
}

fn default_zone_width() -> f64 {
    384.0
}
fn default_trace_threshold() -> f64 {
    1.0
}
fn default_word_thresholds() -> Vec<f64> {
    vec![0.0, 0.15, 0.30, 0.45, 0.65, 0.85]
}
fn default_trace_reveal_delay() -> u64 {
    1000
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            zone_left: 0.0,
            zone_width: default_zone_width(),
            complete_threshold: default_trace_threshold(),
            word_thresholds: default_word_thresholds(),
            reveal_delay_ms: default_trace_reveal_delay(),
        }
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Drag(DragConfig),
    Trace(TraceConfig),
}

#[derive(Debug, Clone)]
pub struct DragEngine {
    mode: Mode,
    state: ProgressState,
    anchor_x: Option<f64>,
    last: Option<GestureSample>,
    /// Resisted distance accumulated while pressed.
    travelled: f64,
    /// Latest speed in px per 100 ms.
    speed: f64,
}

impl DragEngine {
    pub fn new(config: DragConfig) -> Self {
        Self::with_mode(Mode::Drag(config))
    }

    pub fn trace(config: TraceConfig) -> Self {
        Self::with_mode(Mode::Trace(config))
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            state: ProgressState::new(),
            anchor_x: None,
            last: None,
            travelled: 0.0,
            speed: 0.0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_dragging(&self) -> bool {
        self.anchor_x.is_some()
    }

    pub fn anchor_x(&self) -> Option<f64> {
        self.anchor_x
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The last move was fast enough to be resisted.
    pub fn is_resisting(&self) -> bool {
        match &self.mode {
            Mode::Drag(DragConfig {
                resistance: Some(r), ..
            }) => self.is_dragging() && self.speed > r.speed_threshold,
            _ => false,
        }
    }

    /// Number of promise words visible at the current progress.
    pub fn revealed_words(&self) -> usize {
        match &self.mode {
            Mode::Trace(cfg) => {
                crate::reveal::revealed_count(self.state.value(), &cfg.word_thresholds)
            }
            Mode::Drag(_) => 0,
        }
    }

    pub fn reveal_delay_ms(&self) -> u64 {
        match &self.mode {
            Mode::Drag(cfg) => cfg.reveal_delay_ms,
            Mode::Trace(cfg) => cfg.reveal_delay_ms,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pointer/touch pressed. In trace mode this is just another hover.
    pub fn press(&mut self, sample: GestureSample) -> Option<Event> {
        let cfg = match &self.mode {
            Mode::Trace(_) => return self.hover(sample),
            Mode::Drag(cfg) => cfg,
        };
        if self.state.is_complete() || !sample.is_finite() {
            return None;
        }
        self.anchor_x = Some(sample.x);
        self.last = Some(sample);
        self.travelled = self.state.value() * cfg.max_distance;
        self.speed = 0.0;
        self.state.activate(sample.timestamp_ms);
        debug!(anchor_x = sample.x, value = self.state.value(), "drag started");
        Some(Event::GestureStarted {
            gesture: GestureKind::Drag,
            value: self.state.value(),
            at_ms: sample.timestamp_ms,
        })
    }

    /// Pointer moved while pressed. In trace mode any move counts.
    pub fn motion(&mut self, sample: GestureSample) -> Option<Event> {
        let cfg = match &self.mode {
            Mode::Trace(_) => return self.hover(sample),
            Mode::Drag(cfg) => cfg.clone(),
        };
        if self.state.is_complete() {
            return None;
        }
        let (Some(anchor_x), Some(last)) = (self.anchor_x, self.last) else {
            return None;
        };
        if !sample.is_finite() {
            trace!("ignoring non-finite drag sample");
            return None;
        }

        let dx = sample.x - last.x;
        let dt = sample.timestamp_ms.saturating_sub(last.timestamp_ms).max(1);
        self.speed = dx.abs() / dt as f64 * 100.0;
        self.last = Some(sample);

        let progress = match &cfg.resistance {
            Some(resistance) => {
                let multiplier = if self.speed > resistance.speed_threshold {
                    resistance.fast_multiplier
                } else {
                    1.0
                };
                self.travelled = (self.travelled + dx * multiplier).max(0.0);
                unit_ratio(self.travelled, cfg.max_distance)
            }
            None => unit_ratio(sample.x - anchor_x, cfg.max_distance),
        };
        self.advance(progress, cfg.complete_threshold, sample.timestamp_ms)
    }

    /// Pointer released. Progress stays where it is.
    pub fn release(&mut self, sample: GestureSample) -> Option<Event> {
        if matches!(self.mode, Mode::Trace(_)) || self.state.is_complete() {
            return None;
        }
        self.anchor_x.take()?;
        self.last = None;
        self.speed = 0.0;
        self.state.set_status(ProgressStatus::Idle);
        debug!(value = self.state.value(), "drag released");
        Some(Event::GestureReleased {
            gesture: GestureKind::Drag,
            value: self.state.value(),
            at_ms: sample.timestamp_ms,
        })
    }

    /// Hover across the trace zone. Ignored in drag mode.
    pub fn hover(&mut self, sample: GestureSample) -> Option<Event> {
        let cfg = match &self.mode {
            Mode::Trace(cfg) => cfg,
            Mode::Drag(_) => return None,
        };
        if self.state.is_complete() || !sample.is_finite() {
            return None;
        }
        let progress = unit_ratio(sample.x - cfg.zone_left, cfg.zone_width);
        let threshold = cfg.complete_threshold;
        let first = self.state.status() == ProgressStatus::Idle && progress > 0.0;
        if first {
            self.state.activate(sample.timestamp_ms);
        }
        let event = self.advance(progress, threshold, sample.timestamp_ms);
        if event.is_none() && first {
            return Some(Event::GestureStarted {
                gesture: GestureKind::Trace,
                value: self.state.value(),
                at_ms: sample.timestamp_ms,
            });
        }
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, progress: f64, threshold: f64, now_ms: u64) -> Option<Event> {
        self.state.raise_value(progress);
        if self.state.value() >= threshold {
            self.state.complete(now_ms);
            self.anchor_x = None;
            self.last = None;
            info!(at_ms = now_ms, gesture = %self.kind(), "reveal complete");
            return Some(Event::GestureCompleted {
                gesture: self.kind(),
                at_ms: now_ms,
            });
        }
        None
    }
}

impl ProgressEngine for DragEngine {
    fn kind(&self) -> GestureKind {
        match self.mode {
            Mode::Drag(_) => GestureKind::Drag,
            Mode::Trace(_) => GestureKind::Trace,
        }
    }

    fn progress(&self) -> &ProgressState {
        &self.state
    }

    /// Progress is driven purely by input.
    fn tick(&mut self, _now_ms: u64) -> Option<Event> {
        None
    }

    fn is_animating(&self) -> bool {
        false
    }
}
