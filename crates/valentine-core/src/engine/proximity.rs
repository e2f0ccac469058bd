//! Proximity/merge engine.
//!
//! Distance between the pointer and a centre point becomes `closeness`.
//! Two variants:
//!
//! - **Two-body**: two anchors resting `separation` apart slide toward each
//!   other as closeness rises. Completion is keyed off the gap between them,
//!   and happens exactly once.
//! - **Single-body**: one dragged body must be dropped inside a capture
//!   radius around the centre. Dropped elsewhere it springs back to rest.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GestureKind, ProgressEngine};
use crate::events::Event;
use crate::progress::{unit_ratio, GestureSample, ProgressState, ProgressStatus};
use crate::reveal::ease_out_cubic;

/// A 2D offset relative to the engine's centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoBodyConfig {
    /// Pointer distance from centre at which closeness reaches 0.
    #[serde(default = "default_two_body_radius")]
    pub max_radius: f64,
    /// Resting distance between the anchors.
    #[serde(default = "default_separation")]
    pub separation: f64,
    /// Share of half the separation each anchor covers at full closeness.
    #[serde(default = "default_approach_factor")]
    pub approach_factor: f64,
    /// Sideways drift of both anchors following the pointer.
    #[serde(default = "default_sway_x")]
    pub sway_x: f64,
    #[serde(default = "default_sway_y")]
    pub sway_y: f64,
    /// Merge once the gap drops below this share of `separation`.
    #[serde(default = "default_merge_gap_ratio")]
    pub merge_gap_ratio: f64,
    #[serde(default = "default_two_body_reveal_delay")]
    pub reveal_delay_ms: u64,
}

fn default_two_body_radius() -> f64 {
    240.0
}
fn default_separation() -> f64 {
    160.0
}
fn default_approach_factor() -> f64 {
    1.0
}
fn default_sway_x() -> f64 {
    15.0
}
fn default_sway_y() -> f64 {
    20.0
}
fn default_merge_gap_ratio() -> f64 {
    0.08
}
fn default_two_body_reveal_delay() -> u64 {
    1500
}

impl Default for TwoBodyConfig {
    fn default() -> Self {
        Self {
            max_radius: default_two_body_radius(),
            separation: default_separation(),
            approach_factor: default_approach_factor(),
            sway_x: default_sway_x(),
            sway_y: default_sway_y(),
            merge_gap_ratio: default_merge_gap_ratio(),
            reveal_delay_ms: default_two_body_reveal_delay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleBodyConfig {
    /// Body distance from centre at which closeness reaches 0.
    #[serde(default = "default_single_body_radius")]
    pub max_radius: f64,
    /// Dropping the body closer than this completes the gesture.
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f64,
    /// Where the body sits before being dragged.
    #[serde(default = "default_rest")]
    pub rest: Point,
    /// Duration of the spring back to rest.
    #[serde(default = "default_return_ms")]
    pub return_ms: u64,
    #[serde(default = "default_single_body_reveal_delay")]
    pub reveal_delay_ms: u64,
}

fn default_single_body_radius() -> f64 {
    300.0
}
fn default_capture_radius() -> f64 {
    60.0
}
fn default_rest() -> Point {
    Point::new(0.0, 180.0)
}
fn default_return_ms() -> u64 {
    1500
}
fn default_single_body_reveal_delay() -> u64 {
    800
}

impl Default for SingleBodyConfig {
    fn default() -> Self {
        Self {
            max_radius: default_single_body_radius(),
            capture_radius: default_capture_radius(),
            rest: default_rest(),
            return_ms: default_return_ms(),
            reveal_delay_ms: default_single_body_reveal_delay(),
        }
    }
}

#[derive(Debug, Clone)]
enum Mode {
    TwoBody(TwoBodyConfig),
    SingleBody(SingleBodyConfig),
}

#[derive(Debug, Clone, Copy)]
struct Grab {
    pointer: Point,
    body: Point,
}

#[derive(Debug, Clone, Copy)]
struct Return {
    from: Point,
    started_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ProximityEngine {
    mode: Mode,
    /// Viewport position everything is measured from.
    center: Point,
    state: ProgressState,
    closeness: f64,
    left: Point,
    right: Point,
    body: Point,
    grab: Option<Grab>,
    returning: Option<Return>,
}

impl ProximityEngine {
    pub fn two_body(config: TwoBodyConfig, center: Point) -> Self {
        let half = config.separation / 2.0;
        Self {
            left: Point::new(-half, 0.0),
            right: Point::new(half, 0.0),
            body: Point::ORIGIN,
            ..Self::empty(Mode::TwoBody(config), center)
        }
    }

    pub fn single_body(config: SingleBodyConfig, center: Point) -> Self {
        let rest = config.rest;
        let mut engine = Self {
            body: rest,
            ..Self::empty(Mode::SingleBody(config), center)
        };
        engine.closeness = engine.body_closeness();
        engine
    }

    fn empty(mode: Mode, center: Point) -> Self {
        Self {
            mode,
            center,
            state: ProgressState::new(),
            closeness: 0.0,
            left: Point::ORIGIN,
            right: Point::ORIGIN,
            body: Point::ORIGIN,
            grab: None,
            returning: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn closeness(&self) -> f64 {
        self.closeness
    }

    /// Distance between the two anchors (two-body) or between the body and
    /// the centre (single-body).
    pub fn gap(&self) -> f64 {
        match self.mode {
            Mode::TwoBody(_) => self.left.distance(self.right),
            Mode::SingleBody(_) => self.body.length(),
        }
    }

    pub fn anchors(&self) -> (Point, Point) {
        (self.left, self.right)
    }

    pub fn body(&self) -> Point {
        self.body
    }

    pub fn is_grabbed(&self) -> bool {
        self.grab.is_some()
    }

    pub fn reveal_delay_ms(&self) -> u64 {
        match &self.mode {
            Mode::TwoBody(cfg) => cfg.reveal_delay_ms,
            Mode::SingleBody(cfg) => cfg.reveal_delay_ms,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Grab the body. Two-body engines treat a press like a move.
    pub fn press(&mut self, sample: GestureSample) -> Option<Event> {
        if matches!(self.mode, Mode::TwoBody(_)) {
            return self.track(sample);
        }
        if self.state.is_complete() || !sample.is_finite() {
            return None;
        }
        self.returning = None;
        self.grab = Some(Grab {
            pointer: Point::new(sample.x, sample.y),
            body: self.body,
        });
        self.state.activate(sample.timestamp_ms);
        Some(Event::GestureStarted {
            gesture: GestureKind::Proximity,
            value: self.state.value(),
            at_ms: sample.timestamp_ms,
        })
    }

    /// Pointer moved.
    pub fn track(&mut self, sample: GestureSample) -> Option<Event> {
        if self.state.is_complete() || !sample.is_finite() {
            return None;
        }
        match self.mode.clone() {
            Mode::TwoBody(cfg) => self.track_two_body(&cfg, sample),
            Mode::SingleBody(_) => {
                let grab = self.grab?;
                let pointer = Point::new(sample.x, sample.y);
                self.body = Point::new(
                    grab.body.x + pointer.x - grab.pointer.x,
                    grab.body.y + pointer.y - grab.pointer.y,
                );
                self.closeness = self.body_closeness();
                self.state.set_value(self.closeness);
                None
            }
        }
    }

    /// Drop the body. Inside the capture radius this completes; otherwise
    /// the body starts springing back to rest.
    pub fn release(&mut self, sample: GestureSample) -> Option<Event> {
        let cfg = match &self.mode {
            Mode::SingleBody(cfg) => cfg.clone(),
            Mode::TwoBody(_) => return None,
        };
        if self.state.is_complete() {
            return None;
        }
        self.grab.take()?;
        let now = sample.timestamp_ms;

        if self.body.length() < cfg.capture_radius {
            self.body = Point::ORIGIN;
            self.closeness = 1.0;
            self.state.complete(now);
            info!(at_ms = now, "body captured");
            return Some(Event::GestureCompleted {
                gesture: GestureKind::Proximity,
                at_ms: now,
            });
        }

        self.returning = Some(Return {
            from: self.body,
            started_at_ms: now,
        });
        self.state.set_status(ProgressStatus::Decaying);
        debug!(gap = self.gap(), "body released outside capture radius");
        Some(Event::GestureReleased {
            gesture: GestureKind::Proximity,
            value: self.state.value(),
            at_ms: now,
        })
    }

    /// Pointer left the interaction area. Resets the pose unless merged.
    pub fn leave(&mut self, now_ms: u64) -> Option<Event> {
        if self.state.is_complete() {
            return None;
        }
        let half = match &self.mode {
            Mode::TwoBody(cfg) => cfg.separation / 2.0,
            Mode::SingleBody(_) => {
                // Losing the pointer mid-drag drops the body where it is.
                let at = GestureSample::new(self.body.x, self.body.y, now_ms);
                return self.release(at);
            }
        };
        self.left = Point::new(-half, 0.0);
        self.right = Point::new(half, 0.0);
        self.closeness = 0.0;
        self.state.set_value(0.0);
        self.state.set_status(ProgressStatus::Idle);
        Some(Event::GestureLeft {
            gesture: GestureKind::Proximity,
            at_ms: now_ms,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn track_two_body(&mut self, cfg: &TwoBodyConfig, sample: GestureSample) -> Option<Event> {
        let offset = Point::new(sample.x - self.center.x, sample.y - self.center.y);
        self.closeness = 1.0 - unit_ratio(offset.length(), cfg.max_radius);
        if cfg.max_radius <= 0.0 || !cfg.max_radius.is_finite() {
            self.closeness = 0.0;
        }
        let sway_x = unit_signed(offset.x, cfg.max_radius) * cfg.sway_x;
        let sway_y = unit_signed(offset.y, cfg.max_radius) * cfg.sway_y;

        let half = cfg.separation / 2.0;
        let approach = (self.closeness * half * cfg.approach_factor).clamp(0.0, half.max(0.0));
        self.left = Point::new(-half + approach + sway_x, sway_y);
        self.right = Point::new(half - approach + sway_x, sway_y);

        let gap = self.gap();
        let proximity = 1.0 - unit_ratio(gap, cfg.separation);
        if cfg.separation > 0.0 {
            self.state.set_value(proximity);
        }

        let mut event = None;
        if self.state.status() == ProgressStatus::Idle {
            self.state.activate(sample.timestamp_ms);
            event = Some(Event::GestureStarted {
                gesture: GestureKind::Proximity,
                value: self.state.value(),
                at_ms: sample.timestamp_ms,
            });
        }

        if cfg.separation > 0.0 && gap < cfg.merge_gap_ratio * cfg.separation {
            self.state.complete(sample.timestamp_ms);
            self.left = Point::ORIGIN;
            self.right = Point::ORIGIN;
            info!(at_ms = sample.timestamp_ms, gap, "anchors merged");
            return Some(Event::GestureCompleted {
                gesture: GestureKind::Proximity,
                at_ms: sample.timestamp_ms,
            });
        }
        event
    }

    fn body_closeness(&self) -> f64 {
        match &self.mode {
            Mode::SingleBody(cfg) => {
                if cfg.max_radius <= 0.0 || !cfg.max_radius.is_finite() {
                    return 0.0;
                }
                1.0 - unit_ratio(self.body.length(), cfg.max_radius)
            }
            Mode::TwoBody(_) => self.closeness,
        }
    }
}

/// `value / scale` clamped to `[-1, 1]`, or 0 for a degenerate scale.
fn unit_signed(value: f64, scale: f64) -> f64 {
    if !scale.is_finite() || scale <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / scale).clamp(-1.0, 1.0)
}

impl ProgressEngine for ProximityEngine {
    fn kind(&self) -> GestureKind {
        GestureKind::Proximity
    }

    fn progress(&self) -> &ProgressState {
        &self.state
    }

    /// Animates the spring back to rest after a missed drop.
    fn tick(&mut self, now_ms: u64) -> Option<Event> {
        let (Mode::SingleBody(cfg), Some(ret)) = (&self.mode, self.returning) else {
            return None;
        };
        let elapsed = now_ms.saturating_sub(ret.started_at_ms);
        let t = if cfg.return_ms == 0 {
            1.0
        } else {
            (elapsed as f64 / cfg.return_ms as f64).min(1.0)
        };
        let eased = ease_out_cubic(t);
        let rest = cfg.rest;
        self.body = Point::new(
            ret.from.x + (rest.x - ret.from.x) * eased,
            ret.from.y + (rest.y - ret.from.y) * eased,
        );
        self.closeness = self.body_closeness();
        self.state.set_value(self.closeness);

        if t >= 1.0 {
            self.returning = None;
            self.state.set_status(ProgressStatus::Idle);
            return Some(Event::GestureSettled {
                gesture: GestureKind::Proximity,
                at_ms: now_ms,
            });
        }
        None
    }

    fn is_animating(&self) -> bool {
        self.returning.is_some()
    }
}
