//! Day screen host.
//!
//! A [`DayScreen`] is one mounted day: it owns the engine for the day's
//! gesture, the patience timer, a tick subscription and the message reveal
//! schedule. Input is routed to the engine; every call returns the events it
//! produced, in order.
//!
//! Dropping the screen drops its [`TickSubscription`], so the shared
//! [`TickSource`] stops ticking it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::days::{self, Day, DayPreset, PROMISE_WORDS};
use crate::engine::{
    DragEngine, GestureKind, HoldEngine, Point, ProgressEngine, ProximityEngine, TapEngine,
};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::patience::PatienceTimer;
use crate::progress::{GestureSample, ProgressState};
use crate::reveal;
use crate::ticker::{TickSource, TickSubscription};

/// Handed to the completion listener when a day's gesture completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub day: u8,
    pub gesture: GestureKind,
    pub completed_at_ms: u64,
    pub reveal_at_ms: u64,
}

/// Presentation values for the current frame of a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub title_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_offset_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_px: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constellation: Vec<Point>,
    /// Message lines, once revealed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message: Vec<&'static str>,
}

/// Receives a notice exactly once per mounted screen.
pub trait CompletionListener {
    fn on_complete(&mut self, notice: &CompletionNotice);
}

impl<F> CompletionListener for F
where
    F: FnMut(&CompletionNotice),
{
    fn on_complete(&mut self, notice: &CompletionNotice) {
        self(notice)
    }
}

enum Gesture {
    Hold(HoldEngine),
    Drag(DragEngine),
    Proximity(ProximityEngine),
    Tap(TapEngine),
}

impl Gesture {
    fn for_preset(preset: DayPreset, config: &Config) -> Self {
        match preset {
            DayPreset::Propose => Gesture::Hold(HoldEngine::new(config.hold.propose.clone())),
            DayPreset::Hug => Gesture::Hold(HoldEngine::new(config.hold.hug.clone())),
            DayPreset::Chocolate => Gesture::Drag(DragEngine::new(config.drag.chocolate.clone())),
            DayPreset::Promise => Gesture::Drag(DragEngine::trace(config.trace.promise.clone())),
            DayPreset::Kiss => Gesture::Proximity(ProximityEngine::two_body(
                config.proximity.kiss.clone(),
                Point::ORIGIN,
            )),
            DayPreset::Teddy => Gesture::Proximity(ProximityEngine::single_body(
                config.proximity.teddy.clone(),
                Point::ORIGIN,
            )),
            DayPreset::Valentine => Gesture::Tap(TapEngine::new(config.tap.valentine.clone())),
            DayPreset::Rose => Gesture::Tap(TapEngine::new(config.tap.rose.clone())),
        }
    }

    fn engine(&self) -> &dyn ProgressEngine {
        match self {
            Gesture::Hold(e) => e,
            Gesture::Drag(e) => e,
            Gesture::Proximity(e) => e,
            Gesture::Tap(e) => e,
        }
    }

    fn engine_mut(&mut self) -> &mut dyn ProgressEngine {
        match self {
            Gesture::Hold(e) => e,
            Gesture::Drag(e) => e,
            Gesture::Proximity(e) => e,
            Gesture::Tap(e) => e,
        }
    }
}

pub struct DayScreen {
    day: &'static Day,
    gesture: Gesture,
    patience: PatienceTimer,
    ticks: TickSubscription,
    reveal_delay_ms: u64,
    reveal_at_ms: Option<u64>,
    revealed: bool,
    listener: Option<Box<dyn CompletionListener>>,
}

impl std::fmt::Debug for DayScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayScreen")
            .field("day", &self.day.id)
            .field("progress", self.progress())
            .field("reveal_at_ms", &self.reveal_at_ms)
            .field("revealed", &self.revealed)
            .finish_non_exhaustive()
    }
}

impl DayScreen {
    /// Mount a day at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDay` if `day_id` is not in the registry, or a config
    /// error if `config` fails validation.
    pub fn mount(day_id: u8, config: &Config, source: &TickSource, now_ms: u64) -> Result<Self> {
        let day = days::day(day_id)?;
        config.validate()?;
        debug!(day = day_id, preset = ?day.preset, "day screen mounted");
        Ok(Self {
            day,
            gesture: Gesture::for_preset(day.preset, config),
            patience: PatienceTimer::new(&config.patience, now_ms),
            ticks: source.subscribe(config.tick_ms, now_ms),
            reveal_delay_ms: config.reveal_delay_ms(day.preset),
            reveal_at_ms: None,
            revealed: false,
            listener: None,
        })
    }

    /// Attach the completion listener.
    pub fn with_listener(mut self, listener: impl CompletionListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn day(&self) -> &'static Day {
        self.day
    }

    pub fn gesture(&self) -> GestureKind {
        self.gesture.engine().kind()
    }

    pub fn progress(&self) -> &ProgressState {
        self.gesture.engine().progress()
    }

    pub fn is_hint_visible(&self) -> bool {
        self.patience.is_visible()
    }

    pub fn is_message_visible(&self) -> bool {
        self.revealed
    }

    pub fn reveal_at_ms(&self) -> Option<u64> {
        self.reveal_at_ms
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.ticks.interval_ms()
    }

    /// Hold engine, for the propose/hug render layer.
    pub fn hold(&self) -> Option<&HoldEngine> {
        match &self.gesture {
            Gesture::Hold(e) => Some(e),
            _ => None,
        }
    }

    /// Drag or trace engine.
    pub fn drag(&self) -> Option<&DragEngine> {
        match &self.gesture {
            Gesture::Drag(e) => Some(e),
            _ => None,
        }
    }

    pub fn proximity(&self) -> Option<&ProximityEngine> {
        match &self.gesture {
            Gesture::Proximity(e) => Some(e),
            _ => None,
        }
    }

    pub fn tap_engine(&self) -> Option<&TapEngine> {
        match &self.gesture {
            Gesture::Tap(e) => Some(e),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            day: self.day.id,
            gesture: self.gesture(),
            progress: self.progress().clone(),
            hint_visible: self.is_hint_visible(),
            message_visible: self.is_message_visible(),
            at: Utc::now(),
        }
    }

    /// What the render layer should draw right now.
    pub fn render(&self) -> RenderState {
        let state = self.progress();
        let value = state.value();
        let preset = self.day.preset;
        let mut render = RenderState {
            title_opacity: reveal::title_opacity(state),
            hint: reveal::hint_copy(preset, state),
            glow: None,
            wrapper_offset_px: None,
            blur_px: None,
            words: Vec::new(),
            constellation: Vec::new(),
            message: Vec::new(),
        };
        match &self.gesture {
            Gesture::Hold(_) => render.glow = Some(reveal::warmth_glow(value).to_css()),
            Gesture::Drag(e) if preset == DayPreset::Promise => {
                render.words = PROMISE_WORDS.iter().take(e.revealed_words()).copied().collect();
            }
            Gesture::Drag(_) => render.wrapper_offset_px = Some(reveal::wrapper_offset_px(value)),
            Gesture::Proximity(e) if preset == DayPreset::Kiss => {
                render.blur_px = Some(reveal::merge_blur_px(e.closeness()));
            }
            Gesture::Tap(_) if preset == DayPreset::Valentine => {
                render.constellation = reveal::CONSTELLATION
                    .iter()
                    .map(|&p| reveal::converge(p, value))
                    .collect();
            }
            _ => {}
        }
        if self.revealed {
            render.message = self.day.message.to_vec();
        }
        render
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, sample: GestureSample) -> Vec<Event> {
        let mut events = self.interact(sample.timestamp_ms);
        let event = match &mut self.gesture {
            Gesture::Hold(e) => e.start(sample.timestamp_ms),
            Gesture::Drag(e) => e.press(sample),
            Gesture::Proximity(e) => e.press(sample),
            Gesture::Tap(e) => Self::plain_tap(e, sample.timestamp_ms),
        };
        events.extend(event);
        self.settle(sample.timestamp_ms, &mut events);
        events
    }

    pub fn pointer_move(&mut self, sample: GestureSample) -> Vec<Event> {
        let mut events = self.interact(sample.timestamp_ms);
        let event = match &mut self.gesture {
            Gesture::Hold(_) | Gesture::Tap(_) => None,
            Gesture::Drag(e) => e.motion(sample),
            Gesture::Proximity(e) => e.track(sample),
        };
        events.extend(event);
        self.settle(sample.timestamp_ms, &mut events);
        events
    }

    pub fn pointer_up(&mut self, sample: GestureSample) -> Vec<Event> {
        let mut events = self.interact(sample.timestamp_ms);
        let event = match &mut self.gesture {
            Gesture::Hold(e) => e.end(sample.timestamp_ms),
            Gesture::Drag(e) => e.release(sample),
            Gesture::Proximity(e) => e.release(sample),
            Gesture::Tap(_) => None,
        };
        events.extend(event);
        self.settle(sample.timestamp_ms, &mut events);
        events
    }

    /// Tap or click with no position. Days that need a specific choice
    /// ignore it; use [`DayScreen::select`] there.
    pub fn tap(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.interact(now_ms);
        if let Gesture::Tap(e) = &mut self.gesture {
            events.extend(Self::plain_tap(e, now_ms));
        }
        self.settle(now_ms, &mut events);
        events
    }

    /// Choose one of the day's options.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` for days without options and
    /// `OutOfBounds` for an option the day doesn't offer.
    pub fn select(&mut self, option: usize, now_ms: u64) -> Result<Vec<Event>> {
        if !matches!(&self.gesture, Gesture::Tap(e) if e.config().options > 0) {
            return Err(ValidationError::UnsupportedOperation {
                operation: "select".into(),
                gesture: self.gesture().to_string(),
            }
            .into());
        }
        let mut events = Vec::new();
        self.catch_up(now_ms, &mut events);
        let selected = match &mut self.gesture {
            Gesture::Tap(engine) => engine.select(option, now_ms)?,
            _ => None,
        };
        events.extend(self.patience.interact(now_ms));
        events.extend(selected);
        self.settle(now_ms, &mut events);
        Ok(events)
    }

    /// Key press. No day reacts to keys, but they count as activity for
    /// the patience window.
    pub fn key(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.interact(now_ms);
        self.settle(now_ms, &mut events);
        events
    }

    /// Pointer left the interaction area.
    pub fn leave(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        self.catch_up(now_ms, &mut events);
        let event = match &mut self.gesture {
            Gesture::Hold(e) => e.end(now_ms),
            Gesture::Drag(e) => {
                if e.is_dragging() {
                    let at = GestureSample::new(e.anchor_x().unwrap_or(0.0), 0.0, now_ms);
                    e.release(at)
                } else {
                    None
                }
            }
            Gesture::Proximity(e) => e.leave(now_ms),
            Gesture::Tap(_) => None,
        };
        events.extend(event);
        self.settle(now_ms, &mut events);
        events
    }

    /// Deliver every tick that fell due up to `now_ms`, then check the
    /// patience window and the reveal schedule.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        self.catch_up(now_ms, &mut events);
        if !self.progress().is_complete() {
            events.extend(self.patience.poll(now_ms));
        }
        self.poll_reveal(now_ms, &mut events);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn plain_tap(engine: &mut TapEngine, now_ms: u64) -> Option<Event> {
        if engine.config().options > 0 {
            return None;
        }
        engine.tap(now_ms)
    }

    /// Deliver ticks that fell due up to `now_ms`. Ticks that land while the
    /// engine is at rest are dropped, so input never sees stale time.
    fn catch_up(&mut self, now_ms: u64, events: &mut Vec<Event>) {
        for at in self.ticks.due(now_ms) {
            let engine = self.gesture.engine_mut();
            if !engine.is_animating() {
                break;
            }
            events.extend(engine.tick(at));
            self.settle(at, events);
        }
    }

    /// Bring the engine up to `now_ms`, then record the input with the
    /// patience timer.
    fn interact(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        self.catch_up(now_ms, &mut events);
        events.extend(self.patience.interact(now_ms));
        events
    }

    /// Handle a fresh completion: stop the patience timer, notify the
    /// listener and schedule the reveal.
    fn settle(&mut self, now_ms: u64, events: &mut Vec<Event>) {
        if self.reveal_at_ms.is_some() {
            return;
        }
        let Some(completed_at_ms) = self.progress().completed_at_ms() else {
            return;
        };
        events.extend(self.patience.disable(now_ms));
        let reveal_at_ms = completed_at_ms + self.reveal_delay_ms;
        self.reveal_at_ms = Some(reveal_at_ms);
        info!(day = self.day.id, completed_at_ms, reveal_at_ms, "day complete");

        let notice = CompletionNotice {
            day: self.day.id,
            gesture: self.gesture(),
            completed_at_ms,
            reveal_at_ms,
        };
        if let Some(listener) = self.listener.as_mut() {
            listener.on_complete(&notice);
        }
        self.poll_reveal(now_ms, events);
    }

    fn poll_reveal(&mut self, now_ms: u64, events: &mut Vec<Event>) {
        if self.revealed {
            return;
        }
        match self.reveal_at_ms {
            Some(at) if now_ms >= at => {
                self.revealed = true;
                debug!(day = self.day.id, at_ms = now_ms, "message revealed");
                events.push(Event::MessageRevealed {
                    day: self.day.id,
                    at_ms: now_ms,
                });
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mount(day: u8) -> (TickSource, DayScreen) {
        let source = TickSource::new();
        let screen = DayScreen::mount(day, &Config::default(), &source, 0).unwrap();
        (source, screen)
    }

    #[test]
    fn mount_picks_engine_for_day() {
        assert_eq!(mount(2).1.gesture(), GestureKind::Hold);
        assert_eq!(mount(3).1.gesture(), GestureKind::Drag);
        assert_eq!(mount(5).1.gesture(), GestureKind::Trace);
        assert_eq!(mount(7).1.gesture(), GestureKind::Proximity);
        assert_eq!(mount(8).1.gesture(), GestureKind::Tap);
    }

    #[test]
    fn mount_rejects_unknown_day() {
        let source = TickSource::new();
        assert!(DayScreen::mount(9, &Config::default(), &source, 0).is_err());
        assert_eq!(source.active_subscriptions(), 0);
    }

    #[test]
    fn drop_releases_tick_subscription() {
        let (source, screen) = mount(2);
        assert_eq!(source.active_subscriptions(), 1);
        drop(screen);
        assert_eq!(source.active_subscriptions(), 0);
    }

    #[test]
    fn drag_completion_schedules_reveal() {
        let (_source, mut screen) = mount(3);
        screen.pointer_down(GestureSample::new(0.0, 0.0, 0));
        let mut t = 0;
        let mut x = 0.0;
        while !screen.progress().is_complete() {
            t += 100;
            x += 10.0;
            screen.pointer_move(GestureSample::new(x, 0.0, t));
        }
        let reveal_at = screen.reveal_at_ms().unwrap();
        assert_eq!(reveal_at, t + 500);
        assert!(screen.tick(reveal_at - 1).is_empty());
        let events = screen.tick(reveal_at);
        assert!(events.contains(&Event::MessageRevealed {
            day: 3,
            at_ms: reveal_at
        }));
        assert!(screen.tick(reveal_at + 1000).is_empty());
    }

    #[test]
    fn listener_called_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let source = TickSource::new();
        let mut screen = DayScreen::mount(8, &Config::default(), &source, 0)
            .unwrap()
            .with_listener(move |n: &CompletionNotice| sink.borrow_mut().push(n.clone()));
        screen.tap(0);
        screen.tick(10_000);
        screen.tap(10_001);
        screen.tick(20_000);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].day, 8);
        assert_eq!(seen[0].reveal_at_ms, seen[0].completed_at_ms + 2200);
    }

    #[test]
    fn select_only_on_rose() {
        let (_s, mut rose) = mount(1);
        assert!(rose.tap(0).is_empty());
        assert!(rose.select(5, 0).is_err());
        let events = rose.select(1, 0).unwrap();
        assert!(events.contains(&Event::OptionSelected { option: 1, at_ms: 0 }));
        assert_eq!(rose.tap_engine().unwrap().choice(), Some(1));

        let (_s, mut hug) = mount(6);
        assert!(hug.select(0, 0).is_err());
    }

    #[test]
    fn render_follows_day() {
        let (_s, mut promise) = mount(5);
        promise.pointer_move(GestureSample::new(0.5 * 384.0, 0.0, 10));
        let render = promise.render();
        assert_eq!(render.words, vec!["I", "promise", "to", "keep"]);
        assert!(render.message.is_empty());

        let (_s, mut hug) = mount(6);
        assert_eq!(hug.render().hint, Some("Press and hold"));
        hug.pointer_down(GestureSample::new(0.0, 0.0, 0));
        hug.tick(6000);
        let render = hug.render();
        assert_eq!(render.title_opacity, 0.0);
        assert!(render.glow.is_some());
        assert_eq!(render.message, vec!["That warmth?", "That's you."]);
    }

    #[test]
    fn patience_hint_then_cleared_by_input() {
        let (_s, mut screen) = mount(6);
        let events = screen.tick(5000);
        assert!(matches!(events.as_slice(), [Event::PatienceHintShown { .. }]));
        assert!(screen.is_hint_visible());
        let events = screen.pointer_down(GestureSample::new(0.0, 0.0, 5100));
        assert!(matches!(events[0], Event::PatienceHintCleared { at_ms: 5100 }));
        assert!(!screen.is_hint_visible());
    }

    #[test]
    fn late_press_only_fills_from_the_press() {
        let (_s, mut screen) = mount(2);
        screen.pointer_down(GestureSample::new(0.0, 0.0, 10_000));
        screen.tick(10_025);
        assert!((screen.progress().value() - 0.007).abs() < 1e-12);
        assert_eq!(screen.progress().status(), crate::ProgressStatus::Active);
        assert!(screen.progress().completed_at_ms().is_none());
    }

    #[test]
    fn held_ticks_land_before_release() {
        let (_s, mut screen) = mount(2);
        screen.pointer_down(GestureSample::new(0.0, 0.0, 0));
        let events = screen.pointer_up(GestureSample::new(0.0, 0.0, 250));
        assert!(matches!(events.as_slice(), [Event::GestureReleased { .. }]));
        assert!((screen.progress().value() - 0.07).abs() < 1e-12);
    }

    #[test]
    fn key_press_resets_patience() {
        let (_s, mut screen) = mount(6);
        assert!(screen.key(4000).is_empty());
        assert!(screen.tick(5000).is_empty());
        assert!(!screen.is_hint_visible());
        let events = screen.tick(9000);
        assert!(matches!(events.as_slice(), [Event::PatienceHintShown { .. }]));
        let events = screen.key(9100);
        assert!(matches!(events.as_slice(), [Event::PatienceHintCleared { at_ms: 9100 }]));
        assert_eq!(screen.progress().value(), 0.0);
    }

    #[test]
    fn rose_settle_time_ignores_tick_interval() {
        let mut config = Config::default();
        config.tick_ms = 50;
        let source = TickSource::new();
        let mut screen = DayScreen::mount(1, &config, &source, 0).unwrap();
        screen.select(0, 1000).unwrap();
        screen.tick(3750);
        assert!(!screen.progress().is_complete());
        screen.tick(3800);
        assert_eq!(screen.progress().completed_at_ms(), Some(3800));
    }
}
