//! Integration tests for the gesture engines.
//!
//! These drive each engine through the scenarios a real screen produces and
//! check the progress invariants with property tests.

use proptest::prelude::*;

use valentine_core::engine::{
    DragConfig, DragEngine, HoldConfig, HoldEngine, Point, ProgressEngine, ProximityEngine,
    SingleBodyConfig, TraceConfig, TwoBodyConfig,
};
use valentine_core::{Event, GestureKind, GestureSample, PatienceConfig, PatienceTimer, ProgressStatus};

fn sample(x: f64, y: f64, t: u64) -> GestureSample {
    GestureSample::new(x, y, t)
}

#[test]
fn test_hold_fills_seventeen_and_a_half_percent_in_25_ticks() {
    let mut engine = HoldEngine::new(HoldConfig::propose());
    engine.start(0);
    for i in 1..=25 {
        engine.tick(i * 25);
    }
    assert!((engine.progress().value() - 0.175).abs() < 1e-9);
    assert_eq!(engine.progress().status(), ProgressStatus::Active);
}

#[test]
fn test_hold_completes_on_tick_143() {
    let mut engine = HoldEngine::new(HoldConfig::propose());
    engine.start(0);
    let mut completed_on = None;
    for i in 1..=200u64 {
        if let Some(Event::GestureCompleted { .. }) = engine.tick(i * 25) {
            completed_on = Some(i);
            break;
        }
    }
    assert_eq!(completed_on, Some(143));
    assert_eq!(engine.progress().value(), 1.0);
    assert_eq!(engine.progress().completed_at_ms(), Some(143 * 25));
}

#[test]
fn test_hold_release_decays_and_repress_resumes() {
    let mut engine = HoldEngine::new(HoldConfig::hug());
    engine.start(0);
    for i in 1..=50 {
        engine.tick(i * 25);
    }
    let held = engine.progress().value();
    engine.end(1250);
    assert_eq!(engine.progress().status(), ProgressStatus::Decaying);
    for i in 51..=60 {
        engine.tick(i * 25);
    }
    let decayed = engine.progress().value();
    assert!(decayed < held);
    assert!((held - decayed - 0.03).abs() < 1e-9);

    engine.start(1500);
    assert_eq!(engine.progress().status(), ProgressStatus::Active);
    assert_eq!(engine.progress().value(), decayed);
    assert_eq!(engine.progress().peak_value(), held);
}

#[test]
fn test_hold_decay_never_completes() {
    let mut engine = HoldEngine::new(HoldConfig::propose());
    engine.start(0);
    for i in 1..=140 {
        engine.tick(i * 25);
    }
    engine.end(3500);
    let mut settled = false;
    for i in 141..=500u64 {
        match engine.tick(i * 25) {
            Some(Event::GestureCompleted { .. }) => panic!("decay must not complete"),
            Some(Event::GestureSettled { .. }) => settled = true,
            _ => {}
        }
    }
    assert!(settled);
    assert_eq!(engine.progress().status(), ProgressStatus::Idle);
    assert_eq!(engine.progress().value(), 0.0);
}

#[test]
fn test_drag_170_of_200_completes() {
    let mut engine = DragEngine::new(DragConfig::default());
    engine.press(sample(0.0, 0.0, 0));
    let event = engine.motion(sample(170.0, 0.0, 2000));
    assert!(matches!(
        event,
        Some(Event::GestureCompleted {
            gesture: GestureKind::Drag,
            at_ms: 2000
        })
    ));
    assert_eq!(engine.progress().value(), 1.0);
    assert!(engine.progress().is_complete());
}

#[test]
fn test_drag_threshold_forgiveness() {
    let mut engine = DragEngine::new(DragConfig::default());
    engine.press(sample(10.0, 0.0, 0));
    engine.motion(sample(10.0 + 0.86 * 200.0, 0.0, 1000));
    assert_eq!(engine.progress().value(), 1.0);
    assert_eq!(engine.progress().status(), ProgressStatus::Complete);
}

#[test]
fn test_drag_release_keeps_value() {
    let mut engine = DragEngine::new(DragConfig::default());
    engine.press(sample(0.0, 0.0, 0));
    engine.motion(sample(100.0, 0.0, 1000));
    engine.release(sample(100.0, 0.0, 1100));
    assert_eq!(engine.progress().value(), 0.5);
    assert!(!engine.is_dragging());

    // Dragging backwards never lowers the value.
    engine.press(sample(100.0, 0.0, 1200));
    engine.motion(sample(20.0, 0.0, 2200));
    assert_eq!(engine.progress().value(), 0.5);
}

#[test]
fn test_chocolate_resists_fast_drags() {
    let mut slow = DragEngine::new(DragConfig::chocolate());
    slow.press(sample(0.0, 0.0, 0));
    slow.motion(sample(50.0, 0.0, 1000));

    let mut fast = DragEngine::new(DragConfig::chocolate());
    fast.press(sample(0.0, 0.0, 0));
    fast.motion(sample(50.0, 0.0, 10));
    assert!(fast.is_resisting());

    assert!(fast.progress().value() < slow.progress().value());
    assert!((slow.progress().value() - 0.25).abs() < 1e-9);
}

#[test]
fn test_trace_reveals_words_in_stages() {
    let mut engine = DragEngine::trace(TraceConfig::default());
    assert_eq!(engine.kind(), GestureKind::Trace);
    engine.hover(sample(0.25 * 384.0, 0.0, 100));
    assert_eq!(engine.revealed_words(), 2);
    engine.hover(sample(0.1 * 384.0, 0.0, 200));
    assert_eq!(engine.revealed_words(), 2);
    let event = engine.hover(sample(384.0, 0.0, 300));
    assert!(matches!(event, Some(Event::GestureCompleted { .. })));
    assert_eq!(engine.revealed_words(), 6);
}

#[test]
fn test_kiss_merges_once_and_stays_merged() {
    let cfg = TwoBodyConfig::default();
    let mut engine = ProximityEngine::two_body(cfg.clone(), Point::ORIGIN);
    assert_eq!(engine.gap(), cfg.separation);

    engine.track(sample(100.0, 0.0, 0));
    assert!(!engine.progress().is_complete());
    assert!(engine.gap() > 12.8);

    let event = engine.track(sample(10.0, 0.0, 100));
    assert!(engine.closeness() > 0.92);
    assert!(matches!(event, Some(Event::GestureCompleted { .. })));

    assert!(engine.track(sample(5.0, 0.0, 200)).is_none());
    engine.track(sample(230.0, 0.0, 300));
    assert!(engine.leave(400).is_none());
    assert!(engine.progress().is_complete());
    assert_eq!(engine.progress().value(), 1.0);
}

#[test]
fn test_kiss_leave_resets_pose() {
    let cfg = TwoBodyConfig::default();
    let mut engine = ProximityEngine::two_body(cfg.clone(), Point::ORIGIN);
    engine.track(sample(60.0, 0.0, 0));
    assert!(engine.gap() < cfg.separation);
    let event = engine.leave(100);
    assert!(matches!(event, Some(Event::GestureLeft { .. })));
    assert_eq!(engine.gap(), cfg.separation);
    assert_eq!(engine.closeness(), 0.0);
    assert_eq!(engine.progress().status(), ProgressStatus::Idle);
}

#[test]
fn test_teddy_drop_inside_zone_hugs() {
    let mut engine = ProximityEngine::single_body(SingleBodyConfig::default(), Point::ORIGIN);
    engine.press(sample(0.0, 180.0, 0));
    engine.track(sample(10.0, 30.0, 400));
    let event = engine.release(sample(10.0, 30.0, 500));
    assert!(matches!(event, Some(Event::GestureCompleted { .. })));
    assert_eq!(engine.body(), Point::ORIGIN);
}

#[test]
fn test_teddy_missed_drop_springs_back() {
    let cfg = SingleBodyConfig::default();
    let mut engine = ProximityEngine::single_body(cfg.clone(), Point::ORIGIN);
    engine.press(sample(0.0, 180.0, 0));
    engine.track(sample(0.0, 100.0, 200));
    engine.release(sample(0.0, 100.0, 300));
    assert_eq!(engine.progress().status(), ProgressStatus::Decaying);

    engine.tick(300 + cfg.return_ms / 2);
    assert!(engine.body().y > 100.0 && engine.body().y < cfg.rest.y);

    let event = engine.tick(300 + cfg.return_ms);
    assert!(matches!(event, Some(Event::GestureSettled { .. })));
    assert_eq!(engine.body(), cfg.rest);
    assert!(!engine.progress().is_complete());
}

#[test]
fn test_patience_fires_once_per_idle_period() {
    let mut timer = PatienceTimer::new(&PatienceConfig::default(), 0);
    assert!(timer.poll(4999).is_none());
    assert!(timer.poll(5000).is_some());
    assert!(timer.poll(9000).is_none());

    assert!(matches!(
        timer.interact(9100),
        Some(Event::PatienceHintCleared { at_ms: 9100 })
    ));
    assert!(timer.poll(14_099).is_none());
    assert!(timer.poll(14_100).is_some());

    timer.disable(15_000);
    timer.interact(15_100);
    assert!(timer.poll(60_000).is_none());
}

#[derive(Debug, Clone)]
enum HoldOp {
    Start,
    End,
    Tick,
}

fn hold_op() -> impl Strategy<Value = HoldOp> {
    prop_oneof![Just(HoldOp::Start), Just(HoldOp::End), Just(HoldOp::Tick), Just(HoldOp::Tick)]
}

proptest! {
    #[test]
    fn prop_hold_value_stays_in_unit_range(ops in prop::collection::vec(hold_op(), 0..400)) {
        let mut engine = HoldEngine::new(HoldConfig::propose());
        for (i, op) in ops.iter().enumerate() {
            let now = i as u64 * 25;
            match op {
                HoldOp::Start => { engine.start(now); }
                HoldOp::End => { engine.end(now); }
                HoldOp::Tick => { engine.tick(now); }
            }
            let v = engine.progress().value();
            prop_assert!((0.0..=1.0).contains(&v));
            if engine.progress().is_complete() {
                prop_assert_eq!(v, 1.0);
            }
        }
    }

    #[test]
    fn prop_drag_value_is_monotonic(xs in prop::collection::vec(-500.0f64..500.0, 1..100)) {
        let mut engine = DragEngine::new(DragConfig::chocolate());
        engine.press(sample(0.0, 0.0, 0));
        let mut last = 0.0;
        for (i, x) in xs.iter().enumerate() {
            engine.motion(sample(*x, 0.0, (i as u64 + 1) * 16));
            let v = engine.progress().value();
            prop_assert!(v >= last);
            prop_assert!((0.0..=1.0).contains(&v));
            last = v;
        }
    }

    #[test]
    fn prop_proximity_never_nan(x in prop::num::f64::ANY, y in prop::num::f64::ANY) {
        let mut engine = ProximityEngine::two_body(TwoBodyConfig::default(), Point::ORIGIN);
        engine.track(sample(x, y, 10));
        let v = engine.progress().value();
        prop_assert!(v.is_finite());
        prop_assert!((0.0..=1.0).contains(&v));
        prop_assert!(engine.closeness().is_finite());
    }
}
