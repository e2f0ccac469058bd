use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use valentine_core::{Config, DayPreset, DayScreen, Event, GestureSample, TickSource};

#[derive(Args)]
pub struct PlayArgs {
    /// Day number (1-8)
    pub day: u8,
    /// JSON file with a list of input events; a built-in demo runs if omitted
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Override the tick interval in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Also print the final render state
    #[arg(long)]
    pub render: bool,
}

/// One scripted input. Pointer coordinates are relative to the day's
/// interaction area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Tap,
    Select { option: usize },
    /// Any key press.
    Key,
    Leave,
    /// Let time pass, delivering ticks.
    Wait { ms: u64 },
}

pub(crate) fn demo_script(preset: DayPreset) -> Vec<InputEvent> {
    use InputEvent::*;
    match preset {
        DayPreset::Rose => vec![Wait { ms: 800 }, Select { option: 1 }, Wait { ms: 3000 }],
        DayPreset::Propose | DayPreset::Hug => vec![
            Down { x: 0.0, y: 0.0 },
            Wait { ms: 1500 },
            Up { x: 0.0, y: 0.0 },
            Wait { ms: 400 },
            Down { x: 0.0, y: 0.0 },
            Wait { ms: 4500 },
            Up { x: 0.0, y: 0.0 },
        ],
        DayPreset::Chocolate => {
            let mut script = vec![Down { x: 0.0, y: 0.0 }];
            for step in 1..=20 {
                script.push(Wait { ms: 100 });
                script.push(Move {
                    x: f64::from(step) * 10.0,
                    y: 0.0,
                });
            }
            script.push(Up { x: 200.0, y: 0.0 });
            script
        }
        DayPreset::Teddy => vec![
            Down { x: 0.0, y: 180.0 },
            Wait { ms: 200 },
            Move { x: 20.0, y: 120.0 },
            Wait { ms: 200 },
            Move { x: 10.0, y: 40.0 },
            Up { x: 10.0, y: 40.0 },
        ],
        DayPreset::Promise => (1..=8)
            .flat_map(|step| {
                [
                    Wait { ms: 120 },
                    Move {
                        x: f64::from(step) * 48.0,
                        y: 0.0,
                    },
                ]
            })
            .collect(),
        DayPreset::Kiss => vec![
            Move { x: 220.0, y: 30.0 },
            Wait { ms: 300 },
            Move { x: 120.0, y: 20.0 },
            Wait { ms: 300 },
            Move { x: 50.0, y: 10.0 },
            Wait { ms: 300 },
            Move { x: 8.0, y: 4.0 },
        ],
        DayPreset::Valentine => vec![Wait { ms: 1000 }, Tap, Wait { ms: 6500 }],
    }
}

fn load_script(path: &Path) -> Result<Vec<InputEvent>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script {}: {e}", path.display()))?;
    let script: Vec<InputEvent> = serde_json::from_str(&content)
        .map_err(|e| format!("invalid script {}: {e}", path.display()))?;
    Ok(script)
}

fn emit(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

/// Apply one input at `clock` and return the new clock.
pub(crate) fn step(
    screen: &mut DayScreen,
    input: &InputEvent,
    clock: u64,
) -> Result<(u64, Vec<Event>), Box<dyn std::error::Error>> {
    let events = match *input {
        InputEvent::Down { x, y } => screen.pointer_down(GestureSample::new(x, y, clock)),
        InputEvent::Move { x, y } => screen.pointer_move(GestureSample::new(x, y, clock)),
        InputEvent::Up { x, y } => screen.pointer_up(GestureSample::new(x, y, clock)),
        InputEvent::Tap => screen.tap(clock),
        InputEvent::Select { option } => screen.select(option, clock)?,
        InputEvent::Key => screen.key(clock),
        InputEvent::Leave => screen.leave(clock),
        InputEvent::Wait { ms } => {
            let until = clock + ms;
            return Ok((until, screen.tick(until)));
        }
    };
    Ok((clock, events))
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }

    let source = TickSource::new();
    let mut screen = DayScreen::mount(args.day, &config, &source, 0)?;

    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => demo_script(screen.day().preset),
    };
    info!(day = args.day, inputs = script.len(), "playing script");

    let mut clock = 0;
    for input in &script {
        let (now, events) = step(&mut screen, input, clock)?;
        clock = now;
        debug!(?input, at_ms = clock, produced = events.len(), "input applied");
        emit(&events)?;
    }

    // Let a scheduled reveal land before reporting.
    if let Some(reveal_at) = screen.reveal_at_ms() {
        if reveal_at > clock {
            emit(&screen.tick(reveal_at))?;
        }
    }

    println!("{}", serde_json::to_string_pretty(&screen.snapshot())?);
    if args.render {
        println!("{}", serde_json::to_string_pretty(&screen.render())?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_core::days;

    #[test]
    fn script_parses_tagged_inputs() {
        let json = r#"[
            {"kind": "down", "x": 0, "y": 0},
            {"kind": "wait", "ms": 100},
            {"kind": "select", "option": 2},
            {"kind": "leave"},
            {"kind": "key"}
        ]"#;
        let script: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(script[0], InputEvent::Down { x: 0.0, y: 0.0 });
        assert_eq!(script[1], InputEvent::Wait { ms: 100 });
        assert_eq!(script[2], InputEvent::Select { option: 2 });
        assert_eq!(script[3], InputEvent::Leave);
        assert_eq!(script[4], InputEvent::Key);
    }

    #[test]
    fn key_input_holds_off_hint() {
        let source = TickSource::new();
        let mut screen = DayScreen::mount(6, &Config::default(), &source, 0).unwrap();
        let script = [
            InputEvent::Wait { ms: 4000 },
            InputEvent::Key,
            InputEvent::Wait { ms: 4000 },
        ];
        let mut clock = 0;
        let mut events = Vec::new();
        for input in &script {
            let (now, produced) = step(&mut screen, input, clock).unwrap();
            clock = now;
            events.extend(produced);
        }
        assert!(events.is_empty());
        assert!(!screen.is_hint_visible());
    }

    #[test]
    fn every_demo_completes() {
        let config = Config::default();
        for day in days() {
            let source = TickSource::new();
            let mut screen = DayScreen::mount(day.id, &config, &source, 0).unwrap();
            let mut clock = 0;
            for input in demo_script(day.preset) {
                clock = step(&mut screen, &input, clock).unwrap().0;
            }
            assert!(screen.progress().is_complete(), "{} demo incomplete", day.name);
        }
    }
}
