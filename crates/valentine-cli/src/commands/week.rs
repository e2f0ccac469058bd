use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tracing::info;
use valentine_core::{
    CompletionNotice, Config, DayScreen, EmotionalState, Journey, Palette, TickSource,
};

use super::play::{demo_script, step};

#[derive(Serialize)]
struct WeekReport {
    completed: Vec<u8>,
    completion: f64,
    mood: EmotionalState,
    palette: Palette,
    gradient: String,
}

/// Play every day's demo in order and report the journey's mood.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let source = TickSource::new();
    let journey = Rc::new(RefCell::new(Journey::new()));

    for day in valentine_core::days() {
        let sink = Rc::clone(&journey);
        let mut screen = DayScreen::mount(day.id, &config, &source, 0)?.with_listener(
            move |notice: &CompletionNotice| {
                if sink.borrow_mut().mark_complete(notice.day).is_err() {
                    tracing::warn!(day = notice.day, "completion for unknown day");
                }
            },
        );
        let mut clock = 0;
        for input in demo_script(day.preset) {
            clock = step(&mut screen, &input, clock)?.0;
        }
        info!(day = day.id, complete = screen.progress().is_complete(), "day played");
    }

    let journey = journey.borrow();
    let mood = journey.emotional_state();
    let palette = mood.palette();
    let report = WeekReport {
        completed: journey.completed_days().collect(),
        completion: journey.completion(),
        mood,
        gradient: palette.gradient_css(),
        palette,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
