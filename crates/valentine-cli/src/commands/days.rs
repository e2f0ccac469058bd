use clap::Subcommand;
use serde::Serialize;
use valentine_core::{Day, GestureKind};

#[derive(Subcommand)]
pub enum DaysAction {
    /// List the eight days
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one day, including its message
    Show {
        /// Day number (1-8)
        id: u8,
    },
}

#[derive(Serialize)]
struct DayView<'a> {
    #[serde(flatten)]
    day: &'a Day,
    date: String,
    gesture: GestureKind,
}

impl<'a> DayView<'a> {
    fn new(day: &'a Day) -> Self {
        Self {
            day,
            date: day.date_label(),
            gesture: day.gesture(),
        }
    }
}

pub fn run(action: DaysAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DaysAction::List { json } => {
            let days = valentine_core::days();
            if json {
                let views: Vec<DayView> = days.iter().map(DayView::new).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                for day in days {
                    println!(
                        "{}  {:<6}  {} {:<16} {}",
                        day.id,
                        day.date_label(),
                        day.emoji,
                        day.name,
                        day.gesture()
                    );
                }
            }
        }
        DaysAction::Show { id } => {
            let day = valentine_core::day(id)?;
            println!("{}", serde_json::to_string_pretty(&DayView::new(day))?);
        }
    }
    Ok(())
}
