//! Day registry: the eight days of the week, read-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::GestureKind;
use crate::error::{CoreError, Result};

/// Which interaction a day uses. Selects the engine and its tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPreset {
    Rose,
    Propose,
    Chocolate,
    Teddy,
    Promise,
    Hug,
    Kiss,
    Valentine,
}

impl DayPreset {
    pub fn gesture(&self) -> GestureKind {
        match self {
            DayPreset::Rose | DayPreset::Valentine => GestureKind::Tap,
            DayPreset::Propose | DayPreset::Hug => GestureKind::Hold,
            DayPreset::Chocolate => GestureKind::Drag,
            DayPreset::Promise => GestureKind::Trace,
            DayPreset::Teddy | DayPreset::Kiss => GestureKind::Proximity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Day {
    pub id: u8,
    pub name: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub emoji: &'static str,
    /// Month and day; the week always runs Feb 7 to Feb 14.
    pub month: u32,
    pub day_of_month: u32,
    pub gradient_from: &'static str,
    pub gradient_to: &'static str,
    pub key_line: &'static str,
    pub preset: DayPreset,
    /// Lines revealed once the interaction completes.
    pub message: &'static [&'static str],
}

impl Day {
    pub fn gesture(&self) -> GestureKind {
        self.preset.gesture()
    }

    /// Calendar date of this day in the given year.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day_of_month)
    }

    /// Short display date, e.g. "Feb 7".
    pub fn date_label(&self) -> String {
        match self.date_in(2025) {
            Some(date) => date.format("%b %-d").to_string(),
            None => String::new(),
        }
    }
}

const DAYS: [Day; 8] = [
    Day {
        id: 1,
        name: "Rose Day",
        title: "Rose Day",
        subtitle: "A rose for every reason I love you",
        emoji: "🌹",
        month: 2,
        day_of_month: 7,
        gradient_from: "from-rose-100",
        gradient_to: "to-pink-50",
        key_line: "Every petal, a reason I love you",
        preset: DayPreset::Rose,
        message: &["Didn't matter which one you chose.", "I was always choosing you."],
    },
    Day {
        id: 2,
        name: "Propose Day",
        title: "Propose Day",
        subtitle: "Hold on to what matters",
        emoji: "💍",
        month: 2,
        day_of_month: 8,
        gradient_from: "from-blue-100",
        gradient_to: "to-indigo-50",
        key_line: "Let's hold on to what matters",
        preset: DayPreset::Propose,
        message: &["This is me choosing you.", "Calmly. Sincerely."],
    },
    Day {
        id: 3,
        name: "Chocolate Day",
        title: "Chocolate Day",
        subtitle: "Unwrap something sweet",
        emoji: "🍫",
        month: 2,
        day_of_month: 9,
        gradient_from: "from-amber-100",
        gradient_to: "to-orange-50",
        key_line: "Sweetness, unwrapped just for you",
        preset: DayPreset::Chocolate,
        message: &["Some things are sweeter", "when you take your time."],
    },
    Day {
        id: 4,
        name: "Teddy Day",
        title: "Teddy Day",
        subtitle: "A little comfort, just for you",
        emoji: "🧸",
        month: 2,
        day_of_month: 10,
        gradient_from: "from-yellow-100",
        gradient_to: "to-amber-50",
        key_line: "Here when you need comfort",
        preset: DayPreset::Teddy,
        message: &["You make things feel safe."],
    },
    Day {
        id: 5,
        name: "Promise Day",
        title: "Promise Day",
        subtitle: "Words that stay",
        emoji: "🤝",
        month: 2,
        day_of_month: 11,
        gradient_from: "from-violet-100",
        gradient_to: "to-purple-50",
        key_line: "These words are my promise",
        preset: DayPreset::Promise,
        message: &["I promise to keep choosing you.", "— and I mean it."],
    },
    Day {
        id: 6,
        name: "Hug Day",
        title: "Hug Day",
        subtitle: "Feel the warmth",
        emoji: "🤗",
        month: 2,
        day_of_month: 12,
        gradient_from: "from-orange-100",
        gradient_to: "to-red-50",
        key_line: "Wrapped in warmth and presence",
        preset: DayPreset::Hug,
        message: &["That warmth?", "That's you."],
    },
    Day {
        id: 7,
        name: "Kiss Day",
        title: "Kiss Day",
        subtitle: "Come a little closer",
        emoji: "💋",
        month: 2,
        day_of_month: 13,
        gradient_from: "from-pink-100",
        gradient_to: "to-rose-50",
        key_line: "A quiet moment, just us",
        preset: DayPreset::Kiss,
        message: &["Some closeness", "doesn't need words."],
    },
    Day {
        id: 8,
        name: "Valentine's Day",
        title: "Valentine's Day",
        subtitle: "The moment it all comes together",
        emoji: "❤️",
        month: 2,
        day_of_month: 14,
        gradient_from: "from-red-100",
        gradient_to: "to-rose-50",
        key_line: "Everything leads here, to you",
        preset: DayPreset::Valentine,
        message: &[
            "This wasn't a week.",
            "This was how I love you.",
            "with all my love,",
            "— Forever Yours",
        ],
    },
];

/// Words of the promise, revealed one by one while tracing.
pub const PROMISE_WORDS: [&str; 6] = ["I", "promise", "to", "keep", "choosing", "you."];

pub fn days() -> &'static [Day] {
    &DAYS
}

/// Look up a day by its 1-based id.
///
/// # Errors
///
/// Returns `UnknownDay` for ids outside 1..=8.
pub fn day(id: u8) -> Result<&'static Day> {
    DAYS.iter()
        .find(|d| d.id == id)
        .ok_or(CoreError::UnknownDay(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_eight_ordered_days() {
        let ids: Vec<u8> = days().iter().map(|d| d.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(day(3).unwrap().preset, DayPreset::Chocolate);
        assert!(matches!(day(0), Err(CoreError::UnknownDay(0))));
        assert!(day(9).is_err());
    }

    #[test]
    fn every_gesture_family_is_used() {
        for kind in [
            GestureKind::Hold,
            GestureKind::Drag,
            GestureKind::Trace,
            GestureKind::Proximity,
            GestureKind::Tap,
        ] {
            assert!(days().iter().any(|d| d.gesture() == kind), "{kind} unused");
        }
    }

    #[test]
    fn dates_run_feb_7_to_14() {
        assert_eq!(day(1).unwrap().date_label(), "Feb 7");
        assert_eq!(day(8).unwrap().date_label(), "Feb 14");
        assert_eq!(
            day(8).unwrap().date_in(2026),
            NaiveDate::from_ymd_opt(2026, 2, 14)
        );
    }
}
