//! Reveal bindings: pure functions from progress to presentation values.
//!
//! Nothing here holds state. The render layer calls these with whatever the
//! engine exposes and gets back opacities, colours and copy.

use serde::{Deserialize, Serialize};

use crate::days::DayPreset;
use crate::engine::Point;
use crate::progress::{clamp_unit, ProgressState, ProgressStatus};

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = clamp_unit(t);
    1.0 - (1.0 - t).powi(3)
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * clamp_unit(t)
}

/// Count of staged thresholds already reached by `progress`.
pub fn revealed_count(progress: f64, thresholds: &[f64]) -> usize {
    thresholds.iter().filter(|&&t| progress >= t).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Build from unclamped channels, rounding and clamping each.
    pub fn from_channels(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: clamp_unit(a),
        }
    }

    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        Rgba::from_channels(
            lerp(f64::from(self.r), f64::from(other.r), t),
            lerp(f64::from(self.g), f64::from(other.g), t),
            lerp(f64::from(self.b), f64::from(other.b), t),
            lerp(self.a, other.a, t),
        )
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, self.a)
    }
}

fn channel(v: f64) -> u8 {
    if v.is_finite() {
        v.round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

/// Glow around the held heart/hug: warms from dusty pink toward coral.
pub fn warmth_glow(warmth: f64) -> Rgba {
    let w = clamp_unit(warmth);
    Rgba::from_channels(220.0 + w * 30.0, 180.0 - w * 20.0, 170.0 - w * 30.0, 0.3 + w * 0.4)
}

/// Title/subtitle fade as the gesture progresses. Hidden once complete.
pub fn title_opacity(state: &ProgressState) -> f64 {
    if state.is_complete() {
        return 0.0;
    }
    clamp_unit(1.0 - state.value())
}

/// Blur radius of the kiss forms; they sharpen as they approach.
pub fn merge_blur_px(proximity: f64) -> f64 {
    12.0 - clamp_unit(proximity) * 10.0
}

/// Offset of the chocolate wrapper as it slides off.
pub fn wrapper_offset_px(progress: f64) -> f64 {
    clamp_unit(progress) * 220.0
}

/// The seven earlier days drawn as points around the final heart.
pub const CONSTELLATION: [Point; 7] = [
    Point { x: -90.0, y: -60.0 },
    Point { x: 70.0, y: -80.0 },
    Point { x: -60.0, y: 30.0 },
    Point { x: 85.0, y: 45.0 },
    Point { x: -40.0, y: -90.0 },
    Point { x: 30.0, y: 70.0 },
    Point { x: -80.0, y: 80.0 },
];

/// Position of a constellation point at the given convergence.
pub fn converge(point: Point, convergence: f64) -> Point {
    point.scale(1.0 - clamp_unit(convergence))
}

/// Instruction line shown under the interaction, if any.
pub fn hint_copy(preset: DayPreset, state: &ProgressState) -> Option<&'static str> {
    if state.is_complete() {
        return None;
    }
    let v = state.value();
    let active = state.status() == ProgressStatus::Active;
    let copy = match preset {
        DayPreset::Rose => "Choose a rose",
        DayPreset::Propose => {
            if v <= 0.0 {
                "Press and hold"
            } else if v > 0.55 {
                "Steady now..."
            } else {
                "Hold gently..."
            }
        }
        DayPreset::Chocolate => {
            if v > 0.5 {
                "Almost there..."
            } else if v > 0.1 {
                "Slowly now..."
            } else {
                "Drag to unwrap →"
            }
        }
        DayPreset::Teddy => "Drag me close",
        DayPreset::Promise => {
            if v > 0.0 {
                return None;
            }
            "Trace to reveal"
        }
        DayPreset::Hug => {
            if !active {
                "Press and hold"
            } else if v < 0.5 {
                "Stay with me..."
            } else if v < 0.9 {
                "I feel you..."
            } else {
                "Almost there..."
            }
        }
        DayPreset::Kiss => {
            if v >= 0.2 {
                return None;
            }
            "Move gently toward the center"
        }
        DayPreset::Valentine => {
            if state.status() != ProgressStatus::Idle {
                return None;
            }
            "Tap to begin"
        }
    };
    Some(copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        assert_eq!(ease_out_cubic(f64::NAN), 0.0);
    }

    #[test]
    fn revealed_count_is_staged() {
        let thresholds = [0.0, 0.15, 0.30, 0.45, 0.65, 0.85];
        assert_eq!(revealed_count(0.0, &thresholds), 1);
        assert_eq!(revealed_count(0.5, &thresholds), 4);
        assert_eq!(revealed_count(1.0, &thresholds), 6);
    }

    #[test]
    fn glow_warms_with_progress() {
        assert_eq!(warmth_glow(0.0), Rgba::from_channels(220.0, 180.0, 170.0, 0.3));
        let full = warmth_glow(1.0);
        assert_eq!((full.r, full.g, full.b), (250, 160, 140));
        assert_eq!(full.to_css(), "rgba(250, 160, 140, 0.70)");
    }

    #[test]
    fn converge_pulls_points_to_centre() {
        let p = converge(CONSTELLATION[0], 1.0);
        assert_eq!(p.length(), 0.0);
        assert_eq!(converge(CONSTELLATION[0], 0.0), CONSTELLATION[0]);
    }

    #[test]
    fn hint_copy_follows_progress() {
        let mut state = ProgressState::new();
        assert_eq!(hint_copy(DayPreset::Propose, &state), Some("Press and hold"));
        state.set_value(0.6);
        assert_eq!(hint_copy(DayPreset::Propose, &state), Some("Steady now..."));
        assert_eq!(hint_copy(DayPreset::Chocolate, &state), Some("Almost there..."));
        assert_eq!(hint_copy(DayPreset::Kiss, &state), None);
        state.complete(10);
        assert_eq!(hint_copy(DayPreset::Propose, &state), None);
    }
}
