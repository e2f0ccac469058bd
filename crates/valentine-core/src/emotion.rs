//! Emotional state carried across the week.
//!
//! Each day has a signature mood. As days complete, the journey's mood is
//! eased toward each signature in turn, and the background palette follows.

use serde::{Deserialize, Serialize};

use crate::reveal::{ease_out_cubic, Rgba};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    /// Cool (0) to warm (1).
    pub warmth: f64,
    /// Active (0) to resting (1).
    pub stillness: f64,
    /// Distant (0) to close (1).
    pub intimacy: f64,
    /// Journey progress.
    pub completion: f64,
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Target mood for one day. Missing fields keep the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionTarget {
    pub warmth: Option<f64>,
    pub stillness: Option<f64>,
    pub intimacy: Option<f64>,
    pub completion: Option<f64>,
}

impl EmotionTarget {
    const fn mood(warmth: f64, stillness: f64, intimacy: f64) -> Self {
        Self {
            warmth: Some(warmth),
            stillness: Some(stillness),
            intimacy: Some(intimacy),
            completion: None,
        }
    }
}

/// Signature mood per day, indexed by `day - 1`.
const DAY_EMOTIONS: [EmotionTarget; 8] = [
    EmotionTarget::mood(0.3, 0.4, 0.2), // gentle beginning
    EmotionTarget::mood(0.4, 0.6, 0.3), // calm commitment
    EmotionTarget::mood(0.5, 0.5, 0.4), // warm indulgence
    EmotionTarget::mood(0.6, 0.7, 0.5), // comfort
    EmotionTarget::mood(0.5, 0.8, 0.5), // intentional
    EmotionTarget::mood(0.8, 0.6, 0.7), // presence
    EmotionTarget::mood(0.7, 0.9, 0.9), // intimate
    EmotionTarget::mood(0.9, 1.0, 1.0), // complete
];

pub fn day_emotion(day: u8) -> Option<EmotionTarget> {
    let index = usize::from(day).checked_sub(1)?;
    DAY_EMOTIONS.get(index).copied()
}

impl EmotionalState {
    pub const INITIAL: EmotionalState = EmotionalState {
        warmth: 0.2,
        stillness: 0.3,
        intimacy: 0.1,
        completion: 0.0,
    };

    /// Ease from `self` toward `to` by `progress` (ease-out-cubic).
    pub fn blend(&self, to: &EmotionTarget, progress: f64) -> EmotionalState {
        let ease = ease_out_cubic(progress);
        let mix = |from: f64, target: Option<f64>| from + (target.unwrap_or(from) - from) * ease;
        EmotionalState {
            warmth: mix(self.warmth, to.warmth),
            stillness: mix(self.stillness, to.stillness),
            intimacy: mix(self.intimacy, to.intimacy),
            completion: mix(self.completion, to.completion),
        }
    }

    pub fn palette(&self) -> Palette {
        let EmotionalState {
            warmth,
            stillness,
            intimacy,
            ..
        } = *self;
        let glow_opacity = 0.05 + intimacy * 0.12;
        Palette {
            gradient_from: Rgba::from_channels(
                255.0 - warmth * 5.0,
                252.0 - warmth * 8.0 - intimacy * 3.0,
                250.0 - warmth * 15.0 - intimacy * 5.0,
                1.0,
            ),
            gradient_to: Rgba::from_channels(
                253.0 - warmth * 8.0,
                247.0 - warmth * 12.0 - intimacy * 4.0,
                243.0 - warmth * 20.0 - intimacy * 8.0,
                1.0,
            ),
            ambient_duration_s: 30.0 + stillness * 40.0,
            glow: Rgba::from_channels(
                235.0 + warmth * 15.0,
                200.0 - warmth * 20.0,
                190.0 - warmth * 30.0,
                glow_opacity,
            ),
        }
    }
}

/// Background colours derived from a mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub gradient_from: Rgba,
    pub gradient_to: Rgba,
    /// Ambient motion slows down as stillness grows.
    pub ambient_duration_s: f64,
    pub glow: Rgba,
}

impl Palette {
    pub fn gradient_css(&self) -> String {
        let (a, b) = (self.gradient_from, self.gradient_to);
        format!(
            "linear-gradient(160deg, rgb({}, {}, {}) 0%, rgb({}, {}, {}) 100%)",
            a.r, a.g, a.b, b.r, b.g, b.b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_blend_reaches_target() {
        let target = day_emotion(8).unwrap();
        let state = EmotionalState::INITIAL.blend(&target, 1.0);
        assert!((state.warmth - 0.9).abs() < 1e-12);
        assert!((state.intimacy - 1.0).abs() < 1e-12);
        assert_eq!(state.completion, 0.0);
    }

    #[test]
    fn zero_blend_keeps_state() {
        let target = day_emotion(3).unwrap();
        assert_eq!(EmotionalState::INITIAL.blend(&target, 0.0), EmotionalState::INITIAL);
    }

    #[test]
    fn day_lookup_bounds() {
        assert!(day_emotion(0).is_none());
        assert!(day_emotion(9).is_none());
        assert!(day_emotion(1).is_some());
    }

    #[test]
    fn palette_warms() {
        let cool = EmotionalState::INITIAL.palette();
        let warm = EmotionalState::INITIAL
            .blend(&day_emotion(8).unwrap(), 1.0)
            .palette();
        assert!(warm.gradient_from.b < cool.gradient_from.b);
        assert!(warm.ambient_duration_s > cool.ambient_duration_s);
        assert!(cool.gradient_css().starts_with("linear-gradient(160deg"));
    }
}
