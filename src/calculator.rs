//! Goal and progress arithmetic. Everything here is pure.

use serde::{Deserialize, Serialize};

/// Lower bound of any computed daily goal, in fluid ounces
pub const MIN_DAILY_GOAL_OZ: f64 = 64.0;
/// Upper bound of any computed daily goal, in fluid ounces
pub const MAX_DAILY_GOAL_OZ: f64 = 128.0;

/// Recommended daily water intake in fluid ounces.
///
/// `weight * 0.5 + height * 0.1 - age * 0.2`, clamped to
/// [`MIN_DAILY_GOAL_OZ`]..=[`MAX_DAILY_GOAL_OZ`] and then rounded to the nearest
/// tenth. Rounding uses [`f64::round`], i.e. halves round away from zero.
///
/// Inputs are expected to be finite and positive; the ledger validates profiles
/// before calling this.
pub fn compute_daily_goal(weight_lbs: f64, height_in: f64, age_years: f64) -> f64 {
    let raw = weight_lbs * 0.5 + height_in * 0.1 - age_years * 0.2;
    let clamped = raw.clamp(MIN_DAILY_GOAL_OZ, MAX_DAILY_GOAL_OZ);

    (clamped * 10.0).round() / 10.0
}

/// Whole-number percentage of the goal reached, capped at 100.
pub fn progress_percent(current_oz: f64, goal_oz: f64) -> u8 {
    if goal_oz == 0.0 {
        return 0;
    }

    let percentage = (current_oz / goal_oz * 100.0).round();
    // NaN saturates to 0 on the cast
    percentage.clamp(0.0, 100.0) as u8
}

/// Height of the water in the glass, 0 to 100. Not rounded so the fill can
/// animate smoothly.
pub fn water_level(current_oz: f64, goal_oz: f64) -> f64 {
    if goal_oz == 0.0 {
        return 0.0;
    }

    (current_oz / goal_oz * 100.0).clamp(0.0, 100.0)
}

/// Distance of the mascot from the bottom of the scene, in pixels. It floats up
/// with the water.
pub fn mascot_offset_px(level: f64) -> f64 {
    50.0 + level * 3.0
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotivationTier {
    Celebrate,
    Almost,
    Halfway,
    Started,
    Begin,
}

impl MotivationTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            Self::Celebrate
        } else if percent >= 75.0 {
            Self::Almost
        } else if percent >= 50.0 {
            Self::Halfway
        } else if percent >= 25.0 {
            Self::Started
        } else {
            Self::Begin
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Celebrate => "🎉 Amazing! You've reached your goal!",
            Self::Almost => "🌟 Almost there! Keep splashing!",
            Self::Halfway => "💪 Halfway to hydration heaven!",
            Self::Started => "🐻 Great start! Keep it up!",
            Self::Begin => "💧 Let's make some splashes today!",
        }
    }
}
