//! Score-driven difficulty
//!
//! A single multiplier scales every speed and cadence in the game. It is a
//! pure function of the score: flat at 1.0, then a linear ramp, then capped.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Map a score onto the speed multiplier
pub fn speed_multiplier(score: f32, min_score: f32, max_score: f32, max_multiplier: f32) -> f32 {
    if score < min_score {
        1.0
    } else if score < max_score {
        1.0 + (max_multiplier - 1.0) * (score - min_score) / (max_score - min_score)
    } else {
        max_multiplier
    }
}

/// Ramp parameters bundled for repeated evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    pub min_score: u32,
    pub max_score: u32,
    pub max_multiplier: f32,
}

impl DifficultyCurve {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            min_score: tuning.min_score,
            max_score: tuning.max_score,
            max_multiplier: tuning.max_multiplier,
        }
    }

    #[inline]
    pub fn multiplier(&self, score: u32) -> f32 {
        speed_multiplier(
            score as f32,
            self.min_score as f32,
            self.max_score as f32,
            self.max_multiplier,
        )
    }

    /// Delay between spawns at the given multiplier
    #[inline]
    pub fn cadence(base_cadence: f32, multiplier: f32) -> f32 {
        base_cadence / multiplier
    }
}
