//! Game balance and field metrics
//!
//! Every constant the simulation uses can be overridden from JSON; missing
//! fields fall back to the values in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Visible field size in pixels, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Reject empty or negative fields
    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(GameError::Configuration(format!(
                "viewport must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 640.0,
        }
    }
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speeds (pixels per second) ===
    pub base_car_speed: f32,
    pub base_scroll_speed: f32,
    pub base_crash_speed: f32,
    pub base_lane_change_speed: f32,

    // === Cadences (milliseconds) ===
    pub base_car_rate: f32,
    pub base_scenery_rate: f32,
    pub finishing_ms: f32,

    // === Difficulty ===
    pub min_score: u32,
    pub max_score: u32,
    pub max_multiplier: f32,
    /// Score from which 3+ lane roads spawn several cars per batch
    pub multi_car_threshold: u32,

    // === Geometry (pixels) ===
    pub lane_width: f32,
    pub car_size: f32,
    pub scenery_width: f32,
    pub scenery_height: f32,
    pub scenery_variants: u32,
    pub scenery_spacing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_car_speed: BASE_CAR_SPEED,
            base_scroll_speed: BASE_SCROLL_SPEED,
            base_crash_speed: BASE_CRASH_SPEED,
            base_lane_change_speed: BASE_LANE_CHANGE_SPEED,

            base_car_rate: BASE_CAR_RATE,
            base_scenery_rate: BASE_SCENERY_RATE,
            finishing_ms: FINISHING_TIME,

            min_score: DIFFICULTY_MIN_SCORE,
            max_score: DIFFICULTY_MAX_SCORE,
            max_multiplier: MAX_SPEED_MULTIPLIER,
            multi_car_threshold: MULTIPLE_CARS_THRESHOLD,

            lane_width: LANE_WIDTH,
            car_size: CAR_SIZE,
            scenery_width: SCENERY_WIDTH,
            scenery_height: SCENERY_HEIGHT,
            scenery_variants: SCENERY_VARIANTS,
            scenery_spacing: SCENERY_SPACING,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GameError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check that every rate, speed and size is usable
    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("base_car_speed", self.base_car_speed),
            ("base_scroll_speed", self.base_scroll_speed),
            ("base_crash_speed", self.base_crash_speed),
            ("base_lane_change_speed", self.base_lane_change_speed),
            ("base_car_rate", self.base_car_rate),
            ("base_scenery_rate", self.base_scenery_rate),
            ("finishing_ms", self.finishing_ms),
            ("lane_width", self.lane_width),
            ("car_size", self.car_size),
            ("scenery_width", self.scenery_width),
            ("scenery_height", self.scenery_height),
            ("scenery_spacing", self.scenery_spacing),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(GameError::Configuration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.scenery_variants == 0 {
            return Err(GameError::Configuration(
                "scenery_variants must be at least 1".to_string(),
            ));
        }
        if self.min_score >= self.max_score {
            return Err(GameError::Configuration(format!(
                "min_score ({}) must be below max_score ({})",
                self.min_score, self.max_score
            )));
        }
        if !(self.max_multiplier >= 1.0) {
            return Err(GameError::Configuration(format!(
                "max_multiplier must be at least 1.0, got {}",
                self.max_multiplier
            )));
        }
        Ok(())
    }
}
