//! Lane Rush - A lane-switching traffic dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawners, difficulty, game state)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and precondition errors
//!
//! Rendering, audio, physics overlap tests and input capture belong to the
//! host engine. The simulation only issues spawn/despawn intents and reacts
//! to the contacts the engine reports back.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use tuning::{Tuning, Viewport};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Oncoming car speed (pixels per second)
    pub const BASE_CAR_SPEED: f32 = 54.0;
    /// Delay between traffic batches (milliseconds)
    pub const BASE_CAR_RATE: f32 = 1750.0;
    /// Lateral speed of the crash animation (pixels per second)
    pub const BASE_CRASH_SPEED: f32 = 28.0;
    /// Road and scenery scroll speed (pixels per second)
    pub const BASE_SCROLL_SPEED: f32 = 36.0;
    /// Delay between scenery rows (milliseconds)
    pub const BASE_SCENERY_RATE: f32 = 500.0;
    /// Player lateral speed while switching lanes (pixels per second)
    pub const BASE_LANE_CHANGE_SPEED: f32 = 128.0;

    /// Score where the difficulty ramp starts
    pub const DIFFICULTY_MIN_SCORE: u32 = 5;
    /// Score where the difficulty ramp tops out
    pub const DIFFICULTY_MAX_SCORE: u32 = 50;
    pub const MAX_SPEED_MULTIPLIER: f32 = 3.5;
    /// Score from which several cars may spawn in one batch (3+ lanes)
    pub const MULTIPLE_CARS_THRESHOLD: u32 = 10;

    /// Sprite sizes (pixels)
    pub const LANE_WIDTH: f32 = 16.0;
    pub const CAR_SIZE: f32 = 32.0;
    pub const CAR_BODY_WIDTH: f32 = 12.0;
    pub const CAR_BODY_HEIGHT: f32 = 18.0;
    pub const SCENERY_WIDTH: f32 = 14.0;
    pub const SCENERY_HEIGHT: f32 = 30.0;
    /// Number of frames in the scenery sprite sheet
    pub const SCENERY_VARIANTS: u32 = 12;
    /// Target horizontal distance between scenery items
    pub const SCENERY_SPACING: f32 = 250.0;

    /// Crash animation length before game over (milliseconds)
    pub const FINISHING_TIME: f32 = 2000.0;
}
