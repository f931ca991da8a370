//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `advance(delta_ms)`
//! - Seeded RNG only (one stream per spawner)
//! - Entities kept in spawn order
//! - No rendering, audio or physics; those stay with the host engine

pub mod bias;
pub mod difficulty;
pub mod lanes;
pub mod scenery;
pub mod state;
pub mod tick;
pub mod timer;
pub mod traffic;

pub use bias::{BiasedCoin, BiasedPicker};
pub use difficulty::{DifficultyCurve, speed_multiplier};
pub use lanes::{Direction, LaneLayout};
pub use scenery::SceneryScatter;
pub use state::{
    Contact, EntityId, GameEvent, GamePhase, GameState, LaneChange, Milestone, Obstacle, Player,
    Scenery, SpawnIntent, DEFAULT_LANE_COUNT,
};
pub use tick::{TickInput, tick};
pub use timer::Timer;
pub use traffic::{CarVariant, TrafficBatch, TrafficSpawner};
