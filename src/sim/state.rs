//! Game state and core simulation types
//!
//! Everything the host needs to draw a frame lives in [`GameState`]; the
//! transition logic that mutates it is in `tick.rs`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyCurve;
use super::lanes::LaneLayout;
use super::scenery::SceneryScatter;
use super::timer::Timer;
use super::traffic::{CarVariant, TrafficSpawner};
use crate::error::GameError;
use crate::tuning::{Tuning, Viewport};

/// Engine-side handle for a spawned object
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input (which also picks the lane count)
    MainMenu,
    /// Active gameplay
    Playing,
    /// Crash animation before game over
    Finishing,
    /// Frozen until any input
    GameOver,
}

/// Overlap reported by the engine's physics between the player and an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    Obstacle(EntityId),
    Milestone(EntityId),
}

/// Request for the engine to create a renderable/physics body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnIntent {
    Obstacle {
        id: EntityId,
        lane: usize,
        pos: Vec2,
        vel: Vec2,
        variant: CarVariant,
    },
    /// Invisible scoring line across the whole field
    Milestone {
        id: EntityId,
        y: f32,
        width: f32,
        speed: f32,
    },
    Scenery {
        id: EntityId,
        pos: Vec2,
        /// Sprite sheet frame
        variant: u32,
    },
}

impl SpawnIntent {
    pub fn id(&self) -> EntityId {
        match self {
            SpawnIntent::Obstacle { id, .. }
            | SpawnIntent::Milestone { id, .. }
            | SpawnIntent::Scenery { id, .. } => *id,
        }
    }
}

/// Notifications for the render/audio/UI layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    ScoreChanged { score: u32, speed_multiplier: f32 },
    SpawnRequested(SpawnIntent),
    DespawnRequested(EntityId),
    /// Player settled in a new lane
    LaneChanged { lane: usize },
    LanesConfigured { centers: Vec<f32> },
    /// Player hit this obstacle
    Crashed { obstacle: EntityId },
}

/// In-progress lane switch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneChange {
    pub from_x: f32,
    pub to_x: f32,
    pub target_lane: usize,
}

/// The player's vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub lane: usize,
    pub pos: Vec2,
    /// Set while switching lanes
    pub transit: Option<LaneChange>,
    /// Lateral speed during the crash animation
    pub crash_vel: f32,
}

impl Player {
    pub fn new(lane: usize, pos: Vec2) -> Self {
        Self {
            lane,
            pos,
            transit: None,
            crash_vel: 0.0,
        }
    }

    pub fn in_transit(&self) -> bool {
        self.transit.is_some()
    }
}

/// An oncoming car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub lane: usize,
    pub pos: Vec2,
    /// Downward speed fixed at spawn time
    pub speed: f32,
    pub crash_vel: f32,
    pub variant: CarVariant,
}

/// Scoring line travelling with a traffic batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: EntityId,
    pub y: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    pub id: EntityId,
    pub pos: Vec2,
    pub variant: u32,
}

/// Complete session state (single writer: the tick functions)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub curve: DifficultyCurve,
    pub phase: GamePhase,
    pub lanes: LaneLayout,
    pub score: u32,
    pub speed_multiplier: f32,
    pub player: Player,
    /// Active obstacles (in spawn order)
    pub obstacles: Vec<Obstacle>,
    pub milestones: Vec<Milestone>,
    pub scenery: Vec<Scenery>,
    /// Accumulated road scroll in pixels (for tiling the ground)
    pub scroll_offset: f32,
    /// Frames advanced
    pub time_ticks: u64,
    pub(crate) traffic: TrafficSpawner,
    pub(crate) scatter: SceneryScatter,
    pub(crate) lane_timer: Timer,
    pub(crate) finish_timer: Timer,
    pub(crate) events: Vec<GameEvent>,
    next_id: EntityId,
}

/// RNG stream offsets so spawners never share a sequence
const TRAFFIC_STREAM: u64 = 0x7261_6666;
const SCENERY_STREAM: u64 = 0x7363_656e;

/// Lane count before the player picks one
pub const DEFAULT_LANE_COUNT: usize = 2;

impl GameState {
    /// Create a session in the main menu with pre-filled scenery
    pub fn new(viewport: Viewport, tuning: Tuning, seed: u64) -> Result<Self, GameError> {
        viewport.validate()?;
        tuning.validate()?;
        let lanes = LaneLayout::configure(DEFAULT_LANE_COUNT, viewport.width, tuning.lane_width)?;

        let start_lane = lanes.start_lane();
        let player_pos = Vec2::new(lanes.center(start_lane), viewport.height - tuning.car_size);

        let mut state = Self {
            seed,
            curve: DifficultyCurve::from_tuning(&tuning),
            tuning,
            viewport,
            phase: GamePhase::MainMenu,
            lanes,
            score: 0,
            speed_multiplier: 1.0,
            player: Player::new(start_lane, player_pos),
            obstacles: Vec::new(),
            milestones: Vec::new(),
            scenery: Vec::new(),
            scroll_offset: 0.0,
            time_ticks: 0,
            traffic: TrafficSpawner::new(seed ^ TRAFFIC_STREAM),
            scatter: SceneryScatter::new(seed ^ SCENERY_STREAM),
            lane_timer: Timer::new(),
            finish_timer: Timer::new(),
            events: Vec::new(),
            next_id: 1,
        };

        state.reset_round();
        log::info!("Session started with seed {seed}");
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn lane_centers(&self) -> &[f32] {
        self.lanes.centers()
    }

    pub fn is_traffic_active(&self) -> bool {
        self.traffic.is_active()
    }

    pub fn is_scenery_active(&self) -> bool {
        self.scatter.is_active()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Y coordinate the player drives at
    pub fn player_y(&self) -> f32 {
        self.viewport.height - self.tuning.car_size
    }
}
