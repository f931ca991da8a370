//! Lane Rush headless driver
//!
//! Runs one autopiloted round without a rendering engine. A minimal AABB
//! overlap check stands in for the engine's physics so the whole simulation
//! API gets exercised.
//!
//! Usage: `lane-rush [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_rush::consts::{CAR_BODY_HEIGHT, CAR_BODY_WIDTH};
    use lane_rush::sim::{Contact, Direction, GameEvent, GamePhase, GameState, TickInput, tick};
    use lane_rush::{GameError, Tuning, Viewport};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Give up after five minutes of simulated play
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// How far ahead (pixels) the autopilot looks for cars
    const LOOKAHEAD: f32 = 160.0;

    fn overlaps(a: glam::Vec2, b: glam::Vec2) -> bool {
        (a.x - b.x).abs() < CAR_BODY_WIDTH && (a.y - b.y).abs() < CAR_BODY_HEIGHT
    }

    /// Overlaps between the player and every scoring line or car
    fn detect_contacts(state: &GameState) -> Vec<Contact> {
        let player = state.player.pos;
        let mut contacts: Vec<Contact> = state
            .milestones
            .iter()
            .filter(|m| m.y >= player.y)
            .map(|m| Contact::Milestone(m.id))
            .collect();
        contacts.extend(
            state
                .obstacles
                .iter()
                .filter(|o| overlaps(player, o.pos))
                .map(|o| Contact::Obstacle(o.id)),
        );
        contacts
    }

    /// Steer toward the lane whose nearest oncoming car is furthest away
    fn steer(state: &GameState) -> Option<Direction> {
        if state.player.in_transit() {
            return None;
        }
        let player = state.player.pos;
        let threat = |lane: usize| {
            state
                .obstacles
                .iter()
                .filter(|o| o.lane == lane && o.pos.y < player.y + CAR_BODY_HEIGHT)
                .map(|o| player.y - o.pos.y)
                .fold(f32::INFINITY, f32::min)
        };

        let current = state.player.lane;
        if threat(current) > LOOKAHEAD {
            return None;
        }
        let left = current.checked_sub(1).map(threat).unwrap_or(f32::NEG_INFINITY);
        let right = if current + 1 < state.lanes.lane_count() {
            threat(current + 1)
        } else {
            f32::NEG_INFINITY
        };
        if left.max(right) <= threat(current) {
            None
        } else if left >= right {
            Some(Direction::Left)
        } else {
            Some(Direction::Right)
        }
    }

    pub fn run() -> Result<(), GameError> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s
                .parse()
                .map_err(|_| GameError::Configuration(format!("invalid seed: {s}")))?,
            None => 2024,
        };
        let tuning = match args.next() {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };

        let mut state = GameState::new(Viewport::default(), tuning, seed)?;
        let mut spawned = 0usize;

        // Right picks the three-lane road
        let mut input = TickInput {
            direction: Some(Direction::Right),
            contacts: Vec::new(),
        };

        for frame in 0..MAX_FRAMES {
            tick(&mut state, &input, FRAME_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::SpawnRequested(_) => spawned += 1,
                    GameEvent::ScoreChanged { score, speed_multiplier } if score % 10 == 0 => {
                        log::info!("Score {score}, speed x{speed_multiplier:.2}");
                    }
                    GameEvent::Crashed { obstacle } => {
                        log::info!("Crashed into car {obstacle} on frame {frame}");
                    }
                    _ => {}
                }
            }

            if state.phase == GamePhase::GameOver {
                break;
            }
            input = TickInput {
                direction: steer(&state),
                contacts: detect_contacts(&state),
            };
        }

        log::info!("{spawned} objects spawned");
        println!("Final score: {} ({:?})", state.score, state.phase);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Rush (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}
