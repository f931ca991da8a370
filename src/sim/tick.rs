//! Per-frame simulation and phase transitions
//!
//! The host calls [`tick`] once per frame (or the individual entry points
//! `on_direction`, `on_contact` and `advance`). Phase transitions are the
//! only place timers are armed or cancelled:
//! - MainMenu -> Playing: traffic armed
//! - Playing -> Finishing: traffic and lane change cancelled, finish armed
//! - Finishing -> GameOver: scenery cancelled
//! - GameOver -> MainMenu: scenery re-armed

use glam::Vec2;

use super::lanes::{Direction, LaneLayout};
use super::state::{
    Contact, EntityId, GameEvent, GamePhase, GameState, LaneChange, Milestone, Obstacle, Player,
    Scenery, SpawnIntent,
};
use crate::error::GameError;

/// Input collected by the host for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering (or any key/tap in menus)
    pub direction: Option<Direction>,
    /// Overlaps detected by the engine since the last frame
    pub contacts: Vec<Contact>,
}

/// Apply a frame's input, then advance the simulation by `delta_ms`
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f32) {
    if let Some(direction) = input.direction {
        state.on_direction(direction);
    }
    for &contact in &input.contacts {
        state.on_contact(contact);
    }
    state.advance(delta_ms);
}

impl GameState {
    /// Rebuild the lane layout. Only allowed from the main menu.
    pub fn configure_lanes(&mut self, lane_count: usize) -> Result<(), GameError> {
        if self.phase != GamePhase::MainMenu {
            return Err(GameError::Precondition(
                "lanes can only be reconfigured from the main menu",
            ));
        }
        let layout = LaneLayout::configure(lane_count, self.viewport.width, self.tuning.lane_width)?;
        self.lanes = layout;
        self.reset_player();
        log::info!("Configured {lane_count} lanes: {:?}", self.lanes.centers());
        self.emit(GameEvent::LanesConfigured {
            centers: self.lanes.centers().to_vec(),
        });
        Ok(())
    }

    /// Handle a steering input
    pub fn on_direction(&mut self, direction: Direction) {
        match self.phase {
            GamePhase::MainMenu => {
                let lane_count = if direction == Direction::Right { 3 } else { 2 };
                if lane_count != self.lanes.lane_count() {
                    if let Err(e) = self.configure_lanes(lane_count) {
                        log::warn!("Keeping current lanes: {e}");
                    }
                }
                self.enter_playing();
            }
            GamePhase::Playing => self.begin_lane_change(direction),
            GamePhase::Finishing => {}
            GamePhase::GameOver => self.enter_main_menu(),
        }
    }

    /// Handle an overlap reported by the engine
    pub fn on_contact(&mut self, contact: Contact) {
        if self.phase != GamePhase::Playing {
            log::debug!("Ignoring {contact:?} during {:?}", self.phase);
            return;
        }
        match contact {
            Contact::Milestone(id) => {
                let Some(idx) = self.milestones.iter().position(|m| m.id == id) else {
                    log::warn!("Contact with unknown milestone {id}");
                    return;
                };
                self.milestones.remove(idx);
                self.emit(GameEvent::DespawnRequested(id));
                self.add_score(1);
            }
            Contact::Obstacle(id) => {
                if self.obstacles.iter().any(|o| o.id == id) {
                    self.enter_finishing(id);
                } else {
                    log::warn!("Contact with unknown obstacle {id}");
                }
            }
        }
    }

    /// Advance the simulation by `delta_ms` milliseconds
    pub fn advance(&mut self, delta_ms: f32) {
        if self.phase == GamePhase::GameOver {
            return;
        }

        self.time_ticks += 1;
        let dt = delta_ms / 1000.0;
        self.scroll_offset += self.tuning.base_scroll_speed * self.speed_multiplier * dt;

        match self.phase {
            GamePhase::Playing => {
                self.advance_lane_change(delta_ms);
                self.move_traffic(dt);
                if self.traffic.advance(delta_ms) {
                    self.spawn_traffic();
                }
            }
            GamePhase::Finishing => {
                self.player.pos.x += self.player.crash_vel * dt;
                self.move_traffic(dt);
                if self.finish_timer.advance(delta_ms) {
                    self.enter_game_over();
                }
            }
            GamePhase::MainMenu | GamePhase::GameOver => {}
        }

        // Scenery keeps scrolling until game over
        if self.phase != GamePhase::GameOver {
            self.move_scenery(dt);
            if self.scatter.advance(delta_ms) {
                self.spawn_scenery_row(-self.tuning.scenery_height);
                self.scatter.start(&self.tuning, self.speed_multiplier);
            }
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        log::info!("Phase {from:?} -> {to:?}");
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    fn enter_playing(&mut self) {
        self.set_phase(GamePhase::Playing);
        self.traffic.start(&self.tuning, self.speed_multiplier);
        if !self.scatter.is_active() {
            self.scatter.start(&self.tuning, self.speed_multiplier);
        }
    }

    fn enter_finishing(&mut self, obstacle_id: EntityId) {
        self.set_phase(GamePhase::Finishing);
        self.traffic.stop();
        self.lane_timer.cancel();
        self.player.transit = None;

        for milestone in std::mem::take(&mut self.milestones) {
            self.emit(GameEvent::DespawnRequested(milestone.id));
        }

        // Push the player and the car apart along the X axis
        let crash_speed = self.tuning.base_crash_speed * self.speed_multiplier;
        let player_x = self.player.pos.x;
        let mut player_vel = 0.0;
        if let Some(obstacle) = self.obstacles.iter_mut().find(|o| o.id == obstacle_id) {
            let away = if obstacle.pos.x >= player_x { -1.0 } else { 1.0 };
            player_vel = away * crash_speed;
            obstacle.crash_vel = -player_vel;
        }
        self.player.crash_vel = player_vel;

        self.finish_timer.arm(self.tuning.finishing_ms);
        self.emit(GameEvent::Crashed {
            obstacle: obstacle_id,
        });
    }

    fn enter_game_over(&mut self) {
        self.set_phase(GamePhase::GameOver);
        self.finish_timer.cancel();
        self.scatter.stop();
        log::info!("Round over with score {}", self.score);
    }

    fn enter_main_menu(&mut self) {
        self.set_phase(GamePhase::MainMenu);
        self.reset_round();
    }

    /// Clear the field and restart scenery for a new round
    pub(crate) fn reset_round(&mut self) {
        self.traffic.stop();
        self.lane_timer.cancel();
        self.finish_timer.cancel();

        if self.score != 0 || self.speed_multiplier != 1.0 {
            self.score = 0;
            self.speed_multiplier = self.curve.multiplier(0);
            self.emit(GameEvent::ScoreChanged {
                score: 0,
                speed_multiplier: self.speed_multiplier,
            });
        }
        self.reset_player();

        let obstacles = std::mem::take(&mut self.obstacles);
        let milestones = std::mem::take(&mut self.milestones);
        let scenery = std::mem::take(&mut self.scenery);
        let stale = obstacles
            .iter()
            .map(|o| o.id)
            .chain(milestones.iter().map(|m| m.id))
            .chain(scenery.iter().map(|s| s.id));
        for id in stale.collect::<Vec<_>>() {
            self.emit(GameEvent::DespawnRequested(id));
        }

        self.prefill_scenery();
        self.scatter.start(&self.tuning, self.speed_multiplier);
    }

    fn reset_player(&mut self) {
        let lane = self.lanes.start_lane();
        self.player = Player::new(lane, Vec2::new(self.lanes.center(lane), self.player_y()));
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        self.speed_multiplier = self.curve.multiplier(self.score);
        log::debug!(
            "Score {} (speed x{:.2})",
            self.score,
            self.speed_multiplier
        );
        self.emit(GameEvent::ScoreChanged {
            score: self.score,
            speed_multiplier: self.speed_multiplier,
        });
    }

    fn begin_lane_change(&mut self, direction: Direction) {
        if self.player.in_transit() || direction == Direction::None {
            return;
        }
        let target = self.lanes.adjacent_lane(self.player.pos.x, direction);
        if target == self.player.lane {
            return;
        }

        let from_x = self.player.pos.x;
        let to_x = self.lanes.center(target);
        let speed = self.tuning.base_lane_change_speed * self.speed_multiplier;
        let duration_ms = (to_x - from_x).abs() / speed * 1000.0;

        self.player.transit = Some(LaneChange {
            from_x,
            to_x,
            target_lane: target,
        });
        self.lane_timer.arm(duration_ms);
        log::debug!("Lane change {} -> {target} over {duration_ms:.0}ms", self.player.lane);
    }

    fn advance_lane_change(&mut self, delta_ms: f32) {
        let Some(change) = self.player.transit else {
            return;
        };
        if self.lane_timer.advance(delta_ms) {
            self.player.pos.x = change.to_x;
            self.player.lane = change.target_lane;
            self.player.transit = None;
            self.emit(GameEvent::LaneChanged {
                lane: change.target_lane,
            });
        } else {
            let t = self.lane_timer.progress();
            self.player.pos.x = change.from_x + (change.to_x - change.from_x) * t;
        }
    }

    /// Move obstacles and milestones, culling anything below the field
    fn move_traffic(&mut self, dt: f32) {
        let limit = self.viewport.height + self.tuning.car_size;

        for obstacle in &mut self.obstacles {
            obstacle.pos.y += obstacle.speed * dt;
            obstacle.pos.x += obstacle.crash_vel * dt;
        }
        for milestone in &mut self.milestones {
            milestone.y += milestone.speed * dt;
        }

        let mut gone = Vec::new();
        self.obstacles.retain(|o| {
            let keep = o.pos.y <= limit;
            if !keep {
                gone.push(o.id);
            }
            keep
        });
        self.milestones.retain(|m| {
            let keep = m.y <= limit;
            if !keep {
                gone.push(m.id);
            }
            keep
        });
        for id in gone {
            self.emit(GameEvent::DespawnRequested(id));
        }
    }

    fn move_scenery(&mut self, dt: f32) {
        let dy = self.tuning.base_scroll_speed * self.speed_multiplier * dt;
        let limit = self.viewport.height + self.tuning.scenery_height;

        let mut gone = Vec::new();
        self.scenery.retain_mut(|s| {
            s.pos.y += dy;
            let keep = s.pos.y <= limit;
            if !keep {
                gone.push(s.id);
            }
            keep
        });
        for id in gone {
            self.emit(GameEvent::DespawnRequested(id));
        }
    }

    fn spawn_traffic(&mut self) {
        let batch = self.traffic.spawn_batch(
            &self.lanes,
            self.score,
            self.speed_multiplier,
            &self.tuning,
        );
        let y = -self.tuning.car_size / 2.0;
        log::debug!(
            "Traffic batch in lanes {:?} at {:.1}px/s",
            batch.cars.iter().map(|(lane, _)| *lane).collect::<Vec<_>>(),
            batch.speed
        );

        for (lane, variant) in batch.cars {
            let id = self.next_entity_id();
            let pos = Vec2::new(self.lanes.center(lane), y);
            self.obstacles.push(Obstacle {
                id,
                lane,
                pos,
                speed: batch.speed,
                crash_vel: 0.0,
                variant,
            });
            self.emit(GameEvent::SpawnRequested(SpawnIntent::Obstacle {
                id,
                lane,
                pos,
                vel: Vec2::new(0.0, batch.speed),
                variant,
            }));
        }

        let id = self.next_entity_id();
        self.milestones.push(Milestone {
            id,
            y,
            speed: batch.speed,
        });
        self.emit(GameEvent::SpawnRequested(SpawnIntent::Milestone {
            id,
            y,
            width: self.viewport.width,
            speed: batch.speed,
        }));
    }

    fn spawn_scenery_row(&mut self, y: f32) {
        let row = self
            .scatter
            .scatter_row(&self.lanes, &self.viewport, &self.tuning);
        for (x, variant) in row {
            let id = self.next_entity_id();
            let pos = Vec2::new(x, y);
            self.scenery.push(Scenery { id, pos, variant });
            self.emit(GameEvent::SpawnRequested(SpawnIntent::Scenery { id, pos, variant }));
        }
    }

    fn prefill_scenery(&mut self) {
        let rows = super::scenery::SceneryScatter::prefill_rows(&self.viewport, &self.tuning);
        for i in 0..rows {
            let y = i as f32 * self.viewport.height / rows as f32;
            self.spawn_scenery_row(y);
        }
        log::debug!("Pre-filled {rows} scenery rows");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Tuning, Viewport};

    const FRAME_MS: f32 = 16.0;

    fn new_state(seed: u64) -> GameState {
        GameState::new(Viewport::default(), Tuning::default(), seed).unwrap()
    }

    fn run_ms(state: &mut GameState, ms: f32) {
        let mut left = ms;
        while left > 0.0 {
            let step = left.min(FRAME_MS);
            state.advance(step);
            left -= step;
        }
    }

    /// Play until the first traffic batch exists
    fn first_batch(state: &mut GameState) {
        let wait = state.tuning.base_car_rate / state.speed_multiplier;
        run_ms(state, wait + 1.0);
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_full_round() {
        let mut state = new_state(12345);
        assert_eq!(state.phase, GamePhase::MainMenu);

        // Right picks three lanes and starts the round
        tick(
            &mut state,
            &TickInput {
                direction: Some(Direction::Right),
                ..Default::default()
            },
            FRAME_MS,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lanes.lane_count(), 3);
        assert_eq!(state.score, 0);

        first_batch(&mut state);
        let milestone = state.milestones[0].id;
        state.on_contact(Contact::Milestone(milestone));
        assert_eq!(state.score, 1);
        assert_eq!(state.speed_multiplier, 1.0);

        let obstacle = state.obstacles[0].id;
        state.on_contact(Contact::Obstacle(obstacle));
        assert_eq!(state.phase, GamePhase::Finishing);

        let finishing_ms = state.tuning.finishing_ms;
        run_ms(&mut state, finishing_ms - 100.0);
        assert_eq!(state.phase, GamePhase::Finishing);
        run_ms(&mut state, 100.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.on_direction(Direction::None);
        assert_eq!(state.phase, GamePhase::MainMenu);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.milestones.is_empty());
    }

    #[test]
    fn test_left_picks_two_lanes() {
        let mut state = new_state(1);
        state.configure_lanes(3).unwrap();
        state.on_direction(Direction::Left);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lanes.lane_count(), 2);
    }

    #[test]
    fn test_reconfigure_outside_menu_fails() {
        let mut state = new_state(2);
        state.on_direction(Direction::Right);
        let before = state.lanes.clone();

        let err = state.configure_lanes(2).unwrap_err();
        assert!(matches!(err, GameError::Precondition(_)));
        assert_eq!(state.lanes, before);
    }

    #[test]
    fn test_reconfigure_rejects_zero_lanes() {
        let mut state = new_state(2);
        let before = state.lanes.clone();
        assert!(matches!(
            state.configure_lanes(0),
            Err(GameError::Configuration(_))
        ));
        assert_eq!(state.lanes, before);
    }

    #[test]
    fn test_traffic_only_while_playing() {
        let mut state = new_state(3);
        run_ms(&mut state, 5000.0);
        assert!(state.obstacles.is_empty());
        assert!(!state.is_traffic_active());

        state.on_direction(Direction::Right);
        assert!(state.is_traffic_active());
        first_batch(&mut state);
        assert_eq!(state.milestones.len(), 1);
        assert!(state.is_traffic_active());
    }

    #[test]
    fn test_obstacle_spawn_matches_lane() {
        let mut state = new_state(4);
        state.on_direction(Direction::Right);
        first_batch(&mut state);

        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.pos.x, state.lanes.center(obstacle.lane));
        assert_eq!(obstacle.speed, state.tuning.base_car_speed);
        assert_eq!(state.milestones[0].speed, obstacle.speed);
    }

    #[test]
    fn test_lane_change_is_timed() {
        let mut state = new_state(5);
        state.on_direction(Direction::Right);
        assert_eq!(state.player.lane, 1);

        state.on_direction(Direction::Left);
        assert!(state.player.in_transit());
        let target_x = state.lanes.center(0);

        // Further input is ignored mid-transit
        state.on_direction(Direction::Right);
        assert_eq!(state.player.transit.unwrap().target_lane, 0);

        let duration = state.tuning.lane_width / state.tuning.base_lane_change_speed * 1000.0;
        state.advance(duration / 2.0);
        assert!(state.player.pos.x > target_x);
        assert!(state.player.pos.x < state.lanes.center(1));

        state.advance(duration);
        assert!(!state.player.in_transit());
        assert_eq!(state.player.lane, 0);
        assert_eq!(state.player.pos.x, target_x);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LaneChanged { lane: 0 })
        );
    }

    #[test]
    fn test_lane_change_blocked_at_edge() {
        let mut state = new_state(6);
        state.on_direction(Direction::Left);
        assert_eq!(state.player.lane, 0);
        state.on_direction(Direction::Left);
        assert!(!state.player.in_transit());
    }

    #[test]
    fn test_crash_pushes_apart() {
        let mut state = new_state(7);
        state.on_direction(Direction::Right);
        first_batch(&mut state);
        run_ms(&mut state, 500.0);

        let obstacle = state.obstacles[0].clone();
        state.on_contact(Contact::Obstacle(obstacle.id));
        assert!(state.milestones.is_empty());
        assert!(!state.is_traffic_active());

        let player_x = state.player.pos.x;
        run_ms(&mut state, 500.0);
        let crashed = state.obstacles.iter().find(|o| o.id == obstacle.id).unwrap();
        let player_dx = state.player.pos.x - player_x;
        assert!(player_dx.abs() > 0.0);
        assert_eq!(state.player.crash_vel, -crashed.crash_vel);
        if obstacle.pos.x >= player_x {
            assert!(player_dx < 0.0);
        } else {
            assert!(player_dx > 0.0);
        }
    }

    #[test]
    fn test_contacts_ignored_outside_playing() {
        let mut state = new_state(8);
        state.on_contact(Contact::Milestone(999));
        assert_eq!(state.score, 0);

        state.on_direction(Direction::Left);
        state.on_contact(Contact::Obstacle(999));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_freezes_everything() {
        let mut state = new_state(9);
        state.on_direction(Direction::Right);
        first_batch(&mut state);
        let id = state.obstacles[0].id;
        state.on_contact(Contact::Obstacle(id));
        let finishing_ms = state.tuning.finishing_ms;
        run_ms(&mut state, finishing_ms);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.is_scenery_active());

        let scroll = state.scroll_offset;
        let scenery_y = state.scenery[0].pos.y;
        run_ms(&mut state, 3000.0);
        assert_eq!(state.scroll_offset, scroll);
        assert_eq!(state.scenery[0].pos.y, scenery_y);

        state.on_direction(Direction::Left);
        assert!(state.is_scenery_active());
    }

    #[test]
    fn test_score_raises_multiplier() {
        let mut state = new_state(10);
        state.on_direction(Direction::Right);
        for _ in 0..30 {
            let id = state.next_entity_id();
            state.milestones.push(Milestone {
                id,
                y: 0.0,
                speed: 0.0,
            });
            state.on_contact(Contact::Milestone(id));
        }
        assert_eq!(state.score, 30);
        assert_eq!(state.speed_multiplier, state.curve.multiplier(30));
        assert!(state.speed_multiplier > 1.0);
    }

    #[test]
    fn test_offscreen_traffic_is_culled() {
        let mut state = new_state(11);
        state.on_direction(Direction::Left);
        first_batch(&mut state);
        let id = state.obstacles[0].id;
        state.drain_events();

        // 640px field at 54px/s takes ~13s to cross
        run_ms(&mut state, 14_000.0);
        assert!(state.obstacles.iter().all(|o| o.id != id));
        assert!(state.drain_events().contains(&GameEvent::DespawnRequested(id)));
    }

    #[test]
    fn test_scenery_keeps_coming() {
        let mut state = new_state(12);
        let first_ids: Vec<_> = state.scenery.iter().map(|s| s.id).collect();
        run_ms(&mut state, 30_000.0);
        assert!(!state.scenery.is_empty());
        assert!(state.scenery.iter().all(|s| !first_ids.contains(&s.id)));
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(99999);
        let mut b = new_state(99999);

        let inputs = [
            TickInput {
                direction: Some(Direction::Right),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                direction: Some(Direction::Left),
                ..Default::default()
            },
        ];
        for input in &inputs {
            tick(&mut a, input, FRAME_MS);
            tick(&mut b, input, FRAME_MS);
        }
        run_ms(&mut a, 10_000.0);
        run_ms(&mut b, 10_000.0);

        assert_eq!(a.drain_events(), b.drain_events());
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.scenery, b.scenery);
    }
}
