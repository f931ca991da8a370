//! Oncoming traffic generator
//!
//! Decides when a batch of cars appears and in which lanes. The owner drives
//! the timer and turns each batch into entities.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bias::BiasedPicker;
use super::difficulty::DifficultyCurve;
use super::lanes::LaneLayout;
use super::timer::Timer;
use crate::tuning::Tuning;

/// Car sprite colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarVariant {
    Red,
    Orange,
    Yellow,
}

impl CarVariant {
    pub const ALL: [CarVariant; 3] = [CarVariant::Red, CarVariant::Orange, CarVariant::Yellow];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarVariant::Red => "car-red",
            CarVariant::Orange => "car-orange",
            CarVariant::Yellow => "car-yellow",
        }
    }
}

/// One firing of the traffic timer
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficBatch {
    /// (lane index, sprite) per car
    pub cars: Vec<(usize, CarVariant)>,
    /// Downward speed shared by every car in the batch (pixels per second)
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct TrafficSpawner {
    timer: Timer,
    lanes: BiasedPicker<usize>,
    rng: Pcg32,
}

impl TrafficSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            timer: Timer::new(),
            lanes: BiasedPicker::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Arm the spawn timer using the multiplier current right now
    pub fn start(&mut self, tuning: &Tuning, multiplier: f32) {
        self.timer
            .arm(DifficultyCurve::cadence(tuning.base_car_rate, multiplier));
    }

    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Advance the timer; true when a batch is due
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        self.timer.advance(delta_ms)
    }

    /// Number of cars per batch for the current road and score
    pub fn batch_size(lane_count: usize, score: u32, tuning: &Tuning) -> usize {
        if lane_count > 2 && score >= tuning.multi_car_threshold {
            lane_count - 1
        } else {
            1
        }
    }

    /// Produce a batch and re-arm for the next one
    pub fn spawn_batch(
        &mut self,
        layout: &LaneLayout,
        score: u32,
        multiplier: f32,
        tuning: &Tuning,
    ) -> TrafficBatch {
        let all_lanes: Vec<usize> = (0..layout.lane_count()).collect();
        let size = Self::batch_size(layout.lane_count(), score, tuning);
        let chosen = self.lanes.pick(&all_lanes, size, &mut self.rng);

        let cars = chosen
            .into_iter()
            .map(|lane| {
                let variant = CarVariant::ALL[self.rng.random_range(0..CarVariant::ALL.len())];
                (lane, variant)
            })
            .collect();

        self.start(tuning, multiplier);

        TrafficBatch {
            cars,
            speed: tuning.base_car_speed * multiplier,
        }
    }
}
