//! Lane geometry
//!
//! Lanes are evenly spaced vertical strips centered on the field. The
//! drivable band extends half a lane beyond the outermost lane centers on
//! both sides:
//! - band_start = center - (n + 1) * width / 2
//! - band_end   = center + (n + 1) * width / 2
//! - lane i     = band_start + (i + 1) * width

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Abstract steering signal derived from keyboard/pointer/touch by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    None,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    lane_width: f32,
    band_start: f32,
    band_end: f32,
    centers: Vec<f32>,
}

impl LaneLayout {
    /// Compute the layout for `lane_count` lanes on a field `field_width` wide
    pub fn configure(lane_count: usize, field_width: f32, lane_width: f32) -> Result<Self, GameError> {
        if lane_count < 1 {
            return Err(GameError::Configuration(
                "lane count must be at least 1".to_string(),
            ));
        }
        if !(field_width > 0.0) {
            return Err(GameError::Configuration(format!(
                "field width must be positive, got {field_width}"
            )));
        }
        if !(lane_width > 0.0) {
            return Err(GameError::Configuration(format!(
                "lane width must be positive, got {lane_width}"
            )));
        }

        let center = field_width / 2.0;
        let half_span = (lane_count + 1) as f32 * lane_width / 2.0;
        let band_start = center - half_span;
        let band_end = center + half_span;
        let spacing = (band_end - band_start) / (lane_count + 1) as f32;

        let centers = (1..=lane_count)
            .map(|i| band_start + i as f32 * spacing)
            .collect();

        Ok(Self {
            lane_width,
            band_start,
            band_end,
            centers,
        })
    }

    pub fn lane_count(&self) -> usize {
        self.centers.len()
    }

    pub fn centers(&self) -> &[f32] {
        &self.centers
    }

    /// Center X of a lane (clamped to the last lane)
    pub fn center(&self, lane: usize) -> f32 {
        let last = self.centers.len().saturating_sub(1);
        self.centers[lane.min(last)]
    }

    pub fn lane_width(&self) -> f32 {
        self.lane_width
    }

    pub fn band_start(&self) -> f32 {
        self.band_start
    }

    pub fn band_end(&self) -> f32 {
        self.band_end
    }

    /// Index of the lane center nearest `x`; ties go to the lower index
    pub fn closest_lane(&self, x: f32) -> usize {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for (i, &center) in self.centers.iter().enumerate() {
            let dist = (center - x).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }

    /// Neighbouring lane in `direction`, or the current one at the edges
    pub fn adjacent_lane(&self, x: f32, direction: Direction) -> usize {
        let current = self.closest_lane(x);
        match direction {
            Direction::None => current,
            Direction::Left => current.saturating_sub(1),
            Direction::Right if current + 1 < self.lane_count() => current + 1,
            Direction::Right => current,
        }
    }

    /// Lane the player starts in
    pub fn start_lane(&self) -> usize {
        (self.lane_count() - 1) / 2
    }
}
