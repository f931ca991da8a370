//! Decorative roadside scenery
//!
//! Rows of trees and bushes scroll past on both sides of the road. The field
//! is split into an even number of equal cells; each cell gets one item at a
//! random X that never falls inside the lane band (plus half an item of
//! margin on each side).

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::DifficultyCurve;
use super::lanes::LaneLayout;
use super::timer::Timer;
use crate::tuning::{Tuning, Viewport};

#[derive(Debug, Clone)]
pub struct SceneryScatter {
    timer: Timer,
    rng: Pcg32,
}

impl SceneryScatter {
    pub fn new(seed: u64) -> Self {
        Self {
            timer: Timer::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn start(&mut self, tuning: &Tuning, multiplier: f32) {
        self.timer
            .arm(DifficultyCurve::cadence(tuning.base_scenery_rate, multiplier));
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

    pub fn advance(&mut self, delta_ms: f32) -> bool {
        self.timer.advance(delta_ms)
    }

    /// Number of horizontal cells per row (always even)
    pub fn cell_count(field_width: f32, spacing: f32) -> usize {
        2 * (field_width / (2.0 * spacing)).ceil().max(1.0) as usize
    }

    /// Rows needed to cover the field before the first timed row arrives
    pub fn prefill_rows(viewport: &Viewport, tuning: &Tuning) -> usize {
        (viewport.height / tuning.base_scroll_speed * 1000.0 / tuning.base_scenery_rate).ceil()
            as usize
    }

    /// Clamp a cell's sampling interval so it excludes `[excl_start, excl_end]`.
    ///
    /// When the band splits the cell in two, the wider side is used. Returns
    /// `None` when nothing of the cell lies outside the band.
    pub fn sampling_interval(
        cell_min: f32,
        cell_max: f32,
        excl_start: f32,
        excl_end: f32,
    ) -> Option<(f32, f32)> {
        if cell_max <= excl_start || cell_min >= excl_end {
            return Some((cell_min, cell_max));
        }

        let left = (cell_min < excl_start).then(|| (cell_min, excl_start.min(cell_max)));
        let right = (cell_max > excl_end).then(|| (excl_end.max(cell_min), cell_max));

        match (left, right) {
            (Some(l), Some(r)) => Some(if l.1 - l.0 >= r.1 - r.0 { l } else { r }),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }

    /// X positions and sprite frames for one row
    pub fn scatter_row(
        &mut self,
        layout: &LaneLayout,
        viewport: &Viewport,
        tuning: &Tuning,
    ) -> Vec<(f32, u32)> {
        let cells = Self::cell_count(viewport.width, tuning.scenery_spacing);
        let cell_width = viewport.width / cells as f32;
        let margin = tuning.scenery_width / 2.0;
        let excl_start = layout.band_start() - margin;
        let excl_end = layout.band_end() + margin;

        let mut row = Vec::with_capacity(cells);
        for i in 0..cells {
            let cell_min = i as f32 * cell_width;
            let cell_max = cell_min + cell_width;
            let Some((lo, hi)) = Self::sampling_interval(cell_min, cell_max, excl_start, excl_end)
            else {
                continue;
            };
            if hi <= lo {
                continue;
            }

            let x = self.rng.random_range(lo..hi);
            let variant = self.rng.random_range(0..tuning.scenery_variants);
            row.push((x, variant));
        }
        row
    }
}
