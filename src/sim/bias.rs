//! Streak-avoiding random choices
//!
//! Plain uniform draws produce long runs of the same outcome, which reads as
//! monotonous on screen. These generators remember their previous result and
//! lean away from it without ever becoming deterministic.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Boolean generator that favours flipping its previous result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiasedCoin {
    previous: Option<bool>,
}

impl BiasedCoin {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Probability of drawing `true` given the previous outcome
    pub fn threshold(&self) -> f32 {
        match self.previous {
            None => 0.5,
            Some(true) => 0.3,
            Some(false) => 0.7,
        }
    }

    pub fn next<R: Rng>(&mut self, rng: &mut R) -> bool {
        let result = rng.random::<f32>() < self.threshold();
        self.previous = Some(result);
        result
    }
}

/// k-of-n picker that redraws once when it would repeat its last selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasedPicker<T> {
    previous: Vec<T>,
}

impl<T> Default for BiasedPicker<T> {
    fn default() -> Self {
        Self {
            previous: Vec::new(),
        }
    }
}

impl<T: Clone + PartialEq> BiasedPicker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection returned by the last call to [`pick`](Self::pick)
    pub fn previous(&self) -> &[T] {
        &self.previous
    }

    /// Pick `k` distinct candidates (capped at the candidate count).
    ///
    /// If every chosen element was also part of the previous selection, the
    /// draw is repeated once. The second draw is kept whatever it is.
    pub fn pick<R: Rng>(&mut self, candidates: &[T], k: usize, rng: &mut R) -> Vec<T> {
        debug_assert!(!candidates.is_empty(), "biased pick needs candidates");
        let k = k.min(candidates.len());

        let mut selection = Self::draw(candidates, k, rng);
        if self.repeats_previous(&selection) {
            selection = Self::draw(candidates, k, rng);
        }

        self.previous = selection.clone();
        selection
    }

    fn draw<R: Rng>(candidates: &[T], k: usize, rng: &mut R) -> Vec<T> {
        let mut shuffled = candidates.to_vec();
        shuffled.shuffle(rng);
        shuffled.truncate(k);
        shuffled
    }

    fn repeats_previous(&self, selection: &[T]) -> bool {
        !self.previous.is_empty()
            && !selection.is_empty()
            && selection.iter().all(|item| self.previous.contains(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_coin_thresholds() {
        let mut coin = BiasedCoin::new();
        assert_eq!(coin.threshold(), 0.5);

        let mut rng = Pcg32::seed_from_u64(7);
        let first = coin.next(&mut rng);
        assert_eq!(coin.threshold(), if first { 0.3 } else { 0.7 });
    }

    #[test]
    fn test_coin_shortens_streaks() {
        let mut coin = BiasedCoin::new();
        let mut rng = Pcg32::seed_from_u64(2024);

        let draws: Vec<bool> = (0..10_000).map(|_| coin.next(&mut rng)).collect();

        let mut runs = 1usize;
        for pair in draws.windows(2) {
            if pair[0] != pair[1] {
                runs += 1;
            }
        }
        let mean_run = draws.len() as f64 / runs as f64;

        // A fair coin averages runs of 2; flipping with p=0.7 gives ~1.43
        assert!(mean_run < 1.8, "mean run length {mean_run}");
        assert!(draws.iter().any(|&b| b) && draws.iter().any(|&b| !b));
    }

    #[test]
    fn test_pick_returns_distinct_candidates() {
        let mut picker = BiasedPicker::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let lanes = [0usize, 1, 2];

        for _ in 0..100 {
            let mut picked = picker.pick(&lanes, 2, &mut rng);
            assert_eq!(picked.len(), 2);
            picked.sort();
            picked.dedup();
            assert_eq!(picked.len(), 2);
            assert!(picked.iter().all(|lane| lanes.contains(lane)));
        }
    }

    #[test]
    fn test_pick_caps_at_candidate_count() {
        let mut picker = BiasedPicker::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let picked = picker.pick(&[0usize, 1], 5, &mut rng);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_pick_remembers_selection() {
        let mut picker = BiasedPicker::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let picked = picker.pick(&['a', 'b', 'c'], 1, &mut rng);
        assert_eq!(picker.previous(), picked.as_slice());
    }

    #[test]
    fn test_pick_repeats_less_than_uniform() {
        let mut picker = BiasedPicker::new();
        let mut rng = Pcg32::seed_from_u64(99);
        let lanes = [0usize, 1, 2];

        let mut last = picker.pick(&lanes, 1, &mut rng);
        let mut repeats = 0;
        let trials = 3000;
        for _ in 0..trials {
            let next = picker.pick(&lanes, 1, &mut rng);
            if next == last {
                repeats += 1;
            }
            last = next;
        }

        // Uniform repeat rate is 1/3; one redraw brings it to 1/9
        let rate = repeats as f64 / trials as f64;
        assert!(rate < 0.2, "repeat rate {rate}");
    }
}
