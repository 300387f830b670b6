//! Outcome Selector Module
//!
//! Picks the winning pocket. A fair wheel draws uniformly over the configured
//! range; a biased wheel, with probability `bias.chance`, draws from a weight
//! map built over the pockets the active bets cover.

use super::types::Bet;
use crate::common::types::Number;
use crate::config::BiasConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Winning number source for one table
#[derive(Debug, Clone)]
pub struct OutcomeSelector<R = ChaCha20Rng> {
    min_number: Number,
    max_number: Number,
    bias: BiasConfig,
    rng: R,
}

impl OutcomeSelector<ChaCha20Rng> {
    /// Reproducible selector
    pub fn from_seed(min_number: Number, max_number: Number, bias: BiasConfig, seed: u64) -> Self {
        Self::new(min_number, max_number, bias, ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(min_number: Number, max_number: Number, bias: BiasConfig) -> Self {
        Self::new(min_number, max_number, bias, ChaCha20Rng::from_entropy())
    }
}

impl<R: Rng> OutcomeSelector<R> {
    pub fn new(min_number: Number, max_number: Number, bias: BiasConfig, rng: R) -> Self {
        let (min_number, max_number) = if min_number <= max_number {
            (min_number, max_number)
        } else {
            (max_number, min_number)
        };
        Self {
            min_number,
            max_number,
            bias,
            rng,
        }
    }

    pub fn range(&self) -> (Number, Number) {
        (self.min_number, self.max_number)
    }

    pub fn bias(&self) -> &BiasConfig {
        &self.bias
    }

    /// Produce the winning number.
    ///
    /// A forced number is clamped into range and returned as is; bias never
    /// touches it.
    pub fn select_winner(&mut self, forced: Option<i64>, bets: &[Bet], chip_value: u64) -> Number {
        if let Some(forced) = forced {
            let clamped = forced.clamp(i64::from(self.min_number), i64::from(self.max_number));
            debug!("Forced winner {} (requested {})", clamped, forced);
            return clamped as Number;
        }

        if self.bias.chance <= 0.0 || bets.is_empty() {
            return self.uniform();
        }

        let draw: f64 = self.rng.gen();
        if draw > self.bias.chance {
            trace!("Bias skipped (draw {:.4} > chance {:.4})", draw, self.bias.chance);
            return self.uniform();
        }

        let weights = self.weight_map(bets, chip_value);
        match self.weighted(&weights) {
            Some(number) => {
                debug!("Biased winner {} from {} weighted numbers", number, weights.len());
                number
            }
            None => self.uniform(),
        }
    }

    /// Weight per pocket, ascending by pocket.
    ///
    /// Every covered in-range pocket of every bet gains a direct weight, and
    /// with the neighbour boost its in-range neighbours gain one each. Weights
    /// from different bets accumulate, so a pocket can collect both a direct
    /// weight and a neighbour weight.
    pub fn weight_map(&self, bets: &[Bet], chip_value: u64) -> BTreeMap<Number, u64> {
        let mut weights = BTreeMap::new();
        let in_range = |n: i64| n >= i64::from(self.min_number) && n <= i64::from(self.max_number);

        for bet in bets {
            let direct = if self.bias.weight_by_stake {
                (bet.stake() / chip_value.max(1)).max(1).saturating_add(1)
            } else {
                1
            };

            for &number in bet.numbers() {
                if !in_range(i64::from(number)) {
                    continue;
                }
                let weight = weights.entry(number).or_insert(0u64);
                *weight = weight.saturating_add(direct);

                if self.bias.neighbor_boost {
                    for neighbour in [i64::from(number) - 1, i64::from(number) + 1] {
                        if in_range(neighbour) {
                            let weight = weights.entry(neighbour as Number).or_insert(0u64);
                            *weight = weight.saturating_add(1);
                        }
                    }
                }
            }
        }

        weights
    }

    fn uniform(&mut self) -> Number {
        self.rng.gen_range(self.min_number..=self.max_number)
    }

    fn weighted(&mut self, weights: &BTreeMap<Number, u64>) -> Option<Number> {
        let total = weights
            .values()
            .fold(0u64, |sum, &weight| sum.saturating_add(weight));
        if total == 0 {
            return None;
        }

        let mut r = self.rng.gen_range(0..total);
        for (&number, &weight) in weights {
            if r < weight {
                return Some(number);
            }
            r -= weight;
        }
        None
    }
}
