//! Batch Simulation Module
//!
//! Plays many rounds of a fixed bet pattern on one table and measures what the
//! wheel actually pays back: hit rate, return to player and house edge.

use super::catalog;
use super::table::Table;
use crate::common::types::MAX_NUMBER;
use crate::config::CroupierConfig;
use crate::errors::{BetError, CroupierResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// What to play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationScenario {
    pub rounds: usize,
    /// Bet labels, one chip each per round
    pub bets: Vec<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pin every spin to this number
    #[serde(default)]
    pub forced: Option<i64>,
}

/// Aggregate results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub rounds_requested: usize,
    pub rounds_played: usize,
    pub rounds_won: usize,
    pub total_wagered: u64,
    pub total_returned: u64,
    pub hit_rate: f64,
    pub return_to_player: f64,
    pub house_edge: f64,
    pub starting_balance: u64,
    pub final_balance: u64,
    /// Ran out of money before the last round
    pub stopped_early: bool,
    /// Times each pocket came up, index is the pocket
    pub number_frequency: Vec<u64>,
    pub execution_time: Duration,
}

impl SimulationReport {
    pub fn net(&self) -> i64 {
        self.total_returned as i64 - self.total_wagered as i64
    }
}

pub struct Simulation {
    config: CroupierConfig,
}

impl Simulation {
    pub fn new(config: CroupierConfig) -> Self {
        Self { config }
    }

    /// Run a scenario on a fresh table
    pub fn run(&self, scenario: &SimulationScenario) -> CroupierResult<SimulationReport> {
        let start_time = Instant::now();

        // Reject bad labels before any money moves
        for label in &scenario.bets {
            catalog::parse_bet(label)?;
        }
        if scenario.bets.is_empty() {
            return Err(BetError::NoActiveBets.into());
        }

        let mut table = Table::new(self.config.clone())?;
        if let Some(seed) = scenario.seed {
            table = table.with_seed(seed);
        }

        let starting_balance = table.balance();
        let mut rounds_played = 0;
        let mut rounds_won = 0;
        let mut total_wagered = 0u64;
        let mut total_returned = 0u64;
        let mut number_frequency = vec![0u64; usize::from(MAX_NUMBER) + 1];
        let mut stopped_early = false;

        'rounds: for round in 0..scenario.rounds {
            for label in &scenario.bets {
                match table.place_label(label) {
                    Ok(_) => {}
                    Err(BetError::InsufficientFunds { balance, .. }) => {
                        debug!("Out of money in round {} (balance {})", round + 1, balance);
                        stopped_early = true;
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            if table.book().is_empty() {
                stopped_early = true;
                break 'rounds;
            }

            let report = table.spin(scenario.forced)?;
            rounds_played += 1;
            total_wagered += report.wagered;
            total_returned += report.total_return;
            number_frequency[usize::from(report.winning_number)] += 1;
            if report.is_win() {
                rounds_won += 1;
            }

            if stopped_early {
                break;
            }
        }

        let hit_rate = if rounds_played > 0 {
            rounds_won as f64 / rounds_played as f64
        } else {
            0.0
        };
        let return_to_player = if total_wagered > 0 {
            total_returned as f64 / total_wagered as f64
        } else {
            0.0
        };
        let house_edge = if total_wagered > 0 { 1.0 - return_to_player } else { 0.0 };

        info!(
            "Simulation finished: {} rounds, RTP {:.4}, house edge {:.4}",
            rounds_played, return_to_player, house_edge
        );

        Ok(SimulationReport {
            rounds_requested: scenario.rounds,
            rounds_played,
            rounds_won,
            total_wagered,
            total_returned,
            hit_rate,
            return_to_player,
            house_edge,
            starting_balance,
            final_balance: table.balance(),
            stopped_early,
            number_frequency,
            execution_time: start_time.elapsed(),
        })
    }
}
