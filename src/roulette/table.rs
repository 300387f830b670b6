//! Table Module
//!
//! One roulette table: bankroll, active bets, the wheel and the session log,
//! behind plain method calls that hand back receipts. A host that needs to
//! share a table across threads wraps it in a [`SharedTable`].

use super::{
    book::{Bankroll, BetBook, Placement, RemoveOutcome},
    catalog,
    history::BetHistory,
    layout::{CellClick, TableLayout},
    selector::OutcomeSelector,
    settlement::{self, BetPayout},
    types::{Bet, BetIdentity},
};
use crate::common::types::{Number, NumberColor, SessionSnapshot};
use crate::config::CroupierConfig;
use crate::errors::{BetError, ConfigurationError, CroupierResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// One mutex per table
pub type SharedTable = Arc<Mutex<Table>>;

/// Result of one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round_id: Uuid,
    pub winning_number: Number,
    pub colour: NumberColor,
    /// Credited to the balance
    pub total_return: u64,
    /// Chips put down this round minus chips taken back
    pub wagered: u64,
    /// `total_return - wagered`
    pub net: i64,
    /// Balance after the credit
    pub balance: u64,
    /// Session profit after this round
    pub profit: i64,
    pub payouts: Vec<BetPayout>,
    pub history_line: String,
    pub timestamp: DateTime<Utc>,
}

impl RoundReport {
    pub fn is_win(&self) -> bool {
        self.total_return > 0
    }
}

pub struct Table {
    config: CroupierConfig,
    layout: TableLayout,
    bankroll: Bankroll,
    book: BetBook,
    selector: OutcomeSelector,
    history: BetHistory,
    profit: i64,
    round_wagered: u64,
}

impl Table {
    /// Fresh table with the configured starting money and an entropy seeded wheel
    pub fn new(config: CroupierConfig) -> CroupierResult<Self> {
        let snapshot = SessionSnapshot::fresh(config.table.starting_money);
        Self::from_snapshot(config, &snapshot)
    }

    /// Resume a saved session. Only the money seeds the bankroll; profit and
    /// the history panes are carried over as they were.
    pub fn from_snapshot(config: CroupierConfig, snapshot: &SessionSnapshot) -> CroupierResult<Self> {
        config
            .validate()
            .map_err(|e| ConfigurationError::ValidationFailed(e.to_string()))?;

        let selector = OutcomeSelector::from_entropy(
            config.table.min_number,
            config.table.max_number,
            config.bias.clone(),
        );
        let history = BetHistory::new(config.history.max_lines, config.history.max_spin_lines)
            .restore(snapshot.betting_history.clone(), snapshot.winning_numbers.clone());

        Ok(Self {
            bankroll: Bankroll::new(snapshot.money, config.table.chip_value),
            layout: TableLayout::european(),
            book: BetBook::new(),
            selector,
            history,
            profit: snapshot.profit,
            round_wagered: 0,
            config,
        })
    }

    /// Reseed the wheel for reproducible rounds
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.selector = OutcomeSelector::from_seed(
            self.config.table.min_number,
            self.config.table.max_number,
            self.config.bias.clone(),
            seed,
        );
        self
    }

    pub fn shared(self) -> SharedTable {
        Arc::new(Mutex::new(self))
    }

    /// Resolve a click and put one chip on the resulting bet
    pub fn click(&mut self, area: usize, click: &CellClick) -> Result<Placement, BetError> {
        let bet = self.layout.resolve(area, click, &self.config.layout)?;
        self.place(bet)
    }

    /// Resolve a click and take one chip off the resulting bet
    pub fn unclick(&mut self, area: usize, click: &CellClick) -> Result<RemoveOutcome, BetError> {
        let bet = self.layout.resolve(area, click, &self.config.layout)?;
        self.remove(&bet.identity())
    }

    /// Put one chip on `bet`
    pub fn place(&mut self, bet: Bet) -> Result<Placement, BetError> {
        let chip = self.bankroll.chip_value();
        let placement = self.book.place(&mut self.bankroll, bet, chip)?;
        self.round_wagered = self.round_wagered.saturating_add(chip);
        self.history.record_placement(&placement.label, placement.total_stake);
        Ok(placement)
    }

    /// Put one chip on the bet named by `label`
    pub fn place_label(&mut self, label: &str) -> Result<Placement, BetError> {
        let bet = catalog::parse_bet(label)?;
        self.place(bet)
    }

    /// Take one chip off the matching bet
    pub fn remove(&mut self, identity: &BetIdentity) -> Result<RemoveOutcome, BetError> {
        let chip = self.bankroll.chip_value();
        let outcome = self.book.remove(&mut self.bankroll, identity, chip)?;
        self.round_wagered = self.round_wagered.saturating_sub(outcome.refunded());
        let remaining = match &outcome {
            RemoveOutcome::Reduced { remaining, .. } => *remaining,
            RemoveOutcome::Removed { .. } => 0,
        };
        self.history.record_removal(outcome.label(), remaining);
        Ok(outcome)
    }

    pub fn remove_label(&mut self, label: &str) -> Result<RemoveOutcome, BetError> {
        self.remove(&BetIdentity::from_label(label))
    }

    /// Change the chip size. Only allowed with an empty table.
    pub fn set_chip_value(&mut self, chip_value: u64) -> Result<(), BetError> {
        if chip_value == 0 {
            return Err(BetError::ZeroStake);
        }
        if !self.book.is_empty() {
            return Err(BetError::ChipValueLocked {
                active: self.book.len(),
            });
        }
        self.bankroll.set_chip_value(chip_value);
        self.config.table.chip_value = chip_value;
        tracing::debug!("Chip value set to {}", chip_value);
        Ok(())
    }

    /// Spin the wheel and settle every active bet.
    ///
    /// `forced` pins the winning number (clamped into range).
    pub fn spin(&mut self, forced: Option<i64>) -> Result<RoundReport, BetError> {
        if self.book.is_empty() {
            return Err(BetError::NoActiveBets);
        }

        let winning = self
            .selector
            .select_winner(forced, self.book.entries(), self.bankroll.chip_value());
        let settled = settlement::resolve(&mut self.book, &mut self.bankroll, winning);

        let wagered = std::mem::take(&mut self.round_wagered);
        let net = settled.total_return as i64 - wagered as i64;
        self.profit = self.profit.saturating_add(net);
        let history_line = self.history.record_spin(winning, settled.total_return, net);

        tracing::info!(
            "Spin {}: {} ({}), returned {} on {} wagered, balance {}",
            self.history.total_spins(),
            winning,
            NumberColor::of(winning),
            settled.total_return,
            wagered,
            self.bankroll.balance()
        );

        Ok(RoundReport {
            round_id: Uuid::new_v4(),
            winning_number: winning,
            colour: NumberColor::of(winning),
            total_return: settled.total_return,
            wagered,
            net,
            balance: self.bankroll.balance(),
            profit: self.profit,
            payouts: settled.payouts,
            history_line,
            timestamp: Utc::now(),
        })
    }

    /// Flat record for the save store
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            money: self.bankroll.balance(),
            profit: self.profit,
            betting_history: self.history.lines().to_vec(),
            winning_numbers: self.history.winning_numbers().to_vec(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.bankroll.balance()
    }

    pub fn chip_value(&self) -> u64 {
        self.bankroll.chip_value()
    }

    pub fn profit(&self) -> i64 {
        self.profit
    }

    /// Chips down this round, net of removals
    pub fn round_wagered(&self) -> u64 {
        self.round_wagered
    }

    pub fn bankroll(&self) -> &Bankroll {
        &self.bankroll
    }

    pub fn book(&self) -> &BetBook {
        &self.book
    }

    pub fn history(&self) -> &BetHistory {
        &self.history
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn config(&self) -> &CroupierConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BiasConfig;

    fn fair_table() -> Table {
        Table::new(CroupierConfig::fair()).unwrap().with_seed(1)
    }

    #[test]
    fn test_click_places_one_chip() {
        let mut table = fair_table();
        let placement = table.click(0, &CellClick::center(1, 5)).unwrap();
        assert_eq!(placement.label, "17");
        assert_eq!(table.balance(), 990);
        assert_eq!(table.round_wagered(), 10);
        assert_eq!(table.history().lines(), &["Bet : 17 - $10"]);
    }

    #[test]
    fn test_forced_spin_pays_out() {
        let mut table = fair_table();
        table.place_label("Straight 17").unwrap();
        table.place_label("17").unwrap();

        let report = table.spin(Some(17)).unwrap();
        assert_eq!(report.winning_number, 17);
        assert_eq!(report.total_return, 720);
        assert_eq!(report.wagered, 20);
        assert_eq!(report.net, 700);
        assert_eq!(report.balance, 1_700);
        assert_eq!(table.profit(), 700);
        assert_eq!(report.history_line, "Spin 1: 17 -> WIN +$720");
        assert!(table.book().is_empty());
        assert_eq!(table.round_wagered(), 0);
    }

    #[test]
    fn test_loss_is_counted_in_profit() {
        let mut table = fair_table();
        table.place_label("Red").unwrap();
        let report = table.spin(Some(2)).unwrap();
        assert!(!report.is_win());
        assert_eq!(report.net, -10);
        assert_eq!(table.profit(), -10);
        assert_eq!(table.balance(), 990);
    }

    #[test]
    fn test_removal_reduces_wager() {
        let mut table = fair_table();
        table.place_label("Split 8-11").unwrap();
        table.place_label("Split 8-11").unwrap();
        table.place_label("Odd").unwrap();

        let outcome = table.remove_label("Split 8-11").unwrap();
        assert!(matches!(outcome, RemoveOutcome::Reduced { remaining: 10, .. }));
        assert_eq!(table.round_wagered(), 20);
        assert_eq!(table.balance(), 980);

        // 8 is even, odd loses, split pays 10 * 17 + 10
        let report = table.spin(Some(8)).unwrap();
        assert_eq!(report.wagered, 20);
        assert_eq!(report.total_return, 180);
        assert_eq!(table.profit(), 160);
        assert_eq!(table.balance(), 1_160);
    }

    #[test]
    fn test_unclick_removes_the_clicked_bet() {
        let mut table = fair_table();
        let corner = CellClick::new(1, 5, 0.95, 0.95);
        table.click(0, &corner).unwrap();
        let outcome = table.unclick(0, &corner).unwrap();
        assert_eq!(outcome.label(), "Corner 17-18-20-21");
        assert!(table.book().is_empty());
        assert!(table.history().lines().is_empty());
        assert_eq!(table.balance(), 1_000);
    }

    #[test]
    fn test_spin_refused_on_empty_table() {
        let mut table = fair_table();
        assert_eq!(table.spin(None).unwrap_err(), BetError::NoActiveBets);
    }

    #[test]
    fn test_chip_value_locked_while_betting() {
        let mut table = fair_table();
        table.place_label("Black").unwrap();
        assert_eq!(
            table.set_chip_value(25),
            Err(BetError::ChipValueLocked { active: 1 })
        );
        table.spin(None).unwrap();
        table.set_chip_value(25).unwrap();
        assert_eq!(table.chip_value(), 25);
        assert_eq!(table.set_chip_value(0), Err(BetError::ZeroStake));
    }

    #[test]
    fn test_out_of_money() {
        let config = CroupierConfig {
            table: crate::config::TableConfig {
                starting_money: 15,
                ..Default::default()
            },
            ..CroupierConfig::fair()
        };
        let mut table = Table::new(config).unwrap();
        table.place_label("Red").unwrap();
        assert!(matches!(
            table.place_label("Black"),
            Err(BetError::InsufficientFunds { balance: 5, required: 10 })
        ));
    }

    #[test]
    fn test_biased_table_favours_covered_number() {
        let config = CroupierConfig {
            bias: BiasConfig {
                chance: 1.0,
                weight_by_stake: true,
                neighbor_boost: false,
            },
            ..Default::default()
        };
        let mut table = Table::new(config).unwrap().with_seed(5);
        for _ in 0..20 {
            table.place_label("17").unwrap();
            assert_eq!(table.spin(None).unwrap().winning_number, 17);
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut table = fair_table();
        table.place_label("Dozen 1-12").unwrap();
        table.spin(Some(5)).unwrap();

        let snapshot = table.snapshot();
        assert_eq!(snapshot.money, 1_020);
        assert_eq!(snapshot.profit, 20);
        assert_eq!(snapshot.winning_numbers, vec![5]);

        let resumed = Table::from_snapshot(CroupierConfig::fair(), &snapshot).unwrap();
        assert_eq!(resumed.balance(), 1_020);
        assert_eq!(resumed.profit(), 20);
        assert_eq!(resumed.history().lines(), snapshot.betting_history.as_slice());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CroupierConfig::default();
        config.table.chip_value = 0;
        assert!(Table::new(config).is_err());
    }

    #[test]
    fn test_shared_table() {
        let shared = fair_table().shared();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = Arc::clone(&shared);
                std::thread::spawn(move || {
                    table.lock().unwrap().place_label("Even").unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let table = shared.lock().unwrap();
        assert_eq!(table.book().len(), 1);
        assert_eq!(table.book().total_staked(), 40);
        assert_eq!(table.balance(), 960);
    }
}
