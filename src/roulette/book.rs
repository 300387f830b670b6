//! Bet Book Module
//!
//! Ledger of the bets active this round. Every placement moves one chip from
//! the bankroll onto the table and every removal moves chips back, so the
//! balance plus the staked total only changes at settlement.

use super::types::{Bet, BetIdentity};
use crate::errors::BetError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Player balance and the size of one chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bankroll {
    balance: u64,
    chip_value: u64,
}

impl Bankroll {
    pub fn new(balance: u64, chip_value: u64) -> Self {
        Self {
            balance,
            chip_value,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn chip_value(&self) -> u64 {
        self.chip_value
    }

    pub fn can_afford_chip(&self) -> bool {
        self.balance >= self.chip_value
    }

    pub(crate) fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub(crate) fn debit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_sub(amount);
    }

    pub(crate) fn set_chip_value(&mut self, chip_value: u64) {
        self.chip_value = chip_value;
    }
}

/// Receipt for a placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// True when the chip joined an existing bet
    pub merged: bool,
    /// Stake on this bet after the placement
    pub total_stake: u64,
    /// History label of the bet
    pub label: String,
}

/// Receipt for a removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoveOutcome {
    /// Part of the stake came back, the bet stays
    Reduced {
        label: String,
        refunded: u64,
        remaining: u64,
    },
    /// The whole remaining stake came back and the bet is gone
    Removed { label: String, refunded: u64 },
}

impl RemoveOutcome {
    pub fn refunded(&self) -> u64 {
        match self {
            RemoveOutcome::Reduced { refunded, .. } | RemoveOutcome::Removed { refunded, .. } => {
                *refunded
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RemoveOutcome::Reduced { label, .. } | RemoveOutcome::Removed { label, .. } => label,
        }
    }
}

/// Active bets for the current round, one entry per distinct bet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetBook {
    entries: Vec<Bet>,
}

impl BetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `stake` to the bet, merging with an existing entry for the same bet.
    ///
    /// Exactly one chip is debited from the bankroll whether or not the bet
    /// merged. Refused without any change when the bankroll cannot cover a chip.
    pub fn place(&mut self, bankroll: &mut Bankroll, bet: Bet, stake: u64) -> Result<Placement, BetError> {
        if stake == 0 {
            return Err(BetError::ZeroStake);
        }
        if !bankroll.can_afford_chip() {
            return Err(BetError::InsufficientFunds {
                balance: bankroll.balance(),
                required: bankroll.chip_value(),
            });
        }

        let identity = bet.identity();
        let (merged, entry) = match self.entries.iter().position(|existing| identity.matches(existing)) {
            Some(index) => (true, &mut self.entries[index]),
            None => {
                self.entries.push(bet.with_stake(0));
                let last = self.entries.len() - 1;
                (false, &mut self.entries[last])
            }
        };

        let total_stake = entry.add_stake(stake);
        let label = entry.history_label();
        bankroll.debit(bankroll.chip_value());

        debug!(
            "Placed {} on {} (merged: {}, total {}, balance {})",
            stake,
            entry.name(),
            merged,
            total_stake,
            bankroll.balance()
        );

        Ok(Placement {
            merged,
            total_stake,
            label,
        })
    }

    /// Take up to `refund` off the matching bet and credit it back.
    pub fn remove(
        &mut self,
        bankroll: &mut Bankroll,
        identity: &BetIdentity,
        refund: u64,
    ) -> Result<RemoveOutcome, BetError> {
        if refund == 0 {
            return Err(BetError::ZeroStake);
        }

        let index = self
            .entries
            .iter()
            .position(|existing| identity.matches(existing))
            .ok_or_else(|| BetError::NotFound(identity.to_string()))?;

        let entry = &mut self.entries[index];
        let refunded = entry.take_stake(refund);
        let label = entry.history_label();
        let remaining = entry.stake();
        bankroll.credit(refunded);

        debug!(
            "Removed {} from {} (remaining {}, balance {})",
            refunded,
            entry.name(),
            remaining,
            bankroll.balance()
        );

        if remaining == 0 {
            self.entries.remove(index);
            Ok(RemoveOutcome::Removed { label, refunded })
        } else {
            Ok(RemoveOutcome::Reduced {
                label,
                refunded,
                remaining,
            })
        }
    }

    pub fn find(&self, identity: &BetIdentity) -> Option<&Bet> {
        self.entries.iter().find(|existing| identity.matches(existing))
    }

    pub fn entries(&self) -> &[Bet] {
        &self.entries
    }

    pub fn total_staked(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, bet| sum.saturating_add(bet.stake()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every bet without refunding
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn take_all(&mut self) -> Vec<Bet> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roulette::catalog;

    #[test]
    fn test_same_bet_merges() {
        let mut bankroll = Bankroll::new(1000, 10);
        let mut book = BetBook::new();

        let first = book.place(&mut bankroll, catalog::straight(17).unwrap(), 10).unwrap();
        assert!(!first.merged);
        assert_eq!(first.total_stake, 10);
        assert_eq!(first.label, "17");

        let second = book.place(&mut bankroll, catalog::straight(17).unwrap(), 10).unwrap();
        assert!(second.merged);
        assert_eq!(second.total_stake, 20);

        assert_eq!(book.len(), 1);
        assert_eq!(book.entries()[0].numbers(), &[17]);
        assert_eq!(book.entries()[0].stake(), 20);
        assert_eq!(bankroll.balance(), 980);
    }

    #[test]
    fn test_merge_ignores_construction_order() {
        let mut bankroll = Bankroll::new(100, 5);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::split(11, 8).unwrap(), 5).unwrap();
        let placement = book.place(&mut bankroll, catalog::split(8, 11).unwrap(), 5).unwrap();
        assert!(placement.merged);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_distinct_bets_do_not_merge() {
        let mut bankroll = Bankroll::new(100, 5);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(1).unwrap(), 5).unwrap();
        book.place(&mut bankroll, catalog::outside(-1).unwrap(), 5).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.total_staked(), 10);
    }

    #[test]
    fn test_debits_one_chip_regardless_of_stake() {
        let mut bankroll = Bankroll::new(100, 5);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(3).unwrap(), 25).unwrap();
        assert_eq!(bankroll.balance(), 95);
        assert_eq!(book.total_staked(), 25);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut bankroll = Bankroll::new(9, 10);
        let mut book = BetBook::new();
        let result = book.place(&mut bankroll, catalog::straight(3).unwrap(), 10);
        assert_eq!(
            result,
            Err(BetError::InsufficientFunds {
                balance: 9,
                required: 10
            })
        );
        assert!(book.is_empty());
        assert_eq!(bankroll.balance(), 9);
    }

    #[test]
    fn test_zero_stake_refused() {
        let mut bankroll = Bankroll::new(100, 10);
        let mut book = BetBook::new();
        assert_eq!(
            book.place(&mut bankroll, catalog::straight(3).unwrap(), 0),
            Err(BetError::ZeroStake)
        );
        assert_eq!(bankroll.balance(), 100);
    }

    #[test]
    fn test_remove_full_then_not_found() {
        let mut bankroll = Bankroll::new(100, 10);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(17).unwrap(), 10).unwrap();

        let identity = BetIdentity::from_label("Straight 17");
        let outcome = book.remove(&mut bankroll, &identity, 10).unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Removed {
                label: "17".to_string(),
                refunded: 10
            }
        );
        assert!(book.is_empty());
        assert_eq!(bankroll.balance(), 100);

        let again = book.remove(&mut bankroll, &identity, 10);
        assert!(matches!(again, Err(BetError::NotFound(_))));
    }

    #[test]
    fn test_over_refund_credits_only_the_stake() {
        let mut bankroll = Bankroll::new(100, 10);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::outside(-11).unwrap(), 10).unwrap();

        let outcome = book
            .remove(&mut bankroll, &BetIdentity::from_label("Red"), 50)
            .unwrap();
        assert_eq!(outcome.refunded(), 10);
        assert_eq!(bankroll.balance(), 100);
        assert!(book.is_empty());
    }

    #[test]
    fn test_partial_remove() {
        let mut bankroll = Bankroll::new(100, 10);
        let mut book = BetBook::new();
        let bet = catalog::corner([1, 2, 4, 5]).unwrap();
        book.place(&mut bankroll, bet.clone(), 10).unwrap();
        book.place(&mut bankroll, bet.clone(), 10).unwrap();

        let outcome = book.remove(&mut bankroll, &bet.identity(), 10).unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Reduced {
                label: "Corner 1-2-4-5".to_string(),
                refunded: 10,
                remaining: 10
            }
        );
        assert_eq!(book.find(&bet.identity()).map(Bet::stake), Some(10));
        assert_eq!(bankroll.balance(), 90);
    }

    #[test]
    fn test_remove_by_numbers() {
        let mut bankroll = Bankroll::new(100, 10);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::split(8, 11).unwrap(), 10).unwrap();
        let outcome = book
            .remove(&mut bankroll, &BetIdentity::from_numbers(&[11, 8]), 10)
            .unwrap();
        assert_eq!(outcome.label(), "Split 8-11");
    }

    #[test]
    fn test_outside_label_does_not_remove_straight() {
        let mut bankroll = Bankroll::new(100, 10);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(1).unwrap(), 10).unwrap();
        let result = book.remove(&mut bankroll, &BetIdentity::from_label("Column 1"), 10);
        assert!(matches!(result, Err(BetError::NotFound(_))));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut bankroll = Bankroll::new(100, 10);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(1).unwrap(), 10).unwrap();
        book.place(&mut bankroll, catalog::straight(2).unwrap(), 10).unwrap();
        book.clear_all();
        assert!(book.is_empty());
        assert_eq!(book.total_staked(), 0);
    }
}
