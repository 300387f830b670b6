//! Spin settlement
//!
//! Sweeps the book against a winning number, credits the bankroll with every
//! winning return and clears the table.

use super::book::{Bankroll, BetBook};
use crate::common::types::Number;
use serde::{Deserialize, Serialize};

/// Return on one winning bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetPayout {
    pub name: String,
    pub stake: u64,
    pub payout: u32,
    /// Stake plus winnings
    pub amount: u64,
}

/// Outcome of settling one spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinSettlement {
    pub winning_number: Number,
    /// Credited to the bankroll; zero on a full loss
    pub total_return: u64,
    /// Stake that sat on winning bets
    pub winning_stake: u64,
    /// Stake on the table before the sweep
    pub total_staked: u64,
    pub payouts: Vec<BetPayout>,
}

impl SpinSettlement {
    pub fn is_win(&self) -> bool {
        self.total_return > 0
    }
}

/// Settle every active bet against `winning`. The book is always left empty.
pub fn resolve(book: &mut BetBook, bankroll: &mut Bankroll, winning: Number) -> SpinSettlement {
    let bets = book.take_all();
    let total_staked = bets
        .iter()
        .fold(0u64, |sum, bet| sum.saturating_add(bet.stake()));

    let payouts: Vec<BetPayout> = bets
        .iter()
        .filter(|bet| bet.covers(winning))
        .map(|bet| BetPayout {
            name: bet.name().to_string(),
            stake: bet.stake(),
            payout: bet.payout(),
            amount: bet.return_on_hit(),
        })
        .collect();

    let total_return = payouts
        .iter()
        .fold(0u64, |sum, payout| sum.saturating_add(payout.amount));
    let winning_stake = payouts
        .iter()
        .fold(0u64, |sum, payout| sum.saturating_add(payout.stake));

    bankroll.credit(total_return);

    SpinSettlement {
        winning_number: winning,
        total_return,
        winning_stake,
        total_staked,
        payouts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roulette::catalog;

    #[test]
    fn test_straight_merge_then_hit() {
        let mut bankroll = Bankroll::new(1000, 10);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(17).unwrap(), 10).unwrap();
        book.place(&mut bankroll, catalog::straight(17).unwrap(), 10).unwrap();

        let settlement = resolve(&mut book, &mut bankroll, 17);
        assert_eq!(settlement.total_return, 720);
        assert_eq!(settlement.winning_stake, 20);
        assert_eq!(settlement.total_staked, 20);
        assert_eq!(bankroll.balance(), 980 + 720);
        assert!(book.is_empty());
    }

    #[test]
    fn test_red_hit_and_miss() {
        let red = catalog::outside(-11).unwrap();

        let mut bankroll = Bankroll::new(100, 5);
        let mut book = BetBook::new();
        book.place(&mut bankroll, red.clone(), 5).unwrap();
        assert_eq!(resolve(&mut book, &mut bankroll, 1).total_return, 10);

        book.place(&mut bankroll, red, 5).unwrap();
        let settlement = resolve(&mut book, &mut bankroll, 2);
        assert_eq!(settlement.total_return, 0);
        assert!(!settlement.is_win());
        assert!(settlement.payouts.is_empty());
    }

    #[test]
    fn test_zero_loses_outside_bets() {
        let mut bankroll = Bankroll::new(100, 5);
        let mut book = BetBook::new();
        for code in -12..=-1 {
            book.place(&mut bankroll, catalog::outside(code).unwrap(), 5).unwrap();
        }
        let settlement = resolve(&mut book, &mut bankroll, 0);
        assert_eq!(settlement.total_return, 0);
        assert_eq!(settlement.total_staked, 60);
    }

    #[test]
    fn test_multiple_winners_sum() {
        let mut bankroll = Bankroll::new(100, 5);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(5).unwrap(), 5).unwrap();
        book.place(&mut bankroll, catalog::split(5, 8).unwrap(), 5).unwrap();
        book.place(&mut bankroll, catalog::outside(-12).unwrap(), 5).unwrap();

        let settlement = resolve(&mut book, &mut bankroll, 5);
        // 180 + 90, black loses
        assert_eq!(settlement.total_return, 270);
        assert_eq!(settlement.payouts.len(), 2);
        assert_eq!(settlement.winning_stake, 10);
    }

    #[test]
    fn test_huge_stakes_settle_without_overflow() {
        let stake = u64::MAX / 2 + 1;
        let mut bankroll = Bankroll::new(u64::MAX, 1);
        let mut book = BetBook::new();
        book.place(&mut bankroll, catalog::straight(1).unwrap(), stake).unwrap();
        book.place(&mut bankroll, catalog::straight(2).unwrap(), stake).unwrap();
        assert_eq!(book.total_staked(), u64::MAX);

        let settlement = resolve(&mut book, &mut bankroll, 1);
        assert_eq!(settlement.total_staked, u64::MAX);
        assert_eq!(settlement.winning_stake, stake);
        assert_eq!(settlement.total_return, u64::MAX);
        assert_eq!(bankroll.balance(), u64::MAX);
        assert!(book.is_empty());
    }

    #[test]
    fn test_resolve_always_clears() {
        let mut bankroll = Bankroll::new(100, 5);
        let mut book = BetBook::new();
        for winning in [0, 7, 36] {
            book.place(&mut bankroll, catalog::straight(7).unwrap(), 5).unwrap();
            resolve(&mut book, &mut bankroll, winning);
            assert_eq!(book.len(), 0);
        }

        // resolving an empty book is a zero return
        let settlement = resolve(&mut book, &mut bankroll, 7);
        assert_eq!(settlement.total_return, 0);
        assert_eq!(settlement.total_staked, 0);
    }
}
