//! Shared type definitions for the croupier engine
//!
//! Canonical wheel types used across the betting core and the outer layers,
//! plus the flat session record the save store persists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pocket on the wheel (0..=36)
pub type Number = u8;

/// Highest pocket on a European wheel
pub const MAX_NUMBER: Number = 36;

/// Red pockets on a European wheel. Blacks are the rest of 1..=36.
pub const RED_NUMBERS: [Number; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Check if a number is red
pub fn is_red(number: Number) -> bool {
    RED_NUMBERS.contains(&number)
}

/// Check if a number is black (zero is neither red nor black)
pub fn is_black(number: Number) -> bool {
    (1..=MAX_NUMBER).contains(&number) && !is_red(number)
}

/// Pocket colour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NumberColor {
    Red,
    Black,
    Green,
}

impl NumberColor {
    pub fn of(number: Number) -> Self {
        if is_red(number) {
            NumberColor::Red
        } else if is_black(number) {
            NumberColor::Black
        } else {
            NumberColor::Green
        }
    }
}

impl fmt::Display for NumberColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberColor::Red => write!(f, "red"),
            NumberColor::Black => write!(f, "black"),
            NumberColor::Green => write!(f, "green"),
        }
    }
}

/// Flat session record owned by the persistence layer.
///
/// The engine only reads `money` as the initial balance; the other fields are
/// carried through so a caller can restore its history panes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub money: u64,
    pub profit: i64,
    #[serde(default)]
    pub betting_history: Vec<String>,
    #[serde(default)]
    pub winning_numbers: Vec<Number>,
}

impl SessionSnapshot {
    /// Fresh session with the given starting money
    pub fn fresh(money: u64) -> Self {
        Self {
            money,
            profit: 0,
            betting_history: Vec::new(),
            winning_numbers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_black_partition() {
        let reds = (1..=MAX_NUMBER).filter(|n| is_red(*n)).count();
        let blacks = (1..=MAX_NUMBER).filter(|n| is_black(*n)).count();
        assert_eq!(reds, 18);
        assert_eq!(blacks, 18);
        assert!(!is_red(0));
        assert!(!is_black(0));
    }

    #[test]
    fn test_number_color() {
        assert_eq!(NumberColor::of(0), NumberColor::Green);
        assert_eq!(NumberColor::of(1), NumberColor::Red);
        assert_eq!(NumberColor::of(2), NumberColor::Black);
        assert_eq!(NumberColor::of(36), NumberColor::Red);
        assert_eq!(NumberColor::Black.to_string(), "black");
    }

    #[test]
    fn test_snapshot_defaults_on_missing_lists() {
        let snapshot: SessionSnapshot =
            serde_json::from_str(r#"{"money": 250, "profit": -40}"#).unwrap();
        assert_eq!(snapshot.money, 250);
        assert_eq!(snapshot.profit, -40);
        assert!(snapshot.betting_history.is_empty());
        assert!(snapshot.winning_numbers.is_empty());
    }
}
