use crate::common::types::{is_black, is_red, Number, MAX_NUMBER};
use crate::errors::BetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outside bets, keyed by their (negative) layout code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OutsideBet {
    Column1,     // -1
    Column2,     // -2
    Column3,     // -3
    DozenThird,  // -4, 25-36
    DozenSecond, // -5, 13-24
    DozenFirst,  // -6, 1-12
    High,        // -7, 19-36
    Odd,         // -8
    Even,        // -9
    Low,         // -10, 1-18
    Red,         // -11
    Black,       // -12
}

impl OutsideBet {
    /// All outside bets in code order (-1 first)
    pub const ALL: [OutsideBet; 12] = [
        OutsideBet::Column1,
        OutsideBet::Column2,
        OutsideBet::Column3,
        OutsideBet::DozenThird,
        OutsideBet::DozenSecond,
        OutsideBet::DozenFirst,
        OutsideBet::High,
        OutsideBet::Odd,
        OutsideBet::Even,
        OutsideBet::Low,
        OutsideBet::Red,
        OutsideBet::Black,
    ];

    pub fn from_code(code: i32) -> Result<Self, BetError> {
        if (-12..=-1).contains(&code) {
            Ok(Self::ALL[(-code - 1) as usize])
        } else {
            Err(BetError::InvalidBetCode(code))
        }
    }

    pub fn code(self) -> i32 {
        match self {
            OutsideBet::Column1 => -1,
            OutsideBet::Column2 => -2,
            OutsideBet::Column3 => -3,
            OutsideBet::DozenThird => -4,
            OutsideBet::DozenSecond => -5,
            OutsideBet::DozenFirst => -6,
            OutsideBet::High => -7,
            OutsideBet::Odd => -8,
            OutsideBet::Even => -9,
            OutsideBet::Low => -10,
            OutsideBet::Red => -11,
            OutsideBet::Black => -12,
        }
    }

    /// Fixed display label
    pub fn name(self) -> &'static str {
        match self {
            OutsideBet::Column1 => "Column 1",
            OutsideBet::Column2 => "Column 2",
            OutsideBet::Column3 => "Column 3",
            OutsideBet::DozenThird => "Dozen 25-36",
            OutsideBet::DozenSecond => "Dozen 13-24",
            OutsideBet::DozenFirst => "Dozen 1-12",
            OutsideBet::High => "High 19-36",
            OutsideBet::Odd => "Odd",
            OutsideBet::Even => "Even",
            OutsideBet::Low => "Low 1-18",
            OutsideBet::Red => "Red",
            OutsideBet::Black => "Black",
        }
    }

    /// Exact label lookup. En dashes are accepted in place of hyphens.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('\u{2013}', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|bet| bet.name() == normalized)
    }

    /// Payout ratio (N:1): 2 for columns and dozens, 1 for even-money bets
    pub fn payout(self) -> u32 {
        match self {
            OutsideBet::Column1
            | OutsideBet::Column2
            | OutsideBet::Column3
            | OutsideBet::DozenFirst
            | OutsideBet::DozenSecond
            | OutsideBet::DozenThird => 2,
            _ => 1,
        }
    }

    /// Covered numbers, ascending
    pub fn numbers(self) -> Vec<Number> {
        let all = 1..=MAX_NUMBER;
        match self {
            OutsideBet::Column1 => all.filter(|n| n % 3 == 1).collect(),
            OutsideBet::Column2 => all.filter(|n| n % 3 == 2).collect(),
            OutsideBet::Column3 => all.filter(|n| n % 3 == 0).collect(),
            OutsideBet::DozenFirst => (1..=12).collect(),
            OutsideBet::DozenSecond => (13..=24).collect(),
            OutsideBet::DozenThird => (25..=36).collect(),
            OutsideBet::Low => (1..=18).collect(),
            OutsideBet::High => (19..=36).collect(),
            OutsideBet::Odd => all.filter(|n| n % 2 == 1).collect(),
            OutsideBet::Even => all.filter(|n| n % 2 == 0).collect(),
            OutsideBet::Red => all.filter(|n| is_red(*n)).collect(),
            OutsideBet::Black => all.filter(|n| is_black(*n)).collect(),
        }
    }
}

/// Bet family
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BetKind {
    Straight,
    Split,
    Corner,
    Street,
    SixLine,
    Outside(OutsideBet),
}

impl BetKind {
    /// Payout ratio (N:1) for the family
    pub fn payout(self) -> u32 {
        match self {
            BetKind::Straight => 35,
            BetKind::Split => 17,
            BetKind::Street => 11,
            BetKind::Corner => 8,
            BetKind::SixLine => 5,
            BetKind::Outside(outside) => outside.payout(),
        }
    }

    /// Number of pockets an inside family covers
    pub fn inside_len(self) -> Option<usize> {
        match self {
            BetKind::Straight => Some(1),
            BetKind::Split => Some(2),
            BetKind::Street => Some(3),
            BetKind::Corner => Some(4),
            BetKind::SixLine => Some(6),
            BetKind::Outside(_) => None,
        }
    }

    /// Label prefix for inside families
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            BetKind::Straight => Some("Straight"),
            BetKind::Split => Some("Split"),
            BetKind::Street => Some("Street"),
            BetKind::Corner => Some("Corner"),
            BetKind::SixLine => Some("Six Line"),
            BetKind::Outside(_) => None,
        }
    }
}

/// A wager on a set of pockets.
///
/// Numbers are kept sorted and distinct, so two bets on the same pockets
/// always compare equal on `numbers()` regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    kind: BetKind,
    numbers: Vec<Number>,
    payout: u32,
    stake: u64,
    name: String,
}

impl Bet {
    /// Build from already validated, sorted numbers. Stake starts at zero.
    pub(crate) fn new(kind: BetKind, numbers: Vec<Number>, name: String) -> Self {
        Self {
            kind,
            payout: kind.payout(),
            numbers,
            stake: 0,
            name,
        }
    }

    pub fn with_stake(mut self, stake: u64) -> Self {
        self.stake = stake;
        self
    }

    pub fn kind(&self) -> BetKind {
        self.kind
    }

    pub fn numbers(&self) -> &[Number] {
        &self.numbers
    }

    pub fn payout(&self) -> u32 {
        self.payout
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn covers(&self, number: Number) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    /// Stake back plus winnings when the bet hits
    pub fn return_on_hit(&self) -> u64 {
        self.stake
            .saturating_mul(u64::from(self.payout))
            .saturating_add(self.stake)
    }

    /// Straight bets show the bare number, everything else its name
    pub fn history_label(&self) -> String {
        match self.numbers.as_slice() {
            [single] => single.to_string(),
            _ => self.name.clone(),
        }
    }

    pub fn identity(&self) -> BetIdentity {
        BetIdentity {
            label: Some(self.name.clone()),
            numbers: self.numbers.clone(),
        }
    }

    pub(crate) fn add_stake(&mut self, amount: u64) -> u64 {
        self.stake = self.stake.saturating_add(amount);
        self.stake
    }

    pub(crate) fn take_stake(&mut self, amount: u64) -> u64 {
        let taken = amount.min(self.stake);
        self.stake -= taken;
        taken
    }
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:1, stake {})", self.name, self.payout, self.stake)
    }
}

/// How a caller names a bet it wants to find.
///
/// Identity is decided by the covered number set. A display label is a
/// second strategy for callers that only hold a label: labels that are equal
/// match outright, and a label's embedded integers stand in for its numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetIdentity {
    label: Option<String>,
    numbers: Vec<Number>,
}

impl BetIdentity {
    pub fn from_numbers(numbers: &[Number]) -> Self {
        let mut numbers = numbers.to_vec();
        numbers.sort_unstable();
        Self {
            label: None,
            numbers,
        }
    }

    /// Identity from a display label.
    ///
    /// Outside bet names resolve to their fixed sets. Any other label uses
    /// every run of digits it contains; a label with a run that is not a
    /// pocket keeps no numbers and can only match by label.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if let Some(outside) = OutsideBet::from_name(label) {
            return Self {
                label: Some(outside.name().to_string()),
                numbers: outside.numbers(),
            };
        }

        let parsed = parse_label_numbers(label);
        let mut numbers: Vec<Number> = if parsed.iter().all(|n| *n <= u32::from(MAX_NUMBER)) {
            parsed.into_iter().map(|n| n as Number).collect()
        } else {
            Vec::new()
        };
        numbers.sort_unstable();

        Self {
            label: Some(label.to_string()),
            numbers,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn numbers(&self) -> &[Number] {
        &self.numbers
    }

    pub fn matches(&self, bet: &Bet) -> bool {
        if self.label.as_deref() == Some(bet.name()) {
            return true;
        }
        !self.numbers.is_empty() && self.numbers == bet.numbers
    }
}

impl fmt::Display for BetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}", label),
            None => {
                let joined: Vec<String> = self.numbers.iter().map(|n| n.to_string()).collect();
                write!(f, "{}", joined.join("-"))
            }
        }
    }
}

/// Every maximal run of ASCII digits in the label, in order of appearance.
pub fn parse_label_numbers(label: &str) -> Vec<u32> {
    let mut numbers = Vec::new();
    let mut current: Option<u32> = None;

    for c in label.chars() {
        if let Some(digit) = c.to_digit(10) {
            let value = current.unwrap_or(0);
            current = Some(value.saturating_mul(10).saturating_add(digit));
        } else if let Some(value) = current.take() {
            numbers.push(value);
        }
    }
    if let Some(value) = current {
        numbers.push(value);
    }

    numbers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_codes_round_trip() {
        for (i, bet) in OutsideBet::ALL.iter().enumerate() {
            assert_eq!(bet.code(), -(i as i32) - 1);
            assert_eq!(OutsideBet::from_code(bet.code()), Ok(*bet));
            assert_eq!(OutsideBet::from_name(bet.name()), Some(*bet));
        }
        assert_eq!(OutsideBet::from_code(0), Err(BetError::InvalidBetCode(0)));
        assert_eq!(OutsideBet::from_code(-13), Err(BetError::InvalidBetCode(-13)));
    }

    #[test]
    fn test_outside_payout_matches_cardinality() {
        for bet in OutsideBet::ALL {
            let expected = match bet.numbers().len() {
                12 => 2,
                18 => 1,
                other => panic!("unexpected cardinality {}", other),
            };
            assert_eq!(bet.payout(), expected, "{}", bet.name());
        }
    }

    #[test]
    fn test_outside_sets() {
        assert_eq!(OutsideBet::Column1.numbers()[..3].to_vec(), vec![1, 4, 7]);
        assert_eq!(OutsideBet::Column3.numbers().last(), Some(&36));
        assert_eq!(OutsideBet::DozenSecond.numbers().first(), Some(&13));
        assert!(!OutsideBet::Red.numbers().contains(&0));
        assert!(!OutsideBet::Black.numbers().contains(&0));
        assert!(!OutsideBet::Even.numbers().contains(&0));
    }

    #[test]
    fn test_from_name_accepts_en_dash() {
        assert_eq!(OutsideBet::from_name("Dozen 1\u{2013}12"), Some(OutsideBet::DozenFirst));
        assert_eq!(OutsideBet::from_name("Purple"), None);
    }

    #[test]
    fn test_parse_label_numbers() {
        assert_eq!(parse_label_numbers("Split 8-11"), vec![8, 11]);
        assert_eq!(parse_label_numbers("Corner 1-2-4-5"), vec![1, 2, 4, 5]);
        assert_eq!(parse_label_numbers("17"), vec![17]);
        assert_eq!(parse_label_numbers("a1b22c333"), vec![1, 22, 333]);
        assert!(parse_label_numbers("Red").is_empty());
    }

    #[test]
    fn test_identity_label_fallback() {
        let straight = Bet::new(BetKind::Straight, vec![17], "Straight 17".to_string());
        assert!(BetIdentity::from_label("Straight 17").matches(&straight));
        assert!(BetIdentity::from_label("17").matches(&straight));
        assert!(!BetIdentity::from_label("Straight 18").matches(&straight));
    }

    #[test]
    fn test_outside_label_does_not_match_straight() {
        let straight_one = Bet::new(BetKind::Straight, vec![1], "Straight 1".to_string());
        assert!(!BetIdentity::from_label("Column 1").matches(&straight_one));
    }

    #[test]
    fn test_identity_ignores_order() {
        let split = Bet::new(BetKind::Split, vec![8, 11], "Split 8-11".to_string());
        assert!(BetIdentity::from_numbers(&[11, 8]).matches(&split));
        assert!(BetIdentity::from_label("Split 11-8").matches(&split));
    }

    #[test]
    fn test_out_of_range_label_matches_only_by_label() {
        let identity = BetIdentity::from_label("Straight 300");
        assert!(identity.numbers().is_empty());
        let straight = Bet::new(BetKind::Straight, vec![30], "Straight 30".to_string());
        assert!(!identity.matches(&straight));
    }

    #[test]
    fn test_return_on_hit() {
        let bet = Bet::new(BetKind::Straight, vec![17], "Straight 17".to_string()).with_stake(20);
        assert_eq!(bet.return_on_hit(), 720);
        assert_eq!(bet.history_label(), "17");
    }
}
