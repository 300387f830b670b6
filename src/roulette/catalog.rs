//! Bet constructors for every family on the layout.
//!
//! Constructors are pure: they validate pockets and build a `Bet` with a zero
//! stake. They know nothing about where a bet sits on the table, so a split
//! over two pockets that are not neighbours is still a well-formed split here;
//! the layout resolver is what only ever asks for adjacent ones.

use super::types::{parse_label_numbers, Bet, BetKind, OutsideBet};
use crate::common::types::{Number, MAX_NUMBER};
use crate::errors::BetError;

/// Single number, 35:1
pub fn straight(number: Number) -> Result<Bet, BetError> {
    inside(BetKind::Straight, &[number])
}

/// Two numbers, 17:1
pub fn split(a: Number, b: Number) -> Result<Bet, BetError> {
    inside(BetKind::Split, &[a, b])
}

/// 2x2 block, 8:1
pub fn corner(numbers: [Number; 4]) -> Result<Bet, BetError> {
    inside(BetKind::Corner, &numbers)
}

/// One row of three, 11:1
pub fn street(numbers: [Number; 3]) -> Result<Bet, BetError> {
    inside(BetKind::Street, &numbers)
}

/// Two rows of three, 5:1
pub fn six_line(numbers: [Number; 6]) -> Result<Bet, BetError> {
    inside(BetKind::SixLine, &numbers)
}

/// Outside bet from its layout code (-1..=-12)
pub fn outside(code: i32) -> Result<Bet, BetError> {
    OutsideBet::from_code(code).map(outside_bet)
}

pub fn outside_bet(outside: OutsideBet) -> Bet {
    Bet::new(
        BetKind::Outside(outside),
        outside.numbers(),
        outside.name().to_string(),
    )
}

/// Build an inside bet of the given family from pockets in any order.
pub fn inside(kind: BetKind, numbers: &[Number]) -> Result<Bet, BetError> {
    let expected = kind.inside_len().ok_or_else(|| {
        BetError::MalformedBet("outside bets are built from a code, not numbers".to_string())
    })?;

    if numbers.len() != expected {
        return Err(BetError::MalformedBet(format!(
            "{:?} covers {} numbers, got {}",
            kind,
            expected,
            numbers.len()
        )));
    }

    if let Some(bad) = numbers.iter().find(|n| **n > MAX_NUMBER) {
        return Err(BetError::invalid_number(*bad));
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(BetError::MalformedBet(format!(
            "duplicate number in {:?}",
            numbers
        )));
    }

    let name = inside_name(kind, &sorted);
    Ok(Bet::new(kind, sorted, name))
}

/// Display name for an inside bet: family prefix plus the sorted numbers
/// joined by hyphens ("Split 8-11", "Six Line 1-2-3-4-5-6").
pub fn inside_name(kind: BetKind, numbers: &[Number]) -> String {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    let joined: Vec<String> = sorted.iter().map(|n| n.to_string()).collect();
    format!("{} {}", kind.prefix().unwrap_or("Bet"), joined.join("-"))
}

const INSIDE_FAMILIES: [BetKind; 5] = [
    BetKind::Straight,
    BetKind::Split,
    BetKind::Street,
    BetKind::Corner,
    BetKind::SixLine,
];

/// Rebuild a bet from its display name.
///
/// Outside bets match their label exactly. Inside bets are a family prefix
/// followed by the covered numbers; a bare number is a straight bet.
pub fn parse_bet(label: &str) -> Result<Bet, BetError> {
    let label = label.trim();

    if let Some(outside) = OutsideBet::from_name(label) {
        return Ok(outside_bet(outside));
    }

    let kind = if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
        BetKind::Straight
    } else {
        INSIDE_FAMILIES
            .iter()
            .copied()
            .find(|kind| {
                kind.prefix().is_some_and(|prefix| {
                    label
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with(' '))
                })
            })
            .ok_or_else(|| BetError::MalformedBet(format!("unrecognised bet '{}'", label)))?
    };

    let mut numbers = Vec::new();
    for value in parse_label_numbers(label) {
        let number = Number::try_from(value)
            .ok()
            .filter(|n| *n <= MAX_NUMBER)
            .ok_or(BetError::InvalidNumber(i64::from(value)))?;
        numbers.push(number);
    }

    inside(kind, &numbers)
}
