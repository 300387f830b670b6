//! Rolling bet and spin log
//!
//! Open bets keep one line each that tracks their current total; spins add a
//! result line. Old lines fall off the front once the cap is reached.

use crate::common::types::{Number, NumberColor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetHistory {
    lines: Vec<String>,
    winning_numbers: Vec<Number>,
    /// Net result per spin, same window as `winning_numbers`
    spin_nets: Vec<i64>,
    total_spins: u64,
    max_lines: usize,
    max_spin_lines: usize,
}

impl BetHistory {
    pub fn new(max_lines: usize, max_spin_lines: usize) -> Self {
        Self {
            lines: Vec::new(),
            winning_numbers: Vec::new(),
            spin_nets: Vec::new(),
            total_spins: 0,
            max_lines,
            max_spin_lines,
        }
    }

    /// Restore saved lines and winning numbers, trimmed to the caps
    pub fn restore(mut self, lines: Vec<String>, winning_numbers: Vec<Number>) -> Self {
        self.lines = lines;
        self.winning_numbers = winning_numbers;
        trim_front(&mut self.lines, self.max_lines);
        trim_front(&mut self.winning_numbers, self.max_spin_lines);
        self
    }

    fn bet_prefix(label: &str) -> String {
        format!("Bet : {} - $", label)
    }

    /// Add the bet's line, or update its running total if already logged
    pub fn record_placement(&mut self, label: &str, total_stake: u64) {
        let prefix = Self::bet_prefix(label);
        let line = format!("{}{}", prefix, total_stake);
        match self.lines.iter().position(|l| l.starts_with(&prefix)) {
            Some(index) => self.lines[index] = line,
            None => self.push_line(line),
        }
    }

    /// Update the line after a partial removal, drop it when the bet is gone
    pub fn record_removal(&mut self, label: &str, remaining: u64) {
        let prefix = Self::bet_prefix(label);
        let Some(index) = self.lines.iter().position(|l| l.starts_with(&prefix)) else {
            return;
        };
        if remaining == 0 {
            self.lines.remove(index);
        } else {
            self.lines[index] = format!("{}{}", prefix, remaining);
        }
    }

    /// Log a spin. Returns the line that was written.
    pub fn record_spin(&mut self, winning: Number, total_return: u64, net: i64) -> String {
        self.total_spins += 1;

        self.winning_numbers.push(winning);
        trim_front(&mut self.winning_numbers, self.max_spin_lines);
        self.spin_nets.push(net);
        trim_front(&mut self.spin_nets, self.max_spin_lines);

        let result = if total_return > 0 {
            format!("WIN +${}", total_return)
        } else {
            "LOSE".to_string()
        };
        let line = format!("Spin {}: {} -> {}", self.total_spins, winning, result);
        self.push_line(line.clone());
        line
    }

    fn push_line(&mut self, line: String) {
        self.lines.push(line);
        trim_front(&mut self.lines, self.max_lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn winning_numbers(&self) -> &[Number] {
        &self.winning_numbers
    }

    pub fn spin_nets(&self) -> &[i64] {
        &self.spin_nets
    }

    pub fn total_spins(&self) -> u64 {
        self.total_spins
    }

    /// Recent winners with their colours, oldest first
    pub fn colored_winners(&self) -> Vec<(Number, NumberColor)> {
        self.winning_numbers
            .iter()
            .map(|n| (*n, NumberColor::of(*n)))
            .collect()
    }
}

/// Keep only the newest `cap` items
pub(crate) fn trim_front<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        items.drain(..items.len() - cap);
    }
}
