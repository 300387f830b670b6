//! Layout Resolver Module
//!
//! Maps a click on the betting layout to a bet. The layout is a set of
//! independent grid areas; every cell carries a code that is either a pocket
//! (1..=36) or an outside bet code (<= 0). Inside cells resolve to a family by
//! where in the cell the click landed and which modifier was held.

use super::catalog;
use super::types::Bet;
use crate::common::types::{Number, MAX_NUMBER};
use crate::config::LayoutConfig;
use crate::errors::BetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickModifiers {
    /// Select the whole row (street)
    pub lane: bool,
    /// Select two rows (six line)
    pub block: bool,
}

/// A click inside one cell of an area.
///
/// `u` runs left to right and `v` bottom to top, both normalized to the cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellClick {
    pub col: usize,
    pub row: usize,
    pub u: f64,
    pub v: f64,
    #[serde(default)]
    pub modifiers: ClickModifiers,
}

impl CellClick {
    pub fn new(col: usize, row: usize, u: f64, v: f64) -> Self {
        Self {
            col,
            row,
            u,
            v,
            modifiers: ClickModifiers::default(),
        }
    }

    /// Click dead in the middle of the cell
    pub fn center(col: usize, row: usize) -> Self {
        Self::new(col, row, 0.5, 0.5)
    }

    pub fn with_lane(mut self) -> Self {
        self.modifiers.lane = true;
        self
    }

    pub fn with_block(mut self) -> Self {
        self.modifiers.block = true;
        self
    }
}

/// A click addressed to a specific area: `AREA:COL:ROW:U:V[:lane|:block]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaClick {
    pub area: usize,
    pub click: CellClick,
}

impl FromStr for AreaClick {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BetError::MalformedBet(format!("bad click '{}'", s));
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 5 || parts.len() > 6 {
            return Err(malformed());
        }

        let area = parts[0].parse::<usize>().map_err(|_| malformed())?;
        let col = parts[1].parse::<usize>().map_err(|_| malformed())?;
        let row = parts[2].parse::<usize>().map_err(|_| malformed())?;
        let u = parts[3].parse::<f64>().map_err(|_| malformed())?;
        let v = parts[4].parse::<f64>().map_err(|_| malformed())?;

        let mut click = CellClick::new(col, row, u, v);
        match parts.get(5).copied() {
            None => {}
            Some("lane") => click = click.with_lane(),
            Some("block") => click = click.with_block(),
            Some(_) => return Err(malformed()),
        }

        Ok(Self { area, click })
    }
}

/// Where a board-local point landed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellHit {
    pub area: usize,
    pub click: CellClick,
}

/// One rectangular grid of cells. Cell `(col, row)` is `preset[row * cols + col]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridArea {
    pub cols: usize,
    pub rows: usize,
    pub preset: Vec<i32>,
    /// Board-local position of the bottom-left corner
    #[serde(default)]
    pub origin: Option<(f64, f64)>,
    /// Board-local extent (width, depth)
    #[serde(default)]
    pub size: Option<(f64, f64)>,
}

impl GridArea {
    pub fn new(cols: usize, rows: usize, preset: Vec<i32>) -> Result<Self, BetError> {
        if cols == 0 || rows == 0 {
            return Err(BetError::InvalidGeometry(format!(
                "area must have cells, got {}x{}",
                cols, rows
            )));
        }
        if preset.len() != cols * rows {
            return Err(BetError::InvalidGeometry(format!(
                "preset has {} codes for a {}x{} area",
                preset.len(),
                cols,
                rows
            )));
        }
        if let Some(bad) = preset.iter().find(|code| **code > i32::from(MAX_NUMBER)) {
            return Err(BetError::InvalidNumber(i64::from(*bad)));
        }

        Ok(Self {
            cols,
            rows,
            preset,
            origin: None,
            size: None,
        })
    }

    pub fn with_geometry(mut self, origin: (f64, f64), size: (f64, f64)) -> Self {
        self.origin = Some(origin);
        self.size = Some(size);
        self
    }

    pub fn code_at(&self, col: usize, row: usize) -> Option<i32> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.preset.get(row * self.cols + col).copied()
    }

    /// Pocket at the cell, if the cell holds one
    pub fn number_at(&self, col: usize, row: usize) -> Option<Number> {
        self.code_at(col, row)
            .filter(|code| (0..=i32::from(MAX_NUMBER)).contains(code))
            .and_then(|code| Number::try_from(code).ok())
    }

    fn number_at_signed(&self, col: i64, row: i64) -> Option<Number> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        self.number_at(col, row)
    }

    /// The three pockets of a row. Only a three column area has streets.
    pub fn row_numbers(&self, row: usize) -> Option<[Number; 3]> {
        if self.cols != 3 {
            return None;
        }
        Some([
            self.number_at(0, row)?,
            self.number_at(1, row)?,
            self.number_at(2, row)?,
        ])
    }

    /// Six pockets of `start_row` and the row after it
    pub fn six_line_numbers(&self, start_row: usize) -> Option<[Number; 6]> {
        if start_row + 1 >= self.rows {
            return None;
        }
        let lower = self.row_numbers(start_row)?;
        let upper = self.row_numbers(start_row + 1)?;
        Some([lower[0], lower[1], lower[2], upper[0], upper[1], upper[2]])
    }

    /// 2x2 block whose bottom-left cell is `(col, row)`
    pub fn corner_numbers(&self, col: i64, row: i64) -> Option<[Number; 4]> {
        Some([
            self.number_at_signed(col, row)?,
            self.number_at_signed(col + 1, row)?,
            self.number_at_signed(col, row + 1)?,
            self.number_at_signed(col + 1, row + 1)?,
        ])
    }

    /// The cell's pocket and its neighbour one step in `(dx, dz)`
    pub fn split_pair(&self, col: usize, row: usize, dx: i64, dz: i64) -> Option<(Number, Number)> {
        let here = self.number_at(col, row)?;
        let there = self.number_at_signed(col as i64 + dx, row as i64 + dz)?;
        Some((here, there))
    }

    /// Resolve a click in this area to a bet.
    ///
    /// First match wins: outside code, lane, block, corner, edge, straight.
    pub fn resolve(&self, click: &CellClick, thresholds: &LayoutConfig) -> Result<Bet, BetError> {
        let (col, row) = (click.col, click.row);
        let code = self.code_at(col, row).ok_or_else(|| {
            BetError::InvalidGeometry(format!(
                "cell ({}, {}) is outside a {}x{} area",
                col, row, self.cols, self.rows
            ))
        })?;

        if code <= 0 {
            return catalog::outside(code);
        }

        let number = self
            .number_at(col, row)
            .ok_or(BetError::InvalidNumber(i64::from(code)))?;

        if click.modifiers.lane {
            let numbers = self.row_numbers(row).ok_or_else(|| {
                BetError::InvalidGeometry(format!("no street in row {} of a {} column area", row, self.cols))
            })?;
            return catalog::street(numbers);
        }

        if click.modifiers.block {
            let numbers = self
                .six_line_numbers(row)
                .or_else(|| row.checked_sub(1).and_then(|prev| self.six_line_numbers(prev)))
                .ok_or_else(|| {
                    BetError::InvalidGeometry(format!("no six line through row {}", row))
                })?;
            return catalog::six_line(numbers);
        }

        let u = click.u.clamp(0.0, 1.0);
        let v = click.v.clamp(0.0, 1.0);
        let corner = thresholds.corner_threshold;
        let edge = thresholds.edge_threshold;

        let near_side = |t: f64, threshold: f64| t <= threshold || t >= 1.0 - threshold;
        if near_side(u, corner) && near_side(v, corner) {
            // Nearest grid corner, then the block that has it as top-right
            let ax = col as i64 + u.round() as i64;
            let az = row as i64 + v.round() as i64;
            let numbers = self.corner_numbers(ax - 1, az - 1).ok_or_else(|| {
                BetError::InvalidGeometry(format!("corner ({}, {}) is on the area boundary", ax, az))
            })?;
            return catalog::corner(numbers);
        }

        let direction = if u <= edge {
            Some((-1, 0, "left"))
        } else if u >= 1.0 - edge {
            Some((1, 0, "right"))
        } else if v <= edge {
            Some((0, -1, "down"))
        } else if v >= 1.0 - edge {
            Some((0, 1, "up"))
        } else {
            None
        };

        if let Some((dx, dz, side)) = direction {
            let (a, b) = self.split_pair(col, row, dx, dz).ok_or_else(|| {
                BetError::InvalidGeometry(format!("no neighbour {} of {}", side, number))
            })?;
            return catalog::split(a, b);
        }

        catalog::straight(number)
    }

    /// Board-local point to a cell click, if this area has geometry and
    /// contains the point
    pub fn locate(&self, x: f64, z: f64) -> Option<CellClick> {
        let (ox, oz) = self.origin?;
        let (width, depth) = self.size?;
        let cell_x = width / self.cols as f64;
        let cell_z = depth / self.rows as f64;
        if cell_x <= 0.0 || cell_z <= 0.0 {
            return None;
        }

        let gx = (x - ox) / cell_x;
        let gz = (z - oz) / cell_z;
        if gx < 0.0 || gz < 0.0 {
            return None;
        }
        let col = gx.floor() as usize;
        let row = gz.floor() as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }

        Some(CellClick::new(col, row, gx - col as f64, gz - row as f64))
    }
}

impl fmt::Display for GridArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Top row first, the way the table reads from the dealer's side
        for row in (0..self.rows).rev() {
            let cells: Vec<String> = (0..self.cols)
                .map(|col| format!("{:>4}", self.code_at(col, row).unwrap_or_default()))
                .collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

/// Every clickable area of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub areas: Vec<GridArea>,
}

impl TableLayout {
    pub fn new(areas: Vec<GridArea>) -> Self {
        Self { areas }
    }

    /// Standard European layout.
    ///
    /// Area 0 is the 3x12 number grid, row `r` holding `3r+1..=3r+3`, one
    /// unit per cell. Area 1 sits above it with the twelve outside cells.
    pub fn european() -> Self {
        let numbers: Vec<i32> = (1..=i32::from(MAX_NUMBER)).collect();
        let outside = vec![
            -1, -2, -3, // columns
            -6, -5, -4, // dozens
            -10, -8, -7, // low, odd, high
            -11, -9, -12, // red, even, black
        ];

        Self {
            areas: vec![
                GridArea {
                    cols: 3,
                    rows: 12,
                    preset: numbers,
                    origin: Some((0.0, 0.0)),
                    size: Some((3.0, 12.0)),
                },
                GridArea {
                    cols: 3,
                    rows: 4,
                    preset: outside,
                    origin: Some((0.0, 12.0)),
                    size: Some((3.0, 4.0)),
                },
            ],
        }
    }

    pub fn area(&self, index: usize) -> Result<&GridArea, BetError> {
        self.areas
            .get(index)
            .ok_or_else(|| BetError::InvalidGeometry(format!("no area {}", index)))
    }

    pub fn resolve(&self, area: usize, click: &CellClick, thresholds: &LayoutConfig) -> Result<Bet, BetError> {
        self.area(area)?.resolve(click, thresholds)
    }

    /// First area containing the board-local point
    pub fn locate(&self, x: f64, z: f64) -> Option<CellHit> {
        self.areas
            .iter()
            .enumerate()
            .find_map(|(area, grid)| grid.locate(x, z).map(|click| CellHit { area, click }))
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::european()
    }
}

impl fmt::Display for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, area) in self.areas.iter().enumerate() {
            writeln!(f, "Area {} ({}x{}):", index, area.cols, area.rows)?;
            write!(f, "{}", area)?;
        }
        Ok(())
    }
}
