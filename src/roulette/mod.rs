//! Roulette betting core
//!
//! Leaves first: bet types and the catalog, the layout resolver, the bet book,
//! settlement and the outcome selector. `table` ties them into one session
//! and `simulation` runs it in bulk.

pub mod types;
pub mod catalog;
pub mod layout;
pub mod book;
pub mod settlement;
pub mod selector;
pub mod history;
pub mod table;
pub mod simulation;

pub use types::{Bet, BetIdentity, BetKind, OutsideBet};
pub use layout::{AreaClick, CellClick, ClickModifiers, GridArea, TableLayout};
pub use book::{Bankroll, BetBook, Placement, RemoveOutcome};
pub use settlement::{resolve, BetPayout, SpinSettlement};
pub use selector::OutcomeSelector;
pub use history::BetHistory;
pub use table::{RoundReport, SharedTable, Table};
pub use simulation::{Simulation, SimulationReport, SimulationScenario};
