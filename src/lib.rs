//! Croupier - Single-Table European Roulette Engine
//!
//! Tracks chips on a betting layout, merges and removes stakes, settles a spin
//! against the active bets and draws the winning number from a fair or biased
//! wheel. Configuration, the session save file and a batch simulator sit
//! around that core.

pub mod common;
pub mod config;
pub mod errors;
pub mod roulette;
pub mod save_store;

pub use common::types::{Number, NumberColor, SessionSnapshot, MAX_NUMBER};
pub use config::CroupierConfig;
pub use errors::{BetError, CroupierError, CroupierResult};
pub use roulette::{
    catalog, Bankroll, Bet, BetBook, BetIdentity, BetKind, CellClick, OutcomeSelector,
    OutsideBet, RoundReport, SharedTable, Table, TableLayout,
};
pub use save_store::SaveStore;
