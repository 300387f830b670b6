//! Error types for the croupier engine
//!
//! Every betting error is a recoverable refusal: the operation is not applied
//! and the caller gets the reason back. Nothing here is fatal to a table.

use crate::common::types::Number;
use thiserror::Error;

/// Root error type for all croupier operations
#[derive(Debug, Error)]
pub enum CroupierError {
    /// Bet placement, removal and resolution refusals
    #[error("Bet error: {0}")]
    Bet(#[from] BetError),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Save file errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Betting refusals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BetError {
    #[error("Unknown outside bet code {0}")]
    InvalidBetCode(i32),

    #[error("Insufficient funds: balance {balance}, one chip costs {required}")]
    InsufficientFunds { balance: u64, required: u64 },

    #[error("No active bet matches '{0}'")]
    NotFound(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Number {0} is not on the wheel")]
    InvalidNumber(i64),

    #[error("Malformed bet: {0}")]
    MalformedBet(String),

    #[error("Stake must be greater than zero")]
    ZeroStake,

    #[error("Chip value cannot change while {active} bets are on the table")]
    ChipValueLocked { active: usize },

    #[error("No active bets to spin on")]
    NoActiveBets,
}

impl BetError {
    pub(crate) fn invalid_number(number: Number) -> Self {
        BetError::InvalidNumber(i64::from(number))
    }
}

/// Configuration and validation errors
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

/// Save file errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Corrupted data: {0}")]
    CorruptedData(String),
}

impl From<serde_json::Error> for CroupierError {
    fn from(e: serde_json::Error) -> Self {
        CroupierError::Storage(StorageError::CorruptedData(e.to_string()))
    }
}

// Convenience type alias for Results
pub type CroupierResult<T> = Result<T, CroupierError>;
