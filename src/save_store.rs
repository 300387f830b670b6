//! Session save file stored as pretty JSON.
//!
//! A missing or unreadable save is never fatal: the store writes a fresh
//! default record and hands that back.

use crate::{
    common::types::{Number, SessionSnapshot},
    config::HistoryConfig,
    errors::{CroupierError, CroupierResult, StorageError},
    roulette::history::trim_front,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct SaveStore {
    path: PathBuf,
    starting_money: u64,
    history: HistoryConfig,
}

impl SaveStore {
    pub fn new<P: AsRef<Path>>(path: P, starting_money: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            starting_money,
            history: HistoryConfig::default(),
        }
    }

    /// Cap the saved history lists the same way the table caps them
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the save, rebuilding it with defaults when it is missing or corrupt
    pub fn load(&self) -> CroupierResult<SessionSnapshot> {
        if !self.path.exists() {
            return self.create_fresh();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Save load failed ({}): {}. Rebuilding with defaults", self.path.display(), e);
                return self.create_fresh();
            }
        };

        match serde_json::from_str::<SessionSnapshot>(&content) {
            Ok(snapshot) => {
                debug!("Loaded save from {}", self.path.display());
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Save file {} invalid: {}. Rebuilding with defaults", self.path.display(), e);
                self.create_fresh()
            }
        }
    }

    /// Write the save, keeping only the newest history lines and winners
    pub fn save(&self, snapshot: &SessionSnapshot) -> CroupierResult<()> {
        let mut snapshot = snapshot.clone();
        self.cap(&mut snapshot);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CroupierError::Storage(StorageError::WriteFailed(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| {
            CroupierError::Storage(StorageError::WriteFailed(format!(
                "Failed to encode save: {}",
                e
            )))
        })?;

        fs::write(&self.path, json).map_err(|e| {
            CroupierError::Storage(StorageError::WriteFailed(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            )))
        })?;

        debug!("Saved to {}", self.path.display());
        Ok(())
    }

    /// Throw the old save away and start over
    pub fn new_game(&self) -> CroupierResult<SessionSnapshot> {
        self.create_fresh()
    }

    /// Record the end of a round: money and profit are overwritten, the new
    /// history lines and the winning number are appended.
    pub fn record_round(
        &self,
        money: u64,
        profit: i64,
        new_lines: &[String],
        winning_number: Number,
    ) -> CroupierResult<SessionSnapshot> {
        let mut snapshot = self.load()?;
        snapshot.money = money;
        snapshot.profit = profit;
        snapshot.betting_history.extend_from_slice(new_lines);
        snapshot.winning_numbers.push(winning_number);
        self.cap(&mut snapshot);
        self.save(&snapshot)?;
        Ok(snapshot)
    }

    fn cap(&self, snapshot: &mut SessionSnapshot) {
        trim_front(&mut snapshot.betting_history, self.history.max_lines);
        trim_front(&mut snapshot.winning_numbers, self.history.max_spin_lines);
    }

    fn create_fresh(&self) -> CroupierResult<SessionSnapshot> {
        let snapshot = SessionSnapshot::fresh(self.starting_money);
        self.save(&snapshot)?;
        info!("Created fresh save at {}", self.path.display());
        Ok(snapshot)
    }
}
