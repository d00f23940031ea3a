//! Diagnostics for live games.
//!
//! Logging goes through `tracing`; a subscriber is only installed when a log
//! file is configured, since stdout carries the protocol. This module also
//! owns the content hashes used to compare runs and the per-game counters
//! reported along the way.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::board::{Direction, GameState, STRENGTH_CAP};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "LANDGRAB_LOG";

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to open log file '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Appends formatted events to `path`. The filter comes from
/// [`LOG_ENV`], defaulting to `info`.
pub fn init_logging(path: &Path) -> Result<(), LogError> {
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LogError::Install(e.to_string()))
}

fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash of every cell's owner, production and strength.
pub fn board_hash(state: &GameState) -> String {
    let parts: Vec<String> = (0..state.size())
        .map(|i| format!("{} {} {}", state.owner[i], state.production[i], state.strength[i]))
        .collect();
    sha256_hex(&parts.join(" "))
}

/// Hash of the moves we are about to send.
pub fn moves_hash(state: &GameState) -> String {
    let parts: Vec<String> = (0..state.size())
        .filter(|&i| state.is_mine(i) && state.move_of(i) != Direction::Still)
        .map(|i| format!("{} {}", i, state.move_of(i).code()))
        .collect();
    sha256_hex(&parts.join(" "))
}

/// A cell projected above the strength cap after this turn's moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overflow {
    pub cell: usize,
    pub excess: i32,
    /// Cells moving into it, with their direction name and note.
    pub movers: Vec<(usize, &'static str, &'static str)>,
}

/// How the game looks from our side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    Victory,
    Defeat,
}

impl Outlook {
    /// Defeat below 1 cell per 20 enemy cells, victory above 20 per enemy
    /// cell. `None` while neither holds or when no enemy is left.
    pub fn assess(state: &GameState) -> Option<Outlook> {
        let enemies = state.count_enemy();
        if enemies == 0 {
            return None;
        }
        let ratio = state.count_friendly() as f32 / enemies as f32;
        if ratio < 0.05 {
            Some(Outlook::Defeat)
        } else if ratio > 20.0 {
            Some(Outlook::Victory)
        } else {
            None
        }
    }
}

/// Per-game counters and log-once bookkeeping.
#[derive(Debug, Default)]
pub struct Diagnostics {
    logged_once: BTreeSet<&'static str>,
    pub total_overallocation: i64,
    pub longest_ponder: Duration,
    pub longest_ponder_turn: i32,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time `key` is seen.
    pub fn log_once(&mut self, key: &'static str) -> bool {
        self.logged_once.insert(key)
    }

    /// Finds cells left above the cap, adds their excess to the running
    /// total and logs them.
    pub fn overallocation(&mut self, state: &GameState) -> Vec<Overflow> {
        let mut found = Vec::new();
        for i in 0..state.size() {
            let excess = state.allocation(i) - STRENGTH_CAP;
            if excess <= 0 {
                continue;
            }
            let movers = state
                .grid
                .neighbours(i)
                .iter()
                .filter(|n| state.move_of(n.index) == n.dir.opposite())
                .map(|n| (n.index, n.dir.opposite().name(), state.orders.notes[n.index]))
                .collect();
            found.push(Overflow {
                cell: i,
                excess,
                movers,
            });
        }

        if !found.is_empty() {
            self.total_overallocation += found.iter().map(|o| o.excess as i64).sum::<i64>();
            warn!(
                turn = state.turn,
                cumulative = self.total_overallocation,
                "over-allocation: {:?}",
                found
            );
        }
        found
    }

    pub fn record_ponder(&mut self, turn: i32, elapsed: Duration) {
        if elapsed > self.longest_ponder {
            self.longest_ponder = elapsed;
            self.longest_ponder_turn = turn;
        }
    }

    /// Logs the first victory or defeat prediction of the game, with the
    /// ponder record and the board hash.
    pub fn outlook(&mut self, state: &GameState) -> Option<Outlook> {
        if state.is_sim {
            return None;
        }
        let outlook = Outlook::assess(state)?;
        let key = match outlook {
            Outlook::Victory => "victory",
            Outlook::Defeat => "defeat",
        };
        if !self.log_once(key) {
            return None;
        }
        info!(turn = state.turn, ?outlook, "imminent {key}");
        info!(
            turn = self.longest_ponder_turn,
            elapsed = ?self.longest_ponder,
            "longest ponder so far"
        );
        info!(hash = %board_hash(state), "board");
        Some(outlook)
    }
}
