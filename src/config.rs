//! Engine configuration.
//!
//! Every tuning constant and time budget the policy reads lives here, with
//! defaults matching the tuned bot. A JSON file may override any subset of
//! fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name reported to the host once startup finishes.
    pub name: String,
    /// Seed for every order-breaking shuffle, reapplied per evaluation.
    /// `SmallRng` streams only repeat within one build; another platform or
    /// `rand` version may play different moves from the same seed.
    pub seed: u64,
    /// Append-only diagnostic log; `None` disables logging.
    pub log_file: Option<PathBuf>,
    pub tuning: Tuning,
    pub budget: Budget,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            name: "landgrab".to_string(),
            seed: 1,
            log_file: None,
            tuning: Tuning::default(),
            budget: Budget::default(),
        }
    }
}

impl EngineConfig {
    /// Loads a configuration from a JSON file. Missing fields keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Policy tuning constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Depth cap of the forced-pull search.
    pub finger_length: usize,
    /// Interior cells wait until strength reaches production times this.
    pub internal_multiplier: i32,
    /// Starting production threshold for frontier seeds.
    pub nice_min: i32,
    /// Combo length, start cell included.
    pub max_opening_combo: usize,
    /// Field penalty applied on the suppressed checkerboard parity.
    pub checker_penalty: i32,
    /// Cells closer than this to the war front take part in the checkerboard.
    pub checker_depth: usize,
    /// Nice minimum used to find the war front; above any real production,
    /// so only zero-strength neutrals qualify.
    pub war_nice_min: i32,
    /// Boards at least this large use the template opening search.
    pub big_map_area: usize,
    /// Fixed simulation lookahead; `None` derives it from the board area.
    pub opening_lookahead: Option<usize>,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            finger_length: 4,
            internal_multiplier: 6,
            nice_min: 1,
            max_opening_combo: 4,
            checker_penalty: 100,
            checker_depth: 4,
            war_nice_min: 999,
            big_map_area: 30 * 30,
            opening_lookahead: None,
        }
    }
}

/// Wall-clock budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    /// Time allowed for opening planning, measured from the first message.
    pub initial_ms: u64,
    /// Per-turn budget; exceeding it is logged, not enforced.
    pub turn_ms: u64,
}

impl Default for Budget {
    fn default() -> Self {
        Budget {
            initial_ms: 12_000,
            turn_ms: 950,
        }
    }
}

impl Budget {
    pub fn initial(&self) -> Duration {
        Duration::from_millis(self.initial_ms)
    }

    pub fn turn(&self) -> Duration {
        Duration::from_millis(self.turn_ms)
    }
}
