//! Opening search.
//!
//! Scores short capture sequences by playing the turn policy forward in the
//! simulator. Everything here runs against a cooperative wall-clock
//! deadline; hitting it unwinds the search with [`Aborted`].

pub mod opening;

use std::time::{Duration, Instant};

pub use opening::{OpeningPlan, OpeningPlanner, SearchMethod, TEMPLATES};

/// Point in time after which the search must stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Deadline(Some(instant))
    }

    /// `budget` after `start`; unbounded if that instant is unrepresentable.
    pub fn after(start: Instant, budget: Duration) -> Self {
        Deadline(start.checked_add(budget))
    }

    pub fn unbounded() -> Self {
        Deadline(None)
    }

    pub fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() > at)
    }
}

/// The deadline passed before a result was ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("opening search ran out of time")]
pub struct Aborted;

/// Best sequence found so far. The combo lists the cells to own, in capture
/// order, starting with the start cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestCombo {
    pub score: i32,
    pub combo: Vec<usize>,
}

impl BestCombo {
    /// Keeps `combo` if it strictly beats the current best.
    pub fn offer(&mut self, score: i32, combo: &[usize]) -> bool {
        if score > self.score {
            self.score = score;
            self.combo = combo.to_vec();
            true
        } else {
            false
        }
    }
}
