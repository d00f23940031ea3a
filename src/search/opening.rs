//! Opening planner.
//!
//! Before the first live turn, candidate capture sequences starting at the
//! start cell are scored by simulating the full turn policy for a fixed
//! lookahead and reading off the production we own at the end. Small boards
//! enumerate every connected sequence up to the maximum combo length; large
//! boards only try a fixed set of straight and bent paths.
//!
//! Every evaluation reseeds its RNG with the configured seed, so scoring
//! the same combo twice gives the same result.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::Direction::{East as E, North as N, South as S, West as W};
use crate::board::{Direction, GameState};
use crate::config::{EngineConfig, Tuning};
use crate::policy::make_moves;
use crate::sim::OpeningSimulator;

use super::{Aborted, BestCombo, Deadline};

/// Paths tried on large boards, as steps from the start cell.
#[rustfmt::skip]
pub const TEMPLATES: [&[Direction]; 48] = [
    // straight
    &[N, N, N], &[E, E, E], &[S, S, S], &[W, W, W],
    // turn at the end
    &[N, N, E], &[N, N, W], &[E, E, N], &[E, E, S],
    &[W, W, N], &[W, W, S], &[S, S, W], &[S, S, E],
    // turn at the start
    &[N, E, E], &[N, W, W], &[E, N, N], &[E, S, S],
    &[W, N, N], &[W, S, S], &[S, W, W], &[S, E, E],
    // zigzag
    &[N, E, N], &[N, W, N], &[E, N, E], &[E, S, E],
    &[W, N, W], &[W, S, W], &[S, W, S], &[S, E, S],
    // four steps
    &[N, N, N, N], &[E, E, E, E], &[S, S, S, S], &[W, W, W, W],
    &[N, N, N, E], &[N, N, N, W], &[E, E, E, N], &[E, E, E, S],
    &[W, W, W, N], &[W, W, W, S], &[S, S, S, W], &[S, S, S, E],
    &[N, E, E, E], &[N, W, W, W], &[E, N, N, N], &[E, S, S, S],
    &[W, N, N, N], &[W, S, S, S], &[S, W, W, W], &[S, E, E, E],
];

/// How candidate combos are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    /// Every connected combo of the maximum length.
    Exhaustive,
    /// The fixed [`TEMPLATES`].
    Templates,
}

impl SearchMethod {
    pub fn for_area(area: usize, tuning: &Tuning) -> Self {
        if area >= tuning.big_map_area {
            SearchMethod::Templates
        } else {
            SearchMethod::Exhaustive
        }
    }
}

/// Outcome of a planning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningPlan {
    pub method: SearchMethod,
    /// The combo to follow, present only when it beat the baseline.
    pub combo: Option<Vec<usize>>,
    pub best: BestCombo,
    /// Score of playing without a plan; `None` if even that ran out of time.
    pub baseline: Option<i32>,
    pub aborted: bool,
    /// Simulated turns played.
    pub positions: u64,
    pub lookahead: usize,
}

/// Searches opening combos within a deadline.
pub struct OpeningPlanner<'a> {
    config: &'a EngineConfig,
    deadline: Deadline,
    lookahead: usize,
    positions: u64,
}

impl<'a> OpeningPlanner<'a> {
    pub fn new(config: &'a EngineConfig, deadline: Deadline) -> Self {
        OpeningPlanner {
            config,
            deadline,
            lookahead: 0,
            positions: 0,
        }
    }

    /// Simulated turns per evaluation. Large boards get a longer horizon:
    /// they are searched more narrowly and war starts later there.
    pub fn lookahead_for(area: usize, tuning: &Tuning) -> usize {
        if let Some(fixed) = tuning.opening_lookahead {
            return fixed;
        }
        let root = (area as f64).sqrt() as i64;
        let base = match SearchMethod::for_area(area, tuning) {
            SearchMethod::Templates => 145,
            SearchMethod::Exhaustive => 80,
        };
        (base - 5 * root / 3).max(0) as usize
    }

    /// Plans an opening for the single cell we own in `real`.
    pub fn plan(&mut self, real: &GameState) -> OpeningPlan {
        let config = self.config;
        let tuning = &config.tuning;
        let method = SearchMethod::for_area(real.size(), tuning);
        self.lookahead = Self::lookahead_for(real.size(), tuning);
        self.positions = 0;

        let mut best = BestCombo::default();
        let baseline = self.evaluate(real, &[]);

        let searched = baseline.and_then(|_| match method {
            SearchMethod::Exhaustive => {
                let mut combo = vec![real.start_loc];
                self.recurse(real, &mut combo, &mut best)
            }
            SearchMethod::Templates => self.templates(real, &mut best),
        });

        let combo = match baseline {
            Ok(nil) if best.score > nil && !best.combo.is_empty() => Some(best.combo.clone()),
            _ => None,
        };

        OpeningPlan {
            method,
            combo,
            best,
            baseline: baseline.ok(),
            aborted: searched.is_err(),
            positions: self.positions,
            lookahead: self.lookahead,
        }
    }

    /// Plays the policy forward from `real` following `combo` and returns
    /// the production owned at the end of the lookahead.
    pub fn evaluate(&mut self, real: &GameState, combo: &[usize]) -> Result<i32, Aborted> {
        let mut rng = SmallRng::seed_from_u64(self.config.seed);
        let mut sim = OpeningSimulator::new(real);

        for _ in 0..self.lookahead {
            if self.deadline.expired() {
                return Err(Aborted);
            }
            make_moves(&mut sim.state, combo, &self.config.tuning, &mut rng);
            if self.deadline.expired() {
                return Err(Aborted);
            }
            sim.step();
            self.positions += 1;
        }

        Ok(sim.state.my_production())
    }

    /// Extends `combo` by every neighbour of every member not yet in it,
    /// scoring full-length combos. The first abort unwinds everything.
    fn recurse(
        &mut self,
        real: &GameState,
        combo: &mut Vec<usize>,
        best: &mut BestCombo,
    ) -> Result<(), Aborted> {
        if self.deadline.expired() {
            return Err(Aborted);
        }

        if combo.len() >= self.config.tuning.max_opening_combo {
            let score = self.evaluate(real, combo)?;
            best.offer(score, combo);
            return Ok(());
        }

        for k in 0..combo.len() {
            let neighbours = *real.grid.neighbours(combo[k]);
            for n in neighbours {
                if combo.contains(&n.index) {
                    continue;
                }
                combo.push(n.index);
                let result = self.recurse(real, combo, best);
                combo.pop();
                result?;
            }
        }

        Ok(())
    }

    fn templates(&mut self, real: &GameState, best: &mut BestCombo) -> Result<(), Aborted> {
        for steps in TEMPLATES {
            let mut combo = Vec::with_capacity(steps.len() + 1);
            let mut at = real.start_loc;
            combo.push(at);
            for &dir in steps {
                at = real.grid.move_target(at, dir);
                combo.push(at);
            }

            let score = self.evaluate(real, &combo)?;
            best.offer(score, &combo);
        }
        Ok(())
    }
}
