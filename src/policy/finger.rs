//! Forced pulls ("fingers") toward a single target cell.
//!
//! A breadth-first search collects idle owned cells around the target, a
//! depth scan finds the shallowest depth whose strength (plus production
//! earned while waiting) beats the target, and a weak-first prune drops the
//! cells the capture does not need. Only the cells on the reached perimeter
//! actually move this turn; the rest hold so their strength is there when
//! the wave arrives.

use rand::Rng;

use crate::board::{Direction, GameState};

use super::ordering::{rank_by, shuffled, Rank};

const NOTE: &str = "Finger";

/// A cell the search could pull strength from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pull {
    pub index: usize,
    pub strength: i32,
    pub production: i32,
    /// Hops from the target.
    pub depth: usize,
    /// Step toward the cell this one was reached from.
    pub direction: Direction,
}

/// A pull that was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub target: usize,
    pub need: i32,
    /// Strength the surviving pulls deliver by the time the target is hit.
    pub available: i32,
    /// Perimeter depth; survivors at this depth move this turn.
    pub depth: usize,
    pub pulls: Vec<Pull>,
}

/// Why the opening fingers gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OpeningStop {
    #[error("enemy contact on the opening path")]
    WarDetected,
    #[error("no capturable opening target left")]
    NoTarget,
}

/// Returns every idle owned cell within `max_depth` hops of `puller`,
/// walking only through such cells. Zero-strength cells are walls unless
/// `through_zero` is set. The result is ordered by depth; ties follow a
/// seeded shuffle.
pub fn bfs(
    state: &GameState,
    puller: usize,
    max_depth: usize,
    through_zero: bool,
    rng: &mut impl Rng,
) -> Vec<Pull> {
    let mut visited = vec![false; state.size()];
    visited[puller] = true;

    let mut pulls = Vec::new();
    let mut frontier = vec![puller];

    for depth in 1..=max_depth {
        let mut next = Vec::new();
        for &i in &frontier {
            for n in state.grid.neighbours(i) {
                let j = n.index;
                if visited[j]
                    || !state.is_mine(j)
                    || state.has_orders(j)
                    || (state.strength[j] == 0 && !through_zero)
                {
                    continue;
                }
                visited[j] = true;
                pulls.push(Pull {
                    index: j,
                    strength: state.strength[j],
                    production: state.production[j],
                    depth,
                    direction: n.dir.opposite(),
                });
                next.push(j);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    let mut pulls = shuffled(pulls, |p| p.index, rng);
    rank_by(&mut pulls, Rank::Ascending, |p| p.depth);
    pulls
}

/// Tries to gather enough strength to capture `puller`. On success the
/// perimeter survivors step toward it, the inner survivors hold, and the
/// issued pull is returned.
pub fn one_finger(
    state: &mut GameState,
    puller: usize,
    finger_length: usize,
    rng: &mut impl Rng,
) -> Option<Commit> {
    let possibles = bfs(state, puller, finger_length, false, rng);
    let need = state.strength[puller] + 1;

    let mut available = 0;
    let mut count = 0;
    let mut depth = 1;

    for (n, pull) in possibles.iter().enumerate() {
        if pull.depth > depth {
            if available >= need {
                break;
            }
            // Everything already gathered keeps producing while the wave
            // reaches one hop further.
            let waited = (pull.depth - depth) as i32;
            available += possibles[..n]
                .iter()
                .map(|p| p.production * waited)
                .sum::<i32>();
            depth = pull.depth;
        }
        available += pull.strength;
        count += 1;
    }

    if available < need {
        return None;
    }

    let mut pulls = possibles[..count].to_vec();
    rank_by(&mut pulls, Rank::Descending, |p| p.strength);

    // Drop the weakest contributors while the rest still suffice.
    for p in (0..pulls.len()).rev() {
        let cost = (depth - pulls[p].depth) as i32 * pulls[p].production + pulls[p].strength;
        if available - cost >= need {
            pulls.remove(p);
            available -= cost;
        }
    }

    if !pulls.iter().any(|p| p.depth == depth) {
        return None;
    }

    for pull in &pulls {
        let dir = if pull.depth == depth {
            pull.direction
        } else {
            Direction::Still
        };
        state.set_move(pull.index, dir, NOTE);
    }

    Some(Commit {
        target: puller,
        need,
        available,
        depth,
        pulls,
    })
}

/// Pulls toward the planned opening cells in order. Each combo cell that we
/// do not own yet but already border gets one finger; the walk stops after
/// the first pull that cannot be made.
pub fn opening_fingers(
    state: &mut GameState,
    combo: &[usize],
    finger_length: usize,
    rng: &mut impl Rng,
) -> Result<(), OpeningStop> {
    let mut tried = false;

    for &i in combo {
        if state.is_mine(i) || !state.touches_friendly(i) {
            continue;
        }
        if state.touches_enemy(i) {
            return Err(OpeningStop::WarDetected);
        }
        tried = true;
        if one_finger(state, i, finger_length, rng).is_none() {
            break;
        }
    }

    if tried {
        Ok(())
    } else {
        Err(OpeningStop::NoTarget)
    }
}
