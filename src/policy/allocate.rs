//! Greedy move allocation along the attraction field.
//!
//! Idle cells step toward their best-scoring neighbour. Cells are visited
//! ring by ring starting at the border rim, strongest first, so the border
//! commits before the interior decides whether it still fits behind it.

use crate::board::{Direction, GameState, STRENGTH_CAP};

use super::attraction::AttractionField;
use super::ordering::{rank_by, Rank};

const NOTE: &str = "Attract";

/// Assigns field-following moves to every idle owned cell that has built up
/// enough strength, then lets weak rim cells take obviously winnable
/// neutrals.
pub fn attract(state: &mut GameState, field: &AttractionField, internal_multiplier: i32) {
    let mut rings = state.friendlies_by_value(&field.distance);

    for ring in rings.iter_mut().skip(1) {
        rank_by(ring, Rank::Descending, |&i| state.strength[i]);

        for &i in ring.iter() {
            if state.has_orders(i) {
                continue;
            }
            if state.strength[i] < state.production[i] * internal_multiplier {
                continue;
            }
            if let Some((dir, target)) = best_move(state, field, i) {
                if should_commit(state, i, target) {
                    state.set_move(i, dir, NOTE);
                }
            }
        }
    }

    let Some(rim) = rings.get(1) else {
        return;
    };

    for &i in rim {
        if state.has_orders(i) {
            continue;
        }

        let mut best = field.score[i];
        let mut preferred = Direction::Still;
        let mut best_index = i;
        for n in state.grid.neighbours(i) {
            if field.score[n.index] > best {
                best = field.score[n.index];
                preferred = n.dir;
                best_index = n.index;
            }
        }

        if state.is_neutral(best_index)
            && state.strength[best_index] < state.strength[i]
            && state.allocation(best_index) + state.strength[i] <= STRENGTH_CAP
        {
            state.set_move(i, preferred, NOTE);
        }
    }
}

/// Picks the highest-scoring neighbour `i` may move into without
/// overfilling it. Staying wins ties; among moving options an equal score
/// goes to the fuller neighbour, merging forces.
fn best_move(state: &GameState, field: &AttractionField, i: usize) -> Option<(Direction, usize)> {
    let strength = state.strength[i];
    let mut best = field.score[i];
    let mut preferred = Direction::Still;
    let mut best_index = i;

    for n in state.grid.neighbours(i) {
        let j = n.index;
        let fits = state.allocation(j) + strength <= STRENGTH_CAP;
        // A still border cell may yet be forced forward, so only the
        // strength arriving there counts.
        let fits_if_forced = state.touches_neutral(j)
            && state.move_of(j) == Direction::Still
            && state.orders.incoming[j] + strength <= STRENGTH_CAP;
        if !(fits || fits_if_forced) {
            continue;
        }

        let score = field.score[j];
        if score > best
            || (score == best
                && preferred != Direction::Still
                && state.allocation(j) > state.allocation(best_index))
        {
            best = score;
            preferred = n.dir;
            best_index = j;
        }
    }

    (preferred != Direction::Still).then_some((preferred, best_index))
}

/// Neutrals are only attacked when the attack wins; friendly targets are
/// always fine, and two capped cells may swap.
fn should_commit(state: &GameState, from: usize, target: usize) -> bool {
    !state.is_neutral(target)
        || state.strength[target] < state.strength[from]
        || (state.strength[target] == STRENGTH_CAP && state.strength[from] == STRENGTH_CAP)
}
