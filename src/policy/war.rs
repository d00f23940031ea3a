//! Frontline combat and checkerboard staggering.

use std::collections::BTreeSet;

use rand::Rng;

use crate::board::{Direction, GameState, STRENGTH_CAP};
use crate::config::Tuning;

use super::attraction::AttractionField;
use super::ordering::{rank_by, shuffled, Rank};

const NOTE: &str = "War";

/// Gives every owned cell next to a war zone an order: step into the
/// neutral whose enemy neighbours we would hurt most, or hold.
///
/// A neutral's score is the damage dealt to adjacent enemies (strength + 1
/// each, so empty enemy cells still count) minus the neutral's own strength.
pub fn war(state: &mut GameState, war_zones: &[usize], rng: &mut impl Rng) {
    let mut forces = BTreeSet::new();
    for &z in war_zones {
        for n in state.grid.neighbours(z) {
            if state.is_mine(n.index) && state.strength[n.index] > 0 {
                forces.insert(n.index);
            }
        }
    }

    let mut forces = shuffled(forces.into_iter().collect(), |&i| i, rng);
    rank_by(&mut forces, Rank::Descending, |&i| state.strength[i]);

    for i in forces {
        let mut best_score = 0;
        let mut best_dir = Direction::Still;

        for n in state.grid.neighbours(i) {
            let j = n.index;
            if !state.is_neutral(j) {
                continue;
            }
            let damage: i32 = state
                .grid
                .neighbours(j)
                .iter()
                .filter(|m| state.is_enemy(m.index))
                .map(|m| state.strength[m.index] + 1)
                .sum();
            let score = damage - state.strength[j];
            if score > best_score && state.allocation(j) + state.strength[i] <= STRENGTH_CAP {
                best_score = score;
                best_dir = n.dir;
            }
        }

        state.set_move(i, best_dir, NOTE);
    }
}

/// Lowers the field on alternating cells near the war front so reinforcements
/// arrive in a checkerboard. The window is centred on the start cell and the
/// penalized parity flips every turn.
pub fn checker_penalty(state: &GameState, field: &mut AttractionField, tuning: &Tuning) {
    let distances = state.nice_frontier_distances(tuning.war_nice_min);
    let grid = &state.grid;
    let (w, h) = (grid.width() as isize, grid.height() as isize);
    let (sx, sy) = grid.index_to_xy(state.start_loc);
    let (sx, sy) = (sx as isize, sy as isize);
    let even_turn = state.turn.rem_euclid(2) == 0;

    for xo in -(w / 2)..(w - w / 2) {
        for yo in -(h / 2)..(h - h / 2) {
            let i = grid.xy_to_index(sx + xo, sy + yo);
            if distances[i] >= tuning.checker_depth {
                continue;
            }
            let same_parity = xo.rem_euclid(2) == yo.rem_euclid(2);
            if same_parity == even_turn {
                field.score[i] = field.score[i].saturating_sub(tuning.checker_penalty);
            }
        }
    }
}
