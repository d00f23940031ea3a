//! Overflow correction for still border cells.

use crate::board::{Direction, GameState, Neighbour, STRENGTH_CAP};

use super::ordering::{rank_by, Rank};

const NOTE: &str = "ForcedAttack";

/// Moves still frontier cells that are about to be overfilled. The best
/// neutral by goodness that can absorb the cell wins; otherwise the cell
/// retreats into its least loaded non-neutral neighbour. A cell with neither
/// option stays put and the overflow is left for diagnostics.
pub fn forced_attacks(state: &mut GameState) {
    for i in state.frontier_friendlies() {
        if state.move_of(i) != Direction::Still || state.allocation(i) <= STRENGTH_CAP {
            continue;
        }

        let (mut targets, mut retreats): (Vec<Neighbour>, Vec<Neighbour>) = state
            .grid
            .neighbours(i)
            .iter()
            .copied()
            .partition(|n| state.is_neutral(n.index));

        rank_by(&mut targets, Rank::Descending, |n| state.goodness(n.index));
        let strength = state.strength[i];
        let forced = targets
            .iter()
            .find(|n| state.allocation(n.index) + strength <= STRENGTH_CAP)
            .map(|n| n.dir)
            .or_else(|| {
                rank_by(&mut retreats, Rank::Ascending, |n| state.allocation(n.index));
                retreats.first().map(|n| n.dir)
            });

        if let Some(dir) = forced {
            state.set_move(i, dir, NOTE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 board: we hold the centre (40) and the cell above it (220), which
    /// is about to move down into the centre.
    fn crowded() -> GameState {
        #[rustfmt::skip]
        let owner = vec![
            0, 1, 0,
            0, 1, 0,
            0, 0, 0,
        ];
        #[rustfmt::skip]
        let strength = vec![
            100, 220, 100,
            50,  40,  0,
            100, 10,  100,
        ];
        #[rustfmt::skip]
        let production = vec![
            1, 1, 1,
            1, 1, 0,
            1, 5, 1,
        ];
        let mut state = GameState::from_cells(3, 3, 1, owner, strength, production);
        state.set_move(1, Direction::South, "test");
        state
    }

    #[test]
    fn overfilled_cell_attacks_best_neutral() {
        let mut state = crowded();
        assert_eq!(state.allocation(4), 260);
        forced_attacks(&mut state);
        assert_eq!(state.move_of(4), Direction::South);
        assert_eq!(state.orders.notes[4], "ForcedAttack");
        assert_eq!(state.allocation(7), 40);
        assert!((0..9).all(|i| state.allocation(i) <= STRENGTH_CAP));
    }

    #[test]
    fn falls_back_to_least_loaded_retreat() {
        let mut state = crowded();
        state.owner[3] = 1;
        state.owner[5] = 1;
        state.strength[3] = 30;
        state.strength[5] = 10;
        state.reset_orders();
        state.set_move(1, Direction::South, "test");
        state.orders.allocation[7] = 230;

        forced_attacks(&mut state);
        // Cell 1 emptied itself by moving down, so it is the emptiest option.
        assert_eq!(state.move_of(4), Direction::North);
    }

    #[test]
    fn cells_within_capacity_are_untouched() {
        let mut state = crowded();
        state.set_move(1, Direction::Still, "test");
        let before = state.orders.clone();
        forced_attacks(&mut state);
        assert_eq!(state.orders, before);
    }
}
