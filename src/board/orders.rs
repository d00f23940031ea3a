//! Per-turn move bookkeeping.
//!
//! Tracks the pending move of every cell together with the projected
//! strength each cell will hold once the queued moves resolve. Every
//! `set_move` first undoes the previous move of the cell, so the projections
//! stay consistent however often a cell is re-ordered within a turn.

use super::direction::Direction;
use super::grid::Grid;
use super::state::PlayerId;

/// Pending orders and projected strength for every cell of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    /// Direction each cell will move this turn.
    pub moves: Vec<Direction>,
    /// Whether a pass explicitly gave this cell orders (even `Still`).
    pub has_orders: Vec<bool>,
    /// Strength projected to occupy each cell after movement.
    pub allocation: Vec<i32>,
    /// Like `allocation`, but excluding strength that started on the cell.
    pub incoming: Vec<i32>,
    /// Name of the pass that last ordered each cell, for diagnostics.
    pub notes: Vec<&'static str>,
}

impl TurnState {
    pub fn new(size: usize) -> Self {
        TurnState {
            moves: vec![Direction::Still; size],
            has_orders: vec![false; size],
            allocation: vec![0; size],
            incoming: vec![0; size],
            notes: vec![""; size],
        }
    }

    /// Start-of-turn reset. Owned cells are projected to keep their own
    /// strength by standing still; everything else starts empty.
    pub fn reset(&mut self, owner: &[PlayerId], strength: &[i32], me: PlayerId) {
        for i in 0..self.moves.len() {
            self.moves[i] = Direction::Still;
            self.has_orders[i] = false;
            self.allocation[i] = if owner[i] == me { strength[i] } else { 0 };
            self.incoming[i] = 0;
            self.notes[i] = "";
        }
    }

    /// Records `dir` as the move for `cell`, which carries `strength`.
    pub fn set_move(
        &mut self,
        grid: &Grid,
        strength: i32,
        cell: usize,
        dir: Direction,
        note: &'static str,
    ) {
        self.has_orders[cell] = true;
        self.notes[cell] = note;

        let old = self.moves[cell];
        if old == dir {
            return;
        }

        if old != Direction::Still {
            let target = grid.move_target(cell, old);
            self.allocation[cell] += strength;
            self.allocation[target] -= strength;
            self.incoming[target] -= strength;
        }

        self.moves[cell] = dir;

        if dir != Direction::Still {
            let target = grid.move_target(cell, dir);
            self.allocation[cell] -= strength;
            self.allocation[target] += strength;
            self.incoming[target] += strength;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Grid, TurnState, Vec<i32>) {
        let grid = Grid::new(3, 3);
        let owner = vec![1, 1, 0, 0, 1, 0, 0, 0, 2];
        let strength = vec![10, 20, 5, 0, 30, 0, 0, 0, 40];
        let mut turn = TurnState::new(9);
        turn.reset(&owner, &strength, 1);
        (grid, turn, strength)
    }

    #[test]
    fn reset_projects_resident_strength_for_own_cells_only() {
        let (_, turn, _) = fixture();
        assert_eq!(turn.allocation, vec![10, 20, 0, 0, 30, 0, 0, 0, 0]);
        assert!(turn.incoming.iter().all(|&v| v == 0));
        assert!(turn.moves.iter().all(|&m| m == Direction::Still));
    }

    #[test]
    fn set_move_transfers_allocation() {
        let (grid, mut turn, strength) = fixture();
        turn.set_move(&grid, strength[4], 4, Direction::North, "test");
        assert_eq!(turn.allocation[4], 0);
        assert_eq!(turn.allocation[1], 50);
        assert_eq!(turn.incoming[1], 30);
        assert!(turn.has_orders[4]);
        assert_eq!(turn.notes[4], "test");
    }

    #[test]
    fn repeated_move_is_idempotent() {
        let (grid, mut once, strength) = fixture();
        let mut twice = once.clone();
        once.set_move(&grid, strength[0], 0, Direction::East, "a");
        twice.set_move(&grid, strength[0], 0, Direction::East, "a");
        twice.set_move(&grid, strength[0], 0, Direction::East, "a");
        assert_eq!(once, twice);
    }

    #[test]
    fn changing_move_undoes_previous_one() {
        let (grid, mut turn, strength) = fixture();
        let baseline = turn.clone();
        turn.set_move(&grid, strength[4], 4, Direction::West, "a");
        turn.set_move(&grid, strength[4], 4, Direction::South, "b");
        turn.set_move(&grid, strength[4], 4, Direction::Still, "c");
        assert_eq!(turn.allocation, baseline.allocation);
        assert_eq!(turn.incoming, baseline.incoming);
        assert!(turn.has_orders[4]);
    }
}
