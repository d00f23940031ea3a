//! Move-line output.

use std::fmt;

use crate::board::{Direction, GameState};

/// One move as sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOrder {
    pub x: usize,
    pub y: usize,
    pub dir: Direction,
}

impl fmt::Display for MoveOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.dir.code())
    }
}

/// Moving owned cells in ascending cell order. Still cells are left out;
/// the host treats a missing cell as still.
pub fn collect_moves(state: &GameState) -> Vec<MoveOrder> {
    (0..state.size())
        .filter(|&i| state.is_mine(i) && state.move_of(i) != Direction::Still)
        .map(|i| {
            let (x, y) = state.grid.index_to_xy(i);
            MoveOrder {
                x,
                y,
                dir: state.move_of(i),
            }
        })
        .collect()
}

pub fn format_moves(moves: &[MoveOrder]) -> String {
    moves
        .iter()
        .map(MoveOrder::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
