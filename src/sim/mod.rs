//! Single-player forward model used by the opening planner.
//!
//! The simulator plays only our own moves against a neutral board: no
//! enemies, no combat between players. It resolves a turn the way the host
//! does for one player: movement, production on still cells, the 255 cap,
//! then fights against neutrals.

use crate::board::{Direction, GameState, NEUTRAL, STRENGTH_CAP};

/// Player id every simulation plays as.
pub const SIM_PLAYER: u8 = 1;

/// A private copy of the board that can be stepped forward.
#[derive(Debug)]
pub struct OpeningSimulator {
    pub state: GameState,
    placements: Vec<i32>,
}

impl OpeningSimulator {
    /// Snapshots `real`, keeps only its player's cells (recoloured to
    /// [`SIM_PLAYER`]) and neutralizes every other owner. The copy starts at
    /// turn 0 in opening mode with fresh orders.
    pub fn new(real: &GameState) -> Self {
        let mut state = real.snapshot();
        for owner in state.owner.iter_mut() {
            *owner = if *owner == real.id { SIM_PLAYER } else { NEUTRAL };
        }
        state.id = SIM_PLAYER;
        state.is_sim = true;
        state.opening = true;
        state.turn = 0;
        // First simulated allocation starts from resident strength.
        state.reset_orders();

        let placements = vec![0; state.size()];
        OpeningSimulator { state, placements }
    }

    /// Resolves the queued moves and advances to the next turn.
    pub fn step(&mut self) {
        let state = &mut self.state;
        let size = state.size();
        self.placements.iter_mut().for_each(|p| *p = 0);

        for i in 0..size {
            if state.owner[i] == NEUTRAL {
                continue;
            }
            let dir = state.orders.moves[i];
            let target = state.grid.move_target(i, dir);
            self.placements[target] += state.strength[i];
            if dir == Direction::Still {
                self.placements[i] += state.production[i];
            }
        }

        for p in self.placements.iter_mut() {
            *p = (*p).min(STRENGTH_CAP);
        }

        for i in 0..size {
            let placed = self.placements[i];
            if state.owner[i] == SIM_PLAYER {
                state.strength[i] = placed;
            } else if placed > 0 {
                if state.strength[i] < placed {
                    state.owner[i] = SIM_PLAYER;
                    state.strength[i] = placed - state.strength[i];
                } else {
                    state.strength[i] -= placed;
                }
            }
        }

        state.begin_turn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> GameState {
        #[rustfmt::skip]
        let owner = vec![
            0, 3, 0,
            0, 3, 0,
            2, 0, 0,
        ];
        #[rustfmt::skip]
        let strength = vec![
            5, 250, 5,
            9, 20,  5,
            5, 5,   5,
        ];
        #[rustfmt::skip]
        let production = vec![
            1, 10, 1,
            1, 2,  1,
            1, 1,  1,
        ];
        GameState::from_cells(3, 3, 3, owner, strength, production)
    }

    #[test]
    fn new_recolours_and_neutralizes() {
        let sim = OpeningSimulator::new(&board());
        assert_eq!(sim.state.id, SIM_PLAYER);
        assert_eq!(sim.state.owner[1], SIM_PLAYER);
        assert_eq!(sim.state.owner[4], SIM_PLAYER);
        assert_eq!(sim.state.owner[6], NEUTRAL);
        assert!(sim.state.is_sim && sim.state.opening);
        assert_eq!(sim.state.turn, 0);
        assert_eq!(sim.state.allocation(4), 20);
    }

    #[test]
    fn fresh_orders_allocate_resident_strength() {
        let mut real = board();
        real.set_move(1, Direction::South, "Attract");
        let sim = OpeningSimulator::new(&real);
        for i in 0..sim.state.size() {
            let expected = if sim.state.is_mine(i) { sim.state.strength[i] } else { 0 };
            assert_eq!(sim.state.allocation(i), expected, "cell {i}");
            assert!(!sim.state.has_orders(i));
        }
        assert_eq!(sim.state.allocation(1), 250);
        assert_eq!(sim.state.allocation(6), 0);
    }

    #[test]
    fn still_board_only_grows() {
        let mut sim = OpeningSimulator::new(&board());
        let owner_before = sim.state.owner.clone();
        sim.step();
        assert_eq!(sim.state.owner, owner_before);
        assert_eq!(sim.state.strength[4], 22);
        assert_eq!(sim.state.strength[1], 255);
        assert_eq!(sim.state.strength[0], 5);
        assert_eq!(sim.state.turn, 1);
    }

    #[test]
    fn moves_capture_or_wear_down_neutrals() {
        let mut sim = OpeningSimulator::new(&board());
        sim.state.set_move(4, Direction::West, "test");
        sim.step();
        // 20 beats 9: captured with the difference left over.
        assert_eq!(sim.state.owner[3], SIM_PLAYER);
        assert_eq!(sim.state.strength[3], 11);
        // The vacated cell stays ours, empty, and earns nothing.
        assert_eq!(sim.state.owner[4], SIM_PLAYER);
        assert_eq!(sim.state.strength[4], 0);

        sim.state.set_move(3, Direction::South, "test");
        sim.step();
        // 11 against the former enemy's 5.
        assert_eq!(sim.state.owner[6], SIM_PLAYER);
        assert_eq!(sim.state.strength[6], 6);
    }

    #[test]
    fn failed_attack_only_weakens_the_neutral() {
        let mut state = board();
        state.strength[3] = 30;
        let mut sim = OpeningSimulator::new(&state);
        sim.state.set_move(4, Direction::West, "test");
        sim.step();
        assert_eq!(sim.state.owner[3], NEUTRAL);
        assert_eq!(sim.state.strength[3], 10);
    }

    #[test]
    fn step_resets_orders() {
        let mut sim = OpeningSimulator::new(&board());
        sim.state.set_move(4, Direction::West, "test");
        sim.step();
        assert!(sim.state.orders.moves.iter().all(|&m| m == Direction::Still));
        assert!(!sim.state.has_orders(4));
    }
}
