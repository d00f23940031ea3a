//! The per-turn move policy.
//!
//! `make_moves` runs the fixed pipeline over a state whose turn bookkeeping
//! has just been reset: nice-minimum repair, war, opening fingers, then the
//! attraction field with the allocator and the overflow resolver. The same
//! pipeline drives both the live game and the opening simulations.

pub mod allocate;
pub mod attraction;
pub mod finger;
pub mod forced;
pub mod ordering;
pub mod war;

use rand::Rng;

use crate::board::GameState;
use crate::config::Tuning;

pub use allocate::attract;
pub use attraction::{attraction_field, fix_nice_min, AttractionField, UNREACHED};
pub use finger::{one_finger, opening_fingers, Commit, OpeningStop, Pull};
pub use forced::forced_attacks;
pub use war::{checker_penalty, war};

/// What one pipeline run decided, for the caller to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Nice minimum actually used for the field.
    pub nice_min: i32,
    pub war_zones: usize,
    /// Set when the opening fingers gave up this turn.
    pub opening_stop: Option<OpeningStop>,
}

/// Orders every owned cell of `state` for this turn.
pub fn make_moves(
    state: &mut GameState,
    combo: &[usize],
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> TurnReport {
    let nice_min = fix_nice_min(state, tuning.nice_min);

    if combo.is_empty() {
        state.opening = false;
    }

    // Simulations hold a single player, so there is never a front there.
    let war_zones = if state.is_sim {
        Vec::new()
    } else {
        state.war_zones()
    };

    if !war_zones.is_empty() {
        state.opening = false;
        war(state, &war_zones, rng);
    }

    let mut opening_stop = None;
    if state.opening {
        if let Err(stop) = opening_fingers(state, combo, tuning.finger_length, rng) {
            state.opening = false;
            opening_stop = Some(stop);
        }
    }

    if !state.opening {
        let mut field = attraction_field(state, nice_min);
        if !war_zones.is_empty() {
            checker_penalty(state, &mut field, tuning);
        }
        attract(state, &field, tuning.internal_multiplier);
        forced_attacks(state);
    }

    TurnReport {
        nice_min,
        war_zones: war_zones.len(),
        opening_stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn lone_cell() -> GameState {
        let mut production = vec![1; 9];
        production[5] = 6;
        let mut owner = vec![0; 9];
        owner[4] = 1;
        let mut strength = vec![20; 9];
        strength[4] = 30;
        GameState::from_cells(3, 3, 1, owner, strength, production)
    }

    #[test]
    fn empty_combo_ends_opening() {
        let mut state = lone_cell();
        state.opening = true;
        let mut rng = SmallRng::seed_from_u64(1);
        let report = make_moves(&mut state, &[], &Tuning::default(), &mut rng);
        assert!(!state.opening);
        assert_eq!(report.opening_stop, None);
        // Attraction takes over: 30 beats the productive neutral's 20.
        assert_eq!(state.move_of(4), Direction::East);
    }

    #[test]
    fn opening_follows_combo() {
        let mut state = lone_cell();
        state.opening = true;
        let mut rng = SmallRng::seed_from_u64(1);
        let report = make_moves(&mut state, &[4, 1], &Tuning::default(), &mut rng);
        assert!(state.opening);
        assert_eq!(report.opening_stop, None);
        assert_eq!(state.move_of(4), Direction::North);
        assert_eq!(state.orders.notes[4], "Finger");
    }

    #[test]
    fn exhausted_combo_hands_over_to_attraction() {
        let mut state = lone_cell();
        state.opening = true;
        let mut rng = SmallRng::seed_from_u64(1);
        let report = make_moves(&mut state, &[4, 4], &Tuning::default(), &mut rng);
        assert!(!state.opening);
        assert_eq!(report.opening_stop, Some(OpeningStop::NoTarget));
        assert_eq!(state.orders.notes[4], "Attract");
    }

    #[test]
    fn simulations_ignore_enemies() {
        let mut state = lone_cell();
        state.owner[3] = 2;
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(make_moves(&mut state, &[], &Tuning::default(), &mut rng).war_zones, 1);

        let mut sim = lone_cell();
        sim.owner[3] = 2;
        sim.is_sim = true;
        assert_eq!(make_moves(&mut sim, &[], &Tuning::default(), &mut rng).war_zones, 0);
    }
}
