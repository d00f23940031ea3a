//! Attraction field over owned territory.
//!
//! Nice frontier neutrals are seeded with a border score and the scores flow
//! inward through our cells, losing `production + 2` per hop. Popping the
//! highest score first makes every owned cell take the best score any
//! frontier can offer it, and each cell is written exactly once.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::board::GameState;

/// Score of cells the propagation never reached.
pub const UNREACHED: i32 = i32::MIN + 1;

/// Per-cell propagated score and hop distance from the frontier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttractionField {
    pub score: Vec<i32>,
    /// Frontier neutrals are 0, their owned neighbours 1, and so on.
    /// Unreached cells are 0 as well.
    pub distance: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Propagator {
    score: i32,
    distance: usize,
    index: usize,
}

impl Ord for Propagator {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on score; equal scores pop the lowest cell id first.
        self.score
            .cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Propagator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Seed value of a frontier neutral.
pub fn border_score(state: &GameState, i: usize) -> i32 {
    state.production[i] * 4 - (state.strength[i] * 7) / 10
}

/// Builds the field from the nice neutrals touching our territory.
pub fn attraction_field(state: &GameState, nice_min: i32) -> AttractionField {
    let size = state.size();
    let mut score = vec![UNREACHED; size];
    let mut distance = vec![0usize; size];

    let mut queue = BinaryHeap::new();
    for i in state.touching_nice_neutrals(nice_min) {
        score[i] = border_score(state, i);
        queue.push(Propagator {
            score: score[i],
            distance: 0,
            index: i,
        });
    }

    while let Some(prop) = queue.pop() {
        for n in state.grid.neighbours(prop.index) {
            let j = n.index;
            if state.is_mine(j) && score[j] == UNREACHED {
                score[j] = prop.score - (state.production[j] + 2);
                distance[j] = prop.distance + 1;
                queue.push(Propagator {
                    score: score[j],
                    distance: distance[j],
                    index: j,
                });
            }
        }
    }

    AttractionField { score, distance }
}

/// Returns the highest nice minimum, starting from `preferred`, for which
/// some nice neutral touches our territory; 0 when none does.
pub fn fix_nice_min(state: &GameState, preferred: i32) -> i32 {
    let mut nice_min = preferred;
    while nice_min > 0 && state.touching_nice_neutrals(nice_min).is_empty() {
        nice_min -= 1;
    }
    nice_min
}
