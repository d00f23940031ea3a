//! Game state representation.
//!
//! Holds the per-cell arrays of the board (owner, strength, production),
//! the per-turn order bookkeeping, and the handful of flags the policy keeps
//! between turns. Cell arrays are indexed by linear cell id.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::direction::Direction;
use super::grid::Grid;
use super::orders::TurnState;

/// Player identifier as sent by the host; 0 is neutral.
pub type PlayerId = u8;

/// Owner value of unclaimed cells.
pub const NEUTRAL: PlayerId = 0;

/// Maximum strength a cell keeps after resolution.
pub const STRENGTH_CAP: i32 = 255;

/// Complete decision state for one player at one point in time.
#[derive(Debug, PartialEq, Eq)]
pub struct GameState {
    /// Shared, read-only geometry.
    pub grid: Arc<Grid>,
    /// The player this state plays for.
    pub id: PlayerId,
    /// Turn counter; the first live turn is 0.
    pub turn: i32,
    pub owner: Vec<PlayerId>,
    pub strength: Vec<i32>,
    pub production: Vec<i32>,
    pub orders: TurnState,
    /// Set while a planned opening is still being followed.
    pub opening: bool,
    /// Cell the player started from.
    pub start_loc: usize,
    /// True inside planning simulations.
    pub is_sim: bool,
}

impl GameState {
    /// Creates an all-neutral, zero-strength state on `grid`.
    pub fn new(grid: Arc<Grid>, id: PlayerId) -> Self {
        let size = grid.size();
        GameState {
            grid,
            id,
            turn: -1,
            owner: vec![NEUTRAL; size],
            strength: vec![0; size],
            production: vec![0; size],
            orders: TurnState::new(size),
            opening: false,
            start_loc: 0,
            is_sim: false,
        }
    }

    /// Builds a state from explicit row-major cell arrays and resets the turn
    /// state, ready for a pipeline run.
    pub fn from_cells(
        width: usize,
        height: usize,
        id: PlayerId,
        owner: Vec<PlayerId>,
        strength: Vec<i32>,
        production: Vec<i32>,
    ) -> Self {
        let grid = Arc::new(Grid::new(width, height));
        debug_assert_eq!(owner.len(), grid.size());
        debug_assert_eq!(strength.len(), grid.size());
        debug_assert_eq!(production.len(), grid.size());
        let mut state = GameState::new(grid, id);
        state.owner = owner;
        state.strength = strength;
        state.production = production;
        state.turn = 0;
        state.set_start_loc();
        state.reset_orders();
        state
    }

    /// Deep-copies every per-cell array. The grid is shared, not copied: it
    /// is immutable after construction.
    pub fn snapshot(&self) -> GameState {
        GameState {
            grid: Arc::clone(&self.grid),
            id: self.id,
            turn: self.turn,
            owner: self.owner.clone(),
            strength: self.strength.clone(),
            production: self.production.clone(),
            orders: self.orders.clone(),
            opening: self.opening,
            start_loc: self.start_loc,
            is_sim: self.is_sim,
        }
    }

    pub fn size(&self) -> usize {
        self.owner.len()
    }

    /// Advances the turn counter and clears the previous turn's orders.
    pub fn begin_turn(&mut self) {
        self.turn += 1;
        self.reset_orders();
    }

    pub fn reset_orders(&mut self) {
        self.orders.reset(&self.owner, &self.strength, self.id);
    }

    /// Queues `dir` for `cell`, keeping the allocation projections current.
    pub fn set_move(&mut self, cell: usize, dir: Direction, note: &'static str) {
        self.orders
            .set_move(&self.grid, self.strength[cell], cell, dir, note);
    }

    pub fn move_of(&self, cell: usize) -> Direction {
        self.orders.moves[cell]
    }

    pub fn has_orders(&self, cell: usize) -> bool {
        self.orders.has_orders[cell]
    }

    pub fn allocation(&self, cell: usize) -> i32 {
        self.orders.allocation[cell]
    }

    /// Records the first owned cell as the start location.
    pub fn set_start_loc(&mut self) {
        if let Some(i) = self.owner.iter().position(|&o| o == self.id) {
            self.start_loc = i;
        }
    }

    // --- what is a cell ---

    pub fn is_mine(&self, i: usize) -> bool {
        self.owner[i] == self.id
    }

    pub fn is_neutral(&self, i: usize) -> bool {
        self.owner[i] == NEUTRAL
    }

    pub fn is_enemy(&self, i: usize) -> bool {
        self.owner[i] != self.id && self.owner[i] != NEUTRAL
    }

    /// A neutral worth expanding into: free to take, or productive enough.
    pub fn is_nice_neutral(&self, i: usize, nice_min: i32) -> bool {
        self.is_neutral(i) && (self.strength[i] == 0 || self.production[i] >= nice_min)
    }

    /// Production-to-strength ratio used to rank neutral captures.
    pub fn goodness(&self, i: usize) -> f32 {
        self.production[i] as f32 / (self.strength[i] as f32 + 0.01)
    }

    // --- what does a cell touch ---

    fn touches(&self, i: usize, pred: impl Fn(usize) -> bool) -> bool {
        self.grid.neighbours(i).iter().any(|n| pred(n.index))
    }

    pub fn touches_friendly(&self, i: usize) -> bool {
        self.touches(i, |n| self.is_mine(n))
    }

    pub fn touches_enemy(&self, i: usize) -> bool {
        self.touches(i, |n| self.is_enemy(n))
    }

    pub fn touches_neutral(&self, i: usize) -> bool {
        self.touches(i, |n| self.is_neutral(n))
    }

    pub fn touches_nice_neutral(&self, i: usize, nice_min: i32) -> bool {
        self.touches(i, |n| self.is_nice_neutral(n, nice_min))
    }

    // --- lists, always in ascending cell order ---

    fn list(&self, pred: impl Fn(usize) -> bool) -> Vec<usize> {
        (0..self.size()).filter(|&i| pred(i)).collect()
    }

    /// Neutral cells touching both us and an enemy.
    pub fn war_zones(&self) -> Vec<usize> {
        self.list(|i| self.is_neutral(i) && self.touches_friendly(i) && self.touches_enemy(i))
    }

    pub fn touching_nice_neutrals(&self, nice_min: i32) -> Vec<usize> {
        self.list(|i| self.touches_friendly(i) && self.is_nice_neutral(i, nice_min))
    }

    pub fn friendlies(&self) -> Vec<usize> {
        self.list(|i| self.is_mine(i))
    }

    /// Owned cells bordering any neutral.
    pub fn frontier_friendlies(&self) -> Vec<usize> {
        self.list(|i| self.is_mine(i) && self.touches_neutral(i))
    }

    pub fn nice_frontier_friendlies(&self, nice_min: i32) -> Vec<usize> {
        self.list(|i| self.is_mine(i) && self.touches_nice_neutral(i, nice_min))
    }

    // --- distance maps ---

    /// Hop distance of every owned cell from the owned cells touching a nice
    /// neutral (those are 1). Unreached cells stay 0; with a positive
    /// `nice_min`, non-nice neutrals are marked 99.
    pub fn nice_frontier_distances(&self, nice_min: i32) -> Vec<usize> {
        let mut result = vec![0usize; self.size()];

        if nice_min > 0 {
            for i in 0..self.size() {
                if self.is_neutral(i) && self.production[i] < nice_min && self.strength[i] > 0 {
                    result[i] = 99;
                }
            }
        }

        let mut last_hits = self.nice_frontier_friendlies(nice_min);
        for &i in &last_hits {
            result[i] = 1;
        }

        let mut depth = 2;
        while !last_hits.is_empty() {
            let mut hits = Vec::with_capacity(8);
            for &i in &last_hits {
                for n in self.grid.neighbours(i) {
                    if self.is_mine(n.index) && result[n.index] == 0 {
                        result[n.index] = depth;
                        hits.push(n.index);
                    }
                }
            }
            last_hits = hits;
            depth += 1;
        }

        result
    }

    /// Owned cells bucketed by `values[i]`, buckets in ascending cell order.
    pub fn friendlies_by_value(&self, values: &[usize]) -> Vec<Vec<usize>> {
        let max_value = values.iter().copied().max().unwrap_or(0);
        let mut result = vec![Vec::new(); max_value + 1];
        for i in 0..self.size() {
            if self.is_mine(i) {
                result[values[i]].push(i);
            }
        }
        result
    }

    // --- counts ---

    pub fn count_friendly(&self) -> usize {
        self.owner.iter().filter(|&&o| o == self.id).count()
    }

    pub fn count_enemy(&self) -> usize {
        self.owner
            .iter()
            .filter(|&&o| o != self.id && o != NEUTRAL)
            .count()
    }

    pub fn count_players(&self) -> usize {
        self.owner
            .iter()
            .filter(|&&o| o != NEUTRAL)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Total production of our cells: the planner's score.
    pub fn my_production(&self) -> i32 {
        (0..self.size())
            .filter(|&i| self.is_mine(i))
            .map(|i| self.production[i])
            .sum()
    }

    /// Fraction of cells whose production falls below `nice_min`.
    pub fn nice_exclude_fraction(&self, nice_min: i32) -> f32 {
        let excluded = self.production.iter().filter(|&&p| p < nice_min).count();
        excluded as f32 / self.size() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 board, player 1 holds a 2x1 strip, player 2 sits two cells east.
    fn small_state() -> GameState {
        #[rustfmt::skip]
        let owner = vec![
            0, 0, 0, 0,
            0, 1, 1, 0,
            0, 0, 0, 2,
            0, 0, 0, 0,
        ];
        #[rustfmt::skip]
        let strength = vec![
            5, 0, 9, 5,
            5, 40, 20, 0,
            5, 0, 7, 50,
            5, 5, 5, 5,
        ];
        let production = vec![2; 16];
        GameState::from_cells(4, 4, 1, owner, strength, production)
    }

    #[test]
    fn from_cells_resets_orders_and_start() {
        let state = small_state();
        assert_eq!(state.start_loc, 5);
        assert_eq!(state.allocation(5), 40);
        assert_eq!(state.allocation(0), 0);
        assert_eq!(state.turn, 0);
    }

    #[test]
    fn classification_helpers() {
        let state = small_state();
        assert!(state.is_mine(5));
        assert!(state.is_enemy(11));
        assert!(state.is_neutral(0));
        assert!(state.is_nice_neutral(1, 3));
        assert!(!state.is_nice_neutral(0, 3));
        assert!(state.is_nice_neutral(0, 2));
        assert!(state.touches_enemy(10));
        assert!(state.touches_friendly(10));
    }

    #[test]
    fn war_zone_needs_both_sides() {
        let state = small_state();
        // Cell 10 touches our 6 and their 11; cell 7 touches 6 and 11 too.
        assert_eq!(state.war_zones(), vec![7, 10]);
    }

    #[test]
    fn snapshot_shares_grid_but_not_cells() {
        let state = small_state();
        let mut copy = state.snapshot();
        assert!(Arc::ptr_eq(&state.grid, &copy.grid));
        copy.strength[5] = 0;
        copy.set_move(6, Direction::East, "x");
        assert_eq!(state.strength[5], 40);
        assert_eq!(state.move_of(6), Direction::Still);
    }

    #[test]
    fn frontier_distances_walk_inward() {
        #[rustfmt::skip]
        let owner = vec![
            1, 1, 1, 0, 0,
            1, 1, 1, 0, 0,
            1, 1, 1, 0, 0,
            1, 1, 1, 0, 0,
            1, 1, 1, 0, 0,
        ];
        let state = GameState::from_cells(5, 5, 1, owner, vec![0; 25], vec![1; 25]);
        let dist = state.nice_frontier_distances(0);
        // Columns 0 and 2 touch neutrals (column 0 via wraparound).
        assert_eq!(dist[0], 1);
        assert_eq!(dist[1], 2);
        assert_eq!(dist[2], 1);
        assert_eq!(dist[3], 0);
    }

    #[test]
    fn buckets_by_value() {
        let state = small_state();
        let values = vec![0, 0, 0, 0, 0, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let buckets = state.friendlies_by_value(&values);
        assert_eq!(buckets, vec![vec![], vec![6], vec![5]]);
    }

    #[test]
    fn counts_and_production() {
        let state = small_state();
        assert_eq!(state.count_friendly(), 2);
        assert_eq!(state.count_enemy(), 1);
        assert_eq!(state.count_players(), 2);
        assert_eq!(state.my_production(), 4);
    }
}
