//! Toroidal grid geometry and the neighbour lookup table.
//!
//! The table is built once per map and never mutated afterwards, so the live
//! game and every planning snapshot share one copy behind an `Arc`.

use super::direction::Direction;

/// One entry of a cell's neighbour table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighbour {
    pub index: usize,
    pub dir: Direction,
}

/// Map dimensions plus the precomputed 4-neighbour table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    neighbours: Vec<[Neighbour; 4]>,
}

impl Grid {
    /// Builds the grid and its neighbour table. Both dimensions must be
    /// non-zero; the protocol layer rejects empty maps before this point.
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        let mut grid = Grid {
            width,
            height,
            neighbours: Vec::with_capacity(width * height),
        };
        for i in 0..width * height {
            let (x, y) = grid.index_to_xy(i);
            let (x, y) = (x as isize, y as isize);
            // Slot order must match Direction::slot().
            let entry = [
                Neighbour { index: grid.xy_to_index(x, y - 1), dir: Direction::North },
                Neighbour { index: grid.xy_to_index(x + 1, y), dir: Direction::East },
                Neighbour { index: grid.xy_to_index(x, y + 1), dir: Direction::South },
                Neighbour { index: grid.xy_to_index(x - 1, y), dir: Direction::West },
            ];
            grid.neighbours.push(entry);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> usize {
        self.width * self.height
    }

    pub fn index_to_xy(&self, i: usize) -> (usize, usize) {
        (i % self.width, i / self.width)
    }

    /// Converts possibly out-of-range coordinates to a cell id, wrapping on
    /// both axes.
    pub fn xy_to_index(&self, x: isize, y: isize) -> usize {
        let x = x.rem_euclid(self.width as isize) as usize;
        let y = y.rem_euclid(self.height as isize) as usize;
        y * self.width + x
    }

    pub fn neighbours(&self, i: usize) -> &[Neighbour; 4] {
        &self.neighbours[i]
    }

    /// Returns the cell reached from `src` by one step in `dir`; `src` itself
    /// for `Still`.
    pub fn move_target(&self, src: usize, dir: Direction) -> usize {
        match dir.slot() {
            Some(slot) => self.neighbours[src][slot].index,
            None => src,
        }
    }

    /// Returns the direction that takes a piece from `src` to the adjacent
    /// `dst` in one move, or `Still` when they are not adjacent.
    pub fn cardinal(&self, src: usize, dst: usize) -> Direction {
        let (x, y) = self.index_to_xy(src);
        let (x, y) = (x as isize, y as isize);
        if self.xy_to_index(x - 1, y) == dst {
            Direction::West
        } else if self.xy_to_index(x + 1, y) == dst {
            Direction::East
        } else if self.xy_to_index(x, y - 1) == dst {
            Direction::North
        } else if self.xy_to_index(x, y + 1) == dst {
            Direction::South
        } else {
            Direction::Still
        }
    }

    /// True when `a` and `b` are distinct orthogonal neighbours.
    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbours[a].iter().any(|n| n.index == b) && a != b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_negative_and_overflowing_coordinates() {
        let grid = Grid::new(5, 4);
        assert_eq!(grid.xy_to_index(-1, 0), 4);
        assert_eq!(grid.xy_to_index(5, 0), 0);
        assert_eq!(grid.xy_to_index(0, -1), 15);
        assert_eq!(grid.xy_to_index(-11, -9), grid.xy_to_index(4, 3));
        assert_eq!(grid.index_to_xy(13), (3, 2));
    }

    #[test]
    fn neighbour_table_matches_direction_slots() {
        let grid = Grid::new(6, 6);
        for i in 0..grid.size() {
            for dir in Direction::CARDINALS {
                let target = grid.move_target(i, dir);
                assert_eq!(grid.cardinal(i, target), dir);
                assert_eq!(grid.move_target(target, dir.opposite()), i);
            }
            assert_eq!(grid.move_target(i, Direction::Still), i);
        }
    }

    #[test]
    fn corner_neighbours_wrap() {
        let grid = Grid::new(4, 3);
        let n = grid.neighbours(0);
        assert_eq!(n[0].index, grid.xy_to_index(0, 2));
        assert_eq!(n[1].index, 1);
        assert_eq!(n[2].index, 4);
        assert_eq!(n[3].index, 3);
    }

    #[test]
    fn cardinal_of_non_adjacent_is_still() {
        let grid = Grid::new(5, 5);
        assert_eq!(grid.cardinal(0, 12), Direction::Still);
        assert_eq!(grid.cardinal(7, 7), Direction::Still);
        assert!(!grid.adjacent(0, 12));
        assert!(grid.adjacent(0, 4));
    }
}
