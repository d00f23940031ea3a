//! Move directions and their wire encoding.
//!
//! The numeric codes double as neighbour-table slots: code `d` (1..=4) lives
//! at slot `d - 1` of every cell's neighbour entry.

/// A single-step move, or holding still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Direction {
    #[default]
    Still = 0,
    North = 1,
    East = 2,
    South = 3,
    West = 4,
}

impl Direction {
    /// The four moving directions in neighbour-table order.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the protocol code (still=0, north=1, east=2, south=3, west=4).
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Neighbour-table slot for this direction, `None` for `Still`.
    pub const fn slot(self) -> Option<usize> {
        match self {
            Direction::Still => None,
            Direction::North => Some(0),
            Direction::East => Some(1),
            Direction::South => Some(2),
            Direction::West => Some(3),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Still => Direction::Still,
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Short lowercase name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Still => "still",
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_protocol() {
        assert_eq!(Direction::Still.code(), 0);
        assert_eq!(Direction::North.code(), 1);
        assert_eq!(Direction::East.code(), 2);
        assert_eq!(Direction::South.code(), 3);
        assert_eq!(Direction::West.code(), 4);
    }

    #[test]
    fn slots_follow_cardinal_order() {
        for (slot, dir) in Direction::CARDINALS.iter().enumerate() {
            assert_eq!(dir.slot(), Some(slot));
            assert_eq!(usize::from(dir.code()) - 1, slot);
        }
        assert_eq!(Direction::Still.slot(), None);
    }

    #[test]
    fn opposite_is_involution() {
        for dir in Direction::CARDINALS {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::Still.opposite(), Direction::Still);
    }
}
