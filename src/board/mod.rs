//! Board representation and game-state types.
//!
//! Contains the toroidal grid geometry, move directions, per-turn order
//! bookkeeping, and the overall game state.

pub mod direction;
pub mod grid;
pub mod orders;
pub mod state;

pub use direction::Direction;
pub use grid::{Grid, Neighbour};
pub use orders::TurnState;
pub use state::{GameState, PlayerId, NEUTRAL, STRENGTH_CAP};
