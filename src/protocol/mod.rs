//! Host protocol handling.
//!
//! Parsing of the startup messages and per-turn frames, and formatting of
//! the move line sent back each turn.

pub mod frame;
pub mod moves;

pub use frame::{parse_frame, parse_production, Frame, FrameError, FrameReader, Handshake};
pub use moves::{collect_moves, format_moves, MoveOrder};
