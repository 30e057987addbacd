//! Rules engine for a two-grid naval combat game: grids and fleets, the
//! match state machine and a hunt-and-target computer opponent.

mod ai;
mod bitboard;
mod common;
mod config;
mod fleet;
mod game;
mod grid;
mod logging;
mod ship;
mod timer;
pub mod ui;

pub use ai::*;
pub use bitboard::{BitBoard, BitBoardError, Mask, SetBits};
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
pub use grid::*;
pub use logging::{init_logging, LOG_ENV};
pub use ship::*;
pub use timer::*;
