//! Core Connect Four logic: board representation, players, win detection,
//! and the turn state machine.

mod board;
mod engine;
mod player;
pub mod win;

pub use board::{Board, COLS, ROWS};
pub use engine::{Command, EngineState, GameEngine, GameResult, MoveAccepted, Response};
pub use player::Player;
pub use win::check_win;
