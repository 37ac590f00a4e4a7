//! Implementation of chess rules: board representation, legal move
//! generation, notation and the game state machine.

pub mod bitboard;
pub mod core;
pub mod game;
pub mod perft;
pub mod position;

mod attacks;
mod movegen;
mod repetition;
mod san;
