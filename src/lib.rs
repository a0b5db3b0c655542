//! Checkers-Rust: a draughts rules engine and a minimax opponent.
//!
//! The crate has two cores: the board state with its move rules, and an
//! alpha-beta search agent that picks moves for one side. Around them sit a
//! game session driver, a text protocol for external front ends, and random
//! playouts for self-play.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation weights, search levels
//! - [`board`] - Board state, pieces, squares, material counters
//! - [`movegen`] - Move generation, move execution, game-end detection
//! - [`search`] - Minimax with alpha-beta pruning
//! - [`game`] - Human-versus-agent session
//! - [`playout`] - Random movers and driven matches
//! - [`ctp`] - Checkers Text Protocol server
//!
//! ## Example
//!
//! ```
//! use checkers_rust::board::{Board, Side};
//! use checkers_rust::search::{Agent, Level};
//!
//! let mut board = Board::new();
//! let agent = Agent::new(Side::First, Level::Easy);
//!
//! let mv = agent.best_move(&board).expect("opening position has moves");
//! board.apply_move(mv);
//! println!("First plays {mv}\n{board}");
//! ```

pub mod board;
pub mod constants;
pub mod ctp;
pub mod game;
pub mod movegen;
pub mod playout;
pub mod search;
