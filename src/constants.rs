//! Constants for board geometry, evaluation weights, and search levels.
//!
//! The board is a fixed 8x8 draughts board. Rows run top-to-bottom (0..=7) and
//! columns left-to-right (0..=7). Only squares where `row + col` is odd are
//! playable.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 8;

/// Number of rows each side fills at setup.
pub const HOME_ROWS: usize = 3;

/// Pieces per side at setup (`HOME_ROWS` rows of `N / 2` playable squares).
pub const PIECES_PER_SIDE: u32 = (HOME_ROWS * N / 2) as u32;

/// Diagonal directions a king may move in, as (row delta, col delta).
pub const KING_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Forward diagonals of a first side man (toward row 0).
pub const FIRST_MAN_DIRECTIONS: [(isize, isize); 2] = [(-1, -1), (-1, 1)];

/// Forward diagonals of a second side man (toward row 7).
pub const SECOND_MAN_DIRECTIONS: [(isize, isize); 2] = [(1, -1), (1, 1)];

// =============================================================================
// Evaluation
// =============================================================================

/// Material value of every live piece.
pub const MAN_VALUE: f64 = 1.0;

/// Extra value of a king on top of `MAN_VALUE`.
pub const KING_BONUS: f64 = 0.5;

// =============================================================================
// Search Levels (plies)
// =============================================================================

/// Ply count for the easy level.
pub const DEPTH_SHALLOW: u32 = 2;

/// Ply count for the medium level.
pub const DEPTH_MEDIUM: u32 = 4;

/// Ply count for the hard level.
pub const DEPTH_DEEP: u32 = 6;

// =============================================================================
// Self-play
// =============================================================================

/// Default ply limit for self-play matches; draughts games can shuffle kings
/// forever, so every driven match has a ceiling.
pub const MAX_GAME_PLIES: usize = 200;

/// Default seed for the random mover.
pub const DEFAULT_SEED: u64 = 1;
