//! Random playouts and driven matches between two players.
//!
//! A [`RandomMover`] picks uniformly among a side's legal moves from a seeded
//! `fastrand` generator, so every playout is reproducible from its seed. It
//! serves as a sparring opponent in self-play and as a source of random legal
//! move sequences in tests; the search agent never uses randomness.

use log::{debug, info};

use crate::board::{Board, Side};
use crate::movegen::Move;
use crate::search::Agent;

/// Anything that can pick a move for a side.
pub trait Player {
    fn choose_move(&mut self, board: &Board, side: Side) -> Option<Move>;
}

impl Player for Agent {
    /// The agent always plays its own side; `side` is only checked in debug
    /// builds.
    fn choose_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        debug_assert_eq!(side, self.side());
        self.best_move(board)
    }
}

/// Uniform random choice among legal moves.
pub struct RandomMover {
    rng: fastrand::Rng,
}

impl RandomMover {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Player for RandomMover {
    fn choose_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        let moves = board.legal_moves(side);
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.usize(..moves.len())])
    }
}

/// How a driven match ended.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayoutResult {
    /// Moves played, in order; `First` moved first
    pub moves: Vec<Move>,
    /// Whether the board reached a terminal position
    pub finished: bool,
    pub winner: Option<Side>,
    /// Material balance of the final position
    pub score: f64,
}

/// Alternate `first` and `second` on `board`, `First` to move, until the
/// board is terminal, the side to move has nothing to play, or `max_plies`
/// moves have been made.
pub fn play_match(
    board: &mut Board,
    first: &mut dyn Player,
    second: &mut dyn Player,
    max_plies: usize,
) -> PlayoutResult {
    let mut moves = Vec::new();
    let mut to_move = Side::First;

    while moves.len() < max_plies && !board.is_terminal() {
        let choice = match to_move {
            Side::First => first.choose_move(board, to_move),
            Side::Second => second.choose_move(board, to_move),
        };
        let Some(mv) = choice else {
            break;
        };
        debug!("ply {}: {to_move} plays {mv}", moves.len() + 1);
        board.apply_move(mv);
        moves.push(mv);
        to_move = to_move.opponent();
    }

    let finished = board.is_terminal();
    let winner = board.winner();
    info!(
        "match over after {} plies: finished {finished}, winner {}",
        moves.len(),
        winner.map_or("none".to_string(), |s| s.to_string())
    );
    PlayoutResult {
        moves,
        finished,
        winner,
        score: board.evaluate(),
    }
}

/// Play random moves for both sides from `board`. Returns the moves made.
pub fn random_playout(board: &mut Board, seed: u64, max_plies: usize) -> Vec<Move> {
    let mut first = RandomMover::new(seed);
    let mut second = RandomMover::new(seed.wrapping_add(1));
    play_match(board, &mut first, &mut second, max_plies).moves
}
