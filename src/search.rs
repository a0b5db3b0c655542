//! Depth-limited minimax search with alpha-beta pruning.
//!
//! The search explores value copies of the board: every explored move is
//! applied to a fresh clone, so the caller's board is only ever read.
//!
//! Scores are always [`Board::evaluate`], positive for [`Side::First`]. The
//! agent's own plies maximize and the opponent's plies minimize.
//!
//! Pruning happens only inside the destination list of the piece being
//! examined: once `beta <= alpha` the remaining destinations of that piece
//! are skipped, but the next piece is still examined.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};

use crate::board::{Board, Side};
use crate::constants::{DEPTH_DEEP, DEPTH_MEDIUM, DEPTH_SHALLOW};
use crate::movegen::Move;

/// Named search strength.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Level {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Level {
    /// Plies searched at this level.
    pub fn depth(self) -> u32 {
        match self {
            Level::Easy => DEPTH_SHALLOW,
            Level::Medium => DEPTH_MEDIUM,
            Level::Hard => DEPTH_DEEP,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Easy => write!(f, "easy"),
            Level::Medium => write!(f, "medium"),
            Level::Hard => write!(f, "hard"),
        }
    }
}

/// Accepts `easy|medium|hard` or `1|2|3`, case-insensitively. Anything else
/// maps to the default level rather than failing.
impl FromStr for Level {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_lowercase().as_str() {
            "easy" | "1" => Level::Easy,
            "medium" | "2" => Level::Medium,
            "hard" | "3" => Level::Hard,
            other => {
                warn!("unknown level '{other}', using {}", Level::default());
                Level::default()
            }
        };
        Ok(level)
    }
}

/// Score and chosen move of a search. `best_move` is `None` when the side to
/// move had nothing to play, or at a leaf.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub score: f64,
    pub best_move: Option<Move>,
}

impl SearchResult {
    fn leaf(board: &Board) -> Self {
        Self {
            score: board.evaluate(),
            best_move: None,
        }
    }
}

/// Counters gathered during one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, root included
    pub nodes: u64,
    /// Positions scored with `evaluate`
    pub leaves: u64,
    /// Destination lists cut short by pruning
    pub cutoffs: u64,
}

/// A move-picking agent for one side.
#[derive(Clone, Debug)]
pub struct Agent {
    side: Side,
    depth: u32,
}

impl Agent {
    pub fn new(side: Side, level: Level) -> Self {
        Self::with_depth(side, level.depth())
    }

    /// An agent searching an explicit number of plies.
    pub fn with_depth(side: Side, depth: u32) -> Self {
        Self { side, depth }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Switch to the ply count of `level`; applies from the next search on.
    pub fn set_search_depth(&mut self, level: Level) {
        self.depth = level.depth();
    }

    /// The move this agent plays on `board`. `None` if the root board is
    /// already terminal, which includes the opponent being the blocked side,
    /// or if this agent's side has no legal move.
    pub fn best_move(&self, board: &Board) -> Option<Move> {
        self.search(board).0.best_move
    }

    /// Full search from the root, returning the result and node counters.
    pub fn search(&self, board: &Board) -> (SearchResult, SearchStats) {
        let mut stats = SearchStats::default();
        let result = self.alpha_beta(
            board,
            self.depth,
            true,
            f64::NEG_INFINITY,
            f64::INFINITY,
            &mut stats,
        );
        debug!(
            "{} depth {}: score {:.1}, move {}, {} nodes, {} leaves, {} cutoffs",
            self.side,
            self.depth,
            result.score,
            result.best_move.map_or("none".to_string(), |m| m.to_string()),
            stats.nodes,
            stats.leaves,
            stats.cutoffs
        );
        (result, stats)
    }

    /// Minimax value of `board` searched `depth` plies deep within the
    /// `(alpha, beta)` window. `maximizing` means this agent is to move.
    pub fn minimax(
        &self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        alpha: f64,
        beta: f64,
    ) -> SearchResult {
        let mut stats = SearchStats::default();
        self.alpha_beta(board, depth, maximizing, alpha, beta, &mut stats)
    }

    fn alpha_beta(
        &self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
        stats: &mut SearchStats,
    ) -> SearchResult {
        stats.nodes += 1;
        if depth == 0 || board.is_terminal() {
            stats.leaves += 1;
            return SearchResult::leaf(board);
        }

        let to_move = if maximizing {
            self.side
        } else {
            self.side.opponent()
        };
        let mut best = SearchResult {
            score: if maximizing {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            },
            best_move: None,
        };

        for from in board.pieces_of(to_move) {
            for mv in board.legal_destinations(from) {
                let mut child = board.clone();
                child.apply_move(mv);
                let score = self
                    .alpha_beta(&child, depth - 1, !maximizing, alpha, beta, stats)
                    .score;
                trace!("depth {depth} {to_move} {mv}: {score:.1}");

                if maximizing {
                    if score > best.score {
                        best = SearchResult {
                            score,
                            best_move: Some(mv),
                        };
                    }
                    alpha = alpha.max(score);
                } else {
                    if score < best.score {
                        best = SearchResult {
                            score,
                            best_move: Some(mv),
                        };
                    }
                    beta = beta.min(score);
                }

                if beta <= alpha {
                    stats.cutoffs += 1;
                    break;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, Square};

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_level_depths() {
        assert_eq!(Level::Easy.depth(), 2);
        assert_eq!(Level::Medium.depth(), 4);
        assert_eq!(Level::Hard.depth(), 6);
        assert_eq!(Level::default(), Level::Medium);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("easy".parse::<Level>(), Ok(Level::Easy));
        assert_eq!("HARD".parse::<Level>(), Ok(Level::Hard));
        assert_eq!("2".parse::<Level>(), Ok(Level::Medium));
        assert_eq!("extreme".parse::<Level>(), Ok(Level::Medium));
        assert_eq!("4".parse::<Level>(), Ok(Level::Medium));
    }

    #[test]
    fn test_set_search_depth() {
        let mut agent = Agent::new(Side::Second, Level::Medium);
        assert_eq!(agent.depth(), 4);
        agent.set_search_depth(Level::Hard);
        assert_eq!(agent.depth(), 6);
        agent.set_search_depth(Level::Easy);
        assert_eq!(agent.depth(), 2);
    }

    #[test]
    fn test_depth_zero_returns_evaluation() {
        let mut board = Board::new();
        board.remove(sq(0, 1));
        let agent = Agent::with_depth(Side::First, 0);
        let result = agent.minimax(&board, 0, true, f64::NEG_INFINITY, f64::INFINITY);
        assert_eq!(result.score, board.evaluate());
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_takes_free_capture() {
        let mut board = Board::empty();
        board.place(sq(6, 1), Piece::man(Side::First)).unwrap();
        board.place(sq(5, 2), Piece::man(Side::Second)).unwrap();

        let agent = Agent::with_depth(Side::First, 1);
        let (result, stats) = agent.search(&board);
        assert_eq!(result.best_move.map(|m| m.to), Some(sq(4, 3)));
        assert_eq!(result.score, 1.0);
        // Root plus one child per legal move
        assert_eq!(stats.nodes, 3);
    }

    #[test]
    fn test_no_move_on_terminal_board() {
        let mut board = Board::empty();
        board.place(sq(5, 2), Piece::man(Side::First)).unwrap();
        let agent = Agent::new(Side::Second, Level::Easy);
        assert_eq!(agent.best_move(&board), None);
    }

    #[test]
    fn test_search_does_not_touch_board() {
        let board = Board::new();
        let before = board.clone();
        let agent = Agent::new(Side::First, Level::Easy);
        assert!(agent.best_move(&board).is_some());
        assert_eq!(board, before);
    }

    #[test]
    fn test_ties_keep_first_found_move() {
        // Nothing can be captured within two plies of the opening, so every
        // move scores 0 and the first piece's first destination wins
        let board = Board::new();
        let first = Agent::new(Side::First, Level::Easy);
        let (result, _) = first.search(&board);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.best_move, Some(Move::new(sq(5, 0), sq(4, 1))));

        let second = Agent::new(Side::Second, Level::Easy);
        let (result, _) = second.search(&board);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.best_move, Some(Move::new(sq(2, 1), sq(3, 0))));
    }

    #[test]
    fn test_cutoff_skips_only_current_piece() {
        // Root: 7 replies. The first is searched fully (1 + 7 leaves); each of
        // the other 6 cuts after one leaf per mobile piece (4 pieces), so the
        // pieces after a cutoff are still visited.
        let board = Board::new();
        let agent = Agent::new(Side::Second, Level::Easy);
        let (_, stats) = agent.search(&board);
        assert_eq!(
            stats,
            SearchStats {
                nodes: 39,
                leaves: 31,
                cutoffs: 24,
            }
        );
    }

    #[test]
    fn test_pruning_counts_cutoffs() {
        let board = Board::new();
        let agent = Agent::new(Side::Second, Level::Medium);
        let (result, stats) = agent.search(&board);
        assert_eq!(result.best_move, Some(Move::new(sq(2, 1), sq(3, 0))));
        assert_eq!(
            stats,
            SearchStats {
                nodes: 1304,
                leaves: 1072,
                cutoffs: 1178,
            }
        );
    }
}
