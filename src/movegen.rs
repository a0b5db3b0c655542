//! Move generation, move execution, and game-end detection.
//!
//! Captures are optional: capture and non-capture destinations are returned
//! together with no priority between them. Only single jumps are generated;
//! there is no chained multi-jump within one move.

use std::fmt;

use crate::board::{Board, BoardError, Side, Square};

/// A step or jump from one square to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Build a move from raw coordinates, checking bounds.
    pub fn from_coords(
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> Result<Self, BoardError> {
        Ok(Self::new(
            Square::new(from_row, from_col)?,
            Square::new(to_row, to_col)?,
        ))
    }

    #[inline]
    pub fn is_jump(&self) -> bool {
        self.from.row().abs_diff(self.to.row()) == 2
    }

    /// The square jumped over, for a jump.
    pub fn captured(&self) -> Option<Square> {
        if !self.is_jump() {
            return None;
        }
        Square::new(
            (self.from.row() + self.to.row()) / 2,
            (self.from.col() + self.to.col()) / 2,
        )
        .ok()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_jump() { 'x' } else { '-' };
        write!(f, "{}{sep}{}", self.from, self.to)
    }
}

/// Reasons a move submitted from outside is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// No piece on the start square
    EmptySquare(Square),
    /// Start square holds the other side's piece
    WrongSide(Square),
    /// Destination is not among the piece's legal destinations
    Illegal(Move),
    /// The game has already ended
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::EmptySquare(sq) => write!(f, "illegal move: no piece on {sq}"),
            MoveError::WrongSide(sq) => write!(f, "illegal move: piece on {sq} is not yours"),
            MoveError::Illegal(mv) => write!(f, "illegal move: {mv}"),
            MoveError::GameOver => write!(f, "illegal move: game is over"),
        }
    }
}

impl std::error::Error for MoveError {}

impl Board {
    /// Every legal destination of the piece on `sq`: forward (or, for a
    /// king, any) diagonal steps onto empty squares, followed by the capture
    /// destinations. Empty if `sq` holds no piece.
    pub fn legal_destinations(&self, sq: Square) -> Vec<Move> {
        let Some(piece) = self.get(sq) else {
            return Vec::new();
        };

        let mut moves: Vec<Move> = piece
            .directions()
            .iter()
            .filter_map(|&dir| sq.offset(dir, 1))
            .filter(|&to| self.is_empty(to))
            .map(|to| Move::new(sq, to))
            .collect();
        moves.extend(self.capture_destinations(sq));
        moves
    }

    /// Single-jump captures available to the piece on `sq`.
    pub fn capture_destinations(&self, sq: Square) -> Vec<Move> {
        let Some(piece) = self.get(sq) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        for &dir in piece.directions() {
            let Some(over) = sq.offset(dir, 1) else {
                continue;
            };
            if !self.get(over).is_some_and(|p| p.side != piece.side) {
                continue;
            }
            if let Some(land) = sq.offset(dir, 2) {
                if land.is_playable() && self.is_empty(land) {
                    moves.push(Move::new(sq, land));
                }
            }
        }
        moves
    }

    /// All legal moves of `side`, piece by piece in `pieces_of` order.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        self.pieces_of(side)
            .into_iter()
            .flat_map(|sq| self.legal_destinations(sq))
            .collect()
    }

    /// Whether any piece of `side` has a legal destination.
    pub fn has_moves(&self, side: Side) -> bool {
        self.pieces_of(side)
            .into_iter()
            .any(|sq| !self.legal_destinations(sq).is_empty())
    }

    /// Execute `mv`: a jump first removes the piece it passes over, then the
    /// piece is relocated and crowned if it lands on its promotion row.
    ///
    /// This trusts its input and performs no legality check; callers must
    /// take `mv` from [`Board::legal_destinations`] or go through
    /// [`Board::play`].
    pub fn apply_move(&mut self, mv: Move) {
        if let Some(mid) = mv.captured() {
            self.remove(mid);
        }
        self.relocate(mv.from, mv.to);
    }

    /// Validate `mv` for `side` and apply it.
    pub fn play(&mut self, side: Side, mv: Move) -> Result<(), MoveError> {
        match self.get(mv.from) {
            None => return Err(MoveError::EmptySquare(mv.from)),
            Some(p) if p.side != side => return Err(MoveError::WrongSide(mv.from)),
            Some(_) => {}
        }
        if !self.legal_destinations(mv.from).contains(&mv) {
            return Err(MoveError::Illegal(mv));
        }
        self.apply_move(mv);
        Ok(())
    }

    /// True if either side has no pieces, or either side has no legal move.
    /// Mobility of both sides is checked regardless of whose turn it is.
    pub fn is_terminal(&self) -> bool {
        if self.piece_count(Side::First) == 0 || self.piece_count(Side::Second) == 0 {
            return true;
        }
        !self.has_moves(Side::First) || !self.has_moves(Side::Second)
    }

    /// The side still holding pieces once the other has none. A blocked
    /// position where both sides keep pieces has no winner.
    pub fn winner(&self) -> Option<Side> {
        if self.piece_count(Side::First) == 0 {
            Some(Side::Second)
        } else if self.piece_count(Side::Second) == 0 {
            Some(Side::First)
        } else {
            None
        }
    }
}
