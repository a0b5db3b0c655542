//! Board state: the 8x8 grid, its pieces, and per-side material counters.
//!
//! Each cell holds `Option<Piece>`. Alongside the grid the board keeps the
//! live-piece and king count of each side; every mutation goes through
//! [`Board::place`], [`Board::remove`] or `Board::apply_move`, so the
//! counters always equal what is on the grid.

use std::fmt;

use crate::constants::{
    FIRST_MAN_DIRECTIONS, HOME_ROWS, KING_BONUS, KING_DIRECTIONS, MAN_VALUE, N,
    SECOND_MAN_DIRECTIONS,
};

/// One of the two sides. `First` starts on the bottom rows and moves toward
/// row 0; `Second` starts on the top rows and moves toward row 7.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Row on which an unpromoted piece of this side is crowned.
    #[inline]
    pub fn promotion_row(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => N - 1,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub side: Side,
    pub is_king: bool,
}

impl Piece {
    pub fn man(side: Side) -> Self {
        Self {
            side,
            is_king: false,
        }
    }

    pub fn king(side: Side) -> Self {
        Self {
            side,
            is_king: true,
        }
    }

    /// Diagonal directions this piece may step or jump in.
    pub fn directions(&self) -> &'static [(isize, isize)] {
        match (self.is_king, self.side) {
            (true, _) => &KING_DIRECTIONS,
            (false, Side::First) => &FIRST_MAN_DIRECTIONS,
            (false, Side::Second) => &SECOND_MAN_DIRECTIONS,
        }
    }

    fn symbol(&self) -> char {
        match (self.side, self.is_king) {
            (Side::First, false) => 'x',
            (Side::First, true) => 'X',
            (Side::Second, false) => 'o',
            (Side::Second, true) => 'O',
        }
    }

    fn from_symbol(ch: char) -> Option<Option<Piece>> {
        match ch {
            '.' => Some(None),
            'x' => Some(Some(Piece::man(Side::First))),
            'X' => Some(Some(Piece::king(Side::First))),
            'o' => Some(Some(Piece::man(Side::Second))),
            'O' => Some(Some(Piece::king(Side::Second))),
            _ => None,
        }
    }
}

/// Errors raised when addressing or building a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Row or column outside 0..8
    OutOfBounds { row: usize, col: usize },
    /// Square of the colour class pieces never stand on
    NotPlayable(Square),
    /// Malformed board diagram
    BadDiagram(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds { row, col } => {
                write!(f, "square ({row},{col}) is off the board")
            }
            BoardError::NotPlayable(sq) => write!(f, "square {sq} is not playable"),
            BoardError::BadDiagram(msg) => write!(f, "bad board diagram: {msg}"),
        }
    }
}

impl std::error::Error for BoardError {}

/// A coordinate on the board. Construction checks bounds, so a `Square` is
/// always on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Result<Self, BoardError> {
        if row >= N || col >= N {
            return Err(BoardError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col
    }

    #[inline]
    pub fn is_playable(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// The square `dist` diagonal steps away in direction `(dr, dc)`, if it is
    /// still on the board.
    pub fn offset(self, (dr, dc): (isize, isize), dist: isize) -> Option<Square> {
        let row = self.row as isize + dr * dist;
        let col = self.col as isize + dc * dist;
        if (0..N as isize).contains(&row) && (0..N as isize).contains(&col) {
            Some(Square {
                row: row as usize,
                col: col as usize,
            })
        } else {
            None
        }
    }

    /// Every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..N).flat_map(|row| (0..N).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// The 8x8 board with incrementally maintained material counters.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: [[Option<Piece>; N]; N],
    /// Live pieces per side, indexed by `Side::index`
    pieces: [u32; 2],
    /// Kings per side
    kings: [u32; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A board in the starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup();
        board
    }

    /// A board with no pieces at all.
    pub fn empty() -> Self {
        Self {
            cells: [[None; N]; N],
            pieces: [0; 2],
            kings: [0; 2],
        }
    }

    /// Reset to the starting position: `Second` on every playable square of
    /// rows 0..3, `First` on rows 5..8, the middle two rows empty.
    pub fn setup(&mut self) {
        *self = Self::empty();
        for sq in Square::all().filter(|sq| sq.is_playable()) {
            let side = if sq.row < HOME_ROWS {
                Side::Second
            } else if sq.row >= N - HOME_ROWS {
                Side::First
            } else {
                continue;
            };
            self.cells[sq.row][sq.col] = Some(Piece::man(side));
            self.pieces[side.index()] += 1;
        }
    }

    /// Parse a diagram of 8 rows of 8 symbols (`.` empty, `x`/`X` first
    /// side man/king, `o`/`O` second side man/king). Whitespace inside a row
    /// and blank lines are ignored, so the output of `Display` parses back.
    pub fn from_diagram(diagram: &str) -> Result<Self, BoardError> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != N {
            return Err(BoardError::BadDiagram(format!(
                "expected {N} rows, got {}",
                rows.len()
            )));
        }

        let mut board = Self::empty();
        for (row, symbols) in rows.iter().enumerate() {
            if symbols.len() != N {
                return Err(BoardError::BadDiagram(format!(
                    "row {row} has {} squares",
                    symbols.len()
                )));
            }
            for (col, &ch) in symbols.iter().enumerate() {
                let cell = Piece::from_symbol(ch).ok_or_else(|| {
                    BoardError::BadDiagram(format!("unknown symbol '{ch}' at ({row},{col})"))
                })?;
                if let Some(piece) = cell {
                    board.place(Square::new(row, col)?, piece)?;
                }
            }
        }
        Ok(board)
    }

    /// The occupant of `sq`.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row][sq.col]
    }

    /// The occupant of `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is off the board.
    pub fn at(&self, row: usize, col: usize) -> Option<Piece> {
        match Square::new(row, col) {
            Ok(sq) => self.get(sq),
            Err(err) => panic!("{err}"),
        }
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Put `piece` on a playable square, replacing any previous occupant.
    pub fn place(&mut self, sq: Square, piece: Piece) -> Result<(), BoardError> {
        if !sq.is_playable() {
            return Err(BoardError::NotPlayable(sq));
        }
        self.remove(sq);
        self.cells[sq.row][sq.col] = Some(piece);
        self.pieces[piece.side.index()] += 1;
        if piece.is_king {
            self.kings[piece.side.index()] += 1;
        }
        Ok(())
    }

    /// Delete whatever stands on `sq`. No-op on an empty square.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.cells[sq.row][sq.col].take()?;
        self.pieces[piece.side.index()] -= 1;
        if piece.is_king {
            self.kings[piece.side.index()] -= 1;
        }
        Some(piece)
    }

    /// Move the occupant of `from` to `to`, crowning it if `to` is its
    /// promotion row. Does not capture. No-op if `from` is empty.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        let Some(mut piece) = self.cells[from.row][from.col].take() else {
            return;
        };
        if !piece.is_king && to.row == piece.side.promotion_row() {
            piece.is_king = true;
            self.kings[piece.side.index()] += 1;
        }
        self.cells[to.row][to.col] = Some(piece);
    }

    /// Squares holding a piece of `side`, in row-major order.
    pub fn pieces_of(&self, side: Side) -> Vec<Square> {
        Square::all()
            .filter(|&sq| self.get(sq).is_some_and(|p| p.side == side))
            .collect()
    }

    #[inline]
    pub fn piece_count(&self, side: Side) -> u32 {
        self.pieces[side.index()]
    }

    #[inline]
    pub fn king_count(&self, side: Side) -> u32 {
        self.kings[side.index()]
    }

    /// Material balance: positive favours `First`.
    pub fn evaluate(&self) -> f64 {
        let material = |side: Side| {
            self.piece_count(side) as f64 * MAN_VALUE + self.king_count(side) as f64 * KING_BONUS
        };
        material(Side::First) - material(Side::Second)
    }

    /// Whether the counters agree with a fresh count of the grid.
    pub fn counts_consistent(&self) -> bool {
        [Side::First, Side::Second].into_iter().all(|side| {
            let on_grid: Vec<Piece> = Square::all()
                .filter_map(|sq| self.get(sq))
                .filter(|p| p.side == side)
                .collect();
            let kings = on_grid.iter().filter(|p| p.is_king).count();
            on_grid.len() as u32 == self.piece_count(side) && kings as u32 == self.king_count(side)
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..N {
            for col in 0..N {
                let ch = self.cells[row][col].map_or('.', |p| p.symbol());
                if col + 1 < N {
                    write!(f, "{ch} ")?;
                } else {
                    write!(f, "{ch}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PIECES_PER_SIDE;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_setup_counts() {
        let board = Board::new();
        assert_eq!(board.piece_count(Side::First), PIECES_PER_SIDE);
        assert_eq!(board.piece_count(Side::Second), PIECES_PER_SIDE);
        assert_eq!(board.king_count(Side::First), 0);
        assert_eq!(board.king_count(Side::Second), 0);
        assert!(board.counts_consistent());
    }

    #[test]
    fn test_setup_layout() {
        let board = Board::new();
        for square in Square::all() {
            match board.get(square) {
                Some(p) => {
                    assert!(square.is_playable());
                    assert!(!p.is_king);
                    if p.side == Side::Second {
                        assert!(square.row() < 3);
                    } else {
                        assert!(square.row() >= 5);
                    }
                }
                None => assert!(!square.is_playable() || (3..5).contains(&square.row())),
            }
        }
    }

    #[test]
    fn test_square_out_of_bounds() {
        assert_eq!(
            Square::new(8, 0),
            Err(BoardError::OutOfBounds { row: 8, col: 0 })
        );
        assert!(Square::new(0, 8).is_err());
        assert!(Square::new(7, 7).is_ok());
    }

    #[test]
    #[should_panic]
    fn test_at_out_of_bounds_panics() {
        Board::new().at(0, 9);
    }

    #[test]
    fn test_offset_stays_on_board() {
        assert_eq!(sq(0, 1).offset((-1, 1), 1), None);
        assert_eq!(sq(6, 1).offset((-1, 1), 2), Some(sq(4, 3)));
        assert_eq!(sq(1, 0).offset((1, -1), 1), None);
    }

    #[test]
    fn test_remove_updates_counters() {
        let mut board = Board::empty();
        board.place(sq(3, 2), Piece::king(Side::First)).unwrap();
        assert_eq!(board.king_count(Side::First), 1);

        assert_eq!(board.remove(sq(3, 2)), Some(Piece::king(Side::First)));
        assert_eq!(board.piece_count(Side::First), 0);
        assert_eq!(board.king_count(Side::First), 0);

        // Already empty
        assert_eq!(board.remove(sq(3, 2)), None);
        assert_eq!(board.piece_count(Side::First), 0);
    }

    #[test]
    fn test_place_rejects_unplayable() {
        let mut board = Board::empty();
        let err = board.place(sq(0, 0), Piece::man(Side::First));
        assert_eq!(err, Err(BoardError::NotPlayable(sq(0, 0))));
    }

    #[test]
    fn test_place_replaces_occupant() {
        let mut board = Board::empty();
        board.place(sq(4, 1), Piece::man(Side::First)).unwrap();
        board.place(sq(4, 1), Piece::king(Side::Second)).unwrap();
        assert_eq!(board.piece_count(Side::First), 0);
        assert_eq!(board.piece_count(Side::Second), 1);
        assert_eq!(board.king_count(Side::Second), 1);
    }

    #[test]
    fn test_evaluate_material() {
        let mut board = Board::empty();
        board.place(sq(5, 0), Piece::king(Side::First)).unwrap();
        board.place(sq(5, 2), Piece::man(Side::First)).unwrap();
        board.place(sq(0, 1), Piece::man(Side::Second)).unwrap();
        assert_eq!(board.evaluate(), 1.5);
        assert_eq!(Board::new().evaluate(), 0.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let board = Board::new();
        let mut copy = board.clone();
        copy.remove(sq(5, 0));
        assert_eq!(board.piece_count(Side::First), 12);
        assert_eq!(copy.piece_count(Side::First), 11);
        assert!(board.get(sq(5, 0)).is_some());
    }

    #[test]
    fn test_diagram_roundtrip() {
        let board = Board::new();
        let parsed = Board::from_diagram(&board.to_string()).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_diagram_errors() {
        assert!(matches!(
            Board::from_diagram("x"),
            Err(BoardError::BadDiagram(_))
        ));
        let bad_symbol = "q.......\n".repeat(8);
        assert!(matches!(
            Board::from_diagram(&bad_symbol),
            Err(BoardError::BadDiagram(_))
        ));
        let unplayable = format!("x.......\n{}", "........\n".repeat(7));
        assert_eq!(
            Board::from_diagram(&unplayable),
            Err(BoardError::NotPlayable(sq(0, 0)))
        );
    }

    #[test]
    fn test_pieces_of_row_major() {
        let board = Board::new();
        let second = board.pieces_of(Side::Second);
        assert_eq!(second.len(), 12);
        assert_eq!(second[0], sq(0, 1));
        assert_eq!(second[1], sq(0, 3));
        assert_eq!(second[4], sq(1, 0));
        assert!(second.windows(2).all(|w| w[0] < w[1]));
    }
}
