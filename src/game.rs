//! A human-versus-agent game session.
//!
//! [`Game`] owns the live board and the turn, and is what a front end talks
//! to: select a square to see its destinations, submit a move, let the agent
//! answer, and check whether the game is over. The first side always opens.

use log::{debug, info};

use crate::board::{Board, Side, Square};
use crate::movegen::{Move, MoveError};
use crate::search::{Agent, Level};

/// State of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    InProgress,
    /// Terminal position. `winner` is `None` when a side is blocked but both
    /// still hold pieces.
    Over { winner: Option<Side> },
}

/// What a click on a square did.
#[derive(Clone, Debug, PartialEq)]
pub enum Click {
    /// A piece was selected; these are its destinations
    Selected(Vec<Move>),
    /// The selected piece was moved
    Moved(Move),
    /// Selection cleared
    Cleared,
    /// Not the human's turn, or the game is over
    Ignored,
}

pub struct Game {
    board: Board,
    to_move: Side,
    human: Side,
    agent: Agent,
    level: Level,
    selected: Option<Square>,
    highlighted: Vec<Move>,
    status: Status,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

impl Game {
    /// Human plays the first side, the agent the second.
    pub fn new(level: Level) -> Self {
        Self::with_human_side(Side::First, level)
    }

    pub fn with_human_side(human: Side, level: Level) -> Self {
        Self {
            board: Board::new(),
            to_move: Side::First,
            human,
            agent: Agent::new(human.opponent(), level),
            level,
            selected: None,
            highlighted: Vec::new(),
            status: Status::InProgress,
        }
    }

    /// Start a session from an arbitrary position.
    pub fn from_board(board: Board, to_move: Side, human: Side, level: Level) -> Self {
        let mut game = Self::with_human_side(human, level);
        game.board = board;
        game.to_move = to_move;
        game.refresh_status();
        game
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    #[inline]
    pub fn human_side(&self) -> Side {
        self.human
    }

    #[inline]
    pub fn agent_side(&self) -> Side {
        self.agent.side()
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::Over { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Status::Over { winner } => winner,
            Status::InProgress => None,
        }
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Destinations of the selected piece.
    #[inline]
    pub fn highlighted(&self) -> &[Move] {
        &self.highlighted
    }

    /// Change the agent's level; the next agent move uses it.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
        self.agent.set_search_depth(level);
        info!("level set to {level} ({} plies)", level.depth());
    }

    /// Back to the starting position, keeping sides and level.
    pub fn restart(&mut self) {
        *self = Self::with_human_side(self.human, self.level);
        info!("game restarted");
    }

    /// Legal destinations of the piece on `sq`, if it belongs to the side to
    /// move. Does not change the selection.
    pub fn destinations(&self, sq: Square) -> Vec<Move> {
        match self.board.get(sq) {
            Some(p) if p.side == self.to_move => self.board.legal_destinations(sq),
            _ => Vec::new(),
        }
    }

    /// Handle a click on `sq` by the human: select an own piece, move the
    /// selected piece to a highlighted square, or clear the selection.
    pub fn click(&mut self, sq: Square) -> Click {
        if self.is_over() || self.to_move != self.human {
            return Click::Ignored;
        }

        if let Some(&mv) = self.highlighted.iter().find(|m| m.to == sq) {
            self.commit(mv);
            return Click::Moved(mv);
        }

        if self.board.get(sq).is_some_and(|p| p.side == self.human) {
            self.selected = Some(sq);
            self.highlighted = self.board.legal_destinations(sq);
            Click::Selected(self.highlighted.clone())
        } else {
            self.clear_selection();
            Click::Cleared
        }
    }

    /// Play `mv` for the side to move after checking it is legal.
    pub fn submit(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let mut next = self.board.clone();
        next.play(self.to_move, mv)?;
        self.commit(mv);
        Ok(())
    }

    /// Let the agent move if it is its turn. Returns the move played. When
    /// the agent finds nothing to play the turn stays with it.
    pub fn agent_turn(&mut self) -> Option<Move> {
        if self.is_over() || self.to_move != self.agent.side() {
            return None;
        }
        let mv = self.agent.best_move(&self.board)?;
        self.commit(mv);
        Some(mv)
    }

    fn commit(&mut self, mv: Move) {
        debug!("{} plays {mv}", self.to_move);
        self.board.apply_move(mv);
        self.to_move = self.to_move.opponent();
        self.clear_selection();
        self.refresh_status();
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.highlighted.clear();
    }

    fn refresh_status(&mut self) {
        if self.board.is_terminal() {
            let winner = self.board.winner();
            info!(
                "game over, winner {}",
                winner.map_or("none".to_string(), |s| s.to_string())
            );
            self.status = Status::Over { winner };
        } else {
            self.status = Status::InProgress;
        }
    }
}
