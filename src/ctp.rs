//! Checkers Text Protocol (CTP).
//!
//! A line-oriented command protocol modelled on GTP, so a graphical front end
//! can drive a [`Game`] over stdin/stdout. Each command may carry a numeric
//! id; successful responses start with `=`, failures with `?`, and every
//! response ends with a blank line. Squares are given as `row col` integer
//! pairs (rows 0-7 top to bottom, columns 0-7 left to right).
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `protocol_version` - Return protocol version (1)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the program
//! - `clear_board` - Restart the game
//! - `showboard` - Print the board diagram
//! - `turn` - Side to move
//! - `level [easy|medium|hard]` - Query or set the agent level (unknown values
//!   select medium)
//! - `legal <row> <col>` - Legal moves of the piece on a square
//! - `play <row> <col> <row> <col>` - Play a move for the side to move
//! - `genmove` - Let the agent play its move
//! - `status` - `in_progress`, `winner first`, `winner second` or `blocked`
//! - `evaluate` - Material balance, positive for the first side

use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::debug;

use crate::board::{Board, Side, Square};
use crate::game::{Game, Status};
use crate::movegen::Move;
use crate::search::Level;

/// The list of known CTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "evaluate",
    "genmove",
    "known_command",
    "legal",
    "level",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "status",
    "turn",
    "version",
];

/// CTP engine state.
#[derive(Default)]
pub struct CtpEngine {
    game: Game,
}

impl CtpEngine {
    /// Create a new engine: human plays first, agent second, at `level`.
    pub fn new(level: Level) -> Self {
        Self {
            game: Game::new(level),
        }
    }

    /// Create an engine whose agent plays `agent_side`.
    pub fn with_agent_side(agent_side: Side, level: Level) -> Self {
        Self {
            game: Game::with_human_side(agent_side.opponent(), level),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin/stdout until `quit` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary reader and writer.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!("ctp <- {command_line}");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n").context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Parse integer coordinates into squares, two numbers per square.
    fn parse_squares(args: &[&str], count: usize) -> Result<Vec<Square>, String> {
        if args.len() < count * 2 {
            return Err("missing arguments".to_string());
        }
        let nums = args[..count * 2]
            .iter()
            .map(|a| a.parse::<usize>().map_err(|_| format!("invalid coordinate '{a}'")))
            .collect::<Result<Vec<_>, _>>()?;
        nums.chunks(2)
            .map(|rc| Square::new(rc[0], rc[1]).map_err(|e| e.to_string()))
            .collect()
    }

    fn format_moves(moves: &[Move]) -> String {
        moves
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute a CTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                self.game.restart();
                (true, String::new())
            }

            "showboard" => (true, diagram(self.game.board())),

            "turn" => (true, self.game.to_move().to_string()),

            "level" => {
                if args.is_empty() {
                    return (true, self.game.level().to_string());
                }
                let level: Level = args[0].parse().unwrap_or_default();
                self.game.set_level(level);
                (true, String::new())
            }

            "legal" => match Self::parse_squares(args, 1) {
                Ok(sq) => (true, Self::format_moves(&self.game.destinations(sq[0]))),
                Err(e) => (false, e),
            },

            "play" => {
                let squares = match Self::parse_squares(args, 2) {
                    Ok(s) => s,
                    Err(e) => return (false, e),
                };
                match self.game.submit(Move::new(squares[0], squares[1])) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                if self.game.is_over() {
                    return (false, "game is over".to_string());
                }
                if self.game.to_move() != self.game.agent_side() {
                    return (false, "not the agent's turn".to_string());
                }
                match self.game.agent_turn() {
                    Some(mv) => (true, mv.to_string()),
                    None => (true, "none".to_string()),
                }
            }

            "status" => {
                let status = match self.game.status() {
                    Status::InProgress => "in_progress".to_string(),
                    Status::Over { winner: Some(side) } => format!("winner {side}"),
                    Status::Over { winner: None } => "blocked".to_string(),
                };
                (true, status)
            }

            "evaluate" => (true, format!("{:.1}", self.game.board().evaluate())),

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

/// Render a board the way `showboard` does.
pub fn diagram(board: &Board) -> String {
    format!("\n{board}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = CtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = CtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut engine = CtpEngine::default();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "checkers-rust");
    }

    #[test]
    fn test_known_command() {
        let mut engine = CtpEngine::default();
        assert_eq!(engine.execute("known_command", &["legal"]), (true, "true".to_string()));
        assert_eq!(engine.execute("known_command", &["undo"]), (true, "false".to_string()));
    }

    #[test]
    fn test_legal_command() {
        let mut engine = CtpEngine::default();
        let (success, response) = engine.execute("legal", &["5", "2"]);
        assert!(success);
        assert_eq!(response, "5,2-4,1 5,2-4,3");

        let (success, _) = engine.execute("legal", &["8", "2"]);
        assert!(!success);
        let (success, _) = engine.execute("legal", &["5"]);
        assert!(!success);
    }

    #[test]
    fn test_play_and_genmove() {
        let mut engine = CtpEngine::new(Level::Easy);
        let (success, _) = engine.execute("genmove", &[]);
        assert!(!success);

        let (success, _) = engine.execute("play", &["5", "0", "4", "1"]);
        assert!(success);
        assert_eq!(engine.execute("turn", &[]), (true, "second".to_string()));

        let (success, response) = engine.execute("genmove", &[]);
        assert!(success);
        assert_ne!(response, "none");
        assert_eq!(engine.game().to_move(), Side::First);
    }

    #[test]
    fn test_play_illegal() {
        let mut engine = CtpEngine::default();
        let (success, response) = engine.execute("play", &["5", "0", "3", "2"]);
        assert!(!success);
        assert!(response.starts_with("illegal move"));
    }

    #[test]
    fn test_level_command() {
        let mut engine = CtpEngine::default();
        assert_eq!(engine.execute("level", &[]), (true, "medium".to_string()));
        assert!(engine.execute("level", &["hard"]).0);
        assert_eq!(engine.game().level(), Level::Hard);

        // Unknown levels fall back to medium
        let mut engine = CtpEngine::new(Level::Hard);
        assert!(engine.execute("level", &["4"]).0);
        assert_eq!(engine.game().level(), Level::Medium);
    }

    #[test]
    fn test_serve_framing() {
        let mut engine = CtpEngine::default();
        let input = b"1 status\n# comment\n\nbogus\n2 quit\nname\n";
        let mut output = Vec::new();
        engine.serve(&input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "=1 in_progress\n\n? unknown command: bogus\n\n=2 \n\n"
        );
    }

    #[test]
    fn test_showboard_and_clear() {
        let mut engine = CtpEngine::default();
        engine.execute("play", &["5", "0", "4", "1"]);
        engine.execute("clear_board", &[]);
        let (success, board) = engine.execute("showboard", &[]);
        assert!(success);
        assert_eq!(board, diagram(&Board::new()));
    }
}
