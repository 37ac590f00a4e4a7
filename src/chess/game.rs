//! A chess game: the line of positions from the root to the current one, the
//! moves that connect them and the draw rules that depend on the history.
//!
//! Positions are immutable values, the [`Game`] owns all of them and is the
//! only place where the history changes. Navigating with [`Game::undo`] and
//! [`Game::redo`] moves a cursor along the line without discarding it; playing
//! a new move from an earlier position replaces everything after the cursor.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, info};

use crate::chess::core::{Move, MoveList, Player};
use crate::chess::position::Position;
use crate::chess::repetition::RepetitionTable;
use crate::chess::san;
use crate::error::{Error, Result};

/// Half-move clock value at which the fifty-move rule makes a draw claimable.
const FIFTY_MOVE_RULE_PLIES: u16 = 100;
/// Occurrences of the same position that make a draw claimable.
const REPETITIONS_FOR_DRAW: usize = 3;

/// State of the game after the last move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// The side to move has legal moves and is not in check.
    InProgress,
    /// The side to move is in check and has legal moves.
    Check,
    /// The side to move is in check and has no legal moves.
    Checkmate,
    /// The side to move is not in check and has no legal moves.
    Stalemate,
    /// The current position occurred at least three times.
    DrawByRepetition,
    /// No capture or pawn move happened in the last fifty moves.
    DrawByFiftyMove,
    /// Neither side has enough material to deliver checkmate.
    DrawByInsufficientMaterial,
}

impl GameState {
    /// Returns true for the states that end the game without a claim.
    #[must_use]
    pub const fn is_decisive(self) -> bool {
        matches!(
            self,
            Self::Checkmate | Self::Stalemate | Self::DrawByInsufficientMaterial
        )
    }

    /// Returns true for draws, whether forced or claimable.
    #[must_use]
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            Self::Stalemate
                | Self::DrawByRepetition
                | Self::DrawByFiftyMove
                | Self::DrawByInsufficientMaterial
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProgress => "in progress",
            Self::Check => "check",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
            Self::DrawByRepetition => "draw by threefold repetition",
            Self::DrawByFiftyMove => "draw by fifty-move rule",
            Self::DrawByInsufficientMaterial => "draw by insufficient material",
        })
    }
}

/// Game history with navigation and draw tracking.
///
/// ```
/// use tabiya::chess::game::{Game, GameState};
///
/// let mut game = Game::new();
/// for notation in ["f3", "e5", "g4"] {
///     game.make_move(notation).unwrap();
/// }
/// assert_eq!(game.make_move("Qh4#").unwrap(), GameState::Checkmate);
/// assert!(game.legal_moves().is_empty());
/// assert!(game.make_move("e4").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    /// The whole line, including positions after the cursor that can be
    /// reached with [`Game::redo`].
    positions: Vec<Position>,
    /// `moves[i]` leads from `positions[i]` to `positions[i + 1]`.
    moves: Vec<Move>,
    cursor: usize,
    /// Positions from the root up to the cursor.
    repetitions: RepetitionTable,
    claimed_draw: Option<GameState>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    /// Creates a game rooted at the position described by FEN.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedFen`] if the FEN is not valid.
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Creates a game rooted at given position.
    #[must_use]
    pub fn from_position(root: Position) -> Self {
        let mut repetitions = RepetitionTable::new();
        let _ = repetitions.record(&root);
        Self {
            positions: vec![root],
            moves: Vec::new(),
            cursor: 0,
            repetitions,
            claimed_draw: None,
        }
    }

    /// Creates a game from an optional starting FEN and plays a sequence of
    /// moves in SAN or UCI notation. Fails on the first move that can not be
    /// played.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedFen`] for an invalid root, otherwise the error of
    /// [`Game::make_move`] for the offending move.
    pub fn replay<I, S>(fen: Option<&str>, moves: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut game = new_game(fen)?;
        for notation in moves {
            let _ = game.make_move(notation.as_ref())?;
        }
        Ok(game)
    }

    /// The position at the cursor.
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.positions[self.cursor]
    }

    /// FEN of the current position.
    #[must_use]
    pub fn to_fen(&self) -> String {
        self.position().to_fen()
    }

    /// Positions from the root to the current one, in order.
    pub fn position_history(&self) -> impl DoubleEndedIterator<Item = &Position> + Clone + '_ {
        self.positions[..=self.cursor].iter()
    }

    /// Moves leading from the root to the current position.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves[..self.cursor]
    }

    /// Legal moves in the current position. Empty when the game is over.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        if self.is_over() {
            return MoveList::new();
        }
        self.position().legal_moves()
    }

    /// Number of times the current position occurred on the line from the
    /// root, the current occurrence included.
    #[must_use]
    pub fn repetition_count(&self) -> usize {
        self.repetitions.count(self.position())
    }

    /// Evaluates the state of the current position.
    #[must_use]
    pub fn state(&self) -> GameState {
        let position = self.position();
        let no_moves = position.legal_moves().is_empty();
        let in_check = position.in_check();
        if no_moves {
            return if in_check {
                GameState::Checkmate
            } else {
                GameState::Stalemate
            };
        }
        if position.has_insufficient_material() {
            return GameState::DrawByInsufficientMaterial;
        }
        if let Some(claimed) = self.claimed_draw {
            return claimed;
        }
        if let Some(claimable) = self.claimable_draw() {
            return claimable;
        }
        if in_check {
            GameState::Check
        } else {
            GameState::InProgress
        }
    }

    /// Returns true when no more moves can be played: after checkmate,
    /// stalemate, with insufficient material, or after a draw was claimed.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.claimed_draw.is_some() || self.state().is_decisive()
    }

    /// The draw either side may claim in the current position, if any.
    /// Repetition takes precedence over the fifty-move rule.
    #[must_use]
    pub fn claimable_draw(&self) -> Option<GameState> {
        if self.claimed_draw.is_some() {
            return None;
        }
        if self.repetition_count() >= REPETITIONS_FOR_DRAW {
            Some(GameState::DrawByRepetition)
        } else if self.position().halfmove_clock() >= FIFTY_MOVE_RULE_PLIES {
            Some(GameState::DrawByFiftyMove)
        } else {
            None
        }
    }

    /// Claims a draw by threefold repetition or by the fifty-move rule and
    /// ends the game.
    ///
    /// # Errors
    ///
    /// [`Error::NoDrawToClaim`] if neither rule applies to the current
    /// position or the game is already over.
    pub fn claim_draw(&mut self) -> Result<GameState> {
        match self.claimable_draw() {
            Some(draw) if !self.state().is_decisive() => {
                self.claimed_draw = Some(draw);
                info!(state = %draw, fen = %self.position(), "draw claimed");
                Ok(draw)
            },
            _ => Err(Error::NoDrawToClaim(self.state())),
        }
    }

    /// Plays a move given in UCI coordinates (`e2e4`, `e7e8q`) or Standard
    /// Algebraic Notation (`Nf3`, `exd8=Q+`, `O-O`) and returns the new state.
    ///
    /// # Errors
    ///
    /// - [`Error::GameOver`] if the game has ended.
    /// - [`Error::IllegalMove`] for coordinates of a move that is not legal.
    /// - [`Error::AmbiguousOrIllegalSan`] for SAN that does not match exactly
    ///   one legal move.
    pub fn make_move(&mut self, notation: &str) -> Result<GameState> {
        self.ensure_in_progress()?;
        let notation = notation.trim();
        let position = self.position();
        let resolved = if san::is_coordinate_notation(notation) {
            Move::from_uci(position, notation)?
        } else {
            Move::from_san(position, notation)?
        };
        self.push(resolved)
    }

    /// Plays a typed move and returns the new state.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] if the game has ended, [`Error::IllegalMove`] if
    /// the move is not legal in the current position.
    pub fn play(&mut self, next_move: &Move) -> Result<GameState> {
        self.ensure_in_progress()?;
        let resolved = self
            .position()
            .legal_move(next_move.from(), next_move.to(), next_move.promotion())
            .ok_or_else(|| Error::IllegalMove {
                notation: next_move.to_string(),
                fen: self.to_fen(),
            })?;
        self.push(resolved)
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.is_over() {
            return Err(Error::GameOver(self.state()));
        }
        Ok(())
    }

    fn push(&mut self, resolved: Move) -> Result<GameState> {
        let next = self.position().apply_move(&resolved)?;
        // Moving away from a past position abandons the line that was undone.
        self.positions.truncate(self.cursor + 1);
        self.moves.truncate(self.cursor);
        let _ = self.repetitions.record(&next);
        self.positions.push(next);
        self.moves.push(resolved);
        self.cursor += 1;

        let state = self.state();
        debug!(
            notation = %resolved,
            fen = %self.position(),
            repetitions = self.repetition_count(),
            "move played"
        );
        if state.is_decisive() {
            info!(state = %state, fen = %self.position(), "game over");
        }
        Ok(state)
    }

    /// Steps back one move. A claimed draw is withdrawn.
    ///
    /// # Errors
    ///
    /// [`Error::NoHistory`] at the root of the game.
    pub fn undo(&mut self) -> Result<&Position> {
        if self.cursor == 0 {
            return Err(Error::NoHistory);
        }
        self.repetitions.forget(&self.positions[self.cursor]);
        self.cursor -= 1;
        self.claimed_draw = None;
        debug!(fen = %self.position(), ply = self.cursor, "undo");
        Ok(self.position())
    }

    /// Steps forward along the line that was undone. A claimed draw is
    /// withdrawn: it belongs to the position it was claimed in.
    ///
    /// # Errors
    ///
    /// [`Error::NoHistory`] if the cursor is at the last played move.
    pub fn redo(&mut self) -> Result<&Position> {
        if self.cursor + 1 >= self.positions.len() {
            return Err(Error::NoHistory);
        }
        self.cursor += 1;
        self.claimed_draw = None;
        let _ = self.repetitions.record(&self.positions[self.cursor]);
        debug!(fen = %self.position(), ply = self.cursor, "redo");
        Ok(self.position())
    }

    /// PGN movetext of the moves from the root to the current position, e.g.
    /// `1. e4 e5 2. Nf3`. Starts with `N...` when Black moves first.
    #[must_use]
    pub fn movetext(&self) -> String {
        self.position_history()
            .zip(self.moves())
            .enumerate()
            .map(|(ply, (position, played))| {
                let notation = played.to_san(position);
                match position.side_to_move() {
                    Player::White => format!("{}. {notation}", position.fullmove_number()),
                    Player::Black if ply == 0 => {
                        format!("{}... {notation}", position.fullmove_number())
                    },
                    Player::Black => notation,
                }
            })
            .join(" ")
    }
}

/// Starts a new game from the standard starting position or from FEN.
///
/// # Errors
///
/// [`Error::MalformedFen`] if the FEN is not valid.
pub fn new_game(fen: Option<&str>) -> Result<Game> {
    match fen {
        Some(fen) => Game::from_fen(fen),
        None => Ok(Game::new()),
    }
}
