//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! Positions are immutable values: making a move produces a new [`Position`]
//! and leaves the original untouched. The move generator lives in
//! [`crate::chess::movegen`].
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;

use anyhow::{bail, ensure, Context};
use strum::IntoEnumIterator;

use crate::chess::bitboard::{Bitboard, Board};
use crate::chess::core::{
    CastleRights,
    CastleSide,
    File,
    Move,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
    BOARD_WIDTH,
};
use crate::error::{Error, Result};

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::from_fen`] is the strict parser accepting exactly six FEN
/// fields. [`Position::try_from()`] provides a more convenient interface: it
/// will clean up the input (trim newlines and whitespace, strip optional
/// `fen`/`epd` prefix) and also accept [Extended Position Description] (EPD)
/// without [Operations]: the four leading FEN fields, with the clocks
/// defaulting to "0 1". Such trimmed lines are common in position databases.
///
/// Every constructed position is valid: both sides have exactly one king, the
/// side that just moved is not in check, castling rights and en passant
/// target are consistent with the board.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
/// [Operations]: https://www.chessprogramming.org/Extended_Position_Description#Operations
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u16,
    fullmove_number: NonZeroU16,
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use tabiya::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::ALL,
            ..Self::empty()
        }
    }

    // Creates an empty board to be filled by parser.
    const fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_number: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    /// Parses and validates a position in Forsyth-Edwards Notation.
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedFen`] if the input does not follow the grammar or
    /// describes an impossible position.
    pub fn from_fen(input: &str) -> Result<Self> {
        Self::parse_and_validate(input, false)
    }

    fn parse_and_validate(input: &str, allow_epd: bool) -> Result<Self> {
        let parse = || -> anyhow::Result<Self> {
            let position = Self::parse_fen(input, allow_epd)?;
            position.validate()?;
            Ok(position)
        };
        parse().map_err(Error::MalformedFen)
    }

    fn parse_fen(input: &str, allow_epd: bool) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split(' ').collect();
        let (placement, side_to_move, castling, en_passant, clocks) = match parts.as_slice() {
            [placement, side, castling, en_passant, halfmove, fullmove] => (
                *placement,
                *side,
                *castling,
                *en_passant,
                Some((*halfmove, *fullmove)),
            ),
            [placement, side, castling, en_passant] if allow_epd => {
                (*placement, *side, *castling, *en_passant, None)
            },
            _ => bail!(
                "FEN should have 6 space-separated fields, got {}: {input:?}",
                parts.len()
            ),
        };
        let mut result = Self::empty();
        result.board = parse_placement(placement)?;
        result.side_to_move = side_to_move.try_into()?;
        result.castling = castling.try_into()?;
        result.en_passant_square = match en_passant {
            "-" => None,
            square => Some(
                Square::try_from(square)
                    .with_context(|| format!("incorrect en passant square: {square}"))?,
            ),
        };
        if let Some((halfmove, fullmove)) = clocks {
            result.halfmove_clock = parse_counter(halfmove, "halfmove clock")?;
            result.fullmove_number = parse_counter(fullmove, "fullmove number")?;
        }
        Ok(result)
    }

    /// Rejects positions that can not occur in a legal game and would break
    /// move generation assumptions.
    fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let pieces = self.board.player_pieces(player);
            ensure!(
                pieces.king.count() == 1,
                "{player:?} should have exactly one king, got {}",
                pieces.king.count()
            );
            ensure!(
                pieces.pawns.count() <= 8,
                "{player:?} can not have more than 8 pawns, got {}",
                pieces.pawns.count()
            );
            ensure!(
                pieces.all().count() <= 16,
                "{player:?} can not have more than 16 pieces, got {}",
                pieces.all().count()
            );
            // Every piece above the starting set is a promoted pawn.
            let promoted = pieces.queens.count().saturating_sub(1)
                + pieces.rooks.count().saturating_sub(2)
                + pieces.bishops.count().saturating_sub(2)
                + pieces.knights.count().saturating_sub(2);
            ensure!(
                promoted + pieces.pawns.count() <= 8,
                "{player:?} has {promoted} promoted pieces but only {} missing pawns",
                8 - pieces.pawns.count()
            );
            for side in CastleSide::ALL {
                if self.castling.contains(CastleRights::single(player, side)) {
                    ensure!(
                        pieces.king.contains(CastleSide::king_from(player))
                            && pieces.rooks.contains(side.rook_from(player)),
                        "castling rights {} require {player:?} king and rook on original squares",
                        self.castling
                    );
                }
            }
        }
        let pawns = self.board.white.pawns | self.board.black.pawns;
        ensure!(
            (pawns & (Bitboard::rank_mask(Rank::One) | Bitboard::rank_mask(Rank::Eight)))
                .is_empty(),
            "pawns can not be placed on the first or the last rank"
        );
        if let Some(en_passant_square) = self.en_passant_square {
            self.validate_en_passant(en_passant_square)?;
        }
        if let Some(king) = self.board.king(self.they()) {
            ensure!(
                !self.is_attacked(king, self.us()),
                "{:?} king can not be in check when {:?} is to move",
                self.they(),
                self.us()
            );
        }
        Ok(())
    }

    fn validate_en_passant(&self, en_passant_square: Square) -> anyhow::Result<()> {
        let expected_rank = match self.us() {
            Player::White => Rank::Six,
            Player::Black => Rank::Three,
        };
        ensure!(
            en_passant_square.rank() == expected_rank,
            "en passant square {en_passant_square} is on a wrong rank for {:?} to move",
            self.us()
        );
        let push_direction = self.they().push_direction();
        let (Some(origin), Some(pushed_pawn)) = (
            en_passant_square.offset(0, -push_direction),
            en_passant_square.offset(0, push_direction),
        ) else {
            bail!("en passant square {en_passant_square} is on the edge of the board");
        };
        ensure!(
            self.board.at(en_passant_square).is_none() && self.board.at(origin).is_none(),
            "en passant square {en_passant_square} and the square behind it should be empty"
        );
        ensure!(
            self.board.player_pieces(self.they()).pawns.contains(pushed_pawn),
            "en passant square {en_passant_square} requires {:?} pawn on {pushed_pawn}",
            self.they()
        );
        Ok(())
    }

    /// Serializes the position in Forsyth-Edwards Notation. Same as
    /// [`fmt::Display`].
    #[must_use]
    pub fn to_fen(&self) -> String {
        self.to_string()
    }

    /// Returns the piece standing on given square, if any.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castle_rights(&self) -> CastleRights {
        self.castling
    }

    /// The square a pawn skipped over with a double push in the previous
    /// move.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_number(&self) -> u16 {
        self.fullmove_number.get()
    }

    pub(super) const fn us(&self) -> Player {
        self.side_to_move
    }

    pub(super) const fn they(&self) -> Player {
        self.us().opponent()
    }

    /// Sum of the player's material values (pawn 1, knight and bishop 3, rook
    /// 5, queen 9). Kings are not counted.
    #[must_use]
    pub fn material(&self, player: Player) -> u32 {
        let pieces = self.board.player_pieces(player);
        PieceKind::iter()
            .map(|kind| pieces.of(kind).count() * kind.value())
            .sum()
    }

    /// Material difference, positive when White is ahead.
    #[must_use]
    pub fn material_balance(&self) -> i64 {
        i64::from(self.material(Player::White)) - i64::from(self.material(Player::Black))
    }

    /// Resolves `(from, to, promotion)` triple to a legal move, if there is
    /// one. Flags and the captured piece are derived from the position.
    #[must_use]
    pub fn legal_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    ) -> Option<Move> {
        self.legal_moves()
            .into_iter()
            .find(|candidate| candidate.matches(from, to, promotion))
    }

    /// Returns the position after the move is played. The move is matched
    /// against the legal moves by `(from, to, promotion)`, the generated
    /// (canonical) move is the one applied.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the move is not legal in this position.
    pub fn apply_move(&self, next_move: &Move) -> Result<Self> {
        match self.legal_move(next_move.from(), next_move.to(), next_move.promotion()) {
            Some(legal) => Ok(self.make_move_unchecked(&legal)),
            None => Err(Error::IllegalMove {
                notation: next_move.to_string(),
                fen: self.to_fen(),
            }),
        }
    }

    /// Plays a pseudo-legal move produced by the move generator for this
    /// position. The resulting position might leave the mover's king in
    /// check: the legality filter relies on it.
    pub(super) fn make_move_unchecked(&self, next_move: &Move) -> Self {
        let us = self.us();
        let mut next = self.clone();
        next.board.remove(next_move.from());
        if next_move.is_en_passant() {
            if let Some(captured_pawn) = next_move.to().offset(0, -us.push_direction()) {
                next.board.remove(captured_pawn);
            }
        } else if next_move.is_capture() {
            next.board.remove(next_move.to());
        }
        let placed = match next_move.promotion() {
            Some(promotion) => Piece::new(us, promotion.into()),
            None => next_move.piece(),
        };
        next.board.put(next_move.to(), placed);
        if let Some(side) = next_move.castle_side() {
            next.board.remove(side.rook_from(us));
            next.board
                .put(side.rook_to(us), Piece::new(us, PieceKind::Rook));
        }
        next.castling.remove(
            CastleRights::revoked_by(next_move.from()) | CastleRights::revoked_by(next_move.to()),
        );
        next.en_passant_square = if next_move.is_double_pawn_push() {
            next_move.from().offset(0, us.push_direction())
        } else {
            None
        };
        next.halfmove_clock = if next_move.piece().kind == PieceKind::Pawn || next_move.is_capture()
        {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if us == Player::Black {
            next.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        next.side_to_move = self.they();
        next
    }
}

fn parse_placement(placement: &str) -> anyhow::Result<Board> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != BOARD_WIDTH as usize {
        bail!(
            "piece placement should have {BOARD_WIDTH} ranks, got {}: {placement}",
            ranks.len()
        );
    }
    let mut board = Board::empty();
    for (rank, rank_fen) in Rank::iter().rev().zip(ranks) {
        let mut file: u8 = 0;
        for symbol in rank_fen.chars() {
            if file >= BOARD_WIDTH {
                bail!("rank {rank} should have exactly {BOARD_WIDTH} squares, got {rank_fen}");
            }
            match symbol {
                '1'..='8' => file += symbol as u8 - b'0',
                _ => {
                    board.put(Square::new(File::try_from(file)?, rank), symbol.try_into()?);
                    file += 1;
                },
            }
        }
        if file != BOARD_WIDTH {
            bail!("rank {rank} should have exactly {BOARD_WIDTH} squares, got {rank_fen}");
        }
    }
    Ok(board)
}

fn parse_counter<T>(value: &str, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("{name} should only contain digits, got {value:?}");
    }
    value
        .parse::<T>()
        .with_context(|| format!("{name} can not be parsed: {value}"))
}

impl TryFrom<&str> for Position {
    type Error = Error;

    /// Trims the input, strips optional "fen " or "epd " prefix and parses
    /// either full FEN or EPD with four fields.
    fn try_from(input: &str) -> Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::parse_and_validate(stripped, true);
            }
        }
        Self::parse_and_validate(input, true)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Self::try_from(input)
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_number)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {}", &self.fullmove_number)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        write!(f, "FEN: {self}")
    }
}
