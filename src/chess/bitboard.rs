//! [`Bitboard`]-based representation for [`crate::chess::position::Position`].
//! Bitboard utilizes the fact that modern processors operate on 64 bit
//! integers, and the bit operations can be performed simultaneously. Sets of
//! squares (occupancy, attacks, masks) are single integers and checking
//! whether a square is attacked or occupied is a single AND.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt::Write;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub, SubAssign};
use std::{fmt, mem};

use strum::IntoEnumIterator;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// XOR) over these sets. Each bit corresponds to one of 64 squares of the chess
/// board.
///
/// Mirroring [`Square`] semantics, the least significant
/// bit corresponds to A1, and the most significant bit - to H8.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[cfg(test)]
    #[must_use]
    pub(super) fn from_squares(squares: &[Square]) -> Self {
        squares
            .iter()
            .fold(Self::empty(), |result, square| result | Self::from(*square))
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Number of squares in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// Returns a pre-calculated bitboard mask with 1s set for squares of the
    /// given rank.
    #[must_use]
    pub const fn rank_mask(rank: Rank) -> Self {
        match rank {
            Rank::One => Self::from_bits(0x0000_0000_0000_00FF),
            Rank::Two => Self::from_bits(0x0000_0000_0000_FF00),
            Rank::Three => Self::from_bits(0x0000_0000_00FF_0000),
            Rank::Four => Self::from_bits(0x0000_0000_FF00_0000),
            Rank::Five => Self::from_bits(0x0000_00FF_0000_0000),
            Rank::Six => Self::from_bits(0x0000_FF00_0000_0000),
            Rank::Seven => Self::from_bits(0x00FF_0000_0000_0000),
            Rank::Eight => Self::from_bits(0xFF00_0000_0000_0000),
        }
    }

    /// Squares of the same color as the light squares (H1, A8).
    #[must_use]
    pub const fn light_squares() -> Self {
        Self::from_bits(0x55AA_55AA_55AA_55AA)
    }
}

impl fmt::Debug for Bitboard {
    /// Dumps the set as an 8x8 grid with the eighth rank on top: '1' for set
    /// squares and '.' for the rest.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                f.write_char(if self.contains(Square::new(file, rank)) {
                    '1'
                } else {
                    '.'
                })?;
                if file != File::H {
                    f.write_str(SQUARE_SEPARATOR)?;
                }
            }
            if rank != Rank::One {
                f.write_str(LINE_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitor(rhs.bits))
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits.bitor_assign(rhs.bits);
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitand(rhs.bits))
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits.bitand_assign(rhs.bits);
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// [Relative component], i.e. Result = LHS \ RHS.
    ///
    /// [Relative component]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl SubAssign for Bitboard {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self,
    /// i.e. flipping the set squares to unset and vice versa.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u64 << square as u8)
    }
}

impl IntoIterator for Bitboard {
    type IntoIter = BitboardIterator;
    type Item = Square;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        // SAFETY: trailing_zeros() of a non-zero u64 is within 0..64.
        Some(unsafe { mem::transmute::<u8, Square>(next_index as u8) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIterator {}

/// Piece-centric representation of all material owned by one player. Uses
/// [Bitboard] to store a set of squares occupied by each piece kind. The main
/// user is [`crate::chess::position::Position`], [Bitboard] is not very useful
/// on its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pieces {
    pub(super) king: Bitboard,
    pub(super) queens: Bitboard,
    pub(super) rooks: Bitboard,
    pub(super) bishops: Bitboard,
    pub(super) knights: Bitboard,
    pub(super) pawns: Bitboard,
}

impl Pieces {
    pub(super) const fn empty() -> Self {
        Self {
            king: Bitboard::empty(),
            queens: Bitboard::empty(),
            rooks: Bitboard::empty(),
            bishops: Bitboard::empty(),
            knights: Bitboard::empty(),
            pawns: Bitboard::empty(),
        }
    }

    /// Material of the given player in the starting position.
    pub(super) fn starting(player: Player) -> Self {
        let backrank = Rank::backrank(player);
        let on_backrank = |files: &[File]| {
            files
                .iter()
                .fold(Bitboard::empty(), |result, file| {
                    result | Square::new(*file, backrank).into()
                })
        };
        Self {
            king: on_backrank(&[File::E]),
            queens: on_backrank(&[File::D]),
            rooks: on_backrank(&[File::A, File::H]),
            bishops: on_backrank(&[File::C, File::F]),
            knights: on_backrank(&[File::B, File::G]),
            pawns: Bitboard::rank_mask(Rank::pawns_starting(player)),
        }
    }

    /// All squares occupied by the player.
    #[must_use]
    pub fn all(&self) -> Bitboard {
        self.king | self.queens | self.rooks | self.bishops | self.knights | self.pawns
    }

    /// Squares occupied by the player's pieces of given kind.
    #[must_use]
    pub const fn of(&self, kind: PieceKind) -> Bitboard {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queens,
            PieceKind::Rook => self.rooks,
            PieceKind::Bishop => self.bishops,
            PieceKind::Knight => self.knights,
            PieceKind::Pawn => self.pawns,
        }
    }

    pub(super) fn of_mut(&mut self, kind: PieceKind) -> &mut Bitboard {
        match kind {
            PieceKind::King => &mut self.king,
            PieceKind::Queen => &mut self.queens,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Pawn => &mut self.pawns,
        }
    }

    /// Kind of the player's piece standing on given square.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<PieceKind> {
        PieceKind::iter().find(|kind| self.of(*kind).contains(square))
    }
}

/// Piece-centric implementation of the chess board: one [`Pieces`] set for
/// each player. Squares are never occupied by more than one piece.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(super) white: Pieces,
    pub(super) black: Pieces,
}

impl Board {
    #[must_use]
    pub(super) fn starting() -> Self {
        Self {
            white: Pieces::starting(Player::White),
            black: Pieces::starting(Player::Black),
        }
    }

    // Constructs an empty Board to be filled by the FEN parser.
    #[must_use]
    pub(super) const fn empty() -> Self {
        Self {
            white: Pieces::empty(),
            black: Pieces::empty(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn player_pieces(&self, player: Player) -> &Pieces {
        match player {
            Player::White => &self.white,
            Player::Black => &self.black,
        }
    }

    pub(super) fn player_pieces_mut(&mut self, player: Player) -> &mut Pieces {
        match player {
            Player::White => &mut self.white,
            Player::Black => &mut self.black,
        }
    }

    /// Squares occupied by any piece.
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.white.all() | self.black.all()
    }

    /// Returns the piece standing on given square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        for player in [Player::White, Player::Black] {
            if let Some(kind) = self.player_pieces(player).at(square) {
                return Some(Piece::new(player, kind));
            }
        }
        None
    }

    /// Location of the player's king. Only empty or hand-built boards don't
    /// have one.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.player_pieces(player).king.iter().next()
    }

    pub(super) fn put(&mut self, square: Square, piece: Piece) {
        *self.player_pieces_mut(piece.owner).of_mut(piece.kind) |= square.into();
    }

    /// Clears given square, if it is occupied.
    pub(super) fn remove(&mut self, square: Square) {
        if let Some(piece) = self.at(square) {
            *self.player_pieces_mut(piece.owner).of_mut(piece.kind) -= square.into();
        }
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::iter() {
                let square = Square::new(file, rank);
                if let Some(piece) = self.at(square) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_str(SQUARE_SEPARATOR)?;
                }
            }
            if rank != Rank::One {
                f.write_str(LINE_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
