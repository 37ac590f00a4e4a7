//! Chess primitives commonly used within [`crate::chess`]: squares, players,
//! pieces, castling rights and moves.

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use arrayvec::ArrayVec;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Upper bound for the number of pseudo-legal moves. Parsing rejects more
/// than 16 pieces per side and no piece has more than 27 moves (a queen in
/// the center of an empty board; a pawn has at most 12, a king 10).
pub const MAX_MOVES: usize = 16 * 27;

/// Moves generated for a single position. Stored on the stack: move
/// generation is called for every node of the game tree and allocating a
/// vector each time is wasteful.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// A move that is legal in some [`crate::chess::position::Position`]. Moves
/// are only produced by the move generator or by resolving user input (UCI,
/// SAN, `(from, to, promotion)` triple) against a position. Hence, the moving
/// piece, the captured piece and [`MoveFlags`] are always derived from the
/// position and never set independently.
///
/// The move is fully determined by `from`, `to` and `promotion` in a given
/// position. [`fmt::Display`] serializes it in the UCI format: castling is
/// represented as the king move (`e1g1`).
///
/// For a move to be serialized in Standard Algebraic Notation (SAN), it also
/// requires the position it will be applied in, see
/// [`Move::to_san`](crate::chess::core::Move::to_san).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    promotion: Option<Promotion>,
    flags: MoveFlags,
}

impl Move {
    #[must_use]
    pub(super) const fn new(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        promotion: Option<Promotion>,
        flags: MoveFlags,
    ) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            promotion,
            flags,
        }
    }

    /// Square the piece moves from. For castling, this is the king square.
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Square the piece moves to. For castling, this is the king destination.
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece being moved (a pawn for promotions).
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// The captured piece, if any. For en passant this is the pawn standing
    /// next to the destination square.
    #[must_use]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_double_pawn_push(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_kingside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::KINGSIDE_CASTLE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_queenside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::QUEENSIDE_CASTLE)
    }

    /// Returns the castling side if this move is castling.
    #[must_use]
    pub const fn castle_side(&self) -> Option<CastleSide> {
        if self.is_kingside_castle() {
            Some(CastleSide::Short)
        } else if self.is_queenside_castle() {
            Some(CastleSide::Long)
        } else {
            None
        }
    }

    /// Returns true if the move was generated from the same `(from, to,
    /// promotion)` request.
    #[must_use]
    pub fn matches(&self, from: Square, to: Square, promotion: Option<Promotion>) -> bool {
        self.from == from && self.to == to && self.promotion == promotion
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}

bitflags::bitflags! {
    /// Properties of a [`Move`] derived from the position it is played in.
    ///
    /// Apart from the "regular" or "quiet" moves (simply moving a piece from
    /// one square to the other), there are few important rules:
    ///
    /// - [En passant] is a capture of opponent's pawn "in passing" (when it
    ///   advances two squares from its original position). The captured pawn
    ///   is not on the destination square.
    /// - The [Castle] move involves a king and a rook "jumping" over each
    ///   other. Technically, castling is a king move, so `from` and `to` move
    ///   squares correspond to the king.
    ///
    /// [Castle]: https://en.wikipedia.org/wiki/Castling
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// Moves that change the material balance, including en passant.
        const CAPTURE = 0b0000_0001;
        /// Pawn advancement by 2 squares from the original rank (second for
        /// white and seventh for black).
        const DOUBLE_PAWN_PUSH = 0b0000_0010;
        /// Pawn capture onto the en passant target square.
        const EN_PASSANT = 0b0000_0100;
        /// Short castle or O-O.
        const KINGSIDE_CASTLE = 0b0000_1000;
        /// Long castle or O-O-O.
        const QUEENSIDE_CASTLE = 0b0001_0000;
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use tabiya::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use tabiya::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        // SAFETY: file and rank are both within 0..BOARD_WIDTH.
        unsafe { mem::transmute::<u8, Self>(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute::<u8, File>(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute::<u8, Rank>(self as u8 / BOARD_WIDTH) }
    }

    /// Returns the square shifted by given number of files (positive is
    /// towards the H file) and ranks (positive is towards the eighth rank) or
    /// `None` if it falls off the board.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let width = BOARD_WIDTH as i8;
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if !(0..width).contains(&file) || !(0..width).contains(&rank) {
            return None;
        }
        Self::try_from((rank * width + file) as u8).ok()
    }

    /// Light squares are the ones where the file and rank indices have
    /// different parity (e.g. H1 and A8).
    #[must_use]
    pub const fn is_light(self) -> bool {
        (self.file() as u8 + self.rank() as u8) % 2 == 1
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// The rank where the player's king and rooks start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where the player's pawns start and can be pushed by two
    /// squares from.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The rank where the player's pawns promote.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[doc(alias = "Color")]
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank delta of a pawn push.
    #[must_use]
    pub(super) const fn push_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Conventional material value in pawns. The king is not counted.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::King => 0,
            Self::Queen => 9,
            Self::Rook => 5,
            Self::Bishop | Self::Knight => 3,
            Self::Pawn => 1,
        }
    }

    /// Uppercase letter used in SAN. Pawns don't have one.
    #[must_use]
    pub(super) const fn san_symbol(self) -> Option<char> {
        match self {
            Self::King => Some('K'),
            Self::Queen => Some('Q'),
            Self::Rook => Some('R'),
            Self::Bishop => Some('B'),
            Self::Knight => Some('N'),
            Self::Pawn => None,
        }
    }

    pub(super) fn from_san_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'K' => Some(Self::King),
            'Q' => Some(Self::Queen),
            'R' => Some(Self::Rook),
            'B' => Some(Self::Bishop),
            'N' => Some(Self::Knight),
            _ => None,
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    /// White pieces are uppercase, black pieces are lowercase (as in FEN).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves or is captured on its original square, player loses ability to
    /// castle its corresponding side. Lost rights are never restored.
    ///
    /// - When castling h-side (short), the king ends up on [`File::G`] and the
    ///   rook on [`File::F`]
    /// - When castling a-side (long), the king ends up on [`File::C`] and the
    ///   rook on [`File::D`]
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// The right to castle given side for given player.
    #[must_use]
    pub const fn single(player: Player, side: CastleSide) -> Self {
        match (player, side) {
            (Player::White, CastleSide::Short) => Self::WHITE_SHORT,
            (Player::White, CastleSide::Long) => Self::WHITE_LONG,
            (Player::Black, CastleSide::Short) => Self::BLACK_SHORT,
            (Player::Black, CastleSide::Long) => Self::BLACK_LONG,
        }
    }

    /// Rights that are lost once a piece leaves or arrives at given square:
    /// original king and rook squares.
    #[must_use]
    pub(super) const fn revoked_by(square: Square) -> Self {
        match square {
            Square::E1 => Self::WHITE_BOTH,
            Square::H1 => Self::WHITE_SHORT,
            Square::A1 => Self::WHITE_LONG,
            Square::E8 => Self::BLACK_BOTH,
            Square::H8 => Self::BLACK_SHORT,
            Square::A8 => Self::BLACK_LONG,
            _ => Self::empty(),
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if given input does not match
    ///
    /// [`CastleRights`] := "-" | (K)? (Q)? (k)? (q)?
    ///
    /// The letters have to appear in this exact order and at most once.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        if input.is_empty() {
            bail!("castle rights can not be empty, use '-' instead");
        }
        let mut result = Self::empty();
        // Each letter has to come strictly after the previous one in "KQkq".
        let mut expected = "KQkq".chars().zip([
            Self::WHITE_SHORT,
            Self::WHITE_LONG,
            Self::BLACK_SHORT,
            Self::BLACK_LONG,
        ]);
        for symbol in input.chars() {
            match expected.find(|(candidate, _)| *candidate == symbol) {
                Some((_, right)) => result |= right,
                None => bail!("unknown castle rights: {input}"),
            }
        }
        Ok(result)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// Kingside (short, O-O) or queenside (long, O-O-O) castling.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Short,
    Long,
}

impl CastleSide {
    #[allow(missing_docs)]
    pub const ALL: [Self; 2] = [Self::Short, Self::Long];

    /// Original square of the castling rook.
    #[must_use]
    pub const fn rook_from(self, player: Player) -> Square {
        let file = match self {
            Self::Short => File::H,
            Self::Long => File::A,
        };
        Square::new(file, Rank::backrank(player))
    }

    /// Square the castling rook ends up on.
    #[must_use]
    pub const fn rook_to(self, player: Player) -> Square {
        let file = match self {
            Self::Short => File::F,
            Self::Long => File::D,
        };
        Square::new(file, Rank::backrank(player))
    }

    /// Square the king ends up on.
    #[must_use]
    pub const fn king_to(self, player: Player) -> Square {
        let file = match self {
            Self::Short => File::G,
            Self::Long => File::C,
        };
        Square::new(file, Rank::backrank(player))
    }

    /// Original square of the king.
    #[must_use]
    pub const fn king_from(player: Player) -> Square {
        Square::new(File::E, Rank::backrank(player))
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Every promotion choice produces a distinct move.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    /// Accepts both UCI (lowercase) and SAN (uppercase) symbols.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of \"qrbn\", got '{symbol}'"),
        }
    }
}

#[cfg(test)]
mod test {
    use std::mem::{size_of, size_of_val};

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn rank() {
        assert_eq!(
            ('1'..='9')
                .filter_map(|ch| Rank::try_from(ch).ok())
                .collect::<Vec<Rank>>(),
            Rank::iter().collect::<Vec<_>>()
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| Rank::try_from(idx).ok())
                .collect::<Vec<Rank>>(),
            vec![
                Rank::One,
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
                Rank::Seven,
                Rank::Eight,
            ]
        );
        assert_eq!(Rank::promotion(Player::White), Rank::Eight);
        assert_eq!(Rank::pawns_starting(Player::Black), Rank::Seven);
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '9'")]
    fn rank_from_incorrect_char() {
        let _ = Rank::try_from('9').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '0'")]
    fn rank_from_incorrect_char_zero() {
        let _ = Rank::try_from('0').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within 0..BOARD_WIDTH, got 8")]
    fn rank_from_incorrect_index() {
        let _ = Rank::try_from(BOARD_WIDTH).unwrap();
    }

    #[test]
    fn file() {
        assert_eq!(
            ('a'..='i')
                .filter_map(|ch| File::try_from(ch).ok())
                .collect::<Vec<File>>(),
            File::iter().collect::<Vec<_>>()
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| File::try_from(idx).ok())
                .map(|file| file.to_string())
                .collect::<String>(),
            "abcdefgh"
        );
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn file_from_incorrect_char() {
        let _ = File::try_from('i').unwrap();
    }

    #[test]
    fn square() {
        let squares: Vec<_> = [
            0u8,
            BOARD_SIZE - 1,
            BOARD_WIDTH - 1,
            BOARD_WIDTH,
            BOARD_WIDTH * 2 + 5,
            BOARD_SIZE,
        ]
        .iter()
        .filter_map(|square| Square::try_from(*square).ok())
        .collect();
        assert_eq!(
            squares,
            vec![Square::A1, Square::H8, Square::H1, Square::A2, Square::F3]
        );
        assert_eq!(Square::try_from("e4").unwrap(), Square::E4);
        assert_eq!(Square::try_from("h8").unwrap(), Square::H8);
        assert!(Square::try_from("i1").is_err());
        assert!(Square::try_from("a9").is_err());
        assert!(Square::try_from("e44").is_err());
        assert!(Square::try_from("").is_err());
        assert_eq!(Square::C6.to_string(), "c6");
        assert_eq!(Square::iter().count(), BOARD_SIZE as usize);
        for square in Square::iter() {
            assert_eq!(Square::new(square.file(), square.rank()), square);
        }
    }

    #[test]
    #[should_panic(expected = "square index should be in 0..BOARD_SIZE, got 64")]
    fn square_from_incorrect_index() {
        let _ = Square::try_from(BOARD_SIZE).unwrap();
    }

    #[test]
    fn square_colors() {
        assert!(!Square::A1.is_light());
        assert!(Square::H1.is_light());
        assert!(Square::A8.is_light());
        assert!(!Square::H8.is_light());
        assert!(Square::D1.is_light());
        assert!(!Square::E1.is_light());
    }

    #[test]
    fn primitive_size() {
        assert_eq!(size_of::<Square>(), 1);
        // Primitives will have small size thanks to the niche optimizations:
        // https://rust-lang.github.io/unsafe-code-guidelines/layout/enums.html#layout-of-a-data-carrying-enums-without-a-repr-annotation
        assert_eq!(size_of::<PieceKind>(), size_of::<Option<PieceKind>>());
        let square_to_pieces: [Option<PieceKind>; BOARD_SIZE as usize] =
            [None; BOARD_SIZE as usize];
        assert_eq!(size_of_val(&square_to_pieces), BOARD_SIZE as usize);
    }

    #[test]
    fn within_board_offset() {
        let square = Square::E4;
        assert_eq!(square.offset(-1, 0), Some(Square::D4));
        assert_eq!(square.offset(0, 1), Some(Square::E5));
        assert_eq!(square.offset(1, 1), Some(Square::F5));
        assert_eq!(square.offset(-1, 1), Some(Square::D5));
        assert_eq!(square.offset(1, 0), Some(Square::F4));
        assert_eq!(square.offset(0, -1), Some(Square::E3));
        assert_eq!(square.offset(1, -2), Some(Square::F2));
        assert_eq!(square.offset(-2, -1), Some(Square::C3));
    }

    #[test]
    fn border_squares_offset() {
        assert_eq!(Square::A1.offset(0, 1), Some(Square::A2));
        assert_eq!(Square::A1.offset(1, 1), Some(Square::B2));
        for (file_delta, rank_delta) in [(-1, 0), (0, -1), (-1, -1), (-1, 1), (1, -1)] {
            assert_eq!(Square::A1.offset(file_delta, rank_delta), None);
        }
        assert_eq!(Square::H8.offset(-1, -1), Some(Square::G7));
        for (file_delta, rank_delta) in [(1, 0), (0, 1), (1, 1), (-1, 1), (1, -1)] {
            assert_eq!(Square::H8.offset(file_delta, rank_delta), None);
        }
        // Wrapping around the board edge is not allowed.
        assert_eq!(Square::H4.offset(1, 0), None);
        assert_eq!(Square::A5.offset(-2, 1), None);
        assert_eq!(Square::B8.offset(1, 2), None);
    }

    #[test]
    fn pieces() {
        let symbols = "KQRBNPkqrbnp";
        let parsed: Vec<Piece> = symbols
            .chars()
            .map(|symbol| Piece::try_from(symbol).unwrap())
            .collect();
        assert_eq!(parsed[0], Piece::new(Player::White, PieceKind::King));
        assert_eq!(parsed[11], Piece::new(Player::Black, PieceKind::Pawn));
        assert_eq!(parsed.iter().map(ToString::to_string).join(""), symbols);
        assert!(Piece::try_from('x').is_err());
        assert!(Piece::try_from('1').is_err());
    }

    #[test]
    fn castle_rights() {
        assert_eq!(CastleRights::try_from("-").unwrap(), CastleRights::empty());
        assert_eq!(CastleRights::try_from("KQkq").unwrap(), CastleRights::ALL);
        assert_eq!(
            CastleRights::try_from("Kq").unwrap(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_LONG
        );
        assert_eq!(
            CastleRights::try_from("Qk").unwrap(),
            CastleRights::WHITE_LONG | CastleRights::BLACK_SHORT
        );
        for input in ["", "qk", "KK", "KQkqK", "k-", "X", "kQ"] {
            assert!(CastleRights::try_from(input).is_err(), "{input}");
        }
        for input in ["-", "K", "Q", "k", "q", "KQ", "Kk", "KQq", "Qkq", "KQkq"] {
            assert_eq!(CastleRights::try_from(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn castle_rights_revocation() {
        assert_eq!(
            CastleRights::revoked_by(Square::E1),
            CastleRights::WHITE_BOTH
        );
        assert_eq!(
            CastleRights::revoked_by(Square::A8),
            CastleRights::BLACK_LONG
        );
        assert_eq!(CastleRights::revoked_by(Square::E4), CastleRights::empty());
    }

    #[test]
    fn castle_sides() {
        assert_eq!(CastleSide::Short.king_to(Player::White), Square::G1);
        assert_eq!(CastleSide::Long.king_to(Player::Black), Square::C8);
        assert_eq!(CastleSide::Short.rook_from(Player::Black), Square::H8);
        assert_eq!(CastleSide::Long.rook_to(Player::White), Square::D1);
        assert_eq!(CastleSide::king_from(Player::Black), Square::E8);
    }

    #[test]
    fn move_display() {
        let pawn = Piece::new(Player::White, PieceKind::Pawn);
        assert_eq!(
            Move::new(Square::E2, Square::E4, pawn, None, None, MoveFlags::DOUBLE_PAWN_PUSH)
                .to_string(),
            "e2e4"
        );
        assert_eq!(
            Move::new(
                Square::B7,
                Square::C8,
                pawn,
                Some(Piece::new(Player::Black, PieceKind::Knight)),
                Some(Promotion::Knight),
                MoveFlags::CAPTURE
            )
            .to_string(),
            "b7c8n"
        );
    }
}
