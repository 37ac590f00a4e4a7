//! [Standard Algebraic Notation] (SAN) and UCI coordinate notation for moves.
//!
//! SAN depends on the position: disambiguation only appears when another piece
//! of the same kind can legally reach the destination and the check/checkmate
//! suffix is derived from the resulting position.
//!
//! [Standard Algebraic Notation]: https://en.wikipedia.org/wiki/Algebraic_notation_(chess)

use crate::chess::core::{CastleSide, File, Move, PieceKind, Promotion, Rank, Square};
use crate::chess::position::Position;
use crate::error::{Error, Result};

impl Move {
    /// Serializes a move in [Standard Algebraic Notation]. The move has to be
    /// legal in given position.
    ///
    /// ```
    /// use tabiya::chess::core::Move;
    /// use tabiya::chess::position::Position;
    ///
    /// let position = Position::starting();
    /// let knight_move = Move::from_uci(&position, "g1f3").unwrap();
    /// assert_eq!(knight_move.to_san(&position), "Nf3");
    /// ```
    ///
    /// [Standard Algebraic Notation]: https://en.wikipedia.org/wiki/Algebraic_notation_(chess)
    #[must_use]
    pub fn to_san(&self, position: &Position) -> String {
        let mut san = String::new();
        match self.castle_side() {
            Some(CastleSide::Short) => san.push_str("O-O"),
            Some(CastleSide::Long) => san.push_str("O-O-O"),
            None => {
                match self.piece().kind.san_symbol() {
                    Some(symbol) => {
                        san.push(symbol);
                        san.push_str(&self.disambiguation(position));
                        if self.is_capture() {
                            san.push('x');
                        }
                    },
                    // Pawn captures always carry the file the pawn left.
                    None if self.is_capture() => {
                        san.push_str(&self.from().file().to_string());
                        san.push('x');
                    },
                    None => (),
                }
                san.push_str(&self.to().to_string());
                if let Some(symbol) = self
                    .promotion()
                    .and_then(|promotion| PieceKind::from(promotion).san_symbol())
                {
                    san.push('=');
                    san.push(symbol);
                }
            },
        }
        let next = position.make_move_unchecked(self);
        if next.in_check() {
            san.push(if next.legal_moves().is_empty() { '#' } else { '+' });
        }
        san
    }

    /// Minimal source square hint: file if it is unique among the pieces of
    /// the same kind that can reach the destination, rank otherwise, full
    /// square as a last resort.
    fn disambiguation(&self, position: &Position) -> String {
        let rivals: Vec<Square> = position
            .legal_moves()
            .iter()
            .filter(|other| {
                other.piece() == self.piece() && other.to() == self.to() && other.from() != self.from()
            })
            .map(|other| other.from())
            .collect();
        if rivals.is_empty() {
            String::new()
        } else if rivals.iter().all(|square| square.file() != self.from().file()) {
            self.from().file().to_string()
        } else if rivals.iter().all(|square| square.rank() != self.from().rank()) {
            self.from().rank().to_string()
        } else {
            self.from().to_string()
        }
    }

    /// Resolves a move in Standard Algebraic Notation against the legal
    /// moves of the position.
    ///
    /// Accepts `O-O`/`0-0` (and the long variants), promotion with or
    /// without `=`, trailing `+`, `#`, `!` and `?` annotations and redundant
    /// disambiguation. When `x` is present, the move has to be a capture.
    ///
    /// # Errors
    ///
    /// [`Error::AmbiguousOrIllegalSan`] if the input does not match exactly one
    /// legal move.
    pub fn from_san(position: &Position, san: &str) -> Result<Self> {
        let no_match = |candidates: usize| Error::AmbiguousOrIllegalSan {
            san: san.to_string(),
            candidates,
        };
        let body = san.trim().trim_end_matches(['+', '#', '!', '?']);
        let pattern = match body {
            "O-O" | "0-0" => SanPattern::castle(CastleSide::Short),
            "O-O-O" | "0-0-0" => SanPattern::castle(CastleSide::Long),
            _ => SanPattern::parse(body).ok_or_else(|| no_match(0))?,
        };
        let mut candidates = position
            .legal_moves()
            .into_iter()
            .filter(|candidate| pattern.matches(candidate));
        match (candidates.next(), candidates.next()) {
            (Some(resolved), None) => Ok(resolved),
            (None, _) => Err(no_match(0)),
            (Some(_), Some(_)) => Err(no_match(2 + candidates.count())),
        }
    }

    /// Resolves a move in UCI coordinate notation (`e2e4`, `e7e8q`, castling
    /// as the king move `e1g1`) against the legal moves of the position.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the input is not a well-formed coordinate
    /// move or the move is not legal.
    pub fn from_uci(position: &Position, uci: &str) -> Result<Self> {
        parse_uci(uci)
            .and_then(|(from, to, promotion)| position.legal_move(from, to, promotion))
            .ok_or_else(|| Error::IllegalMove {
                notation: uci.to_string(),
                fen: position.to_fen(),
            })
    }
}

impl Position {
    /// Every legal move in Standard Algebraic Notation, in move generation
    /// order.
    #[must_use]
    pub fn legal_moves_san(&self) -> Vec<String> {
        self.legal_moves()
            .iter()
            .map(|legal| legal.to_san(self))
            .collect()
    }
}

/// Returns true if the text has the shape of a UCI coordinate move, whether or
/// not the move is legal anywhere.
pub(super) fn is_coordinate_notation(text: &str) -> bool {
    parse_uci(text).is_some()
}

fn parse_uci(uci: &str) -> Option<(Square, Square, Option<Promotion>)> {
    let chars: Vec<char> = uci.chars().collect();
    match chars.as_slice() {
        [from_file, from_rank, to_file, to_rank] => Some((
            parse_square(*from_file, *from_rank)?,
            parse_square(*to_file, *to_rank)?,
            None,
        )),
        [from_file, from_rank, to_file, to_rank, promotion] => Some((
            parse_square(*from_file, *from_rank)?,
            parse_square(*to_file, *to_rank)?,
            Some(Promotion::try_from(*promotion).ok()?),
        )),
        _ => None,
    }
}

fn parse_square(file: char, rank: char) -> Option<Square> {
    Some(Square::new(
        File::try_from(file).ok()?,
        Rank::try_from(rank).ok()?,
    ))
}

/// Constraints extracted from a SAN string. Every legal move satisfying all of
/// them is a candidate.
#[derive(Debug, Default)]
struct SanPattern {
    castle: Option<CastleSide>,
    kind: Option<PieceKind>,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Option<Square>,
    promotion: Option<Promotion>,
    capture: bool,
}

impl SanPattern {
    fn castle(side: CastleSide) -> Self {
        Self {
            castle: Some(side),
            ..Self::default()
        }
    }

    /// SAN ::= [Piece] [File] [Rank] ['x'] Square ['=' Promotion]
    fn parse(body: &str) -> Option<Self> {
        let mut chars: Vec<char> = body.chars().collect();
        let mut pattern = Self::default();

        if let Some(symbol) = chars.last().copied() {
            if let Some(kind) = PieceKind::from_san_symbol(symbol) {
                pattern.promotion = Some(match kind {
                    PieceKind::Queen => Promotion::Queen,
                    PieceKind::Rook => Promotion::Rook,
                    PieceKind::Bishop => Promotion::Bishop,
                    PieceKind::Knight => Promotion::Knight,
                    PieceKind::King | PieceKind::Pawn => return None,
                });
                let _ = chars.pop();
                if chars.last() == Some(&'=') {
                    let _ = chars.pop();
                }
            }
        }

        let to_rank = chars.pop()?;
        let to_file = chars.pop()?;
        pattern.to = Some(parse_square(to_file, to_rank)?);

        if chars.last() == Some(&'x') {
            pattern.capture = true;
            let _ = chars.pop();
        }

        let mut rest = chars.into_iter().peekable();
        pattern.kind = Some(
            match rest.peek().copied().and_then(PieceKind::from_san_symbol) {
                Some(kind) => {
                    let _ = rest.next();
                    kind
                },
                None => PieceKind::Pawn,
            },
        );
        if let Some(file) = rest.peek().and_then(|symbol| File::try_from(*symbol).ok()) {
            pattern.from_file = Some(file);
            let _ = rest.next();
        }
        if let Some(rank) = rest.peek().and_then(|symbol| Rank::try_from(*symbol).ok()) {
            pattern.from_rank = Some(rank);
            let _ = rest.next();
        }
        // Anything left over is not SAN.
        if rest.next().is_some() {
            return None;
        }
        if pattern.promotion.is_some() && pattern.kind != Some(PieceKind::Pawn) {
            return None;
        }
        Some(pattern)
    }

    fn matches(&self, candidate: &Move) -> bool {
        if let Some(side) = self.castle {
            return candidate.castle_side() == Some(side);
        }
        candidate.castle_side().is_none()
            && self.kind == Some(candidate.piece().kind)
            && self.to == Some(candidate.to())
            && self.promotion == candidate.promotion()
            && self
                .from_file
                .map_or(true, |file| candidate.from().file() == file)
            && self
                .from_rank
                .map_or(true, |rank| candidate.from().rank() == rank)
            && (!self.capture || candidate.is_capture())
    }
}
