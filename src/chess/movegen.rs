//! Move [generation]: pseudo-legal moves for each piece, legality filtering
//! through check detection and the terminal conditions that follow from it.
//!
//! The generator produces pseudo-legal moves first (the ones that follow the
//! movement rules of the pieces) and keeps those that do not leave the
//! mover's king attacked after the move is applied. Castling is the exception:
//! the king can not castle out of, through or into check, so the squares the
//! king walks are checked before the move is produced.
//!
//! [generation]: https://www.chessprogramming.org/Move_Generation

use crate::chess::attacks;
use crate::chess::bitboard::Bitboard;
use crate::chess::core::{
    CastleRights,
    CastleSide,
    Move,
    MoveFlags,
    MoveList,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
};
use crate::chess::position::Position;

impl Position {
    /// Produces the moves that follow the movement rules of each piece but
    /// might leave the mover's king in check.
    #[must_use]
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let us = self.us();
        let our_pieces = self.board().player_pieces(us);
        let occupancy = self.board().occupied();
        let own = our_pieces.all();
        for kind in [
            PieceKind::King,
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
        ] {
            for from in our_pieces.of(kind) {
                for to in attacks::piece_attacks(kind, from, occupancy) - own {
                    let captured = self.piece_at(to);
                    let flags = if captured.is_some() {
                        MoveFlags::CAPTURE
                    } else {
                        MoveFlags::empty()
                    };
                    moves.push(Move::new(
                        from,
                        to,
                        Piece::new(us, kind),
                        captured,
                        None,
                        flags,
                    ));
                }
            }
        }
        self.generate_pawn_moves(&mut moves);
        self.generate_castles(&mut moves);
        moves
    }

    /// Calculates a list of legal moves (i.e. the moves that do not leave our
    /// king in check).
    ///
    /// This is a correctness-critical path: every modification should be
    /// carefully tested, perft in `tests/chess.rs` is the main safety net.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let us = self.us();
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|candidate| !self.make_move_unchecked(candidate).is_king_attacked(us));
        moves
    }

    fn generate_pawn_moves(&self, moves: &mut MoveList) {
        let us = self.us();
        let direction = us.push_direction();
        let occupancy = self.board().occupied();
        let their_pieces = self.board().player_pieces(self.they()).all();
        let pawn = Piece::new(us, PieceKind::Pawn);
        for from in self.board().player_pieces(us).pawns {
            if let Some(to) = from.offset(0, direction) {
                if !occupancy.contains(to) {
                    push_pawn_move(moves, from, to, pawn, None, MoveFlags::empty());
                    // Double push is only possible when both squares are empty.
                    if from.rank() == Rank::pawns_starting(us) {
                        if let Some(double) = to.offset(0, direction) {
                            if !occupancy.contains(double) {
                                moves.push(Move::new(
                                    from,
                                    double,
                                    pawn,
                                    None,
                                    None,
                                    MoveFlags::DOUBLE_PAWN_PUSH,
                                ));
                            }
                        }
                    }
                }
            }
            for to in attacks::pawn_attacks(from, us) {
                if their_pieces.contains(to) {
                    push_pawn_move(
                        moves,
                        from,
                        to,
                        pawn,
                        self.piece_at(to),
                        MoveFlags::CAPTURE,
                    );
                } else if self.en_passant_square() == Some(to) {
                    moves.push(Move::new(
                        from,
                        to,
                        pawn,
                        Some(Piece::new(self.they(), PieceKind::Pawn)),
                        None,
                        MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                    ));
                }
            }
        }
    }

    fn generate_castles(&self, moves: &mut MoveList) {
        let us = self.us();
        for side in CastleSide::ALL {
            if !self.castle_rights().contains(CastleRights::single(us, side)) {
                continue;
            }
            if !(self.board().occupied() & attacks::castle_path(us, side)).is_empty() {
                continue;
            }
            if attacks::castle_king_walk(us, side)
                .iter()
                .any(|square| self.is_attacked(square, self.they()))
            {
                continue;
            }
            let flags = match side {
                CastleSide::Short => MoveFlags::KINGSIDE_CASTLE,
                CastleSide::Long => MoveFlags::QUEENSIDE_CASTLE,
            };
            moves.push(Move::new(
                CastleSide::king_from(us),
                side.king_to(us),
                Piece::new(us, PieceKind::King),
                None,
                None,
                flags,
            ));
        }
    }

    /// Returns true if any piece of `by` attacks the square. The turn and
    /// castling are ignored, pawns attack diagonally even if the target square
    /// is empty.
    #[must_use]
    pub fn is_attacked(&self, square: Square, by: Player) -> bool {
        !attacks::attackers(self.board(), square, by).is_empty()
    }

    fn is_king_attacked(&self, player: Player) -> bool {
        self.board()
            .king(player)
            .is_some_and(|king| self.is_attacked(king, player.opponent()))
    }

    /// Returns true if the king of the side to move is attacked.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_king_attacked(self.us())
    }

    /// Squares of the opponent pieces giving check to the side to move.
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        match self.board().king(self.us()) {
            Some(king) => attacks::attackers(self.board(), king, self.they()),
            None => Bitboard::empty(),
        }
    }

    /// The side to move has no legal moves and is in check.
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    /// The side to move has no legal moves but is not in check.
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    /// Neither side can possibly checkmate: there are no pawns, rooks or
    /// queens and either at most one minor piece is left or all the remaining
    /// minor pieces are bishops on the same square color.
    #[must_use]
    pub fn has_insufficient_material(&self) -> bool {
        let (white, black) = (
            self.board().player_pieces(Player::White),
            self.board().player_pieces(Player::Black),
        );
        let heavy = white.pawns | white.rooks | white.queens | black.pawns | black.rooks | black.queens;
        if !heavy.is_empty() {
            return false;
        }
        let knights = white.knights | black.knights;
        let bishops = white.bishops | black.bishops;
        if (knights | bishops).count() <= 1 {
            return true;
        }
        if !knights.is_empty() {
            return false;
        }
        let on_light = bishops & Bitboard::light_squares();
        on_light.is_empty() || on_light == bishops
    }
}

/// Pushes a pawn move, expanding it into one move per promotion choice when
/// the pawn reaches the last rank.
fn push_pawn_move(
    moves: &mut MoveList,
    from: Square,
    to: Square,
    pawn: Piece,
    captured: Option<Piece>,
    flags: MoveFlags,
) {
    if to.rank() == Rank::promotion(pawn.owner) {
        for promotion in Promotion::ALL {
            moves.push(Move::new(from, to, pawn, captured, Some(promotion), flags));
        }
    } else {
        moves.push(Move::new(from, to, pawn, captured, None, flags));
    }
}
