//! Mappings of occupied squares to the attacked squares for each piece.
//!
//! Leaper attacks (king, knight, pawn) do not depend on the occupancy and are
//! pre-calculated at compile time. Slider attacks (bishop, rook, queen) are
//! produced by walking each ray until the first blocker, which is included in
//! the attack set regardless of its owner.

use crate::chess::bitboard::{Bitboard, Board};
use crate::chess::core::{CastleSide, File, PieceKind, Player, Rank, Square, BOARD_SIZE};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];
const WHITE_PAWN_DELTAS: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_DELTAS: [(i8, i8); 2] = [(-1, -1), (1, -1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

const fn leaper_attacks(deltas: &[(i8, i8)]) -> [Bitboard; BOARD_SIZE as usize] {
    let mut result = [Bitboard::empty(); BOARD_SIZE as usize];
    let mut square = 0;
    while square < BOARD_SIZE as usize {
        let file = (square % 8) as i8;
        let rank = (square / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (file_delta, rank_delta) = deltas[i];
            let target_file = file + file_delta;
            let target_rank = rank + rank_delta;
            if target_file >= 0 && target_file < 8 && target_rank >= 0 && target_rank < 8 {
                bits |= 1u64 << (target_rank * 8 + target_file) as u32;
            }
            i += 1;
        }
        result[square] = Bitboard::from_bits(bits);
        square += 1;
    }
    result
}

/// Pre-calculated attacks of a knight from each square.
pub(super) const KNIGHT_ATTACKS: [Bitboard; BOARD_SIZE as usize] = leaper_attacks(&KNIGHT_DELTAS);
/// Pre-calculated attacks of a king from each square.
pub(super) const KING_ATTACKS: [Bitboard; BOARD_SIZE as usize] = leaper_attacks(&KING_DELTAS);
const WHITE_PAWN_ATTACKS: [Bitboard; BOARD_SIZE as usize] = leaper_attacks(&WHITE_PAWN_DELTAS);
const BLACK_PAWN_ATTACKS: [Bitboard; BOARD_SIZE as usize] = leaper_attacks(&BLACK_PAWN_DELTAS);

/// Squares a pawn of given player standing on `square` attacks. Pawns attack
/// diagonally forward even when the target square is empty.
pub(super) const fn pawn_attacks(square: Square, player: Player) -> Bitboard {
    match player {
        Player::White => WHITE_PAWN_ATTACKS[square as usize],
        Player::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

fn ray_attacks(square: Square, occupancy: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let mut result = Bitboard::empty();
    for (file_delta, rank_delta) in directions {
        let mut current = square;
        while let Some(next) = current.offset(*file_delta, *rank_delta) {
            result |= next.into();
            if occupancy.contains(next) {
                break;
            }
            current = next;
        }
    }
    result
}

pub(super) fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ray_attacks(square, occupancy, &BISHOP_DIRECTIONS)
}

pub(super) fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ray_attacks(square, occupancy, &ROOK_DIRECTIONS)
}

pub(super) fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

/// Squares attacked by a non-pawn piece of given kind from `square`.
pub(super) fn piece_attacks(kind: PieceKind, square: Square, occupancy: Bitboard) -> Bitboard {
    match kind {
        PieceKind::King => KING_ATTACKS[square as usize],
        PieceKind::Queen => queen_attacks(square, occupancy),
        PieceKind::Rook => rook_attacks(square, occupancy),
        PieceKind::Bishop => bishop_attacks(square, occupancy),
        PieceKind::Knight => KNIGHT_ATTACKS[square as usize],
        PieceKind::Pawn => Bitboard::empty(),
    }
}

/// Pieces of `attacker` that attack given square. Uses the "superpiece"
/// trick: place every kind of piece on the target square and intersect its
/// attacks with the attacker's pieces of the same kind.
pub(super) fn attackers(board: &Board, square: Square, attacker: Player) -> Bitboard {
    let occupancy = board.occupied();
    let pieces = board.player_pieces(attacker);
    let diagonal = bishop_attacks(square, occupancy);
    let orthogonal = rook_attacks(square, occupancy);
    (KING_ATTACKS[square as usize] & pieces.king)
        | (KNIGHT_ATTACKS[square as usize] & pieces.knights)
        | (diagonal & (pieces.bishops | pieces.queens))
        | (orthogonal & (pieces.rooks | pieces.queens))
        // A pawn of the attacker attacks the square iff a pawn of the
        // defender standing there would attack the pawn.
        | (pawn_attacks(square, attacker.opponent()) & pieces.pawns)
}

/// Squares between the king and the rook that have to be empty to castle.
pub(super) fn castle_path(player: Player, side: CastleSide) -> Bitboard {
    let rank = Rank::backrank(player);
    let files: &[File] = match side {
        CastleSide::Short => &[File::F, File::G],
        CastleSide::Long => &[File::B, File::C, File::D],
    };
    files.iter().fold(Bitboard::empty(), |result, file| {
        result | Square::new(*file, rank).into()
    })
}

/// Squares the king starts on, passes through and lands on while castling.
/// None of them can be attacked.
pub(super) fn castle_king_walk(player: Player, side: CastleSide) -> Bitboard {
    let rank = Rank::backrank(player);
    let files: &[File] = match side {
        CastleSide::Short => &[File::E, File::F, File::G],
        CastleSide::Long => &[File::E, File::D, File::C],
    };
    files.iter().fold(Bitboard::empty(), |result, file| {
        result | Square::new(*file, rank).into()
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn occupancy() -> Bitboard {
        Bitboard::from_squares(&[
            Square::F4,
            Square::C4,
            Square::A4,
            Square::B1,
            Square::D5,
            Square::G5,
            Square::G6,
            Square::E8,
            Square::E2,
        ])
    }

    #[test]
    fn knight_attacks() {
        assert_eq!(
            KNIGHT_ATTACKS[Square::A1 as usize],
            Bitboard::from_bits(0x0000_0000_0002_0400)
        );
        assert_eq!(
            KNIGHT_ATTACKS[Square::E4 as usize],
            Bitboard::from_bits(0x0000_2844_0044_2800)
        );
        assert_eq!(
            KNIGHT_ATTACKS[Square::H8 as usize],
            Bitboard::from_bits(0x0020_4000_0000_0000)
        );
        assert_eq!(
            format!("{:?}", KNIGHT_ATTACKS[Square::G2 as usize]),
            ". . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . 1 . 1\n\
             . . . . 1 . . .\n\
             . . . . . . . .\n\
             . . . . 1 . . ."
        );
    }

    #[test]
    fn king_attacks() {
        assert_eq!(KING_ATTACKS[Square::A1 as usize].count(), 3);
        assert_eq!(KING_ATTACKS[Square::E1 as usize].count(), 5);
        assert_eq!(KING_ATTACKS[Square::E4 as usize].count(), 8);
        assert_eq!(
            KING_ATTACKS[Square::H8 as usize],
            Bitboard::from_squares(&[Square::G8, Square::G7, Square::H7])
        );
    }

    #[test]
    fn pawn_attacks_by_player() {
        assert_eq!(
            pawn_attacks(Square::E4, Player::White),
            Bitboard::from_squares(&[Square::D5, Square::F5])
        );
        assert_eq!(
            pawn_attacks(Square::E4, Player::Black),
            Bitboard::from_squares(&[Square::D3, Square::F3])
        );
        assert_eq!(
            pawn_attacks(Square::A7, Player::White),
            Bitboard::from(Square::B8)
        );
        assert_eq!(
            pawn_attacks(Square::H2, Player::Black),
            Bitboard::from(Square::G1)
        );
        assert!(pawn_attacks(Square::C8, Player::White).is_empty());
    }

    #[test]
    fn slider_attacks() {
        let occupancy = occupancy();
        assert_eq!(
            format!("{occupancy:?}"),
            ". . . . 1 . . .\n\
             . . . . . . . .\n\
             . . . . . . 1 .\n\
             . . . 1 . . 1 .\n\
             1 . 1 . . 1 . .\n\
             . . . . . . . .\n\
             . . . . 1 . . .\n\
             . 1 . . . . . ."
        );
        assert_eq!(
            format!("{:?}", bishop_attacks(Square::E4, occupancy)),
            ". . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . 1 .\n\
             . . . 1 . 1 . .\n\
             . . . . . . . .\n\
             . . . 1 . 1 . .\n\
             . . 1 . . . 1 .\n\
             . 1 . . . . . 1"
        );
        assert_eq!(
            format!("{:?}", rook_attacks(Square::E4, occupancy)),
            ". . . . 1 . . .\n\
             . . . . 1 . . .\n\
             . . . . 1 . . .\n\
             . . . . 1 . . .\n\
             . . 1 1 . 1 . .\n\
             . . . . 1 . . .\n\
             . . . . 1 . . .\n\
             . . . . . . . ."
        );
        assert_eq!(
            queen_attacks(Square::E4, occupancy),
            bishop_attacks(Square::E4, occupancy) | rook_attacks(Square::E4, occupancy)
        );
        // Empty board: rook always sees 14 squares.
        assert_eq!(rook_attacks(Square::D4, Bitboard::empty()).count(), 14);
        assert_eq!(bishop_attacks(Square::A1, Bitboard::empty()).count(), 7);
    }

    #[test]
    fn attackers_in_starting_position() {
        let board = Board::starting();
        assert_eq!(
            attackers(&board, Square::F3, Player::White),
            Bitboard::from_squares(&[Square::E2, Square::G2, Square::G1])
        );
        assert_eq!(
            attackers(&board, Square::D6, Player::Black),
            Bitboard::from_squares(&[Square::C7, Square::E7])
        );
        assert!(attackers(&board, Square::E4, Player::White).is_empty());
        // Sliders behind own pieces do not attack.
        assert!(attackers(&board, Square::A3, Player::White).contains(Square::B2));
        assert!(!attackers(&board, Square::A3, Player::White).contains(Square::A1));
    }

    #[test]
    fn castling_masks() {
        assert_eq!(
            castle_path(Player::White, CastleSide::Long),
            Bitboard::from_squares(&[Square::B1, Square::C1, Square::D1])
        );
        assert_eq!(
            castle_path(Player::Black, CastleSide::Short),
            Bitboard::from_squares(&[Square::F8, Square::G8])
        );
        assert_eq!(
            castle_king_walk(Player::White, CastleSide::Long),
            Bitboard::from_squares(&[Square::C1, Square::D1, Square::E1])
        );
        assert_eq!(
            castle_king_walk(Player::Black, CastleSide::Short),
            Bitboard::from_squares(&[Square::E8, Square::F8, Square::G8])
        );
    }
}
