//! [Perft] (*per*formance *t*esting) is a technique for checking correctness of
//! move generation: the number of leaf nodes of the legal move tree is
//! compared against well-known values.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::core::Move;
use crate::chess::position::Position;

/// Counts the leaves of the legal move tree of given depth. Depth 0 is the
/// position itself.
///
/// ```
/// use tabiya::chess::perft::perft;
/// use tabiya::chess::position::Position;
///
/// assert_eq!(perft(&Position::starting(), 3), 8902);
/// ```
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.legal_moves();
    // Bulk counting: the leaves are the legal moves themselves.
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| perft(&position.make_move_unchecked(next_move), depth - 1))
        .sum()
}

/// Splits the perft count by the root moves. Comparing the split with another
/// move generator narrows a mismatch down to the offending subtree.
#[must_use]
pub fn divide(position: &Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    position
        .legal_moves()
        .into_iter()
        .map(|next_move| {
            let nodes = perft(&position.make_move_unchecked(&next_move), depth - 1);
            (next_move, nodes)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn shallow_starting_position() {
        let position = Position::starting();
        assert_eq!(perft(&position, 0), 1);
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
    }

    #[test]
    fn divide_sums_to_perft() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let split = divide(&position, 2);
        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|(_, nodes)| nodes).sum::<u64>(), 2039);
        assert!(divide(&position, 0).is_empty());
    }

    #[test]
    fn terminal_positions() {
        let mate = Position::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1").unwrap();
        assert_eq!(perft(&mate, 1), 0);
        assert_eq!(perft(&mate, 3), 0);
        assert_eq!(perft(&mate, 0), 1);
    }
}
