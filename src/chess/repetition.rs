//! Tracking of repeated positions for the threefold repetition rule.

use std::collections::HashMap;

use crate::chess::bitboard::Board;
use crate::chess::core::{CastleRights, Player, Square};
use crate::chess::position::Position;

/// Two positions are the same for the repetition rule when the pieces stand
/// on the same squares, the same side is to move and both castling rights and
/// the en passant target are the same. Clocks are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RepetitionKey {
    board: Board,
    side_to_move: Player,
    castling: CastleRights,
    en_passant_square: Option<Square>,
}

impl From<&Position> for RepetitionKey {
    fn from(position: &Position) -> Self {
        Self {
            board: *position.board(),
            side_to_move: position.side_to_move(),
            castling: position.castle_rights(),
            en_passant_square: position.en_passant_square(),
        }
    }
}

/// Multiset of positions on the line from the root of the game to the current
/// position.
#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    table: HashMap<RepetitionKey, usize>,
}

impl RepetitionTable {
    /// Creates an empty repetition table.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds an occurrence of the position and returns the number of times it
    /// has been seen.
    pub(crate) fn record(&mut self, position: &Position) -> usize {
        let count = self.table.entry(position.into()).or_insert(0);
        *count += 1;
        *count
    }

    /// Removes one occurrence of the position, the reverse of
    /// [`RepetitionTable::record`].
    pub(crate) fn forget(&mut self, position: &Position) {
        let key = RepetitionKey::from(position);
        if let Some(count) = self.table.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                let _ = self.table.remove(&key);
            }
        }
    }

    /// Number of recorded occurrences of the position.
    #[must_use]
    pub(crate) fn count(&self, position: &Position) -> usize {
        self.table
            .get(&RepetitionKey::from(position))
            .copied()
            .unwrap_or_default()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
