//! Chess position and move legality library: reads and writes [FEN] and
//! [SAN], generates legal moves under the full rules of chess and tracks a
//! game with undo/redo and draw rules.
//!
//! ```
//! use tabiya::{new_game, GameState};
//!
//! let mut game = new_game(None).unwrap();
//! assert_eq!(game.make_move("e4").unwrap(), GameState::InProgress);
//! assert_eq!(game.make_move("e7e5").unwrap(), GameState::InProgress);
//! assert_eq!(
//!     game.to_fen(),
//!     "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
//! );
//! ```
//!
//! [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
//! [SAN]: https://www.chessprogramming.org/Algebraic_Chess_Notation#SAN

pub mod chess;
pub mod error;

pub use chess::core::{Move, Piece, PieceKind, Player, Promotion, Square};
pub use chess::game::{new_game, Game, GameState};
pub use chess::position::Position;
pub use error::{Error, Result};
use shadow_rs::shadow;

shadow!(build);

/// Returns the full library version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the version, build type and whether the build is
/// clean on startup.
pub fn print_engine_info() {
    println!("{} {}", build::PROJECT_NAME, version());
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
