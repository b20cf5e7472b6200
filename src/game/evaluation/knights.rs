//! Evaluation terms for knights.

use shakmaty::{attacks, Board, Color, File, Piece, Role, Square};

use super::{adjacent_files, forward_ranks, relative_rank, Phased};
use crate::constants::{CENTRALIZATION_BONUS, OUTPOST_BONUS};

/// Evaluates the placement of knights.
pub fn evaluate(board: &Board, color: Color) -> Phased {
    let mut score = Phased::ZERO;
    let knights = board.by_piece(Piece {
        role: Role::Knight,
        color,
    });

    for knight_square in knights {
        if is_outpost(board, color, knight_square) {
            score += Phased::new(OUTPOST_BONUS, OUTPOST_BONUS / 2);
        }
        if is_centralized(knight_square) {
            score += Phased::new(CENTRALIZATION_BONUS, CENTRALIZATION_BONUS);
        }
    }

    score
}

/// An outpost is a square on the 4th to 7th rank (relative to the knight's
/// side) that a friendly pawn protects and no enemy pawn can ever attack.
fn is_outpost(board: &Board, color: Color, square: Square) -> bool {
    let rank = relative_rank(color, square);
    if !(3..=6).contains(&rank) {
        return false;
    }

    let friendly_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let supported = !(attacks::pawn_attacks(!color, square) & friendly_pawns).is_empty();
    if !supported {
        return false;
    }

    // Enemy pawns that could still advance to attack the square.
    let enemy_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });
    (enemy_pawns & adjacent_files(square.file()) & forward_ranks(color, square)).is_empty()
}

/// Reward knights for being in the center.
fn is_centralized(square: Square) -> bool {
    let file = square.file();
    let rank = square.rank();

    // Central files are C, D, E, F
    let is_central_file = file >= File::C && file <= File::F;
    // Central ranks are 3, 4, 5, 6
    let is_central_rank = rank >= shakmaty::Rank::Third && rank <= shakmaty::Rank::Sixth;

    is_central_file && is_central_rank
}
