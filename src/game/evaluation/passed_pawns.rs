use shakmaty::{Bitboard, Board, Color, Piece, Rank, Role, Square};

use super::pawn_structure::is_defended_by_pawn;
use super::{adjacent_files, forward_ranks, relative_rank, Phased};
use crate::constants::{
    PASSED_PAWN_RANK_BONUS_EG, PASSED_PAWN_RANK_BONUS_MG, SUPPORTED_PASSED_PAWN_BONUS,
    UNSTOPPABLE_PASSER_BONUS,
};

/// Scores `color`'s passed pawns. `turn` is the side to move, which decides
/// races in pawn endings.
pub fn evaluate(board: &Board, color: Color, turn: Color) -> Phased {
    let mut score = Phased::ZERO;
    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let their_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });
    let pawn_ending = (board.by_color(!color) & !board.pawns() & !board.kings()).is_empty();

    for pawn_square in our_pawns {
        if !is_passed_pawn(pawn_square, color, their_pawns) {
            continue;
        }
        let rank = relative_rank(color, pawn_square) as usize;
        score += Phased::new(PASSED_PAWN_RANK_BONUS_MG[rank], PASSED_PAWN_RANK_BONUS_EG[rank]);

        if is_defended_by_pawn(pawn_square, color, our_pawns) {
            score += Phased::new(SUPPORTED_PASSED_PAWN_BONUS, SUPPORTED_PASSED_PAWN_BONUS);
        }

        if pawn_ending && outruns_king(board, pawn_square, color, turn) {
            score += Phased::new(0, UNSTOPPABLE_PASSER_BONUS);
        }
    }
    score
}

pub fn is_passed_pawn(pawn_square: Square, color: Color, their_pawns: Bitboard) -> bool {
    let in_front_files = Bitboard::from_file(pawn_square.file()) | adjacent_files(pawn_square.file());
    (their_pawns & in_front_files & forward_ranks(color, pawn_square)).is_empty()
}

/// Rule of the square: the defending king cannot reach the promotion square
/// in time and nothing stands on the pawn's path.
fn outruns_king(board: &Board, pawn_square: Square, color: Color, turn: Color) -> bool {
    let Some(their_king) = board.king_of(!color) else {
        return true;
    };
    let promotion_rank = match color {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    };
    let promotion_square = Square::from_coords(pawn_square.file(), promotion_rank);

    let path = Bitboard::from_file(pawn_square.file()) & forward_ranks(color, pawn_square);
    if !(path & board.occupied()).is_empty() {
        return false;
    }

    let rank = relative_rank(color, pawn_square);
    // A pawn on its starting rank can still make a double step.
    let pawn_distance = if rank == 1 { 5 } else { 7 - rank };
    let mut king_distance = their_king.distance(promotion_square);
    if turn != color {
        king_distance = king_distance.saturating_sub(1);
    }
    king_distance > pawn_distance
}
