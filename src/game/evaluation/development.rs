// src/game/evaluation/development.rs

use shakmaty::{Bitboard, Board, Color, Piece, Role, Square};

use super::Phased;
use crate::constants::{EARLY_QUEEN_MOVE_PENALTY, UNDEVELOPED_MINOR_PENALTY};

/// Opening-only penalties: minors still at home, and a queen that left before
/// they did. The endgame component is always zero.
pub fn evaluate(board: &Board, color: Color) -> Phased {
    let (minor_starts, queen_start) = match color {
        Color::White => (
            Bitboard::from_square(Square::B1)
                | Bitboard::from_square(Square::G1)
                | Bitboard::from_square(Square::C1)
                | Bitboard::from_square(Square::F1),
            Square::D1,
        ),
        Color::Black => (
            Bitboard::from_square(Square::B8)
                | Bitboard::from_square(Square::G8)
                | Bitboard::from_square(Square::C8)
                | Bitboard::from_square(Square::F8),
            Square::D8,
        ),
    };

    let minors = board.by_piece(Piece { role: Role::Knight, color })
        | board.by_piece(Piece { role: Role::Bishop, color });
    let undeveloped = (minors & minor_starts).count() as i32;
    let mut score = -undeveloped * UNDEVELOPED_MINOR_PENALTY;

    let queen = board.by_piece(Piece { role: Role::Queen, color });
    let queen_out = !queen.is_empty() && !queen.contains(queen_start);
    if queen_out && undeveloped >= 2 {
        score -= EARLY_QUEEN_MOVE_PENALTY;
    }

    Phased::new(score, 0)
}
