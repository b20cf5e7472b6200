// src/game/evaluation/mobility.rs

use shakmaty::{Bitboard, Board, Color, Piece, Role, Square};

use super::Phased;
use crate::constants::{
    BISHOP_MOBILITY_BONUS, CENTER_CONTROL_BONUS, KNIGHT_MOBILITY_BONUS, QUEEN_MOBILITY_BONUS,
    ROOK_MOBILITY_BONUS,
};

fn center() -> Bitboard {
    Bitboard::from_square(Square::D4)
        | Bitboard::from_square(Square::E4)
        | Bitboard::from_square(Square::D5)
        | Bitboard::from_square(Square::E5)
}

pub fn evaluate(board: &Board, color: Color) -> Phased {
    let mut mobility_score = Phased::ZERO;
    let occupied = board.occupied();
    let friendly_pieces = board.by_color(color);
    let center = center();

    for role in [Role::Knight, Role::Bishop, Role::Rook, Role::Queen] {
        let piece = Piece { role, color };
        let mobility_bonus = Phased::from_pair(match role {
            Role::Knight => KNIGHT_MOBILITY_BONUS,
            Role::Bishop => BISHOP_MOBILITY_BONUS,
            Role::Rook => ROOK_MOBILITY_BONUS,
            _ => QUEEN_MOBILITY_BONUS,
        });

        for square in board.by_piece(piece) {
            let attacks = shakmaty::attacks::attacks(square, piece, occupied);
            let valid_moves = attacks & !friendly_pieces;
            mobility_score += mobility_bonus.times(valid_moves.count() as i32);
            let central = (attacks & center).count() as i32;
            mobility_score += Phased::new(central * CENTER_CONTROL_BONUS, 0);
        }
    }

    mobility_score
}
