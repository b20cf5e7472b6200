//! Evaluation terms for rooks.

use shakmaty::{Bitboard, Board, Color, File, Piece, Role, Square};

use super::{relative_rank, Phased};
use crate::constants::{ROOK_OPEN_FILE_BONUS, ROOK_SEMI_OPEN_FILE_BONUS, SEVENTH_RANK_BONUS};

/// Evaluates the placement of rooks.
pub fn evaluate(board: &Board, color: Color) -> Phased {
    let mut score = Phased::ZERO;
    let rooks = board.by_piece(Piece {
        role: Role::Rook,
        color,
    });

    for rook_square in rooks {
        score += evaluate_rook(board, color, rook_square);
    }

    score
}

fn evaluate_rook(board: &Board, color: Color, square: Square) -> Phased {
    let file_bonus = evaluate_file(board, color, square.file());
    let rank_bonus = evaluate_rank(board, color, square);
    Phased::new(file_bonus + rank_bonus, file_bonus / 2 + rank_bonus)
}

/// Evaluate the file the rook is on.
fn evaluate_file(board: &Board, color: Color, file: File) -> i32 {
    let file_bb = Bitboard::from_file(file);
    let friendly_pawns = board.by_piece(Piece { role: Role::Pawn, color }) & file_bb;
    let enemy_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color }) & file_bb;

    match (friendly_pawns.is_empty(), enemy_pawns.is_empty()) {
        (true, true) => ROOK_OPEN_FILE_BONUS,
        (true, false) => ROOK_SEMI_OPEN_FILE_BONUS,
        _ => 0,
    }
}

/// The 7th rank only pays while the enemy king or pawns are still there.
fn evaluate_rank(board: &Board, color: Color, square: Square) -> i32 {
    if relative_rank(color, square) != 6 {
        return 0;
    }
    let rank_bb = Bitboard::from_rank(square.rank());
    let back_rank_bb = match color {
        Color::White => Bitboard::from_rank(shakmaty::Rank::Eighth),
        Color::Black => Bitboard::from_rank(shakmaty::Rank::First),
    };
    let enemy_pawns_on_rank = board.by_piece(Piece { role: Role::Pawn, color: !color }) & rank_bb;
    let enemy_king_cut_off = board.by_piece(Piece { role: Role::King, color: !color }) & back_rank_bb;
    if enemy_pawns_on_rank.is_empty() && enemy_king_cut_off.is_empty() {
        0
    } else {
        SEVENTH_RANK_BONUS
    }
}
