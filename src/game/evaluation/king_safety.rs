// src/game/evaluation/king_safety.rs

use shakmaty::{attacks, Bitboard, Board, CastlingSide, Chess, Color, File, Piece, Position, Role, Square};

use super::{adjacent_files, relative_rank, Phased};
use crate::constants::{
    CASTLING_RIGHTS_BONUS, KING_ACTIVITY_BONUS, KING_CENTER_EXPOSURE_PENALTY,
    KING_OPEN_FILE_PENALTY, KING_SEMI_OPEN_FILE_PENALTY, PAWN_SHIELD_BONUS,
    PAWN_SHIELD_SECOND_RANK_BONUS,
};

/// Attack units per enemy piece hitting the king zone.
fn attack_units(role: Role) -> i32 {
    match role {
        Role::Knight | Role::Bishop => 2,
        Role::Rook => 3,
        Role::Queen => 5,
        Role::Pawn | Role::King => 0,
    }
}

pub fn evaluate(pos: &Chess, color: Color) -> Phased {
    let board = pos.board();
    let Some(king_square) = board.king_of(color) else {
        return Phased::ZERO;
    };

    let mut mg = 0;
    mg += evaluate_pawn_shield(board, color, king_square);
    mg -= evaluate_open_files(board, color, king_square);
    mg -= evaluate_center_exposure(king_square, color);
    mg += evaluate_castling(pos, color, king_square);

    let danger = evaluate_attackers(board, color, king_square);
    let eg = evaluate_activity(king_square);

    Phased::new(mg - danger, eg - danger / 4)
}

fn evaluate_pawn_shield(board: &Board, color: Color, king_square: Square) -> i32 {
    if relative_rank(color, king_square) > 1 {
        return 0;
    }
    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let shield_files = Bitboard::from_file(king_square.file()) | adjacent_files(king_square.file());
    let step = match color {
        Color::White => 8,
        Color::Black => -8,
    };

    let mut shield_score = 0;
    if let Some(first) = king_square.offset(step) {
        let first_rank = Bitboard::from_rank(first.rank()) & shield_files;
        shield_score += (our_pawns & first_rank).count() as i32 * PAWN_SHIELD_BONUS;
        if let Some(second) = first.offset(step) {
            let second_rank = Bitboard::from_rank(second.rank()) & shield_files;
            shield_score += (our_pawns & second_rank).count() as i32 * PAWN_SHIELD_SECOND_RANK_BONUS;
        }
    }
    shield_score
}

fn evaluate_open_files(board: &Board, color: Color, king_square: Square) -> i32 {
    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let their_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });

    let mut open_file_penalty = 0;
    let king_file_index = king_square.file() as u32;
    for file_index in king_file_index.saturating_sub(1)..=(king_file_index + 1).min(7) {
        let file_bb = Bitboard::from_file(File::new(file_index));
        let no_our_pawns_on_file = (our_pawns & file_bb).is_empty();
        let no_their_pawns_on_file = (their_pawns & file_bb).is_empty();

        if no_our_pawns_on_file && no_their_pawns_on_file {
            open_file_penalty += KING_OPEN_FILE_PENALTY;
        } else if no_our_pawns_on_file {
            open_file_penalty += KING_SEMI_OPEN_FILE_PENALTY;
        }
    }
    open_file_penalty
}

/// A king left on the d/e files or walked up the board is a target while
/// queens and rooks are around.
fn evaluate_center_exposure(king_square: Square, color: Color) -> i32 {
    let on_center_file = matches!(king_square.file(), File::D | File::E);
    let advanced = relative_rank(color, king_square) > 1;
    if on_center_file || advanced {
        KING_CENTER_EXPOSURE_PENALTY
    } else {
        0
    }
}

fn evaluate_castling(pos: &Chess, color: Color, king_square: Square) -> i32 {
    let castles = pos.castles();
    let rights = castles.has(color, CastlingSide::KingSide) || castles.has(color, CastlingSide::QueenSide);
    let castled = relative_rank(color, king_square) == 0
        && matches!(king_square.file(), File::A | File::B | File::C | File::G | File::H);
    if rights || castled {
        CASTLING_RIGHTS_BONUS
    } else {
        0
    }
}

/// Penalty that grows with both the number and the kind of enemy pieces
/// attacking the squares around the king.
fn evaluate_attackers(board: &Board, color: Color, king_square: Square) -> i32 {
    let king_zone = attacks::king_attacks(king_square) | Bitboard::from_square(king_square);
    let occupied = board.occupied();

    let mut attackers = 0;
    let mut units = 0;
    for piece_square in board.by_color(!color) {
        let Some(piece) = board.piece_at(piece_square) else {
            continue;
        };
        let weight = attack_units(piece.role);
        if weight == 0 {
            continue;
        }
        if !(attacks::attacks(piece_square, piece, occupied) & king_zone).is_empty() {
            attackers += 1;
            units += weight;
        }
    }

    // A lone attacker is rarely dangerous.
    if attackers < 2 {
        return units * 2;
    }
    units * attackers * 5
}

fn evaluate_activity(king_square: Square) -> i32 {
    let file = king_square.file() as i32;
    let rank = king_square.rank() as i32;
    let file_distance = (3 - file).max(file - 4);
    let rank_distance = (3 - rank).max(rank - 4);
    (3 - file_distance.max(rank_distance)) * KING_ACTIVITY_BONUS
}
