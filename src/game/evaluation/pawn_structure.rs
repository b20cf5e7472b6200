// src/game/evaluation/pawn_structure.rs

use shakmaty::{attacks, Bitboard, Board, Color, File, Piece, Role, Square};

use super::{adjacent_files, forward_ranks, Phased};
use crate::constants::{
    BACKWARD_PAWN_PENALTY, CONNECTED_PAWN_BONUS, DOUBLED_PAWN_PENALTY, ISOLATED_PAWN_PENALTY,
    PAWN_CHAIN_BONUS, PAWN_ISLAND_PENALTY, PAWN_MAJORITY_BONUS,
};

pub fn evaluate(board: &Board, color: Color) -> Phased {
    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let their_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });

    let mut score = Phased::ZERO;
    score += Phased::from_pair(DOUBLED_PAWN_PENALTY).times(count_doubled_pawns(our_pawns));
    score += Phased::from_pair(PAWN_ISLAND_PENALTY).times((count_islands(our_pawns) - 1).max(0));
    score += Phased::from_pair(PAWN_MAJORITY_BONUS).times(count_majorities(our_pawns, their_pawns));

    for pawn in our_pawns {
        if is_isolated(pawn, our_pawns) {
            score += Phased::from_pair(ISOLATED_PAWN_PENALTY);
        } else if is_backward(pawn, color, our_pawns, their_pawns) {
            score += Phased::from_pair(BACKWARD_PAWN_PENALTY);
        }
        if has_phalanx_neighbour(pawn, our_pawns) {
            score += Phased::from_pair(CONNECTED_PAWN_BONUS);
        }
        if is_defended_by_pawn(pawn, color, our_pawns) {
            score += Phased::from_pair(PAWN_CHAIN_BONUS);
        }
    }

    score
}

fn count_doubled_pawns(our_pawns: Bitboard) -> i32 {
    let mut doubled_pawns = 0;
    for file in File::ALL {
        let pawns_on_file = (our_pawns & Bitboard::from_file(file)).count();
        if pawns_on_file > 1 {
            doubled_pawns += pawns_on_file - 1;
        }
    }
    doubled_pawns as i32
}

/// Groups of adjacent files that hold at least one pawn.
pub fn count_islands(our_pawns: Bitboard) -> i32 {
    let mut islands = 0;
    let mut in_island = false;
    for file in File::ALL {
        let occupied = !(our_pawns & Bitboard::from_file(file)).is_empty();
        if occupied && !in_island {
            islands += 1;
        }
        in_island = occupied;
    }
    islands
}

/// Flanks (a-d, e-h) where we have more pawns than the opponent.
fn count_majorities(our_pawns: Bitboard, their_pawns: Bitboard) -> i32 {
    let queenside = File::ALL[..4]
        .iter()
        .fold(Bitboard::EMPTY, |bb, &f| bb | Bitboard::from_file(f));
    let kingside = !queenside;
    [queenside, kingside]
        .into_iter()
        .filter(|&flank| (our_pawns & flank).count() > (their_pawns & flank).count())
        .count() as i32
}

fn is_isolated(pawn: Square, our_pawns: Bitboard) -> bool {
    (our_pawns & adjacent_files(pawn.file())).is_empty()
}

/// A pawn whose neighbours have all advanced past it and whose stop square is
/// covered by an enemy pawn.
fn is_backward(pawn: Square, color: Color, our_pawns: Bitboard, their_pawns: Bitboard) -> bool {
    let behind_or_level = !forward_ranks(color, pawn);
    let supporters = our_pawns & adjacent_files(pawn.file()) & behind_or_level;
    if !supporters.is_empty() {
        return false;
    }
    let Some(stop) = stop_square(pawn, color) else {
        return false;
    };
    !(attacks::pawn_attacks(color, stop) & their_pawns).is_empty()
}

fn stop_square(pawn: Square, color: Color) -> Option<Square> {
    match color {
        Color::White => pawn.offset(8),
        Color::Black => pawn.offset(-8),
    }
}

fn has_phalanx_neighbour(pawn: Square, our_pawns: Bitboard) -> bool {
    let same_rank = Bitboard::from_rank(pawn.rank());
    !(our_pawns & same_rank & adjacent_files(pawn.file())).is_empty()
}

pub(crate) fn is_defended_by_pawn(pawn: Square, color: Color, our_pawns: Bitboard) -> bool {
    // Squares from which one of our pawns would attack `pawn`.
    !(attacks::pawn_attacks(!color, pawn) & our_pawns).is_empty()
}
