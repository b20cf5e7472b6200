//! Evaluation terms for bishops.

use shakmaty::{Bitboard, Board, Color, Piece, Rank, Role, Square};

use super::Phased;
use crate::constants::{BAD_BISHOP_PENALTY, BISHOP_PAIR_BONUS_EG, BISHOP_PAIR_BONUS_MG};

/// Evaluates the placement of bishops.
pub fn evaluate(board: &Board, color: Color) -> Phased {
    let mut score = Phased::ZERO;
    let bishops = board.by_piece(Piece {
        role: Role::Bishop,
        color,
    });

    if has_bishop_pair(bishops) {
        score += Phased::new(BISHOP_PAIR_BONUS_MG, BISHOP_PAIR_BONUS_EG);
    }

    for bishop_square in bishops {
        let penalty = evaluate_bishop(board, color, bishop_square);
        score += Phased::new(penalty, penalty / 2);
    }

    score
}

/// Two bishops on squares of different colours.
fn has_bishop_pair(bishops: Bitboard) -> bool {
    let mut light = false;
    let mut dark = false;
    for square in bishops {
        if square.is_light() {
            light = true;
        } else {
            dark = true;
        }
    }
    light && dark
}

/// A bishop is "bad" when its own central pawns sit on its square colour.
fn evaluate_bishop(board: &Board, color: Color, square: Square) -> i32 {
    let friendly_pawns = board.by_piece(Piece {
        role: Role::Pawn,
        color,
    });
    let central_files = Bitboard::from_file(shakmaty::File::C)
        | Bitboard::from_file(shakmaty::File::D)
        | Bitboard::from_file(shakmaty::File::E)
        | Bitboard::from_file(shakmaty::File::F);
    let central_ranks = Bitboard::from_rank(Rank::Third)
        | Bitboard::from_rank(Rank::Fourth)
        | Bitboard::from_rank(Rank::Fifth)
        | Bitboard::from_rank(Rank::Sixth);
    let central_pawns = friendly_pawns & central_files & central_ranks;

    let blocking = central_pawns
        .into_iter()
        .filter(|pawn| pawn.is_light() == square.is_light())
        .count() as i32;
    blocking * BAD_BISHOP_PENALTY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parse_fen;
    use shakmaty::Position;

    #[test]
    fn test_pair_needs_opposite_colours() {
        let pair = parse_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").unwrap();
        let same = parse_fen("4k3/8/8/8/8/8/8/B3K1B1 w - - 0 1").unwrap();
        assert_eq!(
            evaluate(pair.board(), Color::White),
            Phased::new(BISHOP_PAIR_BONUS_MG, BISHOP_PAIR_BONUS_EG)
        );
        assert_eq!(evaluate(same.board(), Color::White), Phased::ZERO);
    }

    #[test]
    fn test_bad_bishop() {
        // d4 and e3 are dark squares, like the c1 bishop.
        let pos = parse_fen("4k3/8/8/8/3P4/4P3/8/2B1K3 w - - 0 1").unwrap();
        assert_eq!(evaluate_bishop(pos.board(), Color::White, Square::C1), 2 * BAD_BISHOP_PENALTY);
    }
}
