// src/game/evaluation/see.rs

use shakmaty::{Board, Color, Role, Square};

use super::get_piece_value;

const KING_EXCHANGE_VALUE: i32 = 10_000;

fn exchange_value(role: Role) -> i32 {
    match role {
        Role::King => KING_EXCHANGE_VALUE,
        _ => get_piece_value(role),
    }
}

/// Static Exchange Evaluation (SEE)
///
/// Plays out the capture sequence on `target_square` that starts with the
/// piece on `attacker_square`, each side always recapturing with its least
/// valuable attacker and stopping as soon as recapturing would lose material.
/// Positive means the first capture wins material.
pub fn see(board: &Board, attacker_square: Square, target_square: Square) -> i32 {
    let Some(attacker_piece) = board.piece_at(attacker_square) else {
        return 0;
    };
    let gain = board.piece_at(target_square).map_or(0, |p| exchange_value(p.role));

    let mut next_board = board.clone();
    next_board.discard_piece_at(attacker_square);
    next_board.set_piece_at(target_square, attacker_piece);

    gain - see_recursive(&next_board, target_square, !attacker_piece.color)
}

/// Best net gain for `color` from continuing the exchange, never below zero
/// because standing pat is always allowed.
fn see_recursive(board: &Board, target_square: Square, color: Color) -> i32 {
    let attackers = board.attacks_to(target_square, color, board.occupied()) & board.by_color(color);

    let least_valuable = attackers
        .into_iter()
        .filter_map(|sq| board.piece_at(sq).map(|p| (sq, p)))
        .min_by_key(|(_, p)| exchange_value(p.role));
    let Some((attacker_square, attacker_piece)) = least_valuable else {
        return 0;
    };
    let Some(captured_piece) = board.piece_at(target_square) else {
        return 0;
    };

    let mut next_board = board.clone();
    next_board.discard_piece_at(attacker_square);
    next_board.set_piece_at(target_square, attacker_piece);

    let net = exchange_value(captured_piece.role) - see_recursive(&next_board, target_square, !color);
    net.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parse_fen;
    use shakmaty::Position;

    #[test]
    fn test_free_pawn() {
        let pos = parse_fen("4k3/8/8/3p4/8/8/8/3RK3 w - - 0 1").unwrap();
        assert_eq!(see(pos.board(), Square::D1, Square::D5), 100);
    }

    #[test]
    fn test_defended_pawn_loses_rook() {
        let pos = parse_fen("4k3/8/2p5/3p4/8/8/8/3RK3 w - - 0 1").unwrap();
        assert_eq!(see(pos.board(), Square::D1, Square::D5), 100 - 500);
    }

    #[test]
    fn test_pawn_takes_defended_knight() {
        let pos = parse_fen("4k3/8/2p5/3n4/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(see(pos.board(), Square::E4, Square::D5), 320 - 100);
    }

    #[test]
    fn test_xray_through_own_rook() {
        // The second rook joins once the first has captured.
        let pos = parse_fen("3rk3/8/8/3p4/8/8/3R4/3RK3 w - - 0 1").unwrap();
        assert_eq!(see(pos.board(), Square::D2, Square::D5), 100);
    }
}
