//! Unit tests for the evaluation as a whole.

use super::*;
use crate::constants::{ROOK_OPEN_FILE_BONUS, SEVENTH_RANK_BONUS};
use crate::game::parse_fen;
use shakmaty::{fen::Fen, CastlingMode, Chess, Position};

/// Flips the board vertically and swaps the colours of everything on it,
/// including side to move, castling rights and the en passant square.
pub fn mirror_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let swap_case = |c: char| {
        if c.is_ascii_uppercase() {
            c.to_ascii_lowercase()
        } else {
            c.to_ascii_uppercase()
        }
    };

    let placement = fields[0]
        .split('/')
        .rev()
        .map(|rank| rank.chars().map(swap_case).collect::<String>())
        .collect::<Vec<_>>()
        .join("/");
    let turn = if fields[1] == "w" { "b" } else { "w" };
    let castling = if fields[2] == "-" {
        "-".to_string()
    } else {
        let swapped: String = fields[2].chars().map(swap_case).collect();
        let upper: String = swapped.chars().filter(|c| c.is_ascii_uppercase()).collect();
        let lower: String = swapped.chars().filter(|c| c.is_ascii_lowercase()).collect();
        upper + &lower
    };
    let en_passant = match fields[3] {
        "-" => "-".to_string(),
        square => {
            let mut chars = square.chars();
            let file = chars.next().unwrap_or('a');
            let rank = if chars.next() == Some('3') { '6' } else { '3' };
            format!("{file}{rank}")
        }
    };
    format!("{placement} {turn} {castling} {en_passant} {} {}", fields[4], fields[5])
}

const SYMMETRY_FENS: [&str; 8] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "rnbqkb1r/pp1p1ppp/4pn2/2p5/2PP4/2N5/PP2PPPP/R1BQKBNR w KQkq c6 0 4",
    "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N1PN2/PP3PPP/R2QKB1R w KQ - 0 8",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "7k/8/8/P7/8/8/8/K7 w - - 0 1",
    "4k3/8/3p1n2/2N5/8/8/1B6/3RK3 b - - 0 1",
    "2kr3r/ppp2ppp/2n5/2b1p3/4P1q1/2NP1N2/PPP2PPP/R1BQR1K1 b - - 3 11",
];

fn position(fen: &str) -> Chess {
    let fen: Fen = fen.parse().unwrap();
    fen.into_position(CastlingMode::Standard).unwrap()
}

#[test]
fn test_mirror_fen() {
    assert_eq!(
        mirror_fen("rnbqkb1r/pp1p1ppp/4pn2/2p5/2PP4/2N5/PP2PPPP/R1BQKBNR w KQkq c6 0 4"),
        "r1bqkbnr/pp2pppp/2n5/2pp4/2P5/4PN2/PP1P1PPP/RNBQKB1R b KQkq c3 0 4"
    );
}

#[test]
fn test_evaluation_is_colour_symmetric() {
    let weights = EvalWeights::default();
    for fen in SYMMETRY_FENS {
        let pos = position(fen);
        let mirrored = position(&mirror_fen(fen));
        assert_eq!(
            evaluate_white(&mirrored, &weights),
            -evaluate_white(&pos, &weights),
            "asymmetric evaluation for {fen}"
        );
        assert_eq!(evaluate(&mirrored, &weights), evaluate(&pos, &weights));
    }
}

#[test]
fn test_game_phase_starting_position() {
    let pos = Chess::default();
    assert_eq!(game_phase(pos.board()), 256);
}

#[test]
fn test_game_phase_endgame() {
    let pos = position("8/4k3/8/8/8/8/4K3/8 w - - 0 1");
    assert_eq!(game_phase(pos.board()), 0);
}

#[test]
fn test_game_phase_is_linear_between_thresholds() {
    // Queens off: 16 units of phase material.
    let pos = position("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1");
    assert_eq!(phase_material(pos.board()), 16);
    assert_eq!(game_phase(pos.board()), (16 - 6) * 256 / 12);
}

#[test]
fn test_taper_blends_components() {
    let score = Phased::new(100, 300);
    assert_eq!(score.taper(256), 100);
    assert_eq!(score.taper(0), 300);
    assert_eq!(score.taper(128), 200);
    assert_eq!((-score).taper(77), -score.taper(77));
}

#[test]
fn test_evaluate_starting_position() {
    // Both sides are identical, so only the side-to-move bonus remains.
    let weights = EvalWeights::default();
    assert_eq!(evaluate(&Chess::default(), &weights), weights.tempo_bonus);
}

#[test]
fn test_evaluate_white_advantage() {
    let pos = position("4k3/8/8/8/8/8/8/4K2Q w - - 0 1");
    let score = evaluate(&pos, &EvalWeights::default());
    assert!(score > 850);
}

#[test]
fn test_evaluate_black_advantage() {
    let pos = position("4k2q/8/8/8/8/8/8/4K3 w - - 0 1");
    let score = evaluate(&pos, &EvalWeights::default());
    assert!(score < -850);
}

#[test]
fn test_evaluate_black_advantage_black_to_move() {
    let pos = position("4k2q/8/8/8/8/8/8/4K3 b - - 0 1");
    let score = evaluate(&pos, &EvalWeights::default());
    assert!(score > 850);
}

#[test]
fn test_stalemate_is_exactly_zero() {
    // Black is a queen down but has no legal move.
    let pos = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(pos.is_stalemate());
    assert_eq!(evaluate(&pos, &EvalWeights::default()), 0);
    assert_eq!(evaluate_white(&pos, &EvalWeights::default()), 0);
}

#[test]
fn test_checkmate_scores_mate_for_the_mated_side() {
    let pos = position("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1");
    assert!(pos.is_checkmate());
    assert_eq!(evaluate(&pos, &EvalWeights::default()), -MATE_SCORE);
    assert_eq!(evaluate_white(&pos, &EvalWeights::default()), MATE_SCORE);
}

#[test]
fn test_insufficient_material_is_zero() {
    let weights = EvalWeights::default();
    assert_eq!(evaluate(&position("8/8/4k3/8/8/3K4/8/8 w - - 0 1"), &weights), 0);
    assert_eq!(evaluate(&position("8/8/4k3/8/8/3KN3/8/8 b - - 0 1"), &weights), 0);
}

#[test]
fn test_unstoppable_king_and_pawn_ending() {
    let weights = EvalWeights::default();
    let white_to_move = position("7k/8/8/P7/8/8/8/K7 w - - 0 1");
    let black_to_move = position("7k/8/8/P7/8/8/8/K7 b - - 0 1");
    assert!(evaluate(&white_to_move, &weights) > 500);
    assert!(evaluate_white(&black_to_move, &weights) > 500);
    assert!(evaluate(&black_to_move, &weights) < -500);
}

#[test]
fn test_passed_pawn_weight_scales_term() {
    let pos = position("7k/8/8/P7/8/8/8/K7 w - - 0 1");
    let full = evaluate(&pos, &EvalWeights::default());
    let none = evaluate(
        &pos,
        &EvalWeights {
            passed_pawn_weight: 0,
            ..Default::default()
        },
    );
    assert!(full - none > 600);
}

#[test]
fn test_tempo_bonus() {
    let weights = EvalWeights {
        tempo_bonus: 15,
        ..Default::default()
    };
    let no_tempo = EvalWeights {
        tempo_bonus: 0,
        ..Default::default()
    };
    for fen in SYMMETRY_FENS {
        let pos = position(fen);
        assert_eq!(evaluate(&pos, &weights), evaluate(&pos, &no_tempo) + 15);
    }
}

#[test]
fn test_rook_open_file() {
    let pos = parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    let score = rooks::evaluate(pos.board(), Color::White);
    assert_eq!(score, Phased::new(ROOK_OPEN_FILE_BONUS, ROOK_OPEN_FILE_BONUS / 2));
}

#[test]
fn test_rook_on_seventh_rank() {
    let pos = parse_fen("4k3/7R/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let score = rooks::evaluate(pos.board(), Color::White);
    assert_eq!(
        score,
        Phased::new(
            ROOK_OPEN_FILE_BONUS + SEVENTH_RANK_BONUS,
            ROOK_OPEN_FILE_BONUS / 2 + SEVENTH_RANK_BONUS
        )
    );
}

#[test]
fn test_rook_on_empty_seventh_rank() {
    // Enemy king has left the back rank and there are no pawns to eat.
    let pos = parse_fen("8/7R/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
    let score = rooks::evaluate(pos.board(), Color::White);
    assert_eq!(score.mg, ROOK_OPEN_FILE_BONUS);
}
