use rust_chess_engine::constants::MATE_BOUND;
use rust_chess_engine::game::to_fen;
use rust_chess_engine::{
    find_best_move, format_move, parse_fen, Engine, SearchAlgorithm, SearchConfig, SearchPosition,
};
use shakmaty::{Chess, Position};
use std::time::Duration;

const ITALIAN: &str = "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn config(depth: u8) -> SearchConfig {
    SearchConfig {
        max_depth: depth,
        max_time_seconds: 60.0,
        transposition_table_capacity: 1 << 18,
        ..Default::default()
    }
}

fn best_uci(fen: &str, config: &SearchConfig) -> Option<String> {
    let pos = parse_fen(fen).unwrap();
    find_best_move(&pos, config).unwrap().best_move.map(format_move)
}

#[test]
fn start_position_depth_four_plays_a_legal_move() {
    let pos = Chess::default();
    let cfg = config(4);
    let outcome = find_best_move(&pos, &cfg).unwrap();
    let best = outcome.best_move.unwrap();
    assert!(pos.legal_moves().contains(&best));
    assert_eq!(outcome.depth, 4);
    assert!(outcome.elapsed < Duration::from_secs(60));
}

#[test]
fn mate_in_one_is_found_with_a_mate_score() {
    for depth in [2, 4] {
        let pos = parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let outcome = find_best_move(&pos, &config(depth)).unwrap();
        assert_eq!(outcome.best_move.map(format_move).as_deref(), Some("a1a8"));
        assert!(outcome.score > MATE_BOUND);
        assert_eq!(outcome.mate_in(), Some(1));
    }
}

#[test]
fn single_legal_move_skips_the_search() {
    let outcome = find_best_move(&parse_fen("7k/8/8/8/8/8/5r2/7K w - - 0 1").unwrap(), &config(8)).unwrap();
    assert_eq!(outcome.best_move.map(format_move).as_deref(), Some("h1g1"));
    assert_eq!(outcome.nodes, 0);
}

#[test]
fn unstoppable_pawn_is_scored_for_its_owner() {
    let white = find_best_move(&parse_fen("7k/8/8/P7/8/8/8/K7 w - - 0 1").unwrap(), &config(4)).unwrap();
    assert!(white.score > 500);

    let black = find_best_move(&parse_fen("k7/8/8/8/p7/8/8/7K b - - 0 1").unwrap(), &config(4)).unwrap();
    assert!(black.score > 500);
}

#[test]
fn repeated_searches_are_deterministic() {
    let cfg = config(4);
    let pos = parse_fen(ITALIAN).unwrap();
    let first = find_best_move(&pos, &cfg).unwrap();
    let second = find_best_move(&pos, &cfg).unwrap();
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert_eq!(first.nodes, second.nodes);
}

#[test]
fn disabling_the_transposition_table_keeps_the_move() {
    let with_tt = config(3);
    let without_tt = SearchConfig {
        use_transposition_table: false,
        ..config(3)
    };
    let pos = parse_fen(ITALIAN).unwrap();
    let on = find_best_move(&pos, &with_tt).unwrap();
    let off = find_best_move(&pos, &without_tt).unwrap();
    assert!(on.best_move.is_some());
    assert_eq!(on.best_move, off.best_move);
}

#[test]
fn stripped_down_search_still_plays_legal_moves() {
    let cfg = SearchConfig {
        use_quiescence_search: false,
        use_killer_moves: false,
        use_history_heuristic: false,
        ..config(3)
    };
    let pos = parse_fen(ITALIAN).unwrap();
    let outcome = find_best_move(&pos, &cfg).unwrap();
    assert!(pos.legal_moves().contains(&outcome.best_move.unwrap()));
}

#[test]
fn engine_leaves_the_root_untouched_across_searches() {
    let mut engine = Engine::new(config(3)).unwrap();
    let mut root = SearchPosition::from_fen(ITALIAN).unwrap();
    for _ in 0..3 {
        let before_fen = to_fen(root.chess());
        let before_hash = root.hash();
        let outcome = engine.find_best_move(&root);
        assert_eq!(to_fen(root.chess()), before_fen);
        assert_eq!(root.hash(), before_hash);
        assert_eq!(root.depth(), 0);

        let best = outcome.best_move.unwrap();
        assert!(root.chess().legal_moves().contains(&best));
        root.play(best);
    }
}

#[test]
fn every_depth_returns_a_legal_move() {
    let pos = parse_fen(ITALIAN).unwrap();
    for depth in 1..=4 {
        let outcome = find_best_move(&pos, &config(depth)).unwrap();
        assert!(pos.legal_moves().contains(&outcome.best_move.unwrap()));
    }
}

#[test]
fn lazy_smp_returns_a_legal_move() {
    let cfg = SearchConfig {
        num_threads: 3,
        ..config(4)
    };
    let pos = parse_fen(ITALIAN).unwrap();
    let outcome = find_best_move(&pos, &cfg).unwrap();
    assert!(pos.legal_moves().contains(&outcome.best_move.unwrap()));
}

#[test]
fn mcts_finds_mate_in_one() {
    let cfg = SearchConfig {
        search_algorithm: SearchAlgorithm::Mcts,
        mcts_simulations: 200,
        ..config(4)
    };
    assert_eq!(
        best_uci("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", &cfg).as_deref(),
        Some("a1a8")
    );
}

#[test]
fn terminal_positions_have_no_move() {
    let mated = find_best_move(&parse_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap(), &config(3)).unwrap();
    assert_eq!(mated.best_move, None);
    assert!(mated.score < -MATE_BOUND);

    let stalemate = find_best_move(&parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap(), &config(3)).unwrap();
    assert_eq!(stalemate.best_move, None);
    assert_eq!(stalemate.score, 0);
}
