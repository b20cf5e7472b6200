// src/game/search/iterative_deepening.rs

use shakmaty::{Move, Position};
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::alpha_beta::{SearchContext, SharedTables};
use super::history::HistoryTable;
use super::lazy_smp;
use super::time::TimeManager;
use super::tt::TranspositionTable;
use super::{SearchConfig, SearchOutcome};
use crate::constants::{MATE_BOUND, MATE_SCORE};
use crate::game::{format_move, SearchPosition};

/// Walks hash moves from the root. Stops at the first missing or illegal
/// move, or when a position repeats.
pub fn principal_variation(tt: &TranspositionTable, root: &SearchPosition, max_len: usize) -> Vec<Move> {
    let mut pos = root.clone();
    let mut pv = Vec::new();
    let mut seen = vec![pos.hash()];
    while pv.len() < max_len {
        let Some(packed) = tt.probe(pos.hash()).and_then(|entry| entry.best_move) else {
            break;
        };
        let legal = pos.chess().legal_moves();
        let Some(m) = packed.resolve(&legal) else {
            break;
        };
        pos.play(m);
        pv.push(m);
        if seen.contains(&pos.hash()) {
            break;
        }
        seen.push(pos.hash());
    }
    pv
}

fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(|m| format_move(*m)).collect::<Vec<_>>().join(" ")
}

/// Runs iterations `start_depth..=max_depth` on one thread and returns the
/// result of the deepest one that finished.
///
/// Killers are reset before every iteration; history and the transposition
/// table carry over. The best move starts out as the first legal move so
/// something is always returned.
pub fn deepen(
    ctx: &mut SearchContext,
    root: &mut SearchPosition,
    start_depth: u8,
    report: &mut dyn FnMut(&SearchOutcome),
) -> SearchOutcome {
    let clock = ctx.shared().clock;
    let mut outcome = SearchOutcome {
        best_move: root.chess().legal_moves().first().copied(),
        ..Default::default()
    };
    let mut last_iteration = Duration::ZERO;

    for depth in start_depth.max(1)..=ctx.config.max_depth {
        if outcome.depth > 0 && !clock.should_continue(last_iteration) {
            debug!(depth, "not enough time for another iteration");
            break;
        }
        ctx.killers.clear();
        let iteration_start = Instant::now();

        let Ok((score, best_move)) = ctx.search_root(root, depth) else {
            debug!(depth, nodes = ctx.nodes, "iteration aborted");
            break;
        };
        last_iteration = iteration_start.elapsed();

        outcome.best_move = best_move.or(outcome.best_move);
        outcome.score = score;
        outcome.depth = depth;
        outcome.seldepth = ctx.seldepth;
        outcome.nodes = ctx.nodes;
        outcome.elapsed = clock.elapsed();
        outcome.pv = principal_variation(ctx.tt(), root, usize::from(depth));
        if outcome.pv.first() != outcome.best_move.as_ref() {
            outcome.pv = outcome.best_move.into_iter().collect();
        }
        report(&outcome);

        if score.abs() > MATE_BOUND {
            debug!(depth, score, "mate found");
            break;
        }
        if ctx.node_budget_exhausted() {
            break;
        }
    }

    outcome.nodes = ctx.nodes;
    outcome.elapsed = clock.elapsed();
    outcome
}

/// Chooses a move for `root` under `config`, reusing `tt`.
pub fn search(
    root: &SearchPosition,
    config: &SearchConfig,
    tt: &TranspositionTable,
    report: &mut dyn FnMut(&SearchOutcome),
) -> SearchOutcome {
    let clock = TimeManager::new(config.time_limit(), config.soft_time_ratio);
    let legal = root.chess().legal_moves();

    match legal.len() {
        0 => {
            let score = if root.chess().is_check() {
                -MATE_SCORE
            } else {
                0
            };
            debug!(score, "no legal moves");
            return SearchOutcome {
                score,
                elapsed: clock.elapsed(),
                ..Default::default()
            };
        }
        1 => {
            debug!("only one legal move");
            return SearchOutcome {
                best_move: Some(legal[0]),
                pv: vec![legal[0]],
                elapsed: clock.elapsed(),
                ..Default::default()
            };
        }
        _ => {}
    }

    tt.new_search();
    let history = HistoryTable::new();
    let stop = AtomicBool::new(false);
    let shared = SharedTables {
        tt,
        history: &history,
        stop: &stop,
        clock: &clock,
    };

    let threads = config.threads();
    let outcome = if threads > 1 {
        lazy_smp::search(root, config, shared, threads, report)
    } else {
        let mut ctx = SearchContext::new(config, shared);
        let mut pos = root.clone();
        deepen(&mut ctx, &mut pos, 1, report)
    };

    debug_assert!(outcome.best_move.is_some(), "legal moves existed but no move was chosen");
    info!(
        best_move = %outcome.best_move.map(format_move).unwrap_or_default(),
        score = outcome.score,
        depth = outcome.depth,
        nodes = outcome.nodes,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        pv = %format_pv(&outcome.pv),
        "search finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{parse_fen, parse_move, to_fen};

    fn config(depth: u8) -> SearchConfig {
        SearchConfig {
            max_depth: depth,
            max_time_seconds: 60.0,
            transposition_table_capacity: 1 << 16,
            ..Default::default()
        }
    }

    fn run(fen: &str, config: &SearchConfig) -> (SearchOutcome, Vec<u8>) {
        let root = SearchPosition::new(parse_fen(fen).unwrap());
        let tt = TranspositionTable::new(config.transposition_table_capacity);
        let mut depths = Vec::new();
        let outcome = search(&root, config, &tt, &mut |o| depths.push(o.depth));
        (outcome, depths)
    }

    #[test]
    fn test_reports_every_completed_depth() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let (outcome, depths) = run(fen, &config(3));
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(outcome.depth, 3);
        assert!(outcome.nodes > 0);
        assert!(!outcome.pv.is_empty());
        assert_eq!(outcome.pv.first(), outcome.best_move.as_ref());
    }

    #[test]
    fn test_single_legal_move_returns_immediately() {
        // The rook on f2 leaves the king only g1.
        let fen = "7k/8/8/8/8/8/5r2/7K w - - 0 1";
        let pos = parse_fen(fen).unwrap();
        assert_eq!(pos.legal_moves().len(), 1);
        let (outcome, depths) = run(fen, &config(6));
        assert_eq!(outcome.best_move.map(format_move).as_deref(), Some("h1g1"));
        assert_eq!(outcome.nodes, 0);
        assert_eq!(outcome.depth, 0);
        assert!(depths.is_empty());
    }

    #[test]
    fn test_no_legal_moves() {
        let (mated, _) = run("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1", &config(4));
        assert_eq!(mated.best_move, None);
        assert_eq!(mated.score, -MATE_SCORE);

        let (stalemate, _) = run("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &config(4));
        assert_eq!(stalemate.best_move, None);
        assert_eq!(stalemate.score, 0);
    }

    #[test]
    fn test_stops_after_mate_is_proven() {
        let (outcome, depths) = run("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", &config(8));
        assert_eq!(outcome.best_move.map(format_move).as_deref(), Some("a1a8"));
        assert!(outcome.is_mate());
        assert_eq!(outcome.mate_in(), Some(1));
        assert!(depths.len() < 8);
    }

    #[test]
    fn test_node_budget_falls_back_to_completed_depth() {
        let cfg = SearchConfig {
            max_nodes: Some(2_048),
            ..config(20)
        };
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let (outcome, _) = run(fen, &cfg);
        assert!(outcome.depth >= 1);
        assert!(outcome.depth < 20);
        let pos = parse_fen(fen).unwrap();
        assert!(pos.legal_moves().contains(&outcome.best_move.unwrap()));
    }

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn test_unfinished_first_iteration_returns_first_legal_move() {
        let cfg = config(6);
        let mut root = SearchPosition::new(parse_fen(KIWIPETE).unwrap());
        let first = root.chess().legal_moves().first().copied();
        let tt = TranspositionTable::new(1 << 16);
        let history = HistoryTable::new();
        let stop = AtomicBool::new(true);
        let clock = TimeManager::new(cfg.time_limit(), cfg.soft_time_ratio);
        let shared = SharedTables {
            tt: &tt,
            history: &history,
            stop: &stop,
            clock: &clock,
        };
        let mut ctx = SearchContext::new(&cfg, shared);
        let mut reports = 0;
        let outcome = deepen(&mut ctx, &mut root, 1, &mut |_| reports += 1);

        assert_eq!(outcome.depth, 0);
        assert_eq!(outcome.best_move, first);
        assert!(first.is_some());
        assert_eq!(reports, 0);
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn test_one_node_budget_returns_first_legal_move() {
        let cfg = SearchConfig {
            max_nodes: Some(1),
            ..config(6)
        };
        let (outcome, depths) = run(KIWIPETE, &cfg);
        let pos = parse_fen(KIWIPETE).unwrap();
        assert_eq!(outcome.depth, 0);
        assert_eq!(outcome.best_move, pos.legal_moves().first().copied());
        assert_eq!(outcome.nodes, 1);
        assert!(depths.is_empty());
    }

    #[test]
    fn test_principal_variation_is_legal() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let (outcome, _) = run(fen, &config(4));
        let mut pos = parse_fen(fen).unwrap();
        for m in &outcome.pv {
            assert!(pos.legal_moves().contains(m));
            pos.play_unchecked(*m);
        }
        assert!(outcome.pv.len() <= 4);
    }

    #[test]
    fn test_avoids_repeating_when_winning() {
        // White is a queen up; the knight shuffle already repeated the position once.
        let mut root = SearchPosition::new(parse_fen("4k3/8/8/8/8/8/8/3QK1N1 w - - 0 1").unwrap());
        for uci in ["g1f3", "e8f7", "f3g1", "f7e8"] {
            let m = parse_move(root.chess(), uci).unwrap();
            root.play(m);
        }
        let cfg = config(3);
        let tt = TranspositionTable::new(1 << 16);
        let outcome = search(&root, &cfg, &tt, &mut |_| {});
        assert!(outcome.score > 500);
        assert_eq!(to_fen(root.chess()), "4k3/8/8/8/8/8/8/3QK1N1 w - - 4 3");
    }
}
