// src/game/search/quiescence.rs

use shakmaty::{Move, Position};

use super::alpha_beta::{Aborted, SearchContext};
use super::ordering::{self, OrderingTables};
use crate::constants::{MATE_SCORE, MAX_PLY, MAX_QUIESCENCE_PLY};
use crate::game::evaluation::see::see;
use crate::game::SearchPosition;

/// Captures and promotions worth looking at. En passant and promotions skip
/// the exchange check; everything else must not lose material on its square.
fn is_noisy_and_sound(pos: &SearchPosition, m: &Move) -> bool {
    if m.is_promotion() {
        return true;
    }
    if !m.is_capture() {
        return false;
    }
    if m.is_en_passant() {
        return true;
    }
    match m.from() {
        Some(from) => see(pos.chess().board(), from, m.to()) >= 0,
        None => false,
    }
}

/// Resolves captures at the horizon so that the static evaluation is only
/// taken in quiet positions.
///
/// The side to move may "stand pat" on the static score unless it is in check,
/// in which case every evasion is searched so mates are found.
pub fn search(
    ctx: &mut SearchContext,
    pos: &mut SearchPosition,
    ply: usize,
    qply: usize,
    mut alpha: i32,
    beta: i32,
) -> Result<i32, Aborted> {
    ctx.poll(ply)?;

    let legal = pos.chess().legal_moves();
    let in_check = pos.chess().is_check();
    if legal.is_empty() {
        return Ok(if in_check {
            -(MATE_SCORE - ply as i32)
        } else {
            0
        });
    }

    let standing_pat = ctx.evaluate(pos);
    if ply >= MAX_PLY - 1 || qply >= MAX_QUIESCENCE_PLY {
        return Ok(standing_pat);
    }

    if !in_check {
        if standing_pat >= beta {
            return Ok(beta);
        }
        if alpha < standing_pat {
            alpha = standing_pat;
        }
    }

    let candidates: Vec<Move> = if in_check {
        legal.to_vec()
    } else {
        legal
            .iter()
            .filter(|m| is_noisy_and_sound(pos, m))
            .copied()
            .collect()
    };
    let ordered = ordering::order_moves(&candidates, ply, None, &OrderingTables::NONE);

    for m in ordered {
        let score = {
            let mut child = pos.push(m);
            -search(ctx, &mut child, ply + 1, qply + 1, -beta, -alpha)?
        };
        if score >= beta {
            return Ok(beta);
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::search::alpha_beta::{SharedTables, INFINITY};
    use crate::game::search::history::HistoryTable;
    use crate::game::search::time::TimeManager;
    use crate::game::search::tt::TranspositionTable;
    use crate::game::search::SearchConfig;
    use crate::game::{parse_fen, to_fen};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    fn quiesce(fen: &str) -> (i32, i32) {
        let config = SearchConfig::default();
        let tt = TranspositionTable::new(1024);
        let history = HistoryTable::new();
        let stop = AtomicBool::new(false);
        let clock = TimeManager::new(Duration::from_secs(60), 0.5);
        let shared = SharedTables {
            tt: &tt,
            history: &history,
            stop: &stop,
            clock: &clock,
        };
        let mut ctx = SearchContext::new(&config, shared);
        let mut pos = SearchPosition::new(parse_fen(fen).unwrap());
        let score = search(&mut ctx, &mut pos, 0, 0, -INFINITY, INFINITY).unwrap();
        assert_eq!(to_fen(pos.chess()), fen);
        (score, ctx.evaluate(&pos))
    }

    #[test]
    fn test_wins_hanging_queen() {
        let (score, static_score) = quiesce("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1");
        assert!(static_score < -300);
        assert!(score > 300);
    }

    #[test]
    fn test_quiet_position_stands_pat() {
        let (score, static_score) = quiesce("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert_eq!(score, static_score);
    }

    #[test]
    fn test_skips_losing_capture() {
        // Rxd5 loses the rook to cxd5, so the static score stands.
        let (score, static_score) = quiesce("4k3/8/2p5/3p4/8/8/8/3RK3 w - - 0 1");
        assert_eq!(score, static_score);
    }

    #[test]
    fn test_check_evasions_find_mate() {
        // White is in check and every evasion runs out.
        let fen = "4k3/8/8/8/8/6b1/5q2/4K2r w - - 0 1";
        let pos = parse_fen(fen).unwrap();
        assert!(pos.is_checkmate());
        let (score, _) = quiesce(fen);
        assert_eq!(score, -MATE_SCORE);
    }
}
