// src/game/search/ordering.rs

use rand::rngs::StdRng;
use rand::Rng;
use shakmaty::{Move, Role};

use super::history::{HistoryTable, KillerMoves};
use crate::game::evaluation::get_piece_value;

const HASH_MOVE_SCORE: i32 = 10_000_000;
const PROMOTION_SCORE: i32 = 5_000_000;
const CAPTURE_SCORE: i32 = 1_000_000;
const KILLER_SCORES: [i32; 2] = [900_000, 800_000];
/// Quiet moves never outrank killers, however good their history.
const MAX_HISTORY_SCORE: i32 = 700_000;

/// Read-only view of the tables move ordering draws on.
pub struct OrderingTables<'a> {
    pub killers: Option<&'a KillerMoves>,
    pub history: Option<&'a HistoryTable>,
}

impl OrderingTables<'static> {
    pub const NONE: Self = OrderingTables {
        killers: None,
        history: None,
    };
}

/// Most valuable victim, least valuable attacker.
pub fn mvv_lva(m: &Move) -> i32 {
    let victim = m.capture().map_or(0, get_piece_value);
    let attacker = match m.role() {
        Role::King => get_piece_value(Role::Queen) + 100,
        role => get_piece_value(role),
    };
    10 * victim - attacker
}

/// Ordering score for a single move. Higher is searched earlier.
pub fn score_move(m: &Move, ply: usize, hash_move: Option<&Move>, tables: &OrderingTables) -> i32 {
    if hash_move == Some(m) {
        return HASH_MOVE_SCORE;
    }
    if let Some(promotion) = m.promotion() {
        let capture_bonus = if m.is_capture() { mvv_lva(m) } else { 0 };
        return PROMOTION_SCORE + 10 * get_piece_value(promotion) + capture_bonus;
    }
    if m.is_capture() {
        return CAPTURE_SCORE + mvv_lva(m);
    }
    if let Some(rank) = tables.killers.and_then(|k| k.rank(ply, m)) {
        return KILLER_SCORES[rank];
    }
    tables
        .history
        .map_or(0, |h| h.get_score(m).min(MAX_HISTORY_SCORE))
}

/// Sorts `moves` best first. The sort is stable, so equally scored moves stay
/// in generator order.
pub fn order_moves(
    moves: &[Move],
    ply: usize,
    hash_move: Option<Move>,
    tables: &OrderingTables,
) -> Vec<Move> {
    let mut scored: Vec<(i32, Move)> = moves
        .iter()
        .map(|m| (score_move(m, ply, hash_move.as_ref(), tables), *m))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, m)| m).collect()
}

/// Like [`order_moves`], but quiet moves get a little random noise so that
/// helper threads explore the tree in a different order.
pub fn order_moves_jittered(
    moves: &[Move],
    ply: usize,
    hash_move: Option<Move>,
    tables: &OrderingTables,
    rng: &mut StdRng,
) -> Vec<Move> {
    let mut scored: Vec<(i32, Move)> = moves
        .iter()
        .map(|m| {
            let mut score = score_move(m, ply, hash_move.as_ref(), tables);
            if score < KILLER_SCORES[1] {
                score += rng.gen_range(0..64);
            }
            (score, *m)
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, m)| m).collect()
}
