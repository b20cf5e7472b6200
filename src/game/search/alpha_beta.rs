// src/game/search/alpha_beta.rs

use rand::rngs::StdRng;
use shakmaty::{Move, Position};
use std::sync::atomic::{AtomicBool, Ordering};

use super::history::{HistoryTable, KillerMoves};
use super::ordering::{self, OrderingTables};
use super::quiescence;
use super::time::TimeManager;
use super::tt::{score_from_tt, score_to_tt, Bound, TranspositionTable};
use super::SearchConfig;
use crate::constants::{MATE_SCORE, MAX_PLY, NODE_POLL_INTERVAL};
use crate::game::evaluation::static_eval;
use crate::game::SearchPosition;

/// Larger than any score a search can return.
pub const INFINITY: i32 = MATE_SCORE + 1;

/// The search ran out of budget or was told to stop. Carries no result: the
/// iteration it interrupted is thrown away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted;

/// Tables shared by every thread of one top-level search.
#[derive(Clone, Copy)]
pub struct SharedTables<'a> {
    pub tt: &'a TranspositionTable,
    pub history: &'a HistoryTable,
    pub stop: &'a AtomicBool,
    pub clock: &'a TimeManager,
}

/// Per-thread search state.
pub struct SearchContext<'a> {
    pub config: &'a SearchConfig,
    shared: SharedTables<'a>,
    pub killers: KillerMoves,
    pub nodes: u64,
    pub seldepth: usize,
    node_limit: Option<u64>,
    jitter: Option<StdRng>,
}

impl<'a> SearchContext<'a> {
    pub fn new(config: &'a SearchConfig, shared: SharedTables<'a>) -> Self {
        Self {
            config,
            shared,
            killers: KillerMoves::new(),
            nodes: 0,
            seldepth: 0,
            node_limit: config.max_nodes,
            jitter: None,
        }
    }

    /// A helper thread: no node limit of its own and a randomised move order.
    pub fn helper(config: &'a SearchConfig, shared: SharedTables<'a>, rng: StdRng) -> Self {
        Self {
            node_limit: None,
            jitter: Some(rng),
            ..Self::new(config, shared)
        }
    }

    pub fn shared(&self) -> SharedTables<'a> {
        self.shared
    }

    pub fn tt(&self) -> &'a TranspositionTable {
        self.shared.tt
    }

    pub fn node_budget_exhausted(&self) -> bool {
        self.node_limit.is_some_and(|limit| self.nodes >= limit)
    }

    /// Counts a node and checks whether the search must stop. The node
    /// budget is checked on every node, the clock only every
    /// [`NODE_POLL_INTERVAL`] nodes.
    pub(super) fn poll(&mut self, ply: usize) -> Result<(), Aborted> {
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply);
        if self.shared.stop.load(Ordering::Relaxed) {
            return Err(Aborted);
        }
        if self.node_budget_exhausted()
            || (self.nodes % NODE_POLL_INTERVAL == 0 && self.shared.clock.hard_limit_reached())
        {
            self.shared.stop.store(true, Ordering::Relaxed);
            return Err(Aborted);
        }
        Ok(())
    }

    pub(super) fn evaluate(&self, pos: &SearchPosition) -> i32 {
        static_eval(pos.chess(), &self.config.eval_weights)
    }

    fn order(&mut self, moves: &[Move], ply: usize, hash_move: Option<Move>) -> Vec<Move> {
        let tables = OrderingTables {
            killers: self.config.use_killer_moves.then_some(&self.killers),
            history: self
                .config
                .use_history_heuristic
                .then_some(self.shared.history),
        };
        match self.jitter.as_mut() {
            Some(rng) => ordering::order_moves_jittered(moves, ply, hash_move, &tables, rng),
            None => ordering::order_moves(moves, ply, hash_move, &tables),
        }
    }

    fn hash_move(&self, hash: u64, legal: &[Move]) -> Option<Move> {
        if !self.config.use_transposition_table {
            return None;
        }
        self.shared
            .tt
            .probe(hash)
            .and_then(|entry| entry.best_move)
            .and_then(|packed| packed.resolve(legal))
    }

    fn record_cutoff(&mut self, m: Move, ply: usize, depth: u8) {
        if m.is_capture() || m.is_promotion() {
            return;
        }
        if self.config.use_killer_moves {
            self.killers.record(ply, m);
        }
        if self.config.use_history_heuristic {
            self.shared.history.update(&m, depth);
        }
    }

    /// Searches every root move to `depth` with a full window and returns the
    /// best score and move. Root draws by repetition are not scored, so a move
    /// is always produced when one exists.
    pub fn search_root(
        &mut self,
        root: &mut SearchPosition,
        depth: u8,
    ) -> Result<(i32, Option<Move>), Aborted> {
        self.poll(0)?;
        let legal = root.chess().legal_moves();
        let hash = root.hash();
        let hash_move = self.hash_move(hash, &legal);
        let ordered = self.order(&legal, 0, hash_move);

        let mut alpha = -INFINITY;
        let mut best_score = -INFINITY;
        let mut best_move = None;
        for m in ordered {
            let score = {
                let mut child = root.push(m);
                -self.search(&mut child, depth.saturating_sub(1), 1, -INFINITY, -alpha)?
            };
            if score > best_score {
                best_score = score;
                best_move = Some(m);
            }
            alpha = alpha.max(score);
        }

        if best_move.is_some() && self.config.use_transposition_table {
            self.shared
                .tt
                .store(hash, depth, score_to_tt(best_score, 0), Bound::Exact, best_move);
        }
        Ok((best_score, best_move))
    }

    /// Negamax alpha-beta. Scores are from the side to move's point of view;
    /// the position is unchanged on return, whether `Ok` or `Err`.
    pub fn search(
        &mut self,
        pos: &mut SearchPosition,
        depth: u8,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, Aborted> {
        self.poll(ply)?;

        let legal = pos.chess().legal_moves();
        if legal.is_empty() {
            return Ok(if pos.chess().is_check() {
                -(MATE_SCORE - ply as i32)
            } else {
                0
            });
        }
        if pos.is_rule_draw() || pos.chess().is_insufficient_material() {
            return Ok(0);
        }
        if ply >= MAX_PLY - 1 {
            return Ok(self.evaluate(pos));
        }
        if depth == 0 {
            return if self.config.use_quiescence_search {
                quiescence::search(self, pos, ply, 0, alpha, beta)
            } else {
                Ok(self.evaluate(pos))
            };
        }

        let hash = pos.hash();
        let mut hash_move = None;
        if self.config.use_transposition_table {
            if let Some(entry) = self.shared.tt.probe(hash) {
                hash_move = entry.best_move.and_then(|packed| packed.resolve(&legal));
                if entry.depth >= depth {
                    let score = score_from_tt(entry.score, ply);
                    match entry.bound {
                        Bound::Exact => return Ok(score),
                        Bound::Lower if score >= beta => return Ok(score),
                        Bound::Upper if score <= alpha => return Ok(score),
                        _ => {}
                    }
                }
            }
        }

        let original_alpha = alpha;
        let ordered = self.order(&legal, ply, hash_move);
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for m in ordered {
            let score = {
                let mut child = pos.push(m);
                -self.search(&mut child, depth - 1, ply + 1, -beta, -alpha)?
            };
            if score > best_score {
                best_score = score;
                best_move = Some(m);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                self.record_cutoff(m, ply, depth);
                break;
            }
        }

        if self.config.use_transposition_table {
            let bound = if best_score >= beta {
                Bound::Lower
            } else if best_score <= original_alpha {
                Bound::Upper
            } else {
                Bound::Exact
            };
            self.shared
                .tt
                .store(hash, depth, score_to_tt(best_score, ply), bound, best_move);
        }
        Ok(best_score)
    }
}
