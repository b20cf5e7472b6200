// src/game/search/mcts.rs

use shakmaty::{Move, Position};
use tracing::info;

use super::predictor::MovePredictor;
use super::time::TimeManager;
use super::{SearchConfig, SearchOutcome, Searcher};
use crate::constants::{MATE_SCORE, MAX_EVAL};
use crate::game::{format_move, SearchPosition};

const DEFAULT_C_PUCT: f64 = 1.0;
/// The clock is read once per this many simulations.
const TIME_CHECK_INTERVAL: u32 = 64;
/// Inverse of the predictor's squashing, for reporting a centipawn score.
const VALUE_SCALE: f64 = 400.0;

/// Values are from the point of view of the side that made the move leading
/// to the node, so a parent simply picks the child with the highest value.
#[derive(Clone, Debug)]
struct Node {
    visits: u32,
    value_sum: f64,
    prior: f64,
    parent: Option<usize>,
    children: Vec<(Move, usize)>,
    expanded: bool,
    /// Exact value once the node is known to end the game.
    terminal: Option<f64>,
}

impl Node {
    fn new(parent: Option<usize>, prior: f64) -> Self {
        Self {
            visits: 0,
            value_sum: 0.0,
            prior,
            parent,
            children: Vec::new(),
            expanded: false,
            terminal: None,
        }
    }

    fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / f64::from(self.visits)
        }
    }

    fn is_proven_win(&self) -> bool {
        self.terminal == Some(1.0)
    }
}

/// Monte Carlo tree search guided by a [`MovePredictor`].
///
/// The tree is an arena: nodes live in one `Vec` and refer to each other by
/// index. Children are kept in generator order, which also breaks ties.
pub struct MctsSearcher {
    predictor: Box<dyn MovePredictor>,
    c_puct: f64,
    tree: Vec<Node>,
}

impl MctsSearcher {
    pub fn new(predictor: Box<dyn MovePredictor>) -> Self {
        Self {
            predictor,
            c_puct: DEFAULT_C_PUCT,
            tree: Vec::new(),
        }
    }

    pub fn with_exploration(mut self, c_puct: f64) -> Self {
        self.c_puct = c_puct;
        self
    }

    fn reset(&mut self) {
        self.tree.clear();
        self.tree.push(Node::new(None, 1.0));
    }

    fn puct_value(&self, parent_index: usize, child_index: usize) -> f64 {
        let parent = &self.tree[parent_index];
        let child = &self.tree[child_index];
        let exploration =
            self.c_puct * child.prior * f64::from(parent.visits).sqrt() / (1.0 + f64::from(child.visits));
        child.mean_value() + exploration
    }

    fn select_child(&self, node_index: usize) -> Option<(Move, usize)> {
        let children = &self.tree[node_index].children;
        if let Some(&winning) = children.iter().find(|(_, c)| self.tree[*c].is_proven_win()) {
            return Some(winning);
        }
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for &(m, child) in children {
            let value = self.puct_value(node_index, child);
            if value > best_value {
                best_value = value;
                best = Some((m, child));
            }
        }
        best
    }

    /// Walks down from the root to a node that is not expanded yet.
    fn select(&self, root: &SearchPosition) -> (usize, SearchPosition) {
        let mut node_index = 0;
        let mut pos = root.clone();
        while self.tree[node_index].expanded && self.tree[node_index].terminal.is_none() {
            let Some((m, child)) = self.select_child(node_index) else {
                break;
            };
            pos.play(m);
            node_index = child;
        }
        (node_index, pos)
    }

    /// Expands a leaf and returns its value for the side that moved into it.
    fn expand(&mut self, node_index: usize, pos: &SearchPosition) -> f64 {
        if let Some(value) = self.tree[node_index].terminal {
            return value;
        }
        if self.tree[node_index].expanded {
            return self.tree[node_index].mean_value();
        }

        let chess = pos.chess();
        let legal_count = chess.legal_moves().len();
        if legal_count == 0 {
            let value = if chess.is_check() { 1.0 } else { 0.0 };
            self.tree[node_index].terminal = Some(value);
            return value;
        }
        if node_index != 0 && (pos.is_rule_draw() || chess.is_insufficient_material()) {
            self.tree[node_index].terminal = Some(0.0);
            return 0.0;
        }

        let prediction = self.predictor.predict(chess);
        let priors = if prediction.priors.is_empty() {
            let uniform = 1.0 / legal_count as f32;
            chess.legal_moves().iter().map(|m| (*m, uniform)).collect()
        } else {
            prediction.priors
        };
        for (m, prior) in priors {
            let mut child_pos = chess.clone();
            child_pos.play_unchecked(m);
            let mut child = Node::new(Some(node_index), f64::from(prior));
            if child_pos.is_check() && child_pos.is_checkmate() {
                child.terminal = Some(1.0);
            }
            let child_index = self.tree.len();
            self.tree.push(child);
            self.tree[node_index].children.push((m, child_index));
        }
        self.tree[node_index].expanded = true;
        -f64::from(prediction.value)
    }

    fn backpropagate(&mut self, start_node_index: usize, mut value: f64) {
        let mut current_index = Some(start_node_index);
        while let Some(index) = current_index {
            self.tree[index].visits += 1;
            self.tree[index].value_sum += value;
            value = -value;
            current_index = self.tree[index].parent;
        }
    }

    /// A proven win if there is one, else the most visited child.
    fn best_child(&self, node_index: usize) -> Option<(Move, usize)> {
        let children = &self.tree[node_index].children;
        if let Some(&winning) = children.iter().find(|(_, c)| self.tree[*c].is_proven_win()) {
            return Some(winning);
        }
        let mut best: Option<(Move, usize)> = None;
        for &(m, child) in children {
            let better = match best {
                None => true,
                Some((_, b)) => self.tree[child].visits > self.tree[b].visits,
            };
            if better {
                best = Some((m, child));
            }
        }
        best
    }

    fn principal_variation(&self) -> Vec<Move> {
        let mut pv = Vec::new();
        let mut node_index = 0;
        while let Some((m, child)) = self.best_child(node_index) {
            if self.tree[child].visits == 0 && !self.tree[child].is_proven_win() {
                break;
            }
            pv.push(m);
            node_index = child;
        }
        pv
    }

    fn score(&self, child_index: usize) -> i32 {
        let child = &self.tree[child_index];
        if child.is_proven_win() {
            return MATE_SCORE - 1;
        }
        let q = child.mean_value().clamp(-0.999, 0.999);
        ((VALUE_SCALE * q.atanh()) as i32).clamp(-MAX_EVAL, MAX_EVAL)
    }
}

impl Searcher for MctsSearcher {
    fn search(
        &mut self,
        root: &SearchPosition,
        config: &SearchConfig,
        report: &mut dyn FnMut(&SearchOutcome),
    ) -> SearchOutcome {
        let clock = TimeManager::new(config.time_limit(), config.soft_time_ratio);
        let legal = root.chess().legal_moves();
        match legal.len() {
            0 => {
                return SearchOutcome {
                    score: if root.chess().is_check() { -MATE_SCORE } else { 0 },
                    ..Default::default()
                }
            }
            1 => {
                return SearchOutcome {
                    best_move: Some(legal[0]),
                    pv: vec![legal[0]],
                    ..Default::default()
                }
            }
            _ => {}
        }

        self.reset();
        let mut simulations = 0;
        while simulations < config.mcts_simulations {
            if simulations > 0 && simulations % TIME_CHECK_INTERVAL == 0 && clock.hard_limit_reached() {
                break;
            }
            let (leaf, pos) = self.select(root);
            let value = self.expand(leaf, &pos);
            self.backpropagate(leaf, value);
            simulations += 1;

            if self.best_child(0).is_some_and(|(_, c)| self.tree[c].is_proven_win()) {
                break;
            }
        }

        let pv = self.principal_variation();
        let best = self.best_child(0);
        let outcome = SearchOutcome {
            best_move: best.map(|(m, _)| m).or_else(|| legal.first().copied()),
            score: best.map_or(0, |(_, c)| self.score(c)),
            depth: pv.len().min(usize::from(u8::MAX)) as u8,
            seldepth: pv.len(),
            nodes: u64::from(simulations),
            elapsed: clock.elapsed(),
            pv,
        };
        report(&outcome);
        info!(
            best_move = %outcome.best_move.map(format_move).unwrap_or_default(),
            score = outcome.score,
            simulations,
            tree_size = self.tree.len(),
            "mcts finished"
        );
        outcome
    }

    fn new_game(&mut self) {
        self.tree.clear();
    }
}
