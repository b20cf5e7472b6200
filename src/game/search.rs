// src/game/search.rs

pub mod alpha_beta;
pub mod history;
pub mod iterative_deepening;
pub mod lazy_smp;
pub mod mcts;
pub mod ordering;
pub mod predictor;
pub mod quiescence;
pub mod time;
pub mod tt;

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move};
use std::time::Duration;

use crate::constants::{MATE_BOUND, MATE_SCORE};
use crate::error::{ConfigError, EngineError};
use crate::game::evaluation::EvalWeights;
use crate::game::SearchPosition;
use mcts::MctsSearcher;
use predictor::EvaluationPredictor;
use tt::TranspositionTable;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SearchAlgorithm {
    #[default]
    AlphaBeta,
    Mcts,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub max_time_seconds: f64,
    pub transposition_table_capacity: usize,
    /// 0 means one thread per logical core.
    pub num_threads: usize,
    pub max_nodes: Option<u64>,
    /// Fraction of the time limit after which no new depth is started unless
    /// it is expected to finish in time.
    pub soft_time_ratio: f64,
    pub search_algorithm: SearchAlgorithm,
    pub mcts_simulations: u32,
    pub use_transposition_table: bool,
    pub use_quiescence_search: bool,
    pub use_killer_moves: bool,
    pub use_history_heuristic: bool,
    pub eval_weights: EvalWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_time_seconds: 5.0,
            transposition_table_capacity: 1 << 20,
            num_threads: 1,
            max_nodes: None,
            soft_time_ratio: 0.5,
            search_algorithm: SearchAlgorithm::AlphaBeta,
            mcts_simulations: 800,
            use_transposition_table: true,
            use_quiescence_search: true,
            use_killer_moves: true,
            use_history_heuristic: true,
            eval_weights: EvalWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Rejects settings the search cannot honour. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        let representable = Duration::try_from_secs_f64(self.max_time_seconds).is_ok();
        if !representable || self.max_time_seconds <= 0.0 {
            return Err(ConfigError::InvalidTimeLimit {
                seconds: self.max_time_seconds,
            });
        }
        if self.transposition_table_capacity == 0 {
            return Err(ConfigError::ZeroTableCapacity);
        }
        if self.mcts_simulations == 0 {
            return Err(ConfigError::ZeroSimulations);
        }
        if !(self.soft_time_ratio > 0.0 && self.soft_time_ratio <= 1.0) {
            return Err(ConfigError::InvalidSoftRatio {
                ratio: self.soft_time_ratio,
            });
        }
        Ok(())
    }

    pub fn threads(&self) -> usize {
        match self.num_threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }

    /// Limits too large for a `Duration` saturate; `validate` rejects them.
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_time_seconds).unwrap_or(Duration::MAX)
    }
}

/// Result of one top-level search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchOutcome {
    /// `None` only when the side to move has no legal move.
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest fully completed iteration; 0 if none completed.
    pub depth: u8,
    pub seldepth: usize,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

impl SearchOutcome {
    pub fn is_mate(&self) -> bool {
        self.score.abs() > MATE_BOUND
    }

    /// Moves until mate in UCI convention: positive if the side to move
    /// mates, negative if it gets mated.
    pub fn mate_in(&self) -> Option<i32> {
        if !self.is_mate() {
            return None;
        }
        let plies = MATE_SCORE - self.score.abs();
        let moves = (plies + 1) / 2;
        Some(if self.score > 0 { moves } else { -moves })
    }
}

/// A move-selection strategy.
///
/// `report` is called after each completed iteration (alpha-beta) or at the
/// end (MCTS) with the best result so far.
pub trait Searcher: Send {
    fn search(
        &mut self,
        root: &SearchPosition,
        config: &SearchConfig,
        report: &mut dyn FnMut(&SearchOutcome),
    ) -> SearchOutcome;

    /// Forgets everything learned from earlier searches.
    fn new_game(&mut self) {}

    /// Permille of the hash table in use, if the searcher has one.
    fn hashfull(&self) -> Option<u32> {
        None
    }
}

/// Iterative-deepening alpha-beta over a transposition table that outlives
/// single searches.
pub struct AlphaBetaSearcher {
    tt: TranspositionTable,
}

impl AlphaBetaSearcher {
    pub fn new(tt_capacity: usize) -> Self {
        Self {
            tt: TranspositionTable::new(tt_capacity),
        }
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.tt
    }
}

impl Searcher for AlphaBetaSearcher {
    fn search(
        &mut self,
        root: &SearchPosition,
        config: &SearchConfig,
        report: &mut dyn FnMut(&SearchOutcome),
    ) -> SearchOutcome {
        iterative_deepening::search(root, config, &self.tt, report)
    }

    fn new_game(&mut self) {
        self.tt.clear();
    }

    fn hashfull(&self) -> Option<u32> {
        Some(self.tt.hashfull())
    }
}

pub fn searcher_for(config: &SearchConfig) -> Box<dyn Searcher> {
    match config.search_algorithm {
        SearchAlgorithm::AlphaBeta => {
            Box::new(AlphaBetaSearcher::new(config.transposition_table_capacity))
        }
        SearchAlgorithm::Mcts => Box::new(MctsSearcher::new(Box::new(EvaluationPredictor::new(
            config.eval_weights.clone(),
        )))),
    }
}

/// Single entry point: choose a move for `pos` under `config`.
///
/// Each call starts from empty tables, so with one thread and no time
/// pressure the result is fully deterministic.
pub fn find_best_move(pos: &Chess, config: &SearchConfig) -> Result<SearchOutcome, EngineError> {
    config.validate()?;
    let root = SearchPosition::new(pos.clone());
    Ok(searcher_for(config).search(&root, config, &mut |_| {}))
}

/// A searcher that keeps its state (the transposition table) from move to
/// move of a game.
pub struct Engine {
    config: SearchConfig,
    searcher: Box<dyn Searcher>,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let searcher = searcher_for(&config);
        Ok(Self { config, searcher })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the configuration. The searcher (and its table) is only
    /// rebuilt when a setting it was built from changes.
    pub fn set_config(&mut self, config: SearchConfig) -> Result<(), EngineError> {
        config.validate()?;
        let rebuild = config.search_algorithm != self.config.search_algorithm
            || config.transposition_table_capacity != self.config.transposition_table_capacity
            || config.eval_weights != self.config.eval_weights;
        if rebuild {
            self.searcher = searcher_for(&config);
        }
        self.config = config;
        Ok(())
    }

    pub fn new_game(&mut self) {
        self.searcher.new_game();
    }

    pub fn hashfull(&self) -> Option<u32> {
        self.searcher.hashfull()
    }

    pub fn find_best_move(&mut self, root: &SearchPosition) -> SearchOutcome {
        self.searcher.search(root, &self.config, &mut |_| {})
    }

    pub fn find_best_move_with(
        &mut self,
        root: &SearchPosition,
        report: &mut dyn FnMut(&SearchOutcome),
    ) -> SearchOutcome {
        self.searcher.search(root, &self.config, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SearchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let zero_depth = SearchConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert_eq!(zero_depth.validate(), Err(ConfigError::ZeroDepth));

        for seconds in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e20, f64::MAX] {
            let config = SearchConfig {
                max_time_seconds: seconds,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTimeLimit { .. })
            ));
        }

        let no_table = SearchConfig {
            transposition_table_capacity: 0,
            ..Default::default()
        };
        assert_eq!(no_table.validate(), Err(ConfigError::ZeroTableCapacity));

        let no_sims = SearchConfig {
            mcts_simulations: 0,
            ..Default::default()
        };
        assert_eq!(no_sims.validate(), Err(ConfigError::ZeroSimulations));

        let bad_ratio = SearchConfig {
            soft_time_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            bad_ratio.validate(),
            Err(ConfigError::InvalidSoftRatio { .. })
        ));
    }

    #[test]
    fn test_huge_time_limit_is_rejected_before_searching() {
        let config = SearchConfig {
            max_depth: 2,
            max_time_seconds: 1e20,
            ..Default::default()
        };
        let result = find_best_move(&Chess::default(), &config);
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidTimeLimit { .. }))
        ));
        assert_eq!(config.time_limit(), Duration::MAX);
    }

    #[test]
    fn test_find_best_move_rejects_bad_config() {
        let config = SearchConfig {
            max_depth: 0,
            ..Default::default()
        };
        let result = find_best_move(&Chess::default(), &config);
        assert_eq!(result, Err(EngineError::Config(ConfigError::ZeroDepth)));
    }

    #[test]
    fn test_zero_threads_means_all_cores() {
        let config = SearchConfig {
            num_threads: 0,
            ..Default::default()
        };
        assert!(config.threads() >= 1);
        assert_eq!(SearchConfig::default().threads(), 1);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_time_seconds, SearchConfig::default().max_time_seconds);
    }

    #[test]
    fn test_mate_in() {
        let outcome = SearchOutcome {
            score: MATE_SCORE - 3,
            ..Default::default()
        };
        assert_eq!(outcome.mate_in(), Some(2));
        let mated = SearchOutcome {
            score: -(MATE_SCORE - 2),
            ..Default::default()
        };
        assert_eq!(mated.mate_in(), Some(-1));
        assert_eq!(SearchOutcome::default().mate_in(), None);
    }
}
