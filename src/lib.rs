// src/lib.rs

//! A chess engine: hand-crafted evaluation, alpha-beta search with the usual
//! move-ordering tables, Lazy SMP, and a predictor-guided MCTS alternative.

pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod uci;

pub use error::{ConfigError, EngineError, EngineResult, PositionError, ProfileError};
pub use game::search::{
    find_best_move, Engine, SearchAlgorithm, SearchConfig, SearchOutcome, Searcher,
};
pub use game::{format_move, parse_fen, parse_move, SearchPosition};
