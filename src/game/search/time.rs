// src/game/search/time.rs

use std::time::{Duration, Instant};

/// Sudden-death games are assumed to last this many more moves at the start.
const SUDDEN_DEATH_HORIZON: u32 = 40;
const MIN_MOVES_TO_GO: u32 = 15;
/// Early in the game a move gets a larger share of the clock.
const OPENING_MOVES: u32 = 40;
const OPENING_FACTOR: f64 = 1.5;
/// Never plan to spend more than this share of the remaining clock.
const MAX_CLOCK_SHARE: f64 = 0.9;

/// Clock state as a GUI reports it before each move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeControl {
    pub time_left: Duration,
    pub increment: Duration,
    /// `None` for sudden death.
    pub moves_to_go: Option<u32>,
    /// Full moves played so far by the engine's side.
    pub moves_played: u32,
}

impl TimeControl {
    fn moves_to_go(&self) -> u32 {
        match self.moves_to_go {
            Some(n) if n > 0 => n,
            _ => SUDDEN_DEATH_HORIZON
                .saturating_sub(5 * self.moves_played / 16)
                .max(MIN_MOVES_TO_GO),
        }
    }

    /// Hard time limit for the next move.
    pub fn allocate(&self) -> Duration {
        let factor = if self.moves_played < OPENING_MOVES {
            OPENING_FACTOR
        } else {
            1.0
        };
        let share = self.time_left.as_secs_f64() * factor / f64::from(self.moves_to_go());
        let budget = share + self.increment.as_secs_f64();
        let cap = self.time_left.as_secs_f64() * MAX_CLOCK_SHARE;
        Duration::from_secs_f64(budget.min(cap).max(0.0))
    }
}

/// Wall-clock budget of a running search.
///
/// The hard limit aborts the search from inside the tree. The soft limit is
/// only consulted between iterations.
#[derive(Clone, Debug)]
pub struct TimeManager {
    start: Instant,
    hard: Duration,
    soft: Duration,
}

impl TimeManager {
    pub fn new(hard: Duration, soft_ratio: f64) -> Self {
        Self {
            start: Instant::now(),
            hard,
            soft: hard.mul_f64(soft_ratio.clamp(0.0, 1.0)),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn hard_limit(&self) -> Duration {
        self.hard
    }

    pub fn soft_limit(&self) -> Duration {
        self.soft
    }

    pub fn hard_limit_reached(&self) -> bool {
        self.elapsed() >= self.hard
    }

    /// Decides after a finished iteration whether to start the next one.
    ///
    /// An iteration usually costs at least twice the previous one, so once
    /// the soft limit has passed a new depth is only begun if that estimate
    /// still fits under the hard limit.
    pub fn should_continue(&self, last_iteration: Duration) -> bool {
        let elapsed = self.elapsed();
        if elapsed >= self.hard {
            return false;
        }
        !(elapsed >= self.soft && elapsed + last_iteration * 2 > self.hard)
    }
}
