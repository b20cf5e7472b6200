// src/game/search/history.rs

use shakmaty::Move;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::constants::MAX_PLY;

/// Butterfly history: how often a quiet `(from, to)` move caused a cutoff,
/// weighted by depth squared.
///
/// Lives for one top-level search and is shared by all search threads, so the
/// counters are atomics.
pub struct HistoryTable {
    table: Box<[AtomicI32]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self {
            table: (0..64 * 64).map(|_| AtomicI32::new(0)).collect(),
        }
    }
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(m: &Move) -> Option<usize> {
        m.from().map(|from| from as usize * 64 + m.to() as usize)
    }

    /// Rewards a move that caused a beta cutoff at `depth`.
    pub fn update(&self, m: &Move, depth: u8) {
        let Some(index) = Self::index(m) else {
            return;
        };
        let bonus = i32::from(depth) * i32::from(depth);
        let cell = &self.table[index];
        let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |score| {
            Some(score.saturating_add(bonus))
        });
    }

    pub fn get_score(&self, m: &Move) -> i32 {
        Self::index(m).map_or(0, |index| self.table[index].load(Ordering::Relaxed))
    }

    pub fn clear(&self) {
        for cell in self.table.iter() {
            cell.store(0, Ordering::Relaxed);
        }
    }
}

/// Up to two quiet moves per ply that refuted their siblings.
#[derive(Clone)]
pub struct KillerMoves {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl Default for KillerMoves {
    fn default() -> Self {
        Self {
            slots: [[None; 2]; MAX_PLY],
        }
    }
}

impl KillerMoves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ply: usize, m: Move) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] == Some(m) {
            return;
        }
        slot[1] = slot[0];
        slot[0] = Some(m);
    }

    /// 0 for the newest killer at this ply, 1 for the older one.
    pub fn rank(&self, ply: usize, m: &Move) -> Option<usize> {
        let slot = self.slots.get(ply)?;
        slot.iter().position(|k| k.as_ref() == Some(m))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().flatten().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots = [[None; 2]; MAX_PLY];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parse_move;
    use shakmaty::Chess;

    #[test]
    fn test_history_accumulates_depth_squared() {
        let pos = Chess::default();
        let nf3 = parse_move(&pos, "g1f3").unwrap();
        let e4 = parse_move(&pos, "e2e4").unwrap();
        let history = HistoryTable::new();
        history.update(&nf3, 3);
        history.update(&nf3, 2);
        assert_eq!(history.get_score(&nf3), 13);
        assert_eq!(history.get_score(&e4), 0);
        history.clear();
        assert_eq!(history.get_score(&nf3), 0);
    }

    #[test]
    fn test_killers_shift_and_dedupe() {
        let pos = Chess::default();
        let a = parse_move(&pos, "a2a3").unwrap();
        let b = parse_move(&pos, "b2b3").unwrap();
        let c = parse_move(&pos, "c2c3").unwrap();
        let mut killers = KillerMoves::new();

        killers.record(4, a);
        killers.record(4, a);
        assert_eq!(killers.rank(4, &a), Some(0));
        assert_eq!(killers.rank(4, &b), None);

        killers.record(4, b);
        assert_eq!(killers.rank(4, &b), Some(0));
        assert_eq!(killers.rank(4, &a), Some(1));

        killers.record(4, c);
        assert_eq!(killers.rank(4, &a), None);
        assert_eq!(killers.rank(5, &c), None);

        killers.clear();
        assert_eq!(killers.rank(4, &c), None);
        assert!(killers.is_empty());
    }
}
