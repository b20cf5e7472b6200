// src/game/search/tt.rs

use shakmaty::{Move, Role, Square};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::constants::MATE_BOUND;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

impl Bound {
    fn to_bits(self) -> u64 {
        match self {
            Bound::Exact => 1,
            Bound::Lower => 2,
            Bound::Upper => 3,
        }
    }

    fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            1 => Some(Bound::Exact),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Upper),
            _ => None,
        }
    }
}

/// A move squeezed into 16 bits: from (6), to (6), promotion role (3) and a
/// presence flag. It is turned back into a [`Move`] by matching it against the
/// legal moves of the node, which also throws away moves from hash collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedMove(u16);

impl PackedMove {
    const PRESENT: u16 = 1 << 15;

    pub fn new(m: Move) -> Self {
        let from = m.from().map_or(0, |sq| sq as u16);
        let to = m.to() as u16;
        let promotion = m.promotion().map_or(0, |role| role as u16);
        PackedMove(Self::PRESENT | (promotion << 12) | (to << 6) | from)
    }

    fn from_bits(bits: u16) -> Option<Self> {
        (bits & Self::PRESENT != 0).then_some(PackedMove(bits))
    }

    fn bits(self) -> u16 {
        self.0
    }

    fn from_square(self) -> Square {
        Square::new(u32::from(self.0 & 0x3f))
    }

    fn to_square(self) -> Square {
        Square::new(u32::from((self.0 >> 6) & 0x3f))
    }

    fn promotion(self) -> Option<Role> {
        match (self.0 >> 12) & 0x7 {
            2 => Some(Role::Knight),
            3 => Some(Role::Bishop),
            4 => Some(Role::Rook),
            5 => Some(Role::Queen),
            _ => None,
        }
    }

    pub fn matches(self, m: &Move) -> bool {
        m.from() == Some(self.from_square())
            && m.to() == self.to_square()
            && m.promotion() == self.promotion()
    }

    /// Finds the legal move this packed move stands for.
    pub fn resolve(self, legal: &[Move]) -> Option<Move> {
        legal.iter().find(|m| self.matches(m)).copied()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<PackedMove>,
    generation: u8,
}

impl TTEntry {
    // Layout of the data word, low to high:
    // score (32) | depth (8) | bound (2) | generation (6) | move (16)
    fn pack(self) -> u64 {
        let score = u64::from(self.score as u32);
        let depth = u64::from(self.depth) << 32;
        let bound = self.bound.to_bits() << 40;
        let generation = u64::from(self.generation & GENERATION_MASK) << 42;
        let best_move = u64::from(self.best_move.map_or(0, PackedMove::bits)) << 48;
        score | depth | bound | generation | best_move
    }

    fn unpack(data: u64) -> Option<Self> {
        let bound = Bound::from_bits((data >> 40) & 0x3)?;
        Some(TTEntry {
            score: data as u32 as i32,
            depth: (data >> 32) as u8,
            bound,
            generation: ((data >> 42) as u8) & GENERATION_MASK,
            best_move: PackedMove::from_bits((data >> 48) as u16),
        })
    }
}

const GENERATION_MASK: u8 = 0x3f;

struct Slot {
    key: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    fn empty() -> Self {
        Slot {
            key: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }
}

/// Fixed-size hash table shared by every search thread.
///
/// Each slot holds `hash ^ data` next to `data`. A reader only accepts a slot
/// whose two words XOR back to the probed hash, so a slot torn by a
/// concurrent writer simply reads as a miss. No locks are taken.
pub struct TranspositionTable {
    slots: Box<[Slot]>,
    generation: AtomicU8,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity.max(1)).map(|_| Slot::empty()).collect();
        Self {
            slots,
            generation: AtomicU8::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, hash: u64) -> &Slot {
        let index = ((u128::from(hash) * self.slots.len() as u128) >> 64) as usize;
        &self.slots[index]
    }

    /// Starts a new top-level search; entries from older searches become
    /// the first candidates for replacement.
    pub fn new_search(&self) {
        let next = self.generation.load(Ordering::Relaxed).wrapping_add(1) & GENERATION_MASK;
        self.generation.store(next, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.key.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
        self.generation.store(0, Ordering::Relaxed);
    }

    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        let slot = self.slot(hash);
        let data = slot.data.load(Ordering::Relaxed);
        let key = slot.key.load(Ordering::Relaxed);
        if data == 0 || key ^ data != hash {
            return None;
        }
        TTEntry::unpack(data)
    }

    /// Stores a search result. `score` must already be ply-adjusted with
    /// [`score_to_tt`].
    ///
    /// The slot is replaced when it is empty, holds the same position, was
    /// written by an older search, or holds a shallower result.
    pub fn store(&self, hash: u64, depth: u8, score: i32, bound: Bound, best_move: Option<Move>) {
        let slot = self.slot(hash);
        let generation = self.generation.load(Ordering::Relaxed);
        let old_data = slot.data.load(Ordering::Relaxed);
        let old_key = slot.key.load(Ordering::Relaxed);
        let old = TTEntry::unpack(old_data);
        let same_position = old.is_some() && old_key ^ old_data == hash;

        let replace = match old {
            None => true,
            Some(_) if same_position => true,
            Some(entry) => entry.generation != generation || depth >= entry.depth,
        };
        if !replace {
            return;
        }

        let mut packed_move = best_move.map(PackedMove::new);
        if packed_move.is_none() && same_position {
            packed_move = old.and_then(|entry| entry.best_move);
        }

        let data = TTEntry {
            depth,
            score,
            bound,
            best_move: packed_move,
            generation,
        }
        .pack();
        slot.data.store(data, Ordering::Relaxed);
        slot.key.store(hash ^ data, Ordering::Relaxed);
    }

    /// Permille of a sample of slots written by the current search.
    pub fn hashfull(&self) -> u32 {
        let generation = self.generation.load(Ordering::Relaxed);
        let sample = self.slots.len().min(1000);
        if sample == 0 {
            return 0;
        }
        let used = self.slots[..sample]
            .iter()
            .filter_map(|slot| TTEntry::unpack(slot.data.load(Ordering::Relaxed)))
            .filter(|entry| entry.generation == generation)
            .count();
        (used * 1000 / sample) as u32
    }
}

/// Converts a root-relative mate score into a node-relative one for storage.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score + ply as i32
    } else if score < -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score - ply as i32
    } else if score < -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}
