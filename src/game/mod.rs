// game/mod.rs

pub mod evaluation;
pub mod search;

use std::ops::{Deref, DerefMut};

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position};

use crate::error::{EngineError, PositionError};

/// Parses a FEN string into a legal position.
pub fn parse_fen(fen: &str) -> Result<Chess, PositionError> {
    let parsed: Fen = fen.trim().parse().map_err(|e: shakmaty::fen::ParseFenError| {
        PositionError::InvalidFen {
            fen: fen.to_string(),
            reason: e.to_string(),
        }
    })?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| PositionError::IllegalSetup {
            fen: fen.to_string(),
            reason: e.to_string(),
        })
}

pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Formats a move in UCI coordinate notation, e.g. `e2e4` or `e7e8q`.
pub fn format_move(m: Move) -> String {
    m.to_uci(CastlingMode::Standard).to_string()
}

/// Resolves a UCI coordinate string against `pos`.
pub fn parse_move(pos: &Chess, uci: &str) -> Result<Move, EngineError> {
    let illegal = || EngineError::IllegalMove {
        uci: uci.to_string(),
        fen: to_fen(pos),
    };
    let uci_move: UciMove = uci.parse().map_err(|_| illegal())?;
    uci_move.to_move(pos).map_err(|_| illegal())
}

pub fn zobrist(pos: &Chess) -> u64 {
    let Zobrist64(hash) = pos.zobrist_hash::<Zobrist64>(EnPassantMode::Legal);
    hash
}

/// A position that can be walked forward and back during search.
///
/// Moves are applied with [`SearchPosition::push`], which hands out a
/// [`MoveGuard`]. The guard restores the previous position when it goes out of
/// scope, so every exit path out of a search node (including `?`) unwinds the
/// board.
#[derive(Clone, Debug)]
pub struct SearchPosition {
    chess: Chess,
    undo_stack: Vec<(Chess, usize)>,
    hashes: Vec<u64>,
}

impl SearchPosition {
    pub fn new(chess: Chess) -> Self {
        let hash = zobrist(&chess);
        Self {
            chess,
            undo_stack: Vec::new(),
            hashes: vec![hash],
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        parse_fen(fen).map(Self::new)
    }

    pub fn chess(&self) -> &Chess {
        &self.chess
    }

    pub fn hash(&self) -> u64 {
        self.hashes.last().copied().unwrap_or_else(|| zobrist(&self.chess))
    }

    /// Number of moves currently pushed and not yet undone.
    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Plays `m` permanently, keeping it in the repetition history.
    ///
    /// Used to replay game moves before a search; it cannot be undone.
    pub fn play(&mut self, m: Move) {
        self.chess.play_unchecked(m);
        self.hashes.push(zobrist(&self.chess));
    }

    /// Plays `m` and returns a guard that takes it back on drop.
    pub fn push(&mut self, m: Move) -> MoveGuard<'_> {
        self.undo_stack.push((self.chess.clone(), self.hashes.len()));
        self.chess.play_unchecked(m);
        self.hashes.push(zobrist(&self.chess));
        MoveGuard { pos: self }
    }

    fn pop(&mut self) {
        if let Some((previous, history_len)) = self.undo_stack.pop() {
            self.chess = previous;
            self.hashes.truncate(history_len);
        }
    }

    /// True if the current position already occurred since the last
    /// irreversible move.
    pub fn is_repetition(&self) -> bool {
        let Some((&current, earlier)) = self.hashes.split_last() else {
            return false;
        };
        let reversible = self.chess.halfmoves() as usize;
        earlier
            .iter()
            .rev()
            .take(reversible)
            .skip(1)
            .step_by(2)
            .any(|&h| h == current)
    }

    /// Draws that the move generator does not report on its own.
    pub fn is_rule_draw(&self) -> bool {
        self.chess.halfmoves() >= 100 || self.is_repetition()
    }
}

impl From<Chess> for SearchPosition {
    fn from(chess: Chess) -> Self {
        Self::new(chess)
    }
}

/// Scoped move application. Dereferences to the position it borrows.
pub struct MoveGuard<'a> {
    pos: &'a mut SearchPosition,
}

impl Deref for MoveGuard<'_> {
    type Target = SearchPosition;

    fn deref(&self) -> &SearchPosition {
        &*self.pos
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut SearchPosition {
        &mut *self.pos
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.pos.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_restores_position() {
        let mut pos = SearchPosition::new(Chess::default());
        let before = to_fen(pos.chess());
        let before_hash = pos.hash();
        {
            let e4 = parse_move(pos.chess(), "e2e4").unwrap();
            let mut child = pos.push(e4);
            let e5 = parse_move(child.chess(), "e7e5").unwrap();
            let grandchild = child.push(e5);
            assert_eq!(grandchild.depth(), 2);
        }
        assert_eq!(to_fen(pos.chess()), before);
        assert_eq!(pos.hash(), before_hash);
        assert_eq!(pos.depth(), 0);
    }

    #[test]
    fn test_guard_unwinds_on_early_return() {
        fn walk(pos: &mut SearchPosition, plies: usize) -> Result<(), ()> {
            if plies == 0 {
                return Err(());
            }
            let m = pos.chess().legal_moves()[0];
            let mut child = pos.push(m);
            walk(&mut child, plies - 1)?;
            Ok(())
        }

        let mut pos = SearchPosition::new(Chess::default());
        let before = to_fen(pos.chess());
        assert!(walk(&mut pos, 5).is_err());
        assert_eq!(to_fen(pos.chess()), before);
    }

    #[test]
    fn test_repetition_detection() {
        let mut pos = SearchPosition::new(Chess::default());
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            let m = parse_move(pos.chess(), uci).unwrap();
            pos.play(m);
        }
        assert!(pos.is_repetition());
        assert!(pos.is_rule_draw());
    }

    #[test]
    fn test_no_repetition_after_pawn_move() {
        let mut pos = SearchPosition::new(Chess::default());
        for uci in ["g1f3", "g8f6", "f3g1", "e7e6"] {
            let m = parse_move(pos.chess(), uci).unwrap();
            pos.play(m);
        }
        assert!(!pos.is_repetition());
    }

    #[test]
    fn test_parse_fen_rejects_garbage() {
        assert!(matches!(parse_fen("not a fen"), Err(PositionError::InvalidFen { .. })));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(PositionError::IllegalSetup { .. })
        ));
    }

    #[test]
    fn test_format_move_promotion_and_castling() {
        let pos = parse_fen("4k3/P7/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let promo = parse_move(&pos, "a7a8q").unwrap();
        assert_eq!(format_move(promo), "a7a8q");
        let castle = parse_move(&pos, "e1g1").unwrap();
        assert!(castle.is_castle());
        assert_eq!(format_move(castle), "e1g1");
    }
}
