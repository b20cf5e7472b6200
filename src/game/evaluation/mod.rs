//! Evaluation of a chess position.
//!
//! Every term produces a middlegame/endgame pair ([`Phased`]) for one colour.
//! The pairs are summed as White minus Black and blended once with the game
//! phase, so no term switches on or off abruptly when material comes off.

pub mod pst;
pub mod pawn_structure;
pub mod passed_pawns;
pub mod mobility;
pub mod king_safety;
pub mod development;
pub mod see;
pub mod rooks;
pub mod bishops;
pub mod knights;

use std::ops::{Add, AddAssign, Neg, Sub};

use serde::{Deserialize, Serialize};
use shakmaty::{Bitboard, Board, Chess, Color, File, Piece, Position, Role, Square};

use crate::constants::{
    BISHOP_PHASE_VAL, BISHOP_VALUE, ENDGAME_PHASE_THRESHOLD, KNIGHT_PHASE_VAL, KNIGHT_VALUE,
    MATE_SCORE, MAX_EVAL, OPENING_PHASE_THRESHOLD, PAWN_VALUE, PHASE_SCALE, QUEEN_PHASE_VAL,
    QUEEN_VALUE, ROOK_PHASE_VAL, ROOK_VALUE, TEMPO_BONUS, TOTAL_PHASE,
};

/// A score with separate middlegame and endgame components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Phased {
    pub mg: i32,
    pub eg: i32,
}

impl Phased {
    pub const ZERO: Phased = Phased { mg: 0, eg: 0 };

    pub const fn new(mg: i32, eg: i32) -> Self {
        Self { mg, eg }
    }

    pub const fn from_pair(pair: (i32, i32)) -> Self {
        Self { mg: pair.0, eg: pair.1 }
    }

    pub fn times(self, n: i32) -> Self {
        Self::new(self.mg * n, self.eg * n)
    }

    /// Scales by a percentage weight, 100 leaving the score unchanged.
    pub fn weighted(self, percent: i32) -> Self {
        Self::new(self.mg * percent / 100, self.eg * percent / 100)
    }

    /// Blends the two components. `phase` runs from 0 (endgame) to
    /// [`PHASE_SCALE`] (opening).
    pub fn taper(self, phase: i32) -> i32 {
        (self.mg * phase + self.eg * (PHASE_SCALE - phase)) / PHASE_SCALE
    }
}

impl Add for Phased {
    type Output = Phased;

    fn add(self, rhs: Phased) -> Phased {
        Phased::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl AddAssign for Phased {
    fn add_assign(&mut self, rhs: Phased) {
        self.mg += rhs.mg;
        self.eg += rhs.eg;
    }
}

impl Sub for Phased {
    type Output = Phased;

    fn sub(self, rhs: Phased) -> Phased {
        Phased::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl Neg for Phased {
    type Output = Phased;

    fn neg(self) -> Phased {
        Phased::new(-self.mg, -self.eg)
    }
}

/// Percentage weights for each family of evaluation terms.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvalWeights {
    pub piece_square_weight: i32,
    pub pawn_structure_weight: i32,
    pub passed_pawn_weight: i32,
    pub king_safety_weight: i32,
    pub piece_mobility_weight: i32,
    pub rook_placement_weight: i32,
    pub bishop_placement_weight: i32,
    pub knight_placement_weight: i32,
    pub piece_development_weight: i32,
    pub tempo_bonus: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            piece_square_weight: 100,
            pawn_structure_weight: 100,
            passed_pawn_weight: 100,
            king_safety_weight: 100,
            piece_mobility_weight: 100,
            rook_placement_weight: 100,
            bishop_placement_weight: 100,
            knight_placement_weight: 100,
            piece_development_weight: 100,
            tempo_bonus: TEMPO_BONUS,
        }
    }
}

/// Weighted count of non-pawn material, capped at [`TOTAL_PHASE`].
pub fn phase_material(board: &Board) -> i32 {
    let material = board.knights().count() as i32 * KNIGHT_PHASE_VAL
        + board.bishops().count() as i32 * BISHOP_PHASE_VAL
        + board.rooks().count() as i32 * ROOK_PHASE_VAL
        + board.queens().count() as i32 * QUEEN_PHASE_VAL;
    material.min(TOTAL_PHASE)
}

/// Calculates the game phase.
///
/// The phase is a value between 0 and 256, where 256 means the game is in the
/// opening and 0 means the game is in the endgame. Between the two material
/// thresholds it is linear.
pub fn game_phase(board: &Board) -> i32 {
    let material = phase_material(board);
    if material >= OPENING_PHASE_THRESHOLD {
        PHASE_SCALE
    } else if material <= ENDGAME_PHASE_THRESHOLD {
        0
    } else {
        (material - ENDGAME_PHASE_THRESHOLD) * PHASE_SCALE
            / (OPENING_PHASE_THRESHOLD - ENDGAME_PHASE_THRESHOLD)
    }
}

pub fn get_piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0,
    }
}

/// Rank index counted from `color`'s own back rank (0..=7).
pub(crate) fn relative_rank(color: Color, square: Square) -> u32 {
    let rank = square.rank() as u32;
    match color {
        Color::White => rank,
        Color::Black => 7 - rank,
    }
}

/// The files directly left and right of `file`.
pub(crate) fn adjacent_files(file: File) -> Bitboard {
    let index = file as u32;
    let mut files = Bitboard::EMPTY;
    if index > 0 {
        files |= Bitboard::from_file(File::new(index - 1));
    }
    if index < 7 {
        files |= Bitboard::from_file(File::new(index + 1));
    }
    files
}

/// All squares strictly in front of `square` from `color`'s point of view.
pub(crate) fn forward_ranks(color: Color, square: Square) -> Bitboard {
    let rank = square.rank() as u32;
    let mut ahead = Bitboard::EMPTY;
    match color {
        Color::White => {
            for r in (rank + 1)..8 {
                ahead |= Bitboard::from_rank(shakmaty::Rank::new(r));
            }
        }
        Color::Black => {
            for r in 0..rank {
                ahead |= Bitboard::from_rank(shakmaty::Rank::new(r));
            }
        }
    }
    ahead
}

fn material_and_pst(board: &Board, color: Color, weights: &EvalWeights) -> Phased {
    let mut material = 0;
    let mut positional = Phased::ZERO;
    for role in Role::ALL {
        let (pst_mg, pst_eg) = pst::tables(color, role);
        for square in board.by_piece(Piece { role, color }) {
            material += get_piece_value(role);
            let rank = square.rank() as usize;
            let file = square.file() as usize;
            positional += Phased::new(pst_mg[7 - rank][file], pst_eg[7 - rank][file]);
        }
    }
    Phased::new(material, material) + positional.weighted(weights.piece_square_weight)
}

fn side_terms(pos: &Chess, color: Color, weights: &EvalWeights) -> Phased {
    let board = pos.board();
    material_and_pst(board, color, weights)
        + pawn_structure::evaluate(board, color).weighted(weights.pawn_structure_weight)
        + passed_pawns::evaluate(board, color, pos.turn()).weighted(weights.passed_pawn_weight)
        + king_safety::evaluate(pos, color).weighted(weights.king_safety_weight)
        + mobility::evaluate(board, color).weighted(weights.piece_mobility_weight)
        + rooks::evaluate(board, color).weighted(weights.rook_placement_weight)
        + bishops::evaluate(board, color).weighted(weights.bishop_placement_weight)
        + knights::evaluate(board, color).weighted(weights.knight_placement_weight)
        + development::evaluate(board, color).weighted(weights.piece_development_weight)
}

/// Static evaluation from White's point of view, without checking for mate or
/// stalemate. The search calls this once it has generated moves itself.
pub fn static_white(pos: &Chess, weights: &EvalWeights) -> i32 {
    if pos.is_insufficient_material() {
        return 0;
    }
    let phase = game_phase(pos.board());
    let blended = (side_terms(pos, Color::White, weights) - side_terms(pos, Color::Black, weights))
        .taper(phase);
    let tempo = match pos.turn() {
        Color::White => weights.tempo_bonus,
        Color::Black => -weights.tempo_bonus,
    };
    (blended + tempo).clamp(-MAX_EVAL, MAX_EVAL)
}

/// Static evaluation from the side to move's point of view.
pub fn static_eval(pos: &Chess, weights: &EvalWeights) -> i32 {
    let score = static_white(pos, weights);
    match pos.turn() {
        Color::White => score,
        Color::Black => -score,
    }
}

/// Evaluates the position from White's point of view.
///
/// Checkmate and stalemate short-circuit every other term.
pub fn evaluate_white(pos: &Chess, weights: &EvalWeights) -> i32 {
    if pos.is_checkmate() {
        return match pos.turn() {
            Color::White => -MATE_SCORE,
            Color::Black => MATE_SCORE,
        };
    }
    if pos.is_stalemate() {
        return 0;
    }
    static_white(pos, weights)
}

/// Evaluates the board from the perspective of the current player.
///
/// Returns a score in centipawns.
pub fn evaluate(pos: &Chess, weights: &EvalWeights) -> i32 {
    let score = evaluate_white(pos, weights);
    match pos.turn() {
        Color::White => score,
        Color::Black => -score,
    }
}

#[cfg(test)]
pub mod tests;
