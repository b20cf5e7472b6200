// src/game/search/predictor.rs

use shakmaty::{Chess, Move, Position};

use super::ordering::mvv_lva;
use crate::game::evaluation::{get_piece_value, static_eval, EvalWeights};

/// Centipawns that map to a value of `tanh(1)`.
const VALUE_SCALE: f32 = 400.0;

/// What a predictor thinks of a position.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Expected result for the side to move, in `[-1, 1]`.
    pub value: f32,
    /// Probability for every legal move, in generator order. Sums to 1.
    pub priors: Vec<(Move, f32)>,
}

/// Anything that can score a position and suggest moves for it, such as a
/// neural network. Used by MCTS to expand leaves.
pub trait MovePredictor: Send + Sync {
    fn predict(&self, pos: &Chess) -> Prediction;
}

/// Softmax over `logits`, returned in the same order.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// A predictor built on the hand-written evaluation: the value is the
/// squashed static score and captures and promotions get the larger priors.
pub struct EvaluationPredictor {
    weights: EvalWeights,
}

impl EvaluationPredictor {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    fn logit(m: &Move) -> f32 {
        let mut logit = 0.0;
        if let Some(role) = m.promotion() {
            logit += get_piece_value(role) as f32 / 300.0;
        }
        if m.is_capture() {
            logit += 1.0 + mvv_lva(m) as f32 / 2_000.0;
        }
        logit
    }
}

impl MovePredictor for EvaluationPredictor {
    fn predict(&self, pos: &Chess) -> Prediction {
        let legal = pos.legal_moves();
        let logits: Vec<f32> = legal.iter().map(Self::logit).collect();
        let priors = legal.iter().copied().zip(softmax(&logits)).collect();
        let eval = static_eval(pos, &self.weights) as f32;
        Prediction {
            value: (eval / VALUE_SCALE).tanh(),
            priors,
        }
    }
}
