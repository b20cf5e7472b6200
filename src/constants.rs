// --- Piece values ---
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

// Constants for game phase calculation
pub const QUEEN_PHASE_VAL: i32 = 4;
pub const ROOK_PHASE_VAL: i32 = 2;
pub const BISHOP_PHASE_VAL: i32 = 1;
pub const KNIGHT_PHASE_VAL: i32 = 1;
pub const TOTAL_PHASE: i32 =
    (QUEEN_PHASE_VAL * 2) + (ROOK_PHASE_VAL * 4) + (BISHOP_PHASE_VAL * 4) + (KNIGHT_PHASE_VAL * 4);
/// At or above this much non-pawn material the position counts as a pure opening.
pub const OPENING_PHASE_THRESHOLD: i32 = 18;
/// At or below this much non-pawn material the position counts as a pure endgame.
pub const ENDGAME_PHASE_THRESHOLD: i32 = 6;
pub const PHASE_SCALE: i32 = 256;

// Knight Evaluation
pub const OUTPOST_BONUS: i32 = 30;
pub const CENTRALIZATION_BONUS: i32 = 10;

// Rook Evaluation
pub const ROOK_OPEN_FILE_BONUS: i32 = 20;
pub const ROOK_SEMI_OPEN_FILE_BONUS: i32 = 10;
pub const SEVENTH_RANK_BONUS: i32 = 25;

// Bishop Evaluation
pub const BISHOP_PAIR_BONUS_MG: i32 = 30;
pub const BISHOP_PAIR_BONUS_EG: i32 = 50;
pub const BAD_BISHOP_PENALTY: i32 = -10;

// Pawn Structure Evaluation (mg, eg)
pub const ISOLATED_PAWN_PENALTY: (i32, i32) = (-15, -30);
pub const DOUBLED_PAWN_PENALTY: (i32, i32) = (-10, -20);
pub const BACKWARD_PAWN_PENALTY: (i32, i32) = (-10, -25);
pub const CONNECTED_PAWN_BONUS: (i32, i32) = (5, 15);
pub const PAWN_CHAIN_BONUS: (i32, i32) = (10, 5);
pub const PAWN_ISLAND_PENALTY: (i32, i32) = (-5, -15);
pub const PAWN_MAJORITY_BONUS: (i32, i32) = (5, 20);

// Passed pawns, indexed by rank relative to the pawn's owner
pub const PASSED_PAWN_RANK_BONUS_MG: [i32; 8] = [0, 0, 5, 10, 20, 35, 60, 0];
pub const PASSED_PAWN_RANK_BONUS_EG: [i32; 8] = [0, 10, 20, 35, 60, 100, 150, 0];
pub const SUPPORTED_PASSED_PAWN_BONUS: i32 = 15;
pub const UNSTOPPABLE_PASSER_BONUS: i32 = 600;

// King safety
pub const PAWN_SHIELD_BONUS: i32 = 20;
pub const PAWN_SHIELD_SECOND_RANK_BONUS: i32 = 10;
pub const KING_OPEN_FILE_PENALTY: i32 = 25;
pub const KING_SEMI_OPEN_FILE_PENALTY: i32 = 15;
pub const KING_CENTER_EXPOSURE_PENALTY: i32 = 50;
pub const CASTLING_RIGHTS_BONUS: i32 = 15;
pub const KING_ACTIVITY_BONUS: i32 = 10;

// Mobility Evaluation (per attacked square; mg, eg)
pub const KNIGHT_MOBILITY_BONUS: (i32, i32) = (4, 4);
pub const BISHOP_MOBILITY_BONUS: (i32, i32) = (5, 5);
pub const ROOK_MOBILITY_BONUS: (i32, i32) = (2, 4);
pub const QUEEN_MOBILITY_BONUS: (i32, i32) = (1, 2);
pub const CENTER_CONTROL_BONUS: i32 = 5;

// Development Evaluation
pub const UNDEVELOPED_MINOR_PENALTY: i32 = 10;
pub const EARLY_QUEEN_MOVE_PENALTY: i32 = 15;

pub const TEMPO_BONUS: i32 = 10;

// Search
pub const MATE_SCORE: i32 = 1_000_000;
pub const MAX_PLY: usize = 128;
/// Scores with a larger magnitude than this encode a forced mate.
pub const MATE_BOUND: i32 = MATE_SCORE - MAX_PLY as i32;
/// Static evaluation never leaves this band.
pub const MAX_EVAL: i32 = 20_000;
pub const MAX_QUIESCENCE_PLY: usize = 32;
pub const NODE_POLL_INTERVAL: u64 = 1024;
