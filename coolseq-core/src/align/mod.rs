pub mod matrix;
pub mod render;
pub mod scoring;
pub mod traceback;
pub mod types;

pub use matrix::build_matrices;
pub use render::render;
pub use scoring::{AffineScoring, LinearScoring, Objective, Scorer};
pub use traceback::{score_alignment, traceback};
pub use types::{
    ascii_symbols, Alignment, ArrowMatrix, Arrows, Direction, Grid, ScoreMatrix, GAP,
};


/// Global alignment under any scorer: fill the matrices, then trace one optimal path.
pub fn align_with<S: Scorer + ?Sized>(seq1: &[u8], seq2: &[u8], scorer: &S) -> Alignment {
    let (scores, arrows) = build_matrices(seq1, seq2, scorer);
    traceback::trace(seq1, seq2, &scores, &arrows, scorer)
}

/// Needleman-Wunsch global alignment with a linear gap penalty (higher score is better).
pub fn needleman_wunsch(seq1: &[u8], seq2: &[u8], scoring: &LinearScoring) -> Alignment {
    align_with(seq1, seq2, scoring)
}

/// Waterman-Smith-Beyer global alignment with arbitrary-length gaps (lower cost is better).
///
/// The fill scans every gap length per cell, so time grows cubically with sequence length.
pub fn waterman_smith_beyer(seq1: &[u8], seq2: &[u8], scoring: &AffineScoring) -> Alignment {
    align_with(seq1, seq2, scoring)
}
