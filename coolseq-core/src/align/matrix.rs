//! DP matrix fill. Rows follow seq1 (index `i`), columns follow seq2 (index `j`).

use super::scoring::Scorer;
use super::types::{ArrowMatrix, Arrows, Direction, Grid, ScoreMatrix};

/// Fills the score matrix and the matching arrow matrix for `seq1` x `seq2`.
///
/// With a single-column gap model (`arbitrary_gaps() == false`) Up and Left only look one
/// cell back. Otherwise every gap length up to the matrix edge is scanned, which makes the
/// fill cubic in sequence length.
pub fn build_matrices<S: Scorer + ?Sized>(
    seq1: &[u8],
    seq2: &[u8],
    scorer: &S,
) -> (ScoreMatrix, ArrowMatrix) {
    let rows = seq1.len() + 1;
    let cols = seq2.len() + 1;
    let objective = scorer.objective();
    let arbitrary = scorer.arbitrary_gaps();

    let mut scores = Grid::filled(rows, cols, 0.0f64);
    let mut arrows = Grid::filled(rows, cols, Arrows::NONE);

    // Boundary: linear models accumulate one gap column at a time, arbitrary-gap models
    // charge the whole run from the origin.
    for i in 1..rows {
        scores[(i, 0)] = if arbitrary {
            scorer.gap(i)
        } else {
            scores[(i - 1, 0)] + scorer.gap(1)
        };
        arrows[(i, 0)] = Arrows::single(Direction::Up);
    }
    for j in 1..cols {
        scores[(0, j)] = if arbitrary {
            scorer.gap(j)
        } else {
            scores[(0, j - 1)] + scorer.gap(1)
        };
        arrows[(0, j)] = Arrows::single(Direction::Left);
    }

    for i in 1..rows {
        let a = seq1[i - 1];
        for j in 1..cols {
            let diag = scores[(i - 1, j - 1)] + scorer.substitution(a, seq2[j - 1]);

            let max_up = if arbitrary { i } else { 1 };
            let mut up = objective.worst();
            for k in 1..=max_up {
                let v = scores[(i - k, j)] + scorer.gap(k);
                if objective.improves(v, up) {
                    up = v;
                }
            }

            let max_left = if arbitrary { j } else { 1 };
            let mut left = objective.worst();
            for k in 1..=max_left {
                let v = scores[(i, j - k)] + scorer.gap(k);
                if objective.improves(v, left) {
                    left = v;
                }
            }

            let mut best = diag;
            for v in [up, left] {
                if objective.improves(v, best) {
                    best = v;
                }
            }

            // Ties are kept: every direction reaching the optimum is recorded.
            let mut cell = Arrows::NONE;
            if diag == best {
                cell.insert(Direction::Diagonal);
            }
            if up == best {
                cell.insert(Direction::Up);
            }
            if left == best {
                cell.insert(Direction::Left);
            }

            scores[(i, j)] = best;
            arrows[(i, j)] = cell;
        }
    }

    log::debug!(
        "filled {}x{} alignment matrices (arbitrary gaps: {})",
        rows,
        cols,
        arbitrary
    );

    (scores, arrows)
}
