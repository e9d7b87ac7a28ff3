//! Reconstruction of one optimal alignment from filled matrices.
//!
//! Tie-break policy: among all optimal paths recorded in the arrow matrix, the produced
//! alignment is the one whose columns, read left to right, prefer a diagonal step over a gap
//! in seq2 (Up) over a gap in seq1 (Left). Gap steps prefer the shortest run that reproduces
//! the next cell's value.
//!
//! The walk runs in two passes. The backward pass starts at the terminal cell and marks
//! every cell that lies on some optimal path. The forward pass then starts at the origin
//! and, at each cell, takes the highest-priority step that lands on a marked cell.

use crate::error::{SeqError, SeqResult};

use super::scoring::Scorer;
use super::types::{Alignment, ArrowMatrix, Direction, Grid, ScoreMatrix, GAP};

/// A forward move of the traceback: `len` columns in direction `dir`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Step {
    dir: Direction,
    len: usize,
}

/// Does a gap run of `len` from `from` reproduce the value stored at `to`?
#[inline]
fn gap_link<S: Scorer + ?Sized>(scorer: &S, from: f64, to: f64, len: usize) -> bool {
    from + scorer.gap(len) == to
}

fn max_gap<S: Scorer + ?Sized>(scorer: &S, available: usize) -> usize {
    if scorer.arbitrary_gaps() {
        available
    } else {
        available.min(1)
    }
}

/// Predecessor cells of `(i, j)` on optimal paths.
fn predecessors<S: Scorer + ?Sized>(
    scores: &ScoreMatrix,
    arrows: &ArrowMatrix,
    scorer: &S,
    i: usize,
    j: usize,
) -> Vec<(usize, usize)> {
    let cell = arrows[(i, j)];
    let here = scores[(i, j)];
    let mut out = Vec::new();
    if cell.contains(Direction::Diagonal) && i > 0 && j > 0 {
        out.push((i - 1, j - 1));
    }
    if cell.contains(Direction::Up) {
        for k in 1..=max_gap(scorer, i) {
            if gap_link(scorer, scores[(i - k, j)], here, k) {
                out.push((i - k, j));
            }
        }
    }
    if cell.contains(Direction::Left) {
        for k in 1..=max_gap(scorer, j) {
            if gap_link(scorer, scores[(i, j - k)], here, k) {
                out.push((i, j - k));
            }
        }
    }
    out
}

/// Marks every cell from which the terminal cell is reachable along recorded arrows.
fn mark_optimal_cells<S: Scorer + ?Sized>(
    scores: &ScoreMatrix,
    arrows: &ArrowMatrix,
    scorer: &S,
) -> Grid<bool> {
    let rows = scores.rows();
    let cols = scores.cols();
    let mut on_path = Grid::filled(rows, cols, false);
    on_path[(rows - 1, cols - 1)] = true;

    // Every predecessor precedes its successor in row-major order, so one reverse sweep
    // propagates the marks completely.
    for i in (0..rows).rev() {
        for j in (0..cols).rev() {
            if !on_path[(i, j)] {
                continue;
            }
            for p in predecessors(scores, arrows, scorer, i, j) {
                on_path[p] = true;
            }
        }
    }
    on_path
}

/// Highest-priority step out of `(i, j)` that lands on a marked cell.
fn next_step<S: Scorer + ?Sized>(
    scores: &ScoreMatrix,
    arrows: &ArrowMatrix,
    on_path: &Grid<bool>,
    scorer: &S,
    i: usize,
    j: usize,
) -> Option<Step> {
    let last_i = scores.rows() - 1;
    let last_j = scores.cols() - 1;
    let here = scores[(i, j)];

    for dir in Direction::PRIORITY {
        match dir {
            Direction::Diagonal => {
                if i < last_i
                    && j < last_j
                    && on_path[(i + 1, j + 1)]
                    && arrows[(i + 1, j + 1)].contains(Direction::Diagonal)
                {
                    return Some(Step { dir, len: 1 });
                }
            }
            Direction::Up => {
                for k in 1..=max_gap(scorer, last_i - i) {
                    let to = (i + k, j);
                    if on_path[to]
                        && arrows[to].contains(Direction::Up)
                        && gap_link(scorer, here, scores[to], k)
                    {
                        return Some(Step { dir, len: k });
                    }
                }
            }
            Direction::Left => {
                for k in 1..=max_gap(scorer, last_j - j) {
                    let to = (i, j + k);
                    if on_path[to]
                        && arrows[to].contains(Direction::Left)
                        && gap_link(scorer, here, scores[to], k)
                    {
                        return Some(Step { dir, len: k });
                    }
                }
            }
        }
    }
    None
}

/// Builds one optimal alignment of `seq1` and `seq2` from matrices produced by
/// [`build_matrices`](super::matrix::build_matrices) with the same scorer.
///
/// Fails with [`SeqError::MatrixShape`] unless both grids are `(len(seq1) + 1) x (len(seq2) + 1)`.
pub fn traceback<S: Scorer + ?Sized>(
    seq1: &[u8],
    seq2: &[u8],
    scores: &ScoreMatrix,
    arrows: &ArrowMatrix,
    scorer: &S,
) -> SeqResult<Alignment> {
    let expected = (seq1.len() + 1, seq2.len() + 1);
    let score_shape = (scores.rows(), scores.cols());
    let arrow_shape = (arrows.rows(), arrows.cols());
    if score_shape != expected || arrow_shape != expected {
        return Err(SeqError::MatrixShape {
            expected,
            scores: score_shape,
            arrows: arrow_shape,
        });
    }
    Ok(trace(seq1, seq2, scores, arrows, scorer))
}

/// Traceback over matrices whose shape is already known to match the sequences.
pub(crate) fn trace<S: Scorer + ?Sized>(
    seq1: &[u8],
    seq2: &[u8],
    scores: &ScoreMatrix,
    arrows: &ArrowMatrix,
    scorer: &S,
) -> Alignment {
    let n = seq1.len();
    let m = seq2.len();

    let on_path = mark_optimal_cells(scores, arrows, scorer);

    let mut aligned1 = Vec::with_capacity(n + m);
    let mut aligned2 = Vec::with_capacity(n + m);
    let mut i = 0usize;
    let mut j = 0usize;

    while i < n || j < m {
        // Every marked cell except the terminal one has a marked successor.
        let Some(step) = next_step(scores, arrows, &on_path, scorer, i, j) else {
            break;
        };
        match step.dir {
            Direction::Diagonal => {
                aligned1.push(seq1[i]);
                aligned2.push(seq2[j]);
                i += 1;
                j += 1;
            }
            Direction::Up => {
                for _ in 0..step.len {
                    aligned1.push(seq1[i]);
                    aligned2.push(GAP);
                    i += 1;
                }
            }
            Direction::Left => {
                for _ in 0..step.len {
                    aligned1.push(GAP);
                    aligned2.push(seq2[j]);
                    j += 1;
                }
            }
        }
    }

    Alignment {
        seq1: aligned1,
        seq2: aligned2,
        score: scores[(n, m)],
    }
}

/// Recomputes the value of an existing alignment under `scorer`.
///
/// Each maximal run of gap columns on the same side is charged as one gap of its length.
pub fn score_alignment<S: Scorer + ?Sized>(alignment: &Alignment, scorer: &S) -> f64 {
    let mut total = 0.0;
    let mut run: Option<(Direction, usize)> = None;

    for (a, b) in alignment.columns() {
        let side = if a == GAP {
            Some(Direction::Left)
        } else if b == GAP {
            Some(Direction::Up)
        } else {
            None
        };
        match (run, side) {
            (Some((open, len)), Some(dir)) if open == dir => run = Some((open, len + 1)),
            (_, side) => {
                if let Some((_, len)) = run.take() {
                    total += scorer.gap(len);
                }
                match side {
                    Some(dir) => run = Some((dir, 1)),
                    None => total += scorer.substitution(a, b),
                }
            }
        }
    }
    if let Some((_, len)) = run {
        total += scorer.gap(len);
    }
    total
}
