use crate::align::{needleman_wunsch, LinearScoring};
use crate::error::{SeqError, SeqResult};

/// Relative tolerance used when checking symmetry of caller-supplied matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Square, symmetric, zero-diagonal distance matrix with one label per taxon.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<Box<str>>,
    data: Vec<f64>,
    n: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from row-major `data` of length `labels.len()^2`.
    pub fn new(labels: Vec<Box<str>>, data: Vec<f64>) -> SeqResult<Self> {
        let n = labels.len();
        if data.len() != n * n {
            return Err(SeqError::malformed(format!(
                "expected {} entries for {} labels, got {}",
                n * n,
                n,
                data.len()
            )));
        }
        let dm = Self { labels, data, n };
        dm.validate()?;
        Ok(dm)
    }

    /// Builds a matrix from nested rows, the layout callers usually have at hand.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], labels: Vec<Box<str>>) -> SeqResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(SeqError::malformed(format!(
                    "row {i} has {} entries, expected {n} (matrix is not square)",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        if labels.len() != n {
            return Err(SeqError::malformed(format!(
                "{} labels for a {n}x{n} matrix",
                labels.len()
            )));
        }
        Self::new(labels, data)
    }

    fn validate(&self) -> SeqResult<()> {
        let n = self.n;
        for i in 0..n {
            let d = self.get(i, i);
            if d != 0.0 {
                return Err(SeqError::malformed(format!(
                    "diagonal entry ({i}, {i}) is {d}, expected 0"
                )));
            }
            for j in (i + 1)..n {
                let a = self.get(i, j);
                let b = self.get(j, i);
                if !a.is_finite() || !b.is_finite() {
                    return Err(SeqError::malformed(format!(
                        "entry ({i}, {j}) is not finite"
                    )));
                }
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(SeqError::malformed(format!(
                        "not symmetric at ({i}, {j}): {a} vs {b}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn labels(&self) -> &[Box<str>] {
        &self.labels
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, val: f64) {
        self.data[i * self.n + j] = val;
        self.data[j * self.n + i] = val;
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.n.max(1)).map(|r| r.to_vec()).collect()
    }
}

/// Jukes-Cantor (JC69) distance between two aligned nucleotide sequences.
///
/// `p` is the fraction of columns whose symbols differ (ASCII case-insensitive, gap symbols
/// included); the distance is `-3/4 * ln(1 - 4p/3)`.
pub fn jc_distance(seq_a: &[u8], seq_b: &[u8]) -> SeqResult<f64> {
    if seq_a.len() != seq_b.len() {
        return Err(SeqError::SequenceLength {
            left: seq_a.len(),
            right: seq_b.len(),
        });
    }
    if seq_a.is_empty() {
        return Err(SeqError::EmptySequence);
    }

    let diffs = seq_a
        .iter()
        .zip(seq_b)
        .filter(|(x, y)| !x.eq_ignore_ascii_case(y))
        .count();
    if diffs == 0 {
        return Ok(0.0);
    }

    let p = diffs as f64 / seq_a.len() as f64;
    let arg = 1.0 - 4.0 * p / 3.0;
    if arg <= 0.0 {
        return Err(SeqError::SaturatedDistance { p });
    }
    Ok(-0.75 * arg.ln())
}

fn validate_distance_inputs(seqs: &[&[u8]], labels: &[Box<str>]) -> SeqResult<()> {
    let n = seqs.len();
    if n < 2 {
        return Err(SeqError::InsufficientData {
            method: "distance matrix",
            needed: 2,
            n,
        });
    }
    if labels.len() != n {
        return Err(SeqError::LabelCountMismatch {
            labels: labels.len(),
            n,
        });
    }
    Ok(())
}

fn upper_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

fn assemble(labels: Vec<Box<str>>, cells: Vec<(usize, usize, f64)>) -> SeqResult<DistanceMatrix> {
    let n = labels.len();
    let mut data = vec![0.0f64; n * n];
    for (i, j, d) in cells {
        data[i * n + j] = d;
        data[j * n + i] = d;
    }
    DistanceMatrix::new(labels, data)
}

/// Jukes-Cantor distances between every pair of pre-aligned, equal-length sequences.
pub fn jc_distance_matrix(seqs: &[&[u8]], labels: Vec<Box<str>>) -> SeqResult<DistanceMatrix> {
    validate_distance_inputs(seqs, &labels)?;
    let expected = seqs[0].len();
    for seq in seqs {
        if seq.len() != expected {
            return Err(SeqError::SequenceLength {
                left: expected,
                right: seq.len(),
            });
        }
    }

    let pairs = upper_pairs(seqs.len());
    log::debug!("computing {} Jukes-Cantor distances", pairs.len());

    let cells = par_pair_cells!(&pairs, |i: usize, j: usize| jc_distance(seqs[i], seqs[j]))?;
    assemble(labels, cells)
}

/// Aligns every pair of raw sequences with Needleman-Wunsch, then takes the Jukes-Cantor
/// distance of each padded pair.
///
/// Pairs are independent, so they are aligned in parallel when the `parallel` feature is on.
pub fn pairwise_jc_matrix(
    seqs: &[&[u8]],
    labels: Vec<Box<str>>,
    scoring: &LinearScoring,
) -> SeqResult<DistanceMatrix> {
    validate_distance_inputs(seqs, &labels)?;

    let pairs = upper_pairs(seqs.len());
    log::debug!("aligning {} sequence pairs", pairs.len());

    let cells = par_pair_cells!(&pairs, |i: usize, j: usize| {
        let alignment = needleman_wunsch(seqs[i], seqs[j], scoring);
        jc_distance(&alignment.seq1, &alignment.seq2)
    })?;
    assemble(labels, cells)
}
