use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeqError {
    #[error("invalid scoring configuration: {msg}")]
    Configuration { msg: String },

    #[error("malformed distance matrix: {msg}")]
    MalformedMatrix { msg: String },

    #[error("{method} needs at least {needed} taxa, got {n}")]
    InsufficientData {
        method: &'static str,
        needed: usize,
        n: usize,
    },

    #[error("sequence length mismatch: {left} vs {right}")]
    SequenceLength { left: usize, right: usize },

    #[error("cannot compute a distance from an empty sequence")]
    EmptySequence,

    #[error("Jukes-Cantor distance is undefined for p = {p:.4} (p must be < 0.75)")]
    SaturatedDistance { p: f64 },

    #[error("label count mismatch (labels={labels}, sequences={n})")]
    LabelCountMismatch { labels: usize, n: usize },

    #[error("matrix shape mismatch: expected {expected:?}, got scores {scores:?} and arrows {arrows:?}")]
    MatrixShape {
        expected: (usize, usize),
        scores: (usize, usize),
        arrows: (usize, usize),
    },

    #[error("non-ASCII character {ch:?} at position {pos}")]
    NonAsciiSymbol { ch: char, pos: usize },

    #[error("linkage csv write error: {0}")]
    LinkageWrite(#[from] csv::Error),
}

pub type SeqResult<T> = Result<T, SeqError>;

impl SeqError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SeqError::Configuration { msg: msg.into() }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SeqError::MalformedMatrix { msg: msg.into() }
    }
}
