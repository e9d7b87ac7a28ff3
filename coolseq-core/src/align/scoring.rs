//! Scoring configurations for the two gap models.
//!
//! [`LinearScoring`] is a similarity model (higher is better) that charges a flat
//! `gap_extend` per gap column. [`AffineScoring`] is a cost model (lower is better) where a
//! gap of length `L` costs `gap_start + gap_extend * L` and may be opened at any length in
//! a single DP transition.

use serde::Deserialize;

use crate::error::{SeqError, SeqResult};

/// Which way the DP recurrence optimizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    Maximize,
    Minimize,
}

impl Objective {
    /// True when `candidate` is strictly better than `incumbent`.
    #[inline]
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Objective::Maximize => candidate > incumbent,
            Objective::Minimize => candidate < incumbent,
        }
    }

    pub fn worst(self) -> f64 {
        match self {
            Objective::Maximize => f64::NEG_INFINITY,
            Objective::Minimize => f64::INFINITY,
        }
    }
}

/// Everything the matrix engine and traceback need to know about a gap model.
pub trait Scorer {
    fn objective(&self) -> Objective;

    /// Substitution score of aligning `a` against `b`.
    fn substitution(&self, a: u8, b: u8) -> f64;

    /// Value of a single gap run of `len` columns. `gap(0)` is 0.
    fn gap(&self, len: usize) -> f64;

    /// Whether a DP transition may open a gap longer than one column.
    fn arbitrary_gaps(&self) -> bool;

    /// Fully resolved configuration, defaults filled in.
    fn options(&self) -> Vec<(&'static str, f64)>;
}

/// Needleman-Wunsch similarity scoring with a constant per-column gap penalty.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearScoring {
    #[serde(rename = "match")]
    pub match_score: f64,
    #[serde(rename = "mismatch")]
    pub mismatch_score: f64,
    pub gap_extend: f64,
}

impl Default for LinearScoring {
    fn default() -> Self {
        Self {
            match_score: 1.0,
            mismatch_score: -1.0,
            gap_extend: -1.0,
        }
    }
}

impl LinearScoring {
    pub const KEYS: [&'static str; 3] = ["match", "mismatch", "gap_extend"];

    pub fn new(match_score: f64, mismatch_score: f64, gap_extend: f64) -> SeqResult<Self> {
        let scoring = Self {
            match_score,
            mismatch_score,
            gap_extend,
        };
        scoring.validate()?;
        Ok(scoring)
    }

    /// Overrides the defaults with `(key, value)` pairs. Unknown keys are rejected.
    pub fn from_pairs<'a, I>(pairs: I) -> SeqResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut scoring = Self::default();
        for (key, value) in pairs {
            match key {
                "match" => scoring.match_score = value,
                "mismatch" => scoring.mismatch_score = value,
                "gap_extend" => scoring.gap_extend = value,
                other => return Err(unknown_key(other, &Self::KEYS)),
            }
        }
        scoring.validate()?;
        Ok(scoring)
    }

    pub fn from_toml_str(text: &str) -> SeqResult<Self> {
        let scoring: Self = toml::from_str(text).map_err(|e| SeqError::config(e.to_string()))?;
        scoring.validate()?;
        Ok(scoring)
    }

    pub fn validate(&self) -> SeqResult<()> {
        check_finite(&self.options())
    }
}

impl Scorer for LinearScoring {
    fn objective(&self) -> Objective {
        Objective::Maximize
    }

    #[inline]
    fn substitution(&self, a: u8, b: u8) -> f64 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    #[inline]
    fn gap(&self, len: usize) -> f64 {
        self.gap_extend * len as f64
    }

    fn arbitrary_gaps(&self) -> bool {
        false
    }

    fn options(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("match", self.match_score),
            ("mismatch", self.mismatch_score),
            ("gap_extend", self.gap_extend),
        ]
    }
}

/// Waterman-Smith-Beyer cost scoring: 0 is a perfect column and every gap run pays an
/// opening cost on top of its per-column cost.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AffineScoring {
    #[serde(rename = "match")]
    pub match_score: f64,
    #[serde(rename = "mismatch")]
    pub mismatch_score: f64,
    pub gap_start: f64,
    pub gap_extend: f64,
}

impl Default for AffineScoring {
    fn default() -> Self {
        Self {
            match_score: 0.0,
            mismatch_score: 1.0,
            gap_start: 1.0,
            gap_extend: 1.0,
        }
    }
}

impl AffineScoring {
    pub const KEYS: [&'static str; 4] = ["match", "mismatch", "gap_start", "gap_extend"];

    pub fn new(
        match_score: f64,
        mismatch_score: f64,
        gap_start: f64,
        gap_extend: f64,
    ) -> SeqResult<Self> {
        let scoring = Self {
            match_score,
            mismatch_score,
            gap_start,
            gap_extend,
        };
        scoring.validate()?;
        Ok(scoring)
    }

    /// Overrides the defaults with `(key, value)` pairs. Unknown keys are rejected.
    pub fn from_pairs<'a, I>(pairs: I) -> SeqResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut scoring = Self::default();
        for (key, value) in pairs {
            match key {
                "match" => scoring.match_score = value,
                "mismatch" => scoring.mismatch_score = value,
                "gap_start" => scoring.gap_start = value,
                "gap_extend" => scoring.gap_extend = value,
                other => return Err(unknown_key(other, &Self::KEYS)),
            }
        }
        scoring.validate()?;
        Ok(scoring)
    }

    pub fn from_toml_str(text: &str) -> SeqResult<Self> {
        let scoring: Self = toml::from_str(text).map_err(|e| SeqError::config(e.to_string()))?;
        scoring.validate()?;
        Ok(scoring)
    }

    pub fn validate(&self) -> SeqResult<()> {
        check_finite(&self.options())
    }
}

impl Scorer for AffineScoring {
    fn objective(&self) -> Objective {
        Objective::Minimize
    }

    #[inline]
    fn substitution(&self, a: u8, b: u8) -> f64 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    #[inline]
    fn gap(&self, len: usize) -> f64 {
        if len == 0 {
            0.0
        } else {
            self.gap_start + self.gap_extend * len as f64
        }
    }

    fn arbitrary_gaps(&self) -> bool {
        true
    }

    fn options(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("match", self.match_score),
            ("mismatch", self.mismatch_score),
            ("gap_start", self.gap_start),
            ("gap_extend", self.gap_extend),
        ]
    }
}

fn unknown_key(key: &str, known: &[&str]) -> SeqError {
    SeqError::config(format!(
        "unrecognized option '{key}' (valid: {})",
        known.join(", ")
    ))
}

fn check_finite(options: &[(&'static str, f64)]) -> SeqResult<()> {
    for &(key, value) in options {
        if !value.is_finite() {
            return Err(SeqError::config(format!("{key} must be finite, got {value}")));
        }
    }
    Ok(())
}
