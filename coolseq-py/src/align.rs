#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyDict};

use coolseq_core::align as core_align;
use coolseq_core::align::{AffineScoring, LinearScoring, Scorer};

use crate::utils::{extract_options, extract_seq_bytes, to_py_err};

fn linear_scoring(options: Option<&Bound<'_, PyDict>>) -> PyResult<LinearScoring> {
    let pairs = extract_options(options)?;
    LinearScoring::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), *v))).map_err(to_py_err)
}

fn affine_scoring(options: Option<&Bound<'_, PyDict>>) -> PyResult<AffineScoring> {
    let pairs = extract_options(options)?;
    AffineScoring::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), *v))).map_err(to_py_err)
}

enum Model {
    Linear(LinearScoring),
    Affine(AffineScoring),
}

impl Model {
    fn resolve(name: &str, options: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        match name {
            "linear" | "nw" => Ok(Model::Linear(linear_scoring(options)?)),
            "affine" | "wsb" => Ok(Model::Affine(affine_scoring(options)?)),
            _ => Err(PyValueError::new_err(format!(
                "unknown alignment model '{name}' (valid: 'linear', 'affine')"
            ))),
        }
    }

    fn scorer(&self) -> &(dyn Scorer + Sync) {
        match self {
            Model::Linear(s) => s,
            Model::Affine(s) => s,
        }
    }
}

#[pyclass(frozen, name = "Alignment")]
pub struct PyAlignment {
    inner: core_align::Alignment,
}

#[pymethods]
impl PyAlignment {
    #[getter]
    fn seq1(&self) -> String {
        String::from_utf8_lossy(&self.inner.seq1).into_owned()
    }

    #[getter]
    fn seq2(&self) -> String {
        String::from_utf8_lossy(&self.inner.seq2).into_owned()
    }

    #[getter]
    fn score(&self) -> f64 {
        self.inner.score
    }

    fn identity(&self) -> f64 {
        self.inner.identity()
    }

    fn mismatches(&self) -> usize {
        self.inner.mismatches()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Alignment(len={}, score={})",
            self.inner.len(),
            self.inner.score
        )
    }

    fn __str__(&self) -> String {
        core_align::render(&self.inner)
    }
}

/// Score and arrow grids of one matrix fill.
#[pyclass(frozen, name = "Matrices")]
pub struct PyMatrices {
    scores: core_align::ScoreMatrix,
    arrows: core_align::ArrowMatrix,
}

#[pymethods]
impl PyMatrices {
    fn scores(&self) -> Vec<Vec<f64>> {
        self.scores.iter_rows().map(|r| r.to_vec()).collect()
    }

    /// Arrow glyphs per cell, ties in priority order.
    fn arrows(&self) -> Vec<Vec<String>> {
        self.arrows
            .iter_rows()
            .map(|r| r.iter().map(|a| a.to_string()).collect())
            .collect()
    }

    fn format_scores(&self) -> String {
        self.scores.to_string()
    }

    fn format_arrows(&self) -> String {
        self.arrows.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "Matrices(rows={}, cols={})",
            self.scores.rows(),
            self.scores.cols()
        )
    }
}

#[pyfunction]
#[pyo3(signature = (seq1, seq2, options=None))]
fn needleman_wunsch(
    py: Python<'_>,
    seq1: &Bound<'_, PyAny>,
    seq2: &Bound<'_, PyAny>,
    options: Option<&Bound<'_, PyDict>>,
) -> PyResult<PyAlignment> {
    let a = extract_seq_bytes(seq1)?;
    let b = extract_seq_bytes(seq2)?;
    let scoring = linear_scoring(options)?;
    let inner = py.allow_threads(|| core_align::needleman_wunsch(&a, &b, &scoring));
    Ok(PyAlignment { inner })
}

#[pyfunction]
#[pyo3(signature = (seq1, seq2, options=None))]
fn waterman_smith_beyer(
    py: Python<'_>,
    seq1: &Bound<'_, PyAny>,
    seq2: &Bound<'_, PyAny>,
    options: Option<&Bound<'_, PyDict>>,
) -> PyResult<PyAlignment> {
    let a = extract_seq_bytes(seq1)?;
    let b = extract_seq_bytes(seq2)?;
    let scoring = affine_scoring(options)?;
    let inner = py.allow_threads(|| core_align::waterman_smith_beyer(&a, &b, &scoring));
    Ok(PyAlignment { inner })
}

#[pyfunction]
#[pyo3(signature = (seq1, seq2, model="linear", options=None))]
fn build_matrices(
    py: Python<'_>,
    seq1: &Bound<'_, PyAny>,
    seq2: &Bound<'_, PyAny>,
    model: &str,
    options: Option<&Bound<'_, PyDict>>,
) -> PyResult<PyMatrices> {
    let a = extract_seq_bytes(seq1)?;
    let b = extract_seq_bytes(seq2)?;
    let model = Model::resolve(model, options)?;
    let scorer = model.scorer();
    let (scores, arrows) = py.allow_threads(|| core_align::build_matrices(&a, &b, scorer));
    Ok(PyMatrices { scores, arrows })
}

/// The fully resolved `{name: value}` options for a model, defaults filled in.
#[pyfunction]
#[pyo3(signature = (model="linear", options=None))]
fn scoring_options(
    model: &str,
    options: Option<&Bound<'_, PyDict>>,
) -> PyResult<Vec<(&'static str, f64)>> {
    Ok(Model::resolve(model, options)?.scorer().options())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAlignment>()?;
    m.add_class::<PyMatrices>()?;
    m.add_function(wrap_pyfunction!(needleman_wunsch, m)?)?;
    m.add_function(wrap_pyfunction!(waterman_smith_beyer, m)?)?;
    m.add_function(wrap_pyfunction!(build_matrices, m)?)?;
    m.add_function(wrap_pyfunction!(scoring_options, m)?)?;
    Ok(())
}
