#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyDict, PyModule};

use coolseq_core::align::LinearScoring;
use coolseq_core::phylo::{self, ClusterNode, Dendrogram, DistanceMatrix, PairGroupMethod};

use crate::utils::{extract_options, extract_seq_bytes, from_labels, to_labels, to_py_err};

type LinkageRow = (usize, usize, f64, usize);

/// Nested tuple form of a tree node, the same shape its `Display` prints.
fn node_to_py(py: Python<'_>, node: &ClusterNode) -> PyObject {
    match node {
        ClusterNode::Leaf { index, label } => (*index, &**label).into_py(py),
        ClusterNode::Group {
            height,
            left,
            right,
        } => (*height, node_to_py(py, left), node_to_py(py, right)).into_py(py),
        ClusterNode::Joined {
            lengths,
            left,
            right,
        } => (*lengths, node_to_py(py, left), node_to_py(py, right)).into_py(py),
    }
}

fn distance_matrix(matrix: Vec<Vec<f64>>, names: Vec<String>) -> PyResult<DistanceMatrix> {
    DistanceMatrix::from_rows(&matrix, to_labels(names)).map_err(to_py_err)
}

fn dendrogram_to_py(
    py: Python<'_>,
    dendro: Dendrogram,
) -> (PyObject, Vec<LinkageRow>, Vec<String>) {
    let rows: Vec<LinkageRow> = dendro
        .linkage()
        .iter()
        .map(|r| (r.a, r.b, r.height, r.size))
        .collect();
    let (root, _, names) = dendro.into_parts();
    (node_to_py(py, &root), rows, from_labels(&names))
}

fn run_pair_group(
    py: Python<'_>,
    matrix: Vec<Vec<f64>>,
    names: Vec<String>,
    method: PairGroupMethod,
) -> PyResult<(PyObject, Vec<LinkageRow>, Vec<String>)> {
    let dm = distance_matrix(matrix, names)?;
    let dendro = py
        .allow_threads(|| phylo::pair_group(&dm, method))
        .map_err(to_py_err)?;
    Ok(dendrogram_to_py(py, dendro))
}

#[pyfunction]
fn jc_distance(seq_a: &Bound<'_, PyAny>, seq_b: &Bound<'_, PyAny>) -> PyResult<f64> {
    let a = extract_seq_bytes(seq_a)?;
    let b = extract_seq_bytes(seq_b)?;
    phylo::jc_distance(&a, &b).map_err(to_py_err)
}

/// Jukes-Cantor distances of pre-aligned sequences, as a list of rows.
#[pyfunction]
fn jc_distance_matrix(
    py: Python<'_>,
    seqs: Vec<Bound<'_, PyAny>>,
    names: Vec<String>,
) -> PyResult<Vec<Vec<f64>>> {
    let seqs = seqs
        .iter()
        .map(extract_seq_bytes)
        .collect::<PyResult<Vec<_>>>()?;
    let refs: Vec<&[u8]> = seqs.iter().map(Vec::as_slice).collect();
    let labels = to_labels(names);
    let dm = py
        .allow_threads(|| phylo::jc_distance_matrix(&refs, labels))
        .map_err(to_py_err)?;
    Ok(dm.to_rows())
}

/// Aligns every pair (Needleman-Wunsch), then takes Jukes-Cantor of each alignment.
#[pyfunction]
#[pyo3(signature = (seqs, names, options=None))]
fn pairwise_jc_matrix(
    py: Python<'_>,
    seqs: Vec<Bound<'_, PyAny>>,
    names: Vec<String>,
    options: Option<&Bound<'_, PyDict>>,
) -> PyResult<Vec<Vec<f64>>> {
    let pairs = extract_options(options)?;
    let scoring = LinearScoring::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), *v)))
        .map_err(to_py_err)?;
    let seqs = seqs
        .iter()
        .map(extract_seq_bytes)
        .collect::<PyResult<Vec<_>>>()?;
    let refs: Vec<&[u8]> = seqs.iter().map(Vec::as_slice).collect();
    let labels = to_labels(names);
    let dm = py
        .allow_threads(|| phylo::pairwise_jc_matrix(&refs, labels, &scoring))
        .map_err(to_py_err)?;
    Ok(dm.to_rows())
}

#[pyfunction]
fn wpgma(
    py: Python<'_>,
    matrix: Vec<Vec<f64>>,
    names: Vec<String>,
) -> PyResult<(PyObject, Vec<LinkageRow>, Vec<String>)> {
    run_pair_group(py, matrix, names, PairGroupMethod::Weighted)
}

#[pyfunction]
fn upgma(
    py: Python<'_>,
    matrix: Vec<Vec<f64>>,
    names: Vec<String>,
) -> PyResult<(PyObject, Vec<LinkageRow>, Vec<String>)> {
    run_pair_group(py, matrix, names, PairGroupMethod::Unweighted)
}

#[pyfunction]
fn neighbor_joining(
    py: Python<'_>,
    matrix: Vec<Vec<f64>>,
    names: Vec<String>,
) -> PyResult<(PyObject, Vec<String>)> {
    let dm = distance_matrix(matrix, names)?;
    let tree = py
        .allow_threads(|| phylo::neighbor_joining(&dm))
        .map_err(to_py_err)?;
    let (root, names) = tree.into_parts();
    Ok((node_to_py(py, &root), from_labels(&names)))
}

#[pyfunction]
#[pyo3(signature = (matrix, names, method = "nj"))]
fn newick(
    py: Python<'_>,
    matrix: Vec<Vec<f64>>,
    names: Vec<String>,
    method: &str,
) -> PyResult<String> {
    let dm = distance_matrix(matrix, names)?;
    let tree = match method {
        "nj" => py.allow_threads(|| phylo::neighbor_joining(&dm)),
        "upgma" => py.allow_threads(|| phylo::upgma(&dm)).map(|d| d.tree().clone()),
        "wpgma" => py.allow_threads(|| phylo::wpgma(&dm)).map(|d| d.tree().clone()),
        _ => {
            return Err(PyValueError::new_err(format!(
                "unknown tree method '{method}' (valid: 'nj', 'upgma', 'wpgma')"
            )));
        }
    };

    tree.map(|t| phylo::to_newick(&t)).map_err(to_py_err)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(jc_distance, m)?)?;
    m.add_function(wrap_pyfunction!(jc_distance_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(pairwise_jc_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(wpgma, m)?)?;
    m.add_function(wrap_pyfunction!(upgma, m)?)?;
    m.add_function(wrap_pyfunction!(neighbor_joining, m)?)?;
    m.add_function(wrap_pyfunction!(newick, m)?)?;
    Ok(())
}
