use pyo3::create_exception;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString};

use coolseq_core::align::ascii_symbols;
use coolseq_core::error::SeqError;

create_exception!(_native, ConfigurationError, PyValueError);
create_exception!(_native, MalformedMatrixError, PyValueError);
create_exception!(_native, InsufficientDataError, PyValueError);
create_exception!(_native, SequenceLengthError, PyValueError);
create_exception!(_native, EmptySequenceError, PyValueError);

pub fn to_py_err(err: SeqError) -> PyErr {
    let msg = err.to_string();
    match err {
        SeqError::Configuration { .. } => ConfigurationError::new_err(msg),
        SeqError::MalformedMatrix { .. } => MalformedMatrixError::new_err(msg),
        SeqError::InsufficientData { .. } => InsufficientDataError::new_err(msg),
        SeqError::SequenceLength { .. } => SequenceLengthError::new_err(msg),
        SeqError::EmptySequence => EmptySequenceError::new_err(msg),
        _ => PyValueError::new_err(msg),
    }
}

/// One symbol per `str` character (ASCII only) or per byte of a bytes-like object.
pub fn extract_seq_bytes(obj: &Bound<'_, PyAny>) -> PyResult<Vec<u8>> {
    if let Ok(s) = obj.downcast::<PyString>() {
        return ascii_symbols(s.to_str()?)
            .map(<[u8]>::to_vec)
            .map_err(to_py_err);
    }

    obj.extract::<Vec<u8>>()
        .map_err(|_| PyTypeError::new_err("expected str or bytes-like object"))
}

/// Reads a `{name: number}` options dict. Key validation is left to the scoring constructors.
pub fn extract_options(options: Option<&Bound<'_, PyDict>>) -> PyResult<Vec<(String, f64)>> {
    let Some(options) = options else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(options.len());
    for (key, value) in options.iter() {
        let key: String = key
            .extract()
            .map_err(|_| PyTypeError::new_err("option names must be strings"))?;
        let value: f64 = value
            .extract()
            .map_err(|_| PyTypeError::new_err(format!("option '{key}' must be a number")))?;
        out.push((key, value));
    }
    Ok(out)
}

pub fn to_labels(names: Vec<String>) -> Vec<Box<str>> {
    names.into_iter().map(String::into_boxed_str).collect()
}

pub fn from_labels(labels: &[Box<str>]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("ConfigurationError", py.get_type_bound::<ConfigurationError>())?;
    m.add("MalformedMatrixError", py.get_type_bound::<MalformedMatrixError>())?;
    m.add("InsufficientDataError", py.get_type_bound::<InsufficientDataError>())?;
    m.add("SequenceLengthError", py.get_type_bound::<SequenceLengthError>())?;
    m.add("EmptySequenceError", py.get_type_bound::<EmptySequenceError>())?;
    Ok(())
}
