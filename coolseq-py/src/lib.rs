use pyo3::prelude::*;

mod align;
mod phylo;
mod utils;

#[pymodule]
fn _native(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    utils::register(m)?;
    align::register(m)?;
    phylo::register(m)?;
    Ok(())
}
