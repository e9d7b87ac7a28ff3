/// Evaluates a fallible `f(i, j) -> SeqResult<f64>` for every `(i, j)` index pair and collects
/// `(i, j, value)` cells, stopping at the first error. Runs on the rayon pool with `parallel`.
macro_rules! par_pair_cells {
    ($pairs:expr, $f:expr) => {{
        let pairs: &[(usize, usize)] = $pairs;
        let f = $f;
        #[cfg(feature = "parallel")]
        let cells: $crate::error::SeqResult<Vec<(usize, usize, f64)>> = {
            use rayon::iter::{IntoParallelIterator, ParallelIterator};
            pairs
                .into_par_iter()
                .map(|&(i, j)| f(i, j).map(|d| (i, j, d)))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let cells: $crate::error::SeqResult<Vec<(usize, usize, f64)>> = pairs
            .iter()
            .map(|&(i, j)| f(i, j).map(|d| (i, j, d)))
            .collect();
        cells
    }};
}
