use std::fmt;

use super::types::{Alignment, Arrows, Grid, GAP};

const ORIGIN_GLYPH: char = '∅';

/// Three-line view of an alignment: seq1, match markers, seq2.
///
/// The marker line has `|` where both columns hold the same residue and a space otherwise.
pub fn render(alignment: &Alignment) -> String {
    let markers: String = alignment
        .columns()
        .map(|(a, b)| if a != GAP && a == b { '|' } else { ' ' })
        .collect();
    format!(
        "{}\n{}\n{}",
        String::from_utf8_lossy(&alignment.seq1),
        markers,
        String::from_utf8_lossy(&alignment.seq2)
    )
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

fn write_rows<T, F>(grid: &Grid<T>, f: &mut fmt::Formatter<'_>, mut cell: F) -> fmt::Result
where
    F: FnMut(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    for (i, row) in grid.iter_rows().enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        f.write_str("[")?;
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                f.write_str(", ")?;
            }
            cell(value, f)?;
        }
        f.write_str("]")?;
    }
    Ok(())
}

/// One bracketed, comma-separated row per line, e.g. `[0, -1, -2]`.
impl fmt::Display for Grid<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(self, f, |v, f| write!(f, "{v}"))
    }
}

/// Same row layout as the score matrix, one glyph group per cell. Tied directions are
/// written side by side in priority order.
impl fmt::Display for Grid<Arrows> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(self, f, |arrows, f| write!(f, "{arrows}"))
    }
}

impl fmt::Display for Arrows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{ORIGIN_GLYPH}");
        }
        for dir in self.iter() {
            write!(f, "{}", dir.glyph())?;
        }
        Ok(())
    }
}
