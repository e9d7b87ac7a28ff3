use std::ops::{Index, IndexMut};

use crate::error::{SeqError, SeqResult};

/// Symbol written into an aligned sequence where the other side has a residue.
pub const GAP: u8 = b'-';

/// Views text as a sequence of one-byte symbols. Every character must be ASCII, so that
/// one character is exactly one alignment column.
pub fn ascii_symbols(text: &str) -> SeqResult<&[u8]> {
    match text.chars().enumerate().find(|(_, ch)| !ch.is_ascii()) {
        Some((pos, ch)) => Err(SeqError::NonAsciiSymbol { ch, pos }),
        None => Ok(text.as_bytes()),
    }
}

/// Predecessor direction of a DP cell.
/// Diagonal consumes both sequences, Up consumes seq1 (gap in seq2), Left consumes seq2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Diagonal = 0b001,
    Up = 0b010,
    Left = 0b100,
}

impl Direction {
    /// All directions in tie-break priority order.
    pub const PRIORITY: [Direction; 3] = [Direction::Diagonal, Direction::Up, Direction::Left];

    pub fn glyph(self) -> char {
        match self {
            Direction::Diagonal => '↖',
            Direction::Up => '↑',
            Direction::Left => '←',
        }
    }
}

/// Set of tied predecessor directions, packed into one byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Arrows(u8);

impl Arrows {
    pub const NONE: Arrows = Arrows(0);

    pub fn single(dir: Direction) -> Self {
        Arrows(dir as u8)
    }

    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir as u8;
    }

    #[inline]
    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir as u8 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Directions present in the set, in priority order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::PRIORITY
            .into_iter()
            .filter(move |&d| self.contains(d))
    }
}

impl FromIterator<Direction> for Arrows {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut arrows = Arrows::NONE;
        for dir in iter {
            arrows.insert(dir);
        }
        arrows
    }
}

/// Dense row-major 2D array. Row `i` corresponds to the length-`i` prefix of seq1.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.rows && j < self.cols {
            Some(&self.data[i * self.cols + j])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |i| self.row(i))
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i * self.cols + j]
    }
}

/// Optimal score (or cost) of every prefix pair.
pub type ScoreMatrix = Grid<f64>;

/// Tied predecessor directions of every cell. Cell (0, 0) is empty.
pub type ArrowMatrix = Grid<Arrows>;

/// A pair of equal-length gapped sequences and the optimal value that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment {
    pub seq1: Vec<u8>,
    pub seq2: Vec<u8>,
    pub score: f64,
}

impl Alignment {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.seq1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq1.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.seq1.iter().copied().zip(self.seq2.iter().copied())
    }

    pub fn ungapped_seq1(&self) -> Vec<u8> {
        self.seq1.iter().copied().filter(|&b| b != GAP).collect()
    }

    pub fn ungapped_seq2(&self) -> Vec<u8> {
        self.seq2.iter().copied().filter(|&b| b != GAP).collect()
    }

    /// Columns holding two different residues. Gap columns are not counted.
    pub fn mismatches(&self) -> usize {
        self.columns()
            .filter(|&(a, b)| a != GAP && b != GAP && a != b)
            .count()
    }

    /// Fraction of columns holding two identical residues.
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let same = self
            .columns()
            .filter(|&(a, b)| a != GAP && a == b)
            .count();
        same as f64 / self.len() as f64
    }
}
