//! Packed storage for a symmetric relation.
//!
//! Only the lower triangle (diagonal included) is kept, row by row:
//!
//! ```text
//! | 0  -  -  -  - |
//! | 1  2  -  -  - |
//! | 3  4  5  -  - |
//! | 6  7  8  9  - |
//! | 10 11 12 13 14|
//! ```
//!
//! Cell `(i, j)` with `j <= i` lives at `i(i+1)/2 + j`; `(4, 2)` is cell 12.
//! The upper triangle is served by swapping the arguments, so `get` and
//! `set` never care about argument order.

/// A symmetric `size x size` matrix stored in `size(size+1)/2` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedSymmetricMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl PackedSymmetricMatrix {
    /// Create a zero-filled matrix over `size` ids.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; Self::cell_count(size)],
        }
    }

    /// Number of cells needed for `size` ids.
    #[inline]
    pub fn cell_count(size: usize) -> usize {
        size * (size + 1) / 2
    }

    /// Flat cell index of `(i, j)`, in either order.
    ///
    /// Both indices must be `< size`; larger values are a caller bug.
    #[inline]
    pub fn offset(i: usize, j: usize) -> usize {
        let (hi, lo) = if i >= j { (i, j) } else { (j, i) };
        hi * (hi + 1) / 2 + lo
    }

    /// Value at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.size && j < self.size);
        self.cells[Self::offset(i, j)]
    }

    /// Write `value` at `(i, j)` and, implicitly, `(j, i)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.size && j < self.size);
        self.cells[Self::offset(i, j)] = value;
    }

    /// Number of ids (rows) the matrix covers.
    pub fn size(&self) -> usize {
        self.size
    }
}
