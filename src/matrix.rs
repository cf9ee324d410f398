//! Dense row-major matrix storage for conditional tables and basis matrices.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A dense matrix of `f64`, stored row-major.
///
/// Used for the conditional tables of network nodes (one row per joint
/// parent assignment, one column per child value) and for action-augmented
/// basis matrices (one row per state assignment, one column per action
/// assignment). No sparse representation is provided.
///
/// Deserialization goes through [`DenseMatrix::from_raw`], so a document
/// whose data length disagrees with its declared shape is rejected instead
/// of producing a matrix that panics (or reads the wrong cell) later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDenseMatrix")]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Unvalidated mirror of [`DenseMatrix`], used only as a deserialization
/// intermediate.
#[derive(Deserialize)]
struct RawDenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawDenseMatrix> for DenseMatrix {
    type Error = Error;

    fn try_from(raw: RawDenseMatrix) -> Result<Self> {
        Self::from_raw(raw.rows, raw.cols, raw.data)
    }
}

impl DenseMatrix {
    /// A zero-filled matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMatrix`] for no rows, or [`Error::RaggedMatrix`]
    /// if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::EmptyMatrix);
        };
        let cols = first.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(Error::RaggedMatrix {
                    row,
                    expected: cols,
                    got: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build a matrix from an already row-major data vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatrixDataLength`] if `data.len() != rows * cols`.
    pub fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::MatrixDataLength {
                rows,
                cols,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "row {row} out of range ({} rows)", self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// The backing row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}
