use std::{
    fmt,
    ops::{Index, IndexMut, Mul},
};

use itertools::Itertools;

use crate::{prime::ValidPrime, vector::FpVector};

/// A matrix! In particular, a matrix with values in F_p.
///
/// Rows are [`FpVector`]s of length `columns`. The struct also carries the pivot data of the last
/// call to [`Matrix::row_reduce`]: `pivots()[c]` is the row whose pivot sits in column `c`, or `-1`
/// if there is none. The pivot data is not kept in sync with later mutation.
#[derive(Clone)]
pub struct Matrix {
    p: ValidPrime,
    columns: usize,
    vectors: Vec<FpVector>,
    pivots: Vec<isize>,
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p && self.columns == other.columns && self.vectors == other.vectors
    }
}

impl Eq for Matrix {}

impl Matrix {
    /// Produces a new matrix over F_p with the specified number of rows and columns, initialized
    /// to the 0 matrix.
    pub fn new(p: ValidPrime, rows: usize, columns: usize) -> Self {
        let vectors = (0..rows).map(|_| FpVector::new(p, columns)).collect();
        Self {
            p,
            columns,
            vectors,
            pivots: Vec::new(),
        }
    }

    pub fn identity(p: ValidPrime, dim: usize) -> Self {
        let mut result = Self::new(p, dim, dim);
        for i in 0..dim {
            result[i].set_entry(i, 1);
        }
        result
    }

    /// Build a matrix out of rows that all have length `columns`.
    pub fn from_rows(p: ValidPrime, vectors: Vec<FpVector>, columns: usize) -> Self {
        for v in &vectors {
            assert_eq!(v.len(), columns, "row has the wrong length");
            assert_eq!(v.prime(), p, "row lives over the wrong prime");
        }
        Self {
            p,
            columns,
            vectors,
            pivots: Vec::new(),
        }
    }

    /// Produces a matrix from a list of rows. If `input.len() == 0` this returns a matrix with 0
    /// rows and 0 columns.
    ///
    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime};
    /// let p = ValidPrime::new(7);
    /// let input = [vec![1, 3, 6], vec![0, 3, 4]];
    ///
    /// let m = Matrix::from_vec(p, &input);
    /// assert_eq!(m.to_vec(), input);
    /// ```
    pub fn from_vec(p: ValidPrime, input: &[Vec<u32>]) -> Self {
        let columns = input.first().map_or(0, Vec::len);
        let vectors = input
            .iter()
            .map(|row| {
                assert_eq!(row.len(), columns, "ragged matrix input");
                FpVector::from_slice(p, row)
            })
            .collect();
        Self::from_rows(p, vectors, columns)
    }

    pub fn to_vec(&self) -> Vec<Vec<u32>> {
        self.vectors.iter().map(FpVector::to_vec).collect()
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    pub fn rows(&self) -> usize {
        self.vectors.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FpVector> {
        self.vectors.iter()
    }

    pub fn entry(&self, row: usize, column: usize) -> u32 {
        self.vectors[row].entry(column)
    }

    pub fn set_entry(&mut self, row: usize, column: usize, value: u32) {
        self.vectors[row].set_entry(column, value);
    }

    pub fn is_zero(&self) -> bool {
        self.vectors.iter().all(FpVector::is_zero)
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::new(self.p, self.columns, self.rows());
        for (i, row) in self.iter().enumerate() {
            for (j, x) in row.iter_nonzero() {
                result[j].set_entry(i, x);
            }
        }
        result
    }

    /// Stack `other` below `self`. Both must have the same number of columns.
    pub fn stack(&self, other: &Self) -> Self {
        assert_eq!(self.p, other.p);
        assert_eq!(
            self.columns, other.columns,
            "stacking matrices with different column counts"
        );
        let vectors = self.iter().chain(other.iter()).cloned().collect();
        Self::from_rows(self.p, vectors, self.columns)
    }

    /// The block diagonal matrix with `self` in the top left and `other` in the bottom right.
    pub fn block_sum(&self, other: &Self) -> Self {
        assert_eq!(self.p, other.p);
        let columns = self.columns + other.columns;
        let mut result = Self::new(self.p, self.rows() + other.rows(), columns);
        for (i, row) in self.iter().enumerate() {
            for (j, x) in row.iter_nonzero() {
                result[i].set_entry(j, x);
            }
        }
        for (i, row) in other.iter().enumerate() {
            for (j, x) in row.iter_nonzero() {
                result[self.rows() + i].set_entry(self.columns + j, x);
            }
        }
        result
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) {
        self.vectors.swap(i, j);
    }

    /// Add `coeff` times row `source` to row `target`.
    pub fn row_op(&mut self, target: usize, source: usize, coeff: u32) {
        assert_ne!(target, source);
        let (target_row, source_row) = if target < source {
            let (lo, hi) = self.vectors.split_at_mut(source);
            (&mut lo[target], &hi[0])
        } else {
            let (lo, hi) = self.vectors.split_at_mut(target);
            (&mut hi[0], &lo[source])
        };
        target_row.add(source_row, coeff);
    }

    /// The pivots recorded by the last call to [`Matrix::row_reduce`].
    pub fn pivots(&self) -> &[isize] {
        &self.pivots
    }

    /// Perform row reduction to reduced row echelon form and return the rank.
    ///
    /// Nonzero rows end up on top, ordered by pivot column, and every pivot column is zero away
    /// from its pivot. The pivot positions are recorded and can be read off with
    /// [`Matrix::pivots`].
    ///
    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime};
    /// let p = ValidPrime::new(7);
    /// let input = [
    ///     vec![1, 3, 6],
    ///     vec![0, 3, 4],
    /// ];
    ///
    /// let result = [
    ///     vec![1, 0, 2],
    ///     vec![0, 1, 6],
    /// ];
    ///
    /// let mut m = Matrix::from_vec(p, &input);
    /// assert_eq!(m.row_reduce(), 2);
    ///
    /// assert_eq!(m, Matrix::from_vec(p, &result));
    /// assert_eq!(m.pivots(), &[0, 1, -1]);
    /// ```
    pub fn row_reduce(&mut self) -> usize {
        let p = self.p;
        let rows = self.rows();
        let mut column_to_pivot_row = vec![-1; self.columns];

        let mut pivot: usize = 0;
        for pivot_column in 0..self.columns {
            if pivot == rows {
                break;
            }
            // Search down column for a nonzero entry.
            let Some(pivot_row) = (pivot..rows).find(|&i| self[i].entry(pivot_column) != 0) else {
                continue;
            };

            // Record position of pivot.
            column_to_pivot_row[pivot_column] = pivot as isize;

            // Pivot_row contains a row with a pivot in current column.
            // Swap pivot row up.
            self.swap_rows(pivot, pivot_row);

            // Divide pivot row by pivot entry
            let c = self[pivot].entry(pivot_column);
            self[pivot].scale(p.inverse(c));

            for i in 0..rows {
                // Between pivot and pivot_row, we already checked that the pivot column is 0, so
                // we could skip ahead a bit. The row now at pivot_row held the old row `pivot`,
                // which is also zero there.
                if i >= pivot && i <= pivot_row {
                    continue;
                }
                let elt = self[i].entry(pivot_column);
                if elt != 0 {
                    self.row_op(i, pivot, p.negate(elt));
                }
            }
            pivot += 1;
        }
        self.pivots = column_to_pivot_row;
        pivot
    }

    pub fn rank(&self) -> usize {
        self.clone().row_reduce()
    }

    /// The pivot column of each nonzero row, assuming the matrix is in row echelon form.
    pub fn pivot_columns(&self) -> Vec<usize> {
        self.iter()
            .filter_map(|row| row.first_nonzero().map(|(c, _)| c))
            .collect()
    }
}

impl Index<usize> for Matrix {
    type Output = FpVector;

    fn index(&self, i: usize) -> &FpVector {
        &self.vectors[i]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, i: usize) -> &mut FpVector {
        &mut self.vectors[i]
    }
}

impl<'a> IntoIterator for &'a Matrix {
    type IntoIter = std::slice::Iter<'a, FpVector>;
    type Item = &'a FpVector;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Matrix {
        assert_eq!(self.p, rhs.p, "multiplying matrices over different primes");
        assert_eq!(
            self.columns,
            rhs.rows(),
            "multiplying {}x{} matrix by {}x{} matrix",
            self.rows(),
            self.columns,
            rhs.rows(),
            rhs.columns
        );
        let mut result = Matrix::new(self.p, self.rows(), rhs.columns);
        for (i, row) in self.iter().enumerate() {
            for (j, c) in row.iter_nonzero() {
                result[i].add(&rhs[j], c);
            }
        }
        result
    }
}

impl fmt::Display for Matrix {
    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime};
    /// let m = Matrix::from_vec(ValidPrime::new(2), &[vec![0, 1, 0], vec![1, 1, 0]]);
    /// assert_eq!(m.to_string(), "[\n    [0, 1, 0],\n    [1, 1, 0],\n]");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vectors.is_empty() {
            return write!(f, "[]");
        }
        writeln!(f, "[")?;
        for v in &self.vectors {
            writeln!(f, "    {v},")?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matrix({}x{} over F_{}) {self}",
            self.rows(),
            self.columns,
            self.p
        )
    }
}
