//! Kernels of matrices.
//!
//! Both kernels are read off a row reduction of an augmented matrix `[A | I]`. After reduction,
//! the rows whose pivot lies in the identity block have a zero left block, and their right block
//! spans the left kernel of `A`. These rows are already in reduced row echelon form.

use super::Matrix;

impl Matrix {
    /// Return the first row whose pivot lies at or past `first_column`, or `rows()` if there is
    /// none. Requires the matrix to have been row reduced.
    pub fn find_first_row_in_block(&self, first_column: usize) -> usize {
        self.pivots()[first_column..]
            .iter()
            .find(|&&row| row >= 0)
            .map_or(self.rows(), |&row| row as usize)
    }

    /// Form `[self | I]`.
    fn augment_identity(&self) -> Self {
        let p = self.prime();
        let rows = self.rows();
        let columns = self.columns();
        let mut result = Self::new(p, rows, columns + rows);
        for (i, row) in self.iter().enumerate() {
            for (j, x) in row.iter_nonzero() {
                result[i].set_entry(j, x);
            }
            result[i].set_entry(columns + i, 1);
        }
        result
    }

    /// Given a row reduced matrix `[A | B]` whose left block has `first_source_column` columns,
    /// return the rows of `B` whose `A` part vanished.
    fn kernel_block(&self, first_source_column: usize) -> Self {
        let p = self.prime();
        let width = self.columns() - first_source_column;
        let first_kernel_row = self.find_first_row_in_block(first_source_column);
        let vectors = self
            .iter()
            .skip(first_kernel_row)
            .filter(|row| !row.is_zero())
            .map(|row| row.slice(first_source_column, self.columns()))
            .collect();
        Self::from_rows(p, vectors, width)
    }

    /// The vectors `v` with `self * v = 0`, as the rows of a matrix in reduced row echelon form.
    ///
    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime};
    /// let p = ValidPrime::new(2);
    /// let m = Matrix::from_vec(p, &[vec![1, 1, 0], vec![0, 0, 1]]);
    /// assert_eq!(m.null_space().to_vec(), vec![vec![1, 1, 0]]);
    /// ```
    pub fn null_space(&self) -> Self {
        let rows = self.rows();
        let mut augmented = self.transpose().augment_identity();
        augmented.row_reduce();
        augmented.kernel_block(rows)
    }

    /// The vectors `v` with `v * self = 0`, as the rows of a matrix in reduced row echelon form.
    ///
    /// # Example
    /// ```
    /// # use fp::{matrix::Matrix, prime::ValidPrime};
    /// let p = ValidPrime::new(3);
    /// let m = Matrix::from_vec(p, &[vec![1, 2], vec![2, 1]]);
    /// assert_eq!(m.left_null_space().to_vec(), vec![vec![1, 1]]);
    /// ```
    pub fn left_null_space(&self) -> Self {
        let columns = self.columns();
        let mut augmented = self.augment_identity();
        augmented.row_reduce();
        augmented.kernel_block(columns)
    }
}
