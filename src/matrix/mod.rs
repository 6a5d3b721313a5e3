mod ops;
pub mod vector;

use core::ops::{Index, IndexMut};

use crate::traits::{MatrixMut, MatrixRef, Scalar};

pub use vector::BoundedVector;

/// Fixed-capacity matrix with room for `R` rows and `C` columns.
///
/// Storage is column-major (`data[col][row]`) and stack-allocated. The
/// logical size (`nrows × ncols`) is carried explicitly and may be smaller
/// than the capacity; only the leading logical block is meaningful. All
/// arithmetic, comparisons and the [`MatrixRef`]/[`MatrixMut`] views operate
/// on the logical block.
///
/// Requesting a logical size larger than the capacity panics.
///
/// # Examples
///
/// ```
/// use rtk_float::BoundedMatrix;
///
/// let a: BoundedMatrix<f64, 4, 4> = BoundedMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
/// assert_eq!(a[(1, 0)], 3.0);
///
/// let id: BoundedMatrix<f64, 4, 4> = BoundedMatrix::eye(3);
/// assert_eq!(id.trace(), 3.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BoundedMatrix<T, const R: usize, const C: usize> {
    pub(crate) data: [[T; R]; C],
    nrows: usize,
    ncols: usize,
}

impl<T, const R: usize, const C: usize> BoundedMatrix<T, R, C> {
    /// Number of logical rows.
    #[inline]
    pub const fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of logical columns.
    #[inline]
    pub const fn ncols(&self) -> usize {
        self.ncols
    }
}

impl<T: Scalar, const R: usize, const C: usize> BoundedMatrix<T, R, C> {
    /// Create a zero matrix with the given logical size.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        assert!(
            nrows <= R && ncols <= C,
            "logical size {}x{} exceeds capacity {}x{}",
            nrows,
            ncols,
            R,
            C
        );
        Self {
            data: [[T::zero(); R]; C],
            nrows,
            ncols,
        }
    }

    /// Create a matrix by evaluating `f(row, col)` over the logical block.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut m = Self::zeros(nrows, ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                m.data[j][i] = f(i, j);
            }
        }
        m
    }

    /// Create a matrix from row-major rows; the logical size is
    /// `rows.len() × P`.
    pub fn from_rows<const P: usize>(rows: &[[T; P]]) -> Self {
        Self::from_fn(rows.len(), P, |i, j| rows[i][j])
    }

    /// Transpose of the logical block.
    pub fn transpose(&self) -> BoundedMatrix<T, C, R> {
        BoundedMatrix::from_fn(self.ncols, self.nrows, |i, j| self.data[i][j])
    }

    /// Matrix product over the logical blocks: `(n×k) · (k×m) → (n×m)`.
    ///
    /// Panics if the inner logical dimensions disagree.
    pub fn matmul<const P: usize, const Q: usize>(
        &self,
        rhs: &BoundedMatrix<T, P, Q>,
    ) -> BoundedMatrix<T, R, Q> {
        assert_eq!(
            self.ncols,
            rhs.nrows(),
            "inner dimensions must agree for matrix product"
        );
        let mut out = BoundedMatrix::<T, R, Q>::zeros(self.nrows, rhs.ncols());
        for j in 0..rhs.ncols() {
            for k in 0..self.ncols {
                let b = rhs.data[j][k];
                if b == T::zero() {
                    continue;
                }
                for i in 0..self.nrows {
                    out.data[j][i] = out.data[j][i] + self.data[k][i] * b;
                }
            }
        }
        out
    }

    /// Matrix-vector product over the logical block.
    pub fn mul_vec<const P: usize>(&self, v: &BoundedVector<T, P>) -> BoundedVector<T, R> {
        assert_eq!(
            self.ncols,
            v.len(),
            "vector length must match matrix columns"
        );
        let mut out = BoundedVector::<T, R>::zeros(self.nrows);
        for k in 0..self.ncols {
            let x = v[k];
            for i in 0..self.nrows {
                out[i] = out[i] + self.data[k][i] * x;
            }
        }
        out
    }

    /// Copy of logical row `i` as a vector of length `ncols`.
    pub fn row(&self, i: usize) -> BoundedVector<T, C> {
        assert!(i < self.nrows, "row {} out of bounds", i);
        let mut out = BoundedVector::zeros(self.ncols);
        for j in 0..self.ncols {
            out[j] = self.data[j][i];
        }
        out
    }

    /// Dot product of logical row `i` with `v`.
    pub fn row_dot<const P: usize>(&self, i: usize, v: &BoundedVector<T, P>) -> T {
        assert_eq!(self.ncols, v.len(), "vector length must match matrix columns");
        let mut sum = T::zero();
        for j in 0..self.ncols {
            sum = sum + self.data[j][i] * v[j];
        }
        sum
    }

    /// Write the logical block of `src` with its top-left corner at
    /// `(row, col)`.
    pub fn set_block<const P: usize, const Q: usize>(
        &mut self,
        row: usize,
        col: usize,
        src: &BoundedMatrix<T, P, Q>,
    ) {
        assert!(
            row + src.nrows() <= self.nrows && col + src.ncols() <= self.ncols,
            "block does not fit inside the logical size"
        );
        for j in 0..src.ncols() {
            for i in 0..src.nrows() {
                self.data[col + j][row + i] = src.data[j][i];
            }
        }
    }
}

impl<T: Scalar, const N: usize> BoundedMatrix<T, N, N> {
    /// Identity over an `n × n` logical block.
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i][i] = T::one();
        }
        m
    }

    /// Sum of the logical diagonal.
    pub fn trace(&self) -> T {
        let mut sum = T::zero();
        for i in 0..self.nrows.min(self.ncols) {
            sum = sum + self.data[i][i];
        }
        sum
    }
}

impl<T: PartialEq, const R: usize, const C: usize> PartialEq for BoundedMatrix<T, R, C> {
    fn eq(&self, other: &Self) -> bool {
        if self.nrows != other.nrows || self.ncols != other.ncols {
            return false;
        }
        (0..self.ncols).all(|j| self.data[j][..self.nrows] == other.data[j][..self.nrows])
    }
}

impl<T, const R: usize, const C: usize> MatrixRef<T> for BoundedMatrix<T, R, C> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[col][row]
    }
}

impl<T, const R: usize, const C: usize> MatrixMut<T> for BoundedMatrix<T, R, C> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[col][row]
    }
}

// Index by (row, col) tuple
impl<T, const R: usize, const C: usize> Index<(usize, usize)> for BoundedMatrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.nrows && col < self.ncols, "index outside logical block");
        &self.data[col][row]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for BoundedMatrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.nrows && col < self.ncols, "index outside logical block");
        &mut self.data[col][row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type M4 = BoundedMatrix<f64, 4, 4>;

    #[test]
    fn zeros_and_eye() {
        let z = M4::zeros(3, 2);
        assert_eq!(z.nrows(), 3);
        assert_eq!(z.ncols(), 2);
        assert_eq!(z[(2, 1)], 0.0);

        let id = M4::eye(3);
        assert_eq!(id[(0, 0)], 1.0);
        assert_eq!(id[(2, 2)], 1.0);
        assert_eq!(id[(0, 1)], 0.0);
        assert_eq!(id.trace(), 3.0);
    }

    #[test]
    #[should_panic]
    fn zeros_over_capacity() {
        let _ = M4::zeros(5, 1);
    }

    #[test]
    fn from_rows_and_index() {
        let m = M4::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
    }

    #[test]
    fn transpose_swaps_logical_size() {
        let m: BoundedMatrix<f64, 4, 3> = BoundedMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let t = m.transpose();
        assert_eq!(t.nrows(), 2);
        assert_eq!(t.ncols(), 3);
        assert_eq!(t[(1, 2)], 6.0);
        assert_eq!(t[(0, 1)], 3.0);
    }

    #[test]
    fn matmul_logical_blocks() {
        let a = M4::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
        let b: BoundedMatrix<f64, 4, 2> = BoundedMatrix::from_rows(&[[5.0], [6.0]]);
        let c = a.matmul(&b);
        assert_eq!(c.nrows(), 2);
        assert_eq!(c.ncols(), 1);
        assert_eq!(c[(0, 0)], 17.0);
        assert_eq!(c[(1, 0)], 39.0);
    }

    #[test]
    #[should_panic]
    fn matmul_dimension_mismatch() {
        let a = M4::zeros(2, 3);
        let b = M4::zeros(2, 2);
        let _ = a.matmul(&b);
    }

    #[test]
    fn mul_vec_and_row() {
        let a = M4::from_rows(&[[1.0, 0.0, 2.0], [0.0, 3.0, 1.0]]);
        let v: BoundedVector<f64, 4> = BoundedVector::from_slice(&[1.0, 2.0, 3.0]);
        let y = a.mul_vec(&v);
        assert_eq!(y.as_slice(), &[7.0, 9.0]);
        assert_eq!(a.row(1).as_slice(), &[0.0, 3.0, 1.0]);
        assert_eq!(a.row_dot(0, &v), 7.0);
    }

    #[test]
    fn set_block_places_submatrix() {
        let mut m = M4::zeros(4, 4);
        let id: BoundedMatrix<f64, 2, 2> = BoundedMatrix::eye(2);
        m.set_block(2, 1, &id);
        assert_eq!(m[(2, 1)], 1.0);
        assert_eq!(m[(3, 2)], 1.0);
        assert_eq!(m[(2, 2)], 0.0);
        assert_eq!(m.trace(), 1.0);
    }

    #[test]
    fn equality_ignores_unused_capacity() {
        let mut a = M4::zeros(4, 4);
        a[(3, 3)] = 9.0;
        let mut a2 = a;
        a2.nrows = 2;
        a2.ncols = 2;
        assert_eq!(a2, M4::zeros(2, 2));
        assert_ne!(M4::zeros(2, 2), M4::zeros(2, 3));
    }

    #[test]
    fn matrix_ref_trait_sees_logical_size() {
        fn trace_generic<T: Scalar>(m: &impl MatrixRef<T>) -> T {
            let mut sum = T::zero();
            for i in 0..m.nrows().min(m.ncols()) {
                sum = sum + *m.get(i, i);
            }
            sum
        }

        let m = M4::eye(2);
        assert_eq!(MatrixRef::nrows(&m), 2);
        assert_eq!(trace_generic(&m), 2.0);
    }
}
