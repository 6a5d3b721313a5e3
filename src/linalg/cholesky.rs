use crate::linalg::LinalgError;
use crate::matrix::{BoundedMatrix, BoundedVector};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Cholesky decomposition in place: A = L * Lᵀ.
///
/// On return, the lower triangle of `a` (including diagonal) contains L.
/// The strictly upper triangle is left unchanged.
///
/// Returns an error if the matrix is not positive definite (a pivot is
/// zero, negative or NaN).
pub fn cholesky_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Cholesky decomposition requires a square matrix");

    for j in 0..n {
        for k in 0..j {
            let ljk = *a.get(j, k);
            for i in j..n {
                *a.get_mut(i, j) = *a.get(i, j) - ljk * *a.get(i, k);
            }
        }

        let diag = *a.get(j, j);
        if !(diag > T::zero()) {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = diag.sqrt();
        *a.get_mut(j, j) = ljj;

        let inv_ljj = T::one() / ljj;
        for i in (j + 1)..n {
            *a.get_mut(i, j) = *a.get(i, j) * inv_ljj;
        }
    }

    Ok(())
}

/// Solve L*x = b by forward substitution, where L is lower triangular.
#[inline]
pub fn forward_substitute<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - *l.get(i, j) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve Lᵀ * x = b by back substitution, where L is lower triangular.
#[inline]
pub fn back_substitute_lt<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum = sum - *l.get(j, i) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Inverse of a lower-triangular matrix, column by column.
///
/// Only the lower triangle of `l` is read. The result is lower triangular.
/// Returns [`LinalgError::Singular`] if a diagonal entry is zero.
pub fn invert_lower_triangular<T: FloatScalar, const N: usize>(
    l: &BoundedMatrix<T, N, N>,
) -> Result<BoundedMatrix<T, N, N>, LinalgError> {
    let n = l.nrows();
    assert_eq!(n, l.ncols(), "triangular inverse requires a square matrix");
    if (0..n).any(|i| l[(i, i)] == T::zero()) {
        return Err(LinalgError::Singular);
    }

    let mut inv = BoundedMatrix::<T, N, N>::zeros(n, n);
    let mut e = [T::zero(); N];
    let mut x = [T::zero(); N];
    for col in 0..n {
        if col > 0 {
            e[col - 1] = T::zero();
        }
        e[col] = T::one();
        forward_substitute(l, &e[..n], &mut x[..n]);
        for row in 0..n {
            inv[(row, col)] = x[row];
        }
    }
    Ok(inv)
}

/// Cholesky decomposition of the logical block of a bounded
/// positive-definite matrix.
///
/// # Example
///
/// ```
/// use rtk_float::{BoundedMatrix, BoundedVector};
/// use rtk_float::linalg::CholeskyDecomposition;
///
/// let a: BoundedMatrix<f64, 4, 4> = BoundedMatrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]);
/// let chol = CholeskyDecomposition::new(&a).unwrap();
///
/// let b: BoundedVector<f64, 4> = BoundedVector::from_slice(&[8.0, 7.0]);
/// let x = chol.solve(&b); // solve Ax = b
/// assert!((4.0 * x[0] + 2.0 * x[1] - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct CholeskyDecomposition<T, const N: usize> {
    /// Lower triangular Cholesky factor L (A = L·Lᵀ).
    l: BoundedMatrix<T, N, N>,
}

impl<T: FloatScalar, const N: usize> CholeskyDecomposition<T, N> {
    /// Decompose a positive-definite matrix.
    pub fn new(a: &BoundedMatrix<T, N, N>) -> Result<Self, LinalgError> {
        let mut l = *a;
        cholesky_in_place(&mut l)?;
        Ok(Self { l })
    }

    /// Dimension of the decomposed matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.l.nrows()
    }

    /// Extract the full lower triangular factor (zeros above diagonal).
    pub fn l_full(&self) -> BoundedMatrix<T, N, N> {
        let n = self.dim();
        let mut out = self.l;
        for j in 0..n {
            for i in 0..j {
                out[(i, j)] = T::zero();
            }
        }
        out
    }

    /// Solve A*x = b for x, where A = L·Lᵀ.
    pub fn solve(&self, b: &BoundedVector<T, N>) -> BoundedVector<T, N> {
        let n = self.dim();
        assert_eq!(b.len(), n, "right-hand side length must match");
        let mut y = [T::zero(); N];
        let mut x = BoundedVector::zeros(n);
        forward_substitute(&self.l, b.as_slice(), &mut y[..n]);
        back_substitute_lt(&self.l, &y[..n], x.as_mut_slice());
        x
    }

    /// Compute the matrix inverse using the Cholesky factorization.
    pub fn inverse(&self) -> BoundedMatrix<T, N, N> {
        let n = self.dim();
        let mut inv = BoundedMatrix::<T, N, N>::zeros(n, n);
        let mut e = [T::zero(); N];
        let mut y = [T::zero(); N];
        let mut x = [T::zero(); N];

        for col in 0..n {
            if col > 0 {
                e[col - 1] = T::zero();
            }
            e[col] = T::one();

            forward_substitute(&self.l, &e[..n], &mut y[..n]);
            back_substitute_lt(&self.l, &y[..n], &mut x[..n]);

            for row in 0..n {
                inv[(row, col)] = x[row];
            }
        }

        inv
    }
}
