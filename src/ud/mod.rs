//! UD-factored covariance primitives.
//!
//! A covariance `P` is carried as `P = U·D·Uᵀ` with `U` unit upper
//! triangular and `D` diagonal (non-negative). The factors, not `P`, are what
//! the recursions mutate:
//!
//! - [`udu`] / [`reconstruct_udu`] — factor and recompose.
//! - [`update_scalar_measurement`] — Bierman's sequential scalar observation
//!   update.
//! - [`thornton_predict`] — Thornton's modified weighted Gram–Schmidt (MWG-S)
//!   time update for `Φ·P·Φᵀ + Q`.
//!
//! ```
//! use rtk_float::BoundedMatrix;
//! use rtk_float::ud::{reconstruct_udu, udu};
//!
//! let p: BoundedMatrix<f64, 4, 4> =
//!     BoundedMatrix::from_rows(&[[4.0, 2.0, 0.6], [2.0, 2.0, 0.5], [0.6, 0.5, 3.0]]);
//! let f = udu(&p).unwrap();
//! let back = reconstruct_udu(f.u(), f.d());
//! assert!((back[(0, 1)] - 2.0).abs() < 1e-12);
//! assert_eq!(f.u()[(2, 2)], 1.0);
//! ```

mod bierman;
mod thornton;


pub use bierman::update_scalar_measurement;
pub use thornton::thornton_predict;

use crate::matrix::{BoundedMatrix, BoundedVector};
use crate::traits::{FloatScalar, MatrixMut, Scalar};

/// Errors from the UD factorization and its recursions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UdError {
    /// A pivot (diagonal of `D`) came out negative beyond tolerance or NaN,
    /// or a zero pivot carried non-zero coupling: the matrix is not
    /// positive semidefinite.
    NotPositiveSemidefinite {
        /// Index of the offending pivot.
        index: usize,
    },
    /// Innovation variance of a scalar update was zero, negative or NaN.
    NonPositiveInnovation,
    /// Observation noise variance was negative or NaN.
    NegativeVariance,
}

impl core::fmt::Display for UdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UdError::NotPositiveSemidefinite { index } => {
                write!(f, "matrix is not positive semidefinite (pivot {})", index)
            }
            UdError::NonPositiveInnovation => {
                write!(f, "innovation variance is not positive")
            }
            UdError::NegativeVariance => write!(f, "observation variance is negative"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UdError {}

/// UD factors of an `n × n` covariance, `P = U·D·Uᵀ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UdFactors<T, const N: usize> {
    pub(crate) u: BoundedMatrix<T, N, N>,
    pub(crate) d: BoundedVector<T, N>,
}

impl<T: FloatScalar, const N: usize> UdFactors<T, N> {
    /// Factors of the `n × n` identity covariance.
    pub fn identity(n: usize) -> Self {
        Self {
            u: BoundedMatrix::eye(n),
            d: BoundedVector::fill(n, T::one()),
        }
    }

    /// Factors of a diagonal covariance (`U = I`).
    ///
    /// Fails if any variance is negative or NaN.
    pub fn from_diagonal(d: &BoundedVector<T, N>) -> Result<Self, UdError> {
        check_diagonal(d)?;
        Ok(Self {
            u: BoundedMatrix::eye(d.len()),
            d: *d,
        })
    }

    /// Assemble factors from an explicit `U` and `D`.
    ///
    /// The strictly lower triangle of `u` is cleared and its diagonal forced
    /// to one. Fails if `d` has a negative or NaN entry.
    pub fn from_parts(u: &BoundedMatrix<T, N, N>, d: &BoundedVector<T, N>) -> Result<Self, UdError> {
        let n = d.len();
        assert!(
            u.nrows() == n && u.ncols() == n,
            "U must be square with the length of D"
        );
        check_diagonal(d)?;
        let mut u = *u;
        triu(&mut u);
        for i in 0..n {
            u[(i, i)] = T::one();
        }
        Ok(Self { u, d: *d })
    }

    /// Dimension of the factored covariance.
    #[inline]
    pub fn dim(&self) -> usize {
        self.d.len()
    }

    /// Unit upper-triangular factor.
    #[inline]
    pub fn u(&self) -> &BoundedMatrix<T, N, N> {
        &self.u
    }

    /// Diagonal factor.
    #[inline]
    pub fn d(&self) -> &BoundedVector<T, N> {
        &self.d
    }

    /// Recompose the covariance `U·D·Uᵀ`.
    pub fn reconstruct(&self) -> BoundedMatrix<T, N, N> {
        reconstruct_udu(&self.u, &self.d)
    }

    /// Trace of the covariance, computed from the factors.
    pub fn trace(&self) -> T {
        let n = self.dim();
        let mut sum = T::zero();
        for i in 0..n {
            for k in i..n {
                let uik = self.u[(i, k)];
                sum = sum + uik * uik * self.d[k];
            }
        }
        sum
    }
}

fn check_diagonal<T: FloatScalar, const N: usize>(d: &BoundedVector<T, N>) -> Result<(), UdError> {
    match d.iter().position(|x| !(*x >= T::zero())) {
        Some(index) => Err(UdError::NotPositiveSemidefinite { index }),
        None => Ok(()),
    }
}

/// Pivot tolerance for [`udu`]: `n · ε · max|Mᵢᵢ|`.
fn pivot_tolerance<T: FloatScalar, const N: usize>(m: &BoundedMatrix<T, N, N>) -> T {
    let n = m.nrows();
    let mut scale = T::zero();
    for i in 0..n {
        let a = m[(i, i)].abs();
        if a > scale {
            scale = a;
        }
    }
    let n_t = <T as num_traits::NumCast>::from(n).unwrap_or_else(T::one);
    n_t * T::epsilon() * scale
}

/// Factor a symmetric positive-semidefinite matrix as `M = U·D·Uᵀ`.
///
/// Bierman's upper factorization, column by column from the last index
/// down. Only the upper triangle of `m` is read.
///
/// Pivot policy: with `tol = n·ε·max|Mᵢᵢ|`, a pivot below `-tol` (or NaN)
/// fails with [`UdError::NotPositiveSemidefinite`]; a pivot within `±tol`
/// is an exact zero, giving `D[j] = 0` and a unit column in `U`, provided
/// the column's remaining coupling is also within `tol` (otherwise the matrix
/// is indefinite and the call fails). No regularization is applied.
pub fn udu<T: FloatScalar, const N: usize>(
    m: &BoundedMatrix<T, N, N>,
) -> Result<UdFactors<T, N>, UdError> {
    let n = m.nrows();
    assert_eq!(n, m.ncols(), "UD factorization requires a square matrix");

    let tol = pivot_tolerance(m);
    let mut p = *m;
    let mut u = BoundedMatrix::<T, N, N>::eye(n);
    let mut d = BoundedVector::<T, N>::zeros(n);

    for j in (0..n).rev() {
        let pivot = p[(j, j)];
        if pivot.is_nan() || pivot < -tol {
            return Err(UdError::NotPositiveSemidefinite { index: j });
        }
        if pivot <= tol {
            if (0..j).any(|k| p[(k, j)].abs() > tol) {
                return Err(UdError::NotPositiveSemidefinite { index: j });
            }
            continue;
        }

        d[j] = pivot;
        let alpha = T::one() / pivot;
        for k in 0..j {
            let beta = p[(k, j)];
            u[(k, j)] = alpha * beta;
            for i in 0..=k {
                p[(i, k)] = p[(i, k)] - beta * u[(i, j)];
            }
        }
    }

    Ok(UdFactors { u, d })
}

/// Recompose `M = U·D·Uᵀ` from UD factors.
pub fn reconstruct_udu<T: FloatScalar, const N: usize>(
    u: &BoundedMatrix<T, N, N>,
    d: &BoundedVector<T, N>,
) -> BoundedMatrix<T, N, N> {
    let n = d.len();
    assert!(
        u.nrows() == n && u.ncols() == n,
        "U must be square with the length of D"
    );
    let mut m = BoundedMatrix::<T, N, N>::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let mut sum = T::zero();
            for k in j..n {
                sum = sum + u[(i, k)] * d[k] * u[(j, k)];
            }
            m[(i, j)] = sum;
            m[(j, i)] = sum;
        }
    }
    m
}

/// Zero the strictly-lower triangle of the logical block in place.
pub fn triu<T: Scalar>(m: &mut impl MatrixMut<T>) {
    let rows = m.nrows();
    let cols = m.ncols();
    for j in 0..cols {
        for i in (j + 1)..rows {
            *m.get_mut(i, j) = T::zero();
        }
    }
}

/// Overwrite the logical block with the identity.
pub fn eye<T: Scalar>(m: &mut impl MatrixMut<T>) {
    let rows = m.nrows();
    let cols = m.ncols();
    for j in 0..cols {
        for i in 0..rows {
            *m.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
    }
}
