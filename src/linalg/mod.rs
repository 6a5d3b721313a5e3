//! Dense linear algebra over the logical block of bounded matrices.
//!
//! Only what the filter needs outside its recursion: Cholesky factorization,
//! triangular solves and inverses. Free functions operate on
//! `&mut impl MatrixMut<T>` for in-place use; [`CholeskyDecomposition`]
//! offers a higher-level API.

pub(crate) mod cholesky;

pub use cholesky::{
    back_substitute_lt, cholesky_in_place, forward_substitute, invert_lower_triangular,
    CholeskyDecomposition,
};

/// Errors from linear algebra operations.
///
/// ```
/// use rtk_float::BoundedMatrix;
/// use rtk_float::linalg::{CholeskyDecomposition, LinalgError};
///
/// let not_pd: BoundedMatrix<f64, 2, 2> = BoundedMatrix::from_rows(&[[1.0, 5.0], [5.0, 1.0]]);
/// assert_eq!(
///     CholeskyDecomposition::new(&not_pd).unwrap_err(),
///     LinalgError::NotPositiveDefinite
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinalgError {
    /// Matrix is singular or nearly singular.
    Singular,
    /// Matrix is not positive definite (required for Cholesky).
    NotPositiveDefinite,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::NotPositiveDefinite => write!(f, "matrix is not positive definite"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
