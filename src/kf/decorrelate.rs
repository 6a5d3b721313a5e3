//! Whitening of the double-difference measurement noise.
//!
//! Differencing against a common reference correlates the double
//! differences: with single-difference variance `σ²` the block covariance is
//! `σ²·D·Dᵀ` (`2σ²` on the diagonal, `σ²` elsewhere). Sequential scalar
//! updates need independent noise, so raw measurements and the design matrix
//! are both premultiplied by `W = blockdiag(L_φ⁻¹, L_ρ⁻¹)` with
//! `L·Lᵀ` the Cholesky factor of each block. The whitened noise is then the
//! identity.

use num_traits::Float;

use crate::linalg::{invert_lower_triangular, CholeskyDecomposition};

use super::{DecorMatrix, KfError, ObsMatrix, ObsVector, SatMatrix, MAX_SATS};

/// Double-difference noise covariance `var·D·Dᵀ` for `num_diffs`
/// differences.
pub fn dd_covariance(num_diffs: usize, var: f64) -> SatMatrix<MAX_SATS> {
    SatMatrix::<MAX_SATS>::from_fn(num_diffs, num_diffs, |i, j| {
        if i == j {
            2.0 * var
        } else {
            var
        }
    })
}

fn check_variance(var: f64, name: &'static str) -> Result<(), KfError> {
    if var > 0.0 && var.is_finite() {
        Ok(())
    } else {
        Err(KfError::InvalidParameter(name))
    }
}

/// Decorrelation transform and the diagonal of the decorrelated noise
/// covariance.
///
/// Returns `(decor_mtx, decor_obs_cov)`: `decor_mtx` is `obs_dim × obs_dim`
/// lower triangular with the phase block first; `decor_obs_cov` is all ones.
pub fn assign_decor_obs_cov(
    num_diffs: usize,
    phase_var: f64,
    code_var: f64,
) -> Result<(DecorMatrix, ObsVector), KfError> {
    check_variance(phase_var, "phase_var")?;
    check_variance(code_var, "code_var")?;
    if num_diffs >= MAX_SATS {
        return Err(KfError::TooManySatellites(num_diffs + 1));
    }

    // L of the unit-variance block; each block scales it by sqrt(var)
    let l = CholeskyDecomposition::new(&dd_covariance(num_diffs, 1.0))?.l_full();
    let l_inv = invert_lower_triangular(&l)?;

    let obs_dim = 2 * num_diffs;
    let mut decor = DecorMatrix::zeros(obs_dim, obs_dim);
    decor.set_block(0, 0, &(l_inv * (1.0 / Float::sqrt(phase_var))));
    decor.set_block(num_diffs, num_diffs, &(l_inv * (1.0 / Float::sqrt(code_var))));

    Ok((decor, ObsVector::fill(obs_dim, 1.0)))
}

/// Observation matrix for decorrelated measurements, `decor_mtx · obs_mtx`.
pub fn assign_decor_obs_mtx(decor_mtx: &DecorMatrix, obs_mtx: &ObsMatrix) -> ObsMatrix {
    decor_mtx.matmul(obs_mtx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kf::assign_d_mtx;

    fn approx_eq(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "expected {} ≈ {}", a, b);
    }

    #[test]
    fn dd_covariance_matches_d_dt() {
        let d = assign_d_mtx(5);
        let ddt = d.matmul(&d.transpose()) * 0.3;
        let cov = dd_covariance(4, 0.3);
        for i in 0..4 {
            for j in 0..4 {
                approx_eq(cov[(i, j)], ddt[(i, j)], 1e-15);
            }
        }
    }

    #[test]
    fn whitened_covariance_is_identity() {
        let nd = 4;
        let (phase_var, code_var) = (1e-4, 2.5);
        let (w, cov) = assign_decor_obs_cov(nd, phase_var, code_var).unwrap();
        assert_eq!(w.nrows(), 2 * nd);
        assert_eq!(cov.as_slice(), &[1.0; 8]);

        let mut r = DecorMatrix::zeros(2 * nd, 2 * nd);
        r.set_block(0, 0, &dd_covariance(nd, phase_var));
        r.set_block(nd, nd, &dd_covariance(nd, code_var));
        let white = w.matmul(&r).matmul(&w.transpose());
        for i in 0..2 * nd {
            for j in 0..2 * nd {
                let expected = if i == j { 1.0 } else { 0.0 };
                approx_eq(white[(i, j)], expected, 1e-10);
            }
        }
    }

    #[test]
    fn decor_mtx_is_block_lower_triangular() {
        let (w, _) = assign_decor_obs_cov(3, 1.0, 1.0).unwrap();
        for i in 0..6 {
            for j in (i + 1)..6 {
                assert_eq!(w[(i, j)], 0.0);
            }
        }
        // no coupling between phase and code
        for i in 3..6 {
            for j in 0..3 {
                assert_eq!(w[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn rejects_non_positive_variances() {
        assert_eq!(
            assign_decor_obs_cov(3, 0.0, 1.0).unwrap_err(),
            KfError::InvalidParameter("phase_var")
        );
        assert_eq!(
            assign_decor_obs_cov(3, 1.0, f64::NAN).unwrap_err(),
            KfError::InvalidParameter("code_var")
        );
    }

    #[test]
    fn no_differences() {
        let (w, cov) = assign_decor_obs_cov(0, 1.0, 1.0).unwrap();
        assert_eq!(w.nrows(), 0);
        assert!(cov.is_empty());
    }
}
