//! Snapshot least-squares solution of the decorrelated observation equations.
//!
//! Velocity has no sensitivity in a single snapshot (its columns of the
//! design matrix are zero), so the unknowns are the three position components
//! and the `num_diffs` ambiguities. The whitened system `A·x = z` is solved
//! through the normal equations `AᵀA·x = Aᵀz` with a Cholesky factorization.

use crate::linalg::CholeskyDecomposition;
use crate::ud::udu;

use super::{
    check_dim, FilterState, KfConfig, KfError, ObsVector, StateMatrix, StateVector,
    MAX_STATE_DIM, NUM_KINEMATIC,
};

/// Map a reduced (position + ambiguity) index to its state index.
#[inline]
fn state_index(k: usize) -> usize {
    if k < 3 {
        k
    } else {
        k + 3
    }
}

/// Cholesky of the reduced normal matrix and the reduced solution.
fn solve_normal_equations(
    kf: &KfConfig,
    measurements: &ObsVector,
) -> Result<(CholeskyDecomposition<f64, MAX_STATE_DIM>, StateVector), KfError> {
    check_dim(kf.obs_dim(), measurements.len())?;
    let obs_dim = kf.obs_dim();
    let unknowns = kf.state_dim() - 3;
    if obs_dim < unknowns {
        return Err(KfError::Underdetermined { obs_dim, unknowns });
    }

    let mut z = *measurements;
    kf.decorrelate(&mut z)?;
    let a = &kf.decor_obs_mtx;

    let mut normal = StateMatrix::zeros(unknowns, unknowns);
    let mut rhs = StateVector::zeros(unknowns);
    for r in 0..unknowns {
        let cr = state_index(r);
        for c in r..unknowns {
            let cc = state_index(c);
            let mut s = 0.0;
            for i in 0..obs_dim {
                s += a[(i, cr)] * a[(i, cc)];
            }
            normal[(r, c)] = s;
            normal[(c, r)] = s;
        }
        let mut s = 0.0;
        for i in 0..obs_dim {
            s += a[(i, cr)] * z[i];
        }
        rhs[r] = s;
    }

    let chol = CholeskyDecomposition::new(&normal)?;
    let x = chol.solve(&rhs);
    Ok((chol, x))
}

/// Point estimate of the state from one measurement snapshot, without a
/// prior.
///
/// Returns the full state vector with velocity set to zero. Velocity is not
/// among the unknowns: double differences do not observe it (its columns of
/// the observation matrix are zero), so only `state_dim − 3` position and
/// ambiguity unknowns are solved for. Fails with
/// [`KfError::Underdetermined`] when there are fewer observations than
/// position and ambiguity unknowns, and with [`KfError::Linalg`] when the
/// geometry is rank deficient.
pub fn least_squares_solve(kf: &KfConfig, measurements: &ObsVector) -> Result<StateVector, KfError> {
    let (_, x) = solve_normal_equations(kf, measurements)?;
    let mut state = StateVector::zeros(kf.state_dim());
    for (k, v) in x.iter().enumerate() {
        state[state_index(k)] = *v;
    }
    Ok(state)
}

impl FilterState {
    /// (Re)initialize from a least-squares snapshot.
    ///
    /// The mean is the [`least_squares_solve`] solution. The covariance is
    /// the solution covariance `(AᵀA)⁻¹` over position and ambiguities (the
    /// whitened noise has unit variance), with `vel_var` on each velocity
    /// axis and no velocity correlation.
    pub fn from_least_squares(
        kf: &KfConfig,
        measurements: &ObsVector,
        vel_var: f64,
    ) -> Result<Self, KfError> {
        if !(vel_var >= 0.0 && vel_var.is_finite()) {
            return Err(KfError::InvalidParameter("vel_var"));
        }
        let (chol, x) = solve_normal_equations(kf, measurements)?;
        let inv = chol.inverse();

        let n = kf.state_dim();
        let mut mean = StateVector::zeros(n);
        let mut cov = StateMatrix::zeros(n, n);
        for r in 0..x.len() {
            let sr = state_index(r);
            mean[sr] = x[r];
            for c in 0..x.len() {
                cov[(sr, state_index(c))] = inv[(r, c)];
            }
        }
        for i in 3..NUM_KINEMATIC {
            cov[(i, i)] = vel_var;
        }
        // (AᵀA)⁻¹ is symmetric up to rounding; udu reads the upper triangle
        let mut state = Self::new(mean, udu(&cov)?)?;
        state.sats = Some(*kf.sats());
        Ok(state)
    }
}
