//! Constant-velocity transition model and its process noise.

use super::{KfError, StateMatrix, MAX_STATE_DIM, NUM_KINEMATIC};

fn check_state_dim(state_dim: usize) -> Result<(), KfError> {
    if state_dim < NUM_KINEMATIC {
        Err(KfError::Dimension {
            expected: NUM_KINEMATIC,
            found: state_dim,
        })
    } else if state_dim > MAX_STATE_DIM {
        Err(KfError::Dimension {
            expected: MAX_STATE_DIM,
            found: state_dim,
        })
    } else {
        Ok(())
    }
}

/// State transition `Φ`: identity, plus `dt` from each velocity axis into
/// the matching position axis. Ambiguities are constant.
pub fn assign_transition_mtx(state_dim: usize, dt: f64) -> Result<StateMatrix, KfError> {
    check_state_dim(state_dim)?;
    let mut phi = StateMatrix::eye(state_dim);
    for i in 0..3 {
        phi[(i, i + 3)] = dt;
    }
    Ok(phi)
}

/// Discrete process noise `Q` over an interval `dt` for white acceleration
/// noise of density `vel_var` plus independent position and ambiguity random
/// walks of density `pos_var` and `int_var`.
///
/// Per axis, the position/velocity block is
///
/// ```text
/// [ pos_var·dt + vel_var·dt³/3   vel_var·dt²/2 ]
/// [ vel_var·dt²/2                vel_var·dt    ]
/// ```
///
/// and each ambiguity gets `int_var·dt`. Axes and ambiguities are
/// uncorrelated.
pub fn assign_transition_cov(
    state_dim: usize,
    dt: f64,
    pos_var: f64,
    vel_var: f64,
    int_var: f64,
) -> Result<StateMatrix, KfError> {
    check_state_dim(state_dim)?;
    let dt2 = dt * dt;
    let dt3 = dt2 * dt;
    let mut q = StateMatrix::zeros(state_dim, state_dim);
    for i in 0..3 {
        q[(i, i)] = pos_var * dt + vel_var * dt3 / 3.0;
        q[(i, i + 3)] = vel_var * dt2 / 2.0;
        q[(i + 3, i)] = vel_var * dt2 / 2.0;
        q[(i + 3, i + 3)] = vel_var * dt;
    }
    for i in NUM_KINEMATIC..state_dim {
        q[(i, i)] = int_var * dt;
    }
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ud::udu;

    #[test]
    fn transition_couples_velocity_into_position() {
        let phi = assign_transition_mtx(8, 0.5).unwrap();
        assert_eq!(phi.nrows(), 8);
        for i in 0..8 {
            assert_eq!(phi[(i, i)], 1.0);
        }
        assert_eq!(phi[(0, 3)], 0.5);
        assert_eq!(phi[(2, 5)], 0.5);
        assert_eq!(phi[(3, 0)], 0.0);
        assert_eq!(phi[(6, 7)], 0.0);
        assert_eq!(phi.trace(), 8.0);
    }

    #[test]
    fn transition_cov_blocks() {
        let q = assign_transition_cov(7, 2.0, 0.1, 3.0, 0.01).unwrap();
        assert!((q[(0, 0)] - (0.2 + 8.0)).abs() < 1e-12);
        assert_eq!(q[(1, 4)], 6.0);
        assert_eq!(q[(4, 1)], 6.0);
        assert_eq!(q[(5, 5)], 6.0);
        assert_eq!(q[(6, 6)], 0.02);
        assert_eq!(q[(0, 1)], 0.0);
        assert_eq!(q[(0, 6)], 0.0);
    }

    #[test]
    fn transition_cov_is_factorable() {
        let q = assign_transition_cov(10, 1.0, 0.0, 0.5, 0.0).unwrap();
        let f = udu(&q).unwrap();
        assert!(f.d().iter().all(|&d| d >= 0.0));
        assert_eq!(f.d()[9], 0.0);

        let zero = assign_transition_cov(10, 0.0, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(zero, StateMatrix::zeros(10, 10));
        assert!(udu(&zero).is_ok());
    }

    #[test]
    fn invalid_state_dim() {
        assert_eq!(
            assign_transition_mtx(5, 1.0).unwrap_err(),
            KfError::Dimension {
                expected: 6,
                found: 5
            }
        );
        assert!(assign_transition_cov(MAX_STATE_DIM + 1, 1.0, 0.0, 0.0, 0.0).is_err());
        assert!(assign_transition_mtx(MAX_STATE_DIM, 1.0).is_ok());
    }
}
