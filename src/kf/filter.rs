use log::{trace, warn};

use crate::ud::{thornton_predict, udu, update_scalar_measurement, UdFactors};

use super::{
    check_dim, KfConfig, KfError, ObsVector, SatelliteSet, StateFactors, StateMatrix,
    StateVector, MAX_STATE_DIM, NUM_KINEMATIC,
};

/// Filter state: mean and UD-factored covariance.
///
/// The factors, not the covariance, are what predict and update mutate;
/// [`covariance`](Self::covariance) recomposes `U·D·Uᵀ` on demand.
///
/// Ambiguity states only mean something against one satellite ordering. A
/// state is bound to the [`SatelliteSet`] of the first configuration that
/// advances it (or builds it, for [`from_least_squares`](Self::from_least_squares)),
/// and configurations for any other set reject it with
/// [`KfError::SatelliteMismatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    pub(crate) mean: StateVector,
    pub(crate) cov: StateFactors,
    pub(crate) sats: Option<SatelliteSet>,
}

impl FilterState {
    /// State from a mean and covariance factors of matching dimension.
    pub fn new(mean: StateVector, cov: StateFactors) -> Result<Self, KfError> {
        check_dim(cov.dim(), mean.len())?;
        if mean.len() < NUM_KINEMATIC {
            return Err(KfError::Dimension {
                expected: NUM_KINEMATIC,
                found: mean.len(),
            });
        }
        Ok(Self {
            mean,
            cov,
            sats: None,
        })
    }

    /// State from a mean and a full covariance, factored with
    /// [`udu`](crate::ud::udu).
    pub fn from_covariance(mean: StateVector, cov: &StateMatrix) -> Result<Self, KfError> {
        check_dim(mean.len(), cov.nrows())?;
        check_dim(mean.len(), cov.ncols())?;
        Self::new(mean, udu(cov)?)
    }

    /// Zero mean with an isotropic prior `variance·I`.
    pub fn with_prior(state_dim: usize, variance: f64) -> Result<Self, KfError> {
        if state_dim > MAX_STATE_DIM {
            return Err(KfError::Dimension {
                expected: MAX_STATE_DIM,
                found: state_dim,
            });
        }
        let d = StateVector::fill(state_dim, variance);
        Self::new(StateVector::zeros(state_dim), UdFactors::from_diagonal(&d)?)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &StateVector {
        &self.mean
    }

    /// UD factors of the covariance.
    pub fn factors(&self) -> &StateFactors {
        &self.cov
    }

    /// Recompose the covariance `U·D·Uᵀ`.
    pub fn covariance(&self) -> StateMatrix {
        self.cov.reconstruct()
    }

    /// Baseline position estimate.
    pub fn position(&self) -> [f64; 3] {
        [self.mean[0], self.mean[1], self.mean[2]]
    }

    /// Baseline velocity estimate.
    pub fn velocity(&self) -> [f64; 3] {
        [self.mean[3], self.mean[4], self.mean[5]]
    }

    /// Satellite set this state is bound to, if any.
    pub fn sats(&self) -> Option<&SatelliteSet> {
        self.sats.as_ref()
    }

    /// Float ambiguities [m], in double-difference order.
    pub fn ambiguities(&self) -> &[f64] {
        &self.mean.as_slice()[NUM_KINEMATIC..]
    }
}

impl KfConfig {
    fn check_state(&self, state: &FilterState) -> Result<(), KfError> {
        check_dim(self.state_dim(), state.dim())?;
        match state.sats {
            Some(sats) if sats != self.sats => Err(KfError::SatelliteMismatch {
                expected_ref: self.sats.reference(),
                found_ref: sats.reference(),
            }),
            _ => Ok(()),
        }
    }

    /// Time update: `mean ← Φ·mean` and the factors of `Φ·P·Φᵀ + Q` by
    /// Thornton's MWG-S. On error the state is unchanged.
    pub fn predict_forward(&self, state: &mut FilterState) -> Result<(), KfError> {
        self.check_state(state)?;
        thornton_predict(&self.transition_mtx, &mut state.cov, &self.process_noise)?;
        state.mean = self.transition_mtx.mul_vec(&state.mean);
        state.sats = Some(self.sats);
        Ok(())
    }

    /// Whiten raw measurements in place: `z ← decor_mtx·z`.
    pub fn decorrelate(&self, measurements: &mut ObsVector) -> Result<(), KfError> {
        check_dim(self.obs_dim(), measurements.len())?;
        *measurements = self.decor_mtx.mul_vec(measurements);
        Ok(())
    }

    /// Measurement update with decorrelated observations, one Bierman scalar
    /// update per row of `decor_obs_mtx`, in order. Each innovation is taken
    /// against the mean as already updated by the previous rows.
    ///
    /// On error the state is unchanged.
    pub fn update_for_obs(
        &self,
        state: &mut FilterState,
        decor_obs: &ObsVector,
    ) -> Result<(), KfError> {
        self.check_state(state)?;
        check_dim(self.obs_dim(), decor_obs.len())?;

        let mut work = *state;
        for i in 0..self.obs_dim() {
            let innovation = decor_obs[i] - self.decor_obs_mtx.row_dot(i, &work.mean);
            let h = self.decor_obs_mtx.row(i);
            let gain = update_scalar_measurement(&h, self.decor_obs_cov[i], &mut work.cov)?;
            work.mean.axpy(innovation, &gain);
        }
        work.sats = Some(self.sats);
        *state = work;
        Ok(())
    }

    /// One filter epoch: predict, decorrelate `measurements`, update.
    ///
    /// Atomic: on any error `state` is left as it was and the failure is
    /// logged. A numerical failure means the state can no longer be trusted
    /// and should be reinitialized, for example with
    /// [`FilterState::from_least_squares`].
    pub fn filter_update(
        &self,
        state: &mut FilterState,
        measurements: &ObsVector,
    ) -> Result<(), KfError> {
        let mut work = *state;
        let mut z = *measurements;
        let result = self
            .predict_forward(&mut work)
            .and_then(|_| self.decorrelate(&mut z))
            .and_then(|_| self.update_for_obs(&mut work, &z));

        match result {
            Ok(()) => {
                trace!(
                    "float KF epoch: ref PRN {}, {} observations, cov trace {:.6e}",
                    self.sats.reference(),
                    self.obs_dim(),
                    work.cov.trace()
                );
                *state = work;
                Ok(())
            }
            Err(e) => {
                warn!(
                    "float KF epoch aborted (ref PRN {}): {}",
                    self.sats.reference(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Predicted raw measurements `obs_mtx·mean`.
    pub fn predict_measurements(&self, state: &FilterState) -> Result<ObsVector, KfError> {
        self.check_state(state)?;
        Ok(self.obs_mtx.mul_vec(&state.mean))
    }

    /// Raw measurement residuals `z - obs_mtx·mean`.
    pub fn residuals(
        &self,
        state: &FilterState,
        measurements: &ObsVector,
    ) -> Result<ObsVector, KfError> {
        check_dim(self.obs_dim(), measurements.len())?;
        Ok(*measurements - self.predict_measurements(state)?)
    }
}
