use log::debug;

use crate::gnss::{Almanac, AlmanacEpoch, GpsTime, SatellitePositions, SingleDifference};
use crate::ud::udu;

use super::{
    assign_de_mtx, assign_decor_obs_cov, assign_decor_obs_mtx, assign_obs_mtx,
    assign_transition_cov, assign_transition_mtx, DecorMatrix, KfError, ObsMatrix, ObsVector,
    SatelliteSet, StateFactors, StateMatrix,
};

/// Noise and timing parameters of the float filter.
///
/// Variances of the measurement model are per single difference; process
/// noise values are spectral densities integrated over `dt`.
///
/// ```
/// use rtk_float::kf::FilterParams;
///
/// let params = FilterParams { dt: 0.2, ..Default::default() };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterParams {
    /// Carrier-phase single-difference variance. Must be positive.
    pub phase_var: f64,
    /// Pseudorange single-difference variance. Must be positive.
    pub code_var: f64,
    /// Position random-walk density. Non-negative.
    pub pos_var: f64,
    /// Acceleration white-noise density. Non-negative.
    pub vel_var: f64,
    /// Ambiguity random-walk density. Non-negative.
    pub int_var: f64,
    /// Epoch interval [s]. Non-negative.
    pub dt: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            phase_var: 1e-4,
            code_var: 1.0,
            pos_var: 1e-2,
            vel_var: 1.0,
            int_var: 1e-8,
            dt: 1.0,
        }
    }
}

impl FilterParams {
    /// Reject non-finite values, non-positive measurement variances and
    /// negative process noise or interval.
    pub fn validate(&self) -> Result<(), KfError> {
        let positive = [("phase_var", self.phase_var), ("code_var", self.code_var)];
        for (name, v) in positive {
            if !(v > 0.0 && v.is_finite()) {
                return Err(KfError::InvalidParameter(name));
            }
        }
        let non_negative = [
            ("pos_var", self.pos_var),
            ("vel_var", self.vel_var),
            ("int_var", self.int_var),
            ("dt", self.dt),
        ];
        for (name, v) in non_negative {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(KfError::InvalidParameter(name));
            }
        }
        Ok(())
    }
}

/// Float-filter configuration for one tracked constellation.
///
/// Immutable after construction; rebuild it whenever the satellite set or
/// its reference changes.
#[derive(Debug, Clone)]
pub struct KfConfig {
    pub(crate) params: FilterParams,
    pub(crate) sats: SatelliteSet,
    pub(crate) transition_mtx: StateMatrix,
    pub(crate) transition_cov: StateMatrix,
    pub(crate) process_noise: StateFactors,
    pub(crate) decor_mtx: DecorMatrix,
    pub(crate) obs_mtx: ObsMatrix,
    pub(crate) decor_obs_mtx: ObsMatrix,
    pub(crate) decor_obs_cov: ObsVector,
}

impl KfConfig {
    /// Assemble every matrix of the filter for `sats` as seen from
    /// `ref_ecef`, with satellite positions drawn from `positions`.
    pub fn new<P>(
        params: &FilterParams,
        sats: SatelliteSet,
        positions: &P,
        ref_ecef: &[f64; 3],
    ) -> Result<Self, KfError>
    where
        P: SatellitePositions + ?Sized,
    {
        params.validate()?;
        let state_dim = sats.state_dim();

        let transition_mtx = assign_transition_mtx(state_dim, params.dt)?;
        let transition_cov = assign_transition_cov(
            state_dim,
            params.dt,
            params.pos_var,
            params.vel_var,
            params.int_var,
        )?;
        let process_noise = udu(&transition_cov)?;

        let de = assign_de_mtx(&sats, positions, ref_ecef)?;
        let obs_mtx = assign_obs_mtx(&de);
        let (decor_mtx, decor_obs_cov) =
            assign_decor_obs_cov(sats.num_diffs(), params.phase_var, params.code_var)?;
        let decor_obs_mtx = assign_decor_obs_mtx(&decor_mtx, &obs_mtx);

        debug!(
            "float KF config: {} sats (ref PRN {}), state_dim {}, obs_dim {}, dt {}",
            sats.num_sats(),
            sats.reference(),
            state_dim,
            sats.obs_dim(),
            params.dt
        );

        Ok(Self {
            params: *params,
            sats,
            transition_mtx,
            transition_cov,
            process_noise,
            decor_mtx,
            obs_mtx,
            decor_obs_mtx,
            decor_obs_cov,
        })
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Tracked satellites, reference first.
    pub fn sats(&self) -> &SatelliteSet {
        &self.sats
    }

    #[inline]
    pub fn num_sats(&self) -> usize {
        self.sats.num_sats()
    }

    #[inline]
    pub fn state_dim(&self) -> usize {
        self.sats.state_dim()
    }

    #[inline]
    pub fn obs_dim(&self) -> usize {
        self.sats.obs_dim()
    }

    /// State transition `Φ`.
    pub fn transition_mtx(&self) -> &StateMatrix {
        &self.transition_mtx
    }

    /// Process noise `Q`.
    pub fn transition_cov(&self) -> &StateMatrix {
        &self.transition_cov
    }

    /// UD factors of `Q`.
    pub fn process_noise(&self) -> &StateFactors {
        &self.process_noise
    }

    /// Whitening transform for raw measurements.
    pub fn decor_mtx(&self) -> &DecorMatrix {
        &self.decor_mtx
    }

    /// Design matrix for raw measurements.
    pub fn obs_mtx(&self) -> &ObsMatrix {
        &self.obs_mtx
    }

    /// Design matrix for decorrelated measurements, one row per scalar
    /// observation.
    pub fn decor_obs_mtx(&self) -> &ObsMatrix {
        &self.decor_obs_mtx
    }

    /// Noise variance of each decorrelated observation.
    pub fn decor_obs_cov(&self) -> &ObsVector {
        &self.decor_obs_cov
    }
}

/// Configuration from single-difference records, reference first.
pub fn get_kf(
    params: &FilterParams,
    sdiffs_with_ref_first: &[SingleDifference],
    ref_ecef: &[f64; 3],
) -> Result<KfConfig, KfError> {
    let sats = SatelliteSet::from_sdiffs(sdiffs_with_ref_first)?;
    KfConfig::new(params, sats, sdiffs_with_ref_first, ref_ecef)
}

/// Configuration from almanacs evaluated at `timestamp`, reference first.
pub fn get_kf_from_alms(
    params: &FilterParams,
    alms_with_ref_first: &[Almanac],
    timestamp: GpsTime,
    ref_ecef: &[f64; 3],
) -> Result<KfConfig, KfError> {
    let sats = SatelliteSet::from_alms(alms_with_ref_first)?;
    let epoch = AlmanacEpoch::new(alms_with_ref_first, timestamp);
    KfConfig::new(params, sats, &epoch, ref_ecef)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(FilterParams::default().validate().is_ok());
    }

    #[test]
    fn params_validation() {
        let p = FilterParams {
            phase_var: 0.0,
            ..Default::default()
        };
        assert_eq!(p.validate().unwrap_err(), KfError::InvalidParameter("phase_var"));

        let p = FilterParams {
            vel_var: -1.0,
            ..Default::default()
        };
        assert_eq!(p.validate().unwrap_err(), KfError::InvalidParameter("vel_var"));

        let p = FilterParams {
            dt: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(p.validate().unwrap_err(), KfError::InvalidParameter("dt"));

        let p = FilterParams {
            pos_var: 0.0,
            vel_var: 0.0,
            int_var: 0.0,
            dt: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_ok());
    }
}
