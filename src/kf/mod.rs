//! RTK float-ambiguity Kalman filter.
//!
//! State layout for `n` tracked satellites (reference first):
//!
//! | Index | State |
//! |---|---|
//! | `0..3` | baseline position (ECEF) |
//! | `3..6` | baseline velocity (ECEF) |
//! | `6..6+n-1` | float double-difference ambiguity per non-reference satellite [m] |
//!
//! Measurements are stacked `[phase DDs | code DDs]`, `2·(n-1)` in total,
//! all in meters. Ambiguities are therefore carried in meters too; divide by
//! the carrier wavelength for cycles.
//! A [`KfConfig`] is built once per tracked constellation and holds every
//! matrix the recursion needs; a [`FilterState`] holds the mean and the UD
//! factors of the covariance and is advanced by [`KfConfig::filter_update`].
//!
//! ```
//! use rtk_float::gnss::SingleDifference;
//! use rtk_float::kf::{get_kf, make_measurements, FilterParams, FilterState};
//!
//! let sats = [
//!     [2.0e7, 0.0, 1.0e7],
//!     [0.0, 2.0e7, 1.0e7],
//!     [-1.5e7, -1.0e7, 1.5e7],
//!     [1.0e7, -1.8e7, 1.0e7],
//! ];
//! let sdiffs: Vec<SingleDifference> = sats
//!     .iter()
//!     .enumerate()
//!     .map(|(i, p)| SingleDifference { prn: i as u8 + 1, sat_pos: *p, ..Default::default() })
//!     .collect();
//!
//! let kf = get_kf(&FilterParams::default(), &sdiffs, &[0.0; 3]).unwrap();
//! assert_eq!(kf.state_dim(), 9);
//! assert_eq!(kf.obs_dim(), 6);
//!
//! let mut state = FilterState::with_prior(kf.state_dim(), 100.0).unwrap();
//! let z = make_measurements(&sdiffs).unwrap();
//! kf.filter_update(&mut state, &z).unwrap();
//! ```

mod config;
mod decorrelate;
mod filter;
mod geometry;
mod lsq;
mod measurements;
mod sats;
mod transition;


pub use config::{get_kf, get_kf_from_alms, FilterParams, KfConfig};
pub use decorrelate::{assign_decor_obs_cov, assign_decor_obs_mtx, dd_covariance};
pub use filter::FilterState;
pub use geometry::{assign_d_mtx, assign_de_mtx, assign_e_mtx, assign_obs_mtx};
pub use lsq::least_squares_solve;
pub use measurements::make_measurements;
pub use sats::SatelliteSet;
pub use transition::{assign_transition_cov, assign_transition_mtx};

use crate::linalg::LinalgError;
use crate::matrix::{BoundedMatrix, BoundedVector};
use crate::ud::{UdError, UdFactors};

/// Maximum number of tracked satellites, reference included.
pub const MAX_SATS: usize = 15;
/// Maximum state dimension: position, velocity and one ambiguity per
/// non-reference satellite.
pub const MAX_STATE_DIM: usize = MAX_SATS + 6;
/// Maximum observation dimension: phase and code per double difference.
pub const MAX_OBS_DIM: usize = 2 * MAX_SATS;

/// Number of kinematic states (position and velocity).
pub const NUM_KINEMATIC: usize = 6;

/// State mean vector.
pub type StateVector = BoundedVector<f64, MAX_STATE_DIM>;
/// State-sized square matrix (transition, process noise, covariance).
pub type StateMatrix = BoundedMatrix<f64, MAX_STATE_DIM, MAX_STATE_DIM>;
/// UD factors of the state covariance.
pub type StateFactors = UdFactors<f64, MAX_STATE_DIM>;
/// Measurement vector, raw or decorrelated.
pub type ObsVector = BoundedVector<f64, MAX_OBS_DIM>;
/// Observation design matrix, one row per scalar observation.
pub type ObsMatrix = BoundedMatrix<f64, MAX_OBS_DIM, MAX_STATE_DIM>;
/// Measurement-space square matrix (decorrelation transform).
pub type DecorMatrix = BoundedMatrix<f64, MAX_OBS_DIM, MAX_OBS_DIM>;
/// Satellite-indexed matrix (differencing, line-of-sight geometry).
pub type SatMatrix<const C: usize> = BoundedMatrix<f64, MAX_SATS, C>;

/// Errors from filter construction and the per-epoch recursion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KfError {
    /// UD factorization or scalar update lost positive semidefiniteness.
    /// Fatal to the filter instance: reinitialize.
    Numerical(UdError),
    /// Dense factorization failed (singular or rank-deficient system).
    Linalg(LinalgError),
    /// Fewer observations than unknowns in a least-squares solve.
    Underdetermined { obs_dim: usize, unknowns: usize },
    /// A container's logical size does not match the configuration.
    Dimension { expected: usize, found: usize },
    /// More satellites than [`MAX_SATS`].
    TooManySatellites(usize),
    /// Empty satellite list.
    NoSatellites,
    /// The same PRN appears twice.
    DuplicateSatellite(u8),
    /// No position available for this PRN.
    UnknownSatellite(u8),
    /// Satellite coincides with the reference position.
    DegenerateGeometry(u8),
    /// The state was built for a different satellite set (reference or
    /// order). Reinitialize it for the new configuration.
    SatelliteMismatch { expected_ref: u8, found_ref: u8 },
    /// A filter parameter is out of range.
    InvalidParameter(&'static str),
}

impl From<UdError> for KfError {
    fn from(e: UdError) -> Self {
        KfError::Numerical(e)
    }
}

impl From<LinalgError> for KfError {
    fn from(e: LinalgError) -> Self {
        KfError::Linalg(e)
    }
}

impl core::fmt::Display for KfError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KfError::Numerical(e) => write!(f, "numerical failure: {}", e),
            KfError::Linalg(e) => write!(f, "linear algebra failure: {}", e),
            KfError::Underdetermined { obs_dim, unknowns } => write!(
                f,
                "underdetermined system: {} observations for {} unknowns",
                obs_dim, unknowns
            ),
            KfError::Dimension { expected, found } => {
                write!(f, "dimension mismatch: expected {}, found {}", expected, found)
            }
            KfError::TooManySatellites(n) => {
                write!(f, "{} satellites exceeds the maximum of {}", n, MAX_SATS)
            }
            KfError::NoSatellites => write!(f, "no satellites"),
            KfError::DuplicateSatellite(prn) => write!(f, "duplicate satellite PRN {}", prn),
            KfError::UnknownSatellite(prn) => write!(f, "no position for satellite PRN {}", prn),
            KfError::DegenerateGeometry(prn) => {
                write!(f, "satellite PRN {} coincides with the reference position", prn)
            }
            KfError::SatelliteMismatch {
                expected_ref,
                found_ref,
            } => write!(
                f,
                "state belongs to another satellite set (reference PRN {}, configuration reference PRN {})",
                found_ref, expected_ref
            ),
            KfError::InvalidParameter(name) => write!(f, "invalid filter parameter `{}`", name),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KfError::Numerical(e) => Some(e),
            KfError::Linalg(e) => Some(e),
            _ => None,
        }
    }
}

/// Check a logical size against the size the configuration expects.
#[inline]
pub(crate) fn check_dim(expected: usize, found: usize) -> Result<(), KfError> {
    if expected == found {
        Ok(())
    } else {
        Err(KfError::Dimension { expected, found })
    }
}
