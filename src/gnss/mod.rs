//! GNSS inputs to the filter: time, almanacs, single differences, and the
//! satellite-position capability the geometry is assembled from.
//!
//! The geometry builder asks a [`SatellitePositions`] source for each
//! tracked satellite's ECEF position. Two sources are provided:
//!
//! | Source | Positions come from |
//! |---|---|
//! | `[SingleDifference]` | `sat_pos` carried on each record |
//! | [`AlmanacEpoch`] | [`Almanac::position_at`] evaluated at one [`GpsTime`] |
//!
//! ```
//! use rtk_float::gnss::{SatellitePositions, SingleDifference};
//!
//! let sdiffs = [SingleDifference {
//!     prn: 5,
//!     sat_pos: [0.0, 0.0, 20_000_000.0],
//!     ..Default::default()
//! }];
//! let los = sdiffs[..].line_of_sight(5, &[0.0, 0.0, 0.0]).unwrap();
//! assert_eq!(los, [0.0, 0.0, 1.0]);
//! assert!(sdiffs[..].position(6).is_none());
//! ```

mod almanac;
mod sdiff;
mod time;

pub use almanac::{Almanac, GPS_GM, GPS_OMEGAE_DOT};
pub use sdiff::{SingleDifference, GPS_L1_WAVELENGTH};
pub use time::{GpsTime, WEEK_SECS};

use num_traits::Float;

use crate::kf::KfError;

/// Source of satellite ECEF positions for one epoch.
pub trait SatellitePositions {
    /// ECEF position [m] of satellite `prn`, or `None` if this source has no
    /// data for it.
    fn position(&self, prn: u8) -> Option<[f64; 3]>;

    /// Unit line-of-sight vector from `ref_ecef` to satellite `prn`.
    fn line_of_sight(&self, prn: u8, ref_ecef: &[f64; 3]) -> Result<[f64; 3], KfError> {
        let sat = self.position(prn).ok_or(KfError::UnknownSatellite(prn))?;
        let dx = [
            sat[0] - ref_ecef[0],
            sat[1] - ref_ecef[1],
            sat[2] - ref_ecef[2],
        ];
        let range = Float::sqrt(dx[0] * dx[0] + dx[1] * dx[1] + dx[2] * dx[2]);
        if !(range > 0.0) || !range.is_finite() {
            return Err(KfError::DegenerateGeometry(prn));
        }
        Ok([dx[0] / range, dx[1] / range, dx[2] / range])
    }
}

impl SatellitePositions for [SingleDifference] {
    fn position(&self, prn: u8) -> Option<[f64; 3]> {
        self.iter().find(|sd| sd.prn == prn).map(|sd| sd.sat_pos)
    }
}

/// Almanacs evaluated at a single epoch.
///
/// Health flags are not consulted; choosing which satellites to track is the
/// caller's business.
#[derive(Debug, Clone, Copy)]
pub struct AlmanacEpoch<'a> {
    pub alms: &'a [Almanac],
    pub t: GpsTime,
}

impl<'a> AlmanacEpoch<'a> {
    pub fn new(alms: &'a [Almanac], t: GpsTime) -> Self {
        Self { alms, t }
    }
}

impl SatellitePositions for AlmanacEpoch<'_> {
    fn position(&self, prn: u8) -> Option<[f64; 3]> {
        self.alms
            .iter()
            .find(|a| a.prn == prn)
            .map(|a| a.position_at(&self.t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_sight_is_unit() {
        let sdiffs = [SingleDifference {
            prn: 3,
            sat_pos: [1.0e7, 2.0e7, -5.0e6],
            ..Default::default()
        }];
        let r = [1.1e6, -4.8e6, 4.0e6];
        let e = sdiffs[..].line_of_sight(3, &r).unwrap();
        let norm = (e[0] * e[0] + e[1] * e[1] + e[2] * e[2]).sqrt();
        assert!((norm - 1.0).abs() < 1e-15);
        assert!(e[1] > 0.0);
    }

    #[test]
    fn line_of_sight_errors() {
        let sdiffs = [SingleDifference {
            prn: 3,
            sat_pos: [1.0, 2.0, 3.0],
            ..Default::default()
        }];
        assert_eq!(
            sdiffs[..].line_of_sight(9, &[0.0; 3]).unwrap_err(),
            KfError::UnknownSatellite(9)
        );
        assert_eq!(
            sdiffs[..].line_of_sight(3, &[1.0, 2.0, 3.0]).unwrap_err(),
            KfError::DegenerateGeometry(3)
        );
    }

    #[test]
    fn almanac_epoch_positions() {
        let alms = [Almanac {
            prn: 12,
            a: 26_559_710.0,
            week: 2000,
            ..Default::default()
        }];
        let epoch = AlmanacEpoch::new(&alms, GpsTime::new(2000, 0.0));
        assert_eq!(epoch.position(12), Some([26_559_710.0, 0.0, 0.0]));
        assert_eq!(epoch.position(13), None);
        let los = epoch.line_of_sight(12, &[6_378_137.0, 0.0, 0.0]).unwrap();
        assert_eq!(los, [1.0, 0.0, 0.0]);
    }
}
