use crate::gnss::{Almanac, SingleDifference};

use super::{KfError, MAX_SATS, NUM_KINEMATIC};

/// Ordered set of tracked satellites, reference satellite first.
///
/// Every matrix of a [`KfConfig`](super::KfConfig) is built against this
/// order: double difference `i` is satellite `i + 1` minus the reference.
///
/// ```
/// use rtk_float::kf::{KfError, SatelliteSet};
///
/// let sats = SatelliteSet::new(&[7, 3, 12]).unwrap();
/// assert_eq!(sats.reference(), 7);
/// assert_eq!(sats.num_diffs(), 2);
/// assert_eq!(SatelliteSet::new(&[1, 1]).unwrap_err(), KfError::DuplicateSatellite(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteSet {
    prns: [u8; MAX_SATS],
    len: usize,
}

impl SatelliteSet {
    /// Build from PRNs in order, reference first.
    pub fn new(prns: &[u8]) -> Result<Self, KfError> {
        Self::from_iter_checked(prns.len(), prns.iter().copied())
    }

    /// PRNs of single-difference records, in the given order.
    pub fn from_sdiffs(sdiffs: &[SingleDifference]) -> Result<Self, KfError> {
        Self::from_iter_checked(sdiffs.len(), sdiffs.iter().map(|sd| sd.prn))
    }

    /// PRNs of almanac entries, in the given order.
    pub fn from_alms(alms: &[Almanac]) -> Result<Self, KfError> {
        Self::from_iter_checked(alms.len(), alms.iter().map(|a| a.prn))
    }

    fn from_iter_checked(len: usize, prns: impl Iterator<Item = u8>) -> Result<Self, KfError> {
        if len == 0 {
            return Err(KfError::NoSatellites);
        }
        if len > MAX_SATS {
            return Err(KfError::TooManySatellites(len));
        }
        let mut set = Self {
            prns: [0; MAX_SATS],
            len: 0,
        };
        for prn in prns {
            if set.contains(prn) {
                return Err(KfError::DuplicateSatellite(prn));
            }
            set.prns[set.len] = prn;
            set.len += 1;
        }
        Ok(set)
    }

    /// The same satellites with `prn` moved to the reference slot; the
    /// others keep their relative order.
    pub fn with_reference(&self, prn: u8) -> Result<Self, KfError> {
        if !self.contains(prn) {
            return Err(KfError::UnknownSatellite(prn));
        }
        let mut out = Self {
            prns: [0; MAX_SATS],
            len: self.len,
        };
        out.prns[0] = prn;
        let mut k = 1;
        for &p in self.prns().iter().filter(|&&p| p != prn) {
            out.prns[k] = p;
            k += 1;
        }
        Ok(out)
    }

    /// Reference satellite.
    #[inline]
    pub fn reference(&self) -> u8 {
        self.prns[0]
    }

    /// All PRNs, reference first.
    #[inline]
    pub fn prns(&self) -> &[u8] {
        &self.prns[..self.len]
    }

    /// Non-reference PRNs, in double-difference order.
    #[inline]
    pub fn others(&self) -> &[u8] {
        &self.prns[1..self.len]
    }

    pub fn contains(&self, prn: u8) -> bool {
        self.prns().contains(&prn)
    }

    #[inline]
    pub fn num_sats(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn num_diffs(&self) -> usize {
        self.len - 1
    }

    /// `6 + num_diffs`.
    #[inline]
    pub fn state_dim(&self) -> usize {
        NUM_KINEMATIC + self.num_diffs()
    }

    /// `2 · num_diffs`.
    #[inline]
    pub fn obs_dim(&self) -> usize {
        2 * self.num_diffs()
    }
}
