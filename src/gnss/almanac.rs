use num_traits::Float;

use super::time::GpsTime;

/// WGS-84 value of the Earth's gravitational constant used by GPS [m³/s²].
pub const GPS_GM: f64 = 3.986005e14;
/// WGS-84 Earth rotation rate [rad/s].
pub const GPS_OMEGAE_DOT: f64 = 7.2921151467e-5;

const KEPLER_MAX_ITER: usize = 15;
const KEPLER_TOL: f64 = 1e-14;

/// GPS almanac entry (reduced-precision Keplerian orbit).
///
/// Angles in radians, rates in rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Almanac {
    /// Satellite identifier.
    pub prn: u8,
    /// Health flag as broadcast.
    pub healthy: bool,
    /// Eccentricity.
    pub ecc: f64,
    /// Time of applicability [s of week].
    pub toa: f64,
    /// Inclination.
    pub inc: f64,
    /// Rate of right ascension.
    pub rora: f64,
    /// Semi-major axis [m].
    pub a: f64,
    /// Right ascension at week.
    pub raaw: f64,
    /// Argument of perigee.
    pub argp: f64,
    /// Mean anomaly at `toa`.
    pub ma: f64,
    /// Clock offset [s].
    pub af0: f64,
    /// Clock drift [s/s].
    pub af1: f64,
    /// Week number of `toa`.
    pub week: i16,
}

impl Almanac {
    /// Time of applicability as a [`GpsTime`].
    pub fn toa_time(&self) -> GpsTime {
        GpsTime::new(self.week, self.toa)
    }

    /// Mean motion `sqrt(GM/a³)` [rad/s].
    pub fn mean_motion(&self) -> f64 {
        Float::sqrt(GPS_GM / (self.a * self.a * self.a))
    }

    /// Satellite ECEF position [m] at time `t`.
    ///
    /// Solves Kepler's equation by Newton iteration, places the satellite in
    /// its orbital plane, then rotates by inclination and by the longitude of
    /// the ascending node corrected for Earth rotation.
    pub fn position_at(&self, t: &GpsTime) -> [f64; 3] {
        let dt = t.seconds_since(&self.toa_time());
        let ma = self.ma + self.mean_motion() * dt;

        let mut ea = ma;
        for _ in 0..KEPLER_MAX_ITER {
            let (s, c) = Float::sin_cos(ea);
            let step = (ea - self.ecc * s - ma) / (1.0 - self.ecc * c);
            ea = ea - step;
            if Float::abs(step) < KEPLER_TOL {
                break;
            }
        }

        let (sin_e, cos_e) = Float::sin_cos(ea);
        let r = self.a * (1.0 - self.ecc * cos_e);
        let nu = Float::atan2(
            Float::sqrt(1.0 - self.ecc * self.ecc) * sin_e,
            cos_e - self.ecc,
        );
        let (sin_u, cos_u) = Float::sin_cos(nu + self.argp);
        let x = r * cos_u;
        let y = r * sin_u;

        let om = self.raaw + dt * (self.rora - GPS_OMEGAE_DOT) - GPS_OMEGAE_DOT * self.toa;
        let (sin_om, cos_om) = Float::sin_cos(om);
        let (sin_i, cos_i) = Float::sin_cos(self.inc);

        [
            x * cos_om - y * cos_i * sin_om,
            x * sin_om + y * cos_i * cos_om,
            y * sin_i,
        ]
    }
}
