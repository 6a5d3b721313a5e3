/// GPS L1 carrier wavelength [m]: speed of light over 1575.42 MHz.
pub const GPS_L1_WAVELENGTH: f64 = 299_792_458.0 / 1_575.42e6;

/// Between-receiver single-differenced observation of one satellite.
///
/// Produced upstream from the rover and base receivers' raw observations;
/// the filter only consumes it. Carrier phase is expected in meters, so a
/// tracking loop reporting cycles must scale by the carrier wavelength
/// (for L1, [`GPS_L1_WAVELENGTH`]) before filling the record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleDifference {
    /// Satellite identifier.
    pub prn: u8,
    /// Satellite ECEF position [m].
    pub sat_pos: [f64; 3],
    /// Satellite ECEF velocity [m/s].
    pub sat_vel: [f64; 3],
    /// Single-differenced pseudorange [m].
    pub pseudorange: f64,
    /// Single-differenced carrier phase [m].
    pub carrier_phase: f64,
    /// Single-differenced Doppler [Hz].
    pub doppler: f64,
    /// Signal-to-noise ratio [dB-Hz].
    pub snr: f64,
}
