use crate::gnss::SingleDifference;

use super::{KfError, ObsVector, MAX_SATS};

/// Raw double-difference measurement vector from single differences,
/// reference first: `[phase DDs | code DDs]`, with DD `i` formed as
/// satellite `i + 1` minus the reference. Both halves are in meters, taken
/// from [`SingleDifference::carrier_phase`] and
/// [`SingleDifference::pseudorange`] without scaling.
///
/// ```
/// use rtk_float::gnss::SingleDifference;
/// use rtk_float::kf::make_measurements;
///
/// let sd = |prn: u8, phase: f64, range: f64| SingleDifference {
///     prn,
///     carrier_phase: phase,
///     pseudorange: range,
///     ..Default::default()
/// };
/// let z = make_measurements(&[sd(1, 10.0, 3.0), sd(2, 12.5, 4.0), sd(3, 9.0, 1.0)]).unwrap();
/// assert_eq!(z.as_slice(), &[2.5, -1.0, 1.0, -2.0]);
/// ```
pub fn make_measurements(sdiffs_with_ref_first: &[SingleDifference]) -> Result<ObsVector, KfError> {
    let num_sats = sdiffs_with_ref_first.len();
    if num_sats == 0 {
        return Err(KfError::NoSatellites);
    }
    if num_sats > MAX_SATS {
        return Err(KfError::TooManySatellites(num_sats));
    }

    let num_diffs = num_sats - 1;
    let reference = &sdiffs_with_ref_first[0];
    let mut z = ObsVector::zeros(2 * num_diffs);
    for (i, sd) in sdiffs_with_ref_first[1..].iter().enumerate() {
        z[i] = sd.carrier_phase - reference.carrier_phase;
        z[num_diffs + i] = sd.pseudorange - reference.pseudorange;
    }
    Ok(z)
}
