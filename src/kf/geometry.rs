//! Double-difference observation geometry.

use crate::gnss::SatellitePositions;

use super::{KfError, ObsMatrix, SatMatrix, SatelliteSet, MAX_SATS, NUM_KINEMATIC};

/// Single- to double-difference operator, `(num_sats-1) × num_sats`.
///
/// Row `i` has `-1` in column 0 (reference) and `+1` in column `i+1`.
///
/// # Panics
///
/// If `num_sats > MAX_SATS`.
pub fn assign_d_mtx(num_sats: usize) -> SatMatrix<MAX_SATS> {
    let num_diffs = num_sats.saturating_sub(1);
    let mut d = SatMatrix::<MAX_SATS>::zeros(num_diffs, num_sats);
    for i in 0..num_diffs {
        d[(i, 0)] = -1.0;
        d[(i, i + 1)] = 1.0;
    }
    d
}

/// Line-of-sight matrix, `num_sats × 3`: row `i` is the unit vector from
/// `ref_ecef` to satellite `sats.prns()[i]`.
pub fn assign_e_mtx<P>(
    sats: &SatelliteSet,
    positions: &P,
    ref_ecef: &[f64; 3],
) -> Result<SatMatrix<3>, KfError>
where
    P: SatellitePositions + ?Sized,
{
    let mut e = SatMatrix::<3>::zeros(sats.num_sats(), 3);
    for (i, &prn) in sats.prns().iter().enumerate() {
        let los = positions.line_of_sight(prn, ref_ecef)?;
        for (k, v) in los.iter().enumerate() {
            e[(i, k)] = *v;
        }
    }
    Ok(e)
}

/// Differenced geometry `D·E`, `num_diffs × 3`.
pub fn assign_de_mtx<P>(
    sats: &SatelliteSet,
    positions: &P,
    ref_ecef: &[f64; 3],
) -> Result<SatMatrix<3>, KfError>
where
    P: SatellitePositions + ?Sized,
{
    let e = assign_e_mtx(sats, positions, ref_ecef)?;
    Ok(assign_d_mtx(sats.num_sats()).matmul(&e))
}

/// Raw observation design matrix, `obs_dim × state_dim`, from a differenced
/// geometry `de` with `num_diffs` rows:
///
/// ```text
/// phase rows: [ DE | 0 | I ]
/// code rows:  [ DE | 0 | 0 ]
/// ```
pub fn assign_obs_mtx(de: &SatMatrix<3>) -> ObsMatrix {
    let num_diffs = de.nrows();
    let state_dim = NUM_KINEMATIC + num_diffs;
    let mut h = ObsMatrix::zeros(2 * num_diffs, state_dim);
    h.set_block(0, 0, de);
    h.set_block(num_diffs, 0, de);
    for i in 0..num_diffs {
        h[(i, NUM_KINEMATIC + i)] = 1.0;
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnss::SingleDifference;

    fn sdiffs() -> [SingleDifference; 3] {
        let sd = |prn: u8, sat_pos: [f64; 3]| SingleDifference {
            prn,
            sat_pos,
            ..Default::default()
        };
        [
            sd(10, [0.0, 0.0, 2.0e7]),
            sd(11, [2.0e7, 0.0, 0.0]),
            sd(12, [0.0, -3.0e7, 0.0]),
        ]
    }

    #[test]
    fn d_mtx_layout() {
        let d = assign_d_mtx(4);
        assert_eq!((d.nrows(), d.ncols()), (3, 4));
        for i in 0..3 {
            assert_eq!(d[(i, 0)], -1.0);
            assert_eq!(d[(i, i + 1)], 1.0);
            let row_sum: f64 = (0..4).map(|j| d[(i, j)]).sum();
            assert_eq!(row_sum, 0.0);
        }
        assert_eq!(assign_d_mtx(1).nrows(), 0);
    }

    #[test]
    fn e_and_de_rows() {
        let sd = sdiffs();
        let sats = SatelliteSet::from_sdiffs(&sd).unwrap();
        let e = assign_e_mtx(&sats, &sd[..], &[0.0; 3]).unwrap();
        assert_eq!(e.row(0).as_slice(), &[0.0, 0.0, 1.0]);
        assert_eq!(e.row(2).as_slice(), &[0.0, -1.0, 0.0]);

        let de = assign_de_mtx(&sats, &sd[..], &[0.0; 3]).unwrap();
        assert_eq!((de.nrows(), de.ncols()), (2, 3));
        assert_eq!(de.row(0).as_slice(), &[1.0, 0.0, -1.0]);
        assert_eq!(de.row(1).as_slice(), &[0.0, -1.0, -1.0]);
    }

    #[test]
    fn geometry_follows_set_order_not_record_order() {
        let sd = sdiffs();
        let sats = SatelliteSet::new(&[12, 10, 11]).unwrap();
        let e = assign_e_mtx(&sats, &sd[..], &[0.0; 3]).unwrap();
        assert_eq!(e.row(0).as_slice(), &[0.0, -1.0, 0.0]);
    }

    #[test]
    fn unknown_satellite() {
        let sd = sdiffs();
        let sats = SatelliteSet::new(&[10, 99]).unwrap();
        assert_eq!(
            assign_de_mtx(&sats, &sd[..], &[0.0; 3]).unwrap_err(),
            KfError::UnknownSatellite(99)
        );
    }

    #[test]
    fn obs_mtx_blocks() {
        let sd = sdiffs();
        let sats = SatelliteSet::from_sdiffs(&sd).unwrap();
        let de = assign_de_mtx(&sats, &sd[..], &[0.0; 3]).unwrap();
        let h = assign_obs_mtx(&de);
        assert_eq!((h.nrows(), h.ncols()), (4, 8));
        for i in 0..2 {
            for k in 0..3 {
                assert_eq!(h[(i, k)], de[(i, k)]);
                assert_eq!(h[(i + 2, k)], de[(i, k)]);
                assert_eq!(h[(i, 3 + k)], 0.0);
                assert_eq!(h[(i + 2, 3 + k)], 0.0);
            }
            for j in 0..2 {
                let id = if i == j { 1.0 } else { 0.0 };
                assert_eq!(h[(i, 6 + j)], id);
                assert_eq!(h[(i + 2, 6 + j)], 0.0);
            }
        }
    }

    #[test]
    fn single_satellite_has_no_observations() {
        let de = SatMatrix::<3>::zeros(0, 3);
        let h = assign_obs_mtx(&de);
        assert_eq!((h.nrows(), h.ncols()), (0, 6));
    }
}
