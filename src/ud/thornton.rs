//! Thornton time update (modified weighted Gram–Schmidt).

use crate::matrix::{BoundedMatrix, BoundedVector};
use crate::traits::FloatScalar;

use super::{UdError, UdFactors};

/// Propagate UD factors through `P' = Φ·P·Φᵀ + Q`.
///
/// `q` holds the UD factors of the process noise `Q = U_q·D_q·U_qᵀ`. The
/// rows of `W = [Φ·U | U_q]` are orthogonalized from the last to the first
/// under the weights `D̃ = diag(D, D_q)`:
///
/// For j = n-1..0:
///   1. `D'ⱼ = Σₖ W[j,k]²·D̃ₖ`
///   2. for i < j: `U'ᵢⱼ = ⟨W[i], W[j]⟩_D̃ / D'ⱼ`, `W[i] ← W[i] - U'ᵢⱼ·W[j]`
///
/// A row with zero weighted norm gives `D'ⱼ = 0` and a unit column in `U'`.
/// The factors are only written back on success.
///
/// O(n³), no allocation.
pub fn thornton_predict<T: FloatScalar, const N: usize>(
    phi: &BoundedMatrix<T, N, N>,
    ud: &mut UdFactors<T, N>,
    q: &UdFactors<T, N>,
) -> Result<(), UdError> {
    let n = ud.dim();
    assert!(
        phi.nrows() == n && phi.ncols() == n,
        "transition matrix must match the state dimension"
    );
    assert_eq!(q.dim(), n, "process noise must match the state dimension");

    let mut a = phi.matmul(&ud.u);
    let mut b = q.u;
    let da = ud.d;
    let db = q.d;

    let mut u_new = BoundedMatrix::<T, N, N>::eye(n);
    let mut d_new = BoundedVector::<T, N>::zeros(n);
    let mut wa = BoundedVector::<T, N>::zeros(n);
    let mut wb = BoundedVector::<T, N>::zeros(n);

    for j in (0..n).rev() {
        let mut sigma = T::zero();
        for k in 0..n {
            wa[k] = da[k] * a[(j, k)];
            wb[k] = db[k] * b[(j, k)];
            sigma = sigma + a[(j, k)] * wa[k] + b[(j, k)] * wb[k];
        }
        if sigma.is_nan() || sigma < T::zero() {
            return Err(UdError::NotPositiveSemidefinite { index: j });
        }
        d_new[j] = sigma;
        if sigma == T::zero() {
            continue;
        }

        let inv_sigma = T::one() / sigma;
        for i in 0..j {
            let mut s = T::zero();
            for k in 0..n {
                s = s + a[(i, k)] * wa[k] + b[(i, k)] * wb[k];
            }
            let uij = s * inv_sigma;
            u_new[(i, j)] = uij;
            for k in 0..n {
                a[(i, k)] = a[(i, k)] - uij * a[(j, k)];
                b[(i, k)] = b[(i, k)] - uij * b[(j, k)];
            }
        }
    }

    ud.u = u_new;
    ud.d = d_new;
    Ok(())
}
