//! Bierman sequential scalar observation update.

use crate::matrix::BoundedVector;
use crate::traits::FloatScalar;

use super::{UdError, UdFactors};

/// Bierman scalar measurement update on UD factors.
///
/// Given one observation row `h` (length `n`) with independent noise variance
/// `r`, updates `ud` in place to the posterior factors and returns the Kalman
/// gain for that scalar observation. The covariance is never formed.
///
/// Algorithm (Bierman, *Factorization Methods for Discrete Sequential
/// Estimation*, p.100):
///
/// 1. `f = Uᵀh`, `v = D·f`
/// 2. `α₀ = r + v₀f₀`, `D₀ ← D₀·r/α₀`, `b₀ = v₀`
/// 3. For j = 1..n: `αⱼ = αⱼ₋₁ + vⱼfⱼ`, `λ = -fⱼ/αⱼ₋₁`,
///    `Dⱼ ← Dⱼ·αⱼ₋₁/αⱼ`, and for i < j:
///    `Uᵢⱼ ← Uᵢⱼ + λ·bᵢ`, `bᵢ ← bᵢ + vⱼ·Uᵢⱼ(old)`; then `bⱼ = vⱼ`
/// 4. gain `k = b / αₙ₋₁`
///
/// The factors are only written back when every innovation variance stays
/// positive; on error `ud` is untouched. An all-zero `h` leaves the factors
/// bit-for-bit unchanged and returns a zero gain.
///
/// O(n²), no allocation.
pub fn update_scalar_measurement<T: FloatScalar, const N: usize>(
    h: &BoundedVector<T, N>,
    r: T,
    ud: &mut UdFactors<T, N>,
) -> Result<BoundedVector<T, N>, UdError> {
    let n = ud.dim();
    assert_eq!(h.len(), n, "observation row length must match state dimension");
    if !(r >= T::zero()) {
        return Err(UdError::NegativeVariance);
    }
    if n == 0 {
        return Ok(BoundedVector::zeros(0));
    }

    let mut u = ud.u;
    let mut d = ud.d;

    // f = Uᵀh, v = D f
    let mut f = BoundedVector::<T, N>::zeros(n);
    let mut v = BoundedVector::<T, N>::zeros(n);
    for j in 0..n {
        let mut s = h[j];
        for k in 0..j {
            s = s + u[(k, j)] * h[k];
        }
        f[j] = s;
        v[j] = d[j] * s;
    }

    let mut b = BoundedVector::<T, N>::zeros(n);
    let mut alpha = r + v[0] * f[0];
    if !(alpha > T::zero()) {
        return Err(UdError::NonPositiveInnovation);
    }
    d[0] = d[0] * (r / alpha);
    b[0] = v[0];

    for j in 1..n {
        let alpha_prev = alpha;
        alpha = alpha_prev + v[j] * f[j];
        if !(alpha > T::zero()) {
            return Err(UdError::NonPositiveInnovation);
        }
        let lambda = -f[j] / alpha_prev;
        d[j] = d[j] * (alpha_prev / alpha);
        for i in 0..j {
            let u_old = u[(i, j)];
            u[(i, j)] = u_old + lambda * b[i];
            b[i] = b[i] + v[j] * u_old;
        }
        b[j] = v[j];
    }

    ud.u = u;
    ud.d = d;

    let inv_alpha = T::one() / alpha;
    for x in b.as_mut_slice() {
        *x = *x * inv_alpha;
    }
    Ok(b)
}
