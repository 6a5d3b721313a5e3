use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::matrix::vector::BoundedVector;
use crate::traits::Scalar;

use super::BoundedMatrix;

// ── Element-wise addition / subtraction (logical blocks must agree) ──

impl<T: Scalar, const R: usize, const C: usize> AddAssign<&BoundedMatrix<T, R, C>>
    for BoundedMatrix<T, R, C>
{
    fn add_assign(&mut self, rhs: &BoundedMatrix<T, R, C>) {
        assert!(
            self.nrows() == rhs.nrows() && self.ncols() == rhs.ncols(),
            "matrix sizes must agree"
        );
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                self.data[j][i] = self.data[j][i] + rhs.data[j][i];
            }
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> SubAssign<&BoundedMatrix<T, R, C>>
    for BoundedMatrix<T, R, C>
{
    fn sub_assign(&mut self, rhs: &BoundedMatrix<T, R, C>) {
        assert!(
            self.nrows() == rhs.nrows() && self.ncols() == rhs.ncols(),
            "matrix sizes must agree"
        );
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                self.data[j][i] = self.data[j][i] - rhs.data[j][i];
            }
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Add for BoundedMatrix<T, R, C> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += &rhs;
        self
    }
}

impl<T: Scalar, const R: usize, const C: usize> Sub for BoundedMatrix<T, R, C> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= &rhs;
        self
    }
}

// ── Scalar multiplication: matrix * scalar ──────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Mul<T> for BoundedMatrix<T, R, C> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                self.data[j][i] = self.data[j][i] * rhs;
            }
        }
        self
    }
}

// ── Vectors ─────────────────────────────────────────────────────────

impl<T: Scalar, const N: usize> AddAssign<&BoundedVector<T, N>> for BoundedVector<T, N> {
    fn add_assign(&mut self, rhs: &BoundedVector<T, N>) {
        self.axpy(T::one(), rhs);
    }
}

impl<T: Scalar, const N: usize> SubAssign<&BoundedVector<T, N>> for BoundedVector<T, N> {
    fn sub_assign(&mut self, rhs: &BoundedVector<T, N>) {
        assert_eq!(self.len(), rhs.len(), "vector lengths must agree");
        for (y, x) in self.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
            *y = *y - *x;
        }
    }
}

impl<T: Scalar, const N: usize> Add for BoundedVector<T, N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += &rhs;
        self
    }
}

impl<T: Scalar, const N: usize> Sub for BoundedVector<T, N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= &rhs;
        self
    }
}

impl<T: Scalar, const N: usize> Mul<T> for BoundedVector<T, N> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        for x in self.as_mut_slice() {
            *x = *x * rhs;
        }
        self
    }
}
