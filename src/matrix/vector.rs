use core::ops::{Index, IndexMut};

use crate::traits::Scalar;

/// Fixed-capacity vector with room for `N` elements and an explicit
/// logical length.
///
/// Used for filter means, diagonals of UD factors, gains and measurement
/// vectors. Indexing past the logical length panics in debug builds.
///
/// # Examples
///
/// ```
/// use rtk_float::BoundedVector;
///
/// let v: BoundedVector<f64, 8> = BoundedVector::from_slice(&[3.0, 4.0]);
/// assert_eq!(v.len(), 2);
/// assert_eq!(v.dot(&v), 25.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BoundedVector<T, const N: usize> {
    data: [T; N],
    len: usize,
}

impl<T, const N: usize> BoundedVector<T, N> {
    /// Logical length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when the logical length is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The logical elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// The logical elements, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..self.len]
    }

    /// Iterator over the logical elements.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Scalar, const N: usize> BoundedVector<T, N> {
    /// Zero vector of logical length `len`.
    pub fn zeros(len: usize) -> Self {
        Self::fill(len, T::zero())
    }

    /// Vector of logical length `len` with every element set to `value`.
    pub fn fill(len: usize, value: T) -> Self {
        assert!(len <= N, "logical length {} exceeds capacity {}", len, N);
        let mut data = [T::zero(); N];
        for x in data.iter_mut().take(len) {
            *x = value;
        }
        Self { data, len }
    }

    /// Copy a slice; the logical length is `values.len()`.
    pub fn from_slice(values: &[T]) -> Self {
        let mut v = Self::zeros(values.len());
        v.data[..values.len()].copy_from_slice(values);
        v
    }

    /// Dot product over the logical elements.
    pub fn dot<const P: usize>(&self, rhs: &BoundedVector<T, P>) -> T {
        assert_eq!(self.len, rhs.len(), "vector lengths must agree");
        let mut sum = T::zero();
        for (a, b) in self.iter().zip(rhs.iter()) {
            sum = sum + *a * *b;
        }
        sum
    }

    /// `self += alpha * x` over the logical elements.
    pub fn axpy(&mut self, alpha: T, x: &Self) {
        assert_eq!(self.len, x.len, "vector lengths must agree");
        for (y, xi) in self.as_mut_slice().iter_mut().zip(x.as_slice()) {
            *y = *y + alpha * *xi;
        }
    }
}

impl<T: PartialEq, const N: usize> PartialEq for BoundedVector<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, const N: usize> Index<usize> for BoundedVector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        debug_assert!(i < self.len, "index {} outside logical length {}", i, self.len);
        &self.data[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for BoundedVector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        debug_assert!(i < self.len, "index {} outside logical length {}", i, self.len);
        &mut self.data[i]
    }
}
