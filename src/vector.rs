//! Vector-space operations required by [`CenteredTree`][crate::CenteredTree].

use num_traits::{Float, NumCast};

/// Addition and scalar multiplication over values of a data type.
///
/// The centroid of a subtree is computed as the scaled sum of its members, so every element added
/// into an accumulator must have the same shape as the accumulator (for example the same number of
/// dimensions for a `Vec`). Copies are made through [`Clone`].
pub trait VectorSpace: Clone {
    /// The additive identity with the same shape as `self`.
    fn zero_like(&self) -> Self;

    /// `self += other`.
    fn add_assign(&mut self, other: &Self);

    /// `self *= factor`.
    fn scale(&mut self, factor: f64);
}

impl VectorSpace for f64 {
    #[inline]
    fn zero_like(&self) -> Self {
        0.0
    }

    #[inline]
    fn add_assign(&mut self, other: &Self) {
        *self += *other;
    }

    #[inline]
    fn scale(&mut self, factor: f64) {
        *self *= factor;
    }
}

impl VectorSpace for f32 {
    #[inline]
    fn zero_like(&self) -> Self {
        0.0
    }

    #[inline]
    fn add_assign(&mut self, other: &Self) {
        *self += *other;
    }

    #[inline]
    fn scale(&mut self, factor: f64) {
        *self = (*self as f64 * factor) as f32;
    }
}

#[inline]
fn scale_coord<N: Float>(n: N, factor: f64) -> N {
    <N as NumCast>::from(factor).map_or(N::nan(), |f| n * f)
}

impl<N: Float, const D: usize> VectorSpace for [N; D] {
    #[inline]
    fn zero_like(&self) -> Self {
        [N::zero(); D]
    }

    #[inline]
    fn add_assign(&mut self, other: &Self) {
        for (a, &b) in self.iter_mut().zip(other) {
            *a = *a + b;
        }
    }

    #[inline]
    fn scale(&mut self, factor: f64) {
        for a in self.iter_mut() {
            *a = scale_coord(*a, factor);
        }
    }
}

impl<N: Float> VectorSpace for Vec<N> {
    #[inline]
    fn zero_like(&self) -> Self {
        vec![N::zero(); self.len()]
    }

    #[inline]
    fn add_assign(&mut self, other: &Self) {
        debug_assert_eq!(self.len(), other.len(), "vector dimensions differ");
        for (a, &b) in self.iter_mut().zip(other) {
            *a = *a + b;
        }
    }

    #[inline]
    fn scale(&mut self, factor: f64) {
        for a in self.iter_mut() {
            *a = scale_coord(*a, factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VectorSpace;

    #[test]
    fn array_mean() {
        let points = [[0.0f64, 0.0], [2.0, 4.0], [4.0, 2.0]];
        let mut sum = points[0].zero_like();
        for p in &points {
            sum.add_assign(p);
        }
        sum.scale(1.0 / points.len() as f64);
        assert_eq!(sum, [2.0, 2.0]);
    }

    #[test]
    fn vec_zero_like_keeps_dimension() {
        let v = vec![1.0f32, 2.0, 3.0];
        assert_eq!(v.zero_like(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn scalar_scale() {
        let mut x = 3.0f64;
        x.add_assign(&1.0);
        x.scale(0.5);
        assert_eq!(x, 2.0);
    }
}
