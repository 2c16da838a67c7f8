//! Distance metrics for tree construction and queries.
//!
//! A tree only ever talks to its data through a [`Metric`]. Implementations must be pure and
//! satisfy non-negativity, symmetry and the triangle inequality; the pruning rules of every query
//! are only exact under those assumptions.

use std::fmt;

use geo_traits::CoordTrait;
use num_traits::Float;

/// A distance function over values of type `T`.
pub trait Metric<T: ?Sized> {
    /// The distance between `a` and `b`.
    fn distance(&self, a: &T, b: &T) -> f64;

    /// The squared distance between `a` and `b`.
    ///
    /// Metrics that can compute this without a square root should override it.
    #[inline]
    fn distance_sq(&self, a: &T, b: &T) -> f64 {
        let d = self.distance(a, b);
        d * d
    }
}

impl<T: ?Sized, M: Metric<T> + ?Sized> Metric<T> for &M {
    #[inline]
    fn distance(&self, a: &T, b: &T) -> f64 {
        (**self).distance(a, b)
    }

    #[inline]
    fn distance_sq(&self, a: &T, b: &T) -> f64 {
        (**self).distance_sq(a, b)
    }
}

/// Straight-line (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

/// Taxicab (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

/// Maximum-coordinate (L∞) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chebyshev;

#[inline]
fn to_f64<N: Float>(n: N) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}

#[inline]
fn l2_sq<N: Float>(a: &[N], b: &[N]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "coordinate dimensions differ");
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = to_f64(x) - to_f64(y);
            d * d
        })
        .sum()
}

#[inline]
fn l1<N: Float>(a: &[N], b: &[N]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "coordinate dimensions differ");
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (to_f64(x) - to_f64(y)).abs())
        .sum()
}

#[inline]
fn linf<N: Float>(a: &[N], b: &[N]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "coordinate dimensions differ");
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (to_f64(x) - to_f64(y)).abs())
        .fold(0.0, f64::max)
}

macro_rules! impl_scalar_metrics {
    ($($t:ty),*) => {
        $(
            impl Metric<$t> for Euclidean {
                #[inline]
                fn distance(&self, a: &$t, b: &$t) -> f64 {
                    (*a as f64 - *b as f64).abs()
                }

                #[inline]
                fn distance_sq(&self, a: &$t, b: &$t) -> f64 {
                    let d = *a as f64 - *b as f64;
                    d * d
                }
            }

            impl Metric<$t> for Manhattan {
                #[inline]
                fn distance(&self, a: &$t, b: &$t) -> f64 {
                    (*a as f64 - *b as f64).abs()
                }
            }

            impl Metric<$t> for Chebyshev {
                #[inline]
                fn distance(&self, a: &$t, b: &$t) -> f64 {
                    (*a as f64 - *b as f64).abs()
                }
            }
        )*
    };
}

impl_scalar_metrics!(f32, f64);

impl<N: Float> Metric<[N]> for Euclidean {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        l2_sq(a, b).sqrt()
    }

    #[inline]
    fn distance_sq(&self, a: &[N], b: &[N]) -> f64 {
        l2_sq(a, b)
    }
}

impl<N: Float, const D: usize> Metric<[N; D]> for Euclidean {
    #[inline]
    fn distance(&self, a: &[N; D], b: &[N; D]) -> f64 {
        l2_sq(a, b).sqrt()
    }

    #[inline]
    fn distance_sq(&self, a: &[N; D], b: &[N; D]) -> f64 {
        l2_sq(a, b)
    }
}

impl<N: Float> Metric<Vec<N>> for Euclidean {
    #[inline]
    fn distance(&self, a: &Vec<N>, b: &Vec<N>) -> f64 {
        l2_sq(a, b).sqrt()
    }

    #[inline]
    fn distance_sq(&self, a: &Vec<N>, b: &Vec<N>) -> f64 {
        l2_sq(a, b)
    }
}

impl<N: Float> Metric<[N]> for Manhattan {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        l1(a, b)
    }
}

impl<N: Float, const D: usize> Metric<[N; D]> for Manhattan {
    #[inline]
    fn distance(&self, a: &[N; D], b: &[N; D]) -> f64 {
        l1(a, b)
    }
}

impl<N: Float> Metric<Vec<N>> for Manhattan {
    #[inline]
    fn distance(&self, a: &Vec<N>, b: &Vec<N>) -> f64 {
        l1(a, b)
    }
}

impl<N: Float> Metric<[N]> for Chebyshev {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        linf(a, b)
    }
}

impl<N: Float, const D: usize> Metric<[N; D]> for Chebyshev {
    #[inline]
    fn distance(&self, a: &[N; D], b: &[N; D]) -> f64 {
        linf(a, b)
    }
}

impl<N: Float> Metric<Vec<N>> for Chebyshev {
    #[inline]
    fn distance(&self, a: &Vec<N>, b: &Vec<N>) -> f64 {
        linf(a, b)
    }
}

/// Euclidean distance between any two planar coordinates implementing
/// [`CoordTrait`][geo_traits::CoordTrait].
///
/// Only the `x` and `y` components are used. When working with longitude/latitude coordinates,
/// the unit of distance will be degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanarEuclidean;

impl<C: CoordTrait<T = f64>> Metric<C> for PlanarEuclidean {
    #[inline]
    fn distance(&self, a: &C, b: &C) -> f64 {
        self.distance_sq(a, b).sqrt()
    }

    #[inline]
    fn distance_sq(&self, a: &C, b: &C) -> f64 {
        let dx = a.x() - b.x();
        let dy = a.y() - b.y();
        dx * dx + dy * dy
    }
}

/// Adapts a closure into a [`Metric`].
///
/// ```
/// use ball_index::metric::{FnMetric, Metric};
///
/// let hamming = FnMetric::new(|a: &u64, b: &u64| (a ^ b).count_ones() as f64);
/// assert_eq!(hamming.distance(&0b1010, &0b0110), 2.0);
/// ```
#[derive(Clone, Copy)]
pub struct FnMetric<F>(F);

impl<F> FnMetric<F> {
    /// Wrap a distance closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for FnMetric<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnMetric")
    }
}

impl<T: ?Sized, F: Fn(&T, &T) -> f64> Metric<T> for FnMetric<F> {
    #[inline]
    fn distance(&self, a: &T, b: &T) -> f64 {
        (self.0)(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        let metric = Euclidean;
        let distance = metric.distance(&[0.0f64, 0.0], &[3.0, 4.0]);
        assert!((distance - 5.0).abs() < 1e-10);
        assert!((metric.distance_sq(&[0.0f64, 0.0], &[3.0, 4.0]) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_scalar_distance() {
        assert_eq!(Euclidean.distance(&6.0f64, &0.0), 6.0);
        assert_eq!(Euclidean.distance_sq(&1.0f32, &4.0), 9.0);
    }

    #[test]
    fn test_manhattan_and_chebyshev() {
        let a = vec![1.0f64, -2.0, 3.0];
        let b = vec![4.0f64, 2.0, 3.0];
        assert_eq!(Manhattan.distance(&a, &b), 7.0);
        assert_eq!(Chebyshev.distance(&a, &b), 4.0);
    }

    #[test]
    fn test_planar_euclidean() {
        let distance = PlanarEuclidean.distance(&(1.0, 1.0), &(4.0, 5.0));
        assert!((distance - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_default_distance_sq() {
        let metric = FnMetric::new(|a: &f64, b: &f64| (a - b).abs());
        assert_eq!(metric.distance_sq(&1.0, &4.0), 9.0);
    }

    #[test]
    fn test_metric_by_reference() {
        fn dist<M: Metric<f64>>(m: M) -> f64 {
            m.distance(&2.0, &5.0)
        }
        assert_eq!(dist(&Euclidean), 3.0);
    }
}
