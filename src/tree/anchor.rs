//! Where a node's bounding sphere is centered.
//!
//! Every query prunes with the distance from the query point to a node's *reference point*. A
//! [`PrimaryAnchor`] tree uses the node's primary object for that, so it only needs a
//! [`Metric`]. A [`CentroidAnchor`] tree stores the center of gravity of each subtree, which
//! usually gives smaller spheres but requires a [`VectorSpace`][crate::VectorSpace].

use crate::metric::Metric;

/// The reference-point strategy of a tree.
///
/// This trait is sealed: the tree construction for each anchor lives in this crate.
pub trait Anchor<T>: private::Sealed {
    /// Extra data stored in every node.
    type Center;

    /// The point a node's radius is measured from.
    fn reference<'n>(center: &'n Self::Center, primary: &'n T) -> &'n T;

    /// The distance from `primary` to `query`, given the already computed distance from the
    /// node's reference point to `query`.
    fn primary_distance<M: Metric<T>>(
        metric: &M,
        reference_distance: f64,
        primary: &T,
        query: &T,
    ) -> f64;
}

/// Spheres are centered on each node's primary object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimaryAnchor;

/// Spheres are centered on each subtree's centroid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CentroidAnchor;

impl<T> Anchor<T> for PrimaryAnchor {
    type Center = ();

    #[inline]
    fn reference<'n>(_center: &'n (), primary: &'n T) -> &'n T {
        primary
    }

    #[inline]
    fn primary_distance<M: Metric<T>>(
        _metric: &M,
        reference_distance: f64,
        _primary: &T,
        _query: &T,
    ) -> f64 {
        reference_distance
    }
}

impl<T> Anchor<T> for CentroidAnchor {
    type Center = T;

    #[inline]
    fn reference<'n>(center: &'n T, _primary: &'n T) -> &'n T {
        center
    }

    #[inline]
    fn primary_distance<M: Metric<T>>(
        metric: &M,
        _reference_distance: f64,
        primary: &T,
        query: &T,
    ) -> f64 {
        metric.distance(primary, query)
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for super::PrimaryAnchor {}
    impl Sealed for super::CentroidAnchor {}
}
