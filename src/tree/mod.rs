//! Immutable bounding-sphere trees over sealed collections.
//!
//! A [`Tree`] is built once from a [`SealedCollection`][crate::SealedCollection] and answers
//! sphere queries ([`Tree::sphere_query`]) and k-nearest-neighbor queries
//! ([`Tree::knn_query`]) afterwards. Two flavors exist:
//!
//! - [`BallTree`] inserts objects one at a time and centers every node on its primary object. It
//!   works with any [`Metric`][crate::Metric].
//! - [`CenteredTree`] is built in bulk and centers every node on its subtree's centroid, which
//!   requires a [`VectorSpace`][crate::VectorSpace].

#![warn(missing_docs)]

mod anchor;
#[cfg(feature = "rayon")]
mod batch;
mod centered;
mod index;
mod insert;
pub(crate) mod node;
mod query;
mod traversal;
mod validate;

pub use anchor::{Anchor, CentroidAnchor, PrimaryAnchor};
pub use index::{BallTree, CenteredTree, Tree, TreeState};
pub use query::Neighbor;
pub use traversal::NodeRef;
