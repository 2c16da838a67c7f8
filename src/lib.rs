#![doc = include_str!("../README.md")]

pub mod collection;
mod error;
mod heap;
pub mod metric;
pub mod tree;
pub mod vector;

pub use collection::{Collection, CollectionId, DataObject, SealedCollection};
pub use error::{BallIndexError, Result};
pub use metric::Metric;
pub use tree::{BallTree, CenteredTree, Neighbor, Tree, TreeState};
pub use vector::VectorSpace;
