use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BallIndexError {
    /// A tree can only be built from a collection that has been sealed.
    #[error("Collection must be sealed before building an index")]
    NotSealed,

    /// The collection was already sealed and cannot accept new objects.
    #[error("Collection is sealed and cannot be modified")]
    Sealed,

    /// A query was issued before the tree was built.
    #[error("Tree has not been built")]
    NotBuilt,

    /// `build` was called on a tree that already holds an index.
    #[error("Tree is already built; call clear() before rebuilding")]
    AlreadyBuilt,

    /// The same object identity was submitted twice during a build.
    #[error("Object with id {id} was inserted twice")]
    DuplicateInsertion { id: u32 },

    /// The object belongs to a different collection than the one being indexed.
    #[error("Object with id {id} belongs to another collection")]
    ForeignObject { id: u32 },

    /// No object with this id is stored in the tree.
    #[error("Unknown object id {0}")]
    UnknownId(u32),

    /// A structural check in [`Tree::validate`][crate::Tree::validate] failed.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, BallIndexError>;
