//! Sealed, id-carrying collections of data objects that a tree can be built from.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{BallIndexError, Result};

static NEXT_COLLECTION_ID: AtomicU64 = AtomicU64::new(0);

/// An opaque token naming the collection that owns a [`DataObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(u64);

impl CollectionId {
    /// Allocate a token that no other collection in this process shares.
    pub fn fresh() -> Self {
        Self(NEXT_COLLECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A payload together with the stable id it was assigned on insertion, and a back-reference to
/// the collection that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataObject<T> {
    id: u32,
    collection: CollectionId,
    value: T,
}

impl<T> DataObject<T> {
    /// Create an object owned by `collection`.
    ///
    /// Collections implementing [`SealedCollection`] must hand out each id at most once.
    pub fn new(id: u32, collection: CollectionId, value: T) -> Self {
        Self {
            id,
            collection,
            value,
        }
    }

    /// The id assigned at insertion.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The collection that owns this object.
    #[inline]
    pub fn collection(&self) -> CollectionId {
        self.collection
    }

    /// The payload.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// An order-stable collection of uniquely identified data objects.
///
/// A tree is built by iterating [`objects`][SealedCollection::objects] once, in order. The
/// collection must report [`is_sealed`][SealedCollection::is_sealed] before that happens.
pub trait SealedCollection<T> {
    /// Token matching the [`DataObject::collection`] of every object in this collection.
    fn collection_id(&self) -> CollectionId;

    /// All objects, in insertion order.
    fn objects(&self) -> &[DataObject<T>];

    /// Whether the collection is locked against further mutation.
    fn is_sealed(&self) -> bool;

    /// The number of objects.
    fn len(&self) -> usize {
        self.objects().len()
    }

    /// Returns `true` if there are no objects.
    fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }
}

/// The stock [`SealedCollection`]: objects are pushed one by one, then the collection is sealed.
///
/// ```
/// use ball_index::{Collection, SealedCollection};
///
/// let mut points = Collection::new();
/// let a = points.push(0.0).unwrap();
/// let b = points.push(3.0).unwrap();
/// points.seal();
///
/// assert_eq!((a, b), (0, 1));
/// assert!(points.is_sealed());
/// assert!(points.push(6.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Collection<T> {
    id: CollectionId,
    objects: Vec<DataObject<T>>,
    sealed: bool,
}

impl<T> Collection<T> {
    /// Create an empty, unsealed collection.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty, unsealed collection with room for `capacity` objects.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: CollectionId::fresh(),
            objects: Vec::with_capacity(capacity),
            sealed: false,
        }
    }

    /// Collect `values` into a collection and seal it.
    pub fn sealed_from(values: impl IntoIterator<Item = T>) -> Self {
        let mut collection: Self = values.into_iter().collect();
        collection.seal();
        collection
    }

    /// Append a value, returning its id.
    ///
    /// Ids are assigned sequentially from 0 in insertion order.
    pub fn push(&mut self, value: T) -> Result<u32> {
        if self.sealed {
            return Err(BallIndexError::Sealed);
        }
        let id = self.next_id();
        self.objects.push(DataObject::new(id, self.id, value));
        Ok(id)
    }

    /// Lock the collection. Sealing is permanent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Look up an object by id.
    pub fn get(&self, id: u32) -> Option<&DataObject<T>> {
        // Ids are positions because they are assigned sequentially and never removed.
        self.objects.get(id as usize)
    }

    /// Iterate over all objects in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataObject<T>> {
        self.objects.iter()
    }

    fn next_id(&self) -> u32 {
        assert!(
            self.objects.len() < u32::MAX as usize,
            "Collection cannot hold more than {} objects",
            u32::MAX
        );
        self.objects.len() as u32
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut collection = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            let id = collection.next_id();
            collection
                .objects
                .push(DataObject::new(id, collection.id, value));
        }
        collection
    }
}

impl<T> SealedCollection<T> for Collection<T> {
    fn collection_id(&self) -> CollectionId {
        self.id
    }

    fn objects(&self) -> &[DataObject<T>] {
        &self.objects
    }

    fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn len(&self) -> usize {
        self.objects.len()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a DataObject<T>;
    type IntoIter = std::slice::Iter<'a, DataObject<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_follow_insertion_order() {
        let collection = Collection::sealed_from([10.0, 20.0, 30.0]);
        let ids: Vec<u32> = collection.iter().map(DataObject::id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(collection.get(1).map(|o| *o.value()), Some(20.0));
        assert!(collection.is_sealed());
    }

    #[test]
    fn collections_have_distinct_tokens() {
        let a = Collection::<f64>::new();
        let b = Collection::<f64>::new();
        assert_ne!(a.collection_id(), b.collection_id());
    }

    #[test]
    fn sealed_collection_rejects_push() {
        let mut collection = Collection::new();
        collection.push(1u8).unwrap();
        collection.seal();
        assert_eq!(collection.push(2u8), Err(BallIndexError::Sealed));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn collected_collection_is_unsealed() {
        let collection: Collection<f64> = (0..4).map(f64::from).collect();
        assert!(!collection.is_sealed());
        assert!(collection
            .iter()
            .all(|o| o.collection() == collection.collection_id()));
    }
}
