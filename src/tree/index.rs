use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use log::debug;

use crate::collection::{DataObject, SealedCollection};
use crate::error::{BallIndexError, Result};
use crate::metric::Metric;
use crate::tree::anchor::{Anchor, CentroidAnchor, PrimaryAnchor};
use crate::tree::centered::CentroidBuilder;
use crate::tree::insert::NaiveBuilder;
use crate::tree::node::{Arena, NodeId};
use crate::tree::traversal::NodeRef;
use crate::vector::VectorSpace;

/// A bounding-sphere tree whose nodes are centered on their primary objects.
///
/// Only a [`Metric`] is required on the data.
pub type BallTree<'a, T, M> = Tree<'a, T, M, PrimaryAnchor>;

/// A bounding-sphere tree whose nodes are centered on the centroid of their subtree.
///
/// The data must additionally form a [`VectorSpace`].
pub type CenteredTree<'a, T, M> = Tree<'a, T, M, CentroidAnchor>;

/// The lifecycle state of a [`Tree`].
///
/// A tree goes from `Empty` to `Built` in a single call to `build`. Construction happens on a
/// separate builder that only replaces the tree's contents once it has succeeded, so a failed
/// build leaves the tree `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    /// No index has been built, or it was cleared.
    Empty,
    /// The index is built and can be queried.
    Built,
}

/// The index produced by a successful build.
#[derive(Debug)]
pub(crate) struct Built<'a, T, S> {
    pub(crate) objects: &'a [DataObject<T>],
    pub(crate) arena: Arena<S>,
    pub(crate) root: Option<NodeId>,
    /// The node holding each object id, as primary or equivalent.
    pub(crate) node_of: HashMap<u32, NodeId>,
}

/// An immutable binary tree of bounding spheres over a sealed collection.
///
/// The tree borrows the collection it was built from; query results are references into it.
///
/// ```
/// use ball_index::metric::Euclidean;
/// use ball_index::{BallTree, Collection};
///
/// let points = Collection::sealed_from([0.0, 3.0, 6.0]);
/// let mut tree = BallTree::new(Euclidean);
/// tree.build(&points).unwrap();
///
/// let nearest: Vec<f64> = tree
///     .knn_query(&4.0, 2)
///     .unwrap()
///     .into_iter()
///     .map(|object| *object.value())
///     .collect();
/// assert_eq!(nearest, vec![3.0, 6.0]);
/// ```
#[derive(Debug)]
pub struct Tree<'a, T, M, A: Anchor<T> = PrimaryAnchor> {
    pub(crate) metric: M,
    pub(crate) built: Option<Built<'a, T, A::Center>>,
    phantom: PhantomData<A>,
}

impl<'a, T, M: Metric<T>, A: Anchor<T>> Tree<'a, T, M, A> {
    /// Create an empty, unbuilt tree that will measure distances with `metric`.
    pub fn new(metric: M) -> Self {
        Self {
            metric,
            built: None,
            phantom: PhantomData,
        }
    }

    /// The metric used by this tree.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// The current lifecycle state.
    pub fn state(&self) -> TreeState {
        if self.built.is_some() {
            TreeState::Built
        } else {
            TreeState::Empty
        }
    }

    /// Returns `true` if the tree has been built and can be queried.
    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// Drop the index, returning the tree to [`TreeState::Empty`] so that it can be built again.
    pub fn clear(&mut self) {
        self.built = None;
    }

    pub(crate) fn built(&self) -> Result<&Built<'a, T, A::Center>> {
        self.built.as_ref().ok_or(BallIndexError::NotBuilt)
    }

    /// The number of indexed objects.
    pub fn len(&self) -> Result<usize> {
        Ok(self.built()?.objects.len())
    }

    /// Returns `true` if the tree was built from an empty collection.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The number of nodes. Objects stored as equivalents share a node with their primary.
    pub fn node_count(&self) -> Result<usize> {
        Ok(self.built()?.arena.len())
    }

    /// The height of the root node, or `None` if the tree holds no objects.
    pub fn height(&self) -> Result<Option<usize>> {
        let built = self.built()?;
        Ok(built.root.map(|root| built.arena[root].height))
    }

    /// The root node, for manual traversal.
    pub fn root(&self) -> Result<Option<NodeRef<'_, 'a, T, A>>> {
        let built = self.built()?;
        Ok(built
            .root
            .map(|root| NodeRef::new(&built.arena, built.objects, root)))
    }

    /// The radius of the node that holds the object with id `id`.
    ///
    /// For an object stored as an equivalent this is the radius of its primary's node.
    pub fn radius_of(&self, id: u32) -> Result<f64> {
        let built = self.built()?;
        built
            .node_of
            .get(&id)
            .map(|&node| built.arena[node].radius)
            .ok_or(BallIndexError::UnknownId(id))
    }

    /// Check the preconditions of a build and return the objects to index.
    fn admit<C: SealedCollection<T>>(&self, collection: &'a C) -> Result<&'a [DataObject<T>]> {
        if self.built.is_some() {
            return Err(BallIndexError::AlreadyBuilt);
        }
        if !collection.is_sealed() {
            return Err(BallIndexError::NotSealed);
        }

        let objects = collection.objects();
        let collection_id = collection.collection_id();
        let mut seen = HashSet::with_capacity(objects.len());
        for object in objects {
            if object.collection() != collection_id {
                return Err(BallIndexError::ForeignObject { id: object.id() });
            }
            if !seen.insert(object.id()) {
                return Err(BallIndexError::DuplicateInsertion { id: object.id() });
            }
        }
        Ok(objects)
    }

    fn install(
        &mut self,
        objects: &'a [DataObject<T>],
        arena: Arena<A::Center>,
        root: Option<NodeId>,
    ) {
        let mut node_of = HashMap::with_capacity(objects.len());
        if let Some(root) = root {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                let node = &arena[id];
                for slot in node.slots() {
                    node_of.insert(objects[slot].id(), id);
                }
                stack.extend(node.children());
            }
        }

        debug!(
            "built tree over {} objects: {} nodes, height {:?}",
            objects.len(),
            arena.len(),
            root.map(|root| arena[root].height)
        );

        self.built = Some(Built {
            objects,
            arena,
            root,
            node_of,
        });
    }
}

impl<'a, T, M: Metric<T>> Tree<'a, T, M, PrimaryAnchor> {
    /// Build the index by inserting every object of `collection` once, in iteration order.
    ///
    /// Fails with [`BallIndexError::NotSealed`] if the collection is not sealed, with
    /// [`BallIndexError::AlreadyBuilt`] if the tree was already built, and with
    /// [`BallIndexError::DuplicateInsertion`] or [`BallIndexError::ForeignObject`] if the
    /// collection hands out the same object twice or objects it does not own. On failure the tree
    /// is left unchanged.
    pub fn build<C: SealedCollection<T>>(&mut self, collection: &'a C) -> Result<()> {
        let objects = self.admit(collection)?;
        debug!("building ball tree over {} objects", objects.len());

        let mut builder = NaiveBuilder::new(objects, &self.metric);
        for slot in 0..objects.len() {
            builder.insert(slot);
        }
        let (arena, root) = builder.finish();
        self.install(objects, arena, root);
        Ok(())
    }
}

impl<'a, T: VectorSpace, M: Metric<T>> Tree<'a, T, M, CentroidAnchor> {
    /// Build the index, computing the centroid and centroid-relative radius of every subtree.
    ///
    /// Fails under the same conditions as [`BallTree::build`].
    pub fn build<C: SealedCollection<T>>(&mut self, collection: &'a C) -> Result<()> {
        let objects = self.admit(collection)?;
        debug!("building centered tree over {} objects", objects.len());

        let (arena, root) = CentroidBuilder::new(objects, &self.metric).finish();
        self.install(objects, arena, root);
        Ok(())
    }
}
