//! Utilities to traverse the tree structure.

use crate::collection::DataObject;
use crate::tree::anchor::Anchor;
use crate::tree::node::{Arena, NodeId, TreeNode};

/// A read-only view onto one node of a built tree.
pub struct NodeRef<'t, 'a, T, A: Anchor<T>> {
    arena: &'t Arena<A::Center>,
    objects: &'a [DataObject<T>],
    id: NodeId,
}

// Derive would require `T: Clone` and `A: Clone`
impl<T, A: Anchor<T>> Clone for NodeRef<'_, '_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Anchor<T>> Copy for NodeRef<'_, '_, T, A> {}

impl<'t, 'a: 't, T, A: Anchor<T>> NodeRef<'t, 'a, T, A> {
    pub(crate) fn new(
        arena: &'t Arena<A::Center>,
        objects: &'a [DataObject<T>],
        id: NodeId,
    ) -> Self {
        Self { arena, objects, id }
    }

    #[inline]
    fn node(&self) -> &'t TreeNode<A::Center> {
        &self.arena[self.id]
    }

    fn child(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.arena, self.objects, id))
    }

    /// The object this node is built around.
    pub fn primary(&self) -> &'a DataObject<T> {
        &self.objects[self.node().primary]
    }

    /// Objects at distance zero from [`primary`][Self::primary], stored in the same node.
    pub fn equivalents(&self) -> impl Iterator<Item = &'a DataObject<T>> + 't {
        let objects = self.objects;
        self.node()
            .equivalents
            .iter()
            .map(move |&slot| &objects[slot])
    }

    /// The point that [`radius`][Self::radius] is measured from: the primary object's value, or
    /// the subtree centroid for a [`CenteredTree`][crate::CenteredTree].
    pub fn reference(&self) -> &'t T {
        let node = self.node();
        A::reference(&node.center, self.objects[node.primary].value())
    }

    /// Upper bound on the distance from [`reference`][Self::reference] to any object below this
    /// node.
    pub fn radius(&self) -> f64 {
        self.node().radius
    }

    /// The number of objects in this subtree.
    pub fn size(&self) -> usize {
        self.node().size
    }

    /// The longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        self.node().height
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// The left child.
    pub fn left(&self) -> Option<Self> {
        self.child(self.node().left)
    }

    /// The right child.
    pub fn right(&self) -> Option<Self> {
        self.child(self.node().right)
    }

    /// Both children, left first.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t, 'a, T, A>> {
        self.left().into_iter().chain(self.right())
    }

    /// Every object in this subtree, in depth-first order.
    pub fn objects(&self) -> Vec<&'a DataObject<T>> {
        let mut slots = vec![];
        self.arena.subtree_slots(self.id, &mut slots);
        slots.into_iter().map(|slot| &self.objects[slot]).collect()
    }
}

#[cfg(test)]
mod test {
    use crate::metric::Euclidean;
    use crate::{BallTree, CenteredTree, Collection};

    #[test]
    fn walks_the_example_tree() {
        let points = Collection::sealed_from([0.0, 3.0, 6.0]);
        let mut tree = BallTree::new(Euclidean);
        tree.build(&points).unwrap();

        let root = tree.root().unwrap().unwrap();
        assert_eq!(*root.primary().value(), 0.0);
        assert_eq!(*root.reference(), 0.0);
        assert_eq!(root.radius(), 6.0);
        assert_eq!(root.size(), 3);
        assert_eq!(root.height(), 1);

        let children: Vec<f64> = root.children().map(|c| *c.primary().value()).collect();
        assert_eq!(children, vec![3.0, 6.0]);
        assert!(root.left().unwrap().is_leaf());
        assert_eq!(root.objects().len(), 3);
    }

    #[test]
    fn centered_reference_is_the_centroid() {
        let points = Collection::sealed_from([[0.0_f64, 0.0], [4.0, 0.0], [2.0, 3.0]]);
        let mut tree = CenteredTree::new(Euclidean);
        tree.build(&points).unwrap();

        let root = tree.root().unwrap().unwrap();
        let [x, y] = *root.reference();
        assert!((x - 2.0).abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
        assert_eq!(*root.primary().value(), [0.0, 0.0]);
    }

    #[test]
    fn equivalents_are_listed_with_their_primary() {
        let points = Collection::sealed_from([1.0, 1.0, 1.0]);
        let mut tree = BallTree::new(Euclidean);
        tree.build(&points).unwrap();

        let root = tree.root().unwrap().unwrap();
        let ids: Vec<u32> = root.equivalents().map(|o| o.id()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(root.is_leaf());
        assert_eq!(root.size(), 3);
    }
}
