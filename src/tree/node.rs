//! Arena storage for tree nodes.

use std::ops::{Index, IndexMut};

use tinyvec::TinyVec;

/// Position of a node in its [`Arena`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// One bounding sphere.
///
/// Objects are referred to by their position ("slot") in the indexed collection's object slice.
/// `center` holds the data the tree's anchor keeps per node: nothing for trees anchored on the
/// primary object, the subtree centroid for centered trees.
#[derive(Debug, Clone)]
pub(crate) struct TreeNode<S> {
    pub(crate) primary: usize,
    pub(crate) center: S,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    /// Upper bound on the distance from the reference point to every object in the subtree.
    pub(crate) radius: f64,
    /// Number of objects in the subtree, including `primary` and `equivalents`.
    pub(crate) size: usize,
    /// Longest downward path to a leaf. Leaves have height 0.
    pub(crate) height: usize,
    /// Objects at distance exactly 0 from `primary`.
    pub(crate) equivalents: TinyVec<[usize; 2]>,
}

impl<S> TreeNode<S> {
    pub(crate) fn leaf(primary: usize, center: S) -> Self {
        Self {
            primary,
            center,
            left: None,
            right: None,
            radius: 0.0,
            size: 1,
            height: 0,
            equivalents: TinyVec::new(),
        }
    }

    #[inline]
    pub(crate) fn children(&self) -> impl Iterator<Item = NodeId> {
        self.left.into_iter().chain(self.right)
    }

    /// The primary slot followed by every equivalent slot.
    #[inline]
    pub(crate) fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.primary).chain(self.equivalents.iter().copied())
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Append-only node storage. Children always have a larger id than their parent.
#[derive(Debug, Clone)]
pub(crate) struct Arena<S> {
    nodes: Vec<TreeNode<S>>,
}

impl<S> Arena<S> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, node: TreeNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Recompute `height` of `id` from its children.
    pub(crate) fn refresh_height(&mut self, id: NodeId) {
        let node = &self[id];
        let height = node
            .children()
            .map(|child| self[child].height + 1)
            .max()
            .unwrap_or(0);
        self[id].height = height;
    }

    /// Recompute every height, visiting children before parents.
    pub(crate) fn refresh_all_heights(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            self.refresh_height(NodeId(i));
        }
    }

    /// Every object slot stored in the subtree below `id`, in depth-first order.
    pub(crate) fn subtree_slots(&self, id: NodeId, out: &mut Vec<usize>) {
        let mut stack: TinyVec<[NodeId; 32]> = TinyVec::new();
        stack.push(id);
        while let Some(id) = stack.pop() {
            let node = &self[id];
            out.extend(node.slots());
            stack.extend(node.children());
        }
    }
}

impl<S> Index<NodeId> for Arena<S> {
    type Output = TreeNode<S>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<S> IndexMut<NodeId> for Arena<S> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn heights_follow_children() {
        let mut arena = Arena::with_capacity(3);
        let root = arena.push(TreeNode::leaf(0, ()));
        let left = arena.push(TreeNode::leaf(1, ()));
        let grandchild = arena.push(TreeNode::leaf(2, ()));
        arena[root].left = Some(left);
        arena[left].right = Some(grandchild);
        arena.refresh_all_heights();

        assert_eq!(arena[root].height, 2);
        assert_eq!(arena[left].height, 1);
        assert!(arena[grandchild].is_leaf());

        let mut slots = vec![];
        arena.subtree_slots(root, &mut slots);
        slots.sort();
        assert_eq!(slots, vec![0, 1, 2]);
    }
}
