//! Bulk construction for trees whose spheres are centered on subtree centroids.
//!
//! A centroid is only known once every member of a subtree is, so each node is created from the
//! full list of objects that end up below it. The list is split into two buckets by nearest seed,
//! the members are summed into the centroid, and each non-empty bucket becomes a child.

use log::trace;

use crate::collection::DataObject;
use crate::metric::Metric;
use crate::tree::node::{Arena, NodeId, TreeNode};
use crate::vector::VectorSpace;

enum Link {
    Root,
    Left(NodeId),
    Right(NodeId),
}

struct Split<T> {
    node: TreeNode<T>,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// A tree in the building phase.
pub(crate) struct CentroidBuilder<'a, 'm, T, M> {
    objects: &'a [DataObject<T>],
    metric: &'m M,
}

impl<'a, 'm, T: VectorSpace, M: Metric<T>> CentroidBuilder<'a, 'm, T, M> {
    pub(crate) fn new(objects: &'a [DataObject<T>], metric: &'m M) -> Self {
        Self { objects, metric }
    }

    #[inline]
    fn value(&self, slot: usize) -> &'a T {
        self.objects[slot].value()
    }

    /// Build the whole tree, returning the arena and its root.
    pub(crate) fn finish(self) -> (Arena<T>, Option<NodeId>) {
        let mut arena = Arena::with_capacity(self.objects.len());
        if self.objects.is_empty() {
            return (arena, None);
        }

        let mut stack = vec![(Link::Root, (0..self.objects.len()).collect::<Vec<_>>())];
        let mut root = None;

        while let Some((link, members)) = stack.pop() {
            let Split { node, left, right } = self.split(&members);
            trace!(
                "centroid node with {} objects, radius {}",
                node.size,
                node.radius
            );
            let id = arena.push(node);
            match link {
                Link::Root => root = Some(id),
                Link::Left(parent) => arena[parent].left = Some(id),
                Link::Right(parent) => arena[parent].right = Some(id),
            }
            if !right.is_empty() {
                stack.push((Link::Right(id), right));
            }
            if !left.is_empty() {
                stack.push((Link::Left(id), left));
            }
        }

        arena.refresh_all_heights();
        (arena, root)
    }

    /// Create the node for `members`, whose first entry is the node's primary object.
    fn split(&self, members: &[usize]) -> Split<T> {
        debug_assert!(!members.is_empty());
        let primary = members[0];
        let primary_value = self.value(primary);

        let mut left: Vec<usize> = vec![];
        let mut right: Vec<usize> = vec![];
        let mut sum = primary_value.clone();
        let mut node = TreeNode::leaf(primary, primary_value.zero_like());

        for &slot in &members[1..] {
            let value = self.value(slot);
            sum.add_assign(value);

            if self.metric.distance(primary_value, value) == 0.0 {
                node.equivalents.push(slot);
                continue;
            }

            match (left.first(), right.first()) {
                (None, _) => left.push(slot),
                (Some(&left_seed), None) => {
                    // Objects equal to the left seed stay with it so that it can hold them as
                    // equivalents.
                    if self.metric.distance(value, self.value(left_seed)) == 0.0 {
                        left.push(slot);
                    } else {
                        right.push(slot);
                    }
                }
                (Some(&left_seed), Some(&right_seed)) => {
                    let left_dist = self.metric.distance(value, self.value(left_seed));
                    let right_dist = self.metric.distance(value, self.value(right_seed));
                    // Ties go left
                    if left_dist <= right_dist {
                        left.push(slot);
                    } else {
                        right.push(slot);
                    }
                }
            }
        }

        sum.scale(1.0 / members.len() as f64);
        node.radius = members
            .iter()
            .map(|&slot| self.metric.distance(&sum, self.value(slot)))
            .fold(0.0, f64::max);
        node.size = members.len();
        node.center = sum;

        Split { node, left, right }
    }
}

#[cfg(test)]
mod test {
    use super::CentroidBuilder;
    use crate::collection::{Collection, SealedCollection};
    use crate::metric::Euclidean;

    #[test]
    fn root_is_centered_on_the_mean() {
        let collection = Collection::sealed_from([0.0f64, 3.0, 6.0]);
        let (arena, root) = CentroidBuilder::new(collection.objects(), &Euclidean).finish();
        let root = &arena[root.unwrap()];

        assert_eq!(root.primary, 0);
        assert!((root.center - 3.0).abs() < 1e-12);
        assert!((root.radius - 3.0).abs() < 1e-12);
        assert_eq!(root.size, 3);
        assert_eq!(root.height, 1);

        let left = &arena[root.left.unwrap()];
        let right = &arena[root.right.unwrap()];
        assert_eq!((left.primary, right.primary), (1, 2));
        assert_eq!(left.center, 3.0);
        assert_eq!(right.radius, 0.0);
    }

    #[test]
    fn buckets_follow_nearest_seed() {
        let collection = Collection::sealed_from([
            [0.0f64, 0.0],
            [-1.0, 0.0],
            [1.0, 0.0],
            [-2.0, 0.0],
            [2.0, 0.0],
        ]);
        let (arena, root) = CentroidBuilder::new(collection.objects(), &Euclidean).finish();
        let root = &arena[root.unwrap()];
        let left = &arena[root.left.unwrap()];
        let right = &arena[root.right.unwrap()];

        assert_eq!(root.center, [0.0, 0.0]);
        assert_eq!(left.size, 2);
        assert_eq!(left.center, [-1.5, 0.0]);
        assert_eq!(right.center, [1.5, 0.0]);
        assert_eq!(arena.len(), 5);
    }

    #[test]
    fn duplicates_join_their_primary() {
        let collection = Collection::sealed_from([2.0f64, 2.0, 5.0, 5.0]);
        let (arena, root) = CentroidBuilder::new(collection.objects(), &Euclidean).finish();
        let root = &arena[root.unwrap()];
        assert_eq!(root.equivalents.as_slice(), &[1]);
        assert!(root.right.is_none());

        let left = &arena[root.left.unwrap()];
        assert_eq!(left.equivalents.as_slice(), &[3]);
        assert_eq!(left.radius, 0.0);
        assert_eq!(left.size, 2);
    }

    #[test]
    fn empty_collection_has_no_root() {
        let collection = Collection::<f64>::sealed_from([]);
        let (arena, root) = CentroidBuilder::new(collection.objects(), &Euclidean).finish();
        assert!(root.is_none());
        assert_eq!(arena.len(), 0);
    }
}
