//! Sphere and k-nearest-neighbor search, shared by every anchor.

use tinyvec::TinyVec;

use crate::collection::DataObject;
use crate::error::Result;
use crate::heap::KnnHeap;
use crate::metric::Metric;
use crate::tree::anchor::Anchor;
use crate::tree::index::{Built, Tree};
use crate::tree::node::NodeId;

/// An object returned from a nearest-neighbor search, with its distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, T> {
    /// The indexed object.
    pub object: &'a DataObject<T>,
    /// Its distance to the query point.
    pub distance: f64,
}

impl<'a, T, M: Metric<T>, A: Anchor<T>> Tree<'a, T, M, A> {
    #[inline]
    fn reference_distance(&self, built: &Built<'a, T, A::Center>, id: NodeId, query: &T) -> f64 {
        let node = &built.arena[id];
        let primary = built.objects[node.primary].value();
        self.metric
            .distance(A::reference(&node.center, primary), query)
    }

    /// Search the tree for every object within `radius` of `center`, boundary included.
    ///
    /// The order of the results is unspecified.
    ///
    /// ```
    /// use ball_index::metric::Euclidean;
    /// use ball_index::{BallTree, Collection};
    ///
    /// let points = Collection::sealed_from([0.0, 3.0, 6.0]);
    /// let mut tree = BallTree::new(Euclidean);
    /// tree.build(&points).unwrap();
    ///
    /// let found = tree.sphere_query(&3.0, 1.0).unwrap();
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(*found[0].value(), 3.0);
    /// ```
    pub fn sphere_query(&self, center: &T, radius: f64) -> Result<Vec<&'a DataObject<T>>> {
        let built = self.built()?;
        let mut result = vec![];
        let Some(root) = built.root else {
            return Ok(result);
        };

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[NodeId; 32]> = TinyVec::new();
        stack.push(root);
        let mut contained = vec![];

        while let Some(id) = stack.pop() {
            let node = &built.arena[id];
            let primary = built.objects[node.primary].value();
            let dist = self
                .metric
                .distance(A::reference(&node.center, primary), center);

            // the query sphere misses this subtree
            if dist > radius + node.radius {
                continue;
            }

            // the query sphere swallows this subtree
            if dist + node.radius <= radius {
                contained.clear();
                built.arena.subtree_slots(id, &mut contained);
                result.extend(contained.iter().map(|&slot| &built.objects[slot]));
                continue;
            }

            if A::primary_distance(&self.metric, dist, primary, center) <= radius {
                result.extend(node.slots().map(|slot| &built.objects[slot]));
            }
            stack.extend(node.children());
        }

        Ok(result)
    }

    /// Search the tree for the `k` objects nearest to `query`, in ascending distance.
    ///
    /// Fewer than `k` objects are returned only if the tree holds fewer than `k` objects.
    pub fn knn_query(&self, query: &T, k: usize) -> Result<Vec<&'a DataObject<T>>> {
        Ok(self
            .knn_query_with_distances(query, k)?
            .into_iter()
            .map(|neighbor| neighbor.object)
            .collect())
    }

    /// Like [`knn_query`][Self::knn_query], but also returns each object's distance to `query`.
    ///
    /// ```
    /// use ball_index::metric::Euclidean;
    /// use ball_index::{BallTree, Collection};
    ///
    /// let points = Collection::sealed_from([0.0, 3.0, 6.0]);
    /// let mut tree = BallTree::new(Euclidean);
    /// tree.build(&points).unwrap();
    ///
    /// let distances: Vec<f64> = tree
    ///     .knn_query_with_distances(&4.0, 5)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|neighbor| neighbor.distance)
    ///     .collect();
    /// assert_eq!(distances, vec![1.0, 2.0, 4.0]);
    /// ```
    pub fn knn_query_with_distances(&self, query: &T, k: usize) -> Result<Vec<Neighbor<'a, T>>> {
        let built = self.built()?;
        let Some(root) = built.root else {
            return Ok(vec![]);
        };
        if k == 0 {
            return Ok(vec![]);
        }

        // no more than every stored object can be returned
        let mut heap = KnnHeap::new(k.min(built.objects.len()));

        // Each entry carries the distance from the query to the node's reference point. Children
        // are pushed farther first so that the nearer one is explored first.
        let mut stack: TinyVec<[(NodeId, f64); 32]> = TinyVec::new();
        stack.push((root, self.reference_distance(built, root, query)));

        while let Some((id, dist)) = stack.pop() {
            let node = &built.arena[id];

            // prune if nothing in this subtree can beat the current worst kept object
            if dist - node.radius >= heap.worst() {
                continue;
            }

            let primary = built.objects[node.primary].value();
            let primary_dist = A::primary_distance(&self.metric, dist, primary, query);
            if heap.offer(node.primary, primary_dist) {
                for &slot in node.equivalents.iter() {
                    if !heap.offer(slot, primary_dist) {
                        break;
                    }
                }
            }

            let left = node
                .left
                .map(|child| (child, self.reference_distance(built, child, query)));
            let right = node
                .right
                .map(|child| (child, self.reference_distance(built, child, query)));

            let (near, far) = match (left, right) {
                (Some(left), Some(right)) if right.1 < left.1 => (Some(right), Some(left)),
                (left, right) => (left, right),
            };
            for (child, child_dist) in [far, near].into_iter().flatten() {
                if child_dist - built.arena[child].radius < heap.worst() {
                    stack.push((child, child_dist));
                }
            }
        }

        Ok(heap
            .into_sorted()
            .into_iter()
            .map(|(slot, distance)| Neighbor {
                object: &built.objects[slot],
                distance,
            })
            .collect())
    }
}

#[cfg(test)]
mod test {
    use crate::metric::Euclidean;
    use crate::tree::{BallTree, CenteredTree};
    use crate::{BallIndexError, Collection};

    fn values<T: Copy>(objects: Vec<&crate::DataObject<T>>) -> Vec<T> {
        objects.into_iter().map(|object| *object.value()).collect()
    }

    #[test]
    fn knn_returns_ascending_distances() {
        let points = Collection::sealed_from([0.0, 3.0, 6.0]);
        let mut tree = BallTree::new(Euclidean);
        tree.build(&points).unwrap();

        assert_eq!(values(tree.knn_query(&4.0, 2).unwrap()), vec![3.0, 6.0]);
        assert_eq!(values(tree.knn_query(&1.0, 5).unwrap()), vec![0.0, 3.0, 6.0]);
        assert!(tree.knn_query(&1.0, 0).unwrap().is_empty());
    }

    #[test]
    fn sphere_query_boundary_is_inclusive() {
        let points = Collection::sealed_from([0.0, 3.0, 6.0]);
        let mut tree = BallTree::new(Euclidean);
        tree.build(&points).unwrap();

        let mut found = values(tree.sphere_query(&3.0, 3.0).unwrap());
        found.sort_by(f64::total_cmp);
        assert_eq!(found, vec![0.0, 3.0, 6.0]);
        assert!(tree.sphere_query(&100.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn centered_tree_answers_the_same_queries() {
        let points = Collection::sealed_from([0.0, 3.0, 6.0]);
        let mut tree = CenteredTree::new(Euclidean);
        tree.build(&points).unwrap();

        assert_eq!(values(tree.sphere_query(&3.0, 1.0).unwrap()), vec![3.0]);
        assert_eq!(values(tree.knn_query(&4.0, 2).unwrap()), vec![3.0, 6.0]);
        assert_eq!(values(tree.knn_query(&1.0, 5).unwrap()), vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn queries_require_a_built_tree() {
        let tree: BallTree<f64, _> = BallTree::new(Euclidean);
        assert_eq!(tree.sphere_query(&0.0, 1.0), Err(BallIndexError::NotBuilt));
        assert_eq!(tree.knn_query(&0.0, 1), Err(BallIndexError::NotBuilt));
    }

    #[test]
    fn empty_tree_returns_nothing() {
        let points = Collection::<f64>::sealed_from([]);
        let mut tree = BallTree::new(Euclidean);
        tree.build(&points).unwrap();
        assert!(tree.sphere_query(&0.0, 10.0).unwrap().is_empty());
        assert!(tree.knn_query(&0.0, 3).unwrap().is_empty());
    }
}
