//! One-object-at-a-time construction for trees anchored on primary objects.
//!
//! Each object descends from the root towards whichever child's primary is nearer and becomes a
//! new leaf at the first free child slot. There is no rebalancing: the shape of the tree depends
//! on insertion order.

use crate::collection::DataObject;
use crate::metric::Metric;
use crate::tree::node::{Arena, NodeId, TreeNode};

/// A tree in the building phase.
pub(crate) struct NaiveBuilder<'a, 'm, T, M> {
    objects: &'a [DataObject<T>],
    metric: &'m M,
    arena: Arena<()>,
    root: Option<NodeId>,
    path: Vec<NodeId>,
}

impl<'a, 'm, T, M: Metric<T>> NaiveBuilder<'a, 'm, T, M> {
    pub(crate) fn new(objects: &'a [DataObject<T>], metric: &'m M) -> Self {
        Self {
            objects,
            metric,
            arena: Arena::with_capacity(objects.len()),
            root: None,
            path: vec![],
        }
    }

    #[inline]
    fn value(&self, slot: usize) -> &'a T {
        self.objects[slot].value()
    }

    #[inline]
    fn distance_to_primary(&self, slot: usize, node: NodeId) -> f64 {
        self.metric
            .distance(self.value(slot), self.value(self.arena[node].primary))
    }

    /// Insert the object at `slot`.
    pub(crate) fn insert(&mut self, slot: usize) {
        let Some(root) = self.root else {
            self.root = Some(self.arena.push(TreeNode::leaf(slot, ())));
            return;
        };

        self.path.clear();
        let mut current = root;
        let mut dist = self.distance_to_primary(slot, root);

        loop {
            let node = &mut self.arena[current];
            if dist == 0.0 {
                node.equivalents.push(slot);
                node.size += 1;
                break;
            }

            node.size += 1;
            node.radius = node.radius.max(dist);
            self.path.push(current);

            match (node.left, node.right) {
                (None, _) => {
                    let child = self.arena.push(TreeNode::leaf(slot, ()));
                    self.arena[current].left = Some(child);
                    break;
                }
                (Some(left), None) => {
                    // An object equal to the left primary must join it as an equivalent instead of
                    // opening the right slot.
                    let left_dist = self.distance_to_primary(slot, left);
                    if left_dist == 0.0 {
                        (current, dist) = (left, left_dist);
                        continue;
                    }
                    let child = self.arena.push(TreeNode::leaf(slot, ()));
                    self.arena[current].right = Some(child);
                    break;
                }
                (Some(left), Some(right)) => {
                    let left_dist = self.distance_to_primary(slot, left);
                    let right_dist = self.distance_to_primary(slot, right);
                    // Ties go left
                    (current, dist) = if left_dist <= right_dist {
                        (left, left_dist)
                    } else {
                        (right, right_dist)
                    };
                }
            }
        }

        for &id in self.path.iter().rev() {
            self.arena.refresh_height(id);
        }
    }

    /// Finish the building phase, returning the arena and its root.
    pub(crate) fn finish(self) -> (Arena<()>, Option<NodeId>) {
        (self.arena, self.root)
    }
}
