//! Structural self-checks for built trees.

use crate::error::{BallIndexError, Result};
use crate::metric::Metric;
use crate::tree::anchor::Anchor;
use crate::tree::index::Tree;

/// Relative slack allowed when comparing a distance against a stored radius.
const RADIUS_TOLERANCE: f64 = 1e-9;

impl<T, M: Metric<T>, A: Anchor<T>> Tree<'_, T, M, A> {
    /// Walk the whole tree and verify its invariants:
    ///
    /// - every object lies within the radius of each node above it,
    /// - every node's size equals the number of objects below it,
    /// - equivalents are at distance zero from their primary,
    /// - every indexed object is stored exactly once.
    ///
    /// This visits each object once per ancestor and is meant for tests and diagnostics.
    pub fn validate(&self) -> Result<()> {
        let built = self.built()?;
        let mut seen = vec![false; built.objects.len()];
        let mut slots = vec![];

        let Some(root) = built.root else {
            return if built.objects.is_empty() {
                Ok(())
            } else {
                Err(BallIndexError::InvariantViolation(format!(
                    "tree has no root but indexes {} objects",
                    built.objects.len()
                )))
            };
        };

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &built.arena[id];
            let primary = built.objects[node.primary].value();
            let reference = A::reference(&node.center, primary);

            for &slot in node.equivalents.iter() {
                let dist = self.metric.distance(primary, built.objects[slot].value());
                if dist != 0.0 {
                    return Err(BallIndexError::InvariantViolation(format!(
                        "equivalent {} is at distance {} from primary {}",
                        built.objects[slot].id(),
                        dist,
                        built.objects[node.primary].id()
                    )));
                }
            }

            slots.clear();
            built.arena.subtree_slots(id, &mut slots);
            if slots.len() != node.size {
                return Err(BallIndexError::InvariantViolation(format!(
                    "node of object {} has size {} but holds {} objects",
                    built.objects[node.primary].id(),
                    node.size,
                    slots.len()
                )));
            }

            let bound = node.radius * (1.0 + RADIUS_TOLERANCE) + f64::EPSILON;
            for &slot in &slots {
                let dist = self.metric.distance(reference, built.objects[slot].value());
                if dist > bound {
                    return Err(BallIndexError::InvariantViolation(format!(
                        "object {} is at distance {} from a node of radius {}",
                        built.objects[slot].id(),
                        dist,
                        node.radius
                    )));
                }
            }

            for slot in node.slots() {
                if std::mem::replace(&mut seen[slot], true) {
                    return Err(BallIndexError::InvariantViolation(format!(
                        "object {} is stored more than once",
                        built.objects[slot].id()
                    )));
                }
            }
            stack.extend(node.children());
        }

        if let Some(slot) = seen.iter().position(|&stored| !stored) {
            return Err(BallIndexError::InvariantViolation(format!(
                "object {} is not stored in the tree",
                built.objects[slot].id()
            )));
        }
        Ok(())
    }
}
