//! Parallel batches of read-only queries.

use rayon::prelude::*;

use crate::collection::DataObject;
use crate::error::Result;
use crate::metric::Metric;
use crate::tree::anchor::Anchor;
use crate::tree::index::Tree;

impl<'a, T, M, A> Tree<'a, T, M, A>
where
    T: Sync,
    M: Metric<T> + Sync,
    A: Anchor<T> + Sync,
    A::Center: Sync,
{
    /// Run [`sphere_query`][Self::sphere_query] for every center on the rayon thread pool.
    ///
    /// Results are returned in the order of `centers`.
    pub fn par_sphere_query_batch(
        &self,
        centers: &[T],
        radius: f64,
    ) -> Result<Vec<Vec<&'a DataObject<T>>>> {
        self.built()?;
        centers
            .par_iter()
            .map(|center| self.sphere_query(center, radius))
            .collect()
    }

    /// Run [`knn_query`][Self::knn_query] for every query point on the rayon thread pool.
    ///
    /// Results are returned in the order of `queries`.
    pub fn par_knn_query_batch(
        &self,
        queries: &[T],
        k: usize,
    ) -> Result<Vec<Vec<&'a DataObject<T>>>> {
        self.built()?;
        queries
            .par_iter()
            .map(|query| self.knn_query(query, k))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use crate::metric::Euclidean;
    use crate::{BallIndexError, BallTree, Collection};

    #[test]
    fn batch_matches_single_queries() {
        let points = Collection::sealed_from((0..50).map(|i| [i as f64, (i % 7) as f64]));
        let mut tree = BallTree::new(Euclidean);
        tree.build(&points).unwrap();

        let queries: Vec<[f64; 2]> = (0..20).map(|i| [i as f64 * 2.5, 3.0]).collect();
        let batch = tree.par_knn_query_batch(&queries, 4).unwrap();
        for (query, result) in queries.iter().zip(&batch) {
            assert_eq!(result, &tree.knn_query(query, 4).unwrap());
        }

        let spheres = tree.par_sphere_query_batch(&queries, 2.0).unwrap();
        for (query, result) in queries.iter().zip(&spheres) {
            assert_eq!(result, &tree.sphere_query(query, 2.0).unwrap());
        }
    }

    #[test]
    fn batch_requires_a_built_tree() {
        let tree: BallTree<f64, _> = BallTree::new(Euclidean);
        assert_eq!(
            tree.par_knn_query_batch(&[1.0], 1),
            Err(BallIndexError::NotBuilt)
        );
    }
}
