//! Exact cosine-distance neighbor search over scaled nutrition vectors.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::recipe::NUTRITION_DIMENSION;

type Vector = [f64; NUTRITION_DIMENSION];

/// One search hit: position in the indexed subset and its cosine distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

#[derive(PartialEq)]
struct ScoredIndex {
    distance: f64,
    index: usize,
}

impl Eq for ScoredIndex {}

impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredIndex {
    // Max-heap on (distance, index): the worst kept hit sits on top and is
    // evicted first, so equal distances keep the lower index.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Brute-force index. Vectors are stored unit-normalised; a zero vector stays
/// zero and sits at distance 1 from everything.
#[derive(Debug, Clone)]
pub struct CosineIndex {
    vectors: Vec<Vector>,
}

impl CosineIndex {
    pub fn build<I: IntoIterator<Item = Vector>>(vectors: I) -> Self {
        Self {
            vectors: vectors.into_iter().map(|v| normalize(&v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The `k` nearest vectors, closest first. Ties keep index order.
    pub fn query(&self, query: &Vector, k: usize) -> Vec<Neighbor> {
        if k == 0 || self.vectors.is_empty() {
            return Vec::new();
        }
        let query = normalize(query);

        let mut heap = BinaryHeap::with_capacity(k + 1);
        for (index, vector) in self.vectors.iter().enumerate() {
            let distance = 1.0 - dot_product(vector, &query);
            heap.push(ScoredIndex { distance, index });
            if heap.len() > k {
                heap.pop();
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|si| Neighbor {
                index: si.index,
                distance: si.distance,
            })
            .collect()
    }
}

#[inline]
fn dot_product(a: &Vector, b: &Vector) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Unit-length copy of `vector`; the zero vector is returned unchanged.
pub fn normalize(vector: &Vector) -> Vector {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return [0.0; NUTRITION_DIMENSION];
    }
    let mut out = *vector;
    out.iter_mut().for_each(|x| *x /= norm);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f64, y: f64) -> Vector {
        let mut v = [0.0; NUTRITION_DIMENSION];
        v[0] = x;
        v[1] = y;
        v
    }

    #[test]
    fn test_query_orders_by_cosine_distance() {
        let index = CosineIndex::build([vec2(0.0, 1.0), vec2(1.0, 0.1), vec2(1.0, 1.0)]);
        let hits = index.query(&vec2(2.0, 0.0), 3);
        let order: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!((hits[2].distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_magnitude_is_ignored() {
        let index = CosineIndex::build([vec2(10.0, 10.0), vec2(1.0, 0.0)]);
        let hits = index.query(&vec2(0.5, 0.5), 1);
        assert_eq!(hits[0].index, 0);
        assert!(hits[0].distance.abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let same = vec2(1.0, 2.0);
        let index = CosineIndex::build([vec2(-1.0, 0.0), same, same, same]);
        let hits = index.query(&same, 2);
        let order: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = CosineIndex::build([vec2(1.0, 0.0)]);
        assert_eq!(index.query(&vec2(1.0, 0.0), 5).len(), 1);
        assert!(index.query(&vec2(1.0, 0.0), 0).is_empty());
    }

    #[test]
    fn test_zero_vector_is_distance_one() {
        let index = CosineIndex::build([[0.0; NUTRITION_DIMENSION]]);
        let hits = index.query(&vec2(1.0, 0.0), 1);
        assert_eq!(hits[0].distance, 1.0);
    }
}
