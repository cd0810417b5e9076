//! Bounded top-K selection shared by both scorers.

use crate::index::DocId;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Extracts the `k` highest-scoring documents from a sparse score map.
///
/// Results are ordered by descending score; equal scores order by
/// ascending doc id, i.e. corpus arrival order. Fewer than `k` candidates
/// returns all of them.
pub(crate) fn top_k(scores: HashMap<DocId, f64>, k: usize) -> Vec<(DocId, f64)> {
    if k == 0 {
        return Vec::new();
    }
    // min-heap of size k: the weakest kept entry sits on top
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, Reverse<DocId>)>> =
        BinaryHeap::with_capacity(k + 1);
    for (doc, score) in scores {
        heap.push(Reverse((OrderedFloat(score), Reverse(doc))));
        if heap.len() > k {
            heap.pop();
        }
    }
    let mut ranked: Vec<(DocId, f64)> = heap
        .into_iter()
        .map(|Reverse((score, Reverse(doc)))| (doc, score.0))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
