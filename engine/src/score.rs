//! The two ranking strategies: vector-space cosine similarity with TF-IDF
//! weights, and Okapi BM25. Both accumulate scores sparsely over the
//! postings of the query's terms; documents sharing no term with the query
//! are never considered.

use crate::index::{DocId, Index};
use std::collections::HashMap;

/// BM25 tuning parameters: `k1` controls term-frequency saturation, `b`
/// the strength of document-length normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    // chosen by grid search on the development corpus
    fn default() -> Self {
        Self { k1: 0.3, b: 0.5 }
    }
}

/// Which scoring model [`Index::rank`](crate::Index::rank) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMethod {
    Cosine,
    Bm25,
}

/// Ranking configuration for one `rank` call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub method: RankingMethod,
    pub bm25: Bm25Params,
    /// Run one pseudo-relevance-feedback pass before the final ranking.
    pub expand: bool,
    /// First-pass result count used when `expand` is set.
    pub feedback_depth: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            method: RankingMethod::Bm25,
            bm25: Bm25Params::default(),
            expand: false,
            feedback_depth: 10,
        }
    }
}

/// Distinct query terms with their frequencies, sorted so repeated runs
/// accumulate scores in the same order, plus the maximum frequency.
fn query_freqs(terms: &[String]) -> (Vec<(&str, u32)>, u32) {
    let mut freqs: HashMap<&str, u32> = HashMap::new();
    for term in terms {
        *freqs.entry(term.as_str()).or_insert(0) += 1;
    }
    let max_freq = freqs.values().copied().max().unwrap_or(0);
    let mut freqs: Vec<(&str, u32)> = freqs.into_iter().collect();
    freqs.sort_unstable();
    (freqs, max_freq)
}

/// Cosine similarity between the query and each candidate document, with
/// augmented query term weighting.
pub(crate) fn cosine(index: &Index, query: &str) -> HashMap<DocId, f64> {
    let terms = index.normalize(query);
    let (freqs, max_freq) = query_freqs(&terms);
    let n = index.num_docs() as f64;

    let mut dot: HashMap<DocId, f64> = HashMap::new();
    let mut query_norm = 0.0;

    for &(term, tf_q) in &freqs {
        let postings = match index.postings(term) {
            Some(p) => p,
            None => continue,
        };
        let df = index.document_frequency(term) as f64;
        let idf = (n / df).log10();
        // augmented term frequency dampens repeated query terms
        let w_tq = (0.5 + 0.5 * tf_q as f64 / max_freq as f64) * idf;
        query_norm += w_tq * w_tq;
        for posting in postings {
            let w_td = (1.0 + (posting.tf as f64).log10()) * idf;
            *dot.entry(posting.doc).or_insert(0.0) += w_td * w_tq;
        }
    }

    let query_norm = nonzero(query_norm.sqrt());
    dot.into_iter()
        .map(|(doc, sum)| {
            let doc_norm = nonzero(index.document(doc).norm());
            (doc, sum / (doc_norm * query_norm))
        })
        .collect()
}

/// Okapi BM25: additive per-term weights, no norm division.
pub(crate) fn bm25(index: &Index, query: &str, params: &Bm25Params) -> HashMap<DocId, f64> {
    let terms = index.normalize(query);
    // max frequency is unused by the BM25 weight itself
    let (freqs, _) = query_freqs(&terms);
    let n = index.num_docs() as f64;
    let avgdl = index.avg_doc_len();
    let Bm25Params { k1, b } = *params;

    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for &(term, _) in &freqs {
        let postings = match index.postings(term) {
            Some(p) => p,
            None => continue,
        };
        let df = index.document_frequency(term) as f64;
        let w_tq = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
        for posting in postings {
            let tf = posting.tf as f64;
            let dl = index.document(posting.doc).len() as f64;
            let w_td = ((1.0 + k1) * tf) / (tf + k1 * (1.0 - b + b * dl / avgdl));
            *scores.entry(posting.doc).or_insert(0.0) += w_td * w_tq;
        }
    }
    scores
}

// A zero norm means every matched term had idf 0; dividing by 1 keeps the
// score at 0 instead of producing NaN.
fn nonzero(norm: f64) -> f64 {
    if norm == 0.0 {
        1.0
    } else {
        norm
    }
}
