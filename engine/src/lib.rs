//! In-memory inverted-index search over a corpus of short documents.
//!
//! [`Index::build`] scans the corpus once, collecting the vocabulary, the
//! document-frequency table, the postings lists, and per-document TF-IDF
//! norms. [`Index::rank`] then scores free-text queries with either
//! vector-space cosine similarity or Okapi BM25, optionally expanding the
//! query with its own first-pass results (pseudo-relevance feedback).
//!
//! The index is immutable once built, so it can be shared freely across
//! threads for concurrent read-only querying.

pub mod document;
pub mod index;
pub mod score;
pub mod tokenizer;
mod topk;

pub use document::Document;
pub use index::{DocId, Index, Posting, RawDoc, SearchHit};
pub use score::{Bm25Params, RankingMethod, SearchOptions};
pub use tokenizer::{TermNormalizer, Tokenizer};
