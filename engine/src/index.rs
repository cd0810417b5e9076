use crate::document::Document;
use crate::score::{self, RankingMethod, SearchOptions};
use crate::tokenizer::TermNormalizer;
use crate::topk;
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};

/// Internal document id, assigned in corpus arrival order.
pub type DocId = u32;

/// A raw corpus record: external document id plus untokenized text.
#[derive(Debug, Clone)]
pub struct RawDoc {
    pub id: String,
    pub text: String,
}

/// One entry in a term's postings list: the containing document and the
/// term's in-document frequency.
#[derive(Debug, Clone, Copy)]
pub struct Posting {
    pub doc: DocId,
    pub tf: u32,
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f64,
}

/// Immutable inverted index over a corpus of short documents.
///
/// Built in a single pass by [`Index::build`]; nothing mutates it
/// afterwards, so concurrent read-only querying needs no locking. The
/// document store is the sole owner of [`Document`]s; postings refer to
/// them by [`DocId`] only.
pub struct Index {
    normalizer: Box<dyn TermNormalizer>,
    docs: Vec<Document>,
    doc_ids: HashMap<String, DocId>,
    vocabulary: HashSet<String>,
    document_frequency: HashMap<String, u32>,
    postings: HashMap<String, Vec<Posting>>,
    num_docs: u32,
    avg_doc_len: f64,
}

impl Index {
    /// Builds the index from an ordered stream of corpus records.
    ///
    /// A record error (malformed line, I/O failure) aborts the build. A
    /// duplicate document id is rejected rather than overwriting the
    /// earlier document, since postings already point at it.
    pub fn build<I>(corpus: I, normalizer: Box<dyn TermNormalizer>) -> Result<Self>
    where
        I: IntoIterator<Item = Result<RawDoc>>,
    {
        let mut docs: Vec<Document> = Vec::new();
        let mut doc_ids: HashMap<String, DocId> = HashMap::new();
        let mut vocabulary: HashSet<String> = HashSet::new();
        let mut document_frequency: HashMap<String, u32> = HashMap::new();
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut total_len: u64 = 0;

        for record in corpus {
            let RawDoc { id, text } = record?;
            if doc_ids.contains_key(&id) {
                bail!("duplicate document id {id:?}");
            }
            let doc_id = docs.len() as DocId;
            let terms = normalizer.normalize(&text);
            let doc = Document::new(id.clone(), text, terms);
            total_len += doc.len() as u64;
            for (term, &tf) in doc.term_freqs() {
                vocabulary.insert(term.clone());
                // once per document, regardless of in-document repeats
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
                postings
                    .entry(term.clone())
                    .or_default()
                    .push(Posting { doc: doc_id, tf });
            }
            doc_ids.insert(id, doc_id);
            docs.push(doc);
        }

        let num_docs = docs.len() as u32;
        let avg_doc_len = if num_docs == 0 {
            0.0
        } else {
            total_len as f64 / num_docs as f64
        };

        // the df table is final, so the document norms can be fixed now
        for doc in &mut docs {
            doc.compute_norm(&document_frequency, num_docs);
        }

        tracing::info!(
            num_docs,
            vocab_size = vocabulary.len(),
            avg_doc_len,
            "index build complete"
        );

        Ok(Self {
            normalizer,
            docs,
            doc_ids,
            vocabulary,
            document_frequency,
            postings,
            num_docs,
            avg_doc_len,
        })
    }

    /// Ranks the corpus against a free-text query.
    ///
    /// Returns at most `k` hits ordered by descending score; equal scores
    /// order by corpus arrival order. Query terms absent from the
    /// vocabulary are skipped, so a query with no recognized terms yields
    /// an empty list rather than an error.
    pub fn rank(&self, query: &str, k: usize, opts: &SearchOptions) -> Vec<SearchHit> {
        let ranked = if opts.expand {
            let expanded = self.expand_query(query, opts);
            self.rank_ids(&expanded, k, opts)
        } else {
            self.rank_ids(query, k, opts)
        };
        ranked
            .into_iter()
            .map(|(doc, score)| SearchHit {
                doc_id: self.docs[doc as usize].id().to_string(),
                score,
            })
            .collect()
    }

    /// Builds the pseudo-relevance-feedback query: ranks a first pass of
    /// `opts.feedback_depth` documents, then appends each one's raw text to
    /// the query in ranked order.
    pub fn expand_query(&self, query: &str, opts: &SearchOptions) -> String {
        let seeds = self.rank_ids(query, opts.feedback_depth, opts);
        let mut expanded = String::from(query);
        for (doc, _) in seeds {
            expanded.push(' ');
            expanded.push_str(self.docs[doc as usize].raw_text());
        }
        expanded
    }

    fn rank_ids(&self, query: &str, k: usize, opts: &SearchOptions) -> Vec<(DocId, f64)> {
        let scores = match opts.method {
            RankingMethod::Cosine => score::cosine(self, query),
            RankingMethod::Bm25 => score::bm25(self, query, &opts.bm25),
        };
        topk::top_k(scores, k)
    }

    /// Normalizes text with the normalizer the index was built with.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.normalizer.normalize(text)
    }

    /// Total number of documents indexed.
    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    /// Mean document length in terms.
    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    /// All distinct terms seen across the corpus.
    pub fn vocabulary(&self) -> &HashSet<String> {
        &self.vocabulary
    }

    /// Number of documents containing `term`; 0 for unseen terms.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    /// Postings list for `term`, if the term occurs in the corpus.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(|p| p.as_slice())
    }

    /// Document by internal id.
    pub fn document(&self, doc: DocId) -> &Document {
        &self.docs[doc as usize]
    }

    /// Document by external id.
    pub fn get(&self, doc_id: &str) -> Option<&Document> {
        self.doc_ids
            .get(doc_id)
            .map(|&doc| &self.docs[doc as usize])
    }
}
