use std::collections::HashMap;

/// One corpus item: its raw text, its normalized term sequence, and the
/// statistics derived from them.
///
/// The TF-IDF weight vector and its norm depend on corpus-wide statistics,
/// so they stay unset until the index build completes and calls
/// [`Document::compute_norm`] exactly once.
#[derive(Debug)]
pub struct Document {
    id: String,
    raw_text: String,
    terms: Vec<String>,
    term_freqs: HashMap<String, u32>,
    weights: Vec<f64>,
    norm: f64,
}

impl Document {
    pub(crate) fn new(id: String, raw_text: String, terms: Vec<String>) -> Self {
        let mut term_freqs: HashMap<String, u32> = HashMap::new();
        for term in &terms {
            *term_freqs.entry(term.clone()).or_insert(0) += 1;
        }
        Self {
            id,
            raw_text,
            terms,
            term_freqs,
            weights: Vec::new(),
            norm: 0.0,
        }
    }

    /// External document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The untokenized text the document was created from.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Normalized term sequence, duplicates preserved in order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// In-document frequency of each distinct term.
    pub fn term_freqs(&self) -> &HashMap<String, u32> {
        &self.term_freqs
    }

    /// Number of terms including duplicates; BM25's document length.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Per-occurrence TF-IDF weights, parallel to [`Document::terms`].
    /// Empty until the index build computes norms.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Euclidean norm of the TF-IDF weight vector. Zero until
    /// [`Document::compute_norm`] has run, and afterwards zero only for
    /// documents with no terms.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Computes the TF-IDF weight vector and its norm from the final corpus
    /// statistics. Repeated terms contribute one weight entry per
    /// occurrence. Called once per document by the index build, after the
    /// document-frequency table is complete.
    pub(crate) fn compute_norm(
        &mut self,
        document_frequency: &HashMap<String, u32>,
        corpus_size: u32,
    ) {
        debug_assert!(self.weights.is_empty(), "norm computed once per document");
        let n = corpus_size as f64;
        let mut weights = Vec::with_capacity(self.terms.len());
        let mut sum = 0.0;
        for term in &self.terms {
            let tf = self.term_freqs[term] as f64;
            // every indexed term was counted into the df table during the build
            let df = *document_frequency
                .get(term)
                .expect("indexed term missing from document frequency table")
                as f64;
            let weight = (1.0 + tf.log10()) * (n / df).log10();
            sum += weight * weight;
            weights.push(weight);
        }
        self.weights = weights;
        self.norm = sum.sqrt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, terms: &[&str]) -> Document {
        Document::new(
            id.to_string(),
            terms.join(" "),
            terms.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn frequency_table_counts_occurrences() {
        let d = doc("d1", &["dog", "dog", "fish"]);
        assert_eq!(d.len(), 3);
        assert_eq!(d.term_freqs()["dog"], 2);
        assert_eq!(d.term_freqs()["fish"], 1);
    }

    #[test]
    fn norm_is_zero_until_computed() {
        let mut d = doc("d1", &["dog"]);
        assert_eq!(d.norm(), 0.0);

        let mut df = HashMap::new();
        df.insert("dog".to_string(), 1);
        d.compute_norm(&df, 2);
        // single occurrence: weight = (1 + log10(1)) * log10(2/1)
        let expected = 2.0_f64.log10();
        assert!((d.norm() - expected).abs() < 1e-12);
    }

    #[test]
    fn repeated_terms_contribute_per_occurrence() {
        let mut d = doc("d1", &["dog", "dog"]);
        let mut df = HashMap::new();
        df.insert("dog".to_string(), 1);
        d.compute_norm(&df, 10);
        assert_eq!(d.weights().len(), 2);
        let w = (1.0 + 2.0_f64.log10()) * 10.0_f64.log10();
        assert!((d.norm() - (2.0 * w * w).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_document_has_zero_norm() {
        let mut d = doc("d1", &[]);
        d.compute_norm(&HashMap::new(), 5);
        assert_eq!(d.norm(), 0.0);
        assert!(d.is_empty());
    }
}
