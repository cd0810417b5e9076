use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
}

/// Maps raw text to an ordered sequence of normalized terms.
///
/// Implementations must be deterministic: the same text always yields the
/// same sequence. The index keeps the instance it was built with and runs
/// queries through it, so document and query terms stay comparable.
pub trait TermNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// Default normalizer: NFKC normalization, lowercasing, stopword removal,
/// and English stemming.
pub struct Tokenizer {
    stemmer: Stemmer,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Tokenizer with the built-in English stopword list.
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Tokenizer with a custom stopword list, one word per line.
    ///
    /// An unreadable list is a startup failure, not a per-call one.
    pub fn from_stopword_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading stopword file {}", path.display()))?;
        let stopwords = contents
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Ok(Self {
            stemmer: Stemmer::create(Algorithm::English),
            stopwords,
        })
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TermNormalizer for Tokenizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        let folded = text.nfkc().collect::<String>().to_lowercase();
        let mut terms = Vec::new();
        for mat in WORD_RE.find_iter(&folded) {
            let token = mat.as_str();
            if self.stopwords.contains(token) {
                continue;
            }
            terms.push(self.stemmer.stem(token).to_string());
        }
        terms
    }
}

static DEFAULT_STOPWORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
];
