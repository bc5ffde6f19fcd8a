//! Incremental lexical retrieval over accumulated document fragments.
//!
//! Okapi BM25 over the whole corpus. Ranking statistics are global, so
//! every addition rebuilds the index; corpora here stay small (a handful
//! of searches per run), which keeps the O(n) rebuild acceptable.

use std::collections::{HashMap, HashSet};

const K1: f64 = 1.5;
const B: f64 = 0.75;

pub struct FragmentIndex {
    docs: Vec<String>,
    tokenized: Vec<Vec<String>>,
    doc_freq: HashMap<String, usize>,
    avg_len: f64,
}

impl Default for FragmentIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentIndex {
    pub fn new() -> Self {
        Self {
            docs: Vec::new(),
            tokenized: Vec::new(),
            doc_freq: HashMap::new(),
            avg_len: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Add fragments to the corpus and rebuild the ranking statistics.
    /// Fragments are only ever added, never removed.
    pub fn add_documents(&mut self, docs: Vec<String>) {
        for doc in docs {
            self.tokenized.push(tokenize(&doc));
            self.docs.push(doc);
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.doc_freq.clear();
        let mut total_len = 0usize;
        for tokens in &self.tokenized {
            total_len += tokens.len();
            let mut seen = HashSet::new();
            for token in tokens {
                if seen.insert(token.as_str()) {
                    *self.doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }
        self.avg_len = if self.tokenized.is_empty() {
            0.0
        } else {
            total_len as f64 / self.tokenized.len() as f64
        };
    }

    /// The `k` highest-scoring fragments for `query`, in descending
    /// score order. Exact score ties break by insertion order.
    pub fn top_k(&self, query: &str, k: usize) -> Vec<&str> {
        if self.docs.is_empty() || k == 0 {
            return Vec::new();
        }
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = (0..self.docs.len())
            .map(|i| (i, self.score(&query_tokens, i)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        scored
            .into_iter()
            .take(k)
            .map(|(i, _)| self.docs[i].as_str())
            .collect()
    }

    fn score(&self, query_tokens: &[String], doc_idx: usize) -> f64 {
        let tokens = &self.tokenized[doc_idx];
        if tokens.is_empty() {
            return 0.0;
        }
        let n = self.docs.len() as f64;
        let len_norm = K1 * (1.0 - B + B * tokens.len() as f64 / self.avg_len);

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *term_freq.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut score = 0.0;
        for term in query_tokens {
            let Some(&df) = self.doc_freq.get(term) else {
                continue;
            };
            let Some(&tf) = term_freq.get(term.as_str()) else {
                continue;
            };
            let idf = ((n - df as f64 + 0.5) / (df as f64 + 0.5) + 1.0).ln();
            let tf = tf as f64;
            score += idf * tf * (K1 + 1.0) / (tf + len_norm);
        }
        score
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(docs: &[&str]) -> FragmentIndex {
        let mut index = FragmentIndex::new();
        index.add_documents(docs.iter().map(|d| d.to_string()).collect());
        index
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = FragmentIndex::new();
        assert!(index.is_empty());
        assert!(index.top_k("anything", 3).is_empty());
    }

    #[test]
    fn test_ranks_matching_document_first() {
        let index = index_of(&[
            "Rust is a systems programming language.",
            "Cooking pasta requires boiling water.",
            "The borrow checker is part of the Rust compiler.",
        ]);
        let top = index.top_k("rust borrow checker", 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], "The borrow checker is part of the Rust compiler.");
        assert_eq!(top[1], "Rust is a systems programming language.");
    }

    #[test]
    fn test_k_larger_than_corpus() {
        let index = index_of(&["alpha beta", "gamma delta"]);
        assert_eq!(index.top_k("alpha", 10).len(), 2);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let index = index_of(&["same words here", "same words here", "other thing"]);
        let top = index.top_k("same words", 2);
        assert_eq!(top[0], "same words here");
        assert_eq!(top[1], "same words here");
    }

    #[test]
    fn test_insertion_order_does_not_change_top_set() {
        let a = "the quick brown fox jumps";
        let b = "a slow green turtle crawls";
        let forward = index_of(&[a, b]);
        let backward = index_of(&[b, a]);

        let mut top_f: Vec<&str> = forward.top_k("quick fox turtle", 2);
        let mut top_b: Vec<&str> = backward.top_k("quick fox turtle", 2);
        top_f.sort();
        top_b.sort();
        assert_eq!(top_f, top_b);
    }

    #[test]
    fn test_incremental_addition_rebuilds() {
        let mut index = index_of(&["first fragment about cats"]);
        assert_eq!(index.len(), 1);
        index.add_documents(vec!["second fragment about dogs".to_string()]);
        assert_eq!(index.len(), 2);
        let top = index.top_k("dogs", 1);
        assert_eq!(top[0], "second fragment about dogs");
    }

    #[test]
    fn test_query_with_no_known_terms() {
        let index = index_of(&["alpha beta gamma"]);
        let top = index.top_k("zzz qqq", 1);
        // All scores are zero; the first inserted fragment still ranks first.
        assert_eq!(top.len(), 1);
        assert_eq!(top[0], "alpha beta gamma");
    }
}
