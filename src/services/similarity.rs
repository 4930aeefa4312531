use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::stop_words::is_stop_word;

/// Runs of two or more word characters
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Lowercased, stop-word-free tokens of a document
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// L2-normalized sparse row, entries sorted by term column
#[derive(Debug, Clone, Default, PartialEq)]
struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_col, a_val) = self.entries[i];
            let (b_col, b_val) = other.entries[j];
            match a_col.cmp(&b_col) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_val * b_val;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// TF-IDF index over the catalog's combined course text
///
/// Row `i` is the vector of catalog row `i`. Weights are raw term counts times a smoothed
/// idf, `ln((1 + n) / (1 + df)) + 1`, and each row is L2-normalized so a dot product is the
/// cosine similarity.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl SimilarityIndex {
    pub fn build<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // Sorted vocabulary keeps column order independent of input order
        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term.to_string(), col))
            .collect();

        let counts: Vec<HashMap<usize, usize>> = tokenized
            .iter()
            .map(|tokens| {
                let mut tf = HashMap::new();
                for token in tokens {
                    if let Some(&col) = vocabulary.get(token) {
                        *tf.entry(col).or_insert(0) += 1;
                    }
                }
                tf
            })
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for &col in tf.keys() {
                doc_freq[col] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|tf| {
                let mut entries: Vec<(usize, f64)> = tf
                    .into_iter()
                    .map(|(col, count)| (col, count as f64 * idf[col]))
                    .collect();
                entries.sort_by_key(|&(col, _)| col);

                let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in entries.iter_mut() {
                        *w /= norm;
                    }
                }
                SparseVector { entries }
            })
            .collect::<Vec<_>>();

        tracing::info!(
            documents = rows.len(),
            vocabulary = vocabulary.len(),
            "Similarity index built"
        );

        Self {
            vocabulary,
            idf,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&col| self.idf[col])
    }

    /// Cosine similarity of two rows; zero for unknown rows
    pub fn similarity(&self, a: usize, b: usize) -> f64 {
        match (self.rows.get(a), self.rows.get(b)) {
            (Some(a), Some(b)) => a.dot(b),
            _ => 0.0,
        }
    }

    /// Candidates most similar to `query_row`, best first
    ///
    /// The query row itself is never returned. Equal scores keep candidate order.
    pub fn query(&self, query_row: usize, candidates: &[usize], top_n: usize) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .filter(|&&row| row != query_row)
            .map(|&row| (row, self.similarity(query_row, row)))
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);
        scored
    }
}

/// Title to row lookup, first occurrence wins
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    rows: HashMap<String, usize>,
}

impl TitleIndex {
    pub fn build<'a, I>(titles: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let mut rows = HashMap::new();
        for (row, title) in titles {
            rows.entry(title.to_string()).or_insert(row);
        }
        Self { rows }
    }

    pub fn get(&self, title: &str) -> Option<usize> {
        self.rows.get(title).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
