use std::collections::{HashMap, HashSet};

use crate::provider::Document;
use crate::vectors::WordVectors;

/// IdfWeights maps tokens to smoothed inverse document frequencies:
///
/// ```text
/// idf(t) = ln((1 + N) / (1 + df(t))) + 1
/// ```
///
/// where `N` is the number of documents and `df(t)` the number of documents
/// containing `t` at least once. Every weight is at least 1.0 and weights
/// decrease as a token becomes more common.
///
/// A document's terms are its tokens joined with spaces and split on
/// whitespace again, so empty tokens count for nothing and a token holding
/// whitespace counts as its parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfWeights {
    weights: HashMap<String, f64>,
}

impl IdfWeights {
    /// Compute weights for every token in `corpus`.
    pub fn fit(corpus: &[Document]) -> Self {
        Self::fit_filtered(corpus, |_| true)
    }

    /// Compute weights over `corpus`, keeping only tokens present in
    /// `vectors`.
    pub fn fit_vocabulary(corpus: &[Document], vectors: &WordVectors) -> Self {
        Self::fit_filtered(corpus, |t| vectors.contains(t))
    }

    fn fit_filtered(corpus: &[Document], keep: impl Fn(&str) -> bool) -> Self {
        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in corpus {
            let seen: HashSet<&str> = doc.iter().flat_map(|t| t.split_whitespace()).collect();
            for token in seen {
                *df.entry(token).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f64;
        let weights = df
            .into_iter()
            .filter(|(token, _)| keep(*token))
            .map(|(token, count)| {
                let idf = ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0;
                (token.to_string(), idf)
            })
            .collect();
        Self { weights }
    }

    /// Build weights from explicit values.
    pub fn from_map(weights: HashMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.weights.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
