use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EmbedError;
use crate::idf::IdfWeights;
use crate::provider::Document;
use crate::vectors::WordVectors;

/// Weight used for an in-vocabulary token that has no IDF entry.
pub const DEFAULT_TOKEN_WEIGHT: f64 = 1.0;

/// Aggregation reduces a document's word vectors to one vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// (Weighted) arithmetic mean of the in-vocabulary token vectors.
    #[default]
    Average,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Average => "average",
        }
    }

    /// Aggregate a single document.
    ///
    /// Tokens missing from `vectors` are skipped. A document without any
    /// in-vocabulary token yields a zero vector of `vectors.dimension()`.
    pub fn aggregate(
        &self,
        doc: &[String],
        vectors: &WordVectors,
        weights: Option<&IdfWeights>,
    ) -> Vec<f32> {
        match self {
            Aggregation::Average => average(doc, vectors, weights),
        }
    }

    /// Aggregate every document, one row per document in input order.
    pub fn aggregate_all(
        &self,
        corpus: &[Document],
        vectors: &WordVectors,
        weights: Option<&IdfWeights>,
    ) -> Vec<Vec<f32>> {
        corpus
            .iter()
            .map(|doc| self.aggregate(doc, vectors, weights))
            .collect()
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(Aggregation::Average),
            other => Err(EmbedError::InvalidConfiguration(format!(
                "unknown aggregation method {other:?}"
            ))),
        }
    }
}

fn average(doc: &[String], vectors: &WordVectors, weights: Option<&IdfWeights>) -> Vec<f32> {
    let dim = vectors.dimension();
    let mut sum = vec![0.0f64; dim];
    let mut total = 0.0f64;

    for token in doc {
        let Some(vec) = vectors.get(token) else {
            continue;
        };
        let w = match weights {
            Some(idf) => idf.get(token).unwrap_or(DEFAULT_TOKEN_WEIGHT),
            None => 1.0,
        };
        for (acc, &v) in sum.iter_mut().zip(vec) {
            *acc += w * v as f64;
        }
        total += w;
    }

    if total == 0.0 {
        return vec![0.0; dim];
    }
    sum.into_iter().map(|s| (s / total) as f32).collect()
}
