use crate::error::EmbedError;
use crate::vectors::WordVectors;

/// A tokenized document.
pub type Document = Vec<String>;

/// WordEmbeddingProvider produces a token-to-vector mapping from a training
/// corpus.
///
/// This is the only contract a backend has to satisfy to be pluggable into
/// a [`crate::Embedder`]. Labels, when given, are aligned 1:1 with the
/// corpus; most backends ignore them.
pub trait WordEmbeddingProvider: Send + Sync {
    /// Build the word-vector mapping for `corpus`.
    fn build_mapping(
        &self,
        corpus: &[Document],
        labels: Option<&[String]>,
    ) -> Result<WordVectors, EmbedError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// StaticProvider hands out a fixed mapping regardless of the corpus.
///
/// Useful for vectors that were computed elsewhere and already live in
/// memory.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    vectors: WordVectors,
}

impl StaticProvider {
    pub fn new(vectors: WordVectors) -> Self {
        Self { vectors }
    }
}

impl WordEmbeddingProvider for StaticProvider {
    fn build_mapping(
        &self,
        _corpus: &[Document],
        _labels: Option<&[String]>,
    ) -> Result<WordVectors, EmbedError> {
        Ok(self.vectors.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
