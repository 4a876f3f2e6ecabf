use tracing::debug;

use crate::aggregate::Aggregation;
use crate::config::EmbedderConfig;
use crate::error::EmbedError;
use crate::idf::IdfWeights;
use crate::provider::{Document, WordEmbeddingProvider};
use crate::vectors::WordVectors;

/// Matrix of document vectors, one row per input document.
pub type Matrix = Vec<Vec<f32>>;

/// DocEmbedder turns tokenized documents into fixed-length vectors through
/// a two-phase lifecycle: `fit` once, then `transform` any number of times.
pub trait DocEmbedder: Send {
    /// Learn the word-vector mapping (and IDF weights, if enabled) from
    /// `corpus`. Replaces whatever a previous `fit` stored.
    fn fit(
        &mut self,
        corpus: &[Document],
        labels: Option<&[String]>,
    ) -> Result<&mut dyn DocEmbedder, EmbedError>;

    /// Embed every document of `corpus`. Rows keep the input order.
    ///
    /// Fails with [`EmbedError::NotFitted`] before a successful `fit`.
    fn transform(&self, corpus: &[Document]) -> Result<Matrix, EmbedError>;

    /// Return the number of output columns, or `None` while unfit.
    fn dimension(&self) -> Option<usize>;

    /// Drop all fitted state.
    fn reset(&mut self);

    /// Return the fitted word vectors of a single-backend embedder.
    fn vectors(&self) -> Option<&WordVectors> {
        None
    }

    /// Short identifier used in logs.
    fn name(&self) -> String;

    fn is_fitted(&self) -> bool {
        self.dimension().is_some()
    }

    fn fit_transform(
        &mut self,
        corpus: &[Document],
        labels: Option<&[String]>,
    ) -> Result<Matrix, EmbedError> {
        self.fit(corpus, labels)?.transform(corpus)
    }
}

/// Fitted state of an [`Embedder`].
#[derive(Debug, Clone)]
enum FitState {
    Unfit,
    Fitted {
        vectors: WordVectors,
        weights: Option<IdfWeights>,
    },
}

/// Embedder is the [`DocEmbedder`] for a single word-vector backend.
///
/// The backend only builds the token mapping; IDF weighting and
/// aggregation are shared by all backends.
pub struct Embedder<P> {
    provider: P,
    use_idf_weights: bool,
    aggregation: Aggregation,
    state: FitState,
}

impl<P: WordEmbeddingProvider> Embedder<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            use_idf_weights: false,
            aggregation: Aggregation::Average,
            state: FitState::Unfit,
        }
    }

    /// Create an embedder, taking the weighting switch from `cfg`.
    ///
    /// `cfg.embedding_kwargs` is meant for the provider's own constructor
    /// and is not read here.
    pub fn with_config(provider: P, cfg: &EmbedderConfig) -> Self {
        Self::new(provider).with_idf_weights(cfg.use_idf_weights)
    }

    pub fn with_idf_weights(mut self, enabled: bool) -> Self {
        self.use_idf_weights = enabled;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn uses_idf_weights(&self) -> bool {
        self.use_idf_weights
    }

    /// Return the fitted IDF weights, if weighting is enabled.
    pub fn weights(&self) -> Option<&IdfWeights> {
        match &self.state {
            FitState::Fitted { weights, .. } => weights.as_ref(),
            FitState::Unfit => None,
        }
    }
}

fn check_labels(corpus: &[Document], labels: Option<&[String]>) -> Result<(), EmbedError> {
    match labels {
        Some(labels) if labels.len() != corpus.len() => Err(EmbedError::LabelCountMismatch {
            documents: corpus.len(),
            labels: labels.len(),
        }),
        _ => Ok(()),
    }
}

impl<P: WordEmbeddingProvider> DocEmbedder for Embedder<P> {
    fn fit(
        &mut self,
        corpus: &[Document],
        labels: Option<&[String]>,
    ) -> Result<&mut dyn DocEmbedder, EmbedError> {
        self.state = FitState::Unfit;
        check_labels(corpus, labels)?;

        let vectors = self.provider.build_mapping(corpus, labels)?;
        let weights = self
            .use_idf_weights
            .then(|| IdfWeights::fit_vocabulary(corpus, &vectors));

        debug!(
            provider = self.provider.name(),
            documents = corpus.len(),
            words = vectors.len(),
            dim = vectors.dimension(),
            weighted = weights.as_ref().map(IdfWeights::len),
            "docembed: fitted"
        );

        self.state = FitState::Fitted { vectors, weights };
        Ok(self)
    }

    fn transform(&self, corpus: &[Document]) -> Result<Matrix, EmbedError> {
        match &self.state {
            FitState::Unfit => Err(EmbedError::NotFitted),
            FitState::Fitted { vectors, weights } => {
                Ok(self.aggregation.aggregate_all(corpus, vectors, weights.as_ref()))
            }
        }
    }

    fn dimension(&self) -> Option<usize> {
        self.vectors().map(WordVectors::dimension)
    }

    fn reset(&mut self) {
        self.state = FitState::Unfit;
    }

    fn vectors(&self) -> Option<&WordVectors> {
        match &self.state {
            FitState::Fitted { vectors, .. } => Some(vectors),
            FitState::Unfit => None,
        }
    }

    fn name(&self) -> String {
        self.provider.name().to_string()
    }
}
