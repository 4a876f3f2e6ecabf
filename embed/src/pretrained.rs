use std::path::PathBuf;

use tracing::info;

use crate::config::{EmbeddingKwargs, kwarg_bool, kwarg_opt_usize, kwarg_str};
use crate::error::EmbedError;
use crate::provider::{Document, WordEmbeddingProvider};
use crate::vecfile::{self, ReadOptions};
use crate::vectors::WordVectors;

/// PreTrainedFromFile loads word vectors from a file produced elsewhere.
///
/// The training corpus is ignored; the file is re-read on every fit.
#[derive(Debug, Clone)]
pub struct PreTrainedFromFile {
    path: PathBuf,
    opts: ReadOptions,
}

impl PreTrainedFromFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            opts: ReadOptions::default(),
        }
    }

    /// Build from embedding kwargs: `path` (required), `binary`, `limit`.
    pub fn from_kwargs(kwargs: &EmbeddingKwargs) -> Result<Self, EmbedError> {
        let path = kwarg_str(kwargs, "path")?.ok_or_else(|| {
            EmbedError::InvalidConfiguration(
                "pre-trained-from-file: embedding_kwargs.path is required".into(),
            )
        })?;
        Ok(Self::new(path)
            .with_binary(kwarg_bool(kwargs, "binary", false)?)
            .with_limit(kwarg_opt_usize(kwargs, "limit")?))
    }

    pub fn with_binary(mut self, binary: bool) -> Self {
        self.opts.binary = binary;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.opts.limit = limit;
        self
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl WordEmbeddingProvider for PreTrainedFromFile {
    fn build_mapping(
        &self,
        _corpus: &[Document],
        _labels: Option<&[String]>,
    ) -> Result<WordVectors, EmbedError> {
        let wv = vecfile::load(&self.path, self.opts)?;
        info!(
            path = %self.path.display(),
            words = wv.len(),
            dim = wv.dimension(),
            "docembed: loaded pre-trained vectors"
        );
        Ok(wv)
    }

    fn name(&self) -> &str {
        "pre-trained-from-file"
    }
}
