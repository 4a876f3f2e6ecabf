use std::path::Path;

use crate::config::{EmbeddingKwargs, kwarg_args, kwarg_bool, kwarg_str, kwarg_usize};
use crate::error::EmbedError;
use crate::provider::{Document, WordEmbeddingProvider};
use crate::trainer::{self, Args};
use crate::vecfile::{self, ReadOptions};
use crate::vectors::WordVectors;

/// Default executable of the reference word2vec tool.
pub const WORD2VEC_BINARY: &str = "word2vec";

/// End-of-sentence token the word2vec tool adds to every vocabulary.
pub const END_OF_SENTENCE: &str = "</s>";

/// Training options understood by the word2vec tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Word2VecParams {
    pub binary_path: String,
    pub size: usize,
    pub window: usize,
    pub min_count: usize,
    pub iter: usize,
    pub cbow: bool,
    pub threads: usize,
    pub extra_args: Vec<String>,
}

impl Default for Word2VecParams {
    fn default() -> Self {
        Self {
            binary_path: WORD2VEC_BINARY.to_string(),
            size: 100,
            window: 5,
            min_count: 1,
            iter: 5,
            cbow: true,
            threads: 1,
            extra_args: Vec::new(),
        }
    }
}

impl Word2VecParams {
    pub fn from_kwargs(kwargs: &EmbeddingKwargs) -> Result<Self, EmbedError> {
        let d = Self::default();
        Ok(Self {
            binary_path: kwarg_str(kwargs, "binary_path")?.unwrap_or(d.binary_path),
            size: kwarg_usize(kwargs, "size", d.size)?,
            window: kwarg_usize(kwargs, "window", d.window)?,
            min_count: kwarg_usize(kwargs, "min_count", d.min_count)?,
            iter: kwarg_usize(kwargs, "iter", d.iter)?,
            cbow: kwarg_bool(kwargs, "cbow", d.cbow)?,
            threads: kwarg_usize(kwargs, "threads", d.threads)?,
            extra_args: kwarg_args(kwargs, "extra_args")?,
        })
    }

    pub(crate) fn args(&self, input: &Path, output: &Path) -> Args {
        Args::new()
            .path("-train", input)
            .path("-output", output)
            .flag("-binary", 0)
            .flag("-size", self.size)
            .flag("-window", self.window)
            .flag("-min-count", self.min_count)
            .flag("-iter", self.iter)
            .flag("-cbow", u8::from(self.cbow))
            .flag("-threads", self.threads)
    }
}

/// Word2Vec trains word vectors with the word2vec command-line tool.
#[derive(Debug, Clone, Default)]
pub struct Word2Vec {
    params: Word2VecParams,
}

impl Word2Vec {
    pub fn new(params: Word2VecParams) -> Self {
        Self { params }
    }

    pub fn from_kwargs(kwargs: &EmbeddingKwargs) -> Result<Self, EmbedError> {
        Ok(Self::new(Word2VecParams::from_kwargs(kwargs)?))
    }

    pub fn params(&self) -> &Word2VecParams {
        &self.params
    }
}

impl WordEmbeddingProvider for Word2Vec {
    fn build_mapping(
        &self,
        corpus: &[Document],
        _labels: Option<&[String]>,
    ) -> Result<WordVectors, EmbedError> {
        let dir = trainer::workdir()?;
        let input = dir.path().join("corpus.txt");
        let output = dir.path().join("vectors.txt");

        trainer::write_corpus(&input, corpus.iter().map(|doc| doc.join(" ")))?;
        let args = self
            .params
            .args(&input, &output)
            .extend(&self.params.extra_args)
            .build();
        trainer::run(&self.params.binary_path, &args)?;

        let mut wv = vecfile::load(&output, ReadOptions::default())?;
        wv.retain(|t| t != END_OF_SENTENCE);
        Ok(wv)
    }

    fn name(&self) -> &str {
        "word2vec"
    }
}
