use crate::config::EmbeddingKwargs;
use crate::error::EmbedError;
use crate::provider::{Document, WordEmbeddingProvider};
use crate::trainer;
use crate::vecfile::{self, ReadOptions};
use crate::vectors::WordVectors;
use crate::word2vec::{END_OF_SENTENCE, Word2VecParams};

/// Prefix of the per-document ids the paragraph-vector trainer expects at
/// the start of every line.
pub const DOCUMENT_ID_PREFIX: &str = "_*";

/// Doc2Vec trains paragraph vectors with word2vec's `-sentence-vectors 1`
/// mode and keeps the jointly trained word vectors.
///
/// Document-id vectors are dropped: they only describe the training
/// documents and cannot be looked up for unseen text.
#[derive(Debug, Clone, Default)]
pub struct Doc2Vec {
    params: Word2VecParams,
}

impl Doc2Vec {
    pub fn new(params: Word2VecParams) -> Self {
        Self { params }
    }

    /// Accepts the same kwargs as word2vec.
    pub fn from_kwargs(kwargs: &EmbeddingKwargs) -> Result<Self, EmbedError> {
        Ok(Self::new(Word2VecParams::from_kwargs(kwargs)?))
    }

    pub fn params(&self) -> &Word2VecParams {
        &self.params
    }
}

fn tagged_line(i: usize, doc: &[String]) -> String {
    let mut line = format!("{DOCUMENT_ID_PREFIX}{i}");
    for token in doc {
        line.push(' ');
        line.push_str(token);
    }
    line
}

/// Whether `token` is one of the ids `_*0 .. _*{documents - 1}` written by
/// [`tagged_line`].
fn is_document_id(token: &str, documents: usize) -> bool {
    token
        .strip_prefix(DOCUMENT_ID_PREFIX)
        .and_then(|n| n.parse::<usize>().ok().filter(|i| i.to_string() == n))
        .is_some_and(|i| i < documents)
}

impl WordEmbeddingProvider for Doc2Vec {
    fn build_mapping(
        &self,
        corpus: &[Document],
        _labels: Option<&[String]>,
    ) -> Result<WordVectors, EmbedError> {
        let dir = trainer::workdir()?;
        let input = dir.path().join("corpus.txt");
        let output = dir.path().join("vectors.txt");

        trainer::write_corpus(
            &input,
            corpus.iter().enumerate().map(|(i, doc)| tagged_line(i, doc)),
        )?;
        let args = self
            .params
            .args(&input, &output)
            .flag("-sentence-vectors", 1)
            .extend(&self.params.extra_args)
            .build();
        trainer::run(&self.params.binary_path, &args)?;

        let mut wv = vecfile::load(&output, ReadOptions::default())?;
        wv.retain(|t| t != END_OF_SENTENCE && !is_document_id(t, corpus.len()));
        Ok(wv)
    }

    fn name(&self) -> &str {
        "doc2vec"
    }
}
