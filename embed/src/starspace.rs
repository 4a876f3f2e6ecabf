use crate::config::{EmbeddingKwargs, kwarg_args, kwarg_opt_usize, kwarg_str, kwarg_usize};
use crate::error::EmbedError;
use crate::provider::{Document, WordEmbeddingProvider};
use crate::trainer::{self, Args};
use crate::vecfile::{self, ReadOptions};
use crate::vectors::WordVectors;

/// Default executable of the StarSpace tool.
pub const STARSPACE_BINARY: &str = "starspace";

/// StarSpace mode for labelled text classification data.
pub const TRAIN_MODE_LABELLED: usize = 0;

/// StarSpace mode for unsupervised word-level training.
pub const TRAIN_MODE_WORDS: usize = 5;

/// StarSpace trains entity embeddings with the StarSpace tool and keeps the
/// word entities.
///
/// With labels the default mode is labelled classification (`trainMode 0`),
/// without labels it is word-level training (`trainMode 5`).
#[derive(Debug, Clone, PartialEq)]
pub struct StarSpace {
    pub binary_path: String,
    pub dim: usize,
    pub epoch: usize,
    pub threads: usize,
    /// Overrides the label-dependent default mode.
    pub train_mode: Option<usize>,
    pub extra_args: Vec<String>,
}

impl Default for StarSpace {
    fn default() -> Self {
        Self {
            binary_path: STARSPACE_BINARY.to_string(),
            dim: 100,
            epoch: 5,
            threads: 1,
            train_mode: None,
            extra_args: Vec::new(),
        }
    }
}

impl StarSpace {
    pub fn from_kwargs(kwargs: &EmbeddingKwargs) -> Result<Self, EmbedError> {
        let d = Self::default();
        Ok(Self {
            binary_path: kwarg_str(kwargs, "binary_path")?.unwrap_or(d.binary_path),
            dim: kwarg_usize(kwargs, "dim", d.dim)?,
            epoch: kwarg_usize(kwargs, "epoch", d.epoch)?,
            threads: kwarg_usize(kwargs, "threads", d.threads)?,
            train_mode: kwarg_opt_usize(kwargs, "train_mode")?,
            extra_args: kwarg_args(kwargs, "extra_args")?,
        })
    }

    fn mode(&self, labels: Option<&[String]>) -> usize {
        self.train_mode.unwrap_or(match labels {
            Some(_) => TRAIN_MODE_LABELLED,
            None => TRAIN_MODE_WORDS,
        })
    }
}

fn line(doc: &[String], label: Option<&String>) -> String {
    let mut line = doc.join(" ");
    if let Some(label) = label {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&trainer::label_token(label));
    }
    line
}

impl WordEmbeddingProvider for StarSpace {
    fn build_mapping(
        &self,
        corpus: &[Document],
        labels: Option<&[String]>,
    ) -> Result<WordVectors, EmbedError> {
        let dir = trainer::workdir()?;
        let input = dir.path().join("corpus.txt");
        let model = dir.path().join("model");

        trainer::write_corpus(
            &input,
            corpus
                .iter()
                .enumerate()
                .map(|(i, doc)| line(doc, labels.and_then(|l| l.get(i)))),
        )?;

        let args = Args::new()
            .arg("train")
            .path("-trainFile", &input)
            .path("-model", &model)
            .flag("-dim", self.dim)
            .flag("-epoch", self.epoch)
            .flag("-thread", self.threads)
            .flag("-trainMode", self.mode(labels))
            .extend(&self.extra_args)
            .build();
        trainer::run(&self.binary_path, &args)?;

        let mut wv = vecfile::load(&model.with_extension("tsv"), ReadOptions::default())?;
        if let Some(labels) = labels {
            let written = trainer::label_tokens(labels);
            wv.retain(|t| !written.contains(t));
        }
        Ok(wv)
    }

    fn name(&self) -> &str {
        "starspace"
    }
}
