use std::fmt;
use std::str::FromStr;

use crate::config::{EmbeddingKwargs, kwarg_args, kwarg_str, kwarg_usize};
use crate::error::EmbedError;
use crate::provider::{Document, WordEmbeddingProvider};
use crate::trainer::{self, Args};
use crate::vecfile::{self, ReadOptions};
use crate::vectors::WordVectors;
use crate::word2vec::END_OF_SENTENCE;

/// Default executable of the fastText tool.
pub const FASTTEXT_BINARY: &str = "fasttext";

/// fastText training mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FastTextModel {
    #[default]
    Skipgram,
    Cbow,
    /// Label-supervised training; requires labels at fit time.
    Supervised,
}

impl FastTextModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FastTextModel::Skipgram => "skipgram",
            FastTextModel::Cbow => "cbow",
            FastTextModel::Supervised => "supervised",
        }
    }
}

impl fmt::Display for FastTextModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FastTextModel {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skipgram" => Ok(FastTextModel::Skipgram),
            "cbow" => Ok(FastTextModel::Cbow),
            "supervised" => Ok(FastTextModel::Supervised),
            other => Err(EmbedError::InvalidConfiguration(format!(
                "fasttext: unknown model {other:?}"
            ))),
        }
    }
}

/// FastText trains subword-aware word vectors with the fastText tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FastText {
    pub binary_path: String,
    pub model: FastTextModel,
    pub dim: usize,
    pub epoch: usize,
    pub min_count: usize,
    pub threads: usize,
    pub extra_args: Vec<String>,
}

impl Default for FastText {
    fn default() -> Self {
        Self {
            binary_path: FASTTEXT_BINARY.to_string(),
            model: FastTextModel::default(),
            dim: 100,
            epoch: 5,
            min_count: 1,
            threads: 1,
            extra_args: Vec::new(),
        }
    }
}

impl FastText {
    pub fn from_kwargs(kwargs: &EmbeddingKwargs) -> Result<Self, EmbedError> {
        let d = Self::default();
        let model = match kwarg_str(kwargs, "model")? {
            Some(m) => m.parse()?,
            None => d.model,
        };
        Ok(Self {
            binary_path: kwarg_str(kwargs, "binary_path")?.unwrap_or(d.binary_path),
            model,
            dim: kwarg_usize(kwargs, "dim", d.dim)?,
            epoch: kwarg_usize(kwargs, "epoch", d.epoch)?,
            min_count: kwarg_usize(kwargs, "min_count", d.min_count)?,
            threads: kwarg_usize(kwargs, "threads", d.threads)?,
            extra_args: kwarg_args(kwargs, "extra_args")?,
        })
    }

    fn lines(&self, corpus: &[Document], labels: Option<&[String]>) -> Result<Vec<String>, EmbedError> {
        match (self.model, labels) {
            (FastTextModel::Supervised, None) => Err(EmbedError::InvalidConfiguration(
                "fasttext: supervised model requires labels".into(),
            )),
            (FastTextModel::Supervised, Some(labels)) => Ok(corpus
                .iter()
                .zip(labels)
                .map(|(doc, label)| format!("{} {}", trainer::label_token(label), doc.join(" ")))
                .collect()),
            _ => Ok(corpus.iter().map(|doc| doc.join(" ")).collect()),
        }
    }
}

impl WordEmbeddingProvider for FastText {
    fn build_mapping(
        &self,
        corpus: &[Document],
        labels: Option<&[String]>,
    ) -> Result<WordVectors, EmbedError> {
        let lines = self.lines(corpus, labels)?;

        let dir = trainer::workdir()?;
        let input = dir.path().join("corpus.txt");
        let prefix = dir.path().join("model");
        trainer::write_corpus(&input, &lines)?;

        let args = Args::new()
            .arg(self.model.as_str())
            .path("-input", &input)
            .path("-output", &prefix)
            .flag("-dim", self.dim)
            .flag("-epoch", self.epoch)
            .flag("-minCount", self.min_count)
            .flag("-thread", self.threads)
            .extend(&self.extra_args)
            .build();
        trainer::run(&self.binary_path, &args)?;

        let mut wv = vecfile::load(&prefix.with_extension("vec"), ReadOptions::default())?;
        let written = match (self.model, labels) {
            (FastTextModel::Supervised, Some(labels)) => trainer::label_tokens(labels),
            _ => Default::default(),
        };
        wv.retain(|t| t != END_OF_SENTENCE && !written.contains(t));
        Ok(wv)
    }

    fn name(&self) -> &str {
        "fasttext"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbedderConfig;

    fn corpus() -> Vec<Document> {
        vec![
            vec!["good".to_string(), "film".to_string()],
            vec!["bad".to_string()],
        ]
    }

    #[test]
    fn test_from_kwargs() {
        let kwargs = EmbedderConfig::new()
            .with_kwarg("model", "cbow")
            .with_kwarg("dim", 16)
            .embedding_kwargs;
        let ft = FastText::from_kwargs(&kwargs).unwrap();
        assert_eq!(ft.model, FastTextModel::Cbow);
        assert_eq!(ft.dim, 16);
        assert_eq!(ft.binary_path, FASTTEXT_BINARY);
    }

    #[test]
    fn test_unknown_model() {
        let kwargs = EmbedderConfig::new().with_kwarg("model", "glove").embedding_kwargs;
        assert!(matches!(
            FastText::from_kwargs(&kwargs),
            Err(EmbedError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_supervised_lines() {
        let ft = FastText {
            model: FastTextModel::Supervised,
            ..Default::default()
        };
        let labels = vec!["pos".to_string(), "neg".to_string()];
        assert_eq!(
            ft.lines(&corpus(), Some(&labels)).unwrap(),
            vec!["__label__pos good film", "__label__neg bad"]
        );
        assert!(matches!(
            ft.lines(&corpus(), None),
            Err(EmbedError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_unsupervised_lines_ignore_labels() {
        let labels = vec!["pos".to_string(), "neg".to_string()];
        assert_eq!(
            FastText::default().lines(&corpus(), Some(&labels)).unwrap(),
            vec!["good film", "bad"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_build_mapping_reads_vec_file() {
        use crate::trainer::testing;

        let _guard = testing::lock();
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{}\nprintf '3 2\\n</s> 0 0\\ngood 1 2\\n__label__pos 3 3\\n' > \"$out.vec\"",
            testing::find_flag("-output")
        );
        let script = testing::fake_trainer(dir.path(), "-input", &body);

        let ft = FastText {
            binary_path: script.to_str().unwrap().to_string(),
            model: FastTextModel::Supervised,
            ..Default::default()
        };
        let labels = vec!["pos".to_string(), "neg".to_string()];
        let wv = ft.build_mapping(&corpus(), Some(&labels)).unwrap();

        assert_eq!(wv.len(), 1);
        let good = wv.get("good").unwrap();
        assert!((good[0] - 1.0).abs() < 1e-5 && (good[1] - 2.0).abs() < 1e-5, "got {good:?}");
        let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert!(args.starts_with("supervised -input "), "got {args}");
    }

    #[cfg(unix)]
    #[test]
    fn test_unsupervised_keeps_label_like_words() {
        use crate::trainer::testing;

        let _guard = testing::lock();
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{}\nprintf '2 1\\n__label__x 1\\ngood 2\\n' > \"$out.vec\"",
            testing::find_flag("-output")
        );
        let script = testing::fake_trainer(dir.path(), "-input", &body);

        let ft = FastText {
            binary_path: script.to_str().unwrap().to_string(),
            ..Default::default()
        };
        let labels = vec!["x".to_string(), "y".to_string()];
        let wv = ft.build_mapping(&corpus(), Some(&labels)).unwrap();
        assert_eq!(wv.len(), 2);
        assert!(wv.contains("__label__x"));
    }
}
