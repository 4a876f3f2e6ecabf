//! Fit + transform command.

use std::path::Path;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use tracing::info;

use docembed::{DocEmbedder, EmbedderConfig, Method, MethodSpec, factory, vecfile};

use super::{load_request, output_matrix, parse_kwarg};
use crate::Cli;
use crate::corpus;

/// Fit an embedder on a corpus and write one vector per document.
#[derive(Args)]
pub struct EmbedCommand {
    /// Corpus to embed, one tokenized document per line
    #[arg(short = 'f', long = "file")]
    input: String,

    /// Corpus to fit on (default: the corpus being embedded)
    #[arg(long)]
    fit_on: Option<String>,

    /// Embedding method; repeat to concatenate several (overrides config file)
    #[arg(short = 'm', long = "method")]
    methods: Vec<String>,

    /// Weight tokens by inverse document frequency
    #[arg(long)]
    idf: bool,

    /// Backend option as KEY=VALUE, repeatable (overrides config file)
    #[arg(short = 'k', long = "kwarg", value_name = "KEY=VALUE")]
    kwargs: Vec<String>,

    /// Write the fitted word vectors to this file (single method only)
    #[arg(long)]
    save_vectors: Option<String>,
}

/// Configuration file format.
#[derive(Debug, Default, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub method: Option<MethodSpec>,

    #[serde(flatten)]
    pub embedder: EmbedderConfig,
}

impl EmbedCommand {
    /// Merge the config file with command-line overrides.
    fn resolve(&self, file: RunConfig) -> anyhow::Result<(MethodSpec, EmbedderConfig)> {
        let spec = match self.methods.as_slice() {
            [] => file.method.unwrap_or_default(),
            [one] => MethodSpec::Single(one.parse()?),
            many => MethodSpec::Many(
                many.iter()
                    .map(|m| m.parse::<Method>().map(MethodSpec::Single))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        let mut cfg = file.embedder;
        if self.idf {
            cfg.use_idf_weights = true;
        }
        for raw in &self.kwargs {
            let (key, value) = parse_kwarg(raw)?;
            cfg.embedding_kwargs.insert(key, value);
        }
        Ok((spec, cfg))
    }

    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let file = match &cli.config {
            Some(path) => load_request::<RunConfig>(path)?,
            None => RunConfig::default(),
        };
        let (spec, cfg) = self.resolve(file)?;

        let target = corpus::load(&self.input)?;
        let train = match &self.fit_on {
            Some(path) => Some(corpus::load(path)?),
            None => None,
        };
        let train = train.as_ref().unwrap_or(&target);

        let mut embedder = factory::build(&spec, &cfg)?;
        let name = embedder.name();
        info!(
            embedder = %name,
            idf = cfg.use_idf_weights,
            train_documents = train.documents.len(),
            documents = target.documents.len(),
            "embedding corpus"
        );

        embedder
            .fit(&train.documents, train.labels())
            .with_context(|| format!("fit {name}"))?;
        let matrix = embedder.transform(&target.documents)?;

        if let Some(path) = &self.save_vectors {
            let vectors = embedder
                .vectors()
                .ok_or_else(|| anyhow::anyhow!("--save-vectors needs a single method"))?;
            vecfile::save(vectors, Path::new(path))?;
            info!(path = %path, words = vectors.len(), "saved word vectors");
        }

        output_matrix(&matrix, cli.output.as_deref(), cli.json)
    }
}
