//! docembed CLI - embed tokenized corpora with word-vector backends.

use clap::{Parser, Subcommand};

mod commands;
mod corpus;

use commands::{EmbedCommand, MethodsCommand};

/// docembed CLI - turn tokenized documents into fixed-length vectors.
///
/// Word vectors come from one of the supported backends (word2vec,
/// fasttext, doc2vec, pre-trained-from-file, starspace) or a combination
/// of them, and are averaged per document, optionally IDF-weighted.
#[derive(Parser)]
#[command(name = "docembed")]
#[command(about = "Document embeddings from word-vector backends")]
#[command(version)]
pub struct Cli {
    /// Config file (YAML or JSON) with method, use_idf_weights and
    /// embedding_kwargs
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON instead of tab-separated rows
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit an embedder on a corpus and write the document matrix
    Embed(EmbedCommand),
    /// List the supported embedding methods
    Methods(MethodsCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Embed(cmd) => cmd.run(&cli),
        Commands::Methods(cmd) => cmd.run(&cli),
    }
}
