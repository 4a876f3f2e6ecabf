//! Document embeddings built from word vectors.
//!
//! A [`WordEmbeddingProvider`] supplies a token-to-vector mapping; an
//! [`Embedder`] fits that mapping (optionally with IDF weights) and averages
//! the word vectors of each document. [`factory::build`] picks a backend by
//! name, or combines several into a [`CompositeEmbedder`].

pub mod aggregate;
pub mod composite;
pub mod config;
pub mod doc2vec;
pub mod embedder;
pub mod error;
pub mod factory;
pub mod fasttext;
pub mod idf;
pub mod pretrained;
pub mod provider;
pub mod starspace;
pub(crate) mod trainer;
pub mod vecfile;
pub mod vectors;
pub mod word2vec;

pub use aggregate::Aggregation;
pub use composite::CompositeEmbedder;
pub use config::{EmbedderConfig, EmbeddingKwargs};
pub use doc2vec::Doc2Vec;
pub use embedder::{DocEmbedder, Embedder, Matrix};
pub use error::EmbedError;
pub use factory::{Method, MethodSpec};
pub use fasttext::{FastText, FastTextModel};
pub use idf::IdfWeights;
pub use pretrained::PreTrainedFromFile;
pub use provider::{Document, StaticProvider, WordEmbeddingProvider};
pub use starspace::StarSpace;
pub use trainer::LABEL_PREFIX;
pub use vectors::WordVectors;
pub use word2vec::{Word2Vec, Word2VecParams};
