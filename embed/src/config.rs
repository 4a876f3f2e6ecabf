use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EmbedError;

/// Free-form keyword arguments handed unmodified to a backend's
/// mapping-construction step.
pub type EmbeddingKwargs = Map<String, Value>;

/// Builder-style configuration shared by every document embedder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Weight tokens by inverse document frequency when averaging.
    #[serde(default)]
    pub use_idf_weights: bool,

    /// Backend-specific options.
    #[serde(default)]
    pub embedding_kwargs: EmbeddingKwargs,
}

impl EmbedderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idf_weights(mut self, enabled: bool) -> Self {
        self.use_idf_weights = enabled;
        self
    }

    pub fn with_kwarg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.embedding_kwargs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_kwargs(mut self, kwargs: EmbeddingKwargs) -> Self {
        self.embedding_kwargs = kwargs;
        self
    }
}

fn invalid(key: &str, want: &str, got: &Value) -> EmbedError {
    EmbedError::InvalidConfiguration(format!("embedding_kwargs.{key}: want {want}, got {got}"))
}

pub(crate) fn kwarg_str(kwargs: &EmbeddingKwargs, key: &str) -> Result<Option<String>, EmbedError> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v) => Err(invalid(key, "string", v)),
    }
}

pub(crate) fn kwarg_usize(kwargs: &EmbeddingKwargs, key: &str, default: usize) -> Result<usize, EmbedError> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| invalid(key, "non-negative integer", v)),
    }
}

pub(crate) fn kwarg_opt_usize(kwargs: &EmbeddingKwargs, key: &str) -> Result<Option<usize>, EmbedError> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| invalid(key, "non-negative integer", v)),
    }
}

pub(crate) fn kwarg_bool(kwargs: &EmbeddingKwargs, key: &str, default: bool) -> Result<bool, EmbedError> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(v) => Err(invalid(key, "bool", v)),
    }
}

/// Reads a list of extra command-line arguments. Numbers and bools are
/// stringified so YAML like `[-neg, 10]` works.
pub(crate) fn kwarg_args(kwargs: &EmbeddingKwargs, key: &str) -> Result<Vec<String>, EmbedError> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(invalid(key, "list of scalars", other)),
            })
            .collect(),
        Some(v) => Err(invalid(key, "list", v)),
    }
}
