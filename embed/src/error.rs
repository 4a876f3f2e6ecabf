use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("docembed: invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("docembed: embedder used before fit")]
    NotFitted,

    #[error("docembed: label count mismatch: {documents} documents, {labels} labels")]
    LabelCountMismatch { documents: usize, labels: usize },

    #[error("docembed: dimension mismatch for token {token:?}: got {got}, want {want}")]
    DimensionMismatch {
        token: String,
        got: usize,
        want: usize,
    },

    #[error("docembed: invalid format: {0}")]
    InvalidFormat(String),

    #[error("docembed: {0}")]
    Io(String),

    #[error("docembed: trainer error: {0}")]
    Trainer(String),
}

impl From<std::io::Error> for EmbedError {
    fn from(e: std::io::Error) -> Self {
        EmbedError::Io(e.to_string())
    }
}
