use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::composite::CompositeEmbedder;
use crate::config::EmbedderConfig;
use crate::doc2vec::Doc2Vec;
use crate::embedder::{DocEmbedder, Embedder};
use crate::error::EmbedError;
use crate::fasttext::FastText;
use crate::pretrained::PreTrainedFromFile;
use crate::provider::WordEmbeddingProvider;
use crate::starspace::StarSpace;
use crate::word2vec::Word2Vec;

/// Method identifies a word-vector backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Word2Vec,
    FastText,
    Doc2Vec,
    PreTrainedFromFile,
    StarSpace,
}

type Constructor = fn(&EmbedderConfig) -> Result<Box<dyn DocEmbedder>, EmbedError>;

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Word2Vec,
        Method::FastText,
        Method::Doc2Vec,
        Method::PreTrainedFromFile,
        Method::StarSpace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Word2Vec => "word2vec",
            Method::FastText => "fasttext",
            Method::Doc2Vec => "doc2vec",
            Method::PreTrainedFromFile => "pre-trained-from-file",
            Method::StarSpace => "starspace",
        }
    }

    fn constructor(self) -> Constructor {
        match self {
            Method::Word2Vec => |cfg| Ok(boxed(Word2Vec::from_kwargs(&cfg.embedding_kwargs)?, cfg)),
            Method::FastText => |cfg| Ok(boxed(FastText::from_kwargs(&cfg.embedding_kwargs)?, cfg)),
            Method::Doc2Vec => |cfg| Ok(boxed(Doc2Vec::from_kwargs(&cfg.embedding_kwargs)?, cfg)),
            Method::PreTrainedFromFile => {
                |cfg| Ok(boxed(PreTrainedFromFile::from_kwargs(&cfg.embedding_kwargs)?, cfg))
            }
            Method::StarSpace => |cfg| Ok(boxed(StarSpace::from_kwargs(&cfg.embedding_kwargs)?, cfg)),
        }
    }
}

fn boxed<P: WordEmbeddingProvider + 'static>(provider: P, cfg: &EmbedderConfig) -> Box<dyn DocEmbedder> {
    Box::new(Embedder::with_config(provider, cfg))
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| EmbedError::InvalidConfiguration(format!("method {s:?} not implemented")))
    }
}

/// MethodSpec selects one backend or an ordered combination of backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSpec {
    Single(Method),
    Many(Vec<MethodSpec>),
}

impl MethodSpec {
    /// Parse a configuration value: a method name or a list of them.
    pub fn from_value(value: &Value) -> Result<Self, EmbedError> {
        match value {
            Value::String(s) => Ok(MethodSpec::Single(s.parse()?)),
            Value::Array(items) => Ok(MethodSpec::Many(
                items.iter().map(Self::from_value).collect::<Result<Vec<_>, _>>()?,
            )),
            other => Err(EmbedError::InvalidConfiguration(format!(
                "method must be specified as either a string or a list, got {other}"
            ))),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MethodSpec::Single(m) => Value::String(m.as_str().to_string()),
            MethodSpec::Many(specs) => Value::Array(specs.iter().map(Self::to_value).collect()),
        }
    }
}

impl Default for MethodSpec {
    fn default() -> Self {
        MethodSpec::Single(Method::Word2Vec)
    }
}

impl From<Method> for MethodSpec {
    fn from(m: Method) -> Self {
        MethodSpec::Single(m)
    }
}

impl From<Vec<Method>> for MethodSpec {
    fn from(ms: Vec<Method>) -> Self {
        MethodSpec::Many(ms.into_iter().map(MethodSpec::Single).collect())
    }
}

impl FromStr for MethodSpec {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MethodSpec::Single(s.parse()?))
    }
}

impl Serialize for MethodSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MethodSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        MethodSpec::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Construct the embedder for `spec`.
///
/// A single method yields its backend's [`Embedder`]; a list yields a
/// [`CompositeEmbedder`] whose children are built recursively with the same
/// configuration, in list order.
pub fn build(spec: &MethodSpec, cfg: &EmbedderConfig) -> Result<Box<dyn DocEmbedder>, EmbedError> {
    match spec {
        MethodSpec::Single(method) => {
            debug!(%method, idf = cfg.use_idf_weights, "docembed: building embedder");
            method.constructor()(cfg)
        }
        MethodSpec::Many(specs) => Ok(Box::new(build_composite(specs, cfg)?)),
    }
}

/// Construct a [`CompositeEmbedder`] with one child per spec.
pub fn build_composite(specs: &[MethodSpec], cfg: &EmbedderConfig) -> Result<CompositeEmbedder, EmbedError> {
    let children = specs
        .iter()
        .map(|spec| build(spec, cfg))
        .collect::<Result<Vec<_>, _>>()?;
    CompositeEmbedder::new(children)
}

/// Construct an embedder from a method name.
pub fn from_name(name: &str, cfg: &EmbedderConfig) -> Result<Box<dyn DocEmbedder>, EmbedError> {
    build(&name.parse()?, cfg)
}

/// Construct an embedder from a configuration value (string or list).
pub fn from_value(value: &Value, cfg: &EmbedderConfig) -> Result<Box<dyn DocEmbedder>, EmbedError> {
    build(&MethodSpec::from_value(value)?, cfg)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_method_names() {
        for m in Method::ALL {
            assert_eq!(m.as_str().parse::<Method>().unwrap(), m);
        }
        assert_eq!(Method::PreTrainedFromFile.to_string(), "pre-trained-from-file");
    }

    #[test]
    fn test_unknown_method() {
        let err = from_name("bogus", &EmbedderConfig::new()).err().unwrap();
        match err {
            EmbedError::InvalidConfiguration(msg) => assert!(msg.contains("bogus"), "got {msg}"),
            other => panic!("unexpected error: {other}"),
        }
        // Names are matched exactly.
        assert!("Word2Vec".parse::<Method>().is_err());
    }

    #[test]
    fn test_single_method() {
        let e = from_name("word2vec", &EmbedderConfig::new()).unwrap();
        assert_eq!(e.name(), "word2vec");
        assert!(!e.is_fitted());
    }

    #[test]
    fn test_list_builds_composite_in_order() {
        let spec = MethodSpec::from_value(&json!(["word2vec", "doc2vec"])).unwrap();
        let MethodSpec::Many(specs) = &spec else {
            panic!("expected a list spec");
        };
        let composite = build_composite(specs, &EmbedderConfig::new()).unwrap();
        assert_eq!(composite.len(), 2);
        assert_eq!(composite.children()[0].name(), "word2vec");
        assert_eq!(composite.children()[1].name(), "doc2vec");

        let boxed = build(&spec, &EmbedderConfig::new()).unwrap();
        assert_eq!(boxed.name(), "composite[word2vec,doc2vec]");
    }

    #[test]
    fn test_nested_lists() {
        let e = from_value(&json!(["fasttext", ["starspace", "word2vec"]]), &EmbedderConfig::new()).unwrap();
        assert_eq!(e.name(), "composite[fasttext,composite[starspace,word2vec]]");
    }

    #[test]
    fn test_invalid_values() {
        let cfg = EmbedderConfig::new();
        for value in [json!(42), json!({"method": "word2vec"}), json!(null), json!([])] {
            assert!(
                matches!(from_value(&value, &cfg), Err(EmbedError::InvalidConfiguration(_))),
                "value {value} should be rejected"
            );
        }
        assert!(from_value(&json!(["word2vec", "bogus"]), &cfg).is_err());
    }

    #[test]
    fn test_kwargs_validated_at_construction() {
        // pre-trained-from-file needs a path.
        let err = from_name("pre-trained-from-file", &EmbedderConfig::new()).err().unwrap();
        assert!(matches!(err, EmbedError::InvalidConfiguration(_)));

        let cfg = EmbedderConfig::new().with_kwarg("path", "vectors.txt");
        assert!(from_name("pre-trained-from-file", &cfg).is_ok());
    }

    #[test]
    fn test_serde() {
        let spec: MethodSpec = serde_yaml::from_str("[word2vec, pre-trained-from-file]").unwrap();
        assert_eq!(
            spec,
            MethodSpec::from(vec![Method::Word2Vec, Method::PreTrainedFromFile])
        );
        assert_eq!(
            serde_json::to_string(&spec).unwrap(),
            r#"["word2vec","pre-trained-from-file"]"#
        );
        assert!(serde_yaml::from_str::<MethodSpec>("7").is_err());
    }
}
