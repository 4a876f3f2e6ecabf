use std::collections::HashMap;

use crate::error::EmbedError;

/// WordVectors maps word tokens to dense float32 vectors of one shared
/// dimensionality.
///
/// Keys are exact-match strings; no case folding or normalization is
/// applied. The mapping is immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordVectors {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Create an empty mapping with a declared dimensionality.
    pub fn with_dimension(dim: usize) -> Self {
        Self {
            dim,
            vectors: HashMap::new(),
        }
    }

    /// Build a mapping from `(token, vector)` pairs.
    ///
    /// The first vector fixes the dimensionality; any later vector of a
    /// different length is rejected. A repeated token keeps its last vector.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, EmbedError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut wv = Self::default();
        let mut dim = None;
        for (token, vector) in pairs {
            let token = token.into();
            match dim {
                None => dim = Some(vector.len()),
                Some(want) if want != vector.len() => {
                    return Err(EmbedError::DimensionMismatch {
                        token,
                        got: vector.len(),
                        want,
                    });
                }
                Some(_) => {}
            }
            wv.vectors.insert(token, vector);
        }
        wv.dim = dim.unwrap_or(0);
        Ok(wv)
    }

    /// Add or replace a token's vector.
    pub fn insert(&mut self, token: &str, vector: Vec<f32>) -> Result<(), EmbedError> {
        if self.vectors.is_empty() && self.dim == 0 {
            self.dim = vector.len();
        } else if vector.len() != self.dim {
            return Err(EmbedError::DimensionMismatch {
                token: token.to_string(),
                got: vector.len(),
                want: self.dim,
            });
        }
        self.vectors.insert(token.to_string(), vector);
        Ok(())
    }

    /// Keep only the tokens for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.vectors.retain(|token, _| keep(token));
    }

    pub fn get(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    /// Return the dimensionality shared by all vectors.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.vectors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let wv = WordVectors::from_pairs([("cat", vec![1.0, 0.0]), ("dog", vec![1.0, 1.0])]).unwrap();
        assert_eq!(wv.len(), 2);
        assert_eq!(wv.dimension(), 2);
        assert_eq!(wv.get("cat"), Some(&[1.0, 0.0][..]));
        assert!(wv.get("Cat").is_none());
    }

    #[test]
    fn test_from_pairs_dimension_mismatch() {
        let err = WordVectors::from_pairs([("a", vec![1.0, 0.0]), ("b", vec![1.0])]).unwrap_err();
        match err {
            EmbedError::DimensionMismatch { token, got, want } => {
                assert_eq!(token, "b");
                assert_eq!(got, 1);
                assert_eq!(want, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty() {
        let wv = WordVectors::from_pairs(Vec::<(String, Vec<f32>)>::new()).unwrap();
        assert!(wv.is_empty());
        assert_eq!(wv.dimension(), 0);
        assert_eq!(WordVectors::with_dimension(8).dimension(), 8);
    }

    #[test]
    fn test_insert() {
        let mut wv = WordVectors::with_dimension(3);
        wv.insert("a", vec![1.0, 2.0, 3.0]).unwrap();
        assert!(wv.insert("b", vec![1.0]).is_err());

        let mut lazy = WordVectors::default();
        lazy.insert("a", vec![1.0, 2.0]).unwrap();
        assert_eq!(lazy.dimension(), 2);
    }

    #[test]
    fn test_retain() {
        let mut wv = WordVectors::from_pairs([
            ("_*0", vec![0.0]),
            ("cat", vec![1.0]),
            ("_*1", vec![0.0]),
        ])
        .unwrap();
        wv.retain(|t| !t.starts_with("_*"));
        assert_eq!(wv.len(), 1);
        assert!(wv.contains("cat"));
        assert_eq!(wv.dimension(), 1);
    }
}
