use tracing::{debug, warn};

use crate::embedder::{DocEmbedder, Matrix};
use crate::error::EmbedError;
use crate::provider::Document;

/// CompositeEmbedder combines several embedders into one by concatenating
/// their document vectors in child order.
///
/// Child dimensionalities may differ; the output width is their sum.
pub struct CompositeEmbedder {
    children: Vec<Box<dyn DocEmbedder>>,
}

impl CompositeEmbedder {
    /// Returns `InvalidConfiguration` when `children` is empty.
    pub fn new(children: Vec<Box<dyn DocEmbedder>>) -> Result<Self, EmbedError> {
        if children.is_empty() {
            return Err(EmbedError::InvalidConfiguration(
                "composite embedder needs at least one child".into(),
            ));
        }
        Ok(Self { children })
    }

    pub fn children(&self) -> &[Box<dyn DocEmbedder>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl DocEmbedder for CompositeEmbedder {
    fn fit(
        &mut self,
        corpus: &[Document],
        labels: Option<&[String]>,
    ) -> Result<&mut dyn DocEmbedder, EmbedError> {
        for i in 0..self.children.len() {
            let fitted = self.children[i].fit(corpus, labels).map(|_| ());
            if let Err(e) = fitted {
                warn!(
                    child = i,
                    embedder = %self.children[i].name(),
                    error = %e,
                    "docembed: composite fit failed"
                );
                self.reset();
                return Err(e);
            }
        }
        debug!(
            children = self.children.len(),
            dim = self.dimension(),
            "docembed: composite fitted"
        );
        Ok(self)
    }

    fn transform(&self, corpus: &[Document]) -> Result<Matrix, EmbedError> {
        let mut rows: Matrix = vec![Vec::new(); corpus.len()];
        for child in &self.children {
            let part = child.transform(corpus)?;
            for (row, child_row) in rows.iter_mut().zip(part) {
                row.extend(child_row);
            }
        }
        Ok(rows)
    }

    fn dimension(&self) -> Option<usize> {
        self.children.iter().map(|c| c.dimension()).sum()
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }

    fn name(&self) -> String {
        let names: Vec<String> = self.children.iter().map(|c| c.name()).collect();
        format!("composite[{}]", names.join(","))
    }
}
