//! Corpus file reading.
//!
//! One document per line, tokens separated by whitespace. A line may start
//! with `__label__<name>` tokens; the first one becomes the document's label
//! and all of them are removed from the tokens.

use std::path::Path;

use anyhow::{Context, bail};
use docembed::{Document, LABEL_PREFIX};

/// A corpus with optional per-document labels.
#[derive(Debug, Default, PartialEq)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub labels: Option<Vec<String>>,
}

impl Corpus {
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }
}

/// Parse corpus text. Labels must be given on every line or on none.
pub fn parse(text: &str) -> anyhow::Result<Corpus> {
    let mut documents = Vec::new();
    let mut labels = Vec::new();

    for line in text.lines() {
        let mut label = None;
        let mut tokens = Vec::new();
        for token in line.split_whitespace() {
            match token.strip_prefix(LABEL_PREFIX) {
                Some(name) if tokens.is_empty() => {
                    label.get_or_insert_with(|| name.to_string());
                }
                _ => tokens.push(token.to_string()),
            }
        }
        documents.push(tokens);
        labels.push(label);
    }

    let labelled = labels.iter().filter(|l| l.is_some()).count();
    let labels = match labelled {
        0 => None,
        n if n == documents.len() => Some(labels.into_iter().flatten().collect()),
        n => bail!(
            "{n} of {} documents are labelled; label every line or none",
            documents.len()
        ),
    };

    Ok(Corpus { documents, labels })
}

/// Read and parse a corpus file.
pub fn load(path: &str) -> anyhow::Result<Corpus> {
    let text = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("read corpus {path}"))?;
    parse(&text).with_context(|| format!("parse corpus {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unlabelled() {
        let c = parse("the cat sat\n\ndog\n").unwrap();
        assert_eq!(c.documents.len(), 3);
        assert_eq!(c.documents[0], vec!["the", "cat", "sat"]);
        assert!(c.documents[1].is_empty());
        assert!(c.labels.is_none());
    }

    #[test]
    fn test_parse_labelled() {
        let c = parse("__label__pos great film\n__label__neg __label__meh dull\n").unwrap();
        assert_eq!(c.labels(), Some(&["pos".to_string(), "neg".to_string()][..]));
        assert_eq!(c.documents[0], vec!["great", "film"]);
        assert_eq!(c.documents[1], vec!["dull"]);
    }

    #[test]
    fn test_label_token_inside_text_is_kept() {
        let c = parse("__label__pos see __label__x\n").unwrap();
        assert_eq!(c.documents[0], vec!["see", "__label__x"]);
    }

    #[test]
    fn test_mixed_labels_rejected() {
        assert!(parse("__label__pos a\nb\n").is_err());
    }
}
