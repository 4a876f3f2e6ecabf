//! Word-vector file formats.
//!
//! Text format (word2vec `-binary 0`, fastText `.vec`, StarSpace `.tsv`):
//!
//! ```text
//! [<count> <dim>]            optional header
//! <token> <f1> ... <fdim>    fields separated by spaces or tabs
//! ```
//!
//! Binary format (word2vec `-binary 1`):
//!
//! ```text
//! <count> <dim>\n
//! For each word:
//!   <token bytes> ' ' [dim x 4B float32, little-endian] ['\n']
//! ```
//!
//! Files with a header are decoded by `finalfusion`. Headerless text
//! (StarSpace) is parsed row by row here.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use finalfusion::prelude::{Embeddings, ReadTextDims, ReadWord2Vec};
use finalfusion::storage::NdArray;
use finalfusion::vocab::SimpleVocab;

use crate::error::EmbedError;
use crate::vectors::WordVectors;

type Decoded = Embeddings<SimpleVocab, NdArray>;

/// Options for reading a vector file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Parse the word2vec binary format instead of text.
    pub binary: bool,

    /// Keep only the first this many words.
    pub limit: Option<usize>,
}

/// Load a vector file from disk.
pub fn load(path: &Path, opts: ReadOptions) -> Result<WordVectors, EmbedError> {
    let file = File::open(path)
        .map_err(|e| EmbedError::Io(format!("open {}: {e}", path.display())))?;
    let len = file.metadata()?.len();
    let r = BufReader::new(file);
    if opts.binary {
        read_binary(r, len, opts.limit)
    } else {
        read_text(r, len, opts.limit)
    }
}

/// The `<count> <dim>` line that starts word2vec and fastText files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    count: usize,
    dim: usize,
}

impl Header {
    fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [count, dim] => Some(Self {
                count: count.parse().ok()?,
                dim: dim.parse().ok()?,
            }),
            _ => None,
        }
    }

    /// Reject headers that declare more values than `len` bytes can hold,
    /// at `min_bytes` bytes per value.
    fn check(&self, len: u64, min_bytes: u64) -> Result<(), EmbedError> {
        if self.dim == 0 || u32::try_from(self.dim).is_err() {
            return Err(EmbedError::InvalidFormat(format!(
                "invalid dimension {}",
                self.dim
            )));
        }
        let need = (self.count as u64)
            .checked_mul(self.dim as u64)
            .and_then(|n| n.checked_mul(min_bytes));
        match need {
            Some(n) if n <= len => Ok(()),
            _ => Err(EmbedError::InvalidFormat(format!(
                "header declares {} x {} values, file has {len} bytes",
                self.count, self.dim
            ))),
        }
    }

    fn line(&self) -> Vec<u8> {
        format!("{} {}\n", self.count, self.dim).into_bytes()
    }
}

fn decode_error(e: impl std::fmt::Display) -> EmbedError {
    EmbedError::InvalidFormat(e.to_string())
}

/// Copy decoded embeddings into a mapping. `finalfusion` stores vectors
/// l2-normalized, so each is scaled back by its norm (in f64, to stay
/// within one ulp of the file's value).
fn from_decoded(
    embeds: &Decoded,
    dim: usize,
    limit: Option<usize>,
) -> Result<WordVectors, EmbedError> {
    let mut wv = WordVectors::with_dimension(dim);
    for (token, e) in embeds.iter_with_norms().take(limit.unwrap_or(usize::MAX)) {
        let norm = f64::from(e.norm);
        let vector = e
            .embedding
            .iter()
            .map(|&v| (f64::from(v) * norm) as f32)
            .collect();
        wv.insert(token, vector)?;
    }
    Ok(wv)
}

/// Read the text format from `r`, which holds `len` bytes.
///
/// The header, when present, is the first non-blank line.
pub fn read_text<R: BufRead>(
    mut r: R,
    len: u64,
    limit: Option<usize>,
) -> Result<WordVectors, EmbedError> {
    let mut first = String::new();
    let mut lineno = 0usize;
    loop {
        first.clear();
        if r.read_line(&mut first)? == 0 {
            return Ok(WordVectors::default());
        }
        lineno += 1;
        if !first.trim().is_empty() {
            break;
        }
    }

    match Header::parse(&first) {
        Some(header) => {
            header.check(len, 1)?;
            let mut r = BufReader::new(Cursor::new(header.line()).chain(r));
            let embeds = Decoded::read_text_dims(&mut r).map_err(decode_error)?;
            from_decoded(&embeds, header.dim, limit)
        }
        None => read_rows(first, lineno, r, limit),
    }
}

/// Parse headerless rows, starting with the already-read `first` line.
fn read_rows<R: BufRead>(
    first: String,
    mut lineno: usize,
    mut r: R,
    limit: Option<usize>,
) -> Result<WordVectors, EmbedError> {
    let mut wv = WordVectors::default();
    let mut line = first;

    loop {
        if limit.is_some_and(|n| wv.len() >= n) {
            break;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if let Some((token, values)) = fields.split_first() {
            let vector = values
                .iter()
                .map(|f| f.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| EmbedError::InvalidFormat(format!("line {lineno}: {e}")))?;
            wv.insert(token, vector)?;
        }

        line.clear();
        if r.read_line(&mut line)? == 0 {
            break;
        }
        lineno += 1;
    }

    Ok(wv)
}

/// Read the word2vec binary format from `r`, which holds `len` bytes.
pub fn read_binary<R: BufRead>(
    mut r: R,
    len: u64,
    limit: Option<usize>,
) -> Result<WordVectors, EmbedError> {
    let mut raw = Vec::new();
    r.read_until(b'\n', &mut raw)?;
    let header = std::str::from_utf8(&raw)
        .ok()
        .and_then(Header::parse)
        .ok_or_else(|| {
            EmbedError::InvalidFormat(format!(
                "invalid header {:?}",
                String::from_utf8_lossy(&raw).trim_end()
            ))
        })?;
    header.check(len, 4)?;

    let mut r = BufReader::new(Cursor::new(header.line()).chain(r));
    let embeds = Decoded::read_word2vec_binary(&mut r).map_err(decode_error)?;
    from_decoded(&embeds, header.dim, limit)
}

/// Write the text format with a `<count> <dim>` header. Tokens are sorted
/// so output is reproducible.
pub fn write_text(wv: &WordVectors, w: &mut dyn Write) -> Result<(), EmbedError> {
    let mut bw = BufWriter::new(w);
    writeln!(bw, "{} {}", wv.len(), wv.dimension())?;

    let mut entries: Vec<(&str, &[f32])> = wv.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (token, vector) in entries {
        bw.write_all(token.as_bytes())?;
        for v in vector {
            write!(bw, " {v}")?;
        }
        bw.write_all(b"\n")?;
    }

    bw.flush()?;
    Ok(())
}

/// Write the text format to a file.
pub fn save(wv: &WordVectors, path: &Path) -> Result<(), EmbedError> {
    let mut file = File::create(path)
        .map_err(|e| EmbedError::Io(format!("create {}: {e}", path.display())))?;
    write_text(wv, &mut file)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn assert_close(got: Option<&[f32]>, want: &[f32]) {
        let got = got.expect("token missing");
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-5, "got {got:?}, want {want:?}");
        }
    }

    fn text(data: &str) -> Result<WordVectors, EmbedError> {
        read_text(Cursor::new(data), data.len() as u64, None)
    }

    fn binary(data: &[u8]) -> Result<WordVectors, EmbedError> {
        read_binary(Cursor::new(data), data.len() as u64, None)
    }

    fn binary_fixture(words: &[(&str, &[f32])]) -> Vec<u8> {
        let dim = words[0].1.len();
        let mut buf = format!("{} {}\n", words.len(), dim).into_bytes();
        for (token, vector) in words {
            buf.extend_from_slice(token.as_bytes());
            buf.push(b' ');
            for v in *vector {
                buf.extend_from_slice(&v.to_le_bytes());
            }
            buf.push(b'\n');
        }
        buf
    }

    #[test]
    fn test_read_text_with_header() {
        let wv = text("3 2\ncat 1 0\nsat 0 1\ndog 1.5 -1\n").unwrap();
        assert_eq!(wv.len(), 3);
        assert_eq!(wv.dimension(), 2);
        assert_close(wv.get("cat"), &[1.0, 0.0]);
        assert_close(wv.get("dog"), &[1.5, -1.0]);
    }

    #[test]
    fn test_read_text_header_after_blank_lines() {
        let wv = text("\n  \n2 2\ncat 1 0\ndog 0 1\n").unwrap();
        assert_eq!(wv.len(), 2);
        assert_eq!(wv.dimension(), 2);
        assert!(!wv.contains("2"));
        assert_close(wv.get("dog"), &[0.0, 1.0]);
    }

    #[test]
    fn test_read_text_tsv_without_header() {
        let wv = text("cat\t0.5\t0.25\t1\n\n__label__pos\t1\t1\t1\n").unwrap();
        assert_eq!(wv.len(), 2);
        assert_eq!(wv.dimension(), 3);
        assert_eq!(wv.get("cat"), Some(&[0.5, 0.25, 1.0][..]));
    }

    #[test]
    fn test_read_text_header_dimension_enforced() {
        assert!(matches!(text("1 3\ncat 1 0\n"), Err(EmbedError::InvalidFormat(_))));
    }

    #[test]
    fn test_read_text_header_too_large() {
        let err = text("1 4611686018427387904\ncat 1\n").unwrap_err();
        assert!(matches!(err, EmbedError::InvalidFormat(_)));
        let err = text("4611686018427387904 2\ncat 1 0\n").unwrap_err();
        assert!(matches!(err, EmbedError::InvalidFormat(_)));
    }

    #[test]
    fn test_read_text_invalid_number() {
        match text("cat 1 x\n").unwrap_err() {
            EmbedError::InvalidFormat(msg) => assert!(msg.starts_with("line 1"), "got {msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_text_limit() {
        let data = "a 1\nb 2\nc 3\n";
        let wv = read_text(Cursor::new(data), data.len() as u64, Some(2)).unwrap();
        assert_eq!(wv.len(), 2);
        assert!(!wv.contains("c"));

        let data = "3 1\na 1\nb 2\nc 3\n";
        let wv = read_text(Cursor::new(data), data.len() as u64, Some(2)).unwrap();
        assert_eq!(wv.len(), 2);
        assert!(wv.contains("a") && wv.contains("b"));
    }

    #[test]
    fn test_read_text_empty() {
        assert!(text("").unwrap().is_empty());
        assert!(text("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_read_binary() {
        let data = binary_fixture(&[("cat", &[1.0, 0.5]), ("dög", &[-2.0, 0.0])]);
        let wv = binary(&data).unwrap();
        assert_eq!(wv.len(), 2);
        assert_close(wv.get("cat"), &[1.0, 0.5]);
        assert_close(wv.get("dög"), &[-2.0, 0.0]);
    }

    #[test]
    fn test_read_binary_zero_vector() {
        let data = binary_fixture(&[("</s>", &[0.0, 0.0]), ("cat", &[3.0, 4.0])]);
        let wv = binary(&data).unwrap();
        assert_eq!(wv.get("</s>"), Some(&[0.0, 0.0][..]));
        assert_close(wv.get("cat"), &[3.0, 4.0]);
    }

    #[test]
    fn test_read_binary_huge_dimension() {
        let err = binary(b"1 4611686018427387904\ncat \x00\x00\x80\x3f").unwrap_err();
        assert!(matches!(err, EmbedError::InvalidFormat(_)));
    }

    #[test]
    fn test_read_binary_truncated() {
        let mut data = binary_fixture(&[("cat", &[1.0, 0.5])]);
        data.truncate(data.len() - 3);
        assert!(matches!(binary(&data), Err(EmbedError::InvalidFormat(_))));
    }

    #[test]
    fn test_read_binary_bad_header() {
        assert!(matches!(binary(b"garbage\n"), Err(EmbedError::InvalidFormat(_))));
        assert!(matches!(binary(b"1 0\n"), Err(EmbedError::InvalidFormat(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.txt");
        let wv = WordVectors::from_pairs([("b", vec![0.25, 1.0]), ("a", vec![-1.0, 2.5])]).unwrap();
        save(&wv, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2 2\na -1 2.5\nb 0.25 1\n");

        let loaded = load(&path, ReadOptions::default()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_close(loaded.get("a"), &[-1.0, 2.5]);
        assert_close(loaded.get("b"), &[0.25, 1.0]);
    }

    #[test]
    fn test_load_binary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.bin");
        std::fs::write(&path, binary_fixture(&[("cat", &[1.0, 0.0])])).unwrap();
        let opts = ReadOptions {
            binary: true,
            limit: None,
        };
        assert_close(load(&path, opts).unwrap().get("cat"), &[1.0, 0.0]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/vectors.txt"), ReadOptions::default()).unwrap_err();
        assert!(matches!(err, EmbedError::Io(_)));
    }
}
