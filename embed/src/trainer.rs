use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use tracing::debug;

use crate::error::EmbedError;

/// Prefix the reference trainers use to mark label tokens.
pub const LABEL_PREFIX: &str = "__label__";

/// Scratch directory for one trainer run. Removed on drop, whether the
/// run succeeded or not.
pub(crate) fn workdir() -> Result<TempDir, EmbedError> {
    tempfile::Builder::new()
        .prefix("docembed-")
        .tempdir()
        .map_err(|e| EmbedError::Io(format!("create temp dir: {e}")))
}

/// Write one line per document.
pub(crate) fn write_corpus<I, S>(path: &Path, lines: I) -> Result<(), EmbedError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = File::create(path)
        .map_err(|e| EmbedError::Io(format!("create {}: {e}", path.display())))?;
    let mut w = BufWriter::new(file);
    for line in lines {
        w.write_all(line.as_ref().as_bytes())?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

/// Return `label` with the trainer label prefix.
pub(crate) fn label_token(label: &str) -> String {
    format!("{LABEL_PREFIX}{label}")
}

/// The distinct label tokens written for `labels`.
pub(crate) fn label_tokens(labels: &[String]) -> HashSet<String> {
    labels.iter().map(|l| label_token(l)).collect()
}

/// Run an external trainer to completion.
pub(crate) fn run(program: &str, args: &[OsString]) -> Result<(), EmbedError> {
    debug!(program, args = ?args, "docembed: running trainer");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| EmbedError::Trainer(format!("spawn {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EmbedError::Trainer(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Builds an argument list of flags and values.
#[derive(Debug, Default)]
pub(crate) struct Args(Vec<OsString>);

impl Args {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn arg(mut self, a: impl Into<OsString>) -> Self {
        self.0.push(a.into());
        self
    }

    pub(crate) fn flag(self, name: &str, value: impl ToString) -> Self {
        self.arg(name).arg(value.to_string())
    }

    pub(crate) fn path(self, name: &str, value: &Path) -> Self {
        self.arg(name).arg(value.as_os_str())
    }

    pub(crate) fn extend(mut self, extra: &[String]) -> Self {
        self.0.extend(extra.iter().map(OsString::from));
        self
    }

    pub(crate) fn build(self) -> Vec<OsString> {
        self.0
    }
}

#[cfg(all(test, unix))]
pub(crate) mod testing {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard};

    /// Held while writing and executing fake trainers so no other test
    /// forks while a script is still open for writing.
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    pub(crate) fn lock() -> MutexGuard<'static, ()> {
        SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Write an executable shell script that records its arguments to
    /// `args.txt` and the file following `input_flag` to `corpus.txt`, then
    /// runs `body`.
    pub(crate) fn fake_trainer(dir: &Path, input_flag: &str, body: &str) -> PathBuf {
        let path = dir.join("trainer.sh");
        let script = format!(
            r#"#!/bin/sh
here="$(dirname "$0")"
echo "$*" > "$here/args.txt"
prev=""
for a in "$@"; do
  if [ "$prev" = "{input_flag}" ]; then cp "$a" "$here/corpus.txt"; fi
  prev="$a"
done
{body}
"#
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Shell snippet that sets `$out` to the value following `flag`.
    pub(crate) fn find_flag(flag: &str) -> String {
        format!(
            r#"out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "{flag}" ]; then out="$a"; fi
  prev="$a"
done"#
        )
    }
}
