//! Utility functions for CLI commands.

use std::path::Path;

use anyhow::Context;
use docembed::Matrix;
use serde_json::Value;

/// Loads a config from a YAML or JSON file.
pub fn load_request<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    Ok(result)
}

/// Parses a `key=value` option. The value is read as a YAML scalar so
/// `dim=50` is a number and `binary=true` a bool.
pub fn parse_kwarg(raw: &str) -> anyhow::Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("invalid kwarg {raw:?}, want KEY=VALUE"))?;
    if key.is_empty() {
        anyhow::bail!("invalid kwarg {raw:?}, empty key");
    }
    let value = match serde_yaml::from_str::<Value>(value) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

/// Renders a matrix as tab-separated rows.
pub fn format_tsv(matrix: &Matrix) -> String {
    let mut out = String::new();
    for row in matrix {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

/// Outputs a matrix as JSON or TSV.
pub fn output_matrix(matrix: &Matrix, output_path: Option<&str>, as_json: bool) -> anyhow::Result<()> {
    let text = if as_json {
        serde_json::to_string(matrix)? + "\n"
    } else {
        format_tsv(matrix)
    };
    match output_path {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{}", text),
    }
    Ok(())
}

/// Outputs text followed by a newline.
pub fn output_text(text: &str, output_path: Option<&str>) -> anyhow::Result<()> {
    match output_path {
        Some(path) => std::fs::write(path, format!("{text}\n"))?,
        None => println!("{}", text),
    }
    Ok(())
}
