//! Supported method listing.

use clap::Args;
use docembed::Method;

use super::output_text;
use crate::Cli;

/// List the method names accepted by `--method` and config files.
#[derive(Args)]
pub struct MethodsCommand {}

impl MethodsCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let names: Vec<&str> = Method::ALL.iter().map(|m| m.as_str()).collect();
        let text = if cli.json {
            serde_json::to_string_pretty(&names)?
        } else {
            names.join("\n")
        };
        output_text(&text, cli.output.as_deref())
    }
}
