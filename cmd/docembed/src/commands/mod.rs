//! CLI commands module.

mod embed;
mod methods;
mod util;

pub use embed::EmbedCommand;
pub use methods::MethodsCommand;

pub(crate) use util::*;
