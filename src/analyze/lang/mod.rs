mod java;
mod typescript;

pub use java::{find_endpoints, parse_endpoints, JavaControllerParser, JavaEntityParser};
pub use typescript::TypeScriptParser;

use crate::types::ClassModel;

/// Extracts class-like models from one source file's text.
pub trait ModelParser {
    fn parse_models(&self, content: &str) -> Vec<ClassModel>;
}
