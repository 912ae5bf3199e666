//! Scan Java entity/controller sources and TypeScript type definitions and
//! render UML class, sequence, design, domain and use-case diagrams with
//! Graphviz.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod render;
pub mod scan;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
