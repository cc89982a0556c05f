//! Input readers - parse spec source files into the syntax tree.

use crate::ast::Program;

#[cfg(feature = "read-typescript")]
pub mod typescript;

#[cfg(feature = "read-typescript")]
pub use typescript::{TYPESCRIPT_READER, TypeScriptReader, read_typescript};

/// Error that can occur when reading source code into the syntax tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported syntax: {0}")]
    Unsupported(String),
}

/// A reader parses one source language into the syntax tree.
pub trait Reader: Send + Sync {
    /// Language identifier (e.g., "typescript").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["ts", "tsx"]).
    fn extensions(&self) -> &'static [&'static str];

    fn read(&self, source: &str) -> Result<Program, ReadError>;
}
