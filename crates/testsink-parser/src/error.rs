//! Error types for report parsing.

use thiserror::Error;

/// Errors that can occur while parsing a report document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
