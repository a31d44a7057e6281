//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step in the analysis pipeline, responsible for
//! splitting input text into tokens.
//!
//! # Available Tokenizers
//!
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` to allow use in concurrent contexts.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

// Individual tokenizer modules
pub mod unicode_word;
pub mod whitespace;
