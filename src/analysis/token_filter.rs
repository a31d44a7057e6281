//! Token filters for the analysis pipeline.
//!
//! Filters transform a token stream after tokenization. Only the lowercase
//! filter is needed for classification; case differences between "URGENT"
//! and "urgent" carry no signal worth keeping.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream, producing a new stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

// Individual filter modules
pub mod lowercase;
