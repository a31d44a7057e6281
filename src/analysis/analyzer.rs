//! Analyzers that combine a tokenizer with a chain of filters.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use phishguard::analysis::analyzer::{Analyzer, PipelineAnalyzer};
//! use phishguard::analysis::token_filter::lowercase::LowercaseFilter;
//! use phishguard::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
//!     .add_filter(Arc::new(LowercaseFilter::new()));
//!
//! let tokens: Vec<_> = analyzer.analyze("Claim NOW!").unwrap().collect();
//! assert_eq!(tokens[0].text, "claim");
//! assert_eq!(tokens[1].text, "now");
//! ```

use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::error::Result;

/// Trait for analyzers that process text into a token stream.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and produce a token stream.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &str;
}

/// A configurable analyzer that combines a tokenizer with a chain of filters.
///
/// Filters are applied sequentially in the order they were added.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut stream = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            stream = filter.filter(stream)?;
        }
        Ok(stream)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Create the standard analyzer used for classification: Unicode word
/// tokenization followed by lowercasing.
///
/// The vectorizer must see the same analyzer at fit and transform time, so
/// callers should build it once and share the handle.
pub fn standard_analyzer() -> Arc<dyn Analyzer> {
    Arc::new(
        PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("standard"),
    )
}
