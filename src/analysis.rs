//! Text analysis pipeline for classification.
//!
//! This module provides the tokenization pipeline that turns raw text into a
//! stream of normalized tokens before feature extraction. The pipeline has
//! two stages:
//!
//! 1. Tokenizer: splits text into tokens
//! 2. Token filters: applied sequentially in the order they were added
//!
//! The same analyzer instance must be used both when fitting the vectorizer
//! and when transforming text at inference time, so that the vocabulary and
//! the query-side tokens agree.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
