//! Command line interface for PhishGuard.

pub mod args;
pub mod commands;
