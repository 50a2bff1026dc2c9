//! Provides readers for the flat files a benchmark run consumes.
//!
//! Every reader implements the [`traits::DataFile`] trait and returns its data together
//! with any non-fatal [`diagnostics::Diagnostic`] produced while parsing, so callers decide
//! how warnings are surfaced.

pub mod calculated;
pub mod diagnostics;
pub mod experimental;
pub mod name_mapping;
pub mod traits;
