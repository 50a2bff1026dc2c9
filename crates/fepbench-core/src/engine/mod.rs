//! # Engine Module
//!
//! Computational machinery behind the benchmark workflows.
//!
//! ## Overview
//!
//! The engine turns parsed input data into results: it resolves absolute free energies
//! from a free-energy map, prepares comparison report data with statistics, draws the
//! reports and runs the external AmberTools programs.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Report and topology-preparation settings with builders
//! - **Estimation** ([`estimator`]) - Weighted least-squares absolute values on a [`FeMap`](crate::core::models::femap::FeMap)
//! - **Report Data** ([`report`]) - Paired series, centering and statistic summaries
//! - **Rendering** ([`render`]) - The [`ReportRenderer`](render::ReportRenderer) seam and its `plotters` implementation
//! - **External Tools** ([`tools`]) - The [`ToolRunner`](tools::ToolRunner) seam for subprocesses
//! - **Error Handling** ([`error`]) - Engine error types

pub mod config;
pub mod error;
pub mod estimator;
pub mod render;
pub mod report;
pub mod tools;
