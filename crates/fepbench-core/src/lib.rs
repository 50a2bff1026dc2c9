//! # fepbench Core Library
//!
//! Utilities supporting a relative free-energy benchmarking workflow: ingestion of
//! experimental affinities and computed relative free energies, estimation of per-ligand
//! absolute values, comparison reports against experiment and a third-party method,
//! ligand-name blinding, and preparation of AMBER topologies through AmberTools.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`FeMap`, experimental and
//!   calculated records), flat-file readers, and the summary statistics.
//!
//! - **[`engine`]: The Logic Core.** The absolute-value estimator, report configuration,
//!   report preparation, rendering, and the external-tool seam.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures used by the command-line
//!   tools: the comparison report batch, CSV blinding, and AMBER topology generation.

pub mod core;
pub mod engine;
pub mod workflows;
