//! # Workflows Module
//!
//! High-level entry points of the benchmark utilities.
//!
//! ## Overview
//!
//! Each workflow takes already-loaded inputs plus a configuration, runs the complete
//! procedure and returns a summary of what it produced. Input parsing lives in
//! [`crate::core::io`] and the machinery in [`crate::engine`].
//!
//! - **Comparison Reports** ([`report`]) - Free-energy map estimation and the four comparison
//!   plots, with a single fallback to error-only statistics on small samples
//! - **Blinding** ([`blind`]) - Replacement of private ligand names through a name mapping
//! - **Topology Preparation** ([`amber`]) - `pdb4amber` followed by `tleap`

pub mod amber;
pub mod blind;
pub mod report;
