//! # Core Module
//!
//! The fundamental data structures and pure computations of fepbench.
//!
//! - **Data Representation** ([`models`]) - Experimental and calculated records, and the
//!   free-energy map linking ligands through absolute and relative measurements
//! - **File I/O** ([`io`]) - Readers for the experimental CSV, the calculated TSV and the
//!   ligand name-mapping JSON, together with the warnings they return
//! - **Summary Statistics** ([`statistics`]) - Error and correlation metrics with bootstrap
//!   confidence intervals

pub mod io;
pub mod models;
pub mod statistics;
