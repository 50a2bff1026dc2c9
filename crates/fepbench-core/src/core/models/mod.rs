//! # Core Models Module
//!
//! Data structures describing what a benchmark run knows about its ligands.
//!
//! ## Key Components
//!
//! - [`records`] - Per-ligand experimental records and per-edge calculated records
//! - [`femap`] - The free-energy map: a reference node, one node per ligand, and the
//!   measurements connecting them
//! - [`ids`] - Stable identifier type for map nodes
//!
//! ## Usage
//!
//! ```ignore
//! use fepbench::core::models::femap::FeMap;
//!
//! let mut map = FeMap::new();
//! map.add_absolute("lig_a", -10.0, 0.1);
//! map.add_relative("lig_a", "lig_b", 1.0, 0.1);
//! ```

pub mod femap;
pub mod ids;
pub mod records;
