//! Top-level module for mesh topology building blocks.
//!
//! This module provides:
//! - The cell type registry with VTK ids and corner counts
//! - Point coordinates with a fixed space dimension
//! - Compressed per-cell-type connectivity
//!
//! Meshes combining these live in [`crate::mesh`].

pub mod cell_type;
pub mod cells;
pub mod points;

pub use cell_type::CellType;
pub use cells::{CellBlock, Connectivity};
pub use points::Points;
