//! FieldCompareError: unified error type for fieldcompare public APIs
//!
//! Errors are reserved for programmer errors and malformed input (bad
//! construction arguments, impossible transformations). Data that simply
//! does not match is never an error: it is reported through
//! [`PredicateResult`](crate::predicates::PredicateResult) values.

use crate::data::tolerance::ToleranceDeductionError;
use crate::topology::cell_type::CellType;
use thiserror::Error;

/// Unified error type for fieldcompare operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldCompareError {
    /// A numeric cell type id that is not part of the registry.
    #[error("Unknown cell type with id '{0}'")]
    UnknownCellTypeId(u8),
    /// A cell type name that is not part of the registry.
    #[error("Unknown cell type with name '{0}'")]
    UnknownCellTypeName(String),
    /// Connectivity was given twice for the same cell type.
    #[error("Connectivity for cell type '{0}' was given more than once")]
    DuplicateCellType(CellType),
    /// A corner index exceeds the number of points of the mesh.
    #[error(
        "Connectivity of cell type '{cell_type}' references point {index}, but the mesh has only {num_points} points"
    )]
    PointIndexOutOfRange {
        cell_type: CellType,
        index: usize,
        num_points: usize,
    },
    /// A cell of a fixed-size type has the wrong number of corners.
    #[error("Cell {cell} of type '{cell_type}' has {found} corners, expected {expected}")]
    CornerCountMismatch {
        cell_type: CellType,
        cell: usize,
        expected: usize,
        found: usize,
    },
    /// The shape of an array does not match its data or its intended use.
    #[error("Invalid array shape: {0}")]
    InvalidShape(String),
    /// A field array does not have one entry per entity of its domain.
    #[error("Field '{name}' has {found} entries, but its domain has {expected}")]
    FieldLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// A cell field was given for a cell type the mesh does not contain.
    #[error("Cell field '{name}' is given for cell type '{cell_type}', which the mesh does not contain")]
    UnknownFieldCellType { name: String, cell_type: CellType },
    /// Two point sets of different space dimension were combined.
    #[error("Point dimension mismatch: expected {expected}, found {found}")]
    PointDimensionMismatch { expected: usize, found: usize },
    /// An index map is not a valid (partial) permutation.
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),
    /// Structured grid description is inconsistent.
    #[error("Invalid structured grid: {0}")]
    InvalidStructuredGrid(String),
    /// Attempt to lower the space dimension of a mesh.
    #[error("Cannot reduce the space dimension from {from} to {to}")]
    DimensionReduction { from: usize, to: usize },
    /// Coincident points could not be ordered uniquely.
    #[error("{0}")]
    UnresolvableTie(String),
    /// No default tolerance exists for the data type at hand.
    #[error(transparent)]
    ToleranceDeduction(#[from] ToleranceDeductionError),
    /// Arrays could not be concatenated or converted.
    #[error("Incompatible arrays: {0}")]
    IncompatibleArrays(String),
    /// A field filter pattern could not be compiled.
    #[error("Invalid field filter: {0}")]
    InvalidFilter(String),
    /// Reading a step of a field data sequence failed.
    #[error("Field data sequence error: {0}")]
    Sequence(String),
}
