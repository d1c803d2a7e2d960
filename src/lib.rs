#![cfg_attr(docsrs, feature(doc_cfg))]
//! # fieldcompare
//!
//! fieldcompare decides whether numerical field data (scalars, vectors and
//! tensors on mesh points, mesh cells or table rows) produced by two runs of
//! a simulation agree, under exact or fuzzy tolerances, and reports per field
//! why they do not.
//!
//! ## Features
//! - Tagged field arrays with exact, fuzzy and type-dependent default predicates
//! - Unstructured, structured, rectilinear and image meshes with an equality
//!   check that is aware of mesh tolerances
//! - Canonicalization of meshes (orphan removal, point and cell sorting,
//!   space-dimension extension) via cheap, composable mesh views
//! - Merging of mesh pieces and conversion to conforming cell types
//! - Comparators that retry through canonicalization steps before comparing
//!   the fields, and step-wise comparison of field sequences
//!
//! ## Determinism
//!
//! Point and cell ordering is fully determined by coordinates and
//! connectivity; coincident points are ordered by the centroids of their
//! adjacent cells. Comparison callbacks are invoked synchronously in field
//! order.
//!
//! ## Usage
//!
//! ```
//! use fieldcompare::prelude::*;
//!
//! let points = Points::from_rows(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
//! let mesh = UnstructuredMesh::new(points, [(CellType::Triangle, CellBlock::from(vec![[0, 1, 2]]))])?;
//! let source = MeshFields::from_mesh(mesh.clone())?
//!     .with_point_field("p", FieldArray::from(vec![1.0, 2.0, 3.0]))?;
//! let reference = MeshFields::from_mesh(mesh)?
//!     .with_point_field("p", FieldArray::from(vec![1.0, 2.0, 3.0]))?;
//!
//! let suite = MeshFieldsComparator::new(&source, &reference).compare();
//! assert!(suite.is_success());
//! # Ok::<(), fieldcompare::compare_error::FieldCompareError>(())
//! ```

pub mod algs;
pub mod compare;
pub mod compare_error;
pub mod data;
pub mod fields;
pub mod geometry;
pub mod mesh;
pub mod predicates;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{
        MergeOptions, MeshTransform, extend_space_dimension_to, merge, merge_all, sort, sort_cells,
        sort_points, strip_orphan_points, to_conforming_cell_types,
    };
    pub use crate::compare::{
        ComparatorOptions, FieldComparison, FieldComparisonStatus, FieldComparisonSuite,
        FieldDataComparator, FieldFilter, MeshComparatorOptions, MeshFieldsComparator,
        SequenceComparisonOptions, ToleranceOverrides, compare_sequences,
    };
    pub use crate::compare_error::FieldCompareError;
    pub use crate::data::array::{FieldArray, ScalarType};
    pub use crate::data::field::{Field, FieldLocation};
    pub use crate::data::tolerance::Tolerance;
    pub use crate::fields::{
        FieldData, FieldDataSequence, FieldDataSequenceSource, InMemorySequence, MeshFields, Table,
        TabularFields,
    };
    pub use crate::mesh::{
        ImageMesh, Mesh, MeshGeometry, RectilinearMesh, StructuredMesh, TransformedMesh,
        UnstructuredMesh, mesh_equal,
    };
    pub use crate::predicates::{
        DefaultEquality, ExactEquality, FuzzyEquality, Predicate, PredicateError, PredicateResult,
    };
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::cells::CellBlock;
    pub use crate::topology::points::Points;
}
