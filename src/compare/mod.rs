//! Comparison of field data sets, meshes with fields and sequences.

pub mod field_data;
pub mod mesh_fields;
pub mod options;
pub mod sequence;
pub mod suite;

pub use field_data::FieldDataComparator;
pub use mesh_fields::MeshFieldsComparator;
pub use options::{
    ComparatorOptions, FieldFilter, FieldTolerance, MeshComparatorOptions, SequenceComparisonOptions,
    ToleranceOverrides,
};
pub use sequence::{SequenceComparison, compare_sequences};
pub use suite::{ComparisonOutcome, FieldComparison, FieldComparisonStatus, FieldComparisonSuite};
