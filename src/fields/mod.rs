//! Field data containers: fields on meshes, columns on tables, and
//! sequences of either.

pub mod matching;
pub mod mesh_fields;
pub mod sequence;
pub mod table;

pub use matching::{FieldMatches, match_fields};
pub use mesh_fields::MeshFields;
pub use sequence::{FieldDataSequence, FieldDataSequenceSource, InMemorySequence};
pub use table::{Table, TabularFields};

use crate::data::field::Field;
use crate::mesh::Mesh;
use crate::predicates::PredicateResult;

/// The domain a collection of fields is defined on.
#[derive(Clone, Copy, Debug)]
pub enum Domain<'a> {
    Mesh(&'a Mesh),
    Table(&'a Table),
}

impl Domain<'_> {
    /// Domain equality; meshes never equal tables.
    pub fn equals(&self, other: &Domain<'_>) -> PredicateResult {
        match (self, other) {
            (Domain::Mesh(a), Domain::Mesh(b)) => a.equals(b),
            (Domain::Table(a), Domain::Table(b)) => a.equals(b),
            _ => PredicateResult::fail("Cannot compare a mesh domain with a table domain"),
        }
    }
}

/// A domain together with the fields defined on it.
pub trait FieldData {
    fn domain(&self) -> Domain<'_>;

    /// All fields, in a stable order.
    fn fields(&self) -> Vec<Field>;
}
