//! Named field arrays and the location they are defined on.

use crate::data::array::FieldArray;
use crate::topology::cell_type::CellType;
use std::fmt;

/// The entities a field associates one value (row) with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum FieldLocation {
    /// One value per mesh point.
    Point,
    /// One value per cell of the given type.
    Cell(CellType),
    /// One value per table row.
    Row,
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLocation::Point => f.write_str("point"),
            FieldLocation::Cell(ct) => write!(f, "cell ({ct})"),
            FieldLocation::Row => f.write_str("row"),
        }
    }
}

/// A named array of values over the entities of a domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    location: FieldLocation,
    values: FieldArray,
}

impl Field {
    pub fn new(name: impl Into<String>, location: FieldLocation, values: FieldArray) -> Self {
        Field {
            name: name.into(),
            location,
            values,
        }
    }

    /// The raw field name, without any cell type annotation.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> FieldLocation {
        self.location
    }

    pub fn values(&self) -> &FieldArray {
        &self.values
    }

    pub fn into_values(self) -> FieldArray {
        self.values
    }

    /// Name used in reports: cell fields carry their cell type, e.g.
    /// `"pressure (quad)"`.
    pub fn display_name(&self) -> String {
        match self.location {
            FieldLocation::Cell(ct) => format!("{} ({ct})", self.name),
            FieldLocation::Point | FieldLocation::Row => self.name.clone(),
        }
    }

    /// Key under which fields of two data sets are matched.
    pub fn identity(&self) -> (&str, Option<CellType>) {
        match self.location {
            FieldLocation::Cell(ct) => (&self.name, Some(ct)),
            FieldLocation::Point | FieldLocation::Row => (&self.name, None),
        }
    }
}
