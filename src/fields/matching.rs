//! Pairing fields of two data sets by identity.

use std::collections::HashMap;

use crate::data::field::Field;
use crate::topology::cell_type::CellType;

/// Result of matching source fields against reference fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMatches {
    /// `(source, reference)` pairs, in source order.
    pub matches: Vec<(Field, Field)>,
    /// Source fields without a reference counterpart.
    pub orphans_in_source: Vec<Field>,
    /// Reference fields without a source counterpart.
    pub orphans_in_reference: Vec<Field>,
}

/// Match fields by name, and for cell fields also by cell type.
pub fn match_fields(source: Vec<Field>, reference: Vec<Field>) -> FieldMatches {
    let key = |f: &Field| -> (String, Option<CellType>) {
        let (name, ct) = f.identity();
        (name.to_string(), ct)
    };
    let mut remaining: HashMap<(String, Option<CellType>), usize> = reference
        .iter()
        .enumerate()
        .map(|(i, f)| (key(f), i))
        .collect();
    let mut reference: Vec<Option<Field>> = reference.into_iter().map(Some).collect();

    let mut result = FieldMatches::default();
    for field in source {
        match remaining.remove(&key(&field)).and_then(|i| reference[i].take()) {
            Some(partner) => result.matches.push((field, partner)),
            None => result.orphans_in_source.push(field),
        }
    }
    result.orphans_in_reference = reference.into_iter().flatten().collect();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::array::FieldArray;
    use crate::data::field::FieldLocation;

    fn field(name: &str, location: FieldLocation) -> Field {
        Field::new(name, location, FieldArray::from(vec![0.0]))
    }

    #[test]
    fn cell_fields_match_per_cell_type() {
        let source = vec![
            field("p", FieldLocation::Point),
            field("c", FieldLocation::Cell(CellType::Quad)),
            field("only_source", FieldLocation::Point),
        ];
        let reference = vec![
            field("c", FieldLocation::Cell(CellType::Triangle)),
            field("c", FieldLocation::Cell(CellType::Quad)),
            field("p", FieldLocation::Point),
        ];
        let m = match_fields(source, reference);
        assert_eq!(m.matches.len(), 2);
        assert_eq!(m.matches[0].0.name(), "p");
        assert_eq!(m.matches[1].1.location(), FieldLocation::Cell(CellType::Quad));
        assert_eq!(m.orphans_in_source.len(), 1);
        assert_eq!(m.orphans_in_reference.len(), 1);
        assert_eq!(m.orphans_in_reference[0].display_name(), "c (triangle)");
    }
}
