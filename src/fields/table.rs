//! Tabular field data: named columns over the rows of a table.

use super::{Domain, FieldData};
use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;
use crate::data::field::{Field, FieldLocation};
use crate::predicates::PredicateResult;

/// The domain of tabular data: a number of rows, optionally picked from
/// longer columns through a row index map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    num_rows: usize,
    row_indices: Option<Vec<usize>>,
}

impl Table {
    pub fn new(num_rows: usize) -> Self {
        Table {
            num_rows,
            row_indices: None,
        }
    }

    /// A table whose row `i` is row `indices[i]` of every column.
    pub fn with_row_indices(indices: Vec<usize>) -> Self {
        Table {
            num_rows: indices.len(),
            row_indices: Some(indices),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn row_indices(&self) -> Option<&[usize]> {
        self.row_indices.as_deref()
    }

    /// Tables are equal if they have the same number of rows.
    pub fn equals(&self, other: &Table) -> PredicateResult {
        if self.num_rows == other.num_rows {
            PredicateResult::pass("Tables have equal number of rows")
        } else {
            PredicateResult::fail(format!(
                "Differing number of table rows: {} vs. {}",
                self.num_rows, other.num_rows
            ))
        }
    }

    fn check_column(&self, name: &str, values: &FieldArray) -> Result<(), FieldCompareError> {
        let length = if values.ndim() == 0 { 0 } else { values.len() };
        let valid = match &self.row_indices {
            Some(indices) => indices.iter().all(|&i| i < length),
            None => length == self.num_rows,
        };
        if valid {
            Ok(())
        } else {
            Err(FieldCompareError::FieldLengthMismatch {
                name: name.to_string(),
                expected: self.num_rows,
                found: length,
            })
        }
    }

    fn rows_of(&self, values: &FieldArray) -> FieldArray {
        match &self.row_indices {
            Some(indices) => values.select_rows(indices),
            None => values.clone(),
        }
    }
}

/// Named columns on a [`Table`], kept in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct TabularFields {
    table: Table,
    columns: Vec<(String, FieldArray)>,
}

impl TabularFields {
    pub fn new<I, S>(table: Table, columns: I) -> Result<Self, FieldCompareError>
    where
        I: IntoIterator<Item = (S, FieldArray)>,
        S: Into<String>,
    {
        let mut fields = TabularFields {
            table,
            columns: Vec::new(),
        };
        for (name, values) in columns {
            fields = fields.with_column(name, values)?;
        }
        Ok(fields)
    }

    /// Add or replace a column.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: FieldArray,
    ) -> Result<Self, FieldCompareError> {
        let name = name.into();
        self.table.check_column(&name, &values)?;
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(self)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn column(&self, name: &str) -> Option<Field> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(n, values)| Field::new(n.as_str(), FieldLocation::Row, self.table.rows_of(values)))
    }
}

impl FieldData for TabularFields {
    fn domain(&self) -> Domain<'_> {
        Domain::Table(&self.table)
    }

    fn fields(&self) -> Vec<Field> {
        self.columns
            .iter()
            .map(|(name, values)| Field::new(name.as_str(), FieldLocation::Row, self.table.rows_of(values)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_indices_select_from_columns() {
        let table = Table::with_row_indices(vec![2, 0]);
        let data = TabularFields::new(table, [("t", FieldArray::from(vec![0.0, 1.0, 2.0]))]).unwrap();
        assert_eq!(data.column("t").unwrap().values(), &FieldArray::from(vec![2.0, 0.0]));
        assert!(data.clone().with_column("short", FieldArray::from(vec![1.0])).is_err());
    }

    #[test]
    fn tables_compare_by_row_count() {
        assert!(Table::new(3).equals(&Table::with_row_indices(vec![0, 1, 2])).value);
        let res = Table::new(3).equals(&Table::new(4));
        assert_eq!(res.report, "Differing number of table rows: 3 vs. 4");
    }
}
