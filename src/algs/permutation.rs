//! Validation and inversion of index maps.
//!
//! Maps are stored `new_to_old`: entry `i` holds the old index of the entity
//! that ends up at position `i`.

use crate::compare_error::FieldCompareError;

/// Marker for old indices that have no counterpart in a selection.
pub const UNMAPPED: usize = usize::MAX;

/// Check that `selection` picks distinct indices below `total`.
pub fn validate_selection(selection: &[usize], total: usize) -> Result<(), FieldCompareError> {
    let mut seen = vec![false; total];
    for &old in selection {
        if old >= total {
            return Err(FieldCompareError::InvalidPermutation(format!(
                "index {old} out of range for {total} entities"
            )));
        }
        if std::mem::replace(&mut seen[old], true) {
            return Err(FieldCompareError::InvalidPermutation(format!(
                "duplicate index {old}"
            )));
        }
    }
    Ok(())
}

/// Check that `permutation` is a bijection on `0..total`.
pub fn validate_permutation(permutation: &[usize], total: usize) -> Result<(), FieldCompareError> {
    if permutation.len() != total {
        return Err(FieldCompareError::InvalidPermutation(format!(
            "expected {total} entries, got {}",
            permutation.len()
        )));
    }
    validate_selection(permutation, total)
}

/// Invert a `new_to_old` selection into an `old_to_new` map over `total`
/// old indices; unselected indices map to [`UNMAPPED`].
pub fn invert_selection(new_to_old: &[usize], total: usize) -> Vec<usize> {
    let mut old_to_new = vec![UNMAPPED; total];
    for (new, &old) in new_to_old.iter().enumerate() {
        old_to_new[old] = new;
    }
    old_to_new
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_must_be_complete_and_unique() {
        assert!(validate_permutation(&[2, 0, 1], 3).is_ok());
        assert!(validate_permutation(&[0, 1], 3).is_err());
        assert!(validate_permutation(&[0, 0, 1], 3).is_err());
        assert!(validate_selection(&[0, 3], 3).is_err());
        assert!(validate_selection(&[2, 0], 3).is_ok());
    }

    #[test]
    fn inverse_marks_dropped_indices() {
        assert_eq!(invert_selection(&[2, 0], 3), vec![1, UNMAPPED, 0]);
    }
}
