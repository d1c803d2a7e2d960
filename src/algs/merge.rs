//! Merging several meshes (with their fields) into one.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;
use crate::data::field::FieldLocation;
use crate::fields::MeshFields;
use crate::geometry::{exact_lex_cmp, points_coincide};
use crate::mesh::{MeshGeometry, UnstructuredMesh};
use crate::topology::cell_type::CellType;

/// Options for [`merge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Identify points of the second mesh with coinciding points of the
    /// first one instead of appending them.
    pub remove_duplicate_points: bool,
}

/// An array of default values with `rows` entries shaped like `like`.
pub(crate) fn zeros_like(like: &FieldArray, rows: usize) -> FieldArray {
    let mut shape = like.shape().to_vec();
    match shape.first_mut() {
        Some(n) => *n = rows,
        None => shape.push(rows),
    }
    FieldArray::zeros(like.scalar_type(), shape)
}

/// Concatenate two optional arrays; a missing side is zero-filled.
fn concat_or_fill(
    first: Option<FieldArray>,
    first_rows: usize,
    second: Option<FieldArray>,
    second_rows: usize,
) -> Result<Option<FieldArray>, FieldCompareError> {
    Ok(match (first, second) {
        (Some(a), Some(b)) => Some(a.concat_rows(&b)?),
        (Some(a), None) => Some(a.concat_rows(&zeros_like(&a, second_rows))?),
        (None, Some(b)) => Some(zeros_like(&b, first_rows).concat_rows(&b)?),
        (None, None) => None,
    })
}

/// Merge `second` into `first`.
///
/// Points and cells of `second` are appended, with its connectivity
/// shifted accordingly. With `remove_duplicate_points`, points of `second`
/// that coincide (within the smaller absolute tolerance of both meshes)
/// with a point of `first` are identified with it; among several candidates
/// the one with the lowest index wins. Candidates are found by binary
/// search over the points of `first` sorted by their leading coordinate. Fields present on only
/// one side are zero-filled on the other.
pub fn merge(
    first: &MeshFields,
    second: &MeshFields,
    options: MergeOptions,
) -> Result<MeshFields, FieldCompareError> {
    let (m1, m2) = (first.domain(), second.domain());
    let (p1, p2) = (m1.points(), m2.points());
    if p1.dimension() != p2.dimension() && !p1.is_empty() && !p2.is_empty() {
        return Err(FieldCompareError::PointDimensionMismatch {
            expected: p1.dimension(),
            found: p2.dimension(),
        });
    }

    let n1 = p1.len();
    let mut second_to_merged = Vec::with_capacity(p2.len());
    let mut kept = Vec::with_capacity(p2.len());
    if options.remove_duplicate_points {
        let tol = m1.tolerances().min(m2.tolerances()).absolute;
        let leading = |p: &[f64]| p.first().copied().unwrap_or(0.0);
        let mut sorted: Vec<usize> = (0..n1).collect();
        sorted.sort_by(|&a, &b| exact_lex_cmp(p1.point(a), p1.point(b)));
        for (i, q) in p2.iter().enumerate() {
            let x = leading(q);
            let start = sorted.partition_point(|&j| leading(p1.point(j)) < x - tol);
            let duplicate = sorted[start..]
                .iter()
                .take_while(|&&j| leading(p1.point(j)) <= x + tol)
                .filter(|&&j| points_coincide(p1.point(j), q, tol))
                .min();
            match duplicate {
                Some(&j) => second_to_merged.push(j),
                None => {
                    second_to_merged.push(n1 + kept.len());
                    kept.push(i);
                }
            }
        }
    } else {
        second_to_merged.extend(n1..n1 + p2.len());
        kept.extend(0..p2.len());
    }
    log::debug!(
        "merging {} + {} points ({} duplicates removed)",
        n1,
        p2.len(),
        p2.len() - kept.len()
    );

    let points = p1.concat(&p2.select(&kept))?;
    let cell_types: BTreeSet<CellType> = m1.cell_types().into_iter().chain(m2.cell_types()).collect();
    let cells = cell_types
        .iter()
        .map(|&ct| {
            let a = m1.connectivity(ct).map(Cow::into_owned).unwrap_or_default();
            let b = m2
                .connectivity(ct)
                .map(|b| b.map_corners(|p| second_to_merged[p]))
                .unwrap_or_default();
            (ct, a.concat(&b))
        })
        .collect::<Vec<_>>();
    let mut merged = MeshFields::from_mesh(UnstructuredMesh::new(points, cells)?)?;

    let point_names: BTreeSet<String> = first
        .point_fields()
        .into_iter()
        .chain(second.point_fields())
        .map(|f| f.name().to_string())
        .collect();
    for name in point_names {
        let a = first.point_field(&name).map(|f| f.into_values());
        let b = second.point_field(&name).map(|f| f.values().select_rows(&kept));
        if let Some(values) = concat_or_fill(a, n1, b, kept.len())? {
            merged = merged.with_point_field(name, values)?;
        }
    }

    let mut cell_data: BTreeMap<(String, CellType), (Option<FieldArray>, Option<FieldArray>)> =
        BTreeMap::new();
    for (side, fields) in [first.cell_fields(), second.cell_fields()].into_iter().enumerate() {
        for field in fields {
            if let FieldLocation::Cell(ct) = field.location() {
                let entry = cell_data.entry((field.name().to_string(), ct)).or_default();
                let values = Some(field.into_values());
                if side == 0 {
                    entry.0 = values;
                } else {
                    entry.1 = values;
                }
            }
        }
    }
    for ((name, ct), (a, b)) in cell_data {
        if let Some(values) = concat_or_fill(a, m1.num_cells(ct), b, m2.num_cells(ct))? {
            merged = merged.with_cell_field(name, ct, values)?;
        }
    }
    Ok(merged)
}

/// Merge all `others` into `first`, one after another.
pub fn merge_all(
    first: &MeshFields,
    others: &[MeshFields],
    options: MergeOptions,
) -> Result<MeshFields, FieldCompareError> {
    others
        .iter()
        .try_fold(first.clone(), |acc, next| merge(&acc, next, options))
}
