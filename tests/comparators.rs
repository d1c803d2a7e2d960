use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use fieldcompare::compare::{
    ComparatorOptions, ComparisonOutcome, FieldComparisonStatus, FieldDataComparator, FieldFilter,
    FieldTolerance, MeshComparatorOptions, MeshFieldsComparator, ToleranceOverrides,
};
use fieldcompare::data::array::FieldArray;
use fieldcompare::fields::{MeshFields, Table, TabularFields};
use fieldcompare::mesh::{ImageMesh, UnstructuredMesh};
use fieldcompare::topology::cell_type::CellType;
use fieldcompare::topology::cells::CellBlock;
use fieldcompare::topology::points::Points;

fn triangle() -> MeshFields {
    let points = Points::from_rows(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    MeshFields::from_mesh(
        UnstructuredMesh::new(points, [(CellType::Triangle, CellBlock::from(vec![[0, 1, 2]]))]).unwrap(),
    )
    .unwrap()
}

/// `nx` x `ny` quads with points renumbered by `order[new] = old`, a point
/// field `x + 10 y` and a cell field holding the original cell index.
fn shuffled_grid(nx: usize, ny: usize, order: &[usize]) -> MeshFields {
    let id = |i: usize, j: usize| j * (nx + 1) + i;
    let coords: Vec<[f64; 2]> = (0..=ny)
        .flat_map(|j| (0..=nx).map(move |i| [i as f64, j as f64]))
        .collect();
    let mut old_to_new = vec![0; coords.len()];
    for (new, &old) in order.iter().enumerate() {
        old_to_new[old] = new;
    }
    let quads: Vec<[usize; 4]> = (0..ny)
        .flat_map(|j| (0..nx).map(move |i| [id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)]))
        .map(|q| q.map(|p| old_to_new[p]))
        .collect();
    let num_cells = quads.len();
    let points: Vec<[f64; 2]> = order.iter().map(|&old| coords[old]).collect();
    let values: Vec<f64> = points.iter().map(|p| p[0] + 10.0 * p[1]).collect();
    let mesh = UnstructuredMesh::new(Points::from_rows(points), [(CellType::Quad, CellBlock::from(quads))]).unwrap();
    MeshFields::from_mesh(mesh)
        .unwrap()
        .with_point_field("u", FieldArray::from(values))
        .unwrap()
        .with_cell_field("id", CellType::Quad, FieldArray::from((0..num_cells as i64).collect::<Vec<_>>()))
        .unwrap()
}

#[test]
fn fields_missing_in_the_source_fail_unless_ignored() {
    let source = triangle().with_point_field("p", FieldArray::from(vec![1.0, 2.0, 3.0])).unwrap();
    let reference = triangle()
        .with_point_field("p", FieldArray::from(vec![1.0, 2.0, 3.0]))
        .unwrap()
        .with_point_field("q", FieldArray::from(vec![1i64, 2, 3]))
        .unwrap();

    let suite = MeshFieldsComparator::new(&source, &reference).compare();
    assert!(!suite.is_success());
    assert_eq!(suite.get("p").unwrap().status, FieldComparisonStatus::Passed);
    assert_eq!(suite.get("q").unwrap().status, FieldComparisonStatus::MissingSource);
    assert_eq!(suite.report(), "2 field comparisons with 1 PASSED, 1 FAILED, 0 SKIPPED");

    let lenient = MeshFieldsComparator::new(&source, &reference)
        .with_options(MeshComparatorOptions {
            field: ComparatorOptions {
                ignore_missing_source_fields: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .compare();
    assert!(lenient.is_success());
    assert_eq!(lenient.status(), ComparisonOutcome::Passed);
    assert_eq!(lenient.skipped().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["q"]);
}

#[test]
fn cell_fields_are_matched_per_cell_type() {
    let source = triangle()
        .with_cell_field("rank", CellType::Triangle, FieldArray::from(vec![3i64]))
        .unwrap();
    let reference = triangle()
        .with_cell_field("rank", CellType::Triangle, FieldArray::from(vec![4i64]))
        .unwrap();
    let suite = MeshFieldsComparator::new(&source, &reference).compare();
    let result = suite.get("rank (triangle)").unwrap();
    assert_eq!(result.status, FieldComparisonStatus::Failed);
    assert_eq!(result.report, "Deviation above tolerance detected -> 3 vs. 4");
    assert_eq!(result.predicate, "DefaultEquality (abs_tol: default, rel_tol: default)");
}

#[test]
fn shuffled_meshes_compare_equal_after_reordering() {
    let (nx, ny) = (3, 2);
    let identity: Vec<usize> = (0..(nx + 1) * (ny + 1)).collect();
    let mut order = identity.clone();
    order.shuffle(&mut StdRng::seed_from_u64(42));
    if order == identity {
        order.swap(0, 1);
    }
    let source = shuffled_grid(nx, ny, &identity);
    let reference = shuffled_grid(nx, ny, &order);

    let mut messages = Vec::new();
    let mut results = Vec::new();
    let suite = MeshFieldsComparator::new(&source, &reference).compare_with(
        |_, _| Box::new(fieldcompare::predicates::DefaultEquality::new()),
        |c| results.push(c.name.clone()),
        |m| messages.push(m.to_string()),
    );
    assert!(suite.domain_equality_check().is_success(), "{}", suite.domain_equality_check().report());
    assert!(suite.is_success(), "{}", suite.report());
    assert_eq!(results, ["u", "id (quad)"]);
    assert_eq!(messages[0], "Meshes did not compare equal. Retrying with sorted points...");
}

#[test]
fn disabled_reordering_reports_the_domain_failure() {
    let identity: Vec<usize> = (0..9).collect();
    let reversed: Vec<usize> = identity.iter().rev().copied().collect();
    let source = shuffled_grid(2, 2, &identity);
    let reference = shuffled_grid(2, 2, &reversed);

    let mut messages = Vec::new();
    let suite = MeshFieldsComparator::new(&source, &reference)
        .with_options(MeshComparatorOptions {
            disable_mesh_reordering: true,
            ..Default::default()
        })
        .compare_with(
            |_, _| Box::new(fieldcompare::predicates::DefaultEquality::new()),
            |_| {},
            |m| messages.push(m.to_string()),
        );
    assert!(!suite.is_success());
    assert!(suite.is_empty());
    assert_eq!(suite.report(), "Domain equality check failed");
    assert!(messages.is_empty());
}

#[test]
fn lower_dimensional_meshes_are_embedded() {
    let flat = triangle().with_point_field("v", FieldArray::from(vec![[1.0, 0.0]; 3])).unwrap();
    let points = Points::from_rows(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let spatial = MeshFields::from_mesh(
        UnstructuredMesh::new(points, [(CellType::Triangle, CellBlock::from(vec![[0, 1, 2]]))]).unwrap(),
    )
    .unwrap()
    .with_point_field("v", FieldArray::from(vec![[1.0, 0.0, 0.0]; 3]))
    .unwrap();

    let suite = MeshFieldsComparator::new(&flat, &spatial).compare();
    assert!(suite.is_success(), "{}", suite.report());

    let strict = MeshFieldsComparator::new(&flat, &spatial)
        .with_options(MeshComparatorOptions {
            disable_space_dimension_matching: true,
            disable_mesh_reordering: true,
            ..Default::default()
        })
        .compare();
    assert!(!strict.is_success());
}

#[test]
fn structured_meshes_are_never_reordered() {
    let a = MeshFields::from_mesh(ImageMesh::new([2, 2, 0], [0.0; 3], [1.0; 3])).unwrap();
    let b = MeshFields::from_mesh(ImageMesh::new([2, 2, 0], [0.0; 3], [2.0; 3])).unwrap();
    let mut messages = Vec::new();
    let suite = MeshFieldsComparator::new(&a, &b).compare_with(
        |_, _| Box::new(fieldcompare::predicates::ExactEquality),
        |_| {},
        |m| messages.push(m.to_string()),
    );
    assert!(!suite.is_success());
    assert!(messages.is_empty());
}

#[test]
fn tolerance_overrides_pick_predicates_per_field() {
    let source = triangle()
        .with_point_field("p", FieldArray::from(vec![1.0, 2.0, 3.0]))
        .unwrap()
        .with_point_field("q", FieldArray::from(vec![1.0, 2.0, 3.0]))
        .unwrap();
    let reference = triangle()
        .with_point_field("p", FieldArray::from(vec![1.01, 2.0, 3.0]))
        .unwrap()
        .with_point_field("q", FieldArray::from(vec![1.01, 2.0, 3.0]))
        .unwrap();

    let overrides = ToleranceOverrides {
        fields: [(
            "q".to_string(),
            FieldTolerance {
                relative: Some(0.1),
                absolute: None,
            },
        )]
        .into(),
        ..Default::default()
    };
    let suite = MeshFieldsComparator::new(&source, &reference).compare_with(|s, r| overrides.select(s, r), |_| {}, |_| {});
    assert_eq!(suite.get("p").unwrap().status, FieldComparisonStatus::Failed);
    assert_eq!(suite.get("q").unwrap().status, FieldComparisonStatus::Passed);
    assert_eq!(suite.get("q").unwrap().predicate, "DefaultEquality (abs_tol: default, rel_tol: 0.1)");
}

#[test]
fn filters_apply_to_tabular_data() {
    let columns = |t: f64| {
        TabularFields::new(
            Table::new(2),
            [
                ("time", FieldArray::from(vec![t, t + 1.0])),
                ("pressure", FieldArray::from(vec![1.0, 2.0])),
                ("pressure_old", FieldArray::from(vec![0.0, 0.0])),
            ],
        )
        .unwrap()
    };
    let (source, reference) = (columns(0.0), columns(5.0));

    let suite = FieldDataComparator::new(&source, &reference)
        .with_inclusion_filter(FieldFilter::matching_any(["^pressure"]).unwrap())
        .with_exclusion_filter(FieldFilter::matching_any(["_old$"]).unwrap())
        .compare();
    assert!(suite.is_success(), "{}", suite.report());
    assert_eq!(suite.passed().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["pressure"]);
    assert_eq!(suite.skipped().count(), 2);
    assert_eq!(suite.get("time").unwrap().status, FieldComparisonStatus::Filtered);

    let shorter = TabularFields::new(Table::new(1), [("pressure", FieldArray::from(vec![1.0]))]).unwrap();
    let suite = FieldDataComparator::new(&source, &shorter).compare();
    assert!(!suite.is_success());
    assert!(suite.domain_equality_check().report().contains("Differing number of table rows"));
}

#[test]
fn callback_sees_skipped_fields_too() {
    let source = TabularFields::new(
        Table::new(2),
        [
            ("time", FieldArray::from(vec![0.0, 1.0])),
            ("pressure", FieldArray::from(vec![1.0, 2.0])),
            ("extra", FieldArray::from(vec![0.0, 0.0])),
        ],
    )
    .unwrap();
    let reference = TabularFields::new(
        Table::new(2),
        [
            ("time", FieldArray::from(vec![5.0, 6.0])),
            ("pressure", FieldArray::from(vec![1.0, 2.0])),
            ("other", FieldArray::from(vec![0.0, 0.0])),
        ],
    )
    .unwrap();

    let mut seen = Vec::new();
    let suite = FieldDataComparator::new(&source, &reference)
        .with_exclusion_filter(FieldFilter::matching_any(["^time$"]).unwrap())
        .compare_with(
            |_, _| Box::new(fieldcompare::predicates::DefaultEquality::new()),
            |c| seen.push((c.name.clone(), c.status)),
        );
    assert_eq!(
        seen,
        [
            ("pressure".to_string(), FieldComparisonStatus::Passed),
            ("other".to_string(), FieldComparisonStatus::MissingSource),
            ("extra".to_string(), FieldComparisonStatus::MissingReference),
            ("time".to_string(), FieldComparisonStatus::Filtered),
        ]
    );
    let in_suite: Vec<_> = suite.iter().map(|(c, _)| c.name.clone()).collect();
    assert_eq!(in_suite, ["pressure", "other", "extra", "time"]);
}

/// Two unit segments meeting at x = 1 without sharing a point, with a point
/// field `u = x`. `ghost` adds an unconnected copy of the interface point.
fn split_line(ghost: bool) -> MeshFields {
    let mut points = vec![[0.0], [1.0], [1.0], [2.0]];
    let mut values = vec![0.0, 1.0, 1.0, 2.0];
    if ghost {
        points.push([1.0]);
        values.push(1.0);
    }
    let mesh = UnstructuredMesh::new(
        Points::from_rows(points),
        [(CellType::Line, CellBlock::from(vec![[0, 1], [2, 3]]))],
    )
    .unwrap();
    MeshFields::from_mesh(mesh)
        .unwrap()
        .with_point_field("u", FieldArray::from(values))
        .unwrap()
}

#[test]
fn coincident_unconnected_points_are_stripped_by_default() {
    let suite = MeshFieldsComparator::new(&split_line(false), &split_line(true)).compare();
    assert!(suite.domain_equality_check().is_success(), "{}", suite.domain_equality_check().report());
    assert!(suite.is_success(), "{}", suite.report());
}

#[test]
fn keeping_coincident_unconnected_points_fails_with_guidance() {
    let suite = MeshFieldsComparator::new(&split_line(false), &split_line(true))
        .with_options(MeshComparatorOptions {
            disable_orphan_point_removal: true,
            ..Default::default()
        })
        .compare();
    assert!(!suite.is_success());
    assert_eq!(suite.report(), "Domain equality check failed");
    let report = suite.domain_equality_check().report();
    assert!(report.contains("strip_orphan_points"), "{report}");
}
