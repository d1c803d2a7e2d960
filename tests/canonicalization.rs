use std::sync::Arc;

use proptest::prelude::*;

use fieldcompare::algs::orphans::has_orphan_points;
use fieldcompare::algs::{sort, sort_cells, sort_points, strip_orphan_points};
use fieldcompare::compare_error::FieldCompareError;
use fieldcompare::mesh::{Mesh, MeshGeometry, TransformedMesh, UnstructuredMesh};
use fieldcompare::topology::cell_type::CellType;
use fieldcompare::topology::cells::CellBlock;
use fieldcompare::topology::points::Points;

fn line_mesh(points: Vec<[f64; 1]>, lines: Vec<[usize; 2]>) -> Arc<Mesh> {
    Arc::new(Mesh::from(
        UnstructuredMesh::new(Points::from_rows(points), [(CellType::Line, CellBlock::from(lines))]).unwrap(),
    ))
}

/// Quad grid with `nx` x `ny` cells; points are numbered row by row.
fn grid(nx: usize, ny: usize) -> (Vec<[f64; 2]>, Vec<[usize; 4]>) {
    let id = |i: usize, j: usize| j * (nx + 1) + i;
    let points = (0..=ny)
        .flat_map(|j| (0..=nx).map(move |i| [i as f64 * 0.5, j as f64 * 0.25]))
        .collect();
    let quads = (0..ny)
        .flat_map(|j| (0..nx).map(move |i| [id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)]))
        .collect();
    (points, quads)
}

fn quad_mesh(points: Vec<[f64; 2]>, quads: Vec<[usize; 4]>) -> Arc<Mesh> {
    Arc::new(Mesh::from(
        UnstructuredMesh::new(Points::from_rows(points), [(CellType::Quad, CellBlock::from(quads))]).unwrap(),
    ))
}

/// Renumber points (`point_order[new] = old`) and reorder cells.
fn renumbered(
    points: &[[f64; 2]],
    quads: &[[usize; 4]],
    point_order: &[usize],
    cell_order: &[usize],
) -> Arc<Mesh> {
    let mut old_to_new = vec![0; points.len()];
    for (new, &old) in point_order.iter().enumerate() {
        old_to_new[old] = new;
    }
    let new_points = point_order.iter().map(|&old| points[old]).collect();
    let new_quads = cell_order
        .iter()
        .map(|&c| quads[c].map(|p| old_to_new[p]))
        .collect();
    quad_mesh(new_points, new_quads)
}

fn assert_identical(a: &Mesh, b: &Mesh) {
    assert_eq!(a.points(), b.points());
    assert_eq!(a.cell_types(), b.cell_types());
    for ct in a.cell_types() {
        assert_eq!(a.connectivity(ct), b.connectivity(ct));
    }
}

#[test]
fn coincident_points_are_ordered_by_adjacent_cell_centroids() {
    // Points 1 and 2 coincide; point 1 belongs to the right cell.
    let mesh = line_mesh(vec![[0.0], [1.0], [1.0], [2.0]], vec![[0, 2], [1, 3]]);
    let sorted = sort_points(&mesh).unwrap();
    let Mesh::Transformed(view) = &*sorted else {
        panic!("sorting yields a view");
    };
    assert_eq!(view.points().as_flat(), &[0.0, 1.0, 1.0, 2.0]);
    assert_eq!(sorted.connectivity(CellType::Line).unwrap().cell(0), &[0, 1]);
    assert_eq!(sorted.connectivity(CellType::Line).unwrap().cell(1), &[2, 3]);

    for _ in 0..3 {
        let again = sort_points(&mesh).unwrap();
        assert_identical(&again, &sorted);
    }
}

#[test]
fn coincident_orphans_require_stripping() {
    // Point 2 coincides with point 1 but belongs to no cell.
    let mesh = line_mesh(vec![[0.0], [1.0], [1.0], [2.0]], vec![[0, 1], [1, 3]]);
    assert!(has_orphan_points(&*mesh));
    match sort_points(&mesh) {
        Err(FieldCompareError::UnresolvableTie(msg)) => assert!(msg.contains("strip_orphan_points")),
        other => panic!("expected an unresolvable tie, got {other:?}"),
    }

    let stripped = strip_orphan_points(&mesh).unwrap();
    assert_eq!(stripped.num_points(), 3);
    let sorted = sort_points(&stripped).unwrap();
    assert_eq!(sorted.points().as_flat(), &[0.0, 1.0, 2.0]);
}

#[test]
fn stripping_keeps_the_relative_order() {
    let mesh = line_mesh(vec![[5.0], [0.0], [9.0], [1.0]], vec![[3, 1]]);
    let stripped = strip_orphan_points(&mesh).unwrap();
    assert_eq!(stripped.points().as_flat(), &[0.0, 1.0]);
    assert_eq!(stripped.connectivity(CellType::Line).unwrap().cell(0), &[1, 0]);
    // Nothing to strip: the input comes back unchanged.
    let again = strip_orphan_points(&stripped).unwrap();
    assert!(Arc::ptr_eq(&again, &stripped));
}

#[test]
fn repeated_transformations_stay_flat() {
    let (points, quads) = grid(2, 2);
    let mesh = quad_mesh(points, quads);
    let twice = sort_cells(&sort_points(&sort_cells(&sort_points(&mesh).unwrap()).unwrap()).unwrap()).unwrap();
    let Mesh::Transformed(view) = &*twice else {
        panic!("sorting yields a view");
    };
    assert!(!matches!(&**view.base(), Mesh::Transformed(_)));
    assert!(Arc::ptr_eq(view.base(), &mesh));
}

#[test]
fn views_compose_like_a_single_permutation() {
    let (points, quads) = grid(2, 1);
    let mesh = quad_mesh(points, quads);
    let n = mesh.num_points();
    let p: Vec<usize> = (0..n).rev().collect();
    let q: Vec<usize> = (0..n).map(|i| (i + 2) % n).collect();

    let stepwise = TransformedMesh::of(&mesh)
        .with_point_permutation(p.clone())
        .unwrap()
        .with_point_permutation(q.clone())
        .unwrap();
    let composed: Vec<usize> = q.iter().map(|&i| p[i]).collect();
    let direct = TransformedMesh::of(&mesh).with_point_permutation(composed).unwrap();
    assert_identical(&Mesh::from(stepwise), &Mesh::from(direct));
}

#[test]
fn reducing_the_dimension_is_rejected() {
    let (points, quads) = grid(1, 1);
    let mesh = quad_mesh(points, quads);
    let err = fieldcompare::algs::extend_space_dimension_to(1, &mesh).unwrap_err();
    assert!(matches!(err, FieldCompareError::DimensionReduction { from: 2, to: 1 }));
}

proptest! {
    #[test]
    fn sort_is_invariant_under_renumbering(
        (nx, ny, point_order, cell_order) in (1usize..4, 1usize..4).prop_flat_map(|(nx, ny)| {
            let num_points = (nx + 1) * (ny + 1);
            let num_cells = nx * ny;
            (
                Just(nx),
                Just(ny),
                Just((0..num_points).collect::<Vec<_>>()).prop_shuffle(),
                Just((0..num_cells).collect::<Vec<_>>()).prop_shuffle(),
            )
        })
    ) {
        let (points, quads) = grid(nx, ny);
        let original = quad_mesh(points.clone(), quads.clone());
        let shuffled = renumbered(&points, &quads, &point_order, &cell_order);

        let a = sort(&original).unwrap();
        let b = sort(&shuffled).unwrap();
        prop_assert_eq!(a.points(), b.points());
        prop_assert_eq!(a.connectivity(CellType::Quad), b.connectivity(CellType::Quad));
        prop_assert!(a.equals(&b).is_success());
    }

    #[test]
    fn sort_is_idempotent(
        (nx, ny, point_order) in (1usize..4, 1usize..4).prop_flat_map(|(nx, ny)| {
            let num_points = (nx + 1) * (ny + 1);
            (Just(nx), Just(ny), Just((0..num_points).collect::<Vec<_>>()).prop_shuffle())
        })
    ) {
        let (points, quads) = grid(nx, ny);
        let cell_order: Vec<usize> = (0..quads.len()).collect();
        let mesh = renumbered(&points, &quads, &point_order, &cell_order);
        let once = sort(&mesh).unwrap();
        let twice = sort(&once).unwrap();
        prop_assert_eq!(once.points(), twice.points());
        prop_assert_eq!(once.connectivity(CellType::Quad), twice.connectivity(CellType::Quad));
    }
}
