//! Tolerance-aware ordering of coordinate tuples.
//!
//! Sorting with a comparator that treats nearby values as equal is not a
//! total order (closeness is not transitive), so [`fuzzy_lex_sort`] never
//! hands such a comparator to a sort routine. It sorts exactly along one
//! axis, groups values that lie within the tolerance of their neighbour
//! into runs, and refines each run along the next axis.

use std::cmp::Ordering;

/// Exact lexicographic comparison using the IEEE total order; shorter
/// tuples sort first when one is a prefix of the other.
pub fn exact_lex_cmp(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Whether all coordinates differ by less than `tol` (exactly equal when
/// `tol` is zero).
pub fn points_coincide(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            let d = (x - y).abs();
            d == 0.0 || d < tol
        })
}

/// Order `order` (indices into some collection) by the coordinate tuples
/// `key(i)`, treating coordinates within `tol` as equal on every axis but
/// the last one they differ on.
///
/// The result depends only on the key values: permuting the input yields
/// the same sequence of keys. Indices with identical keys keep their
/// relative input order.
pub fn fuzzy_lex_sort<'k, K>(order: &mut [usize], key: K, tol: f64)
where
    K: Fn(usize) -> &'k [f64],
{
    refine(order, &key, tol, 0);
}

fn refine<'k, K>(order: &mut [usize], key: &K, tol: f64, axis: usize)
where
    K: Fn(usize) -> &'k [f64],
{
    if order.len() < 2 {
        return;
    }
    // exhausted keys first, like a prefix in lexicographic order
    order.sort_by_key(|&i| key(i).len() > axis);
    let start = order.partition_point(|&i| key(i).len() <= axis);
    let rest = &mut order[start..];
    rest.sort_by(|&a, &b| {
        let (ka, kb) = (key(a), key(b));
        ka[axis]
            .total_cmp(&kb[axis])
            .then_with(|| exact_lex_cmp(&ka[axis + 1..], &kb[axis + 1..]))
    });

    let mut run_start = 0;
    for i in 1..=rest.len() {
        let run_ends = i == rest.len() || {
            let (prev, next) = (key(rest[i - 1])[axis], key(rest[i])[axis]);
            !((next - prev).abs() <= tol)
        };
        if run_ends {
            if i - run_start > 1 {
                refine(&mut rest[run_start..i], key, tol, axis + 1);
            }
            run_start = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(keys: &[Vec<f64>], tol: f64) -> Vec<usize> {
        let mut order: Vec<usize> = (0..keys.len()).collect();
        fuzzy_lex_sort(&mut order, |i| keys[i].as_slice(), tol);
        order
    }

    #[test]
    fn nearly_equal_leading_axis_defers_to_next_axis() {
        let keys = vec![vec![1e-12, 1.0], vec![0.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(sorted(&keys, 1e-9), vec![1, 0, 2]);
        // without tolerance the tiny x offset decides
        assert_eq!(sorted(&keys, 0.0), vec![1, 0, 2]);
        let keys = vec![vec![1e-12, 0.0], vec![0.0, 1.0]];
        assert_eq!(sorted(&keys, 1e-9), vec![0, 1]);
        assert_eq!(sorted(&keys, 0.0), vec![1, 0]);
    }

    #[test]
    fn chained_near_ties_do_not_depend_on_input_order() {
        // x values chain within the tolerance: 0 ~ 0.8e-9 ~ 1.6e-9
        let keys = vec![vec![1.6e-9, 0.5], vec![0.0, 1.0], vec![0.8e-9, 0.0], vec![2.0, 0.0]];
        let expected: Vec<&[f64]> = sorted(&keys, 1e-9).iter().map(|&i| keys[i].as_slice()).collect();
        assert_eq!(expected, [&[0.8e-9, 0.0][..], &[1.6e-9, 0.5], &[0.0, 1.0], &[2.0, 0.0]]);
        for order in [[3, 2, 1, 0], [1, 3, 0, 2], [2, 0, 3, 1]] {
            let mut order = order.to_vec();
            fuzzy_lex_sort(&mut order, |i| keys[i].as_slice(), 1e-9);
            let got: Vec<&[f64]> = order.iter().map(|&i| keys[i].as_slice()).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn prefixes_sort_first() {
        let keys = vec![vec![0.0, 1.0], vec![0.0]];
        assert_eq!(sorted(&keys, 0.1), vec![1, 0]);
    }

    #[test]
    fn coincidence() {
        assert!(points_coincide(&[0.0, 0.0], &[5e-10, 0.0], 1e-9));
        assert!(!points_coincide(&[0.0, 0.0], &[1e-9, 0.0], 1e-9));
        assert!(points_coincide(&[1.0], &[1.0], 0.0));
    }
}
