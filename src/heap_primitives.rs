// Heap intrinsic operations implemented externally.
//
// A heap is a tree-like structure where every subtree's root has a better score
// than all the other nodes in the subtree.
//
// This is implemented with an array that's traversed in a non-linear way. With
// arity `A` the children of node `i` live at `A*i + 1 ..= A*(i + 1)`.
//
// ```text
// A = 2                     0
//              1                         2
//       3            4            5             6
//   7      8      9     10    11     12     13     14
// 15 16  17 18  19 20  21 22 23 24  25
// ```
//
// The last level will often be incomplete.

/// The parent node
///
/// ```
/// use pathsearch::heap_primitives::index_parent;
/// assert_eq!(index_parent::<2>(1), 0);
/// assert_eq!(index_parent::<2>(2), 0);
/// assert_eq!(index_parent::<2>(25), 12);
/// assert_eq!(index_parent::<8>(8), 0);
/// assert_eq!(index_parent::<8>(9), 1);
/// ```
#[inline(always)]
#[must_use]
pub fn index_parent<const A: usize>(i: usize) -> usize {
    debug_assert!(i != 0, "The root has no parent");
    (i - 1) / A
}

/// The first children
///
/// ```
/// use pathsearch::heap_primitives::index_first_children;
/// assert_eq!(index_first_children::<2usize>(0), 1);
/// assert_eq!(index_first_children::<2usize>(11), 23);
/// assert_eq!(index_first_children::<8usize>(1), 9);
/// ```
#[inline(always)]
#[must_use]
pub fn index_first_children<const A: usize>(i: usize) -> usize {
    (A * i) + 1
}

/// The last children
///
/// ```
/// use pathsearch::heap_primitives::index_last_children;
/// assert_eq!(index_last_children::<2usize>(0), 2);
/// assert_eq!(index_last_children::<2usize>(6), 14);
/// assert_eq!(index_last_children::<8usize>(0), 8);
/// ```
#[inline(always)]
#[must_use]
pub fn index_last_children<const A: usize>(i: usize) -> usize {
    A * (i + 1)
}

#[inline(always)]
#[must_use]
fn fight<T: PartialOrd>(a: &[T], l: usize, r: usize) -> usize {
    if a[l] <= a[r] { l } else { r }
}

/// Index of the best (lowest) element among up to 8 siblings.
///
/// Runs a knock-out tournament instead of a linear scan so comparisons within
/// a round don't depend on each other. Ties go to the leftmost element.
///
/// ```text
/// 0   1 2   3 4   5 6   7
/// *   * *   * *   * *   *
///  \ /   \ /   \ /   \ /
///   *     *     *     *
///    \   /       \   /
///      *           *
///        \        /
///            *
/// ```
///
/// ```
/// use pathsearch::heap_primitives::derank;
/// assert_eq!(derank(&[3, 1, 2]), 1);
/// assert_eq!(derank(&[5, 4, 3, 2, 1, 0, 1, 0]), 5);
/// ```
#[inline(always)]
#[must_use]
pub fn derank<T: PartialOrd>(a: &[T]) -> usize {
    match a.len() {
        1 => 0,
        2 => fight(a, 0, 1),
        3 => fight(a, fight(a, 0, 1), 2),
        4 => fight(a, fight(a, 0, 1), fight(a, 2, 3)),
        5 => fight(a, fight(a, fight(a, 0, 1), fight(a, 2, 3)), 4),
        6 => fight(
            a,
            fight(a, fight(a, 0, 1), fight(a, 2, 3)),
            fight(a, 4, 5),
        ),
        7 => fight(
            a,
            fight(a, fight(a, 0, 1), fight(a, 2, 3)),
            fight(a, fight(a, 4, 5), 6),
        ),
        8 => fight(
            a,
            fight(a, fight(a, 0, 1), fight(a, 2, 3)),
            fight(a, fight(a, 4, 5), fight(a, 6, 7)),
        ),
        n => unreachable!("derank supports 1 to 8 siblings, got {n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_min_index<T: PartialOrd>(xs: &[T]) -> usize {
        let mut min_i = 0;
        for (i, x) in xs.iter().enumerate() {
            if *x < xs[min_i] {
                min_i = i;
            }
        }
        min_i
    }

    #[test]
    fn derank_matches_linear_scan() {
        let a = [7u8, 5, 0, 4, 6, 3, 0, 2];
        for len in 1..=a.len() {
            let s = &a[..len];
            assert_eq!(derank(s), linear_min_index(s), "len={len}");
        }
    }

    #[test]
    fn derank_ties_go_left() {
        assert_eq!(derank(&[1u8, 1, 1, 1, 1, 1, 1, 1]), 0);
        assert_eq!(derank(&[2u8, 1, 1]), 1);
        assert_eq!(derank(&[2u8, 2, 2, 2, 1, 2, 1]), 4);
    }

    #[test]
    fn children_round_trip() {
        for i in 0..100 {
            for c in index_first_children::<8>(i)..=index_last_children::<8>(i) {
                assert_eq!(index_parent::<8>(c), i);
            }
        }
    }
}
