use std::cmp::Ordering;

use tinyvec::TinyVec;
#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::r#type::IndexableNum;
use crate::twodtree::index::validate_insertable;
use crate::twodtree::TwoDTree;

/// A builder to bulk load a [`TwoDTree`].
///
/// Points are validated as they are added. [`finish`][Self::finish] inserts them in k-d median
/// order, so the resulting tree stays shallow even when the input is sorted.
///
/// ```
/// use twod_tree::twodtree::{TwoDTreeBuilder, TwoDTreeIndex};
///
/// let mut builder = TwoDTreeBuilder::<f64>::new();
/// for i in 0..100 {
///     builder.add_xy(i as f64, i as f64).unwrap();
/// }
/// let tree = builder.finish();
/// assert_eq!(tree.size(), 100);
/// assert_eq!(tree.height(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct TwoDTreeBuilder<N: IndexableNum> {
    points: Vec<Point<N>>,
    bounds: Rect<N>,
}

impl<N: IndexableNum> TwoDTreeBuilder<N> {
    /// Create a new builder for a tree covering the whole plane.
    pub fn new() -> Self {
        Self::new_with_bounds(Rect::everything())
    }

    /// Create a new builder for a tree whose points are confined to `bounds`.
    pub fn new_with_bounds(bounds: Rect<N>) -> Self {
        Self {
            points: vec![],
            bounds,
        }
    }

    /// Reserve space for at least `additional` more points.
    pub fn with_capacity(mut self, additional: usize) -> Self {
        self.points.reserve(additional);
        self
    }

    /// Add a point to the builder.
    ///
    /// This returns the insertion index. Fails with
    /// [`TwoDTreeError::InvalidArgument`][crate::TwoDTreeError::InvalidArgument] under the same
    /// conditions as [`TwoDTree::insert`].
    pub fn add(&mut self, point: Point<N>) -> Result<usize> {
        validate_insertable(&self.bounds, &point)?;
        self.points.push(point);
        Ok(self.points.len() - 1)
    }

    /// Add a point given by its coordinates.
    pub fn add_xy(&mut self, x: N, y: N) -> Result<usize> {
        self.add(Point::new(x, y))
    }

    /// The number of points added so far, duplicates included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no point has been added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume this builder, inserting the points in k-d median order.
    ///
    /// Each range of points is split at its median on the current axis, the median is inserted,
    /// and both halves are handled the same way on the other axis. Duplicate points are stored
    /// once.
    ///
    /// Points sharing the median's coordinate all end up in the median's `upper` subtree, so
    /// heavily tied input yields a less balanced tree.
    pub fn finish(mut self) -> TwoDTree<N> {
        let mut tree = TwoDTree::with_capacity_and_bounds(self.points.len(), self.bounds);
        let points = self.points.as_mut_slice();

        // (left, right exclusive, splits_on_x)
        let mut stack: TinyVec<[(usize, usize, bool); 32]> = TinyVec::new();
        if !points.is_empty() {
            stack.push((0, points.len(), true));
        }

        while let Some((left, right, splits_on_x)) = stack.pop() {
            let m = (left + right) >> 1;
            let range = &mut points[left..right];
            range.select_nth_unstable_by(m - left, |a, b| compare_on_axis(a, b, splits_on_x));
            let pivot = left + shift_pivot_to_first_tie(range, m - left, splits_on_x);
            tree.insert_valid(points[pivot]);

            if pivot + 1 < right {
                stack.push((pivot + 1, right, !splits_on_x));
            }
            if left < pivot {
                stack.push((left, pivot, !splits_on_x));
            }
        }

        #[cfg(feature = "tracing")]
        {
            use crate::twodtree::TwoDTreeIndex;
            event!(
                Level::DEBUG,
                num_added = points.len(),
                num_items = tree.size(),
                height = tree.height(),
                "finished building tree"
            );
        }

        tree
    }

    /// Consume this builder, inserting the points in the order they were added.
    pub fn finish_in_order(self) -> TwoDTree<N> {
        let mut tree = TwoDTree::with_capacity_and_bounds(self.points.len(), self.bounds);
        for point in self.points {
            tree.insert_valid(point);
        }
        tree
    }
}

impl<N: IndexableNum> Default for TwoDTreeBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// `range` is partitioned around its `m`-th element on the axis. Move the elements before `m`
/// that tie with it to just before `m`, and return the index of the first tied element.
///
/// Every element left of the returned index is then strictly below it on the axis, matching the
/// tree's tie rule, so each half ends up in a single subtree.
fn shift_pivot_to_first_tie<N: IndexableNum>(
    range: &mut [Point<N>],
    m: usize,
    splits_on_x: bool,
) -> usize {
    let at = range[m].coord(splits_on_x);
    let mut below = 0;
    for i in 0..m {
        if range[i].coord(splits_on_x) < at {
            range.swap(below, i);
            below += 1;
        }
    }
    below
}

/// Points are validated on insertion, so coordinates are never NaN.
#[inline]
fn compare_on_axis<N: IndexableNum>(a: &Point<N>, b: &Point<N>, splits_on_x: bool) -> Ordering {
    a.coord(splits_on_x)
        .partial_cmp(&b.coord(splits_on_x))
        .unwrap_or(Ordering::Equal)
}
