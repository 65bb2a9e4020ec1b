use geo_traits::{CoordTrait, RectTrait};
use tinyvec::TinyVec;
#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::error::{Result, TwoDTreeError};
use crate::geometry::{validate_point, Metric, Point, Rect};
use crate::r#type::IndexableNum;
use crate::twodtree::node::{Node, Side};
use crate::twodtree::traversal::{NodeRef, Points};
use crate::twodtree::TwoDTree;

/// A trait for searching and accessing data out of a TwoDTree.
///
/// All queries walk the tree with an explicit stack, so a degenerate, linear-height tree costs
/// time but never call-stack depth.
pub trait TwoDTreeIndex<N: IndexableNum>: Sized {
    /// The node arena of this tree
    fn nodes(&self) -> &[Node<N>];

    /// The arena index of the root node, `None` for an empty tree
    fn root_id(&self) -> Option<usize>;

    /// The region the root node governs
    fn bounds(&self) -> Rect<N>;

    /// The number of distinct points stored in this tree.
    fn size(&self) -> usize {
        self.root_id().map_or(0, |root| self.nodes()[root].size)
    }

    /// Returns `true` if the tree holds no point.
    fn is_empty(&self) -> bool {
        self.root_id().is_none()
    }

    /// The number of levels of the tree: 0 when empty, 1 for a lone root.
    ///
    /// This is O(log n) for points inserted in random order and up to n for sorted input.
    fn height(&self) -> usize {
        let nodes = self.nodes();
        let mut stack: TinyVec<[(usize, usize); 32]> = TinyVec::new();
        if let Some(root) = self.root_id() {
            stack.push((root, 1));
        }

        let mut height = 0;
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &nodes[id];
            if let Some(lower) = node.lower {
                stack.push((lower, depth + 1));
            }
            if let Some(upper) = node.upper {
                stack.push((upper, depth + 1));
            }
        }
        height
    }

    /// Returns `true` if a point equal to `point` is stored.
    ///
    /// Fails with [`TwoDTreeError::InvalidArgument`] if a coordinate is NaN or infinite.
    fn contains(&self, point: &Point<N>) -> Result<bool> {
        validate_point(point)?;
        let nodes = self.nodes();

        let mut next = self.root_id();
        while let Some(id) = next {
            let node = &nodes[id];
            if node.point == *point {
                return Ok(true);
            }
            next = node.child(node.side_of(point));
        }
        Ok(false)
    }

    /// Returns `true` if the point `(x, y)` is stored.
    fn contains_xy(&self, x: N, y: N) -> Result<bool> {
        self.contains(&Point::new(x, y))
    }

    /// Search the tree for points within a given bounding box, boundary included.
    ///
    /// - min_x: bbox
    /// - min_y: bbox
    /// - max_x: bbox
    /// - max_y: bbox
    ///
    /// Returns the points in order: `lower` subtree, node, `upper` subtree. Subtrees whose
    /// rectangle misses the box are never visited. Fails with
    /// [`TwoDTreeError::InvalidArgument`] if a bound is NaN or a minimum exceeds its maximum.
    fn range(&self, min_x: N, min_y: N, max_x: N, max_y: N) -> Result<Vec<Point<N>>> {
        let query = Rect::try_new(min_x, min_y, max_x, max_y)?;
        Ok(collect_in_order(
            self.nodes(),
            self.root_id(),
            |rect| rect.intersects(&query),
            |point| query.contains(point),
        ))
    }

    /// Search the tree for points within a given bounding box.
    fn range_rect(&self, rect: &impl RectTrait<T = N>) -> Result<Vec<Point<N>>> {
        self.range(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Search the tree for points within a given radius, boundary included.
    ///
    /// - qx: x value of query point
    /// - qy: y value of query point
    /// - r: radius
    ///
    /// Returns points in the same order as [`range`][Self::range].
    fn within(&self, qx: N, qy: N, r: N) -> Result<Vec<Point<N>>> {
        let center = Point::new(qx, qy);
        validate_point(&center)?;
        if r.is_nan() || r < N::zero() {
            return Err(TwoDTreeError::InvalidArgument(format!(
                "radius must be non-negative, got {:?}",
                r
            )));
        }

        let metric = if (r * r).is_finite() {
            Metric::Squared
        } else {
            Metric::Reduced
        };
        let radius = metric.radius(r);
        Ok(collect_in_order(
            self.nodes(),
            self.root_id(),
            |rect| metric.rect(rect, &center) <= radius,
            |point| metric.points(point, &center) <= radius,
        ))
    }

    /// Search the tree for points within a given radius of a coordinate.
    fn within_coord(&self, coord: &impl CoordTrait<T = N>, r: N) -> Result<Vec<Point<N>>> {
        self.within(coord.x(), coord.y(), r)
    }

    /// Find the stored point closest to `target` by Euclidean distance.
    ///
    /// Returns `None` only when the tree is empty. When several points are equally close, the
    /// first one met by the search wins: the search starts at the root and always descends into
    /// the child on `target`'s side of the split before the other one.
    ///
    /// Fails with [`TwoDTreeError::InvalidArgument`] if a coordinate is NaN or infinite.
    fn nearest(&self, target: &Point<N>) -> Result<Option<Point<N>>> {
        validate_point(target)?;
        let nodes = self.nodes();
        let Some(root) = self.root_id() else {
            return Ok(None);
        };

        let mut search = nearest_search(nodes, root, target, Metric::Squared);
        if !search.distance.is_finite() {
            // every point is too far away for its squared distance to be finite
            search = nearest_search(nodes, root, target, Metric::Reduced);
        }

        #[cfg(feature = "tracing")]
        event!(
            Level::TRACE,
            visited = search.visited,
            num_items = self.size(),
            "nearest search"
        );

        Ok(Some(search.point))
    }

    /// Find the stored point closest to a coordinate.
    fn nearest_coord(&self, coord: &impl CoordTrait<T = N>) -> Result<Option<Point<N>>> {
        self.nearest(&Point::new(coord.x(), coord.y()))
    }

    /// Iterate over all stored points in order: `lower` subtree, node, `upper` subtree.
    ///
    /// The iterator borrows the tree and can be recreated at any time.
    fn points(&self) -> Points<'_, N> {
        Points::new(self.nodes(), self.root_id())
    }

    /// Access the root node for manual traversal.
    fn root(&self) -> Option<NodeRef<'_, N>> {
        self.root_id().map(|root| NodeRef::new(self.nodes(), root))
    }
}

impl<N: IndexableNum> TwoDTreeIndex<N> for TwoDTree<N> {
    fn nodes(&self) -> &[Node<N>] {
        &self.nodes
    }

    fn root_id(&self) -> Option<usize> {
        self.root
    }

    fn bounds(&self) -> Rect<N> {
        self.bounds
    }
}

/// The outcome of a nearest neighbor search.
#[derive(Debug, Clone, Copy)]
struct NearestSearch<N: IndexableNum> {
    point: Point<N>,
    /// The distance to `point` in the search metric
    distance: N,
    /// The number of nodes whose point was compared
    #[cfg_attr(not(any(test, feature = "tracing")), allow(dead_code))]
    visited: usize,
}

/// Branch and bound search from `root`, comparing distances in `metric`.
///
/// The best match starts out as the root's point and is only replaced by a strictly closer one.
/// A node is skipped when its rectangle is no closer than the best match so far.
fn nearest_search<N: IndexableNum>(
    nodes: &[Node<N>],
    root: usize,
    target: &Point<N>,
    metric: Metric,
) -> NearestSearch<N> {
    let mut best = nodes[root].point;
    let mut best_dist = metric.points(&best, target);
    let mut visited = 0;

    let mut stack: TinyVec<[usize; 33]> = TinyVec::new();
    stack.push(root);
    while let Some(id) = stack.pop() {
        let node = &nodes[id];
        // the bound may have tightened since this node was queued
        if metric.rect(&node.rect, target) >= best_dist {
            continue;
        }
        visited += 1;

        let dist = metric.points(&node.point, target);
        if dist < best_dist {
            best = node.point;
            best_dist = dist;
        }

        let (near, far) = match node.side_of(target) {
            Side::Lower => (node.lower, node.upper),
            Side::Upper => (node.upper, node.lower),
        };
        // Note: these are pushed in backwards order to what gets popped
        for child in [far, near].into_iter().flatten() {
            if metric.rect(&nodes[child].rect, target) < best_dist {
                stack.push(child);
            }
        }
    }

    NearestSearch {
        point: best,
        distance: best_dist,
        visited,
    }
}

/// In-order walk that enters a subtree only if `visit` accepts its rectangle and yields each
/// point that `accept` approves.
fn collect_in_order<N: IndexableNum>(
    nodes: &[Node<N>],
    root: Option<usize>,
    visit: impl Fn(&Rect<N>) -> bool,
    accept: impl Fn(&Point<N>) -> bool,
) -> Vec<Point<N>> {
    let mut result = vec![];

    // (node, emit): emit == true yields the node's own point
    let mut stack: TinyVec<[(usize, bool); 33]> = TinyVec::new();
    if let Some(root) = root {
        if visit(&nodes[root].rect) {
            stack.push((root, false));
        }
    }

    #[cfg(feature = "tracing")]
    let mut visited = 0usize;

    while let Some((id, emit)) = stack.pop() {
        let node = &nodes[id];
        if emit {
            result.push(node.point);
            continue;
        }
        #[cfg(feature = "tracing")]
        {
            visited += 1;
        }

        // Note: these are pushed in backwards order to what gets popped
        if let Some(upper) = node.upper {
            if visit(&nodes[upper].rect) {
                stack.push((upper, false));
            }
        }
        if accept(&node.point) {
            stack.push((id, true));
        }
        if let Some(lower) = node.lower {
            if visit(&nodes[lower].rect) {
                stack.push((lower, false));
            }
        }
    }

    #[cfg(feature = "tracing")]
    event!(
        Level::TRACE,
        visited,
        num_results = result.len(),
        "in-order search"
    );

    result
}
