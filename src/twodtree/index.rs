use tinyvec::TinyVec;
#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::error::{Result, TwoDTreeError};
use crate::geometry::{validate_point, Point, Rect};
use crate::r#type::IndexableNum;
use crate::twodtree::node::Node;

/// A mutable 2-d tree over points in the plane.
///
/// Points are inserted one at a time. The tree is never rebalanced, so its height depends on the
/// insertion order: random order gives a height of O(log n), but sorted input degrades it to a
/// linear chain and every query to O(n). [`TwoDTree::height`][crate::twodtree::TwoDTreeIndex::height]
/// exposes this. Use [`TwoDTreeBuilder`][crate::twodtree::TwoDTreeBuilder] to bulk load points in
/// an order that keeps the tree shallow.
///
/// Queries live on the [`TwoDTreeIndex`][crate::twodtree::TwoDTreeIndex] trait.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDTree<N: IndexableNum> {
    /// Node arena. Nodes are only ever appended.
    pub(crate) nodes: Vec<Node<N>>,
    pub(crate) root: Option<usize>,
    pub(crate) bounds: Rect<N>,
}

impl<N: IndexableNum> TwoDTree<N> {
    /// Create an empty tree covering the whole plane.
    pub fn new() -> Self {
        Self::with_bounds(Rect::everything())
    }

    /// Create an empty tree whose points are confined to `bounds`.
    ///
    /// The root node governs `bounds`, and inserting a point outside of it fails.
    pub fn with_bounds(bounds: Rect<N>) -> Self {
        Self::with_capacity_and_bounds(0, bounds)
    }

    pub(crate) fn with_capacity_and_bounds(capacity: usize, bounds: Rect<N>) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
            bounds,
        }
    }

    /// Insert a point.
    ///
    /// Returns `Ok(true)` if the point was added and `Ok(false)` if an equal point was already
    /// stored, in which case the tree is unchanged.
    ///
    /// Fails with [`TwoDTreeError::InvalidArgument`] if a coordinate is NaN or infinite or the
    /// point lies outside the tree's bounds. Nothing is modified on failure.
    pub fn insert(&mut self, point: Point<N>) -> Result<bool> {
        validate_insertable(&self.bounds, &point)?;
        Ok(self.insert_valid(point))
    }

    /// Insert a point already known to be finite and inside the bounds.
    pub(crate) fn insert_valid(&mut self, point: Point<N>) -> bool {
        let Some(root) = self.root else {
            self.nodes.push(Node::new(point, true, self.bounds));
            self.root = Some(0);
            #[cfg(feature = "tracing")]
            event!(Level::TRACE, depth = 0, splits_on_x = true, "created root node");
            return true;
        };

        // nodes whose subtree gains the new point
        let mut path: TinyVec<[usize; 32]> = TinyVec::new();
        let mut current = root;
        loop {
            let node = &self.nodes[current];
            if node.point == point {
                return false;
            }
            path.push(current);

            let side = node.side_of(&point);
            match node.child(side) {
                Some(child) => current = child,
                None => {
                    let splits_on_x = !node.splits_on_x;
                    let rect = node.child_rect(side);
                    let id = self.nodes.len();
                    self.nodes.push(Node::new(point, splits_on_x, rect));
                    self.nodes[current].set_child(side, id);
                    for &ancestor in path.iter() {
                        self.nodes[ancestor].size += 1;
                    }
                    #[cfg(feature = "tracing")]
                    event!(
                        Level::TRACE,
                        depth = path.len(),
                        splits_on_x,
                        "created node"
                    );
                    return true;
                }
            }
        }
    }

    /// Insert a point given by its coordinates.
    pub fn insert_xy(&mut self, x: N, y: N) -> Result<bool> {
        self.insert(Point::new(x, y))
    }
}

/// Reject a point that may not be stored in a tree with the given bounds.
pub(crate) fn validate_insertable<N: IndexableNum>(bounds: &Rect<N>, point: &Point<N>) -> Result<()> {
    validate_point(point)?;
    if !bounds.contains(point) {
        return Err(TwoDTreeError::InvalidArgument(format!(
            "point ({:?}, {:?}) lies outside the tree bounds {:?}",
            point.x(),
            point.y(),
            bounds
        )));
    }
    Ok(())
}

impl<N: IndexableNum> Default for TwoDTree<N> {
    fn default() -> Self {
        Self::new()
    }
}
