//! Utilities to traverse the TwoDTree structure.

use std::iter::FusedIterator;

use geo_traits::{
    GeometryTrait, GeometryType, RectTrait, UnimplementedGeometryCollection, UnimplementedLine,
    UnimplementedLineString, UnimplementedMultiLineString, UnimplementedMultiPoint,
    UnimplementedMultiPolygon, UnimplementedPoint, UnimplementedPolygon, UnimplementedTriangle,
};
use tinyvec::TinyVec;

use crate::geometry::{Point, Rect};
use crate::r#type::IndexableNum;
use crate::twodtree::node::Node;

/// A reference onto a single node of a tree, for manual traversal.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a, N: IndexableNum> {
    /// The arena this node lives in
    nodes: &'a [Node<N>],
    id: usize,
}

impl<'a, N: IndexableNum> NodeRef<'a, N> {
    pub(crate) fn new(nodes: &'a [Node<N>], id: usize) -> Self {
        Self { nodes, id }
    }

    #[inline]
    fn node(&self) -> &'a Node<N> {
        &self.nodes[self.id]
    }

    /// The point stored at this node.
    pub fn point(&self) -> Point<N> {
        self.node().point
    }

    /// `true` if this node's children are separated by their x coordinate, `false` for y.
    pub fn splits_on_x(&self) -> bool {
        self.node().splits_on_x
    }

    /// The region all points of this subtree lie in.
    pub fn rect(&self) -> Rect<N> {
        self.node().rect
    }

    /// The number of points in this subtree, including this node's own point.
    pub fn size(&self) -> usize {
        self.node().size
    }

    /// The child holding points strictly below this node's point on its splitting axis.
    pub fn lower(&self) -> Option<NodeRef<'a, N>> {
        self.node().lower.map(|id| NodeRef::new(self.nodes, id))
    }

    /// The child holding points at or above this node's point on its splitting axis.
    pub fn upper(&self) -> Option<NodeRef<'a, N>> {
        self.node().upper.map(|id| NodeRef::new(self.nodes, id))
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        let node = self.node();
        node.lower.is_none() && node.upper.is_none()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }
}

impl<N: IndexableNum> GeometryTrait for NodeRef<'_, N> {
    type T = N;
    type PointType<'b>
        = UnimplementedPoint<N>
    where
        Self: 'b;
    type LineStringType<'b>
        = UnimplementedLineString<N>
    where
        Self: 'b;
    type PolygonType<'b>
        = UnimplementedPolygon<N>
    where
        Self: 'b;
    type MultiPointType<'b>
        = UnimplementedMultiPoint<N>
    where
        Self: 'b;
    type MultiLineStringType<'b>
        = UnimplementedMultiLineString<N>
    where
        Self: 'b;
    type MultiPolygonType<'b>
        = UnimplementedMultiPolygon<N>
    where
        Self: 'b;
    type GeometryCollectionType<'b>
        = UnimplementedGeometryCollection<N>
    where
        Self: 'b;
    type RectType<'b>
        = Rect<N>
    where
        Self: 'b;
    type TriangleType<'b>
        = UnimplementedTriangle<N>
    where
        Self: 'b;
    type LineType<'b>
        = UnimplementedLine<N>
    where
        Self: 'b;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> GeometryType<
        '_,
        UnimplementedPoint<N>,
        UnimplementedLineString<N>,
        UnimplementedPolygon<N>,
        UnimplementedMultiPoint<N>,
        UnimplementedMultiLineString<N>,
        UnimplementedMultiPolygon<N>,
        UnimplementedGeometryCollection<N>,
        Rect<N>,
        UnimplementedTriangle<N>,
        UnimplementedLine<N>,
    > {
        GeometryType::Rect(&self.node().rect)
    }
}

impl<N: IndexableNum> RectTrait for NodeRef<'_, N> {
    type CoordType<'a>
        = Point<N>
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        let rect = self.rect();
        Point::new(rect.min_x(), rect.min_y())
    }

    fn max(&self) -> Self::CoordType<'_> {
        let rect = self.rect();
        Point::new(rect.max_x(), rect.max_y())
    }
}

/// An in-order iterator over all points of a tree: the `lower` subtree, then the node's own
/// point, then the `upper` subtree.
///
/// Created by [`TwoDTreeIndex::points`][crate::twodtree::TwoDTreeIndex::points].
#[derive(Debug, Clone)]
pub struct Points<'a, N: IndexableNum> {
    nodes: &'a [Node<N>],

    /// Nodes whose point and upper subtree are still to be yielded. The top is next.
    stack: TinyVec<[usize; 32]>,

    remaining: usize,
}

impl<'a, N: IndexableNum> Points<'a, N> {
    pub(crate) fn new(nodes: &'a [Node<N>], root: Option<usize>) -> Self {
        let mut points = Self {
            nodes,
            stack: TinyVec::new(),
            remaining: root.map_or(0, |id| nodes[id].size),
        };
        points.push_lower_spine(root);
        points
    }

    fn push_lower_spine(&mut self, mut next: Option<usize>) {
        while let Some(id) = next {
            self.stack.push(id);
            next = self.nodes[id].lower;
        }
    }
}

impl<N: IndexableNum> Iterator for Points<'_, N> {
    type Item = Point<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.nodes[id];
        self.push_lower_spine(node.upper);
        self.remaining -= 1;
        Some(node.point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<N: IndexableNum> ExactSizeIterator for Points<'_, N> {}

impl<N: IndexableNum> FusedIterator for Points<'_, N> {}
