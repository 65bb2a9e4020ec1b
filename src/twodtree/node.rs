use crate::geometry::{Point, Rect};
use crate::r#type::IndexableNum;

/// Which child slot a point routes to from a given node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Lower,
    Upper,
}

/// A vertex of the tree, stored in the tree's node arena.
///
/// Children are arena indices. A node's rectangle is fixed when the node is created and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<N: IndexableNum> {
    pub(crate) point: Point<N>,

    /// `true` if the children are separated by comparing x, `false` for y.
    pub(crate) splits_on_x: bool,

    /// The region every point of this subtree lies in.
    pub(crate) rect: Rect<N>,

    /// Number of nodes in this subtree, including this one.
    pub(crate) size: usize,

    pub(crate) lower: Option<usize>,
    pub(crate) upper: Option<usize>,
}

impl<N: IndexableNum> Node<N> {
    pub(crate) fn new(point: Point<N>, splits_on_x: bool, rect: Rect<N>) -> Self {
        Self {
            point,
            splits_on_x,
            rect,
            size: 1,
            lower: None,
            upper: None,
        }
    }

    /// Route a point that is not equal to this node's point.
    ///
    /// Strictly less on this node's axis goes to `lower`, anything else (ties included) to
    /// `upper`. Insertion and every lookup must share this rule.
    #[inline]
    pub(crate) fn side_of(&self, point: &Point<N>) -> Side {
        if point.coord(self.splits_on_x) < self.point.coord(self.splits_on_x) {
            Side::Lower
        } else {
            Side::Upper
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<usize> {
        match side {
            Side::Lower => self.lower,
            Side::Upper => self.upper,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, id: usize) {
        match side {
            Side::Lower => self.lower = Some(id),
            Side::Upper => self.upper = Some(id),
        }
    }

    /// The rectangle a new child on `side` governs.
    pub(crate) fn child_rect(&self, side: Side) -> Rect<N> {
        let at = self.point.coord(self.splits_on_x);
        match side {
            Side::Lower => self.rect.clip_lower(self.splits_on_x, at),
            Side::Upper => self.rect.clip_upper(self.splits_on_x, at),
        }
    }
}
