//! Planar value types: [`Point`] and the axis-aligned [`Rect`].
//!
//! Both are immutable `Copy` values with no knowledge of the tree. They implement the
//! [`geo_traits`] coordinate and rectangle traits so they interoperate with other georust crates.

use geo_traits::{
    CoordTrait, GeometryTrait, GeometryType, RectTrait, UnimplementedGeometryCollection,
    UnimplementedLine, UnimplementedLineString, UnimplementedMultiLineString,
    UnimplementedMultiPoint, UnimplementedMultiPolygon, UnimplementedPoint, UnimplementedPolygon,
    UnimplementedTriangle,
};

use crate::error::{Result, TwoDTreeError};
use crate::r#type::IndexableNum;

/// A point in the plane.
///
/// Equality is exact coordinate equality, without any tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<N: IndexableNum> {
    x: N,
    y: N,
}

impl<N: IndexableNum> Point<N> {
    /// Create a new point.
    ///
    /// Construction never fails; a point with a NaN or infinite coordinate is rejected by the tree
    /// operations it is passed to.
    pub fn new(x: N, y: N) -> Self {
        Self { x, y }
    }

    /// Create a point from any [`CoordTrait`] implementation.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Self {
        Self::new(coord.x(), coord.y())
    }

    /// The `x` coordinate.
    #[inline]
    pub fn x(&self) -> N {
        self.x
    }

    /// The `y` coordinate.
    #[inline]
    pub fn y(&self) -> N {
        self.y
    }

    /// Returns `true` if neither coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// The coordinate compared by a node that splits on x (`true`) or on y (`false`).
    #[inline]
    pub(crate) fn coord(&self, splits_on_x: bool) -> N {
        if splits_on_x {
            self.x
        } else {
            self.y
        }
    }

    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_squared_to(&self, other: &Point<N>) -> N {
        sq_dist(self.x, self.y, other.x, other.y)
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point<N>) -> N {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl<N: IndexableNum> From<(N, N)> for Point<N> {
    fn from((x, y): (N, N)) -> Self {
        Self::new(x, y)
    }
}

impl<N: IndexableNum> From<[N; 2]> for Point<N> {
    fn from([x, y]: [N; 2]) -> Self {
        Self::new(x, y)
    }
}

impl<N: IndexableNum> CoordTrait for Point<N> {
    type T = N;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

/// An axis-aligned rectangle, closed on all four sides.
///
/// Bounds may be infinite, which is how the whole plane is represented, but never NaN, and the
/// minimum on each axis never exceeds the maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<N: IndexableNum> {
    min_x: N,
    min_y: N,
    max_x: N,
    max_y: N,
}

impl<N: IndexableNum> Rect<N> {
    /// Create a new rectangle.
    ///
    /// # Panics
    ///
    /// Panics if a bound is NaN or if `min_x > max_x` or `min_y > max_y`. Use [`Rect::try_new`]
    /// for untrusted input.
    pub fn new(min_x: N, min_y: N, max_x: N, max_y: N) -> Self {
        match Self::try_new(min_x, min_y, max_x, max_y) {
            Ok(rect) => rect,
            Err(err) => panic!("{}", err),
        }
    }

    /// Create a new rectangle, failing with [`TwoDTreeError::InvalidArgument`] on a NaN bound or
    /// an inverted axis.
    pub fn try_new(min_x: N, min_y: N, max_x: N, max_y: N) -> Result<Self> {
        if min_x.is_nan() || min_y.is_nan() || max_x.is_nan() || max_y.is_nan() {
            return Err(TwoDTreeError::InvalidArgument(format!(
                "rectangle bounds must not be NaN, got [{:?}, {:?}, {:?}, {:?}]",
                min_x, min_y, max_x, max_y
            )));
        }
        if min_x > max_x || min_y > max_y {
            return Err(TwoDTreeError::InvalidArgument(format!(
                "rectangle minimum exceeds maximum, got [{:?}, {:?}, {:?}, {:?}]",
                min_x, min_y, max_x, max_y
            )));
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Create a rectangle from any [`RectTrait`] implementation, validating its bounds.
    pub fn from_rect(rect: &impl RectTrait<T = N>) -> Result<Self> {
        Self::try_new(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// The whole plane.
    pub fn everything() -> Self {
        Self {
            min_x: N::neg_infinity(),
            min_y: N::neg_infinity(),
            max_x: N::infinity(),
            max_y: N::infinity(),
        }
    }

    /// The unit square `[0, 1] x [0, 1]`.
    pub fn unit() -> Self {
        Self {
            min_x: N::zero(),
            min_y: N::zero(),
            max_x: N::one(),
            max_y: N::one(),
        }
    }

    /// Get the minimum `x` value of this rectangle.
    #[inline]
    pub fn min_x(&self) -> N {
        self.min_x
    }

    /// Get the minimum `y` value of this rectangle.
    #[inline]
    pub fn min_y(&self) -> N {
        self.min_y
    }

    /// Get the maximum `x` value of this rectangle.
    #[inline]
    pub fn max_x(&self) -> N {
        self.max_x
    }

    /// Get the maximum `y` value of this rectangle.
    #[inline]
    pub fn max_y(&self) -> N {
        self.max_y
    }

    /// Returns `true` if the point lies inside the rectangle or on its boundary.
    #[inline]
    pub fn contains(&self, point: &Point<N>) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Returns `true` if the two rectangles share at least one point, boundaries included.
    #[inline]
    pub fn intersects(&self, other: &Rect<N>) -> bool {
        if self.max_x < other.min_x {
            return false;
        }
        if self.max_y < other.min_y {
            return false;
        }
        if self.min_x > other.max_x {
            return false;
        }
        if self.min_y > other.max_y {
            return false;
        }
        true
    }

    /// Squared Euclidean distance from the point to the nearest point of the rectangle. Zero if
    /// the point is inside or on the boundary.
    #[inline]
    pub fn distance_squared_to(&self, point: &Point<N>) -> N {
        let dx = axis_dist(point.x, self.min_x, self.max_x);
        let dy = axis_dist(point.y, self.min_y, self.max_y);
        dx * dx + dy * dy
    }

    /// Euclidean distance from the point to the nearest point of the rectangle.
    pub fn distance_to(&self, point: &Point<N>) -> N {
        let dx = axis_dist(point.x, self.min_x, self.max_x);
        let dy = axis_dist(point.y, self.min_y, self.max_y);
        dx.hypot(dy)
    }

    /// The part of this rectangle below `at` on the given axis.
    pub(crate) fn clip_lower(&self, splits_on_x: bool, at: N) -> Self {
        let mut rect = *self;
        if splits_on_x {
            rect.max_x = at;
        } else {
            rect.max_y = at;
        }
        rect
    }

    /// The part of this rectangle at or above `at` on the given axis.
    pub(crate) fn clip_upper(&self, splits_on_x: bool, at: N) -> Self {
        let mut rect = *self;
        if splits_on_x {
            rect.min_x = at;
        } else {
            rect.min_y = at;
        }
        rect
    }
}

impl<N: IndexableNum> Default for Rect<N> {
    fn default() -> Self {
        Self::everything()
    }
}

impl<N: IndexableNum> GeometryTrait for Rect<N> {
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
        GeometryType::Rect(self)
    }
}

impl<N: IndexableNum> RectTrait for Rect<N> {
    type CoordType<'a>
        = Point<N>
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        Point::new(self.min_x, self.min_y)
    }

    fn max(&self) -> Self::CoordType<'_> {
        Point::new(self.max_x, self.max_y)
    }
}

/// Reject a point with a NaN or infinite coordinate.
pub(crate) fn validate_point<N: IndexableNum>(point: &Point<N>) -> Result<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(TwoDTreeError::InvalidArgument(format!(
            "point coordinates must be finite, got ({:?}, {:?})",
            point.x, point.y
        )))
    }
}

#[inline]
pub(crate) fn sq_dist<N: IndexableNum>(ax: N, ay: N, bx: N, by: N) -> N {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// The distance measure a search compares with.
///
/// [`Metric::Squared`] orders exactly like the squared Euclidean distance, but overflows to
/// infinity once two finite points are more than about `sqrt(N::MAX)` apart. [`Metric::Reduced`]
/// is a quarter of the Euclidean distance, computed from quartered coordinates, and stays finite
/// for any two finite points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Metric {
    Squared,
    Reduced,
}

impl Metric {
    /// `value / 4`, exact for normal floats.
    #[inline]
    fn quarter<N: IndexableNum>(value: N) -> N {
        value * (N::one() + N::one()).powi(-2)
    }

    /// The distance between two points.
    #[inline]
    pub(crate) fn points<N: IndexableNum>(self, a: &Point<N>, b: &Point<N>) -> N {
        match self {
            Metric::Squared => a.distance_squared_to(b),
            Metric::Reduced => {
                let dx = Self::quarter(a.x) - Self::quarter(b.x);
                let dy = Self::quarter(a.y) - Self::quarter(b.y);
                dx.hypot(dy)
            }
        }
    }

    /// The distance from a point to the nearest point of a rectangle.
    #[inline]
    pub(crate) fn rect<N: IndexableNum>(self, rect: &Rect<N>, point: &Point<N>) -> N {
        match self {
            Metric::Squared => rect.distance_squared_to(point),
            Metric::Reduced => {
                let q = Self::quarter;
                let dx = axis_dist(q(point.x), q(rect.min_x), q(rect.max_x));
                let dy = axis_dist(q(point.y), q(rect.min_y), q(rect.max_y));
                dx.hypot(dy)
            }
        }
    }

    /// A Euclidean radius expressed in this metric.
    #[inline]
    pub(crate) fn radius<N: IndexableNum>(self, r: N) -> N {
        match self {
            Metric::Squared => r * r,
            Metric::Reduced => Self::quarter(r),
        }
    }
}

/// 1D distance from a value to a range.
#[inline]
fn axis_dist<N: IndexableNum>(k: N, min: N, max: N) -> N {
    if k < min {
        min - k
    } else if k <= max {
        N::zero()
    } else {
        k - max
    }
}

#[cfg(test)]
mod test {
    use geo_traits::{CoordTrait, GeometryTrait, GeometryType, RectTrait};

    use crate::error::TwoDTreeError;
    use crate::geometry::{Metric, Point, Rect};

    #[test]
    fn point_equality_is_exact() {
        assert_eq!(Point::new(0.5, 0.5), Point::new(0.5, 0.5));
        assert_ne!(Point::new(0.5, 0.5), Point::new(0.5, 0.5 + f64::EPSILON));
    }

    #[test]
    fn point_distances() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_squared_to(&b), 25.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn point_coord_trait() {
        let p = Point::new(1.5f32, -2.0);
        assert_eq!(p.nth_or_panic(0), 1.5);
        assert_eq!(p.nth_or_panic(1), -2.0);
        assert_eq!(Point::from_coord(&p), p);
        assert_eq!(Point::from((1.5f32, -2.0)), p);
        assert_eq!(Point::from([1.5f32, -2.0]), p);
    }

    #[test]
    fn rect_rejects_malformed_bounds() {
        assert!(matches!(
            Rect::try_new(1.0, 0.0, 0.0, 1.0),
            Err(TwoDTreeError::InvalidArgument(_))
        ));
        assert!(matches!(
            Rect::try_new(0.0, 1.0, 1.0, 0.0),
            Err(TwoDTreeError::InvalidArgument(_))
        ));
        assert!(matches!(
            Rect::try_new(0.0, f64::NAN, 1.0, 1.0),
            Err(TwoDTreeError::InvalidArgument(_))
        ));
        // degenerate rectangles are allowed
        assert!(Rect::try_new(0.5, 0.5, 0.5, 0.5).is_ok());
    }

    #[test]
    #[should_panic]
    fn rect_new_panics_on_inverted_axis() {
        Rect::new(1.0, 0.0, 0.0, 1.0);
    }

    #[test]
    fn rect_contains_is_boundary_inclusive() {
        let rect = Rect::unit();
        assert!(rect.contains(&Point::new(0.0, 0.0)));
        assert!(rect.contains(&Point::new(1.0, 1.0)));
        assert!(rect.contains(&Point::new(0.5, 1.0)));
        assert!(!rect.contains(&Point::new(1.0 + 1e-9, 0.5)));
        assert!(!rect.contains(&Point::new(0.5, -1e-9)));
    }

    #[test]
    fn rect_intersects() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(a.intersects(&Rect::new(0.5, 0.5, 2.0, 2.0)));
        // touching edges count
        assert!(a.intersects(&Rect::new(1.0, 0.0, 2.0, 1.0)));
        assert!(a.intersects(&Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!a.intersects(&Rect::new(1.1, 0.0, 2.0, 1.0)));
        assert!(!a.intersects(&Rect::new(0.0, -2.0, 1.0, -0.1)));
        assert!(a.intersects(&Rect::everything()));
    }

    #[test]
    fn rect_distance() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(rect.distance_squared_to(&Point::new(0.5, 0.5)), 0.0);
        assert_eq!(rect.distance_squared_to(&Point::new(1.0, 0.5)), 0.0);
        assert_eq!(rect.distance_to(&Point::new(4.0, 5.0)), 5.0);
        assert_eq!(rect.distance_to(&Point::new(0.5, -2.0)), 2.0);
        assert_eq!(Rect::everything().distance_to(&Point::new(1e300, -1e300)), 0.0);
    }

    #[test]
    fn rect_clipping() {
        let rect = Rect::unit();
        assert_eq!(rect.clip_lower(true, 0.25), Rect::new(0.0, 0.0, 0.25, 1.0));
        assert_eq!(rect.clip_upper(true, 0.25), Rect::new(0.25, 0.0, 1.0, 1.0));
        assert_eq!(rect.clip_lower(false, 0.75), Rect::new(0.0, 0.0, 1.0, 0.75));
        assert_eq!(rect.clip_upper(false, 0.75), Rect::new(0.0, 0.75, 1.0, 1.0));
    }

    #[test]
    fn rect_trait_round_trip() {
        let rect = Rect::new(-1.0, -2.0, 3.0, 4.0);
        assert_eq!(rect.min().x(), -1.0);
        assert_eq!(rect.max().y(), 4.0);
        assert_eq!(Rect::from_rect(&rect), Ok(rect));
    }

    #[test]
    fn rect_geometry_trait() {
        let rect = Rect::new(-1.0, -2.0, 3.0, 4.0);
        assert_eq!(rect.dim(), geo_traits::Dimensions::Xy);
        match rect.as_type() {
            GeometryType::Rect(inner) => assert_eq!(*inner, rect),
            _ => panic!("expected a rect"),
        }
    }

    #[test]
    fn metrics_order_alike() {
        let origin: Point<f64> = Point::new(0.0, 0.0);
        let near = Point::new(3.0, 4.0);
        let far = Point::new(-6.0, 1.0);
        for metric in [Metric::Squared, Metric::Reduced] {
            assert!(metric.points(&origin, &near) < metric.points(&origin, &far));
            assert!(metric.points(&origin, &near) < metric.radius(5.1));
            assert!(metric.points(&origin, &near) > metric.radius(4.9));
            let rect = Rect::new(1.0, 1.0, 2.0, 2.0);
            assert_eq!(metric.rect(&rect, &Point::new(1.5, 1.5)), 0.0);
            assert!(metric.rect(&rect, &origin) < metric.points(&origin, &Point::new(2.0, 2.0)));
        }
        assert_eq!(Metric::Squared.points(&origin, &near), 25.0);
        assert!((Metric::Reduced.points(&origin, &near) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn reduced_metric_stays_finite() {
        let a = Point::new(f64::MAX, f64::MAX);
        let b = Point::new(-f64::MAX, -f64::MAX);
        assert_eq!(Metric::Squared.points(&a, &b), f64::INFINITY);
        assert!(Metric::Reduced.points(&a, &b).is_finite());
        assert!(Metric::Reduced.rect(&Rect::new(0.0, 0.0, f64::MAX, f64::MAX), &b).is_finite());
        assert!(Metric::Reduced.rect(&Rect::everything(), &b) == 0.0);

        let a = Point::new(3e19f32, 0.0);
        let b = Point::new(-3e19f32, 0.0);
        assert_eq!(a.distance_to(&b), 6e19);
        assert!(Metric::Reduced.points(&a, &b) > Metric::Reduced.radius(2e19));
    }
}
