use crate::Point;

/// Relative epsilon applied to the extent of the bounding box to produce the shared [Tolerance].
pub(crate) const RELATIVE_EPSILON: f64 = 1e-9;

/// Sites closer than this many tolerances apart are merged into one site.
pub(crate) const COINCIDENT_SITE_FACTOR: f64 = 100.0;

/// Absolute epsilon used by every stage of the construction for approximate comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Tolerance(f64);

impl Tolerance {
    /// Creates a tolerance for coordinates of magnitude up to `scale`.
    pub fn new(scale: f64) -> Self {
        Self((RELATIVE_EPSILON * scale.abs()).max(f64::MIN_POSITIVE))
    }

    /// The absolute epsilon.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn eq(self, a: f64, b: f64) -> bool {
        abs_diff_eq(a, b, self.0)
    }

    #[inline]
    pub fn points_eq(self, a: &Point, b: &Point) -> bool {
        self.eq(a.x, b.x) && self.eq(a.y, b.y)
    }

    /// The same tolerance widened by `factor`.
    #[inline]
    pub fn scaled(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }

    /// Whether `a` is greater than `b` by more than the tolerance.
    #[inline]
    pub fn gt(self, a: f64, b: f64) -> bool {
        a - b > self.0
    }
}

/// Circumcenter of the triangle `a`, `b`, `c`.
///
/// Returns `None` when the three points are collinear (or coincident) and the center is at infinity.
pub(crate) fn cicumcenter(a: &Point, b: &Point, c: &Point) -> Option<Point> {
    // move origin to a
    let b_x = b.x - a.x;
    let b_y = b.y - a.y;
    let c_x = c.x - a.x;
    let c_y = c.y - a.y;

    let bb = b_x * b_x + b_y * b_y;
    let cc = c_x * c_x + c_y * c_y;
    let det = 2.0 * (b_x * c_y - b_y * c_x);
    if det == 0.0 {
        return None;
    }

    let d = 1.0 / det;
    let center = Point {
        x: a.x + d * (c_y * bb - b_y * cc),
        y: a.y + d * (b_x * cc - c_x * bb),
    };

    if center.is_finite() {
        Some(center)
    } else {
        None
    }
}

/// Calculates the squared distance between a and b
#[inline]
pub(crate) fn dist2(a: &Point, b: &Point) -> f64 {
    let x = a.x - b.x;
    let y = a.y - b.y;
    (x * x) + (y * y)
}

#[inline]
pub(crate) fn abs_diff_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (if a > b {
        a - b
    } else {
        b - a
    }) <= epsilon
}

/// Orientation of `c` relative to the directed line `a` -> `b`, computed with adaptive precision.
///
/// Positive when `a`, `b`, `c` are counter-clockwise, negative when clockwise and exactly zero when collinear.
#[inline]
pub(crate) fn orient2d(a: &Point, b: &Point, c: &Point) -> f64 {
    robust::orient2d(
        robust::Coord { x: a.x, y: a.y },
        robust::Coord { x: b.x, y: b.y },
        robust::Coord { x: c.x, y: c.y },
    )
}

/// Average of the points. Inside the polygon whenever the points are the vertices of a convex polygon.
pub(crate) fn calculate_approximated_cetroid<'a>(points: impl Iterator<Item = &'a Point>) -> Option<Point> {
    let mut r = Point { x: 0.0, y: 0.0 };
    let mut n = 0;
    for p in points {
        r.x += p.x;
        r.y += p.y;
        n += 1;
    }

    if n == 0 {
        return None;
    }

    let n = n as f64;
    r.x /= n;
    r.y /= n;

    Some(r)
}

/// Signed area of a polygon. Positive when its vertices are ordered counter-clockwise.
pub(crate) fn polygon_area<'a>(points: impl Iterator<Item = &'a Point> + Clone) -> f64 {
    let first = points.clone().next();
    let mut previous = match first {
        Some(p) => p,
        None => return 0.0,
    };

    let mut twice_area = 0.0;
    for p in points.skip(1).chain(first) {
        twice_area += previous.perp_dot(p);
        previous = p;
    }

    twice_area / 2.0
}
