use crate::utils::Tolerance;
use crate::Point;

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum BoundingBoxTopBottomEdge {
    Top,
    Bottom,
    None
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum BoundingBoxLeftRightEdge {
    Left,
    Right,
    None
}

/// The corners of a [BoundingBox].
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl Corner {
    /// All corners, in the counter-clockwise order the perimeter is walked in, starting at the bottom left.
    pub const ALL: [Corner; 4] = [Corner::BottomLeft, Corner::BottomRight, Corner::TopRight, Corner::TopLeft];

    /// Position of this corner in [Corner::ALL].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Corner::BottomLeft => 0,
            Corner::BottomRight => 1,
            Corner::TopRight => 2,
            Corner::TopLeft => 3,
        }
    }
}

/// Defines a rectangular bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    /// The bottom left point of the rectangle.
    min: Point,

    /// The top right point of the rectangle.
    max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new_centered_square(2.0) // square from [-1, 1] on xy
    }
}

impl BoundingBox {
    /// Constructs a new bounding box.
    ///
    /// # Arguments
    ///
    /// * `origin` - The position of the center of the bounding box
    /// * `width` - The bounding box's width
    /// * `height` - The bounding box's height
    ///
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            min: Point { x: origin.x - width / 2.0, y: origin.y - height / 2.0 },
            max: Point { x: origin.x + width / 2.0, y: origin.y + height / 2.0 },
        }
    }

    /// Constructs a new bounding box from its bottom left (`min`) and top right (`max`) corners.
    pub fn from_min_max(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Constructs a new bounding box centeterd at origin with the provided width and height.
    pub fn new_centered(width: f64, height: f64) -> Self {
        Self::new(Point { x: 0.0, y: 0.0 }, width, height)
    }

    /// Constructs a new square bounding box centeterd at origin with the provided width.
    pub fn new_centered_square(width: f64) -> Self {
        Self::new_centered(width, width)
    }

    /// Gets the position of the bottom left corner of the bounding box.
    #[inline]
    pub fn min(&self) -> &Point {
        &self.min
    }

    /// Gets the position of the top right corner of the bounding box.
    #[inline]
    pub fn max(&self) -> &Point {
        &self.max
    }

    /// Gets the position of the top right corner of the bounding box.
    #[inline]
    pub fn top_right(&self) -> &Point {
        &self.max
    }

    /// Gets the position of the box's center.
    #[inline]
    pub fn center(&self) -> Point {
        Point { x: (self.min.x + self.max.x) / 2.0, y: (self.min.y + self.max.y) / 2.0 }
    }

    /// Gets the width of the bounding box.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounding box.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether the bounds are finite and describe a rectangle of positive area.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.x < self.max.x && self.min.y < self.max.y
    }

    /// Position of the given corner.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::BottomLeft => self.min,
            Corner::BottomRight => Point { x: self.max.x, y: self.min.y },
            Corner::TopRight => self.max,
            Corner::TopLeft => Point { x: self.min.x, y: self.max.y },
        }
    }

    /// The four corners, counter-clockwise starting at the bottom left.
    pub fn corners(&self) -> [Point; 4] {
        Corner::ALL.map(|c| self.corner(c))
    }

    /// Returns whether a given point is inside (or on the edges) of the bounding box.
    #[inline]
    pub fn is_inside(&self, point: &Point) -> bool {
        // left.x <= point.x <= right.x
        let horizonal_ok = (self.min.x <= point.x) && (point.x <= self.max.x);
        // bottom.y <= point.y <= top.y
        let vertical_ok = (self.min.y <= point.y) && (point.y <= self.max.y);

        horizonal_ok && vertical_ok
    }

    /// Same as inside, but return false if point is on the box edge.
    #[inline]
    pub fn is_exclusively_inside(&self, point: &Point) -> bool {
        // left.x < point.x < right.x
        let horizonal_ok = (self.min.x < point.x) && (point.x < self.max.x);
        // bottom.y < point.y < top.y
        let vertical_ok = (self.min.y < point.y) && (point.y < self.max.y);

        horizonal_ok && vertical_ok
    }

    /// The comparison tolerance every stage uses for geometry inside this box.
    pub(crate) fn tolerance(&self) -> Tolerance {
        let scale = self.width()
            .max(self.height())
            .max(self.min.x.abs())
            .max(self.min.y.abs())
            .max(self.max.x.abs())
            .max(self.max.y.abs());
        Tolerance::new(scale)
    }

    /// Same as [Self::is_inside], but accepts points up to `tolerance` outside.
    #[inline]
    pub(crate) fn is_inside_within(&self, point: &Point, tolerance: Tolerance) -> bool {
        let e = tolerance.value();
        (self.min.x - e <= point.x) && (point.x <= self.max.x + e)
            && (self.min.y - e <= point.y) && (point.y <= self.max.y + e)
    }

    /// Returns which edge, if any, the given `point` is located.
    #[inline]
    pub(crate) fn which_edge(&self, point: &Point, tolerance: Tolerance) -> (BoundingBoxTopBottomEdge, BoundingBoxLeftRightEdge) {
        (
            if tolerance.eq(point.y, self.max.y) {
                BoundingBoxTopBottomEdge::Top
            } else if tolerance.eq(point.y, self.min.y) {
                BoundingBoxTopBottomEdge::Bottom
            } else {
                BoundingBoxTopBottomEdge::None
            },

            if tolerance.eq(point.x, self.max.x) {
                BoundingBoxLeftRightEdge::Right
            } else if tolerance.eq(point.x, self.min.x) {
                BoundingBoxLeftRightEdge::Left
            } else {
                BoundingBoxLeftRightEdge::None
            }
        )
    }

    /// Returns the corner the point is located at, if any.
    pub(crate) fn which_corner(&self, point: &Point, tolerance: Tolerance) -> Option<Corner> {
        match self.which_edge(point, tolerance) {
            (BoundingBoxTopBottomEdge::Bottom, BoundingBoxLeftRightEdge::Left) => Some(Corner::BottomLeft),
            (BoundingBoxTopBottomEdge::Bottom, BoundingBoxLeftRightEdge::Right) => Some(Corner::BottomRight),
            (BoundingBoxTopBottomEdge::Top, BoundingBoxLeftRightEdge::Right) => Some(Corner::TopRight),
            (BoundingBoxTopBottomEdge::Top, BoundingBoxLeftRightEdge::Left) => Some(Corner::TopLeft),
            _ => None,
        }
    }

    /// Moves coordinates within `tolerance` of a side exactly onto that side and clamps the point into the box.
    pub(crate) fn snap(&self, point: &Point, tolerance: Tolerance) -> Point {
        let snap = |v: f64, min: f64, max: f64| {
            if tolerance.eq(v, min) || v < min {
                min
            } else if tolerance.eq(v, max) || v > max {
                max
            } else {
                v
            }
        };

        Point {
            x: snap(point.x, self.min.x, self.max.x),
            y: snap(point.y, self.min.y, self.max.y),
        }
    }

    /// Length of the box's perimeter.
    #[inline]
    pub(crate) fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Distance walked counter-clockwise along the perimeter, starting at the bottom left corner, to reach `point`.
    ///
    /// Returns `None` if `point` is not on the perimeter.
    pub(crate) fn perimeter_position(&self, point: &Point, tolerance: Tolerance) -> Option<f64> {
        let (tb, lr) = self.which_edge(point, tolerance);
        let w = self.width();
        let h = self.height();

        // bottom includes both bottom corners, right the top right, top the top left
        if tb == BoundingBoxTopBottomEdge::Bottom {
            Some((point.x - self.min.x).clamp(0.0, w))
        } else if lr == BoundingBoxLeftRightEdge::Right {
            Some(w + (point.y - self.min.y).clamp(0.0, h))
        } else if tb == BoundingBoxTopBottomEdge::Top {
            Some(w + h + (self.max.x - point.x).clamp(0.0, w))
        } else if lr == BoundingBoxLeftRightEdge::Left {
            Some(2.0 * w + h + (self.max.y - point.y).clamp(0.0, h))
        } else {
            None
        }
    }

    /// Perimeter position of a corner, see [Self::perimeter_position].
    pub(crate) fn corner_perimeter_position(&self, corner: Corner) -> f64 {
        match corner {
            Corner::BottomLeft => 0.0,
            Corner::BottomRight => self.width(),
            Corner::TopRight => self.width() + self.height(),
            Corner::TopLeft => 2.0 * self.width() + self.height(),
        }
    }

    /// Walks the perimeter counter-clockwise from perimeter position `from` to perimeter position `to`
    /// and returns the corners strictly in between, in walking order.
    ///
    /// Positions within `tolerance` of each other are the same point, so no corner is returned and no full turn is made.
    pub(crate) fn corners_between(&self, from: f64, to: f64, tolerance: Tolerance) -> Vec<Corner> {
        let perimeter = self.perimeter();
        let forward = |p: f64| (p - from).rem_euclid(perimeter);
        let distance = forward(to);
        if distance <= tolerance.value() || perimeter - distance <= tolerance.value() {
            return Vec::new();
        }

        let mut corners: Vec<(f64, Corner)> = Corner::ALL.iter()
            .map(|&c| (forward(self.corner_perimeter_position(c)), c))
            .filter(|&(d, _)| tolerance.gt(d, 0.0) && tolerance.gt(distance, d))
            .collect();
        corners.sort_by(|a, b| a.0.total_cmp(&b.0));
        corners.into_iter().map(|(_, c)| c).collect()
    }

    /// Parameter interval `[t0, t1]` over which the line `anchor + t * direction` is inside the box.
    ///
    /// Returns `None` if the line misses the box. A direction component that is exactly zero is parallel to two sides,
    /// which then constrain nothing as long as the line runs between them.
    pub(crate) fn clip_line(&self, anchor: &Point, direction: &Point) -> Option<(f64, f64)> {
        let mut t0 = f64::NEG_INFINITY;
        let mut t1 = f64::INFINITY;

        for &(a, d, min, max) in &[
            (anchor.x, direction.x, self.min.x, self.max.x),
            (anchor.y, direction.y, self.min.y, self.max.y),
        ] {
            if d == 0.0 {
                if a < min || a > max {
                    return None;
                }
                continue;
            }

            let (near, far) = if d > 0.0 {
                ((min - a) / d, (max - a) / d)
            } else {
                ((max - a) / d, (min - a) / d)
            };
            t0 = t0.max(near);
            t1 = t1.min(far);
        }

        if t0 <= t1 && t0.is_finite() && t1.is_finite() {
            Some((t0, t1))
        } else {
            None
        }
    }
}
