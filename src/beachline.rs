use crate::event_queue::EventId;
use crate::half_edge::HalfEdgeId;
use crate::Point;

/// Index of an [Arc] in the beachline arena.
pub(crate) type ArcId = usize;

/// A parabolic arc of the beachline.
#[derive(Debug, Clone)]
pub(crate) struct Arc {
    /// The site whose parabola this arc is part of.
    pub site: usize,
    pub prev: Option<ArcId>,
    pub next: Option<ArcId>,

    /// Half-edge traced by the breakpoint between this arc and `next`.
    /// The breakpoint moves along the half-edge's line and its origin is set once the breakpoint stops.
    pub right_half_edge: Option<HalfEdgeId>,

    /// Pending circle event in which this arc disappears.
    pub circle_event: Option<EventId>,

    /// Tombstone, arcs are never removed from the arena.
    pub removed: bool,
}

/// The sequence of arcs intersecting the sweep line, left to right.
///
/// Arcs live in a flat arena and point at their neighbors by index.
#[derive(Debug, Default)]
pub(crate) struct Beachline {
    arcs: Vec<Arc>,
    head: Option<ArcId>,
    tail: Option<ArcId>,
}

impl Beachline {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arcs: Vec::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub fn arc(&self, arc: ArcId) -> &Arc {
        &self.arcs[arc]
    }

    #[inline]
    pub fn arc_mut(&mut self, arc: ArcId) -> &mut Arc {
        &mut self.arcs[arc]
    }

    /// Iterates over the live arcs, left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcId> + '_ {
        std::iter::successors(self.head, move |&a| self.arcs[a].next)
    }

    fn new_arc(&mut self, site: usize, prev: Option<ArcId>, next: Option<ArcId>, right_half_edge: Option<HalfEdgeId>) -> ArcId {
        let id = self.arcs.len();
        self.arcs.push(Arc {
            site,
            prev,
            next,
            right_half_edge,
            circle_event: None,
            removed: false,
        });
        id
    }

    /// Appends an arc for `site` to the right end of the beachline.
    ///
    /// `half_edge` is traced by the breakpoint between the current rightmost arc and the new one.
    pub fn push_back(&mut self, site: usize, half_edge: Option<HalfEdgeId>) -> ArcId {
        let id = self.new_arc(site, self.tail, None, None);
        match self.tail {
            Some(tail) => {
                self.arcs[tail].next = Some(id);
                self.arcs[tail].right_half_edge = half_edge;
            },
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Finds the arc right above `x` when the sweep line is at `sweep_y`.
    ///
    /// Walks the breakpoints from the leftmost arc, so a site event costs `O(arcs)` and a whole sweep `O(n^2)` in the
    /// worst case. The beachline of uniformly spread sites holds about `sqrt(n)` arcs.
    pub fn find_arc_above(&self, x: f64, sweep_y: f64, sites: &[Point]) -> Option<ArcId> {
        let mut current = self.head?;
        while let Some(next) = self.arcs[current].next {
            let breakpoint = breakpoint_x(&sites[self.arcs[current].site], &sites[self.arcs[next].site], sweep_y);
            if x < breakpoint {
                break;
            }
            current = next;
        }

        Some(current)
    }

    /// Splits `arc` in two copies with a new arc for `site` in between.
    ///
    /// `left_half_edge` is traced by the breakpoint (arc, new arc) and `right_half_edge` by (new arc, right copy).
    /// Returns the new middle arc and the right copy; the left copy keeps the id of `arc`.
    pub fn split(&mut self, arc: ArcId, site: usize, left_half_edge: HalfEdgeId, right_half_edge: HalfEdgeId) -> (ArcId, ArcId) {
        let next = self.arcs[arc].next;
        let split_site = self.arcs[arc].site;
        let old_right = self.arcs[arc].right_half_edge;

        let middle = self.new_arc(site, Some(arc), None, Some(right_half_edge));
        let right = self.new_arc(split_site, Some(middle), next, old_right);
        self.arcs[middle].next = Some(right);

        self.arcs[arc].next = Some(middle);
        self.arcs[arc].right_half_edge = Some(left_half_edge);

        match next {
            Some(next) => self.arcs[next].prev = Some(right),
            None => self.tail = Some(right),
        }

        (middle, right)
    }

    /// Unlinks `arc` and returns its former neighbors.
    ///
    /// The breakpoint between the neighbors is left unset for the caller to assign.
    pub fn remove(&mut self, arc: ArcId) -> (Option<ArcId>, Option<ArcId>) {
        let Arc { prev, next, .. } = self.arcs[arc];
        match prev {
            Some(prev) => {
                self.arcs[prev].next = next;
                self.arcs[prev].right_half_edge = None;
            },
            None => self.head = next,
        }
        match next {
            Some(next) => self.arcs[next].prev = prev,
            None => self.tail = prev,
        }

        let removed = &mut self.arcs[arc];
        removed.prev = None;
        removed.next = None;
        removed.right_half_edge = None;
        removed.removed = true;

        (prev, next)
    }
}

/// x coordinate of the breakpoint between the arc of `left` and the arc of `right` (in that order) when the sweep line is at `sweep_y`.
///
/// Two foci on the same row meet at the midpoint, including the degenerate case of both foci on the sweep line.
/// A focus on the sweep line is a vertical ray and the breakpoint is at its x.
pub(crate) fn breakpoint_x(left: &Point, right: &Point, sweep_y: f64) -> f64 {
    let midpoint = (left.x + right.x) / 2.0;

    // foci relative to the sweep line, both <= 0
    let p = left.y - sweep_y;
    let q = right.y - sweep_y;
    if p == q {
        return midpoint;
    }

    // quadratic in x relative to left.x: a x^2 + b x + c = 0
    let dx = right.x - left.x;
    let a = q - p;
    let b = 2.0 * p * dx;
    let c = p * (p * q - q * q - dx * dx);
    let sq = (b * b - 4.0 * a * c).max(0.0).sqrt();

    // same root either way, pick the form without cancellation
    let x = if b < 0.0 {
        2.0 * c / (sq - b)
    } else {
        (-b - sq) / (2.0 * a)
    };

    if x.is_finite() {
        left.x + x
    } else {
        midpoint
    }
}
