use crate::utils::Tolerance;
use crate::Point;

/// Index of a half-edge. Half-edges `2e` and `2e + 1` are the two sides of bisector `e`.
pub(crate) type HalfEdgeId = usize;

/// Index of a vertex in [HalfEdgeGraph::vertices].
pub(crate) type VertexId = usize;

/// The supporting line of a bisector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgeLine {
    /// A point of the bisector; the midpoint of its two sites.
    pub anchor: Point,
    /// Direction of the bisector. Its left site is on the left of this direction.
    pub direction: Point,
}

/// Bisectors traced by the sweep, stored as twinned half-edges.
///
/// Half-edge `2e` belongs to the left site of bisector `e` and starts at the end the direction points away from.
/// Its twin `2e + 1` belongs to the right site and starts at the other end. Walking a half-edge from its origin to the origin
/// of its twin keeps its site on the left, so a cell's half-edges wind counter-clockwise.
///
/// An origin is `None` while the end is unbounded.
#[derive(Debug, Default)]
pub(crate) struct HalfEdgeGraph {
    vertices: Vec<Point>,
    origins: Vec<Option<VertexId>>,
    sites: Vec<usize>,
    lines: Vec<EdgeLine>,
    removed: Vec<bool>,
}

#[inline]
pub(crate) fn twin(half_edge: HalfEdgeId) -> HalfEdgeId {
    half_edge ^ 1
}

impl HalfEdgeGraph {
    pub fn with_capacity(sites: usize) -> Self {
        // a planar diagram has at most 2n - 5 vertices and 3n - 6 edges
        let vertices = 2 * sites;
        let edges = 3 * sites;
        Self {
            vertices: Vec::with_capacity(vertices),
            origins: Vec::with_capacity(2 * edges),
            sites: Vec::with_capacity(2 * edges),
            lines: Vec::with_capacity(edges),
            removed: Vec::with_capacity(edges),
        }
    }

    /// Adds the bisector between `left_site` and `right_site`, with both ends unbounded.
    ///
    /// Returns the half-edge of the left site; the right site's is its [twin].
    pub fn add_edge(&mut self, left_site: usize, right_site: usize, sites: &[Point]) -> HalfEdgeId {
        let left = sites[left_site];
        let right = sites[right_site];
        let half_edge = self.origins.len();

        self.lines.push(EdgeLine {
            anchor: Point { x: (left.x + right.x) / 2.0, y: (left.y + right.y) / 2.0 },
            direction: (right - left).rotate_ccw(),
        });
        self.removed.push(false);
        self.origins.push(None);
        self.origins.push(None);
        self.sites.push(left_site);
        self.sites.push(right_site);

        half_edge
    }

    pub fn add_vertex(&mut self, point: Point) -> VertexId {
        self.vertices.push(point);
        self.vertices.len() - 1
    }

    #[inline]
    pub fn set_origin(&mut self, half_edge: HalfEdgeId, vertex: VertexId) {
        self.origins[half_edge] = Some(vertex);
    }

    #[inline]
    pub fn origin(&self, half_edge: HalfEdgeId) -> Option<VertexId> {
        self.origins[half_edge]
    }

    /// The site the half-edge borders.
    #[inline]
    pub fn site(&self, half_edge: HalfEdgeId) -> usize {
        self.sites[half_edge]
    }

    #[inline]
    pub fn line(&self, edge: usize) -> &EdgeLine {
        &self.lines[edge]
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_removed(&self, edge: usize) -> bool {
        self.removed[edge]
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Iterates over the edges that were not removed.
    pub fn iter_edges(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.edge_count()).filter(move |&e| !self.is_removed(e))
    }

    /// Merges the two ends of every bisector shorter than the tolerance into one vertex and removes the bisector.
    ///
    /// Cocircular sites make the sweep emit one Voronoi vertex per circle event, joined by such edges.
    /// Returns the number of removed edges.
    pub fn collapse_zero_length_edges(&mut self, tolerance: Tolerance) -> usize {
        let mut parent: Vec<VertexId> = (0..self.vertices.len()).collect();
        let mut collapsed = 0;

        for e in 0..self.edge_count() {
            if self.removed[e] {
                continue;
            }

            if let (Some(a), Some(b)) = (self.origins[2 * e], self.origins[2 * e + 1]) {
                let a = find_root(&mut parent, a);
                let b = find_root(&mut parent, b);
                if a == b || tolerance.points_eq(&self.vertices[a], &self.vertices[b]) {
                    // lowest id survives so the result does not depend on edge order
                    let (keep, merge) = if a < b { (a, b) } else { (b, a) };
                    parent[merge] = keep;
                    self.removed[e] = true;
                    collapsed += 1;
                }
            }
        }

        if collapsed > 0 {
            for origin in self.origins.iter_mut() {
                if let Some(v) = origin {
                    *v = find_root(&mut parent, *v);
                }
            }
        }

        collapsed
    }
}

fn find_root(parent: &mut [VertexId], mut v: VertexId) -> VertexId {
    while parent[v] != v {
        parent[v] = parent[parent[v]];
        v = parent[v];
    }
    v
}
