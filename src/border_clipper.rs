use tracing::debug;

use crate::bounding_box::{BoundingBox, Corner};
use crate::half_edge::{EdgeLine, HalfEdgeGraph, VertexId};
use crate::utils::Tolerance;
use crate::Point;

/// A bisector clipped to the bounding box, running from `start` to `end` with `left_site` on its left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ClippedEdge {
    pub start: VertexId,
    pub end: VertexId,
    pub left_site: usize,
    pub right_site: usize,
}

/// Bisectors and vertices after clipping. Every referenced vertex is inside the bounding box.
#[derive(Debug)]
pub(crate) struct ClippedDiagram {
    pub vertices: Vec<Point>,
    pub edges: Vec<ClippedEdge>,

    /// Vertex of each corner (indexed by [Corner::index]), created on first use.
    corners: [Option<VertexId>; 4],
}

impl ClippedDiagram {
    /// Returns the vertex of a bounding box corner, creating it the first time it is needed.
    pub fn corner_vertex(&mut self, bounding_box: &BoundingBox, corner: Corner) -> VertexId {
        if let Some(vertex) = self.corners[corner.index()] {
            vertex
        } else {
            let vertex = self.vertices.len();
            self.vertices.push(bounding_box.corner(corner));
            self.corners[corner.index()] = Some(vertex);
            vertex
        }
    }

    /// Adds a vertex on the border. Points on a corner resolve to the corner's shared vertex.
    fn border_vertex(&mut self, bounding_box: &BoundingBox, point: &Point, tolerance: Tolerance) -> VertexId {
        let point = bounding_box.snap(point, tolerance);
        if let Some(corner) = bounding_box.which_corner(&point, tolerance) {
            self.corner_vertex(bounding_box, corner)
        } else {
            self.vertices.push(point);
            self.vertices.len() - 1
        }
    }
}

/// Clips every traced bisector against the bounding box.
pub(crate) struct BorderClipper<'b> {
    bounding_box: &'b BoundingBox,
    tolerance: Tolerance,
}

/// Where one end of a bisector lands.
enum ClippedEnd {
    /// On a Voronoi vertex inside the box.
    Vertex(VertexId),
    /// On the border, this far along the bisector's line.
    Border(f64),
}

impl<'b> BorderClipper<'b> {
    pub fn new(bounding_box: &'b BoundingBox, tolerance: Tolerance) -> Self {
        Self { bounding_box, tolerance }
    }

    pub fn clip(&self, graph: &HalfEdgeGraph) -> ClippedDiagram {
        let mut diagram = ClippedDiagram {
            vertices: graph.vertices().to_vec(),
            edges: Vec::with_capacity(graph.edge_count()),
            corners: [None; 4],
        };

        // pull vertices sitting on the border onto it, those on a corner become the corner
        let mut vertex_map: Vec<VertexId> = (0..diagram.vertices.len()).collect();
        for (v, mapped) in vertex_map.iter_mut().enumerate() {
            let point = &diagram.vertices[v];
            if !self.bounding_box.is_inside_within(point, self.tolerance) {
                continue;
            }

            let snapped = self.bounding_box.snap(point, self.tolerance);
            diagram.vertices[v] = snapped;
            if let Some(corner) = self.bounding_box.which_corner(&snapped, self.tolerance) {
                match diagram.corners[corner.index()] {
                    Some(existing) => *mapped = existing,
                    None => diagram.corners[corner.index()] = Some(v),
                }
            }
        }

        let mut rejected = 0;
        for e in graph.iter_edges() {
            match self.clip_edge(graph, e, &vertex_map, &mut diagram) {
                Some(edge) => diagram.edges.push(edge),
                None => rejected += 1,
            }
        }

        debug!(kept = diagram.edges.len(), rejected, "Clipped bisectors to the bounding box");
        diagram
    }

    fn clip_edge(&self, graph: &HalfEdgeGraph, e: usize, vertex_map: &[VertexId], diagram: &mut ClippedDiagram) -> Option<ClippedEdge> {
        let line = graph.line(e);
        let (t0, t1) = self.bounding_box.clip_line(&line.anchor, &line.direction)?;

        let start = self.clip_end(graph.origin(2 * e), line, vertex_map, diagram, |t| t.max(t0), t0);
        let end = self.clip_end(graph.origin(2 * e + 1), line, vertex_map, diagram, |t| t.min(t1), t1);

        // reject edges outside of the box or collapsing onto a single border point
        let param = |end: &ClippedEnd| match end {
            ClippedEnd::Vertex(v) => parameter(line, &diagram.vertices[*v]),
            ClippedEnd::Border(t) => *t,
        };
        let length = (param(&end) - param(&start)) * line.direction.dot(&line.direction).sqrt();
        if length <= self.tolerance.value() {
            return None;
        }

        let mut resolve = |end: ClippedEnd| match end {
            ClippedEnd::Vertex(v) => v,
            ClippedEnd::Border(t) => diagram.border_vertex(self.bounding_box, &(line.anchor + line.direction * t), self.tolerance),
        };
        let start = resolve(start);
        let end = resolve(end);
        if start == end {
            return None;
        }

        Some(ClippedEdge {
            start,
            end,
            left_site: graph.site(2 * e),
            right_site: graph.site(2 * e + 1),
        })
    }

    /// Resolves one end of a bisector.
    ///
    /// A missing origin is an unbounded end and lands on `limit`. A vertex outside the box is pulled along the line by `clamp`.
    fn clip_end(
        &self,
        origin: Option<VertexId>,
        line: &EdgeLine,
        vertex_map: &[VertexId],
        diagram: &ClippedDiagram,
        clamp: impl Fn(f64) -> f64,
        limit: f64,
    ) -> ClippedEnd {
        match origin {
            Some(v) if self.bounding_box.is_inside_within(&diagram.vertices[v], self.tolerance) => ClippedEnd::Vertex(vertex_map[v]),
            Some(v) => ClippedEnd::Border(clamp(parameter(line, &diagram.vertices[v]))),
            None => ClippedEnd::Border(limit),
        }
    }
}

/// Position of the projection of `point` on the line, in units of the line's direction.
fn parameter(line: &EdgeLine, point: &Point) -> f64 {
    (*point - line.anchor).dot(&line.direction) / line.direction.dot(&line.direction)
}
