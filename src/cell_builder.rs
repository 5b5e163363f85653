use tracing::debug;

use crate::border_clipper::ClippedDiagram;
use crate::bounding_box::{BoundingBox, Corner};
use crate::error::{Result, VoronoiError};
use crate::half_edge::VertexId;
use crate::utils::Tolerance;
use crate::{Edge, Point};

/// A directed side of a cell: tail vertex, head vertex and the edge it lies on.
type Segment = (VertexId, VertexId, usize);

/// Assembles the closed polygon of every site from the clipped bisectors, adding border edges and corners where a
/// cell reaches the bounding box.
pub(crate) struct CellBuilder<'b> {
    bounding_box: &'b BoundingBox,
    tolerance: Tolerance,
    diagram: ClippedDiagram,
    edges: Vec<Edge>,
}

pub(crate) struct CellBuilderResult {
    pub vertices: Vec<Point>,
    /// Counter-clockwise vertices of each site's cell.
    pub cells: Vec<Vec<usize>>,
    /// For each cell, the edge of each side `cells[s][i] -> cells[s][i + 1]`.
    pub cell_edges: Vec<Vec<usize>>,
    pub edges: Vec<Edge>,
}

impl<'b> CellBuilder<'b> {
    pub fn new(bounding_box: &'b BoundingBox, tolerance: Tolerance, diagram: ClippedDiagram) -> Self {
        let edges = diagram.edges.iter()
            .map(|e| Edge {
                start: e.start,
                end: e.end,
                left_site: e.left_site,
                right_site: Some(e.right_site),
            })
            .collect();

        Self {
            bounding_box,
            tolerance,
            diagram,
            edges,
        }
    }

    /// Builds the cell of every site. Sites coinciding with another get an empty cell.
    pub fn build(mut self, sites: &[Point], coincident: &[Option<usize>]) -> Result<CellBuilderResult> {
        let mut segments: Vec<Vec<Segment>> = vec![Vec::new(); sites.len()];
        for (index, edge) in self.edges.iter().enumerate() {
            segments[edge.left_site].push((edge.start, edge.end, index));
            if let Some(right) = edge.right_site {
                segments[right].push((edge.end, edge.start, index));
            }
        }

        let live = coincident.iter().filter(|c| c.is_none()).count();
        let mut cells = Vec::with_capacity(sites.len());
        let mut cell_edges = Vec::with_capacity(sites.len());

        for (site, segments) in segments.iter().enumerate() {
            let (cell, edges) = if coincident[site].is_some() {
                (Vec::new(), Vec::new())
            } else if segments.is_empty() {
                if live == 1 {
                    self.build_box_cell(site)
                } else {
                    return Err(VoronoiError::OpenCell { site });
                }
            } else {
                self.build_cell(site, segments)?
            };

            cells.push(cell);
            cell_edges.push(edges);
        }

        let border_edges = self.edges.len() - self.diagram.edges.len();
        let vertices = self.compact_vertices(&mut cells);
        debug!(cells = cells.len(), vertices = vertices.len(), edges = self.edges.len(), border_edges, "Cells assembled");

        Ok(CellBuilderResult {
            vertices,
            cells,
            cell_edges,
            edges: self.edges,
        })
    }

    /// The cell of the only site is the whole box.
    fn build_box_cell(&mut self, site: usize) -> (Vec<VertexId>, Vec<usize>) {
        let cell: Vec<VertexId> = Corner::ALL.iter()
            .map(|&c| self.diagram.corner_vertex(self.bounding_box, c))
            .collect();
        let edges = cell.iter().zip(cell.iter().cycle().skip(1))
            .map(|(&a, &b)| self.push_border_edge(site, a, b))
            .collect();

        (cell, edges)
    }

    /// Chains the sides of a cell head to tail. When a chain ends on the border, walks the border counter-clockwise to the
    /// closest chain that starts on it.
    fn build_cell(&mut self, site: usize, segments: &[Segment]) -> Result<(Vec<VertexId>, Vec<usize>)> {
        // tails nobody leads to are where the cell enters the box
        let chain_starts: Vec<VertexId> = segments.iter()
            .map(|s| s.0)
            .filter(|&tail| !segments.iter().any(|s| s.1 == tail))
            .collect();

        let start = chain_starts.first().copied().unwrap_or(segments[0].0);
        let limit = 2 * segments.len() + Corner::ALL.len();
        let mut cell = Vec::with_capacity(segments.len() + 2);
        let mut edges = Vec::with_capacity(segments.len() + 2);
        let mut current = start;
        let mut push_current = true;

        loop {
            if push_current {
                cell.push(current);
            }
            push_current = true;

            if cell.len() > limit {
                return Err(VoronoiError::OpenCell { site });
            }

            if let Some(&(_, head, edge)) = segments.iter().find(|s| s.0 == current) {
                edges.push(edge);
                if head == start {
                    break;
                }
                current = head;
                continue;
            }

            let target = self.closest_chain_start(site, current, &chain_starts)?;
            let walked = self.link_around_border(site, current, target, &mut cell, &mut edges);
            if target == start {
                if !walked {
                    // last vertex is the first one
                    cell.pop();
                }
                break;
            }

            // a zero length walk continues from the vertex already in the cell
            push_current = walked;
            current = target;
        }

        Ok((cell, edges))
    }

    /// Finds the chain start reached first when walking the border counter-clockwise from `from`.
    fn closest_chain_start(&self, site: usize, from: VertexId, chain_starts: &[VertexId]) -> Result<VertexId> {
        let position = |v: VertexId| self.bounding_box.perimeter_position(&self.diagram.vertices[v], self.tolerance);
        let perimeter = self.bounding_box.perimeter();
        let from_position = position(from).ok_or(VoronoiError::OpenCell { site })?;

        chain_starts.iter()
            .filter_map(|&v| position(v).map(|p| {
                let distance = (p - from_position).rem_euclid(perimeter);
                let distance = if perimeter - distance <= self.tolerance.value() { 0.0 } else { distance };
                (distance, v)
            }))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, v)| v)
            .ok_or(VoronoiError::OpenCell { site })
    }

    /// Walks the border counter-clockwise from `from` to `to`, adding the corners on the way and the border edges in between.
    ///
    /// Returns `false` without adding anything if both are the same point.
    fn link_around_border(&mut self, site: usize, from: VertexId, to: VertexId, cell: &mut Vec<VertexId>, edges: &mut Vec<usize>) -> bool {
        let position = |v: VertexId| self.bounding_box.perimeter_position(&self.diagram.vertices[v], self.tolerance).unwrap_or(0.0);
        let corners = self.bounding_box.corners_between(position(from), position(to), self.tolerance);
        if corners.is_empty() && self.tolerance.points_eq(&self.diagram.vertices[from], &self.diagram.vertices[to]) {
            return false;
        }

        let mut previous = from;
        for corner in corners {
            let vertex = self.diagram.corner_vertex(self.bounding_box, corner);
            edges.push(self.push_border_edge(site, previous, vertex));
            cell.push(vertex);
            previous = vertex;
        }
        edges.push(self.push_border_edge(site, previous, to));

        true
    }

    fn push_border_edge(&mut self, site: usize, start: VertexId, end: VertexId) -> usize {
        self.edges.push(Edge {
            start,
            end,
            left_site: site,
            right_site: None,
        });
        self.edges.len() - 1
    }

    /// Keeps only the vertices used by a cell, numbered in order of first use.
    fn compact_vertices(&mut self, cells: &mut [Vec<VertexId>]) -> Vec<Point> {
        let mut map: Vec<Option<usize>> = vec![None; self.diagram.vertices.len()];
        let mut vertices = Vec::with_capacity(self.diagram.vertices.len());
        let source = &self.diagram.vertices;
        let mut remap = |v: VertexId| -> usize {
            *map[v].get_or_insert_with(|| {
                vertices.push(source[v]);
                vertices.len() - 1
            })
        };

        for v in cells.iter_mut().flat_map(|c| c.iter_mut()) {
            *v = remap(*v);
        }
        for edge in self.edges.iter_mut() {
            edge.start = remap(edge.start);
            edge.end = remap(edge.end);
        }

        vertices
    }
}
