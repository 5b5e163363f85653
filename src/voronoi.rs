use tracing::debug;

use crate::border_clipper::BorderClipper;
use crate::bounding_box::BoundingBox;
use crate::cell::VoronoiCell;
use crate::cell_builder::{CellBuilder, CellBuilderResult};
use crate::error::Result;
use crate::sweep::{default_max_events, FortuneSweep};
use crate::voronoi_builder::SiteBoundsBehavior;
use crate::Point;

/// A side of one or two cells.
///
/// The site on the left of `start -> end` owns the edge. Bisectors also border `right_site`; border edges lie on the
/// bounding box and have no right site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Index of the first vertex in [Voronoi::vertices].
    pub start: usize,
    /// Index of the second vertex in [Voronoi::vertices].
    pub end: usize,
    pub left_site: usize,
    pub right_site: Option<usize>,
}

impl Edge {
    /// Whether the edge lies on the bounding box.
    #[inline]
    pub fn is_border(&self) -> bool {
        self.right_site.is_none()
    }

    /// The site across the edge from `site`, if `site` is one of the edge's sites and the edge is a bisector.
    #[inline]
    pub fn other_site(&self, site: usize) -> Option<usize> {
        match self.right_site {
            Some(right) if self.left_site == site => Some(right),
            Some(right) if right == site => Some(self.left_site),
            _ => None,
        }
    }
}

/// A Voronoi diagram clipped to a bounding box.
///
/// Every site owns one closed convex polygon, wound counter-clockwise. Together the polygons cover the bounding box.
#[derive(Debug, Clone)]
pub struct Voronoi {
    sites: Vec<Point>,
    bounding_box: BoundingBox,
    site_bounds_behavior: SiteBoundsBehavior,
    max_events: Option<usize>,

    /// Cell vertices, numbered in order of first use by the cells.
    vertices: Vec<Point>,

    /// For each site, the indices of its cell's vertices, counter-clockwise.
    cells: Vec<Vec<usize>>,

    /// For each site, the edge of each side of its cell.
    cell_edges: Vec<Vec<usize>>,

    /// Bisectors first, then border edges.
    edges: Vec<Edge>,
}

impl Voronoi {
    /// Builds the diagram of sites already known to be finite and inside `bounding_box`.
    pub(crate) fn new(sites: Vec<Point>, bounding_box: BoundingBox, site_bounds_behavior: SiteBoundsBehavior, max_events: Option<usize>) -> Result<Self> {
        let tolerance = bounding_box.tolerance();
        let limit = max_events.unwrap_or_else(|| default_max_events(sites.len()));

        let sweep = FortuneSweep::new(&sites, tolerance, limit).run()?;
        let clipped = BorderClipper::new(&bounding_box, tolerance).clip(&sweep.graph);
        let CellBuilderResult { vertices, cells, cell_edges, edges } =
            CellBuilder::new(&bounding_box, tolerance, clipped).build(&sites, &sweep.coincident)?;

        debug!(sites = sites.len(), vertices = vertices.len(), edges = edges.len(), "Voronoi diagram built");

        Ok(Self {
            sites,
            bounding_box,
            site_bounds_behavior,
            max_events,
            vertices,
            cells,
            cell_edges,
            edges,
        })
    }

    /// The sites, in input order. Clamped sites are reported at their clamped position.
    #[inline]
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    #[inline]
    pub fn site_bounds_behavior(&self) -> SiteBoundsBehavior {
        self.site_bounds_behavior
    }

    /// The event limit the diagram was built with, `None` for the default.
    #[inline]
    pub fn max_events(&self) -> Option<usize> {
        self.max_events
    }

    /// All cell vertices.
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// For each site, indices into [Self::vertices] of its cell's polygon, counter-clockwise.
    #[inline]
    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Bisectors between sites followed by the border edges closing the cells along the bounding box.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub(crate) fn cell_edges(&self, site: usize) -> &[usize] {
        &self.cell_edges[site]
    }

    /// Gets a representation of the cell of `site`.
    ///
    /// # Panics
    ///
    /// If `site` is not a valid site index.
    pub fn cell(&self, site: usize) -> VoronoiCell {
        assert!(site < self.sites.len(), "Site {site} out of range, diagram has {} sites", self.sites.len());
        VoronoiCell::new(site, self)
    }

    /// Iterates over the cells, in site order.
    pub fn iter_cells(&self) -> impl Iterator<Item = VoronoiCell> + Clone {
        (0..self.sites.len()).map(move |s| VoronoiCell::new(s, self))
    }
}
