use std::fmt;

use crate::utils::polygon_area;
use crate::{Edge, Point, Voronoi};

/// A borrowed view of the cell of one site.
#[derive(Clone, Copy)]
pub struct VoronoiCell<'v> {
    site: usize,
    voronoi: &'v Voronoi,
}

impl<'v> VoronoiCell<'v> {
    pub fn new(site: usize, voronoi: &'v Voronoi) -> Self {
        Self { site, voronoi }
    }

    /// Index of the site this cell belongs to.
    #[inline]
    pub fn site(&self) -> usize {
        self.site
    }

    /// Position of the site this cell belongs to.
    #[inline]
    pub fn site_position(&self) -> &'v Point {
        let voronoi: &'v Voronoi = self.voronoi;
        &voronoi.sites()[self.site]
    }

    /// Indices of the cell's vertices in [Voronoi::vertices], counter-clockwise.
    ///
    /// Empty for a site that coincides with another one.
    #[inline]
    pub fn vertices(&self) -> &'v [usize] {
        let voronoi: &'v Voronoi = self.voronoi;
        &voronoi.cells()[self.site]
    }

    /// Iterates over the positions of the cell's vertices, counter-clockwise.
    pub fn iter_vertices(&self) -> impl Iterator<Item = &'v Point> + Clone {
        let voronoi: &'v Voronoi = self.voronoi;
        voronoi.cells()[self.site].iter().map(move |&v| &voronoi.vertices()[v])
    }

    /// Iterates over the edges bounding the cell, in the same order as [Self::iter_vertices].
    /// The `i`-th edge runs from the `i`-th vertex to the next one.
    pub fn iter_edges(&self) -> impl Iterator<Item = &'v Edge> + Clone {
        let voronoi: &'v Voronoi = self.voronoi;
        voronoi.cell_edges(self.site).iter().map(move |&e| &voronoi.edges()[e])
    }

    /// Iterates over the sites whose cells share an edge with this one, counter-clockwise.
    pub fn iter_neighbors(&self) -> impl Iterator<Item = usize> + Clone + 'v {
        let site = self.site;
        self.iter_edges().filter_map(move |e| e.other_site(site))
    }

    /// Returns a boolean indicating whether this cell touches the bounding box along one of its sides.
    pub fn is_on_hull(&self) -> bool {
        self.iter_edges().any(|e| e.is_border())
    }

    /// Area of the cell.
    pub fn area(&self) -> f64 {
        polygon_area(self.iter_vertices())
    }

    /// Center of mass of the cell, `None` for an empty cell.
    pub fn centroid(&self) -> Option<Point> {
        let first = *self.iter_vertices().next()?;
        let area = self.area();
        if area <= 0.0 {
            return None;
        }

        // relative to the first vertex to keep the products small
        let mut c = Point { x: 0.0, y: 0.0 };
        let relative = self.iter_vertices().map(|p| *p - first);
        for (a, b) in relative.clone().zip(relative.cycle().skip(1)) {
            let cross = a.perp_dot(&b);
            c.x += (a.x + b.x) * cross;
            c.y += (a.y + b.y) * cross;
        }

        Some(first + c * (1.0 / (6.0 * area)))
    }
}

impl<'v> fmt::Debug for VoronoiCell<'v> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Debug)]
        struct Site {
            site: usize,
            position: Point,
            is_on_hull: bool,
        }

        #[derive(Debug)]
        struct CellVertices {
            vertices: Vec<usize>,
            positions: Vec<Point>,
        }

        f.debug_struct("VoronoiCell")
            .field("site", &Site {
                site: self.site,
                position: *self.site_position(),
                is_on_hull: self.is_on_hull(),
            })
            .field("vertices", &CellVertices {
                vertices: self.vertices().to_vec(),
                positions: self.iter_vertices().copied().collect(),
            })
            .field("neighbors", &self.iter_neighbors().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::abs_diff_eq;
    use crate::{tessellate, Point};

    #[test]
    fn split_box_cells_know_their_neighbors() {
        let sites = [Point { x: 500.0, y: 300.0 }, Point { x: 500.0, y: 700.0 }];
        let voronoi = tessellate(&sites, 0.0, 0.0, 1000.0, 1000.0).expect("Voronoi expected");

        let lower = voronoi.cell(0);
        assert_eq!(vec![1], lower.iter_neighbors().collect::<Vec<_>>(), "Single neighbor expected");
        assert!(lower.is_on_hull());
        assert_eq!(lower.vertices().len(), lower.iter_edges().count(), "One edge per side expected");
        assert!(abs_diff_eq(500_000.0, lower.area(), 1e-6), "Half of the box expected, found {}", lower.area());

        let centroid = voronoi.cell(1).centroid().expect("Centroid expected");
        assert!(abs_diff_eq(500.0, centroid.x, 1e-9) && abs_diff_eq(750.0, centroid.y, 1e-9), "Unexpected centroid {:?}", centroid);
    }

    #[test]
    fn interior_cell_is_not_on_hull() {
        let mut sites = vec![Point { x: 500.0, y: 500.0 }];
        for i in 0..8 {
            let a = (i as f64 * 45.0).to_radians();
            sites.push(Point { x: 500.0 + 300.0 * a.cos(), y: 500.0 + 300.0 * a.sin() });
        }
        let voronoi = tessellate(&sites, 0.0, 0.0, 1000.0, 1000.0).expect("Voronoi expected");

        let center = voronoi.cell(0);
        assert!(!center.is_on_hull(), "Center cell expected to be surrounded, {:?}", center);
        let mut neighbors: Vec<usize> = center.iter_neighbors().collect();
        neighbors.sort_unstable();
        assert_eq!((1..=8).collect::<Vec<_>>(), neighbors, "Every ring site expected to be a neighbor");
        assert!(voronoi.cell(1).is_on_hull());
    }

    #[test]
    fn coincident_site_cell_is_empty() {
        let sites = [Point { x: 200.0, y: 200.0 }, Point { x: 800.0, y: 800.0 }, Point { x: 200.0, y: 200.0 }];
        let voronoi = tessellate(&sites, 0.0, 0.0, 1000.0, 1000.0).expect("Voronoi expected");

        let duplicate = voronoi.cell(2);
        assert!(duplicate.vertices().is_empty());
        assert_eq!(None, duplicate.centroid());
        assert_eq!(0.0, duplicate.area());
        assert!(!duplicate.is_on_hull());
    }
}
