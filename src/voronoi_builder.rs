use tracing::warn;

use crate::error::{Result, VoronoiError};
use crate::utils::calculate_approximated_cetroid;
use crate::{BoundingBox, Point, Voronoi};

/// Defines what happens to sites outside of the bounding box.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SiteBoundsBehavior {
    /// Building fails with [VoronoiError::SiteOutsideBoundingBox].
    #[default]
    Reject,
    /// The site is moved to the closest point of the bounding box.
    Clamp,
}

/// Provides a convenient way to construct a Voronoi diagram.
#[derive(Default)]
pub struct VoronoiBuilder {
    sites: Option<Vec<Point>>,
    lloyd_iterations: usize,
    bounding_box: BoundingBox,
    site_bounds_behavior: SiteBoundsBehavior,
    max_events: Option<usize>,
}

impl VoronoiBuilder {

    /// Sets the [BoundingBox] that will be used to enclose the graph.
    pub fn set_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Sets the [SiteBoundsBehavior] applied to sites outside of the bounding box.
    pub fn set_site_bounds_behavior(mut self, behavior: SiteBoundsBehavior) -> Self {
        self.site_bounds_behavior = behavior;
        self
    }

    /// Sets the maximum number of sweep events processed before giving up with [VoronoiError::IterationLimitExceeded].
    /// `None` derives the limit from the number of sites.
    pub fn set_max_events(mut self, max_events: Option<usize>) -> Self {
        self.max_events = max_events;
        self
    }

    /// Sets a vector of [Point]s representing the sites of each Voronoi cell that should be constructed.
    pub fn set_sites(mut self, sites: Vec<Point>) -> Self {
        self.sites.replace(sites);
        self
    }

    /// Sets the number of [LLoyd relaxation](https://en.wikipedia.org/wiki/Lloyd%27s_algorithm) iterations that should be run as part of the graph generation.
    pub fn set_lloyd_relaxation_iterations(mut self, iterations: usize) -> Self {
        self.lloyd_iterations = iterations;
        self
    }

    /// Consumes this builder and generates a Voronoi diagram/graph.
    /// Without sites, an empty diagram is returned.
    pub fn build(mut self) -> Result<Voronoi> {
        let sites = self.sites.take().unwrap_or_default();
        let voronoi = self.build_once(sites)?;
        self.perform_lloyd_relaxation(voronoi)
    }

    fn build_once(&self, sites: Vec<Point>) -> Result<Voronoi> {
        let bbox = &self.bounding_box;
        if !bbox.is_valid() {
            return Err(VoronoiError::InvalidBoundingBox {
                min_x: bbox.min().x,
                min_y: bbox.min().y,
                max_x: bbox.max().x,
                max_y: bbox.max().y,
            });
        }

        let sites = self.place_sites(sites)?;
        Voronoi::new(sites, bbox.clone(), self.site_bounds_behavior, self.max_events)
    }

    /// Validates the sites and moves those on, or within tolerance of, the border exactly onto it.
    fn place_sites(&self, mut sites: Vec<Point>) -> Result<Vec<Point>> {
        let bbox = &self.bounding_box;
        let tolerance = bbox.tolerance();

        for (index, site) in sites.iter_mut().enumerate() {
            if !site.is_finite() {
                return Err(VoronoiError::NonFiniteSite { index, x: site.x, y: site.y });
            }

            if !bbox.is_inside_within(site, tolerance) {
                match self.site_bounds_behavior {
                    SiteBoundsBehavior::Reject => return Err(VoronoiError::SiteOutsideBoundingBox { index, x: site.x, y: site.y }),
                    SiteBoundsBehavior::Clamp => warn!(index, x = site.x, y = site.y, "Site outside of the bounding box clamped onto it"),
                }
            }

            *site = bbox.snap(site, tolerance);
        }

        Ok(sites)
    }

    fn perform_lloyd_relaxation(&self, mut voronoi: Voronoi) -> Result<Voronoi> {
        for _ in 0..self.lloyd_iterations {
            // get vertices for each cell and approximate centroid, empty cells keep their site
            let new_sites = voronoi.iter_cells()
                .map(|c| calculate_approximated_cetroid(c.iter_vertices()).unwrap_or(*c.site_position()))
                .collect::<Vec<Point>>();

            // recompute new voronoi with sites after relaxation
            voronoi = self.build_once(new_sites)?;
        }

        Ok(voronoi)
    }

    /// Generates a site at the center of the bounding box surrounded by a circle of ```size``` sites with radius ```radius```.
    /// Internally calls [Self::set_sites] with the generated value.
    pub fn generate_circle_sites(self, size: usize, radius: f64) -> Self {
        let center = self.bounding_box.center();
        let mut sites = Vec::with_capacity(size + 1);
        sites.push(center);
        for i in 0..size {
            let a = (i as f64 * 360.0 / size as f64).to_radians();
            sites.push(Point {
                x: center.x + radius * a.sin(),
                y: center.y + radius * a.cos(),
            });
        }

        self.set_sites(sites)
    }

    /// Generates a grid of ```width``` times ```height``` sites spread evenly over the bounding box.
    /// Internally calls [Self::set_sites] with the generated value.
    pub fn generate_rect_sites(self, width: usize, height: usize) -> Self {
        let min = *self.bounding_box.min();
        let step_x = self.bounding_box.width() / width as f64;
        let step_y = self.bounding_box.height() / height as f64;

        let mut sites = Vec::with_capacity(width * height);
        for i in 0..width {
            for j in 0..height {
                sites.push(Point {
                    x: min.x + (i as f64 + 0.5) * step_x,
                    y: min.y + (j as f64 + 0.5) * step_y,
                });
            }
        }
        self.set_sites(sites)
    }

    /// Generates a square grid of ```width``` times ```width``` sites spread evenly over the bounding box.
    /// Internally calls [Self::set_sites] with the generated value.
    pub fn generate_square_sites(self, width: usize) -> Self {
        self.generate_rect_sites(width, width)
    }

    fn create_builder_from_voronoi_without_sites(v: &Voronoi) -> Self {
        Self {
            bounding_box: v.bounding_box().clone(),
            site_bounds_behavior: v.site_bounds_behavior(),
            max_events: v.max_events(),
            lloyd_iterations: 0,
            sites: None,
        }
    }
}

impl From<&Voronoi> for VoronoiBuilder {
    /// Creates a builder with same configurations that produced the original voronoi.
    /// Useful for performing Lloyd relaxation or storing the configuration to generate a identical diagram.
    fn from(v: &Voronoi) -> Self {
        let mut builder = Self::create_builder_from_voronoi_without_sites(v);
        builder.sites = Some(v.sites().to_vec());

        builder
    }
}

impl From<Voronoi> for VoronoiBuilder {
    /// Creates a builder with same configurations that produced the original voronoi, consuming it.
    fn from(v: Voronoi) -> Self {
        Self::from(&v)
    }
}
