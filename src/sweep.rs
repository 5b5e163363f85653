use tracing::{debug, trace, warn};

use crate::beachline::{ArcId, Beachline};
use crate::error::{Result, VoronoiError};
use crate::event_queue::{Event, EventQueue};
use crate::half_edge::{twin, HalfEdgeGraph};
use crate::utils::{cicumcenter, dist2, orient2d, Tolerance, COINCIDENT_SITE_FACTOR};
use crate::Point;

/// Upper bound of events a sweep over `sites` sites pops, stale circle events included.
///
/// Every site event pushes at most two circle events and so does every circle event, for at most `2n` vertices.
pub(crate) fn default_max_events(sites: usize) -> usize {
    8 * sites + 16
}

/// What the sweep leaves behind.
pub(crate) struct SweepOutput {
    /// The traced bisectors. Ends still unbounded when the sweep finishes are rays or lines.
    pub graph: HalfEdgeGraph,

    /// For each site, the earlier site it coincides with, if any. Such sites take no part in the sweep.
    pub coincident: Vec<Option<usize>>,
}

/// Fortune's sweep over a set of sites, in a y-up frame with the sweep line moving towards increasing y.
pub(crate) struct FortuneSweep<'s> {
    sites: &'s [Point],
    tolerance: Tolerance,
    max_events: usize,
    queue: EventQueue,
    beachline: Beachline,
    graph: HalfEdgeGraph,
    sweep_y: f64,
}

impl<'s> FortuneSweep<'s> {
    pub fn new(sites: &'s [Point], tolerance: Tolerance, max_events: usize) -> Self {
        Self {
            sites,
            tolerance,
            max_events,
            queue: EventQueue::with_capacity(4 * sites.len()),
            beachline: Beachline::with_capacity(2 * sites.len()),
            graph: HalfEdgeGraph::with_capacity(sites.len()),
            sweep_y: f64::NEG_INFINITY,
        }
    }

    /// Runs the sweep to completion.
    pub fn run(mut self) -> Result<SweepOutput> {
        let coincident = find_coincident_sites(self.sites, self.tolerance);
        let live: Vec<usize> = (0..self.sites.len()).filter(|&s| coincident[s].is_none()).collect();

        if !live.is_empty() {
            let first_row = self.init_first_row(&live);
            for &s in live.iter().filter(|&&s| !first_row.contains(&s)) {
                self.queue.push_site(s, self.sites[s]);
            }

            while let Some((_, y, event)) = self.queue.pop() {
                if self.queue.popped() > self.max_events {
                    return Err(VoronoiError::IterationLimitExceeded { limit: self.max_events });
                }

                self.sweep_y = y;
                match event {
                    Event::Site(site) => self.handle_site_event(site),
                    Event::Circle { arc, center } => self.handle_circle_event(arc, center),
                }
            }
            debug_assert!(self.queue.is_empty());
        }

        let collapsed = self.graph.collapse_zero_length_edges(self.tolerance);
        debug!(
            sites = self.sites.len(),
            coincident = self.sites.len() - live.len(),
            events = self.queue.popped(),
            unbounded_arcs = self.beachline.iter().count(),
            edges = self.graph.edge_count() - collapsed,
            vertices = self.graph.vertices().len(),
            collapsed,
            "Sweep completed"
        );

        Ok(SweepOutput {
            graph: self.graph,
            coincident,
        })
    }

    /// Puts every site of the lowest row on the beachline, left to right, separated by vertical bisectors unbounded below.
    ///
    /// These sites have no arc above them to split.
    fn init_first_row(&mut self, live: &[usize]) -> Vec<usize> {
        let sites = self.sites;
        let lowest = live.iter().map(|&s| sites[s].y).fold(f64::INFINITY, f64::min);

        let mut row: Vec<usize> = live.iter().copied().filter(|&s| self.tolerance.eq(sites[s].y, lowest)).collect();
        row.sort_by(|&a, &b| sites[a].x.total_cmp(&sites[b].x).then(a.cmp(&b)));

        let mut previous: Option<usize> = None;
        for &site in &row {
            let half_edge = previous.map(|left| {
                // left site is on the left of an upward bisector whose lower end is unbounded,
                // the breakpoint traces the upper end
                twin(self.graph.add_edge(left, site, sites))
            });
            self.beachline.push_back(site, half_edge);
            previous = Some(site);
        }

        self.sweep_y = lowest;
        trace!(sites = ?row, y = lowest, "First row");
        row
    }

    fn handle_site_event(&mut self, site: usize) {
        let position = self.sites[site];
        trace!(site, x = position.x, y = position.y, "Site event");

        let arc = match self.beachline.find_arc_above(position.x, self.sweep_y, self.sites) {
            Some(arc) => arc,
            None => {
                self.beachline.push_back(site, None);
                return;
            },
        };

        self.invalidate_circle_event(arc);

        // the breakpoint (split, new) runs along the bisector direction and (new, split copy) against it
        let split_site = self.beachline.arc(arc).site;
        let half_edge = self.graph.add_edge(split_site, site, self.sites);
        let (_, right) = self.beachline.split(arc, site, twin(half_edge), half_edge);

        self.check_circle_event(arc);
        self.check_circle_event(right);
    }

    fn handle_circle_event(&mut self, arc: ArcId, center: Point) {
        let (left, right) = match (self.beachline.arc(arc).prev, self.beachline.arc(arc).next) {
            (Some(left), Some(right)) if !self.beachline.arc(arc).removed => (left, right),
            _ => return,
        };

        trace!(arc, site = self.beachline.arc(arc).site, x = center.x, y = center.y, sweep = self.sweep_y, "Circle event");

        let vertex = self.graph.add_vertex(center);
        for a in [left, arc] {
            if let Some(half_edge) = self.beachline.arc(a).right_half_edge {
                self.graph.set_origin(half_edge, vertex);
            }
        }

        self.invalidate_circle_event(left);
        self.invalidate_circle_event(right);
        self.beachline.arc_mut(arc).circle_event = None;
        self.beachline.remove(arc);

        // new bisector starts at the vertex, the breakpoint (left, right) traces its other end
        let left_site = self.beachline.arc(left).site;
        let right_site = self.beachline.arc(right).site;
        let half_edge = self.graph.add_edge(left_site, right_site, self.sites);
        self.graph.set_origin(half_edge, vertex);
        self.beachline.arc_mut(left).right_half_edge = Some(twin(half_edge));

        self.check_circle_event(left);
        self.check_circle_event(right);
    }

    fn invalidate_circle_event(&mut self, arc: ArcId) {
        if let Some(event) = self.beachline.arc_mut(arc).circle_event.take() {
            self.queue.invalidate(event);
        }
    }

    /// Schedules the circle event of `arc` if its breakpoints converge.
    fn check_circle_event(&mut self, arc: ArcId) {
        self.invalidate_circle_event(arc);

        let (prev, next) = match (self.beachline.arc(arc).prev, self.beachline.arc(arc).next) {
            (Some(prev), Some(next)) => (prev, next),
            _ => return,
        };

        let left = self.beachline.arc(prev).site;
        let middle = self.beachline.arc(arc).site;
        let right = self.beachline.arc(next).site;
        if left == right {
            return;
        }

        let (a, b, c) = (&self.sites[left], &self.sites[middle], &self.sites[right]);

        // the arc only shrinks if its sites make a left turn, collinear sites never meet
        if orient2d(a, b, c) <= 0.0 {
            return;
        }

        let center = match cicumcenter(a, b, c) {
            Some(center) => center,
            None => return,
        };

        // converging breakpoints always meet; rounding may put the bottom of the circle just behind the sweep line
        let y = center.y + dist2(&center, b).sqrt();
        let event = self.queue.push_circle(arc, center, y.max(self.sweep_y));
        self.beachline.arc_mut(arc).circle_event = Some(event);
    }
}

/// Finds the sites that coincide, within tolerance, with a site of lower index.
fn find_coincident_sites(sites: &[Point], tolerance: Tolerance) -> Vec<Option<usize>> {
    let mut order: Vec<usize> = (0..sites.len()).collect();
    order.sort_by(|&a, &b| {
        sites[a].y.total_cmp(&sites[b].y)
            .then(sites[a].x.total_cmp(&sites[b].x))
            .then(a.cmp(&b))
    });

    // sites this close produce vertices closer than the tolerance, which the clipper would merge
    let tolerance = tolerance.scaled(COINCIDENT_SITE_FACTOR);
    let mut coincident: Vec<Option<usize>> = vec![None; sites.len()];
    for (i, &site) in order.iter().enumerate() {
        let position = &sites[site];
        let owner = order[..i].iter().rev()
            .take_while(|&&other| tolerance.eq(sites[other].y, position.y))
            .find(|&&other| coincident[other].is_none() && tolerance.points_eq(&sites[other], position))
            .copied();

        match owner {
            Some(owner) if owner < site => {
                warn!(site, coincides_with = owner, x = position.x, y = position.y, "Coincident site skipped");
                coincident[site] = Some(owner);
            },
            Some(owner) => {
                // the lowest index owns the cell, hand the group over
                warn!(site = owner, coincides_with = site, x = position.x, y = position.y, "Coincident site skipped");
                for c in coincident.iter_mut().filter(|c| **c == Some(owner)) {
                    *c = Some(site);
                }
                coincident[owner] = Some(site);
            },
            None => {},
        }
    }

    coincident
}
