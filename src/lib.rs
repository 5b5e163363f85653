//! Voronoi cells of a set of sites, clipped to a rectangle.
//!
//! The diagram is computed with Fortune's sweep-line algorithm. Every site gets one closed convex polygon, wound
//! counter-clockwise, and the polygons of all sites tile the rectangle.
//!
//! ```
//! use fortune_cells::{tessellate, Point};
//!
//! let sites = [Point { x: 250.0, y: 500.0 }, Point { x: 750.0, y: 500.0 }];
//! let voronoi = tessellate(&sites, 0.0, 0.0, 1000.0, 1000.0).unwrap();
//!
//! let left = voronoi.cell(0);
//! assert_eq!(4, left.vertices().len());
//! assert_eq!(vec![1], left.iter_neighbors().collect::<Vec<_>>());
//! ```

mod beachline;
mod border_clipper;
mod bounding_box;
mod cell;
mod cell_builder;
mod error;
mod event_queue;
mod half_edge;
mod point;
mod sweep;
mod utils;
mod voronoi;
mod voronoi_builder;

pub use self::bounding_box::{BoundingBox, BoundingBoxLeftRightEdge, BoundingBoxTopBottomEdge, Corner};
pub use self::cell::VoronoiCell;
pub use self::error::{Result, VoronoiError};
pub use self::point::Point;
pub use self::voronoi::{Edge, Voronoi};
pub use self::voronoi_builder::{SiteBoundsBehavior, VoronoiBuilder};

/// Computes the cells of `sites` inside the rectangle from (`min_x`, `min_y`) to (`max_x`, `max_y`).
///
/// Sites outside of the rectangle are rejected. Use [VoronoiBuilder] for more control over how the diagram is built.
pub fn tessellate(sites: &[Point], min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Voronoi> {
    VoronoiBuilder::default()
        .set_bounding_box(BoundingBox::from_min_max(Point { x: min_x, y: min_y }, Point { x: max_x, y: max_y }))
        .set_sites(sites.to_vec())
        .build()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::utils::test::{validate_bisectors, validate_voronoi};

    const SIZE: f64 = 1000.0;

    fn random_sites(seed: u64, size: usize) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..size)
            .map(|_| Point { x: rng.gen_range(0.0..SIZE), y: rng.gen_range(0.0..SIZE) })
            .collect()
    }

    fn build(sites: &[Point]) -> Voronoi {
        tessellate(sites, 0.0, 0.0, SIZE, SIZE).expect("Voronoi expected")
    }

    fn cell_points(voronoi: &Voronoi, site: usize) -> Vec<Point> {
        voronoi.cell(site).iter_vertices().copied().collect()
    }

    #[test]
    fn single_site_owns_the_box() {
        let voronoi = build(&[Point { x: 500.0, y: 500.0 }]);

        assert_eq!(
            vec![Point { x: 0.0, y: 0.0 }, Point { x: SIZE, y: 0.0 }, Point { x: SIZE, y: SIZE }, Point { x: 0.0, y: SIZE }],
            cell_points(&voronoi, 0),
            "Box corners expected counter-clockwise from the bottom left"
        );
        assert_eq!(4, voronoi.edges().len());
        assert!(voronoi.edges().iter().all(Edge::is_border), "Only border edges expected");
    }

    #[test]
    fn two_sites_split_the_box() {
        let voronoi = build(&[Point { x: 500.0, y: 700.0 }, Point { x: 500.0, y: 300.0 }]);

        let upper: HashSet<_> = cell_points(&voronoi, 0).iter().map(|p| (p.x as i64, p.y as i64)).collect();
        let lower: HashSet<_> = cell_points(&voronoi, 1).iter().map(|p| (p.x as i64, p.y as i64)).collect();
        assert_eq!([(0, 500), (1000, 500), (0, 1000), (1000, 1000)].into_iter().collect::<HashSet<_>>(), upper);
        assert_eq!([(0, 0), (1000, 0), (0, 500), (1000, 500)].into_iter().collect::<HashSet<_>>(), lower);

        let shared: Vec<&Edge> = voronoi.edges().iter().filter(|e| !e.is_border()).collect();
        assert_eq!(1, shared.len(), "Single bisector expected");
        assert_eq!(6, voronoi.vertices().len(), "Split points expected to be shared by both cells");
        validate_voronoi(&voronoi);
    }

    #[test]
    fn diagonal_sites_share_corners() {
        let voronoi = build(&[Point { x: 300.0, y: 700.0 }, Point { x: 700.0, y: 300.0 }]);

        assert_eq!(3, voronoi.cells()[0].len(), "Triangle expected for {:?}", voronoi.cell(0));
        assert_eq!(3, voronoi.cells()[1].len(), "Triangle expected for {:?}", voronoi.cell(1));
        assert_eq!(4, voronoi.vertices().len(), "Only the four corners expected");

        let left: HashSet<usize> = voronoi.cells()[0].iter().copied().collect();
        let shared = voronoi.cells()[1].iter().filter(|v| left.contains(v)).count();
        assert_eq!(2, shared, "Both cells expected to share the bisector's corners");
        validate_voronoi(&voronoi);
    }

    #[test]
    fn four_squares_meet_at_the_center() {
        let voronoi = build(&[
            Point { x: 250.0, y: 250.0 },
            Point { x: 750.0, y: 250.0 },
            Point { x: 750.0, y: 750.0 },
            Point { x: 250.0, y: 750.0 },
        ]);

        let center = voronoi.vertices().iter().position(|p| *p == Point { x: 500.0, y: 500.0 })
            .expect("Center vertex expected");
        for cell in voronoi.iter_cells() {
            assert_eq!(4, cell.vertices().len(), "Square expected for {:?}", cell);
            assert!(cell.vertices().contains(&center), "Cell {} expected to use the shared center vertex", cell.site());
            assert_eq!(2, cell.iter_neighbors().count());
        }
        assert_eq!(9, voronoi.vertices().len());
        validate_voronoi(&voronoi);
    }

    #[test]
    fn sites_on_border_and_corners() {
        let voronoi = build(&[
            Point { x: 0.0, y: 0.0 },
            Point { x: 500.0, y: 0.0 },
            Point { x: 0.0, y: SIZE },
            Point { x: SIZE, y: SIZE },
        ]);

        validate_voronoi(&voronoi);
        validate_bisectors(&voronoi);
    }

    #[test]
    fn duplicated_sites_keep_first_cell() {
        let mut sites = random_sites(7, 50);
        sites.push(sites[3]);
        sites.push(sites[10]);
        let voronoi = build(&sites);

        assert!(voronoi.cells()[50].is_empty(), "Duplicate site expected to own no cell");
        assert!(voronoi.cells()[51].is_empty(), "Duplicate site expected to own no cell");
        assert!(!voronoi.cells()[3].is_empty());
        assert!(voronoi.edges().iter().all(|e| e.left_site < 50 && e.right_site.map_or(true, |r| r < 50)), "Duplicates expected to have no edges");
        validate_voronoi(&voronoi);
    }

    #[test]
    fn empty_sites_build_empty_diagram() {
        let voronoi = build(&[]);
        assert!(voronoi.vertices().is_empty());
        assert!(voronoi.edges().is_empty());
        assert_eq!(0, voronoi.iter_cells().count());
    }

    #[test]
    fn invalid_bounding_box_is_rejected() {
        let result = tessellate(&[Point { x: 1.0, y: 1.0 }], 0.0, 0.0, 0.0, 10.0);
        assert!(matches!(result, Err(VoronoiError::InvalidBoundingBox { .. })), "Error expected, got {:?}", result);

        let result = tessellate(&[Point { x: 1.0, y: 1.0 }], 0.0, 10.0, 10.0, f64::NAN);
        assert!(matches!(result, Err(VoronoiError::InvalidBoundingBox { .. })), "Error expected, got {:?}", result);
    }

    #[test]
    fn iteration_limit_is_reported() {
        let result = VoronoiBuilder::default()
            .set_bounding_box(BoundingBox::from_min_max(Point { x: 0.0, y: 0.0 }, Point { x: SIZE, y: SIZE }))
            .set_sites(random_sites(3, 20))
            .set_max_events(Some(5))
            .build();

        assert_eq!(Some(VoronoiError::IterationLimitExceeded { limit: 5 }), result.err());
    }

    #[test]
    fn grid_sites_build_squares() {
        let voronoi = VoronoiBuilder::default()
            .set_bounding_box(BoundingBox::from_min_max(Point { x: 0.0, y: 0.0 }, Point { x: SIZE, y: SIZE }))
            .generate_square_sites(5)
            .build()
            .expect("Grid diagram expected");

        for cell in voronoi.iter_cells() {
            assert_eq!(4, cell.vertices().len(), "Square expected for {:?}", cell);
            assert!((cell.area() - 40_000.0).abs() < 1e-6, "Cell {} expected to cover 200 x 200, found {}", cell.site(), cell.area());
        }
        assert_eq!(36, voronoi.vertices().len(), "Grid vertices expected to be shared");
        validate_voronoi(&voronoi);
        validate_bisectors(&voronoi);
    }

    #[test]
    fn random_sites_build_valid_diagrams() {
        for seed in 0..10 {
            let voronoi = build(&random_sites(seed, 300));
            validate_voronoi(&voronoi);
            validate_bisectors(&voronoi);
        }
    }

    #[test]
    fn large_random_site_generation() {
        let voronoi = build(&random_sites(42, 20_000));
        validate_voronoi(&voronoi);
    }

    #[test]
    fn bisectors_are_delaunay_edges() {
        let sites = random_sites(11, 500);
        let voronoi = build(&sites);

        let points: Vec<delaunator::Point> = sites.iter().map(|p| delaunator::Point { x: p.x, y: p.y }).collect();
        let triangulation = delaunator::triangulate(&points);
        let delaunay: HashSet<(usize, usize)> = (0..triangulation.triangles.len())
            .map(|e| {
                let a = triangulation.triangles[e];
                let b = triangulation.triangles[delaunator::next_halfedge(e)];
                (a.min(b), a.max(b))
            })
            .collect();

        for edge in voronoi.edges() {
            if let Some(right) = edge.right_site {
                let pair = (edge.left_site.min(right), edge.left_site.max(right));
                assert!(delaunay.contains(&pair), "Bisector {:?} has no matching Delaunay edge", edge);
            }
        }
    }

    #[test]
    fn same_input_same_output() {
        let sites = random_sites(5, 200);
        let a = build(&sites);
        let b = build(&sites);

        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.cells(), b.cells());
        assert_eq!(a.edges(), b.edges());
    }

    fn jittered_row(seed: u64, jitter: f64) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..40)
            .map(|i| Point { x: 25.0 * i as f64, y: 500.0 + rng.gen_range(-jitter..jitter) })
            .collect()
    }

    /// 30 random sites followed by copies of the first 10, each moved by up to `offset` on both axes.
    fn nearly_coincident_sites(seed: u64, offset: f64) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed + 1000);
        let mut sites = random_sites(seed, 30);
        for i in 0..10 {
            let site = sites[i];
            sites.push(Point { x: site.x + rng.gen_range(-offset..offset), y: site.y + rng.gen_range(-offset..offset) });
        }
        sites
    }

    #[test]
    fn nearly_collinear_row_builds_strips() {
        for jitter in [1e-3, 1e-4] {
            for seed in 0..10 {
                let voronoi = build(&jittered_row(seed, jitter));
                validate_voronoi(&voronoi);
                validate_bisectors(&voronoi);

                for cell in voronoi.iter_cells() {
                    let site = cell.site();
                    let mut neighbors: Vec<usize> = cell.iter_neighbors().collect();
                    neighbors.sort_unstable();
                    let expected: Vec<usize> = [site.checked_sub(1), Some(site + 1).filter(|&n| n < 40)].into_iter().flatten().collect();
                    assert_eq!(expected, neighbors, "Cell {} expected to only touch the sites beside it (seed {seed}, jitter {jitter})", site);
                }
            }
        }
    }

    #[test]
    fn nearly_coincident_sites_are_merged() {
        for seed in 0..10 {
            let voronoi = build(&nearly_coincident_sites(seed, 1e-5));
            validate_voronoi(&voronoi);
            validate_bisectors(&voronoi);

            for copy in 30..40 {
                assert!(voronoi.cells()[copy].is_empty(), "Site {copy} expected to merge into site {} (seed {seed})", copy - 30);
                assert!(!voronoi.cells()[copy - 30].is_empty());
            }
        }
    }

    #[test]
    fn close_but_distinct_sites_keep_their_cells() {
        let sites = [
            Point { x: 500.0, y: 500.0 },
            Point { x: 500.001, y: 500.0 },
            Point { x: 500.0, y: 500.001 },
            Point { x: 200.0, y: 800.0 },
            Point { x: 800.0, y: 150.0 },
        ];
        let voronoi = build(&sites);

        for cell in voronoi.iter_cells() {
            assert!(!cell.vertices().is_empty(), "Cell {} expected to be kept", cell.site());
        }
        validate_voronoi(&voronoi);
        validate_bisectors(&voronoi);
    }

    /// Checks that `moved`, built from `transform`ed sites, has the `transform`ed cells of `original`.
    fn assert_same_cells(original: &Voronoi, moved: &Voronoi, transform: fn(&Point) -> Point, scene: &str) {
        let tolerance = original.bounding_box().tolerance();
        for (a, b) in original.iter_cells().zip(moved.iter_cells()) {
            let expected: Vec<Point> = a.iter_vertices().map(transform).collect();
            let found: Vec<Point> = b.iter_vertices().copied().collect();
            assert_eq!(expected.len(), found.len(), "{scene}: cell {} expected {:?}, found {:?}", a.site(), expected, found);

            for p in &expected {
                assert!(
                    found.iter().any(|q| tolerance.points_eq(p, q)),
                    "{scene}: cell {} expected vertex {:?} in {:?}", a.site(), p, found
                );
            }

            let mut na: Vec<usize> = a.iter_neighbors().collect();
            let mut nb: Vec<usize> = b.iter_neighbors().collect();
            na.sort_unstable();
            nb.sort_unstable();
            assert_eq!(na, nb, "{scene}: cell {} expected to keep its neighbors", a.site());
        }
    }

    #[test]
    fn rotated_and_mirrored_scenes_have_same_cells() {
        let grid: Vec<Point> = (0..=10)
            .flat_map(|i| (0..=10).map(move |j| Point { x: 100.0 * i as f64, y: 100.0 * j as f64 }))
            .collect();
        let border = vec![
            Point { x: 0.0, y: 0.0 },
            Point { x: 500.0, y: 0.0 },
            Point { x: 0.0, y: SIZE },
            Point { x: SIZE, y: SIZE },
            Point { x: SIZE, y: 300.0 },
            Point { x: 250.0, y: 600.0 },
        ];
        let scenes = [
            ("random", random_sites(13, 100)),
            ("border and corners", border),
            ("grid", grid),
            ("nearly collinear row", jittered_row(5, 1e-3)),
            ("nearly coincident", nearly_coincident_sites(3, 1e-5)),
        ];

        let transforms: [fn(&Point) -> Point; 4] = [
            |p| Point { x: SIZE - p.y, y: p.x },
            |p| Point { x: SIZE - p.x, y: SIZE - p.y },
            |p| Point { x: p.y, y: SIZE - p.x },
            |p| Point { x: SIZE - p.x, y: p.y },
        ];

        for (scene, sites) in &scenes {
            let original = build(sites);
            validate_voronoi(&original);

            for transform in transforms {
                let moved: Vec<Point> = sites.iter().map(transform).collect();
                let voronoi = build(&moved);
                validate_voronoi(&voronoi);
                assert_same_cells(&original, &voronoi, transform, scene);
            }
        }
    }
}
