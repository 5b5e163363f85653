use thiserror::Error;

/// Errors reported while building a Voronoi diagram.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// The rectangle is empty, inverted, or has non-finite bounds.
    #[error("invalid bounding box: min ({min_x}, {min_y}) must be finite and strictly less than max ({max_x}, {max_y})")]
    InvalidBoundingBox {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    /// A site has a NaN or infinite coordinate.
    #[error("site {index} ({x}, {y}) is not a finite point")]
    NonFiniteSite { index: usize, x: f64, y: f64 },

    /// A site lies outside the bounding box and the builder was configured to reject it.
    #[error("site {index} ({x}, {y}) lies outside the bounding box")]
    SiteOutsideBoundingBox { index: usize, x: f64, y: f64 },

    /// The sweep processed more events than allowed.
    #[error("sweep did not finish within {limit} events")]
    IterationLimitExceeded { limit: usize },

    /// The cell of a site could not be closed into a polygon.
    #[error("cell of site {site} could not be closed")]
    OpenCell { site: usize },
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
