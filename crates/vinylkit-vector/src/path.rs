//! Canonical path model
//!
//! Every upstream vector format is normalized into a flat sequence of
//! [`PathSegment`]s in absolute millimeter coordinates. Downstream stages
//! (transforms, the instruction compiler) only ever see this model.

use serde::{Deserialize, Serialize};

/// One drawing primitive in canonical form.
///
/// Coordinates are absolute, in source units (millimeters). Within a
/// subpath a `MoveTo` must precede any coordinate-bearing segment, and
/// `ClosePath` may appear only after at least one `MoveTo`; see
/// [`well_formed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Begin a new subpath at the given point.
    MoveTo {
        /// Target X coordinate.
        x: f64,
        /// Target Y coordinate.
        y: f64,
    },
    /// Straight segment from the current point.
    LineTo {
        /// Target X coordinate.
        x: f64,
        /// Target Y coordinate.
        y: f64,
    },
    /// Cubic Bézier from the current point with two control points.
    CubicCurveTo {
        /// First control point X.
        cp1x: f64,
        /// First control point Y.
        cp1y: f64,
        /// Second control point X.
        cp2x: f64,
        /// Second control point Y.
        cp2y: f64,
        /// Endpoint X.
        x: f64,
        /// Endpoint Y.
        y: f64,
    },
    /// Quadratic Bézier from the current point with one control point.
    QuadCurveTo {
        /// Control point X.
        cpx: f64,
        /// Control point Y.
        cpy: f64,
        /// Endpoint X.
        x: f64,
        /// Endpoint Y.
        y: f64,
    },
    /// Terminate the current subpath.
    ClosePath,
}

impl PathSegment {
    /// The point this segment leaves the pen at, if it carries one.
    ///
    /// `ClosePath` returns `None`; its endpoint is the subpath start, which
    /// only the surrounding sequence knows.
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            PathSegment::MoveTo { x, y }
            | PathSegment::LineTo { x, y }
            | PathSegment::CubicCurveTo { x, y, .. }
            | PathSegment::QuadCurveTo { x, y, .. } => Some((x, y)),
            PathSegment::ClosePath => None,
        }
    }

    /// Whether this segment is a curve that flattening replaces.
    pub fn is_curve(&self) -> bool {
        matches!(
            self,
            PathSegment::CubicCurveTo { .. } | PathSegment::QuadCurveTo { .. }
        )
    }
}

/// Check the subpath invariant over a segment sequence.
///
/// A `MoveTo` must open the path before any other segment appears. After a
/// `ClosePath` the pen sits at the subpath start, so further line or curve
/// segments are allowed without a fresh `MoveTo`.
pub fn well_formed(segments: &[PathSegment]) -> bool {
    let mut started = false;
    for segment in segments {
        match segment {
            PathSegment::MoveTo { .. } => started = true,
            _ if !started => return false,
            _ => {}
        }
    }
    true
}

/// Axis-aligned bounding box of a segment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest X coordinate seen.
    pub min_x: f64,
    /// Smallest Y coordinate seen.
    pub min_y: f64,
    /// Largest X coordinate seen.
    pub max_x: f64,
    /// Largest Y coordinate seen.
    pub max_y: f64,
}

impl Bounds {
    /// A degenerate box covering a single point.
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow the box to cover the given point.
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_requires_leading_move() {
        assert!(well_formed(&[
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::LineTo { x: 1.0, y: 0.0 },
            PathSegment::ClosePath,
        ]));
        assert!(!well_formed(&[PathSegment::LineTo { x: 1.0, y: 0.0 }]));
        assert!(!well_formed(&[PathSegment::ClosePath]));
        assert!(well_formed(&[]));
    }

    #[test]
    fn test_line_after_close_is_allowed() {
        assert!(well_formed(&[
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::LineTo { x: 1.0, y: 0.0 },
            PathSegment::ClosePath,
            PathSegment::LineTo { x: 2.0, y: 2.0 },
        ]));
    }

    #[test]
    fn test_bounds_include() {
        let mut bounds = Bounds::point(1.0, 2.0);
        bounds.include(-3.0, 5.0);
        assert_eq!(bounds.min_x, -3.0);
        assert_eq!(bounds.max_x, 1.0);
        assert_eq!(bounds.width(), 4.0);
        assert_eq!(bounds.height(), 3.0);
    }
}
