//! Pure geometry transforms
//!
//! Scale/offset/mirror application, Bézier flattening, and bounding-box
//! computation over canonical segment sequences. All functions here are
//! pure: they take a segment slice and produce a new sequence.

use crate::path::{Bounds, PathSegment};
use serde::{Deserialize, Serialize};

/// Default number of line samples per flattened curve.
pub const DEFAULT_CURVE_SEGMENTS: usize = 20;

/// Scale, offset, and mirror parameters.
///
/// Applied in the order mirror → scale → offset, identically to every
/// coordinate field of every segment, control points included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    /// X scale factor.
    pub scale_x: f64,
    /// Y scale factor.
    pub scale_y: f64,
    /// X offset in mm, applied after scaling.
    pub offset_x: f64,
    /// Y offset in mm, applied after scaling.
    pub offset_y: f64,
    /// Negate X before scaling (cut mirrored, e.g. for heat transfer vinyl).
    pub mirror: bool,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            mirror: false,
        }
    }
}

/// Apply mirror, scale, and offset to every coordinate of every segment.
pub fn transform(segments: &[PathSegment], params: &TransformParams) -> Vec<PathSegment> {
    let tx = |v: f64| (if params.mirror { -v } else { v }) * params.scale_x + params.offset_x;
    let ty = |v: f64| v * params.scale_y + params.offset_y;

    segments
        .iter()
        .map(|segment| match *segment {
            PathSegment::MoveTo { x, y } => PathSegment::MoveTo { x: tx(x), y: ty(y) },
            PathSegment::LineTo { x, y } => PathSegment::LineTo { x: tx(x), y: ty(y) },
            PathSegment::CubicCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            } => PathSegment::CubicCurveTo {
                cp1x: tx(cp1x),
                cp1y: ty(cp1y),
                cp2x: tx(cp2x),
                cp2y: ty(cp2y),
                x: tx(x),
                y: ty(y),
            },
            PathSegment::QuadCurveTo { cpx, cpy, x, y } => PathSegment::QuadCurveTo {
                cpx: tx(cpx),
                cpy: ty(cpy),
                x: tx(x),
                y: ty(y),
            },
            PathSegment::ClosePath => PathSegment::ClosePath,
        })
        .collect()
}

/// Replace each curve with `curve_segments` straight steps.
///
/// Samples the standard Bézier blending functions at `t = i/n`; the last
/// sample is the curve's declared endpoint exactly, not an evaluation at an
/// approximate `t = 1`. Other segments pass through unchanged. The current
/// point follows `ClosePath` back to the subpath start.
pub fn flatten(segments: &[PathSegment], curve_segments: usize) -> Vec<PathSegment> {
    let n = curve_segments.max(1);
    let mut out = Vec::with_capacity(segments.len());
    let mut current = (0.0f64, 0.0f64);
    let mut subpath_start = (0.0f64, 0.0f64);

    for segment in segments {
        match *segment {
            PathSegment::MoveTo { x, y } => {
                out.push(*segment);
                current = (x, y);
                subpath_start = (x, y);
            }
            PathSegment::LineTo { x, y } => {
                out.push(*segment);
                current = (x, y);
            }
            PathSegment::CubicCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            } => {
                for i in 1..n {
                    let t = i as f64 / n as f64;
                    let (px, py) =
                        cubic_point(current, (cp1x, cp1y), (cp2x, cp2y), (x, y), t);
                    out.push(PathSegment::LineTo { x: px, y: py });
                }
                out.push(PathSegment::LineTo { x, y });
                current = (x, y);
            }
            PathSegment::QuadCurveTo { cpx, cpy, x, y } => {
                for i in 1..n {
                    let t = i as f64 / n as f64;
                    let (px, py) = quad_point(current, (cpx, cpy), (x, y), t);
                    out.push(PathSegment::LineTo { x: px, y: py });
                }
                out.push(PathSegment::LineTo { x, y });
                current = (x, y);
            }
            PathSegment::ClosePath => {
                out.push(*segment);
                current = subpath_start;
            }
        }
    }

    out
}

/// Cubic Bézier blending: B(t) = (1-t)³P0 + 3(1-t)²tC1 + 3(1-t)t²C2 + t³P1
fn cubic_point(
    p0: (f64, f64),
    c1: (f64, f64),
    c2: (f64, f64),
    p1: (f64, f64),
    t: f64,
) -> (f64, f64) {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * c1.0 + c * c2.0 + d * p1.0,
        a * p0.1 + b * c1.1 + c * c2.1 + d * p1.1,
    )
}

/// Quadratic Bézier blending: B(t) = (1-t)²P0 + 2(1-t)tC + t²P1
fn quad_point(p0: (f64, f64), c: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    let a = mt * mt;
    let b = 2.0 * mt * t;
    let d = t * t;
    (
        a * p0.0 + b * c.0 + d * p1.0,
        a * p0.1 + b * c.1 + d * p1.1,
    )
}

/// Bounding box over every coordinate-bearing segment.
///
/// Curve control points count while curves are still present (they bound
/// the curve's hull); once flattened only endpoints remain. Returns `None`
/// when no segment carries a coordinate.
pub fn bounds(segments: &[PathSegment]) -> Option<Bounds> {
    let mut result: Option<Bounds> = None;

    fn add(result: &mut Option<Bounds>, x: f64, y: f64) {
        match result {
            Some(bounds) => bounds.include(x, y),
            None => *result = Some(Bounds::point(x, y)),
        }
    }

    for segment in segments {
        match *segment {
            PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => {
                add(&mut result, x, y);
            }
            PathSegment::CubicCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            } => {
                add(&mut result, cp1x, cp1y);
                add(&mut result, cp2x, cp2y);
                add(&mut result, x, y);
            }
            PathSegment::QuadCurveTo { cpx, cpy, x, y } => {
                add(&mut result, cpx, cpy);
                add(&mut result, x, y);
            }
            PathSegment::ClosePath => {}
        }
    }

    result
}
