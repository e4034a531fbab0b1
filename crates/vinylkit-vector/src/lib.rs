//! # Vinylkit Vector
//!
//! Vector geometry handling for the cutter pipeline:
//! - Canonical path model ([`PathSegment`], [`Bounds`])
//! - Extraction of path segments from vector source text ([`extract`])
//! - Pure geometry transforms: scale/offset/mirror ([`transform`]), curve
//!   flattening ([`flatten`]), and bounding boxes ([`bounds`])
//!
//! Stages never mutate their input; each produces a fresh segment sequence.

pub mod extractor;
pub mod path;
pub mod transform;

pub use extractor::{extract, ExtractOptions, Extraction, FileFormat};
pub use path::{well_formed, Bounds, PathSegment};
pub use transform::{bounds, flatten, transform, TransformParams, DEFAULT_CURVE_SEGMENTS};
