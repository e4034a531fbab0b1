//! Cut program compilation
//!
//! Turns a canonical segment sequence into an ordered instruction program
//! with a fixed header and footer. The body models a cutter that lifts its
//! blade between disjoint shapes: the first `MoveTo` of the program rapids
//! to the point and lowers the tool; every later `MoveTo` raises the tool,
//! rapids, and lowers again.

use crate::instruction::{CutProgram, Instruction};
use serde::{Deserialize, Serialize};
use vinylkit_vector::path::PathSegment;
use vinylkit_vector::transform::flatten;

/// Cutting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutParams {
    /// Feed rate in mm/min.
    pub feed_rate: f64,
    /// Tool power (blade pressure in grams for a drag-knife cutter).
    pub tool_power: u32,
    /// Z height with the tool raised, in mm.
    pub tool_up_height: f64,
    /// Z height with the tool engaged, in mm.
    pub tool_down_height: f64,
    /// Line samples per curve when flattening residual curve segments.
    pub curve_segments: usize,
}

impl Default for CutParams {
    fn default() -> Self {
        Self {
            feed_rate: 3000.0,
            tool_power: 300,
            tool_up_height: 5.0,
            tool_down_height: 0.0,
            curve_segments: 20,
        }
    }
}

/// Compile a segment sequence into a cut program.
///
/// Compiling the same segments and parameters twice produces byte-identical
/// instruction text. Curve segments still present in the input are
/// flattened with `params.curve_segments` before compilation.
pub fn compile(segments: &[PathSegment], params: &CutParams) -> CutProgram {
    let segments = flatten(segments, params.curve_segments);

    let mut program = CutProgram::new();
    push_header(&mut program, params);

    let mut first_move = true;
    for segment in &segments {
        match *segment {
            PathSegment::MoveTo { x, y } => {
                if first_move {
                    program.push(Instruction::rapid_xy(x, y));
                    program.push(Instruction::feed_z(params.tool_down_height));
                    first_move = false;
                } else {
                    program.push(Instruction::rapid_z(params.tool_up_height));
                    program.push(Instruction::rapid_xy(x, y));
                    program.push(Instruction::feed_z(params.tool_down_height));
                }
            }
            PathSegment::LineTo { x, y } => {
                program.push(Instruction::feed_xy(x, y));
            }
            PathSegment::ClosePath => {
                // Geometric closure, when wanted, is an explicit trailing
                // LineTo back to the subpath start; the marker carries no
                // motion.
                program.push(Instruction::comment("close path"));
            }
            PathSegment::CubicCurveTo { .. } | PathSegment::QuadCurveTo { .. } => {
                // flatten() above leaves no curve segments.
            }
        }
    }

    push_footer(&mut program, params);
    tracing::debug!(instructions = program.len(), "compiled cut program");
    program
}

/// Unit declaration, absolute positioning, homing, tool power, feed rate.
fn push_header(program: &mut CutProgram, params: &CutParams) {
    program.push(Instruction::comment("vinylkit cut program"));
    program.push(Instruction::control("G21"));
    program.push(Instruction::control("G90"));
    program.push(Instruction::control("G28"));
    program.push(Instruction::control(format!("M3 S{}", params.tool_power)));
    program.push(Instruction::control(format!("F{:.0}", params.feed_rate)));
}

/// Raise tool, return home on X/Y, tool power off, program end.
fn push_footer(program: &mut CutProgram, params: &CutParams) {
    program.push(Instruction::rapid_z(params.tool_up_height));
    program.push(Instruction::control("G28 X Y"));
    program.push(Instruction::control("M5"));
    program.push(Instruction::control("M2"));
}

/// A 40 mm calibration square, for verifying a machine setup without
/// uploading artwork.
pub fn test_pattern(params: &CutParams) -> CutProgram {
    let mut program = CutProgram::new();
    push_header(&mut program, params);

    program.push(Instruction::comment("test pattern: 40mm square"));
    program.push(Instruction::rapid_xy(10.0, 10.0));
    program.push(Instruction::feed_z(params.tool_down_height));
    program.push(Instruction::feed_xy(50.0, 10.0));
    program.push(Instruction::feed_xy(50.0, 50.0));
    program.push(Instruction::feed_xy(10.0, 50.0));
    program.push(Instruction::feed_xy(10.0, 10.0));

    push_footer(&mut program, params);
    program
}
