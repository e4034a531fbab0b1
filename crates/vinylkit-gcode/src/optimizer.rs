//! Redundant-motion elimination
//!
//! A single forward pass with one instruction of lookbehind. A rapid move
//! whose resolved X and Y both equal the last known position is dropped;
//! an axis the instruction does not command inherits the carried value for
//! the comparison. Rapids that command Z are tool lifts or lowers and are
//! never redundant. Comments and machine-control instructions pass through
//! untouched and do not disturb the tracker.

use crate::instruction::{CutProgram, Instruction};

/// Drop rapid motions that would not move the machine in X/Y.
///
/// Idempotent: a second pass over the output changes nothing.
pub fn optimize(program: &CutProgram) -> CutProgram {
    let mut optimized = CutProgram::new();
    let mut last_x: Option<f64> = None;
    let mut last_y: Option<f64> = None;

    for instruction in program.iter() {
        if let Instruction::Motion { rapid, x, y, z } = instruction {
            let next_x = x.or(last_x);
            let next_y = y.or(last_y);
            let unchanged =
                last_x.is_some() && last_y.is_some() && next_x == last_x && next_y == last_y;

            if *rapid && z.is_none() && unchanged {
                continue;
            }

            last_x = next_x;
            last_y = next_y;
        }
        optimized.push(instruction.clone());
    }

    optimized
}
