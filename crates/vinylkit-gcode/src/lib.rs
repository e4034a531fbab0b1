//! # Vinylkit Gcode
//!
//! The motion-control side of the pipeline: a typed instruction model with
//! a fixed textual rendering, the compiler that turns canonical path
//! segments into an ordered cut program, and a redundant-motion optimizer.

pub mod compiler;
pub mod instruction;
pub mod optimizer;

pub use compiler::{compile, test_pattern, CutParams};
pub use instruction::{CutProgram, Instruction, EMERGENCY_STOP_CODE, HOME_CODE};
pub use optimizer::optimize;
