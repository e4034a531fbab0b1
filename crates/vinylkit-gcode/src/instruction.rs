//! Typed motion-control instructions
//!
//! An [`Instruction`] is one textual line of the program sent to the
//! cutter; a [`CutProgram`] is the ordered sequence, where order is the
//! execution order on the device.
//!
//! Rendering contract (other components and golden tests rely on it):
//! - comments render as `; text`
//! - motion renders as `G0` (rapid) or `G1` (feed) followed by the axis
//!   words present, each value fixed at 3 decimal places
//! - machine-control codes render verbatim

use serde::{Deserialize, Serialize};
use std::fmt;

/// Homing code understood by the cutter firmware.
pub const HOME_CODE: &str = "G28";

/// Immediate halt code, sent outside the normal streaming path.
pub const EMERGENCY_STOP_CODE: &str = "M112";

/// One line of a motion-control program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// A `;`-prefixed comment line; ignored by the device.
    Comment(String),
    /// A motion to the given axis targets. Axes left `None` are not
    /// commanded and keep their current value on the device.
    Motion {
        /// Rapid (`G0`) when true, feed-rate (`G1`) otherwise.
        rapid: bool,
        /// Target X in mm.
        x: Option<f64>,
        /// Target Y in mm.
        y: Option<f64>,
        /// Target Z in mm (tool height).
        z: Option<f64>,
    },
    /// A machine-control code (tool power, homing, stop, program end).
    MachineControl {
        /// The literal code, e.g. `M3 S300`.
        code: String,
    },
}

impl Instruction {
    /// A comment line.
    pub fn comment(text: impl Into<String>) -> Self {
        Instruction::Comment(text.into())
    }

    /// A machine-control line.
    pub fn control(code: impl Into<String>) -> Self {
        Instruction::MachineControl { code: code.into() }
    }

    /// Rapid move in the XY plane.
    pub fn rapid_xy(x: f64, y: f64) -> Self {
        Instruction::Motion {
            rapid: true,
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    /// Feed-rate move in the XY plane.
    pub fn feed_xy(x: f64, y: f64) -> Self {
        Instruction::Motion {
            rapid: false,
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    /// Rapid move of the tool axis only.
    pub fn rapid_z(z: f64) -> Self {
        Instruction::Motion {
            rapid: true,
            x: None,
            y: None,
            z: Some(z),
        }
    }

    /// Feed-rate move of the tool axis only.
    pub fn feed_z(z: f64) -> Self {
        Instruction::Motion {
            rapid: false,
            x: None,
            y: None,
            z: Some(z),
        }
    }

    /// Whether this instruction commands motion.
    pub fn is_motion(&self) -> bool {
        matches!(self, Instruction::Motion { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Comment(text) => write!(f, "; {}", text),
            Instruction::Motion { rapid, x, y, z } => {
                write!(f, "{}", if *rapid { "G0" } else { "G1" })?;
                if let Some(x) = x {
                    write!(f, " X{:.3}", x)?;
                }
                if let Some(y) = y {
                    write!(f, " Y{:.3}", y)?;
                }
                if let Some(z) = z {
                    write!(f, " Z{:.3}", z)?;
                }
                Ok(())
            }
            Instruction::MachineControl { code } => write!(f, "{}", code),
        }
    }
}

/// An ordered motion-control program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutProgram {
    instructions: Vec<Instruction>,
}

impl CutProgram {
    /// An empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterate the instructions in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// The instructions as a slice.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Render the program as newline-terminated text.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for instruction in &self.instructions {
            text.push_str(&instruction.to_string());
            text.push('\n');
        }
        text
    }
}

impl From<Vec<Instruction>> for CutProgram {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl<'a> IntoIterator for &'a CutProgram {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
