//! Telemetry line classification
//!
//! The cutter reports back over the same serial link it receives
//! instructions on. Lines are classified by prefix:
//! - `X:<x> Y:<y>` — position report
//! - `ok` — acknowledgement of the last instruction
//! - `Error:<message>` — device-side error
//!
//! Anything else is kept as [`Telemetry::Unrecognized`] for diagnostics.

use serde::{Deserialize, Serialize};

/// A classified telemetry line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Telemetry {
    /// The device reported its position.
    PositionReport {
        /// Reported X coordinate in mm.
        x: f64,
        /// Reported Y coordinate in mm.
        y: f64,
    },
    /// The device acknowledged an instruction. Consumed by future
    /// flow-control logic; inert today.
    Acknowledge,
    /// The device reported an error condition.
    DeviceError {
        /// The device's error text.
        message: String,
    },
    /// A line no classifier matched.
    Unrecognized {
        /// The raw line.
        raw: String,
    },
}

impl Telemetry {
    /// Classify one raw telemetry line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("X:") {
            if let Some((x, y)) = parse_position(rest) {
                return Telemetry::PositionReport { x, y };
            }
        }

        if line == "ok" {
            return Telemetry::Acknowledge;
        }

        if let Some(message) = line.strip_prefix("Error:") {
            return Telemetry::DeviceError {
                message: message.trim().to_string(),
            };
        }

        Telemetry::Unrecognized {
            raw: line.to_string(),
        }
    }
}

/// Parse the `<x> Y:<y>` tail of a position report.
fn parse_position(rest: &str) -> Option<(f64, f64)> {
    let (x_part, y_part) = rest.split_once("Y:")?;
    let x = x_part.trim().parse().ok()?;
    let y = y_part.trim().parse().ok()?;
    Some((x, y))
}
