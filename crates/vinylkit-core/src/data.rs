//! Data models for positions, units, and session state
//!
//! This module provides:
//! - Machine position tracking (X/Y, millimeters)
//! - Coordinate unit management (MM, INCH)
//! - Device session state machine states
//! - Read-only session status snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine coordinate units (millimeters or inches)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    /// Millimeters (metric)
    MM,
    /// Inches (imperial)
    INCH,
}

impl Units {
    /// Convert a value from one unit to another
    ///
    /// Returns the original value if units are the same.
    pub fn convert(value: f64, from: Units, to: Units) -> f64 {
        match (from, to) {
            (Units::MM, Units::INCH) => value / 25.4,
            (Units::INCH, Units::MM) => value * 25.4,
            _ => value,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::MM => write!(f, "mm"),
            Units::INCH => write!(f, "in"),
        }
    }
}

/// Last known machine position in millimeters.
///
/// Mutated only by telemetry handling inside the device session; every
/// other component reads it through a status snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The machine origin
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{:.3} Y{:.3}", self.x, self.y)
    }
}

/// Device session states
///
/// Exactly one session exists per running process. The session starts
/// `Disconnected` and is the only component that mutates its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Not connected to any device
    Disconnected,
    /// In the process of opening the link
    Connecting,
    /// Connected and idle, ready for instructions
    Connected,
    /// Streaming an instruction program
    Streaming,
    /// Halted by an emergency stop
    Stopped,
    /// The link errored or was lost; requires disconnect/connect to recover
    Faulted,
}

impl SessionState {
    /// Check if this state indicates an open link to the device
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            SessionState::Connected | SessionState::Streaming | SessionState::Stopped
        )
    }

    /// Check if instructions may be written in this state
    pub fn can_send(&self) -> bool {
        matches!(self, SessionState::Connected | SessionState::Streaming)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Connected => write!(f, "connected"),
            SessionState::Streaming => write!(f, "streaming"),
            SessionState::Stopped => write!(f, "stopped"),
            SessionState::Faulted => write!(f, "faulted"),
        }
    }
}

/// Read-only snapshot of the device session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Current session state
    pub state: SessionState,
    /// Last known machine position
    pub position: Position,
    /// Whether the machine has been homed this session
    pub homed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Units::convert(25.4, Units::MM, Units::INCH), 1.0);
        assert_eq!(Units::convert(1.0, Units::INCH, Units::MM), 25.4);
        assert_eq!(Units::convert(7.5, Units::MM, Units::MM), 7.5);
    }

    #[test]
    fn test_state_predicates() {
        assert!(SessionState::Connected.can_send());
        assert!(SessionState::Streaming.can_send());
        assert!(!SessionState::Stopped.can_send());
        assert!(SessionState::Stopped.is_connected());
        assert!(!SessionState::Disconnected.is_connected());
        assert!(!SessionState::Faulted.can_send());
    }

    #[test]
    fn test_position_display() {
        let pos = Position::new(12.5, 3.2);
        assert_eq!(pos.to_string(), "X12.500 Y3.200");
    }
}
